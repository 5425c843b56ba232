//! Worker Layer - Background Task Processing
//!
//! 实现 RetentionSweeper，定期清理过期音频

mod retention_sweeper;

pub use retention_sweeper::{RetentionSweeper, RetentionSweeperConfig};
