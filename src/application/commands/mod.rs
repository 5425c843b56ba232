//! 应用层 - 命令（写操作）

mod story_commands;

pub mod handlers;

pub use story_commands::*;
