//! Domain Layer - 领域层
//!
//! Story Context: 输入校验、叙事指令、音频制品

pub mod story;
