//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（TextGenerator、SpeechSynthesizer、AudioStorage、Clock）
//! - commands: 创建故事命令及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;

// Re-exports
pub use commands::{
    handlers::{CreateStoryHandler, CreateStoryResponse},
    CreateStory,
};

pub use error::ApplicationError;

pub use ports::{
    AudioStorageError, AudioStoragePort, AudioStream, Clock, GcResult, SpeechSynthesizerPort,
    SystemClock, TextGenError, TextGeneratorPort, TtsError,
};
