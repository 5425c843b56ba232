//! 应用层错误定义
//!
//! 创建故事流水线的错误分类

use thiserror::Error;

use crate::application::ports::{AudioStorageError, TextGenError, TtsError};
use crate::domain::story::StoryError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 输入为空或编码非法
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] StoryError),

    /// 缺少外部服务凭证
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// 文本生成阶段失败
    #[error("Upstream generator error: {0}")]
    UpstreamGeneratorError(#[from] TextGenError),

    /// 语音合成阶段失败
    #[error("Upstream synthesizer error: {0}")]
    UpstreamSynthesizerError(#[from] TtsError),

    /// 音频落盘失败
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl ApplicationError {
    /// 创建配置错误
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError(message.into())
    }
}

impl From<AudioStorageError> for ApplicationError {
    fn from(err: AudioStorageError) -> Self {
        match err {
            // 音频流中途断开属于合成阶段的失败
            AudioStorageError::SourceError(msg) => {
                Self::UpstreamSynthesizerError(TtsError::StreamError(msg))
            }
            other => Self::StorageError(other.to_string()),
        }
    }
}
