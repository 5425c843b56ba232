//! Text Generator Port - 文本生成服务抽象
//!
//! 具体实现在 infrastructure/adapters/generator

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::story::{Narrative, StoryPrompt};

/// 文本生成错误
#[derive(Debug, Error)]
pub enum TextGenError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error (HTTP {status}): {body}")]
    ServiceError { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Response contained no choices")]
    EmptyChoices,

    #[error("API key not configured")]
    MissingApiKey,
}

/// Text Generator Port
///
/// 把用户输入改写为指定体裁的第一人称短篇叙事
#[async_trait]
pub trait TextGeneratorPort: Send + Sync {
    /// 单次非流式调用
    async fn generate(&self, prompt: &StoryPrompt) -> Result<Narrative, TextGenError>;

    /// 凭证是否就绪
    fn is_configured(&self) -> bool {
        true
    }
}
