//! Fake Text Generator - 用于测试的文本生成器
//!
//! 不调用外部服务，返回固定文本或固定错误

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::application::ports::{TextGenError, TextGeneratorPort};
use crate::domain::story::{Narrative, StoryPrompt};

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    EmptyChoices,
    Status(u16),
}

/// Fake Text Generator
pub struct FakeTextGenerator {
    reply: Reply,
    configured: bool,
    calls: AtomicUsize,
}

impl FakeTextGenerator {
    /// 始终返回给定文本
    pub fn returning(text: impl Into<String>) -> Self {
        Self::with_reply(Reply::Text(text.into()))
    }

    /// 模拟 choices 为空的响应
    pub fn empty_choices() -> Self {
        Self::with_reply(Reply::EmptyChoices)
    }

    /// 模拟非 2xx 响应
    pub fn failing_with_status(status: u16) -> Self {
        Self::with_reply(Reply::Status(status))
    }

    /// 模拟缺少 API Key
    pub fn unconfigured(mut self) -> Self {
        self.configured = false;
        self
    }

    /// 被调用的次数
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            configured: true,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl TextGeneratorPort for FakeTextGenerator {
    async fn generate(&self, prompt: &StoryPrompt) -> Result<Narrative, TextGenError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(
            genre = %prompt.genre(),
            "FakeTextGenerator: returning canned reply"
        );

        match &self.reply {
            Reply::Text(text) => Ok(Narrative::new(text.clone())),
            Reply::EmptyChoices => Err(TextGenError::EmptyChoices),
            Reply::Status(status) => Err(TextGenError::ServiceError {
                status: *status,
                body: "fake failure".to_string(),
            }),
        }
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}
