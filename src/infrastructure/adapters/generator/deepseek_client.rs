//! DeepSeek Client - 调用 chat completion 接口生成叙事
//!
//! 实现 TextGeneratorPort trait
//!
//! 外部 API:
//! POST https://api.deepseek.com/chat/completions
//! Request: {"model": "...", "messages": [{"role": "...", "content": "..."}], "stream": false}
//! Response: {"choices": [{"message": {"role": "...", "content": "..."}}]}

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::{TextGenError, TextGeneratorPort};
use crate::domain::story::{narrator_instruction, Narrative, StoryPrompt};

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Chat completion 请求体
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

/// DeepSeek 客户端配置
#[derive(Debug, Clone)]
pub struct DeepSeekClientConfig {
    /// chat completion 完整 URL
    pub url: String,
    /// 模型名
    pub model: String,
    /// API Key，为空表示未配置
    pub api_key: Option<String>,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for DeepSeekClientConfig {
    fn default() -> Self {
        Self {
            url: "https://api.deepseek.com/chat/completions".to_string(),
            model: "deepseek-chat".to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

impl DeepSeekClientConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// DeepSeek 文本生成客户端
pub struct DeepSeekClient {
    client: Client,
    config: DeepSeekClientConfig,
}

impl DeepSeekClient {
    /// 创建新的客户端
    pub fn new(config: DeepSeekClientConfig) -> Result<Self, TextGenError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TextGenError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn api_key(&self) -> Option<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
    }

    fn build_request(&self, prompt: &StoryPrompt) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: narrator_instruction(prompt.genre()),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.user_input().as_str().to_string(),
                },
            ],
            stream: false,
        }
    }
}

#[async_trait]
impl TextGeneratorPort for DeepSeekClient {
    async fn generate(&self, prompt: &StoryPrompt) -> Result<Narrative, TextGenError> {
        let api_key = self.api_key().ok_or(TextGenError::MissingApiKey)?;
        let chat_request = self.build_request(prompt);

        tracing::debug!(
            url = %self.config.url,
            model = %chat_request.model,
            genre = %prompt.genre(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(&self.config.url)
            .bearer_auth(api_key)
            .json(&chat_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TextGenError::Timeout
                } else if e.is_connect() {
                    TextGenError::NetworkError(format!("Cannot connect to generator: {}", e))
                } else {
                    TextGenError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Generator API error");
            return Err(TextGenError::ServiceError {
                status: status.as_u16(),
                body,
            });
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| TextGenError::InvalidResponse(e.to_string()))?;

        let choice = chat_response.choices.into_iter().next().ok_or_else(|| {
            tracing::warn!("No choices in generator response");
            TextGenError::EmptyChoices
        })?;

        tracing::info!(
            role = %choice.message.role,
            text = %choice.message.content,
            "Generator response received"
        );

        Ok(Narrative::new(choice.message.content))
    }

    fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }
}
