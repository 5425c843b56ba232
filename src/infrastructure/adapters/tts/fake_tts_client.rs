//! Fake TTS Client - 用于测试的 TTS 客户端
//!
//! 始终返回固定的音频字节，不实际调用 TTS 服务

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{stream, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::application::ports::{AudioStream, SpeechSynthesizerPort, TtsError};
use crate::domain::story::Narrative;

#[derive(Debug, Clone)]
enum Behavior {
    /// 分块返回音频
    Audio { data: Vec<u8>, chunk_size: usize },
    /// 响应非 2xx
    Status(u16),
    /// 先返回部分数据，随后流中断
    BrokenStream(Vec<u8>),
}

/// Fake TTS Client
pub struct FakeTtsClient {
    behavior: Behavior,
    configured: bool,
    calls: AtomicUsize,
}

impl FakeTtsClient {
    /// 返回固定音频，按 4 字节切块
    pub fn returning(data: impl Into<Vec<u8>>) -> Self {
        Self::with_behavior(Behavior::Audio {
            data: data.into(),
            chunk_size: 4,
        })
    }

    pub fn failing_with_status(status: u16) -> Self {
        Self::with_behavior(Behavior::Status(status))
    }

    pub fn broken_after(data: impl Into<Vec<u8>>) -> Self {
        Self::with_behavior(Behavior::BrokenStream(data.into()))
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

    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            configured: true,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl SpeechSynthesizerPort for FakeTtsClient {
    async fn synthesize(&self, narrative: &Narrative) -> Result<AudioStream, TtsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(
            text_len = narrative.as_str().len(),
            "FakeTtsClient: returning fixed audio"
        );

        match &self.behavior {
            Behavior::Audio { data, chunk_size } => {
                let chunks: Vec<Result<Bytes, TtsError>> = data
                    .chunks((*chunk_size).max(1))
                    .map(|c| Ok(Bytes::copy_from_slice(c)))
                    .collect();
                Ok(stream::iter(chunks).boxed())
            }
            Behavior::Status(status) => Err(TtsError::ServiceError {
                status: *status,
                body: "fake failure".to_string(),
            }),
            Behavior::BrokenStream(data) => {
                let chunks = vec![
                    Ok(Bytes::copy_from_slice(data)),
                    Err(TtsError::StreamError("connection reset".to_string())),
                ];
                Ok(stream::iter(chunks).boxed())
            }
        }
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}
