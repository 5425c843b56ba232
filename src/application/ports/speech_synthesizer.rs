//! Speech Synthesizer Port - TTS 合成引擎抽象
//!
//! 定义语音合成的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;
use thiserror::Error;

use crate::domain::story::Narrative;

/// TTS 错误
#[derive(Debug, Error)]
pub enum TtsError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error (HTTP {status}): {body}")]
    ServiceError { status: u16, body: String },

    #[error("Stream error: {0}")]
    StreamError(String),

    #[error("API key not configured")]
    MissingApiKey,
}

/// 合成得到的 MP3 字节流
///
/// 不保证整体缓冲在内存中，由存储端边读边写
pub type AudioStream = BoxStream<'static, Result<Bytes, TtsError>>;

/// Speech Synthesizer Port
///
/// 外部 TTS 服务的抽象接口
#[async_trait]
pub trait SpeechSynthesizerPort: Send + Sync {
    /// 执行语音合成
    ///
    /// 状态码非 2xx 或网络失败时在此返回错误；成功时返回尚未读完的音频流
    async fn synthesize(&self, narrative: &Narrative) -> Result<AudioStream, TtsError>;

    /// 凭证是否就绪
    fn is_configured(&self) -> bool {
        true
    }
}
