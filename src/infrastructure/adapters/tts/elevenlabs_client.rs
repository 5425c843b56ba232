//! ElevenLabs Client - 调用外部 TTS HTTP 服务
//!
//! 实现 SpeechSynthesizerPort trait
//!
//! 外部 TTS API:
//! POST https://api.elevenlabs.io/v1/text-to-speech/{voice_id}?output_format=mp3_44100_128
//! Request: {"text": "...", "model_id": "...", "voice_settings": {...}}  (JSON)
//! Response: audio/mpeg binary

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::application::ports::{AudioStream, SpeechSynthesizerPort, TtsError};
use crate::domain::story::Narrative;

/// 音色参数
#[derive(Debug, Clone, Copy, Serialize)]
pub struct VoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.5,
        }
    }
}

/// TTS 合成请求体 (JSON)
#[derive(Debug, Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

/// ElevenLabs 客户端配置
#[derive(Debug, Clone)]
pub struct ElevenLabsClientConfig {
    /// text-to-speech 接口前缀，voice_id 拼接在其后
    pub base_url: String,
    pub voice_id: String,
    pub model_id: String,
    pub output_format: String,
    pub voice_settings: VoiceSettings,
    /// API Key，为空表示未配置
    pub api_key: Option<String>,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for ElevenLabsClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.elevenlabs.io/v1/text-to-speech".to_string(),
            voice_id: "EXAVITQu4vr4xnSDxMaL".to_string(),
            model_id: "eleven_monolingual_v1".to_string(),
            output_format: "mp3_44100_128".to_string(),
            voice_settings: VoiceSettings::default(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

impl ElevenLabsClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
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

/// ElevenLabs TTS 客户端
pub struct ElevenLabsClient {
    client: Client,
    config: ElevenLabsClientConfig,
}

impl ElevenLabsClient {
    /// 创建新的客户端
    pub fn new(config: ElevenLabsClientConfig) -> Result<Self, TtsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TtsError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// 获取合成 URL（不含查询参数）
    fn synthesis_url(&self) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.voice_id
        )
    }

    fn api_key(&self) -> Option<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
    }
}

#[async_trait]
impl SpeechSynthesizerPort for ElevenLabsClient {
    async fn synthesize(&self, narrative: &Narrative) -> Result<AudioStream, TtsError> {
        let api_key = self.api_key().ok_or(TtsError::MissingApiKey)?;
        let request = SynthesisRequest {
            text: narrative.as_str(),
            model_id: &self.config.model_id,
            voice_settings: self.config.voice_settings,
        };

        tracing::debug!(
            url = %self.synthesis_url(),
            text_len = request.text.len(),
            voice_id = %self.config.voice_id,
            "Sending TTS synthesis request"
        );

        let response = self
            .client
            .post(self.synthesis_url())
            .query(&[("output_format", self.config.output_format.as_str())])
            .header("xi-api-key", api_key)
            .header(ACCEPT, "audio/mpeg")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TtsError::Timeout
                } else if e.is_connect() {
                    TtsError::NetworkError(format!("Cannot connect to TTS service: {}", e))
                } else {
                    TtsError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "TTS API error");
            return Err(TtsError::ServiceError {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(
            content_length = ?response.content_length(),
            "TTS synthesis started streaming"
        );

        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| TtsError::StreamError(e.to_string())))
            .boxed();

        Ok(stream)
    }

    fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::TryStreamExt;
    use mockito::{Matcher, Server, ServerGuard};

    fn client_for(server: &ServerGuard) -> ElevenLabsClient {
        let config = ElevenLabsClientConfig::new(format!("{}/v1/text-to-speech", server.url()))
            .with_api_key("xi-test")
            .with_timeout(5);
        ElevenLabsClient::new(config).unwrap()
    }

    #[test]
    fn test_config_default() {
        let config = ElevenLabsClientConfig::default();
        assert_eq!(config.voice_id, "EXAVITQu4vr4xnSDxMaL");
        assert_eq!(config.output_format, "mp3_44100_128");
        assert_eq!(config.voice_settings.stability, 0.5);
        assert_eq!(config.voice_settings.similarity_boost, 0.5);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_synthesis_url_trims_trailing_slash() {
        let client =
            ElevenLabsClient::new(ElevenLabsClientConfig::new("http://tts.local/v1/tts/")).unwrap();
        assert_eq!(
            client.synthesis_url(),
            "http://tts.local/v1/tts/EXAVITQu4vr4xnSDxMaL"
        );
    }

    #[tokio::test]
    async fn test_synthesize_streams_audio_bytes() {
        let mut server = Server::new_async().await;
        let audio = vec![0x49, 0x44, 0x33, 0x04, 0x00, 0x00];
        let mock = server
            .mock("POST", "/v1/text-to-speech/EXAVITQu4vr4xnSDxMaL")
            .match_query(Matcher::UrlEncoded(
                "output_format".into(),
                "mp3_44100_128".into(),
            ))
            .match_header("xi-api-key", "xi-test")
            .match_header("accept", "audio/mpeg")
            .match_body(Matcher::Json(serde_json::json!({
                "text": "She listened as he spoke.",
                "model_id": "eleven_monolingual_v1",
                "voice_settings": {"stability": 0.5, "similarity_boost": 0.5}
            })))
            .with_status(200)
            .with_header("content-type", "audio/mpeg")
            .with_body(audio.clone())
            .create_async()
            .await;

        let stream = client_for(&server)
            .synthesize(&Narrative::new("She listened as he spoke."))
            .await
            .unwrap();
        let chunks: Vec<bytes::Bytes> = stream.try_collect().await.unwrap();
        let received: Vec<u8> = chunks.concat();

        assert_eq!(received, audio);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_synthesize_non_success_status() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/v1/text-to-speech/EXAVITQu4vr4xnSDxMaL")
            .match_query(Matcher::Any)
            .with_status(429)
            .with_body("quota exceeded")
            .create_async()
            .await;

        let result = client_for(&server)
            .synthesize(&Narrative::new("text"))
            .await;
        match result {
            Err(TtsError::ServiceError { status, body }) => {
                assert_eq!(status, 429);
                assert_eq!(body, "quota exceeded");
            }
            Err(other) => panic!("unexpected error: {other:?}"),
            Ok(_) => panic!("expected failure"),
        }
    }

    #[tokio::test]
    async fn test_synthesize_without_key() {
        let client = ElevenLabsClient::new(ElevenLabsClientConfig::default()).unwrap();
        assert!(!client.is_configured());
        let result = client.synthesize(&Narrative::new("text")).await;
        assert!(matches!(result, Err(TtsError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_synthesize_connection_refused() {
        let config = ElevenLabsClientConfig::new("http://127.0.0.1:1/v1/text-to-speech")
            .with_api_key("xi-test")
            .with_timeout(2);
        let client = ElevenLabsClient::new(config).unwrap();

        let err = match client.synthesize(&Narrative::new("text")).await {
            Err(e) => e,
            Ok(_) => panic!("expected failure"),
        };
        assert!(matches!(err, TtsError::NetworkError(_) | TtsError::Timeout));

        let app_err = crate::application::ApplicationError::from(err);
        assert!(matches!(
            app_err,
            crate::application::ApplicationError::UpstreamSynthesizerError(_)
        ));
    }

    #[test]
    fn test_empty_key_is_not_configured() {
        let client =
            ElevenLabsClient::new(ElevenLabsClientConfig::default().with_api_key("")).unwrap();
        assert!(!client.is_configured());

        let client =
            ElevenLabsClient::new(ElevenLabsClientConfig::default().with_api_key("xi")).unwrap();
        assert!(client.is_configured());
    }
}
