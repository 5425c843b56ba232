//! Story Command Handlers
//!
//! 校验 -> 文本生成 -> 语音合成 -> 落盘，严格顺序执行，任一阶段失败即中止

use std::sync::Arc;

use crate::application::commands::CreateStory;
use crate::application::error::ApplicationError;
use crate::application::ports::{AudioStoragePort, SpeechSynthesizerPort, TextGeneratorPort};
use crate::domain::story::{AudioArtifact, AudioId, Narrative, StoryPrompt};

// ============================================================================
// CreateStory
// ============================================================================

/// 创建故事响应
#[derive(Debug, Clone)]
pub struct CreateStoryResponse {
    pub narrative: Narrative,
    pub artifact: AudioArtifact,
    /// 前端可直接使用的音频地址
    pub audio_url: String,
}

/// CreateStory Handler
pub struct CreateStoryHandler {
    generator: Arc<dyn TextGeneratorPort>,
    synthesizer: Arc<dyn SpeechSynthesizerPort>,
    audio_storage: Arc<dyn AudioStoragePort>,
}

impl CreateStoryHandler {
    pub fn new(
        generator: Arc<dyn TextGeneratorPort>,
        synthesizer: Arc<dyn SpeechSynthesizerPort>,
        audio_storage: Arc<dyn AudioStoragePort>,
    ) -> Self {
        Self {
            generator,
            synthesizer,
            audio_storage,
        }
    }

    pub async fn handle(&self, command: CreateStory) -> Result<CreateStoryResponse, ApplicationError> {
        // 凭证缺失时所有请求直接短路
        if !self.generator.is_configured() || !self.synthesizer.is_configured() {
            tracing::error!(
                generator_configured = self.generator.is_configured(),
                synthesizer_configured = self.synthesizer.is_configured(),
                "Missing API keys"
            );
            return Err(ApplicationError::configuration("missing API keys"));
        }

        let prompt = StoryPrompt::parse(&command.user_input, &command.genre_input)
            .map_err(|e| {
                tracing::warn!(error = %e, "Invalid story input");
                e
            })?;

        // Stage 1: 文本生成
        let narrative = self.generator.generate(&prompt).await.map_err(|e| {
            tracing::error!(error = %e, genre = %prompt.genre(), "Text generation failed");
            e
        })?;

        tracing::info!(
            genre = %prompt.genre(),
            text_len = narrative.as_str().len(),
            "Narrative generated"
        );

        // Stage 2: 语音合成
        let stream = self.synthesizer.synthesize(&narrative).await.map_err(|e| {
            tracing::error!(error = %e, "Speech synthesis failed");
            e
        })?;

        // Stage 3: 落盘
        let id = AudioId::new();
        let artifact = self.audio_storage.save_stream(id, stream).await.map_err(|e| {
            tracing::error!(error = %e, audio_id = %id, "Failed to save audio");
            e
        })?;

        let audio_url = self.audio_storage.public_url(id);

        tracing::info!(
            audio_id = %id,
            size_bytes = artifact.size_bytes,
            audio_url = %audio_url,
            "Story created"
        );

        Ok(CreateStoryResponse {
            narrative,
            artifact,
            audio_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{TextGenError, TtsError};
    use crate::domain::story::StoryError;
    use crate::infrastructure::adapters::{FakeTextGenerator, FakeTtsClient, FileAudioStorage};
    use tempfile::{tempdir, TempDir};

    const ID3_AUDIO: [u8; 10] = [0x49, 0x44, 0x33, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x21];

    struct Fixture {
        generator: Arc<FakeTextGenerator>,
        synthesizer: Arc<FakeTtsClient>,
        storage: Arc<FileAudioStorage>,
        handler: CreateStoryHandler,
        dir: TempDir,
    }

    fn fixture(generator: FakeTextGenerator, synthesizer: FakeTtsClient) -> Fixture {
        let dir = tempdir().unwrap();
        let generator = Arc::new(generator);
        let synthesizer = Arc::new(synthesizer);
        let storage = Arc::new(FileAudioStorage::new(dir.path().join("audio"), "/audio"));
        let handler = CreateStoryHandler::new(generator.clone(), synthesizer.clone(), storage.clone());
        Fixture {
            generator,
            synthesizer,
            storage,
            handler,
            dir,
        }
    }

    fn audio_files(fx: &Fixture) -> Vec<std::path::PathBuf> {
        match std::fs::read_dir(fx.dir.path().join("audio")) {
            Ok(entries) => entries.map(|e| e.unwrap().path()).collect(),
            Err(_) => Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_scenario_drama() {
        let fx = fixture(
            FakeTextGenerator::returning("She listened as he spoke."),
            FakeTtsClient::returning(ID3_AUDIO.to_vec()),
        );

        let result = fx
            .handler
            .handle(CreateStory::new("He told her the news.", "drama"))
            .await
            .unwrap();

        assert_eq!(result.narrative.as_str(), "She listened as he spoke.");
        assert_eq!(result.audio_url, format!("/audio/{}.mp3", result.artifact.id));
        assert_eq!(result.artifact.size_bytes, ID3_AUDIO.len() as u64);

        let stored = fx.storage.read_audio(result.artifact.id).await.unwrap();
        assert_eq!(stored, ID3_AUDIO);
        assert_eq!(audio_files(&fx).len(), 1);
        assert_eq!(fx.generator.calls(), 1);
        assert_eq!(fx.synthesizer.calls(), 1);
    }

    #[tokio::test]
    async fn test_each_request_gets_a_new_file() {
        let fx = fixture(
            FakeTextGenerator::returning("text"),
            FakeTtsClient::returning(ID3_AUDIO.to_vec()),
        );

        let first = fx.handler.handle(CreateStory::new("a", "b")).await.unwrap();
        let second = fx.handler.handle(CreateStory::new("a", "b")).await.unwrap();

        assert_ne!(first.artifact.id, second.artifact.id);
        assert_eq!(audio_files(&fx).len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_input_skips_external_calls() {
        let cases: Vec<(Vec<u8>, Vec<u8>)> = vec![
            (b"".to_vec(), b"drama".to_vec()),
            (b"hello".to_vec(), b"".to_vec()),
            (b"".to_vec(), b"".to_vec()),
            (vec![0xff, 0xfe, 0xfd], b"drama".to_vec()),
            (b"hello".to_vec(), vec![0xe2, 0x28, 0xa1]),
        ];

        for (user_input, genre_input) in cases {
            let fx = fixture(
                FakeTextGenerator::returning("unused"),
                FakeTtsClient::returning(ID3_AUDIO.to_vec()),
            );
            let err = fx
                .handler
                .handle(CreateStory::new(user_input, genre_input))
                .await
                .unwrap_err();

            assert!(matches!(err, ApplicationError::InvalidInput(_)));
            assert_eq!(fx.generator.calls(), 0);
            assert_eq!(fx.synthesizer.calls(), 0);
            assert!(audio_files(&fx).is_empty());
        }
    }

    #[tokio::test]
    async fn test_missing_credentials_short_circuit() {
        let fx = fixture(
            FakeTextGenerator::returning("text").unconfigured(),
            FakeTtsClient::returning(ID3_AUDIO.to_vec()),
        );
        let err = fx.handler.handle(CreateStory::new("a", "b")).await.unwrap_err();
        assert!(matches!(err, ApplicationError::ConfigurationError(_)));
        assert_eq!(fx.generator.calls(), 0);

        let fx = fixture(
            FakeTextGenerator::returning("text"),
            FakeTtsClient::returning(ID3_AUDIO.to_vec()).unconfigured(),
        );
        // 凭证检查先于输入校验
        let err = fx.handler.handle(CreateStory::new("", "")).await.unwrap_err();
        assert!(matches!(err, ApplicationError::ConfigurationError(_)));
        assert_eq!(fx.generator.calls(), 0);
        assert_eq!(fx.synthesizer.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_choices_aborts_pipeline() {
        let fx = fixture(
            FakeTextGenerator::empty_choices(),
            FakeTtsClient::returning(ID3_AUDIO.to_vec()),
        );
        let err = fx.handler.handle(CreateStory::new("a", "b")).await.unwrap_err();

        assert!(matches!(
            err,
            ApplicationError::UpstreamGeneratorError(TextGenError::EmptyChoices)
        ));
        assert_eq!(fx.synthesizer.calls(), 0);
        assert!(audio_files(&fx).is_empty());
    }

    #[tokio::test]
    async fn test_generator_status_error() {
        let fx = fixture(
            FakeTextGenerator::failing_with_status(503),
            FakeTtsClient::returning(ID3_AUDIO.to_vec()),
        );
        let err = fx.handler.handle(CreateStory::new("a", "b")).await.unwrap_err();
        assert!(matches!(err, ApplicationError::UpstreamGeneratorError(_)));
        assert!(audio_files(&fx).is_empty());
    }

    #[tokio::test]
    async fn test_synthesizer_status_error_creates_no_file() {
        let fx = fixture(
            FakeTextGenerator::returning("text"),
            FakeTtsClient::failing_with_status(500),
        );
        let err = fx.handler.handle(CreateStory::new("a", "b")).await.unwrap_err();

        assert!(matches!(
            err,
            ApplicationError::UpstreamSynthesizerError(TtsError::ServiceError { status: 500, .. })
        ));
        assert_eq!(fx.generator.calls(), 1);
        assert!(audio_files(&fx).is_empty());
    }

    #[tokio::test]
    async fn test_broken_audio_stream_is_synthesizer_error() {
        let fx = fixture(
            FakeTextGenerator::returning("text"),
            FakeTtsClient::broken_after(ID3_AUDIO.to_vec()),
        );
        let err = fx.handler.handle(CreateStory::new("a", "b")).await.unwrap_err();

        assert!(matches!(err, ApplicationError::UpstreamSynthesizerError(_)));
        assert!(audio_files(&fx).is_empty());
    }

    #[tokio::test]
    async fn test_unwritable_directory_is_storage_error() {
        let fx = fixture(
            FakeTextGenerator::returning("text"),
            FakeTtsClient::returning(ID3_AUDIO.to_vec()),
        );
        // 用普通文件占住目录路径
        std::fs::write(fx.dir.path().join("audio"), b"not a directory").unwrap();

        let err = fx.handler.handle(CreateStory::new("a", "b")).await.unwrap_err();
        assert!(matches!(err, ApplicationError::StorageError(_)));
    }

    #[test]
    fn test_story_error_converts_to_invalid_input() {
        let err: ApplicationError = StoryError::MissingField("userInput").into();
        assert!(matches!(err, ApplicationError::InvalidInput(_)));
    }
}
