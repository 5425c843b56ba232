//! Voxtale - 文本转有声短篇服务
//!
//! 启动流程: 加载配置 -> 初始化日志 -> 构建适配器 -> 启动清理任务 -> 启动 HTTP 服务

use std::sync::Arc;
use std::time::Duration;

use voxtale::application::{SpeechSynthesizerPort, SystemClock, TextGeneratorPort};
use voxtale::config::{load_config, print_config, AppConfig};
use voxtale::infrastructure::adapters::{
    DeepSeekClient, DeepSeekClientConfig, ElevenLabsClient, ElevenLabsClientConfig,
    FileAudioStorage, VoiceSettings,
};
use voxtale::infrastructure::http::{AppState, HttpServer, ServerConfig};
use voxtale::infrastructure::worker::{RetentionSweeper, RetentionSweeperConfig};

fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},voxtale={},tower_http=debug",
        config.log.level, config.log.level
    );
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 可选
    dotenvy::dotenv().ok();

    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Voxtale - 文本转有声短篇服务");
    print_config(&config);

    // 创建文本生成客户端
    let generator_config = DeepSeekClientConfig {
        url: config.generator.url.clone(),
        model: config.generator.model.clone(),
        api_key: config.generator.api_key.clone(),
        timeout_secs: config.generator.timeout_secs,
    };
    let generator = Arc::new(DeepSeekClient::new(generator_config)?);

    // 创建 TTS 客户端
    let synthesizer_config = ElevenLabsClientConfig {
        base_url: config.synthesizer.base_url.clone(),
        voice_id: config.synthesizer.voice_id.clone(),
        model_id: config.synthesizer.model_id.clone(),
        output_format: config.synthesizer.output_format.clone(),
        voice_settings: VoiceSettings {
            stability: config.synthesizer.stability,
            similarity_boost: config.synthesizer.similarity_boost,
        },
        api_key: config.synthesizer.api_key.clone(),
        timeout_secs: config.synthesizer.timeout_secs,
    };
    let synthesizer = Arc::new(ElevenLabsClient::new(synthesizer_config)?);

    if !generator.is_configured() || !synthesizer.is_configured() {
        tracing::warn!("API keys missing, /create requests will fail until they are configured");
    }

    // 创建音频存储
    let audio_storage = Arc::new(FileAudioStorage::new(
        &config.storage.audio_dir,
        config.storage.url_prefix.clone(),
    ));

    // 启动保留期清理
    let retention_notice = if config.retention.enabled {
        let sweeper_config = RetentionSweeperConfig {
            interval: Duration::from_secs(config.retention.interval_secs),
            max_age: Duration::from_secs(config.retention.max_age_secs),
        };
        let max_age = sweeper_config.max_age;
        let sweeper =
            RetentionSweeper::new(sweeper_config, audio_storage.clone(), Arc::new(SystemClock));
        tokio::spawn(sweeper.run());
        Some(max_age)
    } else {
        tracing::info!("Retention sweeper disabled");
        None
    };

    // 创建 HTTP 服务器
    let server_config = ServerConfig::new(&config.server.host, config.server.port)
        .with_static_dir(&config.server.static_dir)
        .with_audio(&config.storage.audio_dir, config.storage.url_prefix.clone());
    let state = AppState::new(generator, synthesizer, audio_storage, retention_notice);

    let server = HttpServer::new(server_config, state);

    tracing::info!("Starting HTTP server...");

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
