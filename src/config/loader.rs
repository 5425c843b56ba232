//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 服务商标准环境变量（DEEPSEEK_API_KEY、ELEVENLABS_API_KEY）
//! 2. 环境变量（VOXTALE_ 前缀）
//! 3. 配置文件（config.toml）
//! 4. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 文本生成 API Key 的标准环境变量
pub const GENERATOR_API_KEY_ENV: &str = "DEEPSEEK_API_KEY";

/// 语音合成 API Key 的标准环境变量
pub const SYNTHESIZER_API_KEY_ENV: &str = "ELEVENLABS_API_KEY";

/// 加载应用配置
///
/// # 环境变量示例
/// - `VOXTALE_SERVER__PORT=4000`
/// - `VOXTALE_STORAGE__AUDIO_DIR=/data/audio`
/// - `VOXTALE_RETENTION__MAX_AGE_SECS=3600`
/// - `DEEPSEEK_API_KEY=sk-...`
/// - `ELEVENLABS_API_KEY=...`
///
/// API Key 缺失不会导致加载失败，由每个 /create 请求报告配置错误
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 4000)?
        .set_default("server.static_dir", "web")?
        .set_default("generator.url", "https://api.deepseek.com/chat/completions")?
        .set_default("generator.model", "deepseek-chat")?
        .set_default("generator.timeout_secs", 30)?
        .set_default("synthesizer.base_url", "https://api.elevenlabs.io/v1/text-to-speech")?
        .set_default("synthesizer.voice_id", "EXAVITQu4vr4xnSDxMaL")?
        .set_default("synthesizer.model_id", "eleven_monolingual_v1")?
        .set_default("synthesizer.output_format", "mp3_44100_128")?
        .set_default("synthesizer.stability", 0.5_f64)?
        .set_default("synthesizer.similarity_boost", 0.5_f64)?
        .set_default("synthesizer.timeout_secs", 30)?
        .set_default("storage.audio_dir", "audio")?
        .set_default("storage.url_prefix", "/audio")?
        .set_default("retention.enabled", true)?
        .set_default("retention.interval_secs", 3600)?
        .set_default("retention.max_age_secs", 3600)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量
    // 前缀: VOXTALE_
    // 层级分隔符: __ (双下划线)
    builder = builder.add_source(
        Environment::with_prefix("VOXTALE")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. 服务商标准变量覆盖
    builder = builder
        .set_override_option("generator.api_key", non_empty_env(GENERATOR_API_KEY_ENV))?
        .set_override_option("synthesizer.api_key", non_empty_env(SYNTHESIZER_API_KEY_ENV))?;

    // 5. 构建并反序列化
    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    // 6. 验证配置
    validate_config(&app_config)?;

    Ok(app_config)
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.generator.url.is_empty() {
        return Err(ConfigError::ValidationError(
            "Generator URL cannot be empty".to_string(),
        ));
    }

    if config.synthesizer.base_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "Synthesizer URL cannot be empty".to_string(),
        ));
    }

    for (name, value) in [
        ("stability", config.synthesizer.stability),
        ("similarity_boost", config.synthesizer.similarity_boost),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(ConfigError::ValidationError(format!(
                "Synthesizer {} must be between 0.0 and 1.0",
                name
            )));
        }
    }

    if config.storage.audio_dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "Audio directory cannot be empty".to_string(),
        ));
    }

    let prefix = &config.storage.url_prefix;
    if !prefix.starts_with('/') || prefix.trim_end_matches('/').is_empty() {
        return Err(ConfigError::ValidationError(
            "Audio URL prefix must start with '/' and cannot be the root path".to_string(),
        ));
    }

    if config.retention.enabled && config.retention.interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Retention interval cannot be 0 when retention is enabled".to_string(),
        ));
    }

    Ok(())
}

fn key_status(key: &Option<String>) -> &'static str {
    match key {
        Some(k) if !k.is_empty() => "set",
        _ => "unset",
    }
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Static Directory: {:?}", config.server.static_dir);
    tracing::info!("Generator URL: {}", config.generator.url);
    tracing::info!("Generator Model: {}", config.generator.model);
    tracing::info!("Generator API Key: {}", key_status(&config.generator.api_key));
    tracing::info!("Synthesizer URL: {}", config.synthesizer.base_url);
    tracing::info!("Synthesizer Voice: {}", config.synthesizer.voice_id);
    tracing::info!("Synthesizer API Key: {}", key_status(&config.synthesizer.api_key));
    tracing::info!(
        "Upstream Timeouts: generator={}s, synthesizer={}s",
        config.generator.timeout_secs,
        config.synthesizer.timeout_secs
    );
    tracing::info!("Audio Directory: {:?}", config.storage.audio_dir);
    tracing::info!("Retention Enabled: {}", config.retention.enabled);
    if config.retention.enabled {
        tracing::info!("Retention Interval: {}s", config.retention.interval_secs);
        tracing::info!("Retention Max Age: {}s", config.retention.max_age_secs);
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
