//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 文本生成服务配置
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// 语音合成服务配置
    #[serde(default)]
    pub synthesizer: SynthesizerConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 保留期清理配置
    #[serde(default)]
    pub retention: RetentionConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 首页 index.html 所在目录
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4000
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("web")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 文本生成服务配置（DeepSeek chat completion）
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    /// chat completion 完整 URL
    #[serde(default = "default_generator_url")]
    pub url: String,

    /// 模型名
    #[serde(default = "default_generator_model")]
    pub model: String,

    /// API Key，也可通过 DEEPSEEK_API_KEY 提供
    #[serde(default)]
    pub api_key: Option<String>,

    /// 请求超时时间（秒）
    #[serde(default = "default_upstream_timeout")]
    pub timeout_secs: u64,
}

fn default_generator_url() -> String {
    "https://api.deepseek.com/chat/completions".to_string()
}

fn default_generator_model() -> String {
    "deepseek-chat".to_string()
}

fn default_upstream_timeout() -> u64 {
    30
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            url: default_generator_url(),
            model: default_generator_model(),
            api_key: None,
            timeout_secs: default_upstream_timeout(),
        }
    }
}

/// 语音合成服务配置（ElevenLabs）
#[derive(Debug, Clone, Deserialize)]
pub struct SynthesizerConfig {
    /// text-to-speech 接口前缀
    #[serde(default = "default_synthesizer_url")]
    pub base_url: String,

    #[serde(default = "default_voice_id")]
    pub voice_id: String,

    #[serde(default = "default_model_id")]
    pub model_id: String,

    #[serde(default = "default_output_format")]
    pub output_format: String,

    /// 稳定度 (0.0 - 1.0)
    #[serde(default = "default_voice_setting")]
    pub stability: f32,

    /// 相似度增强 (0.0 - 1.0)
    #[serde(default = "default_voice_setting")]
    pub similarity_boost: f32,

    /// API Key，也可通过 ELEVENLABS_API_KEY 提供
    #[serde(default)]
    pub api_key: Option<String>,

    /// 请求超时时间（秒）
    #[serde(default = "default_upstream_timeout")]
    pub timeout_secs: u64,
}

fn default_synthesizer_url() -> String {
    "https://api.elevenlabs.io/v1/text-to-speech".to_string()
}

fn default_voice_id() -> String {
    "EXAVITQu4vr4xnSDxMaL".to_string()
}

fn default_model_id() -> String {
    "eleven_monolingual_v1".to_string()
}

fn default_output_format() -> String {
    "mp3_44100_128".to_string()
}

fn default_voice_setting() -> f32 {
    0.5
}

impl Default for SynthesizerConfig {
    fn default() -> Self {
        Self {
            base_url: default_synthesizer_url(),
            voice_id: default_voice_id(),
            model_id: default_model_id(),
            output_format: default_output_format(),
            stability: default_voice_setting(),
            similarity_boost: default_voice_setting(),
            api_key: None,
            timeout_secs: default_upstream_timeout(),
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 音频存储目录
    #[serde(default = "default_audio_dir")]
    pub audio_dir: PathBuf,

    /// 音频对外 URL 前缀
    #[serde(default = "default_url_prefix")]
    pub url_prefix: String,
}

fn default_audio_dir() -> PathBuf {
    PathBuf::from("audio")
}

fn default_url_prefix() -> String {
    "/audio".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            audio_dir: default_audio_dir(),
            url_prefix: default_url_prefix(),
        }
    }
}

/// 保留期清理配置
#[derive(Debug, Clone, Deserialize)]
pub struct RetentionConfig {
    /// 是否启用自动清理
    #[serde(default = "default_retention_enabled")]
    pub enabled: bool,

    /// 清理间隔时间（秒）
    #[serde(default = "default_retention_interval")]
    pub interval_secs: u64,

    /// 音频保留时长（秒）
    #[serde(default = "default_max_age")]
    pub max_age_secs: u64,
}

fn default_retention_enabled() -> bool {
    true
}

fn default_retention_interval() -> u64 {
    3600 // 1 小时
}

fn default_max_age() -> u64 {
    3600 // 1 小时
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            enabled: default_retention_enabled(),
            interval_secs: default_retention_interval(),
            max_age_secs: default_max_age(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.generator.model, "deepseek-chat");
        assert_eq!(config.synthesizer.voice_id, "EXAVITQu4vr4xnSDxMaL");
        assert_eq!(config.storage.audio_dir, PathBuf::from("audio"));
        assert_eq!(config.retention.max_age_secs, 3600);
        assert!(config.generator.api_key.is_none());
    }

    #[test]
    fn test_server_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:4000");
    }
}
