//! Voxtale - 文本转有声短篇
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Story Context: 输入校验、叙事指令、音频制品
//!
//! 应用层 (application/):
//! - Ports: TextGenerator, SpeechSynthesizer, AudioStorage, Clock
//! - Commands: CreateStory 及其处理器（两阶段外部调用编排）
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: 首页、/create 表单接口、音频静态文件
//! - Adapters: DeepSeek 客户端、ElevenLabs 客户端、文件存储
//! - Worker: RetentionSweeper 定期清理过期音频

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
