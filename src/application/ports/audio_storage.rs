//! Audio Storage Port - 出站端口
//!
//! 定义音频文件存储和保留期清理的抽象接口

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use thiserror::Error;

use super::AudioStream;
use crate::domain::story::{AudioArtifact, AudioId};

/// 音频存储错误
#[derive(Debug, Error)]
pub enum AudioStorageError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    IoError(String),

    /// 上游音频流在写入过程中出错
    #[error("Audio source error: {0}")]
    SourceError(String),
}

/// 一次清理的结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GcResult {
    /// 扫描到的文件数量
    pub scanned: u64,
    /// 删除的文件数量
    pub deleted_files: u64,
    /// 释放的空间（字节）
    pub freed_bytes: u64,
    /// 单个文件处理失败的次数
    pub errors: u64,
}

/// Audio Storage Port - 出站端口
///
/// 管理音频文件的存储和过期清理
#[async_trait]
pub trait AudioStoragePort: Send + Sync {
    /// 获取音频文件路径
    fn get_audio_path(&self, id: AudioId) -> PathBuf;

    /// 获取音频的公开访问路径（供前端 `<audio>` 使用）
    fn public_url(&self, id: AudioId) -> String;

    /// 将音频流写入 `<dir>/<id>.mp3`，已存在则截断覆盖
    async fn save_stream(
        &self,
        id: AudioId,
        stream: AudioStream,
    ) -> Result<AudioArtifact, AudioStorageError>;

    /// 读取音频数据
    async fn read_audio(&self, id: AudioId) -> Result<Vec<u8>, AudioStorageError>;

    /// 检查音频是否存在
    async fn audio_exists(&self, id: AudioId) -> bool;

    /// 删除修改时间早于 `now - max_age` 的文件
    ///
    /// 单个文件失败只记录日志；目录列举失败才返回错误
    async fn purge_older_than(
        &self,
        now: SystemTime,
        max_age: Duration,
    ) -> Result<GcResult, AudioStorageError>;
}
