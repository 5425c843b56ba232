//! File Storage - 文件系统音频存储实现
//!
//! 实现 AudioStoragePort trait
//!
//! 目录结构为扁平的 `<audio_dir>/<uuid>.mp3`，没有索引文件，
//! 文件修改时间即创建时间

use async_trait::async_trait;
use chrono::Utc;
use futures_util::StreamExt;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio_util::io::StreamReader;

use crate::application::ports::{
    AudioStorageError, AudioStoragePort, AudioStream, GcResult, TtsError,
};
use crate::domain::story::{AudioArtifact, AudioId};

/// 文件系统音频存储
pub struct FileAudioStorage {
    /// 存储根目录
    base_dir: PathBuf,
    /// 对外暴露的 URL 前缀，如 `/audio`
    url_prefix: String,
}

impl FileAudioStorage {
    /// 创建新的文件存储
    ///
    /// 目录在首次写入时创建
    pub fn new(base_dir: impl AsRef<Path>, url_prefix: impl Into<String>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            url_prefix: url_prefix.into(),
        }
    }

    /// 获取存储根目录
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// 区分写盘失败与上游音频流失败
    fn classify_copy_error(err: io::Error) -> AudioStorageError {
        let from_source = err
            .get_ref()
            .map_or(false, |inner| inner.is::<TtsError>());
        if from_source {
            AudioStorageError::SourceError(err.to_string())
        } else {
            AudioStorageError::IoError(err.to_string())
        }
    }
}

/// 处理单个目录项
///
/// 失败只记录并计入 `errors`，不中断整轮清理
async fn sweep_entry(
    path: &Path,
    metadata: io::Result<std::fs::Metadata>,
    now: SystemTime,
    max_age: Duration,
    result: &mut GcResult,
) {
    let metadata = match metadata {
        Ok(m) => m,
        Err(e) => {
            tracing::error!(file = %path.display(), error = %e, "Failed to get file info");
            result.errors += 1;
            return;
        }
    };
    if !metadata.is_file() {
        return;
    }
    result.scanned += 1;

    let modified = match metadata.modified() {
        Ok(t) => t,
        Err(e) => {
            tracing::error!(file = %path.display(), error = %e, "Failed to read modification time");
            result.errors += 1;
            return;
        }
    };

    // 修改时间在未来时视为刚创建
    let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
    if age <= max_age {
        return;
    }

    match fs::remove_file(path).await {
        Ok(()) => {
            result.deleted_files += 1;
            result.freed_bytes += metadata.len();
            tracing::info!(file = %path.display(), age_secs = age.as_secs(), "Deleted old audio file");
        }
        Err(e) => {
            result.errors += 1;
            tracing::error!(file = %path.display(), error = %e, "Failed to delete old audio file");
        }
    }
}

#[async_trait]
impl AudioStoragePort for FileAudioStorage {
    fn get_audio_path(&self, id: AudioId) -> PathBuf {
        self.base_dir.join(id.file_name())
    }

    fn public_url(&self, id: AudioId) -> String {
        format!("{}/{}", self.url_prefix.trim_end_matches('/'), id.file_name())
    }

    async fn save_stream(
        &self,
        id: AudioId,
        stream: AudioStream,
    ) -> Result<AudioArtifact, AudioStorageError> {
        // 确保目录存在
        fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|e| AudioStorageError::IoError(e.to_string()))?;

        let audio_path = self.get_audio_path(id);

        // File::create 会截断同名文件，不做冲突保护
        let mut file = fs::File::create(&audio_path)
            .await
            .map_err(|e| AudioStorageError::IoError(e.to_string()))?;

        let mut reader = StreamReader::new(
            stream.map(|chunk| chunk.map_err(|e| io::Error::new(io::ErrorKind::Other, e))),
        );

        let written = match tokio::io::copy(&mut reader, &mut file).await {
            Ok(n) => file
                .flush()
                .await
                .map(|_| n)
                .map_err(|e| AudioStorageError::IoError(e.to_string())),
            Err(e) => Err(Self::classify_copy_error(e)),
        };

        let size_bytes = match written {
            Ok(n) => n,
            Err(e) => {
                // 半截文件不是有效制品
                drop(file);
                if let Err(remove_err) = fs::remove_file(&audio_path).await {
                    tracing::warn!(
                        path = %audio_path.display(),
                        error = %remove_err,
                        "Failed to remove partial audio file"
                    );
                }
                return Err(e);
            }
        };

        tracing::debug!(
            "Saved audio: id={}, path={}, size={} bytes",
            id,
            audio_path.display(),
            size_bytes
        );

        Ok(AudioArtifact {
            id,
            file_path: audio_path,
            size_bytes,
            created_at: Utc::now(),
        })
    }

    async fn read_audio(&self, id: AudioId) -> Result<Vec<u8>, AudioStorageError> {
        let audio_path = self.get_audio_path(id);

        if !audio_path.exists() {
            return Err(AudioStorageError::FileNotFound(
                audio_path.to_string_lossy().to_string(),
            ));
        }

        fs::read(&audio_path)
            .await
            .map_err(|e| AudioStorageError::IoError(e.to_string()))
    }

    async fn audio_exists(&self, id: AudioId) -> bool {
        self.get_audio_path(id).exists()
    }

    async fn purge_older_than(
        &self,
        now: SystemTime,
        max_age: Duration,
    ) -> Result<GcResult, AudioStorageError> {
        let mut result = GcResult::default();

        let mut entries = fs::read_dir(&self.base_dir)
            .await
            .map_err(|e| AudioStorageError::IoError(e.to_string()))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| AudioStorageError::IoError(e.to_string()))?
        {
            let metadata = entry.metadata().await;
            sweep_entry(&entry.path(), metadata, now, max_age, &mut result).await;
        }

        Ok(result)
    }
}
