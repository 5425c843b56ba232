//! Retention Sweeper - Background Audio Cleanup

use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::application::ports::{AudioStorageError, AudioStoragePort, Clock, GcResult};

/// Sweeper 配置
#[derive(Debug, Clone)]
pub struct RetentionSweeperConfig {
    /// 两次清理之间的间隔
    pub interval: Duration,
    /// 文件保留时长，超过即删除
    pub max_age: Duration,
}

impl Default for RetentionSweeperConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3600), // 1 小时
            max_age: Duration::from_secs(3600),  // 1 小时
        }
    }
}

/// 保留期清理任务
///
/// 进程启动时 spawn 一次，随进程存活；与请求处理只共享音频目录
pub struct RetentionSweeper {
    config: RetentionSweeperConfig,
    audio_storage: Arc<dyn AudioStoragePort>,
    clock: Arc<dyn Clock>,
}

impl RetentionSweeper {
    pub fn new(
        config: RetentionSweeperConfig,
        audio_storage: Arc<dyn AudioStoragePort>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            audio_storage,
            clock,
        }
    }

    /// 启动 Sweeper
    ///
    /// 第一次清理发生在启动后一个间隔
    pub async fn run(self) {
        tracing::info!(
            interval_secs = self.config.interval.as_secs(),
            max_age_secs = self.config.max_age.as_secs(),
            "RetentionSweeper started"
        );

        let mut ticker = interval_at(Instant::now() + self.config.interval, self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            if let Err(e) = self.sweep_once().await {
                // 本轮放弃，下一轮照常
                tracing::error!(error = %e, "Failed to read audio directory");
            }
        }
    }

    /// 执行一轮清理
    pub async fn sweep_once(&self) -> Result<GcResult, AudioStorageError> {
        tracing::info!("Running audio file cleanup");

        let result = self
            .audio_storage
            .purge_older_than(self.clock.now(), self.config.max_age)
            .await?;

        tracing::info!(
            scanned = result.scanned,
            deleted_files = result.deleted_files,
            freed_bytes = result.freed_bytes,
            errors = result.errors,
            "Audio file cleanup finished"
        );

        Ok(result)
    }
}
