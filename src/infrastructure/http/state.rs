//! Application State
//!
//! 请求之间不共享可变状态，这里只持有构造好的 handler

use std::sync::Arc;
use std::time::Duration;

use crate::application::{
    AudioStoragePort, CreateStoryHandler, SpeechSynthesizerPort, TextGeneratorPort,
};

/// 应用状态
pub struct AppState {
    pub create_story_handler: CreateStoryHandler,
    /// 保留时长，用于片段中的提示；未启用清理时为 None
    pub retention_notice: Option<Duration>,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        generator: Arc<dyn TextGeneratorPort>,
        synthesizer: Arc<dyn SpeechSynthesizerPort>,
        audio_storage: Arc<dyn AudioStoragePort>,
        retention_notice: Option<Duration>,
    ) -> Self {
        Self {
            create_story_handler: CreateStoryHandler::new(generator, synthesizer, audio_storage),
            retention_notice,
        }
    }
}
