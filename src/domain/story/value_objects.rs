//! Story Context - Value Objects

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use super::StoryError;

/// 音频制品唯一标识（同时作为文件名）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AudioId(Uuid);

impl AudioId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// 磁盘上的文件名: `<uuid>.mp3`
    pub fn file_name(&self) -> String {
        format!("{}.mp3", self.0)
    }
}

impl Default for AudioId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AudioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 用户输入的原始文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInput(String);

impl UserInput {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 体裁标签
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genre(String);

impl Genre {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 经过校验的生成请求
///
/// 不变量:
/// - 两个字段都非空
/// - 两个字段都是合法 UTF-8
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryPrompt {
    user_input: UserInput,
    genre: Genre,
}

impl StoryPrompt {
    /// 从表单原始字节构建
    ///
    /// 先检查空值，再检查编码
    pub fn parse(user_input: &[u8], genre_input: &[u8]) -> Result<Self, StoryError> {
        if user_input.is_empty() {
            return Err(StoryError::MissingField("userInput"));
        }
        if genre_input.is_empty() {
            return Err(StoryError::MissingField("genreInput"));
        }

        let user_input = std::str::from_utf8(user_input)
            .map_err(|_| StoryError::InvalidEncoding("userInput"))?;
        let genre_input = std::str::from_utf8(genre_input)
            .map_err(|_| StoryError::InvalidEncoding("genreInput"))?;

        Ok(Self {
            user_input: UserInput(user_input.to_string()),
            genre: Genre(genre_input.to_string()),
        })
    }

    pub fn user_input(&self) -> &UserInput {
        &self.user_input
    }

    pub fn genre(&self) -> &Genre {
        &self.genre
    }
}

/// 文本生成服务返回的叙事文本
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narrative(String);

impl Narrative {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 已落盘的音频制品
///
/// 文件的修改时间是唯一的创建记录，保留期清理依赖它
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioArtifact {
    pub id: AudioId,
    /// 相对路径 `<audio_dir>/<id>.mp3`
    pub file_path: PathBuf,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
}
