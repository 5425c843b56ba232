//! Story Context - 故事生成上下文
//!
//! 用户输入 + 体裁 -> 第一人称叙事 -> 音频制品

mod errors;
mod prompt;
mod value_objects;

pub use errors::StoryError;
pub use prompt::narrator_instruction;
pub use value_objects::{AudioArtifact, AudioId, Genre, Narrative, StoryPrompt, UserInput};
