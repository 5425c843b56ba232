//! 叙事改写指令

use super::Genre;

/// 构建发给文本生成服务的 system 指令
///
/// 约定: 女性叙述者以第一人称转述男性说给她的话，她从不回应；
/// 按体裁润色；篇幅简短但意思完整
pub fn narrator_instruction(genre: &Genre) -> String {
    format!(
        "You take my input and return it as if a novelist wrote it and from a first person \
         perspective of a female being told the prompt by a male but the female never responds \
         (excluding any roleplay dialogue and including the input) for this genre: {} . \
         Please keep the responses short, but getting the point across",
        genre
    )
}
