//! Story Commands

/// 创建故事命令
///
/// 字段保留表单解码后的原始字节，编码校验交给领域层
#[derive(Debug, Clone)]
pub struct CreateStory {
    pub user_input: Vec<u8>,
    pub genre_input: Vec<u8>,
}

impl CreateStory {
    pub fn new(user_input: impl Into<Vec<u8>>, genre_input: impl Into<Vec<u8>>) -> Self {
        Self {
            user_input: user_input.into(),
            genre_input: genre_input.into(),
        }
    }
}
