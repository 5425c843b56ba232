//! Generator Adapter - 文本生成客户端实现

mod deepseek_client;
mod fake_text_generator;

pub use deepseek_client::{DeepSeekClient, DeepSeekClientConfig};
pub use fake_text_generator::FakeTextGenerator;
