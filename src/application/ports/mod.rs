//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_storage;
mod clock;
mod speech_synthesizer;
mod text_generator;

pub use audio_storage::{AudioStorageError, AudioStoragePort, GcResult};
pub use clock::{Clock, SystemClock};
pub use speech_synthesizer::{AudioStream, SpeechSynthesizerPort, TtsError};
pub use text_generator::{TextGenError, TextGeneratorPort};
