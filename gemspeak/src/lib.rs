pub mod error;
pub mod generate;
pub mod tts;
pub mod utils;

pub use error::{GenerateError, InputError, OperationalError};
pub use generate::{GenerateRequest, GeneratedAudio, WavInfo, generate};
pub use tts::gemini::{GeminiConfig, GeminiTts};
pub use tts::synth::SpeechSynth;
pub use utils::wav::AudioFormat;
