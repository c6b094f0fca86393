//! Local speech-to-text via Whisper.
//!
//! ```rust,no_run
//! use warehouse_voice::stt::{SttEngine, TranscribeParams, WhisperEngine};
//!
//! let engine = WhisperEngine::load("models/ggml-base.en.bin", TranscribeParams::default())
//!     .expect("model file present");
//! let audio = vec![0.0_f32; 16_000]; // 1 s, 16 kHz mono
//! println!("{}", engine.transcribe(&audio).unwrap());
//! ```

pub mod engine;
pub mod transcribe;

pub use engine::{
    MissingModelEngine, SttEngine, SttError, WhisperEngine, MAX_AUDIO_SAMPLES, MIN_AUDIO_SAMPLES,
};
pub use transcribe::TranscribeParams;

#[cfg(test)]
pub use engine::MockSttEngine;
