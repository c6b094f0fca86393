//! Audio plumbing for speech queries: microphone → 16 kHz mono → VAD.
//!
//! ```text
//! Microphone → cpal callback → AudioChunk (mpsc) → into_mono_16k
//!            → VadDetector (per 30 ms frame)
//! ```

pub mod capture;
pub mod resample;
pub mod vad;

pub use capture::{AudioChunk, CaptureError, Microphone, StreamHandle};
pub use resample::{resample_to_16k, stereo_to_mono, TARGET_RATE};
pub use vad::{rms, VadDetector, FRAME_SAMPLES};
