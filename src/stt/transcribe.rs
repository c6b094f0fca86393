//! Whisper decoding parameters.

use crate::config::SpeechConfig;

/// Parameters for one Whisper inference run.
#[derive(Debug, Clone)]
pub struct TranscribeParams {
    /// ISO-639-1 code, or `"auto"` for Whisper's language detection.
    pub language: String,
    /// Greedy decoding candidates.
    pub best_of: i32,
    /// CPU threads handed to Whisper, capped at 8.
    pub n_threads: i32,
    /// Keep Whisper's progress output off stderr.
    pub suppress_progress: bool,
}

impl Default for TranscribeParams {
    fn default() -> Self {
        Self {
            language: "en".into(),
            best_of: 1,
            n_threads: optimal_threads(),
            suppress_progress: true,
        }
    }
}

impl TranscribeParams {
    pub fn from_config(config: &SpeechConfig) -> Self {
        Self {
            language: config.language.clone(),
            ..Self::default()
        }
    }

    /// Language hint for Whisper; `None` means auto-detect.
    pub fn language_hint(&self) -> Option<&str> {
        if self.language == "auto" {
            None
        } else {
            Some(self.language.as_str())
        }
    }
}

pub(crate) fn optimal_threads() -> i32 {
    std::thread::available_parallelism()
        .map(|n| n.get().min(8) as i32)
        .unwrap_or(4)
}
