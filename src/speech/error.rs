//! Why a speech capture produced no query text.

use thiserror::Error;

use crate::audio::CaptureError;
use crate::stt::SttError;

/// The two kinds of failure the user is told about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecognitionFailure {
    /// Audio was captured (or awaited) but yielded no usable words.
    NotUnderstood,
    /// The microphone, model or remote service could not be used at all.
    ServiceUnavailable,
}

impl RecognitionFailure {
    /// User-facing explanation.
    pub fn message(&self) -> &'static str {
        match self {
            RecognitionFailure::NotUnderstood => {
                "Could not understand the speech. Please try again."
            }
            RecognitionFailure::ServiceUnavailable => {
                "Speech service is unavailable. Check the microphone, speech model or internet connection."
            }
        }
    }
}

/// Detailed cause of a failed capture.  Every variant is recoverable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecognitionError {
    #[error("no speech detected within {waited_secs} s")]
    NoSpeech { waited_secs: u64 },

    #[error("recogniser returned no text")]
    EmptyTranscript,

    #[error("captured audio is unusable: {0}")]
    UnusableAudio(String),

    #[error("microphone unavailable: {0}")]
    MicrophoneUnavailable(String),

    #[error("speech engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("speech service unreachable: {0}")]
    ServiceUnreachable(String),

    #[error("speech worker failed: {0}")]
    Internal(String),
}

impl RecognitionError {
    pub fn failure(&self) -> RecognitionFailure {
        match self {
            RecognitionError::NoSpeech { .. }
            | RecognitionError::EmptyTranscript
            | RecognitionError::UnusableAudio(_) => RecognitionFailure::NotUnderstood,
            RecognitionError::MicrophoneUnavailable(_)
            | RecognitionError::EngineUnavailable(_)
            | RecognitionError::ServiceUnreachable(_)
            | RecognitionError::Internal(_) => RecognitionFailure::ServiceUnavailable,
        }
    }
}

impl From<SttError> for RecognitionError {
    fn from(e: SttError) -> Self {
        match e {
            SttError::AudioTooShort | SttError::AudioTooLong => {
                RecognitionError::UnusableAudio(e.to_string())
            }
            SttError::ModelNotFound(_) | SttError::ContextInit(_) | SttError::Transcription(_) => {
                RecognitionError::EngineUnavailable(e.to_string())
            }
        }
    }
}

impl From<CaptureError> for RecognitionError {
    fn from(e: CaptureError) -> Self {
        RecognitionError::MicrophoneUnavailable(e.to_string())
    }
}

impl From<reqwest::Error> for RecognitionError {
    fn from(e: reqwest::Error) -> Self {
        RecognitionError::ServiceUnreachable(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_understood_kinds() {
        for e in [
            RecognitionError::NoSpeech { waited_secs: 5 },
            RecognitionError::EmptyTranscript,
            RecognitionError::UnusableAudio("short".into()),
        ] {
            assert_eq!(e.failure(), RecognitionFailure::NotUnderstood, "{e}");
        }
    }

    #[test]
    fn service_unavailable_kinds() {
        for e in [
            RecognitionError::MicrophoneUnavailable("none".into()),
            RecognitionError::EngineUnavailable("no model".into()),
            RecognitionError::ServiceUnreachable("refused".into()),
            RecognitionError::Internal("panic".into()),
        ] {
            assert_eq!(e.failure(), RecognitionFailure::ServiceUnavailable, "{e}");
        }
    }

    #[test]
    fn stt_errors_are_classified() {
        assert_eq!(
            RecognitionError::from(SttError::AudioTooShort).failure(),
            RecognitionFailure::NotUnderstood
        );
        assert_eq!(
            RecognitionError::from(SttError::ModelNotFound("/m.bin".into())).failure(),
            RecognitionFailure::ServiceUnavailable
        );
    }

    #[test]
    fn messages_are_distinct() {
        assert_ne!(
            RecognitionFailure::NotUnderstood.message(),
            RecognitionFailure::ServiceUnavailable.message()
        );
    }

    #[test]
    fn no_speech_display_mentions_wait() {
        let e = RecognitionError::NoSpeech { waited_secs: 5 };
        assert_eq!(e.to_string(), "no speech detected within 5 s");
    }
}
