//! Speech capture adapter: one bounded listen, one recognition, one outcome.
//!
//! # Architecture
//!
//! ```text
//! VoiceInput::capture_utterance(timeout)
//!     │
//!     ├─ spawn_blocking(AudioSource::listen)    MicListener → UtteranceGate
//!     │
//!     └─ Recognizer::recognize(audio)           LocalRecognizer | ApiRecognizer
//!             │
//!             ▼
//!       SpeechOutcome::{Recognized, Failed}
//! ```
//!
//! No failure is fatal.  [`SpeechOutcome::into_query_text`] turns any
//! failure into an empty string, which the query engine treats as "match
//! everything"; the desk flags that case to the user.

pub mod error;
pub mod listener;
pub mod recognizer;
pub mod wav;
pub mod worker;

use std::sync::Arc;
use std::time::Duration;

pub use error::{RecognitionError, RecognitionFailure};
pub use listener::{AudioSource, GateOutcome, ListenWindow, MicListener, UtteranceGate};
pub use recognizer::{ApiRecognizer, LocalRecognizer, Recognizer};
pub use worker::{run_speech_worker, SpeechReply, SpeechRequest};

// ---------------------------------------------------------------------------
// SpeechOutcome
// ---------------------------------------------------------------------------

/// Result of one capture attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SpeechOutcome {
    Recognized(String),
    Failed(RecognitionError),
}

impl SpeechOutcome {
    /// Text to use as the query: the transcript, or `""` on failure.
    pub fn into_query_text(self) -> String {
        match self {
            SpeechOutcome::Recognized(text) => text,
            SpeechOutcome::Failed(_) => String::new(),
        }
    }

    pub fn failure(&self) -> Option<RecognitionFailure> {
        match self {
            SpeechOutcome::Recognized(_) => None,
            SpeechOutcome::Failed(e) => Some(e.failure()),
        }
    }
}

// ---------------------------------------------------------------------------
// VoiceInput
// ---------------------------------------------------------------------------

/// Couples an [`AudioSource`] with a [`Recognizer`].
pub struct VoiceInput {
    source: Arc<dyn AudioSource>,
    recognizer: Arc<dyn Recognizer>,
    window: ListenWindow,
}

impl VoiceInput {
    pub fn new(
        source: Arc<dyn AudioSource>,
        recognizer: Arc<dyn Recognizer>,
        window: ListenWindow,
    ) -> Self {
        Self {
            source,
            recognizer,
            window,
        }
    }

    /// The configured listening bounds.
    pub fn window(&self) -> &ListenWindow {
        &self.window
    }

    /// Listen for up to `timeout` for speech to begin, then recognise it.
    pub async fn capture_utterance(&self, timeout: Duration) -> SpeechOutcome {
        let window = self.window.with_timeout(timeout);
        let source = Arc::clone(&self.source);

        let audio = match tokio::task::spawn_blocking(move || source.listen(&window)).await {
            Ok(Ok(audio)) => audio,
            Ok(Err(e)) => return Self::failed(e),
            Err(join) => return Self::failed(RecognitionError::Internal(join.to_string())),
        };

        match self.recognizer.recognize(audio).await {
            Ok(text) if text.trim().is_empty() => Self::failed(RecognitionError::EmptyTranscript),
            Ok(text) => {
                let text = text.trim().to_string();
                log::info!("{} recognised: {text:?}", self.recognizer.name());
                SpeechOutcome::Recognized(text)
            }
            Err(e) => Self::failed(e),
        }
    }

    fn failed(e: RecognitionError) -> SpeechOutcome {
        log::warn!("speech capture failed: {e}");
        SpeechOutcome::Failed(e)
    }
}

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------
