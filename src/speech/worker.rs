//! Background task that serves "Speak" presses from the UI.
//!
//! Requests are handled one at a time, in order; the UI only sends a new one
//! after the previous reply has arrived.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::query::QueryTarget;

use super::{SpeechOutcome, VoiceInput};

/// Sent by the UI when a panel's "Speak" button is pressed.
#[derive(Debug, Clone)]
pub struct SpeechRequest {
    pub target: QueryTarget,
    pub timeout: Duration,
}

/// Sent back to the UI once the capture has finished.
#[derive(Debug, Clone)]
pub struct SpeechReply {
    pub target: QueryTarget,
    pub outcome: SpeechOutcome,
}

/// Serve requests until either channel closes.
pub async fn run_speech_worker(
    voice: Arc<VoiceInput>,
    mut requests: mpsc::Receiver<SpeechRequest>,
    replies: mpsc::Sender<SpeechReply>,
) {
    while let Some(SpeechRequest { target, timeout }) = requests.recv().await {
        log::debug!("speech request for {target:?}");
        let outcome = voice.capture_utterance(timeout).await;
        if replies.send(SpeechReply { target, outcome }).await.is_err() {
            break;
        }
    }
    log::debug!("speech worker stopped");
}
