//! Bounded listening: wait for speech, record until the speaker pauses.
//!
//! [`UtteranceGate`] is the endpointing logic and works on plain sample
//! slices, so it is testable without a microphone.  [`MicListener`] feeds it
//! from the default input device.
//!
//! ```text
//!   Waiting ──voice frame──▶ Speaking ──pause or phrase limit──▶ Utterance
//!      │
//!      └──timeout without voice──▶ NoSpeech
//! ```

use std::collections::VecDeque;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use crate::audio::{Microphone, VadDetector, TARGET_RATE};
use crate::config::SpeechConfig;

use super::error::RecognitionError;

/// Audio kept from just before speech onset, so the first syllable is not
/// clipped.
const PREROLL: Duration = Duration::from_millis(300);

/// Bounds of one listening attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct ListenWindow {
    /// How long to wait for speech to start.
    pub timeout: Duration,
    /// Trailing silence that ends the utterance.
    pub pause: Duration,
    /// Longest utterance accepted.
    pub phrase_limit: Duration,
    /// RMS threshold handed to the VAD.
    pub vad_threshold: f32,
}

impl ListenWindow {
    pub fn from_config(config: &SpeechConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.listen_timeout_secs),
            pause: Duration::from_millis(config.phrase_pause_ms),
            phrase_limit: Duration::from_secs(config.phrase_limit_secs),
            vad_threshold: config.vad_threshold,
        }
    }

    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            timeout,
            ..self.clone()
        }
    }
}

impl Default for ListenWindow {
    fn default() -> Self {
        Self::from_config(&SpeechConfig::default())
    }
}

fn samples_in(d: Duration) -> usize {
    (d.as_nanos() * TARGET_RATE as u128 / 1_000_000_000) as usize
}

// ---------------------------------------------------------------------------
// UtteranceGate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum GateOutcome {
    /// 16 kHz mono samples from just before onset to the end of the pause.
    Utterance(Vec<f32>),
    NoSpeech,
}

/// Frame-by-frame speech endpointer over 16 kHz mono audio.
#[derive(Debug)]
pub struct UtteranceGate {
    vad: VadDetector,
    timeout: usize,
    pause: usize,
    phrase_limit: usize,
    preroll: usize,
    carry: Vec<f32>,
    /// Before onset: a sliding pre-roll.  After onset: the utterance so far.
    audio: VecDeque<f32>,
    waited: usize,
    speaking: bool,
    spoken: usize,
    silence_run: usize,
}

impl UtteranceGate {
    pub fn new(window: &ListenWindow) -> Self {
        Self {
            vad: VadDetector::new(window.vad_threshold),
            timeout: samples_in(window.timeout),
            pause: samples_in(window.pause),
            phrase_limit: samples_in(window.phrase_limit),
            preroll: samples_in(PREROLL),
            carry: Vec::new(),
            audio: VecDeque::new(),
            waited: 0,
            speaking: false,
            spoken: 0,
            silence_run: 0,
        }
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking
    }

    /// Feed more audio.  Returns `Some` once the attempt is decided; the
    /// gate must not be fed after that.
    pub fn push(&mut self, samples: &[f32]) -> Option<GateOutcome> {
        self.carry.extend_from_slice(samples);
        let frame_size = self.vad.frame_size();

        let mut consumed = 0;
        let mut outcome = None;
        while self.carry.len() - consumed >= frame_size {
            let frame = &self.carry[consumed..consumed + frame_size];
            consumed += frame_size;
            let voiced = self.vad.is_voice(frame);
            self.audio.extend(frame.iter().copied());

            if !self.speaking {
                self.waited += frame_size;
                if voiced {
                    self.speaking = true;
                    self.spoken = frame_size;
                } else if self.waited >= self.timeout {
                    outcome = Some(GateOutcome::NoSpeech);
                    break;
                } else {
                    while self.audio.len() > self.preroll {
                        self.audio.pop_front();
                    }
                }
                continue;
            }

            self.spoken += frame_size;
            self.silence_run = if voiced { 0 } else { self.silence_run + frame_size };
            if self.silence_run >= self.pause || self.spoken >= self.phrase_limit {
                outcome = Some(GateOutcome::Utterance(self.audio.drain(..).collect()));
                break;
            }
        }
        self.carry.drain(..consumed);
        outcome
    }

    /// Decide with whatever has been heard so far (stream ended early).
    pub fn finish(mut self) -> GateOutcome {
        if self.speaking {
            self.audio.extend(self.carry.drain(..));
            GateOutcome::Utterance(self.audio.into_iter().collect())
        } else {
            GateOutcome::NoSpeech
        }
    }
}

// ---------------------------------------------------------------------------
// AudioSource
// ---------------------------------------------------------------------------

/// Something that can record one utterance, blocking the calling thread.
pub trait AudioSource: Send + Sync {
    fn listen(&self, window: &ListenWindow) -> Result<Vec<f32>, RecognitionError>;
}

/// [`AudioSource`] backed by the system default microphone.
#[derive(Debug, Default, Clone, Copy)]
pub struct MicListener;

impl AudioSource for MicListener {
    fn listen(&self, window: &ListenWindow) -> Result<Vec<f32>, RecognitionError> {
        let mic = Microphone::open_default()?;
        let (tx, rx) = mpsc::channel();
        let _stream = mic.start(tx)?;
        log::info!(
            "listening for up to {}s ({} Hz, {} ch)",
            window.timeout.as_secs(),
            mic.sample_rate(),
            mic.channels()
        );

        let started = Instant::now();
        let deadline = started + window.timeout + window.phrase_limit + Duration::from_secs(1);
        let mut gate = UtteranceGate::new(window);

        let outcome = loop {
            if !gate.is_speaking() && started.elapsed() >= window.timeout {
                break GateOutcome::NoSpeech;
            }
            let now = Instant::now();
            if now >= deadline {
                break gate.finish();
            }
            let wait = (deadline - now).min(Duration::from_millis(100));
            match rx.recv_timeout(wait) {
                Ok(chunk) => {
                    if let Some(outcome) = gate.push(&chunk.into_mono_16k()) {
                        break outcome;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break gate.finish(),
            }
        };

        match outcome {
            GateOutcome::Utterance(audio) => {
                log::info!(
                    "captured {:.2}s utterance",
                    audio.len() as f32 / TARGET_RATE as f32
                );
                Ok(audio)
            }
            GateOutcome::NoSpeech => Err(RecognitionError::NoSpeech {
                waited_secs: window.timeout.as_secs(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
