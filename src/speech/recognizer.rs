//! Recognisers: captured audio in, query text out.
//!
//! * [`LocalRecognizer`] runs an [`SttEngine`] on the blocking pool.
//! * [`ApiRecognizer`] uploads a WAV to any OpenAI-compatible
//!   `/v1/audio/transcriptions` endpoint.  All connection details come from
//!   [`SpeechApiConfig`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::audio::TARGET_RATE;
use crate::config::SpeechApiConfig;
use crate::stt::SttEngine;

use super::error::RecognitionError;
use super::wav::encode_wav;

/// Turns 16 kHz mono audio into text.
///
/// An `Ok` result may still be blank; the adapter treats that as
/// not-understood.
#[async_trait]
pub trait Recognizer: Send + Sync {
    async fn recognize(&self, audio: Vec<f32>) -> Result<String, RecognitionError>;

    /// Short backend name for logs.
    fn name(&self) -> &'static str;
}

// ---------------------------------------------------------------------------
// LocalRecognizer
// ---------------------------------------------------------------------------

pub struct LocalRecognizer {
    engine: Arc<dyn SttEngine>,
}

impl LocalRecognizer {
    pub fn new(engine: Arc<dyn SttEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Recognizer for LocalRecognizer {
    async fn recognize(&self, audio: Vec<f32>) -> Result<String, RecognitionError> {
        let engine = Arc::clone(&self.engine);
        let text = tokio::task::spawn_blocking(move || engine.transcribe(&audio))
            .await
            .map_err(|e| RecognitionError::Internal(e.to_string()))??;
        Ok(text)
    }

    fn name(&self) -> &'static str {
        "whisper"
    }
}

// ---------------------------------------------------------------------------
// ApiRecognizer
// ---------------------------------------------------------------------------

/// Client with the configured timeout.  A builder failure falls back to the
/// default client, which has no timeout.
fn build_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_else(|e| {
            log::warn!("HTTP client with {timeout_secs}s timeout unavailable ({e}); using defaults");
            reqwest::Client::new()
        })
}

pub struct ApiRecognizer {
    client: reqwest::Client,
    config: SpeechApiConfig,
    language: String,
}

impl ApiRecognizer {
    /// The HTTP client carries the per-request timeout from `config`.
    pub fn from_config(config: &SpeechApiConfig, language: &str) -> Self {
        Self {
            client: build_client(config.timeout_secs),
            config: config.clone(),
            language: language.to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/audio/transcriptions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl Recognizer for ApiRecognizer {
    async fn recognize(&self, audio: Vec<f32>) -> Result<String, RecognitionError> {
        let wav = encode_wav(&audio, TARGET_RATE);
        let file = reqwest::multipart::Part::bytes(wav)
            .file_name("utterance.wav")
            .mime_str("audio/wav")?;

        let mut form = reqwest::multipart::Form::new()
            .text("model", self.config.model.clone())
            .text("response_format", "json")
            .part("file", file);
        if self.language != "auto" {
            form = form.text("language", self.language.clone());
        }

        let mut req = self.client.post(self.endpoint()).multipart(form);
        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RecognitionError::ServiceUnreachable(format!(
                "{} answered HTTP {status}",
                self.endpoint()
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RecognitionError::ServiceUnreachable(format!("bad response: {e}")))?;

        Ok(json["text"].as_str().unwrap_or_default().trim().to_string())
    }

    fn name(&self) -> &'static str {
        "api"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
