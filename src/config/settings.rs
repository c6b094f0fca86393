//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files.  Every section is
//! `#[serde(default)]`, so a hand-written `settings.toml` only needs the keys
//! it wants to override.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// DataConfig
// ---------------------------------------------------------------------------

/// Locations of the two read-only tabular files.
///
/// Relative paths are resolved against the process working directory, which
/// matches how the tool is usually launched from the folder holding the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// CSV with the columns `username,password,role`.
    pub credentials_file: PathBuf,
    /// CSV with (at least) `Stock Name,Location,Quantity,Replenishment Date`.
    pub inventory_file: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            credentials_file: PathBuf::from("users.csv"),
            inventory_file: PathBuf::from("inventory.csv"),
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechBackend
// ---------------------------------------------------------------------------

/// Selects which recogniser turns captured audio into query text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpeechBackend {
    /// Local GGML Whisper model via `whisper-rs`.  No network needed.
    Whisper,
    /// Any OpenAI-compatible `/v1/audio/transcriptions` endpoint.
    Api,
}

impl Default for SpeechBackend {
    fn default() -> Self {
        Self::Whisper
    }
}

// ---------------------------------------------------------------------------
// SpeechApiConfig
// ---------------------------------------------------------------------------

/// Connection settings for [`SpeechBackend::Api`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechApiConfig {
    /// Base URL of the API, without the `/v1/...` suffix.
    pub base_url: String,
    /// Bearer token; `None` for local servers that need no authentication.
    pub api_key: Option<String>,
    /// Model identifier sent with the upload (e.g. `"whisper-1"`).
    pub model: String,
    /// Seconds to wait for the transcription response.
    pub timeout_secs: u64,
}

impl Default for SpeechApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".into(),
            api_key: None,
            model: "whisper-1".into(),
            timeout_secs: 15,
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechConfig
// ---------------------------------------------------------------------------

/// Settings for the speech capture adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Which recogniser to use.
    pub backend: SpeechBackend,
    /// ISO-639-1 language code, or `"auto"`.
    pub language: String,
    /// GGML model file stem under the models directory (Whisper backend).
    pub model: String,
    /// Seconds to wait for speech to start before the capture fails.
    pub listen_timeout_secs: u64,
    /// Trailing silence (ms) that ends an utterance once speech has started.
    pub phrase_pause_ms: u64,
    /// Hard cap on a single utterance, in seconds.
    pub phrase_limit_secs: u64,
    /// RMS level above which a 30 ms frame counts as speech.
    pub vad_threshold: f32,
    /// Remote endpoint settings (Api backend).
    pub api: SpeechApiConfig,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            backend: SpeechBackend::default(),
            language: "en".into(),
            model: "ggml-base.en".into(),
            listen_timeout_secs: 5,
            phrase_pause_ms: 800,
            phrase_limit_secs: 15,
            vad_threshold: 0.02,
            api: SpeechApiConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// Window appearance settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Initial inner size of the window in logical pixels.
    pub window_size: (f32, f32),
    /// Last window position `(x, y)`; `None` lets the window manager decide.
    pub window_position: Option<(f32, f32)>,
    /// Render the full inventory grid above the query panels.
    pub show_inventory_table: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            window_size: (760.0, 860.0),
            window_position: None,
            show_inventory_table: true,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// ```rust,no_run
/// use warehouse_voice::config::AppConfig;
///
/// // Returns Default when the file is missing.
/// let config = AppConfig::load().unwrap();
/// println!("{}", config.data.inventory_file.display());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Credential and inventory file locations.
    pub data: DataConfig,
    /// Speech capture and recognition settings.
    pub speech: SpeechConfig,
    /// Window settings.
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");
        assert_eq!(original, loaded);
    }

    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.data.credentials_file, PathBuf::from("users.csv"));
        assert_eq!(cfg.data.inventory_file, PathBuf::from("inventory.csv"));
        assert_eq!(cfg.speech.backend, SpeechBackend::Whisper);
        assert_eq!(cfg.speech.listen_timeout_secs, 5);
        assert_eq!(cfg.speech.language, "en");
        assert!(cfg.speech.api.api_key.is_none());
        assert!(cfg.ui.show_inventory_table);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("partial.toml");
        std::fs::write(
            &path,
            "[data]\ninventory_file = \"/srv/stock/fish.csv\"\n\n[speech]\nbackend = \"Api\"\n",
        )
        .expect("write");

        let cfg = AppConfig::load_from(&path).expect("load");
        assert_eq!(cfg.data.inventory_file, PathBuf::from("/srv/stock/fish.csv"));
        assert_eq!(cfg.data.credentials_file, PathBuf::from("users.csv"));
        assert_eq!(cfg.speech.backend, SpeechBackend::Api);
        assert_eq!(cfg.speech.listen_timeout_secs, 5);
        assert_eq!(cfg.speech.api.model, "whisper-1");
    }

    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.speech.backend = SpeechBackend::Api;
        cfg.speech.api.api_key = Some("sk-test".into());
        cfg.speech.listen_timeout_secs = 8;
        cfg.ui.window_position = Some((100.0, 200.0));

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.speech.backend, SpeechBackend::Api);
        assert_eq!(loaded.speech.api.api_key, Some("sk-test".into()));
        assert_eq!(loaded.speech.listen_timeout_secs, 8);
        assert_eq!(loaded.ui.window_position, Some((100.0, 200.0)));
    }
}
