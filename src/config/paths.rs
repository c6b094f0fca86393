//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout:
//!
//! Config dir (settings):
//!   Windows: %APPDATA%\warehouse-voice\
//!   macOS:   ~/Library/Application Support/warehouse-voice/
//!   Linux:   ~/.config/warehouse-voice/
//!
//! Data dir (speech models):
//!   Windows: %LOCALAPPDATA%\warehouse-voice\
//!   macOS:   ~/Library/Application Support/warehouse-voice/
//!   Linux:   ~/.local/share/warehouse-voice/
//!
//! The credential and inventory files are *not* resolved here; they come from
//! [`crate::config::DataConfig`] and default to the working directory.

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Directory for downloaded GGML model files.
    pub models_dir: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "warehouse-voice";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let settings_file = config_dir.join("settings.toml");
        let models_dir = data_dir.join("models");

        Self {
            config_dir,
            settings_file,
            models_dir,
        }
    }

    /// Full path of a GGML model identified by its file stem
    /// (e.g. `"ggml-base.en"` → `<models_dir>/ggml-base.en.bin`).
    pub fn model_file(&self, model: &str) -> PathBuf {
        self.models_dir.join(format!("{model}.bin"))
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_non_empty() {
        let paths = AppPaths::new();
        assert!(paths.config_dir.to_str().is_some_and(|s| !s.is_empty()));
        assert!(paths.models_dir.to_str().is_some_and(|s| !s.is_empty()));
        assert!(paths
            .settings_file
            .file_name()
            .is_some_and(|n| n == "settings.toml"));
    }

    #[test]
    fn model_file_appends_bin_extension() {
        let paths = AppPaths::new();
        let file = paths.model_file("ggml-base.en");
        assert!(file.starts_with(&paths.models_dir));
        assert!(file.file_name().is_some_and(|n| n == "ggml-base.en.bin"));
    }
}
