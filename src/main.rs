//! Application entry point: Warehouse Voice.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create [`tokio`] runtime (multi-thread, 2 workers).
//! 4. Build the recogniser selected in `speech.backend`.
//! 5. Create the speech channels (`request`, `reply`).
//! 6. Spawn the speech worker on the tokio runtime.
//! 7. Run [`eframe::run_native`]; blocks the main thread until the window
//!    is closed.

use std::sync::Arc;

use anyhow::Context as _;
use eframe::egui;
use tokio::sync::mpsc;
use warehouse_voice::{
    app::WarehouseApp,
    config::{AppConfig, AppPaths, SpeechBackend, SpeechConfig},
    desk::Desk,
    speech::{
        run_speech_worker, ApiRecognizer, ListenWindow, LocalRecognizer, MicListener,
        Recognizer, SpeechReply, SpeechRequest, VoiceInput,
    },
    stt::{MissingModelEngine, SttEngine, TranscribeParams, WhisperEngine},
};

// ---------------------------------------------------------------------------
// Recogniser selection
// ---------------------------------------------------------------------------

/// Build the configured recogniser.  A missing Whisper model does not stop
/// startup; every capture then reports the speech service as unavailable.
fn build_recognizer(config: &SpeechConfig) -> Arc<dyn Recognizer> {
    match config.backend {
        SpeechBackend::Api => {
            log::info!("speech backend: API at {}", config.api.base_url);
            Arc::new(ApiRecognizer::from_config(&config.api, &config.language))
        }
        SpeechBackend::Whisper => {
            let model_path = AppPaths::new().model_file(&config.model);
            let engine: Arc<dyn SttEngine> =
                match WhisperEngine::load(&model_path, TranscribeParams::from_config(config)) {
                    Ok(engine) => {
                        log::info!("Whisper model loaded: {}", model_path.display());
                        Arc::new(engine)
                    }
                    Err(e) => {
                        log::warn!(
                            "Could not load Whisper model ({}): {e}. Speech input is disabled.",
                            model_path.display()
                        );
                        Arc::new(MissingModelEngine::new(&model_path))
                    }
                };
            Arc::new(LocalRecognizer::new(engine))
        }
    }
}

// ---------------------------------------------------------------------------
// Native options builder
// ---------------------------------------------------------------------------

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let (width, height) = config.ui.window_size;
    let mut vp = egui::ViewportBuilder::default()
        .with_title("Warehouse Voice")
        .with_inner_size([width, height])
        .with_min_inner_size([480.0, 360.0]);

    if let Some((x, y)) = config.ui.window_position {
        vp = vp.with_position(egui::pos2(x, y));
    }

    eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Warehouse Voice starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });
    log::info!(
        "credentials: {}, inventory: {}",
        config.data.credentials_file.display(),
        config.data.inventory_file.display()
    );

    // 3. Tokio runtime (speech worker + blocking capture)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    // 4. Recogniser
    let voice = Arc::new(VoiceInput::new(
        Arc::new(MicListener),
        build_recognizer(&config.speech),
        ListenWindow::from_config(&config.speech),
    ));

    // 5. Channel setup
    let (request_tx, request_rx) = mpsc::channel::<SpeechRequest>(4);
    let (reply_tx, reply_rx) = mpsc::channel::<SpeechReply>(4);

    // 6. Speech worker
    rt.spawn(run_speech_worker(voice, request_rx, reply_tx));

    // 7. Window
    let desk = Desk::from_config(&config.data);
    let options = native_options(&config);
    let app = WarehouseApp::new(desk, request_tx, reply_rx, config);

    eframe::run_native(
        "Warehouse Voice",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("window failed: {e}"))
}
