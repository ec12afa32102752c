//! Application entry point — Pronunciation Coach.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Read the hosted-API credential from the environment (startup-fatal
//!    when absent — no evaluation cycle can complete without it).
//! 3. Load [`AppConfig`] from disk (returns default on first run).
//! 4. Create [`tokio`] runtime (multi-thread, 2 workers).
//! 5. Build the three adapters: microphone capture, hosted transcription,
//!    hosted feedback.
//! 6. Create the shared session state and the command channel.
//! 7. Spawn the session orchestrator on the tokio runtime.
//! 8. Run [`eframe::run_native`] — blocks the main thread until the window
//!    is closed.

use std::sync::Arc;

use tokio::sync::mpsc;

use pronounce_coach::{
    app::CoachApp,
    audio::{MicUtteranceSource, UtteranceSource},
    config::{ApiCredentials, AppConfig},
    feedback::{FeedbackModel, GeminiFeedback},
    session::{new_shared_state, SessionCommand, SessionOrchestrator},
    transcribe::{ApiTranscriber, Transcriber},
};

use eframe::egui;

// ---------------------------------------------------------------------------
// Native options builder
// ---------------------------------------------------------------------------

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let mut vp = egui::ViewportBuilder::default()
        .with_inner_size([560.0, 640.0])
        .with_min_inner_size([420.0, 360.0]);

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

fn main() -> eframe::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Pronunciation Coach starting up");

    // 2. Credential — both hosted services need it on every cycle.
    let credentials = ApiCredentials::from_env()
        .expect("GOOGLE_API_KEY must be set; the speech and feedback services cannot be reached without it");

    // 3. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 4. Tokio runtime (2 worker threads — capture + HTTP each take one)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to create tokio runtime");

    // 5. Adapters
    let capture: Arc<dyn UtteranceSource> =
        Arc::new(MicUtteranceSource::new(config.audio.clone()));
    let transcriber: Arc<dyn Transcriber> =
        Arc::new(ApiTranscriber::from_config(&config.speech, &credentials));
    let feedback: Arc<dyn FeedbackModel> =
        Arc::new(GeminiFeedback::from_config(&config.feedback, &credentials));

    log::info!(
        "adapters ready (speech model {}, feedback model {})",
        config.speech.model,
        config.feedback.model
    );

    // 6. Shared state + command channel
    let state = new_shared_state();
    let (command_tx, command_rx) = mpsc::channel::<SessionCommand>(16);

    // 7. Session orchestrator task
    let orchestrator =
        SessionOrchestrator::new(Arc::clone(&state), capture, transcriber, feedback);
    rt.spawn(orchestrator.run(command_rx));

    // 8. Build the egui app and run it (blocks until the window is closed)
    let app = CoachApp::new(command_tx, state);
    let options = native_options(&config);

    eframe::run_native(
        "Pronunciation Coach",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
}
