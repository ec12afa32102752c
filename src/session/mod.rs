//! Session orchestration for Pronunciation Coach.
//!
//! This module wires the full capture → transcription → feedback cycle and
//! exposes the shared state that the UI reads every frame.
//!
//! # Architecture
//!
//! ```text
//! SessionCommand (mpsc)
//!        │
//!        ▼
//! SessionOrchestrator::run()  ← async tokio task
//!        │
//!        ├─ Submit { target } → validate → spawn_blocking(capture)
//!        │       → transcribe → feedback → SessionState updated per step
//!        │
//!        └─ Retry → request_retry(), then a fresh cycle with the
//!                   retained target sentence
//!
//! SharedState (Arc<Mutex<SessionState>>) ←─── read by egui update() each frame
//! ```

pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::{SessionCommand, SessionError, SessionOrchestrator};
pub use state::{
    new_shared_state, Notice, NoticeLevel, SessionPhase, SessionState, SharedState,
};
