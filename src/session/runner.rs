//! Session orchestrator — drives the full capture → transcribe → feedback
//! cycle.
//!
//! [`SessionOrchestrator`] owns the [`SharedState`] and responds to
//! [`SessionCommand`]s received over a `tokio::sync::mpsc` channel.
//!
//! # Cycle flow
//!
//! ```text
//! SessionCommand::Submit { target }
//!   ├─ empty target → validation notice, nothing else runs
//!   └─ begin_submit (consumes retry flag) → Listening
//!         ├─ spawn_blocking(capture.capture_utterance)
//!         ├─ transcriber.transcribe (async)          → TranscriptReady
//!         │     └─ failure → CaptureFailed, feedback never called
//!         └─ feedback.generate (async, exactly once) → FeedbackReady
//!               └─ failure → FeedbackFailed
//!
//! SessionCommand::Retry
//!   └─ request_retry (flag up, transcript dropped), then a fresh cycle
//!      with the retained target sentence
//! ```
//!
//! Nothing is retried automatically; every recovery path is an explicit
//! user action.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::audio::{ListenError, UtteranceSource};
use crate::feedback::{compose_feedback_prompt, FeedbackModel, ASSESSMENT_INSTRUCTION};
use crate::session::state::{Notice, SharedState};
use crate::transcribe::{TranscribeError, Transcriber};

// ---------------------------------------------------------------------------
// SessionCommand
// ---------------------------------------------------------------------------

/// Commands sent from the UI to the session orchestrator.
#[derive(Debug, Clone)]
pub enum SessionCommand {
    /// Evaluate the given target sentence ("Start Speaking").
    Submit { target: String },
    /// Discard the last transcript and evaluate the retained sentence again
    /// ("Try Again").
    Retry,
}

// ---------------------------------------------------------------------------
// SessionError
// ---------------------------------------------------------------------------

/// User-facing failures of one evaluation cycle.
///
/// The `Display` strings are shown verbatim in the UI banner.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The target sentence was empty; nothing ran.
    #[error("Please enter the correct sentence first.")]
    EmptyTarget,

    /// Audio was captured (or waited for) but produced no decodable speech.
    #[error("Sorry, I could not understand the audio.")]
    UnrecognizedSpeech,

    /// The capture device or the recognition service failed.
    #[error("Could not request results; {0}")]
    Transcription(String),

    /// The feedback service call failed.
    #[error("Feedback request failed: {0}")]
    Feedback(String),

    /// Internal / unexpected error (e.g. tokio join failure).
    #[error("Internal error: {0}")]
    Internal(String),
}

// ---------------------------------------------------------------------------
// SessionOrchestrator
// ---------------------------------------------------------------------------

/// Sequences the three adapters for one interactive session.
///
/// Create with [`SessionOrchestrator::new`], then call [`run`](Self::run)
/// inside a tokio task.  Commands are processed strictly one at a time, so
/// capture happens at most once per submission and the microphone is never
/// shared.
pub struct SessionOrchestrator {
    state: SharedState,
    capture: Arc<dyn UtteranceSource>,
    transcriber: Arc<dyn Transcriber>,
    feedback: Arc<dyn FeedbackModel>,
}

impl SessionOrchestrator {
    /// Create a new orchestrator.
    ///
    /// # Arguments
    ///
    /// * `state`       — shared session state (also read by the UI).
    /// * `capture`     — blocking utterance source (e.g. `MicUtteranceSource`).
    /// * `transcriber` — hosted speech recognition (e.g. `ApiTranscriber`).
    /// * `feedback`    — hosted feedback generation (e.g. `GeminiFeedback`).
    pub fn new(
        state: SharedState,
        capture: Arc<dyn UtteranceSource>,
        transcriber: Arc<dyn Transcriber>,
        feedback: Arc<dyn FeedbackModel>,
    ) -> Self {
        Self {
            state,
            capture,
            transcriber,
            feedback,
        }
    }

    // -----------------------------------------------------------------------
    // Main async loop
    // -----------------------------------------------------------------------

    /// Run the orchestrator until `command_rx` is closed.
    ///
    /// This is an `async fn` and should be spawned as a tokio task from
    /// `main()`.  It never returns while the channel is open.
    pub async fn run(mut self, mut command_rx: mpsc::Receiver<SessionCommand>) {
        while let Some(command) = command_rx.recv().await {
            match command {
                SessionCommand::Submit { target } => {
                    self.evaluate(target).await;
                }
                SessionCommand::Retry => {
                    // Raise the retry flag and drop the transcript, then the
                    // same user action drives a fresh cycle with the
                    // retained target sentence.
                    let target = {
                        let mut st = self.state.lock().unwrap();
                        st.request_retry();
                        st.target_sentence.clone()
                    };
                    self.evaluate(target).await;
                }
            }
        }

        log::info!("session: command channel closed, orchestrator shutting down");
    }

    // -----------------------------------------------------------------------
    // One evaluation cycle (the submit operation)
    // -----------------------------------------------------------------------

    async fn evaluate(&mut self, target: String) {
        // ── 1. Validation — blocks the cycle before any adapter runs ─────
        let accepted = self.state.lock().unwrap().begin_submit(&target);
        if !accepted {
            log::debug!("session: empty target sentence rejected");
            self.set_notice(Notice::error(SessionError::EmptyTarget.to_string()));
            return;
        }

        // ── 2. Capture + transcription ───────────────────────────────────
        self.set_notice(Notice::info("Listening... Please speak now."));

        let transcript = match self.capture_utterance().await {
            Ok(text) => text,
            Err(err) => {
                log::warn!("session: capture failed: {err}");
                let mut st = self.state.lock().unwrap();
                st.capture_failed();
                st.notice = Some(Notice::warning(err.to_string()));
                return;
            }
        };

        {
            let mut st = self.state.lock().unwrap();
            st.transcript_captured(transcript.clone());
            st.notice = Some(Notice::info(format!("Recognized: {transcript}")));
        }

        // ── 3. Feedback (only with a transcript and a target in hand) ────
        if !self.state.lock().unwrap().can_request_feedback() {
            log::error!("session: feedback invariant violated, skipping request");
            return;
        }

        match self.request_feedback(&transcript, &target).await {
            Ok(text) => {
                let mut st = self.state.lock().unwrap();
                st.feedback_ready(text);
            }
            Err(err) => {
                log::warn!("session: feedback failed: {err}");
                let mut st = self.state.lock().unwrap();
                st.feedback_failed();
                st.notice = Some(Notice::error(err.to_string()));
            }
        }
    }

    /// Capture one utterance and transcribe it.
    ///
    /// The blocking microphone work runs on the blocking thread pool; the
    /// transcription call is awaited.  Returns the recognized text exactly
    /// as the adapter produced it.
    async fn capture_utterance(&self) -> Result<String, SessionError> {
        let capture = Arc::clone(&self.capture);

        let captured = tokio::task::spawn_blocking(move || capture.capture_utterance())
            .await
            .map_err(|e| SessionError::Internal(e.to_string()))?;

        let utterance = match captured {
            Ok(utterance) => utterance,
            Err(ListenError::NoSpeech) => return Err(SessionError::UnrecognizedSpeech),
            Err(err) => return Err(SessionError::Transcription(err.to_string())),
        };

        match self.transcriber.transcribe(&utterance.samples).await {
            Ok(text) => Ok(text),
            Err(TranscribeError::Unrecognized) => Err(SessionError::UnrecognizedSpeech),
            Err(TranscribeError::Service(detail)) => Err(SessionError::Transcription(detail)),
        }
    }

    /// Issue exactly one feedback request for `(spoken, expected)` and
    /// return the reply verbatim.  No caching — identical inputs trigger
    /// independent calls.
    async fn request_feedback(
        &self,
        spoken: &str,
        expected: &str,
    ) -> Result<String, SessionError> {
        let prompt = compose_feedback_prompt(ASSESSMENT_INSTRUCTION, spoken, expected);
        self.feedback
            .generate(&prompt)
            .await
            .map_err(|e| SessionError::Feedback(e.to_string()))
    }

    fn set_notice(&self, notice: Notice) {
        self.state.lock().unwrap().notice = Some(notice);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
