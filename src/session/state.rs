//! Session state machine and shared application state.
//!
//! [`SessionState`] is an explicit value object holding everything one
//! evaluation session owns — the retry flag, the last transcript, the
//! retained target sentence, the feedback text and the current
//! [`SessionPhase`] — mutated only through named entry-point methods so the
//! state machine is testable in isolation.
//!
//! [`SharedState`] is a type alias for `Arc<Mutex<SessionState>>` — cheap to
//! clone and safe to share between the orchestrator task and the UI.

use std::sync::{Arc, Mutex};

// ---------------------------------------------------------------------------
// SessionPhase
// ---------------------------------------------------------------------------

/// Phases of one evaluation session.
///
/// ```text
/// Idle ──submit──▶ Listening
///                  ──transcription ok──▶ TranscriptReady
///                                        ──feedback ok───▶ FeedbackReady
///                                        ──feedback err──▶ FeedbackFailed
///                  ──capture err──▶ CaptureFailed
/// any ──requestRetry──▶ Idle  (session loops indefinitely)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Waiting for the user to submit a sentence.
    Idle,

    /// Microphone is calibrating / capturing; transcription follows.
    Listening,

    /// A transcript exists; the feedback request is in flight.
    TranscriptReady,

    /// Capture or transcription failed; the user may retry manually.
    CaptureFailed,

    /// Feedback text has been received and is on display.
    FeedbackReady,

    /// The feedback service call failed; the user may retry manually.
    FeedbackFailed,
}

impl SessionPhase {
    /// Returns `true` while an evaluation cycle is in flight.
    ///
    /// The UI uses this to disable the "Start Speaking" button.
    ///
    /// ```
    /// use pronounce_coach::session::SessionPhase;
    ///
    /// assert!(!SessionPhase::Idle.is_busy());
    /// assert!(SessionPhase::Listening.is_busy());
    /// assert!(SessionPhase::TranscriptReady.is_busy());
    /// assert!(!SessionPhase::FeedbackReady.is_busy());
    /// ```
    pub fn is_busy(&self) -> bool {
        matches!(self, SessionPhase::Listening | SessionPhase::TranscriptReady)
    }

    /// A short human-readable label suitable for the UI status line.
    pub fn label(&self) -> &'static str {
        match self {
            SessionPhase::Idle => "Idle",
            SessionPhase::Listening => "Listening",
            SessionPhase::TranscriptReady => "Assessing",
            SessionPhase::CaptureFailed => "Capture failed",
            SessionPhase::FeedbackReady => "Done",
            SessionPhase::FeedbackFailed => "Feedback failed",
        }
    }
}

impl Default for SessionPhase {
    fn default() -> Self {
        SessionPhase::Idle
    }
}

// ---------------------------------------------------------------------------
// Notice
// ---------------------------------------------------------------------------

/// Severity of a transient status banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A transient status banner rendered inline with the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// The per-session state value object — the single source of truth the UI
/// renders each frame.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Current phase of the evaluation cycle.
    pub phase: SessionPhase,

    /// Set by a retry request; consumed when the next submission begins.
    pub retry_requested: bool,

    /// Transcript of the most recent successful capture, exactly as the
    /// transcription adapter returned it.  `None` at session start, after a
    /// retry, and after a failed capture.
    pub last_transcript: Option<String>,

    /// The sentence being evaluated; retained across retries.
    pub target_sentence: String,

    /// Feedback text on display, exactly as the feedback adapter returned
    /// it.
    pub feedback: Option<String>,

    /// Transient banner content.
    pub notice: Option<Notice>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a submission with `target` (the submit operation's entry
    /// point).
    ///
    /// Returns `false` without any state change when `target` is empty
    /// after trimming — validation blocks the cycle before capture.  On
    /// acceptance the retry flag is consumed, stale feedback and notices
    /// are cleared, and the session enters [`SessionPhase::Listening`].
    pub fn begin_submit(&mut self, target: &str) -> bool {
        if target.trim().is_empty() {
            return false;
        }

        self.target_sentence = target.to_string();
        self.retry_requested = false;
        self.feedback = None;
        self.notice = None;
        self.phase = SessionPhase::Listening;
        true
    }

    /// Record a successful transcription; the feedback call may follow.
    pub fn transcript_captured(&mut self, transcript: String) {
        self.last_transcript = Some(transcript);
        self.phase = SessionPhase::TranscriptReady;
    }

    /// Record a failed capture.  The transcript is discarded, so the
    /// feedback invariant (`can_request_feedback`) cannot hold.
    pub fn capture_failed(&mut self) {
        self.last_transcript = None;
        self.phase = SessionPhase::CaptureFailed;
    }

    /// Record the received feedback text, verbatim.
    pub fn feedback_ready(&mut self, text: String) {
        self.feedback = Some(text);
        self.phase = SessionPhase::FeedbackReady;
    }

    /// Record a failed feedback call.
    pub fn feedback_failed(&mut self) {
        self.phase = SessionPhase::FeedbackFailed;
    }

    /// The retry operation: discard the last transcript and feedback, raise
    /// the retry flag, and return to [`SessionPhase::Idle`].  The target
    /// sentence is retained for the next cycle.
    pub fn request_retry(&mut self) {
        self.retry_requested = true;
        self.last_transcript = None;
        self.feedback = None;
        self.notice = None;
        self.phase = SessionPhase::Idle;
    }

    /// The feedback invariant: a feedback request may only be issued when a
    /// non-empty target and a transcript both exist.
    pub fn can_request_feedback(&self) -> bool {
        !self.target_sentence.trim().is_empty() && self.last_transcript.is_some()
    }
}

// ---------------------------------------------------------------------------
// SharedState
// ---------------------------------------------------------------------------

/// Thread-safe handle to [`SessionState`].
///
/// Cheap to clone (`Arc` clone).  Lock with `.lock().unwrap()` for a short
/// critical section; do **not** hold the lock across `.await` points.
pub type SharedState = Arc<Mutex<SessionState>>;

/// Construct a new [`SharedState`] wrapping a fresh [`SessionState`].
pub fn new_shared_state() -> SharedState {
    Arc::new(Mutex::new(SessionState::new()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ---- SessionPhase ---

    #[test]
    fn idle_is_not_busy() {
        assert!(!SessionPhase::Idle.is_busy());
    }

    #[test]
    fn listening_and_assessing_are_busy() {
        assert!(SessionPhase::Listening.is_busy());
        assert!(SessionPhase::TranscriptReady.is_busy());
    }

    #[test]
    fn terminal_phases_are_not_busy() {
        assert!(!SessionPhase::CaptureFailed.is_busy());
        assert!(!SessionPhase::FeedbackReady.is_busy());
        assert!(!SessionPhase::FeedbackFailed.is_busy());
    }

    #[test]
    fn default_phase_is_idle() {
        assert_eq!(SessionPhase::default(), SessionPhase::Idle);
    }

    // ---- begin_submit ---

    #[test]
    fn new_session_is_idle_with_no_transcript() {
        let state = SessionState::new();
        assert_eq!(state.phase, SessionPhase::Idle);
        assert!(!state.retry_requested);
        assert!(state.last_transcript.is_none());
        assert!(state.feedback.is_none());
    }

    #[test]
    fn empty_target_is_rejected_without_state_change() {
        let mut state = SessionState::new();
        assert!(!state.begin_submit(""));
        assert!(!state.begin_submit("   "));
        assert_eq!(state.phase, SessionPhase::Idle);
        assert!(state.target_sentence.is_empty());
    }

    #[test]
    fn accepted_submit_enters_listening() {
        let mut state = SessionState::new();
        assert!(state.begin_submit("hello world"));
        assert_eq!(state.phase, SessionPhase::Listening);
        assert_eq!(state.target_sentence, "hello world");
    }

    #[test]
    fn submit_consumes_the_retry_flag() {
        let mut state = SessionState::new();
        state.request_retry();
        assert!(state.retry_requested);

        state.begin_submit("test");
        assert!(!state.retry_requested);
    }

    #[test]
    fn submit_clears_stale_feedback() {
        let mut state = SessionState::new();
        state.begin_submit("one");
        state.transcript_captured("one".into());
        state.feedback_ready("great".into());

        state.begin_submit("two");
        assert!(state.feedback.is_none());
    }

    // ---- transcript / capture ---

    #[test]
    fn transcript_is_stored_exactly() {
        let mut state = SessionState::new();
        state.begin_submit("hello world");
        state.transcript_captured("  hello word ".into());
        assert_eq!(state.last_transcript.as_deref(), Some("  hello word "));
        assert_eq!(state.phase, SessionPhase::TranscriptReady);
    }

    #[test]
    fn capture_failure_clears_the_transcript() {
        let mut state = SessionState::new();
        state.begin_submit("hello");
        state.transcript_captured("hello".into());

        state.begin_submit("hello");
        state.capture_failed();
        assert!(state.last_transcript.is_none());
        assert_eq!(state.phase, SessionPhase::CaptureFailed);
    }

    // ---- retry monotonicity ---

    #[test]
    fn retry_sets_flag_and_clears_transcript() {
        let mut state = SessionState::new();
        state.begin_submit("hello");
        state.transcript_captured("hello".into());
        state.feedback_ready("nice".into());

        state.request_retry();
        assert!(state.retry_requested);
        assert!(state.last_transcript.is_none());
        assert!(state.feedback.is_none());
        assert_eq!(state.phase, SessionPhase::Idle);
    }

    #[test]
    fn retry_retains_the_target_sentence() {
        let mut state = SessionState::new();
        state.begin_submit("hello world");
        state.transcript_captured("hello word".into());

        state.request_retry();
        assert_eq!(state.target_sentence, "hello world");
    }

    // ---- feedback invariant ---

    #[test]
    fn feedback_requires_target_and_transcript() {
        let mut state = SessionState::new();
        assert!(!state.can_request_feedback());

        state.begin_submit("hello");
        assert!(!state.can_request_feedback());

        state.transcript_captured("hello".into());
        assert!(state.can_request_feedback());

        state.request_retry();
        assert!(!state.can_request_feedback());
    }

    // ---- SharedState ---

    #[test]
    fn shared_state_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SharedState>();
    }

    #[test]
    fn shared_state_can_be_cloned_and_mutated() {
        let state = new_shared_state();
        let state2 = Arc::clone(&state);

        state.lock().unwrap().begin_submit("hello");
        assert_eq!(state2.lock().unwrap().phase, SessionPhase::Listening);
    }
}
