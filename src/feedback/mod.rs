//! Feedback boundary — hosted generative-language assessment.
//!
//! This module provides:
//! * [`FeedbackModel`] — async trait implemented by feedback backends.
//! * [`GeminiFeedback`] — hosted `generateContent` client.
//! * [`ASSESSMENT_INSTRUCTION`] / [`compose_feedback_prompt`] — the
//!   phonetic-assessment prompt template and its composition.
//! * [`FeedbackError`] — error variants for feedback operations.
//!
//! The reply is opaque display content: it is rendered exactly as returned
//! and never parsed into typed fields.

pub mod model;
pub mod prompt;

pub use model::{FeedbackError, FeedbackModel, GeminiFeedback};
pub use prompt::{compose_feedback_prompt, ASSESSMENT_INSTRUCTION};
