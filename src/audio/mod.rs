//! Speech capture — microphone input, calibration, and utterance
//! endpointing.
//!
//! # Pipeline
//!
//! ```text
//! Microphone → cpal callback → AudioChunk (mpsc) → mix_to_mono
//!           → resample_to_16khz → AmbientCalibrator → Endpointer
//!           → Utterance (16 kHz mono f32)
//! ```
//!
//! The [`UtteranceSource`] trait is the seam the session orchestrator talks
//! to; [`MicUtteranceSource`] is the hardware-backed implementation.

pub mod listen;
pub mod mic;
pub mod resample;
pub mod source;

pub use listen::{frame_len, AmbientCalibrator, Endpointer, ListenProgress, FRAME_MS};
pub use mic::{AudioChunk, MicError, MicStreamHandle, Microphone};
pub use resample::{mix_to_mono, resample_to_16khz, TARGET_SAMPLE_RATE};
pub use source::{ListenError, MicUtteranceSource, Utterance, UtteranceSource};
