//! Transcription boundary — hosted speech recognition.
//!
//! [`Transcriber`] is the async seam the session orchestrator calls with a
//! captured utterance; [`ApiTranscriber`] is the hosted implementation.
//! Failures are typed: [`TranscribeError::Unrecognized`] when the audio
//! cannot be decoded into text, [`TranscribeError::Service`] for transport
//! and service faults (with upstream detail).

pub mod api;

pub use api::{ApiTranscriber, TranscribeError, Transcriber};
