//! The speech-capture seam: [`UtteranceSource`] and its microphone-backed
//! implementation.
//!
//! [`MicUtteranceSource::capture_utterance`] blocks the calling thread for
//! the whole cycle: open the default microphone, calibrate ambient noise
//! once, collect one utterance through the [`Endpointer`], then release the
//! device.  The session orchestrator runs it on
//! `tokio::task::spawn_blocking` so the async runtime never stalls.

use std::sync::mpsc;
use std::time::Duration;

use thiserror::Error;

use crate::audio::listen::{frame_len, AmbientCalibrator, Endpointer, ListenProgress};
use crate::audio::mic::{MicError, Microphone};
use crate::audio::resample::{mix_to_mono, resample_to_16khz, TARGET_SAMPLE_RATE};
use crate::config::AudioConfig;

/// Give up when the hardware stream delivers nothing for this long; cpal
/// callbacks normally arrive every few milliseconds.
const STREAM_STALL_TIMEOUT: Duration = Duration::from_secs(2);

// ---------------------------------------------------------------------------
// Utterance
// ---------------------------------------------------------------------------

/// One captured utterance: 16 kHz mono f32 PCM.
#[derive(Debug, Clone)]
pub struct Utterance {
    /// Mono PCM samples in `[-1.0, 1.0]`.
    pub samples: Vec<f32>,
    /// Sample rate of `samples` in Hz.
    pub sample_rate: u32,
}

impl Utterance {
    /// Length of the utterance in seconds.
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

// ---------------------------------------------------------------------------
// ListenError
// ---------------------------------------------------------------------------

/// Errors that can end a capture call without an utterance.
#[derive(Debug, Error)]
pub enum ListenError {
    /// The wait-for-speech window elapsed without any voiced audio.
    #[error("no speech detected before the listening window elapsed")]
    NoSpeech,

    /// The hardware stream stopped delivering samples mid-capture.
    #[error("audio stream stalled while listening")]
    Stalled,

    /// The microphone could not be opened or started.
    #[error(transparent)]
    Mic(#[from] MicError),
}

// ---------------------------------------------------------------------------
// UtteranceSource trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface for utterance capture.
///
/// Implementations must be `Send + Sync` so they can be held behind an
/// `Arc<dyn UtteranceSource>` and moved onto a blocking task.
///
/// # Contract
///
/// - Blocks until one utterance is captured or a timeout/silence condition
///   elapses.
/// - Calibrates ambient noise once per invocation before listening.
/// - Holds the input device exclusively for the duration of the call and
///   releases it before returning.
pub trait UtteranceSource: Send + Sync {
    /// Capture a single utterance.
    fn capture_utterance(&self) -> Result<Utterance, ListenError>;
}

// Compile-time assertion: Box<dyn UtteranceSource> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn UtteranceSource>) {}
};

// ---------------------------------------------------------------------------
// MicUtteranceSource
// ---------------------------------------------------------------------------

/// Production capture source backed by the default system microphone.
pub struct MicUtteranceSource {
    config: AudioConfig,
}

impl MicUtteranceSource {
    /// Create a source with the given capture/endpointing settings.
    pub fn new(config: AudioConfig) -> Self {
        Self { config }
    }
}

impl UtteranceSource for MicUtteranceSource {
    fn capture_utterance(&self) -> Result<Utterance, ListenError> {
        let mic = Microphone::open()?;
        let native_rate = mic.sample_rate();
        let channels = mic.channels();

        let (tx, rx) = mpsc::channel();
        let handle = mic.start(tx)?;

        log::debug!("listening ({native_rate} Hz, {channels} ch), calibrating ambient noise");

        let frame = frame_len(TARGET_SAMPLE_RATE);
        let mut calibrator = AmbientCalibrator::new(&self.config);
        let mut endpointer: Option<Endpointer> = None;
        let mut pending: Vec<f32> = Vec::new();

        'capture: loop {
            let chunk = rx
                .recv_timeout(STREAM_STALL_TIMEOUT)
                .map_err(|_| ListenError::Stalled)?;

            let mono = mix_to_mono(&chunk.samples, channels);
            pending.extend_from_slice(&resample_to_16khz(&mono, native_rate));

            while pending.len() >= frame {
                let current: Vec<f32> = pending.drain(..frame).collect();

                // Still calibrating — this frame feeds the noise estimate.
                if endpointer.is_none() {
                    if let Some(threshold) = calibrator.feed(&current) {
                        log::debug!("calibration done, speech threshold {threshold:.4}");
                        endpointer = Some(Endpointer::new(
                            threshold,
                            TARGET_SAMPLE_RATE,
                            &self.config,
                        ));
                    }
                    continue;
                }

                if let Some(ep) = endpointer.as_mut() {
                    match ep.feed(&current) {
                        ListenProgress::NoSpeech => return Err(ListenError::NoSpeech),
                        ListenProgress::Complete => break 'capture,
                        ListenProgress::Waiting | ListenProgress::Recording => {}
                    }
                }
            }
        }

        // Release the device before handing the audio back.
        drop(handle);

        // The loop only breaks once the endpointer exists and is complete.
        let samples = endpointer
            .map(Endpointer::into_samples)
            .ok_or(ListenError::Stalled)?;

        let utterance = Utterance {
            samples,
            sample_rate: TARGET_SAMPLE_RATE,
        };
        log::debug!("captured {:.2} s of speech", utterance.duration_secs());

        Ok(utterance)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
