//! Ambient-noise calibration and utterance endpointing.
//!
//! One capture call runs two phases over a stream of fixed-size frames:
//!
//! 1. [`AmbientCalibrator`] — measures the room's RMS level over a short
//!    window and derives the speech threshold from it (margin × ambient,
//!    floored at a configured minimum).
//! 2. [`Endpointer`] — gates frames against the threshold: it waits for
//!    speech to start (bounded by a timeout), accumulates the utterance,
//!    and ends it after a run of trailing-silence frames or at the maximum
//!    utterance length.
//!
//! Audio is split into 30 ms frames (480 samples at 16 kHz).  Both types
//! are pure — they only consume frames — so the whole endpointing path is
//! unit-testable without a microphone.

use crate::config::AudioConfig;

/// Analysis frame length in milliseconds.
pub const FRAME_MS: u64 = 30;

/// Number of samples in one analysis frame at `sample_rate`.
pub fn frame_len(sample_rate: u32) -> usize {
    (sample_rate as u64 * FRAME_MS / 1_000) as usize
}

/// Root-mean-square amplitude of a frame.  Empty frames are 0.0.
fn rms(frame: &[f32]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    let mean_sq: f32 = frame.iter().map(|s| s * s).sum::<f32>() / frame.len() as f32;
    mean_sq.sqrt()
}

// ---------------------------------------------------------------------------
// AmbientCalibrator
// ---------------------------------------------------------------------------

/// Derives the speech threshold from a fixed window of ambient audio.
///
/// Feed frames until [`AmbientCalibrator::feed`] returns `Some(threshold)`;
/// the threshold is `mean_ambient_rms * threshold_margin`, floored at
/// `min_threshold` so a dead-silent room still gets a usable gate.
pub struct AmbientCalibrator {
    frames_needed: usize,
    frames_seen: usize,
    rms_sum: f32,
    margin: f32,
    min_threshold: f32,
}

impl AmbientCalibrator {
    /// Create a calibrator for the configured calibration window.
    pub fn new(cfg: &AudioConfig) -> Self {
        let frames_needed = (cfg.calibration_ms / FRAME_MS).max(1) as usize;
        Self {
            frames_needed,
            frames_seen: 0,
            rms_sum: 0.0,
            margin: cfg.threshold_margin,
            min_threshold: cfg.min_threshold,
        }
    }

    /// Consume one ambient frame.  Returns the derived threshold once the
    /// calibration window is full, `None` while still collecting.
    pub fn feed(&mut self, frame: &[f32]) -> Option<f32> {
        self.rms_sum += rms(frame);
        self.frames_seen += 1;

        if self.frames_seen < self.frames_needed {
            return None;
        }

        let ambient = self.rms_sum / self.frames_needed as f32;
        Some((ambient * self.margin).max(self.min_threshold))
    }
}

// ---------------------------------------------------------------------------
// Endpointer
// ---------------------------------------------------------------------------

/// Progress of an in-flight utterance capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenProgress {
    /// No speech yet; still inside the wait-for-speech window.
    Waiting,
    /// Speech has started; frames are being accumulated.
    Recording,
    /// The utterance ended (trailing silence or maximum length reached).
    Complete,
    /// The wait-for-speech window elapsed without any voiced frame.
    NoSpeech,
}

/// Energy-gated utterance collector.
///
/// # Example
///
/// ```rust
/// use pronounce_coach::audio::{frame_len, Endpointer, ListenProgress};
/// use pronounce_coach::config::AudioConfig;
///
/// let cfg = AudioConfig::default();
/// let n = frame_len(cfg.sample_rate);
/// let mut ep = Endpointer::new(0.05, cfg.sample_rate, &cfg);
///
/// assert_eq!(ep.feed(&vec![0.0; n]), ListenProgress::Waiting);
/// assert_eq!(ep.feed(&vec![0.5; n]), ListenProgress::Recording);
/// ```
pub struct Endpointer {
    threshold: f32,
    max_lead_frames: usize,
    max_trail_frames: usize,
    max_samples: usize,
    lead_frames: usize,
    trail_frames: usize,
    in_speech: bool,
    samples: Vec<f32>,
}

impl Endpointer {
    /// Create an endpointer with the calibrated `threshold`.
    pub fn new(threshold: f32, sample_rate: u32, cfg: &AudioConfig) -> Self {
        let max_lead_frames =
            ((cfg.wait_for_speech_secs * 1_000.0) as u64 / FRAME_MS).max(1) as usize;
        let max_trail_frames = (cfg.trailing_silence_ms / FRAME_MS).max(1) as usize;
        let max_samples = (cfg.max_utterance_secs * sample_rate as f32) as usize;

        Self {
            threshold,
            max_lead_frames,
            max_trail_frames,
            max_samples,
            lead_frames: 0,
            trail_frames: 0,
            in_speech: false,
            samples: Vec::new(),
        }
    }

    /// The RMS threshold in use.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Consume one frame and report capture progress.
    ///
    /// After [`ListenProgress::Complete`] or [`ListenProgress::NoSpeech`] the
    /// caller should stop feeding; further frames keep returning the same
    /// terminal answer.
    pub fn feed(&mut self, frame: &[f32]) -> ListenProgress {
        let voiced = rms(frame) > self.threshold;

        if !self.in_speech {
            if voiced {
                self.in_speech = true;
                self.samples.extend_from_slice(frame);
                return ListenProgress::Recording;
            }
            self.lead_frames += 1;
            if self.lead_frames >= self.max_lead_frames {
                return ListenProgress::NoSpeech;
            }
            return ListenProgress::Waiting;
        }

        if self.samples.len() >= self.max_samples {
            return ListenProgress::Complete;
        }

        self.samples.extend_from_slice(frame);

        if voiced {
            self.trail_frames = 0;
        } else {
            self.trail_frames += 1;
            if self.trail_frames >= self.max_trail_frames {
                return ListenProgress::Complete;
            }
        }

        ListenProgress::Recording
    }

    /// Consume the endpointer and return the accumulated utterance samples
    /// (speech plus any trailing-silence frames that closed it).
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
