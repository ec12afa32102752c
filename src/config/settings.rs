//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.
//!
//! The hosted-API key is deliberately **not** part of the settings file — it
//! comes from the environment (see [`crate::config::ApiCredentials`]) so it
//! never lands on disk.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

/// Default base URL of the hosted generative endpoint, shared by the speech
/// and feedback adapters (each keeps its own copy so they can be split).
const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

// ---------------------------------------------------------------------------
// SpeechConfig
// ---------------------------------------------------------------------------

/// Settings for the hosted speech-recognition adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Base URL of the recognition endpoint.
    pub base_url: String,
    /// Model identifier used for transcription requests.
    pub model: String,
    /// Expected speech language as an ISO-639-1 code, or `"auto"` to let the
    /// service detect it.
    pub language: String,
    /// Maximum seconds to wait for a transcription response.
    pub timeout_secs: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.into(),
            model: "gemini-1.5-flash".into(),
            language: "auto".into(),
            timeout_secs: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// FeedbackConfig
// ---------------------------------------------------------------------------

/// Settings for the hosted feedback-generation adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackConfig {
    /// Base URL of the generation endpoint.
    pub base_url: String,
    /// Model identifier used for assessment requests.
    pub model: String,
    /// Sampling temperature (0.0 – 1.0).  Lower = more deterministic.
    pub temperature: f32,
    /// Cap on generated tokens; `None` lets the service decide.
    pub max_output_tokens: Option<u32>,
    /// Maximum seconds to wait for a feedback response.
    pub timeout_secs: u64,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.into(),
            model: "gemini-pro".into(),
            temperature: 0.4,
            max_output_tokens: Some(2048),
            timeout_secs: 60,
        }
    }
}

// ---------------------------------------------------------------------------
// AudioConfig
// ---------------------------------------------------------------------------

/// Settings for microphone capture, calibration and utterance endpointing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Sample rate the captured audio is resampled to before upload (Hz).
    pub sample_rate: u32,
    /// Length of the ambient-noise calibration window in milliseconds.
    pub calibration_ms: u64,
    /// Captured RMS is multiplied by this margin to form the speech
    /// threshold.
    pub threshold_margin: f32,
    /// Lower bound on the speech threshold, for very quiet rooms.
    pub min_threshold: f32,
    /// Seconds to wait for speech to start before giving up.
    pub wait_for_speech_secs: f32,
    /// Milliseconds of trailing silence that end the utterance.
    pub trailing_silence_ms: u64,
    /// Maximum utterance length in seconds; capture stops at this point.
    pub max_utterance_secs: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            calibration_ms: 500,
            threshold_margin: 3.0,
            min_threshold: 0.01,
            wait_for_speech_secs: 8.0,
            trailing_silence_ms: 800,
            max_utterance_secs: 30.0,
        }
    }
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// Window appearance settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Last saved window position `(x, y)` in screen pixels.  `None` means
    /// let the OS / window manager pick a position on first launch.
    pub window_position: Option<(f32, f32)>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            window_position: None,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use pronounce_coach::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Speech-recognition adapter settings.
    pub speech: SpeechConfig,
    /// Feedback-generation adapter settings.
    pub feedback: FeedbackConfig,
    /// Capture / calibration / endpointing settings.
    pub audio: AudioConfig,
    /// Window settings.
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Verify that a default `AppConfig` can be serialised to TOML and
    /// deserialised back without any data loss.
    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");

        // SpeechConfig
        assert_eq!(original.speech.base_url, loaded.speech.base_url);
        assert_eq!(original.speech.model, loaded.speech.model);
        assert_eq!(original.speech.language, loaded.speech.language);
        assert_eq!(original.speech.timeout_secs, loaded.speech.timeout_secs);

        // FeedbackConfig
        assert_eq!(original.feedback.base_url, loaded.feedback.base_url);
        assert_eq!(original.feedback.model, loaded.feedback.model);
        assert_eq!(original.feedback.temperature, loaded.feedback.temperature);
        assert_eq!(
            original.feedback.max_output_tokens,
            loaded.feedback.max_output_tokens
        );
        assert_eq!(
            original.feedback.timeout_secs,
            loaded.feedback.timeout_secs
        );

        // AudioConfig
        assert_eq!(original.audio.sample_rate, loaded.audio.sample_rate);
        assert_eq!(original.audio.calibration_ms, loaded.audio.calibration_ms);
        assert_eq!(
            original.audio.threshold_margin,
            loaded.audio.threshold_margin
        );
        assert_eq!(
            original.audio.trailing_silence_ms,
            loaded.audio.trailing_silence_ms
        );
        assert_eq!(
            original.audio.max_utterance_secs,
            loaded.audio.max_utterance_secs
        );
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        let default = AppConfig::default();

        assert_eq!(config.speech.model, default.speech.model);
        assert_eq!(config.feedback.model, default.feedback.model);
        assert_eq!(config.audio.sample_rate, default.audio.sample_rate);
    }

    /// Verify default values stay on the documented endpoints and rates.
    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert!(cfg.speech.base_url.contains("generativelanguage"));
        assert_eq!(cfg.speech.model, "gemini-1.5-flash");
        assert_eq!(cfg.speech.language, "auto");
        assert_eq!(cfg.feedback.model, "gemini-pro");
        assert_eq!(cfg.feedback.max_output_tokens, Some(2048));
        assert_eq!(cfg.audio.sample_rate, 16_000);
        assert_eq!(cfg.audio.calibration_ms, 500);
        assert!(cfg.ui.window_position.is_none());
    }

    /// Verify that modified non-default values survive a round trip.
    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.speech.model = "gemini-2.0-flash".into();
        cfg.speech.language = "en".into();
        cfg.feedback.model = "gemini-1.5-pro".into();
        cfg.feedback.temperature = 0.7;
        cfg.feedback.max_output_tokens = None;
        cfg.audio.trailing_silence_ms = 1_200;
        cfg.ui.window_position = Some((100.0, 200.0));

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.speech.model, "gemini-2.0-flash");
        assert_eq!(loaded.speech.language, "en");
        assert_eq!(loaded.feedback.model, "gemini-1.5-pro");
        assert_eq!(loaded.feedback.temperature, 0.7);
        assert_eq!(loaded.feedback.max_output_tokens, None);
        assert_eq!(loaded.audio.trailing_silence_ms, 1_200);
        assert_eq!(loaded.ui.window_position, Some((100.0, 200.0)));
    }
}
