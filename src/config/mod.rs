//! Configuration module for Pronunciation Coach.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for each subsystem,
//! `AppPaths` for cross-platform data directories, TOML persistence via
//! `AppConfig::load` / `AppConfig::save`, and `ApiCredentials` for the
//! hosted-API key (environment-only, never persisted).

pub mod credentials;
pub mod paths;
pub mod settings;

pub use credentials::{ApiCredentials, API_KEY_VAR};
pub use paths::AppPaths;
pub use settings::{AppConfig, AudioConfig, FeedbackConfig, SpeechConfig, UiConfig};
