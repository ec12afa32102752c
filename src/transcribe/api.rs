//! Core `Transcriber` trait and the hosted `ApiTranscriber` implementation.
//!
//! `ApiTranscriber` uploads one captured utterance as base64-encoded WAV
//! inline data to the configured `generateContent` endpoint and returns the
//! recognized text.  All connection details come from
//! [`SpeechConfig`](crate::config::SpeechConfig); nothing is hardcoded.

use std::io::Cursor;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use hound::{SampleFormat, WavSpec, WavWriter};
use thiserror::Error;

use crate::config::{ApiCredentials, SpeechConfig};
use crate::gemini::{
    generate_url, Content, GenerateRequest, GenerateResponse, InlineData, Part,
};

// ---------------------------------------------------------------------------
// TranscribeError
// ---------------------------------------------------------------------------

/// Typed failures of the transcription boundary.
#[derive(Debug, Error)]
pub enum TranscribeError {
    /// Audio was captured but could not be decoded into text (including
    /// empty audio and empty service replies).
    #[error("speech could not be recognized")]
    Unrecognized,

    /// The recognition service could not be reached or rejected the call.
    #[error("{0}")]
    Service(String),
}

impl From<reqwest::Error> for TranscribeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TranscribeError::Service("request timed out".into())
        } else {
            TranscribeError::Service(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Transcriber trait
// ---------------------------------------------------------------------------

/// Async interface to speech recognition.
///
/// Implementors must be `Send + Sync` so they can be shared across threads
/// (e.g. wrapped in `Arc<dyn Transcriber>`).
///
/// # Contract
///
/// - `audio` is 16 kHz mono f32 PCM.
/// - The returned transcript is exactly what the service produced (after
///   the adapter's own whitespace trim); callers must not assume any
///   further normalisation.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: &[f32]) -> Result<String, TranscribeError>;
}

// ---------------------------------------------------------------------------
// WAV encoding
// ---------------------------------------------------------------------------

/// Encode f32 PCM as a 16-bit mono WAV byte buffer.
fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, TranscribeError> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec)
            .map_err(|e| TranscribeError::Service(format!("WAV encoding failed: {e}")))?;

        for &sample in samples {
            let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer
                .write_sample(value)
                .map_err(|e| TranscribeError::Service(format!("WAV encoding failed: {e}")))?;
        }

        writer
            .finalize()
            .map_err(|e| TranscribeError::Service(format!("WAV encoding failed: {e}")))?;
    }

    Ok(cursor.into_inner())
}

// ---------------------------------------------------------------------------
// ApiTranscriber
// ---------------------------------------------------------------------------

/// Hosted speech recognition over the `generateContent` wire format.
///
/// The utterance travels as a base64 `audio/wav` inline-data part next to a
/// short transcription instruction; the service's reply text is the
/// transcript.
pub struct ApiTranscriber {
    client: reqwest::Client,
    config: SpeechConfig,
    credentials: ApiCredentials,
}

impl ApiTranscriber {
    /// Build a transcriber from application config and the startup
    /// credential.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`.  A default (no-timeout) client is used as a
    /// last-resort fallback if the builder fails (should never happen in
    /// practice).
    pub fn from_config(config: &SpeechConfig, credentials: &ApiCredentials) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
            credentials: credentials.clone(),
        }
    }

    /// The instruction text sent alongside the audio.
    fn instruction(&self) -> String {
        match self.config.language.as_str() {
            "" | "auto" => "Transcribe this audio. Return only the transcribed text \
                            without any additional commentary."
                .to_string(),
            lang => format!(
                "Transcribe this audio in {lang}. Return only the transcribed text \
                 without any additional commentary."
            ),
        }
    }
}

#[async_trait]
impl Transcriber for ApiTranscriber {
    async fn transcribe(&self, audio: &[f32]) -> Result<String, TranscribeError> {
        // Nothing captured — no point in a network round trip.
        if audio.is_empty() {
            return Err(TranscribeError::Unrecognized);
        }

        let wav = encode_wav(audio, crate::audio::TARGET_SAMPLE_RATE)?;
        let base64_audio = STANDARD.encode(&wav);

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: self.instruction(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: "audio/wav".into(),
                            data: base64_audio,
                        },
                    },
                ],
            }],
            generation_config: None,
        };

        log::debug!(
            "transcription request: model={}, {} samples",
            self.config.model,
            audio.len()
        );

        let url = generate_url(
            &self.config.base_url,
            &self.config.model,
            self.credentials.key(),
        );

        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(TranscribeError::Service(format!(
                "recognition service returned {status}: {detail}"
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| TranscribeError::Service(format!("unexpected response: {e}")))?;

        if let Some(reason) = parsed.block_reason() {
            return Err(TranscribeError::Service(format!(
                "recognition request blocked: {reason}"
            )));
        }

        let text = parsed
            .first_text()
            .map(|t| t.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(TranscribeError::Unrecognized);
        }

        Ok(text)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
