//! Typed wire format for the hosted `generateContent` endpoint.
//!
//! Both hosted adapters (speech recognition and feedback generation) speak
//! this format; each builds its own request and maps failures into its own
//! error taxonomy.  Nothing here performs I/O.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

/// A request part: either plain text or inline binary data (e.g. audio).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
pub struct GenerationConfig {
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl GenerateRequest {
    /// A request carrying a single text part and no generation config.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part::Text { text: text.into() }],
            }],
            generation_config: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    pub candidates: Option<Vec<Candidate>>,
    #[serde(rename = "promptFeedback")]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: ResponseContent,
}

#[derive(Debug, Deserialize)]
pub struct ResponseContent {
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct PromptFeedback {
    #[serde(rename = "blockReason")]
    pub block_reason: Option<String>,
}

impl GenerateResponse {
    /// The block reason, when the service refused the prompt.
    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
    }

    /// Text of the first candidate's first part, if any.
    pub fn first_text(self) -> Option<String> {
        self.candidates
            .and_then(|candidates| candidates.into_iter().next())
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
    }
}

// ---------------------------------------------------------------------------
// URL building
// ---------------------------------------------------------------------------

/// Request URL for a `generateContent` call.
///
/// The key rides in the query string (the endpoint's auth convention);
/// callers must log `base_url`/`model` only, never the full URL.
pub fn generate_url(base_url: &str, model: &str, api_key: &str) -> String {
    format!(
        "{}/models/{}:generateContent?key={}",
        base_url.trim_end_matches('/'),
        model,
        api_key
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_part_serializes_flat() {
        let req = GenerateRequest::from_text("hello");
        let value = serde_json::to_value(&req).expect("serialize");

        assert_eq!(value["contents"][0]["parts"][0]["text"], "hello");
        // No generation_config key when it is None.
        assert!(value.get("generation_config").is_none());
    }

    #[test]
    fn inline_data_part_serializes_with_mime_type() {
        let req = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part::InlineData {
                    inline_data: InlineData {
                        mime_type: "audio/wav".into(),
                        data: "QUJD".into(),
                    },
                }],
            }],
            generation_config: None,
        };
        let value = serde_json::to_value(&req).expect("serialize");

        let part = &value["contents"][0]["parts"][0];
        assert_eq!(part["inline_data"]["mime_type"], "audio/wav");
        assert_eq!(part["inline_data"]["data"], "QUJD");
    }

    #[test]
    fn generation_config_omits_absent_token_cap() {
        let req = GenerateRequest {
            contents: vec![],
            generation_config: Some(GenerationConfig {
                temperature: 0.4,
                max_output_tokens: None,
            }),
        };
        let value = serde_json::to_value(&req).expect("serialize");
        let config = &value["generation_config"];
        assert!((config["temperature"].as_f64().unwrap() - 0.4).abs() < 1e-6);
        assert!(config.get("max_output_tokens").is_none());
    }

    #[test]
    fn first_text_extracts_the_first_candidate() {
        let json = r#"{
            "candidates": [
                { "content": { "parts": [ { "text": "first" }, { "text": "second" } ] } },
                { "content": { "parts": [ { "text": "other" } ] } }
            ]
        }"#;
        let resp: GenerateResponse = serde_json::from_str(json).expect("parse");
        assert_eq!(resp.first_text().as_deref(), Some("first"));
    }

    #[test]
    fn missing_candidates_yield_none() {
        let resp: GenerateResponse = serde_json::from_str("{}").expect("parse");
        assert!(resp.first_text().is_none());
    }

    #[test]
    fn block_reason_is_surfaced() {
        let json = r#"{ "promptFeedback": { "blockReason": "SAFETY" } }"#;
        let resp: GenerateResponse = serde_json::from_str(json).expect("parse");
        assert_eq!(resp.block_reason(), Some("SAFETY"));
    }

    #[test]
    fn url_contains_model_and_key() {
        let url = generate_url("https://example.test/v1beta/", "gemini-pro", "k-123");
        assert_eq!(
            url,
            "https://example.test/v1beta/models/gemini-pro:generateContent?key=k-123"
        );
    }
}
