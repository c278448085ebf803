//! Server-side speech synthesis via the Gemini audio endpoint
//!
//! Produces a `data:audio/mp3;base64,…` URL the client can play directly.
//! Synthesis failures degrade silently: the client falls back to its local
//! voice catalog, so errors here are logged and collapsed to `None`.

use std::time::Duration;

use base64::Engine as _;
use serde::Deserialize;
use serde_json::json;

use crate::{Error, Result};

/// Default Gemini API base URL
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Response body for audio `generateContent`, reduced to the path we read
#[derive(Deserialize)]
struct AudioResponse {
    #[serde(default)]
    candidates: Vec<AudioCandidate>,
}

#[derive(Deserialize)]
struct AudioCandidate {
    content: Option<AudioContent>,
}

#[derive(Deserialize)]
struct AudioContent {
    #[serde(default)]
    parts: Vec<AudioPart>,
}

#[derive(Deserialize)]
struct AudioPart {
    #[serde(rename = "inlineData")]
    inline_data: Option<InlineData>,
}

#[derive(Deserialize)]
struct InlineData {
    data: String,
}

/// Synthesizes reply audio server-side
pub struct SpeechSynthesis {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl SpeechSynthesis {
    /// Create a new synthesis instance
    ///
    /// # Errors
    ///
    /// Returns error if the API key is missing or the client cannot be built
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config(
                "Gemini API key required for synthesis".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            model,
            base_url: GEMINI_BASE_URL.to_string(),
        })
    }

    /// Override the API base URL (used in tests)
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Synthesize reply text into a playable data URL
    ///
    /// Returns `None` on any failure; the caller treats a missing URL as
    /// "use local fallback synthesis".
    pub async fn synthesize_data_url(&self, text: &str, language_code: &str) -> Option<String> {
        match self.request_audio(text, language_code).await {
            Ok(Some(base64_audio)) => Some(format!("data:audio/mp3;base64,{base64_audio}")),
            Ok(None) => {
                tracing::debug!("no inline audio in response");
                None
            }
            Err(e) => {
                tracing::error!(error = %e, "server synthesis failed");
                None
            }
        }
    }

    /// Request inline MP3 audio for the given text
    async fn request_audio(&self, text: &str, language_code: &str) -> Result<Option<String>> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": format!("Convert this to speech in {language_code}: {text}") }]
            }],
            "generationConfig": { "responseMimeType": "audio/mp3" }
        });

        let response = self.client.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!("Gemini TTS error {status}: {body}")));
        }

        let result: AudioResponse = response.json().await?;

        Ok(result
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.inline_data)
            .map(|d| d.data))
    }
}

/// Decode a `data:audio/mp3;base64,…` URL into MP3 bytes
///
/// # Errors
///
/// Returns error if the URL has no base64 payload or the payload is invalid
pub fn decode_data_url(url: &str) -> Result<Vec<u8>> {
    let payload = url
        .split_once(";base64,")
        .map(|(_, rest)| rest)
        .ok_or_else(|| Error::Tts("not a base64 data URL".to_string()))?;

    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| Error::Tts(format!("invalid base64 audio: {e}")))
}
