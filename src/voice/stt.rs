//! Speech-to-text via the hosted Sarvam API
//!
//! One user recording is one attempt: there is no local retry policy, and any
//! upstream failure is terminal for the current voice query.

use std::time::Duration;

use crate::{Error, Result};

/// Default Sarvam API base URL
const SARVAM_BASE_URL: &str = "https://api.sarvam.ai";

/// Response from the Sarvam speech-to-text API
#[derive(serde::Deserialize)]
struct SarvamResponse {
    transcript: Option<String>,
}

/// Transcribes speech to text
pub struct SpeechToText {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl SpeechToText {
    /// Create a new STT instance
    ///
    /// # Errors
    ///
    /// Returns error if the API key is missing or the client cannot be built
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config(
                "Sarvam API key required for transcription".to_string(),
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
            base_url: SARVAM_BASE_URL.to_string(),
        })
    }

    /// Override the API base URL (used in tests)
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Transcribe audio to text with source-language auto-detection
    ///
    /// # Arguments
    ///
    /// * `audio` - WAV audio bytes
    ///
    /// # Errors
    ///
    /// Returns error on any transport or service failure, or when the
    /// response carries no transcript
    pub async fn transcribe(&self, audio: &[u8]) -> Result<String> {
        tracing::debug!(audio_bytes = audio.len(), "starting Sarvam transcription");

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(audio.to_vec())
                    .file_name("audio.wav")
                    .mime_str("audio/wav")
                    .map_err(|e| Error::Stt(e.to_string()))?,
            )
            .text("model", self.model.clone())
            .text("language_code", "unknown");

        let response = self
            .client
            .post(format!("{}/speech-to-text", self.base_url))
            .header("api-subscription-key", &self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Sarvam request failed");
                e
            })?;

        let status = response.status();
        tracing::debug!(status = %status, "received response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Sarvam API error");
            return Err(Error::Stt(format!("Sarvam API error {status}: {body}")));
        }

        let result: SarvamResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse Sarvam response");
            e
        })?;

        let transcript = result
            .transcript
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Stt("no transcript in response".to_string()))?;

        tracing::info!(transcript = %transcript, "transcription complete");
        Ok(transcript)
    }
}
