//! Reply generation via the hosted Gemini API
//!
//! The generator never hard-fails the conversation: any upstream problem is
//! absorbed into a fixed apology reply so the user always sees a response.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::lang::{detect_language, DEFAULT_LANGUAGE};
use crate::{Error, Result};

/// Default Gemini API base URL
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Fixed apology reply used whenever generation fails
pub const APOLOGY: &str =
    "I'm sorry, I couldn't process your request right now. Please try again.";

/// A generated reply with its detected language
#[derive(Debug, Clone)]
pub struct Reply {
    pub text: String,
    pub language_code: String,
}

impl Reply {
    /// The apology reply in the default language
    #[must_use]
    pub fn apology() -> Self {
        Self {
            text: APOLOGY.to_string(),
            language_code: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

/// Request body for `generateContent`
#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

/// Response body for `generateContent`, reduced to the path we read
#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Generates natural-language replies
pub struct ResponseGenerator {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl ResponseGenerator {
    /// Create a new generator
    ///
    /// # Errors
    ///
    /// Returns error if the API key is missing or the client cannot be built
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config(
                "Gemini API key required for generation".to_string(),
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

    /// Generate a reply for a transcribed voice query
    ///
    /// Never fails: upstream errors collapse into the apology reply.
    pub async fn generate(&self, query: &str) -> Reply {
        let prompt =
            format!("You are EcoVoice, a helpful waste-management assistant. Respond naturally:\n\nUser: {query}");

        match self.generate_content(&prompt).await {
            Ok(text) => {
                let language_code = detect_language(&text).to_string();
                tracing::info!(language = %language_code, "reply generated");
                Reply {
                    text,
                    language_code,
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "generation failed, substituting apology");
                Reply::apology()
            }
        }
    }

    /// Generate a chat reply in the caller's selected language
    ///
    /// Same absorption policy as [`generate`](Self::generate).
    pub async fn chat_reply(&self, message: &str, language: &str) -> Reply {
        let prompt = format!(
            "You are EcoChatBot, an expert on waste segregation techniques, their benefits, \
             and the resale value of segregated waste. Always respond in {language}.\n\nUser: {message}"
        );

        match self.generate_content(&prompt).await {
            Ok(text) => {
                let language_code = detect_language(&text).to_string();
                Reply {
                    text,
                    language_code,
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "chat generation failed, substituting apology");
                Reply::apology()
            }
        }
    }

    /// Call `generateContent` and extract the first candidate's text
    async fn generate_content(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Generation(format!(
                "Gemini API error {status}: {body}"
            )));
        }

        let result: GenerateResponse = response.json().await?;

        result
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Generation("empty candidate list".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apology_uses_default_language() {
        let reply = Reply::apology();
        assert_eq!(reply.text, APOLOGY);
        assert_eq!(reply.language_code, "en-IN");
    }

    #[test]
    fn empty_api_key_is_rejected() {
        let err = ResponseGenerator::new(
            String::new(),
            "gemini-2.0-flash".to_string(),
            Duration::from_secs(5),
        );
        assert!(err.is_err());
    }

    #[test]
    fn response_parsing_tolerates_missing_fields() {
        let parsed: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.candidates.is_empty());

        let parsed: GenerateResponse =
            serde_json::from_str(r#"{"candidates":[{"content":null}]}"#).unwrap();
        assert!(parsed.candidates[0].content.is_none());
    }
}
