//! Configuration management for the EcoVoice gateway
//!
//! Layered resolution: environment variables override the TOML file, which
//! overrides built-in defaults.

pub mod file;

use crate::{Error, Result};

/// Default ASR model for Sarvam speech-to-text
pub const DEFAULT_STT_MODEL: &str = "saarika:v2.5";

/// Default generative model for replies and fallback audio
pub const DEFAULT_LLM_MODEL: &str = "gemini-2.0-flash";

/// Default per-request timeout for upstream calls
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// EcoVoice gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Voice pipeline configuration
    pub voice: VoiceConfig,

    /// API keys
    pub api_keys: ApiKeys,

    /// HTTP API server configuration
    pub api_server: ApiServerConfig,
}

/// HTTP API server configuration
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    /// Port to listen on
    pub port: u16,
}

/// Voice pipeline configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// ASR model for Sarvam (e.g. "saarika:v2.5")
    pub stt_model: String,

    /// Generative model identifier (e.g. "gemini-2.0-flash")
    pub llm_model: String,

    /// Timeout applied to every upstream request. An unresponsive service
    /// fails the stage instead of leaving the flow in Processing forever.
    pub request_timeout_secs: u64,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            stt_model: DEFAULT_STT_MODEL.to_string(),
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// API keys for hosted services
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// Gemini API key (reply generation and fallback audio)
    pub gemini: Option<String>,

    /// Sarvam API key (speech recognition)
    pub sarvam: Option<String>,
}

impl Config {
    /// Load configuration from env and the optional TOML file
    ///
    /// # Errors
    ///
    /// Returns error if the port override cannot be parsed
    pub fn load() -> Result<Self> {
        let fc = file::load_config_file();

        let api_keys = ApiKeys {
            gemini: env_or("GEMINI_API_KEY", fc.api_keys.gemini),
            sarvam: env_or("SARVAM_API_KEY", fc.api_keys.sarvam),
        };

        let voice = VoiceConfig {
            stt_model: env_or("ECOVOICE_STT_MODEL", fc.voice.stt_model)
                .unwrap_or_else(|| DEFAULT_STT_MODEL.to_string()),
            llm_model: env_or("ECOVOICE_LLM_MODEL", fc.voice.llm_model)
                .unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            request_timeout_secs: match std::env::var("ECOVOICE_REQUEST_TIMEOUT_SECS") {
                Ok(v) => v.parse().map_err(|_| {
                    Error::Config(format!("invalid ECOVOICE_REQUEST_TIMEOUT_SECS: {v}"))
                })?,
                Err(_) => fc
                    .voice
                    .request_timeout_secs
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            },
        };

        let api_server = ApiServerConfig {
            port: match std::env::var("ECOVOICE_PORT") {
                Ok(v) => v
                    .parse()
                    .map_err(|_| Error::Config(format!("invalid ECOVOICE_PORT: {v}")))?,
                Err(_) => fc.server.port.unwrap_or(8790),
            },
        };

        if api_keys.gemini.is_none() {
            tracing::warn!("GEMINI_API_KEY not set, reply generation will use the apology fallback");
        }
        if api_keys.sarvam.is_none() {
            tracing::warn!("SARVAM_API_KEY not set, voice queries will fail at transcription");
        }

        Ok(Self {
            voice,
            api_keys,
            api_server,
        })
    }
}

/// Env var value, falling back to the TOML overlay
fn env_or(key: &str, fallback: Option<String>) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty()).or(fallback)
}
