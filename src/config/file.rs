//! TOML configuration file loading
//!
//! Supports `~/.config/ecovoice/config.toml` as a persistent config source.
//! All fields are optional — the file is a partial overlay on top of defaults.

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct EcoVoiceConfigFile {
    /// Voice pipeline configuration
    #[serde(default)]
    pub voice: VoiceFileConfig,

    /// API keys for hosted services
    #[serde(default)]
    pub api_keys: ApiKeysFileConfig,

    /// Server/runtime configuration
    #[serde(default)]
    pub server: ServerFileConfig,
}

/// Voice pipeline configuration
#[derive(Debug, Default, Deserialize)]
pub struct VoiceFileConfig {
    /// ASR model identifier (e.g. "saarika:v2.5")
    pub stt_model: Option<String>,

    /// Generative model used for replies and fallback audio
    pub llm_model: Option<String>,

    /// Per-request timeout for upstream calls, in seconds
    pub request_timeout_secs: Option<u64>,
}

/// API keys configuration
#[derive(Debug, Default, Deserialize)]
pub struct ApiKeysFileConfig {
    pub gemini: Option<String>,
    pub sarvam: Option<String>,
}

/// Server/runtime configuration
#[derive(Debug, Default, Deserialize)]
pub struct ServerFileConfig {
    /// API server port
    pub port: Option<u16>,
}

/// Load the TOML config file from the standard path
///
/// Returns `EcoVoiceConfigFile::default()` if the file doesn't exist or can't
/// be parsed.
pub fn load_config_file() -> EcoVoiceConfigFile {
    let Some(path) = config_file_path() else {
        return EcoVoiceConfigFile::default();
    };

    if !path.exists() {
        return EcoVoiceConfigFile::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                EcoVoiceConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            EcoVoiceConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/ecovoice/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("ecovoice").join("config.toml"))
}
