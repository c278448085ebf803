//! HTTP API server for the EcoVoice gateway

pub mod chat;
pub mod health;
pub mod voice_query;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::chat::ChatSession;
use crate::generate::ResponseGenerator;
use crate::pipeline::VoiceQueryPipeline;
use crate::voice::{SpeechSynthesis, SpeechToText};
use crate::{Config, Result};

/// Shared state for API handlers
pub struct ApiState {
    /// Voice-query round trip; `None` when upstream keys are missing
    pub pipeline: Option<VoiceQueryPipeline>,
    /// Reply generator for the chat surface; `None` without a Gemini key
    pub generator: Option<ResponseGenerator>,
    /// Chat session for this gateway instance
    pub chat: Mutex<ChatSession>,
}

impl ApiState {
    /// Build state from configuration
    ///
    /// Missing keys degrade the matching surface instead of failing startup:
    /// voice queries report transcription failure, chat falls back to the
    /// apology reply, and `/ready` reports degraded.
    ///
    /// # Errors
    ///
    /// Returns error if an HTTP client cannot be constructed
    pub fn from_config(config: &Config) -> Result<Self> {
        let timeout = Duration::from_secs(config.voice.request_timeout_secs);

        let generator = match &config.api_keys.gemini {
            Some(key) => Some(ResponseGenerator::new(
                key.clone(),
                config.voice.llm_model.clone(),
                timeout,
            )?),
            None => None,
        };

        let pipeline = match (&config.api_keys.sarvam, &config.api_keys.gemini) {
            (Some(sarvam), Some(gemini)) => {
                let stt =
                    SpeechToText::new(sarvam.clone(), config.voice.stt_model.clone(), timeout)?;
                let generator = ResponseGenerator::new(
                    gemini.clone(),
                    config.voice.llm_model.clone(),
                    timeout,
                )?;
                let synthesis = SpeechSynthesis::new(
                    gemini.clone(),
                    config.voice.llm_model.clone(),
                    timeout,
                )?;
                Some(VoiceQueryPipeline::new(stt, generator, synthesis))
            }
            _ => None,
        };

        Ok(Self {
            pipeline,
            generator,
            chat: Mutex::new(ChatSession::new("English")),
        })
    }
}

/// Build the router with all routes
pub fn router(state: Arc<ApiState>) -> Router {
    let router = Router::new()
        .nest("/api", voice_query::router(state.clone()))
        .nest("/api/chat", chat::router(state.clone()))
        .merge(health::router())
        .merge(health::ready_router(state));

    // CORS layer for cross-origin requests from the companion app
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router.layer(cors).layer(TraceLayer::new_for_http())
}

/// API server
pub struct ApiServer {
    state: Arc<ApiState>,
    port: u16,
}

impl ApiServer {
    /// Create a server from configuration
    ///
    /// # Errors
    ///
    /// Returns error if state construction fails
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            state: Arc::new(ApiState::from_config(config)?),
            port: config.api_server.port,
        })
    }

    /// Run the API server
    ///
    /// # Errors
    ///
    /// Returns error if server fails to bind or run
    pub async fn run(self) -> Result<()> {
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| crate::Error::Config(format!("failed to bind API server: {e}")))?;

        tracing::info!(port = self.port, "API server listening");

        axum::serve(listener, router(self.state))
            .await
            .map_err(|e| crate::Error::Config(format!("API server error: {e}")))?;

        Ok(())
    }
}
