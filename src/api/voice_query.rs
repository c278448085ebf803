//! Voice-query endpoint
//!
//! One round trip per request: multipart audio in, transcription + reply +
//! optional server audio out. Error bodies match what the companion app
//! renders inline.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Serialize;

use super::ApiState;
use crate::Error;

/// Build voice-query router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/voice-query", post(voice_query))
        .with_state(state)
}

/// Voice-query response envelope
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceQueryResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcription: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VoiceQueryResponse {
    fn failure(error: &str) -> Self {
        Self {
            success: false,
            transcription: None,
            response_text: None,
            language_code: None,
            audio_url: None,
            error: Some(error.to_string()),
        }
    }
}

/// Process one recorded voice query
async fn voice_query(
    State(state): State<Arc<ApiState>>,
    multipart: Multipart,
) -> (StatusCode, Json<VoiceQueryResponse>) {
    let Some(audio) = read_audio_part(multipart).await else {
        return (
            StatusCode::BAD_REQUEST,
            Json(VoiceQueryResponse::failure("No audio file provided")),
        );
    };

    tracing::info!(bytes = audio.len(), "received voice query audio");

    let Some(pipeline) = &state.pipeline else {
        tracing::error!("voice pipeline not configured (missing upstream keys)");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(VoiceQueryResponse::failure("Transcription failed")),
        );
    };

    match pipeline.run(&audio).await {
        Ok(result) => (
            StatusCode::OK,
            Json(VoiceQueryResponse {
                success: true,
                transcription: Some(result.transcription),
                response_text: Some(result.response_text),
                language_code: Some(result.language_code),
                audio_url: result.audio_url,
                error: None,
            }),
        ),
        Err(Error::Stt(e)) => {
            tracing::error!(error = %e, "voice query failed at transcription");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(VoiceQueryResponse::failure("Transcription failed")),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "voice query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(VoiceQueryResponse::failure("Internal server error")),
            )
        }
    }
}

/// Extract the `audio` multipart field
///
/// Returns `None` when the part is missing, unreadable, or zero bytes — all
/// treated as "no audio file provided".
async fn read_audio_part(mut multipart: Multipart) -> Option<Vec<u8>> {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("audio") {
            let bytes = field.bytes().await.ok()?;
            if bytes.is_empty() {
                return None;
            }
            return Some(bytes.to_vec());
        }
    }
    None
}
