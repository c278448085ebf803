//! Chat endpoints for the waste-segregation bot
//!
//! The generative-model call happens here, server-side, so the model key
//! never reaches the client. Every user message gets exactly one bot reply,
//! the apology when the upstream fails.

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use super::ApiState;
use crate::chat::{ChatMessage, SUGGESTED_QUESTIONS};
use crate::generate::Reply;

/// Build chat router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/send", post(send))
        .route("/history", get(history))
        .route("/suggestions", get(suggestions))
        .with_state(state)
}

/// Incoming chat message
#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub message: String,
    /// Display language the bot should answer in
    #[serde(default = "default_chat_language")]
    pub language: String,
}

fn default_chat_language() -> String {
    "English".to_string()
}

/// One completed chat turn
#[derive(Debug, serde::Serialize)]
pub struct SendResponse {
    pub user: ChatMessage,
    pub bot: ChatMessage,
}

/// Append a user message and reply to it
async fn send(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<SendRequest>,
) -> Json<SendResponse> {
    // Appended before the upstream call so history order equals send order
    let user = state.chat.lock().await.append_user(request.message.clone());

    let reply = match &state.generator {
        Some(generator) => generator.chat_reply(&request.message, &request.language).await,
        None => {
            tracing::error!("chat generator not configured, substituting apology");
            Reply::apology()
        }
    };

    let bot = state.chat.lock().await.append_bot(reply.text);

    Json(SendResponse { user, bot })
}

/// Full session history in arrival order
async fn history(State(state): State<Arc<ApiState>>) -> Json<Vec<ChatMessage>> {
    Json(state.chat.lock().await.history().to_vec())
}

/// Canned starter questions
async fn suggestions() -> Json<[&'static str; 4]> {
    Json(SUGGESTED_QUESTIONS)
}
