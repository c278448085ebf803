//! Shared test utilities

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::sync::Mutex;

use ecovoice_gateway::api::ApiState;
use ecovoice_gateway::chat::ChatSession;
use ecovoice_gateway::generate::ResponseGenerator;
use ecovoice_gateway::pipeline::VoiceQueryPipeline;
use ecovoice_gateway::voice::{SpeechSynthesis, SpeechToText};

pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Serve a mock upstream on an ephemeral port, returning its base URL
pub async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind mock upstream");
    let addr = listener.local_addr().expect("mock upstream has no addr");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("mock upstream died");
    });

    format!("http://{addr}")
}

/// API state with both upstreams pointed at mock base URLs
#[allow(dead_code)]
pub fn state_with_upstreams(sarvam_url: &str, gemini_url: &str) -> Arc<ApiState> {
    let stt = SpeechToText::new("test-key".to_string(), "saarika:v2.5".to_string(), TEST_TIMEOUT)
        .expect("stt")
        .with_base_url(sarvam_url);
    let generator = ResponseGenerator::new(
        "test-key".to_string(),
        "gemini-2.0-flash".to_string(),
        TEST_TIMEOUT,
    )
    .expect("generator")
    .with_base_url(gemini_url);
    let synthesis = SpeechSynthesis::new(
        "test-key".to_string(),
        "gemini-2.0-flash".to_string(),
        TEST_TIMEOUT,
    )
    .expect("synthesis")
    .with_base_url(gemini_url);

    let chat_generator = ResponseGenerator::new(
        "test-key".to_string(),
        "gemini-2.0-flash".to_string(),
        TEST_TIMEOUT,
    )
    .expect("chat generator")
    .with_base_url(gemini_url);

    Arc::new(ApiState {
        pipeline: Some(VoiceQueryPipeline::new(stt, generator, synthesis)),
        generator: Some(chat_generator),
        chat: Mutex::new(ChatSession::empty()),
    })
}

/// API state with no upstreams configured
#[allow(dead_code)]
pub fn unconfigured_state() -> Arc<ApiState> {
    Arc::new(ApiState {
        pipeline: None,
        generator: None,
        chat: Mutex::new(ChatSession::empty()),
    })
}
