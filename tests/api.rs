//! API endpoint integration tests
//!
//! Upstream services are simulated with throwaway local axum servers so the
//! full voice-query flow runs without network access or real keys.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::json;
use tower::ServiceExt;

mod common;
use common::{spawn_upstream, state_with_upstreams, unconfigured_state};

const BOUNDARY: &str = "ecovoice-test-boundary";

/// Build a multipart body with one `audio` part
fn multipart_audio_body(audio: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"audio\"; \
             filename=\"recording.wav\"\r\nContent-Type: audio/wav\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(audio);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn multipart_request(audio: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/voice-query")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_audio_body(audio)))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Mock Sarvam that always transcribes to the given text
fn sarvam_ok(transcript: &'static str) -> Router {
    Router::new().route(
        "/speech-to-text",
        post(move || async move { Json(json!({ "transcript": transcript })) }),
    )
}

/// Mock Sarvam that always fails
fn sarvam_down() -> Router {
    Router::new().route(
        "/speech-to-text",
        post(|| async { StatusCode::SERVICE_UNAVAILABLE }),
    )
}

/// Mock Gemini that replies with the given text (and no inline audio)
fn gemini_ok(reply: &'static str) -> Router {
    Router::new().route(
        "/v1beta/models/{model}",
        post(move || async move {
            Json(json!({
                "candidates": [{ "content": { "parts": [{ "text": reply }] } }]
            }))
        }),
    )
}

/// Mock Gemini that always fails
fn gemini_down() -> Router {
    Router::new().route(
        "/v1beta/models/{model}",
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    )
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let app = ecovoice_gateway::api::router(unconfigured_state());

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn ready_reports_degraded_without_upstream_keys() {
    let app = ecovoice_gateway::api::router(unconfigured_state());

    let response = app
        .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = response_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["recognition"]["status"], "unavailable");
    assert_eq!(json["checks"]["generation"]["status"], "unavailable");
}

#[tokio::test]
async fn voice_query_without_audio_part_is_rejected() {
    let app = ecovoice_gateway::api::router(unconfigured_state());

    let body = format!("--{BOUNDARY}--\r\n");
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/voice-query")
                .header(
                    "content-type",
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "No audio file provided");
}

#[tokio::test]
async fn voice_query_with_zero_byte_audio_is_rejected() {
    let app = ecovoice_gateway::api::router(unconfigured_state());

    let response = app.oneshot(multipart_request(b"")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "No audio file provided");
}

#[tokio::test]
async fn voice_query_maps_transcription_failure_to_500() {
    let sarvam = spawn_upstream(sarvam_down()).await;
    let gemini = spawn_upstream(gemini_ok("unused")).await;
    let app = ecovoice_gateway::api::router(state_with_upstreams(&sarvam, &gemini));

    let response = app.oneshot(multipart_request(b"fake-wav-bytes")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = response_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Transcription failed");
}

#[tokio::test]
async fn voice_query_round_trip_succeeds() {
    let sarvam = spawn_upstream(sarvam_ok("how do I segregate waste")).await;
    let gemini = spawn_upstream(gemini_ok("Use separate bins for wet and dry waste.")).await;
    let app = ecovoice_gateway::api::router(state_with_upstreams(&sarvam, &gemini));

    let response = app.oneshot(multipart_request(b"fake-wav-bytes")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["transcription"], "how do I segregate waste");
    assert_eq!(
        json["responseText"],
        "Use separate bins for wet and dry waste."
    );
    assert_eq!(json["languageCode"], "en-IN");
    // No inline audio from the mock, so the client falls back locally
    assert!(json.get("audioUrl").is_none());
}

#[tokio::test]
async fn voice_query_detects_hindi_reply() {
    let sarvam = spawn_upstream(sarvam_ok("कचरा कैसे अलग करें")).await;
    let gemini = spawn_upstream(gemini_ok("गीला और सूखा कचरा अलग रखें।")).await;
    let app = ecovoice_gateway::api::router(state_with_upstreams(&sarvam, &gemini));

    let response = app.oneshot(multipart_request(b"fake-wav-bytes")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["languageCode"], "hi-IN");
}

#[tokio::test]
async fn generation_failure_substitutes_apology() {
    let sarvam = spawn_upstream(sarvam_ok("hello")).await;
    let gemini = spawn_upstream(gemini_down()).await;
    let app = ecovoice_gateway::api::router(state_with_upstreams(&sarvam, &gemini));

    let response = app.oneshot(multipart_request(b"fake-wav-bytes")).await.unwrap();

    // Generation never hard-fails the conversation
    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["responseText"], ecovoice_gateway::APOLOGY);
    assert_eq!(json["languageCode"], "en-IN");
}
