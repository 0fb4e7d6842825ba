use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use super::Ctx;

pub fn router() -> Router<Ctx> {
    Router::new().route("/", get(verify_webhook).post(receive_event))
}

#[derive(Debug, Deserialize)]
struct VerifyParams {
    #[serde(rename = "hub.mode")]
    mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    challenge: Option<String>,
}

/// Returns the challenge to echo back when the subscribe handshake carries
/// the expected verify token.
fn verification_challenge(params: &VerifyParams, expected_token: &str) -> Option<String> {
    if params.mode.as_deref() == Some("subscribe")
        && params.verify_token.as_deref() == Some(expected_token)
    {
        params.challenge.clone()
    } else {
        None
    }
}

async fn verify_webhook(State(ctx): State<Ctx>, Query(params): Query<VerifyParams>) -> Response {
    match verification_challenge(&params, &ctx.settings.webhook_verify_token) {
        Some(challenge) => (StatusCode::OK, challenge).into_response(),
        None => (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "verification failed" })),
        )
            .into_response(),
    }
}

async fn receive_event(Json(payload): Json<Value>) -> Json<Value> {
    info!("webhook event: {}", payload);
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(mode: Option<&str>, token: Option<&str>, challenge: Option<&str>) -> VerifyParams {
        VerifyParams {
            mode: mode.map(String::from),
            verify_token: token.map(String::from),
            challenge: challenge.map(String::from),
        }
    }

    #[test]
    fn subscribe_with_matching_token_echoes_challenge() {
        let p = params(Some("subscribe"), Some("secret"), Some("12345"));
        assert_eq!(verification_challenge(&p, "secret").as_deref(), Some("12345"));
    }

    #[test]
    fn wrong_token_is_rejected() {
        let p = params(Some("subscribe"), Some("guess"), Some("12345"));
        assert!(verification_challenge(&p, "secret").is_none());
    }

    #[test]
    fn missing_mode_is_rejected() {
        let p = params(None, Some("secret"), Some("12345"));
        assert!(verification_challenge(&p, "secret").is_none());
    }
}
