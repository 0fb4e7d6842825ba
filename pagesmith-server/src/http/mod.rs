//! Route assembly and error-to-response mapping.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::error;

use pagesmith_common::Error;

use crate::context::ServerContext;

pub mod analytics;
pub mod auth;
pub mod base;
pub mod business_info;
pub mod drafts;
pub mod facebook;
pub mod notifications;
pub mod schedule;
pub mod webhook;

pub type Ctx = Arc<ServerContext>;

pub fn router(ctx: Ctx) -> Router {
    Router::new()
        .merge(base::router())
        .nest("/auth", auth::router())
        .nest("/drafts", drafts::router())
        .nest("/schedule", schedule::router())
        .nest("/notifications", notifications::router())
        .nest("/business-info", business_info::router())
        .nest("/analytics", analytics::router())
        .nest("/facebook", facebook::router())
        .nest("/webhook", webhook::router())
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(ctx)
}

/// Wraps the workspace error for axum. Handlers translate the errors they
/// know into specific statuses; everything else becomes a generic 500.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self.0 {
            Error::Validation(_) | Error::InvalidIdentifier(_) => {
                (StatusCode::BAD_REQUEST, self.0.to_string())
            }
            Error::NotFound(_) => (StatusCode::NOT_FOUND, self.0.to_string()),
            Error::Duplicate(_) | Error::SchedulingConflict { .. } => {
                (StatusCode::CONFLICT, self.0.to_string())
            }
            Error::Auth(_) => (StatusCode::UNAUTHORIZED, self.0.to_string()),
            // Relay the upstream status and body; a nominally successful
            // status carrying an error body degrades to 502.
            Error::Upstream { status, body } => {
                let code = StatusCode::from_u16(*status)
                    .ok()
                    .filter(|s| s.is_client_error() || s.is_server_error())
                    .unwrap_or(StatusCode::BAD_GATEWAY);
                (code, body.clone())
            }
            other => {
                error!("internal error: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(error: Error) -> StatusCode {
        ApiError(error).into_response().status()
    }

    #[test]
    fn error_taxonomy_maps_to_statuses() {
        assert_eq!(
            status_of(Error::Validation("bad".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(Error::InvalidIdentifier("xyz".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(Error::NotFound("missing".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(Error::Duplicate("exists".to_string())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(Error::SchedulingConflict {
                list: "posts".to_string(),
                day: "monday".to_string(),
                time: "09:00:00".to_string(),
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(Error::Auth("nope".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(Error::Platform("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn upstream_status_is_relayed() {
        assert_eq!(
            status_of(Error::Upstream {
                status: 403,
                body: "denied".to_string(),
            }),
            StatusCode::FORBIDDEN
        );
        // A success status carrying an error body cannot be relayed as-is.
        assert_eq!(
            status_of(Error::Upstream {
                status: 200,
                body: "rate limited".to_string(),
            }),
            StatusCode::BAD_GATEWAY
        );
    }
}
