use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use pagesmith_common::models::{DocId, Notification};
use pagesmith_common::Error;

use super::{ApiResult, Ctx};

pub fn router() -> Router<Ctx> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/send", post(send_notification))
        .route("/mark_seen", put(mark_seen))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    user_id: String,
    #[serde(default = "default_limit")]
    limit: i64,
}

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Deserialize)]
struct SendNotificationRequest {
    user_id: String,
    title: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MarkSeenRequest {
    notification_id: String,
}

#[derive(Debug, Serialize)]
struct NotificationResponse {
    id: String,
    user_id: String,
    title: String,
    content: String,
    seen: bool,
    created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationResponse {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id.map(|oid| oid.to_hex()).unwrap_or_default(),
            user_id: n.user_id.to_hex(),
            title: n.title,
            content: n.content,
            seen: n.seen,
            created_at: n.created_at,
        }
    }
}

async fn list_notifications(
    State(ctx): State<Ctx>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<NotificationResponse>>> {
    let user_id = DocId::parse(&query.user_id)?;
    let notifications = ctx.notifications.list_for_user(user_id, query.limit).await?;
    Ok(Json(
        notifications
            .into_iter()
            .map(NotificationResponse::from)
            .collect(),
    ))
}

async fn send_notification(
    State(ctx): State<Ctx>,
    Json(req): Json<SendNotificationRequest>,
) -> ApiResult<(StatusCode, Json<NotificationResponse>)> {
    let user_id = DocId::parse(&req.user_id)?;
    let mut notification = Notification::new(user_id.as_object_id(), &req.title, &req.content)?;
    let id = ctx.notifications.create(&notification).await?;
    notification.id = Some(id.as_object_id());
    Ok((StatusCode::CREATED, Json(notification.into())))
}

async fn mark_seen(
    State(ctx): State<Ctx>,
    Json(req): Json<MarkSeenRequest>,
) -> ApiResult<Json<Value>> {
    let id = DocId::parse(&req.notification_id)?;
    let report = ctx.notifications.mark_seen(id).await?;
    if !report.found() {
        return Err(Error::NotFound("notification not found".to_string()).into());
    }
    Ok(Json(json!({
        "matched_count": report.matched,
        "modified_count": report.modified,
    })))
}
