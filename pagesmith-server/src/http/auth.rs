use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use mongodb::bson::doc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use pagesmith_common::models::{AccountStatus, DocId, User};
use pagesmith_common::Error;

use super::{ApiResult, Ctx};
use crate::context::ServerContext;

pub fn router() -> Router<Ctx> {
    Router::new()
        .route("/register", post(register))
        .route("/token", post(token))
        .route("/me", get(me))
        .route("/users/{user_id}", delete(delete_user))
        .route("/users/{user_id}/facebook-page", patch(link_facebook_page))
}

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    username: String,
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct TokenRequest {
    username: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct TokenResponse {
    access_token: String,
    token_type: &'static str,
    expires_at: i64,
}

#[derive(Debug, Serialize)]
struct UserResponse {
    id: String,
    username: String,
    email: String,
    account_status: AccountStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    facebook_page_id: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.map(|oid| oid.to_hex()).unwrap_or_default(),
            username: user.username,
            email: user.email,
            account_status: user.account_status,
            facebook_page_id: user.facebook_page_id,
        }
    }
}

/// Resolve the bearer token in `Authorization` to the current user.
pub async fn current_user(ctx: &ServerContext, headers: &HeaderMap) -> Result<User, Error> {
    let header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| Error::Auth("missing bearer token".to_string()))?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| Error::Auth("missing bearer token".to_string()))?;
    let claims = ctx.jwt.validate(token)?;
    let user_id = DocId::parse(&claims.sub)
        .map_err(|_| Error::Auth("could not validate credentials".to_string()))?;
    ctx.users
        .get(user_id)
        .await?
        .ok_or_else(|| Error::Auth("could not validate credentials".to_string()))
}

async fn register(
    State(ctx): State<Ctx>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let id = ctx
        .user_service
        .register(&req.username, &req.email, &req.password)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "signal": "user registered successfully", "id": id.to_string() })),
    ))
}

async fn token(
    State(ctx): State<Ctx>,
    Json(req): Json<TokenRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let user = ctx.user_service.login(&req.username, &req.password).await?;
    let user_id = user.id.map(|oid| oid.to_hex()).unwrap_or_default();
    let (access_token, expires_at) = ctx.jwt.issue(&user_id, &user.username)?;
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
        expires_at,
    }))
}

async fn me(State(ctx): State<Ctx>, headers: HeaderMap) -> ApiResult<Json<UserResponse>> {
    let user = current_user(&ctx, &headers).await?;
    Ok(Json(user.into()))
}

async fn delete_user(
    State(ctx): State<Ctx>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let user_id = DocId::parse(&user_id)?;
    let deleted = ctx.user_service.delete_user(user_id).await?;
    Ok(Json(json!({ "deleted": deleted })))
}

#[derive(Debug, Deserialize)]
struct LinkPageRequest {
    page_id: String,
}

async fn link_facebook_page(
    State(ctx): State<Ctx>,
    Path(user_id): Path<String>,
    Json(req): Json<LinkPageRequest>,
) -> ApiResult<Json<Value>> {
    let user_id = DocId::parse(&user_id)?;
    let report = ctx
        .users
        .update_fields(user_id, doc! { "facebook_page_id": req.page_id })
        .await?;
    if !report.found() {
        return Err(Error::NotFound(format!("user {} not found", user_id)).into());
    }
    Ok(Json(json!({ "matched_count": report.matched, "modified_count": report.modified })))
}
