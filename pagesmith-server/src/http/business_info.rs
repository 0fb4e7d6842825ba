use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use pagesmith_common::models::{BusinessInfo, BusinessResource, DocId};
use pagesmith_common::Error;
use pagesmith_core::platforms::facebook::requests::token;

use super::{ApiResult, Ctx};

pub fn router() -> Router<Ctx> {
    Router::new()
        .route("/", post(create_business_info))
        .route("/users/{user_id}", get(get_business_info).put(update_business_info))
        .route("/users/{user_id}/token", patch(update_facebook_token))
}

#[derive(Debug, Deserialize)]
struct BusinessInfoRequest {
    user_id: String,
    business_name: String,
    field: String,
    description: String,
    #[serde(default)]
    themes: Vec<String>,
    #[serde(default)]
    business_keywords: Vec<String>,
    #[serde(default)]
    long_term_goals: Vec<String>,
    #[serde(default)]
    short_term_goals: Vec<String>,
    #[serde(default)]
    target_audience: Vec<String>,
    #[serde(default)]
    differentiators: Vec<String>,
    resources: Option<Vec<BusinessResource>>,
}

impl BusinessInfoRequest {
    fn into_model(self, user_id: DocId) -> BusinessInfo {
        BusinessInfo {
            id: None,
            user_id: user_id.as_object_id(),
            business_name: self.business_name,
            field: self.field,
            description: self.description,
            themes: self.themes,
            business_keywords: self.business_keywords,
            long_term_goals: self.long_term_goals,
            short_term_goals: self.short_term_goals,
            target_audience: self.target_audience,
            differentiators: self.differentiators,
            resources: self.resources,
            facebook_page_id: None,
            facebook_page_access_token: None,
        }
    }
}

/// The access token never leaves the service; responses carry everything
/// else.
#[derive(Debug, Serialize)]
struct BusinessInfoResponse {
    id: String,
    user_id: String,
    business_name: String,
    field: String,
    description: String,
    themes: Vec<String>,
    business_keywords: Vec<String>,
    long_term_goals: Vec<String>,
    short_term_goals: Vec<String>,
    target_audience: Vec<String>,
    differentiators: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    resources: Option<Vec<BusinessResource>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    facebook_page_id: Option<String>,
}

impl From<BusinessInfo> for BusinessInfoResponse {
    fn from(info: BusinessInfo) -> Self {
        Self {
            id: info.id.map(|oid| oid.to_hex()).unwrap_or_default(),
            user_id: info.user_id.to_hex(),
            business_name: info.business_name,
            field: info.field,
            description: info.description,
            themes: info.themes,
            business_keywords: info.business_keywords,
            long_term_goals: info.long_term_goals,
            short_term_goals: info.short_term_goals,
            target_audience: info.target_audience,
            differentiators: info.differentiators,
            resources: info.resources,
            facebook_page_id: info.facebook_page_id,
        }
    }
}

async fn get_business_info(
    State(ctx): State<Ctx>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<BusinessInfoResponse>> {
    let user_id = DocId::parse(&user_id)?;
    let info = ctx
        .business_info
        .get_by_user(user_id)
        .await?
        .ok_or_else(|| Error::NotFound("business info not found".to_string()))?;
    Ok(Json(info.into()))
}

async fn create_business_info(
    State(ctx): State<Ctx>,
    Json(req): Json<BusinessInfoRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let user_id = DocId::parse(&req.user_id)?;
    // Fast-path friendly error; the unique index on user_id is the real guard.
    if ctx.business_info.exists_for_user(user_id).await? {
        return Err(Error::Duplicate("business info for this user already exists".to_string()).into());
    }
    let info = req.into_model(user_id);
    let id = ctx.business_info.create(&info).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "signal": "business info created", "id": id.to_string() })),
    ))
}

async fn update_business_info(
    State(ctx): State<Ctx>,
    Path(user_id): Path<String>,
    Json(req): Json<BusinessInfoRequest>,
) -> ApiResult<Json<Value>> {
    let user_id = DocId::parse(&user_id)?;
    let existing = ctx
        .business_info
        .get_by_user(user_id)
        .await?
        .ok_or_else(|| Error::NotFound("business info not found".to_string()))?;

    // A full replace keeps the linked page credentials.
    let mut info = req.into_model(user_id);
    info.facebook_page_id = existing.facebook_page_id;
    info.facebook_page_access_token = existing.facebook_page_access_token;

    let report = ctx.business_info.replace_by_user(user_id, &info).await?;
    if !report.found() {
        return Err(Error::NotFound("business info not found".to_string()).into());
    }
    Ok(Json(json!({ "signal": "business info updated" })))
}

#[derive(Debug, Deserialize)]
struct UpdateTokenRequest {
    page_id: String,
    token: String,
}

/// Link a Facebook page: exchange the short-lived token for a long-lived
/// one, then store it encrypted alongside the page id.
async fn update_facebook_token(
    State(ctx): State<Ctx>,
    Path(user_id): Path<String>,
    Json(req): Json<UpdateTokenRequest>,
) -> ApiResult<Json<Value>> {
    let user_id = DocId::parse(&user_id)?;
    if !ctx.business_info.exists_for_user(user_id).await? {
        return Err(Error::NotFound("business info not found".to_string()).into());
    }

    let long_lived = token::exchange_token(
        &ctx.facebook,
        &ctx.settings.facebook_app_id,
        &ctx.settings.facebook_app_secret,
        &req.token,
    )
    .await?;

    ctx.business_info
        .set_page_credentials(user_id, &req.page_id, &long_lived.access_token)
        .await?;
    Ok(Json(json!({ "signal": "facebook credentials updated" })))
}
