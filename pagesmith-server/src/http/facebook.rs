// facebook.rs — proxy routes to the Graph API gateway.
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use pagesmith_core::platforms::facebook::requests::{comments, feed, messages, pages, token};

use super::{ApiResult, Ctx};

pub fn router() -> Router<Ctx> {
    Router::new()
        .route("/upload_post", post(upload_post))
        .route("/page_info", get(page_info))
        .route("/update_post", post(update_post))
        .route("/reply_for_message", post(reply_for_message))
        .route("/reply_for_comment", post(reply_for_comment))
        .route("/search_for_pages", post(search_for_pages))
        .route("/chat_history", get(chat_history))
        .route("/fetch_page_messages", post(fetch_page_messages))
        .route("/fetch_page_feed_interactions", post(fetch_page_feed_interactions))
        .route("/exchange_token", post(exchange_token))
}

#[derive(Debug, Deserialize)]
struct UploadPostRequest {
    page_id: String,
    page_access_token: String,
    message: String,
}

async fn upload_post(
    State(ctx): State<Ctx>,
    Json(req): Json<UploadPostRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let published =
        feed::publish_post(&ctx.facebook, &req.page_id, &req.page_access_token, &req.message)
            .await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": published.id }))))
}

#[derive(Debug, Deserialize)]
struct PageInfoQuery {
    page_id: String,
    page_access_token: String,
}

async fn page_info(
    State(ctx): State<Ctx>,
    Query(query): Query<PageInfoQuery>,
) -> ApiResult<Json<pages::PageInfo>> {
    let info = pages::page_info(&ctx.facebook, &query.page_id, &query.page_access_token).await?;
    Ok(Json(info))
}

#[derive(Debug, Deserialize)]
struct UpdatePostRequest {
    post_id: String,
    page_access_token: String,
    #[serde(flatten)]
    edit: feed::PostEdit,
}

async fn update_post(
    State(ctx): State<Ctx>,
    Json(req): Json<UpdatePostRequest>,
) -> ApiResult<Json<Value>> {
    feed::update_post(&ctx.facebook, &req.post_id, &req.page_access_token, &req.edit).await?;
    Ok(Json(json!({ "success": true, "updated_fields": req.edit })))
}

#[derive(Debug, Deserialize)]
struct ReplyMessageRequest {
    page_id: String,
    psid: String,
    reply_text: String,
    facebook_page_access_token: String,
    #[serde(default = "default_messaging_type")]
    message_type: String,
}

fn default_messaging_type() -> String {
    "RESPONSE".to_string()
}

async fn reply_for_message(
    State(ctx): State<Ctx>,
    Json(req): Json<ReplyMessageRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let result = messages::reply_to_message(
        &ctx.facebook,
        &req.page_id,
        &req.facebook_page_access_token,
        &req.psid,
        &req.reply_text,
        &req.message_type,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(result)))
}

#[derive(Debug, Deserialize)]
struct ReplyCommentRequest {
    comment_id: String,
    reply: String,
    access_token: String,
}

async fn reply_for_comment(
    State(ctx): State<Ctx>,
    Json(req): Json<ReplyCommentRequest>,
) -> ApiResult<Json<Value>> {
    let result =
        comments::reply_to_comment(&ctx.facebook, &req.comment_id, &req.access_token, &req.reply)
            .await?;
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
struct SearchPagesRequest {
    keywords: Vec<String>,
    page_access_token: String,
    #[serde(default = "default_search_limit")]
    limit: u32,
}

fn default_search_limit() -> u32 {
    5
}

async fn search_for_pages(
    State(ctx): State<Ctx>,
    Json(req): Json<SearchPagesRequest>,
) -> ApiResult<Json<Value>> {
    let results =
        pages::search_pages(&ctx.facebook, &req.keywords, &req.page_access_token, req.limit)
            .await?;
    Ok(Json(json!({ "keywords": req.keywords, "results": results })))
}

#[derive(Debug, Deserialize)]
struct ChatHistoryQuery {
    page_id: String,
    chat_id: String,
    page_access_token: String,
}

async fn chat_history(
    State(ctx): State<Ctx>,
    Query(query): Query<ChatHistoryQuery>,
) -> ApiResult<Json<Value>> {
    let history =
        messages::chat_history(&ctx.facebook, &query.chat_id, &query.page_access_token).await?;
    Ok(Json(json!({
        "page_id": query.page_id,
        "chat_id": query.chat_id,
        "messages": history,
    })))
}

#[derive(Debug, Deserialize)]
struct PageFetchRequest {
    page_id: String,
    access_token: String,
}

async fn fetch_page_messages(
    State(ctx): State<Ctx>,
    Json(req): Json<PageFetchRequest>,
) -> ApiResult<Json<Vec<Value>>> {
    let conversations =
        messages::page_conversations(&ctx.facebook, &req.page_id, &req.access_token).await?;
    Ok(Json(conversations))
}

async fn fetch_page_feed_interactions(
    State(ctx): State<Ctx>,
    Json(req): Json<PageFetchRequest>,
) -> ApiResult<Json<Vec<Value>>> {
    let interactions = feed::page_feed(&ctx.facebook, &req.page_id, &req.access_token).await?;
    Ok(Json(interactions))
}

#[derive(Debug, Deserialize)]
struct ExchangeTokenRequest {
    short_lived_token: String,
}

async fn exchange_token(
    State(ctx): State<Ctx>,
    Json(req): Json<ExchangeTokenRequest>,
) -> ApiResult<Json<Value>> {
    let long_lived = token::exchange_token(
        &ctx.facebook,
        &ctx.settings.facebook_app_id,
        &ctx.settings.facebook_app_secret,
        &req.short_lived_token,
    )
    .await?;
    Ok(Json(json!({ "access_token": long_lived.access_token })))
}
