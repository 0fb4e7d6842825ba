use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use pagesmith_common::models::{DocId, Post, PostStatus};
use pagesmith_common::Error;

use super::{ApiResult, Ctx};

pub fn router() -> Router<Ctx> {
    Router::new()
        .route("/", post(create_draft))
        .route("/users/{user_id}", get(list_posts))
        .route("/{draft_id}", get(get_draft).put(edit_draft).delete(delete_draft))
        .route("/{draft_id}/accept", put(approve_draft))
        .route("/{draft_id}/reject", put(reject_draft))
}

#[derive(Debug, Deserialize)]
struct CreatePostRequest {
    user_id: String,
    title: String,
    #[serde(default)]
    category: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct EditPostRequest {
    new_title: String,
    new_content: String,
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    status: Option<PostStatus>,
    #[serde(default = "default_limit")]
    limit: i64,
    #[serde(default)]
    skip: u64,
}

fn default_limit() -> i64 {
    10
}

#[derive(Debug, Serialize)]
struct PostResponse {
    id: String,
    user_id: String,
    title: String,
    category: String,
    content: String,
    status: PostStatus,
    user_rate: f64,
    comments: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id.map(|oid| oid.to_hex()).unwrap_or_default(),
            user_id: post.user_id.to_hex(),
            title: post.title,
            category: post.category,
            content: post.content,
            status: post.status,
            user_rate: post.user_rate,
            comments: post.comments,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

async fn create_draft(
    State(ctx): State<Ctx>,
    Json(req): Json<CreatePostRequest>,
) -> ApiResult<(StatusCode, Json<PostResponse>)> {
    let user_id = DocId::parse(&req.user_id)?;
    let mut post = Post::new_draft(user_id.as_object_id(), &req.title, &req.category, &req.content)?;
    let id = ctx.posts.create(&post).await?;
    post.id = Some(id.as_object_id());
    Ok((StatusCode::CREATED, Json(post.into())))
}

async fn list_posts(
    State(ctx): State<Ctx>,
    Path(user_id): Path<String>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<PostResponse>>> {
    let user_id = DocId::parse(&user_id)?;
    let posts = ctx
        .posts
        .list_by_user(user_id, query.status, query.limit, query.skip)
        .await?;
    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

async fn get_draft(
    State(ctx): State<Ctx>,
    Path(draft_id): Path<String>,
) -> ApiResult<Json<PostResponse>> {
    let draft_id = DocId::parse(&draft_id)?;
    let post = ctx.posts.get(draft_id).await?;
    match post {
        Some(post) if post.status == PostStatus::Draft => Ok(Json(post.into())),
        _ => Err(Error::NotFound("draft not found".to_string()).into()),
    }
}

async fn edit_draft(
    State(ctx): State<Ctx>,
    Path(draft_id): Path<String>,
    Json(req): Json<EditPostRequest>,
) -> ApiResult<Json<Value>> {
    let draft_id = DocId::parse(&draft_id)?;
    let report = ctx
        .posts
        .update_content(draft_id, &req.new_title, &req.new_content)
        .await?;
    if !report.found() {
        return Err(Error::NotFound("draft not found".to_string()).into());
    }
    Ok(Json(json!({
        "id": draft_id.to_string(),
        "title": req.new_title,
        "content": req.new_content,
    })))
}

async fn approve_draft(
    State(ctx): State<Ctx>,
    Path(draft_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let draft_id = DocId::parse(&draft_id)?;
    let report = ctx.posts.accept(draft_id).await?;
    if !report.found() {
        return Err(Error::NotFound("draft not found".to_string()).into());
    }
    Ok(Json(json!({ "id": draft_id.to_string(), "status": "accepted" })))
}

async fn reject_draft(
    State(ctx): State<Ctx>,
    Path(draft_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let draft_id = DocId::parse(&draft_id)?;
    let report = ctx.posts.reject(draft_id).await?;
    if !report.found() {
        return Err(Error::NotFound("draft not found".to_string()).into());
    }
    Ok(Json(json!({ "id": draft_id.to_string(), "status": "rejected" })))
}

async fn delete_draft(
    State(ctx): State<Ctx>,
    Path(draft_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let draft_id = DocId::parse(&draft_id)?;
    let deleted = ctx.posts.delete(draft_id).await?;
    if deleted == 0 {
        return Err(Error::NotFound("draft not found".to_string()).into());
    }
    Ok(Json(json!({ "deleted": deleted })))
}
