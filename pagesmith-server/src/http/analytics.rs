// -----------------------------------
// Analytics routes: recommendations and analyses.
// -----------------------------------
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use mongodb::bson::Document;
use serde::{Deserialize, Serialize};

use pagesmith_common::models::{Analysis, DocId, Recommendation};

use super::{ApiResult, Ctx};

pub fn router() -> Router<Ctx> {
    Router::new()
        .route("/recommendations", post(create_recommendation))
        .route("/recommendations/users/{user_id}", get(list_recommendations))
        .route("/analyses", post(create_analysis))
        .route("/analyses/posts/{post_id}", get(list_analyses_for_post))
        .route("/analyses/users/{user_id}", get(list_analyses_for_user))
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    #[serde(default = "default_limit")]
    limit: i64,
    #[serde(default)]
    skip: u64,
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Deserialize)]
struct RecommendationRequest {
    user_id: String,
    title: String,
    content: String,
    result: Document,
}

#[derive(Debug, Serialize)]
struct RecommendationResponse {
    id: String,
    user_id: String,
    title: String,
    content: String,
    result: Document,
    created_at: DateTime<Utc>,
}

impl From<Recommendation> for RecommendationResponse {
    fn from(r: Recommendation) -> Self {
        Self {
            id: r.id.map(|oid| oid.to_hex()).unwrap_or_default(),
            user_id: r.user_id.to_hex(),
            title: r.title,
            content: r.content,
            result: r.result,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AnalysisRequest {
    post_id: String,
    user_id: String,
    analysis_type: String,
}

#[derive(Debug, Serialize)]
struct AnalysisResponse {
    id: String,
    post_id: String,
    user_id: String,
    analysis_type: String,
    created_at: DateTime<Utc>,
}

impl From<Analysis> for AnalysisResponse {
    fn from(a: Analysis) -> Self {
        Self {
            id: a.id.map(|oid| oid.to_hex()).unwrap_or_default(),
            post_id: a.post_id.to_hex(),
            user_id: a.user_id.to_hex(),
            analysis_type: a.analysis_type,
            created_at: a.created_at,
        }
    }
}

async fn create_recommendation(
    State(ctx): State<Ctx>,
    Json(req): Json<RecommendationRequest>,
) -> ApiResult<(StatusCode, Json<RecommendationResponse>)> {
    let user_id = DocId::parse(&req.user_id)?;
    let mut recommendation =
        Recommendation::new(user_id.as_object_id(), &req.title, &req.content, req.result)?;
    let id = ctx.recommendations.create(&recommendation).await?;
    recommendation.id = Some(id.as_object_id());
    Ok((StatusCode::CREATED, Json(recommendation.into())))
}

async fn list_recommendations(
    State(ctx): State<Ctx>,
    Path(user_id): Path<String>,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<Vec<RecommendationResponse>>> {
    let user_id = DocId::parse(&user_id)?;
    let items = ctx
        .recommendations
        .list_for_user(user_id, page.limit, page.skip)
        .await?;
    Ok(Json(items.into_iter().map(RecommendationResponse::from).collect()))
}

async fn create_analysis(
    State(ctx): State<Ctx>,
    Json(req): Json<AnalysisRequest>,
) -> ApiResult<(StatusCode, Json<AnalysisResponse>)> {
    let post_id = DocId::parse(&req.post_id)?;
    let user_id = DocId::parse(&req.user_id)?;
    let mut analysis = Analysis::new(
        post_id.as_object_id(),
        user_id.as_object_id(),
        &req.analysis_type,
    )?;
    let id = ctx.analyses.create(&analysis).await?;
    analysis.id = Some(id.as_object_id());
    Ok((StatusCode::CREATED, Json(analysis.into())))
}

async fn list_analyses_for_post(
    State(ctx): State<Ctx>,
    Path(post_id): Path<String>,
) -> ApiResult<Json<Vec<AnalysisResponse>>> {
    let post_id = DocId::parse(&post_id)?;
    let items = ctx.analyses.list_for_post(post_id).await?;
    Ok(Json(items.into_iter().map(AnalysisResponse::from).collect()))
}

async fn list_analyses_for_user(
    State(ctx): State<Ctx>,
    Path(user_id): Path<String>,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<Vec<AnalysisResponse>>> {
    let user_id = DocId::parse(&user_id)?;
    let items = ctx
        .analyses
        .list_for_user(user_id, page.limit, page.skip)
        .await?;
    Ok(Json(items.into_iter().map(AnalysisResponse::from).collect()))
}
