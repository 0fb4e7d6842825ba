use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use pagesmith_common::models::{
    CompetitorAnalysisSlot, CompetitorAnalysisSlotUpdate, DocId, InteractionCheck,
    InteractionCheckUpdate, Schedule, ScheduledPost, ScheduledPostUpdate,
};
use pagesmith_common::traits::repository_traits::UpdateReport;
use pagesmith_common::Error;

use super::{ApiResult, Ctx};

pub fn router() -> Router<Ctx> {
    Router::new()
        .route("/", post(create_schedule))
        .route("/users/{user_id}", get(get_schedule).put(replace_schedule))
        .route("/users/{user_id}/posts", post(add_post))
        .route(
            "/users/{user_id}/posts/{item_id}",
            axum::routing::patch(update_post).delete(remove_post),
        )
        .route("/users/{user_id}/competitor-analysis", post(add_analysis))
        .route(
            "/users/{user_id}/competitor-analysis/{item_id}",
            axum::routing::patch(update_analysis).delete(remove_analysis),
        )
        .route("/users/{user_id}/interaction-checks", post(add_check))
        .route(
            "/users/{user_id}/interaction-checks/{item_id}",
            axum::routing::patch(update_check).delete(remove_check),
        )
}

#[derive(Debug, Deserialize)]
struct ScheduleRequest {
    user_id: String,
    #[serde(default)]
    posts: Vec<ScheduledPost>,
    #[serde(default)]
    competitor_analysis: Vec<CompetitorAnalysisSlot>,
    #[serde(default)]
    interaction_checks: Vec<InteractionCheck>,
}

#[derive(Debug, Serialize)]
struct ScheduleResponse {
    id: String,
    user_id: String,
    posts: Vec<ScheduledPost>,
    competitor_analysis: Vec<CompetitorAnalysisSlot>,
    interaction_checks: Vec<InteractionCheck>,
}

impl From<Schedule> for ScheduleResponse {
    fn from(schedule: Schedule) -> Self {
        Self {
            id: schedule.id.map(|oid| oid.to_hex()).unwrap_or_default(),
            user_id: schedule.user_id.to_hex(),
            posts: schedule.posts,
            competitor_analysis: schedule.competitor_analysis,
            interaction_checks: schedule.interaction_checks,
        }
    }
}

fn report_json(report: UpdateReport) -> Json<Value> {
    Json(json!({
        "matched_count": report.matched,
        "modified_count": report.modified,
    }))
}

fn schedule_not_found(user_id: DocId) -> Error {
    Error::NotFound(format!("schedule for user {} not found", user_id))
}

async fn create_schedule(
    State(ctx): State<Ctx>,
    Json(req): Json<ScheduleRequest>,
) -> ApiResult<(StatusCode, Json<ScheduleResponse>)> {
    let user_id = DocId::parse(&req.user_id)?;
    // Fast-path friendly error; the unique index on user_id is the real guard.
    if ctx.schedules.exists_for_user(user_id).await? {
        return Err(Error::Duplicate("a schedule for this user already exists".to_string()).into());
    }
    let schedule = Schedule {
        id: None,
        user_id: user_id.as_object_id(),
        posts: req.posts,
        competitor_analysis: req.competitor_analysis,
        interaction_checks: req.interaction_checks,
    };
    let created = ctx.schedules.create(schedule).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

async fn get_schedule(
    State(ctx): State<Ctx>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<ScheduleResponse>> {
    let user_id = DocId::parse(&user_id)?;
    let schedule = ctx
        .schedules
        .get_by_user(user_id)
        .await?
        .ok_or_else(|| schedule_not_found(user_id))?;
    Ok(Json(schedule.into()))
}

async fn replace_schedule(
    State(ctx): State<Ctx>,
    Path(user_id): Path<String>,
    Json(req): Json<ScheduleRequest>,
) -> ApiResult<Json<ScheduleResponse>> {
    let user_id = DocId::parse(&user_id)?;
    let schedule = Schedule {
        id: None,
        user_id: user_id.as_object_id(),
        posts: req.posts,
        competitor_analysis: req.competitor_analysis,
        interaction_checks: req.interaction_checks,
    };
    let (report, replaced) = ctx.schedules.replace_by_user(user_id, schedule).await?;
    if !report.found() {
        return Err(schedule_not_found(user_id).into());
    }
    if report.modified == 0 {
        return Err(Error::Validation("no changes were applied".to_string()).into());
    }
    Ok(Json(replaced.into()))
}

async fn add_post(
    State(ctx): State<Ctx>,
    Path(user_id): Path<String>,
    Json(item): Json<ScheduledPost>,
) -> ApiResult<(StatusCode, Json<ScheduledPost>)> {
    let user_id = DocId::parse(&user_id)?;
    let (report, added) = ctx.schedules.add_post(user_id, item).await?;
    if !report.found() {
        return Err(schedule_not_found(user_id).into());
    }
    Ok((StatusCode::CREATED, Json(added)))
}

async fn update_post(
    State(ctx): State<Ctx>,
    Path((user_id, item_id)): Path<(String, String)>,
    Json(update): Json<ScheduledPostUpdate>,
) -> ApiResult<Json<Value>> {
    let user_id = DocId::parse(&user_id)?;
    let report = ctx.schedules.update_post(user_id, &item_id, update).await?;
    if !report.found() {
        return Err(Error::NotFound(format!("scheduled post {} not found", item_id)).into());
    }
    Ok(report_json(report))
}

async fn remove_post(
    State(ctx): State<Ctx>,
    Path((user_id, item_id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    let user_id = DocId::parse(&user_id)?;
    let report = ctx.schedules.remove_post(user_id, &item_id).await?;
    if !report.found() {
        return Err(schedule_not_found(user_id).into());
    }
    if report.modified == 0 {
        return Err(Error::NotFound(format!("scheduled post {} not found", item_id)).into());
    }
    Ok(report_json(report))
}

async fn add_analysis(
    State(ctx): State<Ctx>,
    Path(user_id): Path<String>,
    Json(item): Json<CompetitorAnalysisSlot>,
) -> ApiResult<(StatusCode, Json<CompetitorAnalysisSlot>)> {
    let user_id = DocId::parse(&user_id)?;
    let (report, added) = ctx.schedules.add_competitor_analysis(user_id, item).await?;
    if !report.found() {
        return Err(schedule_not_found(user_id).into());
    }
    Ok((StatusCode::CREATED, Json(added)))
}

async fn update_analysis(
    State(ctx): State<Ctx>,
    Path((user_id, item_id)): Path<(String, String)>,
    Json(update): Json<CompetitorAnalysisSlotUpdate>,
) -> ApiResult<Json<Value>> {
    let user_id = DocId::parse(&user_id)?;
    let report = ctx
        .schedules
        .update_competitor_analysis(user_id, &item_id, update)
        .await?;
    if !report.found() {
        return Err(Error::NotFound(format!("competitor analysis {} not found", item_id)).into());
    }
    Ok(report_json(report))
}

async fn remove_analysis(
    State(ctx): State<Ctx>,
    Path((user_id, item_id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    let user_id = DocId::parse(&user_id)?;
    let report = ctx
        .schedules
        .remove_competitor_analysis(user_id, &item_id)
        .await?;
    if !report.found() {
        return Err(schedule_not_found(user_id).into());
    }
    if report.modified == 0 {
        return Err(Error::NotFound(format!("competitor analysis {} not found", item_id)).into());
    }
    Ok(report_json(report))
}

async fn add_check(
    State(ctx): State<Ctx>,
    Path(user_id): Path<String>,
    Json(item): Json<InteractionCheck>,
) -> ApiResult<(StatusCode, Json<InteractionCheck>)> {
    let user_id = DocId::parse(&user_id)?;
    let (report, added) = ctx.schedules.add_interaction_check(user_id, item).await?;
    if !report.found() {
        return Err(schedule_not_found(user_id).into());
    }
    Ok((StatusCode::CREATED, Json(added)))
}

async fn update_check(
    State(ctx): State<Ctx>,
    Path((user_id, item_id)): Path<(String, String)>,
    Json(update): Json<InteractionCheckUpdate>,
) -> ApiResult<Json<Value>> {
    let user_id = DocId::parse(&user_id)?;
    let report = ctx
        .schedules
        .update_interaction_check(user_id, &item_id, update)
        .await?;
    if !report.found() {
        return Err(Error::NotFound(format!("interaction check {} not found", item_id)).into());
    }
    Ok(report_json(report))
}

async fn remove_check(
    State(ctx): State<Ctx>,
    Path((user_id, item_id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    let user_id = DocId::parse(&user_id)?;
    let report = ctx
        .schedules
        .remove_interaction_check(user_id, &item_id)
        .await?;
    if !report.found() {
        return Err(schedule_not_found(user_id).into());
    }
    if report.modified == 0 {
        return Err(Error::NotFound(format!("interaction check {} not found", item_id)).into());
    }
    Ok(report_json(report))
}
