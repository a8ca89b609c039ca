use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::Caller;
use crate::error::AppError;
use crate::models::task::WeeklyTaskStats;
use crate::models::user::{UpdateProfileRequest, UserProfile};
use crate::store::Store;

#[derive(Deserialize)]
struct CompleteTaskRequest {
    #[serde(rename = "taskId")]
    task_id: u64,
}

/// Operations that can target another account take it here; absent means
/// the caller themselves. The store enforces the admin-or-self rule.
#[derive(Deserialize)]
struct UserQuery {
    user: Option<Uuid>,
}

impl UserQuery {
    fn target(&self, caller: &Caller) -> Result<Uuid, AppError> {
        match self.user {
            Some(id) => Ok(id),
            None => caller.authenticated(),
        }
    }
}

pub fn routes() -> Router<Arc<Store>> {
    Router::new()
        .route("/api/user/profile", get(get_profile).put(save_profile))
        .route("/api/user/complete_task", post(complete_task))
        .route("/api/user/balance", get(get_balance))
        .route("/api/user/completed_tasks", get(get_completed_tasks))
        .route("/api/user/weekly_stats", get(get_weekly_stats))
        .route("/api/user/points", get(get_points))
}

async fn get_profile(
    State(store): State<Arc<Store>>,
    caller: Caller,
) -> Result<Json<UserProfile>, AppError> {
    Ok(Json(store.get_caller_profile(&caller).await?))
}

async fn save_profile(
    State(store): State<Arc<Store>>,
    caller: Caller,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserProfile>, AppError> {
    Ok(Json(store.save_caller_profile(&caller, req).await?))
}

async fn complete_task(
    State(store): State<Arc<Store>>,
    caller: Caller,
    Json(req): Json<CompleteTaskRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    store.complete_task(&caller, req.task_id).await?;
    Ok(Json(json!({ "status": "task recorded" })))
}

async fn get_balance(
    State(store): State<Arc<Store>>,
    caller: Caller,
) -> Result<Json<serde_json::Value>, AppError> {
    let balance = store.get_balance(&caller).await?;
    Ok(Json(json!({ "balance": balance })))
}

async fn get_completed_tasks(
    State(store): State<Arc<Store>>,
    caller: Caller,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<u64>>, AppError> {
    let target = query.target(&caller)?;
    Ok(Json(store.completed_tasks(&caller, target).await?))
}

async fn get_weekly_stats(
    State(store): State<Arc<Store>>,
    caller: Caller,
    Query(query): Query<UserQuery>,
) -> Result<Json<WeeklyTaskStats>, AppError> {
    let target = query.target(&caller)?;
    Ok(Json(store.weekly_task_stats(&caller, target).await?))
}

async fn get_points(
    State(store): State<Arc<Store>>,
    caller: Caller,
    Query(query): Query<UserQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let target = query.target(&caller)?;
    let points = store.user_points(&caller, target).await?;
    Ok(Json(json!({ "points": points })))
}
