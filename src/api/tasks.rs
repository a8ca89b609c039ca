use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::auth::Caller;
use crate::error::AppError;
use crate::models::task::{Task, TaskStats};
use crate::store::Store;

pub fn routes() -> Router<Arc<Store>> {
    Router::new()
        .route("/api/tasks", get(get_all_tasks))
        .route("/api/tasks/stats", get(get_task_stats))
        .route("/api/tasks/daily", get(get_daily_tasks))
        .route("/api/tasks/by_reward", get(get_tasks_by_reward))
        .route("/api/tasks/:id", get(get_task_by_id))
}

async fn get_all_tasks(State(store): State<Arc<Store>>) -> Json<Vec<Task>> {
    Json(store.get_all_tasks().await)
}

async fn get_task_stats(State(store): State<Arc<Store>>) -> Json<TaskStats> {
    Json(store.task_stats().await)
}

async fn get_task_by_id(
    State(store): State<Arc<Store>>,
    Path(id): Path<u64>,
) -> Result<Json<Task>, AppError> {
    Ok(Json(store.get_task_by_id(id).await?))
}

async fn get_daily_tasks(
    State(store): State<Arc<Store>>,
    caller: Caller,
) -> Result<Json<Vec<Task>>, AppError> {
    Ok(Json(store.daily_tasks(&caller).await?))
}

async fn get_tasks_by_reward(
    State(store): State<Arc<Store>>,
    caller: Caller,
) -> Result<Json<Vec<Task>>, AppError> {
    Ok(Json(store.tasks_by_reward(&caller).await?))
}
