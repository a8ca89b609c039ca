use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::Caller;
use crate::error::AppError;
use crate::models::task::{Task, TaskUpdate};
use crate::models::user::{UserProfile, UserRole};
use crate::models::withdrawal::{WithdrawalRequest, WithdrawalStatus};
use crate::store::Store;

#[derive(Deserialize)]
struct ApproveRequest {
    approved: bool,
}

#[derive(Deserialize)]
struct AssignRoleRequest {
    role: UserRole,
}

#[derive(Deserialize)]
struct AddBalanceRequest {
    username: String,
    amount: u64,
}

#[derive(Deserialize)]
struct UpdateWithdrawStatusRequest {
    owner: Uuid,
    status: WithdrawalStatus,
}

pub fn routes() -> Router<Arc<Store>> {
    Router::new()
        .route("/api/admin/tasks", post(add_task).put(update_tasks))
        .route("/api/admin/tasks/:id", delete(delete_task))
        .route("/api/admin/users", get(get_all_users))
        .route("/api/admin/users/:id", get(get_user_profile))
        .route("/api/admin/users/:id/approve", post(approve_user))
        .route("/api/admin/users/:id/role", post(assign_role))
        .route("/api/admin/balance", post(add_balance))
        .route("/api/admin/withdrawals", get(get_all_withdrawals))
        .route("/api/admin/withdrawals/:id", put(update_withdraw_status))
}

async fn add_task(
    State(store): State<Arc<Store>>,
    caller: Caller,
    Json(task): Json<Task>,
) -> Result<Json<serde_json::Value>, AppError> {
    store.add_task(&caller, task).await?;
    Ok(Json(json!({ "status": "task added" })))
}

async fn update_tasks(
    State(store): State<Arc<Store>>,
    caller: Caller,
    Json(updates): Json<Vec<TaskUpdate>>,
) -> Result<Json<serde_json::Value>, AppError> {
    store.update_tasks(&caller, updates).await?;
    Ok(Json(json!({ "status": "tasks updated" })))
}

async fn delete_task(
    State(store): State<Arc<Store>>,
    caller: Caller,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>, AppError> {
    store.delete_task(&caller, id).await?;
    Ok(Json(json!({ "status": "task deleted" })))
}

async fn get_all_users(
    State(store): State<Arc<Store>>,
    caller: Caller,
) -> Result<Json<Vec<UserProfile>>, AppError> {
    Ok(Json(store.get_all_users(&caller).await?))
}

async fn get_user_profile(
    State(store): State<Arc<Store>>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<Json<UserProfile>, AppError> {
    Ok(Json(store.get_user_profile(&caller, id).await?))
}

async fn approve_user(
    State(store): State<Arc<Store>>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(req): Json<ApproveRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    store.approve_user(&caller, id, req.approved).await?;
    Ok(Json(json!({ "status": "approval updated" })))
}

async fn assign_role(
    State(store): State<Arc<Store>>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(req): Json<AssignRoleRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    store.assign_role(&caller, id, req.role).await?;
    Ok(Json(json!({ "status": "role updated" })))
}

async fn add_balance(
    State(store): State<Arc<Store>>,
    caller: Caller,
    Json(req): Json<AddBalanceRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let balance = store.add_balance(&caller, &req.username, req.amount).await?;
    Ok(Json(json!({ "balance": balance })))
}

async fn get_all_withdrawals(
    State(store): State<Arc<Store>>,
    caller: Caller,
) -> Result<Json<Vec<WithdrawalRequest>>, AppError> {
    Ok(Json(store.all_withdraw_requests(&caller).await?))
}

async fn update_withdraw_status(
    State(store): State<Arc<Store>>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateWithdrawStatusRequest>,
) -> Result<Json<WithdrawalRequest>, AppError> {
    let request = store
        .update_withdraw_status(&caller, req.owner, id, req.status)
        .await?;
    Ok(Json(request))
}
