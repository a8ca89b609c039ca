use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::auth::{AuthRequest, AuthResponse, Caller};
use crate::error::AppError;
use crate::models::user::{RegisterRequest, UserProfile};
use crate::store::Store;

pub fn routes() -> Router<Arc<Store>> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/session", get(session))
}

async fn register(
    State(store): State<Arc<Store>>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<UserProfile>, AppError> {
    let profile = store.register_user(req).await?;
    Ok(Json(profile))
}

async fn login(
    State(store): State<Arc<Store>>,
    Json(req): Json<AuthRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = store.login(&req).await?;
    Ok(Json(response))
}

async fn logout(State(store): State<Arc<Store>>, caller: Caller) -> Json<serde_json::Value> {
    if let Some(token) = caller.token {
        store.logout(token).await;
    }
    Json(json!({ "status": "logged out" }))
}

async fn session(caller: Caller) -> Json<serde_json::Value> {
    Json(json!({
        "loggedIn": caller.id.is_some(),
        "isAdmin": caller.is_admin(),
        "role": caller.role,
    }))
}
