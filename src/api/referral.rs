use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::json;

use crate::auth::Caller;
use crate::error::AppError;
use crate::store::Store;

pub fn routes() -> Router<Arc<Store>> {
    Router::new()
        .route("/api/referrals/count", get(get_referral_count))
        .route("/api/referrals/earnings", get(get_referral_earnings))
}

async fn get_referral_count(
    State(store): State<Arc<Store>>,
    caller: Caller,
) -> Result<Json<serde_json::Value>, AppError> {
    let count = store.referral_count(&caller).await?;
    Ok(Json(json!({ "count": count })))
}

async fn get_referral_earnings(
    State(store): State<Arc<Store>>,
    caller: Caller,
) -> Result<Json<serde_json::Value>, AppError> {
    let earnings = store.referral_earnings(&caller).await?;
    Ok(Json(json!({ "earnings": earnings })))
}
