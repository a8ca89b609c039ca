use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::auth::Caller;
use crate::error::AppError;
use crate::models::withdrawal::WithdrawalRequest;
use crate::store::Store;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitWithdrawRequest {
    phone_number: String,
    amount: u64,
    payment_method: String,
}

pub fn routes() -> Router<Arc<Store>> {
    Router::new().route(
        "/api/withdrawals",
        post(submit_withdraw_request).get(get_withdraw_history),
    )
}

async fn submit_withdraw_request(
    State(store): State<Arc<Store>>,
    caller: Caller,
    Json(req): Json<SubmitWithdrawRequest>,
) -> Result<Json<WithdrawalRequest>, AppError> {
    let request = store
        .submit_withdraw_request(&caller, req.phone_number, req.amount, req.payment_method)
        .await?;
    Ok(Json(request))
}

async fn get_withdraw_history(
    State(store): State<Arc<Store>>,
    caller: Caller,
) -> Result<Json<Vec<WithdrawalRequest>>, AppError> {
    Ok(Json(store.user_withdraw_history(&caller).await?))
}
