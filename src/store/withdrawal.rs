//! Withdrawal workflow. Funds are reserved at submission: the balance is
//! debited when the request is created, and credited back only if an
//! admin rejects it. Approval and payment never move funds again.

use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::Caller;
use crate::error::AppError;
use crate::models::withdrawal::{WithdrawalRequest, WithdrawalStatus};
use crate::store::Store;

impl Store {
    pub async fn submit_withdraw_request(
        &self,
        caller: &Caller,
        phone_number: String,
        amount: u64,
        payment_method: String,
    ) -> Result<WithdrawalRequest, AppError> {
        let id = caller.authenticated()?;
        if amount == 0 {
            return Err(AppError::invalid("amount must be positive"));
        }
        if amount < self.config.min_withdrawal {
            return Err(AppError::invalid(format!(
                "minimum withdrawal is {}",
                self.config.min_withdrawal
            )));
        }
        if phone_number.trim().is_empty() {
            return Err(AppError::invalid("phone number must not be empty"));
        }
        if payment_method.trim().is_empty() {
            return Err(AppError::invalid("payment method must not be empty"));
        }

        let mut state = self.state.write().await;
        let user = state.user_mut(id)?;
        if amount > user.balance {
            return Err(AppError::InsufficientFunds {
                available: user.balance,
                requested: amount,
            });
        }
        user.balance -= amount;
        let balance = user.balance;
        let request = WithdrawalRequest {
            id: Uuid::new_v4(),
            owner: id,
            amount,
            payment_method,
            phone_number,
            submitted_at: chrono::Utc::now(),
            status: WithdrawalStatus::Pending,
        };
        info!(
            user = %id,
            request = %request.id,
            amount,
            balance,
            "withdrawal submitted, funds reserved"
        );
        state.withdrawals.push(request.clone());
        Ok(request)
    }

    /// Admin-only status transition. Rejection refunds the reserved
    /// amount; every other legal transition leaves balances untouched.
    pub async fn update_withdraw_status(
        &self,
        caller: &Caller,
        owner: Uuid,
        request_id: Uuid,
        new_status: WithdrawalStatus,
    ) -> Result<WithdrawalRequest, AppError> {
        caller.require_admin()?;
        let mut state = self.state.write().await;
        let pos = state
            .withdrawals
            .iter()
            .position(|r| r.id == request_id && r.owner == owner)
            .ok_or_else(|| AppError::not_found(format!("withdrawal {request_id}")))?;
        let current = state.withdrawals[pos].status;
        let amount = state.withdrawals[pos].amount;
        if !current.can_transition_to(new_status) {
            return Err(AppError::invalid(format!(
                "cannot move withdrawal from {current:?} to {new_status:?}"
            )));
        }
        if new_status == WithdrawalStatus::Rejected {
            let user = state.user_mut(owner)?;
            user.balance += amount;
            warn!(
                user = %owner,
                request = %request_id,
                amount,
                balance = user.balance,
                "withdrawal rejected, funds refunded"
            );
        } else {
            info!(request = %request_id, ?new_status, "withdrawal status changed");
        }
        state.withdrawals[pos].status = new_status;
        Ok(state.withdrawals[pos].clone())
    }

    pub async fn user_withdraw_history(
        &self,
        caller: &Caller,
    ) -> Result<Vec<WithdrawalRequest>, AppError> {
        let id = caller.authenticated()?;
        let state = self.state.read().await;
        Ok(state
            .withdrawals
            .iter()
            .filter(|r| r.owner == id)
            .cloned()
            .collect())
    }

    pub async fn all_withdraw_requests(
        &self,
        caller: &Caller,
    ) -> Result<Vec<WithdrawalRequest>, AppError> {
        caller.require_admin()?;
        let state = self.state.read().await;
        Ok(state.withdrawals.clone())
    }
}
