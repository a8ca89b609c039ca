//! Referral engine. Counts and earnings are derived from the ledger's
//! referral edges on every read; nothing referral-related is stored
//! redundantly, so the values cannot drift.

use crate::auth::Caller;
use crate::error::AppError;
use crate::store::Store;

impl Store {
    pub async fn referral_count(&self, caller: &Caller) -> Result<u64, AppError> {
        let id = caller.authenticated()?;
        let state = self.state.read().await;
        state.user(id)?;
        Ok(state
            .users
            .values()
            .filter(|u| u.referred_by == Some(id))
            .count() as u64)
    }

    /// Fixed percentage of the summed task earnings of every account the
    /// caller referred. Integer division over the sum, so the result is a
    /// pure function of current ledger state.
    pub async fn referral_earnings(&self, caller: &Caller) -> Result<u64, AppError> {
        let id = caller.authenticated()?;
        let state = self.state.read().await;
        state.user(id)?;
        let referred_earnings: u64 = state
            .users
            .values()
            .filter(|u| u.referred_by == Some(id))
            .map(|u| u.total_earnings)
            .sum();
        Ok(referred_earnings * self.config.referral_rate_percent / 100)
    }
}
