//! User ledger: registration, profiles, approval and admin balance
//! adjustments.

use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::Caller;
use crate::error::AppError;
use crate::models::user::{
    RegisterRequest, UpdateProfileRequest, UserAccount, UserProfile, UserRole,
};
use crate::store::Store;

impl Store {
    /// Creates an account. Username, email and referral code must be
    /// globally unique; a referral edge is recorded when the supplied
    /// referrer code resolves to an existing account.
    pub async fn register_user(&self, req: RegisterRequest) -> Result<UserProfile, AppError> {
        let username = req.username.trim().to_string();
        let email = req.email.trim().to_string();
        if username.is_empty() {
            return Err(AppError::invalid("username must not be empty"));
        }
        if !email.contains('@') {
            return Err(AppError::invalid("malformed email"));
        }
        if req.password_hash.is_empty() {
            return Err(AppError::invalid("missing credential"));
        }

        let mut state = self.state.write().await;
        if state.user_by_username(&username).is_some() {
            return Err(AppError::conflict(format!("username {username}")));
        }
        if state.users.values().any(|u| u.email == email) {
            return Err(AppError::conflict(format!("email {email}")));
        }
        let referral_code = match req.referral_code {
            Some(code) if !code.trim().is_empty() => {
                let code = code.trim().to_string();
                if state.user_by_referral_code(&code).is_some() {
                    return Err(AppError::conflict(format!("referral code {code}")));
                }
                code
            }
            _ => Uuid::new_v4().to_string(),
        };
        let referred_by = req
            .referred_by_code
            .as_deref()
            .and_then(|code| state.user_by_referral_code(code))
            .map(|referrer| referrer.id);

        let account = UserAccount {
            id: Uuid::new_v4(),
            username,
            email,
            whatsapp_number: req.whatsapp_number,
            group_number: req.group_number,
            password_hash: req.password_hash,
            referral_code,
            referred_by,
            is_approved: self.config.auto_approve_users,
            balance: 0,
            total_earnings: 0,
            completed_tasks: Vec::new(),
            role: UserRole::User,
        };
        let profile = account.profile();
        info!(user = %account.id, username = %account.username, "user registered");
        state.users.insert(account.id, account);
        Ok(profile)
    }

    pub async fn get_caller_profile(&self, caller: &Caller) -> Result<UserProfile, AppError> {
        let id = caller.authenticated()?;
        let state = self.state.read().await;
        Ok(state.user(id)?.profile())
    }

    /// Lets the caller edit contact fields only. Balance, earnings, role,
    /// approval and history are server-computed and cannot be set here.
    pub async fn save_caller_profile(
        &self,
        caller: &Caller,
        req: UpdateProfileRequest,
    ) -> Result<UserProfile, AppError> {
        let id = caller.authenticated()?;
        let mut state = self.state.write().await;
        if let Some(email) = &req.email {
            let email = email.trim();
            if !email.contains('@') {
                return Err(AppError::invalid("malformed email"));
            }
            if state.users.values().any(|u| u.email == email && u.id != id) {
                return Err(AppError::conflict(format!("email {email}")));
            }
        }
        let user = state.user_mut(id)?;
        if let Some(email) = req.email {
            user.email = email.trim().to_string();
        }
        if let Some(whatsapp) = req.whatsapp_number {
            user.whatsapp_number = whatsapp;
        }
        if let Some(group) = req.group_number {
            user.group_number = group;
        }
        Ok(user.profile())
    }

    pub async fn get_user_profile(
        &self,
        caller: &Caller,
        user_id: Uuid,
    ) -> Result<UserProfile, AppError> {
        caller.require_self_or_admin(user_id)?;
        let state = self.state.read().await;
        Ok(state.user(user_id)?.profile())
    }

    pub async fn get_all_users(&self, caller: &Caller) -> Result<Vec<UserProfile>, AppError> {
        caller.require_admin()?;
        let state = self.state.read().await;
        Ok(state.users.values().map(|u| u.profile()).collect())
    }

    /// Approval gates non-admin login; `approved = false` doubles as the
    /// soft-disable switch, since accounts are never deleted.
    pub async fn approve_user(
        &self,
        caller: &Caller,
        user_id: Uuid,
        approved: bool,
    ) -> Result<(), AppError> {
        caller.require_admin()?;
        let mut state = self.state.write().await;
        let user = state.user_mut(user_id)?;
        user.is_approved = approved;
        info!(user = %user_id, approved, "approval changed");
        Ok(())
    }

    pub async fn assign_role(
        &self,
        caller: &Caller,
        user_id: Uuid,
        role: UserRole,
    ) -> Result<(), AppError> {
        caller.require_admin()?;
        let mut state = self.state.write().await;
        let user = state.user_mut(user_id)?;
        warn!(user = %user_id, ?role, "role assigned");
        user.role = role;
        Ok(())
    }

    pub async fn get_balance(&self, caller: &Caller) -> Result<u64, AppError> {
        let id = caller.authenticated()?;
        let state = self.state.read().await;
        Ok(state.user(id)?.balance)
    }

    pub async fn add_balance(
        &self,
        caller: &Caller,
        username: &str,
        amount: u64,
    ) -> Result<u64, AppError> {
        caller.require_admin()?;
        if amount == 0 {
            return Err(AppError::invalid("amount must be positive"));
        }
        let mut state = self.state.write().await;
        let user = state
            .user_by_username(username)
            .ok_or_else(|| AppError::not_found(format!("user {username}")))?;
        let id = user.id;
        let user = state.user_mut(id)?;
        user.balance += amount;
        info!(user = %id, amount, balance = user.balance, "balance adjusted");
        Ok(user.balance)
    }

    /// Idempotent startup seed for the configured admin account.
    pub async fn seed_admin(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<Uuid, AppError> {
        let mut state = self.state.write().await;
        if let Some(existing) = state.user_by_username(username) {
            return Ok(existing.id);
        }
        let account = UserAccount {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: format!("{username}@local"),
            whatsapp_number: String::new(),
            group_number: String::new(),
            password_hash: password_hash.to_string(),
            referral_code: Uuid::new_v4().to_string(),
            referred_by: None,
            is_approved: true,
            balance: 0,
            total_earnings: 0,
            completed_tasks: Vec::new(),
            role: UserRole::Admin,
        };
        let id = account.id;
        info!(user = %id, username, "admin seeded");
        state.users.insert(id, account);
        Ok(id)
    }
}
