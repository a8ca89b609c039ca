use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UserRole {
    Admin,
    User,
    Guest,
}

/// Immutable record of one task completion. Appended to the owning
/// account's history, never removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCompletion {
    pub task_id: u64,
    pub timestamp: DateTime<Utc>,
}

/// Canonical account record, owned exclusively by the store.
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub whatsapp_number: String,
    pub group_number: String,
    /// Opaque credential material supplied at registration. The core
    /// compares it for equality at login and never re-derives it.
    pub password_hash: String,
    pub referral_code: String,
    pub referred_by: Option<Uuid>,
    pub is_approved: bool,
    pub balance: u64,
    pub total_earnings: u64,
    pub completed_tasks: Vec<TaskCompletion>,
    pub role: UserRole,
}

impl UserAccount {
    pub fn has_completed(&self, task_id: u64) -> bool {
        self.completed_tasks.iter().any(|c| c.task_id == task_id)
    }

    /// Outbound view of the account, without credential material.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            whatsapp_number: self.whatsapp_number.clone(),
            group_number: self.group_number.clone(),
            referral_code: self.referral_code.clone(),
            referred_by: self.referred_by,
            is_approved: self.is_approved,
            balance: self.balance,
            total_earnings: self.total_earnings,
            completed_tasks: self.completed_tasks.clone(),
            role: self.role,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub whatsapp_number: String,
    pub group_number: String,
    pub referral_code: String,
    pub referred_by: Option<Uuid>,
    pub is_approved: bool,
    pub balance: u64,
    pub total_earnings: u64,
    pub completed_tasks: Vec<TaskCompletion>,
    pub role: UserRole,
}

/// Registration payload. Financial and privileged fields (balance, role,
/// approval) are server-computed; anything else a client sends is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub whatsapp_number: String,
    pub group_number: String,
    pub password_hash: String,
    /// The new account's own code. Generated server-side when absent.
    pub referral_code: Option<String>,
    /// Referral code of the account that referred this one.
    pub referred_by_code: Option<String>,
}

/// Caller-editable profile fields. Balance, earnings, role, approval and
/// the completion history are not representable here on purpose.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub whatsapp_number: Option<String>,
    pub group_number: Option<String>,
}
