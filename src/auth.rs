//! Session boundary: login/logout, session lookup and the `Caller`
//! extractor. The rest of the core only sees a resolved identity + role.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::user::UserRole;
use crate::store::Store;

/// Identity attached to the current request. Requests without a session
/// resolve to a guest caller rather than failing outright, so public
/// operations stay reachable.
#[derive(Debug, Clone, Copy)]
pub struct Caller {
    pub token: Option<Uuid>,
    pub id: Option<Uuid>,
    pub role: UserRole,
}

impl Caller {
    pub const GUEST: Caller = Caller {
        token: None,
        id: None,
        role: UserRole::Guest,
    };

    pub fn user(id: Uuid) -> Caller {
        Caller {
            token: None,
            id: Some(id),
            role: UserRole::User,
        }
    }

    pub fn admin(id: Uuid) -> Caller {
        Caller {
            token: None,
            id: Some(id),
            role: UserRole::Admin,
        }
    }

    pub fn authenticated(&self) -> Result<Uuid, AppError> {
        self.id.ok_or(AppError::Unauthenticated)
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn require_admin(&self) -> Result<Uuid, AppError> {
        let id = self.authenticated()?;
        if self.role != UserRole::Admin {
            return Err(AppError::unauthorized("admin role required"));
        }
        Ok(id)
    }

    /// Admin may act on any account; everyone else only on their own.
    pub fn require_self_or_admin(&self, target: Uuid) -> Result<(), AppError> {
        let id = self.authenticated()?;
        if id != target && self.role != UserRole::Admin {
            return Err(AppError::unauthorized("not the resource owner"));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequest {
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub success: bool,
    pub token: Uuid,
    pub role: UserRole,
}

impl Store {
    /// Verifies the opaque credential by equality and opens a session.
    /// Unapproved non-admin accounts can register but not transact.
    pub async fn login(&self, req: &AuthRequest) -> Result<AuthResponse, AppError> {
        let mut state = self.state.write().await;
        let user = state
            .user_by_username(&req.username)
            .ok_or(AppError::Unauthenticated)?;
        if user.password_hash != req.password_hash {
            return Err(AppError::Unauthenticated);
        }
        if !user.is_approved && user.role != UserRole::Admin {
            return Err(AppError::unauthorized("account pending approval"));
        }
        let (id, role) = (user.id, user.role);
        let token = Uuid::new_v4();
        state.sessions.insert(token, id);
        info!(user = %id, "login");
        Ok(AuthResponse {
            success: true,
            token,
            role,
        })
    }

    pub async fn logout(&self, token: Uuid) {
        let mut state = self.state.write().await;
        state.sessions.remove(&token);
    }

    pub async fn resolve_session(&self, token: Uuid) -> Result<Caller, AppError> {
        let state = self.state.read().await;
        let id = *state.sessions.get(&token).ok_or(AppError::Unauthenticated)?;
        let user = state.user(id)?;
        if !user.is_approved && user.role != UserRole::Admin {
            return Err(AppError::unauthorized("account pending approval"));
        }
        Ok(Caller {
            token: Some(token),
            id: Some(id),
            role: user.role,
        })
    }
}

#[async_trait]
impl FromRequestParts<Arc<Store>> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        store: &Arc<Store>,
    ) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(header::AUTHORIZATION) else {
            return Ok(Caller::GUEST);
        };
        let token = value
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .and_then(|t| t.parse::<Uuid>().ok())
            .ok_or(AppError::Unauthenticated)?;
        store.resolve_session(token).await
    }
}
