mod catalog;
mod completion;
mod ledger;
mod referral;
mod withdrawal;

use std::collections::{BTreeMap, HashMap};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::StoreConfig;
use crate::error::AppError;
use crate::models::task::Task;
use crate::models::user::UserAccount;
use crate::models::withdrawal::WithdrawalRequest;

/// Everything the service owns, guarded by a single lock. Each mutating
/// operation takes the write lock once, validates fully, then applies, so
/// check-then-act sequences are race-free and all-or-nothing. Reads take
/// the read lock and observe a consistent snapshot.
pub(crate) struct State {
    pub users: HashMap<Uuid, UserAccount>,
    pub tasks: BTreeMap<u64, Task>,
    pub withdrawals: Vec<WithdrawalRequest>,
    /// Session token -> account id.
    pub sessions: HashMap<Uuid, Uuid>,
}

pub struct Store {
    pub(crate) config: StoreConfig,
    pub(crate) state: RwLock<State>,
}

impl Store {
    pub fn new(config: StoreConfig) -> Self {
        Store {
            config,
            state: RwLock::new(State {
                users: HashMap::new(),
                tasks: BTreeMap::new(),
                withdrawals: Vec::new(),
                sessions: HashMap::new(),
            }),
        }
    }
}

impl State {
    pub fn user(&self, id: Uuid) -> Result<&UserAccount, AppError> {
        self.users
            .get(&id)
            .ok_or_else(|| AppError::not_found(format!("user {id}")))
    }

    pub fn user_mut(&mut self, id: Uuid) -> Result<&mut UserAccount, AppError> {
        self.users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("user {id}")))
    }

    pub fn user_by_username(&self, username: &str) -> Option<&UserAccount> {
        self.users.values().find(|u| u.username == username)
    }

    pub fn user_by_referral_code(&self, code: &str) -> Option<&UserAccount> {
        self.users.values().find(|u| u.referral_code == code)
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use super::Store;
    use crate::auth::Caller;
    use crate::config::StoreConfig;
    use crate::models::task::{Task, TaskStatus};
    use crate::models::user::RegisterRequest;

    pub fn open_task(id: u64, reward: u64) -> Task {
        Task {
            id,
            title: format!("task {id}"),
            description: String::new(),
            reward,
            status: TaskStatus::Open,
        }
    }

    pub fn register_request(username: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            whatsapp_number: "+1000".to_string(),
            group_number: "1".to_string(),
            password_hash: "hash".to_string(),
            referral_code: None,
            referred_by_code: None,
        }
    }

    pub async fn store_with_admin() -> (Store, Caller) {
        let store = Store::new(StoreConfig::default());
        let id = store.seed_admin("admin", "admin-hash").await.unwrap();
        (store, Caller::admin(id))
    }

    /// Registers and approves an account, returning its caller identity.
    pub async fn register_user(store: &Store, username: &str) -> Caller {
        let admin = Caller::admin(store.seed_admin("admin", "admin-hash").await.unwrap());
        let profile = store
            .register_user(register_request(username))
            .await
            .unwrap();
        store.approve_user(&admin, profile.id, true).await.unwrap();
        Caller::user(profile.id)
    }
}
