use once_cell::sync::Lazy;
use std::env;

pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);

/// Process-level configuration, read once from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub admin_username: Option<String>,
    pub admin_password_hash: Option<String>,
    pub store: StoreConfig,
}

/// Tunables the store consults on every relevant operation.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub min_withdrawal: u64,
    pub referral_rate_percent: u64,
    pub auto_approve_users: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            min_withdrawal: 10,
            referral_rate_percent: 10,
            auto_approve_users: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = StoreConfig::default();
        Config {
            bind_addr: env_or("BIND_ADDR", "0.0.0.0:8080"),
            admin_username: env::var("ADMIN_USERNAME").ok(),
            admin_password_hash: env::var("ADMIN_PASSWORD_HASH").ok(),
            store: StoreConfig {
                min_withdrawal: env_parsed("MIN_WITHDRAWAL", defaults.min_withdrawal),
                referral_rate_percent: env_parsed(
                    "REFERRAL_RATE_PERCENT",
                    defaults.referral_rate_percent,
                ),
                auto_approve_users: env_parsed("AUTO_APPROVE_USERS", defaults.auto_approve_users),
            },
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
