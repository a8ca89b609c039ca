pub mod admin;
pub mod auth;
pub mod referral;
pub mod tasks;
pub mod user;
pub mod withdraw;
