//! `hivewatch-auth` — credential authentication and account lifecycle.
//!
//! The only part of the platform with real decision logic: dual-strategy
//! identity resolution, mixed legacy/secure password verification,
//! soft-delete guarded by hive ownership, and idempotent provisioning.
//! HTTP stays out of this crate; storage is reached through
//! [`hivewatch_store::DirectoryStore`].

pub mod login;
pub mod password;
pub mod resolver;
pub mod service;
pub mod token;

pub use login::{Authenticator, LoginOutcome, LoginRequest};
pub use resolver::IdentityResolver;
pub use service::AccountService;
pub use token::TokenIssuer;
