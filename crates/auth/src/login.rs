//! Login orchestration: request shape → resolution → verification → token.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use hivewatch_core::{AccountSummary, CoreError};
use hivewatch_store::DirectoryStore;

use crate::password;
use crate::resolver::IdentityResolver;
use crate::token::TokenIssuer;

/// Login request body. Either the identifier or the full name pair must
/// be present, plus the secret. Legacy wire keys accepted as aliases.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "id", alias = "email")]
    pub identifier: Option<String>,
    #[serde(alias = "nombre")]
    pub given_name: Option<String>,
    #[serde(alias = "apellido")]
    pub family_name: Option<String>,
    #[serde(alias = "clave")]
    pub secret: Option<String>,
}

/// A successful login: the minted token plus the resolved identity.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub account: AccountSummary,
}

/// Single-pass login flow, no retries.
///
/// Resolution misses and verification failures are indistinguishable to
/// the caller: both surface as the one generic authentication error, so
/// a probe cannot learn which factor failed.
pub struct Authenticator {
    resolver: IdentityResolver,
    issuer: TokenIssuer,
}

impl Authenticator {
    pub fn new(store: Arc<dyn DirectoryStore>) -> Self {
        Self {
            resolver: IdentityResolver::new(store),
            issuer: TokenIssuer::new(),
        }
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginOutcome, CoreError> {
        let secret = match request.secret.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s,
            _ => return Err(CoreError::validation("secret is required")),
        };

        let has_identifier = is_present(request.identifier.as_deref());
        let has_name_pair =
            is_present(request.given_name.as_deref()) && is_present(request.family_name.as_deref());
        if !has_identifier && !has_name_pair {
            return Err(CoreError::validation(
                "identifier, or given_name and family_name, are required",
            ));
        }

        let account = self
            .resolver
            .resolve(
                request.identifier.as_deref(),
                request.given_name.as_deref(),
                request.family_name.as_deref(),
            )
            .await?
            .ok_or(CoreError::Authentication)?;

        if !password::verify(secret, &account.password_material) {
            warn!(account_id = %account.id, "password verification failed");
            return Err(CoreError::Authentication);
        }

        info!(account_id = %account.id, "login succeeded");
        Ok(LoginOutcome {
            token: self.issuer.issue(&account.id),
            account: account.summary(),
        })
    }
}

fn is_present(value: Option<&str>) -> bool {
    value.map(str::trim).is_some_and(|v| !v.is_empty())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
