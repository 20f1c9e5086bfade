//! Opaque session token construction.

use chrono::Utc;

/// Namespace prefixed to every issued token.
pub const TOKEN_NAMESPACE: &str = "hivewatch";

/// Mints session tokens of the form `{namespace}_{account_id}_{millis}`.
///
/// The token is an opaque string with no cryptographic weight, no expiry
/// and no revocation — that is the deployed contract, preserved here
/// rather than silently upgraded. Uniqueness rides on the millisecond
/// timestamp: two tokens minted for the same account within one tick are
/// identical, and the issuer does not distinguish them.
#[derive(Debug, Clone, Default)]
pub struct TokenIssuer;

impl TokenIssuer {
    pub fn new() -> Self {
        Self
    }

    pub fn issue(&self, account_id: &str) -> String {
        format!(
            "{TOKEN_NAMESPACE}_{account_id}_{}",
            Utc::now().timestamp_millis()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_has_namespace_id_and_timestamp() {
        let token = TokenIssuer::new().issue("USR_1");
        let prefix = format!("{TOKEN_NAMESPACE}_USR_1_");
        assert!(token.starts_with(&prefix));
        let millis: i64 = token[prefix.len()..].parse().unwrap();
        assert!(millis > 0);
    }

    #[test]
    fn same_tick_tokens_collide_by_design() {
        // Underscores in the account id make the tail ambiguous to parse,
        // but the issuer's only promise is the structural format.
        let issuer = TokenIssuer::new();
        let a = issuer.issue("USR_X");
        let b = issuer.issue("USR_X");
        let strip = |t: &str| t.rsplit_once('_').map(|(head, _)| head.to_string());
        assert_eq!(strip(&a), strip(&b));
    }
}
