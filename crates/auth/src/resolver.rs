//! Multi-strategy identity resolution.

use std::sync::Arc;

use hivewatch_core::{Account, CoreError};
use hivewatch_store::DirectoryStore;

/// Maps partial credentials to at most one active account.
///
/// Strategy order is strict and short-circuiting:
///
/// 1. A present, non-blank identifier resolves by id — and *consumes* the
///    attempt. When the id matches nothing, resolution is over; a name
///    pair supplied alongside is not consulted.
/// 2. Otherwise a full name pair resolves by trimmed, case-folded
///    equality, first match in storage order.
/// 3. Otherwise: no account.
///
/// Supplying neither input is a request-shape problem and is rejected by
/// the caller before this component runs. Read-only, no side effects.
pub struct IdentityResolver {
    store: Arc<dyn DirectoryStore>,
}

impl IdentityResolver {
    pub fn new(store: Arc<dyn DirectoryStore>) -> Self {
        Self { store }
    }

    pub async fn resolve(
        &self,
        identifier: Option<&str>,
        given_name: Option<&str>,
        family_name: Option<&str>,
    ) -> Result<Option<Account>, CoreError> {
        if let Some(id) = non_blank(identifier) {
            return Ok(self.store.find_account_by_id(id).await?);
        }

        if let (Some(given), Some(family)) = (non_blank(given_name), non_blank(family_name)) {
            return Ok(self.store.find_account_by_name(given, family).await?);
        }

        Ok(None)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use hivewatch_store::InMemoryDirectoryStore;

    fn account(id: &str, given: &str, family: &str) -> Account {
        Account {
            id: id.to_string(),
            password_material: "irrelevant".to_string(),
            given_name: given.to_string(),
            family_name: family.to_string(),
            locality: "Chillán".to_string(),
            role: "API".to_string(),
            role_description: None,
            active: true,
        }
    }

    fn resolver_with(accounts: Vec<Account>) -> IdentityResolver {
        let store = InMemoryDirectoryStore::new();
        for acc in accounts {
            store.seed_account(acc);
        }
        IdentityResolver::new(Arc::new(store))
    }

    #[tokio::test]
    async fn resolves_by_identifier() {
        let resolver = resolver_with(vec![account("USR_1", "Ana", "Soto")]);
        let found = resolver
            .resolve(Some("USR_1"), None, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, "USR_1");
    }

    #[tokio::test]
    async fn identifier_miss_does_not_fall_through_to_names() {
        // The account is findable by name pair, but the presence of an
        // identifier consumes the attempt.
        let resolver = resolver_with(vec![account("USR_7", "Ana", "Soto")]);
        let found = resolver
            .resolve(Some("USR_1"), Some("Ana"), Some("Soto"))
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn blank_identifier_falls_through_to_names() {
        let resolver = resolver_with(vec![account("USR_7", "Ana", "Soto")]);
        let found = resolver
            .resolve(Some("   "), Some("Ana"), Some("Soto"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, "USR_7");
    }

    #[tokio::test]
    async fn name_pair_matches_case_insensitively() {
        let resolver = resolver_with(vec![account("USR_7", "Ana", "Soto")]);
        let found = resolver
            .resolve(None, Some("  aNa "), Some("SOTO"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, "USR_7");
    }

    #[tokio::test]
    async fn half_a_name_pair_resolves_nothing() {
        let resolver = resolver_with(vec![account("USR_7", "Ana", "Soto")]);
        assert!(resolver
            .resolve(None, Some("Ana"), None)
            .await
            .unwrap()
            .is_none());
        assert!(resolver.resolve(None, None, None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn identifier_trims_whitespace() {
        let resolver = resolver_with(vec![account("USR_1", "Ana", "Soto")]);
        let found = resolver
            .resolve(Some("  USR_1  "), None, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, "USR_1");
    }
}
