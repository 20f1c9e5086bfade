//! Account lifecycle: create, update, soft-delete.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use hivewatch_core::{
    Account, AccountSummary, AccountUpdate, CoreError, DeletedAccount, NewAccount,
};
use hivewatch_store::{AccountChanges, DirectoryStore};

use crate::password;

/// Gates every account mutation through validation before touching the
/// store.
///
/// The uniqueness check on create and the hive count before delete are
/// check-then-act sequences without a surrounding transaction. For
/// create, the store's unique key turns the losing insert of a race into
/// a conflict; the count-then-flag sequence of delete has no such
/// backstop and the race window is accepted.
pub struct AccountService {
    store: Arc<dyn DirectoryStore>,
}

impl AccountService {
    pub fn new(store: Arc<dyn DirectoryStore>) -> Self {
        Self { store }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Create
    // ─────────────────────────────────────────────────────────────────────

    /// Provision an account. The caller may pick the id; a blank or absent
    /// id gets a generated one. The secret is always hashed before it is
    /// stored.
    pub async fn create(&self, input: NewAccount) -> Result<AccountSummary, CoreError> {
        let given_name = required(input.given_name.as_deref(), "given_name")?;
        let family_name = required(input.family_name.as_deref(), "family_name")?;
        let locality = required(input.locality.as_deref(), "locality")?;
        let secret = required(input.secret.as_deref(), "secret")?;
        let role_code = required(input.role.as_deref(), "role")?;

        let id = match input.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => generate_account_id(),
        };

        // Soft-deleted rows count: an id is never reused.
        if self.store.account_id_exists(&id).await? {
            return Err(CoreError::conflict(format!(
                "an account with id '{id}' already exists"
            )));
        }

        let role = self
            .store
            .find_role(&role_code)
            .await?
            .ok_or_else(|| CoreError::validation(format!("role '{role_code}' does not exist")))?;

        let account = Account {
            id,
            password_material: password::hash(&secret)?,
            given_name,
            family_name,
            locality,
            role: role.code,
            role_description: Some(role.description),
            active: input.active.map(|f| f.as_bool()).unwrap_or(true),
        };
        self.store.insert_account(&account).await?;

        info!(account_id = %account.id, role = %account.role, "account created");
        Ok(account.summary())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Update
    // ─────────────────────────────────────────────────────────────────────

    /// Replace an account's profile fields. A present, non-blank secret
    /// rotates the password; otherwise the stored material is left
    /// byte-for-byte as it was.
    pub async fn update(
        &self,
        id: &str,
        input: AccountUpdate,
    ) -> Result<AccountSummary, CoreError> {
        let current = self
            .store
            .find_account_by_id(id)
            .await?
            .ok_or_else(|| CoreError::not_found(format!("no active account with id '{id}'")))?;

        let given_name = required(input.given_name.as_deref(), "given_name")?;
        let family_name = required(input.family_name.as_deref(), "family_name")?;
        let locality = required(input.locality.as_deref(), "locality")?;
        let role_code = required(input.role.as_deref(), "role")?;

        let role = self
            .store
            .find_role(&role_code)
            .await?
            .ok_or_else(|| CoreError::validation(format!("role '{role_code}' does not exist")))?;

        let password_material = match input.secret.as_deref().map(str::trim) {
            Some(secret) if !secret.is_empty() => Some(password::hash(secret)?),
            _ => None,
        };
        let rotated = password_material.is_some();

        let changes = AccountChanges {
            given_name,
            family_name,
            locality,
            password_material,
            role: role.code.clone(),
            active: input.active.map(|f| f.as_bool()).unwrap_or(true),
        };
        self.store.update_account(id, &changes).await?;

        info!(account_id = %id, password_rotated = rotated, "account updated");
        Ok(Account {
            id: current.id,
            password_material: String::new(),
            given_name: changes.given_name,
            family_name: changes.family_name,
            locality: changes.locality,
            role: role.code,
            role_description: Some(role.description),
            active: changes.active,
        }
        .summary())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Soft-delete
    // ─────────────────────────────────────────────────────────────────────

    /// Mark an account inactive. Refused while any hive still names the
    /// account as owner — the dependency is reported, never cascaded.
    /// The flag flip is terminal: no reactivation path exists.
    pub async fn delete(&self, id: &str) -> Result<DeletedAccount, CoreError> {
        let account = self
            .store
            .find_account_by_id(id)
            .await?
            .ok_or_else(|| CoreError::not_found(format!("no active account with id '{id}'")))?;

        let hives = self.store.count_hives_owned_by(id).await?;
        if hives > 0 {
            return Err(CoreError::conflict(format!(
                "cannot delete account: {hives} hive(s) still assigned to it; \
                 transfer or remove them first"
            )));
        }

        self.store.set_account_inactive(id).await?;

        info!(account_id = %id, "account soft-deleted");
        Ok(DeletedAccount {
            message: format!(
                "account \"{} {}\" deleted",
                account.given_name, account.family_name
            ),
            id: account.id,
        })
    }

    /// Active accounts in id order, as summaries.
    pub async fn list(&self) -> Result<Vec<AccountSummary>, CoreError> {
        let accounts = self.store.list_accounts().await?;
        Ok(accounts.iter().map(Account::summary).collect())
    }
}

fn required(value: Option<&str>, field: &'static str) -> Result<String, CoreError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(CoreError::validation(format!("{field} is required"))),
    }
}

fn generate_account_id() -> String {
    // UUIDv7: millisecond timestamp + random tail in one identifier.
    format!("USR_{}", Uuid::now_v7().simple())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use hivewatch_store::InMemoryDirectoryStore;

    fn store() -> Arc<InMemoryDirectoryStore> {
        let store = InMemoryDirectoryStore::new();
        store.seed_role("ADM", "Administrador");
        store.seed_role("API", "Apicultor");
        Arc::new(store)
    }

    fn new_account(id: Option<&str>) -> NewAccount {
        NewAccount {
            id: id.map(str::to_string),
            given_name: Some("Ana".to_string()),
            family_name: Some("Soto".to_string()),
            locality: Some("Chillán".to_string()),
            secret: Some("s3cret".to_string()),
            role: Some("ADM".to_string()),
            active: None,
        }
    }

    fn update_body(secret: Option<&str>) -> AccountUpdate {
        AccountUpdate {
            given_name: Some("Ana".to_string()),
            family_name: Some("Soto".to_string()),
            locality: Some("Ñuble".to_string()),
            secret: secret.map(str::to_string),
            role: Some("API".to_string()),
            active: None,
        }
    }

    #[tokio::test]
    async fn create_generates_id_and_hashes_secret() {
        let store = store();
        let service = AccountService::new(store.clone());

        let summary = service.create(new_account(None)).await.unwrap();
        assert!(summary.id.starts_with("USR_"));
        assert!(summary.active);
        assert_eq!(summary.role, "ADM");
        assert_eq!(summary.role_description, "Administrador");

        let stored = store
            .find_account_by_id(&summary.id)
            .await
            .unwrap()
            .unwrap();
        assert!(password::looks_hashed(&stored.password_material));
        assert!(password::verify("s3cret", &stored.password_material));
    }

    #[tokio::test]
    async fn create_reports_each_missing_field_by_name() {
        let service = AccountService::new(store());

        for (field, body) in [
            (
                "given_name",
                NewAccount {
                    given_name: None,
                    ..new_account(None)
                },
            ),
            (
                "family_name",
                NewAccount {
                    family_name: Some("   ".to_string()),
                    ..new_account(None)
                },
            ),
            (
                "locality",
                NewAccount {
                    locality: None,
                    ..new_account(None)
                },
            ),
            (
                "secret",
                NewAccount {
                    secret: Some(String::new()),
                    ..new_account(None)
                },
            ),
            (
                "role",
                NewAccount {
                    role: None,
                    ..new_account(None)
                },
            ),
        ] {
            let err = service.create(body).await.unwrap_err();
            match err {
                CoreError::Validation(msg) => assert!(msg.contains(field), "{msg}"),
                other => panic!("expected validation error for {field}, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn create_rejects_duplicate_id() {
        let service = AccountService::new(store());

        service.create(new_account(Some("USR_1"))).await.unwrap();
        let err = service
            .create(new_account(Some("USR_1")))
            .await
            .unwrap_err();
        match err {
            CoreError::Conflict(msg) => assert!(msg.contains("USR_1")),
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn soft_deleted_id_is_never_reused() {
        let service = AccountService::new(store());

        service.create(new_account(Some("USR_1"))).await.unwrap();
        service.delete("USR_1").await.unwrap();

        let err = service
            .create(new_account(Some("USR_1")))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn create_rejects_unknown_role_by_code() {
        let service = AccountService::new(store());

        let body = NewAccount {
            role: Some("GHOST".to_string()),
            ..new_account(None)
        };
        let err = service.create(body).await.unwrap_err();
        match err {
            CoreError::Validation(msg) => assert!(msg.contains("GHOST")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_honors_explicit_inactive_flag() {
        let store = store();
        let service = AccountService::new(store.clone());

        let body = NewAccount {
            id: Some("USR_OFF".to_string()),
            active: Some(hivewatch_core::ActiveFlag::Bool(false)),
            ..new_account(None)
        };
        let summary = service.create(body).await.unwrap();
        assert!(!summary.active);
        // Inactive from birth: invisible to active reads.
        assert!(store.find_account_by_id("USR_OFF").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_unknown_account_is_not_found() {
        let service = AccountService::new(store());
        let err = service.update("USR_9", update_body(None)).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_without_secret_keeps_material_untouched() {
        let store = store();
        let service = AccountService::new(store.clone());

        let summary = service.create(new_account(None)).await.unwrap();
        let before = store
            .find_account_by_id(&summary.id)
            .await
            .unwrap()
            .unwrap()
            .password_material;

        let updated = service.update(&summary.id, update_body(None)).await.unwrap();
        assert_eq!(updated.locality, "Ñuble");
        assert_eq!(updated.role, "API");

        let after = store
            .find_account_by_id(&summary.id)
            .await
            .unwrap()
            .unwrap()
            .password_material;
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn update_with_secret_rotates_password() {
        let store = store();
        let service = AccountService::new(store.clone());

        let summary = service.create(new_account(None)).await.unwrap();
        service
            .update(&summary.id, update_body(Some("n3w-secret")))
            .await
            .unwrap();

        let stored = store
            .find_account_by_id(&summary.id)
            .await
            .unwrap()
            .unwrap();
        assert!(password::verify("n3w-secret", &stored.password_material));
        assert!(!password::verify("s3cret", &stored.password_material));
    }

    #[tokio::test]
    async fn update_rejects_unknown_role() {
        let service = AccountService::new(store());
        let summary = service.create(new_account(None)).await.unwrap();

        let body = AccountUpdate {
            role: Some("GHOST".to_string()),
            ..update_body(None)
        };
        let err = service.update(&summary.id, body).await.unwrap_err();
        match err {
            CoreError::Validation(msg) => assert!(msg.contains("GHOST")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn delete_unknown_account_is_not_found() {
        let service = AccountService::new(store());
        let err = service.delete("USR_9").await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_is_refused_while_hives_remain() {
        let store = store();
        let service = AccountService::new(store.clone());

        service.create(new_account(Some("USR_1"))).await.unwrap();
        store.seed_hive("H1", "USR_1", "north field");
        store.seed_hive("H2", "USR_1", "south field");

        let err = service.delete("USR_1").await.unwrap_err();
        match err {
            CoreError::Conflict(msg) => assert!(msg.contains('2'), "{msg}"),
            other => panic!("expected conflict, got {other:?}"),
        }

        // Still resolvable: the delete did not happen.
        assert!(store.find_account_by_id("USR_1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn delete_without_hives_hides_the_account() {
        let store = store();
        let service = AccountService::new(store.clone());

        service.create(new_account(Some("USR_1"))).await.unwrap();
        let deleted = service.delete("USR_1").await.unwrap();
        assert_eq!(deleted.id, "USR_1");
        assert!(deleted.message.contains("Ana Soto"));

        assert!(store.find_account_by_id("USR_1").await.unwrap().is_none());
        // Second delete: the account is already gone from active reads.
        let err = service.delete("USR_1").await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_returns_active_summaries_only() {
        let store = store();
        let service = AccountService::new(store.clone());

        service.create(new_account(Some("USR_1"))).await.unwrap();
        service.create(new_account(Some("USR_2"))).await.unwrap();
        service.delete("USR_2").await.unwrap();

        let listed = service.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, "USR_1");
    }
}
