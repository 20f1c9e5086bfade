//! The data-access interface consumed by the auth core.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use hivewatch_core::{Account, CoreError, Hive, Role, SensorReading};

/// Storage operation error.
///
/// Infrastructure failures only — domain decisions (missing fields,
/// unknown roles, blocked deletes) are made above this layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique key rejected the write. Surfaces the create/create race
    /// that the pre-insert existence check cannot close on its own.
    #[error("duplicate key: {0}")]
    Duplicate(String),

    /// The underlying store failed. `query` names the originating
    /// statement for the error log.
    #[error("database error on {query}: {message}")]
    Database {
        message: String,
        code: Option<String>,
        query: &'static str,
    },
}

impl StoreError {
    pub(crate) fn poisoned(query: &'static str) -> Self {
        StoreError::Database {
            message: "store lock poisoned".to_string(),
            code: None,
            query,
        }
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(msg) => CoreError::conflict(msg),
            StoreError::Database {
                message,
                code,
                query,
            } => CoreError::Storage {
                message,
                code,
                query: query.to_string(),
            },
        }
    }
}

/// Field set applied by an account update. The service decides up front
/// whether the password rotates: `password_material = None` leaves the
/// stored material byte-for-byte untouched.
#[derive(Debug, Clone)]
pub struct AccountChanges {
    pub given_name: String,
    pub family_name: String,
    pub locality: String,
    pub password_material: Option<String>,
    pub role: String,
    pub active: bool,
}

/// Directory of accounts, roles, hives and sensor readings.
///
/// Every method is a single store round trip. Lookups report not-found as
/// `Ok(None)` / an empty vector; `Err` always means the store itself
/// failed. Implementations must preserve storage order for
/// [`find_account_by_name`](DirectoryStore::find_account_by_name) — the
/// resolver's contract is "first match in storage order".
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// Active account by exact id.
    async fn find_account_by_id(&self, id: &str) -> Result<Option<Account>, StoreError>;

    /// First active account whose trimmed, case-folded name pair matches.
    async fn find_account_by_name(
        &self,
        given_name: &str,
        family_name: &str,
    ) -> Result<Option<Account>, StoreError>;

    /// Whether any row (active or soft-deleted) holds this id. Ids are
    /// never reused, so the duplicate check must see soft-deleted rows.
    async fn account_id_exists(&self, id: &str) -> Result<bool, StoreError>;

    /// Active accounts, ordered by id.
    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError>;

    async fn insert_account(&self, account: &Account) -> Result<(), StoreError>;

    async fn update_account(&self, id: &str, changes: &AccountChanges) -> Result<(), StoreError>;

    /// Flip the soft-delete flag. The row stays put.
    async fn set_account_inactive(&self, id: &str) -> Result<(), StoreError>;

    /// How many hives name this account as owner.
    async fn count_hives_owned_by(&self, owner: &str) -> Result<u64, StoreError>;

    /// Role by code; `Ok(None)` when the code is unknown.
    async fn find_role(&self, code: &str) -> Result<Option<Role>, StoreError>;

    async fn list_roles(&self) -> Result<Vec<Role>, StoreError>;

    async fn list_hives(&self) -> Result<Vec<Hive>, StoreError>;

    /// Persist one reading, returning it with its assigned id and parsed
    /// measurements. Callers validate presence; the payload arrives in its
    /// stored string form.
    async fn insert_reading(
        &self,
        node_id: &str,
        topic: &str,
        payload: &str,
    ) -> Result<SensorReading, StoreError>;

    /// Readings from the last `hours` hours, oldest first, capped at
    /// `limit` rows.
    async fn recent_readings(&self, hours: u32, limit: u32)
        -> Result<Vec<SensorReading>, StoreError>;
}

#[async_trait]
impl<S> DirectoryStore for Arc<S>
where
    S: DirectoryStore + ?Sized,
{
    async fn find_account_by_id(&self, id: &str) -> Result<Option<Account>, StoreError> {
        (**self).find_account_by_id(id).await
    }

    async fn find_account_by_name(
        &self,
        given_name: &str,
        family_name: &str,
    ) -> Result<Option<Account>, StoreError> {
        (**self).find_account_by_name(given_name, family_name).await
    }

    async fn account_id_exists(&self, id: &str) -> Result<bool, StoreError> {
        (**self).account_id_exists(id).await
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        (**self).list_accounts().await
    }

    async fn insert_account(&self, account: &Account) -> Result<(), StoreError> {
        (**self).insert_account(account).await
    }

    async fn update_account(&self, id: &str, changes: &AccountChanges) -> Result<(), StoreError> {
        (**self).update_account(id, changes).await
    }

    async fn set_account_inactive(&self, id: &str) -> Result<(), StoreError> {
        (**self).set_account_inactive(id).await
    }

    async fn count_hives_owned_by(&self, owner: &str) -> Result<u64, StoreError> {
        (**self).count_hives_owned_by(owner).await
    }

    async fn find_role(&self, code: &str) -> Result<Option<Role>, StoreError> {
        (**self).find_role(code).await
    }

    async fn list_roles(&self) -> Result<Vec<Role>, StoreError> {
        (**self).list_roles().await
    }

    async fn list_hives(&self) -> Result<Vec<Hive>, StoreError> {
        (**self).list_hives().await
    }

    async fn insert_reading(
        &self,
        node_id: &str,
        topic: &str,
        payload: &str,
    ) -> Result<SensorReading, StoreError> {
        (**self).insert_reading(node_id, topic, payload).await
    }

    async fn recent_readings(
        &self,
        hours: u32,
        limit: u32,
    ) -> Result<Vec<SensorReading>, StoreError> {
        (**self).recent_readings(hours, limit).await
    }
}
