//! In-memory directory for tests and development.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use hivewatch_core::{Account, Hive, Measurements, Role, SensorReading};

use crate::directory::{AccountChanges, DirectoryStore, StoreError};

#[derive(Debug, Default)]
struct Inner {
    accounts: Vec<Account>,
    roles: Vec<Role>,
    hives: Vec<Hive>,
    readings: Vec<SensorReading>,
    next_reading_id: i64,
}

/// `RwLock`-guarded vectors. Accounts keep insertion order, which is what
/// gives the resolver its "first match in storage order" behavior.
#[derive(Debug, Default)]
pub struct InMemoryDirectoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryDirectoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a role directly, bypassing validation. Test/dev setup only.
    pub fn seed_role(&self, code: &str, description: &str) {
        if let Ok(mut inner) = self.inner.write() {
            inner.roles.push(Role {
                code: code.to_string(),
                description: description.to_string(),
            });
        }
    }

    /// Seed an account row as-is — including legacy plaintext password
    /// material, which the lifecycle service would never write.
    pub fn seed_account(&self, account: Account) {
        if let Ok(mut inner) = self.inner.write() {
            inner.accounts.push(account);
        }
    }

    /// Seed a hive owned by an account.
    pub fn seed_hive(&self, id: &str, owner: &str, description: &str) {
        if let Ok(mut inner) = self.inner.write() {
            inner.hives.push(Hive {
                id: id.to_string(),
                owner: owner.to_string(),
                description: description.to_string(),
            });
        }
    }

    fn joined(inner: &Inner, account: &Account) -> Account {
        let mut account = account.clone();
        account.role_description = inner
            .roles
            .iter()
            .find(|r| r.code == account.role)
            .map(|r| r.description.clone())
            .or(account.role_description);
        account
    }
}

fn fold(s: &str) -> String {
    s.trim().to_lowercase()
}

#[async_trait]
impl DirectoryStore for InMemoryDirectoryStore {
    async fn find_account_by_id(&self, id: &str) -> Result<Option<Account>, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::poisoned("memory.find_account_by_id"))?;
        Ok(inner
            .accounts
            .iter()
            .find(|a| a.active && a.id == id)
            .map(|a| Self::joined(&inner, a)))
    }

    async fn find_account_by_name(
        &self,
        given_name: &str,
        family_name: &str,
    ) -> Result<Option<Account>, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::poisoned("memory.find_account_by_name"))?;
        let given = fold(given_name);
        let family = fold(family_name);
        Ok(inner
            .accounts
            .iter()
            .find(|a| a.active && fold(&a.given_name) == given && fold(&a.family_name) == family)
            .map(|a| Self::joined(&inner, a)))
    }

    async fn account_id_exists(&self, id: &str) -> Result<bool, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::poisoned("memory.account_id_exists"))?;
        Ok(inner.accounts.iter().any(|a| a.id == id))
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::poisoned("memory.list_accounts"))?;
        let mut accounts: Vec<Account> = inner
            .accounts
            .iter()
            .filter(|a| a.active)
            .map(|a| Self::joined(&inner, a))
            .collect();
        accounts.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(accounts)
    }

    async fn insert_account(&self, account: &Account) -> Result<(), StoreError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::poisoned("memory.insert_account"))?;
        // Same uniqueness guarantee the MySQL primary key gives.
        if inner.accounts.iter().any(|a| a.id == account.id) {
            return Err(StoreError::Duplicate(format!(
                "account id '{}' already present",
                account.id
            )));
        }
        inner.accounts.push(account.clone());
        Ok(())
    }

    async fn update_account(&self, id: &str, changes: &AccountChanges) -> Result<(), StoreError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::poisoned("memory.update_account"))?;
        if let Some(account) = inner.accounts.iter_mut().find(|a| a.id == id) {
            account.given_name = changes.given_name.clone();
            account.family_name = changes.family_name.clone();
            account.locality = changes.locality.clone();
            account.role = changes.role.clone();
            account.active = changes.active;
            if let Some(material) = &changes.password_material {
                account.password_material = material.clone();
            }
        }
        Ok(())
    }

    async fn set_account_inactive(&self, id: &str) -> Result<(), StoreError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::poisoned("memory.set_account_inactive"))?;
        if let Some(account) = inner.accounts.iter_mut().find(|a| a.id == id) {
            account.active = false;
        }
        Ok(())
    }

    async fn count_hives_owned_by(&self, owner: &str) -> Result<u64, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::poisoned("memory.count_hives_owned_by"))?;
        Ok(inner.hives.iter().filter(|h| h.owner == owner).count() as u64)
    }

    async fn find_role(&self, code: &str) -> Result<Option<Role>, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::poisoned("memory.find_role"))?;
        Ok(inner.roles.iter().find(|r| r.code == code).cloned())
    }

    async fn list_roles(&self) -> Result<Vec<Role>, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::poisoned("memory.list_roles"))?;
        Ok(inner.roles.clone())
    }

    async fn list_hives(&self) -> Result<Vec<Hive>, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::poisoned("memory.list_hives"))?;
        Ok(inner.hives.clone())
    }

    async fn insert_reading(
        &self,
        node_id: &str,
        topic: &str,
        payload: &str,
    ) -> Result<SensorReading, StoreError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::poisoned("memory.insert_reading"))?;
        inner.next_reading_id += 1;
        let reading = SensorReading {
            id: inner.next_reading_id,
            node_id: node_id.to_string(),
            topic: topic.to_string(),
            payload: payload.to_string(),
            recorded_at: Utc::now(),
            measurements: Measurements::from_payload(payload),
        };
        inner.readings.push(reading.clone());
        Ok(reading)
    }

    async fn recent_readings(
        &self,
        hours: u32,
        limit: u32,
    ) -> Result<Vec<SensorReading>, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::poisoned("memory.recent_readings"))?;
        let cutoff = Utc::now() - Duration::hours(i64::from(hours));
        Ok(inner
            .readings
            .iter()
            .filter(|r| r.recorded_at >= cutoff)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
