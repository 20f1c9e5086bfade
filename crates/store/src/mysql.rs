//! MySQL-backed directory.
//!
//! Connections come from a process-scoped `MySqlPool` created at startup
//! and closed at shutdown; every method checks a connection out for the
//! duration of one statement and returns it on every exit path (pool
//! semantics — there is no manual acquire/release to get wrong).
//!
//! ## Error mapping
//!
//! sqlx errors map to [`StoreError`] as follows: a unique-key violation
//! becomes `Duplicate` (the store-boundary backstop for concurrent
//! creates with the same caller-supplied id); everything else becomes
//! `Database` carrying the driver message, the driver code when present,
//! and the originating statement label for the error log.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::mysql::{MySqlPool, MySqlRow};
use sqlx::Row;
use tracing::instrument;

use hivewatch_core::{Account, Hive, Measurements, Role, SensorReading};

use crate::directory::{AccountChanges, DirectoryStore, StoreError};

/// Directory over the deployed MySQL schema (`schema.sql`).
#[derive(Debug, Clone)]
pub struct MySqlDirectoryStore {
    pool: Arc<MySqlPool>,
}

const SELECT_ACCOUNT: &str = r#"
    SELECT a.id, a.password_material, a.given_name, a.family_name,
           a.locality, a.role, a.active, r.description AS role_description
    FROM accounts a
    LEFT JOIN roles r ON a.role = r.code
"#;

impl MySqlDirectoryStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Drain and close the pool. Called from the shutdown path.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn account_from_row(row: &MySqlRow) -> Result<Account, sqlx::Error> {
    Ok(Account {
        id: row.try_get("id")?,
        password_material: row.try_get("password_material")?,
        given_name: row.try_get("given_name")?,
        family_name: row.try_get("family_name")?,
        locality: row.try_get("locality")?,
        role: row.try_get("role")?,
        role_description: row.try_get("role_description")?,
        active: row.try_get("active")?,
    })
}

fn reading_from_row(row: &MySqlRow) -> Result<SensorReading, sqlx::Error> {
    let payload: String = row.try_get("payload")?;
    let measurements = Measurements::from_payload(&payload);
    Ok(SensorReading {
        id: row.try_get("id")?,
        node_id: row.try_get("node_id")?,
        topic: row.try_get("topic")?,
        payload,
        recorded_at: row.try_get("recorded_at")?,
        measurements,
    })
}

fn map_sqlx_error(query: &'static str, err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) {
            return StoreError::Duplicate(db.message().to_string());
        }
    }
    let code = match &err {
        sqlx::Error::Database(db) => db.code().map(|c| c.to_string()),
        _ => None,
    };
    StoreError::Database {
        message: err.to_string(),
        code,
        query,
    }
}

#[async_trait]
impl DirectoryStore for MySqlDirectoryStore {
    #[instrument(skip(self), err)]
    async fn find_account_by_id(&self, id: &str) -> Result<Option<Account>, StoreError> {
        let sql = format!("{SELECT_ACCOUNT} WHERE a.id = ? AND a.active = 1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("accounts.find_by_id", e))?;
        row.as_ref()
            .map(account_from_row)
            .transpose()
            .map_err(|e| map_sqlx_error("accounts.find_by_id", e))
    }

    #[instrument(skip(self), err)]
    async fn find_account_by_name(
        &self,
        given_name: &str,
        family_name: &str,
    ) -> Result<Option<Account>, StoreError> {
        let sql = format!(
            "{SELECT_ACCOUNT} WHERE a.active = 1 \
             AND LOWER(TRIM(a.given_name)) = LOWER(TRIM(?)) \
             AND LOWER(TRIM(a.family_name)) = LOWER(TRIM(?)) \
             LIMIT 1"
        );
        let row = sqlx::query(&sql)
            .bind(given_name)
            .bind(family_name)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("accounts.find_by_name", e))?;
        row.as_ref()
            .map(account_from_row)
            .transpose()
            .map_err(|e| map_sqlx_error("accounts.find_by_name", e))
    }

    #[instrument(skip(self), err)]
    async fn account_id_exists(&self, id: &str) -> Result<bool, StoreError> {
        // No active filter: soft-deleted rows keep their id forever.
        let row = sqlx::query("SELECT id FROM accounts WHERE id = ?")
            .bind(id)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("accounts.id_exists", e))?;
        Ok(row.is_some())
    }

    #[instrument(skip(self), err)]
    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        let sql = format!("{SELECT_ACCOUNT} WHERE a.active = 1 ORDER BY a.id ASC");
        let rows = sqlx::query(&sql)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("accounts.list", e))?;
        rows.iter()
            .map(account_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| map_sqlx_error("accounts.list", e))
    }

    #[instrument(skip(self, account), fields(account_id = %account.id), err)]
    async fn insert_account(&self, account: &Account) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO accounts \
             (id, password_material, given_name, family_name, locality, role, active) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&account.id)
        .bind(&account.password_material)
        .bind(&account.given_name)
        .bind(&account.family_name)
        .bind(&account.locality)
        .bind(&account.role)
        .bind(account.active)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("accounts.insert", e))?;
        Ok(())
    }

    #[instrument(skip(self, changes), err)]
    async fn update_account(&self, id: &str, changes: &AccountChanges) -> Result<(), StoreError> {
        // Two statement shapes so an unchanged password is truly untouched,
        // not rewritten with the same bytes.
        let result = match &changes.password_material {
            Some(material) => {
                sqlx::query(
                    "UPDATE accounts \
                     SET given_name = ?, family_name = ?, locality = ?, \
                         password_material = ?, role = ?, active = ? \
                     WHERE id = ?",
                )
                .bind(&changes.given_name)
                .bind(&changes.family_name)
                .bind(&changes.locality)
                .bind(material)
                .bind(&changes.role)
                .bind(changes.active)
                .bind(id)
                .execute(&*self.pool)
                .await
            }
            None => {
                sqlx::query(
                    "UPDATE accounts \
                     SET given_name = ?, family_name = ?, locality = ?, \
                         role = ?, active = ? \
                     WHERE id = ?",
                )
                .bind(&changes.given_name)
                .bind(&changes.family_name)
                .bind(&changes.locality)
                .bind(&changes.role)
                .bind(changes.active)
                .bind(id)
                .execute(&*self.pool)
                .await
            }
        };
        result.map_err(|e| map_sqlx_error("accounts.update", e))?;
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn set_account_inactive(&self, id: &str) -> Result<(), StoreError> {
        sqlx::query("UPDATE accounts SET active = 0 WHERE id = ?")
            .bind(id)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("accounts.set_inactive", e))?;
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn count_hives_owned_by(&self, owner: &str) -> Result<u64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS hive_count FROM hives WHERE owner = ?")
            .bind(owner)
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("hives.count_by_owner", e))?;
        let count: i64 = row
            .try_get("hive_count")
            .map_err(|e| map_sqlx_error("hives.count_by_owner", e))?;
        Ok(count as u64)
    }

    #[instrument(skip(self), err)]
    async fn find_role(&self, code: &str) -> Result<Option<Role>, StoreError> {
        let row = sqlx::query("SELECT code, description FROM roles WHERE code = ?")
            .bind(code)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("roles.find", e))?;
        match row {
            Some(row) => {
                let role = Role {
                    code: row
                        .try_get("code")
                        .map_err(|e| map_sqlx_error("roles.find", e))?,
                    description: row
                        .try_get("description")
                        .map_err(|e| map_sqlx_error("roles.find", e))?,
                };
                Ok(Some(role))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self), err)]
    async fn list_roles(&self) -> Result<Vec<Role>, StoreError> {
        let rows = sqlx::query("SELECT code, description FROM roles ORDER BY code ASC")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("roles.list", e))?;
        rows.iter()
            .map(|row| {
                Ok(Role {
                    code: row.try_get("code")?,
                    description: row.try_get("description")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(|e| map_sqlx_error("roles.list", e))
    }

    #[instrument(skip(self), err)]
    async fn list_hives(&self) -> Result<Vec<Hive>, StoreError> {
        let rows = sqlx::query("SELECT id, owner, description FROM hives ORDER BY id ASC")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("hives.list", e))?;
        rows.iter()
            .map(|row| {
                Ok(Hive {
                    id: row.try_get("id")?,
                    owner: row.try_get("owner")?,
                    description: row.try_get("description")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(|e| map_sqlx_error("hives.list", e))
    }

    #[instrument(skip(self, payload), err)]
    async fn insert_reading(
        &self,
        node_id: &str,
        topic: &str,
        payload: &str,
    ) -> Result<SensorReading, StoreError> {
        let recorded_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO sensor_readings (node_id, topic, payload, recorded_at) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(node_id)
        .bind(topic)
        .bind(payload)
        .bind(recorded_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("readings.insert", e))?;

        Ok(SensorReading {
            id: result.last_insert_id() as i64,
            node_id: node_id.to_string(),
            topic: topic.to_string(),
            payload: payload.to_string(),
            recorded_at,
            measurements: Measurements::from_payload(payload),
        })
    }

    #[instrument(skip(self), err)]
    async fn recent_readings(
        &self,
        hours: u32,
        limit: u32,
    ) -> Result<Vec<SensorReading>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, node_id, topic, payload, recorded_at \
             FROM sensor_readings \
             WHERE recorded_at >= DATE_SUB(NOW(), INTERVAL ? HOUR) \
             ORDER BY recorded_at ASC \
             LIMIT ?",
        )
        .bind(hours)
        .bind(limit)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("readings.recent", e))?;
        rows.iter()
            .map(reading_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| map_sqlx_error("readings.recent", e))
    }
}
