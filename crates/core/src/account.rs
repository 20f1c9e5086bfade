//! Account, role and hive records.
//!
//! Accounts are the identity unit of the platform: a string id doubles as
//! the login identifier, the name pair is a secondary identity key, and
//! `active = false` means soft-deleted. The wire representations keep the
//! field names the deployed dashboard already consumes (`nombre`,
//! `apellido`, `comuna`, `rol`, `activo` as a 0/1 integer); request bodies
//! additionally accept those legacy keys as aliases.

use serde::{Deserialize, Serialize, Serializer};

// ─────────────────────────────────────────────────────────────────────────────
// Account
// ─────────────────────────────────────────────────────────────────────────────

/// A persisted account record, password material included.
///
/// This type never crosses the HTTP boundary — handlers return
/// [`AccountSummary`], which drops the password material.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// Globally unique, immutable once created. Doubles as the login
    /// identifier. Never reused, not even after soft-delete.
    pub id: String,
    /// Either a bcrypt hash (`$2a$`/`$2b$`/`$2y$` tagged) or a legacy
    /// plaintext secret. The verifier accepts both; writes always hash.
    pub password_material: String,
    pub given_name: String,
    pub family_name: String,
    pub locality: String,
    /// Role code, validated against the role catalog at write time.
    pub role: String,
    /// Human-readable role description when the read joined the catalog.
    pub role_description: Option<String>,
    /// `false` = soft-deleted: excluded from reads and from login.
    pub active: bool,
}

impl Account {
    /// Public view of the account, without password material.
    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            id: self.id.clone(),
            given_name: self.given_name.clone(),
            family_name: self.family_name.clone(),
            locality: self.locality.clone(),
            role: self.role.clone(),
            role_description: self
                .role_description
                .clone()
                .unwrap_or_else(|| "Usuario".to_string()),
            active: self.active,
        }
    }
}

/// What the API returns for an account. Serializes with the legacy wire
/// keys; `activo` is the 0/1 integer the dashboard expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountSummary {
    pub id: String,
    #[serde(rename = "nombre")]
    pub given_name: String,
    #[serde(rename = "apellido")]
    pub family_name: String,
    #[serde(rename = "comuna")]
    pub locality: String,
    #[serde(rename = "rol")]
    pub role: String,
    #[serde(rename = "rol_nombre")]
    pub role_description: String,
    #[serde(rename = "activo", serialize_with = "bool_as_int")]
    pub active: bool,
}

fn bool_as_int<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(if *value { 1 } else { 0 })
}

// ─────────────────────────────────────────────────────────────────────────────
// Write payloads
// ─────────────────────────────────────────────────────────────────────────────

/// `true`/`false` or the legacy 0/1 integer.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ActiveFlag {
    Bool(bool),
    Int(i64),
}

impl ActiveFlag {
    pub fn as_bool(self) -> bool {
        match self {
            ActiveFlag::Bool(b) => b,
            ActiveFlag::Int(n) => n != 0,
        }
    }
}

/// Create-account request. Every field is optional at the parsing layer so
/// the account service can report each missing field by name instead of a
/// generic deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewAccount {
    pub id: Option<String>,
    #[serde(alias = "nombre")]
    pub given_name: Option<String>,
    #[serde(alias = "apellido")]
    pub family_name: Option<String>,
    #[serde(alias = "comuna")]
    pub locality: Option<String>,
    #[serde(alias = "clave")]
    pub secret: Option<String>,
    #[serde(alias = "rol")]
    pub role: Option<String>,
    #[serde(alias = "activo")]
    pub active: Option<ActiveFlag>,
}

/// Update-account request. The secret is the only truly optional field:
/// absent or blank means the stored password material stays untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountUpdate {
    #[serde(alias = "nombre")]
    pub given_name: Option<String>,
    #[serde(alias = "apellido")]
    pub family_name: Option<String>,
    #[serde(alias = "comuna")]
    pub locality: Option<String>,
    #[serde(alias = "clave")]
    pub secret: Option<String>,
    #[serde(alias = "rol")]
    pub role: Option<String>,
    #[serde(alias = "activo")]
    pub active: Option<ActiveFlag>,
}

/// Confirmation returned by a successful soft-delete.
#[derive(Debug, Clone, Serialize)]
pub struct DeletedAccount {
    pub message: String,
    pub id: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Role and hive
// ─────────────────────────────────────────────────────────────────────────────

/// A role catalog entry. Referenced by accounts, never cascaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    #[serde(rename = "rol")]
    pub code: String,
    #[serde(rename = "descripcion")]
    pub description: String,
}

/// A beehive owned by an account. Owning at least one blocks soft-delete
/// of the owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hive {
    pub id: String,
    pub owner: String,
    pub description: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Account {
        Account {
            id: "USR_1".to_string(),
            password_material: "$2b$12$abcdefghijklmnopqrstuv".to_string(),
            given_name: "Ana".to_string(),
            family_name: "Soto".to_string(),
            locality: "Chillán".to_string(),
            role: "ADM".to_string(),
            role_description: Some("Administrador".to_string()),
            active: true,
        }
    }

    #[test]
    fn summary_drops_password_material() {
        let json = serde_json::to_value(account().summary()).unwrap();
        assert!(json.get("password_material").is_none());
        assert!(json.get("clave").is_none());
    }

    #[test]
    fn summary_uses_legacy_wire_keys() {
        let json = serde_json::to_value(account().summary()).unwrap();
        assert_eq!(json["nombre"], "Ana");
        assert_eq!(json["apellido"], "Soto");
        assert_eq!(json["comuna"], "Chillán");
        assert_eq!(json["rol"], "ADM");
        assert_eq!(json["rol_nombre"], "Administrador");
        assert_eq!(json["activo"], 1);
    }

    #[test]
    fn summary_defaults_role_description() {
        let mut acc = account();
        acc.role_description = None;
        assert_eq!(acc.summary().role_description, "Usuario");
    }

    #[test]
    fn inactive_serializes_as_zero() {
        let mut acc = account();
        acc.active = false;
        let json = serde_json::to_value(acc.summary()).unwrap();
        assert_eq!(json["activo"], 0);
    }

    #[test]
    fn new_account_accepts_legacy_keys() {
        let body: NewAccount = serde_json::from_str(
            r#"{"nombre":"Ana","apellido":"Soto","comuna":"Chillán","clave":"s3cret","rol":"ADM","activo":1}"#,
        )
        .unwrap();
        assert_eq!(body.given_name.as_deref(), Some("Ana"));
        assert_eq!(body.secret.as_deref(), Some("s3cret"));
        assert_eq!(body.role.as_deref(), Some("ADM"));
        assert!(body.active.unwrap().as_bool());
    }

    #[test]
    fn new_account_accepts_current_keys() {
        let body: NewAccount = serde_json::from_str(
            r#"{"given_name":"Ana","family_name":"Soto","locality":"Chillán","secret":"s3cret","role":"ADM","active":false}"#,
        )
        .unwrap();
        assert_eq!(body.family_name.as_deref(), Some("Soto"));
        assert!(!body.active.unwrap().as_bool());
    }
}
