//! `hivewatch-core` — shared domain types for the apiary platform.
//!
//! This crate is intentionally free of I/O and HTTP concerns: account and
//! role records, sensor readings, and the error taxonomy live here so the
//! auth core, the storage adapters and the API surface all speak the same
//! language.

pub mod account;
pub mod error;
pub mod telemetry;

pub use account::{
    Account, AccountSummary, AccountUpdate, ActiveFlag, DeletedAccount, Hive, NewAccount, Role,
};
pub use error::{CoreError, CoreResult};
pub use telemetry::{Measurements, NewReading, SensorReading};
