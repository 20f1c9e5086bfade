//! `hivewatch-api` — HTTP surface for the apiary platform.

pub mod app;
pub mod middleware;
