//! Sensor readings posted by field nodes.
//!
//! Nodes publish a free-form JSON payload per reading. The interesting
//! measurements (temperature, humidity, weight, GPS) are extracted
//! best-effort: a missing or malformed field becomes `None`, never an
//! ingestion error — field firmware is not trusted to be well-behaved.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A stored sensor reading with its parsed measurements.
///
/// Wire keys (`nodo_id`, `topico`, `fecha`, `temperatura`, …) match what
/// the dashboard charts already read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub id: i64,
    #[serde(rename = "nodo_id")]
    pub node_id: String,
    #[serde(rename = "topico")]
    pub topic: String,
    /// Raw payload as received, for debugging and replay.
    pub payload: String,
    #[serde(rename = "fecha")]
    pub recorded_at: DateTime<Utc>,
    #[serde(flatten)]
    pub measurements: Measurements,
}

/// Measurements extracted from a reading payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    #[serde(rename = "temperatura")]
    pub temperature: Option<f64>,
    #[serde(rename = "humedad")]
    pub humidity: Option<f64>,
    #[serde(rename = "peso")]
    pub weight: Option<f64>,
    #[serde(rename = "latitud")]
    pub latitude: Option<f64>,
    #[serde(rename = "longitud")]
    pub longitude: Option<f64>,
}

impl Measurements {
    /// Parse a raw payload. Nodes report numbers either as JSON numbers or
    /// as fixed-point strings ("25.4"), so both are accepted.
    pub fn from_payload(raw: &str) -> Self {
        let value: Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(_) => return Self::default(),
        };
        Self {
            temperature: number_field(&value, "temperatura"),
            humidity: number_field(&value, "humedad"),
            weight: number_field(&value, "peso"),
            latitude: number_field(&value, "latitud"),
            longitude: number_field(&value, "longitud"),
        }
    }
}

fn number_field(payload: &Value, key: &str) -> Option<f64> {
    match payload.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Ingest request for a reading. Legacy key aliases accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewReading {
    #[serde(alias = "nodo_id")]
    pub node_id: Option<String>,
    #[serde(alias = "topico")]
    pub topic: Option<String>,
    /// Object or pre-serialized string; stored verbatim either way.
    pub payload: Option<Value>,
}

impl NewReading {
    /// The payload as the string form it is stored in.
    pub fn payload_text(&self) -> Option<String> {
        match self.payload.as_ref()? {
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}
