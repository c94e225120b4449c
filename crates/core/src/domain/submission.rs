// Job Submission Domain Model

use crate::domain::error::{DomainError, Result};

/// A job as received over HTTP.
///
/// The body is opaque to this system: it is parsed only far enough to
/// re-encode it canonically, never validated against a schema. No id is
/// assigned and nothing is persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSubmission {
    body: serde_json::Value,
}

impl JobSubmission {
    pub fn new(body: serde_json::Value) -> Self {
        Self { body }
    }

    /// Parse a raw request body. Any JSON value is accepted.
    pub fn from_slice(raw: &[u8]) -> Result<Self> {
        serde_json::from_slice(raw)
            .map(Self::new)
            .map_err(|e| DomainError::InvalidBody(e.to_string()))
    }

    /// Wrap a plain-text body as a JSON string. The body must be UTF-8.
    pub fn from_text(raw: &[u8]) -> Result<Self> {
        std::str::from_utf8(raw)
            .map(|text| Self::new(serde_json::Value::String(text.to_string())))
            .map_err(|e| DomainError::InvalidBody(e.to_string()))
    }

    pub fn body(&self) -> &serde_json::Value {
        &self.body
    }

    /// Canonical JSON encoding: compact, object keys in received order,
    /// integral floats written as integers (`1.0` -> `1`, `1e2` -> `100`).
    pub fn to_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(&canonical_numbers(&self.body))
    }
}

// Largest magnitude still printed without an exponent by JSON.stringify.
const MAX_PLAIN_INTEGER: f64 = 1e21;

fn canonical_numbers(value: &serde_json::Value) -> serde_json::Value {
    use serde_json::Value;

    match value {
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < MAX_PLAIN_INTEGER => {
                integral_number(f).map_or_else(|| value.clone(), Value::Number)
            }
            _ => value.clone(),
        },
        Value::Array(items) => Value::Array(items.iter().map(canonical_numbers).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), canonical_numbers(v)))
                .collect(),
        ),
        _ => value.clone(),
    }
}

fn integral_number(f: f64) -> Option<serde_json::Number> {
    if f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some((f as i64).into())
    } else if f >= 0.0 && f < u64::MAX as f64 {
        Some((f as u64).into())
    } else {
        None
    }
}
