//! Payload and API error body models.
//!
//! Document and site payloads are owned by the backend schema and can change
//! without a Lectern release, so they are transparent wrappers around
//! [`serde_json::Value`] rather than typed structs. The error body is the
//! one shape this layer does interpret.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Content Payloads
// ============================================================================

/// A decoded document payload from the content API.
///
/// The schema (node tree, meta data, rendering hints) is owned by the
/// backend; callers pick out what they need via [`DocumentPayload::get`] or
/// take the raw value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentPayload(pub Value);

impl DocumentPayload {
    /// Returns the raw JSON value.
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Consumes the payload and returns the raw JSON value.
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Looks up a top-level key, if the payload is an object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

/// A decoded site payload from the content API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SitePayload(pub Value);

impl SitePayload {
    /// Returns the raw JSON value.
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Consumes the payload and returns the raw JSON value.
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Looks up a top-level key, if the payload is an object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

// ============================================================================
// API Error Body
// ============================================================================

/// The structured error body the backend may return with a non-2xx status.
///
/// ```json
/// {"errors": [{"message": "Node not accessible", "code": 1642345678}]}
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    /// Structured errors, when the backend provides them.
    #[serde(default)]
    pub errors: Option<Vec<ApiErrorDetail>>,
}

/// A single structured backend error.
///
/// Only `message` is guaranteed; everything else the backend sends is kept
/// in `extra` so it survives into logs and error reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    /// Human-readable error message.
    pub message: String,

    /// Any additional fields the backend included.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

// ============================================================================
// Tests
// ============================================================================
