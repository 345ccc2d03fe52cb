//! Envelope codec.
//!
//! # Inbound format
//!
//! ```json
//! { "eventName": "invokeMethod", "eventData": "{\"methodName\":\"findApps\"}" }
//! ```
//!
//! `eventData` is itself a JSON-encoded string. An object is accepted as well.
//!
//! # Outbound format
//!
//! ```json
//! { "eventName": "process", "eventData": { ... }, "source": "blaze" }
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Marker identifying the bridge as the origin of outbound events.
pub const DEFAULT_SOURCE: &str = "blaze";

// ============================================================================
// OutboundEvent
// ============================================================================

/// An event sent from the host to the content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundEvent {
    /// Event name.
    #[serde(rename = "eventName")]
    pub event_name: String,

    /// Event payload.
    #[serde(rename = "eventData")]
    pub event_data: Value,

    /// Origin marker.
    pub source: String,
}

impl OutboundEvent {
    /// Creates a new outbound event.
    #[inline]
    #[must_use]
    pub fn new(event_name: impl Into<String>, event_data: Value, source: impl Into<String>) -> Self {
        Self {
            event_name: event_name.into(),
            event_data,
            source: source.into(),
        }
    }

    /// Serializes the envelope to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if the payload cannot be serialized.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Builds the script that hands this envelope to the content.
    ///
    /// The content exposes a global `function` taking one stringified JSON
    /// argument. Line and paragraph separators are escaped so the literal
    /// stays valid script source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if the payload cannot be serialized.
    pub fn to_script(&self, function: &str) -> Result<String> {
        let json = self
            .to_json()?
            .replace('\u{2028}', "\\u2028")
            .replace('\u{2029}', "\\u2029");
        Ok(format!("{function}(JSON.stringify({json}))"))
    }
}

// ============================================================================
// InboundEvent
// ============================================================================

/// An event raised by the content through the native interface.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEvent {
    /// Event name, never empty.
    pub event_name: String,

    /// Event payload, an empty object when absent or unparseable.
    pub event_data: Map<String, Value>,
}

impl InboundEvent {
    /// Parses a raw envelope received from the content.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedEvent`] if the envelope is not a JSON object
    /// or has no non-empty string `eventName`.
    pub fn from_json(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| Error::malformed(format!("envelope is not JSON: {e}")))?;

        let Value::Object(mut fields) = value else {
            return Err(Error::malformed("envelope is not an object"));
        };

        let event_name = match fields.remove("eventName") {
            Some(Value::String(name)) if !name.is_empty() => name,
            _ => return Err(Error::malformed("missing eventName")),
        };

        let event_data = fields
            .remove("eventData")
            .map(object_or_empty)
            .unwrap_or_default();

        Ok(Self {
            event_name,
            event_data,
        })
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Interprets a payload field as an object.
///
/// Strings are parsed as JSON; anything that does not yield an object
/// becomes an empty map.
#[must_use]
pub fn object_or_empty(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        Value::String(text) => serde_json::from_str(&text).unwrap_or_default(),
        _ => Map::new(),
    }
}

/// Reads a field as a string, defaulting to empty.
///
/// Scalars are rendered with their JSON text so `"requestId": 7` still
/// echoes back as `"7"`.
#[must_use]
pub fn opt_string(map: &Map<String, Value>, key: &str) -> String {
    match map.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================
