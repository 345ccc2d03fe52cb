//! Invoke request/result types.
//!
//! # Request format (inside an `invokeMethod` event's data)
//!
//! ```json
//! {
//!   "methodName": "saveToStorage",
//!   "requestId": "caller-generated",
//!   "params": "{\"key\":\"k\",\"value\":\"v\"}"
//! }
//! ```
//!
//! # Result format (data of an `invokeMethodResult` event)
//!
//! ```json
//! { "requestId": "caller-generated", "methodName": "saveToStorage", "methodResult": true }
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::identifiers::RequestId;

use super::envelope::{object_or_empty, opt_string};

// ============================================================================
// Constants
// ============================================================================

/// Result for a method name the host does not know.
pub const METHOD_NOT_FOUND: &str = "Method not found";

/// Result of a successful `openApp`.
pub const LAUNCH_SUCCEEDED: &str = "Successfully triggered intent";

/// Prefix of a failed `openApp` result; the reason follows.
pub const LAUNCH_FAILED_PREFIX: &str = "Failed to invoke intent: ";

// ============================================================================
// InvokeRequest
// ============================================================================

/// A native method call raised by the content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvokeRequest {
    /// Method to run.
    pub method_name: String,

    /// Caller-generated correlation ID.
    pub request_id: RequestId,

    /// Method-specific parameters.
    pub params: Map<String, Value>,
}

impl InvokeRequest {
    /// Reads a request from `invokeMethod` event data.
    ///
    /// Missing fields default to empty; `params` may be an object or a
    /// JSON-encoded string.
    #[must_use]
    pub fn from_event_data(data: &Map<String, Value>) -> Self {
        Self {
            method_name: opt_string(data, "methodName"),
            request_id: RequestId::new(opt_string(data, "requestId")),
            params: data.get("params").cloned().map(object_or_empty).unwrap_or_default(),
        }
    }

    /// Resolves the method and its parameters.
    #[must_use]
    pub fn method(&self) -> Method {
        let param = |key: &str| opt_string(&self.params, key);

        match self.method_name.as_str() {
            "saveToStorage" => Method::SaveToStorage {
                key: param("key"),
                value: param("value"),
            },
            "getFromStorage" => Method::GetFromStorage { key: param("key") },
            "openApp" => Method::OpenApp {
                intent_uri: param("intentUri"),
            },
            "findApps" => Method::FindApps {
                payload: param("payload"),
            },
            _ => Method::Unknown,
        }
    }
}

// ============================================================================
// Method
// ============================================================================

/// Host methods callable from the content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// Persist a string under a key.
    SaveToStorage {
        /// Storage key.
        key: String,
        /// Value to store.
        value: String,
    },

    /// Read a string by key.
    GetFromStorage {
        /// Storage key.
        key: String,
    },

    /// Launch another application through a URI.
    OpenApp {
        /// Intent-like URI.
        intent_uri: String,
    },

    /// List applications able to handle a URI.
    FindApps {
        /// URI-like matcher.
        payload: String,
    },

    /// Unrecognized method name.
    Unknown,
}

// ============================================================================
// InvokeResult
// ============================================================================

/// The response to an [`InvokeRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeResult {
    /// Echoed request ID.
    pub request_id: RequestId,

    /// Echoed method name.
    pub method_name: String,

    /// Method-specific value.
    pub method_result: Value,
}

impl InvokeResult {
    /// Creates a result for `request`.
    #[inline]
    #[must_use]
    pub fn new(request: &InvokeRequest, method_result: Value) -> Self {
        Self {
            request_id: request.request_id.clone(),
            method_name: request.method_name.clone(),
            method_result,
        }
    }

    /// Creates the "Method not found" result for `request`.
    #[inline]
    #[must_use]
    pub fn method_not_found(request: &InvokeRequest) -> Self {
        Self::new(request, Value::String(METHOD_NOT_FOUND.to_string()))
    }

    /// Returns `true` if the method was not recognized.
    #[inline]
    #[must_use]
    pub fn is_method_not_found(&self) -> bool {
        self.method_result.as_str() == Some(METHOD_NOT_FOUND)
    }

    /// Converts into the `invokeMethodResult` event payload.
    #[must_use]
    pub fn into_event_data(self) -> Value {
        json!({
            "requestId": self.request_id,
            "methodName": self.method_name,
            "methodResult": self.method_result,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
