//! Builder pattern for bridge configuration.
//!
//! Provides a fluent API for configuring and creating [`Bridge`] instances.
//!
//! # Example
//!
//! ```ignore
//! use blaze_bridge::{Bridge, FileStore};
//! use serde_json::{Value, json};
//!
//! let bridge = Bridge::builder()
//!     .initiate_payload(json!({ "baseUrl": "https://pay.example/index.html" }))
//!     .callback(|payload: Value| println!("{payload}"))
//!     .storage(FileStore::open("/var/lib/app")?)
//!     .build(&host)?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use url::Url;

use crate::error::{Error, Result};
use crate::host::{CallbackSink, Host, KeyValueStore, MemoryStore};
use crate::identifiers::BridgeId;

use super::core::{Bridge, BridgeInner, BridgeState};
use super::options::BridgeOptions;

// ============================================================================
// BridgeBuilder
// ============================================================================

/// Builder for configuring a [`Bridge`] instance.
///
/// Use [`Bridge::builder()`] to create a new builder.
#[derive(Default)]
pub struct BridgeBuilder {
    /// Payload of the `initiate` event.
    initiate_payload: Option<Value>,
    /// Receiver of `callbackEvent` payloads.
    callback: Option<Arc<dyn CallbackSink>>,
    /// Key-value storage.
    storage: Option<Arc<dyn KeyValueStore>>,
    /// Explicit content URL.
    base_url: Option<String>,
    /// Wire names and surface settings.
    options: BridgeOptions,
}

impl fmt::Debug for BridgeBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeBuilder")
            .field("initiate_payload", &self.initiate_payload)
            .field("has_callback", &self.callback.is_some())
            .field("has_storage", &self.storage.is_some())
            .field("base_url", &self.base_url)
            .field("options", &self.options)
            .finish()
    }
}

// ============================================================================
// BridgeBuilder Implementation
// ============================================================================

impl BridgeBuilder {
    /// Creates a new bridge builder with no configuration.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the payload of the `initiate` event.
    ///
    /// Must be a JSON object. Unless [`base_url`](Self::base_url) is set it
    /// must carry `baseUrl`, at the top level or under `payload`.
    #[inline]
    #[must_use]
    pub fn initiate_payload(mut self, payload: Value) -> Self {
        self.initiate_payload = Some(payload);
        self
    }

    /// Sets the receiver of `callbackEvent` payloads.
    #[inline]
    #[must_use]
    pub fn callback(mut self, sink: impl CallbackSink + 'static) -> Self {
        self.callback = Some(Arc::new(sink));
        self
    }

    /// Sets the storage behind `saveToStorage`/`getFromStorage`.
    ///
    /// Defaults to a fresh [`MemoryStore`].
    #[inline]
    #[must_use]
    pub fn storage(mut self, storage: impl KeyValueStore + 'static) -> Self {
        self.storage = Some(Arc::new(storage));
        self
    }

    /// Overrides the content URL taken from the initiate payload.
    #[inline]
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets wire names and surface settings.
    #[inline]
    #[must_use]
    pub fn options(mut self, options: BridgeOptions) -> Self {
        self.options = options;
        self
    }

    /// Builds the bridge with validation.
    ///
    /// Creates the surface through the host, registers the native
    /// interface, loads the content and queues `initiate`.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the payload or callback is missing
    /// - [`Error::Config`] if the payload is not an object
    /// - [`Error::Config`] if no valid absolute base URL can be found
    /// - [`Error::Surface`] if the host cannot create a surface
    pub fn build(self, host: &Host) -> Result<Bridge> {
        let initiate_payload = self.validate_payload()?;
        let base_url = self.resolve_base_url(&initiate_payload)?;
        let callback = self.callback.ok_or_else(|| {
            Error::config(
                "Callback is required. Use .callback() to set it.\n\
                 Example: Bridge::builder().callback(|payload: Value| println!(\"{payload}\"))",
            )
        })?;

        let surface = host.inner.surfaces.create(&self.options.surface)?;
        let storage = self
            .storage
            .unwrap_or_else(|| Arc::new(MemoryStore::new()));

        let inner = BridgeInner {
            id: BridgeId::generate(),
            options: self.options,
            base_url,
            host: host.downgrade(),
            surface,
            storage,
            callback,
            state: Mutex::new(BridgeState::default()),
        };

        Ok(Bridge::start(inner, initiate_payload))
    }
}

// ============================================================================
// Validation
// ============================================================================

impl BridgeBuilder {
    /// Validates the initiate payload.
    fn validate_payload(&self) -> Result<Value> {
        let payload = self.initiate_payload.clone().ok_or_else(|| {
            Error::config(
                "Initiate payload is required. Use .initiate_payload() to set it.\n\
                 Example: Bridge::builder().initiate_payload(json!({ \"baseUrl\": \"https://...\" }))",
            )
        })?;

        if !payload.is_object() {
            return Err(Error::config("Initiate payload must be a JSON object"));
        }

        Ok(payload)
    }

    /// Picks and normalizes the content URL.
    fn resolve_base_url(&self, payload: &Value) -> Result<String> {
        let raw = self
            .base_url
            .as_deref()
            .or_else(|| payload.get("baseUrl").and_then(Value::as_str))
            .or_else(|| {
                payload
                    .get("payload")
                    .and_then(|inner| inner.get("baseUrl"))
                    .and_then(Value::as_str)
            })
            .ok_or_else(|| {
                Error::config(
                    "Base URL is required. Put baseUrl in the initiate payload or use .base_url().",
                )
            })?;

        let url = Url::parse(raw)
            .map_err(|e| Error::config(format!("Invalid base URL '{raw}': {e}")))?;

        Ok(url.into())
    }
}

// ============================================================================
// Tests
// ============================================================================
