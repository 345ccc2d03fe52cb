//! Wire protocol between host and embedded content.
//!
//! This module defines the envelope format exchanged in both directions and
//! the invoke request/result sub-protocol.
//!
//! # Protocol Overview
//!
//! | Message | Direction | Purpose |
//! |---------|-----------|---------|
//! | [`InboundEvent`] | Content → Host | Event raised by the content (`Native.onEvent`) |
//! | [`OutboundEvent`] | Host → Content | Event delivered via `onSDKEvent(...)` |
//! | [`InvokeRequest`] | Content → Host | Carried by an `invokeMethod` event |
//! | [`InvokeResult`] | Host → Content | Carried by an `invokeMethodResult` event |
//!
//! # Leniency
//!
//! Inbound parsing never panics. Payloads that are missing or fail to parse
//! become empty objects; only an envelope without a usable `eventName` is
//! rejected, as [`Error::MalformedEvent`](crate::Error::MalformedEvent).
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `envelope` | Inbound/outbound envelope codec |
//! | `event` | Event names and typed inbound events |
//! | `invoke` | Invoke request, method and result types |

// ============================================================================
// Submodules
// ============================================================================

/// Envelope codec.
pub mod envelope;

/// Event names and parsed inbound events.
pub mod event;

/// Invoke request/result types.
pub mod invoke;

// ============================================================================
// Re-exports
// ============================================================================

pub use envelope::{DEFAULT_SOURCE, InboundEvent, OutboundEvent, object_or_empty, opt_string};
pub use event::{ParsedEvent, names};
pub use invoke::{
    InvokeRequest, InvokeResult, LAUNCH_FAILED_PREFIX, LAUNCH_SUCCEEDED, METHOD_NOT_FOUND, Method,
};
