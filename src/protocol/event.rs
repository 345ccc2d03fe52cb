//! Event names and typed inbound events.
//!
//! # Event Types
//!
//! | Direction | Events |
//! |-----------|--------|
//! | Content → Host | `appReady`, `callbackEvent`, `consumeBackPress`, `releaseBackPress`, `renderView`, `hideView`, `invokeMethod` |
//! | Host → Content | `initiate`, `process`, `backPress`, `terminate`, `invokeMethodResult` |

// ============================================================================
// Imports
// ============================================================================

use serde_json::{Map, Value};

use super::envelope::InboundEvent;
use super::invoke::InvokeRequest;

// ============================================================================
// Event Names
// ============================================================================

/// Well-known event names.
pub mod names {
    /// Content finished initializing.
    pub const APP_READY: &str = "appReady";
    /// Payload for the host application's callback sink.
    pub const CALLBACK_EVENT: &str = "callbackEvent";
    /// Content wants to intercept back navigation.
    pub const CONSUME_BACK_PRESS: &str = "consumeBackPress";
    /// Content releases back navigation.
    pub const RELEASE_BACK_PRESS: &str = "releaseBackPress";
    /// Attach the surface to the host view.
    pub const RENDER_VIEW: &str = "renderView";
    /// Detach the surface from the host view.
    pub const HIDE_VIEW: &str = "hideView";
    /// Native method invocation request.
    pub const INVOKE_METHOD: &str = "invokeMethod";

    /// Initial payload, sent at construction.
    pub const INITIATE: &str = "initiate";
    /// Host-side process request.
    pub const PROCESS: &str = "process";
    /// Back navigation handed to the content.
    pub const BACK_PRESS: &str = "backPress";
    /// Bridge shutting down.
    pub const TERMINATE: &str = "terminate";
    /// Native method invocation result.
    pub const INVOKE_METHOD_RESULT: &str = "invokeMethodResult";
}

// ============================================================================
// ParsedEvent
// ============================================================================

/// Inbound event in typed form.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedEvent {
    /// Content is ready to receive events.
    AppReady,

    /// Forward to the callback sink.
    Callback {
        /// Payload, forwarded unchanged.
        data: Value,
    },

    /// Start intercepting back navigation.
    ConsumeBackPress,

    /// Stop intercepting back navigation.
    ReleaseBackPress,

    /// Show the surface.
    RenderView,

    /// Hide the surface.
    HideView,

    /// Native method call.
    InvokeMethod(InvokeRequest),

    /// Unrecognized event name.
    Unknown {
        /// Event name.
        event_name: String,
        /// Event payload.
        data: Map<String, Value>,
    },
}

impl InboundEvent {
    /// Parses the event into a typed variant.
    #[must_use]
    pub fn parse(self) -> ParsedEvent {
        match self.event_name.as_str() {
            names::APP_READY => ParsedEvent::AppReady,
            names::CALLBACK_EVENT => ParsedEvent::Callback {
                data: Value::Object(self.event_data),
            },
            names::CONSUME_BACK_PRESS => ParsedEvent::ConsumeBackPress,
            names::RELEASE_BACK_PRESS => ParsedEvent::ReleaseBackPress,
            names::RENDER_VIEW => ParsedEvent::RenderView,
            names::HIDE_VIEW => ParsedEvent::HideView,
            names::INVOKE_METHOD => {
                ParsedEvent::InvokeMethod(InvokeRequest::from_event_data(&self.event_data))
            }
            _ => ParsedEvent::Unknown {
                event_name: self.event_name,
                data: self.event_data,
            },
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
