//! Host application callback sink.

use serde_json::Value;

/// Consumer of `callbackEvent` payloads.
///
/// Fire-and-forget: the bridge ignores whatever the sink does with the
/// payload. Any `Fn(Value) + Send + Sync` closure is a sink.
pub trait CallbackSink: Send + Sync {
    /// Receives one payload, unchanged from the content.
    fn invoke(&self, payload: Value);
}

impl<F> CallbackSink for F
where
    F: Fn(Value) + Send + Sync,
{
    fn invoke(&self, payload: Value) {
        self(payload)
    }
}
