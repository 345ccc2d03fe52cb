//! Host ↔ content event bridge.
//!
//! One [`Bridge`] connects the host application to one embedded content
//! surface. Outbound events are held back until the content announces
//! readiness; inbound events are dispatched by name.
//!
//! # Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | `builder` | [`BridgeBuilder`] and base URL resolution |
//! | `core` | [`Bridge`] controller, readiness and back-press state |
//! | `invoke` | `invokeMethod` request handlers |
//! | `options` | Wire names and surface settings |
//! | `queue` | Single-slot-per-name pending queue |
//!
//! # Lifecycle
//!
//! ```text
//! build ──► surface created, interface registered, base URL loaded
//!       ──► initiate queued
//! appReady ──► queue drained, later sends delivered immediately
//! terminate ──► terminate sent, surface released, queue cleared
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Bridge builder.
pub mod builder;

mod core;

mod invoke;

/// Wire names and surface settings.
pub mod options;

/// Pending outbound events.
pub mod queue;

// ============================================================================
// Re-exports
// ============================================================================

pub use self::core::Bridge;
pub use builder::BridgeBuilder;
pub use options::{BridgeOptions, DEFAULT_ENTRY_FUNCTION, DEFAULT_INTERFACE_NAME};
pub use queue::PendingEvents;

// ============================================================================
// Test Support
// ============================================================================

#[cfg(test)]
pub(crate) mod test_support {
    //! Recording surface and a ready-made host/bridge pair.

    use std::sync::Arc;

    use parking_lot::Mutex;
    use rustc_hash::FxHashMap;
    use serde_json::{Value, json};

    use crate::error::Result;
    use crate::host::{
        ContentSurface, Host, KeyValueStore, MemoryStore, NativeInterface, StaticAppResolver,
        SurfaceOptions,
    };
    use crate::protocol::OutboundEvent;

    use super::{Bridge, BridgeBuilder};

    /// A call made on the surface.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum SurfaceCall {
        AddInterface(String),
        RemoveInterface(String),
        Load(String),
        Evaluate(String),
        GoBack,
        Attach,
        Detach,
        StopLoading,
        Destroy,
    }

    /// Surface double recording every call.
    #[derive(Default)]
    pub struct RecordingSurface {
        calls: Mutex<Vec<SurfaceCall>>,
        interfaces: Mutex<FxHashMap<String, Arc<dyn NativeInterface>>>,
        location: Mutex<(Option<String>, bool)>,
    }

    impl RecordingSurface {
        pub fn calls(&self) -> Vec<SurfaceCall> {
            self.calls.lock().clone()
        }

        /// Envelopes handed to the content, decoded from the scripts.
        pub fn delivered(&self) -> Vec<OutboundEvent> {
            self.calls
                .lock()
                .iter()
                .filter_map(|call| match call {
                    SurfaceCall::Evaluate(script) => Some(decode_script(script)),
                    _ => None,
                })
                .collect()
        }

        pub fn set_location(&self, url: Option<&str>, can_go_back: bool) {
            *self.location.lock() = (url.map(str::to_string), can_go_back);
        }

        pub fn native(&self, name: &str) -> Option<Arc<dyn NativeInterface>> {
            self.interfaces.lock().get(name).cloned()
        }

        fn record(&self, call: SurfaceCall) {
            self.calls.lock().push(call);
        }
    }

    impl ContentSurface for RecordingSurface {
        fn add_native_interface(&self, name: &str, interface: Arc<dyn NativeInterface>) {
            self.interfaces.lock().insert(name.to_string(), interface);
            self.record(SurfaceCall::AddInterface(name.to_string()));
        }

        fn remove_native_interface(&self, name: &str) {
            self.interfaces.lock().remove(name);
            self.record(SurfaceCall::RemoveInterface(name.to_string()));
        }

        fn load_url(&self, url: &str) {
            self.set_location(Some(url), false);
            self.record(SurfaceCall::Load(url.to_string()));
        }

        fn evaluate_script(&self, script: &str) {
            self.record(SurfaceCall::Evaluate(script.to_string()));
        }

        fn current_url(&self) -> Option<String> {
            self.location.lock().0.clone()
        }

        fn can_go_back(&self) -> bool {
            self.location.lock().1
        }

        fn go_back(&self) {
            self.record(SurfaceCall::GoBack);
        }

        fn attach(&self) {
            self.record(SurfaceCall::Attach);
        }

        fn detach(&self) {
            self.record(SurfaceCall::Detach);
        }

        fn stop_loading(&self) {
            self.record(SurfaceCall::StopLoading);
        }

        fn destroy(&self) {
            self.record(SurfaceCall::Destroy);
        }
    }

    fn decode_script(script: &str) -> OutboundEvent {
        let json = script
            .strip_prefix("onSDKEvent(JSON.stringify(")
            .and_then(|rest| rest.strip_suffix("))"))
            .expect("script shape");
        serde_json::from_str(json).expect("envelope")
    }

    /// A host, its recording surface and one bridge.
    pub struct Harness {
        pub host: Host,
        pub bridge: Bridge,
        pub surface: Arc<RecordingSurface>,
        pub initiate_payload: Value,
        pub callback_log: Arc<Mutex<Vec<Value>>>,
    }

    impl Harness {
        pub fn new() -> Self {
            Self::build(None, MemoryStore::new())
        }

        /// Builds with an app resolver and storage of the test's choosing.
        pub fn build(apps: Option<StaticAppResolver>, storage: impl KeyValueStore + 'static) -> Self {
            let surface = Arc::new(RecordingSurface::default());

            let factory_surface = Arc::clone(&surface);
            let mut host = Host::builder().surface_factory(
                move |_: &SurfaceOptions| -> Result<Arc<dyn ContentSurface>> {
                    Ok(Arc::clone(&factory_surface) as Arc<dyn ContentSurface>)
                },
            );
            if let Some(apps) = apps {
                host = host.app_resolver(apps);
            }
            let host = host.build().expect("host");

            let initiate_payload = json!({ "baseUrl": "https://x/index.html", "merchant": "m-1" });
            let callback_log = Arc::new(Mutex::new(Vec::new()));
            let log = Arc::clone(&callback_log);

            let bridge = BridgeBuilder::new()
                .initiate_payload(initiate_payload.clone())
                .callback(move |payload: Value| log.lock().push(payload))
                .storage(storage)
                .build(&host)
                .expect("bridge");

            Self {
                host,
                bridge,
                surface,
                initiate_payload,
                callback_log,
            }
        }

        /// A harness whose content already signalled readiness.
        pub async fn ready() -> Self {
            let harness = Self::new();
            harness.make_ready().await;
            harness
        }

        pub async fn make_ready(&self) {
            self.bridge.on_event(r#"{"eventName":"appReady"}"#);
            self.flush().await;
        }

        /// Waits for UI tasks, including ones posted by UI tasks.
        pub async fn flush(&self) {
            self.host.flush().await.expect("flush");
            self.host.flush().await.expect("flush");
        }

        pub fn callbacks(&self) -> Vec<Value> {
            self.callback_log.lock().clone()
        }
    }
}
