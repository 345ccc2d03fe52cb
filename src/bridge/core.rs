//! Bridge controller.
//!
//! Owns the readiness latch, the pending queue and the back-press flag, and
//! routes every inbound envelope.
//!
//! # Delivery
//!
//! ```text
//! send_event(name, payload)
//!   ├─ terminated → dropped
//!   ├─ ready      → envelope → script → UI context → surface.evaluate_script
//!   └─ not ready  → pending[name] = payload   (last write wins)
//!
//! appReady → ready = true → drain pending through the ready path
//! ```
//!
//! All state transitions happen under one lock. Draining posts its
//! deliveries while still holding it, so a concurrent send can never
//! overtake a drained event of the same name.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use serde_json::{Value, json};
use tracing::{debug, info, trace, warn};

use crate::error::{Error, Result};
use crate::host::{CallbackSink, ContentSurface, HostInner, KeyValueStore, NativeInterface};
use crate::identifiers::BridgeId;
use crate::protocol::{InboundEvent, OutboundEvent, ParsedEvent, names};

use super::builder::BridgeBuilder;
use super::options::BridgeOptions;
use super::queue::PendingEvents;

// ============================================================================
// Types
// ============================================================================

/// Mutable bridge state.
#[derive(Debug, Default)]
pub(crate) struct BridgeState {
    /// Content signalled `appReady`. Never reverts.
    pub ready: bool,
    /// Content intercepts back navigation.
    pub consuming_back_press: bool,
    /// `terminate` has run.
    pub terminated: bool,
    /// Events waiting for readiness.
    pub pending: PendingEvents,
}

/// Internal shared state for a bridge.
pub(crate) struct BridgeInner {
    /// Bridge instance ID.
    pub id: BridgeId,
    /// Wire names and surface settings.
    pub options: BridgeOptions,
    /// URL of the content this bridge loaded.
    pub base_url: String,
    /// Host application; may go away at any time.
    pub host: Weak<HostInner>,
    /// The content surface.
    pub surface: Arc<dyn ContentSurface>,
    /// Storage backing `saveToStorage`/`getFromStorage`.
    pub storage: Arc<dyn KeyValueStore>,
    /// Receiver of `callbackEvent` payloads.
    pub callback: Arc<dyn CallbackSink>,
    /// Protocol state.
    pub state: Mutex<BridgeState>,
}

// ============================================================================
// Bridge
// ============================================================================

/// A bridge between the host and one embedded content surface.
///
/// Cheap to clone; clones share state.
///
/// # Example
///
/// ```ignore
/// let bridge = Bridge::builder()
///     .initiate_payload(json!({ "baseUrl": "https://x/index.html" }))
///     .callback(|payload: Value| println!("{payload}"))
///     .build(&host)?;
///
/// bridge.process(json!({ "action": "pay" }));
///
/// if bridge.handle_back_press() {
///     // not consumed, perform default back navigation
/// }
///
/// bridge.terminate();
/// ```
#[derive(Clone)]
pub struct Bridge {
    /// Shared inner state.
    pub(crate) inner: Arc<BridgeInner>,
}

impl fmt::Debug for Bridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Bridge")
            .field("id", &self.inner.id)
            .field("base_url", &self.inner.base_url)
            .field("ready", &state.ready)
            .field("terminated", &state.terminated)
            .field("pending", &state.pending.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Bridge - Constructor
// ============================================================================

impl Bridge {
    /// Creates a bridge builder.
    #[inline]
    #[must_use]
    pub fn builder() -> BridgeBuilder {
        BridgeBuilder::new()
    }

    /// Wires the surface and queues the `initiate` event.
    pub(crate) fn start(inner: BridgeInner, initiate_payload: Value) -> Self {
        let bridge = Self {
            inner: Arc::new(inner),
        };

        let native: Arc<dyn NativeInterface> = Arc::new(NativeHandle {
            bridge: Arc::downgrade(&bridge.inner),
        });
        let surface = Arc::clone(&bridge.inner.surface);
        let interface_name = bridge.inner.options.interface_name.clone();
        let base_url = bridge.inner.base_url.clone();

        bridge.inner.run_on_ui_thread(move || {
            surface.add_native_interface(&interface_name, native);
            surface.load_url(&base_url);
        });

        bridge.inner.send_event(names::INITIATE, initiate_payload);

        info!(bridge_id = %bridge.inner.id, base_url = %bridge.inner.base_url, "Bridge created");
        bridge
    }
}

// ============================================================================
// Bridge - Public API
// ============================================================================

impl Bridge {
    /// Sends a `process` event to the content.
    ///
    /// Delivered immediately once the content is ready, queued before.
    pub fn process(&self, payload: Value) {
        self.inner.send_event(names::PROCESS, payload);
    }

    /// Handles one envelope raised by the content.
    ///
    /// Never fails: malformed envelopes are logged and dropped.
    pub fn on_event(&self, raw: &str) {
        self.inner.on_event(raw);
    }

    /// Offers the host's back navigation to the content.
    ///
    /// Returns `true` when the content is not intercepting back presses and
    /// the host should navigate as usual. Otherwise returns `false` right
    /// away and decides on the delivery context: if the content still shows
    /// the bridge's own page it receives a `backPress` event, else the
    /// surface goes back in its own history when it can.
    ///
    /// The return value does not reflect that later decision.
    pub fn handle_back_press(&self) -> bool {
        {
            let state = self.inner.state.lock();
            if state.terminated || !state.consuming_back_press {
                return true;
            }
        }

        let bridge = Arc::downgrade(&self.inner);
        self.inner.run_on_ui_thread(move || {
            if let Some(bridge) = bridge.upgrade() {
                bridge.resolve_back_press();
            }
        });

        false
    }

    /// Shuts the bridge down.
    ///
    /// Sends `terminate` (queued and never drained if the content is not
    /// ready), hides the view, releases the surface and clears the queue.
    /// Calling it again is a no-op.
    pub fn terminate(&self) {
        self.inner.terminate();
    }

    /// Waits until every surface call posted so far has run.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HostUnavailable`] if the host is gone or stopped.
    pub async fn flush(&self) -> Result<()> {
        let ui = self
            .inner
            .host
            .upgrade()
            .map(|host| host.ui.clone())
            .ok_or(Error::HostUnavailable)?;
        ui.flush().await
    }
}

// ============================================================================
// Bridge - Accessors
// ============================================================================

impl Bridge {
    /// Returns the bridge ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> BridgeId {
        self.inner.id
    }

    /// Returns the URL the content was loaded from.
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Returns the options the bridge was built with.
    #[inline]
    #[must_use]
    pub fn options(&self) -> &BridgeOptions {
        &self.inner.options
    }

    /// Returns `true` once the content has signalled `appReady`.
    #[inline]
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.inner.state.lock().ready
    }

    /// Returns `true` while the content intercepts back presses.
    #[inline]
    #[must_use]
    pub fn is_consuming_back_press(&self) -> bool {
        self.inner.state.lock().consuming_back_press
    }

    /// Returns `true` after [`Bridge::terminate`].
    #[inline]
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.inner.state.lock().terminated
    }

    /// Returns the number of events waiting for readiness.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.inner.state.lock().pending.len()
    }
}

// ============================================================================
// BridgeInner - Outbound
// ============================================================================

impl BridgeInner {
    /// Sends an event through the readiness gate.
    pub(crate) fn send_event(&self, event_name: &str, payload: Value) {
        let mut state = self.state.lock();
        if state.terminated {
            debug!(bridge_id = %self.id, event_name, "Bridge terminated, event dropped");
            return;
        }
        self.route(&mut state, event_name, payload);
    }

    /// Delivers or queues depending on readiness. Caller holds the lock.
    fn route(&self, state: &mut BridgeState, event_name: &str, payload: Value) {
        if state.ready {
            self.deliver(event_name, payload);
        } else if state.pending.insert(event_name, payload).is_some() {
            debug!(bridge_id = %self.id, event_name, "Queued event replaced");
        } else {
            debug!(bridge_id = %self.id, event_name, "Event queued until ready");
        }
    }

    /// Hands the envelope to the content on the delivery context.
    fn deliver(&self, event_name: &str, payload: Value) {
        let event = OutboundEvent::new(event_name, payload, self.options.source.as_str());

        let script = match event.to_script(&self.options.entry_function) {
            Ok(script) => script,
            Err(e) => {
                warn!(bridge_id = %self.id, event_name, error = %e, "Failed to serialize event");
                return;
            }
        };

        let surface = Arc::clone(&self.surface);
        if self.run_on_ui_thread(move || surface.evaluate_script(&script)) {
            trace!(bridge_id = %self.id, event_name, "Event delivered");
        }
    }

    /// Posts `task` to the host's delivery context, if the host is alive.
    pub(crate) fn run_on_ui_thread(&self, task: impl FnOnce() + Send + 'static) -> bool {
        match self.host.upgrade() {
            Some(host) => host.ui.run(task),
            None => {
                debug!(bridge_id = %self.id, "Host unavailable, UI task dropped");
                false
            }
        }
    }
}

// ============================================================================
// BridgeInner - Inbound
// ============================================================================

impl BridgeInner {
    /// Parses and dispatches one inbound envelope.
    pub(crate) fn on_event(&self, raw: &str) {
        let event = match InboundEvent::from_json(raw) {
            Ok(event) => event,
            Err(e) => {
                warn!(bridge_id = %self.id, error = %e, "Dropping malformed event");
                return;
            }
        };

        if self.state.lock().terminated {
            debug!(bridge_id = %self.id, event_name = %event.event_name, "Bridge terminated, inbound event ignored");
            return;
        }

        trace!(bridge_id = %self.id, event_name = %event.event_name, "Inbound event");

        match event.parse() {
            ParsedEvent::AppReady => self.mark_ready(),
            ParsedEvent::Callback { data } => self.callback.invoke(data),
            ParsedEvent::ConsumeBackPress => self.state.lock().consuming_back_press = true,
            ParsedEvent::ReleaseBackPress => self.state.lock().consuming_back_press = false,
            ParsedEvent::RenderView => self.render_view(),
            ParsedEvent::HideView => self.hide_view(),
            ParsedEvent::InvokeMethod(request) => self.handle_invoke(request),
            ParsedEvent::Unknown { event_name, .. } => {
                trace!(bridge_id = %self.id, event_name = %event_name, "Ignoring unknown event");
            }
        }
    }

    /// Latches readiness and drains the queue.
    fn mark_ready(&self) {
        let mut state = self.state.lock();
        if state.ready {
            debug!(bridge_id = %self.id, "Duplicate appReady ignored");
            return;
        }

        state.ready = true;
        let pending = state.pending.take();
        debug!(bridge_id = %self.id, count = pending.len(), "Content ready, draining queue");

        for (event_name, payload) in pending {
            self.route(&mut state, &event_name, payload);
        }
    }

    /// Attaches the surface to the host view.
    fn render_view(&self) {
        let surface = Arc::clone(&self.surface);
        self.run_on_ui_thread(move || surface.attach());
    }

    /// Detaches the surface from the host view.
    fn hide_view(&self) {
        let surface = Arc::clone(&self.surface);
        self.run_on_ui_thread(move || surface.detach());
    }

    /// Second half of back-press handling; runs on the delivery context.
    fn resolve_back_press(&self) {
        let on_own_page = self
            .surface
            .current_url()
            .is_some_and(|url| url.contains(&self.base_url));

        if on_own_page {
            debug!(bridge_id = %self.id, "Back press handed to content");
            self.send_event(names::BACK_PRESS, json!({}));
        } else if self.surface.can_go_back() {
            debug!(bridge_id = %self.id, "Back press navigates surface history");
            self.surface.go_back();
        }
    }
}

// ============================================================================
// BridgeInner - Lifecycle
// ============================================================================

impl BridgeInner {
    /// Sends `terminate`, releases the surface and latches termination.
    fn terminate(&self) {
        {
            let mut state = self.state.lock();
            if state.terminated {
                debug!(bridge_id = %self.id, "Bridge already terminated");
                return;
            }

            self.route(&mut state, names::TERMINATE, json!({}));
            state.terminated = true;
            state.pending.clear();
        }

        self.hide_view();

        let surface = Arc::clone(&self.surface);
        let interface_name = self.options.interface_name.clone();
        self.run_on_ui_thread(move || {
            surface.stop_loading();
            surface.remove_native_interface(&interface_name);
            surface.destroy();
        });

        info!(bridge_id = %self.id, "Bridge terminated");
    }
}

// ============================================================================
// NativeHandle
// ============================================================================

/// The native interface registered on the surface.
///
/// Holds the bridge weakly so the surface never keeps it alive.
struct NativeHandle {
    bridge: Weak<BridgeInner>,
}

impl NativeInterface for NativeHandle {
    fn on_event(&self, event: &str) {
        match self.bridge.upgrade() {
            Some(bridge) => bridge.on_event(event),
            None => trace!("Bridge dropped, native event ignored"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
