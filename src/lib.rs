//! Blaze bridge - readiness-gated event bridge between a native host and
//! embedded web content.
//!
//! The host embeds the Blaze content in a web surface. This crate is the
//! host side of the conversation: it loads the content, exchanges JSON
//! envelopes with it, and services the content's native method calls.
//!
//! # Architecture
//!
//! - **Host (Rust)**: owns the delivery context and the collaborators
//!   (surface factory, storage, app resolver, callback sink)
//! - **Content (JavaScript)**: calls `Native.onEvent(json)` and receives
//!   events through `onSDKEvent(json)`
//!
//! Key design principles:
//!
//! - Outbound events wait until the content signals `appReady`; the queue
//!   keeps one payload per event name (last write wins)
//! - Nothing fails across the bridge boundary: malformed input is logged
//!   and dropped, collaborator failures become result values
//! - Bridges hold the host weakly; once it is gone, bridge operations that
//!   need it are no-ops
//!
//! # Quick Start
//!
//! ```no_run
//! use blaze_bridge::transport::PendingServer;
//! use blaze_bridge::{Bridge, Host, Result};
//! use serde_json::{Value, json};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Wait for a browser page to connect as the content surface
//!     let server = PendingServer::bind_localhost().await?;
//!     println!("Open the content with {}", server.ws_url());
//!     let surface = server.accept().await?;
//!
//!     let host = Host::builder().surface_factory(surface).build()?;
//!
//!     let bridge = Bridge::builder()
//!         .initiate_payload(json!({ "baseUrl": "https://pay.example/index.html" }))
//!         .callback(|payload: Value| println!("callback: {payload}"))
//!         .build(&host)?;
//!
//!     bridge.process(json!({ "action": "checkout", "amount": 499 }));
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`bridge`] | The bridge controller and its builder |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`host`] | Host handle and collaborator traits |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`protocol`] | Envelope and invoke message types |
//! | [`transport`] | WebSocket-backed content surface |

// ============================================================================
// Modules
// ============================================================================

/// The bridge controller.
///
/// Use [`Bridge::builder()`] to create a bridge for a [`Host`].
pub mod bridge;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Host handle and collaborator traits.
pub mod host;

/// Type-safe identifiers.
pub mod identifiers;

/// Envelope and invoke message types.
pub mod protocol;

/// WebSocket-backed content surface.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Bridge types
pub use bridge::{Bridge, BridgeBuilder, BridgeOptions, PendingEvents};

// Error types
pub use error::{Error, Result};

// Host types
pub use host::{
    AppCandidate, AppInfo, AppResolver, CacheMode, CallbackSink, ContentSurface, FileStore, Host,
    HostBuilder, InstalledApp, KeyValueStore, MemoryStore, NativeInterface, StaticAppResolver,
    SurfaceFactory, SurfaceOptions, UiContext,
};

// Identifier types
pub use identifiers::{BridgeId, RequestId};

// Protocol types
pub use protocol::{InboundEvent, InvokeRequest, InvokeResult, OutboundEvent};
