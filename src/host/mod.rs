//! Host-side collaborators of the bridge.
//!
//! The bridge only talks to the outside world through the traits defined
//! here. Everything platform-specific (web view, preferences, package
//! manager) lives behind them.
//!
//! # Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | `core` | [`Host`] handle and its builder |
//! | `ui` | Sequential delivery context ("run on UI thread") |
//! | `surface` | Embedded content surface and native interface |
//! | `storage` | Key-value storage adapters |
//! | `apps` | Installed application lookup and launch |
//! | `callback` | Host application callback sink |

// ============================================================================
// Submodules
// ============================================================================

/// Installed application lookup and launch.
pub mod apps;

/// Host application callback sink.
pub mod callback;

mod core;

/// Embedded content surface.
pub mod surface;

/// Key-value storage adapters.
pub mod storage;

/// Sequential delivery context.
pub mod ui;

// ============================================================================
// Re-exports
// ============================================================================

pub use self::core::{Host, HostBuilder};
pub(crate) use self::core::HostInner;
pub use apps::{AppCandidate, AppInfo, AppResolver, InstalledApp, StaticAppResolver};
pub use callback::CallbackSink;
pub use storage::{DEFAULT_STORE_FILE, FileStore, KeyValueStore, MemoryStore};
pub use surface::{CacheMode, ContentSurface, NativeInterface, SurfaceFactory, SurfaceOptions};
pub use ui::UiContext;
