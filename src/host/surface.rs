//! Embedded content surface.
//!
//! A [`ContentSurface`] is the host's web view: it loads the content, runs
//! scripts in it, exposes a [`NativeInterface`] to it, and can be attached
//! to or detached from the host view hierarchy.
//!
//! All `ContentSurface` methods are called from the delivery context only.
//!
//! # Example
//!
//! ```ignore
//! use blaze_bridge::{CacheMode, SurfaceOptions};
//!
//! let options = SurfaceOptions::new()
//!     .with_cache_mode(CacheMode::NoCache)
//!     .with_dom_storage(false);
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;

// ============================================================================
// NativeInterface
// ============================================================================

/// The only capability the content can call on the host.
///
/// Registered on the surface under the configured interface name
/// (`Native` by default), so the content calls `Native.onEvent(json)`.
pub trait NativeInterface: Send + Sync {
    /// Receives one serialized envelope from the content.
    fn on_event(&self, event: &str);
}

// ============================================================================
// ContentSurface
// ============================================================================

/// An embedded web content surface.
///
/// Script failures inside the content are not observable through this
/// trait; delivery is fire-and-forget.
pub trait ContentSurface: Send + Sync {
    /// Exposes `interface` to the content under `name`.
    fn add_native_interface(&self, name: &str, interface: Arc<dyn NativeInterface>);

    /// Withdraws the interface registered under `name`.
    fn remove_native_interface(&self, name: &str);

    /// Starts loading `url`.
    fn load_url(&self, url: &str);

    /// Runs `script` in the content. Fire-and-forget.
    fn evaluate_script(&self, script: &str);

    /// Returns the URL currently shown, if any.
    fn current_url(&self) -> Option<String>;

    /// Returns `true` if the content has history to go back to.
    fn can_go_back(&self) -> bool;

    /// Navigates back in the content's own history.
    fn go_back(&self);

    /// Attaches the surface to the host view, filling it.
    fn attach(&self);

    /// Detaches the surface from the host view.
    fn detach(&self);

    /// Stops any load in progress.
    fn stop_loading(&self);

    /// Releases the surface. No other method is called afterwards.
    fn destroy(&self);
}

// ============================================================================
// SurfaceFactory
// ============================================================================

/// Creates content surfaces for new bridges.
pub trait SurfaceFactory: Send + Sync {
    /// Creates a surface configured with `options`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Surface`](crate::Error::Surface) if the platform
    /// cannot provide one.
    fn create(&self, options: &SurfaceOptions) -> Result<Arc<dyn ContentSurface>>;
}

impl<F> SurfaceFactory for F
where
    F: Fn(&SurfaceOptions) -> Result<Arc<dyn ContentSurface>> + Send + Sync,
{
    fn create(&self, options: &SurfaceOptions) -> Result<Arc<dyn ContentSurface>> {
        self(options)
    }
}

// ============================================================================
// CacheMode
// ============================================================================

/// HTTP cache policy for the content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CacheMode {
    /// Honor cache headers.
    #[default]
    Default,
    /// Always go to the network.
    NoCache,
    /// Use stale cache entries before the network.
    CacheElseNetwork,
    /// Never go to the network.
    CacheOnly,
}

// ============================================================================
// SurfaceOptions
// ============================================================================

/// Content surface settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceOptions {
    /// Allow script execution. The bridge cannot work without it.
    pub javascript_enabled: bool,

    /// Enable `localStorage`/`sessionStorage`.
    pub dom_storage_enabled: bool,

    /// HTTP cache policy.
    pub cache_mode: CacheMode,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceOptions {
    /// Creates options with scripts and DOM storage enabled.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            javascript_enabled: true,
            dom_storage_enabled: true,
            cache_mode: CacheMode::Default,
        }
    }

    /// Enables or disables DOM storage.
    #[inline]
    #[must_use]
    pub const fn with_dom_storage(mut self, enabled: bool) -> Self {
        self.dom_storage_enabled = enabled;
        self
    }

    /// Sets the cache policy.
    #[inline]
    #[must_use]
    pub const fn with_cache_mode(mut self, cache_mode: CacheMode) -> Self {
        self.cache_mode = cache_mode;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = SurfaceOptions::default();
        assert!(options.javascript_enabled);
        assert!(options.dom_storage_enabled);
        assert_eq!(options.cache_mode, CacheMode::Default);
    }

    #[test]
    fn test_builder_methods() {
        let options = SurfaceOptions::new()
            .with_dom_storage(false)
            .with_cache_mode(CacheMode::CacheOnly);

        assert!(options.javascript_enabled);
        assert!(!options.dom_storage_enabled);
        assert_eq!(options.cache_mode, CacheMode::CacheOnly);
    }

    #[test]
    fn test_options_wire_names() {
        let json = serde_json::to_value(SurfaceOptions::new().with_cache_mode(CacheMode::NoCache))
            .expect("serialize");

        assert_eq!(json["javascriptEnabled"], true);
        assert_eq!(json["domStorageEnabled"], true);
        assert_eq!(json["cacheMode"], "noCache");
    }
}
