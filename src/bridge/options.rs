//! Bridge protocol options.
//!
//! The names used on the wire are fixed by the content SDK; they are
//! configurable only so hosts can run several SDK generations side by side.
//!
//! # Example
//!
//! ```ignore
//! use blaze_bridge::BridgeOptions;
//!
//! let options = BridgeOptions::new()
//!     .with_interface_name("BlazeNative")
//!     .with_entry_function("window.onBlazeEvent");
//! ```

// ============================================================================
// Imports
// ============================================================================

use crate::host::SurfaceOptions;
use crate::protocol::DEFAULT_SOURCE;

// ============================================================================
// Constants
// ============================================================================

/// Name the native interface is exposed under.
pub const DEFAULT_INTERFACE_NAME: &str = "Native";

/// Global function the content exposes for outbound events.
pub const DEFAULT_ENTRY_FUNCTION: &str = "onSDKEvent";

// ============================================================================
// BridgeOptions
// ============================================================================

/// Wire names and surface settings for one bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeOptions {
    /// Native interface name visible to the content.
    pub interface_name: String,

    /// Content function receiving outbound envelopes.
    pub entry_function: String,

    /// `source` marker on outbound envelopes.
    pub source: String,

    /// Content surface settings.
    pub surface: SurfaceOptions,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl BridgeOptions {
    /// Creates the default options.
    #[must_use]
    pub fn new() -> Self {
        Self {
            interface_name: DEFAULT_INTERFACE_NAME.to_string(),
            entry_function: DEFAULT_ENTRY_FUNCTION.to_string(),
            source: DEFAULT_SOURCE.to_string(),
            surface: SurfaceOptions::new(),
        }
    }

    /// Sets the native interface name.
    #[inline]
    #[must_use]
    pub fn with_interface_name(mut self, name: impl Into<String>) -> Self {
        self.interface_name = name.into();
        self
    }

    /// Sets the content entry function.
    #[inline]
    #[must_use]
    pub fn with_entry_function(mut self, function: impl Into<String>) -> Self {
        self.entry_function = function.into();
        self
    }

    /// Sets the outbound `source` marker.
    #[inline]
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Sets the surface settings.
    #[inline]
    #[must_use]
    pub fn with_surface(mut self, surface: SurfaceOptions) -> Self {
        self.surface = surface;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::host::CacheMode;

    #[test]
    fn test_defaults() {
        let options = BridgeOptions::default();
        assert_eq!(options.interface_name, "Native");
        assert_eq!(options.entry_function, "onSDKEvent");
        assert_eq!(options.source, "blaze");
        assert_eq!(options.surface, SurfaceOptions::new());
    }

    #[test]
    fn test_builder_methods() {
        let options = BridgeOptions::new()
            .with_interface_name("BlazeNative")
            .with_entry_function("window.onBlazeEvent")
            .with_source("blaze-v2")
            .with_surface(SurfaceOptions::new().with_cache_mode(CacheMode::NoCache));

        assert_eq!(options.interface_name, "BlazeNative");
        assert_eq!(options.entry_function, "window.onBlazeEvent");
        assert_eq!(options.source, "blaze-v2");
        assert_eq!(options.surface.cache_mode, CacheMode::NoCache);
    }
}
