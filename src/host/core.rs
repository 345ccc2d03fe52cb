//! Host handle and builder.
//!
//! The [`Host`] represents the native application embedding the content. It
//! owns the delivery context, the surface factory and the optional app
//! resolver. Bridges only hold a weak reference to it: once the host is
//! dropped, anything a bridge would do through it becomes a no-op.
//!
//! # Example
//!
//! ```ignore
//! use blaze_bridge::{Host, StaticAppResolver};
//!
//! let host = Host::builder()
//!     .surface_factory(|options: &SurfaceOptions| my_web_view(options))
//!     .app_resolver(StaticAppResolver::new())
//!     .build()?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::{Arc, Weak};

use tokio::runtime::Handle;
use tracing::debug;

use crate::error::{Error, Result};

use super::apps::AppResolver;
use super::surface::SurfaceFactory;
use super::ui::UiContext;

// ============================================================================
// Types
// ============================================================================

/// Internal shared state for a host.
pub(crate) struct HostInner {
    /// Delivery context.
    pub ui: UiContext,
    /// Creates one surface per bridge.
    pub surfaces: Box<dyn SurfaceFactory>,
    /// Application lookup, if the platform offers one.
    pub apps: Option<Arc<dyn AppResolver>>,
}

impl Drop for HostInner {
    fn drop(&mut self) {
        self.ui.shutdown();
    }
}

// ============================================================================
// Host
// ============================================================================

/// Handle to the native host application.
#[derive(Clone)]
pub struct Host {
    /// Shared inner state.
    pub(crate) inner: Arc<HostInner>,
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("ui_running", &self.inner.ui.is_running())
            .field("has_app_resolver", &self.inner.apps.is_some())
            .finish_non_exhaustive()
    }
}

impl Host {
    /// Creates a host builder.
    #[inline]
    #[must_use]
    pub fn builder() -> HostBuilder {
        HostBuilder::new()
    }

    /// Returns the delivery context.
    #[inline]
    #[must_use]
    pub fn ui(&self) -> &UiContext {
        &self.inner.ui
    }

    /// Posts `task` to the delivery context.
    ///
    /// Returns `false` if the context has stopped.
    #[inline]
    pub fn run_on_ui_thread(&self, task: impl FnOnce() + Send + 'static) -> bool {
        self.inner.ui.run(task)
    }

    /// Waits until every task posted so far has run.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HostUnavailable`] if the delivery context stopped.
    pub async fn flush(&self) -> Result<()> {
        self.inner.ui.flush().await
    }

    /// Stops the delivery context after the tasks already posted.
    pub fn shutdown(&self) {
        debug!("Host shutdown requested");
        self.inner.ui.shutdown();
    }

    /// Returns a weak reference for bridges.
    #[inline]
    pub(crate) fn downgrade(&self) -> Weak<HostInner> {
        Arc::downgrade(&self.inner)
    }
}

// ============================================================================
// HostBuilder
// ============================================================================

/// Builder for a [`Host`].
#[derive(Default)]
pub struct HostBuilder {
    surfaces: Option<Box<dyn SurfaceFactory>>,
    apps: Option<Arc<dyn AppResolver>>,
    runtime: Option<Handle>,
}

impl fmt::Debug for HostBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostBuilder")
            .field("has_surface_factory", &self.surfaces.is_some())
            .field("has_app_resolver", &self.apps.is_some())
            .finish_non_exhaustive()
    }
}

impl HostBuilder {
    /// Creates an empty builder.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the surface factory.
    #[inline]
    #[must_use]
    pub fn surface_factory(mut self, factory: impl SurfaceFactory + 'static) -> Self {
        self.surfaces = Some(Box::new(factory));
        self
    }

    /// Sets the application resolver.
    #[inline]
    #[must_use]
    pub fn app_resolver(mut self, resolver: impl AppResolver + 'static) -> Self {
        self.apps = Some(Arc::new(resolver));
        self
    }

    /// Sets the runtime the delivery context runs on.
    ///
    /// Defaults to the runtime `build` is called from.
    #[inline]
    #[must_use]
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Builds the host and starts its delivery context.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if no surface factory is set
    /// - [`Error::Config`] if no runtime is set and `build` runs outside one
    pub fn build(self) -> Result<Host> {
        let surfaces = self.surfaces.ok_or_else(|| {
            Error::config(
                "Surface factory is required. Use .surface_factory() to set it.",
            )
        })?;

        let runtime = match self.runtime {
            Some(runtime) => runtime,
            None => Handle::try_current().map_err(|_| {
                Error::config(
                    "Host must be built inside a tokio runtime. Use .runtime() to pass one.",
                )
            })?,
        };

        debug!(has_app_resolver = self.apps.is_some(), "Host created");

        Ok(Host {
            inner: Arc::new(HostInner {
                ui: UiContext::spawn(&runtime),
                surfaces,
                apps: self.apps,
            }),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
