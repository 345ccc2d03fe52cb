//! Installed application lookup and launch.
//!
//! Backs the `openApp` and `findApps` invoke methods. Platform hosts
//! implement [`AppResolver`] over their package manager; desktop hosts and
//! tests can use [`StaticAppResolver`].

// ============================================================================
// Imports
// ============================================================================

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};

// ============================================================================
// Types
// ============================================================================

/// An application able to handle a URI, as listed by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppCandidate {
    /// Package identifier.
    pub package_name: String,
    /// Label used for sorting.
    pub display_name: String,
}

impl AppCandidate {
    /// Creates a candidate.
    #[inline]
    #[must_use]
    pub fn new(package_name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            display_name: display_name.into(),
        }
    }
}

/// Resolved application details reported to the content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppInfo {
    /// Package identifier.
    pub package_name: String,
    /// Application label.
    pub app_name: String,
}

// ============================================================================
// AppResolver
// ============================================================================

/// Package-manager style application lookup.
pub trait AppResolver: Send + Sync {
    /// Opens `uri` in whichever application handles it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Launch`] with a human-readable reason.
    fn launch(&self, uri: &str) -> Result<()>;

    /// Lists applications able to handle `uri`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AppResolution`] if the lookup itself fails.
    fn list_matching(&self, uri: &str) -> Result<Vec<AppCandidate>>;

    /// Resolves the details of one candidate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AppResolution`] if the package vanished or cannot be
    /// inspected. Callers skip that candidate.
    fn resolve(&self, candidate: &AppCandidate) -> Result<AppInfo> {
        Ok(AppInfo {
            package_name: candidate.package_name.clone(),
            app_name: candidate.display_name.clone(),
        })
    }
}

// ============================================================================
// InstalledApp
// ============================================================================

/// An entry in a [`StaticAppResolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledApp {
    /// Package identifier.
    pub package_name: String,
    /// Application label.
    pub app_name: String,
    /// URI schemes handled, lowercase.
    pub schemes: Vec<String>,
}

impl InstalledApp {
    /// Creates an app handling no schemes yet.
    #[inline]
    #[must_use]
    pub fn new(package_name: impl Into<String>, app_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            app_name: app_name.into(),
            schemes: Vec::new(),
        }
    }

    /// Adds a handled URI scheme.
    #[inline]
    #[must_use]
    pub fn handles(mut self, scheme: impl Into<String>) -> Self {
        self.schemes.push(scheme.into().to_ascii_lowercase());
        self
    }

    /// Returns `true` if this app handles `url`.
    fn matches(&self, url: &Url) -> bool {
        self.schemes.iter().any(|s| s == url.scheme())
    }
}

// ============================================================================
// StaticAppResolver
// ============================================================================

/// Resolver over a fixed registry of applications.
///
/// Matches by URI scheme. Launches are recorded instead of performed.
#[derive(Debug, Default)]
pub struct StaticAppResolver {
    apps: Vec<InstalledApp>,
    launched: Mutex<Vec<String>>,
}

impl StaticAppResolver {
    /// Creates an empty registry.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an application.
    #[inline]
    #[must_use]
    pub fn install(mut self, app: InstalledApp) -> Self {
        self.apps.push(app);
        self
    }

    /// Returns the URIs launched so far, oldest first.
    #[must_use]
    pub fn launched(&self) -> Vec<String> {
        self.launched.lock().clone()
    }
}

impl AppResolver for StaticAppResolver {
    fn launch(&self, uri: &str) -> Result<()> {
        let url = Url::parse(uri).map_err(|e| Error::launch(format!("Invalid URI '{uri}': {e}")))?;

        let app = self
            .apps
            .iter()
            .find(|app| app.matches(&url))
            .ok_or_else(|| Error::launch(format!("No application can handle '{uri}'")))?;

        debug!(package = %app.package_name, uri, "Launching application");
        self.launched.lock().push(uri.to_string());
        Ok(())
    }

    fn list_matching(&self, uri: &str) -> Result<Vec<AppCandidate>> {
        let url = Url::parse(uri)
            .map_err(|e| Error::app_resolution(format!("Invalid URI '{uri}': {e}")))?;

        Ok(self
            .apps
            .iter()
            .filter(|app| app.matches(&url))
            .map(|app| AppCandidate::new(&app.package_name, &app.app_name))
            .collect())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> StaticAppResolver {
        StaticAppResolver::new()
            .install(InstalledApp::new("com.phonepe.app", "PhonePe").handles("upi"))
            .install(InstalledApp::new("com.google.pay", "Google Pay").handles("UPI"))
            .install(InstalledApp::new("org.mozilla.firefox", "Firefox").handles("https"))
    }

    #[test]
    fn test_list_matching_by_scheme() {
        let matches = resolver()
            .list_matching("upi://pay?pa=merchant@bank")
            .expect("list");

        let packages: Vec<_> = matches.iter().map(|c| c.package_name.as_str()).collect();
        assert_eq!(packages, ["com.phonepe.app", "com.google.pay"]);
    }

    #[test]
    fn test_list_matching_none() {
        let matches = resolver().list_matching("tel:+911234").expect("list");
        assert!(matches.is_empty());
    }

    #[test]
    fn test_list_matching_invalid_uri() {
        let err = resolver().list_matching("not a uri").expect_err("invalid");
        assert!(matches!(err, Error::AppResolution { .. }));
    }

    #[test]
    fn test_launch_records_uri() {
        let resolver = resolver();
        resolver.launch("https://example.com").expect("launch");
        assert_eq!(resolver.launched(), ["https://example.com"]);
    }

    #[test]
    fn test_launch_without_handler() {
        let resolver = resolver();
        let err = resolver.launch("mailto:a@b.c").expect_err("no handler");

        assert!(err.to_string().contains("No application can handle"));
        assert!(resolver.launched().is_empty());
    }

    #[test]
    fn test_default_resolve() {
        let info = resolver()
            .resolve(&AppCandidate::new("com.phonepe.app", "PhonePe"))
            .expect("resolve");

        assert_eq!(info.package_name, "com.phonepe.app");
        assert_eq!(info.app_name, "PhonePe");
    }
}
