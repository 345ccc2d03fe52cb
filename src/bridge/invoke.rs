//! `invokeMethod` handlers.
//!
//! Each request yields exactly one `invokeMethodResult` event, sent through
//! the same readiness-gated path as every other outbound event.
//! Collaborator failures become result values and never escape.
//!
//! | Method | Result |
//! |--------|--------|
//! | `saveToStorage` | `true` / `false` |
//! | `getFromStorage` | `{ key, value }`, `value` may be `null` |
//! | `openApp` | success message or `"Failed to invoke intent: <reason>"` |
//! | `findApps` | JSON-encoded array string of `{ packageName, appName }` |
//! | other | `"Method not found"` |

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::host::{AppInfo, AppResolver};
use crate::protocol::{
    InvokeRequest, InvokeResult, LAUNCH_FAILED_PREFIX, LAUNCH_SUCCEEDED, Method, names,
};

use super::core::BridgeInner;

// ============================================================================
// Dispatch
// ============================================================================

impl BridgeInner {
    /// Runs one invoke request and sends its result.
    pub(crate) fn handle_invoke(&self, request: InvokeRequest) {
        debug!(
            bridge_id = %self.id,
            request_id = %request.request_id,
            method = %request.method_name,
            "Invoke request"
        );

        let result = match request.method() {
            Method::SaveToStorage { key, value } => {
                InvokeResult::new(&request, self.save_to_storage(&key, &value))
            }
            Method::GetFromStorage { key } => {
                InvokeResult::new(&request, self.get_from_storage(&key))
            }
            Method::OpenApp { intent_uri } => {
                InvokeResult::new(&request, self.open_app(&intent_uri))
            }
            Method::FindApps { payload } => InvokeResult::new(&request, self.find_apps(&payload)),
            Method::Unknown => {
                debug!(bridge_id = %self.id, method = %request.method_name, "Method not found");
                InvokeResult::method_not_found(&request)
            }
        };

        self.send_event(names::INVOKE_METHOD_RESULT, result.into_event_data());
    }
}

// ============================================================================
// Handlers
// ============================================================================

impl BridgeInner {
    fn save_to_storage(&self, key: &str, value: &str) -> Value {
        match self.storage.set(key, value) {
            Ok(()) => Value::Bool(true),
            Err(e) => {
                warn!(bridge_id = %self.id, key, error = %e, "saveToStorage failed");
                Value::Bool(false)
            }
        }
    }

    fn get_from_storage(&self, key: &str) -> Value {
        let value = self.storage.get(key).unwrap_or_else(|e| {
            warn!(bridge_id = %self.id, key, error = %e, "getFromStorage failed");
            None
        });

        json!({ "key": key, "value": value })
    }

    fn open_app(&self, intent_uri: &str) -> Value {
        let outcome = self
            .app_resolver()
            .and_then(|apps| apps.launch(intent_uri));

        let message = match outcome {
            Ok(()) => LAUNCH_SUCCEEDED.to_string(),
            Err(e) => {
                warn!(bridge_id = %self.id, intent_uri, error = %e, "openApp failed");
                format!("{LAUNCH_FAILED_PREFIX}{e}")
            }
        };

        Value::String(message)
    }

    fn find_apps(&self, payload: &str) -> Value {
        let apps = match self.app_resolver().and_then(|apps| self.list_apps(&*apps, payload)) {
            Ok(apps) => apps,
            Err(e) => {
                warn!(bridge_id = %self.id, payload, error = %e, "findApps failed");
                Vec::new()
            }
        };

        // The content expects the array as an encoded string.
        let encoded = serde_json::to_string(&apps).unwrap_or_else(|_| "[]".to_string());
        Value::String(encoded)
    }

    /// Lists, sorts and resolves the candidates for `payload`.
    fn list_apps(&self, apps: &dyn AppResolver, payload: &str) -> Result<Vec<AppInfo>> {
        let mut candidates = apps.list_matching(payload)?;
        candidates.sort_by(|a, b| {
            a.display_name
                .to_lowercase()
                .cmp(&b.display_name.to_lowercase())
                .then_with(|| a.display_name.cmp(&b.display_name))
        });

        Ok(candidates
            .iter()
            .filter_map(|candidate| match apps.resolve(candidate) {
                Ok(info) => Some(info),
                Err(e) => {
                    warn!(
                        bridge_id = %self.id,
                        package = %candidate.package_name,
                        error = %e,
                        "Skipping unresolvable app"
                    );
                    None
                }
            })
            .collect())
    }

    /// Returns the host's app resolver.
    fn app_resolver(&self) -> Result<Arc<dyn AppResolver>> {
        let host = self.host.upgrade().ok_or(Error::HostUnavailable)?;
        host.apps
            .clone()
            .ok_or_else(|| Error::app_resolution("No application resolver configured"))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use crate::bridge::test_support::Harness;
    use crate::error::{Error, Result};
    use crate::host::{
        AppCandidate, AppInfo, AppResolver, InstalledApp, KeyValueStore, MemoryStore,
        StaticAppResolver,
    };
    use crate::protocol::OutboundEvent;

    /// Storage whose every call fails.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn set(&self, key: &str, _value: &str) -> Result<()> {
            Err(Error::storage(key, "disk full"))
        }

        fn get(&self, key: &str) -> Result<Option<String>> {
            Err(Error::storage(key, "disk unreadable"))
        }
    }

    fn invoke_event(method: &str, request_id: &str, params: Value) -> String {
        let data = json!({
            "methodName": method,
            "requestId": request_id,
            "params": params.to_string(),
        });
        json!({ "eventName": "invokeMethod", "eventData": data.to_string() }).to_string()
    }

    fn results(harness: &Harness) -> Vec<Value> {
        harness
            .surface
            .delivered()
            .into_iter()
            .filter(|e| e.event_name == "invokeMethodResult")
            .map(|e: OutboundEvent| e.event_data)
            .collect()
    }

    fn apps() -> StaticAppResolver {
        StaticAppResolver::new()
            .install(InstalledApp::new("com.phonepe.app", "PhonePe").handles("upi"))
            .install(InstalledApp::new("com.google.pay", "google Pay").handles("upi"))
            .install(InstalledApp::new("in.amazon.pay", "Amazon Pay").handles("upi"))
            .install(InstalledApp::new("org.mozilla.firefox", "Firefox").handles("https"))
    }

    #[tokio::test]
    async fn test_storage_roundtrip() {
        let harness = Harness::ready().await;

        harness.bridge.on_event(&invoke_event(
            "saveToStorage",
            "r1",
            json!({ "key": "token", "value": "abc" }),
        ));
        harness
            .bridge
            .on_event(&invoke_event("getFromStorage", "r2", json!({ "key": "token" })));
        harness.flush().await;

        assert_eq!(
            results(&harness),
            vec![
                json!({ "requestId": "r1", "methodName": "saveToStorage", "methodResult": true }),
                json!({
                    "requestId": "r2",
                    "methodName": "getFromStorage",
                    "methodResult": { "key": "token", "value": "abc" },
                }),
            ]
        );
    }

    #[tokio::test]
    async fn test_unset_key_is_null() {
        let harness = Harness::ready().await;

        harness
            .bridge
            .on_event(&invoke_event("getFromStorage", "r1", json!({ "key": "missing" })));
        harness.flush().await;

        assert_eq!(
            results(&harness)[0]["methodResult"],
            json!({ "key": "missing", "value": null })
        );
    }

    #[tokio::test]
    async fn test_seeded_storage_is_visible() {
        let store = MemoryStore::new();
        store.set("lang", "en").expect("seed");
        let harness = Harness::build(None, store);
        harness.make_ready().await;

        harness
            .bridge
            .on_event(&invoke_event("getFromStorage", "r1", json!({ "key": "lang" })));
        harness.flush().await;

        assert_eq!(results(&harness)[0]["methodResult"]["value"], "en");
    }

    #[tokio::test]
    async fn test_storage_failures_become_values() {
        let harness = Harness::build(None, BrokenStore);
        harness.make_ready().await;

        harness.bridge.on_event(&invoke_event(
            "saveToStorage",
            "r1",
            json!({ "key": "k", "value": "v" }),
        ));
        harness
            .bridge
            .on_event(&invoke_event("getFromStorage", "r2", json!({ "key": "k" })));
        harness.flush().await;

        let results = results(&harness);
        assert_eq!(results[0]["methodResult"], false);
        assert_eq!(results[1]["methodResult"], json!({ "key": "k", "value": null }));
    }

    #[tokio::test]
    async fn test_method_not_found_echoes_request() {
        let harness = Harness::ready().await;

        harness
            .bridge
            .on_event(&invoke_event("teleport", "abc", json!({})));
        harness.flush().await;

        assert_eq!(
            results(&harness),
            vec![json!({
                "requestId": "abc",
                "methodName": "teleport",
                "methodResult": "Method not found",
            })]
        );
    }

    #[tokio::test]
    async fn test_params_may_be_an_object() {
        let harness = Harness::ready().await;

        let raw = json!({
            "eventName": "invokeMethod",
            "eventData": {
                "methodName": "saveToStorage",
                "requestId": "r1",
                "params": { "key": "k", "value": "v" },
            },
        });
        harness.bridge.on_event(&raw.to_string());
        harness.flush().await;

        assert_eq!(results(&harness)[0]["methodResult"], true);
    }

    #[tokio::test]
    async fn test_find_apps_sorted_by_display_name() {
        let harness = Harness::build(Some(apps()), MemoryStore::new());
        harness.make_ready().await;

        harness
            .bridge
            .on_event(&invoke_event("findApps", "r1", json!({ "payload": "upi://pay" })));
        harness.flush().await;

        let encoded = results(&harness)[0]["methodResult"]
            .as_str()
            .expect("string result")
            .to_string();
        let apps: Vec<AppInfo> = serde_json::from_str(&encoded).expect("array");
        let names: Vec<_> = apps.iter().map(|a| a.app_name.as_str()).collect();

        assert_eq!(names, ["Amazon Pay", "google Pay", "PhonePe"]);
    }

    #[tokio::test]
    async fn test_find_apps_no_match_or_no_resolver() {
        let with_apps = Harness::build(Some(apps()), MemoryStore::new());
        with_apps.make_ready().await;
        with_apps
            .bridge
            .on_event(&invoke_event("findApps", "r1", json!({ "payload": "tel:123" })));
        with_apps.flush().await;
        assert_eq!(results(&with_apps)[0]["methodResult"], "[]");

        let without = Harness::ready().await;
        without
            .bridge
            .on_event(&invoke_event("findApps", "r1", json!({ "payload": "upi://pay" })));
        without.flush().await;
        assert_eq!(results(&without)[0]["methodResult"], "[]");
    }

    #[tokio::test]
    async fn test_find_apps_skips_unresolvable_candidates() {
        struct FlakyResolver;

        impl AppResolver for FlakyResolver {
            fn launch(&self, _uri: &str) -> Result<()> {
                Ok(())
            }

            fn list_matching(&self, _uri: &str) -> Result<Vec<AppCandidate>> {
                Ok(vec![
                    AppCandidate::new("gone.app", "Gone"),
                    AppCandidate::new("ok.app", "Okay"),
                ])
            }

            fn resolve(&self, candidate: &AppCandidate) -> Result<AppInfo> {
                if candidate.package_name == "gone.app" {
                    return Err(Error::app_resolution("package uninstalled"));
                }
                Ok(AppInfo {
                    package_name: candidate.package_name.clone(),
                    app_name: candidate.display_name.clone(),
                })
            }
        }

        let harness = Harness::ready().await;
        let inner = &harness.bridge.inner;

        let apps = inner.list_apps(&FlakyResolver, "any").expect("list");
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].package_name, "ok.app");
    }

    #[tokio::test]
    async fn test_open_app() {
        let harness = Harness::build(Some(apps()), MemoryStore::new());
        harness.make_ready().await;

        harness.bridge.on_event(&invoke_event(
            "openApp",
            "r1",
            json!({ "intentUri": "upi://pay?pa=m@bank" }),
        ));
        harness
            .bridge
            .on_event(&invoke_event("openApp", "r2", json!({ "intentUri": "mailto:a@b.c" })));
        harness.flush().await;

        let results = results(&harness);
        assert_eq!(results[0]["methodResult"], "Successfully triggered intent");

        let failure = results[1]["methodResult"].as_str().expect("string");
        assert!(failure.starts_with("Failed to invoke intent: "));
        assert!(failure.contains("mailto:a@b.c"));
    }

    #[tokio::test]
    async fn test_open_app_without_resolver_fails() {
        let harness = Harness::ready().await;

        harness
            .bridge
            .on_event(&invoke_event("openApp", "r1", json!({ "intentUri": "upi://pay" })));
        harness.flush().await;

        let result = results(&harness)[0]["methodResult"]
            .as_str()
            .expect("string")
            .to_string();
        assert!(result.starts_with("Failed to invoke intent: "));
    }

    #[tokio::test]
    async fn test_results_wait_for_readiness() {
        let harness = Harness::new();

        harness
            .bridge
            .on_event(&invoke_event("teleport", "r1", json!({})));
        harness.flush().await;
        assert!(results(&harness).is_empty());
        assert_eq!(harness.bridge.pending_count(), 2);

        harness.make_ready().await;
        assert_eq!(results(&harness).len(), 1);
    }
}
