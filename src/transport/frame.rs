//! Socket surface frames.
//!
//! Every frame is one JSON text message tagged by `type`.
//!
//! # Host → content
//!
//! | `type` | Fields |
//! |--------|--------|
//! | `configure` | `options` |
//! | `addInterface` | `name` |
//! | `removeInterface` | `name` |
//! | `load` | `url` |
//! | `evaluate` | `script` |
//! | `goBack`, `attach`, `detach`, `stopLoading`, `close` | none |
//!
//! # Content → host
//!
//! | `type` | Fields |
//! |--------|--------|
//! | `native` | `interface`, `payload` |
//! | `location` | `url`, `canGoBack` |

use serde::{Deserialize, Serialize};

use crate::host::SurfaceOptions;

/// A frame sent to the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum HostFrame {
    /// Apply surface settings.
    Configure {
        /// Settings to apply.
        options: SurfaceOptions,
    },
    /// Expose a native interface under `name`.
    AddInterface {
        /// Interface name.
        name: String,
    },
    /// Withdraw a native interface.
    RemoveInterface {
        /// Interface name.
        name: String,
    },
    /// Navigate to `url`.
    Load {
        /// Target URL.
        url: String,
    },
    /// Run `script` in the page.
    Evaluate {
        /// Script source.
        script: String,
    },
    /// Navigate back.
    GoBack,
    /// Show the content.
    Attach,
    /// Hide the content.
    Detach,
    /// Stop loading.
    StopLoading,
    /// Release the page; the socket closes after this frame.
    Close,
}

/// A frame received from the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ContentFrame {
    /// The content called a native interface.
    Native {
        /// Interface name.
        interface: String,
        /// Raw envelope passed to `on_event`.
        payload: String,
    },
    /// The page navigated.
    Location {
        /// Current URL.
        url: Option<String>,
        /// Whether history can go back.
        #[serde(default)]
        can_go_back: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::{from_str, json, to_value};

    #[test]
    fn test_host_frame_shapes() {
        assert_eq!(
            to_value(HostFrame::Load { url: "https://x/".into() }).expect("json"),
            json!({ "type": "load", "url": "https://x/" })
        );
        assert_eq!(
            to_value(HostFrame::StopLoading).expect("json"),
            json!({ "type": "stopLoading" })
        );
        assert_eq!(
            to_value(HostFrame::Configure { options: SurfaceOptions::new() }).expect("json"),
            json!({
                "type": "configure",
                "options": {
                    "javascriptEnabled": true,
                    "domStorageEnabled": true,
                    "cacheMode": "default",
                },
            })
        );
    }

    #[test]
    fn test_content_frames_parse() {
        let frame: ContentFrame =
            from_str(r#"{"type":"location","url":"https://x/a","canGoBack":true}"#).expect("parse");
        assert_eq!(
            frame,
            ContentFrame::Location {
                url: Some("https://x/a".into()),
                can_go_back: true,
            }
        );

        let frame: ContentFrame = from_str(
            r#"{"type":"native","interface":"Native","payload":"{\"eventName\":\"appReady\"}"}"#,
        )
        .expect("parse");
        assert!(matches!(frame, ContentFrame::Native { ref interface, .. } if interface == "Native"));
    }

    #[test]
    fn test_unknown_content_frame_is_rejected() {
        assert!(from_str::<ContentFrame>(r#"{"type":"teleport"}"#).is_err());
    }
}
