//! Socket-backed content surface and its event loop.
//!
//! [`SocketSurface`] drives a page connected over a WebSocket. Every
//! [`ContentSurface`] call becomes one [`HostFrame`]; frames from the page
//! are routed to the registered native interfaces or update the cached
//! location.
//!
//! # Event Loop
//!
//! The surface spawns a tokio task that handles:
//!
//! - Outgoing frames posted by surface calls
//! - `native` frames, forwarded to the matching [`NativeInterface`]
//! - `location` frames, cached for `current_url`/`can_go_back`

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::{from_str, to_string};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, trace, warn};

use crate::error::{Error, Result};
use crate::host::{ContentSurface, NativeInterface, SurfaceFactory, SurfaceOptions};

use super::frame::{ContentFrame, HostFrame};

// ============================================================================
// Types
// ============================================================================

/// Native interfaces by name.
type InterfaceMap = FxHashMap<String, Arc<dyn NativeInterface>>;

/// Last location reported by the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Location {
    url: Option<String>,
    can_go_back: bool,
}

/// State shared with the event loop.
#[derive(Default)]
struct Shared {
    interfaces: Mutex<InterfaceMap>,
    location: Mutex<Location>,
}

// ============================================================================
// SurfaceCommand
// ============================================================================

/// Internal commands for the event loop.
enum SurfaceCommand {
    /// Send a frame to the page.
    Send(HostFrame),
    /// Close the socket.
    Shutdown,
}

// ============================================================================
// SocketSurface
// ============================================================================

/// A [`ContentSurface`] whose page lives at the other end of a WebSocket.
///
/// Cheap to clone; clones drive the same page.
///
/// Also a [`SurfaceFactory`] handing out itself, so one accepted page can
/// back a host directly.
#[derive(Clone)]
pub struct SocketSurface {
    /// Channel for sending commands to the event loop.
    command_tx: mpsc::UnboundedSender<SurfaceCommand>,
    /// Interfaces and location (shared with event loop).
    shared: Arc<Shared>,
}

impl SocketSurface {
    /// Creates a surface from an established WebSocket stream.
    ///
    /// Spawns the event loop task internally.
    pub fn new<S>(ws_stream: WebSocketStream<S>) -> Self
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let shared = Arc::new(Shared::default());

        tokio::spawn(Self::run_event_loop(
            ws_stream,
            command_rx,
            Arc::clone(&shared),
        ));

        Self { command_tx, shared }
    }

    /// Sends a frame to the page.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionClosed`] if the event loop has stopped.
    pub fn send(&self, frame: HostFrame) -> Result<()> {
        self.command_tx
            .send(SurfaceCommand::Send(frame))
            .map_err(|_| Error::ConnectionClosed)
    }

    /// Returns `true` while the socket is open.
    #[inline]
    #[must_use]
    pub fn is_connected(&self) -> bool {
        !self.command_tx.is_closed()
    }

    /// Closes the socket after the frames already posted.
    pub fn shutdown(&self) {
        let _ = self.command_tx.send(SurfaceCommand::Shutdown);
    }

    /// Posts a frame; surface calls are fire-and-forget.
    fn post(&self, frame: HostFrame) {
        if let Err(e) = self.send(frame) {
            debug!(error = %e, "Socket closed, frame dropped");
        }
    }

    /// Event loop that handles WebSocket I/O.
    async fn run_event_loop<S>(
        ws_stream: WebSocketStream<S>,
        mut command_rx: mpsc::UnboundedReceiver<SurfaceCommand>,
        shared: Arc<Shared>,
    ) where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let (mut ws_write, mut ws_read) = ws_stream.split();

        loop {
            tokio::select! {
                // Frames from the page
                message = ws_read.next() => {
                    match message {
                        Some(Ok(Message::Text(text))) => {
                            Self::handle_incoming_message(&text, &shared);
                        }

                        Some(Ok(Message::Close(_))) => {
                            debug!("WebSocket closed by remote");
                            break;
                        }

                        Some(Err(e)) => {
                            error!(error = %e, "WebSocket error");
                            break;
                        }

                        None => {
                            debug!("WebSocket stream ended");
                            break;
                        }

                        // Ignore Binary, Ping, Pong
                        _ => {}
                    }
                }

                // Frames from surface calls
                command = command_rx.recv() => {
                    match command {
                        Some(SurfaceCommand::Send(frame)) => {
                            let json = match to_string(&frame) {
                                Ok(json) => json,
                                Err(e) => {
                                    warn!(error = %e, "Failed to serialize frame");
                                    continue;
                                }
                            };

                            if let Err(e) = ws_write.send(Message::Text(json.into())).await {
                                warn!(error = %e, "Failed to send frame");
                                break;
                            }

                            trace!(?frame, "Frame sent");
                        }

                        Some(SurfaceCommand::Shutdown) => {
                            debug!("Shutdown command received");
                            let _ = ws_write.close().await;
                            break;
                        }

                        None => {
                            debug!("Command channel closed");
                            break;
                        }
                    }
                }
            }
        }

        shared.interfaces.lock().clear();
        debug!("Event loop terminated");
    }

    /// Handles one text message from the page.
    fn handle_incoming_message(text: &str, shared: &Shared) {
        let frame = match from_str::<ContentFrame>(text) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, text = %text, "Failed to parse incoming frame");
                return;
            }
        };

        match frame {
            ContentFrame::Native { interface, payload } => {
                // Released before the call; the handler may re-enter the surface.
                let target = shared.interfaces.lock().get(&interface).cloned();

                match target {
                    Some(target) => target.on_event(&payload),
                    None => warn!(interface = %interface, "Call on unregistered interface"),
                }
            }

            ContentFrame::Location { url, can_go_back } => {
                trace!(?url, can_go_back, "Location changed");
                *shared.location.lock() = Location { url, can_go_back };
            }
        }
    }
}

// ============================================================================
// ContentSurface
// ============================================================================

impl ContentSurface for SocketSurface {
    fn add_native_interface(&self, name: &str, interface: Arc<dyn NativeInterface>) {
        self.shared
            .interfaces
            .lock()
            .insert(name.to_string(), interface);
        self.post(HostFrame::AddInterface {
            name: name.to_string(),
        });
    }

    fn remove_native_interface(&self, name: &str) {
        self.shared.interfaces.lock().remove(name);
        self.post(HostFrame::RemoveInterface {
            name: name.to_string(),
        });
    }

    fn load_url(&self, url: &str) {
        self.post(HostFrame::Load {
            url: url.to_string(),
        });
    }

    fn evaluate_script(&self, script: &str) {
        self.post(HostFrame::Evaluate {
            script: script.to_string(),
        });
    }

    fn current_url(&self) -> Option<String> {
        self.shared.location.lock().url.clone()
    }

    fn can_go_back(&self) -> bool {
        self.shared.location.lock().can_go_back
    }

    fn go_back(&self) {
        self.post(HostFrame::GoBack);
    }

    fn attach(&self) {
        self.post(HostFrame::Attach);
    }

    fn detach(&self) {
        self.post(HostFrame::Detach);
    }

    fn stop_loading(&self) {
        self.post(HostFrame::StopLoading);
    }

    fn destroy(&self) {
        self.post(HostFrame::Close);
        self.shutdown();
    }
}

// ============================================================================
// SurfaceFactory
// ============================================================================

impl SurfaceFactory for SocketSurface {
    fn create(&self, options: &SurfaceOptions) -> Result<Arc<dyn ContentSurface>> {
        self.send(HostFrame::Configure { options: *options })?;
        Ok(Arc::new(self.clone()))
    }
}

// ============================================================================
// Tests
// ============================================================================
