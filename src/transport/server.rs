//! WebSocket server for socket-backed pages.
//!
//! # Connection Flow
//!
//! 1. Host binds a WebSocket server to `localhost:0` (random port)
//! 2. Host opens the page, passing it the WebSocket URL
//! 3. Page connects and the connection is upgraded
//! 4. The accepted [`SocketSurface`] backs a host or a single bridge

// ============================================================================
// Imports
// ============================================================================

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::time::timeout;
use tracing::{debug, info};

use crate::error::{Error, Result};

use super::SocketSurface;

// ============================================================================
// Constants
// ============================================================================

/// Default time to wait for the page to connect.
pub const DEFAULT_ACCEPT_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// PendingServer
// ============================================================================

/// A WebSocket server that is bound but not yet connected.
///
/// # Example
///
/// ```ignore
/// use std::net::{IpAddr, Ipv4Addr};
/// use blaze_bridge::transport::PendingServer;
///
/// let server = PendingServer::bind(IpAddr::V4(Ipv4Addr::LOCALHOST), 0).await?;
/// let ws_url = server.ws_url();
///
/// // Open the page with ws_url...
///
/// let surface = server.accept().await?;
/// ```
pub struct PendingServer {
    /// TCP listener for incoming connections.
    listener: TcpListener,
    /// Address the server is bound to.
    addr: SocketAddr,
}

impl PendingServer {
    /// Binds a WebSocket server to the specified address and port.
    ///
    /// Use port 0 to let the OS assign a random available port.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if binding fails.
    pub async fn bind(ip: IpAddr, port: u16) -> Result<Self> {
        let listener = TcpListener::bind(SocketAddr::new(ip, port)).await?;
        let addr = listener.local_addr()?;

        debug!(%addr, "WebSocket server bound");

        Ok(Self { listener, addr })
    }

    /// Binds to a random port on the IPv4 loopback.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if binding fails.
    pub async fn bind_localhost() -> Result<Self> {
        Self::bind(IpAddr::V4(Ipv4Addr::LOCALHOST), 0).await
    }

    /// Returns the port the server is bound to.
    #[inline]
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Returns the WebSocket URL for this server.
    ///
    /// Format: `ws://{ip}:{port}`
    #[inline]
    #[must_use]
    pub fn ws_url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Returns the local socket address.
    #[inline]
    #[must_use]
    pub const fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Accepts the page's connection, waiting up to 30 seconds.
    ///
    /// # Errors
    ///
    /// See [`accept_with_timeout`](Self::accept_with_timeout).
    pub async fn accept(self) -> Result<SocketSurface> {
        self.accept_with_timeout(DEFAULT_ACCEPT_TIMEOUT).await
    }

    /// Accepts the page's connection and upgrades it to WebSocket.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionTimeout`] if nothing connects in time
    /// - [`Error::Io`] if accepting the TCP connection fails
    /// - [`Error::Connection`] if the WebSocket upgrade fails
    pub async fn accept_with_timeout(self, accept_timeout: Duration) -> Result<SocketSurface> {
        let (stream, peer) = timeout(accept_timeout, self.listener.accept())
            .await
            .map_err(|_| Error::connection_timeout(accept_timeout.as_millis() as u64))??;

        debug!(%peer, "TCP connection accepted");

        let ws_stream = tokio_tungstenite::accept_async(stream)
            .await
            .map_err(|e| Error::connection(format!("WebSocket upgrade failed: {e}")))?;

        info!(port = self.addr.port(), "Page connected");

        Ok(SocketSurface::new(ws_stream))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_server_bind_random_port() {
        let server = PendingServer::bind_localhost()
            .await
            .expect("bind should succeed");

        assert!(server.port() > 0);
        assert_eq!(server.ws_url(), format!("ws://127.0.0.1:{}", server.port()));
        assert_eq!(server.local_addr().ip(), IpAddr::V4(Ipv4Addr::LOCALHOST));
    }

    #[tokio::test]
    async fn test_accept_times_out() {
        let server = PendingServer::bind_localhost()
            .await
            .expect("bind should succeed");

        let err = server
            .accept_with_timeout(Duration::from_millis(50))
            .await
            .err()
            .expect("no page connects");

        assert!(matches!(err, Error::ConnectionTimeout { timeout_ms: 50 }));
        assert!(err.is_connection_error());
    }

    #[tokio::test]
    async fn test_accept_page_connection() {
        let server = PendingServer::bind_localhost()
            .await
            .expect("bind should succeed");
        let url = server.ws_url();

        let page = tokio::spawn(async move { tokio_tungstenite::connect_async(url).await });

        let surface = server.accept().await.expect("accept");
        assert!(surface.is_connected());

        let (_page_stream, _) = page.await.expect("join").expect("connect");
    }
}
