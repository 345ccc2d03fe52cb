//! WebSocket-backed content surface.
//!
//! Lets the content run in an ordinary browser page instead of a platform
//! web view. The page connects back to the host over a localhost
//! WebSocket and mirrors the surface calls.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐                              ┌─────────────────┐
//! │  Host (Rust)    │                              │  Browser page   │
//! │                 │         WebSocket            │                 │
//! │  PendingServer  │◄────────────────────────────►│  Blaze content  │
//! │  → SocketSurface│      localhost:PORT          │  + shim         │
//! └─────────────────┘                              └─────────────────┘
//! ```
//!
//! # Connection Lifecycle
//!
//! 1. `PendingServer::bind` - Bind to localhost with random port
//! 2. Open the page with the WebSocket URL
//! 3. `PendingServer::accept` - Wait for the page to connect
//! 4. `SocketSurface` - Surface calls out, native calls and locations in
//! 5. `ContentSurface::destroy` - Send `close` and shut the socket
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `connection` | Socket surface and event loop |
//! | `frame` | Frame types |
//! | `server` | WebSocket server binding and acceptance |

// ============================================================================
// Submodules
// ============================================================================

/// Socket surface and event loop.
pub mod connection;

/// Frame types.
pub mod frame;

/// WebSocket server for socket-backed pages.
pub mod server;

// ============================================================================
// Re-exports
// ============================================================================

pub use connection::SocketSurface;
pub use frame::{ContentFrame, HostFrame};
pub use server::{DEFAULT_ACCEPT_TIMEOUT, PendingServer};
