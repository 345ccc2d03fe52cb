//! Bridge over a browser page connected through a WebSocket.
//!
//! Demonstrates:
//! - Accepting a page as the content surface
//! - Building a host with storage and an app resolver
//! - Queued delivery until the content signals `appReady`
//! - Back-press handling and termination
//!
//! The page must connect to the printed URL and speak the socket surface
//! frames (`native`, `location` in; `load`, `evaluate`, ... out).
//!
//! Usage:
//!   cargo run --example socket_bridge
//!   cargo run --example socket_bridge -- --debug
//!   cargo run --example socket_bridge -- --no-wait

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use anyhow::Context;
use blaze_bridge::transport::PendingServer;
use blaze_bridge::{Bridge, FileStore, Host, InstalledApp, StaticAppResolver};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

// ============================================================================
// Constants
// ============================================================================

const BASE_URL: &str = "http://127.0.0.1:8000/index.html";

const ACCEPT_TIMEOUT: Duration = Duration::from_secs(120);

// ============================================================================
// Args
// ============================================================================

/// Command-line arguments.
#[derive(Debug, Clone)]
struct Args {
    debug: bool,
    no_wait: bool,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = std::env::args().collect();
        Self {
            debug: args.iter().any(|a| a == "--debug"),
            no_wait: args.iter().any(|a| a == "--no-wait"),
        }
    }
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.debug);

    if let Err(e) = run(args).await {
        eprintln!("\n[ERROR] {e:#}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    println!("=== Socket Bridge ===\n");

    // ========================================================================
    // Accept Page
    // ========================================================================

    let server = PendingServer::bind_localhost().await?;
    println!("[Setup] Waiting for the page on {}", server.ws_url());

    let surface = server
        .accept_with_timeout(ACCEPT_TIMEOUT)
        .await
        .context("page did not connect")?;
    println!("        ✓ Page connected\n");

    // ========================================================================
    // Host and Bridge
    // ========================================================================

    let storage_dir = tempfile::tempdir()?;
    let storage = FileStore::open(storage_dir.path())?;

    let apps = StaticAppResolver::new()
        .install(InstalledApp::new("com.example.wallet", "Wallet").handles("upi"))
        .install(InstalledApp::new("org.example.browser", "Browser").handles("https"));

    let host = Host::builder()
        .surface_factory(surface)
        .app_resolver(apps)
        .build()?;

    let bridge = Bridge::builder()
        .initiate_payload(json!({
            "baseUrl": BASE_URL,
            "merchantId": "demo-merchant",
            "environment": "sandbox",
        }))
        .callback(|payload: Value| println!("[Callback] {payload}"))
        .storage(storage)
        .build(&host)?;

    println!("[Bridge] {} loading {}", bridge.id(), bridge.base_url());

    // ========================================================================
    // Events
    // ========================================================================

    bridge.process(json!({ "action": "checkout", "amount": 499 }));
    bridge.process(json!({ "action": "checkout", "amount": 599 }));
    println!(
        "[Bridge] {} event(s) queued until appReady (last checkout wins)",
        bridge.pending_count()
    );

    if args.no_wait {
        println!("[--no-wait] Skipping wait");
    } else {
        println!("Press Ctrl+C to terminate...");
        tokio::signal::ctrl_c().await.ok();
    }

    // ========================================================================
    // Shutdown
    // ========================================================================

    if bridge.handle_back_press() {
        println!("[Back] Not consumed by content");
    } else {
        println!("[Back] Handed to content");
    }

    bridge.terminate();
    host.flush().await?;
    println!("\n✓ Bridge terminated");

    Ok(())
}

/// Initialize tracing/logging.
fn init_logging(debug: bool) {
    let filter = if debug {
        "blaze_bridge=debug"
    } else {
        "blaze_bridge=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();
}
