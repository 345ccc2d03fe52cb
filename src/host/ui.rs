//! Sequential delivery context.
//!
//! Embedded content can only be touched from the host's UI-affine context.
//! [`UiContext`] stands in for it: a tokio task that runs posted closures
//! one at a time, in posting order.
//!
//! # Event Loop
//!
//! ```text
//! Bridge ──run(task)──► mpsc ──► UI task ──► task() ──► ContentSurface
//!        ──flush()────►      ──► oneshot ack
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};

// ============================================================================
// Types
// ============================================================================

/// A unit of work posted to the delivery context.
pub type UiTask = Box<dyn FnOnce() + Send + 'static>;

/// Internal commands for the event loop.
enum UiCommand {
    /// Run a posted task.
    Run(UiTask),
    /// Acknowledge once every earlier command has been processed.
    Flush(oneshot::Sender<()>),
    /// Stop the loop.
    Shutdown,
}

// ============================================================================
// UiContext
// ============================================================================

/// Handle to the sequential delivery context.
///
/// Posting is non-blocking. Tasks run in FIFO order on a dedicated tokio
/// task; a panicking task is logged and does not stop the loop.
#[derive(Clone)]
pub struct UiContext {
    /// Channel to the event loop.
    command_tx: mpsc::UnboundedSender<UiCommand>,
}

impl UiContext {
    /// Spawns the event loop on `runtime`.
    pub(crate) fn spawn(runtime: &Handle) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        runtime.spawn(Self::run_event_loop(command_rx));
        Self { command_tx }
    }

    /// Posts `task` to the delivery context.
    ///
    /// Returns `false` if the loop has stopped and the task was dropped.
    pub fn run(&self, task: impl FnOnce() + Send + 'static) -> bool {
        let posted = self.command_tx.send(UiCommand::Run(Box::new(task))).is_ok();
        if !posted {
            debug!("UI context stopped, task dropped");
        }
        posted
    }

    /// Waits until every task posted before this call has run.
    ///
    /// # Errors
    ///
    /// - [`Error::HostUnavailable`] if the loop has stopped
    /// - [`Error::ChannelClosed`] if the loop stops before acknowledging
    pub async fn flush(&self) -> Result<()> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.command_tx
            .send(UiCommand::Flush(ack_tx))
            .map_err(|_| Error::HostUnavailable)?;
        ack_rx.await?;
        Ok(())
    }

    /// Stops the loop after the tasks already posted.
    pub fn shutdown(&self) {
        let _ = self.command_tx.send(UiCommand::Shutdown);
    }

    /// Returns `true` while the loop accepts tasks.
    #[inline]
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.command_tx.is_closed()
    }

    /// Event loop processing posted commands.
    async fn run_event_loop(mut command_rx: mpsc::UnboundedReceiver<UiCommand>) {
        while let Some(command) = command_rx.recv().await {
            match command {
                UiCommand::Run(task) => {
                    if let Err(panic) = catch_unwind(AssertUnwindSafe(task)) {
                        warn!(reason = %panic_message(panic.as_ref()), "UI task panicked");
                    }
                }

                UiCommand::Flush(ack_tx) => {
                    trace!("UI context flushed");
                    let _ = ack_tx.send(());
                }

                UiCommand::Shutdown => {
                    debug!("UI context shutdown requested");
                    break;
                }
            }
        }

        debug!("UI context terminated");
    }
}

/// Extracts a readable message from a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

// ============================================================================
// Tests
// ============================================================================
