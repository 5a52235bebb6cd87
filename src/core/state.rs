//! Process-wide run state.
//!
//! Three orthogonal flags:
//! - `SERVING`: the initial build finished and the dev server is answering
//! - `BUSY`: a watcher-triggered task sequence is running
//! - `SHUTDOWN`: Ctrl+C received

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use tiny_http::Server;

/// Initial build complete, dev server answering requests.
static SERVING: AtomicBool = AtomicBool::new(false);

/// A task sequence triggered by the watcher is in progress.
static BUSY: AtomicBool = AtomicBool::new(false);

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// HTTP server reference for graceful shutdown
static SERVER: OnceLock<Arc<Server>> = OnceLock::new();

/// Shutdown signal sender for actor system
static SHUTDOWN_TX: OnceLock<crossbeam::channel::Sender<()>> = OnceLock::new();

// =============================================================================
// SERVING state
// =============================================================================

pub fn is_serving() -> bool {
    SERVING.load(Ordering::SeqCst)
}

/// Mark the dev server as ready (call after the initial build completes)
pub fn set_serving() {
    SERVING.store(true, Ordering::SeqCst);
}

// =============================================================================
// BUSY state
// =============================================================================

pub fn is_busy() -> bool {
    BUSY.load(Ordering::Acquire)
}

pub fn begin_update() {
    BUSY.store(true, Ordering::Release);
}

pub fn end_update() {
    BUSY.store(false, Ordering::Release);
}

// =============================================================================
// SHUTDOWN state
// =============================================================================

/// Setup the global Ctrl+C handler. Call once at program start
///
/// The handler behavior depends on what has been registered:
/// - Nothing: exit immediately (one-shot tasks have nothing to unwind)
/// - `register_shutdown()` only: notify the actor system (watch mode)
/// - `register_server()`: also unblock the HTTP request loop
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        SHUTDOWN.store(true, Ordering::SeqCst);

        let notified = SHUTDOWN_TX.get().is_some_and(|tx| tx.send(()).is_ok());

        if let Some(server) = SERVER.get() {
            crate::log!("serve"; "shutting down...");
            server.unblock();
        } else if !notified {
            std::process::exit(130);
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Register the actor system shutdown channel.
pub fn register_shutdown(shutdown_tx: crossbeam::channel::Sender<()>) {
    let _ = SHUTDOWN_TX.set(shutdown_tx);
}

/// Register the HTTP server for graceful shutdown
///
/// Call this after binding the server, before entering the request loop
pub fn register_server(server: Arc<Server>) {
    let _ = SERVER.set(server);
}

/// Check if shutdown has been requested
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}
