//! Development server with live reload support.
//!
//! Serves the build directory as-is. HTML responses carry a small client
//! that listens on the live reload socket.

mod lifecycle;
mod path;
mod response;

pub use lifecycle::{ActorPlan, open_browser, run_actor_system, spawn_actors, wait_for_shutdown};

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU16, Ordering};

use anyhow::{Context, Result};
use tiny_http::{Request, Server};

use crate::config::{PipelineConfig, cfg};
use crate::core::{is_shutdown, register_server};
use crate::embed::serve::HOTRELOAD_URL;
use crate::log;

/// Default WebSocket port for live reload
pub const DEFAULT_WS_PORT: u16 = 35729;

/// Port the live reload socket is bound to; 0 while there is none.
static WS_PORT: AtomicU16 = AtomicU16::new(0);

/// Record the bound live reload port (called by the coordinator).
pub fn set_ws_port(port: u16) {
    WS_PORT.store(port, Ordering::Relaxed);
}

fn ws_port() -> Option<u16> {
    match WS_PORT.load(Ordering::Relaxed) {
        0 => None,
        port => Some(port),
    }
}

/// Bound server ready to accept requests
pub struct BoundServer {
    server: Arc<Server>,
    addr: SocketAddr,
}

/// Bind the HTTP server and register it with the Ctrl+C handler.
pub fn bind_server(config: &PipelineConfig) -> Result<BoundServer> {
    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    register_server(Arc::clone(&server));

    log!("serve"; "http://{}", addr);
    Ok(BoundServer { server, addr })
}

impl BoundServer {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Answer requests until the server is unblocked by Ctrl+C.
    pub fn run(self) -> Result<()> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(4)
            .build()
            .context("failed to create request pool")?;

        for request in self.server.incoming_requests() {
            let config = cfg();
            pool.spawn(move || {
                if let Err(e) = handle_request(request, &config) {
                    log!("serve"; "request error: {e}");
                }
            });
        }
        Ok(())
    }
}

/// Handle a single HTTP request
fn handle_request(request: Request, config: &PipelineConfig) -> Result<()> {
    if is_shutdown() {
        return response::respond_unavailable(request);
    }

    let ws_port = ws_port();
    if let Some(port) = ws_port
        && request.url() == HOTRELOAD_URL
    {
        return response::respond_hotreload_js(request, port);
    }

    match path::resolve_path(request.url(), &config.build_dir()) {
        Some(path) => response::respond_file(request, &path, ws_port),
        None => response::respond_not_found(request),
    }
}
