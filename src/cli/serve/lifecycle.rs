//! Server lifecycle management.

use std::net::{IpAddr, SocketAddr};
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result};
use crossbeam::channel::Receiver;
use tiny_http::Server;

use crate::actor::Coordinator;
use crate::config::PipelineConfig;
use crate::{debug, log};

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

/// Bind to the specified interface and port, trying the following ports
/// when it is taken.
pub fn bind_with_retry(interface: IpAddr, base_port: u16) -> Result<(Server, SocketAddr)> {
    let mut last_error = String::new();

    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = e.to_string(),
        }
    }

    Err(anyhow::anyhow!(
        "failed to bind after {} attempts (ports {}-{}): {}",
        MAX_PORT_RETRIES,
        base_port,
        base_port.saturating_add(MAX_PORT_RETRIES - 1),
        last_error
    ))
}

/// What the actor system should run.
#[derive(Debug, Clone, Copy)]
pub struct ActorPlan {
    /// Re-run tasks on source changes.
    pub watch_sources: bool,
    /// Broadcast build-tree changes to browsers.
    pub live_reload: bool,
}

/// Spawn the actor system on its own thread.
pub fn spawn_actors(
    config: Arc<PipelineConfig>,
    plan: ActorPlan,
    shutdown_rx: Receiver<()>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        if let Err(e) = run_actor_system(config, plan, shutdown_rx) {
            log!("actor"; "error: {:#}", e);
        }
    })
}

/// Run the actor system on the current thread until shutdown.
pub fn run_actor_system(
    config: Arc<PipelineConfig>,
    plan: ActorPlan,
    shutdown_rx: Receiver<()>,
) -> Result<()> {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    rt.block_on(async {
        let mut coordinator = Coordinator::with_config(config).with_shutdown_signal(shutdown_rx);
        if plan.watch_sources {
            coordinator = coordinator.with_source_watch();
        }
        if plan.live_reload {
            coordinator = coordinator.with_live_reload();
        }
        coordinator.run().await
    })
}

/// Wait for the actor system to shut down (max 2 seconds).
pub fn wait_for_shutdown(handle: JoinHandle<()>) {
    for _ in 0..40 {
        if handle.is_finished() {
            let _ = handle.join();
            return;
        }
        thread::sleep(Duration::from_millis(50));
    }
    debug!("actor"; "gave up waiting for actors");
}

/// Open `url` in the system browser. Failure is logged, never fatal.
pub fn open_browser(url: &str) {
    let (program, args): (&str, &[&str]) = if cfg!(target_os = "macos") {
        ("open", &[])
    } else if cfg!(windows) {
        ("cmd", &["/C", "start", ""])
    } else {
        ("xdg-open", &[])
    };

    let Ok(program) = which::which(program) else {
        log!("serve"; "no browser launcher found, open {} manually", url);
        return;
    };

    let spawned = Command::new(program)
        .args(args)
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();

    if let Err(e) = spawned {
        log!("serve"; "failed to open browser: {}", e);
    }
}
