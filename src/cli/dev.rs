//! Long-running commands: `dev`, `watch` and `serve`.
//!
//! | command | initial build | source watcher | HTTP + live reload |
//! |---------|---------------|----------------|--------------------|
//! | `dev`   | yes           | yes            | yes                |
//! | `watch` | no            | yes            | no                 |
//! | `serve` | no            | no             | yes                |

use std::sync::Arc;

use anyhow::Result;
use crossbeam::channel;

use super::build::build_all;
use super::serve::{self, ActorPlan};
use crate::config::PipelineConfig;
use crate::core::{register_shutdown, set_serving};
use crate::log;

/// Build, then watch sources and serve the build directory until Ctrl+C.
pub fn dev(config: Arc<PipelineConfig>) -> Result<()> {
    // Failures were already reported; the watcher gives the user a chance
    // to fix them without restarting.
    build_all(&config)?;

    run_server(
        config,
        ActorPlan {
            watch_sources: true,
            live_reload: true,
        },
    )
}

/// Serve the build directory as it is, with live reload.
pub fn serve(config: Arc<PipelineConfig>) -> Result<()> {
    run_server(
        config,
        ActorPlan {
            watch_sources: false,
            live_reload: true,
        },
    )
}

/// Watch sources and re-run tasks until Ctrl+C, without a server.
pub fn watch(config: Arc<PipelineConfig>) -> Result<()> {
    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    register_shutdown(shutdown_tx);
    set_serving();

    serve::run_actor_system(
        config,
        ActorPlan {
            watch_sources: true,
            live_reload: false,
        },
        shutdown_rx,
    )?;
    log!("watch"; "stopped");
    Ok(())
}

fn run_server(config: Arc<PipelineConfig>, plan: ActorPlan) -> Result<()> {
    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    register_shutdown(shutdown_tx);

    let server = serve::bind_server(&config)?;
    let addr = server.addr();
    let url = if addr.ip().is_unspecified() {
        format!("http://localhost:{}", addr.port())
    } else {
        format!("http://{addr}")
    };
    set_serving();

    let actors = serve::spawn_actors(Arc::clone(&config), plan, shutdown_rx);

    if config.serve.open {
        serve::open_browser(&url);
    }

    server.run()?;
    serve::wait_for_shutdown(actors);
    Ok(())
}
