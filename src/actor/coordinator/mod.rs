//! Actor Coordinator
//!
//! Creates the channels, wires up the actors the current command needs and
//! runs them until the shutdown signal arrives.
//!
//! | command | source watcher + runner | build watcher + ws |
//! |---------|-------------------------|--------------------|
//! | `dev`   | yes                     | yes                |
//! | `watch` | yes                     | no                 |
//! | `serve` | no                      | yes                |

mod runtime;

use std::sync::Arc;

use anyhow::Result;
use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use super::fs::{BuildRoute, FsActor, SourceRoute};
use super::messages::{RunnerMsg, WsMsg};
use super::runner::RunnerActor;
use super::ws::WsActor;
use crate::cli::serve::{DEFAULT_WS_PORT, set_ws_port};
use crate::config::PipelineConfig;

const CHANNEL_BUFFER: usize = 32;

/// Coordinator - wires up and runs the actor system.
pub struct Coordinator {
    config: Arc<PipelineConfig>,
    watch_sources: bool,
    live_reload: bool,
    shutdown_rx: Option<Receiver<()>>,
}

impl Coordinator {
    pub fn with_config(config: Arc<PipelineConfig>) -> Self {
        Self {
            config,
            watch_sources: false,
            live_reload: false,
            shutdown_rx: None,
        }
    }

    /// Re-run tasks when sources change.
    pub fn with_source_watch(mut self) -> Self {
        self.watch_sources = true;
        self
    }

    /// Push build-tree changes to connected browsers.
    pub fn with_live_reload(mut self) -> Self {
        self.live_reload = true;
        self
    }

    /// Set shutdown signal receiver.
    pub fn with_shutdown_signal(mut self, rx: Receiver<()>) -> Self {
        self.shutdown_rx = Some(rx);
        self
    }

    /// Run the actor system.
    pub async fn run(self) -> Result<()> {
        let mut actors = runtime::Actors::default();

        if self.watch_sources {
            let (runner_tx, runner_rx) = mpsc::channel::<RunnerMsg>(CHANNEL_BUFFER);
            let source = FsActor::new(
                vec![self.config.source_dir()],
                SourceRoute,
                runner_tx.clone(),
                Arc::clone(&self.config),
            )
            .map_err(|e| anyhow::anyhow!("source watcher failed: {}", e))?;

            actors.source = Some(source);
            actors.runner = Some((RunnerActor::new(runner_rx, Arc::clone(&self.config)), runner_tx));
            crate::log!(
                "watch";
                "watching {}",
                self.config.root_relative(self.config.source_dir()).display()
            );
        }

        if self.live_reload {
            let (ws_tx, ws_rx) = mpsc::channel::<WsMsg>(CHANNEL_BUFFER);
            match crate::reload::server::start_ws_server(
                self.config.serve.interface,
                DEFAULT_WS_PORT,
                ws_tx.clone(),
            ) {
                Ok(port) => {
                    set_ws_port(port);
                    crate::debug!("reload"; "ws://{}:{}", self.config.serve.interface, port);
                }
                Err(e) => crate::log!("reload"; "live reload disabled: {:#}", e),
            }

            let build = FsActor::new(
                vec![self.config.build_dir()],
                BuildRoute,
                ws_tx.clone(),
                Arc::clone(&self.config),
            )
            .map_err(|e| anyhow::anyhow!("build watcher failed: {}", e))?;

            actors.build = Some(build);
            actors.ws = Some((WsActor::new(ws_rx), ws_tx));
        }

        runtime::run_actors(actors, self.shutdown_rx).await
    }
}
