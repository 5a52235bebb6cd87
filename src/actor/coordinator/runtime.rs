use std::time::Duration;

use anyhow::Result;
use crossbeam::channel::Receiver;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::actor::fs::{BuildRoute, FsActor, SourceRoute};
use crate::actor::messages::{RunnerMsg, WsMsg};
use crate::actor::runner::RunnerActor;
use crate::actor::ws::WsActor;

/// Actors selected by the coordinator. Consumers keep their own sender so
/// shutdown can be delivered after the producers are gone.
#[derive(Default)]
pub(super) struct Actors {
    pub(super) source: Option<FsActor<SourceRoute>>,
    pub(super) runner: Option<(RunnerActor, mpsc::Sender<RunnerMsg>)>,
    pub(super) build: Option<FsActor<BuildRoute>>,
    pub(super) ws: Option<(WsActor, mpsc::Sender<WsMsg>)>,
}

/// Run all actors concurrently until shutdown.
pub(super) async fn run_actors(actors: Actors, shutdown_rx: Option<Receiver<()>>) -> Result<()> {
    let mut producers: Vec<JoinHandle<()>> = Vec::new();

    if let Some(fs) = actors.source {
        producers.push(tokio::spawn(fs.run()));
    }
    if let Some(fs) = actors.build {
        producers.push(tokio::spawn(fs.run()));
    }

    let runner = actors
        .runner
        .map(|(actor, tx)| (tokio::spawn(actor.run()), tx));
    let ws = actors.ws.map(|(actor, tx)| (tokio::spawn(actor.run()), tx));

    match shutdown_rx {
        Some(rx) => loop {
            if rx.try_recv().is_ok() || crate::core::is_shutdown() {
                crate::debug!("actor"; "shutdown signal received");
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        },
        None => {
            for handle in producers.drain(..) {
                let _ = handle.await;
            }
        }
    }

    for handle in &producers {
        handle.abort();
    }

    if let Some((handle, tx)) = runner {
        let _ = tx.send(RunnerMsg::Shutdown).await;
        // A running task sequence finishes first.
        let _ = tokio::time::timeout(Duration::from_millis(1500), handle).await;
    }
    if let Some((handle, tx)) = ws {
        let _ = tx.send(WsMsg::Shutdown).await;
        let _ = tokio::time::timeout(Duration::from_millis(500), handle).await;
    }

    Ok(())
}
