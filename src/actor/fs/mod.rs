//! FileSystem Actor
//!
//! Watches a set of roots and forwards debounced, classified batches.
//! The watcher is created before the caller starts its initial build, so
//! edits made during that build are buffered rather than lost.
//!
//! ```text
//! Watcher → Debouncer (pure timing) → Route (classification) → Msg
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use notify::RecommendedWatcher;
use tokio::sync::mpsc;

use crate::config::PipelineConfig;

mod classifier;
mod debouncer;
mod types;
mod watch_roots;

#[cfg(test)]
mod tests;

pub use classifier::{BuildRoute, Route, SourceRoute, sequences_for};
use debouncer::Debouncer;
use watch_roots::WatchRoots;

/// Poll interval while the route is closed and a batch is waiting.
const CLOSED_POLL: Duration = Duration::from_millis(50);

/// Poll interval while a watched root is missing.
const REATTACH_POLL: Duration = Duration::from_millis(500);

/// FileSystem Actor, generic over where its batches go.
pub struct FsActor<R: Route> {
    /// notify callback → actor (sync side)
    notify_rx: std::sync::mpsc::Receiver<notify::Result<notify::Event>>,
    /// Must be kept alive for events to keep flowing
    watcher: RecommendedWatcher,
    watch_roots: WatchRoots,
    tx: mpsc::Sender<R::Msg>,
    route: R,
    debouncer: Debouncer,
    config: Arc<PipelineConfig>,
}

impl<R: Route> FsActor<R> {
    pub fn new(
        paths: Vec<PathBuf>,
        route: R,
        tx: mpsc::Sender<R::Msg>,
        config: Arc<PipelineConfig>,
    ) -> notify::Result<Self> {
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })?;

        let mut watch_roots = WatchRoots::new(paths);
        watch_roots.attach_existing(&mut watcher)?;

        Ok(Self {
            notify_rx,
            watcher,
            watch_roots,
            tx,
            route,
            debouncer: Debouncer::new(),
            config,
        })
    }

    /// Run the actor event loop
    pub async fn run(self) {
        let Self {
            notify_rx,
            mut watcher,
            mut watch_roots,
            tx,
            route,
            mut debouncer,
            config,
        } = self;

        let (async_tx, mut async_rx) = mpsc::channel::<notify::Event>(64);

        std::thread::spawn(move || {
            while let Ok(result) = notify_rx.recv() {
                match result {
                    Ok(event) => {
                        if async_tx.blocking_send(event).is_err() {
                            break;
                        }
                    }
                    Err(e) => crate::log!("watch"; "notify error: {}", e),
                }
            }
        });

        loop {
            let mut wait = if route.is_open() {
                debouncer.sleep_duration()
            } else {
                debouncer.sleep_duration().max(CLOSED_POLL)
            };
            if !watch_roots.is_complete() {
                wait = wait.min(REATTACH_POLL);
            }

            tokio::select! {
                biased;
                Some(event) = async_rx.recv() => {
                    watch_roots.observe(&event, &mut watcher);
                    debouncer.add_event(&event);
                }
                _ = tokio::time::sleep(wait) => {
                    watch_roots.maintain(&mut watcher);
                    if process_changes(&mut debouncer, &route, &tx, &config).await.is_err() {
                        break;
                    }
                }
            }
        }
    }
}

/// Forward one ready batch, if any.
///
/// Returns `Err(())` once the receiving actor is gone.
async fn process_changes<R: Route>(
    debouncer: &mut Debouncer,
    route: &R,
    tx: &mpsc::Sender<R::Msg>,
    config: &PipelineConfig,
) -> Result<(), ()> {
    // Check before taking, so a closed route keeps its events.
    if !route.is_open() {
        return Ok(());
    }

    let Some(changes) = debouncer.take_if_ready() else {
        return Ok(());
    };

    let Some(msg) = route.classify(changes, config) else {
        return Ok(());
    };

    tx.send(msg).await.map_err(|_| ())
}
