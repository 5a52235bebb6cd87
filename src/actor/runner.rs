//! Runner Actor
//!
//! Receives task sequences from the source watcher and runs them in series
//! on a blocking thread. Each sequence is a chain: a failing task skips the
//! rest of its own sequence but never the sequences after it.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;

use super::messages::RunnerMsg;
use crate::config::PipelineConfig;
use crate::core::{RunReport, TaskId, begin_update, end_update, is_shutdown};
use crate::graph::{TaskGraph, run_graph};
use crate::logger;
use crate::report::{Notifier, NotifyStyle, TerminalNotifier};
use crate::task::TaskContext;

pub struct RunnerActor {
    rx: mpsc::Receiver<RunnerMsg>,
    config: Arc<PipelineConfig>,
}

impl RunnerActor {
    pub fn new(rx: mpsc::Receiver<RunnerMsg>, config: Arc<PipelineConfig>) -> Self {
        Self { rx, config }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            match msg {
                RunnerMsg::Run { sequences, changed } => {
                    let config = Arc::clone(&self.config);
                    let handle = tokio::task::spawn_blocking(move || {
                        let notifier = TerminalNotifier::new(NotifyStyle::Status);
                        run_sequences(&config, &sequences, &changed, &notifier)
                    });
                    if let Err(e) = handle.await {
                        crate::log!("watch"; "task runner panicked: {}", e);
                    }
                }
                RunnerMsg::Shutdown => {
                    crate::debug!("watch"; "runner shutting down");
                    break;
                }
            }
        }
    }
}

/// Run every sequence in order and report the combined result on the
/// status line.
pub fn run_sequences(
    config: &PipelineConfig,
    sequences: &[Vec<TaskId>],
    changed: &[PathBuf],
    notifier: &dyn Notifier,
) -> Vec<RunReport> {
    let start = Instant::now();
    let ctx = TaskContext::new(config).with_changed(changed);

    begin_update();
    let mut reports = Vec::with_capacity(sequences.len());
    for sequence in sequences {
        if is_shutdown() {
            break;
        }
        // A chain cannot contain a cycle.
        if let Ok(report) = run_graph(&TaskGraph::chain(sequence), &ctx, notifier) {
            reports.push(report);
        }
    }
    end_update();

    if reports.len() < sequences.len() {
        logger::status_warning(&format!(
            "interrupted after {} of {} sequences",
            reports.len(),
            sequences.len()
        ));
    } else if reports.iter().all(RunReport::is_success) {
        let names: Vec<&str> = sequences.iter().flatten().map(|t| t.name()).collect();
        logger::status_success(&format!(
            "{} ({}ms)",
            names.join(" → "),
            start.elapsed().as_millis()
        ));
    }
    reports
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::CollectingNotifier;
    use std::fs;
    use tempfile::TempDir;

    fn project() -> (TempDir, PipelineConfig) {
        let dir = TempDir::new().unwrap();
        let config = PipelineConfig::with_root(dir.path());
        for (rel, content) in [
            ("scss/style.scss", "a { color: red\n"),
            ("index.html", "<p>index</p>"),
            ("about.html", "<p>about</p>"),
            ("img/photo.jpg", "jpg"),
        ] {
            let path = config.source_join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        (dir, config)
    }

    #[test]
    fn test_failing_sequence_does_not_stop_the_next() {
        let (_dir, config) = project();
        let notifier = CollectingNotifier::new();
        let changed = vec![config.source_join("about.html")];
        let sequences = vec![
            vec![TaskId::Style],
            vec![TaskId::Html],
            vec![TaskId::CleanImages, TaskId::CopyImages],
        ];

        let reports = run_sequences(&config, &sequences, &changed, &notifier);

        assert_eq!(reports.len(), 3);
        assert!(!reports[0].is_success());
        assert!(reports[1].is_success());
        assert!(reports[2].is_success());
        assert_eq!(notifier.failures().len(), 1);
        assert_eq!(notifier.failures()[0].1.title, "Style");

        assert!(config.build_join("about.html").exists());
        assert!(!config.build_join("index.html").exists());
        assert!(config.build_join("img/photo.jpg").exists());
    }
}
