//! Wave executor.
//!
//! Waves run strictly in order; the members of a wave run on the rayon pool.
//! A failure never stops its siblings. A task whose dependency did not
//! succeed is recorded as skipped instead of being run.

use std::time::Duration;

use rayon::prelude::*;

use super::{GraphError, TaskGraph};
use crate::core::{RunReport, TaskId, TaskOutcome, is_shutdown};
use crate::debug;
use crate::report::Notifier;
use crate::task::{self, TaskContext};

/// Execute every task of `graph`.
pub fn run_graph(
    graph: &TaskGraph,
    ctx: &TaskContext<'_>,
    notifier: &dyn Notifier,
) -> Result<RunReport, GraphError> {
    let waves = graph.waves()?;
    let mut report = RunReport::new();

    for (level, wave) in waves.iter().enumerate() {
        if is_shutdown() {
            debug!("build"; "shutdown requested, stopping before wave {}", level);
            break;
        }
        debug!("build"; "wave {}: {:?}", level, wave);

        let results: Vec<(TaskId, TaskOutcome, Duration)> = wave
            .par_iter()
            .map(|&task| match blocker(graph, &report, task) {
                Some(blocked_by) => (task, TaskOutcome::Skipped { blocked_by }, Duration::ZERO),
                None => {
                    let (outcome, elapsed) = task::execute(task, ctx, notifier);
                    (task, outcome, elapsed)
                }
            })
            .collect();

        for (task, outcome, elapsed) in results {
            report.push(task, outcome, elapsed);
        }
    }

    Ok(report)
}

/// First dependency of `task` that did not finish successfully.
fn blocker(graph: &TaskGraph, report: &RunReport, task: TaskId) -> Option<TaskId> {
    graph
        .dependencies(task)
        .into_iter()
        .find(|dep| !report.outcome(*dep).is_some_and(TaskOutcome::is_done))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::core::FailureKind;
    use crate::report::CollectingNotifier;
    use std::fs;
    use tempfile::TempDir;

    fn project() -> (TempDir, PipelineConfig) {
        let dir = TempDir::new().unwrap();
        let config = PipelineConfig::with_root(dir.path());
        let files = [
            ("scss/style.scss", "@import 'sprite';\n.a { color: red; }\n"),
            ("index.html", "<link rel=stylesheet href=css/style.min.css>"),
            ("fonts/sans.woff2", "woff2"),
            ("img/photo.jpg", "jpg"),
        ];
        for (rel, content) in files {
            let path = config.source_join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        (dir, config)
    }

    fn write_icon(config: &PipelineConfig, name: &str) {
        let path = config.sprite_icons().join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        image::RgbaImage::from_pixel(8, 8, image::Rgba([1, 2, 3, 255]))
            .save(path)
            .unwrap();
    }

    #[test]
    fn test_full_build_succeeds() {
        let (_dir, config) = project();
        write_icon(&config, "home.png");
        write_icon(&config, "mail.png");
        fs::create_dir_all(config.build_join("stale")).unwrap();
        fs::write(config.build_join("stale/old.txt"), "old").unwrap();

        let notifier = CollectingNotifier::new();
        let report = run_graph(&TaskGraph::build(), &TaskContext::new(&config), &notifier).unwrap();

        assert!(report.is_success(), "{:?}", report.records());
        assert!(notifier.failures().is_empty());
        assert!(config.style_output().exists());
        assert!(config.build_join("index.html").exists());
        assert!(config.build_join("fonts/sans.woff2").exists());
        assert!(config.build_join("img/photo.jpg").exists());
        assert!(!config.build_join("stale").exists());

        // The freshly generated sheet is shipped byte for byte.
        let shipped = fs::read(config.build_join("img/sprite.png")).unwrap();
        assert_eq!(shipped, fs::read(config.sprite_image()).unwrap());

        // The sprite outputs existed by the time their readers ran.
        let order: Vec<_> = report.records().iter().map(|r| r.task).collect();
        let position = |task: TaskId| order.iter().position(|t| *t == task).unwrap();
        assert!(position(TaskId::Sprite) < position(TaskId::Style));
        assert!(position(TaskId::Sprite) < position(TaskId::CopyImages));
        assert_eq!(order[0], TaskId::Clean);
    }

    #[test]
    fn test_style_failure_does_not_stop_siblings() {
        let (_dir, config) = project();
        write_icon(&config, "home.png");
        fs::write(config.style_entry(), "@import 'sprite';\n.a { color: red\n").unwrap();

        let notifier = CollectingNotifier::new();
        let report = run_graph(&TaskGraph::build(), &TaskContext::new(&config), &notifier).unwrap();

        assert!(!report.is_success());
        let failures = notifier.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, TaskId::Style);
        assert_eq!(failures[0].1.title, "Style");
        assert_eq!(failures[0].1.kind, FailureKind::Compile);
        assert!(!failures[0].1.message.is_empty());

        for task in [TaskId::Html, TaskId::CopyFonts, TaskId::CopyImages, TaskId::Sprite] {
            assert!(report.outcome(task).unwrap().is_done(), "{task} did not complete");
        }
        assert!(config.build_join("index.html").exists());
        assert!(!config.style_output().exists());
    }

    #[test]
    fn test_failed_dependency_skips_dependent() {
        let (_dir, config) = project();
        fs::create_dir_all(config.sprite_icons()).unwrap();
        fs::write(config.sprite_icons().join("broken.png"), b"not png").unwrap();

        let notifier = CollectingNotifier::new();
        let report = run_graph(&TaskGraph::build(), &TaskContext::new(&config), &notifier).unwrap();

        assert!(report.outcome(TaskId::Sprite).unwrap().failure().is_some());
        assert_eq!(
            report.outcome(TaskId::Style),
            Some(&TaskOutcome::Skipped {
                blocked_by: TaskId::Sprite
            })
        );
        assert_eq!(
            report.outcome(TaskId::CopyImages),
            Some(&TaskOutcome::Skipped {
                blocked_by: TaskId::Sprite
            })
        );
        assert!(report.outcome(TaskId::Html).unwrap().is_done());
        assert_eq!(notifier.failures().len(), 1);
    }

    #[test]
    fn test_chain_runs_in_order() {
        let (_dir, config) = project();
        let notifier = CollectingNotifier::new();
        let graph = TaskGraph::chain(&[TaskId::CleanImages, TaskId::CopyImages]);

        let report = run_graph(&graph, &TaskContext::new(&config), &notifier).unwrap();
        assert!(report.is_success());
        assert!(config.build_join("img/photo.jpg").exists());
    }
}
