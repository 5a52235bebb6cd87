//! Presentation of task outcomes.
//!
//! Tasks never print their own failures. They hand a `TaskFailure` to a
//! `Notifier`, which decides how the user sees it: a log line during a
//! one-shot build, the overwriting status block while watching, or a plain
//! vector in tests.

use std::time::Duration;

use owo_colors::OwoColorize;

use crate::core::{RunReport, TaskFailure, TaskId, TaskOutcome};
use crate::log;
use crate::logger;

/// Sink for task failures.
pub trait Notifier: Send + Sync {
    fn failure(&self, task: TaskId, failure: &TaskFailure);
}

/// How a terminal notifier renders failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyStyle {
    /// One log line per failure (one-shot commands).
    Log,
    /// Overwrite the watch status block.
    Status,
}

/// Terminal notifier used by every CLI command.
#[derive(Debug, Clone, Copy)]
pub struct TerminalNotifier {
    style: NotifyStyle,
}

impl TerminalNotifier {
    pub const fn new(style: NotifyStyle) -> Self {
        Self { style }
    }
}

impl Notifier for TerminalNotifier {
    fn failure(&self, _task: TaskId, failure: &TaskFailure) {
        match self.style {
            NotifyStyle::Log => log!("error"; "{}: {}", failure.title, failure.message),
            NotifyStyle::Status => logger::status_error(&failure.title, &failure.message),
        }
    }
}

/// Notifier that records failures for later inspection.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct CollectingNotifier {
    failures: parking_lot::Mutex<Vec<(TaskId, TaskFailure)>>,
}

#[cfg(test)]
impl CollectingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failures(&self) -> Vec<(TaskId, TaskFailure)> {
        self.failures.lock().clone()
    }
}

#[cfg(test)]
impl Notifier for CollectingNotifier {
    fn failure(&self, task: TaskId, failure: &TaskFailure) {
        self.failures.lock().push((task, failure.clone()));
    }
}

/// Print one line per task and a closing summary.
pub fn print_report(report: &RunReport, elapsed: Duration) {
    for record in report.records() {
        let ms = record.elapsed.as_millis();
        match &record.outcome {
            TaskOutcome::Done(summary) => {
                crate::debug!("build"; "{} done ({} files, {}ms)", record.task, summary.files, ms);
            }
            TaskOutcome::Failed(failure) => {
                log!("build"; "{} {} ({}ms)", record.task, "failed".red(), ms);
                crate::debug!("build"; "{}", failure.message);
            }
            TaskOutcome::Skipped { blocked_by } => {
                log!("build"; "{} {} (blocked by {})", record.task, "skipped".yellow(), blocked_by);
            }
        }
    }

    let failed = report.failures().count();
    if failed == 0 {
        log!(
            "build";
            "{} task{} finished, {} file{} written in {:.2}s",
            report.records().len(),
            plural(report.records().len()),
            report.total_files(),
            plural(report.total_files()),
            elapsed.as_secs_f64()
        );
    } else {
        log!(
            "build";
            "{} of {} task{} failed in {:.2}s",
            failed,
            report.records().len(),
            plural(report.records().len()),
            elapsed.as_secs_f64()
        );
    }
}

const fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}
