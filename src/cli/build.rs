//! One-shot runs: the full build and single-task commands.
//!
//! Full build graph:
//!
//! ```text
//!          ┌─▶ sprite ──┬─▶ scss
//!          │            └─▶ copy:img
//! clean ───┼─▶ html
//!          └─▶ copy:fonts
//! ```
//!
//! `clean` also precedes `scss` and `copy:img` directly.

use std::time::Instant;

use anyhow::{Result, bail};

use crate::config::PipelineConfig;
use crate::core::{RunReport, TaskId};
use crate::graph::{TaskGraph, run_graph};
use crate::report::{NotifyStyle, TerminalNotifier, print_report};
use crate::task::TaskContext;

/// Clean, then run every writer.
pub fn build_all(config: &PipelineConfig) -> Result<RunReport> {
    run(&TaskGraph::build(), config)
}

/// Run one named task on its own.
pub fn run_task(task: TaskId, config: &PipelineConfig) -> Result<RunReport> {
    run(&TaskGraph::single(task), config)
}

fn run(graph: &TaskGraph, config: &PipelineConfig) -> Result<RunReport> {
    let start = Instant::now();
    let notifier = TerminalNotifier::new(NotifyStyle::Log);
    let report = run_graph(graph, &TaskContext::new(config), &notifier)?;
    print_report(&report, start.elapsed());
    Ok(report)
}

/// Turn a failed report into an error, so the process exits non-zero.
pub fn ensure_success(report: &RunReport) -> Result<()> {
    let failed = report.failures().count();
    if failed > 0 {
        bail!("{} task{} failed", failed, if failed == 1 { "" } else { "s" });
    }
    Ok(())
}
