//! Task identity and outcomes.
//!
//! Every task is a function of declared inputs to declared outputs. The
//! outcome of one invocation is a value, not a side channel: a run collects
//! them into a `RunReport` and the presentation layer decides how to show
//! failures.

use std::fmt;
use std::time::Duration;

/// Named tasks, one per CLI entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskId {
    Clean,
    CleanImages,
    Sprite,
    Html,
    Style,
    CopyFonts,
    CopyImages,
}

impl TaskId {
    /// Every writer task of a full build (clean excluded).
    pub const WRITERS: [Self; 5] = [
        Self::Sprite,
        Self::Html,
        Self::Style,
        Self::CopyFonts,
        Self::CopyImages,
    ];

    /// CLI name of the task.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Clean => "clean",
            Self::CleanImages => "clean:img",
            Self::Sprite => "sprite",
            Self::Html => "html",
            Self::Style => "scss",
            Self::CopyFonts => "copy:fonts",
            Self::CopyImages => "copy:img",
        }
    }

    /// Notification title used when the task fails.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Style => "Style",
            Self::Html => "html",
            other => other.name(),
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a successful task did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskSummary {
    /// Number of files written or removed.
    pub files: usize,
}

impl TaskSummary {
    pub const fn files(files: usize) -> Self {
        Self { files }
    }
}

/// Failure class.
///
/// `Compile` failures come from user input (bad stylesheet, unreadable
/// template); `Filesystem` failures come from IO on the trees themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Compile,
    Filesystem,
}

/// A failed task, ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFailure {
    pub kind: FailureKind,
    pub title: String,
    pub message: String,
}

/// Result of one task invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Done(TaskSummary),
    Failed(TaskFailure),
    /// Not run because a dependency did not succeed.
    Skipped { blocked_by: TaskId },
}

impl TaskOutcome {
    pub const fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    pub const fn failure(&self) -> Option<&TaskFailure> {
        match self {
            Self::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

/// One entry of a run report.
#[derive(Debug, Clone)]
pub struct TaskRecord {
    pub task: TaskId,
    pub outcome: TaskOutcome,
    pub elapsed: Duration,
}

/// Ordered outcomes of one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    records: Vec<TaskRecord>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, task: TaskId, outcome: TaskOutcome, elapsed: Duration) {
        self.records.push(TaskRecord {
            task,
            outcome,
            elapsed,
        });
    }

    pub fn records(&self) -> &[TaskRecord] {
        &self.records
    }

    pub fn outcome(&self, task: TaskId) -> Option<&TaskOutcome> {
        self.records
            .iter()
            .find(|r| r.task == task)
            .map(|r| &r.outcome)
    }

    /// True when every task ran and succeeded.
    pub fn is_success(&self) -> bool {
        self.records.iter().all(|r| r.outcome.is_done())
    }

    pub fn failures(&self) -> impl Iterator<Item = (TaskId, &TaskFailure)> {
        self.records
            .iter()
            .filter_map(|r| r.outcome.failure().map(|f| (r.task, f)))
    }

    pub fn total_files(&self) -> usize {
        self.records
            .iter()
            .filter_map(|r| match &r.outcome {
                TaskOutcome::Done(summary) => Some(summary.files),
                _ => None,
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_names() {
        assert_eq!(TaskId::Clean.name(), "clean");
        assert_eq!(TaskId::CleanImages.name(), "clean:img");
        assert_eq!(TaskId::Style.name(), "scss");
        assert_eq!(TaskId::CopyImages.to_string(), "copy:img");
    }

    #[test]
    fn test_titles() {
        assert_eq!(TaskId::Style.title(), "Style");
        assert_eq!(TaskId::Html.title(), "html");
        assert_eq!(TaskId::Sprite.title(), "sprite");
    }

    #[test]
    fn test_report_aggregation() {
        let mut report = RunReport::new();
        report.push(
            TaskId::Html,
            TaskOutcome::Done(TaskSummary::files(2)),
            Duration::ZERO,
        );
        report.push(
            TaskId::Style,
            TaskOutcome::Failed(TaskFailure {
                kind: FailureKind::Compile,
                title: "Style".into(),
                message: "expected \";\"".into(),
            }),
            Duration::ZERO,
        );

        assert!(!report.is_success());
        assert_eq!(report.total_files(), 2);
        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, TaskId::Style);
        assert!(report.outcome(TaskId::Html).unwrap().is_done());
    }

    #[test]
    fn test_skipped_is_not_success() {
        let mut report = RunReport::new();
        report.push(
            TaskId::Style,
            TaskOutcome::Skipped {
                blocked_by: TaskId::Sprite,
            },
            Duration::ZERO,
        );
        assert!(!report.is_success());
        assert_eq!(report.failures().count(), 0);
    }
}
