//! Pipeline tasks.
//!
//! | Module   | Tasks                        | Reads              | Writes                        |
//! |----------|------------------------------|--------------------|-------------------------------|
//! | `clean`  | `clean`, `clean:img`         | -                  | deletes `build/`, `build/img` |
//! | `copy`   | `copy:img`, `copy:fonts`     | `source/img`, `source/fonts` | `build/img`, `build/fonts` |
//! | `html`   | `html`                       | `source/*.html`    | `build/*.html`                |
//! | `style`  | `scss`                       | `source/scss`      | `build/css/style.min.css`     |
//! | `sprite` | `sprite`                     | `source/img/icons` | `source/img/sprite.png`, `source/scss/_sprite.scss` |
//!
//! Every task is a plain function `&TaskContext -> Result<TaskSummary, TaskError>`.
//! `execute` turns that result into a `TaskOutcome` and hands failures to the
//! notifier, so a failing task never unwinds into its siblings.

mod clean;
mod copy;
mod html;
mod sprite;
mod style;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::config::PipelineConfig;
use crate::core::{FailureKind, TaskFailure, TaskId, TaskOutcome, TaskSummary};
use crate::debug;
use crate::report::Notifier;

/// Inputs of one task invocation.
#[derive(Debug, Clone, Copy)]
pub struct TaskContext<'a> {
    pub config: &'a PipelineConfig,
    /// Changed source files when invoked by the watcher; empty for a full run.
    pub changed: &'a [PathBuf],
}

impl<'a> TaskContext<'a> {
    pub const fn new(config: &'a PipelineConfig) -> Self {
        Self {
            config,
            changed: &[],
        }
    }

    pub const fn with_changed(mut self, changed: &'a [PathBuf]) -> Self {
        self.changed = changed;
        self
    }
}

/// Task error
#[derive(Debug, Error)]
pub enum TaskError {
    /// User input did not compile (stylesheet, template).
    #[error("{message}")]
    Compile { title: String, message: String },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid pattern `{pattern}`: {message}")]
    Pattern { pattern: String, message: String },

    /// Two icon files map to the same Sass variable.
    #[error("icons {} and {} both define `${name}`", first.display(), second.display())]
    DuplicateIcon {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },
}

impl TaskError {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn compile(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Compile {
            title: title.into(),
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::Compile { .. } | Self::DuplicateIcon { .. } => FailureKind::Compile,
            Self::Io { .. } | Self::Image { .. } | Self::Pattern { .. } => FailureKind::Filesystem,
        }
    }

    /// Render for the notifier.
    pub fn into_failure(self, task: TaskId) -> TaskFailure {
        let kind = self.kind();
        match self {
            Self::Compile { title, message } => TaskFailure {
                kind,
                title,
                message,
            },
            other => TaskFailure {
                kind,
                title: task.title().to_string(),
                message: other.to_string(),
            },
        }
    }
}

/// Extension trait for attaching a path to IO results.
pub trait IoResultExt<T> {
    fn at(self, path: impl AsRef<Path>) -> Result<T, TaskError>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn at(self, path: impl AsRef<Path>) -> Result<T, TaskError> {
        self.map_err(|e| TaskError::io(path, e))
    }
}

/// Run the body of one task.
pub fn run(task: TaskId, ctx: &TaskContext<'_>) -> Result<TaskSummary, TaskError> {
    match task {
        TaskId::Clean => clean::clean(ctx),
        TaskId::CleanImages => clean::clean_images(ctx),
        TaskId::Sprite => sprite::generate(ctx),
        TaskId::Html => html::copy_html(ctx),
        TaskId::Style => style::compile(ctx),
        TaskId::CopyFonts => copy::copy_fonts(ctx),
        TaskId::CopyImages => copy::copy_images(ctx),
    }
}

/// Run one task and report its failure, if any, to `notifier`.
pub fn execute(
    task: TaskId,
    ctx: &TaskContext<'_>,
    notifier: &dyn Notifier,
) -> (TaskOutcome, Duration) {
    let start = Instant::now();
    debug!("task"; "starting {}", task);

    let outcome = match run(task, ctx) {
        Ok(summary) => TaskOutcome::Done(summary),
        Err(err) => {
            let failure = err.into_failure(task);
            notifier.failure(task, &failure);
            TaskOutcome::Failed(failure)
        }
    };

    let elapsed = start.elapsed();
    debug!("task"; "finished {} in {:?}", task, elapsed);
    (outcome, elapsed)
}

/// Create the parent directory of `path`.
fn ensure_parent(path: &Path) -> Result<(), TaskError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).at(parent)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests;
