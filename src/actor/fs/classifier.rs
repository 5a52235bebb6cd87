//! Path classification: debounced changes → actor messages.
//!
//! Source tree (source-relative globs, table order):
//!
//! | glob             | sequence                 |
//! |------------------|--------------------------|
//! | `scss/**/*.scss` | `scss`                   |
//! | `*.html`         | `html`                   |
//! | `img/*`          | `clean:img` → `copy:img` |
//!
//! Build tree: a batch made only of stylesheets becomes a CSS refresh,
//! anything else a full reload.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use glob::{MatchOptions, Pattern};

use super::types::{ChangeKind, Changes};
use crate::actor::messages::{RunnerMsg, WsMsg};
use crate::config::PipelineConfig;
use crate::core::{TaskId, is_busy, is_serving};

/// Where a watcher sends what it sees.
pub trait Route: Send + 'static {
    type Msg: Send + 'static;

    /// Whether batches may be taken right now. Closed routes keep
    /// accumulating events.
    fn is_open(&self) -> bool;

    fn classify(&self, changes: Changes, config: &PipelineConfig) -> Option<Self::Msg>;
}

/// Source tree → task sequences.
pub struct SourceRoute;

/// Build tree → browser refresh.
pub struct BuildRoute;

const MATCH: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

static SOURCE_RULES: LazyLock<Vec<(Pattern, &'static [TaskId])>> = LazyLock::new(|| {
    [
        ("scss/**/*.scss", &[TaskId::Style][..]),
        ("*.html", &[TaskId::Html][..]),
        ("img/*", &[TaskId::CleanImages, TaskId::CopyImages][..]),
    ]
    .into_iter()
    .map(|(glob, sequence)| (Pattern::new(glob).expect("valid watch glob"), sequence))
    .collect()
});

impl Route for SourceRoute {
    type Msg = RunnerMsg;

    fn is_open(&self) -> bool {
        is_serving()
    }

    fn classify(&self, changes: Changes, config: &PipelineConfig) -> Option<RunnerMsg> {
        let mut changed: Vec<PathBuf> = changes.into_keys().collect();
        changed.sort();

        let sequences = sequences_for(&changed, config);
        if sequences.is_empty() {
            crate::debug!("watch"; "no task for {} change(s)", changed.len());
            return None;
        }

        Some(RunnerMsg::Run { sequences, changed })
    }
}

/// Sequences triggered by `changed`, in table order. A task already queued
/// by an earlier sequence is not queued again.
pub fn sequences_for(changed: &[PathBuf], config: &PipelineConfig) -> Vec<Vec<TaskId>> {
    let relative: Vec<&Path> = changed
        .iter()
        .filter_map(|path| config.source_relative(path))
        .collect();

    let mut queued: Vec<TaskId> = Vec::new();
    let mut sequences = Vec::new();

    for (pattern, sequence) in SOURCE_RULES.iter() {
        if !relative.iter().any(|rel| pattern.matches_path_with(rel, MATCH)) {
            continue;
        }
        let fresh: Vec<TaskId> = sequence
            .iter()
            .copied()
            .filter(|task| !queued.contains(task))
            .collect();
        if fresh.is_empty() {
            continue;
        }
        queued.extend(&fresh);
        sequences.push(fresh);
    }

    sequences
}

impl Route for BuildRoute {
    type Msg = WsMsg;

    fn is_open(&self) -> bool {
        is_serving() && !is_busy()
    }

    fn classify(&self, changes: Changes, config: &PipelineConfig) -> Option<WsMsg> {
        let build_dir = config.build_dir();
        let mut urls: Vec<(String, ChangeKind)> = changes
            .into_iter()
            .filter_map(|(path, kind)| {
                let rel = path.strip_prefix(&build_dir).ok()?;
                Some((url_for(rel), kind))
            })
            .collect();
        if urls.is_empty() {
            return None;
        }
        urls.sort_by(|a, b| a.0.cmp(&b.0));

        let css_only = urls
            .iter()
            .all(|(url, kind)| *kind != ChangeKind::Removed && is_stylesheet(url));

        if css_only {
            let paths = urls.into_iter().map(|(url, _)| url).collect();
            Some(WsMsg::Css { paths })
        } else {
            Some(WsMsg::Reload {
                reason: urls[0].0.clone(),
            })
        }
    }
}

fn url_for(rel: &Path) -> String {
    format!("/{}", rel.to_string_lossy().replace('\\', "/"))
}

fn is_stylesheet(url: &str) -> bool {
    url.ends_with(".css") || url.ends_with(".css.map")
}
