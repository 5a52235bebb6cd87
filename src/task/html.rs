//! `html`: copy top-level templates into the build root.

use std::fs;
use std::path::{Path, PathBuf};

use super::{TaskContext, TaskError, ensure_parent};
use crate::core::TaskSummary;
use crate::debug;

/// Copy `source/*.html` to `build/`.
///
/// When the watcher supplies changed paths, only those that are top-level
/// templates are copied.
pub fn copy_html(ctx: &TaskContext<'_>) -> Result<TaskSummary, TaskError> {
    let source = ctx.config.source_dir();
    let build = ctx.config.build_dir();

    let templates = if ctx.changed.is_empty() {
        list_templates(&source)?
    } else {
        ctx.changed
            .iter()
            .filter(|p| is_template(p, &source) && p.is_file())
            .cloned()
            .collect()
    };

    for path in &templates {
        let Some(name) = path.file_name() else {
            continue;
        };
        let dst = build.join(name);
        ensure_parent(&dst)?;
        fs::copy(path, &dst).map_err(|e| {
            TaskError::compile("html", format!("{}: {e}", ctx.config.root_relative(path).display()))
        })?;
        debug!("html"; "{}", name.to_string_lossy());
    }

    Ok(TaskSummary::files(templates.len()))
}

/// Top-level `*.html` files of the source root, sorted.
fn list_templates(source: &Path) -> Result<Vec<PathBuf>, TaskError> {
    if !source.is_dir() {
        return Ok(Vec::new());
    }
    let entries = fs::read_dir(source).map_err(|e| TaskError::compile("html", e.to_string()))?;
    let mut templates: Vec<_> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| is_template(p, source) && p.is_file())
        .collect();
    templates.sort();
    Ok(templates)
}

/// `source/<name>.html`, not nested.
pub fn is_template(path: &Path, source: &Path) -> bool {
    path.parent() == Some(source) && path.extension().is_some_and(|e| e == "html")
}
