//! `copy:img` and `copy:fonts`.
//!
//! Byte-for-byte copies with relative paths preserved. Nothing is ever
//! deleted here, so files removed from the source survive in the build tree
//! until the next clean.

use std::fs;
use std::path::Path;

use rayon::prelude::*;

use super::{IoResultExt, TaskContext, TaskError, ensure_parent};
use crate::core::TaskSummary;
use crate::debug;
use crate::utils::path::collect_all_files;

/// Copy every file under `source/img` to `build/img`.
pub fn copy_images(ctx: &TaskContext<'_>) -> Result<TaskSummary, TaskError> {
    let from = ctx.config.source_join("img");
    let to = ctx.config.build_join("img");
    copy_tree(&from, &to, |_| true).map(TaskSummary::files)
}

/// Copy files that have an extension under `source/fonts` to `build/fonts`.
pub fn copy_fonts(ctx: &TaskContext<'_>) -> Result<TaskSummary, TaskError> {
    let from = ctx.config.source_join("fonts");
    let to = ctx.config.build_join("fonts");
    copy_tree(&from, &to, |path| path.extension().is_some()).map(TaskSummary::files)
}

/// Copy the files under `from` accepted by `filter` into `to`.
///
/// Returns the number of files copied. A missing `from` copies nothing.
pub fn copy_tree(
    from: &Path,
    to: &Path,
    filter: impl Fn(&Path) -> bool + Sync,
) -> Result<usize, TaskError> {
    let files: Vec<_> = collect_all_files(from)
        .into_iter()
        .filter(|p| filter(p))
        .collect();

    files
        .par_iter()
        .map(|src| {
            let rel = src.strip_prefix(from).unwrap_or(src);
            let dst = to.join(rel);
            ensure_parent(&dst)?;
            fs::copy(src, &dst).at(src)?;
            debug!("copy"; "{}", rel.display());
            Ok(())
        })
        .collect::<Result<Vec<()>, TaskError>>()?;

    Ok(files.len())
}
