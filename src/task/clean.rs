//! `clean` and `clean:img`.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use super::{IoResultExt, TaskContext, TaskError};
use crate::core::TaskSummary;
use crate::log;
use crate::utils::path::collect_all_files;

/// Delete the whole build tree.
pub fn clean(ctx: &TaskContext<'_>) -> Result<TaskSummary, TaskError> {
    remove_tree(&ctx.config.build_dir(), ctx)
}

/// Delete the build image directory.
pub fn clean_images(ctx: &TaskContext<'_>) -> Result<TaskSummary, TaskError> {
    remove_tree(&ctx.config.build_join("img"), ctx)
}

/// Remove `dir` recursively. A missing directory is not an error.
fn remove_tree(dir: &Path, ctx: &TaskContext<'_>) -> Result<TaskSummary, TaskError> {
    let removed = collect_all_files(dir).len();

    match fs::remove_dir_all(dir) {
        Ok(()) => {
            log!("clean"; "removed {}", ctx.config.root_relative(dir).display());
            Ok(TaskSummary::files(removed))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(TaskSummary::files(0)),
        Err(e) => Err(e).at(dir),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use tempfile::TempDir;

    #[test]
    fn test_clean_missing_build_dir_succeeds() {
        let dir = TempDir::new().unwrap();
        let config = PipelineConfig::with_root(dir.path());

        let summary = clean(&TaskContext::new(&config)).unwrap();
        assert_eq!(summary.files, 0);
        assert!(!config.build_dir().exists());
    }

    #[test]
    fn test_clean_images_missing_succeeds() {
        let dir = TempDir::new().unwrap();
        let config = PipelineConfig::with_root(dir.path());
        fs::create_dir_all(config.build_dir()).unwrap();

        assert!(clean_images(&TaskContext::new(&config)).is_ok());
        assert!(config.build_dir().exists());
    }

    #[test]
    fn test_clean_removes_tree() {
        let dir = TempDir::new().unwrap();
        let config = PipelineConfig::with_root(dir.path());
        fs::create_dir_all(config.build_join("css")).unwrap();
        fs::write(config.build_join("css/style.min.css"), "a{}").unwrap();
        fs::write(config.build_join("index.html"), "<html>").unwrap();

        let summary = clean(&TaskContext::new(&config)).unwrap();
        assert_eq!(summary.files, 2);
        assert!(!config.build_dir().exists());
    }

    #[test]
    fn test_clean_images_keeps_siblings() {
        let dir = TempDir::new().unwrap();
        let config = PipelineConfig::with_root(dir.path());
        fs::create_dir_all(config.build_join("img")).unwrap();
        fs::write(config.build_join("img/a.png"), b"png").unwrap();
        fs::write(config.build_join("index.html"), "<html>").unwrap();

        clean_images(&TaskContext::new(&config)).unwrap();
        assert!(!config.build_join("img").exists());
        assert!(config.build_join("index.html").exists());
    }
}
