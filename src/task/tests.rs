use std::fs;
use std::io::{Error, ErrorKind};

use tempfile::TempDir;

use super::*;
use crate::report::CollectingNotifier;

#[test]
fn test_io_error_is_filesystem_failure() {
    let err = TaskError::io("build/img", Error::new(ErrorKind::PermissionDenied, "denied"));
    let failure = err.into_failure(TaskId::CleanImages);
    assert_eq!(failure.kind, FailureKind::Filesystem);
    assert_eq!(failure.title, "clean:img");
    assert!(failure.message.contains("build/img"));
}

#[test]
fn test_compile_error_keeps_title() {
    let failure = TaskError::compile("html", "boom").into_failure(TaskId::Html);
    assert_eq!(failure.kind, FailureKind::Compile);
    assert_eq!(failure.title, "html");
    assert_eq!(failure.message, "boom");
}

#[test]
fn test_execute_notifies_on_failure() {
    let dir = TempDir::new().unwrap();
    let config = PipelineConfig::with_root(dir.path());
    fs::create_dir_all(config.source_join("scss")).unwrap();
    fs::write(config.style_entry(), "a { color: }}").unwrap();

    let notifier = CollectingNotifier::new();
    let (outcome, _) = execute(TaskId::Style, &TaskContext::new(&config), &notifier);

    let failure = outcome.failure().unwrap();
    assert_eq!(failure.title, "Style");
    assert!(!failure.message.is_empty());

    let notified = notifier.failures();
    assert_eq!(notified.len(), 1);
    assert_eq!(notified[0].0, TaskId::Style);
    assert_eq!(&notified[0].1, failure);
}

#[test]
fn test_execute_success_is_silent() {
    let dir = TempDir::new().unwrap();
    let config = PipelineConfig::with_root(dir.path());

    let notifier = CollectingNotifier::new();
    let (outcome, _) = execute(TaskId::Clean, &TaskContext::new(&config), &notifier);

    assert!(outcome.is_done());
    assert!(notifier.failures().is_empty());
}
