use std::path::PathBuf;

use tempfile::TempDir;

use super::classifier::{BuildRoute, Route, SourceRoute, sequences_for};
use super::debouncer::{DEBOUNCE_MS, Debouncer};
use super::types::{ChangeKind, Changes};
use crate::actor::messages::{RunnerMsg, WsMsg};
use crate::config::PipelineConfig;
use crate::core::TaskId;

fn make_config() -> (TempDir, PipelineConfig) {
    let temp = TempDir::new().unwrap();
    let config = PipelineConfig::with_root(temp.path());
    (temp, config)
}

fn make_event(paths: Vec<&str>, kind: notify::EventKind) -> notify::Event {
    notify::Event {
        kind,
        paths: paths.into_iter().map(PathBuf::from).collect(),
        attrs: Default::default(),
    }
}

fn modify_kind() -> notify::EventKind {
    notify::EventKind::Modify(notify::event::ModifyKind::Data(
        notify::event::DataChange::Any,
    ))
}

fn create_kind() -> notify::EventKind {
    notify::EventKind::Create(notify::event::CreateKind::File)
}

fn remove_kind() -> notify::EventKind {
    notify::EventKind::Remove(notify::event::RemoveKind::File)
}

fn changes(paths: &[PathBuf], kind: ChangeKind) -> Changes {
    paths.iter().map(|p| (p.clone(), kind)).collect()
}

// =============================================================================
// Debouncer
// =============================================================================

#[test]
fn test_debouncer_empty() {
    let debouncer = Debouncer::new();
    assert!(!debouncer.is_ready());
}

#[test]
fn test_event_kinds() {
    let mut debouncer = Debouncer::new();

    debouncer.add_event(&make_event(vec!["/tmp/a.scss"], create_kind()));
    debouncer.add_event(&make_event(vec!["/tmp/b.scss"], modify_kind()));
    debouncer.add_event(&make_event(vec!["/tmp/c.scss"], remove_kind()));

    assert_eq!(debouncer.changes.len(), 3);
    assert_eq!(debouncer.changes[&PathBuf::from("/tmp/a.scss")], ChangeKind::Created);
    assert_eq!(debouncer.changes[&PathBuf::from("/tmp/b.scss")], ChangeKind::Modified);
    assert_eq!(debouncer.changes[&PathBuf::from("/tmp/c.scss")], ChangeKind::Removed);
}

#[test]
fn test_metadata_and_temp_files_ignored() {
    let mut debouncer = Debouncer::new();
    let metadata = notify::EventKind::Modify(notify::event::ModifyKind::Metadata(
        notify::event::MetadataKind::WriteTime,
    ));

    debouncer.add_event(&make_event(vec!["/tmp/a.scss"], metadata));
    debouncer.add_event(&make_event(vec!["/tmp/.index.html.swp"], modify_kind()));
    debouncer.add_event(&make_event(vec!["/tmp/style.scss~"], modify_kind()));

    assert!(debouncer.changes.is_empty());
    assert!(debouncer.last_event.is_none());
}

#[test]
fn test_created_then_removed_is_dropped() {
    let mut debouncer = Debouncer::new();
    debouncer.add_event(&make_event(vec!["/tmp/x.html"], create_kind()));
    debouncer.add_event(&make_event(vec!["/tmp/x.html"], remove_kind()));
    assert!(debouncer.changes.is_empty());
}

#[test]
fn test_removed_then_created_is_restored() {
    let mut debouncer = Debouncer::new();
    debouncer.add_event(&make_event(vec!["/tmp/x.html"], remove_kind()));
    debouncer.add_event(&make_event(vec!["/tmp/x.html"], create_kind()));
    assert_eq!(debouncer.changes[&PathBuf::from("/tmp/x.html")], ChangeKind::Created);
}

#[test]
fn test_burst_collapses_into_one_batch() {
    let mut debouncer = Debouncer::new();
    for _ in 0..5 {
        debouncer.add_event(&make_event(vec!["/tmp/style.scss"], modify_kind()));
    }
    assert_eq!(debouncer.changes.len(), 1);
    assert!(!debouncer.is_ready());

    debouncer.last_event =
        Some(std::time::Instant::now() - std::time::Duration::from_millis(DEBOUNCE_MS + 10));
    let batch = debouncer.take_if_ready().unwrap();
    assert_eq!(batch.len(), 1);
    assert!(debouncer.changes.is_empty());
}

#[test]
fn test_cooldown_after_flush() {
    let mut debouncer = Debouncer::new();
    let past = std::time::Instant::now() - std::time::Duration::from_millis(DEBOUNCE_MS + 10);

    debouncer.add_event(&make_event(vec!["/tmp/a.scss"], modify_kind()));
    debouncer.last_event = Some(past);
    assert!(debouncer.take_if_ready().is_some());

    debouncer.add_event(&make_event(vec!["/tmp/b.scss"], modify_kind()));
    debouncer.last_event = Some(past);
    // Quiet window elapsed, but the previous flush was just now.
    assert!(!debouncer.is_ready());
}

// =============================================================================
// Source classification
// =============================================================================

#[test]
fn test_scss_change_runs_style() {
    let (_dir, config) = make_config();
    let changed = vec![
        config.source_join("scss/style.scss"),
        config.source_join("scss/components/deep/_button.scss"),
    ];
    assert_eq!(sequences_for(&changed, &config), vec![vec![TaskId::Style]]);
}

#[test]
fn test_html_only_top_level() {
    let (_dir, config) = make_config();

    let changed = vec![config.source_join("index.html")];
    assert_eq!(sequences_for(&changed, &config), vec![vec![TaskId::Html]]);

    let nested = vec![config.source_join("partials/header.html")];
    assert!(sequences_for(&nested, &config).is_empty());
}

#[test]
fn test_image_change_cleans_then_copies() {
    let (_dir, config) = make_config();
    let changed = vec![config.source_join("img/photo.jpg")];
    assert_eq!(
        sequences_for(&changed, &config),
        vec![vec![TaskId::CleanImages, TaskId::CopyImages]]
    );
}

#[test]
fn test_sequences_merged_without_duplicates() {
    let (_dir, config) = make_config();
    let changed = vec![
        config.source_join("img/a.png"),
        config.source_join("img/b.png"),
        config.source_join("about.html"),
        config.source_join("scss/_vars.scss"),
        config.source_join("index.html"),
    ];
    assert_eq!(
        sequences_for(&changed, &config),
        vec![
            vec![TaskId::Style],
            vec![TaskId::Html],
            vec![TaskId::CleanImages, TaskId::CopyImages],
        ]
    );
}

#[test]
fn test_unmatched_paths_ignored() {
    let (_dir, config) = make_config();
    let changed = vec![
        config.source_join("fonts/sans.woff2"),
        config.source_join("notes.txt"),
        config.root_join("kiln.toml"),
        config.build_join("index.html"),
    ];
    assert!(sequences_for(&changed, &config).is_empty());
}

#[test]
fn test_source_route_keeps_changed_paths() {
    let (_dir, config) = make_config();
    let paths = vec![config.source_join("b.html"), config.source_join("a.html")];

    let msg = SourceRoute.classify(changes(&paths, ChangeKind::Modified), &config);
    let Some(RunnerMsg::Run { sequences, changed }) = msg else {
        panic!("expected a run message");
    };
    assert_eq!(sequences, vec![vec![TaskId::Html]]);
    assert_eq!(changed, vec![config.source_join("a.html"), config.source_join("b.html")]);
}

// =============================================================================
// Build classification
// =============================================================================

#[test]
fn test_css_only_batch_refreshes_styles() {
    let (_dir, config) = make_config();
    let paths = vec![config.style_output()];

    let msg = BuildRoute.classify(changes(&paths, ChangeKind::Modified), &config);
    match msg {
        Some(WsMsg::Css { paths }) => assert_eq!(paths, vec!["/css/style.min.css".to_string()]),
        other => panic!("expected css refresh, got {other:?}"),
    }
}

#[test]
fn test_mixed_batch_reloads() {
    let (_dir, config) = make_config();
    let paths = vec![config.style_output(), config.build_join("index.html")];

    let msg = BuildRoute.classify(changes(&paths, ChangeKind::Modified), &config);
    assert!(matches!(msg, Some(WsMsg::Reload { .. })));
}

#[test]
fn test_removed_stylesheet_reloads() {
    let (_dir, config) = make_config();
    let paths = vec![config.style_output()];

    let msg = BuildRoute.classify(changes(&paths, ChangeKind::Removed), &config);
    assert!(matches!(msg, Some(WsMsg::Reload { .. })));
}

#[test]
fn test_changes_outside_build_ignored() {
    let (_dir, config) = make_config();
    let paths = vec![config.source_join("index.html")];
    assert!(BuildRoute.classify(changes(&paths, ChangeKind::Modified), &config).is_none());
}
