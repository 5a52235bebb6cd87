use std::path::PathBuf;

use rustc_hash::FxHashMap;

/// What happened to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Removed,
}

impl ChangeKind {
    pub(super) fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Removed => "removed",
        }
    }
}

/// Debounced batch: path → last meaningful change.
pub type Changes = FxHashMap<PathBuf, ChangeKind>;
