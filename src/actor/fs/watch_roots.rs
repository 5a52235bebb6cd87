use std::path::PathBuf;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use rustc_hash::FxHashSet;

/// Keeps the watched roots attached.
///
/// `build/` is deleted by `clean` and recreated by the writers, which drops
/// the OS watch on it. Roots that vanish are re-attached once they exist again.
pub(super) struct WatchRoots {
    desired: Vec<PathBuf>,
    attached: FxHashSet<PathBuf>,
}

impl WatchRoots {
    pub(super) fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            desired: paths,
            attached: FxHashSet::default(),
        }
    }

    pub(super) fn attach_existing(
        &mut self,
        watcher: &mut RecommendedWatcher,
    ) -> notify::Result<()> {
        for path in &self.desired {
            if !path.exists() {
                continue;
            }
            watcher.watch(path, RecursiveMode::Recursive)?;
            self.attached.insert(path.clone());
        }

        Ok(())
    }

    /// Forget roots reported as removed, so `maintain` re-attaches them
    /// even when they are recreated before the next maintenance pass.
    pub(super) fn observe(&mut self, event: &notify::Event, watcher: &mut RecommendedWatcher) {
        if !matches!(event.kind, notify::EventKind::Remove(_)) {
            return;
        }
        for path in &event.paths {
            if self.attached.remove(path) {
                let _ = watcher.unwatch(path);
                crate::debug!("watch"; "root removed: {}", path.display());
            }
        }
    }

    /// Every desired root currently has a live watch.
    pub(super) fn is_complete(&self) -> bool {
        self.desired.iter().all(|path| self.attached.contains(path))
    }

    pub(super) fn maintain(&mut self, watcher: &mut RecommendedWatcher) {
        self.attached.retain(|path| path.exists());

        for path in &self.desired {
            if self.attached.contains(path) || !path.exists() {
                continue;
            }

            if watcher.watch(path, RecursiveMode::Recursive).is_ok() {
                self.attached.insert(path.clone());
                crate::debug!("watch"; "re-attached watch: {}", path.display());
            }
        }
    }
}
