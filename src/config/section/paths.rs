//! `[paths]` section configuration.
//!
//! ```toml
//! [paths]
//! source = "source"   # read-only input tree
//! build = "build"     # generated output tree, deleted by `clean`
//! ```
//!
//! Both are relative to the directory holding `kiln.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub source: PathBuf,
    pub build: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source: "source".into(),
            build: "build".into(),
        }
    }
}
