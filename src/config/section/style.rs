//! `[style]` section configuration.
//!
//! ```toml
//! [style]
//! entry = "scss/style.scss"         # relative to paths.source
//! output = "css/style.min.css"      # relative to paths.build
//! browsers = ["last 1 version"]     # browserslist queries for prefixing
//! sourcemap = true                  # append an inline sourcemap
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub entry: PathBuf,
    pub output: PathBuf,
    pub browsers: Vec<String>,
    pub sourcemap: bool,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            entry: "scss/style.scss".into(),
            output: "css/style.min.css".into(),
            browsers: vec!["last 1 version".into()],
            sourcemap: true,
        }
    }
}
