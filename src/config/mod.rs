//! Pipeline configuration (`kiln.toml`).
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── paths      # [paths]
//! │   ├── style      # [style]
//! │   ├── sprite     # [sprite]
//! │   └── serve      # [serve]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError
//! │   └── handle     # Global config handle
//! └── mod.rs         # PipelineConfig (this file)
//! ```
//!
//! The file is optional. Without it every section takes its default, which
//! is the fixed `source/` → `build/` layout, and the project root is the
//! current directory.

pub mod section;
pub mod types;

pub use section::{PathsConfig, ServeConfig, SpriteConfig, StyleConfig};
pub use types::{ConfigError, cfg, init_config};

use crate::{cli::Cli, log, utils::path::normalize_path};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing kiln.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Absolute path to the config file, empty when none was found
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub style: StyleConfig,

    #[serde(default)]
    pub sprite: SpriteConfig,

    #[serde(default)]
    pub serve: ServeConfig,
}

impl PipelineConfig {
    /// Load configuration for a CLI invocation.
    ///
    /// Searches upward from cwd for the config file. The project root is the
    /// config file's parent directory, or cwd when there is no config file.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cli.config, &cwd) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map(Path::to_path_buf).unwrap_or(cwd);
                config.config_path = path;
                config
            }
            None => Self::with_root(&cwd),
        };

        config.root = normalize_path(&config.root);
        config.apply_cli(cli);
        config.validate()?;

        if config.config_path.as_os_str().is_empty() {
            crate::debug!("config"; "no config file, using defaults at {}", config.root.display());
        } else {
            crate::debug!("config"; "loaded {}", config.config_path.display());
        }
        Ok(config)
    }

    /// Defaults rooted at `root`.
    pub fn with_root(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            ..Self::default()
        }
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Apply serve flags from the command line over the `[serve]` section.
    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(args) = cli.command().serve_args() {
            Self::update_option(&mut self.serve.interface, args.interface.as_ref());
            Self::update_option(&mut self.serve.port, args.port.as_ref());
            if args.no_open {
                self.serve.open = false;
            }
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Validate values that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.style.browsers.iter().all(|q| q.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "style.browsers must contain at least one query".into(),
            ));
        }
        if self.paths.source == self.paths.build {
            return Err(ConfigError::Validation(
                "paths.source and paths.build must differ".into(),
            ));
        }
        if self.serve.port == 0 {
            return Err(ConfigError::Validation("serve.port must be non-zero".into()));
        }
        Ok(())
    }

    // ========================================================================
    // resolved paths
    // ========================================================================

    /// Join a path with the root directory.
    pub fn root_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    /// Source tree root.
    pub fn source_dir(&self) -> PathBuf {
        self.root_join(&self.paths.source)
    }

    /// Build tree root.
    pub fn build_dir(&self) -> PathBuf {
        self.root_join(&self.paths.build)
    }

    pub fn source_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.source_dir().join(path)
    }

    pub fn build_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.build_dir().join(path)
    }

    pub fn style_entry(&self) -> PathBuf {
        self.source_join(&self.style.entry)
    }

    pub fn style_output(&self) -> PathBuf {
        self.build_join(&self.style.output)
    }

    pub fn sprite_icons(&self) -> PathBuf {
        self.source_join(&self.sprite.icons)
    }

    pub fn sprite_image(&self) -> PathBuf {
        self.source_join(&self.sprite.image)
    }

    pub fn sprite_partial(&self) -> PathBuf {
        self.source_join(&self.sprite.partial)
    }

    /// Get path relative to the source root, if it lies inside it.
    pub fn source_relative<'a>(&self, path: &'a Path) -> Option<&'a Path> {
        path.strip_prefix(self.source_dir()).ok()
    }

    /// Get path relative to the project root (for log lines).
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }
}

/// Find config file by searching upward from `start`.
///
/// ```text
/// /home/user/site/source/scss/  ← cwd
/// /home/user/site/kiln.toml     ← found!
/// ```
pub fn find_config_file(config_name: &Path, start: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    start
        .ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.is_file())
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config content. Panics on unknown fields to catch typos in tests.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> PipelineConfig {
    let (parsed, ignored) = PipelineConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
