//! Import resolution on top of native Sass rules.
//!
//! `MagicFs` sits between `grass` and the disk. Every stylesheet grass reads
//! passes through it and has its `@import` statements rewritten:
//!
//! - `@import 'components/**/*.scss';` becomes one import per match, sorted
//! - `@import '~normalize.css';` points into the nearest `node_modules`
//!   above the importing file. A bare package name resolves through the
//!   stylesheet fields of its `package.json`.
//!
//! `.css` files reached this way are inlined rather than left as plain CSS
//! `@import`s. The rewritten import names a `<file>.css.scss` alias, which
//! `MagicFs` serves from `<file>.css`.
//!
//! Selector filters (`{ .btn } from ...`) and node filters
//! (`[mixins] from ...`) are rejected with an error.
//!
//! A file is handed to grass once per compile. Later reads of the same file
//! return an empty stylesheet, so `@import` behaves as import-once.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use parking_lot::Mutex;
use regex::Regex;
use rustc_hash::FxHashSet;

use crate::debug;

/// `@import <args>;` at the start of a line.
static IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^([ \t]*)@import[ \t]+([^;\n]+);"#).expect("valid import regex")
});

/// One quoted import argument.
static QUOTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]*)"|'([^']*)'"#).expect("valid quoted regex"));

/// `{ .selector } from x` or `[nodes] from x`.
static FILTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\{[^}]*\}|\[[^\]]*\])\s*from\s").expect("valid filter regex")
});

/// `package.json` fields naming a package's stylesheet entry, by priority.
const PACKAGE_FIELDS: [&str; 5] = ["sass", "scss", "style", "css", "main"];

/// Filesystem adapter handed to `grass::Options::fs`.
#[derive(Debug, Default)]
pub struct MagicFs {
    seen: Mutex<FxHashSet<PathBuf>>,
}

impl MagicFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Files handed to grass so far, canonicalized.
    pub fn loaded(&self) -> usize {
        self.seen.lock().len()
    }
}

impl grass::Fs for MagicFs {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file() || aliased_css(path).is_some_and(|css| css.is_file())
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        let path = match aliased_css(path) {
            Some(css) if !path.is_file() => css,
            _ => path.to_path_buf(),
        };

        let key = path.canonicalize().unwrap_or_else(|_| path.clone());
        if !self.seen.lock().insert(key) {
            debug!("scss"; "import-once: skipping {}", path.display());
            return Ok(Vec::new());
        }

        let bytes = std::fs::read(&path)?;
        if !is_sass_source(&path) {
            return Ok(bytes);
        }

        let source = String::from_utf8(bytes)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        rewrite_imports(&source, dir)
            .map(String::into_bytes)
            .map_err(|e| io::Error::new(e.kind(), format!("{}: {e}", path.display())))
    }
}

fn is_sass_source(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == "scss" || ext == "sass")
}

/// Rewrite every `@import` statement of `source`, resolving relative to `dir`.
pub fn rewrite_imports(source: &str, dir: &Path) -> io::Result<String> {
    let mut error = None;
    let rewritten = IMPORT_RE.replace_all(source, |caps: &regex::Captures<'_>| {
        let indent = &caps[1];
        match rewrite_statement(&caps[2], dir) {
            Ok(Some(args)) if args.is_empty() => String::new(),
            Ok(Some(args)) => format!("{indent}@import {};", args.join(", ")),
            Ok(None) => caps[0].to_string(),
            Err(e) => {
                if error.is_none() {
                    error = Some(e);
                }
                caps[0].to_string()
            }
        }
    });

    match error {
        Some(e) => Err(e),
        None => Ok(rewritten.into_owned()),
    }
}

/// New argument list for one statement, or `None` to leave it untouched.
fn rewrite_statement(args: &str, dir: &Path) -> io::Result<Option<Vec<String>>> {
    let targets: Vec<&str> = QUOTED_RE
        .captures_iter(args)
        .filter_map(|c| c.get(1).or_else(|| c.get(2)))
        .map(|m| m.as_str())
        .collect();

    // Media queries, `url(...)` and other unquoted parts are plain CSS.
    let rest = QUOTED_RE.replace_all(args, "");
    if targets.is_empty() || rest.chars().any(|c| c != ',' && !c.is_whitespace()) {
        return Ok(None);
    }

    if let Some(filtered) = targets.iter().find(|t| FILTER_RE.is_match(t)) {
        return Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("filtered imports are not supported: '{filtered}'"),
        ));
    }

    if !targets.iter().any(|t| needs_rewrite(t)) {
        return Ok(None);
    }

    let mut out = Vec::new();
    for target in targets {
        if let Some(package) = target.strip_prefix('~') {
            match resolve_package(package, dir) {
                Some(path) => out.push(quote(&path_str(&import_path(path)))),
                None => out.push(quote(target)),
            }
        } else if is_plain_css(target) {
            out.push(quote(target));
        } else if is_glob(target) {
            out.extend(
                expand_glob(target, dir)
                    .into_iter()
                    .map(|p| quote(&path_str(&import_path(p)))),
            );
        } else {
            out.push(quote(target));
        }
    }
    Ok(Some(out))
}

fn needs_rewrite(target: &str) -> bool {
    target.starts_with('~') || (!is_plain_css(target) && is_glob(target))
}

/// Imports Sass passes through as CSS `@import`.
fn is_plain_css(target: &str) -> bool {
    target.ends_with(".css")
        || target.starts_with("http://")
        || target.starts_with("https://")
        || target.starts_with("//")
        || target.starts_with("url(")
}

fn is_glob(target: &str) -> bool {
    target.contains(['*', '?', '['])
}

fn quote(target: &str) -> String {
    format!("\"{target}\"")
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Path to hand to grass for a resolved file. A `.css` file goes through
/// its `.css.scss` alias so grass inlines it.
fn import_path(path: PathBuf) -> PathBuf {
    if path.extension().is_some_and(|ext| ext == "css") {
        let mut alias = path.into_os_string();
        alias.push(".scss");
        PathBuf::from(alias)
    } else {
        path
    }
}

/// `x.css.scss` → `x.css`.
fn aliased_css(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?.to_str()?;
    let css = name.strip_suffix(".scss")?;
    css.ends_with(".css").then(|| path.with_file_name(css))
}

/// Sorted stylesheet matches of `pattern` under `dir`.
fn expand_glob(pattern: &str, dir: &Path) -> Vec<PathBuf> {
    let full = dir.join(pattern);
    let Ok(paths) = glob::glob(&full.to_string_lossy()) else {
        debug!("scss"; "invalid glob import: {}", pattern);
        return Vec::new();
    };
    let mut matches: Vec<_> = paths
        .filter_map(Result::ok)
        .filter(|p| p.is_file() && is_stylesheet(p))
        .collect();
    matches.sort();
    matches
}

fn is_stylesheet(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == "scss" || ext == "sass" || ext == "css")
}

/// `pkg/sub/path` → `<ancestor>/node_modules/pkg/sub/path`.
///
/// A bare `pkg` resolves to the entry named in its `package.json`, falling
/// back to the package directory. Anything else keeps the requested form;
/// grass applies partial and extension rules to it like to any other import.
fn resolve_package(package: &str, dir: &Path) -> Option<PathBuf> {
    let name = package_name(package);
    let root = dir
        .ancestors()
        .map(|ancestor| ancestor.join("node_modules").join(name))
        .find(|root| root.is_dir())?;

    let subpath = package[name.len()..].trim_start_matches('/');
    if !subpath.is_empty() {
        return Some(root.join(subpath));
    }
    Some(package_entry(&root).unwrap_or(root))
}

/// First stylesheet named by the `package.json` fields in [`PACKAGE_FIELDS`].
fn package_entry(root: &Path) -> Option<PathBuf> {
    let manifest = std::fs::read_to_string(root.join("package.json")).ok()?;
    let manifest: serde_json::Value = match serde_json::from_str(&manifest) {
        Ok(value) => value,
        Err(e) => {
            debug!("scss"; "ignoring {}: {}", root.join("package.json").display(), e);
            return None;
        }
    };

    PACKAGE_FIELDS
        .iter()
        .filter_map(|field| manifest.get(field)?.as_str())
        .map(|entry| root.join(entry))
        .find(|path| path.is_file() && is_stylesheet(path))
}

/// First path segment, or the first two for `@scope/pkg`.
fn package_name(package: &str) -> &str {
    let mut parts = package.splitn(3, '/');
    let first = parts.next().unwrap_or_default();
    if first.starts_with('@')
        && let Some(second) = parts.next()
    {
        return &package[..first.len() + 1 + second.len()];
    }
    first
}
