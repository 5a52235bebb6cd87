//! `scss`: entry stylesheet → `build/css/style.min.css`.
//!
//! ```text
//! style.scss ──grass + MagicFs──▶ expanded CSS ──strip /*! */──▶ lightningcss ──▶ style.min.css
//! ```
//!
//! Any failure along the way is a compile failure titled "Style".

mod importer;
mod postprocess;

use std::fs;
use std::path::Path;

use grass::{Options, OutputStyle};

use super::{IoResultExt, TaskContext, TaskError, ensure_parent};
use crate::config::PipelineConfig;
use crate::core::TaskSummary;
use crate::{debug, log};

use importer::MagicFs;
use postprocess::{PostprocessOptions, minify, strip_special_comments};

/// Notification title for stylesheet failures.
pub const TITLE: &str = "Style";

pub fn compile(ctx: &TaskContext<'_>) -> Result<TaskSummary, TaskError> {
    let config = ctx.config;
    let entry = config.style_entry();
    let output = config.style_output();

    let css = compile_stylesheet(&entry, config)?;
    ensure_parent(&output)?;
    fs::write(&output, css).at(&output)?;

    log!("scss"; "{}", config.root_relative(&output).display());
    Ok(TaskSummary::files(1))
}

/// Run the full stylesheet pipeline, returning the final file contents.
pub fn compile_stylesheet(entry: &Path, config: &PipelineConfig) -> Result<String, TaskError> {
    let expanded = compile_scss(entry)?;
    let stripped = strip_special_comments(&expanded);

    let source_name = config
        .source_relative(entry)
        .unwrap_or(entry)
        .to_string_lossy()
        .replace('\\', "/");

    minify(
        &stripped,
        &PostprocessOptions {
            source_name: &source_name,
            browsers: &config.style.browsers,
            sourcemap: config.style.sourcemap,
        },
    )
    .map_err(|message| TaskError::compile(TITLE, message))
}

/// Compile `entry` with grass in expanded style.
fn compile_scss(entry: &Path) -> Result<String, TaskError> {
    let fs = MagicFs::new();
    let load_paths: Vec<_> = entry.parent().map(Path::to_path_buf).into_iter().collect();

    let options = Options::default()
        .fs(&fs)
        .load_paths(&load_paths)
        .style(OutputStyle::Expanded);

    let css = grass::from_path(entry, &options)
        .map_err(|e| TaskError::compile(TITLE, e.to_string()))?;
    debug!("scss"; "{} stylesheets loaded", fs.loaded());
    Ok(css)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project(files: &[(&str, &str)]) -> (TempDir, PipelineConfig) {
        let dir = TempDir::new().unwrap();
        let config = PipelineConfig::with_root(dir.path());
        for (rel, content) in files {
            let path = config.source_join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        (dir, config)
    }

    #[test]
    fn test_compile_writes_single_minified_file() {
        let (_dir, config) = project(&[
            ("scss/style.scss", "@import 'vars';\n.a { .b { color: $brand; } }\n"),
            ("scss/_vars.scss", "$brand: #ff0000;\n"),
        ]);

        let summary = compile(&TaskContext::new(&config)).unwrap();
        assert_eq!(summary.files, 1);

        let css = fs::read_to_string(config.style_output()).unwrap();
        assert!(css.starts_with(".a .b{color:red}"));
        assert!(css.contains("sourceMappingURL=data:application/json"));

        let files = crate::utils::path::collect_all_files(&config.build_dir());
        assert_eq!(files, vec![config.style_output()]);
    }

    #[test]
    fn test_rerun_is_byte_identical() {
        let (_dir, config) = project(&[("scss/style.scss", "a { display: flex; }\n")]);
        let ctx = TaskContext::new(&config);

        compile(&ctx).unwrap();
        let first = fs::read(config.style_output()).unwrap();
        compile(&ctx).unwrap();
        assert_eq!(fs::read(config.style_output()).unwrap(), first);
    }

    #[test]
    fn test_glob_and_import_once() {
        let (_dir, config) = project(&[
            (
                "scss/style.scss",
                "@import 'base';\n@import 'components/*.scss';\n@import 'base';\n",
            ),
            ("scss/_base.scss", ".base { margin: 0; }\n"),
            ("scss/components/_a.scss", ".a { color: blue; }\n"),
            ("scss/components/_b.scss", "@import '../base';\n.b { color: green; }\n"),
        ]);

        let css = compile_stylesheet(&config.style_entry(), &config).unwrap();
        assert_eq!(css.matches(".base{").count(), 1);
        let a = css.find(".a{").unwrap();
        let b = css.find(".b{").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_css_package_is_inlined() {
        let (_dir, config) = project(&[(
            "scss/style.scss",
            "@import '~normalize.css';\n.a { color: red; }\n",
        )]);
        let pkg = config.root_join("node_modules/normalize.css");
        fs::create_dir_all(&pkg).unwrap();
        fs::write(pkg.join("package.json"), r#"{ "style": "normalize.css" }"#).unwrap();
        fs::write(pkg.join("normalize.css"), "html { line-height: 1.15; }\n").unwrap();

        let css = compile_stylesheet(&config.style_entry(), &config).unwrap();
        assert!(!css.contains("@import"), "{css}");
        assert!(css.starts_with("html{line-height:1.15}"), "{css}");
    }

    #[test]
    fn test_filtered_import_is_style_failure() {
        let (_dir, config) = project(&[(
            "scss/style.scss",
            "@import '{ .btn } from ~bootstrap';\n",
        )]);

        let err = compile(&TaskContext::new(&config)).unwrap_err();
        assert!(matches!(err, TaskError::Compile { ref title, .. } if title == "Style"));
        assert!(!config.style_output().exists());
    }

    #[test]
    fn test_special_comments_removed() {
        let (_dir, config) = project(&[(
            "scss/style.scss",
            "/*! license banner */\na { color: red; }\n",
        )]);

        let css = compile_stylesheet(&config.style_entry(), &config).unwrap();
        assert!(!css.contains("license banner"));
    }

    #[test]
    fn test_syntax_error_is_style_failure() {
        let (_dir, config) = project(&[("scss/style.scss", "a { color: red\n")]);

        let err = compile(&TaskContext::new(&config)).unwrap_err();
        let failure = err.into_failure(crate::core::TaskId::Style);
        assert_eq!(failure.title, "Style");
        assert_eq!(failure.kind, crate::core::FailureKind::Compile);
        assert!(!failure.message.is_empty());
        assert!(!config.style_output().exists());
    }

    #[test]
    fn test_missing_entry_is_style_failure() {
        let (_dir, config) = project(&[]);
        let err = compile(&TaskContext::new(&config)).unwrap_err();
        assert!(matches!(err, TaskError::Compile { ref title, .. } if title == "Style"));
    }
}
