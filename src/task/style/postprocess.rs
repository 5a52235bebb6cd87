//! Compiled CSS → minified, prefixed CSS with an inline sourcemap.

use std::sync::LazyLock;

use base64::{Engine, engine::general_purpose::STANDARD};
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};
use parcel_sourcemap::SourceMap;
use regex::Regex;

/// `/*! ... */` comments, kept by most minifiers as license banners.
static SPECIAL_COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*!.*?\*/\n?").expect("valid special comment regex"));

/// Options for one postprocess run.
#[derive(Debug, Clone)]
pub struct PostprocessOptions<'a> {
    /// Name recorded as the map's only source.
    pub source_name: &'a str,
    /// Browserslist queries used for vendor prefixing.
    pub browsers: &'a [String],
    pub sourcemap: bool,
}

pub fn strip_special_comments(css: &str) -> String {
    SPECIAL_COMMENT_RE.replace_all(css, "").into_owned()
}

/// Resolve browserslist queries into lightningcss targets.
pub fn targets_for(queries: &[String]) -> Result<Targets, String> {
    let browsers = Browsers::from_browserslist(queries.iter().map(String::as_str))
        .map_err(|e| format!("invalid browser list {queries:?}: {e}"))?;
    Ok(Targets {
        browsers,
        ..Targets::default()
    })
}

/// Minify and prefix `css`, appending an inline sourcemap when enabled.
pub fn minify(css: &str, options: &PostprocessOptions<'_>) -> Result<String, String> {
    let targets = targets_for(options.browsers)?;

    let mut stylesheet = StyleSheet::parse(
        css,
        ParserOptions {
            filename: options.source_name.to_string(),
            ..ParserOptions::default()
        },
    )
    .map_err(|e| e.to_string())?;

    stylesheet
        .minify(MinifyOptions {
            targets,
            ..MinifyOptions::default()
        })
        .map_err(|e| e.to_string())?;

    let mut map = options.sourcemap.then(|| SourceMap::new("/"));
    if let Some(map) = map.as_mut() {
        let index = map.add_source(options.source_name);
        map.set_source_content(index as usize, css)
            .map_err(|e| format!("{e:?}"))?;
    }

    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            targets,
            source_map: map.as_mut(),
            ..PrinterOptions::default()
        })
        .map_err(|e| e.to_string())?;

    let mut code = result.code;
    if let Some(map) = map.as_mut() {
        let json = map.to_json(None).map_err(|e| format!("{e:?}"))?;
        code.push_str(&format!(
            "\n/*# sourceMappingURL=data:application/json;charset=utf8;base64,{} */\n",
            STANDARD.encode(json)
        ));
    }
    Ok(code)
}
