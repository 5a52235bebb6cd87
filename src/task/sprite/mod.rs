//! `sprite`: `source/img/icons/*.png` → sprite sheet + SCSS partial.
//!
//! Both outputs land in the source tree so that `scss` can import the
//! partial and `copy:img` ships the sheet. The icon set is always rebuilt
//! from scratch.

mod pack;
mod partial;

use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage, imageops};
use rustc_hash::FxHashMap;

use super::{IoResultExt, TaskContext, TaskError, ensure_parent};
use crate::core::TaskSummary;
use crate::{debug, log};

use pack::pack;
use partial::{SpriteEntry, SpriteSheet, render, sanitize_name, sass_key};

pub fn generate(ctx: &TaskContext<'_>) -> Result<TaskSummary, TaskError> {
    let config = ctx.config;
    let icons = list_icons(&config.sprite_icons())?;
    if icons.is_empty() {
        debug!("sprite"; "no icons in {}", config.root_relative(config.sprite_icons()).display());
        return Ok(TaskSummary::files(0));
    }
    let names = icon_names(&icons)?;

    let images = icons
        .iter()
        .map(|path| {
            image::open(path)
                .map(|img| img.to_rgba8())
                .map_err(|source| TaskError::Image {
                    path: path.clone(),
                    source,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let sizes: Vec<_> = images.iter().map(|img| img.dimensions()).collect();
    let layout = pack(&sizes, config.sprite.padding);

    let mut sheet = RgbaImage::new(layout.width, layout.height);
    for (img, place) in images.iter().zip(&layout.placements) {
        imageops::replace(&mut sheet, img, i64::from(place.x), i64::from(place.y));
    }

    let image_path = config.sprite_image();
    ensure_parent(&image_path)?;
    sheet
        .save_with_format(&image_path, ImageFormat::Png)
        .map_err(|source| TaskError::Image {
            path: image_path.clone(),
            source,
        })?;

    let entries: Vec<_> = names
        .into_iter()
        .zip(&layout.placements)
        .map(|(name, placement)| SpriteEntry {
            name,
            placement: *placement,
        })
        .collect();

    let partial_path = config.sprite_partial();
    ensure_parent(&partial_path)?;
    let scss = render(&SpriteSheet {
        entries: &entries,
        width: layout.width,
        height: layout.height,
        image: &config.sprite.image_ref,
    });
    fs::write(&partial_path, scss).at(&partial_path)?;

    log!(
        "sprite";
        "{} icons → {} ({}x{})",
        entries.len(),
        config.root_relative(&image_path).display(),
        layout.width,
        layout.height
    );
    Ok(TaskSummary::files(2))
}

/// `*.png` directly inside `dir`, sorted by file name.
fn list_icons(dir: &Path) -> Result<Vec<PathBuf>, TaskError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut icons: Vec<_> = fs::read_dir(dir)
        .at(dir)?
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|e| e.eq_ignore_ascii_case("png")))
        .collect();
    icons.sort();
    Ok(icons)
}

fn icon_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    sanitize_name(&stem)
}

/// Sass names of `icons`, in order. Two icons may not share a name.
fn icon_names(icons: &[PathBuf]) -> Result<Vec<String>, TaskError> {
    let mut seen: FxHashMap<String, &Path> = FxHashMap::default();
    icons
        .iter()
        .map(|path| {
            let name = icon_name(path);
            match seen.insert(sass_key(&name), path.as_path()) {
                Some(first) => Err(TaskError::DuplicateIcon {
                    name,
                    first: first.to_path_buf(),
                    second: path.clone(),
                }),
                None => Ok(name),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use image::Rgba;
    use tempfile::TempDir;

    fn write_icon(config: &PipelineConfig, name: &str, w: u32, h: u32, color: [u8; 4]) {
        let path = config.sprite_icons().join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        RgbaImage::from_pixel(w, h, Rgba(color)).save(path).unwrap();
    }

    #[test]
    fn test_no_icons_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let config = PipelineConfig::with_root(dir.path());

        let summary = generate(&TaskContext::new(&config)).unwrap();
        assert_eq!(summary.files, 0);
        assert!(!config.sprite_image().exists());
        assert!(!config.sprite_partial().exists());
    }

    #[test]
    fn test_sheet_and_partial() {
        let dir = TempDir::new().unwrap();
        let config = PipelineConfig::with_root(dir.path());
        write_icon(&config, "home.png", 32, 32, [255, 0, 0, 255]);
        write_icon(&config, "mail.png", 16, 24, [0, 255, 0, 255]);
        write_icon(&config, "user.png", 20, 20, [0, 0, 255, 255]);
        fs::write(config.sprite_icons().join("notes.txt"), "skip").unwrap();

        let summary = generate(&TaskContext::new(&config)).unwrap();
        assert_eq!(summary.files, 2);

        let sheet = image::open(config.sprite_image()).unwrap().to_rgba8();
        let partial = fs::read_to_string(config.sprite_partial()).unwrap();

        for name in ["home", "mail", "user"] {
            assert!(partial.contains(&format!("${name}: (")), "missing {name}");
        }
        assert!(partial.contains(&format!("$spritesheet-width: {}px;", sheet.width())));
        assert!(partial.contains("'../img/sprite.png'"));

        // Top-left pixel belongs to the largest icon, placed first.
        assert_eq!(sheet.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_placements_respect_padding() {
        let sizes = [(32, 32), (16, 24), (20, 20)];
        let layout = pack(&sizes, 15);
        for (i, a) in layout.placements.iter().enumerate() {
            for b in &layout.placements[i + 1..] {
                let gap_x = b.x.saturating_sub(a.right()).max(a.x.saturating_sub(b.right()));
                let gap_y = b.y.saturating_sub(a.bottom()).max(a.y.saturating_sub(b.bottom()));
                assert!(gap_x >= 15 || gap_y >= 15, "{a:?} {b:?}");
            }
        }
    }

    #[test]
    fn test_corrupt_icon_is_image_error() {
        let dir = TempDir::new().unwrap();
        let config = PipelineConfig::with_root(dir.path());
        fs::create_dir_all(config.sprite_icons()).unwrap();
        fs::write(config.sprite_icons().join("bad.png"), b"not a png").unwrap();

        let err = generate(&TaskContext::new(&config)).unwrap_err();
        assert!(matches!(err, TaskError::Image { .. }));
    }

    #[test]
    fn test_clashing_icon_names_fail() {
        let dir = TempDir::new().unwrap();
        let config = PipelineConfig::with_root(dir.path());
        write_icon(&config, "a b.png", 8, 8, [255, 0, 0, 255]);
        write_icon(&config, "a-b.png", 8, 8, [0, 255, 0, 255]);

        let err = generate(&TaskContext::new(&config)).unwrap_err();
        match &err {
            TaskError::DuplicateIcon { name, first, second } => {
                assert_eq!(name, "a-b");
                assert!(first.ends_with("a b.png"));
                assert!(second.ends_with("a-b.png"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("$a-b"));
        assert!(!config.sprite_image().exists());
        assert!(!config.sprite_partial().exists());
    }

    #[test]
    fn test_underscore_and_dash_clash() {
        let dir = TempDir::new().unwrap();
        let config = PipelineConfig::with_root(dir.path());
        write_icon(&config, "arrow-up.png", 8, 8, [255, 0, 0, 255]);
        write_icon(&config, "arrow_up.png", 8, 8, [0, 255, 0, 255]);

        let err = generate(&TaskContext::new(&config)).unwrap_err();
        assert!(matches!(err, TaskError::DuplicateIcon { .. }));
        let failure = err.into_failure(crate::core::TaskId::Sprite);
        assert_eq!(failure.title, "sprite");
        assert_eq!(failure.kind, crate::core::FailureKind::Compile);
    }
}
