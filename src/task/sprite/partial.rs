//! SCSS partial describing a packed sprite sheet.
//!
//! Variable names, list layout and mixins follow the conventional
//! spritesmith SCSS template, so stylesheets written against it keep working.

use std::fmt::Write;

use super::pack::Placement;

/// One icon on the sheet.
#[derive(Debug, Clone)]
pub struct SpriteEntry {
    pub name: String,
    pub placement: Placement,
}

/// Everything the partial needs to know about a sheet.
#[derive(Debug, Clone)]
pub struct SpriteSheet<'a> {
    pub entries: &'a [SpriteEntry],
    pub width: u32,
    pub height: u32,
    /// Sheet URL as seen from the compiled stylesheet.
    pub image: &'a str,
}

/// Turn a file stem into a Sass identifier.
///
/// A name that would start like a number gets a leading `_`.
pub fn sanitize_name(stem: &str) -> String {
    let name: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();

    let digits = name.trim_start_matches('-');
    let numeric =
        name.len() - digits.len() <= 1 && digits.starts_with(|c: char| c.is_ascii_digit());
    if name.is_empty() || numeric {
        format!("_{name}")
    } else {
        name
    }
}

/// Key under which Sass sees a variable name: `-` and `_` are the same.
pub fn sass_key(name: &str) -> String {
    name.replace('_', "-")
}

fn px(value: i64) -> String {
    format!("{value}px")
}

/// Render the partial.
pub fn render(sheet: &SpriteSheet<'_>) -> String {
    let mut out = String::new();
    out.push_str(HEADER);

    for entry in sheet.entries {
        write_entry(&mut out, entry, sheet);
    }

    let image = sheet.image;
    let w = px(sheet.width.into());
    let h = px(sheet.height.into());
    let sprites: String = sheet
        .entries
        .iter()
        .map(|e| format!("${}, ", e.name))
        .collect();

    let _ = writeln!(out, "$spritesheet-width: {w};");
    let _ = writeln!(out, "$spritesheet-height: {h};");
    let _ = writeln!(out, "$spritesheet-image: '{image}';");
    let _ = writeln!(out, "$spritesheet-sprites: ({sprites});");
    let _ = writeln!(
        out,
        "$spritesheet: ({w}, {h}, '{image}', $spritesheet-sprites, );"
    );

    out.push_str(MIXINS);
    out
}

fn write_entry(out: &mut String, entry: &SpriteEntry, sheet: &SpriteSheet<'_>) {
    let name = &entry.name;
    let p = entry.placement;
    let x = px(p.x.into());
    let y = px(p.y.into());
    let ox = px(-i64::from(p.x));
    let oy = px(-i64::from(p.y));
    let w = px(p.width.into());
    let h = px(p.height.into());
    let tw = px(sheet.width.into());
    let th = px(sheet.height.into());
    let image = sheet.image;

    let _ = writeln!(out, "${name}-name: '{name}';");
    let _ = writeln!(out, "${name}-x: {x};");
    let _ = writeln!(out, "${name}-y: {y};");
    let _ = writeln!(out, "${name}-offset-x: {ox};");
    let _ = writeln!(out, "${name}-offset-y: {oy};");
    let _ = writeln!(out, "${name}-width: {w};");
    let _ = writeln!(out, "${name}-height: {h};");
    let _ = writeln!(out, "${name}-total-width: {tw};");
    let _ = writeln!(out, "${name}-total-height: {th};");
    let _ = writeln!(out, "${name}-image: '{image}';");
    let _ = writeln!(
        out,
        "${name}: ({x}, {y}, {ox}, {oy}, {w}, {h}, {tw}, {th}, '{image}', '{name}', );"
    );
}

const HEADER: &str = "\
// SCSS variables are information about icon's compiled state, stored under its original file name
//
// .icon-home {
//   width: $icon-home-width;
// }
//
// The large array-like variables contain all information about a single icon
// $icon-home: x y offset_x offset_y width height total_width total_height image_path;
//
// At the bottom of this section, we provide information about the spritesheet itself
// $spritesheet: width height image $spritesheet-sprites;
";

const MIXINS: &str = "
// The provided mixins are intended to be used with the array-like variables
//
// .icon-home {
//   @include sprite-width($icon-home);
// }
//
// .icon-email {
//   @include sprite($icon-email);
// }
@mixin sprite-width($sprite) {
  width: nth($sprite, 5);
}

@mixin sprite-height($sprite) {
  height: nth($sprite, 6);
}

@mixin sprite-position($sprite) {
  $sprite-offset-x: nth($sprite, 3);
  $sprite-offset-y: nth($sprite, 4);
  background-position: $sprite-offset-x  $sprite-offset-y;
}

@mixin sprite-image($sprite) {
  $sprite-image: nth($sprite, 9);
  background-image: url(#{$sprite-image});
}

@mixin sprite($sprite) {
  @include sprite-image($sprite);
  @include sprite-position($sprite);
  @include sprite-width($sprite);
  @include sprite-height($sprite);
}

// The `sprites` mixin generates identical output to the CSS template
//   but can be overridden inside of SCSS
//
// @include sprites($spritesheet-sprites);
@mixin sprites($sprites) {
  @each $sprite in $sprites {
    $sprite-name: nth($sprite, 10);
    .#{$sprite-name} {
      @include sprite($sprite);
    }
  }
}
";
