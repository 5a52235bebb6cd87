//! Configuration section definitions.
//!
//! Each module corresponds to a section in `kiln.toml`:
//!
//! | Module   | TOML Section | Purpose                                |
//! |----------|--------------|----------------------------------------|
//! | `paths`  | `[paths]`    | Source and build roots                 |
//! | `style`  | `[style]`    | Entry stylesheet, output, browser list |
//! | `sprite` | `[sprite]`   | Icon directory, sheet and partial      |
//! | `serve`  | `[serve]`    | Development server                     |

mod paths;
mod serve;
mod sprite;
mod style;

pub use paths::PathsConfig;
pub use serve::ServeConfig;
pub use sprite::SpriteConfig;
pub use style::StyleConfig;
