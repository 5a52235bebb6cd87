//! `[sprite]` section configuration.
//!
//! ```toml
//! [sprite]
//! icons = "img/icons"                 # *.png inputs, relative to paths.source
//! image = "img/sprite.png"            # generated sheet, relative to paths.source
//! partial = "scss/_sprite.scss"       # generated partial, relative to paths.source
//! image_ref = "../img/sprite.png"     # sheet path as referenced from compiled CSS
//! padding = 15                        # pixels between icons
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteConfig {
    pub icons: PathBuf,
    pub image: PathBuf,
    pub partial: PathBuf,
    pub image_ref: String,
    pub padding: u32,
}

impl Default for SpriteConfig {
    fn default() -> Self {
        Self {
            icons: "img/icons".into(),
            image: "img/sprite.png".into(),
            partial: "scss/_sprite.scss".into(),
            image_ref: "../img/sprite.png".into(),
            padding: 15,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_sprite_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.sprite.padding, 15);
        assert_eq!(config.sprite.image_ref, "../img/sprite.png");
    }

    #[test]
    fn test_sprite_padding_override() {
        let config = test_parse_config("[sprite]\npadding = 2");
        assert_eq!(config.sprite.padding, 2);
    }
}
