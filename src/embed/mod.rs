//! Embedded static resources.
//!
//! - `serve` - dev server assets (hotreload.js)

mod template;

pub use template::{Template, TemplateVars};

pub mod serve {
    use super::{Template, TemplateVars};

    /// URL the dev server answers with the live reload client.
    pub const HOTRELOAD_URL: &str = "/__kiln/hotreload.js";

    /// Variables for hotreload.js.
    pub struct HotreloadVars {
        pub ws_port: u16,
    }

    impl TemplateVars for HotreloadVars {
        fn apply(&self, content: &str) -> String {
            content.replace("__KILN_WS_PORT__", &self.ws_port.to_string())
        }
    }

    /// Live reload client, served from memory.
    pub const HOTRELOAD_JS: Template<HotreloadVars> =
        Template::new(include_str!("serve/hotreload.js"));

    /// `<script>` tag injected into served HTML.
    pub fn hotreload_tag() -> String {
        format!(r#"<script src="{HOTRELOAD_URL}" defer></script>"#)
    }
}

#[cfg(test)]
mod tests {
    use super::serve::*;

    #[test]
    fn test_hotreload_port_substituted() {
        let js = HOTRELOAD_JS.render(&HotreloadVars { ws_port: 35730 });
        assert!(js.contains("35730"));
        assert!(!js.contains("__KILN_WS_PORT__"));
    }

    #[test]
    fn test_hotreload_tag() {
        assert_eq!(
            hotreload_tag(),
            r#"<script src="/__kiln/hotreload.js" defer></script>"#
        );
    }
}
