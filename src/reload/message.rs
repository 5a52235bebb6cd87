//! Live Reload Message Protocol
//!
//! JSON messages sent from the development server to browser clients.
//!
//! - `connected`: handshake finished
//! - `reload`: full page reload
//! - `css`: refresh stylesheets in place

use serde::{Deserialize, Serialize};

/// Live reload message sent over WebSocket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReloadMessage {
    /// Connection established
    Connected { version: String },

    /// Full page reload
    Reload {
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },

    /// Stylesheets changed; `paths` are build-relative URLs.
    Css { paths: Vec<String> },
}

impl ReloadMessage {
    pub fn connected() -> Self {
        Self::Connected {
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn reload(reason: impl Into<String>) -> Self {
        Self::Reload {
            reason: Some(reason.into()),
        }
    }

    pub fn css(paths: Vec<String>) -> Self {
        Self::Css { paths }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"type":"reload"}"#.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reload_json() {
        let json = ReloadMessage::reload("/index.html").to_json();
        assert_eq!(json, r#"{"type":"reload","reason":"/index.html"}"#);
    }

    #[test]
    fn test_reload_without_reason() {
        let json = ReloadMessage::Reload { reason: None }.to_json();
        assert_eq!(json, r#"{"type":"reload"}"#);
    }

    #[test]
    fn test_css_json() {
        let json = ReloadMessage::css(vec!["/css/style.min.css".into()]).to_json();
        assert_eq!(json, r#"{"type":"css","paths":["/css/style.min.css"]}"#);
    }

    #[test]
    fn test_connected_carries_version() {
        let parsed: ReloadMessage =
            serde_json::from_str(&ReloadMessage::connected().to_json()).unwrap();
        assert_eq!(parsed, ReloadMessage::connected());
    }
}
