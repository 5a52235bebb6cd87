//! HTTP response handlers.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Request, Response, StatusCode};

use crate::embed::serve::{HOTRELOAD_JS, HotreloadVars, hotreload_tag};
use crate::utils::mime::{self, types};

/// Respond with a file from the build directory. HTML gets the live
/// reload script when a WebSocket port is known.
pub fn respond_file(request: Request, path: &Path, ws_port: Option<u16>) -> Result<()> {
    let content_type = mime::from_path(path);

    if is_head_request(&request) {
        return send_head(request, 200, content_type);
    }

    let body = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let body = match ws_port {
        Some(_) if content_type.starts_with("text/html") => inject_hotreload(&body),
        _ => body,
    };

    send_body(request, 200, content_type, body)
}

pub fn respond_not_found(request: Request) -> Result<()> {
    if is_head_request(&request) {
        return send_head(request, 404, types::PLAIN);
    }
    send_body(request, 404, types::PLAIN, b"404 Not Found".to_vec())
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    send_body(request, 503, types::PLAIN, b"503 Service Unavailable".to_vec())
}

/// Respond with hotreload.js from memory.
pub fn respond_hotreload_js(request: Request, ws_port: u16) -> Result<()> {
    let body = HOTRELOAD_JS.render(&HotreloadVars { ws_port });
    send_body(request, 200, types::JAVASCRIPT, body.into_bytes())
}

/// Insert the script tag before the last `</body>`, or append it.
pub fn inject_hotreload(content: &[u8]) -> Vec<u8> {
    const PATTERN: &[u8] = b"</body>";

    let tag = hotreload_tag();
    let tag = tag.as_bytes();
    let mut result = Vec::with_capacity(content.len() + tag.len());

    match content
        .windows(PATTERN.len())
        .rposition(|w| w.eq_ignore_ascii_case(PATTERN))
    {
        Some(pos) => {
            result.extend_from_slice(&content[..pos]);
            result.extend_from_slice(tag);
            result.extend_from_slice(&content[pos..]);
        }
        None => {
            result.extend_from_slice(content);
            result.extend_from_slice(tag);
        }
    }
    result
}

fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

fn send_head(request: Request, status: u16, content_type: &'static str) -> Result<()> {
    let response = Response::empty(StatusCode(status)).with_header(content_type_header(content_type));
    request.respond(response)?;
    Ok(())
}

fn send_body(request: Request, status: u16, content_type: &'static str, body: Vec<u8>) -> Result<()> {
    let response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(content_type_header(content_type))
        .with_header(no_cache_header());
    request.respond(response)?;
    Ok(())
}

fn content_type_header(value: &'static str) -> Header {
    make_header("Content-Type", value)
}

fn no_cache_header() -> Header {
    make_header("Cache-Control", "no-cache")
}

fn make_header(key: &'static str, value: &'static str) -> Header {
    Header::from_bytes(key, value).expect("static header is ascii")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inject_before_body_close() {
        let html = b"<html><body><p>hi</p></BODY></html>";
        let out = String::from_utf8(inject_hotreload(html)).unwrap();
        let script = out.find("<script").unwrap();
        assert!(script < out.find("</BODY>").unwrap());
        assert!(out.ends_with("</BODY></html>"));
    }

    #[test]
    fn test_inject_appends_without_body() {
        let out = String::from_utf8(inject_hotreload(b"<p>fragment</p>")).unwrap();
        assert!(out.starts_with("<p>fragment</p><script"));
    }

    #[test]
    fn test_inject_uses_last_body_close() {
        let html = b"<body><pre>&lt;/body&gt; </body></pre></body>";
        let out = String::from_utf8(inject_hotreload(html)).unwrap();
        assert!(out.ends_with("</script></body>"));
    }
}
