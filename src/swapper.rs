use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use tauri::http;
use tracing::{debug, warn};

use crate::SWAP_SCHEME;

const SWAP_PATH_ENCODE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?');

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SwapMode {
    /// Matching requests are redirected to the local file.
    Normal,
    /// Matching requests are only logged.
    Log,
}

impl SwapMode {
    pub(crate) fn from_config(raw: &str) -> Self {
        match raw {
            "log" => Self::Log,
            _ => Self::Normal,
        }
    }
}

/// Per-window resource swapper. Indexes the swap directory by normalized
/// file name at creation time so freshly dropped-in files are picked up by
/// the next window.
pub(crate) struct ResourceSwapper {
    mode: SwapMode,
    index: HashMap<String, PathBuf>,
}

impl ResourceSwapper {
    pub(crate) fn new(mode: SwapMode, swap_dir: &Path) -> Self {
        let mut index = HashMap::new();
        collect_files(swap_dir, &mut index);
        debug!(
            "resource swapper indexed {} file(s) under {}",
            index.len(),
            swap_dir.display()
        );
        Self { mode, index }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// The injection installed into a web window; rewrites matching
    /// outgoing resource requests onto the swap scheme. None when there is
    /// nothing to swap.
    pub(crate) fn init_script(&self) -> Option<String> {
        if self.index.is_empty() {
            return None;
        }

        let mut swaps = serde_json::Map::new();
        for (name, path) in &self.index {
            swaps.insert(
                name.clone(),
                serde_json::Value::String(swap_url_for(path)),
            );
        }
        let map = serde_json::Value::Object(swaps).to_string();
        let log_only = matches!(self.mode, SwapMode::Log);

        Some(format!(
            r#"(() => {{
  if (window.__idkrSwapInstalled) return;
  window.__idkrSwapInstalled = true;
  const swaps = {map};
  const logOnly = {log_only};
  const rewrite = (raw) => {{
    try {{
      const url = new URL(raw, location.href);
      const name = url.pathname.split("/").pop().toLowerCase();
      const local = swaps[name];
      if (!local) return raw;
      if (logOnly) {{
        console.log("[idkr] swap match:", raw);
        return raw;
      }}
      return local;
    }} catch {{
      return raw;
    }}
  }};
  const nativeFetch = window.fetch.bind(window);
  window.fetch = (input, init) =>
    nativeFetch(typeof input === "string" ? rewrite(input) : input, init);
  const nativeOpen = XMLHttpRequest.prototype.open;
  XMLHttpRequest.prototype.open = function (method, url, ...rest) {{
    return nativeOpen.call(this, method, rewrite(String(url)), ...rest);
  }};
}})();"#
        ))
    }
}

fn collect_files(dir: &Path, index: &mut HashMap<String, PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(error) => {
            debug!("swap directory {} not readable: {error}", dir.display());
            return;
        }
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_files(&path, index);
        } else if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
            index.insert(name.to_ascii_lowercase(), path);
        }
    }
}

fn swap_url_for(path: &Path) -> String {
    let encoded = utf8_percent_encode(&path.to_string_lossy(), SWAP_PATH_ENCODE);
    format!("{SWAP_SCHEME}:{encoded}")
}

/// Resolves a swap-scheme request to a local path: strip the scheme prefix
/// and percent-decode the remainder. On Windows the webview rewrites custom
/// schemes onto an http origin, so that shape is accepted too.
pub(crate) fn resolve_swap_request(raw: &str) -> Option<PathBuf> {
    let rest = raw
        .strip_prefix("idkr-swap://")
        .or_else(|| raw.strip_prefix("idkr-swap:"))
        .or_else(|| raw.strip_prefix("http://idkr-swap.localhost/"))
        .or_else(|| raw.strip_prefix("https://idkr-swap.localhost/"))?;
    if rest.is_empty() {
        return None;
    }
    let decoded = percent_decode_str(rest).decode_utf8().ok()?;
    Some(PathBuf::from(decoded.as_ref()))
}

fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("js") => "text/javascript",
        Some("css") => "text/css",
        Some("html") => "text/html",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("mp3") => "audio/mpeg",
        Some("ogg") => "audio/ogg",
        Some("wav") => "audio/wav",
        Some("wasm") => "application/wasm",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

fn response(status: http::StatusCode, content_type: &str, body: Vec<u8>) -> http::Response<Vec<u8>> {
    match http::Response::builder()
        .status(status)
        .header(http::header::CONTENT_TYPE, content_type)
        .header(http::header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .body(body)
    {
        Ok(response) => response,
        Err(error) => {
            warn!("failed to build a swap response: {error}");
            http::Response::new(Vec::new())
        }
    }
}

/// `idkr-swap:` scheme handler, registered secure + CORS-enabled.
pub(crate) fn handle_swap_request(
    _ctx: tauri::UriSchemeContext<'_, tauri::Wry>,
    request: http::Request<Vec<u8>>,
) -> http::Response<Vec<u8>> {
    let uri = request.uri().to_string();
    let Some(path) = resolve_swap_request(&uri) else {
        warn!("unresolvable swap request: {uri}");
        return response(http::StatusCode::BAD_REQUEST, "text/plain", Vec::new());
    };

    match fs::read(&path) {
        Ok(bytes) => {
            debug!("serving swapped resource {}", path.display());
            response(http::StatusCode::OK, content_type_for(&path), bytes)
        }
        Err(error) => {
            warn!("swap target {} unreadable: {error}", path.display());
            response(http::StatusCode::NOT_FOUND, "text/plain", Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn index_normalizes_names_and_recurses() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(dir.path().join("textures")).expect("mkdir");
        fs::write(dir.path().join("Sound.MP3"), b"x").expect("write");
        fs::write(dir.path().join("textures/Wall.png"), b"x").expect("write");

        let swapper = ResourceSwapper::new(SwapMode::Normal, dir.path());
        assert!(!swapper.is_empty());
        assert!(swapper.index.contains_key("sound.mp3"));
        assert!(swapper.index.contains_key("wall.png"));
    }

    #[test]
    fn missing_swap_directory_yields_an_empty_index() {
        let dir = tempfile::tempdir().expect("tempdir");
        let swapper = ResourceSwapper::new(SwapMode::Normal, &dir.path().join("nope"));
        assert!(swapper.is_empty());
        assert!(swapper.init_script().is_none());
    }

    #[test]
    fn init_script_embeds_the_rewrite_map() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("skin.png"), b"x").expect("write");
        let swapper = ResourceSwapper::new(SwapMode::Normal, dir.path());
        let script = swapper.init_script().expect("script");
        assert!(script.contains("skin.png"));
        assert!(script.contains("idkr-swap:"));
        assert!(script.contains("const logOnly = false"));
    }

    #[test]
    fn log_mode_only_observes() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("skin.png"), b"x").expect("write");
        let swapper = ResourceSwapper::new(SwapMode::Log, dir.path());
        let script = swapper.init_script().expect("script");
        assert!(script.contains("const logOnly = true"));
    }

    #[test]
    fn swap_urls_round_trip_through_resolution() {
        let path = PathBuf::from("/tmp/idkr swap/maps/map one.png");
        let url = swap_url_for(&path);
        assert!(url.starts_with("idkr-swap:"));
        assert_eq!(resolve_swap_request(&url), Some(path));
    }

    #[test]
    fn windows_origin_shape_is_accepted() {
        assert_eq!(
            resolve_swap_request("http://idkr-swap.localhost/tmp/a.png"),
            Some(PathBuf::from("tmp/a.png"))
        );
    }

    #[test]
    fn empty_and_foreign_requests_resolve_to_nothing() {
        assert_eq!(resolve_swap_request("idkr-swap:"), None);
        assert_eq!(resolve_swap_request("https://krunker.io/a.png"), None);
    }

    #[test]
    fn content_types_follow_extensions() {
        assert_eq!(content_type_for(Path::new("a.js")), "text/javascript");
        assert_eq!(content_type_for(Path::new("a.JPG")), "image/jpeg");
        assert_eq!(
            content_type_for(Path::new("a.unknown")),
            "application/octet-stream"
        );
        assert_eq!(content_type_for(Path::new("noext")), "application/octet-stream");
    }

    #[test]
    fn swap_mode_parsing_defaults_to_normal() {
        assert_eq!(SwapMode::from_config("log"), SwapMode::Log);
        assert_eq!(SwapMode::from_config("normal"), SwapMode::Normal);
        assert_eq!(SwapMode::from_config("whatever"), SwapMode::Normal);
    }
}
