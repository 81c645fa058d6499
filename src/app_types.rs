use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{cli_args::UpdateMode, settings::Settings};

/// Process-wide shell context, managed once at startup. Holds the
/// configuration service and the resolved content directories so no
/// component has to re-derive them.
pub(crate) struct ShellContext {
    pub(crate) settings: Settings,
    pub(crate) debug: bool,
    pub(crate) update_mode: UpdateMode,
    pub(crate) swap_dir: PathBuf,
    pub(crate) userscripts_dir: PathBuf,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AppInfo {
    pub(crate) name: String,
    pub(crate) version: String,
    pub(crate) documents_dir: String,
}

/// Partial bounds as sent by the renderer; missing fields leave the current
/// value untouched.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct Bounds {
    pub(crate) x: Option<i32>,
    pub(crate) y: Option<i32>,
    pub(crate) width: Option<u32>,
    pub(crate) height: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_accepts_partial_payloads() {
        let bounds: Bounds = serde_json::from_str(r#"{"width": 1280, "height": 720}"#)
            .expect("partial bounds should deserialize");
        assert_eq!(bounds.width, Some(1280));
        assert_eq!(bounds.height, Some(720));
        assert_eq!(bounds.x, None);
        assert_eq!(bounds.y, None);
    }

    #[test]
    fn app_info_serializes_camel_case() {
        let info = AppInfo {
            name: "idkr".to_string(),
            version: "2.0.0".to_string(),
            documents_dir: "/home/user/Documents".to_string(),
        };
        let raw = serde_json::to_string(&info).expect("serialize");
        assert!(raw.contains("documentsDir"));
    }
}
