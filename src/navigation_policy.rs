use tauri::{
    webview::{NewWindowFeatures, NewWindowResponse},
    AppHandle,
};
use tauri_plugin_opener::OpenerExt;
use tracing::{debug, warn};
use url::Url;

use crate::{
    url_rules::{location_type, LocationType},
    window_factory,
};

/// How a same-window navigation attempt is routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NavigationDecision {
    /// Load in the same window.
    Allow,
    /// Hand off to the OS default handler, keep the current page.
    OpenExternal,
    /// Drop the request silently.
    Ignore,
}

pub(crate) fn decide_navigation(target: LocationType) -> NavigationDecision {
    match target {
        LocationType::Game | LocationType::Social => NavigationDecision::Allow,
        LocationType::External => NavigationDecision::OpenExternal,
        LocationType::Unknown => NavigationDecision::Ignore,
    }
}

/// How a new-window request is routed. `targets_self` is the sentinel frame
/// name meaning "open in the requesting window".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NewWindowDecision {
    OpenExternal,
    LoadInCurrent,
    SpawnWindow,
    Ignore,
}

pub(crate) fn decide_new_window(target: LocationType, targets_self: bool) -> NewWindowDecision {
    match target {
        LocationType::External => NewWindowDecision::OpenExternal,
        LocationType::Unknown => NewWindowDecision::Ignore,
        LocationType::Game | LocationType::Social => {
            if targets_self {
                NewWindowDecision::LoadInCurrent
            } else {
                NewWindowDecision::SpawnWindow
            }
        }
    }
}

pub(crate) fn open_external(app: &AppHandle, url: &str) {
    if let Err(error) = app.opener().open_url(url, None::<&str>) {
        warn!("failed to open {url} in the system browser: {error}");
    }
}

/// `on_navigation` hook for web windows; returning false cancels the load.
pub(crate) fn handle_navigation(app: &AppHandle, url: &Url) -> bool {
    match decide_navigation(location_type(url.as_str())) {
        NavigationDecision::Allow => true,
        NavigationDecision::OpenExternal => {
            open_external(app, url.as_str());
            false
        }
        NavigationDecision::Ignore => {
            debug!("dropping navigation to unclassifiable target: {url}");
            false
        }
    }
}

/// `on_new_window` hook for web windows. The injected anchor override folds
/// `target="_self"` opens into same-window navigation before they reach the
/// host runtime, so requests arriving here always target a new frame.
pub(crate) fn handle_new_window(
    app: &AppHandle,
    url: Url,
    features: NewWindowFeatures,
) -> NewWindowResponse {
    match decide_new_window(location_type(url.as_str()), false) {
        NewWindowDecision::OpenExternal => {
            open_external(app, url.as_str());
            NewWindowResponse::Deny
        }
        NewWindowDecision::Ignore => {
            debug!("dropping new-window request for unclassifiable target: {url}");
            NewWindowResponse::Deny
        }
        NewWindowDecision::LoadInCurrent | NewWindowDecision::SpawnWindow => {
            match window_factory::open_web_window(app, url.clone(), Some(features)) {
                Ok(window) => NewWindowResponse::Create { window },
                Err(error) => {
                    warn!("failed to create a window for {url}: {error}");
                    NewWindowResponse::Deny
                }
            }
        }
    }
}
