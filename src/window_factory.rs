use std::sync::atomic::{AtomicUsize, Ordering};

use tauri::{
    webview::{NewWindowFeatures, PageLoadEvent},
    AppHandle, Manager, WebviewUrl, WebviewWindow, WebviewWindowBuilder, WindowEvent,
};
use tracing::{debug, warn};
use url::Url;

use crate::{
    app_types::ShellContext,
    navigation_policy,
    presence_bridge::PresenceBridge,
    swapper::{ResourceSwapper, SwapMode},
    unload_guard::{self, UnloadGuard},
    userscripts,
    window_state::WindowKind,
    SPLASH_PAGE, SPLASH_WINDOW_HEIGHT, SPLASH_WINDOW_WIDTH, WEB_WINDOW_HEIGHT, WEB_WINDOW_WIDTH,
};

pub(crate) const SPLASH_LABEL: &str = "splash";
pub(crate) const WEB_LABEL_PREFIX: &str = "web";
pub(crate) const PROMPT_LABEL_PREFIX: &str = "prompt";

static WINDOW_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub(crate) fn next_window_label(prefix: &str) -> String {
    let id = WINDOW_COUNTER.fetch_add(1, Ordering::SeqCst) + 1;
    format!("{prefix}-{id}")
}

/// The shell kind of an existing window: splash and prompt windows are
/// tagged by label, web windows classify by their current URL.
pub(crate) fn window_kind_of(window: &WebviewWindow) -> WindowKind {
    let label = window.label();
    if label == SPLASH_LABEL {
        return WindowKind::Splash;
    }
    if label.starts_with(PROMPT_LABEL_PREFIX) {
        return WindowKind::Prompt;
    }
    match window.url() {
        Ok(url) => WindowKind::from_url(url.as_str()),
        Err(_) => WindowKind::Unknown,
    }
}

const NAV_HOOK_SCRIPT: &str = r#"(() => {
  if (window.__idkrNavHooks) return;
  window.__idkrNavHooks = true;
  const nativeOpen = window.open.bind(window);
  window.open = (url, target, features) => {
    if (target === "_self" && url) {
      location.href = url;
      return null;
    }
    return nativeOpen(url, target, features);
  };
  document.addEventListener("click", (event) => {
    const anchor =
      event.target && event.target.closest
        ? event.target.closest('a[target="_self"]')
        : null;
    if (anchor && anchor.href) {
      event.preventDefault();
      location.href = anchor.href;
    }
  }, true);
})();"#;

/// The injection every web window gets before page scripts run: the
/// `_self` fold for the navigation policy, the unload-guard watcher, and
/// the resource-swap rewrite map.
fn bootstrap_script(swapper: &ResourceSwapper) -> String {
    let mut script = String::from(NAV_HOOK_SCRIPT);
    script.push('\n');
    script.push_str(unload_guard::watcher_script());
    if let Some(swap) = swapper.init_script() {
        script.push('\n');
        script.push_str(&swap);
    }
    script
}

/// Applies the persisted window state for `kind` and reveals the window.
/// Idempotent across repeat page loads: an already visible window is left
/// alone.
pub(crate) fn reveal_window(app: &AppHandle, label: &str, kind: WindowKind) {
    let Some(window) = app.get_webview_window(label) else {
        return;
    };
    if window.is_visible().unwrap_or(false) {
        return;
    }

    let ctx = app.state::<ShellContext>();
    let state = ctx.settings.window_state(kind);
    if state.maximized {
        if let Err(error) = window.maximize() {
            warn!("failed to restore maximized state for {label}: {error}");
        }
    }
    if state.full_screen {
        if let Err(error) = window.set_fullscreen(true) {
            warn!("failed to restore fullscreen state for {label}: {error}");
        }
    }
    if let Err(error) = window.show() {
        warn!("failed to reveal window {label}: {error}");
    }
    if ctx.debug {
        window.open_devtools();
    }
}

/// Subscribes the lifecycle listeners owned by the factory: window-state
/// write-through, unload-guard close interception, and destroy cleanup.
pub(crate) fn attach_lifecycle(app: &AppHandle, window: &WebviewWindow, kind: WindowKind) {
    let app_handle = app.clone();
    let label = window.label().to_string();
    window.on_window_event(move |event| match event {
        WindowEvent::Resized(_) => {
            let Some(window) = app_handle.get_webview_window(&label) else {
                return;
            };
            let ctx = app_handle.state::<ShellContext>();
            let maximized = window.is_maximized().unwrap_or(false);
            let full_screen = window.is_fullscreen().unwrap_or(false);
            let stored = ctx.settings.window_state(kind);
            if stored.maximized != maximized {
                ctx.settings.set_window_maximized(kind, maximized);
            }
            if stored.full_screen != full_screen {
                ctx.settings.set_window_full_screen(kind, full_screen);
            }
        }
        WindowEvent::CloseRequested { api, .. } => {
            let guard = app_handle.state::<UnloadGuard>();
            if guard.is_armed(&label) {
                api.prevent_close();
                let confirm_app = app_handle.clone();
                let confirm_label = label.clone();
                std::thread::spawn(move || {
                    if unload_guard::confirm_leave(&confirm_app) {
                        if let Some(window) = confirm_app.get_webview_window(&confirm_label) {
                            if let Err(error) = window.destroy() {
                                warn!("failed to close {confirm_label}: {error}");
                            }
                        }
                    }
                });
            }
        }
        WindowEvent::Destroyed => {
            debug!("window destroyed: {label}");
            app_handle.state::<PresenceBridge>().window_destroyed(&label);
            app_handle.state::<UnloadGuard>().forget(&label);
            crate::prompt_window::resolve_if_pending(&app_handle, &label, None);
        }
        _ => {}
    });
}

/// Creates a web window hosting `url`. When the host runtime already
/// produced the content for a new-window request its features are attached
/// instead of starting from scratch. The window is created hidden and
/// revealed on first page load with its persisted state applied.
pub(crate) fn open_web_window(
    app: &AppHandle,
    url: Url,
    features: Option<NewWindowFeatures>,
) -> Result<WebviewWindow, String> {
    let label = next_window_label(WEB_LABEL_PREFIX);
    let kind = WindowKind::from_url(url.as_str());
    debug!("opening {kind:?} window {label} for {url}");

    let ctx = app.state::<ShellContext>();
    let swapper = ResourceSwapper::new(
        SwapMode::from_config(&ctx.settings.swap_mode()),
        &ctx.swap_dir,
    );
    let scripts_dir = ctx.userscripts_dir.clone();

    let nav_app = app.clone();
    let spawn_app = app.clone();
    let load_app = app.clone();
    let load_label = label.clone();

    let mut builder = WebviewWindowBuilder::new(app, &label, WebviewUrl::External(url))
        .title("idkr")
        .inner_size(WEB_WINDOW_WIDTH, WEB_WINDOW_HEIGHT)
        .visible(false)
        .initialization_script(&bootstrap_script(&swapper))
        .on_navigation(move |url| navigation_policy::handle_navigation(&nav_app, url))
        .on_new_window(move |url, features| {
            navigation_policy::handle_new_window(&spawn_app, url, features)
        })
        .on_page_load(move |webview, payload| match payload.event() {
            PageLoadEvent::Started => reveal_window(&load_app, &load_label, kind),
            PageLoadEvent::Finished => {
                for script in userscripts::load_userscripts(&scripts_dir) {
                    if let Err(error) = webview.eval(&script) {
                        warn!("failed to inject a userscript: {error}");
                    }
                }
            }
        });
    if let Some(features) = features {
        builder = builder.window_features(features);
    }

    let window = builder
        .build()
        .map_err(|error| format!("Failed to create window {label}: {error}"))?;
    attach_lifecycle(app, &window, kind);
    Ok(window)
}

/// The frameless splash window shown while the update check runs.
pub(crate) fn open_splash_window(app: &AppHandle) -> Result<WebviewWindow, String> {
    let load_app = app.clone();
    let window = WebviewWindowBuilder::new(
        app,
        SPLASH_LABEL,
        WebviewUrl::App(SPLASH_PAGE.into()),
    )
    .title("idkr")
    .inner_size(SPLASH_WINDOW_WIDTH, SPLASH_WINDOW_HEIGHT)
    .center()
    .resizable(false)
    .decorations(false)
    .transparent(true)
    .visible(false)
    .on_page_load(move |_webview, payload| {
        if matches!(payload.event(), PageLoadEvent::Finished) {
            reveal_window(&load_app, SPLASH_LABEL, WindowKind::Splash);
        }
    })
    .build()
    .map_err(|error| format!("Failed to create the splash window: {error}"))?;
    attach_lifecycle(app, &window, WindowKind::Splash);
    Ok(window)
}
