use tauri::{AppHandle, Manager};
use tauri_plugin_clipboard_manager::ClipboardExt;
use tauri_plugin_global_shortcut::{
    Code, GlobalShortcutExt, Modifiers, Shortcut, ShortcutEvent, ShortcutState,
};
use tauri_plugin_opener::OpenerExt;
use tracing::{debug, warn};

use crate::{app_types::ShellContext, window_factory, window_state::WindowKind, GAME_URL};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ShortcutAction {
    ToggleDevtools,
    HistoryBack,
    HistoryForward,
    ClearCacheAndRelaunch,
    ReleasePointerLock,
    ResetConfigAndRelaunch,
    OpenConfigEditor,
    Reload,
    ForceReload,
    ToggleFullScreen,
    CopyUrl,
    NewGameWindow,
    CloneWindow,
    Relaunch,
    ReturnToGame,
}

/// Whether an action applies to the focused window's kind. The first block
/// works in every shell window; the second only in web windows; returning
/// to the game needs a game window.
pub(crate) fn action_allowed(action: ShortcutAction, kind: WindowKind) -> bool {
    use ShortcutAction::*;
    match action {
        ToggleDevtools | HistoryBack | HistoryForward | ClearCacheAndRelaunch
        | ReleasePointerLock | ResetConfigAndRelaunch | OpenConfigEditor => true,
        Reload | ForceReload | ToggleFullScreen | CopyUrl | NewGameWindow | CloneWindow
        | Relaunch => kind.is_web(),
        ReturnToGame => kind == WindowKind::Game,
    }
}

/// The fixed shortcut table. Modifier choices follow the host platform.
pub(crate) fn shortcut_bindings() -> Vec<(Shortcut, ShortcutAction)> {
    let primary = if cfg!(target_os = "macos") {
        Modifiers::META
    } else {
        Modifiers::CONTROL
    };
    let devtools = if cfg!(target_os = "macos") {
        Shortcut::new(Some(Modifiers::META | Modifiers::ALT), Code::KeyI)
    } else {
        Shortcut::new(Some(Modifiers::CONTROL | Modifiers::SHIFT), Code::KeyI)
    };
    let history = if cfg!(target_os = "macos") {
        Modifiers::META
    } else {
        Modifiers::ALT
    };

    vec![
        (devtools, ShortcutAction::ToggleDevtools),
        (
            Shortcut::new(Some(history), Code::ArrowLeft),
            ShortcutAction::HistoryBack,
        ),
        (
            Shortcut::new(Some(history), Code::ArrowRight),
            ShortcutAction::HistoryForward,
        ),
        (
            Shortcut::new(Some(primary | Modifiers::SHIFT), Code::Delete),
            ShortcutAction::ClearCacheAndRelaunch,
        ),
        (
            Shortcut::new(None, Code::Escape),
            ShortcutAction::ReleasePointerLock,
        ),
        (
            Shortcut::new(Some(Modifiers::CONTROL), Code::F1),
            ShortcutAction::ResetConfigAndRelaunch,
        ),
        (
            Shortcut::new(Some(Modifiers::SHIFT), Code::F1),
            ShortcutAction::OpenConfigEditor,
        ),
        (Shortcut::new(None, Code::F5), ShortcutAction::Reload),
        (
            Shortcut::new(Some(Modifiers::SHIFT), Code::F5),
            ShortcutAction::ForceReload,
        ),
        (
            Shortcut::new(None, Code::F11),
            ShortcutAction::ToggleFullScreen,
        ),
        (
            Shortcut::new(Some(primary), Code::KeyL),
            ShortcutAction::CopyUrl,
        ),
        (
            Shortcut::new(Some(primary), Code::KeyN),
            ShortcutAction::NewGameWindow,
        ),
        (
            Shortcut::new(Some(primary | Modifiers::SHIFT), Code::KeyN),
            ShortcutAction::CloneWindow,
        ),
        (
            Shortcut::new(Some(primary | Modifiers::ALT), Code::KeyR),
            ShortcutAction::Relaunch,
        ),
        (Shortcut::new(None, Code::F6), ShortcutAction::ReturnToGame),
    ]
}

pub(crate) fn register_all(app: &AppHandle) {
    for (shortcut, action) in shortcut_bindings() {
        if let Err(error) = app.global_shortcut().register(shortcut) {
            warn!("failed to register shortcut for {action:?}: {error}");
        }
    }
}

/// Global-shortcut plugin handler: dispatches to the focused shell window,
/// no-op when none of our windows has focus.
pub(crate) fn handle_shortcut_event(app: &AppHandle, fired: &Shortcut, event: ShortcutEvent) {
    if event.state() != ShortcutState::Pressed {
        return;
    }
    let Some(action) = shortcut_bindings()
        .into_iter()
        .find_map(|(shortcut, action)| (shortcut == *fired).then_some(action))
    else {
        return;
    };

    let Some(window) = app
        .webview_windows()
        .into_values()
        .find(|window| window.is_focused().unwrap_or(false))
    else {
        return;
    };
    let kind = window_factory::window_kind_of(&window);
    if !action_allowed(action, kind) {
        debug!("shortcut {action:?} ignored for {kind:?} window");
        return;
    }

    run_action(app, &window, action);
}

fn run_action(app: &AppHandle, window: &tauri::WebviewWindow, action: ShortcutAction) {
    match action {
        ShortcutAction::ToggleDevtools => {
            if window.is_devtools_open() {
                window.close_devtools();
            } else {
                window.open_devtools();
            }
        }
        ShortcutAction::HistoryBack => eval(window, "history.back()"),
        ShortcutAction::HistoryForward => eval(window, "history.forward()"),
        ShortcutAction::ClearCacheAndRelaunch => {
            if let Err(error) = window.clear_all_browsing_data() {
                warn!("failed to clear browsing data: {error}");
            }
            app.request_restart();
        }
        ShortcutAction::ReleasePointerLock => eval(window, "document.exitPointerLock()"),
        ShortcutAction::ResetConfigAndRelaunch => {
            app.state::<ShellContext>().settings.reset();
            app.request_restart();
        }
        ShortcutAction::OpenConfigEditor => {
            let path = app
                .state::<ShellContext>()
                .settings
                .file_path()
                .display()
                .to_string();
            if let Err(error) = app.opener().open_path(path, None::<&str>) {
                warn!("failed to open the configuration file: {error}");
            }
        }
        ShortcutAction::Reload => eval(window, "location.reload()"),
        ShortcutAction::ForceReload => eval(window, "location.reload(true)"),
        ShortcutAction::ToggleFullScreen => {
            let full_screen = window.is_fullscreen().unwrap_or(false);
            if let Err(error) = window.set_fullscreen(!full_screen) {
                warn!("failed to toggle fullscreen: {error}");
            }
        }
        ShortcutAction::CopyUrl => match window.url() {
            Ok(url) => {
                if let Err(error) = app.clipboard().write_text(url.to_string()) {
                    warn!("failed to copy the window URL: {error}");
                }
            }
            Err(error) => warn!("failed to read the window URL: {error}"),
        },
        ShortcutAction::NewGameWindow => spawn_window(app, GAME_URL),
        ShortcutAction::CloneWindow => match window.url() {
            Ok(url) => spawn_window(app, url.as_str()),
            Err(error) => warn!("failed to read the window URL: {error}"),
        },
        ShortcutAction::Relaunch => app.request_restart(),
        ShortcutAction::ReturnToGame => {
            eval(window, &format!("location.href = \"{GAME_URL}\""));
        }
    }
}

fn spawn_window(app: &AppHandle, raw: &str) {
    match raw.parse() {
        Ok(url) => {
            if let Err(error) = window_factory::open_web_window(app, url, None) {
                warn!("failed to open a window for {raw}: {error}");
            }
        }
        Err(error) => warn!("refusing to open malformed URL {raw}: {error}"),
    }
}

fn eval(window: &tauri::WebviewWindow, js: &str) {
    if let Err(error) = window.eval(js) {
        warn!("failed to run shortcut script: {error}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_actions_work_in_every_window_kind() {
        for kind in [
            WindowKind::Game,
            WindowKind::Social,
            WindowKind::Prompt,
            WindowKind::Splash,
            WindowKind::Unknown,
        ] {
            assert!(action_allowed(ShortcutAction::ToggleDevtools, kind));
            assert!(action_allowed(ShortcutAction::ResetConfigAndRelaunch, kind));
        }
    }

    #[test]
    fn web_actions_are_gated_to_web_windows() {
        assert!(action_allowed(ShortcutAction::Reload, WindowKind::Game));
        assert!(action_allowed(ShortcutAction::CopyUrl, WindowKind::Social));
        assert!(!action_allowed(ShortcutAction::Reload, WindowKind::Splash));
        assert!(!action_allowed(
            ShortcutAction::ToggleFullScreen,
            WindowKind::Prompt
        ));
    }

    #[test]
    fn returning_to_the_game_needs_a_game_window() {
        assert!(action_allowed(ShortcutAction::ReturnToGame, WindowKind::Game));
        assert!(!action_allowed(
            ShortcutAction::ReturnToGame,
            WindowKind::Social
        ));
        assert!(!action_allowed(
            ShortcutAction::ReturnToGame,
            WindowKind::Unknown
        ));
    }

    #[test]
    fn every_action_appears_exactly_once_in_the_table() {
        let bindings = shortcut_bindings();
        let mut seen = Vec::new();
        for (_, action) in &bindings {
            assert!(!seen.contains(action), "{action:?} bound twice");
            seen.push(*action);
        }
        assert_eq!(bindings.len(), 15);
    }
}
