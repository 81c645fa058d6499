use std::{collections::HashSet, sync::Mutex};

use tauri::AppHandle;
use tauri_plugin_dialog::{DialogExt, MessageDialogButtons, MessageDialogKind};

/// Tracks which windows currently have an in-page `beforeunload` handler
/// installed (armed by the injected watcher). Closing an armed window takes
/// a confirmation; escape/default keeps the window.
#[derive(Debug, Default)]
pub(crate) struct UnloadGuard {
    armed: Mutex<HashSet<String>>,
}

impl UnloadGuard {
    pub(crate) fn set_armed(&self, label: &str, armed: bool) {
        let Ok(mut guard) = self.armed.lock() else {
            return;
        };
        if armed {
            guard.insert(label.to_string());
        } else {
            guard.remove(label);
        }
    }

    pub(crate) fn is_armed(&self, label: &str) -> bool {
        self.armed
            .lock()
            .map(|guard| guard.contains(label))
            .unwrap_or(false)
    }

    pub(crate) fn forget(&self, label: &str) {
        if let Ok(mut guard) = self.armed.lock() {
            guard.remove(label);
        }
    }
}

/// Blocking Leave/Cancel confirmation; false (the default and escape
/// result) keeps the window open.
pub(crate) fn confirm_leave(app: &AppHandle) -> bool {
    app.dialog()
        .message("Changes you made may not be saved.")
        .title("Leave site?")
        .kind(MessageDialogKind::Warning)
        .buttons(MessageDialogButtons::OkCancelCustom(
            "Leave".to_string(),
            "Cancel".to_string(),
        ))
        .blocking_show()
}

/// The in-page watcher arming the guard whenever the page installs an
/// `onbeforeunload` handler.
pub(crate) fn watcher_script() -> &'static str {
    r#"(() => {
  if (window.__idkrUnloadWatcher) return;
  window.__idkrUnloadWatcher = true;
  let lastArmed = null;
  setInterval(() => {
    const armed = typeof window.onbeforeunload === "function";
    if (armed !== lastArmed) {
      lastArmed = armed;
      window.__TAURI__.core.invoke("set_unload_guard", { armed }).catch(() => {});
    }
  }, 1000);
})();"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arming_is_per_window() {
        let guard = UnloadGuard::default();
        guard.set_armed("web-1", true);
        assert!(guard.is_armed("web-1"));
        assert!(!guard.is_armed("web-2"));

        guard.set_armed("web-1", false);
        assert!(!guard.is_armed("web-1"));
    }

    #[test]
    fn destroyed_windows_are_forgotten() {
        let guard = UnloadGuard::default();
        guard.set_armed("web-1", true);
        guard.forget("web-1");
        assert!(!guard.is_armed("web-1"));
    }
}
