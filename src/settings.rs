use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use serde_json::Value as JsonValue;
use tauri::{AppHandle, Manager, Wry};
use tauri_plugin_store::{Store, StoreExt};
use tracing::warn;

use crate::{
    window_state::{window_state_key, PersistedWindowState, WindowKind},
    CONFIG_STORE_FILE,
};

pub(crate) const KEY_SWAP_PATH: &str = "resourceSwapperPath";
pub(crate) const KEY_USERSCRIPTS_PATH: &str = "userscriptsPath";
pub(crate) const KEY_SWAP_MODE: &str = "resourceSwapperMode";
pub(crate) const KEY_AUTO_UPDATE: &str = "autoUpdate";
pub(crate) const KEY_DISCORD_RPC: &str = "discordRPC";

/// Process-wide configuration service. Constructed once at startup and
/// reached through managed state; every write goes straight through to disk
/// (last write wins, no transaction boundary).
pub(crate) struct Settings {
    store: Arc<Store<Wry>>,
    file_path: PathBuf,
}

impl Settings {
    pub(crate) fn load(app: &AppHandle) -> Result<Self, String> {
        let store = app
            .store(CONFIG_STORE_FILE)
            .map_err(|error| format!("Failed to open the configuration store: {error}"))?;
        let file_path = app
            .path()
            .app_data_dir()
            .map_err(|error| format!("Failed to resolve the app data directory: {error}"))?
            .join(CONFIG_STORE_FILE);
        Ok(Self { store, file_path })
    }

    fn string_or(&self, key: &str, default: &str) -> String {
        match self.store.get(key) {
            Some(JsonValue::String(value)) => value,
            _ => default.to_string(),
        }
    }

    fn bool_or(&self, key: &str, default: bool) -> bool {
        match self.store.get(key) {
            Some(JsonValue::Bool(value)) => value,
            _ => default,
        }
    }

    fn write(&self, key: &str, value: impl Into<JsonValue>) {
        self.store.set(key, value.into());
        if let Err(error) = self.store.save() {
            warn!("failed to persist configuration: {error}");
        }
    }

    pub(crate) fn swap_path(&self) -> String {
        self.string_or(KEY_SWAP_PATH, "")
    }

    pub(crate) fn userscripts_path(&self) -> String {
        self.string_or(KEY_USERSCRIPTS_PATH, "")
    }

    pub(crate) fn swap_mode(&self) -> String {
        self.string_or(KEY_SWAP_MODE, "normal")
    }

    pub(crate) fn auto_update(&self) -> String {
        self.string_or(KEY_AUTO_UPDATE, "download")
    }

    /// Checked live on every rich-presence call.
    pub(crate) fn discord_rpc_enabled(&self) -> bool {
        self.bool_or(KEY_DISCORD_RPC, true)
    }

    pub(crate) fn window_state(&self, kind: WindowKind) -> PersistedWindowState {
        PersistedWindowState {
            maximized: self.bool_or(&window_state_key(kind, "maximized"), false),
            full_screen: self.bool_or(&window_state_key(kind, "fullScreen"), false),
        }
    }

    pub(crate) fn set_window_maximized(&self, kind: WindowKind, maximized: bool) {
        self.write(&window_state_key(kind, "maximized"), maximized);
    }

    pub(crate) fn set_window_full_screen(&self, kind: WindowKind, full_screen: bool) {
        self.write(&window_state_key(kind, "fullScreen"), full_screen);
    }

    pub(crate) fn reset(&self) {
        self.store.clear();
        if let Err(error) = self.store.save() {
            warn!("failed to persist configuration reset: {error}");
        }
    }

    pub(crate) fn file_path(&self) -> &Path {
        &self.file_path
    }
}
