use std::path::PathBuf;

use clap::Parser;
use tauri::{AppHandle, Manager, RunEvent};
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    cli_args::{CliArgs, UpdateMode},
    path_rules,
    presence_bridge::PresenceBridge,
    prompt_window::PromptRegistry,
    settings::Settings,
    shortcuts, swapper, update_flow,
    unload_guard::UnloadGuard,
    url_rules::{location_type, LocationType},
    window_factory, ShellContext, SWAP_SCHEME,
};

pub(crate) fn run() {
    let args = CliArgs::parse();
    crate::logging::init(args.debug);
    info!("idkr {} starting", env!("CARGO_PKG_VERSION"));

    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app, argv, _cwd| {
            debug!("second instance argv: {argv:?}");
            let forwarded = CliArgs::from_forwarded(&argv);
            if let Some(raw) = forwarded.new_window {
                open_requested_window(app, &raw);
            }
        }))
        .plugin(tauri_plugin_store::Builder::new().build())
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_clipboard_manager::init())
        .plugin(tauri_plugin_updater::Builder::new().build())
        .plugin(
            tauri_plugin_global_shortcut::Builder::new()
                .with_handler(shortcuts::handle_shortcut_event)
                .build(),
        )
        .register_uri_scheme_protocol(SWAP_SCHEME, swapper::handle_swap_request)
        .manage(UnloadGuard::default())
        .manage(PresenceBridge::new())
        .manage(PromptRegistry::default())
        .invoke_handler(tauri::generate_handler![
            crate::ipc_commands::get_app_info,
            crate::ipc_commands::get_path,
            crate::ipc_commands::prompt,
            crate::ipc_commands::prompt_return,
            crate::ipc_commands::set_bounds,
            crate::ipc_commands::rpc_activity,
            crate::ipc_commands::set_unload_guard,
        ])
        .setup(move |app| {
            let app_handle = app.handle().clone();
            let settings = Settings::load(&app_handle)?;

            let documents = app_handle.path().document_dir().ok();
            let swap_dir = resolve_content_dir(&settings.swap_path(), documents.clone(), "idkr/swap");
            let userscripts_dir =
                resolve_content_dir(&settings.userscripts_path(), documents, "idkr/scripts");
            // Unusable content directories are a silent fallback, never a
            // user-facing error.
            if let Err(error) =
                path_rules::ensure_dirs([swap_dir.as_path(), userscripts_dir.as_path()])
            {
                warn!("content directories unavailable: {error}");
            }

            let update_mode = args
                .update
                .unwrap_or_else(|| UpdateMode::from_config(&settings.auto_update()));
            app.manage(ShellContext {
                settings,
                debug: args.debug,
                update_mode,
                swap_dir,
                userscripts_dir,
            });

            app.state::<PresenceBridge>().start();
            shortcuts::register_all(&app_handle);
            update_flow::spawn_splash_flow(app_handle.clone(), update_mode);

            if let Some(raw) = args.new_window.as_deref() {
                open_requested_window(&app_handle, raw);
            }
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|app_handle, event| {
            if let RunEvent::Exit = event {
                app_handle.state::<PresenceBridge>().end();
            }
        });
}

/// A configured directory that fails validation silently falls back to the
/// documents-relative default.
fn resolve_content_dir(configured: &str, documents: Option<PathBuf>, suffix: &str) -> PathBuf {
    if path_rules::is_valid_path(configured) {
        return PathBuf::from(configured.trim());
    }
    documents
        .unwrap_or_else(|| PathBuf::from("."))
        .join(suffix)
}

/// Opens the window requested by `--new-window`, both at first launch and
/// when forwarded from a second instance. Only unclassifiable input is
/// dropped; explicit external URLs are permitted at this boundary.
pub(crate) fn open_requested_window(app: &AppHandle, raw: &str) {
    if location_type(raw) == LocationType::Unknown {
        debug!("ignoring unclassifiable --new-window target: {raw}");
        return;
    }
    let parsed = Url::parse(raw).or_else(|_| Url::parse(&format!("https://{raw}")));
    match parsed {
        Ok(url) => {
            if let Err(error) = window_factory::open_web_window(app, url, None) {
                warn!("failed to open requested window for {raw}: {error}");
            }
        }
        Err(error) => warn!("requested window URL did not parse: {error}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_directories_win_when_valid() {
        let dir = tempfile::tempdir().expect("tempdir");
        let configured = dir.path().to_str().expect("utf8 path");
        let resolved = resolve_content_dir(configured, Some(PathBuf::from("/docs")), "idkr/swap");
        assert_eq!(resolved, dir.path());
    }

    #[test]
    fn invalid_directories_fall_back_to_documents() {
        let resolved = resolve_content_dir("", Some(PathBuf::from("/docs")), "idkr/swap");
        assert_eq!(resolved, PathBuf::from("/docs/idkr/swap"));
    }
}
