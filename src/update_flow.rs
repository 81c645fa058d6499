use std::time::Duration;

use serde_json::json;
use tauri::{AppHandle, Emitter, Manager};
use tauri_plugin_updater::UpdaterExt;
use tracing::{info, warn};

use crate::{
    cli_args::UpdateMode,
    window_factory::{self, SPLASH_LABEL},
    GAME_URL, SPLASH_LINGER_MS, UPDATE_MESSAGE_EVENT,
};

/// Relays a status line to the splash window. Failures are irrelevant once
/// the splash window is gone.
fn send_splash_message(app: &AppHandle, text: Option<&str>, detail: Option<&str>) {
    let payload = json!({ "text": text, "detail": detail });
    let _ = app.emit_to(SPLASH_LABEL, UPDATE_MESSAGE_EVENT, &payload);
}

/// Splash-first startup: show the splash window, run the update check per
/// mode, then launch the game window regardless of the outcome and retire
/// the splash after a fixed linger. The update wait is not cancellable; if
/// the splash window goes away early the pending check is simply abandoned.
pub(crate) fn spawn_splash_flow(app: AppHandle, mode: UpdateMode) {
    tauri::async_runtime::spawn(async move {
        if let Err(error) = window_factory::open_splash_window(&app) {
            warn!("splash window unavailable: {error}");
        }

        if let Err(message) = run_update_check(&app, mode).await {
            warn!("update check failed: {message}");
            send_splash_message(&app, Some(&format!("Error: {message}")), None);
        }

        launch_game(&app);

        tokio::time::sleep(Duration::from_millis(SPLASH_LINGER_MS)).await;
        if let Some(splash) = app.get_webview_window(SPLASH_LABEL) {
            if let Err(error) = splash.destroy() {
                warn!("failed to retire the splash window: {error}");
            }
        }
    });
}

async fn run_update_check(app: &AppHandle, mode: UpdateMode) -> Result<(), String> {
    if mode == UpdateMode::Skip {
        return Ok(());
    }

    send_splash_message(app, Some("Initializing the auto updater..."), None);
    let updater = app
        .updater()
        .map_err(|error| format!("Failed to initialize the updater: {error}"))?;

    send_splash_message(app, Some("Checking for update"), None);
    match updater.check().await {
        Ok(Some(update)) => {
            let version = update.version.to_string();
            info!("update {version} available");
            send_splash_message(app, Some(&format!("Update v{version} available")), None);
            if mode != UpdateMode::Download {
                return Ok(());
            }

            let mut received: usize = 0;
            let bytes = update
                .download(
                    |chunk, total| {
                        received += chunk;
                        if let Some(total) = total {
                            let percent = (received as f64 / total as f64 * 100.0).floor();
                            send_splash_message(app, Some(&format!("Downloaded {percent}%")), None);
                        }
                    },
                    || {},
                )
                .await
                .map_err(|error| format!("Failed to download the update: {error}"))?;

            send_splash_message(app, None, Some(&format!("Installing v{version}...")));
            update
                .install(&bytes)
                .map_err(|error| format!("Failed to install the update: {error}"))?;
            info!("update {version} installed, restarting");
            app.request_restart();
            Ok(())
        }
        Ok(None) => {
            info!("no update available");
            send_splash_message(app, Some("No update available"), None);
            Ok(())
        }
        Err(error) => Err(format!("Failed to check for updates: {error}")),
    }
}

fn launch_game(app: &AppHandle) {
    match GAME_URL.parse() {
        Ok(url) => {
            if let Err(error) = window_factory::open_web_window(app, url, None) {
                warn!("failed to open the game window: {error}");
            }
        }
        Err(error) => warn!("game URL did not parse: {error}"),
    }
}
