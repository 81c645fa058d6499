use tauri::{AppHandle, Manager, PhysicalPosition, PhysicalSize, WebviewWindow};

use crate::{
    app_types::{AppInfo, Bounds},
    presence_bridge::PresenceBridge,
    prompt_window,
    unload_guard::UnloadGuard,
};

#[tauri::command]
pub(crate) async fn get_app_info(app: AppHandle) -> Result<AppInfo, String> {
    let documents = app
        .path()
        .document_dir()
        .map_err(|error| format!("Failed to resolve the documents directory: {error}"))?;
    Ok(AppInfo {
        name: app.package_info().name.clone(),
        version: app.package_info().version.to_string(),
        documents_dir: documents.display().to_string(),
    })
}

#[tauri::command]
pub(crate) fn get_path(app: AppHandle, name: String) -> Result<String, String> {
    let resolver = app.path();
    let path = match name.as_str() {
        "home" => resolver.home_dir(),
        "appData" => resolver.config_dir(),
        "userData" => resolver.app_data_dir(),
        "cache" => resolver.cache_dir(),
        "temp" => resolver.temp_dir(),
        "desktop" => resolver.desktop_dir(),
        "documents" => resolver.document_dir(),
        "downloads" => resolver.download_dir(),
        "music" => resolver.audio_dir(),
        "pictures" => resolver.picture_dir(),
        "videos" => resolver.video_dir(),
        "logs" => resolver.app_log_dir(),
        other => return Err(format!("Unknown path name: {other}")),
    }
    .map_err(|error| format!("Failed to resolve path {name}: {error}"))?;
    Ok(path.display().to_string())
}

#[tauri::command]
pub(crate) async fn prompt(
    app: AppHandle,
    message: String,
    default_value: Option<String>,
) -> Result<Option<String>, String> {
    prompt_window::open_prompt(&app, message, default_value).await
}

#[tauri::command]
pub(crate) fn prompt_return(app: AppHandle, window: WebviewWindow, value: Option<String>) {
    prompt_window::resolve_if_pending(&app, window.label(), value);
    let _ = window.close();
}

#[tauri::command]
pub(crate) async fn set_bounds(window: WebviewWindow, bounds: Bounds) -> Result<(), String> {
    if bounds.width.is_some() || bounds.height.is_some() {
        let current = window
            .outer_size()
            .map_err(|error| format!("Failed to read the window size: {error}"))?;
        let size = PhysicalSize::new(
            bounds.width.unwrap_or(current.width),
            bounds.height.unwrap_or(current.height),
        );
        window
            .set_size(size)
            .map_err(|error| format!("Failed to resize the window: {error}"))?;
    }
    if bounds.x.is_some() || bounds.y.is_some() {
        let current = window
            .outer_position()
            .map_err(|error| format!("Failed to read the window position: {error}"))?;
        let position = PhysicalPosition::new(
            bounds.x.unwrap_or(current.x),
            bounds.y.unwrap_or(current.y),
        );
        window
            .set_position(position)
            .map_err(|error| format!("Failed to move the window: {error}"))?;
    }
    Ok(())
}

#[tauri::command]
pub(crate) async fn rpc_activity(
    app: AppHandle,
    window: WebviewWindow,
    activity: serde_json::Value,
) -> Result<(), String> {
    app.state::<PresenceBridge>()
        .forward(&app, window.label(), &activity)
}

#[tauri::command]
pub(crate) fn set_unload_guard(app: AppHandle, window: WebviewWindow, armed: bool) {
    app.state::<UnloadGuard>().set_armed(window.label(), armed);
}
