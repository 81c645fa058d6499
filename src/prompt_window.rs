use std::{collections::HashMap, sync::Mutex};

use serde_json::json;
use tauri::{webview::PageLoadEvent, AppHandle, Emitter, Manager, WebviewUrl, WebviewWindowBuilder};
use tokio::sync::oneshot;
use tracing::warn;

use crate::{
    window_factory::{self, PROMPT_LABEL_PREFIX},
    window_state::WindowKind,
    PROMPT_DATA_EVENT, PROMPT_PAGE, PROMPT_WINDOW_HEIGHT, PROMPT_WINDOW_WIDTH,
};

/// Pending prompt answers keyed by window label. A prompt window that
/// closes without answering resolves to None.
#[derive(Default)]
pub(crate) struct PromptRegistry {
    pending: Mutex<HashMap<String, oneshot::Sender<Option<String>>>>,
}

/// Opens a modal-style prompt window and resolves with the entered value
/// once the window closes.
pub(crate) async fn open_prompt(
    app: &AppHandle,
    message: String,
    default_value: Option<String>,
) -> Result<Option<String>, String> {
    let label = window_factory::next_window_label(PROMPT_LABEL_PREFIX);
    let (sender, receiver) = oneshot::channel();
    app.state::<PromptRegistry>()
        .pending
        .lock()
        .map_err(|_| "Prompt registry lock poisoned.".to_string())?
        .insert(label.clone(), sender);

    let data_app = app.clone();
    let data_label = label.clone();
    let payload = json!({ "message": message, "defaultValue": default_value });
    let window = WebviewWindowBuilder::new(app, &label, WebviewUrl::App(PROMPT_PAGE.into()))
        .title("idkr")
        .inner_size(PROMPT_WINDOW_WIDTH, PROMPT_WINDOW_HEIGHT)
        .center()
        .resizable(false)
        .decorations(false)
        .transparent(true)
        .visible(false)
        .on_page_load(move |_webview, page| {
            if matches!(page.event(), PageLoadEvent::Finished) {
                if let Err(error) = data_app.emit_to(&data_label, PROMPT_DATA_EVENT, &payload) {
                    warn!("failed to deliver prompt data to {data_label}: {error}");
                }
                window_factory::reveal_window(&data_app, &data_label, WindowKind::Prompt);
            }
        })
        .build()
        .map_err(|error| format!("Failed to create the prompt window: {error}"))?;
    window_factory::attach_lifecycle(app, &window, WindowKind::Prompt);

    // Resolved by prompt_return or by the window's destruction.
    Ok(receiver.await.unwrap_or(None))
}

/// Resolves a pending prompt for `label`, if any. Safe to call for every
/// destroyed window; non-prompt labels have no pending entry.
pub(crate) fn resolve_if_pending(app: &AppHandle, label: &str, value: Option<String>) {
    let Some(registry) = app.try_state::<PromptRegistry>() else {
        return;
    };
    let Ok(mut pending) = registry.pending.lock() else {
        return;
    };
    if let Some(sender) = pending.remove(label) {
        let _ = sender.send(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unanswered_prompts_resolve_to_none_when_the_sender_drops() {
        let registry = PromptRegistry::default();
        let (sender, receiver) = oneshot::channel::<Option<String>>();
        registry
            .pending
            .lock()
            .unwrap()
            .insert("prompt-1".to_string(), sender);

        // Simulates the Destroyed cleanup path.
        let taken = registry.pending.lock().unwrap().remove("prompt-1");
        drop(taken);
        assert_eq!(receiver.await.unwrap_or(None), None);
    }

    #[tokio::test]
    async fn answered_prompts_deliver_the_value() {
        let (sender, receiver) = oneshot::channel::<Option<String>>();
        sender.send(Some("hello".to_string())).unwrap();
        assert_eq!(receiver.await.unwrap_or(None), Some("hello".to_string()));
    }
}
