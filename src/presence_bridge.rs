use std::sync::{
    atomic::{AtomicU64, Ordering},
    Mutex,
};

use discord_rich_presence::{
    activity::{Activity, Assets, Timestamps},
    DiscordIpc, DiscordIpcClient,
};
use serde_json::Value as JsonValue;
use tauri::{AppHandle, Emitter, Manager};
use tracing::{debug, warn};

use crate::{app_types::ShellContext, DISCORD_CLIENT_ID, RPC_STOP_EVENT};

/// Ownership record for the single-flight rule: at most one window's
/// activity updates are forwarded at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PresenceOwner {
    pub(crate) label: String,
    pub(crate) generation: u64,
}

/// Updates the ownership record for a sender and returns the label of a
/// displaced previous owner, which must be notified before the new sender's
/// payload goes out.
pub(crate) fn adopt_sender(
    owner: &mut Option<PresenceOwner>,
    sender: &str,
    generation: u64,
) -> Option<String> {
    match owner {
        Some(current) if current.label == sender => None,
        _ => {
            let displaced = owner.take().map(|previous| previous.label);
            *owner = Some(PresenceOwner {
                label: sender.to_string(),
                generation,
            });
            displaced
        }
    }
}

pub(crate) struct PresenceBridge {
    client: Mutex<Option<DiscordIpcClient>>,
    owner: Mutex<Option<PresenceOwner>>,
    generation: AtomicU64,
}

impl PresenceBridge {
    pub(crate) fn new() -> Self {
        Self {
            client: Mutex::new(None),
            owner: Mutex::new(None),
            generation: AtomicU64::new(0),
        }
    }

    /// Connects to the local Discord client. Failure is logged and leaves
    /// the bridge disconnected; updates then become no-ops.
    pub(crate) fn start(&self) {
        let mut client = match DiscordIpcClient::new(DISCORD_CLIENT_ID) {
            Ok(client) => client,
            Err(error) => {
                warn!("failed to create the rich-presence client: {error}");
                return;
            }
        };
        match client.connect() {
            Ok(()) => {
                debug!("rich-presence client connected");
                if let Ok(mut guard) = self.client.lock() {
                    *guard = Some(client);
                }
            }
            Err(error) => warn!("failed to connect to the rich-presence service: {error}"),
        }
    }

    /// Reflects the configuration flag, read live on each call.
    pub(crate) fn rpc_enabled(&self, app: &AppHandle) -> bool {
        app.state::<ShellContext>().settings.discord_rpc_enabled()
    }

    /// Forwards an activity payload from `sender_label` under the
    /// single-flight rule. A different previous owner is sent a stop
    /// notification before the new payload goes out.
    pub(crate) fn forward(
        &self,
        app: &AppHandle,
        sender_label: &str,
        payload: &JsonValue,
    ) -> Result<(), String> {
        if !self.rpc_enabled(app) {
            return Ok(());
        }

        let displaced = {
            let mut owner = self
                .owner
                .lock()
                .map_err(|_| "Presence owner lock poisoned.".to_string())?;
            let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
            adopt_sender(&mut owner, sender_label, generation)
        };
        if let Some(previous) = displaced {
            debug!("presence owner displaced: {previous} -> {sender_label}");
            if let Err(error) = app.emit_to(&previous, RPC_STOP_EVENT, ()) {
                warn!("failed to notify displaced presence sender {previous}: {error}");
            }
        }

        self.set_activity(payload)
    }

    fn set_activity(&self, payload: &JsonValue) -> Result<(), String> {
        let mut guard = self
            .client
            .lock()
            .map_err(|_| "Presence client lock poisoned.".to_string())?;
        let Some(client) = guard.as_mut() else {
            // Not connected; the latest payload simply wins once we are.
            return Ok(());
        };

        let state = payload.get("state").and_then(JsonValue::as_str);
        let details = payload.get("details").and_then(JsonValue::as_str);
        let start = payload
            .get("startTimestamp")
            .and_then(JsonValue::as_i64)
            .unwrap_or_else(|| chrono::Utc::now().timestamp());
        let large_image = payload.get("largeImageKey").and_then(JsonValue::as_str);
        let large_text = payload.get("largeImageText").and_then(JsonValue::as_str);
        let small_image = payload.get("smallImageKey").and_then(JsonValue::as_str);
        let small_text = payload.get("smallImageText").and_then(JsonValue::as_str);

        let mut activity = Activity::new().timestamps(Timestamps::new().start(start));
        if let Some(state) = state {
            activity = activity.state(state);
        }
        if let Some(details) = details {
            activity = activity.details(details);
        }
        let mut assets = Assets::new();
        if let Some(key) = large_image {
            assets = assets.large_image(key);
        }
        if let Some(text) = large_text {
            assets = assets.large_text(text);
        }
        if let Some(key) = small_image {
            assets = assets.small_image(key);
        }
        if let Some(text) = small_text {
            assets = assets.small_text(text);
        }
        activity = activity.assets(assets);

        client
            .set_activity(activity)
            .map_err(|error| format!("Failed to update the rich-presence activity: {error}"))
    }

    /// Clears the ownership record when the owning window goes away; the
    /// next caller becomes owner without a displacement notice.
    pub(crate) fn window_destroyed(&self, label: &str) {
        let Ok(mut owner) = self.owner.lock() else {
            return;
        };
        if owner.as_ref().is_some_and(|current| current.label == label) {
            debug!("presence owner window destroyed: {label}");
            *owner = None;
        }
    }

    pub(crate) fn end(&self) {
        let Ok(mut guard) = self.client.lock() else {
            return;
        };
        if let Some(client) = guard.as_mut() {
            let _ = client.clear_activity();
            if let Err(error) = client.close() {
                warn!("failed to close the rich-presence connection: {error}");
            }
        }
        *guard = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sender_adopts_without_displacement() {
        let mut owner = None;
        assert_eq!(adopt_sender(&mut owner, "web-1", 1), None);
        assert_eq!(owner.as_ref().map(|o| o.label.as_str()), Some("web-1"));
    }

    #[test]
    fn repeated_sender_keeps_ownership_silently() {
        let mut owner = Some(PresenceOwner {
            label: "web-1".to_string(),
            generation: 1,
        });
        assert_eq!(adopt_sender(&mut owner, "web-1", 2), None);
        assert_eq!(owner.as_ref().map(|o| o.generation), Some(1));
    }

    #[test]
    fn new_sender_displaces_the_previous_owner() {
        let mut owner = Some(PresenceOwner {
            label: "web-1".to_string(),
            generation: 1,
        });
        let displaced = adopt_sender(&mut owner, "web-2", 2);
        assert_eq!(displaced.as_deref(), Some("web-1"));
        assert_eq!(owner.as_ref().map(|o| o.label.as_str()), Some("web-2"));
        assert_eq!(owner.as_ref().map(|o| o.generation), Some(2));
    }

    #[test]
    fn owner_cleared_by_destruction_readopts_without_notice() {
        let bridge = PresenceBridge::new();
        {
            let mut owner = bridge.owner.lock().unwrap();
            adopt_sender(&mut owner, "web-2", 1);
        }
        bridge.window_destroyed("web-2");
        let mut owner = bridge.owner.lock().unwrap();
        // A returning sender adopts freely: nobody is notified.
        assert_eq!(adopt_sender(&mut owner, "web-1", 2), None);
    }

    #[test]
    fn destruction_of_a_non_owner_window_changes_nothing() {
        let bridge = PresenceBridge::new();
        {
            let mut owner = bridge.owner.lock().unwrap();
            adopt_sender(&mut owner, "web-1", 1);
        }
        bridge.window_destroyed("web-9");
        let owner = bridge.owner.lock().unwrap();
        assert_eq!(owner.as_ref().map(|o| o.label.as_str()), Some("web-1"));
    }
}
