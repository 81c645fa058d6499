use serde::{Deserialize, Serialize};

use crate::url_rules::LocationType;

/// What kind of shell window a native window hosts. Web windows derive their
/// kind from the URL they load; splash and prompt windows are tagged
/// explicitly by the factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WindowKind {
    Game,
    Social,
    Prompt,
    Splash,
    Unknown,
}

impl WindowKind {
    pub(crate) fn from_url(raw: &str) -> Self {
        match crate::url_rules::location_type(raw) {
            LocationType::Game => Self::Game,
            LocationType::Social => Self::Social,
            LocationType::External | LocationType::Unknown => Self::Unknown,
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Game => "game",
            Self::Social => "social",
            Self::Prompt => "prompt",
            Self::Splash => "splash",
            Self::Unknown => "unknown",
        }
    }

    pub(crate) fn is_web(self) -> bool {
        matches!(self, Self::Game | Self::Social | Self::Unknown)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct PersistedWindowState {
    pub(crate) maximized: bool,
    pub(crate) full_screen: bool,
}

/// Store key for one persisted flag, namespaced by window kind:
/// `windowState.game.maximized` and friends.
pub(crate) fn window_state_key(kind: WindowKind, field: &str) -> String {
    format!("windowState.{}.{}", kind.as_str(), field)
}
