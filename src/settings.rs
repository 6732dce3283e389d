//! Game settings and preferences
//!
//! Persisted separately from the leaderboard under its own key.

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_PLAYER_NAME;
use crate::persistence::{KeyValueStore, StorageError};
use crate::sim::Rules;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Collision resolution rules
    pub rules: Rules,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
    /// Show the leaderboard while playing
    pub show_high_scores: bool,

    /// Pause when the tab is hidden or the window loses focus
    pub auto_pause: bool,
    /// Name recorded when name entry is left blank or cancelled
    pub default_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rules: Rules::default(),
            show_fps: false,
            show_high_scores: true,
            auto_pause: true,
            default_name: DEFAULT_PLAYER_NAME.to_string(),
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "settings";

    /// Load settings; absent or malformed data yields the defaults
    pub fn load(store: &impl KeyValueStore) -> Self {
        let Some(json) = store.get(Self::STORAGE_KEY) else {
            log::info!("Using default settings");
            return Self::default();
        };

        match serde_json::from_str::<Settings>(&json) {
            Ok(mut settings) => {
                if settings.default_name.trim().is_empty() {
                    settings.default_name = DEFAULT_PLAYER_NAME.to_string();
                }
                log::info!("Loaded settings");
                settings
            }
            Err(e) => {
                log::warn!("Ignoring malformed settings: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<(), StorageError> {
        let json = serde_json::to_string(self)?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
