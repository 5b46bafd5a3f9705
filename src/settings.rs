//! Player preferences
//!
//! Persisted separately from the leaderboard in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_PLAYER_NAME_LEN;
use crate::platform;

/// `KeyboardEvent.code` values that jump
pub const JUMP_KEYS: [&str; 2] = ["Space", "ArrowUp"];

/// True if this key code should trigger a jump
pub fn is_jump_key(code: &str) -> bool {
    JUMP_KEYS.contains(&code)
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name pre-filled in the share-score form
    pub player_name: String,
    /// Show FPS counter
    pub show_fps: bool,
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "crabby_bird_settings";

    /// Remember the last name used to share a score (trimmed, capped)
    pub fn remember_player_name(&mut self, name: &str) {
        self.player_name = name.trim().chars().take(MAX_PLAYER_NAME_LEN).collect();
    }

    /// Load settings from LocalStorage (defaults natively or when missing)
    pub fn load() -> Self {
        match platform::load_json::<Settings>(Self::STORAGE_KEY) {
            Some(settings) => {
                log::info!("Loaded settings from LocalStorage");
                settings
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to LocalStorage
    pub fn save(&self) {
        platform::save_json(Self::STORAGE_KEY, self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jump_keys() {
        assert!(is_jump_key("Space"));
        assert!(is_jump_key("ArrowUp"));
        assert!(!is_jump_key("KeyW"));
        assert!(!is_jump_key("KeyI"));
    }

    #[test]
    fn test_remember_player_name_trims_and_caps() {
        let mut settings = Settings::default();
        settings.remember_player_name("  Sam  ");
        assert_eq!(settings.player_name, "Sam");

        settings.remember_player_name("abcdefghijklmnopqrstuvwxyz");
        assert_eq!(settings.player_name.chars().count(), MAX_PLAYER_NAME_LEN);
    }

    #[test]
    fn test_missing_fields_default() {
        let settings: Settings = serde_json::from_str(r#"{ "show_fps": true }"#).unwrap();
        assert!(settings.show_fps);
        assert!(settings.player_name.is_empty());

        // Stale fields from older saves are ignored
        let settings: Settings =
            serde_json::from_str(r#"{ "player_name": "Sam", "extra_jump_keys": ["KeyW"] }"#)
                .unwrap();
        assert_eq!(settings.player_name, "Sam");
    }
}
