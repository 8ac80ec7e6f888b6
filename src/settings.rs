//! Player preferences
//!
//! Persisted separately from the best score in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::persistence::KeyValueStore;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Effect volume (0.0 - 1.0)
    pub volume: f32,
    pub muted: bool,
    /// Draw the avatar sprite when it has loaded (procedural bird otherwise)
    pub sprites: bool,
    /// Let the autopilot fly the avatar during play
    pub demo_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            volume: 0.5,
            muted: false,
            sprites: true,
            demo_mode: false,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "flappy_settings";

    /// Volume actually applied to playback
    pub fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    /// Flip mute; returns the new state
    pub fn toggle_muted(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Nudge the volume by `delta`, staying within 0.0 - 1.0
    pub fn adjust_volume(&mut self, delta: f32) {
        // Round to the step so repeated presses land on exact tenths
        self.volume = ((self.volume + delta).clamp(0.0, 1.0) * 100.0).round() / 100.0;
    }

    pub fn toggle_demo_mode(&mut self) -> bool {
        self.demo_mode = !self.demo_mode;
        self.demo_mode
    }

    pub fn toggle_sprites(&mut self) -> bool {
        self.sprites = !self.sprites;
        self.sprites
    }

    /// Clamp values that may have been hand-edited in storage
    pub fn sanitized(mut self) -> Self {
        self.volume = if self.volume.is_finite() {
            self.volume.clamp(0.0, 1.0)
        } else {
            Self::default().volume
        };
        self
    }

    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Some(json) => match serde_json::from_str::<Settings>(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    settings.sanitized()
                }
                Err(e) => {
                    log::warn!("Discarding unreadable settings: {}", e);
                    Self::default()
                }
            },
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut impl KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => {
                store.set(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
            Err(e) => log::warn!("Failed to serialize settings: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_mute_silences() {
        let mut settings = Settings::default();
        assert_eq!(settings.effective_volume(), 0.5);
        settings.muted = true;
        assert_eq!(settings.effective_volume(), 0.0);
    }

    #[test]
    fn test_volume_steps_clamp() {
        let mut settings = Settings::default();
        settings.adjust_volume(0.1);
        assert_eq!(settings.volume, 0.6);
        for _ in 0..10 {
            settings.adjust_volume(0.1);
        }
        assert_eq!(settings.volume, 1.0);
        for _ in 0..20 {
            settings.adjust_volume(-0.1);
        }
        assert_eq!(settings.volume, 0.0);
    }

    #[test]
    fn test_toggles_are_persisted() {
        let mut store = MemoryStore::new();
        let mut settings = Settings::load(&store);

        assert!(settings.toggle_muted());
        assert!(settings.toggle_demo_mode());
        assert!(!settings.toggle_sprites());
        settings.save(&mut store);

        let reloaded = Settings::load(&store);
        assert!(reloaded.muted);
        assert!(reloaded.demo_mode);
        assert!(!reloaded.sprites);
        assert_eq!(reloaded.effective_volume(), 0.0);

        let mut reloaded = reloaded;
        assert!(!reloaded.toggle_muted());
        assert_eq!(reloaded.effective_volume(), 0.5);
    }

    #[test]
    fn test_load_clamps_and_fills_missing() {
        let mut store = MemoryStore::new();
        store.set(Settings::STORAGE_KEY, r#"{ "volume": 3.0 }"#);
        let settings = Settings::load(&store);
        assert_eq!(settings.volume, 1.0);
        assert!(settings.sprites);
    }

    #[test]
    fn test_garbage_falls_back_to_defaults() {
        let mut store = MemoryStore::new();
        store.set(Settings::STORAGE_KEY, "{");
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            volume: 0.25,
            muted: true,
            sprites: false,
            demo_mode: true,
        };
        settings.save(&mut store);
        assert_eq!(Settings::load(&store), settings);
    }
}
