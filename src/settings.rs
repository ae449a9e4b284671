//! Player settings and preferences
//!
//! Persisted in LocalStorage on the web. Cosmetic choices survive run resets.

use serde::{Deserialize, Serialize};

/// Game mode, consumed by terrain generation and crash rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameMode {
    /// Full feature set; obstacle hits and botched flips end the run
    #[default]
    Adventure,
    /// Ramps only, nothing is fatal
    Zen,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Adventure => "adventure",
            GameMode::Zen => "zen",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "adventure" | "adv" => Some(GameMode::Adventure),
            "zen" => Some(GameMode::Zen),
            _ => None,
        }
    }

    /// Whether obstacles are generated and collisions with them are fatal
    pub fn has_obstacles(&self) -> bool {
        matches!(self, GameMode::Adventure)
    }

    /// Whether rails are generated
    pub fn has_rails(&self) -> bool {
        matches!(self, GameMode::Adventure)
    }
}

/// Rider colors passed through to render snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appearance {
    pub rider_color: String,
    pub scarf_color: String,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            rider_color: "#7dd3fc".to_string(),
            scarf_color: "#f43f5e".to_string(),
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub mode: GameMode,
    #[serde(flatten)]
    pub appearance: Appearance,
    /// Snow spray particles
    pub particles: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: GameMode::Adventure,
            appearance: Appearance::default(),
            particles: true,
        }
    }
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "powder_run_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Discarding unreadable settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved (mode {})", self.mode.as_str());
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_round_trip_names() {
        assert_eq!(GameMode::from_str("ZEN"), Some(GameMode::Zen));
        assert_eq!(GameMode::from_str("adv"), Some(GameMode::Adventure));
        assert_eq!(GameMode::from_str("slalom"), None);
        assert_eq!(GameMode::Zen.as_str(), "zen");
    }

    #[test]
    fn test_zen_has_no_hazards() {
        assert!(!GameMode::Zen.has_obstacles());
        assert!(!GameMode::Zen.has_rails());
        assert!(GameMode::Adventure.has_obstacles());
    }

    #[test]
    fn test_settings_json_is_flat() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(json["mode"], "Adventure");
        assert_eq!(json["rider_color"], "#7dd3fc");
    }
}
