//! Engine settings
//!
//! Persisted as JSON next to the best score (config dir natively,
//! LocalStorage on web). Missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Round and placement configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Countdown length of one round
    pub round_secs: u32,
    /// Smallest target diameter
    pub size_min: f32,
    /// Largest target diameter
    pub size_max: f32,
    /// Edge margin hosts pass to `Bounds::with_margin`
    ///
    /// The session never reads it; placement uses the margin carried by the
    /// bounds it is given.
    pub margin: f32,
    /// Share of the playfield height available to targets
    pub play_area_fraction: f32,
    /// Fixed RNG seed (random per process when unset)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            round_secs: DEFAULT_ROUND_SECS,
            size_min: DEFAULT_SIZE_MIN,
            size_max: DEFAULT_SIZE_MAX,
            margin: DEFAULT_MARGIN,
            play_area_fraction: DEFAULT_PLAY_AREA_FRACTION,
            seed: None,
        }
    }
}

impl Settings {
    /// Clamp values the engine can't work with
    ///
    /// Rounds last at least one second, sizes are positive with
    /// `size_min <= size_max`, and the play area fraction is in (0, 1].
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();

        if self.round_secs == 0 {
            self.round_secs = 1;
        }

        if !self.size_min.is_finite() || self.size_min <= 0.0 {
            self.size_min = defaults.size_min;
        }
        if !self.size_max.is_finite() || self.size_max <= 0.0 {
            self.size_max = defaults.size_max;
        }
        if self.size_min > self.size_max {
            std::mem::swap(&mut self.size_min, &mut self.size_max);
        }

        if !self.margin.is_finite() || self.margin < 0.0 {
            self.margin = defaults.margin;
        }

        if !self.play_area_fraction.is_finite() || self.play_area_fraction <= 0.0 {
            self.play_area_fraction = defaults.play_area_fraction;
        }
        self.play_area_fraction = self.play_area_fraction.min(1.0);

        self
    }

    /// Parse settings from JSON, validating the result
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<Self>(json).map(Self::validated)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "tap_rush_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = Self::from_json(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Default settings file under the user's config dir
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        directories::ProjectDirs::from("", "", "tap-rush")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from the config dir, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                log::info!("No config dir, using default settings");
                Self::default()
            }
        }
    }

    /// Load settings from a JSON file, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed settings in {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON, creating parent dirs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_consts() {
        let s = Settings::default();
        assert_eq!(s.round_secs, 30);
        assert_eq!(s.size_min, 50.0);
        assert_eq!(s.size_max, 120.0);
        assert_eq!(s.play_area_fraction, 0.6);
        assert_eq!(s.clone().validated(), s);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let s = Settings::from_json(r#"{ "round_secs": 10 }"#).unwrap();
        assert_eq!(s.round_secs, 10);
        assert_eq!(s.size_max, DEFAULT_SIZE_MAX);
        assert_eq!(s.seed, None);
    }

    #[test]
    fn test_validated_fixes_nonsense() {
        let s = Settings {
            round_secs: 0,
            size_min: 200.0,
            size_max: 80.0,
            margin: -3.0,
            play_area_fraction: 4.0,
            seed: Some(1),
        }
        .validated();
        assert_eq!(s.round_secs, 1);
        assert_eq!(s.size_min, 80.0);
        assert_eq!(s.size_max, 200.0);
        assert_eq!(s.margin, DEFAULT_MARGIN);
        assert_eq!(s.play_area_fraction, 1.0);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let s = Settings {
            round_secs: 45,
            seed: Some(99),
            ..Settings::default()
        };
        s.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path), s);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_load_missing_or_malformed_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert_eq!(Settings::load_from(&missing), Settings::default());

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, b"{ not json").unwrap();
        assert_eq!(Settings::load_from(&bad), Settings::default());
    }
}
