//! Session configuration: JSON file with per-field defaults, overridable from the CLI.

use crate::levels::LEVELS;
use crate::palette::{Palette, PaletteError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Largest grid side, in pixels.
pub const MAX_GRID_SIDE: u32 = 4096;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error(transparent)]
    Palette(#[from] PaletteError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Board width in tiles.
    pub width_tiles: u16,
    /// Board height in tiles.
    pub height_tiles: u16,
    /// Grid pixels per shape cell.
    pub tile_size: u16,
    pub seed: u64,
    /// Ticks between sand automaton steps.
    pub sand_interval: u32,
    pub start_level: usize,
    /// Five `#rrggbb` sand colours; the desert palette when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub palette: Option<Vec<String>>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width_tiles: 10,
            height_tiles: 17,
            tile_size: 8,
            seed: 0,
            sand_interval: 2,
            start_level: 0,
            palette: None,
        }
    }
}

impl GameConfig {
    /// Read `path` as JSON, or use defaults when no path is given. The result is validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let json = std::fs::read_to_string(path)?;
                log::info!("loaded config from {}", path.display());
                serde_json::from_str(&json)?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width_tiles == 0 || self.height_tiles == 0 || self.tile_size == 0 {
            return Err(ConfigError::Invalid("board dimensions must be non-zero".into()));
        }
        let (w, h) = (self.grid_width_px(), self.grid_height_px());
        if w > MAX_GRID_SIDE || h > MAX_GRID_SIDE {
            return Err(ConfigError::Invalid(format!(
                "grid {w}x{h} exceeds {MAX_GRID_SIDE} pixels per side"
            )));
        }
        if self.sand_interval == 0 {
            return Err(ConfigError::Invalid("sand_interval must be at least 1".into()));
        }
        if self.start_level >= LEVELS.len() {
            return Err(ConfigError::Invalid(format!(
                "start_level {} out of range (0..{})",
                self.start_level,
                LEVELS.len()
            )));
        }
        self.palette()?;
        Ok(())
    }

    pub fn grid_width_px(&self) -> u32 {
        u32::from(self.width_tiles) * u32::from(self.tile_size)
    }

    pub fn grid_height_px(&self) -> u32 {
        u32::from(self.height_tiles) * u32::from(self.tile_size)
    }

    pub fn palette(&self) -> Result<Palette, PaletteError> {
        match &self.palette {
            Some(hex) => Palette::from_hex(hex.as_slice()),
            None => Ok(Palette::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GameConfig::load(None).unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!((config.grid_width_px(), config.grid_height_px()), (80, 136));
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{"seed": 99, "tile_size": 4}"#).unwrap();
        assert_eq!(config.seed, 99);
        assert_eq!(config.tile_size, 4);
        assert_eq!(config.width_tiles, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("desert-sand-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"width_tiles": 6, "start_level": 2}"#).unwrap();
        let config = GameConfig::load(Some(&path));
        let _ = std::fs::remove_file(&path);
        let config = config.unwrap();
        assert_eq!(config.width_tiles, 6);
        assert_eq!(config.start_level, 2);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = GameConfig::load(Some(Path::new("/nonexistent/desert-sand.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_rejects_bad_values() {
        let zero = GameConfig { tile_size: 0, ..Default::default() };
        assert!(matches!(zero.validate(), Err(ConfigError::Invalid(_))));

        let huge = GameConfig { width_tiles: 1000, tile_size: 8, ..Default::default() };
        assert!(matches!(huge.validate(), Err(ConfigError::Invalid(_))));

        let interval = GameConfig { sand_interval: 0, ..Default::default() };
        assert!(interval.validate().is_err());

        let level = GameConfig { start_level: LEVELS.len(), ..Default::default() };
        assert!(level.validate().is_err());
    }

    #[test]
    fn test_palette_errors_surface() {
        let config = GameConfig {
            palette: Some(vec!["#ffffff".into()]),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Palette(_))));

        let bad = serde_json::from_str::<GameConfig>(r#"{"seed": "x"}"#);
        assert!(bad.is_err());
    }
}
