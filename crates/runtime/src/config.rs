//! Runtime configuration structures and loaders.
//!
//! Configuration is layered: [`RuntimeConfig::default`], then an optional RON
//! file ([`RuntimeConfig::load`]), then environment overrides
//! ([`RuntimeConfig::with_env_overrides`]). `.env` files are honored.
use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use lumen_core::GameConfig;

use crate::api::{Result, RuntimeError};

/// Everything needed to start a runtime and its first level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub seed: u64,
    pub level: LevelConfig,
    pub player: PlayerConfig,
    pub message_capacity: usize,
    pub command_buffer_size: usize,
    pub event_buffer_size: usize,
    pub logging: LoggingConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            seed: GameConfig::DEFAULT_SEED,
            level: LevelConfig::default(),
            player: PlayerConfig::default(),
            message_capacity: GameConfig::DEFAULT_MESSAGE_CAPACITY,
            command_buffer_size: 32,
            event_buffer_size: 100,
            logging: LoggingConfig::default(),
        }
    }
}

/// Shape and population of the generated starting level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub width: u32,
    pub height: u32,
    /// Chance that any cell other than the origin is a wall.
    pub wall_density: f64,
    pub monsters: usize,
    pub items: usize,
    pub torches: usize,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            width: GameConfig::DEFAULT_DUNGEON_WIDTH,
            height: GameConfig::DEFAULT_DUNGEON_HEIGHT,
            wall_density: 0.02,
            monsters: 8,
            items: 8,
            torches: 4,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub vision_radius: u32,
    pub light_radius: u32,
    pub max_health: u32,
    pub attack_strength: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            vision_radius: GameConfig::PLAYER_VISION_RADIUS,
            light_radius: GameConfig::PLAYER_LIGHT_RADIUS,
            max_health: GameConfig::PLAYER_MAX_HEALTH,
            attack_strength: GameConfig::PLAYER_ATTACK_STRENGTH,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive; `RUST_LOG` wins when set.
    pub directive: String,
    /// Write to `lumen.log` instead of stderr.
    pub to_file: bool,
    /// Log directory. Falls back to the platform cache directory.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directive: "info".to_string(),
            to_file: false,
            directory: None,
        }
    }
}

impl RuntimeConfig {
    /// Reads a RON config file. Missing fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| RuntimeError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: RuntimeConfig =
            ron::from_str(&content).map_err(|source| RuntimeError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus process environment (and `.env`) overrides.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::default().with_env_overrides(|key| env::var(key).ok())
    }

    /// Applies overrides looked up through `lookup`.
    ///
    /// Environment variables:
    /// - `LUMEN_SEED` - Game seed
    /// - `LUMEN_WIDTH` / `LUMEN_HEIGHT` - Level size
    /// - `LUMEN_WALL_DENSITY` - Wall chance per cell, 0.0 to 1.0
    /// - `LUMEN_MONSTERS` - Number of extra monsters
    /// - `LUMEN_LOG` - Default log filter directive
    /// - `LUMEN_LOG_DIR` - Log to `lumen.log` in this directory
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(seed) = parse(lookup("LUMEN_SEED")) {
            self.seed = seed;
        }
        if let Some(width) = parse::<u32>(lookup("LUMEN_WIDTH")) {
            self.level.width = width.max(1);
        }
        if let Some(height) = parse::<u32>(lookup("LUMEN_HEIGHT")) {
            self.level.height = height.max(1);
        }
        if let Some(density) = parse::<f64>(lookup("LUMEN_WALL_DENSITY")) {
            self.level.wall_density = density.clamp(0.0, 1.0);
        }
        if let Some(monsters) = parse(lookup("LUMEN_MONSTERS")) {
            self.level.monsters = monsters;
        }
        if let Some(directive) = lookup("LUMEN_LOG") {
            self.logging.directive = directive;
        }
        if let Some(directory) = lookup("LUMEN_LOG_DIR") {
            self.logging.directory = Some(PathBuf::from(directory));
            self.logging.to_file = true;
        }
        self
    }

    /// Rejects settings the level builder or the game cannot honor.
    pub fn validate(&self) -> Result<()> {
        self.level.validate()?;
        self.player.validate()
    }

    /// Core settings derived from this configuration.
    pub fn game_config(&self) -> GameConfig {
        GameConfig::new()
            .with_seed(self.seed)
            .with_message_capacity(self.message_capacity)
            .with_player_vision_radius(self.player.vision_radius)
            .with_player_light_radius(self.player.light_radius)
            .with_player_health(self.player.max_health)
            .with_player_attack_strength(self.player.attack_strength)
    }
}

impl LevelConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RuntimeError::InvalidConfig(format!(
                "level must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }
        if !(0.0..=1.0).contains(&self.wall_density) {
            return Err(RuntimeError::InvalidConfig(format!(
                "wall density {} is outside 0.0..=1.0",
                self.wall_density
            )));
        }
        Ok(())
    }
}

impl PlayerConfig {
    pub fn validate(&self) -> Result<()> {
        let limit = GameConfig::MAX_SIGHT_RADIUS;
        for (name, radius) in [("vision", self.vision_radius), ("light", self.light_radius)] {
            if radius > limit {
                return Err(RuntimeError::InvalidConfig(format!(
                    "player {name} radius {radius} exceeds {limit}"
                )));
            }
        }
        Ok(())
    }
}

fn parse<T>(value: Option<String>) -> Option<T>
where
    T: std::str::FromStr,
{
    value?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn overrides(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn env_overrides_replace_defaults() {
        let config = RuntimeConfig::default().with_env_overrides(overrides(&[
            ("LUMEN_SEED", "99"),
            ("LUMEN_WIDTH", "40"),
            ("LUMEN_HEIGHT", "20"),
            ("LUMEN_WALL_DENSITY", "0.1"),
            ("LUMEN_MONSTERS", "3"),
            ("LUMEN_LOG", "lumen=debug"),
        ]));
        assert_eq!(config.seed, 99);
        assert_eq!((config.level.width, config.level.height), (40, 20));
        assert_eq!(config.level.wall_density, 0.1);
        assert_eq!(config.level.monsters, 3);
        assert_eq!(config.logging.directive, "lumen=debug");
        assert!(!config.logging.to_file);
    }

    #[test]
    fn unparsable_values_are_ignored() {
        let config = RuntimeConfig::default()
            .with_env_overrides(overrides(&[("LUMEN_SEED", "many"), ("LUMEN_WIDTH", "-3")]));
        assert_eq!(config, RuntimeConfig::default());
    }

    #[test]
    fn log_dir_switches_to_file_output() {
        let config = RuntimeConfig::default()
            .with_env_overrides(overrides(&[("LUMEN_LOG_DIR", "/tmp/lumen")]));
        assert!(config.logging.to_file);
        assert_eq!(config.logging.directory, Some(PathBuf::from("/tmp/lumen")));
    }

    #[test]
    fn game_config_carries_player_settings() {
        let mut config = RuntimeConfig::default();
        config.seed = 5;
        config.player.max_health = 33;
        let game = config.game_config();
        assert_eq!(game.seed, 5);
        assert_eq!(game.player_max_health, 33);
        assert_eq!(game.player_vision_radius, GameConfig::PLAYER_VISION_RADIUS);
    }

    #[test]
    fn defaults_match_core_constants() {
        let config = RuntimeConfig::default();
        assert_eq!(config.level.width, 256);
        assert_eq!(config.level.height, 256);
        assert_eq!(config.level.wall_density, 0.02);
    }

    #[test]
    fn oversized_sight_radius_is_rejected() {
        let mut config = RuntimeConfig::default();
        config.player.vision_radius = GameConfig::MAX_SIGHT_RADIUS;
        assert!(config.validate().is_ok());

        config.player.vision_radius = 1_000_000;
        assert!(matches!(config.validate(), Err(RuntimeError::InvalidConfig(_))));

        config.player.vision_radius = GameConfig::PLAYER_VISION_RADIUS;
        config.player.light_radius = GameConfig::MAX_SIGHT_RADIUS + 1;
        assert!(matches!(config.validate(), Err(RuntimeError::InvalidConfig(_))));
    }
}
