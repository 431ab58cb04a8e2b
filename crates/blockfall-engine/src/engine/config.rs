use serde::{Deserialize, Serialize};

use crate::{ConfigError, GameStats};

/// Rules settings chosen before a game starts.
///
/// Deserializing validates the same way [`GameConfig::new`] does, so a config
/// file with an out-of-range level is rejected at load time.
///
/// ```
/// use blockfall_engine::GameConfig;
///
/// let config: GameConfig = serde_json::from_str(r#"{ "starting_level": 5 }"#).unwrap();
/// assert_eq!(config.starting_level(), 5);
/// assert!(!config.debug());
///
/// assert!(serde_json::from_str::<GameConfig>(r#"{ "starting_level": 21 }"#).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGameConfig")]
pub struct GameConfig {
    starting_level: u8,
    debug: bool,
}

#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawGameConfig {
    starting_level: u8,
    debug: bool,
}

impl Default for RawGameConfig {
    fn default() -> Self {
        let config = GameConfig::default();
        Self {
            starting_level: config.starting_level,
            debug: config.debug,
        }
    }
}

impl TryFrom<RawGameConfig> for GameConfig {
    type Error = ConfigError;

    fn try_from(raw: RawGameConfig) -> Result<Self, Self::Error> {
        Self::new(raw.starting_level, raw.debug)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_level: GameStats::MIN_LEVEL,
            debug: false,
        }
    }
}

impl GameConfig {
    pub fn new(starting_level: u8, debug: bool) -> Result<Self, ConfigError> {
        if !(GameStats::MIN_LEVEL..=GameStats::MAX_LEVEL).contains(&starting_level) {
            return Err(ConfigError::LevelOutOfRange {
                level: starting_level,
            });
        }
        Ok(Self {
            starting_level,
            debug,
        })
    }

    #[must_use]
    pub const fn starting_level(&self) -> u8 {
        self.starting_level
    }

    /// Debug mode accepts [`Move::Up`](crate::Move::Up) and disables automatic descent.
    #[must_use]
    pub const fn debug(&self) -> bool {
        self.debug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_range() {
        assert!(GameConfig::new(1, false).is_ok());
        assert!(GameConfig::new(20, true).is_ok());
        assert_eq!(
            GameConfig::new(0, false),
            Err(ConfigError::LevelOutOfRange { level: 0 })
        );
        assert_eq!(
            GameConfig::new(21, false),
            Err(ConfigError::LevelOutOfRange { level: 21 })
        );
    }

    #[test]
    fn test_deserialize_defaults_and_validation() {
        let config: GameConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, GameConfig::default());

        let config: GameConfig =
            serde_json::from_str(r#"{ "starting_level": 3, "debug": true }"#).unwrap();
        assert_eq!(config, GameConfig::new(3, true).unwrap());

        let err = serde_json::from_str::<GameConfig>(r#"{ "starting_level": 0 }"#).unwrap_err();
        assert!(err.to_string().contains("starting level"), "{err}");

        assert!(serde_json::from_str::<GameConfig>(r#"{ "level": 3 }"#).is_err());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let config = GameConfig::new(12, true).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"starting_level":12,"debug":true}"#);
        assert_eq!(serde_json::from_str::<GameConfig>(&json).unwrap(), config);
    }
}
