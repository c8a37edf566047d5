//! Layered CLI configuration.
//!
//! Values resolve in order default < TOML file (`LUDO_CONFIG`) < environment
//! (`LUDO_PLAYERS`, `LUDO_DIFFICULTY`, `LUDO_SEED`, `LUDO_TURN_LIMIT`) <
//! command-line flags. Every field remembers where its value came from so
//! `ludo cfg` can show it.

use serde::{Deserialize, Serialize};
use std::fs;

use ludo_engine::game::{MAX_PLAYERS, MIN_PLAYERS};
use ludo_engine::player::{Difficulty, PlayerSpec};

pub const DEFAULT_PLAYERS: u8 = 2;
/// Rolls after which an unfinished game is abandoned.
pub const DEFAULT_TURN_LIMIT: u32 = 2000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub players: u8,
    pub difficulty: Difficulty,
    pub seed: Option<u64>,
    pub turn_limit: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            players: DEFAULT_PLAYERS,
            difficulty: Difficulty::default(),
            seed: None,
            turn_limit: DEFAULT_TURN_LIMIT,
        }
    }
}

impl Config {
    /// Every seat controlled by the configured AI tier.
    pub fn ai_players(&self) -> Vec<PlayerSpec> {
        vec![PlayerSpec::ai(self.difficulty); usize::from(self.players)]
    }

    /// A human on seat 0, AI opponents on the rest.
    pub fn human_vs_ai(&self) -> Vec<PlayerSpec> {
        let mut specs = self.ai_players();
        if let Some(first) = specs.first_mut() {
            *first = PlayerSpec::human();
        }
        specs
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
    Cli,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub players: ValueSource,
    pub difficulty: ValueSource,
    pub seed: ValueSource,
    pub turn_limit: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            players: ValueSource::Default,
            difficulty: ValueSource::Default,
            seed: ValueSource::Default,
            turn_limit: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

/// Values given as command-line flags; `None` leaves the lower layers alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigOverrides {
    pub players: Option<u8>,
    pub difficulty: Option<Difficulty>,
    pub seed: Option<u64>,
    pub turn_limit: Option<u32>,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => f.write_str(msg),
        }
    }
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    load_with_overrides(ConfigOverrides::default())
}

pub fn load_with_overrides(overrides: ConfigOverrides) -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var("LUDO_CONFIG")
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.players {
            cfg.players = v;
            sources.players = ValueSource::File;
        }
        if let Some(v) = f.difficulty {
            cfg.difficulty = v;
            sources.difficulty = ValueSource::File;
        }
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.turn_limit {
            cfg.turn_limit = v;
            sources.turn_limit = ValueSource::File;
        }
    }

    if let Ok(players) = std::env::var("LUDO_PLAYERS")
        && !players.is_empty()
    {
        cfg.players = players
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid players".into()))?;
        sources.players = ValueSource::Env;
    }
    if let Ok(difficulty) = std::env::var("LUDO_DIFFICULTY")
        && !difficulty.is_empty()
    {
        cfg.difficulty = difficulty.parse().map_err(ConfigError::Invalid)?;
        sources.difficulty = ValueSource::Env;
    }
    if let Ok(seed) = std::env::var("LUDO_SEED")
        && !seed.is_empty()
    {
        cfg.seed = Some(
            seed.trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("Invalid seed".into()))?,
        );
        sources.seed = ValueSource::Env;
    }
    if let Ok(limit) = std::env::var("LUDO_TURN_LIMIT")
        && !limit.is_empty()
    {
        cfg.turn_limit = limit
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid turn_limit".into()))?;
        sources.turn_limit = ValueSource::Env;
    }

    if let Some(v) = overrides.players {
        cfg.players = v;
        sources.players = ValueSource::Cli;
    }
    if let Some(v) = overrides.difficulty {
        cfg.difficulty = v;
        sources.difficulty = ValueSource::Cli;
    }
    if let Some(v) = overrides.seed {
        cfg.seed = Some(v);
        sources.seed = ValueSource::Cli;
    }
    if let Some(v) = overrides.turn_limit {
        cfg.turn_limit = v;
        sources.turn_limit = ValueSource::Cli;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    players: Option<u8>,
    #[serde(default)]
    difficulty: Option<Difficulty>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    turn_limit: Option<u32>,
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    let players = usize::from(cfg.players);
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players) {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: players must be between {} and {}",
            MIN_PLAYERS, MAX_PLAYERS
        )));
    }
    if cfg.turn_limit == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: turn_limit must be >0".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_out_of_range_players() {
        for players in [0, 1, 5] {
            let cfg = Config {
                players,
                ..Config::default()
            };
            assert!(matches!(validate(&cfg), Err(ConfigError::Invalid(_))));
        }
    }

    #[test]
    fn validate_rejects_zero_turn_limit() {
        let cfg = Config {
            turn_limit: 0,
            ..Config::default()
        };
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn human_vs_ai_puts_the_human_on_seat_zero() {
        let cfg = Config {
            players: 3,
            difficulty: Difficulty::Hard,
            ..Config::default()
        };
        let specs = cfg.human_vs_ai();
        assert_eq!(specs.len(), 3);
        assert!(!specs[0].is_ai);
        assert!(specs[1..].iter().all(|s| *s == PlayerSpec::ai(Difficulty::Hard)));
    }

    #[test]
    fn file_config_parses_lowercase_difficulty() {
        let f: FileConfig = toml::from_str("players = 4\ndifficulty = \"easy\"\n").unwrap();
        assert_eq!(f.players, Some(4));
        assert_eq!(f.difficulty, Some(Difficulty::Easy));
        assert_eq!(f.seed, None);
    }
}
