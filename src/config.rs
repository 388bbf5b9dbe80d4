// Configuration loading and parsing.
//
// The embedding process points the core at a single toml file holding the
// league identity and the bot's reply knobs. Credentials for the data
// source and the chat transport live with their adapters, not here.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub league: LeagueConfig,
    #[serde(default)]
    pub bot: BotConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    /// Data-source game code for the sport/season (e.g. `nba`).
    pub game_key: String,
    pub league_id: u32,
}

impl LeagueConfig {
    /// The fully-qualified league key the data source expects.
    pub fn league_key(&self) -> String {
        format!("{}.l.{}", self.game_key, self.league_id)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Command prefix, e.g. `!`.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// How many free agents `!analyze` lists per stat.
    #[serde(default = "default_count")]
    pub free_agent_count: usize,
    /// How many players `!leaders` lists per stat.
    #[serde(default = "default_count")]
    pub leader_count: usize,
}

fn default_prefix() -> String {
    "!".to_string()
}

fn default_count() -> usize {
    5
}

impl Default for BotConfig {
    fn default() -> Self {
        BotConfig {
            prefix: default_prefix(),
            free_agent_count: default_count(),
            leader_count: default_count(),
        }
    }
}

/// Load and validate a config file.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })?;
    parse_config(&content, path)
}

/// Parse and validate config from a string (used by tests and embedders
/// that manage their own files).
pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    parse_config(content, Path::new("<inline>"))
}

fn parse_config(content: &str, path: &Path) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content).map_err(|source| ConfigError::ParseError {
        path: path.to_path_buf(),
        source,
    })?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.league.game_key.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "league.game_key".into(),
            message: "must not be empty".into(),
        });
    }
    if config.league.league_id == 0 {
        return Err(ConfigError::ValidationError {
            field: "league.league_id".into(),
            message: "must be positive".into(),
        });
    }
    if config.bot.prefix.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "bot.prefix".into(),
            message: "must not be empty".into(),
        });
    }
    if config.bot.free_agent_count == 0 {
        return Err(ConfigError::ValidationError {
            field: "bot.free_agent_count".into(),
            message: "must be positive".into(),
        });
    }
    if config.bot.leader_count == 0 {
        return Err(ConfigError::ValidationError {
            field: "bot.leader_count".into(),
            message: "must be positive".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = load_config_from_str(
            r#"
            [league]
            game_key = "nba"
            league_id = 12345
            "#,
        )
        .unwrap();
        assert_eq!(config.league.league_key(), "nba.l.12345");
        assert_eq!(config.bot.prefix, "!");
        assert_eq!(config.bot.free_agent_count, 5);
        assert_eq!(config.bot.leader_count, 5);
    }

    #[test]
    fn explicit_bot_section_overrides_defaults() {
        let config = load_config_from_str(
            r#"
            [league]
            game_key = "nba"
            league_id = 7

            [bot]
            prefix = "$"
            free_agent_count = 3
            leader_count = 10
            "#,
        )
        .unwrap();
        assert_eq!(config.bot.prefix, "$");
        assert_eq!(config.bot.free_agent_count, 3);
        assert_eq!(config.bot.leader_count, 10);
    }

    #[test]
    fn empty_prefix_is_rejected() {
        let err = load_config_from_str(
            r#"
            [league]
            game_key = "nba"
            league_id = 7

            [bot]
            prefix = ""
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { field, .. } if field == "bot.prefix"));
    }

    #[test]
    fn zero_league_id_is_rejected() {
        let err = load_config_from_str(
            r#"
            [league]
            game_key = "nba"
            league_id = 0
            "#,
        )
        .unwrap_err();
        assert!(
            matches!(err, ConfigError::ValidationError { field, .. } if field == "league.league_id")
        );
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = load_config_from_str("[league").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load_config("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }
}
