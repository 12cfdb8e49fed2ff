//! Configuration management for Paychain

use crate::error::{ChainError, Result};
use crate::miner::{DEFAULT_DIFFICULTY, MAX_DIFFICULTY};
use serde::Deserialize;
use std::fs;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub miner: MinerConfig,
    #[serde(default)]
    pub genesis: GenesisConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MinerConfig {
    /// Leading hex zeros required of a mined block hash.
    #[serde(default = "default_difficulty")]
    pub difficulty: usize,
    /// Worker threads for the nonce search.
    #[serde(default = "default_threads")]
    pub threads: usize,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            difficulty: default_difficulty(),
            threads: default_threads(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GenesisConfig {
    /// Amount minted to the genesis account.
    #[serde(default = "default_initial_amount")]
    pub initial_amount: u64,
}

impl Default for GenesisConfig {
    fn default() -> Self {
        Self {
            initial_amount: default_initial_amount(),
        }
    }
}

fn default_difficulty() -> usize {
    DEFAULT_DIFFICULTY
}

fn default_threads() -> usize {
    1
}

fn default_initial_amount() -> u64 {
    100
}

/// Loads configuration from the given TOML file, falling back to defaults
/// when the file is absent or empty.
pub fn load_config(path: &str) -> Result<Config> {
    let config_str = fs::read_to_string(path).unwrap_or_default();
    let config: Config = if config_str.is_empty() {
        Config::default()
    } else {
        toml::from_str(&config_str).map_err(|e| ChainError::ConfigError(e.to_string()))?
    };

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.miner.difficulty == 0 || config.miner.difficulty > MAX_DIFFICULTY {
        return Err(ChainError::ConfigError(format!(
            "miner.difficulty must be between 1 and {}",
            MAX_DIFFICULTY
        )));
    }

    if config.miner.threads == 0 {
        return Err(ChainError::ConfigError(
            "miner.threads must be at least 1".to_string(),
        ));
    }

    if config.genesis.initial_amount == 0 {
        return Err(ChainError::ConfigError(
            "genesis.initial_amount must be positive".to_string(),
        ));
    }

    Ok(())
}
