use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::logger::LogLevel;
use crate::tictactoe::GameMode;
use super::Validate;

pub const MAX_BOT_DELAY_MS: u64 = 10_000;

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct EngineConfig {
    /// Simulated thinking time before the bot plays.
    pub bot_delay_ms: u64,
    pub default_mode: GameMode,
    /// Fixed seed for the bot's randomness; random when absent.
    pub seed: Option<u64>,
    pub log: LogConfig,
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct LogConfig {
    pub level: LogLevel,
    pub file: Option<String>,
}

impl EngineConfig {
    pub fn bot_delay(&self) -> Duration {
        Duration::from_millis(self.bot_delay_ms)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bot_delay_ms: 500,
            default_mode: GameMode::LocalTwoPlayer,
            seed: None,
            log: LogConfig::default(),
        }
    }
}

impl Validate for EngineConfig {
    fn validate(&self) -> Result<(), String> {
        if self.bot_delay_ms > MAX_BOT_DELAY_MS {
            return Err(format!(
                "bot_delay_ms must not exceed {}, got {}",
                MAX_BOT_DELAY_MS, self.bot_delay_ms
            ));
        }
        self.log.validate()
    }
}

impl Validate for LogConfig {
    fn validate(&self) -> Result<(), String> {
        if let Some(file) = &self.file
            && file.trim().is_empty()
        {
            return Err("log file path must not be empty".to_string());
        }
        Ok(())
    }
}
