use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub discord_token: String,
    pub audit_channel_id: u64,
    pub command_prefix: char,
    pub database_path: String,
    pub log_level: String,
    pub reward_cooldown_secs: u64,
    pub reward_points: i64,
    pub message_cache_size: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let audit_channel_id = env::var("AUDIT_CHANNEL_ID")
            .map_err(|_| anyhow!("AUDIT_CHANNEL_ID environment variable not set"))?;

        Ok(Config {
            discord_token: env::var("DISCORD_TOKEN")
                .map_err(|_| anyhow!("DISCORD_TOKEN environment variable not set"))?,
            audit_channel_id: audit_channel_id
                .trim()
                .parse()
                .map_err(|e| anyhow!("AUDIT_CHANNEL_ID is not a valid channel id: {}", e))?,
            command_prefix: parse_prefix(
                &env::var("COMMAND_PREFIX").unwrap_or_else(|_| "+".to_string()),
            )?,
            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "herald.db".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            reward_cooldown_secs: parse_or("REWARD_COOLDOWN_SECS", 60)?,
            reward_points: parse_or("REWARD_POINTS", 1)?,
            message_cache_size: parse_or("MESSAGE_CACHE_SIZE", 1000)?,
        })
    }

    /// The token in the `Bot <token>` form the REST API expects.
    pub fn bot_token(&self) -> String {
        let token = self.discord_token.trim();
        if token.starts_with("Bot ") {
            token.to_string()
        } else {
            format!("Bot {}", token)
        }
    }
}

/// The prefix must be a single character.
fn parse_prefix(raw: &str) -> Result<char> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_whitespace() => Ok(c),
        _ => Err(anyhow!(
            "COMMAND_PREFIX must be a single non-whitespace character, got {:?}",
            raw
        )),
    }
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|e| anyhow!("{} has an invalid value {:?}: {}", key, value, e)),
        Err(_) => Ok(default),
    }
}
