//! Runtime configuration loaded from the environment.
//!
//! A `.env` file is honoured when present. Only `BOT_TOKEN` is required; every
//! other setting falls back to a default.

use std::env;
use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_COMPANY_NAME: &str = "Shararat Team";
const DEFAULT_CURRENCY_SYMBOL: &str = "₹";
const DEFAULT_COMMAND_PREFIX: char = '!';

/// Errors raised while reading configuration at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("BOT_TOKEN environment variable is not set")]
    MissingToken,
    #[error("PORT must be a number between 1 and 65535, got '{0}'")]
    InvalidPort(String),
    #[error("INVOICE_COMMAND_PREFIX must be a single character, got '{0}'")]
    InvalidPrefix(String),
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub bot_token: String,
    pub port: u16,
    pub company_name: String,
    pub currency_symbol: String,
    pub command_prefix: char,
    /// TrueType font embedded into documents; bundled DejaVu Sans when unset.
    pub font_path: Option<PathBuf>,
    /// Directory that receives rendered documents until they are uploaded.
    pub temp_dir: PathBuf,
}

impl BotConfig {
    /// Build a configuration with defaults for everything but the token.
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            port: DEFAULT_PORT,
            company_name: DEFAULT_COMPANY_NAME.to_string(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            command_prefix: DEFAULT_COMMAND_PREFIX,
            font_path: None,
            temp_dir: env::temp_dir(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let token = non_blank_var("BOT_TOKEN").ok_or(ConfigError::MissingToken)?;
        let mut config = Self::new(token);

        if let Some(port) = non_blank_var("PORT") {
            config.port = parse_port(&port)?;
        }
        if let Some(company) = non_blank_var("INVOICE_COMPANY_NAME") {
            config.company_name = company;
        }
        if let Some(symbol) = non_blank_var("INVOICE_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }
        if let Some(prefix) = non_blank_var("INVOICE_COMMAND_PREFIX") {
            config.command_prefix = parse_prefix(&prefix)?;
        }
        if let Some(font) = non_blank_var("INVOICE_FONT_PATH") {
            config.font_path = Some(PathBuf::from(font));
        }
        if let Some(dir) = non_blank_var("INVOICE_TEMP_DIR") {
            config.temp_dir = PathBuf::from(dir);
        }

        Ok(config)
    }
}

fn non_blank_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_port(value: &str) -> Result<u16, ConfigError> {
    match value.parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(ConfigError::InvalidPort(value.to_string())),
    }
}

fn parse_prefix(value: &str) -> Result<char, ConfigError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(prefix), None) => Ok(prefix),
        _ => Err(ConfigError::InvalidPrefix(value.to_string())),
    }
}
