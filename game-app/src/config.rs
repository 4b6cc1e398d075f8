use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::ui_settings::Theme;

pub const DEFAULT_WORD_LIST_URL: &str = "https://random-word-api.herokuapp.com/all";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub word_list_url: String,
    pub bot_delay_ms: u64,
    pub request_timeout_seconds: u64,
    pub max_saved_games: usize,
    /// Fixed seed for reproducible games; entropy when unset.
    pub rng_seed: Option<u64>,
    pub theme: Option<Theme>,
}

impl Config {
    pub fn new() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Unparseable values fall back to
    /// the default with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://word_train.db?mode=rwc".to_string()),
            word_list_url: lookup("WORD_LIST_URL")
                .unwrap_or_else(|| DEFAULT_WORD_LIST_URL.to_string()),
            bot_delay_ms: parse_or(&lookup, "BOT_DELAY_MS", 800),
            request_timeout_seconds: parse_or(&lookup, "REQUEST_TIMEOUT_SECONDS", 6),
            max_saved_games: parse_or(&lookup, "MAX_SAVED_GAMES", 50),
            rng_seed: parse_optional(&lookup, "RNG_SEED"),
            theme: parse_optional(&lookup, "WORD_TRAIN_THEME"),
        }
    }

    pub fn bot_delay(&self) -> Duration {
        Duration::from_millis(self.bot_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_optional<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring invalid {}: {:?}", key, raw);
            None
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    parse_optional(lookup, key).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.database_url, "sqlite://word_train.db?mode=rwc");
        assert_eq!(config.word_list_url, DEFAULT_WORD_LIST_URL);
        assert_eq!(config.bot_delay(), Duration::from_millis(800));
        assert_eq!(config.request_timeout(), Duration::from_secs(6));
        assert_eq!(config.max_saved_games, 50);
        assert_eq!(config.rng_seed, None);
        assert_eq!(config.theme, None);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("BOT_DELAY_MS", "10"),
            ("MAX_SAVED_GAMES", "5"),
            ("RNG_SEED", "1234"),
            ("WORD_TRAIN_THEME", "dark"),
        ]);
        assert_eq!(config.bot_delay_ms, 10);
        assert_eq!(config.max_saved_games, 5);
        assert_eq!(config.rng_seed, Some(1234));
        assert_eq!(config.theme, Some(Theme::Dark));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("BOT_DELAY_MS", "soon"),
            ("RNG_SEED", "-1"),
            ("WORD_TRAIN_THEME", "sepia"),
        ]);
        assert_eq!(config.bot_delay_ms, 800);
        assert_eq!(config.rng_seed, None);
        assert_eq!(config.theme, None);
    }
}
