// Centralized configuration for the trivia bot

use std::env;
use std::time::Duration;

/// Name of the role that, when given to the bot, silences `!trivia` in a guild
pub const DISABLE_TRIVIA_ROLE: &str = "DisableTrivia";

/// Members without Manage Messages can't queue more rounds than this
pub const NON_STAFF_MAX_GAMES: u32 = 5;

/// Discord embed colors
pub mod colors {
    pub const PRIMARY: u32 = 0x00bfff;
    pub const SUCCESS: u32 = 0x2ecc71;
    pub const ERROR: u32 = 0xff0000;
    pub const WARNING: u32 = 0xffa500;
    pub const INFO: u32 = 0x3498db;
}

/// Runtime settings, read once at startup
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub discord_token: String,
    pub prefix: String,
    /// Upper bound on rounds in a single `!trivia` session
    pub max_games: u32,
    /// Per-guild cooldown between `!trivia` sessions
    pub cooldown: Duration,
    /// How long a question stays open before it expires
    pub game_length: Duration,
    /// Pause before each question is posted
    pub question_delay: Duration,
    pub db_path: String,
    /// Pin a Data Dragon version instead of following the latest patch
    pub ddragon_version: Option<String>,
    pub ddragon_locale: String,
    pub skin_data_path: String,
}

impl BotConfig {
    pub fn from_env() -> Self {
        Self {
            discord_token: env::var("DISCORD_TOKEN").expect("DISCORD_TOKEN must be set"),
            prefix: env::var("TRIVIA_PREFIX").unwrap_or_else(|_| "!".to_string()),
            max_games: parse_env("TRIVIA_MAX_GAMES").unwrap_or(10).max(1),
            cooldown: Duration::from_secs(parse_env("TRIVIA_COOLDOWN_SECS").unwrap_or(30)),
            game_length: Duration::from_secs(parse_env("TRIVIA_GAME_LENGTH_SECS").unwrap_or(20)),
            question_delay: Duration::from_secs(parse_env("TRIVIA_QUESTION_DELAY_SECS").unwrap_or(2)),
            db_path: env::var("TRIVIA_DB_PATH").unwrap_or_else(|_| "data/users.db".to_string()),
            ddragon_version: env::var("DDRAGON_VERSION").ok().filter(|v| !v.trim().is_empty()),
            ddragon_locale: env::var("DDRAGON_LOCALE").unwrap_or_else(|_| "en_US".to_string()),
            skin_data_path: env::var("TRIVIA_SKIN_DATA")
                .unwrap_or_else(|_| "data/skins.json".to_string()),
        }
    }

    /// Clamp a requested number of rounds to what the caller may start
    pub fn clamp_games(&self, requested: u32, is_staff: bool) -> u32 {
        let requested = if is_staff {
            requested
        } else {
            requested.min(NON_STAFF_MAX_GAMES)
        };
        requested.clamp(1, self.max_games)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
