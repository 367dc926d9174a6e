//! Application settings.
//!
//! Read from an optional TOML file (`config/settings.toml`, or the path
//! given with `--config`) and then from the process environment, which
//! wins. Keys match the environment names lowercased, e.g.
//! `TELEGRAM_BOT_TOKEN` is `telegram_bot_token`. Variables set to an empty
//! value count as unset.
use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Deserializer, de};

const DEFAULT_CONFIG_PATH: &str = "config/settings.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub telegram_bot_token: String,
    pub database_url: String,
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Telegram user ids allowed to talk to the bot. Empty means everyone.
    #[serde(default, deserialize_with = "user_ids")]
    pub allowed_users: Vec<u64>,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_timezone() -> String {
    engine::DEFAULT_TIMEZONE.name().to_string()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum UserIdEntry {
    Id(u64),
    Text(String),
}

/// Accepts ids as numbers or strings and skips blank entries, so that
/// `ALLOWED_USERS=1,2,` or `allowed_users = ["1", ""]` still load.
fn user_ids<'de, D>(deserializer: D) -> Result<Vec<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Vec::<UserIdEntry>::deserialize(deserializer)?;
    entries
        .into_iter()
        .filter_map(|entry| match entry {
            UserIdEntry::Id(id) => Some(Ok(id)),
            UserIdEntry::Text(text) => {
                let text = text.trim();
                (!text.is_empty()).then(|| {
                    text.parse()
                        .map_err(|_| de::Error::custom(format!("invalid user id {text:?}")))
                })
            }
        })
        .collect()
}

#[derive(Debug, Parser)]
#[command(name = "expense_bot", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override the log level (e.g. debug).
    #[arg(long)]
    level: Option<String>,
    /// Override the reference timezone (IANA name).
    #[arg(long)]
    timezone: Option<String>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(Args::parse(), Environment::default())
    }

    fn load(args: Args, env: Environment) -> Result<Self, ConfigError> {
        let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
        let mut settings: Settings = Config::builder()
            .add_source(File::with_name(config_path).required(false))
            .add_source(
                env.ignore_empty(true)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("allowed_users"),
            )
            .build()?
            .try_deserialize()?;

        if let Some(level) = args.level {
            settings.level = level;
        }
        if let Some(timezone) = args.timezone {
            settings.timezone = timezone;
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_FILE: &str = "config/expense_bot_settings_test_missing";

    fn args(extra: &[&str]) -> Args {
        let argv = ["expense_bot", "--config", NO_FILE]
            .into_iter()
            .chain(extra.iter().copied());
        Args::try_parse_from(argv).unwrap()
    }

    fn env(vars: &[(&str, &str)]) -> Environment {
        let vars: config::Map<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Environment::default().source(Some(vars))
    }

    const TOKEN: (&str, &str) = ("TELEGRAM_BOT_TOKEN", "123456:test-token");
    const DATABASE: (&str, &str) = ("DATABASE_URL", "sqlite::memory:");

    #[test]
    fn required_keys_with_defaults() {
        let settings = Settings::load(args(&[]), env(&[TOKEN, DATABASE])).unwrap();
        assert_eq!(settings.telegram_bot_token, "123456:test-token");
        assert_eq!(settings.database_url, "sqlite::memory:");
        assert_eq!(settings.level, "info");
        assert_eq!(settings.timezone, "Asia/Phnom_Penh");
        assert!(settings.allowed_users.is_empty());
    }

    #[test]
    fn missing_token_is_an_error() {
        assert!(Settings::load(args(&[]), env(&[DATABASE])).is_err());
        assert!(
            Settings::load(args(&[]), env(&[("TELEGRAM_BOT_TOKEN", ""), DATABASE])).is_err()
        );
    }

    #[test]
    fn missing_database_url_is_an_error() {
        assert!(Settings::load(args(&[]), env(&[TOKEN])).is_err());
    }

    #[test]
    fn allowed_users_are_a_comma_list() {
        let settings = Settings::load(
            args(&[]),
            env(&[TOKEN, DATABASE, ("ALLOWED_USERS", "42, 7,")]),
        )
        .unwrap();
        assert_eq!(settings.allowed_users, vec![42, 7]);
    }

    #[test]
    fn empty_allowed_users_admits_everyone() {
        let settings =
            Settings::load(args(&[]), env(&[TOKEN, DATABASE, ("ALLOWED_USERS", "")])).unwrap();
        assert!(settings.allowed_users.is_empty());
    }

    #[test]
    fn command_line_overrides_win() {
        let settings = Settings::load(
            args(&["--level", "debug", "--timezone", "UTC"]),
            env(&[TOKEN, DATABASE, ("LEVEL", "warn")]),
        )
        .unwrap();
        assert_eq!(settings.level, "debug");
        assert_eq!(settings.timezone, "UTC");
    }
}
