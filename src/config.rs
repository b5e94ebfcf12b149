use crate::debounce::{DEFAULT_TEMPLATE, GreetingSettings};
use dotenvy::dotenv;
use std::{env, ops::RangeInclusive, time::Duration};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingEnv(&'static str),
    #[error("invalid {0} value (expected true|false): {1}")]
    InvalidBool(&'static str, String),
    #[error("invalid WEBHOOK_URL: {0}")]
    InvalidWebhookUrl(String),
    #[error("invalid {0} value (expected whole seconds): {1}")]
    InvalidSeconds(&'static str, String),
    #[error("{0} = {1} is out of range (allowed {2}..={3} seconds)")]
    SecondsOutOfRange(&'static str, u64, u64, u64),
}

// One week. Anything longer is a typo and would overflow timer arithmetic.
const MAX_SECONDS: u64 = 7 * 24 * 60 * 60;

const WINDOW_SECONDS: RangeInclusive<u64> = 1..=MAX_SECONDS;
const DELAY_SECONDS: RangeInclusive<u64> = 0..=MAX_SECONDS;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub token: String,
    pub hosting: bool,
    pub webhook_url: Option<url::Url>,
    pub port: u16,
    pub debounce_window: Duration,
    pub delete_delay: Duration,
    pub greeting_enabled: bool,
    pub greeting_template: String,
}

fn parse_bool(var: &'static str, default: bool) -> Result<bool, ConfigError> {
    let raw = match env::var(var) {
        Ok(s) if !s.trim().is_empty() => s,
        _ => return Ok(default),
    };
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::InvalidBool(var, other.to_string())),
    }
}

fn parse_seconds(
    var: &'static str,
    default: u64,
    allowed: RangeInclusive<u64>,
) -> Result<Duration, ConfigError> {
    let secs = match env::var(var) {
        Ok(s) if !s.trim().is_empty() => s
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidSeconds(var, s.clone()))?,
        _ => default,
    };
    if !allowed.contains(&secs) {
        return Err(ConfigError::SecondsOutOfRange(
            var,
            secs,
            *allowed.start(),
            *allowed.end(),
        ));
    }
    Ok(Duration::from_secs(secs))
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        if cfg!(not(test)) {
            let _ = dotenv();
        }

        let token = env::var("TELOXIDE_TOKEN")
            .or_else(|_| env::var("TELEGRAM_BOT_TOKEN"))
            .map_err(|_| ConfigError::MissingEnv("TELOXIDE_TOKEN"))?;

        let hosting = parse_bool("HOSTING", false)?;

        let webhook_url = match env::var("WEBHOOK_URL") {
            Ok(s) if !s.trim().is_empty() => {
                let parsed =
                    url::Url::parse(&s).map_err(|_| ConfigError::InvalidWebhookUrl(s.clone()))?;
                Some(parsed)
            }
            _ => None,
        };

        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(3000u16);

        let debounce_window = parse_seconds("DEBOUNCE_WINDOW_SECS", 30, WINDOW_SECONDS)?;
        let delete_delay = parse_seconds("DELETE_DELAY_SECS", 10, DELAY_SECONDS)?;
        let greeting_enabled = parse_bool("GREETING_ENABLED", true)?;
        let greeting_template = env::var("GREETING_TEMPLATE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TEMPLATE.to_string());

        Ok(AppConfig {
            token,
            hosting,
            webhook_url,
            port,
            debounce_window,
            delete_delay,
            greeting_enabled,
            greeting_template,
        })
    }

    pub fn greeting(&self) -> Option<GreetingSettings> {
        self.greeting_enabled
            .then(|| GreetingSettings::new(self.greeting_template.clone(), self.delete_delay))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    const VARS: [&str; 9] = [
        "TELOXIDE_TOKEN",
        "TELEGRAM_BOT_TOKEN",
        "HOSTING",
        "WEBHOOK_URL",
        "PORT",
        "DEBOUNCE_WINDOW_SECS",
        "DELETE_DELAY_SECS",
        "GREETING_ENABLED",
        "GREETING_TEMPLATE",
    ];

    fn clear_env() {
        for var in VARS {
            unsafe {
                env::remove_var(var);
            }
        }
    }

    #[test]
    #[serial]
    fn from_env_parses_all() {
        clear_env();
        unsafe {
            env::set_var("TELOXIDE_TOKEN", "tok");
            env::set_var("HOSTING", "true");
            env::set_var("WEBHOOK_URL", "https://example.com/hook");
            env::set_var("PORT", "1234");
            env::set_var("DEBOUNCE_WINDOW_SECS", "45");
            env::set_var("DELETE_DELAY_SECS", "5");
            env::set_var("GREETING_ENABLED", "no");
            env::set_var("GREETING_TEMPLATE", "Welcome, {name}");
        }

        let cfg = AppConfig::from_env().unwrap();
        assert_eq!(cfg.token, "tok");
        assert!(cfg.hosting);
        assert_eq!(cfg.port, 1234);
        assert_eq!(
            cfg.webhook_url.unwrap().as_str(),
            "https://example.com/hook"
        );
        assert_eq!(cfg.debounce_window, Duration::from_secs(45));
        assert_eq!(cfg.delete_delay, Duration::from_secs(5));
        assert!(!cfg.greeting_enabled);
        assert_eq!(cfg.greeting_template, "Welcome, {name}");

        clear_env();
    }

    #[test]
    #[serial]
    fn from_env_defaults() {
        clear_env();
        unsafe {
            env::set_var("TELEGRAM_BOT_TOKEN", "legacy");
        }

        let cfg = AppConfig::from_env().unwrap();
        assert_eq!(cfg.token, "legacy");
        assert!(!cfg.hosting);
        assert!(cfg.webhook_url.is_none());
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.debounce_window, Duration::from_secs(30));
        assert_eq!(cfg.delete_delay, Duration::from_secs(10));

        let greeting = cfg.greeting().expect("greeting enabled by default");
        assert_eq!(greeting.render("Ana"), "Hi Ana, Welcome to our Channel...");
        assert_eq!(greeting.delete_after, Duration::from_secs(10));

        clear_env();
    }

    #[test]
    #[serial]
    fn from_env_missing_token() {
        clear_env();
        unsafe {
            env::set_var("HOSTING", "false");
        }

        let res = AppConfig::from_env();
        match res {
            Err(ConfigError::MissingEnv("TELOXIDE_TOKEN")) => {}
            other => panic!("expected MissingEnv TELOXIDE_TOKEN, got {:?}", other),
        }

        clear_env();
    }

    #[test]
    #[serial]
    fn from_env_rejects_bad_window() {
        clear_env();
        unsafe {
            env::set_var("TELOXIDE_TOKEN", "tok");
            env::set_var("DEBOUNCE_WINDOW_SECS", "soon");
        }

        match AppConfig::from_env() {
            Err(ConfigError::InvalidSeconds("DEBOUNCE_WINDOW_SECS", v)) => assert_eq!(v, "soon"),
            other => panic!("expected InvalidSeconds, got {:?}", other),
        }

        clear_env();
    }

    #[test]
    #[serial]
    fn from_env_rejects_zero_window() {
        clear_env();
        unsafe {
            env::set_var("TELOXIDE_TOKEN", "tok");
            env::set_var("DEBOUNCE_WINDOW_SECS", "0");
        }

        match AppConfig::from_env() {
            Err(ConfigError::SecondsOutOfRange("DEBOUNCE_WINDOW_SECS", 0, 1, _)) => {}
            other => panic!("expected SecondsOutOfRange, got {:?}", other),
        }

        clear_env();
    }

    #[test]
    #[serial]
    fn from_env_rejects_huge_durations() {
        clear_env();
        unsafe {
            env::set_var("TELOXIDE_TOKEN", "tok");
            env::set_var("DELETE_DELAY_SECS", "18446744073709551615");
        }

        match AppConfig::from_env() {
            Err(ConfigError::SecondsOutOfRange("DELETE_DELAY_SECS", v, 0, max)) => {
                assert_eq!(v, u64::MAX);
                assert_eq!(max, MAX_SECONDS);
            }
            other => panic!("expected SecondsOutOfRange, got {:?}", other),
        }

        unsafe {
            env::remove_var("DELETE_DELAY_SECS");
            env::set_var("DEBOUNCE_WINDOW_SECS", "604801");
        }

        match AppConfig::from_env() {
            Err(ConfigError::SecondsOutOfRange("DEBOUNCE_WINDOW_SECS", 604_801, 1, _)) => {}
            other => panic!("expected SecondsOutOfRange, got {:?}", other),
        }

        clear_env();
    }

    #[test]
    #[serial]
    fn from_env_accepts_range_edges() {
        clear_env();
        unsafe {
            env::set_var("TELOXIDE_TOKEN", "tok");
            env::set_var("DEBOUNCE_WINDOW_SECS", "604800");
            env::set_var("DELETE_DELAY_SECS", "0");
        }

        let cfg = AppConfig::from_env().unwrap();
        assert_eq!(cfg.debounce_window, Duration::from_secs(MAX_SECONDS));
        assert_eq!(cfg.delete_delay, Duration::ZERO);

        clear_env();
    }
}
