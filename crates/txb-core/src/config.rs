use std::{env, fs, path::Path, time::Duration};

use crate::{errors::Error, Result};

/// Typed configuration for the relay bot.
#[derive(Clone, Debug)]
pub struct Config {
    // Telegram
    pub bot_token: String,
    pub telegram_api_url: Option<String>,
    pub debug: bool,

    // Upstream post API
    pub twitterx_api_url: String,
    pub upstream_http_timeout: Duration,

    // Telegraph
    pub telegraph_enabled: bool,
    pub telegraph_author_name: String,
    pub telegraph_author_url: String,
    pub telegraph_http_timeout: Duration,

    // Per-request deadlines
    pub message_timeout: Duration,
    pub inline_timeout: Duration,
    pub chain_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup (the process env in `load`).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).and_then(non_empty);

        let twitterx_api_url = get("TWITTERX_API_URL").ok_or_else(|| {
            Error::Config("TWITTERX_API_URL environment variable is required".to_string())
        })?;
        let bot_token = get("BOT_TOKEN").ok_or_else(|| {
            Error::Config("BOT_TOKEN environment variable is required".to_string())
        })?;

        let telegram_api_url = get("TELEGRAM_API_URL")
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .and_then(non_empty);

        let debug = get("DEBUG").map(|v| parse_bool(&v)).unwrap_or(false);

        let millis = |key: &str, default: u64| {
            Duration::from_millis(
                get(key)
                    .and_then(|s| s.trim().parse::<u64>().ok())
                    .unwrap_or(default),
            )
        };

        Ok(Self {
            bot_token,
            telegram_api_url,
            debug,
            twitterx_api_url: twitterx_api_url.trim().to_string(),
            upstream_http_timeout: millis("UPSTREAM_HTTP_TIMEOUT_MS", 12_000),
            telegraph_enabled: get("TELEGRAPH_ENABLED")
                .map(|v| parse_bool(&v))
                .unwrap_or(true),
            telegraph_author_name: get("TELEGRAPH_AUTHOR_NAME")
                .unwrap_or_else(|| "TwitterX".to_string()),
            telegraph_author_url: get("TELEGRAPH_AUTHOR_URL")
                .unwrap_or_else(|| "https://t.me/twitter_x_bot".to_string()),
            telegraph_http_timeout: millis("TELEGRAPH_HTTP_TIMEOUT_MS", 30_000),
            message_timeout: millis("MESSAGE_TIMEOUT_MS", 10_000),
            inline_timeout: millis("INLINE_TIMEOUT_MS", 10_000),
            chain_timeout: millis("CHAIN_TIMEOUT_MS", 30_000),
        })
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn parse_bool(s: &str) -> bool {
    matches!(
        s.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn requires_api_url_and_token() {
        let err = Config::from_lookup(lookup(&[("BOT_TOKEN", "t")])).unwrap_err();
        assert!(err.to_string().contains("TWITTERX_API_URL"));

        let err = Config::from_lookup(lookup(&[("TWITTERX_API_URL", "http://api")])).unwrap_err();
        assert!(err.to_string().contains("BOT_TOKEN"));
    }

    #[test]
    fn applies_defaults() {
        let cfg = Config::from_lookup(lookup(&[
            ("BOT_TOKEN", "t"),
            ("TWITTERX_API_URL", "http://api"),
        ]))
        .unwrap();
        assert!(!cfg.debug);
        assert!(cfg.telegraph_enabled);
        assert_eq!(cfg.telegram_api_url, None);
        assert_eq!(cfg.telegraph_author_name, "TwitterX");
        assert_eq!(cfg.chain_timeout, Duration::from_secs(30));
        assert_eq!(cfg.message_timeout, Duration::from_secs(10));
        assert_eq!(cfg.upstream_http_timeout, Duration::from_secs(12));
    }

    #[test]
    fn parses_overrides() {
        let cfg = Config::from_lookup(lookup(&[
            ("BOT_TOKEN", "t"),
            ("TWITTERX_API_URL", "http://api"),
            ("TELEGRAM_API_URL", " http://tg.local/ "),
            ("DEBUG", "True"),
            ("TELEGRAPH_ENABLED", "0"),
            ("CHAIN_TIMEOUT_MS", "5000"),
        ]))
        .unwrap();
        assert!(cfg.debug);
        assert!(!cfg.telegraph_enabled);
        assert_eq!(cfg.telegram_api_url.as_deref(), Some("http://tg.local"));
        assert_eq!(cfg.chain_timeout, Duration::from_secs(5));
    }
}
