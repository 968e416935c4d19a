use std::path::PathBuf;

use crate::error::{AppError, Result};
use crate::view::format::Locale;

pub const API_URL: &str = "http://localhost:3000";

/// Rows per page requested from the user-bonus endpoint.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// HTTP client timeout (seconds). Timeouts are the client's job, not the controller's.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Channel capacity for fetch outcomes flowing back to their owner.
pub const CHANNEL_CAPACITY: usize = 64;

/// How long the TUI waits for a key before draining fetch outcomes again (milliseconds).
pub const INPUT_POLL_MS: u64 = 100;

/// Toasts older than this are dropped from the footer.
pub const TOAST_TTL_SECS: u64 = 6;

/// Maximum toasts kept at once; the oldest is evicted first.
pub const TOAST_CAPACITY: usize = 5;

/// Admin REST paths, relative to `API_URL`.
pub mod paths {
    pub const USER_BONUSES: &str = "/api/admin/promotions/user-bonuses";
    pub const STATS: &str = "/api/admin/stats";
    pub const CHARTS: &str = "/api/admin/charts";
    pub const EXPORT: &str = "/api/admin/export";
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub page_size: u32,
    pub request_timeout_secs: u64,
    /// Where exported reports are written (EXPORT_DIR)
    pub export_dir: PathBuf,
    /// Number/date conventions (LOCALE, e.g. "de-DE")
    pub locale: Locale,
    pub log_level: String,
    /// The terminal belongs to the TUI, so logs go to a file (LOG_FILE)
    pub log_file: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let page_size = match var("PAGE_SIZE") {
            Some(v) => v
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| AppError::Config("PAGE_SIZE must be a positive integer".to_string()))?,
            None => DEFAULT_PAGE_SIZE,
        };

        let request_timeout_secs = match var("REQUEST_TIMEOUT_SECS") {
            Some(v) => v.trim().parse::<u64>().ok().filter(|n| *n > 0).ok_or_else(|| {
                AppError::Config("REQUEST_TIMEOUT_SECS must be a positive whole number of seconds".to_string())
            })?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        let mut locale = match var("LOCALE") {
            Some(tag) => Locale::from_tag(&tag)
                .ok_or_else(|| AppError::Config(format!("unsupported LOCALE {tag:?}")))?,
            None => Locale::default(),
        };
        if let Some(symbol) = var("CURRENCY_SYMBOL") {
            locale.currency_symbol = symbol;
        }

        Ok(Self {
            api_url: var("API_URL")
                .unwrap_or_else(|| API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            page_size,
            request_timeout_secs,
            export_dir: var("EXPORT_DIR").map(PathBuf::from).unwrap_or_else(|| PathBuf::from(".")),
            locale,
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_file: var("LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("promo-admin.log")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = config_with(&[]).unwrap();
        assert_eq!(cfg.api_url, API_URL);
        assert_eq!(cfg.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(cfg.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert_eq!(cfg.locale, Locale::default());
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn trailing_slash_is_stripped_from_api_url() {
        let cfg = config_with(&[("API_URL", "https://admin.example.com/")]).unwrap();
        assert_eq!(cfg.api_url, "https://admin.example.com");
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert!(matches!(config_with(&[("PAGE_SIZE", "0")]), Err(AppError::Config(_))));
        assert!(matches!(config_with(&[("PAGE_SIZE", "ten")]), Err(AppError::Config(_))));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(matches!(config_with(&[("REQUEST_TIMEOUT_SECS", "0")]), Err(AppError::Config(_))));
        let cfg = config_with(&[("REQUEST_TIMEOUT_SECS", "5")]).unwrap();
        assert_eq!(cfg.request_timeout_secs, 5);
    }

    #[test]
    fn locale_and_currency_symbol_combine() {
        let cfg = config_with(&[("LOCALE", "de-DE"), ("CURRENCY_SYMBOL", "€")]).unwrap();
        assert_eq!(cfg.locale.decimal_sep, ',');
        assert_eq!(cfg.locale.currency_symbol, "€");
    }

    #[test]
    fn unknown_locale_is_a_config_error() {
        assert!(matches!(config_with(&[("LOCALE", "xx-XX")]), Err(AppError::Config(_))));
    }
}
