pub mod app;
pub mod error;
pub mod projection;
pub mod query;
pub mod tui;

pub use error::{AxtopError, AxtopResult};

pub const DEFAULT_URL: &str = "https://api.axiom.co";
const MIN_REFRESH_SECONDS: u64 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxtopConfig {
    pub token: Option<String>,
    pub org_id: Option<String>,
    pub url: String,
    /// Countdown start after each result.
    pub refresh_seconds: u64,
    pub query_timeout_seconds: u64,
    pub log_file: Option<String>,
}

impl Default for AxtopConfig {
    fn default() -> Self {
        Self {
            token: None,
            org_id: None,
            url: DEFAULT_URL.to_string(),
            refresh_seconds: 5,
            query_timeout_seconds: 30,
            log_file: None,
        }
    }
}

impl AxtopConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any variable source; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        config.token = var("AXIOM_TOKEN");
        config.org_id = var("AXIOM_ORG_ID");

        if let Some(url) = var("AXIOM_URL") {
            config.url = url.trim_end_matches('/').to_string();
        }

        if let Some(refresh) = var("AXTOP_REFRESH_SECS") {
            config.refresh_seconds = refresh
                .parse::<u64>()
                .unwrap_or(config.refresh_seconds)
                .max(MIN_REFRESH_SECONDS);
        }

        if let Some(timeout) = var("AXTOP_QUERY_TIMEOUT_SECS") {
            config.query_timeout_seconds = timeout.parse().unwrap_or(config.query_timeout_seconds);
        }

        config.log_file = var("AXTOP_LOG_FILE");

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = AxtopConfig::from_lookup(lookup(&[]));
        assert_eq!(config, AxtopConfig::default());
        assert_eq!(config.url, "https://api.axiom.co");
        assert_eq!(config.refresh_seconds, 5);
    }

    #[test]
    fn test_reads_credentials_and_trims_url() {
        let config = AxtopConfig::from_lookup(lookup(&[
            ("AXIOM_TOKEN", "xapt-123"),
            ("AXIOM_ORG_ID", "acme"),
            ("AXIOM_URL", "https://axiom.example.com/"),
            ("AXTOP_LOG_FILE", "/tmp/axtop.log"),
        ]));

        assert_eq!(config.token.as_deref(), Some("xapt-123"));
        assert_eq!(config.org_id.as_deref(), Some("acme"));
        assert_eq!(config.url, "https://axiom.example.com");
        assert_eq!(config.log_file.as_deref(), Some("/tmp/axtop.log"));
    }

    #[test]
    fn test_refresh_is_clamped_and_bad_numbers_ignored() {
        let config = AxtopConfig::from_lookup(lookup(&[
            ("AXTOP_REFRESH_SECS", "1"),
            ("AXTOP_QUERY_TIMEOUT_SECS", "soon"),
        ]));
        assert_eq!(config.refresh_seconds, 2);
        assert_eq!(config.query_timeout_seconds, 30);

        let config = AxtopConfig::from_lookup(lookup(&[("AXTOP_REFRESH_SECS", "10")]));
        assert_eq!(config.refresh_seconds, 10);
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = AxtopConfig::from_lookup(lookup(&[("AXIOM_TOKEN", "  "), ("AXIOM_ORG_ID", "")]));
        assert!(config.token.is_none());
        assert!(config.org_id.is_none());
    }
}
