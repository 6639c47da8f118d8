//! Environment configuration.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use validator::Validate;

use crate::domain::ConfigError;
use crate::infra::observability::LogFormat;

const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:3000";

/// Downstream calls made one after another by a create request: the good
/// middleware, the primary coin, then the supported coins as one batch.
const SEQUENTIAL_DOWNSTREAM_CALLS: u64 = 3;

/// Runtime configuration, read from the environment (and `.env`).
#[derive(Debug, Clone, Validate)]
pub struct AppConfig {
    #[validate(url)]
    pub good_middleware_url: String,
    #[validate(url)]
    pub coininfo_url: String,
    pub server_addr: SocketAddr,
    /// Per-call timeout towards the good middleware and coininfo.
    #[validate(range(min = 1, max = 300))]
    pub downstream_timeout_secs: u64,
    /// Whole-request timeout enforced by the HTTP layer. Must exceed the
    /// downstream budget so a slow service fails with its own error.
    #[validate(range(min = 1, max = 600))]
    pub request_timeout_secs: u64,
    #[validate(range(min = 1))]
    pub rate_limit_rps: u32,
    #[validate(range(min = 1))]
    pub rate_limit_burst: u32,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
        };

        let config = Self {
            good_middleware_url: required("GOOD_MIDDLEWARE_URL")?,
            coininfo_url: required("COININFO_URL")?,
            server_addr: parse_or(&lookup, "SERVER_ADDR", DEFAULT_SERVER_ADDR.parse().ok())?,
            downstream_timeout_secs: parse_or(&lookup, "DOWNSTREAM_TIMEOUT_SECS", Some(10))?,
            request_timeout_secs: parse_or(&lookup, "REQUEST_TIMEOUT_SECS", Some(35))?,
            rate_limit_rps: parse_or(&lookup, "RATE_LIMIT_RPS", Some(10))?,
            rate_limit_burst: parse_or(&lookup, "RATE_LIMIT_BURST", Some(20))?,
            log_format: lookup("LOG_FORMAT")
                .map(|v| LogFormat::parse(&v))
                .unwrap_or_default(),
        };

        config.validate()?;
        config.check_timeout_budget()?;
        Ok(config)
    }

    fn check_timeout_budget(&self) -> Result<(), ConfigError> {
        let budget = SEQUENTIAL_DOWNSTREAM_CALLS * self.downstream_timeout_secs;
        if self.request_timeout_secs <= budget {
            return Err(ConfigError::InvalidValue {
                key: "REQUEST_TIMEOUT_SECS".to_string(),
                message: format!(
                    "must be greater than {budget} \
                     ({SEQUENTIAL_DOWNSTREAM_CALLS} x DOWNSTREAM_TIMEOUT_SECS)"
                ),
            });
        }
        Ok(())
    }

    pub fn downstream_timeout(&self) -> Duration {
        Duration::from_secs(self.downstream_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: Option<T>) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        }),
        None => default.ok_or_else(|| ConfigError::MissingEnvVar(key.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn invalid_key(err: ConfigError) -> String {
        match err {
            ConfigError::InvalidValue { key, .. } => key,
            other => panic!("expected an invalid value, got {other:?}"),
        }
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("GOOD_MIDDLEWARE_URL", "http://good-middleware:50030"),
        ("COININFO_URL", "http://sphinx-coininfo:50170"),
    ];

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&REQUIRED)).unwrap();

        assert_eq!(config.good_middleware_url, "http://good-middleware:50030");
        assert_eq!(config.server_addr, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.downstream_timeout(), Duration::from_secs(10));
        assert_eq!(config.request_timeout(), Duration::from_secs(35));
        assert_eq!(config.rate_limit_rps, 10);
        assert_eq!(config.rate_limit_burst, 20);
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_overrides() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("SERVER_ADDR", "127.0.0.1:8080"),
            ("DOWNSTREAM_TIMEOUT_SECS", "3"),
            ("RATE_LIMIT_RPS", "50"),
            ("LOG_FORMAT", "json"),
        ]);

        let config = AppConfig::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(config.server_addr.port(), 8080);
        assert_eq!(config.downstream_timeout_secs, 3);
        assert_eq!(config.rate_limit_rps, 50);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_missing_required_var() {
        let err = AppConfig::from_lookup(lookup(&REQUIRED[..1])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "COININFO_URL"));
    }

    #[test]
    fn test_blank_required_var_is_missing() {
        let vars = [REQUIRED[0], ("COININFO_URL", "  ")];
        let err = AppConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(_)));
    }

    #[test]
    fn test_unparseable_value() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("REQUEST_TIMEOUT_SECS", "soon"));

        let err = AppConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert_eq!(invalid_key(err), "REQUEST_TIMEOUT_SECS");
    }

    #[test]
    fn test_invalid_url_rejected() {
        let vars = [REQUIRED[0], ("COININFO_URL", "not a url")];
        let err = AppConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert_eq!(invalid_key(err), "coininfo_url");
    }

    #[test]
    fn test_out_of_range_timeout_rejected() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("DOWNSTREAM_TIMEOUT_SECS", "0"));

        let err = AppConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_request_timeout_must_exceed_downstream_budget() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([("DOWNSTREAM_TIMEOUT_SECS", "10"), ("REQUEST_TIMEOUT_SECS", "30")]);

        let err = AppConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert_eq!(invalid_key(err), "REQUEST_TIMEOUT_SECS");
    }

    #[test]
    fn test_raised_downstream_timeout_needs_larger_request_timeout() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("DOWNSTREAM_TIMEOUT_SECS", "12"));
        assert!(AppConfig::from_lookup(lookup(&vars)).is_err());

        vars.push(("REQUEST_TIMEOUT_SECS", "37"));
        let config = AppConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.request_timeout(), Duration::from_secs(37));
    }
}
