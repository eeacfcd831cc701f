use std::env;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set (see .env.example)")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub baas_url: String,
    pub baas_anon_key: String,
    pub host: String,
    pub port: u16,
    pub session_idle: Duration,
    pub baas_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as `from_env` with an injectable source, so tests never touch
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let baas_url = required("BAAS_URL")?;
        if !(baas_url.starts_with("http://") || baas_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                name: "BAAS_URL",
                value: baas_url,
            });
        }
        let baas_anon_key = required("BAAS_ANON_KEY")?;

        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = parse_or(&lookup, "PORT", 3000u16)?;
        let idle_minutes = parse_or(&lookup, "SESSION_IDLE_MINUTES", 60u64)?;
        let idle_secs = idle_minutes
            .checked_mul(60)
            .ok_or_else(|| ConfigError::Invalid {
                name: "SESSION_IDLE_MINUTES",
                value: idle_minutes.to_string(),
            })?;
        let timeout_secs = parse_or(&lookup, "BAAS_TIMEOUT_SECS", 15u64)?;

        Ok(AppConfig {
            baas_url: baas_url.trim_end_matches('/').to_string(),
            baas_anon_key,
            host,
            port,
            session_idle: Duration::from_secs(idle_secs),
            baas_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { name, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_only_required_values_are_set() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("BAAS_URL", "https://example.supabase.co/"),
            ("BAAS_ANON_KEY", "anon"),
        ]))
        .unwrap();
        assert_eq!(cfg.baas_url, "https://example.supabase.co");
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.session_idle, Duration::from_secs(3600));
        assert_eq!(cfg.baas_timeout, Duration::from_secs(15));
    }

    #[test]
    fn missing_key_is_reported_by_name() {
        let err = AppConfig::from_lookup(lookup_from(&[("BAAS_URL", "https://x.test")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Missing("BAAS_ANON_KEY"));
    }

    #[test]
    fn bad_port_is_invalid() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("BAAS_URL", "https://x.test"),
            ("BAAS_ANON_KEY", "anon"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                name: "PORT",
                value: "eighty".to_string()
            }
        );
    }

    #[test]
    fn url_without_scheme_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("BAAS_URL", "x.test"),
            ("BAAS_ANON_KEY", "anon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "BAAS_URL", .. }));
    }

    #[test]
    fn oversized_idle_minutes_are_invalid() {
        let huge = u64::MAX.to_string();
        let err = AppConfig::from_lookup(lookup_from(&[
            ("BAAS_URL", "https://x.test"),
            ("BAAS_ANON_KEY", "anon"),
            ("SESSION_IDLE_MINUTES", &huge),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                name: "SESSION_IDLE_MINUTES",
                value: huge
            }
        );
    }
}
