//! Process configuration
//!
//! Loaded once at startup from the environment (after `.env`, if present).
//! Empty variables count as unset.

use jobgate_core::application::DEFAULT_PUBLISH_TIMEOUT;
use jobgate_core::domain::{CredentialSet, DomainError, ExchangeTarget};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_AMQP_URL: &str = "amqp://localhost/";
const DEFAULT_JOB_EXCHANGE: &str = "job";
const DEFAULT_JOB_ROUTING_KEY: &str = "";
const DEFAULT_API_KEYS: &str = "[]";
const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("Invalid value for {var}: {source}")]
    Domain {
        var: &'static str,
        #[source]
        source: DomainError,
    },
}

/// Gateway configuration
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub amqp_url: String,
    pub target: ExchangeTarget,
    pub credentials: CredentialSet,
    pub publish_timeout: Duration,
    pub body_limit: usize,
}

impl GatewayConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup` (injected for tests)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let port = parse_or("PORT", get("PORT"), DEFAULT_PORT)?;
        let publish_timeout_ms = parse_or(
            "PUBLISH_TIMEOUT_MS",
            get("PUBLISH_TIMEOUT_MS"),
            DEFAULT_PUBLISH_TIMEOUT.as_millis() as u64,
        )?;
        if publish_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                var: "PUBLISH_TIMEOUT_MS",
                reason: "must be greater than zero".to_string(),
            });
        }
        let body_limit = parse_or("BODY_LIMIT_BYTES", get("BODY_LIMIT_BYTES"), DEFAULT_BODY_LIMIT)?;

        let target = ExchangeTarget::new(
            get("JOB_EXCHANGE").unwrap_or_else(|| DEFAULT_JOB_EXCHANGE.to_string()),
            get("JOB_ROUTING_KEY").unwrap_or_else(|| DEFAULT_JOB_ROUTING_KEY.to_string()),
        )
        .map_err(|source| ConfigError::Domain {
            var: "JOB_EXCHANGE",
            source,
        })?;

        let credentials = CredentialSet::from_json(
            &get("API_KEYS").unwrap_or_else(|| DEFAULT_API_KEYS.to_string()),
        )
        .map_err(|source| ConfigError::Domain {
            var: "API_KEYS",
            source,
        })?;

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            amqp_url: get("AMQP_URL").unwrap_or_else(|| DEFAULT_AMQP_URL.to_string()),
            target,
            credentials,
            publish_timeout: Duration::from_millis(publish_timeout_ms),
            body_limit,
        })
    }
}

fn parse_or<T>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: format!("'{}' ({})", value, e),
        }),
        None => Ok(default),
    }
}
