use std::env;
use std::str::FromStr;

use chrono::{TimeDelta, Utc};
use dotenvy::dotenv;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Runtime settings of the delivery system.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Pending requests each store mailbox holds before senders wait.
    pub mailbox_capacity: usize,
    /// Events each topic buffers for slow subscribers.
    pub event_capacity: usize,
    /// How long a payment keeps its restaurant promoted.
    pub promotion_days: i64,
    /// Fallback tracing filter when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: 32,
            event_capacity: 256,
            promotion_days: 7,
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Reads the process environment, loading `.env` first when present.
    ///
    /// Runs before tracing is set up, so it does not log.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Builds a config from an arbitrary variable source. Unset variables keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            mailbox_capacity: parse(&lookup, "MAILBOX_CAPACITY", defaults.mailbox_capacity)?,
            event_capacity: parse(&lookup, "EVENT_CAPACITY", defaults.event_capacity)?,
            promotion_days: parse(&lookup, "PROMOTION_DAYS", defaults.promotion_days)?,
            log_filter: lookup("LOG_FILTER").unwrap_or(defaults.log_filter),
        };

        // Zero-sized channels panic in tokio.
        for (var, value) in [
            ("MAILBOX_CAPACITY", config.mailbox_capacity),
            ("EVENT_CAPACITY", config.event_capacity),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid { var, reason: "must be greater than zero".into() });
            }
        }
        if config.promotion_days < 0 {
            return Err(ConfigError::Invalid {
                var: "PROMOTION_DAYS",
                reason: "must not be negative".into(),
            });
        }
        // The promotion end must be a representable timestamp.
        let promotion_end =
            TimeDelta::try_days(config.promotion_days).and_then(|period| Utc::now().checked_add_signed(period));
        if promotion_end.is_none() {
            return Err(ConfigError::Invalid {
                var: "PROMOTION_DAYS",
                reason: "is too large".into(),
            });
        }

        Ok(config)
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
