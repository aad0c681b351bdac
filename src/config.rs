//! Runtime settings read from the environment (and `.env`, loaded in `main`).
//!
//! | Variable               | Default                         |
//! |------------------------|---------------------------------|
//! | `DATABASE_URL`         | `sqlite://fleetdesk.db?mode=rwc` |
//! | `BIND_ADDRESS`         | `0.0.0.0:3000`                  |
//! | `DEFAULT_PAGE_SIZE`    | `10`                            |
//! | `MAX_PAGE_SIZE`        | `100`                           |
//! | `REQUEST_TIMEOUT_SECS` | `30`                            |

use std::{env, net::SocketAddr, str::FromStr, time::Duration};
use thiserror::Error;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://fleetdesk.db?mode=rwc";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} has an invalid value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
    #[error("DEFAULT_PAGE_SIZE ({default}) exceeds MAX_PAGE_SIZE ({max})")]
    PageSizes { default: u64, max: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationSettings {
    pub default_page_size: u64,
    pub max_page_size: u64,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub bind_address: SocketAddr,
    pub pagination: PaginationSettings,
    pub request_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_address: SocketAddr::from(([0, 0, 0, 0], 3000)),
            pagination: PaginationSettings::default(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl Settings {
    /// # Errors
    ///
    /// Returns the first variable that is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds settings from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// See [`Settings::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let bind_address = parse_var(&lookup, "BIND_ADDRESS", DEFAULT_BIND_ADDRESS)?;
        let default_page_size: u64 = parse_positive(&lookup, "DEFAULT_PAGE_SIZE", 10)?;
        let max_page_size: u64 = parse_positive(&lookup, "MAX_PAGE_SIZE", 100)?;
        let timeout_secs: u64 = parse_positive(&lookup, "REQUEST_TIMEOUT_SECS", 30)?;

        if default_page_size > max_page_size {
            return Err(ConfigError::PageSizes {
                default: default_page_size,
                max: max_page_size,
            });
        }

        Ok(Self {
            database_url,
            bind_address,
            pagination: PaginationSettings {
                default_page_size,
                max_page_size,
            },
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let value = lookup(name).unwrap_or_else(|| default.to_string());
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        name,
        value: value.clone(),
        reason: e.to_string(),
    })
}

fn parse_positive<F>(lookup: &F, name: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let parsed: u64 = parse_var(lookup, name, &default.to_string())?;
    if parsed == 0 {
        return Err(ConfigError::Invalid {
            name,
            value: parsed.to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(parsed)
}
