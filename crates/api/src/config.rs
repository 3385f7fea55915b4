//! Process configuration read from the environment.

use std::net::SocketAddr;

use thiserror::Error;

pub const BIND_ADDR_ENV: &str = "LEDGERDESK_BIND_ADDR";
pub const SEED_ENV: &str = "LEDGERDESK_SEED";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5005";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: {value:?} is not a socket address")]
    InvalidBindAddr { var: &'static str, value: String },

    #[error("{var}: {value:?} is not a boolean (expected true/false)")]
    InvalidBool { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    /// Load the sample books at startup.
    pub seed_sample_data: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5005)),
            seed_sample_data: true,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source; unset variables take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_raw = lookup(BIND_ADDR_ENV).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr {
                var: BIND_ADDR_ENV,
                value: bind_raw.clone(),
            })?;

        let seed_sample_data = match lookup(SEED_ENV) {
            None => true,
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::InvalidBool {
                var: SEED_ENV,
                value: raw,
            })?,
        };

        Ok(Self {
            bind_addr,
            seed_sample_data,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
