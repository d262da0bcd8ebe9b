// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Configuration module for the registry mirror
//!
//! Loads and validates configuration from environment variables.

use std::fmt;
use std::time::Duration;

use crate::error::{AppError, Result};


/// Default configuration values
pub mod defaults {
    pub const SERVER_ADDR: &str = "0.0.0.0:8099";
    pub const REGISTRY_ADDRESS: &str = "127.0.0.1:9603";
    pub const SYNC_INTERVAL_SECS: u64 = 30;
    pub const REQUEST_TIMEOUT_SECS: u64 = 5;
}

/// Environment variable names used by the application
pub mod env_vars {
    pub const SERVER_ADDR: &str = "SERVER_ADDR";
    pub const REGISTRY_ADDRESS: &str = "REGISTRY_ADDRESS";
    pub const SYNC_INTERVAL_SECONDS: &str = "SYNC_INTERVAL_SECONDS";
    pub const REQUEST_TIMEOUT_SECONDS: &str = "REQUEST_TIMEOUT_SECONDS";
}

/// Address of the remote registry session server (`host:port`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryAddress {
    pub host: String,
    pub port: u16,
}

impl RegistryAddress {
    /// Parses a `host:port` pair
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] when the colon is missing, the host is blank
    /// or the port is not a valid number.
    pub fn parse(address: &str) -> Result<Self> {
        let address = address.trim();
        let Some((host, port)) = address.split_once(':') else {
            return Err(AppError::Config(format!(
                "Invalid registry address '{address}': expected 'host:port'"
            )));
        };

        if host.trim().is_empty() {
            return Err(AppError::Config(format!(
                "Invalid registry address '{address}': host cannot be empty"
            )));
        }

        let port = port.trim().parse::<u16>().map_err(|e| {
            AppError::Config(format!(
                "Invalid registry address '{address}': bad port ({e})"
            ))
        })?;

        Ok(Self {
            host: host.trim().to_string(),
            port,
        })
    }

    /// Base URL of the registry HTTP interface, without a trailing slash
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl fmt::Display for RegistryAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Application-wide configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: String,
    pub registry: RegistryAddress,
    pub sync_interval_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_addr: defaults::SERVER_ADDR.to_string(),
            registry: RegistryAddress {
                host: "127.0.0.1".to_string(),
                port: 9603,
            },
            sync_interval_secs: defaults::SYNC_INTERVAL_SECS,
            request_timeout_secs: defaults::REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// A malformed `REGISTRY_ADDRESS` is fatal and returned as [`AppError::Config`].
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let server_addr = std::env::var(env_vars::SERVER_ADDR)
            .unwrap_or_else(|_| defaults::SERVER_ADDR.to_string());

        let registry_address = std::env::var(env_vars::REGISTRY_ADDRESS)
            .unwrap_or_else(|_| defaults::REGISTRY_ADDRESS.to_string());
        let registry = RegistryAddress::parse(&registry_address)?;

        let sync_interval_secs =
            parse_secs(env_vars::SYNC_INTERVAL_SECONDS, defaults::SYNC_INTERVAL_SECS);
        let request_timeout_secs = parse_secs(
            env_vars::REQUEST_TIMEOUT_SECONDS,
            defaults::REQUEST_TIMEOUT_SECS,
        );

        Ok(Config {
            server_addr,
            registry,
            sync_interval_secs,
            request_timeout_secs,
        })
    }

    #[must_use]
    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_secs.max(1))
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

fn parse_secs(var: &str, default: u64) -> u64 {
    match std::env::var(var) {
        Ok(raw) => raw.trim().parse::<u64>().unwrap_or_else(|e| {
            tracing::warn!("Failed to parse {}='{}': {}. Using {}s.", var, raw, e, default);
            default
        }),
        Err(_) => default,
    }
}
