// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Error types for the registry mirror

use thiserror::Error;

/// Main application error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network or IO error
    #[error("IO error")]
    Io(#[from] std::io::Error),

    /// Registry HTTP transport, status or body decoding error
    #[error("Registry request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Registry response body was not valid JSON of the expected shape
    #[error("Registry response decode error: {0}")]
    Json(#[from] serde_json::Error),

    /// Metrics encoding error
    #[error("Metrics error: {0}")]
    Metrics(String),

    /// Address parsing error
    #[error("Address parse error")]
    AddrParse(#[from] std::net::AddrParseError),
}

impl From<std::fmt::Error> for AppError {
    fn from(error: std::fmt::Error) -> Self {
        Self::Metrics(error.to_string())
    }
}

/// Convenient alias for Result with application error
pub type Result<T> = std::result::Result<T, AppError>;
