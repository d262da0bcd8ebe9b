// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! # Registry Mirror
//!
//! Dashboard backend that mirrors a remote service registry into memory.
//!
//! The registry's digest HTTP interface is polled on a fixed interval. A cheap
//! checksum decides whether anything changed; when it did, the service
//! directory and every service's provider and consumer lists are refetched and
//! installed into a concurrently readable cache.
//!
//! ## Main modules
//! - `api`: HTTP read API, health and metrics handlers
//! - `cache`: the in-memory registry mirror
//! - `config`: configuration management
//! - `error`: error types
//! - `metrics`: Prometheus metrics registry
//! - `registry`: digest API client and record decoders
//! - `sync`: sync engine and background loop
//! - `prelude`: commonly used types and traits

mod api;
mod cache;
mod config;
mod error;
mod metrics;
mod registry;
mod sync;
pub mod prelude;

// Re-export commonly used types
/// Application configuration
pub use config::{Config, RegistryAddress};

/// Application error and result type
pub use error::{AppError, Result};

/// HTTP API router and state
pub use api::{AppState, create_router};

/// Registry mirror cache
pub use cache::RegistryMirrorCache;

/// Metrics registry
pub use metrics::{EndpointLabels, MetricsRegistry, SyncCounts};

/// Registry client, records and decoders
pub use registry::{
    Consumer, DATA_ID_SEPARATOR, Provider, RawRecord, RawRecordGroups, RegistryEndpoint,
    RegistryRestClient, Service, decode_consumer, decode_provider, extract_service_name,
};

/// Sync engine and loop
pub use sync::{SyncEngine, SyncOutcome, SyncReport, start_sync_loop};
