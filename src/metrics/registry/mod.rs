// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Metrics registry and update logic

mod init;
mod sync;

pub use sync::SyncCounts;

use crate::metrics::labels::EndpointLabels;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct MetricsRegistry {
    registry: Arc<Mutex<Registry>>,
    // sync pass outcomes
    sync_passes: Counter,
    sync_skipped: Counter,
    sync_failures: Counter,
    fetch_errors: Family<EndpointLabels, Counter>,
    // timing
    sync_duration_milliseconds: Gauge,
    last_success_timestamp_seconds: Gauge,
    last_checksum: Gauge,
    // mirrored state
    services: Gauge,
    services_with_providers: Gauge,
    services_with_consumers: Gauge,
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}
