// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Sync bookkeeping helpers

use crate::error::Result;
use crate::metrics::labels::EndpointLabels;
use prometheus_client::encoding::text::encode;

use super::MetricsRegistry;

/// Totals used by the health endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncCounts {
    pub passes: u64,
    pub skipped: u64,
    pub failures: u64,
}

impl MetricsRegistry {
    pub async fn encode_metrics(&self) -> Result<String> {
        let registry = self.registry.lock().await;
        let mut buffer = String::new();
        encode(&mut buffer, &registry)?;
        Ok(buffer)
    }

    pub fn record_sync_pass(&self, duration_secs: f64) {
        self.sync_passes.inc();
        #[allow(clippy::cast_possible_truncation)]
        let millis = (duration_secs * 1000.0).round() as i64;
        self.sync_duration_milliseconds.set(millis);

        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        #[allow(clippy::cast_possible_wrap)]
        self.last_success_timestamp_seconds.set(now as i64);
    }

    pub fn record_sync_skipped(&self) {
        self.sync_skipped.inc();
    }

    pub fn record_sync_failure(&self) {
        self.sync_failures.inc();
    }

    pub fn record_fetch_error(&self, endpoint: &str) {
        self.fetch_errors
            .get_or_create(&EndpointLabels::new(endpoint))
            .inc();
    }

    pub fn set_last_checksum(&self, checksum: i64) {
        self.last_checksum.set(checksum);
    }

    pub fn update_cache_sizes(
        &self,
        services: usize,
        with_providers: usize,
        with_consumers: usize,
    ) {
        #[allow(clippy::cast_possible_wrap)]
        {
            self.services.set(services as i64);
            self.services_with_providers.set(with_providers as i64);
            self.services_with_consumers.set(with_consumers as i64);
        }
    }

    #[must_use]
    pub fn sync_counts(&self) -> SyncCounts {
        SyncCounts {
            passes: self.sync_passes.get(),
            skipped: self.sync_skipped.get(),
            failures: self.sync_failures.get(),
        }
    }

    #[must_use]
    pub fn fetch_error_count(&self, endpoint: &str) -> u64 {
        self.fetch_errors
            .get(&EndpointLabels::new(endpoint))
            .map_or(0, |counter| counter.get())
    }
}
