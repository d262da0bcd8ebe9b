// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Registry initialization and metric registration

use crate::metrics::labels::EndpointLabels;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::MetricsRegistry;

impl MetricsRegistry {
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let sync_passes = Counter::default();
        registry.register(
            "registry_mirror_sync_passes",
            "Full resync passes completed",
            sync_passes.clone(),
        );
        let sync_skipped = Counter::default();
        registry.register(
            "registry_mirror_sync_skipped",
            "Sync ticks skipped because the registry checksum was unchanged",
            sync_skipped.clone(),
        );
        let sync_failures = Counter::default();
        registry.register(
            "registry_mirror_sync_failures",
            "Sync ticks aborted because the checksum could not be fetched",
            sync_failures.clone(),
        );
        let fetch_errors = Family::<EndpointLabels, Counter>::default();
        registry.register(
            "registry_mirror_fetch_errors",
            "Failed requests per registry endpoint",
            fetch_errors.clone(),
        );

        let sync_duration_milliseconds = Gauge::default();
        registry.register(
            "registry_mirror_sync_duration_milliseconds",
            "Duration of the last full resync in milliseconds",
            sync_duration_milliseconds.clone(),
        );
        let last_success_timestamp_seconds = Gauge::default();
        registry.register(
            "registry_mirror_last_success_timestamp_seconds",
            "Unix timestamp of the last full resync",
            last_success_timestamp_seconds.clone(),
        );
        let last_checksum = Gauge::default();
        registry.register(
            "registry_mirror_last_checksum",
            "Registry data-info-id checksum seen by the last full resync",
            last_checksum.clone(),
        );

        let services = Gauge::default();
        registry.register(
            "registry_mirror_services",
            "Services in the mirrored directory",
            services.clone(),
        );
        let services_with_providers = Gauge::default();
        registry.register(
            "registry_mirror_services_with_providers",
            "Services with a cached provider list",
            services_with_providers.clone(),
        );
        let services_with_consumers = Gauge::default();
        registry.register(
            "registry_mirror_services_with_consumers",
            "Services with a cached consumer list",
            services_with_consumers.clone(),
        );

        Self {
            registry: Arc::new(Mutex::new(registry)),
            sync_passes,
            sync_skipped,
            sync_failures,
            fetch_errors,
            sync_duration_milliseconds,
            last_success_timestamp_seconds,
            last_checksum,
            services,
            services_with_providers,
            services_with_consumers,
        }
    }
}
