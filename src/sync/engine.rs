// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Checksum-gated full resync of the registry mirror

use std::collections::BTreeMap;
use std::time::Instant;

use futures_util::future::join;
use tokio::sync::Mutex;

use crate::cache::RegistryMirrorCache;
use crate::error::AppError;
use crate::metrics::{EndpointLabels, MetricsRegistry};
use crate::registry::{
    Consumer, Provider, RawRecordGroups, RegistryEndpoint, Service, decode_consumer,
    decode_provider, extract_service_name,
};

/// Summary of one full resync pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Data-info-ids returned by the registry
    pub data_ids: usize,
    /// Distinct services installed in the directory
    pub services: usize,
    /// Ids skipped because no service name could be derived
    pub malformed_ids: usize,
    /// Provider lists installed
    pub provider_lists: usize,
    /// Consumer lists installed
    pub consumer_lists: usize,
    /// Publisher/subscriber queries that failed
    pub failed_fetches: usize,
}

/// Result of a checksum-gated sync attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Checksum matched the last resync; nothing was fetched or changed
    Unchanged,
    /// Checksum changed (or was never seen) and a full resync ran
    Resynced(SyncReport),
    /// The checksum or the id list could not be fetched; the cache was left alone
    Failed,
}

/// Drives synchronization of a [`RegistryMirrorCache`] from a registry endpoint
///
/// The engine is the only writer of the cache.
pub struct SyncEngine<E> {
    endpoint: E,
    cache: RegistryMirrorCache,
    metrics: MetricsRegistry,
    last_checksum: Mutex<Option<i64>>,
}

impl<E: RegistryEndpoint> SyncEngine<E> {
    pub fn new(endpoint: E, cache: RegistryMirrorCache, metrics: MetricsRegistry) -> Self {
        Self {
            endpoint,
            cache,
            metrics,
            last_checksum: Mutex::new(None),
        }
    }

    pub fn cache(&self) -> &RegistryMirrorCache {
        &self.cache
    }

    /// Checksum of the last completed resync, if any
    pub async fn last_checksum(&self) -> Option<i64> {
        *self.last_checksum.lock().await
    }

    /// Runs a full resync only when the registry checksum has changed
    pub async fn sync_if_changed(&self) -> SyncOutcome {
        let checksum = match self.endpoint.checksum().await {
            Ok(checksum) => checksum,
            Err(e) => {
                tracing::warn!("Failed to fetch registry checksum: {}", e);
                self.metrics.record_fetch_error(EndpointLabels::CHECKSUM);
                self.metrics.record_sync_failure();
                return SyncOutcome::Failed;
            }
        };

        if self.last_checksum().await == Some(checksum) {
            tracing::trace!("Registry checksum {} unchanged, skipping resync", checksum);
            self.metrics.record_sync_skipped();
            return SyncOutcome::Unchanged;
        }

        tracing::debug!("Registry checksum changed to {}, resyncing", checksum);
        let Some(report) = self.run_full_resync().await else {
            return SyncOutcome::Failed;
        };
        self.record_checksum(checksum).await;
        SyncOutcome::Resynced(report)
    }

    /// Runs a full resync regardless of the checksum
    ///
    /// Fails without touching the cache only when the id list cannot be
    /// fetched. A failed checksum fetch still resyncs but leaves the gate
    /// unarmed, so the next [`sync_if_changed`](Self::sync_if_changed) resyncs
    /// again.
    pub async fn force_resync(&self) -> SyncOutcome {
        let checksum = self.endpoint.checksum().await;
        let Some(report) = self.run_full_resync().await else {
            return SyncOutcome::Failed;
        };
        match checksum {
            Ok(checksum) => self.record_checksum(checksum).await,
            Err(e) => {
                tracing::warn!("Failed to fetch registry checksum: {}", e);
                self.metrics.record_fetch_error(EndpointLabels::CHECKSUM);
            }
        }
        SyncOutcome::Resynced(report)
    }

    async fn record_checksum(&self, checksum: i64) {
        *self.last_checksum.lock().await = Some(checksum);
        self.metrics.set_last_checksum(checksum);
    }

    /// `None` when the id list could not be fetched; the mirror is kept as is
    async fn run_full_resync(&self) -> Option<SyncReport> {
        let start = Instant::now();
        let data_ids = match self.endpoint.try_list_all_data_ids().await {
            Ok(data_ids) => data_ids,
            Err(e) => {
                tracing::warn!("Failed to list registry data info ids: {}", e);
                self.metrics.record_fetch_error(EndpointLabels::DATA_IDS);
                self.metrics.record_sync_failure();
                return None;
            }
        };
        let report = self.refresh_all_session_data_by_data_info_ids(&data_ids).await;

        let duration = start.elapsed().as_secs_f64();
        self.metrics.record_sync_pass(duration);
        let (with_providers, with_consumers) = self.cache.list_counts().await;
        self.metrics.update_cache_sizes(
            self.cache.service_count().await,
            with_providers,
            with_consumers,
        );

        tracing::info!(
            "Resynced {} services from {} data ids in {:.3}s ({} malformed, {} failed fetches)",
            report.services,
            report.data_ids,
            duration,
            report.malformed_ids,
            report.failed_fetches
        );
        Some(report)
    }

    /// Replaces the mirrored state with what the registry reports for `data_ids`
    ///
    /// The directory is cleared and rebuilt first. Then, per id, the cached
    /// provider and consumer lists of its service are removed and refetched.
    /// A failed fetch leaves that list absent and does not stop the pass.
    pub async fn refresh_all_session_data_by_data_info_ids(
        &self,
        data_ids: &[String],
    ) -> SyncReport {
        let mut report = SyncReport {
            data_ids: data_ids.len(),
            ..SyncReport::default()
        };

        let current: Vec<Service> = self.cache.fetch_service().await.into_values().collect();
        if !current.is_empty() {
            self.cache.remove_service(&current).await;
        }

        let mut services: Vec<Service> = Vec::new();
        for data_info_id in data_ids {
            match extract_service_name(data_info_id) {
                Some(name) => {
                    if !services.iter().any(|s| s.service_name == name) {
                        services.push(Service::new(name));
                    }
                }
                None => {
                    tracing::debug!("Skipping malformed data info id '{}'", data_info_id);
                    report.malformed_ids += 1;
                }
            }
        }
        report.services = services.len();
        self.cache.add_service(&services).await;

        for data_info_id in data_ids {
            let Some(service_name) = extract_service_name(data_info_id) else {
                continue;
            };

            let consumers = self.cache.fetch_consumers_by_service(service_name).await;
            self.cache.remove_consumers(service_name, &consumers).await;
            let providers = self.cache.fetch_providers_by_service(service_name).await;
            self.cache.remove_providers(service_name, &providers).await;

            self.refresh_session_data(data_info_id, service_name, &mut report)
                .await;
        }

        report
    }

    async fn refresh_session_data(
        &self,
        data_info_id: &str,
        service_name: &str,
        report: &mut SyncReport,
    ) {
        let (subscribers, publishers) = join(
            self.endpoint.query_subscribers(data_info_id),
            self.endpoint.query_publishers(data_info_id),
        )
        .await;

        match subscribers {
            Ok(groups) => {
                report.consumer_lists += self.install_consumers(&groups, service_name).await;
            }
            Err(e) => {
                self.record_fetch_failure(EndpointLabels::SUBSCRIBERS, data_info_id, &e, report);
            }
        }

        match publishers {
            Ok(groups) => {
                report.provider_lists += self.install_providers(&groups, service_name).await;
            }
            Err(e) => {
                self.record_fetch_failure(EndpointLabels::PUBLISHERS, data_info_id, &e, report);
            }
        }
    }

    fn record_fetch_failure(
        &self,
        endpoint: &str,
        data_info_id: &str,
        error: &AppError,
        report: &mut SyncReport,
    ) {
        tracing::warn!(
            "Failed to query {} for data info id '{}': {}",
            endpoint,
            data_info_id,
            error
        );
        self.metrics.record_fetch_error(endpoint);
        report.failed_fetches += 1;
    }

    async fn install_consumers(&self, groups: &RawRecordGroups, fallback: &str) -> usize {
        let mut by_service: BTreeMap<String, Vec<Consumer>> = BTreeMap::new();
        for raw in groups.values().flatten() {
            let mut consumer = decode_consumer(raw);
            if consumer.service_name.is_empty() {
                consumer.service_name = fallback.to_string();
            } else if consumer.service_name != fallback {
                tracing::debug!(
                    "Installing consumer of service '{}' fetched for service '{}'",
                    consumer.service_name,
                    fallback
                );
            }
            by_service
                .entry(consumer.service_name.clone())
                .or_default()
                .push(consumer);
        }

        let installed = by_service.len();
        for (service_name, consumers) in by_service {
            tracing::debug!(
                "Installing {} consumers for service '{}'",
                consumers.len(),
                service_name
            );
            self.cache.add_consumers(&service_name, Some(consumers)).await;
        }
        installed
    }

    async fn install_providers(&self, groups: &RawRecordGroups, fallback: &str) -> usize {
        let mut by_service: BTreeMap<String, Vec<Provider>> = BTreeMap::new();
        for raw in groups.values().flatten() {
            let mut provider = decode_provider(raw);
            if provider.service_name.is_empty() {
                provider.service_name = fallback.to_string();
            } else if provider.service_name != fallback {
                tracing::debug!(
                    "Installing provider of service '{}' fetched for service '{}'",
                    provider.service_name,
                    fallback
                );
            }
            by_service
                .entry(provider.service_name.clone())
                .or_default()
                .push(provider);
        }

        let installed = by_service.len();
        for (service_name, providers) in by_service {
            tracing::debug!(
                "Installing {} providers for service '{}'",
                providers.len(),
                service_name
            );
            self.cache.add_providers(&service_name, Some(providers)).await;
        }
        installed
    }
}
