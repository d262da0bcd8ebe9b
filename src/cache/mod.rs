// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! In-memory mirror of the registry
//!
//! Holds the service directory plus the provider and consumer lists of every
//! synchronized service. Each map sits behind its own lock; every operation
//! takes the lock for a single read or write, so a list is always installed
//! or removed as a whole and readers never see a half-built one.
//!
//! Lookups never fail. An unknown or blank service name yields an empty list.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::registry::{Consumer, Provider, Service};

/// Shared handle to the mirrored registry state
///
/// Cloning is cheap; all clones see the same maps.
#[derive(Clone, Default)]
pub struct RegistryMirrorCache {
    services: Arc<RwLock<HashMap<String, Service>>>,
    providers: Arc<RwLock<HashMap<String, Vec<Provider>>>>,
    consumers: Arc<RwLock<HashMap<String, Vec<Consumer>>>>,
}

impl RegistryMirrorCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the service directory
    pub async fn fetch_service(&self) -> HashMap<String, Service> {
        self.services.read().await.clone()
    }

    pub async fn fetch_providers_by_service(&self, service_name: &str) -> Vec<Provider> {
        fetch_list(&self.providers, service_name, "providers").await
    }

    pub async fn fetch_consumers_by_service(&self, service_name: &str) -> Vec<Consumer> {
        fetch_list(&self.consumers, service_name, "consumers").await
    }

    /// Upserts services by name
    pub async fn add_service(&self, services: &[Service]) {
        if services.is_empty() {
            return;
        }
        let mut map = self.services.write().await;
        for service in services {
            map.insert(service.service_name.clone(), service.clone());
        }
    }

    /// Replaces the provider list of `service_name`
    ///
    /// `None` and a blank name are no-ops. `Some(vec![])` is installed as an
    /// explicit empty list.
    pub async fn add_providers(&self, service_name: &str, providers: Option<Vec<Provider>>) {
        install_list(&self.providers, service_name, providers).await;
    }

    /// Replaces the consumer list of `service_name`, same rules as [`Self::add_providers`]
    pub async fn add_consumers(&self, service_name: &str, consumers: Option<Vec<Consumer>>) {
        install_list(&self.consumers, service_name, consumers).await;
    }

    pub async fn remove_service(&self, services: &[Service]) {
        if services.is_empty() {
            return;
        }
        let mut map = self.services.write().await;
        for service in services {
            map.remove(&service.service_name);
        }
    }

    /// Removes `providers` from the list of `service_name`
    ///
    /// The entry is dropped entirely once its list is empty, so removing the
    /// currently cached list returns the service to the "never synchronized"
    /// state.
    pub async fn remove_providers(&self, service_name: &str, providers: &[Provider]) {
        remove_from_list(&self.providers, service_name, providers).await;
    }

    /// Removes `consumers` from the list of `service_name`, same rules as
    /// [`Self::remove_providers`]
    pub async fn remove_consumers(&self, service_name: &str, consumers: &[Consumer]) {
        remove_from_list(&self.consumers, service_name, consumers).await;
    }

    pub async fn service_count(&self) -> usize {
        self.services.read().await.len()
    }

    /// Whether a provider list (possibly empty) is installed for `service_name`
    pub async fn has_providers(&self, service_name: &str) -> bool {
        self.providers.read().await.contains_key(service_name)
    }

    /// Whether a consumer list (possibly empty) is installed for `service_name`
    pub async fn has_consumers(&self, service_name: &str) -> bool {
        self.consumers.read().await.contains_key(service_name)
    }

    /// Number of services with a provider list and with a consumer list
    pub async fn list_counts(&self) -> (usize, usize) {
        let providers = self.providers.read().await.len();
        let consumers = self.consumers.read().await.len();
        (providers, consumers)
    }
}

async fn fetch_list<T: Clone>(
    map: &RwLock<HashMap<String, Vec<T>>>,
    service_name: &str,
    kind: &str,
) -> Vec<T> {
    if service_name.trim().is_empty() {
        tracing::debug!("Blank service name in {} lookup, returning empty list", kind);
        return Vec::new();
    }

    let map = map.read().await;
    if let Some(list) = map.get(service_name) {
        list.clone()
    } else {
        tracing::debug!(
            "No {} cached for service '{}', returning empty list",
            kind,
            service_name
        );
        Vec::new()
    }
}

async fn install_list<T>(
    map: &RwLock<HashMap<String, Vec<T>>>,
    service_name: &str,
    list: Option<Vec<T>>,
) {
    if service_name.trim().is_empty() {
        return;
    }
    let Some(list) = list else {
        return;
    };
    map.write().await.insert(service_name.to_string(), list);
}

async fn remove_from_list<T: PartialEq>(
    map: &RwLock<HashMap<String, Vec<T>>>,
    service_name: &str,
    items: &[T],
) {
    if service_name.trim().is_empty() {
        return;
    }

    let mut map = map.write().await;
    let Some(list) = map.get_mut(service_name) else {
        return;
    };
    list.retain(|entry| !items.contains(entry));
    if list.is_empty() {
        map.remove(service_name);
    }
}
