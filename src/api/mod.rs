// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! HTTP API module for the registry mirror
//!
//! Read-only endpoints over the mirrored registry state, plus health and
//! Prometheus metrics.
//!
//! # Endpoints
//! - `GET /api/service/all` - every mirrored service
//! - `GET /api/service/query/services?serviceName=` - services matching a name fragment
//! - `GET /api/service/query/providers?dataid=` - providers of a service
//! - `GET /api/service/query/consumers?dataid=` - consumers of a service
//! - `GET /health` - sync health
//! - `GET /metrics` - Prometheus metrics

pub mod handlers;

use axum::{Router, routing::get};
use std::sync::Arc;

use crate::cache::RegistryMirrorCache;
use crate::config::Config;
use crate::metrics::MetricsRegistry;

/// Application state shared with endpoints
pub struct AppState {
    pub config: Config,
    pub cache: RegistryMirrorCache,
    pub metrics: MetricsRegistry,
}

/// Creates the main Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/service/all", get(handlers::all_services))
        .route("/api/service/query/services", get(handlers::query_services))
        .route("/api/service/query/providers", get(handlers::query_providers))
        .route("/api/service/query/consumers", get(handlers::query_consumers))
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(state)
}
