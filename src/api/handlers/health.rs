use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::AppState;
use crate::metrics::SyncCounts;

/// Sync activity as seen by the health endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct SyncHealth {
    pub passes: u64,
    pub skipped: u64,
    pub failures: u64,
    pub has_successful_sync: bool,
}

/// Health check endpoint response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub registry: String,
    pub services: usize,
    pub sync: SyncHealth,
}

/// "unknown" before any tick, "degraded" while ticks fail without a single
/// successful one, "healthy" otherwise. A stale mirror still serves reads, so
/// failures after a success do not degrade.
fn sync_status(counts: SyncCounts) -> &'static str {
    let has_success = counts.passes + counts.skipped > 0;
    if has_success {
        "healthy"
    } else if counts.failures > 0 {
        "degraded"
    } else {
        "unknown"
    }
}

/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let counts = state.metrics.sync_counts();
    let status = sync_status(counts);

    let response = HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        registry: state.config.registry.to_string(),
        services: state.cache.service_count().await,
        sync: SyncHealth {
            passes: counts.passes,
            skipped: counts.skipped,
            failures: counts.failures,
            has_successful_sync: counts.passes + counts.skipped > 0,
        },
    };

    let code = if status == "degraded" {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };
    (code, Json(response))
}
