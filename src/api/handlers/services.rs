//! Read path over the mirrored registry

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::AppState;
use crate::registry::{Consumer, Provider, Service};

#[derive(Debug, Default, Deserialize)]
pub struct ServiceNameQuery {
    #[serde(default, rename = "serviceName")]
    pub service_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DataIdQuery {
    #[serde(default)]
    pub dataid: Option<String>,
}

async fn sorted_services(state: &AppState) -> Vec<Service> {
    let mut services: Vec<Service> = state.cache.fetch_service().await.into_values().collect();
    services.sort_by(|a, b| a.service_name.cmp(&b.service_name));
    services
}

/// GET /api/service/all
pub async fn all_services(State(state): State<Arc<AppState>>) -> Json<Vec<Service>> {
    Json(sorted_services(&state).await)
}

/// GET /api/service/query/services?serviceName=
///
/// Services whose name contains the query; all services when it is blank.
pub async fn query_services(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ServiceNameQuery>,
) -> Json<Vec<Service>> {
    let services = sorted_services(&state).await;
    let needle = query.service_name.unwrap_or_default();
    let needle = needle.trim();
    if needle.is_empty() {
        return Json(services);
    }

    Json(
        services
            .into_iter()
            .filter(|s| s.service_name.contains(needle))
            .collect(),
    )
}

/// GET /api/service/query/providers?dataid=
pub async fn query_providers(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DataIdQuery>,
) -> Json<Vec<Provider>> {
    let dataid = query.dataid.unwrap_or_default();
    Json(state.cache.fetch_providers_by_service(&dataid).await)
}

/// GET /api/service/query/consumers?dataid=
pub async fn query_consumers(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DataIdQuery>,
) -> Json<Vec<Consumer>> {
    let dataid = query.dataid.unwrap_or_default();
    Json(state.cache.fetch_consumers_by_service(&dataid).await)
}
