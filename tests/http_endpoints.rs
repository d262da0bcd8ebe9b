// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use registry_mirror::{
    AppState, Config, Consumer, MetricsRegistry, Provider, RegistryMirrorCache, Service,
    create_router,
};
use std::sync::Arc;
use tower::ServiceExt;

fn make_state() -> Arc<AppState> {
    Arc::new(AppState {
        config: Config::default(),
        cache: RegistryMirrorCache::new(),
        metrics: MetricsRegistry::new(),
    })
}

async fn get(state: Arc<AppState>, uri: &str) -> (StatusCode, String) {
    let app = create_router(state);
    let resp = app
        .oneshot(Request::get(uri).body(String::new()).unwrap())
        .await
        .unwrap();

    let status = resp.status();
    let body = String::from_utf8(
        resp.into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec(),
    )
    .unwrap();
    (status, body)
}

fn provider(service: &str, address: &str, port: u16) -> Provider {
    Provider {
        service_name: service.to_string(),
        app_name: "cart".to_string(),
        address: address.to_string(),
        port,
        ..Provider::default()
    }
}

// --- service directory ---

#[tokio::test]
async fn all_services_sorted_by_name() {
    let state = make_state();
    state
        .cache
        .add_service(&[
            Service::new("com.shop.Order"),
            Service::new("com.shop.Cart"),
        ])
        .await;

    let (status, body) = get(state, "/api/service/all").await;
    assert_eq!(status, StatusCode::OK);

    let services: serde_json::Value = serde_json::from_str(&body).unwrap();
    let names: Vec<&str> = services
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["serviceName"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["com.shop.Cart", "com.shop.Order"]);
}

#[tokio::test]
async fn query_services_filters_by_fragment() {
    let state = make_state();
    state
        .cache
        .add_service(&[
            Service::new("com.shop.Order"),
            Service::new("com.shop.Cart"),
            Service::new("com.billing.Invoice"),
        ])
        .await;

    let (_, body) = get(state.clone(), "/api/service/query/services?serviceName=shop").await;
    let services: Vec<Service> = serde_json::from_str(&body).unwrap();
    assert_eq!(services.len(), 2);

    let (_, body) = get(state, "/api/service/query/services?serviceName=").await;
    let services: Vec<Service> = serde_json::from_str(&body).unwrap();
    assert_eq!(services.len(), 3);
}

// --- providers / consumers ---

#[tokio::test]
async fn providers_for_known_service() {
    let state = make_state();
    state
        .cache
        .add_providers(
            "com.shop.Cart",
            Some(vec![provider("com.shop.Cart", "10.0.0.1", 12200)]),
        )
        .await;

    let (status, body) = get(state, "/api/service/query/providers?dataid=com.shop.Cart").await;
    assert_eq!(status, StatusCode::OK);

    let providers: Vec<Provider> = serde_json::from_str(&body).unwrap();
    assert_eq!(providers.len(), 1);
    assert_eq!(providers[0].address, "10.0.0.1");
    assert_eq!(providers[0].port, 12200);
}

#[tokio::test]
async fn unknown_service_returns_empty_lists() {
    let state = make_state();

    let (status, body) = get(state.clone(), "/api/service/query/providers?dataid=unknown").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");

    let (status, body) = get(state.clone(), "/api/service/query/consumers?dataid=unknown").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");

    let (status, body) = get(state, "/api/service/query/consumers").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");
}

#[tokio::test]
async fn consumers_for_known_service() {
    let state = make_state();
    state
        .cache
        .add_consumers(
            "com.shop.Cart",
            Some(vec![Consumer {
                service_name: "com.shop.Cart".to_string(),
                app_name: "web".to_string(),
                address: "10.0.0.9".to_string(),
                port: 0,
                ..Consumer::default()
            }]),
        )
        .await;

    let (_, body) = get(state, "/api/service/query/consumers?dataid=com.shop.Cart").await;
    let consumers: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(consumers[0]["appName"], "web");
    assert_eq!(consumers[0]["address"], "10.0.0.9");
}

// --- /metrics endpoint ---

#[tokio::test]
async fn metrics_returns_200_with_openmetrics_content_type() {
    let app = create_router(make_state());

    let resp = app
        .oneshot(Request::get("/metrics").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let ct = resp
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(
        ct.contains("openmetrics-text"),
        "Expected OpenMetrics content-type, got: {ct}"
    );
}

#[tokio::test]
async fn metrics_contains_registered_metric_names() {
    let state = make_state();
    state.metrics.record_fetch_error("publishers");

    let (_, body) = get(state, "/metrics").await;
    assert!(body.contains("registry_mirror_sync_passes"));
    assert!(body.contains("registry_mirror_services"));
    assert!(body.contains("registry_mirror_fetch_errors"));
    assert!(body.contains("endpoint=\"publishers\""));
}

// --- /health endpoint ---

#[tokio::test]
async fn health_unknown_before_first_sync() {
    let (status, body) = get(make_state(), "/health").await;
    assert_eq!(status, StatusCode::OK);

    let health: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(health["status"], "unknown");
    assert_eq!(health["registry"], "127.0.0.1:9603");
    assert!(!health["sync"]["has_successful_sync"].as_bool().unwrap());
}

#[tokio::test]
async fn health_degraded_when_only_failures() {
    let state = make_state();
    state.metrics.record_sync_failure();

    let (status, body) = get(state, "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let health: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(health["status"], "degraded");
}

#[tokio::test]
async fn health_healthy_after_sync_pass() {
    let state = make_state();
    state.cache.add_service(&[Service::new("svcA")]).await;
    state.metrics.record_sync_pass(0.1);
    state.metrics.record_sync_failure();

    let (status, body) = get(state, "/health").await;
    assert_eq!(status, StatusCode::OK);

    let health: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["services"], 1);
    assert_eq!(health["sync"]["passes"], 1);
}

// --- 404 for unknown routes ---

#[tokio::test]
async fn unknown_route_returns_404() {
    let (status, _) = get(make_state(), "/unknown").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
