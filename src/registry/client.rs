// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Registry digest API client

use std::future::Future;
use std::time::Duration;

use serde_json::Value;

use crate::config::RegistryAddress;
use crate::error::Result;

use super::types::{RawRecord, RawRecordGroups};

const DATA_PREFIX: &str = "digest";
const QUERY_DATA_INFO_IDS: &str = "getDataInfoIdList";
const QUERY_CHECK_SUM: &str = "checkSumDataInfoIdList";
const QUERY_PUB_DATA: &str = "pub/data/query";
const QUERY_SUB_DATA: &str = "sub/data/query";

/// Queries the sync engine issues against the registry
///
/// `RegistryRestClient` is the HTTP implementation; tests substitute in-memory
/// fakes.
pub trait RegistryEndpoint: Send + Sync {
    /// All data-info-ids known to the registry
    ///
    /// Failures are logged and reported as an empty list.
    fn list_all_data_ids(&self) -> impl Future<Output = Vec<String>> + Send;

    /// All data-info-ids known to the registry, surfacing transport and
    /// decode failures
    fn try_list_all_data_ids(&self) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Digest of the full data-info-id set
    fn checksum(&self) -> impl Future<Output = Result<i64>> + Send;

    /// Publishers registered for one data-info-id, grouped by registry key
    fn query_publishers(
        &self,
        data_info_id: &str,
    ) -> impl Future<Output = Result<RawRecordGroups>> + Send;

    /// Subscribers registered for one data-info-id, grouped by registry key
    fn query_subscribers(
        &self,
        data_info_id: &str,
    ) -> impl Future<Output = Result<RawRecordGroups>> + Send;
}

/// HTTP client for the registry session server's digest interface
#[derive(Clone)]
pub struct RegistryRestClient {
    http: reqwest::Client,
    base_url: String,
}

impl RegistryRestClient {
    /// Creates a client for `address` with a per-request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(address: &RegistryAddress, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: address.base_url(),
        })
    }

    /// Creates a client from an already configured `reqwest::Client`
    #[must_use]
    pub fn with_http_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    fn request_url(&self, resource: &str) -> String {
        format!("{}/{DATA_PREFIX}/{resource}", self.base_url)
    }

    async fn get_json(&self, url: &str, query: Option<(&str, &str)>) -> Result<Value> {
        tracing::trace!("GET {}", url);
        let mut request = self.http.get(url);
        if let Some(pair) = query {
            request = request.query(&[pair]);
        }

        let response = request.send().await?.error_for_status()?;
        let body = response.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&body)?)
    }

    async fn query_records(&self, resource: &str, data_info_id: &str) -> Result<RawRecordGroups> {
        let url = self.request_url(resource);
        let body = self
            .get_json(&url, Some(("dataInfoId", data_info_id)))
            .await?;
        Ok(parse_record_groups(body))
    }
}

impl RegistryEndpoint for RegistryRestClient {
    async fn list_all_data_ids(&self) -> Vec<String> {
        match self.try_list_all_data_ids().await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::error!(
                    "Failed to sync all dataInfoIds from session, query url [{}]: {}",
                    self.request_url(QUERY_DATA_INFO_IDS),
                    e
                );
                Vec::new()
            }
        }
    }

    async fn try_list_all_data_ids(&self) -> Result<Vec<String>> {
        let url = self.request_url(QUERY_DATA_INFO_IDS);
        let body = self.get_json(&url, None).await?;
        Ok(parse_data_ids(body)?)
    }

    async fn checksum(&self) -> Result<i64> {
        let url = self.request_url(QUERY_CHECK_SUM);
        let body = self.get_json(&url, None).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn query_publishers(&self, data_info_id: &str) -> Result<RawRecordGroups> {
        self.query_records(QUERY_PUB_DATA, data_info_id).await
    }

    async fn query_subscribers(&self, data_info_id: &str) -> Result<RawRecordGroups> {
        self.query_records(QUERY_SUB_DATA, data_info_id).await
    }
}

/// `null` is an empty list; anything else must be an array of strings
fn parse_data_ids(body: Value) -> serde_json::Result<Vec<String>> {
    if body.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(body)
}

/// Lenient conversion of a publisher/subscriber body
///
/// A `null` or non-object body is "no data". Groups whose value is not an
/// array are skipped.
fn parse_record_groups(body: Value) -> RawRecordGroups {
    let Value::Object(map) = body else {
        return RawRecordGroups::new();
    };

    map.into_iter()
        .filter_map(|(key, value)| match value {
            Value::Array(items) => Some((key, items.into_iter().map(RawRecord::new).collect())),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> RegistryRestClient {
        let address = RegistryAddress {
            host: "10.0.0.9".to_string(),
            port: 9603,
        };
        RegistryRestClient::new(&address, Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_request_urls() {
        let c = client();
        assert_eq!(
            c.request_url(QUERY_DATA_INFO_IDS),
            "http://10.0.0.9:9603/digest/getDataInfoIdList"
        );
        assert_eq!(
            c.request_url(QUERY_CHECK_SUM),
            "http://10.0.0.9:9603/digest/checkSumDataInfoIdList"
        );
        assert_eq!(
            c.request_url(QUERY_PUB_DATA),
            "http://10.0.0.9:9603/digest/pub/data/query"
        );
        assert_eq!(
            c.request_url(QUERY_SUB_DATA),
            "http://10.0.0.9:9603/digest/sub/data/query"
        );
    }

    #[test]
    fn test_with_http_client_strips_trailing_slash() {
        let c = RegistryRestClient::with_http_client(reqwest::Client::new(), "http://h:1/");
        assert_eq!(c.request_url(QUERY_CHECK_SUM), "http://h:1/digest/checkSumDataInfoIdList");
    }

    #[test]
    fn test_parse_data_ids() {
        assert!(parse_data_ids(Value::Null).unwrap().is_empty());
        assert_eq!(
            parse_data_ids(json!(["a#1", "b#2"])).unwrap(),
            vec!["a#1".to_string(), "b#2".to_string()]
        );
        assert!(parse_data_ids(json!({"a": 1})).is_err());
    }

    #[test]
    fn test_parse_record_groups() {
        let groups = parse_record_groups(json!({
            "session-1": [{ "appName": "a" }, { "appName": "b" }],
            "session-2": [],
            "broken": "not-an-array"
        }));

        assert_eq!(groups.len(), 2);
        assert_eq!(groups["session-1"].len(), 2);
        assert!(groups["session-2"].is_empty());
        assert!(!groups.contains_key("broken"));
    }

    #[test]
    fn test_parse_record_groups_null_body_is_empty() {
        assert!(parse_record_groups(Value::Null).is_empty());
        assert!(parse_record_groups(json!([1, 2])).is_empty());
    }

    #[tokio::test]
    async fn test_list_all_data_ids_unreachable_returns_empty() {
        // Bind then drop to get a port nothing listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let c = RegistryRestClient::with_http_client(
            reqwest::Client::builder()
                .timeout(Duration::from_millis(500))
                .build()
                .unwrap(),
            format!("http://127.0.0.1:{port}"),
        );
        assert!(c.list_all_data_ids().await.is_empty());
        assert!(c.try_list_all_data_ids().await.is_err());
        assert!(c.checksum().await.is_err());
    }
}
