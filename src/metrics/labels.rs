//! Label types for Prometheus metrics

use prometheus_client::encoding::EncodeLabelSet;

/// Registry digest endpoint a request was sent to
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct EndpointLabels {
    pub endpoint: String,
}

impl EndpointLabels {
    pub const DATA_IDS: &'static str = "data_ids";
    pub const CHECKSUM: &'static str = "checksum";
    pub const PUBLISHERS: &'static str = "publishers";
    pub const SUBSCRIBERS: &'static str = "subscribers";

    #[must_use]
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
        }
    }
}
