// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Domain records mirrored from the registry

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

/// A service known to the registry, keyed by name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub service_name: String,
}

impl Service {
    #[must_use]
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }
}

/// A process publishing a service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub service_name: String,
    pub app_name: String,
    pub address: String,
    pub port: u16,
    pub parameters: BTreeMap<String, String>,
}

/// A process subscribed to a service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consumer {
    pub service_name: String,
    pub app_name: String,
    pub address: String,
    pub port: u16,
    pub parameters: BTreeMap<String, String>,
}

/// Raw publisher/subscriber entry as returned by the digest API
///
/// Wraps an arbitrary JSON value. Accessors never fail: a missing key, a value
/// of the wrong type, or a non-object entry all read as "absent".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(Value);

impl RawRecord {
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    fn object(&self) -> Option<&Map<String, Value>> {
        self.0.as_object()
    }

    /// String value of `key`; empty when absent, blank or not a string
    #[must_use]
    pub fn get_string(&self, key: &str) -> String {
        self.object()
            .and_then(|map| map.get(key))
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_default()
    }

    /// Nested object under `key`, if it is one
    #[must_use]
    pub fn get_object(&self, key: &str) -> Option<RawRecord> {
        self.object()
            .and_then(|map| map.get(key))
            .filter(|v| v.is_object())
            .map(|v| RawRecord(v.clone()))
    }

    /// Port number under `key`, accepting both JSON numbers and numeric strings
    ///
    /// Blank, negative, out of range or unparsable values read as 0.
    #[must_use]
    pub fn get_port(&self, key: &str) -> u16 {
        match self.object().and_then(|map| map.get(key)) {
            Some(Value::Number(n)) => n.as_u64().and_then(|p| u16::try_from(p).ok()).unwrap_or(0),
            Some(Value::String(s)) => parse_port(s),
            _ => 0,
        }
    }

    /// Flattens the object under `key` into string pairs
    ///
    /// Strings are kept as-is, other scalars are rendered as JSON text, nulls
    /// are dropped.
    #[must_use]
    pub fn get_string_map(&self, key: &str) -> BTreeMap<String, String> {
        let Some(map) = self
            .object()
            .and_then(|map| map.get(key))
            .and_then(Value::as_object)
        else {
            return BTreeMap::new();
        };

        map.iter()
            .filter_map(|(k, v)| match v {
                Value::Null => None,
                Value::String(s) => Some((k.clone(), s.clone())),
                other => Some((k.clone(), other.to_string())),
            })
            .collect()
    }
}

/// Publisher/subscriber query result: opaque group key to raw entries
pub type RawRecordGroups = HashMap<String, Vec<RawRecord>>;

pub(crate) fn parse_port(s: &str) -> u16 {
    s.trim().parse::<u16>().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_string_defaults() {
        let record = RawRecord::new(json!({
            "appName": "shop",
            "blank": "   ",
            "number": 42
        }));

        assert_eq!(record.get_string("appName"), "shop");
        assert_eq!(record.get_string("blank"), "");
        assert_eq!(record.get_string("number"), "");
        assert_eq!(record.get_string("missing"), "");
    }

    #[test]
    fn test_non_object_record_reads_as_empty() {
        let record = RawRecord::new(json!(["not", "an", "object"]));
        assert_eq!(record.get_string("appName"), "");
        assert!(record.get_object("sourceAddress").is_none());
        assert_eq!(record.get_port("port"), 0);
        assert!(record.get_string_map("attributes").is_empty());
    }

    #[test]
    fn test_get_port_accepts_numbers_and_strings() {
        let record = RawRecord::new(json!({
            "a": 12200,
            "b": "8080",
            "c": "",
            "d": -1,
            "e": 70000,
            "f": "x"
        }));

        assert_eq!(record.get_port("a"), 12200);
        assert_eq!(record.get_port("b"), 8080);
        assert_eq!(record.get_port("c"), 0);
        assert_eq!(record.get_port("d"), 0);
        assert_eq!(record.get_port("e"), 0);
        assert_eq!(record.get_port("f"), 0);
    }

    #[test]
    fn test_get_string_map_flattens_scalars() {
        let record = RawRecord::new(json!({
            "attributes": {
                "version": "1.0",
                "weight": 100,
                "dynamic": true,
                "dropped": null
            }
        }));

        let params = record.get_string_map("attributes");
        assert_eq!(params.len(), 3);
        assert_eq!(params["version"], "1.0");
        assert_eq!(params["weight"], "100");
        assert_eq!(params["dynamic"], "true");
    }

    #[test]
    fn test_provider_serializes_camel_case() {
        let provider = Provider {
            service_name: "com.shop.Cart".to_string(),
            app_name: "cart".to_string(),
            address: "10.0.0.1".to_string(),
            port: 12200,
            parameters: BTreeMap::new(),
        };

        let json = serde_json::to_value(&provider).unwrap();
        assert_eq!(json["serviceName"], "com.shop.Cart");
        assert_eq!(json["appName"], "cart");
        assert_eq!(json["port"], 12200);
    }
}
