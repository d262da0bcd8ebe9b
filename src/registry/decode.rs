// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Decoding of raw digest entries into provider/consumer records
//!
//! The registry reports a process location in one of two shapes depending on
//! its version: a flat `processId` token of the form `host:port`, or a nested
//! `sourceAddress` object with `ipAddress` and `port` fields. Both are handled
//! here. Decoding never fails; unreadable fields fall back to empty/zero.

use std::collections::BTreeMap;

use super::types::{Consumer, Provider, RawRecord, parse_port};

pub(crate) const APP_NAME_KEY: &str = "appName";
pub(crate) const DATA_ID_KEY: &str = "dataId";
pub(crate) const PROCESS_ID_KEY: &str = "processId";
pub(crate) const SOURCE_ADDRESS_KEY: &str = "sourceAddress";
pub(crate) const IP_ADDRESS_KEY: &str = "ipAddress";
pub(crate) const PORT_KEY: &str = "port";
pub(crate) const ATTRIBUTES_KEY: &str = "attributes";

/// Separator between the service name and the rest of a data-info-id
pub const DATA_ID_SEPARATOR: char = '#';

/// Fields shared by providers and consumers
#[derive(Debug, Default, PartialEq, Eq)]
struct DecodedRecord {
    service_name: String,
    app_name: String,
    address: String,
    port: u16,
    parameters: BTreeMap<String, String>,
}

/// Where a record's network location was found
#[derive(Debug, PartialEq, Eq)]
enum Location {
    ProcessId { address: String, port: u16 },
    SourceAddress { address: String, port: u16 },
    Unknown,
}

fn locate(raw: &RawRecord) -> Location {
    let process_id = raw.get_string(PROCESS_ID_KEY);
    if process_id.contains(':') {
        let mut parts = process_id.split(':');
        let address = parts.next().unwrap_or_default().to_string();
        let port = parts.next().map(parse_port).unwrap_or(0);
        return Location::ProcessId { address, port };
    }

    match raw.get_object(SOURCE_ADDRESS_KEY) {
        Some(source) => Location::SourceAddress {
            address: source.get_string(IP_ADDRESS_KEY),
            port: source.get_port(PORT_KEY),
        },
        None => Location::Unknown,
    }
}

fn decode(raw: &RawRecord) -> DecodedRecord {
    let (address, port) = match locate(raw) {
        Location::ProcessId { address, port } | Location::SourceAddress { address, port } => {
            (address, port)
        }
        Location::Unknown => (String::new(), 0),
    };

    DecodedRecord {
        service_name: raw.get_string(DATA_ID_KEY),
        app_name: raw.get_string(APP_NAME_KEY),
        address,
        port,
        parameters: raw.get_string_map(ATTRIBUTES_KEY),
    }
}

/// Decodes a raw publisher entry
#[must_use]
pub fn decode_provider(raw: &RawRecord) -> Provider {
    let d = decode(raw);
    Provider {
        service_name: d.service_name,
        app_name: d.app_name,
        address: d.address,
        port: d.port,
        parameters: d.parameters,
    }
}

/// Decodes a raw subscriber entry
#[must_use]
pub fn decode_consumer(raw: &RawRecord) -> Consumer {
    let d = decode(raw);
    Consumer {
        service_name: d.service_name,
        app_name: d.app_name,
        address: d.address,
        port: d.port,
        parameters: d.parameters,
    }
}

/// Extracts the service name from a data-info-id
///
/// Returns `None` for blank ids and ids without a separator.
#[must_use]
pub fn extract_service_name(data_info_id: &str) -> Option<&str> {
    if data_info_id.trim().is_empty() {
        return None;
    }
    data_info_id
        .split_once(DATA_ID_SEPARATOR)
        .map(|(service, _)| service)
        .filter(|service| !service.trim().is_empty())
}
