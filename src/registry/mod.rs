// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Remote registry access
//!
//! This module provides the client for the registry session server's HTTP
//! digest interface and the decoders that turn its raw publisher/subscriber
//! entries into domain records.

mod client;
mod decode;
mod types;

// Re-export public types and functions
pub use client::{RegistryEndpoint, RegistryRestClient};
pub use decode::{DATA_ID_SEPARATOR, decode_consumer, decode_provider, extract_service_name};
pub use types::{Consumer, Provider, RawRecord, RawRecordGroups, Service};
