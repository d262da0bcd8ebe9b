// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for convenient use.
//! Users of the library can import everything they need with:
//!
//! ```rust
//! use registry_mirror::prelude::*;
//! ```

// Core types
pub use crate::config::{Config, RegistryAddress};
pub use crate::error::{AppError, Result};

// Mirror state
pub use crate::cache::RegistryMirrorCache;
pub use crate::metrics::MetricsRegistry;

// Registry access
pub use crate::registry::{
    Consumer, Provider, RawRecord, RawRecordGroups, RegistryEndpoint, RegistryRestClient, Service,
};

// Synchronization
pub use crate::sync::{SyncEngine, SyncOutcome, SyncReport, start_sync_loop};
