// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Prometheus metrics for the registry mirror
//!
//! Tracks sync pass outcomes, per-endpoint fetch failures and the size of the
//! mirrored state.

mod labels;
mod registry;

/// Labels for per-endpoint metrics
pub use labels::EndpointLabels;

/// Prometheus metrics registry
pub use registry::{MetricsRegistry, SyncCounts};
