// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

mod health;
mod metrics;
mod services;

pub use health::health_check;
pub use metrics::metrics_handler;
pub use services::{all_services, query_consumers, query_providers, query_services};
