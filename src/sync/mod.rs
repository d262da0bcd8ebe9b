// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Registry synchronization
//!
//! Runs the [`SyncEngine`] on a fixed interval in a background task until the
//! shutdown signal fires.

mod engine;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::registry::RegistryEndpoint;

pub use engine::{SyncEngine, SyncOutcome, SyncReport};

/// Starts the background sync loop
///
/// The first pass runs immediately. Each pass finishes before the next tick is
/// taken, so passes never overlap; ticks missed while a slow pass runs are
/// delayed rather than bursted.
pub fn start_sync_loop<E>(
    mut shutdown_rx: watch::Receiver<bool>,
    engine: Arc<SyncEngine<E>>,
    interval: Duration,
) -> JoinHandle<()>
where
    E: RegistryEndpoint + 'static,
{
    tracing::info!("Starting background sync loop every {}s", interval.as_secs());

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {},
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        tracing::info!("Stopping sync loop");
                        break;
                    }
                    continue;
                }
            }

            match engine.sync_if_changed().await {
                SyncOutcome::Resynced(report) => {
                    tracing::trace!("Sync pass report: {:?}", report);
                }
                SyncOutcome::Unchanged => {}
                SyncOutcome::Failed => {
                    tracing::debug!("Sync tick failed, retrying on next tick");
                }
            }
        }
    })
}
