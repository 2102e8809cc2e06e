//! Load controller: the one-time initial fetch into a `TaskStore`.
//!
//! NotStarted -> Loading -> Loaded | Failed
//!
//! - Only the first call fetches; later calls just clear `loading`.
//! - Empty document: seed batch of 20.
//! - Fetch or parse failure: error message recorded, fallback batch of 15.
//! - If the store was unmounted while the fetch was in flight, nothing is
//!   applied.

use crate::normalize::normalize;
use crate::raw::parse_document;
use crate::seed::{self, FALLBACK_BATCH, SEED_BATCH};
use crate::store::TaskStore;
use crate::time::Clock;
use anyhow::Result;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    NotStarted,
    Loading,
    Loaded,
    Failed,
}

/// What a call to `TaskStore::load` ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Fetched and applied; carries the final state.
    Applied(LoadState),
    /// A load was already attempted; no fetch was made.
    Skipped,
    /// The store was unmounted; the result was dropped.
    Cancelled,
}

/// Where the input document comes from.
pub trait TaskSource {
    /// Human-readable location, for logs.
    fn describe(&self) -> String;

    /// Fetch the raw document text.
    fn fetch(&self) -> impl Future<Output = Result<String>> + Send;
}

/// Liveness flag shared between a store and whoever may tear it down while a
/// load is in flight.
#[derive(Debug, Clone)]
pub struct MountHandle {
    mounted: Arc<AtomicBool>,
}

impl MountHandle {
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }
}

impl<C: Clock> TaskStore<C> {
    pub fn mount_handle(&self) -> MountHandle {
        MountHandle {
            mounted: Arc::clone(&self.mounted),
        }
    }

    /// Run the initial load from `source`.
    pub async fn load<S: TaskSource>(&mut self, source: &S) -> LoadOutcome {
        if !self.is_mounted() {
            return LoadOutcome::Cancelled;
        }
        if self.load_state != LoadState::NotStarted {
            debug!(state = ?self.load_state, "load already attempted; not fetching again");
            self.loading = false;
            return LoadOutcome::Skipped;
        }

        self.load_state = LoadState::Loading;
        self.loading = true;
        info!(source = %source.describe(), "loading tasks");

        let result = source.fetch().await.and_then(|text| parse_document(&text));

        if !self.is_mounted() {
            info!("store unmounted during load; result discarded");
            return LoadOutcome::Cancelled;
        }

        let now = self.now();
        let state = match result {
            Ok(raw) => {
                let mut tasks = normalize(&raw, now);
                if tasks.is_empty() {
                    info!(count = SEED_BATCH, "source empty; seeding synthetic tasks");
                    tasks = normalize(&seed::generate(SEED_BATCH), now);
                } else {
                    info!(count = tasks.len(), "tasks loaded");
                }
                self.error = None;
                self.replace_tasks(tasks);
                LoadState::Loaded
            }
            Err(e) => {
                let msg = format!("{e:#}");
                warn!(error = %msg, count = FALLBACK_BATCH, "load failed; using fallback tasks");
                self.error = Some(msg);
                self.replace_tasks(normalize(&seed::generate(FALLBACK_BATCH), now));
                LoadState::Failed
            }
        };

        self.load_state = state;
        self.loading = false;
        LoadOutcome::Applied(state)
    }
}
