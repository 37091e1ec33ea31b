//! Shared render input store.
//!
//! The store publishes immutable [`RenderData`] snapshots behind an
//! `ArcSwap`, so a read is a single atomic pointer load and request
//! handlers never take a lock. Updates are serialized through a mutex:
//! each one clones the current snapshot, overlays the changed fields and
//! publishes the result in one swap.
//!
//! During a reload cycle that updates fields in separate steps, a read
//! between two steps can pair a new value of one field with an old value
//! of another. Every individual snapshot is still internally consistent,
//! and the first read after the final step sees the complete set.

use crate::render::data::{RenderData, RenderDataUpdate};
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::sync::Arc;

/// Lock-free reads, serialized partial updates.
pub struct RenderDataStore {
    current: ArcSwap<RenderData>,
    write: Mutex<()>,
}

impl RenderDataStore {
    /// Create a store holding an initial snapshot.
    pub fn new(initial: RenderData) -> Self {
        Self {
            current: ArcSwap::from_pointee(initial),
            write: Mutex::new(()),
        }
    }

    /// The current snapshot.
    ///
    /// Never blocks. The returned `Arc` keeps this snapshot alive even if
    /// an update lands immediately afterwards, so an in-flight render is
    /// never pulled out from under its inputs.
    pub fn read(&self) -> Arc<RenderData> {
        self.current.load_full()
    }

    /// Apply a partial update.
    ///
    /// Fields not set in `update` keep their current value. Concurrent
    /// updates are applied one at a time; readers observe either the
    /// previous or the new snapshot, never a half-written one.
    pub fn update(&self, update: RenderDataUpdate) {
        let _guard = self.write.lock();
        let mut next = RenderData::clone(&self.current.load());
        if let Some(template) = update.template {
            next.template = template;
        }
        if let Some(manifest) = update.manifest {
            next.manifest = manifest;
        }
        if let Some(bundle) = update.bundle {
            next.bundle = bundle;
        }
        self.current.store(Arc::new(next));
    }
}
