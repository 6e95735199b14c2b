//! Search deduplication gate

use parking_lot::Mutex;
use reticle_core::TrackId;
use std::collections::HashSet;

/// Tracks which identities currently have an outstanding search request so
/// a given identity is submitted to the backend at most once while in
/// flight.
#[derive(Default)]
pub struct SearchDedupGate {
    outstanding: Mutex<HashSet<TrackId>>,
}

impl SearchDedupGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `id` for a new search. Returns `false` if a search for `id` is
    /// already in flight.
    pub fn try_acquire(&self, id: TrackId) -> bool {
        self.outstanding.lock().insert(id)
    }

    /// Release `id` once its search completed (success, failure, or stale
    /// discard), allowing a future attempt.
    pub fn release(&self, id: TrackId) {
        self.outstanding.lock().remove(&id);
    }

    pub fn is_outstanding(&self, id: TrackId) -> bool {
        self.outstanding.lock().contains(&id)
    }

    /// Drop all outstanding entries. Called when a session goes live so a
    /// previous session's in-flight ids cannot block new searches.
    pub fn clear(&self) {
        self.outstanding.lock().clear();
    }
}
