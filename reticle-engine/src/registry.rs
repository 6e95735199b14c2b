//! Per-track ephemeral state for live multi-object scenes

use parking_lot::Mutex;
use reticle_core::TrackId;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

/// How long a newly tracked object's entrance animation runs
const DOT_ANIMATION_MS: u64 = 500;

/// One-shot entrance animation for a newly tracked object. Rendering is
/// external; the registry only owns the animation's clock.
#[derive(Debug)]
pub struct DotAnimation {
    started_at: Instant,
    duration: Duration,
    cancelled: bool,
}

impl DotAnimation {
    fn start() -> Self {
        Self {
            started_at: Instant::now(),
            duration: Duration::from_millis(DOT_ANIMATION_MS),
            cancelled: false,
        }
    }

    /// Animation progress in [0, 1]; a cancelled animation reports 0.
    pub fn progress(&self) -> f32 {
        if self.cancelled {
            return 0.0;
        }
        (self.started_at.elapsed().as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }
}

struct TrackEntry {
    dot: DotAnimation,
}

/// Maps live tracking identities to per-track ephemeral state. Entries are
/// created the first time an identity is seen and torn down the moment it is
/// absent from a processed frame's detection set; a later re-appearance is a
/// new entry, so the entrance animation plays again.
#[derive(Default)]
pub struct TrackRegistry {
    entries: Mutex<HashMap<TrackId, TrackEntry>>,
}

impl TrackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile the registry against the identities present in the current
    /// frame. Lost tracks are cancelled and removed; new tracks get an entry
    /// with a fresh entrance animation. Returns the identities that appeared.
    pub fn sync(&self, live_ids: &[TrackId]) -> Vec<TrackId> {
        let mut entries = self.entries.lock();

        let removed: Vec<TrackId> = entries
            .keys()
            .filter(|id| !live_ids.contains(id))
            .copied()
            .collect();
        for id in &removed {
            if let Some(mut entry) = entries.remove(id) {
                entry.dot.cancel();
            }
        }

        let mut appeared = Vec::new();
        for id in live_ids {
            if !entries.contains_key(id) {
                entries.insert(
                    *id,
                    TrackEntry {
                        dot: DotAnimation::start(),
                    },
                );
                appeared.push(*id);
            }
        }
        appeared
    }

    pub fn contains(&self, id: TrackId) -> bool {
        self.entries.lock().contains_key(&id)
    }

    /// Entrance animation progress for a live track
    pub fn dot_progress(&self, id: TrackId) -> Option<f32> {
        self.entries.lock().get(&id).map(|e| e.dot.progress())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        let mut entries = self.entries.lock();
        for entry in entries.values_mut() {
            entry.dot.cancel();
        }
        entries.clear();
    }
}
