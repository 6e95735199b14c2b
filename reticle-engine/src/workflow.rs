//! Workflow state shared between detection logic and the session owner

use crate::dedup::SearchDedupGate;
use crate::error::Result;
use crate::search::Match;
use parking_lot::{Mutex, RwLock};
use reticle_core::{Candidate, Detection};
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, warn};

const EVENT_BUFFER_SIZE: usize = 64;

/// State set of the scan workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    NotStarted,
    Detecting,
    Detected,
    Confirming,
    Confirmed,
    Searching,
    Searched,
}

impl WorkflowState {
    /// States that keep the remembered confirmed candidate alive
    fn retains_confirmed_candidate(&self) -> bool {
        matches!(
            self,
            WorkflowState::Confirmed | WorkflowState::Searching | WorkflowState::Searched
        )
    }
}

/// Events published to the session owner
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Manual-search mode: a candidate was confirmed and waits for a
    /// user-initiated search trigger
    SearchRequired(Candidate),
    /// A search completed for the currently confirmed candidate
    Searched {
        candidate: Candidate,
        matches: Vec<Match>,
    },
    /// Barcode mode: a barcode met the size requirement
    BarcodeDetected(Detection),
}

/// Central workflow state holder. Exactly one per scan session; processors
/// and the session owner both drive it, subscribers observe it.
pub struct WorkflowModel {
    auto_search_enabled: bool,
    state_tx: watch::Sender<WorkflowState>,
    event_tx: broadcast::Sender<SessionEvent>,
    search_tx: mpsc::UnboundedSender<Candidate>,
    search_rx: Mutex<Option<mpsc::UnboundedReceiver<Candidate>>>,
    confirmed: Mutex<Option<Candidate>>,
    dedup: SearchDedupGate,
    live: RwLock<bool>,
}

impl WorkflowModel {
    pub fn new(auto_search_enabled: bool) -> Self {
        let (state_tx, _) = watch::channel(WorkflowState::NotStarted);
        let (event_tx, _) = broadcast::channel(EVENT_BUFFER_SIZE);
        let (search_tx, search_rx) = mpsc::unbounded_channel();
        Self {
            auto_search_enabled,
            state_tx,
            event_tx,
            search_tx,
            search_rx: Mutex::new(Some(search_rx)),
            confirmed: Mutex::new(None),
            dedup: SearchDedupGate::new(),
            live: RwLock::new(false),
        }
    }

    pub fn state(&self) -> WorkflowState {
        *self.state_tx.borrow()
    }

    /// Receiver for the published workflow state; one notification per
    /// actual transition.
    pub fn watch_state(&self) -> watch::Receiver<WorkflowState> {
        self.state_tx.subscribe()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    /// Hand the search-request queue to the session's dispatch loop. Yields
    /// `Some` exactly once.
    pub fn take_search_requests(&self) -> Option<mpsc::UnboundedReceiver<Candidate>> {
        self.search_rx.lock().take()
    }

    /// Set a new workflow state. Setting the current value again is a no-op
    /// with no notification. Leaving the confirmed/searching/searched family
    /// drops the remembered confirmed candidate so it cannot be reused
    /// stale.
    pub fn set_state(&self, state: WorkflowState) {
        if !state.retains_confirmed_candidate() {
            *self.confirmed.lock() = None;
        }
        self.state_tx.send_if_modified(|current| {
            if *current == state {
                return false;
            }
            debug!(from = ?*current, to = ?state, "Workflow state change");
            *current = state;
            true
        });
    }

    /// Per-frame report from a processor: `candidate` is selected with the
    /// given confirmation progress. Progress of exactly 1 confirms the
    /// candidate and, in auto-search mode, dispatches the search
    /// immediately; manual mode parks in `Confirmed` until
    /// [`on_search_clicked`](Self::on_search_clicked).
    pub fn confirming_object(&self, candidate: Candidate, progress: f32) {
        if progress == 1.0 {
            *self.confirmed.lock() = Some(candidate.clone());
            if self.auto_search_enabled {
                self.set_state(WorkflowState::Searching);
                self.trigger_search(candidate);
            } else {
                // The candidate stays selected frame after frame once
                // confirmed; announce it only on the actual transition.
                let newly_confirmed = self.state() != WorkflowState::Confirmed;
                self.set_state(WorkflowState::Confirmed);
                if newly_confirmed {
                    let _ = self.event_tx.send(SessionEvent::SearchRequired(candidate));
                }
            }
        } else {
            self.set_state(WorkflowState::Confirming);
        }
    }

    /// User-initiated search trigger for the confirmed candidate (manual
    /// mode). No-op when nothing is confirmed.
    pub fn on_search_clicked(&self) {
        let candidate = self.confirmed.lock().clone();
        let Some(candidate) = candidate else {
            return;
        };
        self.set_state(WorkflowState::Searching);
        self.trigger_search(candidate);
    }

    /// Queue a search for `candidate` unless one is already in flight for
    /// its identity. Untracked candidates cannot be deduplicated and always
    /// dispatch.
    fn trigger_search(&self, candidate: Candidate) {
        if let Some(id) = candidate.track_id() {
            if !self.dedup.try_acquire(id) {
                // Already in searching.
                debug!(%id, "Search already in flight, skipping duplicate");
                return;
            }
        }
        if self.search_tx.send(candidate).is_err() {
            warn!("Search dispatcher is gone, dropping search request");
        }
    }

    /// Completion callback from the search dispatch loop. A failed search
    /// arrives here as well and degrades to an empty match list. Results for
    /// a candidate that is no longer the confirmed one are discarded, only
    /// releasing the dedup entry so a future attempt is possible.
    pub fn on_search_completed(&self, candidate: Candidate, outcome: Result<Vec<Match>>) {
        let matches = match outcome {
            Ok(matches) => matches,
            Err(e) => {
                warn!("Search failed for {:?}: {}", candidate.track_id(), e);
                Vec::new()
            }
        };

        if let Some(id) = candidate.track_id() {
            self.dedup.release(id);
        }

        let is_current = self
            .confirmed
            .lock()
            .as_ref()
            .map(|c| c.same_identity(&candidate))
            .unwrap_or(false);
        if !is_current {
            // Drops the search result from the object that has lost focus.
            debug!(
                "Discarding stale search result for {:?}",
                candidate.track_id()
            );
            return;
        }

        self.set_state(WorkflowState::Searched);
        let _ = self.event_tx.send(SessionEvent::Searched { candidate, matches });
    }

    /// Barcode mode: publish a barcode that met the size requirement.
    pub fn barcode_detected(&self, detection: Detection) {
        self.set_state(WorkflowState::Detected);
        let _ = self.event_tx.send(SessionEvent::BarcodeDetected(detection));
    }

    /// Mark the frame source live. Clears outstanding search ids left over
    /// from a previous activation.
    pub fn mark_live(&self) {
        *self.live.write() = true;
        self.dedup.clear();
    }

    pub fn mark_frozen(&self) {
        *self.live.write() = false;
    }

    /// Processors drop detection batches while the source is frozen.
    pub fn is_live(&self) -> bool {
        *self.live.read()
    }

    pub fn confirmed_candidate(&self) -> Option<Candidate> {
        self.confirmed.lock().clone()
    }

    #[cfg(test)]
    pub(crate) fn search_outstanding(&self, id: reticle_core::TrackId) -> bool {
        self.dedup.is_outstanding(id)
    }
}
