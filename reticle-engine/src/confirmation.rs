//! Dwell-time object confirmation
//!
//! Converts "held in view" into a confirmation progress value in [0, 1].
//! The dwell window restarts whenever the tracked identity changes and the
//! progress clamps at exactly 1.0 once the window elapses, so a single
//! authoritative "done" reading exists for the workflow to act on.

use parking_lot::Mutex;
use reticle_core::TrackId;
use std::time::Duration;
use tokio::time::Instant;

struct DwellState {
    /// `None` while idle; `Some(id)` while confirming, where `id` is the
    /// candidate's tracking identity (absent for single-shot detections).
    tracked: Option<Option<TrackId>>,
    started_at: Instant,
}

/// Controls the progress of object confirmation before the workflow acts on
/// the detected object.
pub struct ConfirmationController {
    duration: Duration,
    state: Mutex<DwellState>,
}

impl ConfirmationController {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            state: Mutex::new(DwellState {
                tracked: None,
                started_at: Instant::now(),
            }),
        }
    }

    /// Start or continue confirming `track_id`. A repeated call with the
    /// identity already under confirmation is a no-op; a different identity
    /// resets and restarts the dwell window.
    pub fn confirming(&self, track_id: Option<TrackId>) {
        let mut state = self.state.lock();
        if state.tracked == Some(track_id) {
            // Already in confirming.
            return;
        }
        state.tracked = Some(track_id);
        state.started_at = Instant::now();
    }

    /// Confirmation progress in [0, 1]; exactly 1.0 once the dwell window
    /// has elapsed, 0.0 while idle.
    pub fn progress(&self) -> f32 {
        let state = self.state.lock();
        if state.tracked.is_none() {
            return 0.0;
        }
        let elapsed = state.started_at.elapsed();
        if elapsed >= self.duration {
            1.0
        } else {
            (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.progress() == 1.0
    }

    /// Cancel the dwell window and clear the tracked identity.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.tracked = None;
    }

    /// The identity currently under confirmation, if any.
    pub fn tracked_id(&self) -> Option<Option<TrackId>> {
        self.state.lock().tracked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::advance;

    const DWELL: Duration = Duration::from_millis(500);

    #[tokio::test(start_paused = true)]
    async fn test_progress_idle_is_zero() {
        let controller = ConfirmationController::new(DWELL);
        assert_eq!(controller.progress(), 0.0);
        assert!(!controller.is_confirmed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_advances_linearly() {
        let controller = ConfirmationController::new(DWELL);
        controller.confirming(Some(TrackId(7)));
        assert_eq!(controller.progress(), 0.0);

        advance(Duration::from_millis(250)).await;
        let progress = controller.progress();
        assert!((progress - 0.5).abs() < 0.01, "progress was {progress}");
        assert!(!controller.is_confirmed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_clamps_at_exactly_one() {
        let controller = ConfirmationController::new(DWELL);
        controller.confirming(Some(TrackId(7)));

        advance(Duration::from_millis(600)).await;
        assert_eq!(controller.progress(), 1.0);
        assert!(controller.is_confirmed());

        // Further time passing is a no-op once confirmed.
        advance(Duration::from_millis(600)).await;
        assert_eq!(controller.progress(), 1.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_monotonic_for_fixed_identity() {
        let controller = ConfirmationController::new(DWELL);
        controller.confirming(Some(TrackId(7)));

        let mut last = controller.progress();
        for _ in 0..10 {
            advance(Duration::from_millis(75)).await;
            controller.confirming(Some(TrackId(7)));
            let progress = controller.progress();
            assert!(progress >= last);
            last = progress;
        }
        assert_eq!(last, 1.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_identity_switch_resets() {
        let controller = ConfirmationController::new(DWELL);
        controller.confirming(Some(TrackId(1)));
        advance(Duration::from_millis(400)).await;
        assert!(controller.progress() > 0.7);

        controller.confirming(Some(TrackId(2)));
        assert_eq!(controller.progress(), 0.0);

        // The new identity gets a full dwell window.
        advance(Duration::from_millis(400)).await;
        assert!(!controller.is_confirmed());
        advance(Duration::from_millis(100)).await;
        assert!(controller.is_confirmed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_identity_does_not_reset() {
        let controller = ConfirmationController::new(DWELL);
        controller.confirming(Some(TrackId(1)));
        advance(Duration::from_millis(300)).await;
        controller.confirming(Some(TrackId(1)));
        advance(Duration::from_millis(200)).await;
        assert!(controller.is_confirmed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_untracked_candidates_share_identity() {
        let controller = ConfirmationController::new(DWELL);
        controller.confirming(None);
        advance(Duration::from_millis(300)).await;
        controller.confirming(None);
        advance(Duration::from_millis(200)).await;
        assert!(controller.is_confirmed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tracked_to_untracked_resets() {
        let controller = ConfirmationController::new(DWELL);
        controller.confirming(Some(TrackId(1)));
        advance(Duration::from_millis(400)).await;

        controller.confirming(None);
        assert_eq!(controller.progress(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_clears_identity_and_progress() {
        let controller = ConfirmationController::new(DWELL);
        controller.confirming(Some(TrackId(1)));
        advance(Duration::from_millis(600)).await;
        assert!(controller.is_confirmed());

        controller.reset();
        assert_eq!(controller.progress(), 0.0);
        assert_eq!(controller.tracked_id(), None);

        // Confirming the same identity after a reset starts a fresh window.
        controller.confirming(Some(TrackId(1)));
        assert_eq!(controller.progress(), 0.0);
    }
}
