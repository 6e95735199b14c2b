//! Multi-object mode: all live detections are tracked, and the one whose
//! center sits within the selection radius of the reticle is confirmed.

use crate::config::EngineConfig;
use crate::confirmation::ConfirmationController;
use crate::processing::{filter_classified, FrameResultProcessor};
use crate::registry::TrackRegistry;
use crate::selection;
use crate::workflow::{WorkflowModel, WorkflowState};
use reticle_core::{Candidate, Detection, Frame, TrackId};
use std::sync::Arc;

/// Processor for live multi-object scenes.
pub struct MultiObjectProcessor {
    config: Arc<EngineConfig>,
    workflow: Arc<WorkflowModel>,
    confirmation: ConfirmationController,
    registry: TrackRegistry,
}

impl MultiObjectProcessor {
    pub fn new(config: Arc<EngineConfig>, workflow: Arc<WorkflowModel>) -> Self {
        let confirmation = ConfirmationController::new(config.confirmation_duration());
        Self {
            config,
            workflow,
            confirmation,
            registry: TrackRegistry::new(),
        }
    }

    /// Per-track entrance-animation state, for overlay consumers.
    pub fn registry(&self) -> &TrackRegistry {
        &self.registry
    }

    pub fn confirmation_progress(&self) -> f32 {
        self.confirmation.progress()
    }
}

impl FrameResultProcessor for MultiObjectProcessor {
    fn process_batch(&self, frame: Arc<Frame>, detections: Vec<Detection>) {
        if !self.workflow.is_live() {
            return;
        }

        let detections = filter_classified(detections, self.config.classification_enabled);

        // Tracks absent from this frame are torn down before selection so
        // their entrance animations stop with the track.
        let live_ids: Vec<TrackId> = detections.iter().filter_map(|d| d.track_id).collect();
        self.registry.sync(&live_ids);

        let target = self.config.reticle_center(&frame);
        let selected = selection::select_closest(
            &detections,
            target,
            self.config.selection_radius_px as f32,
        );

        match selected {
            Some(object) => {
                // Starts the object confirmation once an object is regarded
                // as selected.
                self.confirmation.confirming(object.track_id);
                let candidate = Candidate::new(object.clone(), frame);
                self.workflow
                    .confirming_object(candidate, self.confirmation.progress());
            }
            None => {
                self.confirmation.reset();
                self.workflow.set_state(if detections.is_empty() {
                    WorkflowState::Detecting
                } else {
                    WorkflowState::Detected
                });
            }
        }
    }

    fn reset(&self) {
        self.confirmation.reset();
        self.registry.clear();
    }
}
