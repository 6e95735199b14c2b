//! Prominent-object mode: the detector supplies its single best detection
//! and selection is a geometric overlap test against the fixed reticle.

use crate::config::EngineConfig;
use crate::confirmation::ConfirmationController;
use crate::processing::{filter_classified, FrameResultProcessor};
use crate::selection;
use crate::workflow::{WorkflowModel, WorkflowState};
use reticle_core::{Candidate, Detection, Frame};
use std::sync::Arc;

/// Processor for prominent-object-only detection.
pub struct ProminentObjectProcessor {
    config: Arc<EngineConfig>,
    workflow: Arc<WorkflowModel>,
    confirmation: ConfirmationController,
}

impl ProminentObjectProcessor {
    pub fn new(config: Arc<EngineConfig>, workflow: Arc<WorkflowModel>) -> Self {
        let confirmation = ConfirmationController::new(config.confirmation_duration());
        Self {
            config,
            workflow,
            confirmation,
        }
    }

    pub fn confirmation_progress(&self) -> f32 {
        self.confirmation.progress()
    }
}

impl FrameResultProcessor for ProminentObjectProcessor {
    fn process_batch(&self, frame: Arc<Frame>, detections: Vec<Detection>) {
        if !self.workflow.is_live() {
            return;
        }

        let detections = filter_classified(detections, self.config.classification_enabled);
        if detections.is_empty() {
            self.confirmation.reset();
            self.workflow.set_state(WorkflowState::Detecting);
            return;
        }

        let object = &detections[0];
        let reticle = self.config.reticle_rect(&frame);
        if selection::overlaps_reticle(object, &reticle) {
            // User is confirming the object selection.
            self.confirmation.confirming(object.track_id);
            let candidate = Candidate::new(object.clone(), frame);
            self.workflow
                .confirming_object(candidate, self.confirmation.progress());
        } else {
            // Object detected but user doesn't want to pick this one.
            self.confirmation.reset();
            self.workflow.set_state(WorkflowState::Detected);
        }
    }

    fn reset(&self) {
        self.confirmation.reset();
    }
}
