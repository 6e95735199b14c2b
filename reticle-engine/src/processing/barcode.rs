//! Barcode mode: center-containment pick with an optional size gate instead
//! of a dwell timer.

use crate::config::EngineConfig;
use crate::processing::FrameResultProcessor;
use crate::selection;
use crate::workflow::{WorkflowModel, WorkflowState};
use reticle_core::{Detection, Frame};
use std::sync::Arc;
use tracing::debug;

/// Processor for barcode scanning.
pub struct BarcodeProcessor {
    config: Arc<EngineConfig>,
    workflow: Arc<WorkflowModel>,
}

impl BarcodeProcessor {
    pub fn new(config: Arc<EngineConfig>, workflow: Arc<WorkflowModel>) -> Self {
        Self { config, workflow }
    }

    /// Progress toward the minimum on-screen barcode size, in [0, 1]. Always
    /// 1 when the size check is disabled.
    fn size_progress(&self, frame: &Frame, barcode: &Detection) -> f32 {
        if !self.config.barcode_size_check_enabled {
            return 1.0;
        }
        let required_width = frame.width as f32 * self.config.barcode_size_fraction;
        (barcode.bounding_box.width() / required_width).min(1.0)
    }
}

impl FrameResultProcessor for BarcodeProcessor {
    fn process_batch(&self, frame: Arc<Frame>, detections: Vec<Detection>) {
        if !self.workflow.is_live() {
            return;
        }

        debug!(count = detections.len(), "Barcode result size");

        // Picks the barcode, if exists, that covers the center of the frame.
        let target = frame.center();
        match selection::contains_target(&detections, target) {
            None => {
                self.workflow.set_state(WorkflowState::Detecting);
            }
            Some(barcode) => {
                if self.size_progress(&frame, barcode) < 1.0 {
                    // Barcode in view is too small; prompt the user to move
                    // the camera closer.
                    self.workflow.set_state(WorkflowState::Confirming);
                } else {
                    self.workflow.barcode_detected(barcode.clone());
                }
            }
        }
    }

    fn reset(&self) {}
}
