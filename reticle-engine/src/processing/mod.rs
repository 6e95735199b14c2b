//! Per-batch detection processing

pub mod barcode;
pub mod multi;
pub mod prominent;

pub use barcode::BarcodeProcessor;
pub use multi::MultiObjectProcessor;
pub use prominent::ProminentObjectProcessor;

use crate::error::EngineError;
use reticle_core::{Detection, Frame};
use std::sync::Arc;
use tracing::warn;

/// Consumes completed detection batches from the scheduler and drives the
/// workflow. One processor instance per session, chosen by scan mode at
/// construction.
pub trait FrameResultProcessor: Send + Sync {
    /// Handle one completed detection batch.
    fn process_batch(&self, frame: Arc<Frame>, detections: Vec<Detection>);

    /// A detector failure is batch-scoped: logged and treated as zero
    /// detections so the workflow keeps scanning.
    fn on_detector_failure(&self, frame: Arc<Frame>, error: &EngineError) {
        warn!("Detection failed: {}", error);
        self.process_batch(frame, Vec::new());
    }

    /// Cancel any confirmation in progress. Called at session teardown.
    fn reset(&self);
}

/// Drop detections whose classification is the null category. Order is
/// preserved; with classification disabled the batch passes through
/// untouched.
pub(crate) fn filter_classified(
    detections: Vec<Detection>,
    classification_enabled: bool,
) -> Vec<Detection> {
    if !classification_enabled {
        return detections;
    }
    detections
        .into_iter()
        .filter(|d| d.has_known_classification())
        .collect()
}
