//! Detections and tracking identities

use crate::geometry::RectF;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Detector-assigned identity linking detections of the same physical object
/// across frames. Detections without one (single-shot results) carry `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackId(pub u64);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "track#{}", self.0)
    }
}

/// Classification attached to a detection when the detector runs with
/// classification enabled. The label `"unknown"` is the detector's null
/// category and is filtered out by the processors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: String,
    pub confidence: f32,
}

impl Classification {
    pub const UNKNOWN_LABEL: &'static str = "unknown";

    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.label == Self::UNKNOWN_LABEL
    }
}

/// A single detection within a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Bounding box in frame-relative coordinates
    pub bounding_box: RectF,
    pub track_id: Option<TrackId>,
    pub classification: Option<Classification>,
    /// Position of this detection within its batch
    pub frame_index: usize,
}

impl Detection {
    pub fn new(bounding_box: RectF, track_id: Option<TrackId>, frame_index: usize) -> Self {
        Self {
            bounding_box,
            track_id,
            classification: None,
            frame_index,
        }
    }

    pub fn with_classification(mut self, classification: Classification) -> Self {
        self.classification = Some(classification);
        self
    }

    /// True when classification is present and not the null category
    pub fn has_known_classification(&self) -> bool {
        self.classification
            .as_ref()
            .map(|c| !c.is_unknown())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_id_display() {
        assert_eq!(TrackId(7).to_string(), "track#7");
    }

    #[test]
    fn test_classification_unknown() {
        assert!(Classification::new("unknown", 0.9).is_unknown());
        assert!(!Classification::new("shoe", 0.9).is_unknown());
    }

    #[test]
    fn test_detection_known_classification() {
        let bbox = RectF::new(0.0, 0.0, 10.0, 10.0);
        let det = Detection::new(bbox, Some(TrackId(1)), 0);
        assert!(!det.has_known_classification());

        let det = det.with_classification(Classification::new("shoe", 0.8));
        assert!(det.has_known_classification());

        let det = Detection::new(bbox, None, 1)
            .with_classification(Classification::new("unknown", 0.2));
        assert!(!det.has_known_classification());
    }
}
