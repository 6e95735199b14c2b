//! Frame-local candidate selection
//!
//! Stateless geometric rules for picking which detection, if any, the user
//! is aiming at. Persistence of the same selected object across frames is
//! the confirmation controller's job, keyed by tracking identity.

use reticle_core::geometry::{PointF, RectF};
use reticle_core::Detection;

/// Multi-object rule: the first detection in input order whose bounding-box
/// center lies within `radius` of `target`. Input order is the tie-break;
/// there is no distance-based re-ranking.
pub fn select_closest<'a>(
    detections: &'a [Detection],
    target: PointF,
    radius: f32,
) -> Option<&'a Detection> {
    detections
        .iter()
        .find(|d| d.bounding_box.center().distance_to(&target) < radius)
}

/// Prominent-object rule: the single best detection is selected iff its box
/// intersects the fixed reticle rectangle.
pub fn overlaps_reticle(detection: &Detection, reticle: &RectF) -> bool {
    detection.bounding_box.intersects(reticle)
}

/// Barcode rule: the first detection whose box contains the target point.
pub fn contains_target<'a>(detections: &'a [Detection], target: PointF) -> Option<&'a Detection> {
    detections.iter().find(|d| d.bounding_box.contains(target))
}
