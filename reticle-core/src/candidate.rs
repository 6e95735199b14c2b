//! Candidates under confirmation

use crate::detection::{Detection, TrackId};
use crate::frame::Frame;
use crate::geometry::RectF;
use std::sync::Arc;

/// Largest thumbnail width handed to the search layer; wider crops are
/// scaled down proportionally.
pub const MAX_THUMBNAIL_WIDTH: f32 = 640.0;

/// A detection promoted to "being evaluated for confirmation". Retains its
/// originating frame so the search layer can crop a thumbnail after the
/// frame stream has moved on.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub detection: Detection,
    pub frame: Arc<Frame>,
}

impl Candidate {
    pub fn new(detection: Detection, frame: Arc<Frame>) -> Self {
        Self { detection, frame }
    }

    pub fn track_id(&self) -> Option<TrackId> {
        self.detection.track_id
    }

    pub fn bounding_box(&self) -> RectF {
        self.detection.bounding_box
    }

    /// Identity comparison used by the stale-result rule: candidates are the
    /// same object iff their tracking identities match.
    pub fn same_identity(&self, other: &Candidate) -> bool {
        self.track_id() == other.track_id()
    }

    /// The crop region for this candidate's thumbnail: the bounding box
    /// clamped to the frame, then scaled down if wider than
    /// [`MAX_THUMBNAIL_WIDTH`]. Returns the clamped source rect and the
    /// target size in pixels.
    pub fn thumbnail_region(&self) -> (RectF, (u32, u32)) {
        let frame_rect = RectF::new(0.0, 0.0, self.frame.width as f32, self.frame.height as f32);
        let source = self
            .detection
            .bounding_box
            .intersection(&frame_rect)
            .unwrap_or(RectF::new(0.0, 0.0, 0.0, 0.0));

        let (mut width, mut height) = (source.width(), source.height());
        if width > MAX_THUMBNAIL_WIDTH {
            height = MAX_THUMBNAIL_WIDTH / width * height;
            width = MAX_THUMBNAIL_WIDTH;
        }
        (source, (width as u32, height as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Rotation;
    use bytes::Bytes;

    fn frame(width: u32, height: u32) -> Arc<Frame> {
        Arc::new(Frame::new(Bytes::new(), width, height, Rotation::Deg0).unwrap())
    }

    fn candidate(bbox: RectF, track_id: Option<TrackId>) -> Candidate {
        Candidate::new(Detection::new(bbox, track_id, 0), frame(1280, 720))
    }

    #[test]
    fn test_same_identity_by_track_id() {
        let bbox_a = RectF::new(0.0, 0.0, 10.0, 10.0);
        let bbox_b = RectF::new(50.0, 50.0, 80.0, 80.0);
        let a = candidate(bbox_a, Some(TrackId(3)));
        let b = candidate(bbox_b, Some(TrackId(3)));
        let c = candidate(bbox_a, Some(TrackId(9)));
        assert!(a.same_identity(&b));
        assert!(!a.same_identity(&c));
    }

    #[test]
    fn test_same_identity_untracked() {
        let bbox = RectF::new(0.0, 0.0, 10.0, 10.0);
        assert!(candidate(bbox, None).same_identity(&candidate(bbox, None)));
        assert!(!candidate(bbox, None).same_identity(&candidate(bbox, Some(TrackId(1)))));
    }

    #[test]
    fn test_thumbnail_region_clamped_to_frame() {
        // Box hangs off the right edge of a 1280x720 frame.
        let c = candidate(RectF::new(1200.0, 100.0, 1400.0, 300.0), None);
        let (source, (w, h)) = c.thumbnail_region();
        assert_eq!(source, RectF::new(1200.0, 100.0, 1280.0, 300.0));
        assert_eq!((w, h), (80, 200));
    }

    #[test]
    fn test_thumbnail_region_scales_wide_crops() {
        let c = candidate(RectF::new(0.0, 0.0, 1280.0, 640.0), None);
        let (_, (w, h)) = c.thumbnail_region();
        assert_eq!(w, 640);
        assert_eq!(h, 320);
    }
}
