//! Captured camera frames

use crate::error::{Error, Result};
use bytes::Bytes;
use std::time::Instant;

/// Clockwise rotation applied by the capture surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn degrees(&self) -> u32 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }
}

/// A single captured frame. Immutable once produced; the pixel buffer is
/// cheap to clone and the whole frame is shared as `Arc<Frame>` between the
/// scheduler, the detector, and any candidate that outlives the frame stream.
#[derive(Debug, Clone)]
pub struct Frame {
    pub data: Bytes,
    pub width: u32,
    pub height: u32,
    pub rotation: Rotation,
    /// Monotonic capture timestamp
    pub captured_at: Instant,
}

impl Frame {
    pub fn new(data: Bytes, width: u32, height: u32, rotation: Rotation) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidFrame(format!(
                "frame dimensions must be non-zero, got {}x{}",
                width, height
            )));
        }
        Ok(Self {
            data,
            width,
            height,
            rotation,
            captured_at: Instant::now(),
        })
    }

    /// Frame midpoint, where the on-screen reticle sits
    pub fn center(&self) -> crate::geometry::PointF {
        crate::geometry::PointF::new(self.width as f32 / 2.0, self.height as f32 / 2.0)
    }
}
