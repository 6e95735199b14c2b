//! reticle-core: data model for the reticle live-scan workflow
//!
//! Leaf types shared by the engine and by detector/search integrations:
//! frame-relative geometry, captured frames, detections with tracking
//! identities, and candidates under confirmation.

pub mod candidate;
pub mod detection;
pub mod error;
pub mod frame;
pub mod geometry;

pub use candidate::Candidate;
pub use detection::{Classification, Detection, TrackId};
pub use error::{Error, Result};
pub use frame::{Frame, Rotation};
pub use geometry::{PointF, RectF};
