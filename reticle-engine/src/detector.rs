//! Detector capability seam

use crate::error::Result;
use async_trait::async_trait;
use reticle_core::{Detection, Frame};
use std::sync::Arc;

/// An asynchronous, possibly slow detector. The scheduler guarantees at most
/// one outstanding `detect` call; implementations never see overlapping
/// requests from the same session.
#[async_trait]
pub trait Detector: Send + Sync + 'static {
    async fn detect(&self, frame: Arc<Frame>) -> Result<Vec<Detection>>;
}
