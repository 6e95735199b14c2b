//! Search backend capability seam

use crate::error::Result;
use async_trait::async_trait;
use reticle_core::Candidate;
use serde::{Deserialize, Serialize};

/// A single result returned by the search backend for a confirmed candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub image_url: String,
    pub title: String,
    pub subtitle: String,
}

impl Match {
    pub fn new(
        image_url: impl Into<String>,
        title: impl Into<String>,
        subtitle: impl Into<String>,
    ) -> Self {
        Self {
            image_url: image_url.into(),
            title: title.into(),
            subtitle: subtitle.into(),
        }
    }
}

/// An asynchronous search backend. The workflow deduplicates by tracking
/// identity before calling, so at most one `submit` is outstanding per
/// identity.
#[async_trait]
pub trait SearchBackend: Send + Sync + 'static {
    async fn submit(&self, candidate: &Candidate) -> Result<Vec<Match>>;
}
