//! Configuration for the scan engine

use reticle_core::geometry::{PointF, RectF};
use reticle_core::Frame;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Dwell time used in multi-object mode regardless of the search setting
const MULTI_OBJECT_CONFIRMATION_MS: u32 = 300;

/// Which detector family the session runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanMode {
    /// Live object detection with confirmation and search
    Object,
    /// Barcode scanning; no dwell timer, no search hand-off
    Barcode,
}

/// Engine configuration, read once per session construction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub scan_mode: ScanMode,
    /// Track and select among multiple live objects instead of only the
    /// detector's single most prominent one
    pub multi_object_mode: bool,
    /// Drop detections whose classification is the null category
    pub classification_enabled: bool,
    /// Dispatch the search as soon as confirmation completes instead of
    /// waiting for an explicit user action
    pub auto_search_enabled: bool,
    /// Dwell time for single-object auto-search mode
    pub confirmation_time_auto_ms: u32,
    /// Dwell time for single-object manual-search mode
    pub confirmation_time_manual_ms: u32,
    /// Multi-object selection: max distance from box center to the reticle
    pub selection_radius_px: u32,
    /// Prominent mode: half-extent of the reticle rectangle
    pub reticle_radius_px: u32,
    /// Require barcodes to fill part of the frame before accepting them
    pub barcode_size_check_enabled: bool,
    /// Fraction of the frame width a barcode must span when the size check
    /// is on
    pub barcode_size_fraction: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scan_mode: ScanMode::Object,
            multi_object_mode: false,
            classification_enabled: false,
            auto_search_enabled: true,
            confirmation_time_auto_ms: 1500,
            confirmation_time_manual_ms: 500,
            selection_radius_px: 80,
            reticle_radius_px: 120,
            barcode_size_check_enabled: false,
            barcode_size_fraction: 0.3,
        }
    }
}

impl EngineConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.confirmation_time_auto_ms == 0 || self.confirmation_time_auto_ms > 60_000 {
            return Err("Auto-search confirmation time must be between 1ms and 60s".to_string());
        }
        if self.confirmation_time_manual_ms == 0 || self.confirmation_time_manual_ms > 60_000 {
            return Err("Manual-search confirmation time must be between 1ms and 60s".to_string());
        }
        if self.selection_radius_px == 0 {
            return Err("Selection radius must be non-zero".to_string());
        }
        if self.reticle_radius_px == 0 {
            return Err("Reticle radius must be non-zero".to_string());
        }
        if !(self.barcode_size_fraction > 0.0 && self.barcode_size_fraction <= 1.0) {
            return Err("Barcode size fraction must be in (0, 1]".to_string());
        }
        Ok(())
    }

    /// Dwell time before a held candidate counts as confirmed. Multi-object
    /// mode uses a short fixed window; single-object mode depends on whether
    /// confirmation flows straight into a search.
    pub fn confirmation_duration(&self) -> Duration {
        let ms = if self.multi_object_mode {
            MULTI_OBJECT_CONFIRMATION_MS
        } else if self.auto_search_enabled {
            self.confirmation_time_auto_ms
        } else {
            self.confirmation_time_manual_ms
        };
        Duration::from_millis(ms as u64)
    }

    /// The fixed on-screen target point: the frame midpoint
    pub fn reticle_center(&self, frame: &Frame) -> PointF {
        frame.center()
    }

    /// The reticle rectangle used for prominent-mode overlap selection
    pub fn reticle_rect(&self, frame: &Frame) -> RectF {
        RectF::around(frame.center(), self.reticle_radius_px as f32)
    }
}
