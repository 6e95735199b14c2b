//! Single-in-flight frame scheduling
//!
//! Glues an arbitrarily fast frame producer to an asynchronous, possibly
//! slow detector without queueing: at most one frame is ever being detected,
//! one more waits in the `latest` slot, and everything submitted in between
//! is dropped. Completed batches are delivered to the session loop in
//! submission order.

use crate::detector::Detector;
use crate::error::Result;
use parking_lot::Mutex;
use reticle_core::{Detection, Frame};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::debug;

/// A completed detection pass over one frame
pub struct DetectionBatch {
    pub frame: Arc<Frame>,
    pub result: Result<Vec<Detection>>,
    /// Wall-clock time between dispatch and detector completion
    pub latency: Duration,
}

struct Slots {
    /// Last submitted frame, not yet started. Overwritten by every submit.
    latest: Option<Arc<Frame>>,
    in_flight: bool,
    closed: bool,
}

/// Accepts a stream of frames and keeps the detector at most one request
/// deep. `submit` never blocks the producer; stale frames are discarded, not
/// queued.
pub struct FrameScheduler {
    detector: Arc<dyn Detector>,
    slots: Arc<Mutex<Slots>>,
    batch_tx: mpsc::UnboundedSender<DetectionBatch>,
}

impl FrameScheduler {
    /// Create a scheduler for `detector` together with the receiver the
    /// session loop consumes completed batches from.
    pub fn new(detector: Arc<dyn Detector>) -> (Self, mpsc::UnboundedReceiver<DetectionBatch>) {
        let (batch_tx, batch_rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            detector,
            slots: Arc::new(Mutex::new(Slots {
                latest: None,
                in_flight: false,
                closed: false,
            })),
            batch_tx,
        };
        (scheduler, batch_rx)
    }

    /// Submit a frame. Non-blocking; always overwrites any unconsumed
    /// previous frame. Returns `false` once the scheduler is closed. Must be
    /// called from within a tokio runtime.
    pub fn submit(&self, frame: Arc<Frame>) -> bool {
        let to_dispatch = {
            let mut slots = self.slots.lock();
            if slots.closed {
                return false;
            }
            slots.latest = Some(frame);
            if slots.in_flight {
                None
            } else {
                slots.in_flight = true;
                slots.latest.take()
            }
        };
        if let Some(frame) = to_dispatch {
            self.spawn_drive(frame);
        }
        true
    }

    /// Close the scheduler: pending and in-flight frames are discarded and
    /// further submits are rejected.
    pub fn close(&self) {
        let mut slots = self.slots.lock();
        slots.closed = true;
        slots.latest = None;
    }

    pub fn is_closed(&self) -> bool {
        self.slots.lock().closed
    }

    /// Drive detection from `frame` onward, promoting whatever is in the
    /// `latest` slot each time a pass completes, until the slot is empty or
    /// the scheduler closes.
    fn spawn_drive(&self, frame: Arc<Frame>) {
        let detector = self.detector.clone();
        let slots = self.slots.clone();
        let batch_tx = self.batch_tx.clone();
        tokio::spawn(async move {
            let mut frame = frame;
            loop {
                let started = Instant::now();
                let result = detector.detect(frame.clone()).await;
                let latency = started.elapsed();
                debug!(latency_ms = latency.as_millis() as u64, "Detection latency");

                // Delivery and promotion share the slot lock with submit, so
                // a racing submit can neither double-dispatch a frame nor
                // lose one, and a close between completion and delivery
                // discards the result.
                let next = {
                    let mut slots = slots.lock();
                    if slots.closed {
                        slots.in_flight = false;
                        return;
                    }
                    let _ = batch_tx.send(DetectionBatch {
                        frame,
                        result,
                        latency,
                    });
                    match slots.latest.take() {
                        Some(next) => Some(next),
                        None => {
                            slots.in_flight = false;
                            None
                        }
                    }
                };
                match next {
                    Some(next) => frame = next,
                    None => return,
                }
            }
        });
    }
}
