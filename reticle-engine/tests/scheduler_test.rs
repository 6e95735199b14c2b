//! Frame scheduling behavior through the public API

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use reticle_core::{Detection, Frame, Rotation};
use reticle_engine::{Detector, FrameScheduler, Result};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::yield_now;

/// Completes one detection per released permit and records the frames it
/// was handed, identified by width.
struct GatedDetector {
    seen: Mutex<Vec<u32>>,
    gate: Semaphore,
}

impl GatedDetector {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(Vec::new()),
            gate: Semaphore::new(0),
        })
    }
}

#[async_trait]
impl Detector for GatedDetector {
    async fn detect(&self, frame: Arc<Frame>) -> Result<Vec<Detection>> {
        self.seen.lock().push(frame.width);
        self.gate.acquire().await.expect("gate closed").forget();
        Ok(Vec::new())
    }
}

fn frame(tag: u32) -> Arc<Frame> {
    Arc::new(Frame::new(Bytes::new(), tag, 480, Rotation::Deg0).unwrap())
}

async fn settle() {
    for _ in 0..32 {
        yield_now().await;
    }
}

#[tokio::test(flavor = "current_thread")]
async fn test_detector_called_fewer_times_than_submissions() {
    let detector = GatedDetector::new();
    let (scheduler, mut batches) = FrameScheduler::new(detector.clone());

    // Twenty rapid submissions against a detector that completes twice.
    for tag in 1..=20 {
        assert!(scheduler.submit(frame(tag)));
    }
    settle().await;
    detector.gate.add_permits(1);
    settle().await;
    detector.gate.add_permits(1);
    settle().await;

    let seen = detector.seen.lock().clone();
    assert_eq!(seen, vec![1, 20]);
    assert_eq!(batches.recv().await.unwrap().frame.width, 1);
    assert_eq!(batches.recv().await.unwrap().frame.width, 20);
}

#[tokio::test(flavor = "current_thread")]
async fn test_last_frame_before_idle_point_is_processed() {
    let detector = GatedDetector::new();
    let (scheduler, mut batches) = FrameScheduler::new(detector.clone());

    // F1 in flight, F2..F4 dropped, F5 pending.
    for tag in 1..=5 {
        scheduler.submit(frame(tag));
        settle().await;
    }
    detector.gate.add_permits(1);
    settle().await;

    // F1 completed before F6 arrives; F5 is already in flight, so F6 waits.
    scheduler.submit(frame(6));
    settle().await;
    detector.gate.add_permits(2);
    settle().await;

    let seen = detector.seen.lock().clone();
    assert_eq!(seen, vec![1, 5, 6]);

    let mut processed = Vec::new();
    while let Ok(batch) = batches.try_recv() {
        processed.push(batch.frame.width);
    }
    assert_eq!(processed, vec![1, 5, 6]);
}

#[tokio::test(flavor = "current_thread")]
async fn test_completion_before_next_submit_still_processes_it() {
    let detector = GatedDetector::new();
    let (scheduler, mut batches) = FrameScheduler::new(detector.clone());

    scheduler.submit(frame(1));
    detector.gate.add_permits(1);
    settle().await;
    assert_eq!(batches.recv().await.unwrap().frame.width, 1);

    // The scheduler is idle; a later submit dispatches immediately.
    scheduler.submit(frame(2));
    detector.gate.add_permits(1);
    settle().await;
    assert_eq!(batches.recv().await.unwrap().frame.width, 2);
}

#[tokio::test(flavor = "current_thread")]
async fn test_closed_scheduler_rejects_and_discards() {
    let detector = GatedDetector::new();
    let (scheduler, mut batches) = FrameScheduler::new(detector.clone());

    scheduler.submit(frame(1));
    settle().await;
    scheduler.close();

    assert!(!scheduler.submit(frame(2)));
    detector.gate.add_permits(1);
    settle().await;

    assert!(batches.try_recv().is_err());
    assert_eq!(detector.seen.lock().clone(), vec![1]);
}
