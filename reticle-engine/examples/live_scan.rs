//! Runs a scan session against a synthetic camera and detector: an object
//! drifts toward the reticle, dwells there long enough to confirm, and the
//! fake search backend returns a canned match list.

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use reticle_core::geometry::RectF;
use reticle_core::{Candidate, Detection, Frame, Rotation, TrackId};
use reticle_engine::{
    Detector, EngineConfig, Match, Result, ScanSession, SearchBackend, SessionEvent,
};
use std::sync::Arc;
use std::time::Duration;

const FRAME_WIDTH: u32 = 640;
const FRAME_HEIGHT: u32 = 480;

/// Pretends to be an object detector: reports one tracked object drifting
/// from the corner toward the frame center, taking ~40ms per frame.
struct DriftingObjectDetector {
    step: Mutex<u32>,
}

#[async_trait]
impl Detector for DriftingObjectDetector {
    async fn detect(&self, _frame: Arc<Frame>) -> Result<Vec<Detection>> {
        tokio::time::sleep(Duration::from_millis(40)).await;
        let step = {
            let mut step = self.step.lock();
            *step += 1;
            *step
        };
        // Walk the box center from (80, 60) toward the frame midpoint.
        let t = (step as f32 * 0.05).min(1.0);
        let cx = 80.0 + (FRAME_WIDTH as f32 / 2.0 - 80.0) * t;
        let cy = 60.0 + (FRAME_HEIGHT as f32 / 2.0 - 60.0) * t;
        let bbox = RectF::new(cx - 40.0, cy - 30.0, cx + 40.0, cy + 30.0);
        Ok(vec![Detection::new(bbox, Some(TrackId(1)), 0)])
    }
}

/// Pretends to be a product search backend.
struct CannedSearchBackend;

#[async_trait]
impl SearchBackend for CannedSearchBackend {
    async fn submit(&self, candidate: &Candidate) -> Result<Vec<Match>> {
        tokio::time::sleep(Duration::from_millis(300)).await;
        let (_, (width, height)) = candidate.thumbnail_region();
        Ok((0..3)
            .map(|i| {
                Match::new(
                    format!("https://example.invalid/{width}x{height}/{i}.jpg"),
                    format!("Product title {i}"),
                    format!("Product subtitle {i}"),
                )
            })
            .collect())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,reticle_engine=debug")),
        )
        .init();

    let config = EngineConfig {
        confirmation_time_auto_ms: 800,
        ..Default::default()
    };
    let session = Arc::new(ScanSession::new(
        config,
        Arc::new(DriftingObjectDetector {
            step: Mutex::new(0),
        }),
        Arc::new(CannedSearchBackend),
    )?);
    let mut states = session.watch_state();
    let mut events = session.subscribe_events();
    session.start()?;

    // Synthetic camera: 30fps, much faster than the 40ms detector.
    let producer = {
        let session = session.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_millis(33));
            loop {
                ticker.tick().await;
                let frame = Arc::new(Frame::new(
                    Bytes::from_static(&[0u8; 16]),
                    FRAME_WIDTH,
                    FRAME_HEIGHT,
                    Rotation::Deg0,
                )?);
                if !session.submit_frame(frame) {
                    break;
                }
            }
            Ok::<_, anyhow::Error>(())
        })
    };

    let watcher = tokio::spawn(async move {
        while states.changed().await.is_ok() {
            println!("workflow state -> {:?}", *states.borrow());
        }
    });

    loop {
        match events.recv().await {
            Ok(SessionEvent::Searched { candidate, matches }) => {
                println!(
                    "search finished for {:?}: {} matches",
                    candidate.track_id(),
                    matches.len()
                );
                for m in &matches {
                    println!("  {} — {}", m.title, m.subtitle);
                }
                break;
            }
            Ok(event) => println!("event: {event:?}"),
            Err(e) => anyhow::bail!("event stream ended early: {e}"),
        }
    }

    session.stop().await;
    producer.abort();
    watcher.abort();
    Ok(())
}
