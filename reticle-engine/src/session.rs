//! Scan session: the composition root tying scheduler, processor, workflow,
//! and search dispatch together for one screen activation.

use crate::config::{EngineConfig, ScanMode};
use crate::detector::Detector;
use crate::error::{EngineError, Result};
use crate::processing::{
    BarcodeProcessor, FrameResultProcessor, MultiObjectProcessor, ProminentObjectProcessor,
};
use crate::scheduler::{DetectionBatch, FrameScheduler};
use crate::search::SearchBackend;
use crate::workflow::{SessionEvent, WorkflowModel, WorkflowState};
use parking_lot::{Mutex, RwLock};
use reticle_core::Frame;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// One live scan workflow session. Created per screen activation, started
/// once, stopped on teardown; a stopped session cannot be restarted.
pub struct ScanSession {
    workflow: Arc<WorkflowModel>,
    scheduler: Arc<FrameScheduler>,
    processor: Arc<dyn FrameResultProcessor>,
    backend: Arc<dyn SearchBackend>,
    batch_rx: Mutex<Option<mpsc::UnboundedReceiver<DetectionBatch>>>,
    running: RwLock<bool>,
    closed: RwLock<bool>,
    drive_handle: Mutex<Option<JoinHandle<()>>>,
    search_handle: Mutex<Option<JoinHandle<()>>>,
}

impl ScanSession {
    /// Build a session for the given configuration and capabilities. The
    /// processor variant is fixed here, by configuration, for the session's
    /// lifetime.
    pub fn new(
        config: EngineConfig,
        detector: Arc<dyn Detector>,
        backend: Arc<dyn SearchBackend>,
    ) -> Result<Self> {
        config.validate().map_err(EngineError::Config)?;
        let config = Arc::new(config);
        let workflow = Arc::new(WorkflowModel::new(config.auto_search_enabled));
        let (scheduler, batch_rx) = FrameScheduler::new(detector);

        let processor: Arc<dyn FrameResultProcessor> =
            match (config.scan_mode, config.multi_object_mode) {
                (ScanMode::Barcode, _) => {
                    Arc::new(BarcodeProcessor::new(config.clone(), workflow.clone()))
                }
                (ScanMode::Object, true) => {
                    Arc::new(MultiObjectProcessor::new(config.clone(), workflow.clone()))
                }
                (ScanMode::Object, false) => Arc::new(ProminentObjectProcessor::new(
                    config.clone(),
                    workflow.clone(),
                )),
            };

        Ok(Self {
            workflow,
            scheduler: Arc::new(scheduler),
            processor,
            backend,
            batch_rx: Mutex::new(Some(batch_rx)),
            running: RwLock::new(false),
            closed: RwLock::new(false),
            drive_handle: Mutex::new(None),
            search_handle: Mutex::new(None),
        })
    }

    /// Start the session: marks the workflow live and spawns the detection
    /// drive loop and the search dispatch loop. Starting a running session
    /// or restarting a stopped one is a caller bug.
    pub fn start(&self) -> Result<()> {
        {
            let mut running = self.running.write();
            if *self.closed.read() {
                return Err(EngineError::SessionClosed);
            }
            if *running {
                return Err(EngineError::AlreadyRunning);
            }
            *running = true;
        }

        info!("Starting scan session");

        let Some(mut batch_rx) = self.batch_rx.lock().take() else {
            *self.running.write() = false;
            return Err(EngineError::SessionClosed);
        };
        let Some(mut search_rx) = self.workflow.take_search_requests() else {
            *self.running.write() = false;
            return Err(EngineError::SessionClosed);
        };

        self.workflow.mark_live();
        self.workflow.set_state(WorkflowState::Detecting);

        let processor = self.processor.clone();
        let drive = tokio::spawn(async move {
            while let Some(batch) = batch_rx.recv().await {
                match batch.result {
                    Ok(detections) => processor.process_batch(batch.frame, detections),
                    Err(e) => processor.on_detector_failure(batch.frame, &e),
                }
            }
            debug!("Detection batch channel closed, drive loop exiting");
        });
        *self.drive_handle.lock() = Some(drive);

        let workflow = self.workflow.clone();
        let backend = self.backend.clone();
        let search = tokio::spawn(async move {
            while let Some(candidate) = search_rx.recv().await {
                let outcome = backend.submit(&candidate).await;
                workflow.on_search_completed(candidate, outcome);
            }
            debug!("Search request channel closed, dispatch loop exiting");
        });
        *self.search_handle.lock() = Some(search);

        info!("Scan session started");
        Ok(())
    }

    /// Stop the session. Idempotent. Cancels the confirmation dwell, closes
    /// the scheduler so a late detection result is discarded, and tears down
    /// both loops.
    pub async fn stop(&self) {
        {
            let mut running = self.running.write();
            if !*running {
                return;
            }
            *running = false;
        }
        *self.closed.write() = true;

        self.workflow.mark_frozen();
        self.scheduler.close();
        self.processor.reset();

        let drive = self.drive_handle.lock().take();
        if let Some(handle) = drive {
            handle.abort();
            let _ = tokio::time::timeout(Duration::from_secs(1), handle).await;
        }
        let search = self.search_handle.lock().take();
        if let Some(handle) = search {
            handle.abort();
            let _ = tokio::time::timeout(Duration::from_secs(1), handle).await;
        }

        self.workflow.set_state(WorkflowState::NotStarted);
        info!("Scan session stopped");
    }

    /// Feed one captured frame. Non-blocking; returns `false` when the
    /// session is not running or the frame was rejected by a closed
    /// scheduler.
    pub fn submit_frame(&self, frame: Arc<Frame>) -> bool {
        if !*self.running.read() {
            return false;
        }
        self.scheduler.submit(frame)
    }

    /// Forward a user-initiated search trigger (manual mode).
    pub fn on_search_clicked(&self) {
        self.workflow.on_search_clicked();
    }

    /// Return to scanning after the session owner dismisses a search
    /// result.
    pub fn resume_detecting(&self) {
        self.workflow.set_state(WorkflowState::Detecting);
    }

    pub fn is_running(&self) -> bool {
        *self.running.read()
    }

    pub fn state(&self) -> WorkflowState {
        self.workflow.state()
    }

    /// Receiver for published workflow states; one notification per actual
    /// transition.
    pub fn watch_state(&self) -> watch::Receiver<WorkflowState> {
        self.workflow.watch_state()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.workflow.subscribe_events()
    }
}
