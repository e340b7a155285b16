//! Scene detection
//!
//! One-shot scans: both scene queries run concurrently and land as a single
//! snapshot, from which the container-detected signal is recomputed. A failed
//! scan retains the previous snapshot.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::{broadcast, RwLock};
use tracing::{info, warn};

use packsense_core::SceneSnapshot;
use packsense_spatial::{BackendError, SpatialBackend};

use crate::events::PerceptionEvent;

/// Confidence a volume must exceed to count as a detected container
pub const DEFAULT_CONTAINER_THRESHOLD: f64 = 0.7;

#[derive(Error, Debug)]
pub enum ScanError {
    /// A scan was requested while another was in flight
    #[error("A scene scan is already in progress")]
    AlreadyScanning,
    /// One of the scene queries failed
    #[error("Scene scan failed: {0}")]
    Fetch(#[from] BackendError),
}

/// One-shot scene scanner and holder of the latest snapshot
pub struct SceneDetector {
    backend: Arc<dyn SpatialBackend>,
    snapshot: Arc<RwLock<Option<SceneSnapshot>>>,
    scanning: AtomicBool,
    container_detected: AtomicBool,
    container_threshold: f64,
    event_tx: broadcast::Sender<PerceptionEvent>,
}

impl SceneDetector {
    pub fn new(backend: Arc<dyn SpatialBackend>) -> Self {
        Self::with_threshold(backend, DEFAULT_CONTAINER_THRESHOLD)
    }

    pub fn with_threshold(backend: Arc<dyn SpatialBackend>, container_threshold: f64) -> Self {
        let (event_tx, _) = broadcast::channel(100);
        Self {
            backend,
            snapshot: Arc::new(RwLock::new(None)),
            scanning: AtomicBool::new(false),
            container_detected: AtomicBool::new(false),
            container_threshold,
            event_tx,
        }
    }

    /// Subscribe to scan lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<PerceptionEvent> {
        self.event_tx.subscribe()
    }

    /// Whether a scan is currently in flight
    pub fn is_scanning(&self) -> bool {
        self.scanning.load(Ordering::SeqCst)
    }

    /// The derived container-present signal from the latest snapshot
    pub fn container_detected(&self) -> bool {
        self.container_detected.load(Ordering::SeqCst)
    }

    /// Latest published snapshot, if any scan has completed
    pub async fn snapshot(&self) -> Option<SceneSnapshot> {
        self.snapshot.read().await.clone()
    }

    /// Run one scene scan: fetch planes and volumes concurrently, publish the
    /// combined snapshot, and recompute the container-detected signal.
    ///
    /// Rejects reentrant calls; a second scan may start only after the first
    /// resolves. On failure the previous snapshot is retained unchanged.
    pub async fn scan(&self) -> Result<SceneSnapshot, ScanError> {
        if self.scanning.swap(true, Ordering::SeqCst) {
            return Err(ScanError::AlreadyScanning);
        }
        let _ = self.event_tx.send(PerceptionEvent::ScanStarted);
        info!("Scene scan started");

        let (planes, volumes) = tokio::join!(
            self.backend.get_scene_planes(),
            self.backend.get_scene_volumes(),
        );

        let result = match (planes, volumes) {
            (Ok(planes), Ok(volumes)) => {
                let snapshot = SceneSnapshot {
                    planes,
                    volumes,
                    timestamp: Utc::now(),
                    is_scanning: false,
                };
                let detected = snapshot.container_detected(self.container_threshold);
                *self.snapshot.write().await = Some(snapshot.clone());
                self.container_detected.store(detected, Ordering::SeqCst);

                info!(
                    planes = snapshot.planes.len(),
                    volumes = snapshot.volumes.len(),
                    container_detected = detected,
                    "Scene scan completed"
                );
                let _ = self.event_tx.send(PerceptionEvent::ScanCompleted {
                    planes: snapshot.planes.len(),
                    volumes: snapshot.volumes.len(),
                });
                let _ = self.event_tx.send(PerceptionEvent::ContainerDetected(detected));
                Ok(snapshot)
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!(error = %e, "Scene scan failed, retaining previous snapshot");
                let _ = self.event_tx.send(PerceptionEvent::ScanFailed);
                Err(ScanError::Fetch(e))
            }
        };

        self.scanning.store(false, Ordering::SeqCst);
        result
    }
}
