//! Application state management

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::{broadcast, RwLock};
use tokio::time::Duration;
use tracing::info;

use packsense_core::GestureRecognizer;
use packsense_pipeline::{
    HandTracker, PassthroughController, PerceptionEvent, SceneDetector,
};
use packsense_spatial::{select_backend, BackendKind, SimulatedBackend, SpatialBackend};

use crate::config::{BackendMode, Config};
use crate::store::PackingStore;

/// Shared application state
pub struct AppState {
    /// Hand sampling and gesture classification
    pub tracker: Arc<HandTracker>,
    /// Scene scanning and the container-detected signal
    pub scene: Arc<SceneDetector>,
    /// Passthrough feed control
    pub passthrough: Arc<PassthroughController>,
    /// Packing checklist
    pub store: Arc<RwLock<PackingStore>>,
    /// Configuration
    pub config: Config,
    /// Merged event stream from all perception services
    pub events: broadcast::Sender<PerceptionEvent>,
    /// Simulation hooks, present when running against the simulated backend
    simulated: Option<Arc<SimulatedBackend>>,
}

impl AppState {
    /// Create new application state
    pub async fn new(config: Config) -> Result<Arc<Self>> {
        let (backend, simulated): (Arc<dyn SpatialBackend>, Option<Arc<SimulatedBackend>>) =
            match config.backend.mode {
                BackendMode::Simulated => {
                    info!("Using simulated spatial backend");
                    let sim = Arc::new(SimulatedBackend::new());
                    (Arc::clone(&sim) as Arc<dyn SpatialBackend>, Some(sim))
                }
                // No vendor runtime is linked into this build; selection
                // degrades to simulation with a warning.
                BackendMode::Device => (select_backend(BackendKind::Device, None).await, None),
            };

        let recognizer = GestureRecognizer::new(config.tracking.sensitivity);
        let tracker = Arc::new(HandTracker::with_cadence(
            Arc::clone(&backend),
            recognizer,
            Duration::from_millis(config.tracking.cadence_ms),
        ));
        let scene = Arc::new(SceneDetector::with_threshold(
            Arc::clone(&backend),
            config.scene.container_threshold,
        ));
        let passthrough = Arc::new(PassthroughController::new(Arc::clone(&backend)));

        let (events, _) = broadcast::channel(100);

        let state = Arc::new(Self {
            tracker,
            scene,
            passthrough,
            store: Arc::new(RwLock::new(PackingStore::with_starter_lists())),
            config,
            events,
            simulated,
        });

        // Merge each service's events into the shared stream
        for mut rx in [
            state.tracker.subscribe(),
            state.scene.subscribe(),
            state.passthrough.subscribe(),
        ] {
            let tx = state.events.clone();
            tokio::spawn(async move {
                while let Ok(event) = rx.recv().await {
                    let _ = tx.send(event);
                }
            });
        }

        Ok(state)
    }

    /// Subscribe to the merged event stream
    pub fn subscribe(&self) -> broadcast::Receiver<PerceptionEvent> {
        self.events.subscribe()
    }

    /// Simulation hooks when the simulated backend is active
    pub fn simulated_backend(&self) -> Option<&Arc<SimulatedBackend>> {
        self.simulated.as_ref()
    }

    /// Bring the perception services up: passthrough first, then tracking
    pub async fn start(&self) -> Result<()> {
        self.passthrough.activate().await?;
        self.tracker.start().await;
        Ok(())
    }

    /// Tear the services down in reverse order
    pub async fn stop(&self) -> Result<()> {
        self.tracker.stop().await;
        self.passthrough.deactivate().await?;
        Ok(())
    }
}
