//! Passthrough activation
//!
//! Thin asynchronous handshake over the backend: the active flag flips only
//! after the backend resolves, so callers awaiting [`PassthroughController::activate`]
//! observe the device's real activation latency.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::info;

use packsense_spatial::{BackendError, SpatialBackend};

use crate::events::PerceptionEvent;

/// Controls the camera-passthrough feed
pub struct PassthroughController {
    backend: Arc<dyn SpatialBackend>,
    active: AtomicBool,
    event_tx: broadcast::Sender<PerceptionEvent>,
}

impl PassthroughController {
    pub fn new(backend: Arc<dyn SpatialBackend>) -> Self {
        let (event_tx, _) = broadcast::channel(16);
        Self {
            backend,
            active: AtomicBool::new(false),
            event_tx,
        }
    }

    /// Subscribe to activation events
    pub fn subscribe(&self) -> broadcast::Receiver<PerceptionEvent> {
        self.event_tx.subscribe()
    }

    /// Whether the feed is currently active
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Activate the feed. Resolves once the backend reports the feed live;
    /// the active flag flips only on success.
    pub async fn activate(&self) -> Result<bool, BackendError> {
        let started = self.backend.start_passthrough().await?;
        if started {
            self.active.store(true, Ordering::SeqCst);
            info!("Passthrough active");
            let _ = self.event_tx.send(PerceptionEvent::PassthroughStarted);
        }
        Ok(started)
    }

    /// Deactivate the feed. Idempotent.
    pub async fn deactivate(&self) -> Result<bool, BackendError> {
        let stopped = self.backend.stop_passthrough().await?;
        if stopped && self.active.swap(false, Ordering::SeqCst) {
            info!("Passthrough stopped");
            let _ = self.event_tx.send(PerceptionEvent::PassthroughStopped);
        }
        Ok(stopped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packsense_spatial::SimulatedBackend;
    use tokio::time::{Duration, Instant};

    #[tokio::test(start_paused = true)]
    async fn test_activate_observes_warmup_latency() {
        let controller = PassthroughController::new(Arc::new(SimulatedBackend::new()));
        assert!(!controller.is_active());

        let before = Instant::now();
        let started = controller.activate().await.unwrap();
        let elapsed = before.elapsed();

        assert!(started);
        assert!(controller.is_active());
        assert!(elapsed >= Duration::from_millis(1900), "resolved too early: {elapsed:?}");
        assert!(elapsed <= Duration::from_millis(2100), "resolved too late: {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_deactivate_is_idempotent() {
        let controller = PassthroughController::new(Arc::new(SimulatedBackend::new()));
        controller.activate().await.unwrap();

        assert!(controller.deactivate().await.unwrap());
        assert!(!controller.is_active());
        assert!(controller.deactivate().await.unwrap());
        assert!(!controller.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_follow_the_handshake() {
        let controller = PassthroughController::new(Arc::new(SimulatedBackend::new()));
        let mut rx = controller.subscribe();

        controller.activate().await.unwrap();
        assert!(matches!(rx.try_recv().unwrap(), PerceptionEvent::PassthroughStarted));

        controller.deactivate().await.unwrap();
        assert!(matches!(rx.try_recv().unwrap(), PerceptionEvent::PassthroughStopped));
    }
}
