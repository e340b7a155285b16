//! Hand tracking loop
//!
//! Owns the tracking-active flag and a recurring sampling task: while active,
//! it pulls one hand-pair sample per tick from the backend, classifies it,
//! and publishes both the raw hands and the resulting gesture events. A
//! failed tick is logged and skipped; each tick retries independently.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use packsense_core::{GestureEvent, GestureKind, GestureRecognizer, Hand, HandType};
use packsense_spatial::SpatialBackend;

use crate::events::PerceptionEvent;

/// Sampling cadence: ~60 Hz
pub const DEFAULT_CADENCE: Duration = Duration::from_millis(16);

/// Confidence gate for the derived left-palm-open flag. Intentionally a
/// separate literal from the classifier's sensitivity; both gates must hold.
const PALM_OPEN_FLAG_THRESHOLD: f64 = 0.7;
/// Confidence gate for the derived right-pinch flag.
const PINCH_FLAG_THRESHOLD: f64 = 0.7;

/// Latest published tracking state, replaced wholesale each tick
#[derive(Debug, Clone, Default)]
pub struct TrackingState {
    /// Last sampled hand pair (left, right)
    pub hands: Vec<Hand>,
    /// Gesture events from the same tick as `hands`
    pub gestures: Vec<GestureEvent>,
    /// Left palm open with confidence above the flag threshold
    pub palm_open: bool,
    /// Right pinch with confidence above the flag threshold
    pub pinching: bool,
}

/// Recurring hand sampling and gesture classification service
pub struct HandTracker {
    backend: Arc<dyn SpatialBackend>,
    recognizer: Arc<RwLock<GestureRecognizer>>,
    state: Arc<RwLock<TrackingState>>,
    running: Arc<AtomicBool>,
    cadence: Duration,
    event_tx: broadcast::Sender<PerceptionEvent>,
}

impl HandTracker {
    pub fn new(backend: Arc<dyn SpatialBackend>, recognizer: GestureRecognizer) -> Self {
        Self::with_cadence(backend, recognizer, DEFAULT_CADENCE)
    }

    pub fn with_cadence(
        backend: Arc<dyn SpatialBackend>,
        recognizer: GestureRecognizer,
        cadence: Duration,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(100);
        Self {
            backend,
            recognizer: Arc::new(RwLock::new(recognizer)),
            state: Arc::new(RwLock::new(TrackingState::default())),
            running: Arc::new(AtomicBool::new(false)),
            cadence,
            event_tx,
        }
    }

    /// Subscribe to gesture events
    pub fn subscribe(&self) -> broadcast::Receiver<PerceptionEvent> {
        self.event_tx.subscribe()
    }

    /// Whether the sampling task is active
    pub fn is_tracking(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Latest published state
    pub async fn state(&self) -> TrackingState {
        self.state.read().await.clone()
    }

    /// Adjust the classifier's sensitivity threshold
    pub async fn set_sensitivity(&self, sensitivity: f64) {
        self.recognizer.write().await.set_sensitivity(sensitivity);
    }

    /// Stamp a classifier calibration pass
    pub async fn calibrate(&self) {
        self.recognizer.write().await.calibrate();
    }

    /// Flag tracking active on the backend and begin the sampling task.
    /// A second call while running is a no-op.
    pub async fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            debug!("Hand tracking already running");
            return;
        }
        self.backend.start_hand_tracking().await;
        info!(cadence_ms = self.cadence.as_millis() as u64, "Hand tracking started");

        let backend = Arc::clone(&self.backend);
        let recognizer = Arc::clone(&self.recognizer);
        let state = Arc::clone(&self.state);
        let running = Arc::clone(&self.running);
        let event_tx = self.event_tx.clone();
        let cadence = self.cadence;

        tokio::spawn(async move {
            let mut ticker = interval(cadence);
            // A slow sample must not cause a burst of catch-up ticks; at
            // most one sample is ever in flight.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                if !running.load(Ordering::SeqCst) {
                    break;
                }

                match backend.get_hand_joints().await {
                    Ok(hands) => {
                        let gestures = recognizer.read().await.detect(&hands);
                        publish_tick(&state, &event_tx, hands, gestures).await;
                    }
                    Err(e) => {
                        // Tick dropped; the next one retries independently.
                        warn!(error = %e, "Hand sample failed, skipping tick");
                    }
                }
            }
            debug!("Hand tracking task exited");
        });
    }

    /// Clear the tracking flag and cancel future ticks. An in-flight sample
    /// completes but no new ones are scheduled. Idempotent.
    pub async fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        self.backend.stop_hand_tracking().await;
        info!("Hand tracking stopped");
    }
}

/// Publish one tick's sample and its classification within the same tick
async fn publish_tick(
    state: &RwLock<TrackingState>,
    event_tx: &broadcast::Sender<PerceptionEvent>,
    hands: Vec<Hand>,
    gestures: Vec<GestureEvent>,
) {
    let palm_open = gestures.iter().any(|g| {
        g.kind == GestureKind::PalmOpen
            && g.hand_type == HandType::Left
            && g.confidence > PALM_OPEN_FLAG_THRESHOLD
    });
    let pinching = gestures.iter().any(|g| {
        g.kind == GestureKind::Pinch
            && g.hand_type == HandType::Right
            && g.confidence > PINCH_FLAG_THRESHOLD
    });

    for gesture in &gestures {
        let _ = event_tx.send(PerceptionEvent::GestureDetected(gesture.clone()));
    }

    let mut guard = state.write().await;
    guard.hands = hands;
    guard.gestures = gestures;
    guard.palm_open = palm_open;
    guard.pinching = pinching;
}
