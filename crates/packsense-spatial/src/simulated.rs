//! Simulated spatial backend
//!
//! Generates synthetic joints, planes, and volumes so the whole pipeline runs
//! without hardware. Constants here (warm-up delay, confidence bands, spatial
//! biases) are part of the backend contract and asserted by tests.

use async_trait::async_trait;
use rand::Rng;
use tokio::sync::RwLock;
use tokio::time::{sleep, Duration};
use tracing::{debug, info};

use packsense_core::{
    GestureKind, Hand, HandType, Joint, Plane, PlaneExtent, PlaneLabel, Vector3, Volume,
    VolumeLabel, VolumeSize, HAND_JOINT_COUNT,
};

use crate::{BackendError, SpatialBackend};

/// Modeled device activation latency for passthrough
pub const PASSTHROUGH_WARMUP: Duration = Duration::from_millis(2000);

/// Suitcase confidence when detection is simulated as present
const SUITCASE_PRESENT_CONFIDENCE: f64 = 0.9;
/// Suitcase confidence when detection is simulated as absent
const SUITCASE_ABSENT_CONFIDENCE: f64 = 0.1;

/// Lateral offset separating the seeded left and right hands
const HAND_X_BIAS: f64 = 0.3;
/// Per-axis jitter half-range applied while tracking is active
const JITTER_RANGE: f64 = 0.005;

struct SimState {
    passthrough_active: bool,
    hand_tracking_active: bool,
    hands: Vec<Hand>,
    planes: Vec<Plane>,
    volumes: Vec<Volume>,
    scanning: bool,
}

/// Backend variant that fabricates spatial data in-process
pub struct SimulatedBackend {
    state: RwLock<SimState>,
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedBackend {
    pub fn new() -> Self {
        let state = SimState {
            passthrough_active: false,
            hand_tracking_active: false,
            hands: vec![
                generate_hand(HandType::Left),
                generate_hand(HandType::Right),
            ],
            planes: vec![Plane {
                id: "floor-1".to_string(),
                normal: Vector3::new(0.0, 1.0, 0.0),
                center: Vector3::new(0.0, 0.0, 0.0),
                size: PlaneExtent {
                    width: 2.0,
                    height: 2.0,
                },
                label: PlaneLabel::Floor,
                confidence: 0.95,
            }],
            // The suitcase starts in the absent band; tests and demos flip it
            // through simulate_suitcase_detection.
            volumes: vec![Volume::from_center_size(
                "suitcase-1",
                Vector3::new(0.5, 0.3, -1.0),
                VolumeSize {
                    width: 0.6,
                    height: 0.4,
                    depth: 0.3,
                },
                VolumeLabel::Suitcase,
                SUITCASE_ABSENT_CONFIDENCE,
            )],
            scanning: false,
        };
        Self {
            state: RwLock::new(state),
        }
    }

    /// Whether the simulated scene is mid-rescan (true for the duration of
    /// the passthrough warm-up)
    pub async fn is_scanning(&self) -> bool {
        self.state.read().await.scanning
    }

    /// Reserved for future pose injection; currently only logs the request.
    pub async fn simulate_gesture(&self, kind: GestureKind) {
        info!(gesture = %kind, "Simulating gesture");
    }

    /// Force the suitcase volume into the present or absent confidence band
    pub async fn simulate_suitcase_detection(&self, present: bool) {
        let mut state = self.state.write().await;
        if let Some(volume) = state
            .volumes
            .iter_mut()
            .find(|v| v.label == VolumeLabel::Suitcase)
        {
            volume.confidence = if present {
                SUITCASE_PRESENT_CONFIDENCE
            } else {
                SUITCASE_ABSENT_CONFIDENCE
            };
            info!(present = present, "Suitcase detection simulated");
        }
    }
}

#[async_trait]
impl SpatialBackend for SimulatedBackend {
    async fn start_passthrough(&self) -> Result<bool, BackendError> {
        info!("Starting passthrough (simulated)");
        {
            let mut state = self.state.write().await;
            state.passthrough_active = true;
            state.scanning = true;
        }

        // Hardware activation latency; downstream UI timing depends on it.
        sleep(PASSTHROUGH_WARMUP).await;

        let mut state = self.state.write().await;
        state.scanning = false;
        info!("Passthrough active (simulated)");
        Ok(true)
    }

    async fn stop_passthrough(&self) -> Result<bool, BackendError> {
        let mut state = self.state.write().await;
        state.passthrough_active = false;
        info!("Passthrough stopped (simulated)");
        Ok(true)
    }

    async fn get_hand_joints(&self) -> Result<Vec<Hand>, BackendError> {
        let mut state = self.state.write().await;
        if state.hand_tracking_active {
            // Simulate live movement with a small per-axis drift
            let mut rng = rand::thread_rng();
            for hand in &mut state.hands {
                for joint in &mut hand.joints {
                    joint.position.x += rng.gen_range(-JITTER_RANGE..JITTER_RANGE);
                    joint.position.y += rng.gen_range(-JITTER_RANGE..JITTER_RANGE);
                    joint.position.z += rng.gen_range(-JITTER_RANGE..JITTER_RANGE);
                }
            }
        }
        Ok(state.hands.clone())
    }

    async fn get_scene_planes(&self) -> Result<Vec<Plane>, BackendError> {
        Ok(self.state.read().await.planes.clone())
    }

    async fn get_scene_volumes(&self) -> Result<Vec<Volume>, BackendError> {
        Ok(self.state.read().await.volumes.clone())
    }

    async fn is_supported(&self) -> bool {
        // Simulation always reports support so the application can proceed
        // without real hardware.
        true
    }

    async fn start_hand_tracking(&self) {
        debug!("Hand tracking flagged active (simulated)");
        self.state.write().await.hand_tracking_active = true;
    }

    async fn stop_hand_tracking(&self) {
        debug!("Hand tracking flagged inactive (simulated)");
        self.state.write().await.hand_tracking_active = false;
    }
}

/// Seed one hand: 21 joints scattered around a per-side lateral bias
fn generate_hand(hand_type: HandType) -> Hand {
    let base_x = match hand_type {
        HandType::Left => -HAND_X_BIAS,
        HandType::Right => HAND_X_BIAS,
    };
    let mut rng = rand::thread_rng();

    let joints = (0..HAND_JOINT_COUNT)
        .map(|i| Joint {
            id: format!("{}-joint-{}", hand_type, i),
            position: Vector3::new(
                base_x + (rng.gen::<f64>() - 0.5) * 0.1,
                rng.gen::<f64>() * 0.2 + 0.5,
                -0.5 + (rng.gen::<f64>() - 0.5) * 0.1,
            ),
            rotation: Vector3::default(),
            confidence: 0.9 + rng.gen::<f64>() * 0.1,
        })
        .collect();

    Hand {
        hand_type,
        is_tracked: true,
        joints,
    }
}
