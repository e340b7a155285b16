//! PackSense Spatial - the data-acquisition surface of the perception pipeline
//!
//! This crate defines the [`SpatialBackend`] capability trait and its two
//! implementations:
//! - [`SimulatedBackend`]: synthetic joints/planes/volumes for development
//!   without hardware
//! - [`DeviceBackend`]: delegates to a vendor-owned spatial runtime
//!
//! Exactly one variant is active per process; [`select_backend`] picks it at
//! startup and falls back to simulation if device-runtime initialization
//! fails.

pub mod device;
pub mod simulated;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use packsense_core::{Hand, Plane, Volume};

pub use device::{DeviceBackend, RuntimeHandPose, RuntimeJoint, RuntimePlane, RuntimeVolume, SpatialRuntime};
pub use simulated::SimulatedBackend;

#[derive(Error, Debug)]
pub enum BackendError {
    /// Device probe negative or runtime initialization failed
    #[error("Spatial backend unavailable: {0}")]
    Unavailable(String),
    /// A specific backend call failed
    #[error("Backend operation failed: {0}")]
    OperationFailed(String),
}

/// The capability interface over a spatial-sensing device.
///
/// Every operation is asynchronous and may suspend the caller; none of them
/// panic. Implementations publish no state of their own - callers own the
/// shared perception state.
#[async_trait]
pub trait SpatialBackend: Send + Sync {
    /// Activate the camera-passthrough feed. The simulated variant models
    /// device activation latency and only resolves after its warm-up delay.
    async fn start_passthrough(&self) -> Result<bool, BackendError>;

    /// Deactivate the feed. Idempotent: succeeds when already stopped.
    async fn stop_passthrough(&self) -> Result<bool, BackendError>;

    /// Pull one hand-pair sample: exactly two hands, left first.
    async fn get_hand_joints(&self) -> Result<Vec<Hand>, BackendError>;

    /// Pull the currently detected planes.
    async fn get_scene_planes(&self) -> Result<Vec<Plane>, BackendError>;

    /// Pull the currently detected volumes.
    async fn get_scene_volumes(&self) -> Result<Vec<Volume>, BackendError>;

    /// Device/capability probe.
    async fn is_supported(&self) -> bool;

    /// Flag hand tracking active. Controls only whether samples move between
    /// pulls, not whether joints can be fetched.
    async fn start_hand_tracking(&self);

    /// Clear the hand-tracking flag.
    async fn stop_hand_tracking(&self);
}

/// Which backend variant to construct
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Simulated,
    Device,
}

/// Construct the process-wide backend from the device-capability probe.
///
/// A probe indicating a real device attempts runtime initialization; on
/// failure the system degrades to simulation rather than failing startup.
pub async fn select_backend(
    kind: BackendKind,
    runtime: Option<Arc<dyn SpatialRuntime>>,
) -> Arc<dyn SpatialBackend> {
    match (kind, runtime) {
        (BackendKind::Device, Some(runtime)) => match DeviceBackend::connect(runtime).await {
            Ok(backend) => {
                info!("Device spatial runtime initialized");
                Arc::new(backend)
            }
            Err(e) => {
                warn!(error = %e, "Device runtime initialization failed, falling back to simulation");
                Arc::new(SimulatedBackend::new())
            }
        },
        (BackendKind::Device, None) => {
            warn!("Device backend requested but no runtime available, falling back to simulation");
            Arc::new(SimulatedBackend::new())
        }
        (BackendKind::Simulated, _) => {
            info!("Using simulated spatial backend");
            Arc::new(SimulatedBackend::new())
        }
    }
}
