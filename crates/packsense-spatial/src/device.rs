//! Device spatial backend
//!
//! Delegates every operation to a vendor-owned spatial runtime behind the
//! [`SpatialRuntime`] seam and maps the runtime's raw poses and semantic
//! labels into the PackSense data model. Only container-like volumes survive
//! the mapping; everything else in the room is noise for a packing assistant.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use packsense_core::{
    Bounds, Hand, HandType, Joint, Plane, PlaneExtent, PlaneLabel, Vector3, Volume, VolumeLabel,
    VolumeSize,
};

use crate::{BackendError, SpatialBackend};

/// One raw joint as reported by the vendor runtime
#[derive(Debug, Clone)]
pub struct RuntimeJoint {
    pub position: Vector3,
    pub rotation: Vector3,
    pub confidence: f64,
}

/// One raw hand pose as reported by the vendor runtime
#[derive(Debug, Clone)]
pub struct RuntimeHandPose {
    pub is_left: bool,
    pub is_tracked: bool,
    pub joints: Vec<RuntimeJoint>,
}

/// One raw detected plane as reported by the vendor runtime
#[derive(Debug, Clone)]
pub struct RuntimePlane {
    pub id: String,
    pub normal: Vector3,
    pub center: Vector3,
    pub width: f64,
    pub height: f64,
    pub semantic_label: String,
    pub confidence: f64,
}

/// One raw detected volume as reported by the vendor runtime
#[derive(Debug, Clone)]
pub struct RuntimeVolume {
    pub id: String,
    pub center: Vector3,
    /// Full extent per axis
    pub size: Vector3,
    pub semantic_label: String,
    pub confidence: f64,
}

/// The vendor-owned runtime seam.
///
/// A concrete implementation wraps the device SDK; tests substitute a mock.
#[async_trait]
pub trait SpatialRuntime: Send + Sync {
    /// Initialize the runtime context. Called once at backend construction.
    async fn initialize(&self) -> Result<(), BackendError>;
    async fn enable_passthrough(&self) -> Result<(), BackendError>;
    async fn disable_passthrough(&self) -> Result<(), BackendError>;
    async fn hand_poses(&self) -> Result<Vec<RuntimeHandPose>, BackendError>;
    async fn detected_planes(&self) -> Result<Vec<RuntimePlane>, BackendError>;
    async fn detected_volumes(&self) -> Result<Vec<RuntimeVolume>, BackendError>;
}

/// Backend variant delegating to a real device runtime
pub struct DeviceBackend {
    runtime: Arc<dyn SpatialRuntime>,
    context_initialized: bool,
}

impl DeviceBackend {
    /// Initialize the runtime context and wrap it. Callers fall back to
    /// simulation when this fails; see [`crate::select_backend`].
    pub async fn connect(runtime: Arc<dyn SpatialRuntime>) -> Result<Self, BackendError> {
        runtime
            .initialize()
            .await
            .map_err(|e| BackendError::Unavailable(e.to_string()))?;
        Ok(Self {
            runtime,
            context_initialized: true,
        })
    }
}

#[async_trait]
impl SpatialBackend for DeviceBackend {
    async fn start_passthrough(&self) -> Result<bool, BackendError> {
        self.runtime.enable_passthrough().await?;
        Ok(true)
    }

    async fn stop_passthrough(&self) -> Result<bool, BackendError> {
        self.runtime.disable_passthrough().await?;
        Ok(true)
    }

    async fn get_hand_joints(&self) -> Result<Vec<Hand>, BackendError> {
        let poses = self.runtime.hand_poses().await?;
        Ok(poses.into_iter().map(map_hand).collect())
    }

    async fn get_scene_planes(&self) -> Result<Vec<Plane>, BackendError> {
        let planes = self.runtime.detected_planes().await?;
        Ok(planes.into_iter().filter_map(map_plane).collect())
    }

    async fn get_scene_volumes(&self) -> Result<Vec<Volume>, BackendError> {
        let volumes = self.runtime.detected_volumes().await?;
        let mapped: Vec<Volume> = volumes.into_iter().filter_map(map_volume).collect();
        debug!(count = mapped.len(), "Mapped container-like volumes");
        Ok(mapped)
    }

    async fn is_supported(&self) -> bool {
        self.context_initialized
    }

    async fn start_hand_tracking(&self) {
        // The device runtime streams continuously; there is no jitter toggle
        // to flip on real hardware.
        debug!("Hand tracking flagged active (device)");
    }

    async fn stop_hand_tracking(&self) {
        debug!("Hand tracking flagged inactive (device)");
    }
}

fn map_hand(pose: RuntimeHandPose) -> Hand {
    let hand_type = if pose.is_left {
        HandType::Left
    } else {
        HandType::Right
    };
    let joints = pose
        .joints
        .into_iter()
        .enumerate()
        .map(|(i, j)| Joint {
            id: format!("{}-joint-{}", hand_type, i),
            position: j.position,
            rotation: j.rotation,
            confidence: j.confidence,
        })
        .collect();
    Hand {
        hand_type,
        is_tracked: pose.is_tracked,
        joints,
    }
}

fn map_plane(plane: RuntimePlane) -> Option<Plane> {
    let label = match plane.semantic_label.to_lowercase().as_str() {
        "floor" => PlaneLabel::Floor,
        "wall" => PlaneLabel::Wall,
        "ceiling" => PlaneLabel::Ceiling,
        "table" | "desk" => PlaneLabel::Table,
        other => {
            debug!(label = other, "Dropping plane with unknown semantic label");
            return None;
        }
    };
    Some(Plane {
        id: plane.id,
        normal: plane.normal,
        center: plane.center,
        size: PlaneExtent {
            width: plane.width,
            height: plane.height,
        },
        label,
        confidence: plane.confidence,
    })
}

/// Map a runtime volume, keeping only container-like semantic labels
fn map_volume(volume: RuntimeVolume) -> Option<Volume> {
    let label = classify_container_label(&volume.semantic_label)?;
    let size = VolumeSize {
        width: volume.size.x,
        height: volume.size.y,
        depth: volume.size.z,
    };
    Some(Volume {
        id: volume.id,
        center: volume.center,
        size,
        label,
        confidence: volume.confidence,
        bounds: Bounds::from_center_size(volume.center, size),
    })
}

/// Container classification of vendor semantic labels. Labels mentioning
/// luggage or containers map to suitcase; anything else is discarded.
fn classify_container_label(semantic_label: &str) -> Option<VolumeLabel> {
    let label = semantic_label.to_lowercase();
    if label.contains("suitcase") || label.contains("luggage") || label.contains("container") {
        Some(VolumeLabel::Suitcase)
    } else if label.contains("box") {
        Some(VolumeLabel::Box)
    } else if label.contains("storage") {
        Some(VolumeLabel::Storage)
    } else {
        if !label.is_empty() {
            warn!(label = %semantic_label, "Dropping non-container volume");
        }
        None
    }
}
