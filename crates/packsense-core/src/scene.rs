//! Scene types: detected planes, volumes, and scene snapshots

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::hand::Vector3;

/// Semantic label of a detected flat surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaneLabel {
    Floor,
    Wall,
    Ceiling,
    Table,
}

/// Semantic label of a detected bounded 3D region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeLabel {
    Suitcase,
    Box,
    Storage,
    Furniture,
}

impl VolumeLabel {
    /// Whether this label counts as a packable container. Suitcases come
    /// from both backends; box/storage labels only ever come from a real
    /// device runtime.
    pub fn is_container(&self) -> bool {
        matches!(self, VolumeLabel::Suitcase | VolumeLabel::Box | VolumeLabel::Storage)
    }
}

/// 2D extent of a plane in meters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneExtent {
    pub width: f64,
    pub height: f64,
}

/// 3D extent of a volume in meters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeSize {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

/// Axis-aligned bounding box. Invariant: `max >= min` componentwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vector3,
    pub max: Vector3,
}

impl Bounds {
    /// Derive bounds from a center point and a full extent
    pub fn from_center_size(center: Vector3, size: VolumeSize) -> Self {
        let half = Vector3::new(size.width / 2.0, size.height / 2.0, size.depth / 2.0);
        Self {
            min: Vector3::new(center.x - half.x, center.y - half.y, center.z - half.z),
            max: Vector3::new(center.x + half.x, center.y + half.y, center.z + half.z),
        }
    }

    /// Whether a point lies inside (inclusive) this box
    pub fn contains(&self, point: &Vector3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }
}

/// A detected flat surface in the scanned environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plane {
    pub id: String,
    pub normal: Vector3,
    pub center: Vector3,
    pub size: PlaneExtent,
    pub label: PlaneLabel,
    /// Detection confidence in [0, 1]
    pub confidence: f64,
}

/// A detected bounded 3D region in the scanned environment.
///
/// `bounds` is derivable from `center` and `size` but carried explicitly
/// because some producers compute it directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Volume {
    pub id: String,
    pub center: Vector3,
    pub size: VolumeSize,
    pub label: VolumeLabel,
    /// Detection confidence in [0, 1]
    pub confidence: f64,
    pub bounds: Bounds,
}

impl Volume {
    /// Construct a volume, deriving bounds from center and size
    pub fn from_center_size(
        id: impl Into<String>,
        center: Vector3,
        size: VolumeSize,
        label: VolumeLabel,
        confidence: f64,
    ) -> Self {
        Self {
            id: id.into(),
            center,
            size,
            label,
            confidence,
            bounds: Bounds::from_center_size(center, size),
        }
    }
}

/// The latest consistent set of detected planes and volumes from one scan.
///
/// Snapshots are replaced wholesale on each scan, never partially updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub planes: Vec<Plane>,
    pub volumes: Vec<Volume>,
    pub timestamp: DateTime<Utc>,
    pub is_scanning: bool,
}

impl SceneSnapshot {
    /// Whether a container volume is present above the given confidence
    pub fn container_detected(&self, threshold: f64) -> bool {
        self.volumes
            .iter()
            .any(|v| v.label.is_container() && v.confidence > threshold)
    }

    /// First detected suitcase volume, if any
    pub fn suitcase_volume(&self) -> Option<&Volume> {
        self.volumes.iter().find(|v| v.label == VolumeLabel::Suitcase)
    }

    /// First detected floor plane, if any
    pub fn floor_plane(&self) -> Option<&Plane> {
        self.planes.iter().find(|p| p.label == PlaneLabel::Floor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suitcase(confidence: f64) -> Volume {
        Volume::from_center_size(
            "suitcase-1",
            Vector3::new(0.5, 0.3, -1.0),
            VolumeSize {
                width: 0.6,
                height: 0.4,
                depth: 0.3,
            },
            VolumeLabel::Suitcase,
            confidence,
        )
    }

    #[test]
    fn test_bounds_from_center_size() {
        let v = suitcase(0.9);
        assert!((v.bounds.min.x - 0.2).abs() < 1e-9);
        assert!((v.bounds.max.x - 0.8).abs() < 1e-9);
        assert!((v.bounds.min.z - (-1.15)).abs() < 1e-9);
        assert!((v.bounds.max.z - (-0.85)).abs() < 1e-9);
        // Invariant: max >= min componentwise
        assert!(v.bounds.max.x >= v.bounds.min.x);
        assert!(v.bounds.max.y >= v.bounds.min.y);
        assert!(v.bounds.max.z >= v.bounds.min.z);
    }

    #[test]
    fn test_bounds_contains() {
        let v = suitcase(0.9);
        assert!(v.bounds.contains(&v.center));
        assert!(!v.bounds.contains(&Vector3::new(2.0, 0.3, -1.0)));
    }

    #[test]
    fn test_container_detected_threshold() {
        let snapshot = SceneSnapshot {
            planes: Vec::new(),
            volumes: vec![suitcase(0.1)],
            timestamp: Utc::now(),
            is_scanning: false,
        };
        assert!(!snapshot.container_detected(0.7));

        let snapshot = SceneSnapshot {
            volumes: vec![suitcase(0.9)],
            ..snapshot
        };
        assert!(snapshot.container_detected(0.7));
    }

    #[test]
    fn test_container_requires_suitcase_label() {
        let mut v = suitcase(0.95);
        v.label = VolumeLabel::Furniture;
        let snapshot = SceneSnapshot {
            planes: Vec::new(),
            volumes: vec![v],
            timestamp: Utc::now(),
            is_scanning: false,
        };
        assert!(!snapshot.container_detected(0.7));
        assert!(snapshot.suitcase_volume().is_none());
    }
}
