//! Hand tracking types: joints, hands, and gesture events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of tracked skeletal joints per hand.
///
/// The joint order is fixed and semantically meaningful: index 0 is the
/// palm/wrist root, indices 4/8/12/16/20 are the five fingertips (thumb
/// through pinky), and index 5 is the index-finger base. The classifier
/// depends on this exact indexing.
pub const HAND_JOINT_COUNT: usize = 21;

/// Joint index of the palm/wrist root.
pub const PALM_JOINT: usize = 0;
/// Joint index of the thumb tip.
pub const THUMB_TIP: usize = 4;
/// Joint index of the index-finger base.
pub const INDEX_BASE: usize = 5;
/// Joint index of the index fingertip.
pub const INDEX_TIP: usize = 8;
/// Joint index of the middle fingertip.
pub const MIDDLE_TIP: usize = 12;
/// Joint indices of the five fingertips, thumb through pinky.
pub const FINGERTIP_JOINTS: [usize; 5] = [4, 8, 12, 16, 20];

/// A 3D vector in meters (right-handed, Y up).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Vector3) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl std::fmt::Display for Vector3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

/// Which hand a sample or event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandType {
    Left,
    Right,
}

impl HandType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HandType::Left => "left",
            HandType::Right => "right",
        }
    }
}

impl std::fmt::Display for HandType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One tracked skeletal point of a hand
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Joint {
    /// Stable identity, e.g. "left-joint-4"
    pub id: String,
    pub position: Vector3,
    /// Euler rotation in radians
    pub rotation: Vector3,
    /// Tracking confidence in [0, 1]
    pub confidence: f64,
}

/// One sampled hand: exactly [`HAND_JOINT_COUNT`] joints in fixed order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hand {
    pub hand_type: HandType,
    pub is_tracked: bool,
    pub joints: Vec<Joint>,
}

impl Hand {
    /// Whether this hand carries a full, classifiable joint set
    pub fn is_classifiable(&self) -> bool {
        self.is_tracked && self.joints.len() == HAND_JOINT_COUNT
    }

    /// The palm/wrist root joint.
    ///
    /// Panics if the hand carries fewer than [`HAND_JOINT_COUNT`] joints;
    /// gate on [`Hand::is_classifiable`] before using the indexed accessors.
    pub fn palm(&self) -> &Joint {
        &self.joints[PALM_JOINT]
    }

    /// The five fingertip joints, thumb through pinky.
    ///
    /// Same full-joint-set precondition as [`Hand::palm`].
    pub fn fingertips(&self) -> impl Iterator<Item = &Joint> {
        FINGERTIP_JOINTS.iter().map(|&i| &self.joints[i])
    }
}

/// A discrete hand-pose classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    PalmOpen,
    Pinch,
    Fist,
    Point,
}

impl std::fmt::Display for GestureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GestureKind::PalmOpen => "palm_open",
            GestureKind::Pinch => "pinch",
            GestureKind::Fist => "fist",
            GestureKind::Point => "point",
        };
        write!(f, "{s}")
    }
}

/// A classified gesture for one hand at one sampling tick.
///
/// Events are created fresh each classification pass and superseded wholesale
/// by the next pass; they are never mutated or merged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureEvent {
    pub kind: GestureKind,
    /// Winning score in [0, 1]
    pub confidence: f64,
    pub hand_type: HandType,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector3_distance() {
        let a = Vector3::new(0.0, 0.0, 0.0);
        let b = Vector3::new(3.0, 4.0, 0.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-9);
        assert_eq!(a.distance(&a), 0.0);
    }

    #[test]
    fn test_fingertip_indices_within_joint_count() {
        for idx in FINGERTIP_JOINTS {
            assert!(idx < HAND_JOINT_COUNT);
        }
        assert!(INDEX_BASE < HAND_JOINT_COUNT);
    }

    #[test]
    fn test_short_joint_set_is_not_classifiable() {
        let joints: Vec<Joint> = (0..HAND_JOINT_COUNT - 1)
            .map(|i| Joint {
                id: format!("left-joint-{i}"),
                position: Vector3::default(),
                rotation: Vector3::default(),
                confidence: 1.0,
            })
            .collect();
        let hand = Hand {
            hand_type: HandType::Left,
            is_tracked: true,
            joints,
        };
        // Callers must check this before touching the indexed accessors
        assert!(!hand.is_classifiable());
    }

    #[test]
    fn test_hand_type_serde_lowercase() {
        let json = serde_json::to_string(&HandType::Left).unwrap();
        assert_eq!(json, "\"left\"");
        let kind = serde_json::to_string(&GestureKind::PalmOpen).unwrap();
        assert_eq!(kind, "\"palm_open\"");
    }
}
