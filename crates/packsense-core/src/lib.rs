//! PackSense Core - Data model and gesture classification
//!
//! This crate provides the foundational types for the PackSense perception
//! pipeline:
//! - Hand tracking types (joints, hands, gesture events)
//! - Scene types (planes, volumes, scene snapshots)
//! - The geometric gesture classifier

pub mod gesture;
pub mod hand;
pub mod scene;

pub use gesture::{detect_gestures, GestureRecognizer, DEFAULT_SENSITIVITY};
pub use hand::{GestureEvent, GestureKind, Hand, HandType, Joint, Vector3, HAND_JOINT_COUNT};
pub use scene::{Bounds, Plane, PlaneExtent, PlaneLabel, SceneSnapshot, Volume, VolumeLabel, VolumeSize};
