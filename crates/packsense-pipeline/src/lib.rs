//! PackSense Pipeline - the perception services over a spatial backend
//!
//! Three cooperating services, each the single publisher of its own state:
//! - [`HandTracker`]: recurring ~60 Hz hand sampling and gesture
//!   classification
//! - [`SceneDetector`]: one-shot concurrent plane/volume scans and the
//!   derived container-detected signal
//! - [`PassthroughController`]: the passthrough activation handshake
//!
//! All services emit [`PerceptionEvent`]s on broadcast channels for
//! real-time consumers (screens, drop logic).

pub mod events;
pub mod passthrough;
pub mod scene;
pub mod tracking;

pub use events::PerceptionEvent;
pub use passthrough::PassthroughController;
pub use scene::{SceneDetector, ScanError, DEFAULT_CONTAINER_THRESHOLD};
pub use tracking::{HandTracker, TrackingState, DEFAULT_CADENCE};
