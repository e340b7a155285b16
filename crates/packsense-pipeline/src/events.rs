//! Perception events for real-time consumers

use packsense_core::GestureEvent;

/// Event broadcast by the pipeline services as perception state changes
#[derive(Debug, Clone)]
pub enum PerceptionEvent {
    /// Passthrough feed activated
    PassthroughStarted,
    /// Passthrough feed deactivated
    PassthroughStopped,
    /// A scene scan began
    ScanStarted,
    /// A scene scan completed and its snapshot was published
    ScanCompleted { planes: usize, volumes: usize },
    /// A scene scan failed; the previous snapshot was retained
    ScanFailed,
    /// The derived container-present signal, recomputed per snapshot
    ContainerDetected(bool),
    /// A gesture cleared the sensitivity gate this tick
    GestureDetected(GestureEvent),
}
