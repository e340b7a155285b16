//! Geometric gesture classifier
//!
//! A deliberately simple heuristic over joint-to-joint Euclidean distances,
//! not a vision model. For each tracked hand it scores the four known
//! gestures, picks the winner, and emits an event only if the winning score
//! clears the sensitivity threshold.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::hand::{
    GestureEvent, GestureKind, Hand, Joint, INDEX_BASE, INDEX_TIP, MIDDLE_TIP, PALM_JOINT,
    THUMB_TIP,
};

/// Default winning-score threshold below which no event is emitted
pub const DEFAULT_SENSITIVITY: f64 = 0.7;

/// A fingertip farther than this from the palm counts as extended
const EXTENDED_FINGER_DIST: f64 = 0.10;
/// A fingertip closer than this to the palm counts as closed
const CLOSED_FINGER_DIST: f64 = 0.08;
/// Thumb-index distance at which pinch confidence reaches zero
const PINCH_MAX_DIST: f64 = 0.10;
/// Fixed confidence assigned to a recognized point gesture
const POINT_CONFIDENCE: f64 = 0.9;

fn joint_distance(a: &Joint, b: &Joint) -> f64 {
    a.position.distance(&b.position)
}

/// Fraction of fingertips extended away from the palm, clamped to [0, 1]
fn score_palm_open(hand: &Hand) -> f64 {
    let palm = hand.palm();
    let extended = hand
        .fingertips()
        .filter(|tip| joint_distance(palm, tip) > EXTENDED_FINGER_DIST)
        .count();
    (extended as f64 / 5.0).min(1.0)
}

/// Thumb-index proximity: 1 at contact, 0 at or beyond [`PINCH_MAX_DIST`]
fn score_pinch(hand: &Hand) -> f64 {
    let distance = joint_distance(&hand.joints[THUMB_TIP], &hand.joints[INDEX_TIP]);
    (1.0 - distance / PINCH_MAX_DIST).max(0.0)
}

/// Fraction of fingertips curled against the palm
fn score_fist(hand: &Hand) -> f64 {
    let palm = hand.palm();
    let closed = hand
        .fingertips()
        .filter(|tip| joint_distance(palm, tip) < CLOSED_FINGER_DIST)
        .count();
    closed as f64 / 5.0
}

/// Index extended while the middle finger is curled: all-or-nothing
fn score_point(hand: &Hand) -> f64 {
    let index_extended =
        joint_distance(&hand.joints[INDEX_BASE], &hand.joints[INDEX_TIP]) > CLOSED_FINGER_DIST;
    let middle_curled =
        joint_distance(&hand.joints[PALM_JOINT], &hand.joints[MIDDLE_TIP]) < CLOSED_FINGER_DIST;
    if index_extended && middle_curled {
        POINT_CONFIDENCE
    } else {
        0.0
    }
}

/// Classify a hand-pair sample into gesture events.
///
/// Deterministic and state-free: identical joints produce identical events.
/// Hands that are untracked or carry an incomplete joint set are skipped.
/// Per hand, the highest-scoring gesture wins (ties broken by evaluation
/// order: palm_open, pinch, fist, point) and an event is emitted only if the
/// winning score strictly exceeds `sensitivity`.
pub fn detect_gestures(hands: &[Hand], sensitivity: f64) -> Vec<GestureEvent> {
    let timestamp = Utc::now();
    let mut events = Vec::new();

    for hand in hands {
        if !hand.is_classifiable() {
            continue;
        }

        let candidates = [
            (GestureKind::PalmOpen, score_palm_open(hand)),
            (GestureKind::Pinch, score_pinch(hand)),
            (GestureKind::Fist, score_fist(hand)),
            (GestureKind::Point, score_point(hand)),
        ];

        let mut best = candidates[0];
        for candidate in &candidates[1..] {
            if candidate.1 > best.1 {
                best = *candidate;
            }
        }

        if best.1 > sensitivity {
            debug!(
                hand = %hand.hand_type,
                gesture = %best.0,
                confidence = best.1,
                "Gesture recognized"
            );
            events.push(GestureEvent {
                kind: best.0,
                confidence: best.1,
                hand_type: hand.hand_type,
                timestamp,
            });
        }
    }

    events
}

/// Owns the classifier's sensitivity threshold and calibration stamp.
///
/// Scoring itself is a pure function; this service only carries the
/// adjustable gate applied to winning scores.
#[derive(Debug, Clone)]
pub struct GestureRecognizer {
    sensitivity: f64,
    calibrated_at: Option<DateTime<Utc>>,
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new(DEFAULT_SENSITIVITY)
    }
}

impl GestureRecognizer {
    pub fn new(sensitivity: f64) -> Self {
        Self {
            sensitivity: sensitivity.clamp(0.0, 1.0),
            calibrated_at: None,
        }
    }

    pub fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    /// Adjust the emission threshold, clamped to [0, 1]
    pub fn set_sensitivity(&mut self, sensitivity: f64) {
        self.sensitivity = sensitivity.clamp(0.0, 1.0);
        info!(sensitivity = self.sensitivity, "Gesture sensitivity adjusted");
    }

    /// Stamp a calibration pass. Does not alter the scoring math.
    pub fn calibrate(&mut self) {
        self.calibrated_at = Some(Utc::now());
        info!("Gesture recognizer calibrated");
    }

    pub fn calibrated_at(&self) -> Option<DateTime<Utc>> {
        self.calibrated_at
    }

    /// Classify a hand-pair sample at this recognizer's sensitivity
    pub fn detect(&self, hands: &[Hand]) -> Vec<GestureEvent> {
        detect_gestures(hands, self.sensitivity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::{HandType, Vector3, FINGERTIP_JOINTS, HAND_JOINT_COUNT};

    /// Build a hand with every joint at the palm position, then let tests
    /// reposition individual joints to shape a pose.
    fn neutral_hand(hand_type: HandType) -> Hand {
        let joints = (0..HAND_JOINT_COUNT)
            .map(|i| Joint {
                id: format!("{}-joint-{}", hand_type, i),
                position: Vector3::new(0.0, 0.0, 0.0),
                rotation: Vector3::default(),
                confidence: 1.0,
            })
            .collect();
        Hand {
            hand_type,
            is_tracked: true,
            joints,
        }
    }

    fn open_hand(hand_type: HandType) -> Hand {
        let mut hand = neutral_hand(hand_type);
        for (n, &idx) in FINGERTIP_JOINTS.iter().enumerate() {
            // Fingertips spread well past the extended-finger threshold
            hand.joints[idx].position = Vector3::new(0.15, 0.05 * n as f64, 0.0);
        }
        // Pull the thumb away from the index tip so pinch does not compete
        hand.joints[THUMB_TIP].position = Vector3::new(-0.15, 0.0, 0.0);
        hand
    }

    fn pinching_hand(hand_type: HandType, thumb_index_dist: f64) -> Hand {
        let mut hand = neutral_hand(hand_type);
        // Move all fingertips out of the closed band so fist scores zero
        for &idx in &FINGERTIP_JOINTS {
            hand.joints[idx].position = Vector3::new(0.09, 0.0, 0.0);
        }
        hand.joints[THUMB_TIP].position = Vector3::new(0.09, 0.0, 0.0);
        hand.joints[INDEX_TIP].position = Vector3::new(0.09 + thumb_index_dist, 0.0, 0.0);
        hand
    }

    fn fist_hand(hand_type: HandType, closed_fingers: usize) -> Hand {
        // Closed fingertips sit 0.05 from the palm but spread across axes so
        // the thumb-index distance stays large enough that pinch cannot
        // outscore the fist.
        const CURLED: [Vector3; 5] = [
            Vector3 { x: 0.05, y: 0.0, z: 0.0 },
            Vector3 { x: 0.0, y: 0.05, z: 0.0 },
            Vector3 { x: 0.0, y: 0.0, z: 0.05 },
            Vector3 { x: -0.05, y: 0.0, z: 0.0 },
            Vector3 { x: 0.0, y: -0.05, z: 0.0 },
        ];
        let mut hand = neutral_hand(hand_type);
        for (n, &idx) in FINGERTIP_JOINTS.iter().enumerate() {
            if n < closed_fingers {
                hand.joints[idx].position = CURLED[n];
            } else {
                hand.joints[idx].position = Vector3::new(0.12, 0.05 * n as f64, 0.1);
            }
        }
        hand
    }

    fn pointing_hand(hand_type: HandType) -> Hand {
        let mut hand = neutral_hand(hand_type);
        // Index extended from its base, everything else curled at the palm
        hand.joints[INDEX_BASE].position = Vector3::new(0.03, 0.0, 0.0);
        hand.joints[INDEX_TIP].position = Vector3::new(0.15, 0.0, 0.0);
        hand
    }

    #[test]
    fn test_palm_open_detected() {
        let events = detect_gestures(&[open_hand(HandType::Left)], DEFAULT_SENSITIVITY);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, GestureKind::PalmOpen);
        assert_eq!(events[0].hand_type, HandType::Left);
        assert!((events[0].confidence - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_pinch_confidence_endpoints() {
        let touching = pinching_hand(HandType::Right, 0.0);
        assert!((score_pinch(&touching) - 1.0).abs() < 1e-9);

        let apart = pinching_hand(HandType::Right, 0.10);
        assert_eq!(score_pinch(&apart), 0.0);

        let far = pinching_hand(HandType::Right, 0.5);
        assert_eq!(score_pinch(&far), 0.0);
    }

    #[test]
    fn test_pinch_confidence_monotonic_in_distance() {
        let mut previous = f64::INFINITY;
        for step in 0..=10 {
            let dist = step as f64 * 0.01;
            let score = score_pinch(&pinching_hand(HandType::Right, dist));
            assert!(
                score <= previous,
                "pinch score increased at distance {dist}"
            );
            previous = score;
        }
    }

    #[test]
    fn test_fist_confidence_equals_closed_over_five() {
        for closed in 0..=5 {
            let hand = fist_hand(HandType::Left, closed);
            let expected = closed as f64 / 5.0;
            assert!((score_fist(&hand) - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_point_requires_both_conditions() {
        let hand = pointing_hand(HandType::Right);
        assert_eq!(score_point(&hand), POINT_CONFIDENCE);

        // Curl the index back in: no point
        let mut curled = pointing_hand(HandType::Right);
        curled.joints[INDEX_TIP].position = curled.joints[INDEX_BASE].position;
        assert_eq!(score_point(&curled), 0.0);

        // Extend the middle finger: no point
        let mut middle_out = pointing_hand(HandType::Right);
        middle_out.joints[MIDDLE_TIP].position = Vector3::new(0.15, 0.0, 0.0);
        assert_eq!(score_point(&middle_out), 0.0);
    }

    #[test]
    fn test_deterministic_for_fixed_joints() {
        let hands = vec![open_hand(HandType::Left), pinching_hand(HandType::Right, 0.0)];
        let a = detect_gestures(&hands, DEFAULT_SENSITIVITY);
        let b = detect_gestures(&hands, DEFAULT_SENSITIVITY);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.kind, y.kind);
            assert_eq!(x.confidence, y.confidence);
            assert_eq!(x.hand_type, y.hand_type);
        }
    }

    #[test]
    fn test_untracked_or_incomplete_hands_skipped() {
        let mut untracked = open_hand(HandType::Left);
        untracked.is_tracked = false;

        let mut incomplete = open_hand(HandType::Right);
        incomplete.joints.truncate(20);

        let events = detect_gestures(&[untracked, incomplete], DEFAULT_SENSITIVITY);
        assert!(events.is_empty());
    }

    #[test]
    fn test_sensitivity_gate_is_strict() {
        // A fist with 4 of 5 fingers closed scores exactly 0.8
        let hand = fist_hand(HandType::Left, 4);
        assert!(detect_gestures(&[hand.clone()], 0.8).is_empty());
        let events = detect_gestures(&[hand], 0.7);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, GestureKind::Fist);
    }

    #[test]
    fn test_tie_breaks_to_evaluation_order() {
        // With every joint collapsed onto the palm, pinch and fist both
        // score 1.0; pinch comes first in evaluation order and must win
        // the tie.
        let hand = neutral_hand(HandType::Right);
        let events = detect_gestures(&[hand], DEFAULT_SENSITIVITY);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, GestureKind::Pinch);
    }

    #[test]
    fn test_recognizer_sensitivity_clamped() {
        let mut recognizer = GestureRecognizer::default();
        assert_eq!(recognizer.sensitivity(), DEFAULT_SENSITIVITY);
        recognizer.set_sensitivity(1.5);
        assert_eq!(recognizer.sensitivity(), 1.0);
        recognizer.set_sensitivity(-0.2);
        assert_eq!(recognizer.sensitivity(), 0.0);
    }

    #[test]
    fn test_recognizer_calibrate_stamps_time() {
        let mut recognizer = GestureRecognizer::default();
        assert!(recognizer.calibrated_at().is_none());
        recognizer.calibrate();
        assert!(recognizer.calibrated_at().is_some());
    }
}
