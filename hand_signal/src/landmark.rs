//! Landmark model for one detector result.
//!
//! A detector result holds zero or more hands; each hand is an ordered list of
//! [`LANDMARKS_PER_HAND`] points with `x`/`y` normalised to the camera image
//! (`0.0` = left/top, `1.0` = right/bottom) and a relative depth `z`.

// ════════════════════════════════════════════════════════════════════════════
// Landmark indices (21-point hand topology)
// ════════════════════════════════════════════════════════════════════════════

pub const LANDMARKS_PER_HAND: usize = 21;

pub const WRIST:             usize = 0;
pub const THUMB_TIP:         usize = 4;
/// Base joint of the middle finger; the hand's reference point.
pub const MIDDLE_FINGER_MCP: usize = 9;

// ════════════════════════════════════════════════════════════════════════════
// Landmark
// ════════════════════════════════════════════════════════════════════════════

/// A single landmark in normalised image coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Landmark { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Hand
// ════════════════════════════════════════════════════════════════════════════

/// One tracked hand: an ordered landmark list.
///
/// Nothing stops a detector from handing over a truncated list, so the list
/// is kept as a `Vec` and checked with [`Hand::is_well_formed`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Hand {
    pub landmarks: Vec<Landmark>,
}

impl Hand {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Hand { landmarks }
    }

    /// A hand with every landmark at `(x, y)`.  Synthetic sources use this
    /// when only the reference point matters.
    pub fn uniform(x: f32, y: f32) -> Self {
        Hand { landmarks: vec![Landmark::new(x, y, 0.0); LANDMARKS_PER_HAND] }
    }

    /// A uniform hand whose reference landmark is moved to `(x, y)`.
    pub fn anchored(x: f32, y: f32, rest: Landmark) -> Self {
        let mut landmarks = vec![rest; LANDMARKS_PER_HAND];
        landmarks[MIDDLE_FINGER_MCP] = Landmark::new(x, y, rest.z);
        Hand { landmarks }
    }

    pub fn landmark(&self, index: usize) -> Option<&Landmark> {
        self.landmarks.get(index)
    }

    /// The middle-finger base joint, if present.
    pub fn reference(&self) -> Option<&Landmark> {
        self.landmark(MIDDLE_FINGER_MCP)
    }

    /// True when the list has the full topology and every point is finite.
    pub fn is_well_formed(&self) -> bool {
        self.landmarks.len() == LANDMARKS_PER_HAND
            && self.landmarks.iter().all(Landmark::is_finite)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// DetectionResult
// ════════════════════════════════════════════════════════════════════════════

/// Everything the detector reported for one processed camera frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetectionResult {
    pub hands: Vec<Hand>,
}

impl DetectionResult {
    /// A result with no hands in view.
    pub fn empty() -> Self {
        DetectionResult { hands: Vec::new() }
    }

    pub fn single(hand: Hand) -> Self {
        DetectionResult { hands: vec![hand] }
    }

    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }

    pub fn first_hand(&self) -> Option<&Hand> {
        self.hands.first()
    }

    /// Drop hands beyond `max_hands`, keeping detector order.
    pub fn truncate(&mut self, max_hands: usize) {
        self.hands.truncate(max_hands);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_hand_is_well_formed() {
        let h = Hand::uniform(0.3, 0.7);
        assert!(h.is_well_formed());
        assert_eq!(h.reference(), Some(&Landmark::new(0.3, 0.7, 0.0)));
    }

    #[test]
    fn short_hand_is_malformed() {
        let h = Hand::new(vec![Landmark::default(); MIDDLE_FINGER_MCP]);
        assert!(!h.is_well_formed());
        assert!(h.reference().is_none());
    }

    #[test]
    fn nan_landmark_is_malformed() {
        let mut h = Hand::uniform(0.5, 0.5);
        h.landmarks[THUMB_TIP].x = f32::NAN;
        assert!(!h.is_well_formed());
    }

    #[test]
    fn anchored_moves_only_reference() {
        let h = Hand::anchored(0.1, 0.2, Landmark::new(0.5, 0.5, -0.1));
        assert_eq!(h.landmarks[MIDDLE_FINGER_MCP], Landmark::new(0.1, 0.2, -0.1));
        assert_eq!(h.landmarks[WRIST], Landmark::new(0.5, 0.5, -0.1));
    }

    #[test]
    fn truncate_keeps_first_hands() {
        let mut r = DetectionResult {
            hands: vec![Hand::uniform(0.1, 0.1), Hand::uniform(0.9, 0.9)],
        };
        r.truncate(1);
        assert_eq!(r.hands.len(), 1);
        assert_eq!(r.first_hand(), Some(&Hand::uniform(0.1, 0.1)));
    }
}
