//! The displacement signal consumed by the particle field.

use std::fmt;

use glam::Vec2;

use crate::landmark::Landmark;

/// Map a normalised image point to the centred, mirrored signal space.
///
/// `x` is mirrored so that a hand moving right in a selfie view moves the
/// field right; `y` is flipped so that up is positive.
pub fn centre_and_mirror(x: f32, y: f32) -> Vec2 {
    Vec2::new((x - 0.5) * -2.0, (0.5 - y) * 2.0)
}

// ════════════════════════════════════════════════════════════════════════════
// DisplacementSignal
// ════════════════════════════════════════════════════════════════════════════

/// Optional 2D hand position in `[-1, 1]²` (for in-image landmarks).
///
/// `none()` means no hand was detected in the most recent result.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DisplacementSignal(Option<Vec2>);

impl DisplacementSignal {
    pub const NONE: DisplacementSignal = DisplacementSignal(None);

    pub fn none() -> Self {
        Self::NONE
    }

    pub fn at(x: f32, y: f32) -> Self {
        DisplacementSignal(Some(Vec2::new(x, y)))
    }

    /// Signal for a reference landmark.
    pub fn from_landmark(l: &Landmark) -> Self {
        DisplacementSignal(Some(centre_and_mirror(l.x, l.y)))
    }

    pub fn position(&self) -> Option<Vec2> {
        self.0
    }

    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }

    pub fn state(&self) -> TrackingState {
        if self.is_present() { TrackingState::Tracking } else { TrackingState::AtRest }
    }
}

impl From<Option<Vec2>> for DisplacementSignal {
    fn from(v: Option<Vec2>) -> Self {
        DisplacementSignal(v)
    }
}

/// Two-decimal readout, `IDLE` when absent.
impl fmt::Display for DisplacementSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(p) => write!(f, "{:.2}, {:.2}", p.x, p.y),
            None    => f.write_str("IDLE"),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// TrackingState
// ════════════════════════════════════════════════════════════════════════════

/// Which constants the field uses this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackingState {
    AtRest,
    Tracking,
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
