//! Hand Position Source adapter.
//!
//! [`HandPositionSource`] is the single-slot store between the detector and
//! the frame loop.  Each detector result overwrites the slot; the frame loop
//! reads whatever is there, however stale.  There is no queue because only
//! the latest sample matters.
//!
//! The adapter also owns the one-shot "tracking acquired" latch that the UI
//! uses to dismiss its onboarding prompt.

use tracing::{info, warn};

use crate::landmark::DetectionResult;
use crate::signal::DisplacementSignal;

/// Malformed payloads are logged on the first hit and then every this many.
const MALFORMED_LOG_EVERY: u64 = 300;

// ════════════════════════════════════════════════════════════════════════════
// Reading — classification of one detector result
// ════════════════════════════════════════════════════════════════════════════

/// What a single detector result says about the first hand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Reading {
    /// No hands in the result.
    NoHand,
    /// First hand present and well formed.
    Hand(DisplacementSignal),
    /// First hand present but unusable (short list, non-finite point).
    Malformed,
}

impl Reading {
    /// Classify a result.  Hands after the first are never inspected.
    pub fn of(result: &DetectionResult) -> Self {
        let Some(hand) = result.first_hand() else {
            return Reading::NoHand;
        };
        if !hand.is_well_formed() {
            return Reading::Malformed;
        }
        match hand.reference() {
            Some(l) => Reading::Hand(DisplacementSignal::from_landmark(l)),
            None    => Reading::Malformed,
        }
    }

    /// Every anomaly degrades to "no hand".
    pub fn signal(self) -> DisplacementSignal {
        match self {
            Reading::Hand(s) => s,
            Reading::NoHand | Reading::Malformed => DisplacementSignal::none(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AcquisitionLatch
// ════════════════════════════════════════════════════════════════════════════

/// Fires once, on the first tracking observation, and never again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AcquisitionLatch {
    fired: bool,
}

impl AcquisitionLatch {
    /// Returns true exactly once: the first call with `tracking == true`.
    pub fn observe(&mut self, tracking: bool) -> bool {
        if tracking && !self.fired {
            self.fired = true;
            return true;
        }
        false
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SourceUpdate
// ════════════════════════════════════════════════════════════════════════════

/// Result of feeding one detector result through the adapter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourceUpdate {
    pub signal: DisplacementSignal,
    /// True on the single update that first carried a hand.
    pub first_acquisition: bool,
}

// ════════════════════════════════════════════════════════════════════════════
// HandPositionSource
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
pub struct HandPositionSource {
    slot:      DisplacementSignal,
    latch:     AcquisitionLatch,
    results:   u64,
    malformed: u64,
    closed:    bool,
}

impl HandPositionSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one detector result.  Overwrites the slot (last value wins).
    ///
    /// Returns `None` once the source has been closed; late results
    /// delivered during teardown are dropped on the floor.
    pub fn ingest(&mut self, result: &DetectionResult) -> Option<SourceUpdate> {
        if self.closed {
            return None;
        }
        self.results += 1;

        let reading = Reading::of(result);
        if reading == Reading::Malformed {
            self.malformed += 1;
            if self.malformed == 1 || self.malformed % MALFORMED_LOG_EVERY == 0 {
                warn!(
                    count = self.malformed,
                    "malformed hand landmarks in detector result; treating as no hand"
                );
            }
        }

        self.slot = reading.signal();
        let first_acquisition = self.latch.observe(self.slot.is_present());
        if first_acquisition {
            info!(signal = %self.slot, "hand tracking acquired");
        }

        Some(SourceUpdate { signal: self.slot, first_acquisition })
    }

    /// The current slot value.  Stays put while the detector stalls.
    pub fn signal(&self) -> DisplacementSignal {
        self.slot
    }

    pub fn has_acquired(&self) -> bool {
        self.latch.has_fired()
    }

    /// True once any result (hand or not) has arrived.
    pub fn has_received(&self) -> bool {
        self.results > 0
    }

    pub fn results_seen(&self) -> u64 {
        self.results
    }

    pub fn malformed_seen(&self) -> u64 {
        self.malformed
    }

    /// Stop accepting results and fall back to rest.  Idempotent.
    pub fn close(&mut self) {
        if !self.closed {
            info!(results = self.results, "hand position source closed");
        }
        self.closed = true;
        self.slot = DisplacementSignal::none();
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::{Hand, Landmark, MIDDLE_FINGER_MCP};

    #[test]
    fn empty_result_is_no_hand() {
        assert_eq!(Reading::of(&DetectionResult::empty()), Reading::NoHand);
    }

    #[test]
    fn truncated_first_hand_is_malformed() {
        let r = DetectionResult::single(Hand::new(vec![Landmark::default(); 4]));
        assert_eq!(Reading::of(&r), Reading::Malformed);
        assert_eq!(Reading::Malformed.signal(), DisplacementSignal::none());
    }

    #[test]
    fn malformed_first_hand_is_not_rescued_by_second() {
        let r = DetectionResult {
            hands: vec![Hand::new(vec![]), Hand::uniform(0.5, 0.5)],
        };
        assert_eq!(Reading::of(&r), Reading::Malformed);
    }

    #[test]
    fn reads_middle_finger_base() {
        let mut hand = Hand::uniform(0.9, 0.9);
        hand.landmarks[MIDDLE_FINGER_MCP] = Landmark::new(0.25, 0.75, 0.0);
        let Reading::Hand(s) = Reading::of(&DetectionResult::single(hand)) else {
            panic!("expected a hand reading");
        };
        assert_eq!(s, DisplacementSignal::at(0.5, -0.5));
    }

    #[test]
    fn latch_fires_once() {
        let mut latch = AcquisitionLatch::default();
        assert!(!latch.observe(false));
        assert!(latch.observe(true));
        assert!(!latch.observe(true));
        assert!(!latch.observe(false));
        assert!(!latch.observe(true));
        assert!(latch.has_fired());
    }

    #[test]
    fn slot_overwrites_and_holds() {
        let mut src = HandPositionSource::new();
        assert!(!src.has_received());
        src.ingest(&DetectionResult::single(Hand::uniform(0.5, 0.5)));
        assert_eq!(src.signal(), DisplacementSignal::at(0.0, 0.0));
        // No new result: slot keeps its value.
        assert_eq!(src.signal(), DisplacementSignal::at(0.0, 0.0));
        src.ingest(&DetectionResult::empty());
        assert_eq!(src.signal(), DisplacementSignal::none());
        assert_eq!(src.results_seen(), 2);
    }

    #[test]
    fn malformed_counts_and_degrades() {
        let mut src = HandPositionSource::new();
        src.ingest(&DetectionResult::single(Hand::uniform(0.0, 0.0)));
        let u = src.ingest(&DetectionResult::single(Hand::new(vec![]))).unwrap();
        assert_eq!(u.signal, DisplacementSignal::none());
        assert_eq!(src.malformed_seen(), 1);
    }

    #[test]
    fn closed_source_ignores_late_results() {
        let mut src = HandPositionSource::new();
        src.ingest(&DetectionResult::single(Hand::uniform(0.2, 0.2)));
        src.close();
        assert!(src.ingest(&DetectionResult::single(Hand::uniform(0.2, 0.2))).is_none());
        assert_eq!(src.signal(), DisplacementSignal::none());
        assert_eq!(src.results_seen(), 1);
        src.close();
        assert!(src.is_closed());
    }
}
