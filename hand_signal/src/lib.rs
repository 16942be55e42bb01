//! # hand_signal
//!
//! Turns the per-frame output of an external hand-landmark detector into a
//! [`DisplacementSignal`]: a centred, mirrored 2D position in roughly
//! `[-1, 1]²`, or nothing when no hand is in view.
//!
//! ## Mapping
//!
//! | Input | Output |
//! |---|---|
//! | zero hands | `DisplacementSignal::none()` |
//! | ≥ 1 hand, landmark 9 at `(x, y)` | `((x - 0.5) · -2, (0.5 - y) · 2)` |
//! | malformed hand (short list, NaN) | `DisplacementSignal::none()` |
//!
//! Only the first hand of a result is ever read.
//!
//! ## Quick start
//!
//! ```rust
//! use hand_signal::{DetectionResult, Hand, HandPositionSource};
//!
//! let mut source = HandPositionSource::new();
//! let update = source
//!     .ingest(&DetectionResult::single(Hand::uniform(0.0, 0.0)))
//!     .unwrap();
//!
//! assert!(update.first_acquisition);
//! assert_eq!(update.signal.position().map(|p| (p.x, p.y)), Some((1.0, 1.0)));
//! ```

pub mod landmark;
pub mod signal;
pub mod source;

pub use landmark::{DetectionResult, Hand, Landmark, LANDMARKS_PER_HAND, MIDDLE_FINGER_MCP};
pub use signal::{centre_and_mirror, DisplacementSignal, TrackingState};
pub use source::{AcquisitionLatch, HandPositionSource, Reading, SourceUpdate};
