//! # particle_field
//!
//! The "planet + ring" point cloud.  Two fixed-size particle sets (core and
//! ring) are updated once per rendered frame from the current
//! [`DisplacementSignal`](hand_signal::DisplacementSignal):
//!
//! 1. `explosion = 1` while a hand is tracked, else `0`.
//! 2. Each particle's target is `base + direction · explosion · K`
//!    (`K` = 5 for the core, 4 for the ring).
//! 3. Each particle moves 5 % of the way to its target.
//! 4. Both groups spin at constant rates; the ring also wobbles its tilt.
//! 5. Both group offsets lerp toward `5 · hand` (rate 0.1) or back to the
//!    origin (rate 0.05).
//!
//! Rates are per frame, not per second, so the settling speed follows the
//! display refresh rate.
//!
//! ## Quick start
//!
//! ```rust
//! use particle_field::{FieldConfig, FieldSimulator};
//! use hand_signal::DisplacementSignal;
//!
//! let mut field = FieldSimulator::new(&FieldConfig::default()).unwrap();
//! for frame in 0..120 {
//!     let t = frame as f64 / 60.0;
//!     field.step(t, DisplacementSignal::at(0.2, -0.4));
//! }
//! assert!(field.core().transform.offset.x > 0.9);
//! ```

pub mod config;
pub mod error;
pub mod geometry;
pub mod particles;
pub mod simulator;

pub use config::{CoreConfig, FieldConfig, MotionConfig, RingConfig, StarfieldConfig};
pub use error::FieldError;
pub use geometry::Star;
pub use particles::{GroupTransform, ParticleSet};
pub use simulator::{explosion_factor, FieldSimulator, ParticleGroup, PointBatch, PointCloudSink, SetKind};
