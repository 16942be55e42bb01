//! Per-frame update of the core and ring sets.
//!
//! [`FieldSimulator::step`] is called once per rendered frame with the
//! elapsed time and the current signal.  It does O(particles) arithmetic and
//! nothing else: no allocation, no I/O, no failure path.
//!
//! The two behaviours, at rest and tracking, only differ in the constants
//! picked for the explosion factor and the group offset goal/rate; both are
//! chosen straight from the signal every frame.

use glam::DVec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use hand_signal::{DisplacementSignal, TrackingState};

use crate::config::{FieldConfig, MotionConfig, RingConfig};
use crate::error::FieldError;
use crate::geometry::{self, Star};
use crate::particles::{GroupTransform, ParticleSet};

// ════════════════════════════════════════════════════════════════════════════
// Constant selection
// ════════════════════════════════════════════════════════════════════════════

/// `1.0` while a hand is tracked, `0.0` otherwise.  No ramp: the particle
/// lerp is the only smoothing.
pub fn explosion_factor(signal: DisplacementSignal) -> f32 {
    if signal.is_present() { 1.0 } else { 0.0 }
}

/// Group offset goal and per-frame rate for a signal.
pub fn offset_goal(signal: DisplacementSignal, motion: &MotionConfig) -> (DVec3, f64) {
    match signal.position() {
        Some(p) => {
            let hand = p.as_dvec2() * motion.hand_scale;
            (DVec3::new(hand.x, hand.y, 0.0), motion.tracking_rate)
        }
        None => (DVec3::ZERO, motion.rest_rate),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ParticleGroup
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SetKind {
    Core,
    Ring,
}

impl SetKind {
    pub fn name(self) -> &'static str {
        match self {
            SetKind::Core => "core",
            SetKind::Ring => "ring",
        }
    }
}

/// A particle set plus the transform it is drawn with.
#[derive(Clone, Debug)]
pub struct ParticleGroup {
    pub kind:      SetKind,
    pub set:       ParticleSet,
    pub transform: GroupTransform,
}

// ════════════════════════════════════════════════════════════════════════════
// Sink boundary
// ════════════════════════════════════════════════════════════════════════════

/// One set as handed to the renderer.
#[derive(Clone, Copy, Debug)]
pub struct PointBatch<'a> {
    pub kind:      SetKind,
    /// Interleaved `x, y, z`, in the group's local space.
    pub positions: &'a [f32],
    pub transform: &'a GroupTransform,
    /// True when `positions` changed since the last hand-over.
    pub updated:   bool,
}

/// Whatever draws the field.  Receives the backdrop, then both sets, every
/// frame; never talks back.
pub trait PointCloudSink {
    fn backdrop(&mut self, stars: &[Star]);
    fn submit(&mut self, batch: PointBatch<'_>);
}

// ════════════════════════════════════════════════════════════════════════════
// FieldSimulator
// ════════════════════════════════════════════════════════════════════════════

pub struct FieldSimulator {
    core:      ParticleGroup,
    ring:      ParticleGroup,
    stars:     Vec<Star>,
    core_spin: f64,
    ring_cfg:  RingConfig,
    motion:    MotionConfig,
    state:     TrackingState,
    frames:    u64,
}

impl FieldSimulator {
    /// Validate `cfg` and sample both sets and the backdrop from its seed.
    pub fn new(cfg: &FieldConfig) -> Result<Self, FieldError> {
        cfg.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(cfg.seed);

        let (core_pos, core_dir) = geometry::core_particles(&mut rng, &cfg.core);
        let (ring_pos, ring_dir) = geometry::ring_particles(&mut rng, &cfg.ring);
        let stars = geometry::starfield(&mut rng, &cfg.stars);

        let core = ParticleGroup {
            kind:      SetKind::Core,
            set:       ParticleSet::new(core_pos, core_dir, cfg.core.explode_distance)?,
            transform: GroupTransform::default(),
        };
        let ring = ParticleGroup {
            kind:      SetKind::Ring,
            set:       ParticleSet::new(ring_pos, ring_dir, cfg.ring.explode_distance)?,
            transform: GroupTransform {
                offset:   DVec3::ZERO,
                rotation: DVec3::new(cfg.ring.tilt, 0.0, 0.0),
            },
        };

        info!(
            core = core.set.len(),
            ring = ring.set.len(),
            stars = stars.len(),
            seed = cfg.seed,
            "particle field built"
        );

        Ok(FieldSimulator {
            core,
            ring,
            stars,
            core_spin: cfg.core.spin_rate,
            ring_cfg:  cfg.ring.clone(),
            motion:    cfg.motion.clone(),
            state:     TrackingState::AtRest,
            frames:    0,
        })
    }

    /// Advance one rendered frame.
    ///
    /// `t` is seconds since start; it only drives the rotations.  Every rate
    /// is per call, so calling this at 30 Hz instead of 60 Hz halves the
    /// settling speed.
    pub fn step(&mut self, t: f64, signal: DisplacementSignal) {
        let state = signal.state();
        if state != self.state {
            debug!(from = ?self.state, to = ?state, frame = self.frames, "field state change");
            self.state = state;
        }

        let explosion = explosion_factor(signal);
        self.core.set.approach(explosion, self.motion.particle_rate);
        self.ring.set.approach(explosion, self.motion.particle_rate);

        self.core.transform.rotation.y = t * self.core_spin;
        self.ring.transform.rotation.y = t * self.ring_cfg.spin_rate;
        self.ring.transform.rotation.x =
            self.ring_cfg.tilt + (t * self.ring_cfg.wobble_rate).sin() * self.ring_cfg.wobble_amplitude;

        let (goal, rate) = offset_goal(signal, &self.motion);
        self.core.transform.approach_offset(goal, rate);
        self.ring.transform.approach_offset(goal, rate);

        self.frames += 1;
    }

    /// Hand the backdrop and both sets to a sink, clearing the dirty flags.
    pub fn present<S: PointCloudSink + ?Sized>(&mut self, sink: &mut S) {
        sink.backdrop(&self.stars);
        for group in [&mut self.core, &mut self.ring] {
            let updated = group.set.take_dirty();
            sink.submit(PointBatch {
                kind:      group.kind,
                positions: group.set.position_buffer(),
                transform: &group.transform,
                updated,
            });
        }
    }

    pub fn core(&self)   -> &ParticleGroup { &self.core }
    pub fn ring(&self)   -> &ParticleGroup { &self.ring }
    pub fn stars(&self)  -> &[Star]        { &self.stars }
    pub fn state(&self)  -> TrackingState  { self.state }
    pub fn frames(&self) -> u64            { self.frames }
    pub fn motion(&self) -> &MotionConfig  { &self.motion }

    pub fn group(&self, kind: SetKind) -> &ParticleGroup {
        match kind {
            SetKind::Core => &self.core,
            SetKind::Ring => &self.ring,
        }
    }

    /// Total particles across both sets.
    pub fn particle_count(&self) -> usize {
        self.core.set.len() + self.ring.set.len()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CoreConfig, StarfieldConfig};
    use std::f64::consts::FRAC_PI_3;

    fn small() -> FieldConfig {
        FieldConfig {
            core:  CoreConfig { width_segments: 8, height_segments: 6, ..CoreConfig::default() },
            ring:  RingConfig { count: 200, ..RingConfig::default() },
            stars: StarfieldConfig { count: 10, ..StarfieldConfig::default() },
            ..FieldConfig::default()
        }
    }

    #[derive(Default)]
    struct Recorder {
        stars:   usize,
        batches: Vec<(SetKind, usize, bool)>,
    }

    impl PointCloudSink for Recorder {
        fn backdrop(&mut self, stars: &[Star]) { self.stars = stars.len(); }
        fn submit(&mut self, b: PointBatch<'_>) {
            self.batches.push((b.kind, b.positions.len(), b.updated));
        }
    }

    #[test]
    fn default_counts() {
        let f = FieldSimulator::new(&FieldConfig::default()).unwrap();
        assert_eq!(f.core().set.len(), 4_225);
        assert_eq!(f.ring().set.len(), 15_000);
        assert_eq!(f.stars().len(), 5_000);
        assert_eq!(f.particle_count(), 19_225);
    }

    #[test]
    fn explosion_is_binary() {
        assert_eq!(explosion_factor(DisplacementSignal::none()), 0.0);
        assert_eq!(explosion_factor(DisplacementSignal::at(0.0, 0.0)), 1.0);
        assert_eq!(explosion_factor(DisplacementSignal::at(-1.0, 0.3)), 1.0);
    }

    #[test]
    fn offset_goal_selection() {
        let m = MotionConfig::default();
        assert_eq!(offset_goal(DisplacementSignal::none(), &m), (DVec3::ZERO, 0.05));
        assert_eq!(
            offset_goal(DisplacementSignal::at(0.5, -1.0), &m),
            (DVec3::new(2.5, -5.0, 0.0), 0.1),
        );
    }

    #[test]
    fn rotations_follow_time() {
        let mut f = FieldSimulator::new(&small()).unwrap();
        f.step(10.0, DisplacementSignal::none());
        assert!((f.core().transform.rotation.y - 1.0).abs() < 1e-12);
        assert!((f.ring().transform.rotation.y - 1.5).abs() < 1e-12);
        let tilt = FRAC_PI_3 + (2.0f64).sin() * 0.1;
        assert!((f.ring().transform.rotation.x - tilt).abs() < 1e-12);
        assert_eq!(f.core().transform.rotation.x, 0.0);
    }

    #[test]
    fn rotation_ignores_signal() {
        let mut a = FieldSimulator::new(&small()).unwrap();
        let mut b = FieldSimulator::new(&small()).unwrap();
        a.step(3.0, DisplacementSignal::none());
        b.step(3.0, DisplacementSignal::at(0.9, 0.9));
        assert_eq!(a.ring().transform.rotation, b.ring().transform.rotation);
        assert_eq!(a.core().transform.rotation, b.core().transform.rotation);
    }

    #[test]
    fn both_offsets_move_together() {
        let mut f = FieldSimulator::new(&small()).unwrap();
        for i in 0..30 {
            f.step(i as f64 / 60.0, DisplacementSignal::at(0.4, 0.2));
        }
        assert_eq!(f.core().transform.offset, f.ring().transform.offset);
        assert!(f.core().transform.offset.x > 0.0);
    }

    #[test]
    fn state_tracks_signal() {
        let mut f = FieldSimulator::new(&small()).unwrap();
        assert_eq!(f.state(), TrackingState::AtRest);
        f.step(0.0, DisplacementSignal::at(0.0, 0.0));
        assert_eq!(f.state(), TrackingState::Tracking);
        f.step(0.1, DisplacementSignal::none());
        assert_eq!(f.state(), TrackingState::AtRest);
        assert_eq!(f.frames(), 2);
    }

    #[test]
    fn present_hands_over_both_sets() {
        let mut f = FieldSimulator::new(&small()).unwrap();
        let mut r = Recorder::default();
        f.present(&mut r);
        assert_eq!(r.stars, 10);
        assert_eq!(r.batches, vec![
            (SetKind::Core, 9 * 7 * 3, true),
            (SetKind::Ring, 200 * 3, true),
        ]);

        // Nothing moved since: still submitted, but not marked updated.
        r.batches.clear();
        f.present(&mut r);
        assert!(r.batches.iter().all(|b| !b.2));

        r.batches.clear();
        f.step(0.0, DisplacementSignal::none());
        f.present(&mut r);
        assert!(r.batches.iter().all(|b| b.2));
    }

    #[test]
    fn seed_reproduces_field() {
        let a = FieldSimulator::new(&small()).unwrap();
        let b = FieldSimulator::new(&small()).unwrap();
        assert_eq!(a.ring().set.base(), b.ring().set.base());
        assert_eq!(a.core().set.directions(), b.core().set.directions());

        let other = FieldConfig { seed: 1, ..small() };
        let c = FieldSimulator::new(&other).unwrap();
        assert_ne!(a.ring().set.base(), c.ring().set.base());
    }

    #[test]
    fn invalid_config_rejected() {
        let mut cfg = small();
        cfg.motion.particle_rate = 2.0;
        assert!(FieldSimulator::new(&cfg).is_err());
    }
}
