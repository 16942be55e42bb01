//! Long-run behaviour of the field under sustained signals.

use glam::DVec3;
use hand_signal::{DetectionResult, DisplacementSignal, Hand, HandPositionSource};
use particle_field::{
    CoreConfig, FieldConfig, FieldSimulator, ParticleGroup, RingConfig, StarfieldConfig,
};

fn config() -> FieldConfig {
    FieldConfig {
        core:  CoreConfig { width_segments: 16, height_segments: 12, ..CoreConfig::default() },
        ring:  RingConfig { count: 500, ..RingConfig::default() },
        stars: StarfieldConfig { count: 0, ..StarfieldConfig::default() },
        ..FieldConfig::default()
    }
}

fn run(field: &mut FieldSimulator, frames: usize, signal: DisplacementSignal) {
    for _ in 0..frames {
        let t = field.frames() as f64 / 60.0;
        field.step(t, signal);
    }
}

fn max_offset_from_base(group: &ParticleGroup) -> f32 {
    group.set.current().iter()
        .zip(group.set.base())
        .map(|(c, b)| c.distance(*b))
        .fold(0.0, f32::max)
}

#[test]
fn centred_hand_keeps_offset_at_origin() {
    let mut src = HandPositionSource::new();
    let signal = src.ingest(&DetectionResult::single(Hand::uniform(0.5, 0.5))).unwrap().signal;
    assert_eq!(signal, DisplacementSignal::at(0.0, 0.0));

    let mut field = FieldSimulator::new(&config()).unwrap();
    run(&mut field, 100, signal);
    assert!(field.core().transform.offset.length() < 1e-6);
    assert!(field.ring().transform.offset.length() < 1e-6);
}

#[test]
fn corner_hand_reaches_five_five_in_200_frames() {
    let mut src = HandPositionSource::new();
    let signal = src.ingest(&DetectionResult::single(Hand::uniform(0.0, 0.0))).unwrap().signal;
    assert_eq!(signal, DisplacementSignal::at(1.0, 1.0));

    let mut field = FieldSimulator::new(&config()).unwrap();
    run(&mut field, 200, signal);
    let goal = DVec3::new(5.0, 5.0, 0.0);
    assert!((field.core().transform.offset - goal).abs().max_element() < 1e-6);
    assert!((field.ring().transform.offset - goal).abs().max_element() < 1e-6);
}

#[test]
fn sustained_hand_explodes_to_k_distance() {
    let mut field = FieldSimulator::new(&config()).unwrap();
    run(&mut field, 600, DisplacementSignal::at(0.3, -0.2));

    for group in [field.core(), field.ring()] {
        let k = group.set.explode_distance();
        for ((c, b), d) in group.set.current().iter().zip(group.set.base()).zip(group.set.directions()) {
            let target = *b + *d * k;
            assert!(c.distance(target) < 1e-3, "{:?} did not settle", group.kind);
        }
    }
    assert_eq!(field.core().set.explode_distance(), 5.0);
    assert_eq!(field.ring().set.explode_distance(), 4.0);
}

#[test]
fn sustained_absence_returns_to_base_and_origin() {
    let mut field = FieldSimulator::new(&config()).unwrap();
    run(&mut field, 120, DisplacementSignal::at(-0.8, 0.6));
    assert!(max_offset_from_base(field.core()) > 1.0);

    run(&mut field, 800, DisplacementSignal::none());
    assert!(max_offset_from_base(field.core()) < 1e-3);
    assert!(max_offset_from_base(field.ring()) < 1e-3);
    assert!(field.core().transform.offset.length() < 1e-4);
}

#[test]
fn approach_is_monotone_without_overshoot() {
    let mut field = FieldSimulator::new(&config()).unwrap();
    let signal = DisplacementSignal::at(1.0, 1.0);
    let mut prev_dist = field.core().set.max_distance_to_target(1.0);
    let mut prev_x = field.core().transform.offset.x;
    for _ in 0..300 {
        run(&mut field, 1, signal);
        let d = field.core().set.max_distance_to_target(1.0);
        assert!(d <= prev_dist * 0.95 + 1e-5, "distance {} after {}", d, prev_dist);
        prev_dist = d;

        let x = field.core().transform.offset.x;
        assert!(x >= prev_x && x <= 5.0 + 1e-5, "offset x {} overshot", x);
        prev_x = x;
    }
}

#[test]
fn losing_the_hand_reverses_the_same_frame() {
    let mut field = FieldSimulator::new(&config()).unwrap();
    run(&mut field, 60, DisplacementSignal::at(0.0, 0.0));
    let before = max_offset_from_base(field.ring());

    let mut src = HandPositionSource::new();
    src.ingest(&DetectionResult::single(Hand::uniform(0.5, 0.5)));
    let gone = src.ingest(&DetectionResult::empty()).unwrap().signal;
    assert_eq!(gone, DisplacementSignal::none());

    run(&mut field, 1, gone);
    let after = max_offset_from_base(field.ring());
    assert!(after < before, "{} should be below {}", after, before);
    assert!((after - before * 0.95).abs() < 1e-3);
}
