//! Point sampling for the two particle sets and the star backdrop.
//!
//! Everything random takes an explicit RNG so a seed reproduces the field.

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use rand::Rng;

use crate::config::{CoreConfig, RingConfig, StarfieldConfig};

/// Vertices of a UV sphere centred on the origin.
///
/// Produces `(width + 1) · (height + 1)` points, row by row from the north
/// pole (`+Y`) to the south pole.  Seam and pole vertices repeat, exactly as
/// an indexed UV-sphere mesh lays them out.
pub fn sphere_surface(radius: f32, width_segments: u32, height_segments: u32) -> Vec<Vec3> {
    let mut out = Vec::with_capacity((width_segments as usize + 1) * (height_segments as usize + 1));
    for iy in 0..=height_segments {
        let theta = PI * iy as f32 / height_segments as f32;
        let (sin_t, cos_t) = theta.sin_cos();
        for ix in 0..=width_segments {
            let phi = TAU * ix as f32 / width_segments as f32;
            let (sin_p, cos_p) = phi.sin_cos();
            out.push(Vec3::new(
                -radius * cos_p * sin_t,
                radius * cos_t,
                radius * sin_p * sin_t,
            ));
        }
    }
    out
}

/// One direction per particle, each component uniform in `[-spread, spread)`.
pub fn random_directions<R: Rng>(rng: &mut R, count: usize, spread: f32) -> Vec<Vec3> {
    (0..count).map(|_| random_direction(rng, spread)).collect()
}

fn random_direction<R: Rng>(rng: &mut R, spread: f32) -> Vec3 {
    let mut c = || (rng.gen::<f32>() - 0.5) * 2.0 * spread;
    let x = c();
    let y = c();
    let z = c();
    Vec3::new(x, y, z)
}

/// Core set: sphere vertices plus their explode directions.
pub fn core_particles<R: Rng>(rng: &mut R, cfg: &CoreConfig) -> (Vec<Vec3>, Vec<Vec3>) {
    let positions  = sphere_surface(cfg.radius, cfg.width_segments, cfg.height_segments);
    let directions = random_directions(rng, positions.len(), cfg.direction_spread);
    (positions, directions)
}

/// Ring set: points on a thin annulus in the XZ plane plus directions.
///
/// Radius, angle, height and the three direction components are drawn
/// per particle in that order.
pub fn ring_particles<R: Rng>(rng: &mut R, cfg: &RingConfig) -> (Vec<Vec3>, Vec<Vec3>) {
    let mut positions  = Vec::with_capacity(cfg.count);
    let mut directions = Vec::with_capacity(cfg.count);
    for _ in 0..cfg.count {
        let r = cfg.inner_radius + rng.gen::<f32>() * cfg.width;
        let a = rng.gen::<f32>() * TAU;
        let y = (rng.gen::<f32>() - 0.5) * cfg.thickness;
        positions.push(Vec3::new(a.cos() * r, y, a.sin() * r));
        directions.push(random_direction(rng, cfg.direction_spread));
    }
    (positions, directions)
}

// ════════════════════════════════════════════════════════════════════════════
// Starfield
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    pub position: Vec3,
    /// World-space point size.
    pub size:     f32,
}

/// Stars scattered through a spherical shell, outermost first.
///
/// The shell radius shrinks by a random fraction of `depth / count` per star,
/// so the whole shell spans at most `[radius, radius + depth]`.
pub fn starfield<R: Rng>(rng: &mut R, cfg: &StarfieldConfig) -> Vec<Star> {
    let step = if cfg.count == 0 { 0.0 } else { cfg.depth / cfg.count as f32 };
    let mut r = cfg.radius + cfg.depth;
    let mut out = Vec::with_capacity(cfg.count);
    for _ in 0..cfg.count {
        r -= step * rng.gen::<f32>();
        let polar   = (1.0 - rng.gen::<f32>() * 2.0).clamp(-1.0, 1.0).acos();
        let azimuth = rng.gen::<f32>() * TAU;
        let (sin_p, cos_p) = polar.sin_cos();
        let position = Vec3::new(
            r * sin_p * azimuth.sin(),
            r * cos_p,
            r * sin_p * azimuth.cos(),
        );
        let size = (0.5 + 0.5 * rng.gen::<f32>()) * cfg.factor;
        out.push(Star { position, size });
    }
    out
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
