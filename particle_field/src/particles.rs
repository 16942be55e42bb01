//! One particle set and its group transform.

use glam::{DMat3, DVec3, Vec3};

use crate::error::FieldError;

// ════════════════════════════════════════════════════════════════════════════
// ParticleSet
// ════════════════════════════════════════════════════════════════════════════

/// A fixed-length point cloud that can "explode" along per-particle
/// directions.
///
/// `base` and `directions` are frozen at construction.  `current` starts as a
/// copy of `base` and is the only thing [`approach`](Self::approach) changes;
/// its length never changes.
#[derive(Clone, Debug)]
pub struct ParticleSet {
    base:             Vec<Vec3>,
    directions:       Vec<Vec3>,
    current:          Vec<Vec3>,
    explode_distance: f32,
    /// Set whenever `current` moves; cleared by the sink side.
    dirty:            bool,
}

impl ParticleSet {
    pub fn new(
        base:             Vec<Vec3>,
        directions:       Vec<Vec3>,
        explode_distance: f32,
    ) -> Result<Self, FieldError> {
        if base.len() != directions.len() {
            return Err(FieldError::LengthMismatch {
                positions:  base.len(),
                directions: directions.len(),
            });
        }
        Ok(ParticleSet {
            current: base.clone(),
            base,
            directions,
            explode_distance,
            dirty: true,
        })
    }

    pub fn len(&self) -> usize { self.base.len() }
    pub fn is_empty(&self) -> bool { self.base.is_empty() }

    pub fn base(&self)       -> &[Vec3] { &self.base }
    pub fn directions(&self) -> &[Vec3] { &self.directions }
    pub fn current(&self)    -> &[Vec3] { &self.current }
    pub fn explode_distance(&self) -> f32 { self.explode_distance }

    /// Interleaved `x, y, z` view of the current positions.
    pub fn position_buffer(&self) -> &[f32] {
        bytemuck::cast_slice(&self.current)
    }

    /// Where particle `i` is heading for a given explosion factor.
    pub fn target(&self, i: usize, explosion: f32) -> Vec3 {
        self.base[i] + self.directions[i] * (explosion * self.explode_distance)
    }

    /// Move every particle `rate` of the way toward its target.
    pub fn approach(&mut self, explosion: f32, rate: f32) {
        let k = explosion * self.explode_distance;
        for ((cur, base), dir) in self.current.iter_mut()
            .zip(&self.base)
            .zip(&self.directions)
        {
            let target = *base + *dir * k;
            *cur += (target - *cur) * rate;
        }
        self.dirty = true;
    }

    /// Largest particle-to-target distance; a convergence gauge.
    pub fn max_distance_to_target(&self, explosion: f32) -> f32 {
        (0..self.len())
            .map(|i| self.current[i].distance(self.target(i, explosion)))
            .fold(0.0, f32::max)
    }

    pub fn is_dirty(&self) -> bool { self.dirty }

    /// Read and clear the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GroupTransform
// ════════════════════════════════════════════════════════════════════════════

/// Offset plus Euler rotation (radians) applied to a whole set at draw time.
///
/// Rotation order is X·Y·Z: a local point is turned about Z, then Y, then X,
/// and finally offset.  Kept in `f64`: the offset creeps toward its goal by
/// a fixed fraction per frame, and `f32` stalls a few ulps short.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GroupTransform {
    pub offset:   DVec3,
    pub rotation: DVec3,
}

impl GroupTransform {
    pub fn rotation_matrix(&self) -> DMat3 {
        DMat3::from_rotation_x(self.rotation.x)
            * DMat3::from_rotation_y(self.rotation.y)
            * DMat3::from_rotation_z(self.rotation.z)
    }

    /// Local → world.
    pub fn apply(&self, local: Vec3) -> Vec3 {
        (self.offset + self.rotation_matrix() * local.as_dvec3()).as_vec3()
    }

    pub fn approach_offset(&mut self, goal: DVec3, rate: f64) {
        self.offset = self.offset.lerp(goal, rate);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
