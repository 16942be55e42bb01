//! Pinhole camera on the +Z axis looking down −Z.

use glam::Vec3;

/// Points closer to the camera than this are culled.
const NEAR: f32 = 0.1;
const FAR:  f32 = 1000.0;

/// A projected point in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    pub x:     f32,
    pub y:     f32,
    /// Distance along the view axis.
    pub depth: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    /// Vertical field of view, degrees.
    pub fov_y:    f32,
    pub width:    usize,
    pub height:   usize,
}

impl PerspectiveCamera {
    pub fn new(distance: f32, fov_y: f32, width: usize, height: usize) -> Self {
        PerspectiveCamera { position: Vec3::new(0.0, 0.0, distance), fov_y, width, height }
    }

    /// Pixels per world unit at depth 1.
    pub fn focal_length(&self) -> f32 {
        (self.height as f32 / 2.0) / (self.fov_y.to_radians() / 2.0).tan()
    }

    /// World → screen.  `None` outside the near/far range.
    pub fn project(&self, world: Vec3) -> Option<Projected> {
        let rel = world - self.position;
        let depth = -rel.z;
        if !(NEAR..=FAR).contains(&depth) {
            return None;
        }
        let f = self.focal_length() / depth;
        Some(Projected {
            x: self.width as f32 / 2.0 + rel.x * f,
            y: self.height as f32 / 2.0 - rel.y * f,
            depth,
        })
    }

    /// On-screen diameter of a point of world size `size` at `depth`,
    /// never below one pixel.
    pub fn point_footprint(&self, size: f32, depth: f32) -> f32 {
        (size * self.focal_length() / depth).max(1.0)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn cam() -> PerspectiveCamera {
        PerspectiveCamera::new(15.0, 50.0, 1280, 720)
    }

    #[test]
    fn origin_lands_in_the_centre() {
        let p = cam().project(Vec3::ZERO).unwrap();
        assert_eq!((p.x, p.y), (640.0, 360.0));
        assert_eq!(p.depth, 15.0);
    }

    #[test]
    fn up_and_right_on_screen() {
        let p = cam().project(Vec3::new(1.0, 1.0, 0.0)).unwrap();
        assert!(p.x > 640.0);
        assert!(p.y < 360.0);
    }

    #[test]
    fn half_fov_reaches_the_top_edge() {
        let c = cam();
        let top = 15.0 * (25.0f32).to_radians().tan();
        let p = c.project(Vec3::new(0.0, top, 0.0)).unwrap();
        assert!(p.y.abs() < 1e-2, "{}", p.y);
    }

    #[test]
    fn behind_camera_culled() {
        assert!(cam().project(Vec3::new(0.0, 0.0, 15.0)).is_none());
        assert!(cam().project(Vec3::new(0.0, 0.0, 20.0)).is_none());
    }

    #[test]
    fn footprint_attenuates_with_depth() {
        let c = cam();
        let near = c.point_footprint(0.05, 10.0);
        let far  = c.point_footprint(0.05, 20.0);
        assert!((near - 2.0 * far).abs() < 1e-4);
        assert_eq!(c.point_footprint(0.001, 100.0), 1.0);
    }
}
