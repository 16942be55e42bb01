//! Field parameters.
//!
//! `FieldConfig::default()` is the stock planet; a TOML file may override any
//! subset of fields:
//!
//! ```toml
//! seed = 7
//!
//! [ring]
//! count = 20000
//! explode_distance = 3.0
//!
//! [motion]
//! particle_rate = 0.08
//! ```

use std::f64::consts::FRAC_PI_3;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::FieldError;

// ════════════════════════════════════════════════════════════════════════════
// FieldConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldConfig {
    /// Seed for every random draw (positions, directions, stars).
    pub seed:   u64,
    pub core:   CoreConfig,
    pub ring:   RingConfig,
    pub motion: MotionConfig,
    pub stars:  StarfieldConfig,
}

impl Default for FieldConfig {
    fn default() -> Self {
        FieldConfig {
            seed:   0x5A7_0A5,
            core:   CoreConfig::default(),
            ring:   RingConfig::default(),
            motion: MotionConfig::default(),
            stars:  StarfieldConfig::default(),
        }
    }
}

impl FieldConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, FieldError> {
        let cfg: FieldConfig = toml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self, FieldError> {
        let text = fs::read_to_string(path).map_err(|source| FieldError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = Self::from_toml_str(&text)?;
        info!(path = %path.display(), seed = cfg.seed, "loaded field config");
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), FieldError> {
        rate("motion.particle_rate", f64::from(self.motion.particle_rate))?;
        rate("motion.tracking_rate", self.motion.tracking_rate)?;
        rate("motion.rest_rate",     self.motion.rest_rate)?;

        if self.core.width_segments < 3 || self.core.height_segments < 2 {
            return Err(FieldError::invalid(
                "core.segments",
                "need at least 3 width and 2 height segments",
            ));
        }
        positive("core.radius", self.core.radius)?;
        non_negative("core.direction_spread", self.core.direction_spread)?;
        finite("core.explode_distance", f64::from(self.core.explode_distance))?;
        finite("core.spin_rate", self.core.spin_rate)?;

        if self.ring.count == 0 {
            return Err(FieldError::invalid("ring.count", "must be at least 1"));
        }
        positive("ring.inner_radius", self.ring.inner_radius)?;
        non_negative("ring.width",     self.ring.width)?;
        non_negative("ring.thickness", self.ring.thickness)?;
        non_negative("ring.direction_spread", self.ring.direction_spread)?;
        finite("ring.explode_distance", f64::from(self.ring.explode_distance))?;
        finite("ring.spin_rate",        self.ring.spin_rate)?;
        finite("ring.tilt",             self.ring.tilt)?;
        finite("ring.wobble_amplitude", self.ring.wobble_amplitude)?;
        finite("ring.wobble_rate",      self.ring.wobble_rate)?;

        finite("motion.hand_scale", self.motion.hand_scale)?;

        positive("stars.radius", self.stars.radius)?;
        non_negative("stars.depth", self.stars.depth)?;
        non_negative("stars.factor", self.stars.factor)?;
        Ok(())
    }
}

fn rate(name: &'static str, v: f64) -> Result<(), FieldError> {
    if v > 0.0 && v <= 1.0 {
        Ok(())
    } else {
        Err(FieldError::invalid(name, format!("{} is outside (0, 1]", v)))
    }
}

fn finite(name: &'static str, v: f64) -> Result<(), FieldError> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(FieldError::invalid(name, format!("{} is not a finite number", v)))
    }
}

fn positive(name: &'static str, v: f32) -> Result<(), FieldError> {
    if v > 0.0 && v.is_finite() {
        Ok(())
    } else {
        Err(FieldError::invalid(name, format!("{} must be > 0", v)))
    }
}

fn non_negative(name: &'static str, v: f32) -> Result<(), FieldError> {
    if v >= 0.0 && v.is_finite() {
        Ok(())
    } else {
        Err(FieldError::invalid(name, format!("{} must be ≥ 0", v)))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Per-set parameters
// ════════════════════════════════════════════════════════════════════════════

/// The planet body: vertices of a UV sphere.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    pub radius:           f32,
    pub width_segments:   u32,
    pub height_segments:  u32,
    /// Half-range of each direction component (uniform in `[-s, s]`).
    pub direction_spread: f32,
    /// Explode distance `K`.
    pub explode_distance: f32,
    /// Rotation about Y, radians per second.
    pub spin_rate:        f64,
}

impl Default for CoreConfig {
    fn default() -> Self {
        CoreConfig {
            radius:           3.0,
            width_segments:   64,
            height_segments:  64,
            direction_spread: 1.0,
            explode_distance: 5.0,
            spin_rate:        0.1,
        }
    }
}

impl CoreConfig {
    pub fn particle_count(&self) -> usize {
        (self.width_segments as usize + 1) * (self.height_segments as usize + 1)
    }
}

/// The ring: points scattered over a thin annulus.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RingConfig {
    pub count:            usize,
    pub inner_radius:     f32,
    /// Radial extent; radii are uniform in `[inner, inner + width)`.
    pub width:            f32,
    /// Full height of the disk.
    pub thickness:        f32,
    pub direction_spread: f32,
    pub explode_distance: f32,
    pub spin_rate:        f64,
    /// Base tilt about X, radians.
    pub tilt:             f64,
    pub wobble_amplitude: f64,
    /// Wobble angular frequency, radians per second.
    pub wobble_rate:      f64,
}

impl Default for RingConfig {
    fn default() -> Self {
        RingConfig {
            count:            15_000,
            inner_radius:     5.0,
            width:            3.0,
            thickness:        0.1,
            direction_spread: 0.75,
            explode_distance: 4.0,
            spin_rate:        0.15,
            tilt:             FRAC_PI_3,
            wobble_amplitude: 0.1,
            wobble_rate:      0.2,
        }
    }
}

/// Per-frame approach rates shared by both sets.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MotionConfig {
    /// Fraction of the remaining distance a particle covers each frame.
    pub particle_rate: f32,
    /// Group offset rate while a hand is tracked.
    pub tracking_rate: f64,
    /// Group offset rate while returning to the origin.
    pub rest_rate:     f64,
    /// Signal → world scale for the group offset goal.
    pub hand_scale:    f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        MotionConfig {
            particle_rate: 0.05,
            tracking_rate: 0.1,
            rest_rate:     0.05,
            hand_scale:    5.0,
        }
    }
}

/// Static backdrop.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StarfieldConfig {
    pub count:  usize,
    /// Inner radius of the star shell.
    pub radius: f32,
    /// Shell thickness.
    pub depth:  f32,
    /// Point size multiplier.
    pub factor: f32,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        StarfieldConfig { count: 5_000, radius: 100.0, depth: 50.0, factor: 4.0 }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
