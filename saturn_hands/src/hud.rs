//! Overlay state: intro card, camera badge, coordinate readout, footer bars.
//!
//! Everything here is plain data advanced once per frame; the visualizer
//! reads it to draw.

use hand_signal::DisplacementSignal;

pub const TITLE:        &str = "SATURN";
pub const TITLE_ACCENT: &str = "OS";
pub const SUBTITLE:     &str = "INTERACTIVE PARTICLE SYSTEM V1.0";
pub const STATUS_LABEL: &str = "SYSTEM STATUS";
pub const STATUS_TEXT:  &str = "NEURAL LINK ACTIVE";
pub const INTRO_TITLE:  &str = "GESTURE CONTROL REQUIRED";
pub const INTRO_BODY: [&str; 2] = [
    "PLACE YOUR HAND IN VIEW TO INTERACT",
    "WITH THE PLANETARY PARTICLE FIELD.",
];
pub const INTRO_HINTS: [(&str, &str); 2] = [
    ("INTERACTION", "HAND PRESENCE"),
    ("CONTROL",     "SPATIAL MAPPING"),
];
pub const CAMERA_WAIT:  &str = "INITIALIZING CAMERA...";

/// Frames the intro card takes to animate out.
pub const INTRO_EXIT_FRAMES: u32 = 18;

/// Footer bars: one sweep every `BAR_CYCLE` seconds, bar `i` (1-based)
/// starting `i · BAR_STAGGER` seconds after launch.
pub const BAR_COUNT:   usize = 3;
pub const BAR_CYCLE:   f64   = 2.0;
pub const BAR_STAGGER: f64   = 0.4;

// ════════════════════════════════════════════════════════════════════════════
// IntroPhase
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub enum IntroPhase {
    /// Waiting for the first hand.
    Visible,
    /// Fading and shrinking away.
    Dismissing { progress: f32 },
    /// Gone for the rest of the session.
    Dismissed,
}

impl IntroPhase {
    /// Start the exit animation.  Only the first call has any effect.
    pub fn dismiss(&mut self) {
        if *self == IntroPhase::Visible {
            *self = IntroPhase::Dismissing { progress: 0.0 };
        }
    }

    /// Advance one frame.  Returns true when the exit completes.
    pub fn tick(&mut self) -> bool {
        if let IntroPhase::Dismissing { progress } = self {
            *progress += 1.0 / INTRO_EXIT_FRAMES as f32;
            if *progress >= 1.0 - 1e-6 {
                *self = IntroPhase::Dismissed;
                return true;
            }
        }
        false
    }

    pub fn opacity(&self) -> f32 {
        match self {
            IntroPhase::Visible                => 1.0,
            IntroPhase::Dismissing { progress } => 1.0 - progress,
            IntroPhase::Dismissed              => 0.0,
        }
    }

    /// Card scale, shrinking to 0.9 on exit.
    pub fn scale(&self) -> f32 {
        match self {
            IntroPhase::Visible                => 1.0,
            IntroPhase::Dismissing { progress } => 1.0 - 0.1 * progress,
            IntroPhase::Dismissed              => 0.9,
        }
    }

    pub fn is_shown(&self) -> bool {
        !matches!(self, IntroPhase::Dismissed)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HudState
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct HudState {
    pub intro:          IntroPhase,
    /// True until the detector has reported anything at all.
    pub camera_pending: bool,
    pub signal:         DisplacementSignal,
    /// Seconds since launch.
    pub time:           f64,
    /// Name of the running hand source, shown in the footer.
    pub source:         &'static str,
}

impl HudState {
    pub fn new(source: &'static str) -> Self {
        HudState {
            intro:          IntroPhase::Visible,
            camera_pending: true,
            signal:         DisplacementSignal::none(),
            time:           0.0,
            source,
        }
    }

    /// The adapter saw its first hand.  Starts the intro exit.
    pub fn hand_acquired(&mut self) {
        self.intro.dismiss();
    }

    /// Fold in this frame's adapter state.
    pub fn update(&mut self, t: f64, signal: DisplacementSignal, received: bool) {
        self.time = t;
        self.signal = signal;
        if received {
            self.camera_pending = false;
        }
        self.intro.tick();
    }

    pub fn coordinates(&self) -> String {
        coordinate_readout(self.signal)
    }

    /// Brightness of the status dot, pulsing between 0.5 and 1 every 2 s.
    pub fn pulse(&self) -> f32 {
        0.75 - 0.25 * (self.time * std::f64::consts::PI).cos() as f32
    }
}

/// `COORDINATES: x.xx, y.yy` or `COORDINATES: IDLE`.
pub fn coordinate_readout(signal: DisplacementSignal) -> String {
    format!("COORDINATES: {}", signal)
}

/// Visible slice `[start, end)` of footer bar `index` (1-based) at time `t`,
/// in fractions of the bar width.  The fill slides from fully left of the
/// track to fully right of it, so it is empty at both ends of a sweep.
pub fn bar_fill(index: usize, t: f64) -> Option<(f32, f32)> {
    let local = t - index as f64 * BAR_STAGGER;
    if local < 0.0 {
        return None;
    }
    let phase = (local.rem_euclid(BAR_CYCLE) / BAR_CYCLE) as f32;
    let shift = -1.0 + 2.0 * phase;
    let start = shift.max(0.0);
    let end = (shift + 1.0).min(1.0);
    if end > start { Some((start, end)) } else { None }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intro_exit_runs_once() {
        let mut p = IntroPhase::Visible;
        assert!(!p.tick());
        p.dismiss();
        let mut frames = 0;
        while !p.tick() { frames += 1; assert!(frames < 100); }
        assert_eq!(frames + 1, INTRO_EXIT_FRAMES);
        assert_eq!(p, IntroPhase::Dismissed);
        p.dismiss();
        assert_eq!(p, IntroPhase::Dismissed);
        assert!(!p.is_shown());
    }

    #[test]
    fn intro_fades_and_shrinks() {
        let p = IntroPhase::Dismissing { progress: 0.5 };
        assert!((p.opacity() - 0.5).abs() < 1e-6);
        assert!((p.scale() - 0.95).abs() < 1e-6);
    }

    #[test]
    fn hud_follows_adapter() {
        let mut h = HudState::new("sim");
        h.update(0.1, DisplacementSignal::none(), false);
        assert!(h.camera_pending);
        assert_eq!(h.intro, IntroPhase::Visible);

        h.update(0.2, DisplacementSignal::none(), true);
        assert!(!h.camera_pending);
        assert_eq!(h.intro, IntroPhase::Visible);

        h.hand_acquired();
        h.update(0.3, DisplacementSignal::at(0.25, -0.5), true);
        assert!(matches!(h.intro, IntroPhase::Dismissing { .. }));
        assert_eq!(h.coordinates(), "COORDINATES: 0.25, -0.50");

        // Losing the hand does not bring the intro back.
        for i in 0..40 {
            h.update(0.4 + i as f64 / 60.0, DisplacementSignal::none(), true);
        }
        assert_eq!(h.intro, IntroPhase::Dismissed);
        assert_eq!(h.coordinates(), "COORDINATES: IDLE");
    }

    #[test]
    fn bars_are_staggered() {
        assert_eq!(bar_fill(1, 0.3), None);
        assert!(bar_fill(1, 0.5).is_some());
        assert_eq!(bar_fill(2, 0.5), None);
        // Half a sweep in, the fill covers the whole track.
        assert_eq!(bar_fill(1, 0.4 + 1.0), Some((0.0, 1.0)));
        // Start of every sweep is empty.
        assert_eq!(bar_fill(3, 1.2 + 2.0 * 3.0), None);
    }

    #[test]
    fn pulse_in_range() {
        let mut h = HudState::new("sim");
        for i in 0..100 {
            h.time = i as f64 * 0.05;
            let p = h.pulse();
            assert!((0.5..=1.0).contains(&p), "{}", p);
        }
    }
}
