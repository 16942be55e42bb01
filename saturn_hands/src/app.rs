//! Top-level application state and frame loop.
//!
//! `AppState` owns the hand position source, the particle field and the HUD
//! state.  It takes the detector results drained each frame and drives the
//! visualizer.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::mpsc;
use std::time::Instant;

use hand_signal::{DisplacementSignal, HandPositionSource};
use particle_field::{FieldConfig, FieldSimulator};
use tracing::{debug, info, warn};

use crate::camera::PerspectiveCamera;
use crate::error::AppError;
use crate::hud::HudState;
use crate::tracker::{
    spawn_hand_source, Drained, HandSource, OrbitHandSource, PointerInput, SimHandSource,
    TrackerConfig,
};
use crate::visualizer::Visualizer;

// ════════════════════════════════════════════════════════════════════════════
// SourceKind
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    /// Mouse-driven synthetic hand.
    Sim,
    /// Scripted circling hand.
    Orbit,
    /// LeapMotion hardware.
    Leap,
}

impl SourceKind {
    pub fn name(self) -> &'static str {
        match self {
            SourceKind::Sim   => "sim",
            SourceKind::Orbit => "orbit",
            SourceKind::Leap  => "leap",
        }
    }

    /// Whether this build can run the back-end.
    pub fn is_available(self) -> bool {
        match self {
            SourceKind::Leap => cfg!(feature = "leap"),
            _                => true,
        }
    }
}

impl FromStr for SourceKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, AppError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sim" | "mouse" => Ok(SourceKind::Sim),
            "orbit"         => Ok(SourceKind::Orbit),
            "leap"          => Ok(SourceKind::Leap),
            other           => Err(AppError::UnknownSource(other.to_string())),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub source:          SourceKind,
    pub field:           FieldConfig,
    pub tracker:         TrackerConfig,
    /// Mouse back-end: count the pointer as a hand without holding a button.
    pub hover:           bool,
    pub width:           usize,
    pub height:          usize,
    pub camera_distance: f32,
    /// Vertical field of view, degrees.
    pub fov_y:           f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            source:          SourceKind::Sim,
            field:           FieldConfig::default(),
            tracker:         TrackerConfig::default(),
            hover:           false,
            width:           1280,
            height:          720,
            camera_distance: 15.0,
            fov_y:           50.0,
        }
    }
}

/// Parsed command line.
#[derive(Clone, Debug)]
pub struct Launch {
    pub config: AppConfig,
    /// Skip the interactive prompt.
    pub quick:  bool,
    /// `--source` was given explicitly.
    pub source_given: bool,
}

impl AppConfig {
    /// Parse flags (program name already stripped).
    ///
    /// `--config` is applied before `--seed`, whatever their order.
    pub fn from_args<I>(args: I) -> Result<Launch, AppError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut cfg = AppConfig::default();
        let mut quick = false;
        let mut source_given = false;
        let mut config_path: Option<PathBuf> = None;
        let mut seed: Option<u64> = None;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--quick" => quick = true,
                "--hover" => cfg.hover = true,
                "--source" => {
                    cfg.source = value(&mut args, "--source")?.parse()?;
                    source_given = true;
                }
                "--config" => config_path = Some(PathBuf::from(value(&mut args, "--config")?)),
                "--seed" => {
                    let v = value(&mut args, "--seed")?;
                    seed = Some(v.parse().map_err(|_| AppError::argument("--seed", format!("`{}` is not an integer", v)))?);
                }
                "--hands" => {
                    let v = value(&mut args, "--hands")?;
                    let n: usize = v.parse().map_err(|_| AppError::argument("--hands", format!("`{}` is not a count", v)))?;
                    if n == 0 {
                        return Err(AppError::argument("--hands", "must be at least 1"));
                    }
                    cfg.tracker.max_hands = n;
                }
                other => return Err(AppError::argument("arguments", format!("unknown flag `{}`", other))),
            }
        }

        if let Some(path) = config_path {
            cfg.field = FieldConfig::load(&path)?;
        }
        if let Some(seed) = seed {
            cfg.field.seed = seed;
        }
        Ok(Launch { config: cfg, quick, source_given })
    }

    pub fn camera(&self) -> PerspectiveCamera {
        PerspectiveCamera::new(self.camera_distance, self.fov_y, self.width, self.height)
    }
}

fn value<I: Iterator<Item = String>>(args: &mut I, flag: &'static str) -> Result<String, AppError> {
    args.next().ok_or_else(|| AppError::argument(flag, "missing value"))
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    source: HandPositionSource,
    field:  FieldSimulator,
    hud:    HudState,

    // ── per-second frame statistics ──────────────────────────────────────
    stats_since:  f64,
    stats_frames: u32,
}

impl AppState {
    pub fn new(cfg: &AppConfig) -> Result<Self, AppError> {
        Ok(AppState {
            source:       HandPositionSource::new(),
            field:        FieldSimulator::new(&cfg.field)?,
            hud:          HudState::new(cfg.source.name()),
            stats_since:  0.0,
            stats_frames: 0,
        })
    }

    // ── feed one frame's detector output ─────────────────────────────────

    /// Feed every drained result through the source, oldest first, so the
    /// last one wins.  The first hand ever seen dismisses the intro card.  A
    /// finished back-end closes the source.
    pub fn ingest(&mut self, drained: Drained) {
        for result in &drained.results {
            let acquired = self.source.ingest(result).map_or(false, |u| u.first_acquisition);
            if acquired {
                self.hud.hand_acquired();
            }
        }
        if drained.disconnected && !self.source.is_closed() {
            warn!("hand source ended; field returns to rest");
            self.close_source();
        }
    }

    // ── Per-frame tick ────────────────────────────────────────────────────

    pub fn tick(&mut self, t: f64) {
        let signal = self.source.signal();
        self.field.step(t, signal);
        self.hud.update(t, signal, self.source.has_received());

        self.stats_frames += 1;
        if t - self.stats_since >= 1.0 {
            debug!(
                fps = self.stats_frames,
                signal = %signal,
                results = self.source.results_seen(),
                malformed = self.source.malformed_seen(),
                "frame stats"
            );
            self.stats_since = t;
            self.stats_frames = 0;
        }
    }

    /// Stop listening to the detector.  Later results are ignored.
    pub fn close_source(&mut self) {
        self.source.close();
    }

    // ── Accessors for the render loop ─────────────────────────────────────

    pub fn signal(&self) -> DisplacementSignal { self.source.signal() }
    pub fn field(&self)  -> &FieldSimulator    { &self.field }
    pub fn hud(&self)    -> &HudState          { &self.hud }
    pub fn source(&self) -> &HandPositionSource { &self.source }

    pub fn parts_mut(&mut self) -> (&mut FieldSimulator, &HudState) {
        (&mut self.field, &self.hud)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

fn build_source(
    cfg:        &AppConfig,
    pointer_rx: mpsc::Receiver<PointerInput>,
) -> Result<Box<dyn HandSource>, AppError> {
    match cfg.source {
        SourceKind::Sim => Ok(Box::new(SimHandSource {
            rx:    pointer_rx,
            cfg:   cfg.tracker.clone(),
            hover: cfg.hover,
        })),
        SourceKind::Orbit => Ok(Box::new(OrbitHandSource::new(cfg.tracker.clone()))),
        #[cfg(feature = "leap")]
        SourceKind::Leap => Ok(Box::new(crate::tracker::LeapHandSource { cfg: cfg.tracker.clone() })),
        #[cfg(not(feature = "leap"))]
        SourceKind::Leap => Err(AppError::SourceUnavailable("leap")),
    }
}

/// Run the full application.
///
/// Builds the field, opens the window, starts the hand source and drives the
/// event/render loop at ~60 fps until the window closes or Esc/Q is pressed.
pub fn run(cfg: AppConfig) -> Result<(), AppError> {
    // ── Hand source (checked before any window appears) ──────────────────
    let (pointer_tx, pointer_rx) = mpsc::channel::<PointerInput>();
    let source = build_source(&cfg, pointer_rx)?;
    let pointer_tx = (cfg.source == SourceKind::Sim).then_some(pointer_tx);

    // ── App state ─────────────────────────────────────────────────────────
    let mut app = AppState::new(&cfg)?;

    // ── Visualizer (owns the window and the pointer sender) ──────────────
    let mut vis = Visualizer::new(cfg.width, cfg.height, cfg.camera(), pointer_tx)?;

    let mut tracker = spawn_hand_source(source);
    let start = Instant::now();

    // ── Main loop ─────────────────────────────────────────────────────────
    while vis.is_open() {
        // 1. Poll window input
        if !vis.poll_input() { break; }

        // 2. Drain detector results
        app.ingest(tracker.drain());

        // 3. Per-frame logic
        app.tick(start.elapsed().as_secs_f64());

        // 4. Render
        let (field, hud) = app.parts_mut();
        vis.render(field, hud);
    }

    // ── Teardown: tracker, then source, then window ──────────────────────
    tracker.shutdown();
    app.close_source();
    drop(vis);
    info!(frames = app.field().frames(), "window closed");

    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
