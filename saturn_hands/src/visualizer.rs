//! Software-rendered visualizer using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ SATURN OS                                  ┌───────────────┐ │
//! │ INTERACTIVE PARTICLE SYSTEM V1.0           │ NEURAL LINK ● │ │
//! │                                            └───────────────┘ │
//! │                 · ·  stars  ·     ·                          │
//! │                ┌──────────────────────┐                      │
//! │                │ GESTURE CONTROL ...  │   planet + ring      │
//! │                └──────────────────────┘                      │
//! │                                                ┌──────────┐  │
//! │                                                │ camera   │  │
//! │ ▬ ▬ ▬                                          └──────────┘  │
//! │                                        COORDINATES: x.xx, y.yy│
//! └──────────────────────────────────────────────────────────────┘
//! ```

use std::sync::mpsc::Sender;
use std::time::Duration;

use glam::Vec3;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use tracing::{info, warn};

use particle_field::{FieldSimulator, PointBatch, PointCloudSink, SetKind, Star};

use crate::camera::PerspectiveCamera;
use crate::error::AppError;
use crate::hud::{self, HudState};
use crate::raster::{self, FrameBuffer, GLYPH_ADVANCE, GLYPH_HEIGHT};
use crate::tracker::PointerInput;

// ════════════════════════════════════════════════════════════════════════════
// Palette
// ════════════════════════════════════════════════════════════════════════════

const BG_COLOR:    u32 = 0xFF000000;
const WHITE:       u32 = 0xFFFFFFFF;
const CYAN:        u32 = 0xFF22D3EE;
const CYAN_DEEP:   u32 = 0xFF06B6D4;

/// World size → screen size for stars; their sizes are in backdrop units.
const STAR_SIZE_SCALE: f32 = 0.05;
const PAD: usize = 32;

/// How a particle set is drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SetStyle {
    pub color:   u32,
    pub opacity: f32,
    /// World-space point size before attenuation.
    pub size:    f32,
}

pub fn set_style(kind: SetKind) -> SetStyle {
    match kind {
        SetKind::Core => SetStyle { color: 0xFF0088FF, opacity: 0.8, size: 0.05 },
        SetKind::Ring => SetStyle { color: 0xFF00FFFF, opacity: 0.6, size: 0.03 },
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ScenePainter — the point-cloud sink
// ════════════════════════════════════════════════════════════════════════════

/// Draws whatever the field hands over straight into a framebuffer.
pub struct ScenePainter<'a> {
    pub fb:     &'a mut FrameBuffer,
    pub camera: &'a PerspectiveCamera,
    /// Points that landed in front of the camera this frame.
    pub drawn:  usize,
}

impl<'a> ScenePainter<'a> {
    pub fn new(fb: &'a mut FrameBuffer, camera: &'a PerspectiveCamera) -> Self {
        ScenePainter { fb, camera, drawn: 0 }
    }

    fn splat(&mut self, world: Vec3, size: f32, color: u32, alpha: f32) {
        if let Some(p) = self.camera.project(world) {
            let d = self.camera.point_footprint(size, p.depth);
            self.fb.plot_point(p.x, p.y, d, color, alpha);
            self.drawn += 1;
        }
    }
}

impl PointCloudSink for ScenePainter<'_> {
    fn backdrop(&mut self, stars: &[Star]) {
        for star in stars {
            // Bigger stars read brighter.
            let alpha = (star.size / 4.0).clamp(0.3, 1.0);
            self.splat(star.position, star.size * STAR_SIZE_SCALE, WHITE, alpha);
        }
    }

    fn submit(&mut self, batch: PointBatch<'_>) {
        let style = set_style(batch.kind);
        let rot = batch.transform.rotation_matrix().as_mat3();
        let offset = batch.transform.offset.as_vec3();
        for xyz in batch.positions.chunks_exact(3) {
            let world = offset + rot * Vec3::new(xyz[0], xyz[1], xyz[2]);
            self.splat(world, style.size, style.color, style.opacity);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HUD
// ════════════════════════════════════════════════════════════════════════════

/// Draw the overlay on top of the scene.
pub fn draw_hud(fb: &mut FrameBuffer, hud: &HudState) {
    let (w, h) = (fb.width(), fb.height());

    // ── Header ────────────────────────────────────────────────────────────
    let title_scale = 6;
    let accent_x = PAD + (hud::TITLE.len() + 1) * GLYPH_ADVANCE * title_scale;
    fb.draw_label(hud::TITLE, PAD, PAD, title_scale, WHITE, 1.0);
    fb.draw_label(hud::TITLE_ACCENT, accent_x, PAD, title_scale, CYAN, 1.0);
    fb.draw_label(hud::SUBTITLE, PAD, PAD + GLYPH_HEIGHT * title_scale + 10, 2, CYAN_DEEP, 0.6);

    // ── Status panel ──────────────────────────────────────────────────────
    let panel_w = raster::text_width(hud::STATUS_TEXT, 2) + 56;
    let panel_h = 56;
    let panel_x = w.saturating_sub(PAD + panel_w);
    fb.blend_rect(panel_x, PAD, panel_w, panel_h, WHITE, 0.05);
    fb.draw_border(panel_x, PAD, panel_w, panel_h, raster::dim(WHITE, 0.1));
    let text_right = panel_x + panel_w - 36;
    fb.draw_label(hud::STATUS_LABEL, text_right - raster::text_width(hud::STATUS_LABEL, 2), PAD + 12, 2, CYAN, 1.0);
    fb.draw_label(hud::STATUS_TEXT,  text_right - raster::text_width(hud::STATUS_TEXT, 2),  PAD + 30, 2, WHITE, 1.0);
    fb.fill_disc(panel_x + panel_w - 20, PAD + panel_h / 2, 4, CYAN, hud.pulse());

    // ── Intro card ────────────────────────────────────────────────────────
    if hud.intro.is_shown() {
        draw_intro(fb, hud);
    }

    // ── Camera preview badge ──────────────────────────────────────────────
    let (cam_w, cam_h) = (192, 144);
    let cam_x = w.saturating_sub(PAD + cam_w);
    let cam_y = h.saturating_sub(PAD + cam_h + 28);
    fb.blend_rect(cam_x, cam_y, cam_w, cam_h, BG_COLOR, 0.5);
    fb.draw_border(cam_x, cam_y, cam_w, cam_h, raster::dim(CYAN_DEEP, 0.3));
    let (badge, alpha) = if hud.camera_pending {
        (hud::CAMERA_WAIT.to_string(), hud.pulse())
    } else {
        (format!("SOURCE: {}", hud.source), 0.6)
    };
    let bw = raster::text_width(&badge, 2);
    fb.draw_label(&badge, cam_x + cam_w.saturating_sub(bw) / 2, cam_y + cam_h / 2 - 5, 2, CYAN, alpha);

    // ── Footer ────────────────────────────────────────────────────────────
    let bar_y = h.saturating_sub(PAD + 4);
    for i in 1..=hud::BAR_COUNT {
        let x = PAD + (i - 1) * 56;
        fb.blend_rect(x, bar_y, 48, 4, WHITE, 0.1);
        if let Some((a, b)) = hud::bar_fill(i, hud.time) {
            let x0 = x + (a * 48.0) as usize;
            let x1 = x + (b * 48.0) as usize;
            fb.fill_rect(x0, bar_y, x1 - x0, 4, CYAN);
        }
    }
    let coords = hud.coordinates();
    let cw = raster::text_width(&coords, 2);
    fb.draw_label(&coords, w.saturating_sub(PAD + cw), h.saturating_sub(PAD + 10), 2, WHITE, 0.4);
}

fn draw_intro(fb: &mut FrameBuffer, hud: &HudState) {
    let (w, h) = (fb.width(), fb.height());
    let opacity = hud.intro.opacity();
    let scale = hud.intro.scale();
    let card_w = (520.0 * scale) as usize;
    let card_h = (250.0 * scale) as usize;
    let x = w.saturating_sub(card_w) / 2;
    let y = h.saturating_sub(card_h) / 2;

    fb.blend_rect(x, y, card_w, card_h, BG_COLOR, 0.4 * opacity);
    fb.draw_border(x, y, card_w, card_h, raster::dim(CYAN_DEEP, 0.2 + 0.3 * opacity));

    let centred = |text: &str, s: usize| x + card_w.saturating_sub(raster::text_width(text, s)) / 2;
    fb.fill_disc(w / 2, y + 36, 16, CYAN_DEEP, 0.2 * opacity);
    fb.draw_label(hud::INTRO_TITLE, centred(hud::INTRO_TITLE, 4), y + 70, 4, WHITE, opacity);
    for (i, line) in hud::INTRO_BODY.iter().enumerate() {
        fb.draw_label(line, centred(line, 2), y + 104 + i * 16, 2, CYAN, 0.6 * opacity);
    }

    let tile_w = card_w.saturating_sub(48) / 2;
    for (i, (label, value)) in hud::INTRO_HINTS.iter().enumerate() {
        let tx = x + 16 + i * (tile_w + 16);
        let ty = y + card_h.saturating_sub(76);
        fb.blend_rect(tx, ty, tile_w, 56, WHITE, 0.05 * opacity);
        fb.draw_label(label, tx + 10, ty + 12, 2, WHITE, 0.4 * opacity);
        fb.draw_label(value, tx + 10, ty + 32, 2, WHITE, opacity);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:       Window,
    fb:           FrameBuffer,
    camera:       PerspectiveCamera,
    /// Present only for the mouse back-end.
    pointer_tx:   Option<Sender<PointerInput>>,
    last_pointer: Option<PointerInput>,
}

impl Visualizer {
    pub fn new(
        width:      usize,
        height:     usize,
        camera:     PerspectiveCamera,
        pointer_tx: Option<Sender<PointerInput>>,
    ) -> Result<Self, AppError> {
        let mut window = Window::new(
            "Saturn OS — Interactive Particle System",
            width, height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )?;

        window.limit_update_rate(Some(Duration::from_millis(16))); // ~60fps
        info!(width, height, "window opened");

        Ok(Visualizer {
            window,
            fb: FrameBuffer::new(width, height),
            camera,
            pointer_tx,
            last_pointer: None,
        })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Poll keyboard and mouse.  Returns false on Esc or Q.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }

        if self.window.is_key_pressed(Key::Escape, KeyRepeat::No)
            || self.window.is_key_pressed(Key::Q, KeyRepeat::No)
        {
            return false;
        }

        if let Some(tx) = &self.pointer_tx {
            if self.window.is_key_pressed(Key::H, KeyRepeat::No) {
                let _ = tx.send(PointerInput::ToggleSecondHand);
            }

            let input = match self.window.get_mouse_pos(MouseMode::Discard) {
                Some((mx, my)) => PointerInput::At {
                    x:       mx / self.fb.width() as f32,
                    y:       my / self.fb.height() as f32,
                    engaged: self.window.get_mouse_down(MouseButton::Left),
                },
                None => PointerInput::Away,
            };
            if self.last_pointer != Some(input) {
                let _ = tx.send(input);
                self.last_pointer = Some(input);
            }
        }

        true
    }

    /// Render one frame.
    pub fn render(&mut self, field: &mut FieldSimulator, hud: &HudState) {
        self.fb.clear(BG_COLOR);

        let mut painter = ScenePainter::new(&mut self.fb, &self.camera);
        field.present(&mut painter);

        draw_hud(&mut self.fb, hud);

        let (w, h) = (self.fb.width(), self.fb.height());
        if let Err(e) = self.window.update_with_buffer(self.fb.pixels(), w, h) {
            warn!(error = %e, "frame update failed");
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
