//! # saturn_hands
//!
//! A planet-and-ring particle field steered by one hand.  A hand-tracking
//! back-end runs on its own thread; each frame the UI thread drains its
//! results, reduces them to a displacement signal, steps the field and paints
//! it into a software framebuffer.
//!
//! ## Hand → field mapping
//!
//! | Hand | Field |
//! |---|---|
//! | In view | Particles burst outward along their directions; both sets drift toward the hand |
//! | Out of view | Particles fall back onto the sphere and ring; both sets drift home |
//! | First ever seen | Intro card animates out for good |
//!
//! ## Hand sources
//!
//! * `sim` (default) — **Mouse simulation**: hold the left button inside the
//!   window (or pass `--hover`) and the pointer becomes a hand.
//! * `orbit` — **Scripted demo**: a hand circles the centre, leaves, returns.
//! * `leap` — **Hardware mode** (`leap` feature): polls a real LeapMotion
//!   controller via LeapC.
//!
//! ### Keys
//!
//! | Key | Action |
//! |---|---|
//! | `H` | Toggle a second synthetic hand (`sim` only; see `--hands`) |
//! | `Esc` / `Q` | Quit |

pub mod app;
pub mod camera;
pub mod error;
pub mod hud;
pub mod raster;
pub mod tracker;
pub mod visualizer;

pub use app::{run, AppConfig, AppState, Launch, SourceKind};
pub use error::AppError;
