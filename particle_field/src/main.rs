//! field_probe — headless convergence check.
//!
//! ```text
//! field_probe [frames] [x y]
//! ```
//!
//! Holds the hand at `(x, y)` for `frames` frames, then takes it away for the
//! same number of frames, printing the group offset and the largest particle
//! distance-to-target as it goes.

use std::process;

use hand_signal::DisplacementSignal;
use particle_field::{explosion_factor, FieldConfig, FieldSimulator};
use tracing_subscriber::EnvFilter;

const FRAME_RATE: f64 = 60.0;
const ROWS:       usize = 12;

struct Probe {
    frames: usize,
    x:      f32,
    y:      f32,
}

fn parse_args() -> Result<Probe, String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let frames = match args.first() {
        Some(a) => a.parse::<usize>().map_err(|_| format!("frames: `{}` is not a count", a))?,
        None    => 120,
    };
    let (x, y) = match (args.get(1), args.get(2)) {
        (Some(x), Some(y)) => (
            x.parse::<f32>().map_err(|_| format!("x: `{}` is not a number", x))?,
            y.parse::<f32>().map_err(|_| format!("y: `{}` is not a number", y))?,
        ),
        (None, None) => (1.0, 1.0),
        _ => return Err("give both x and y, or neither".to_string()),
    };
    if frames == 0 {
        return Err("frames must be at least 1".to_string());
    }
    Ok(Probe { frames, x, y })
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let probe = match parse_args() {
        Ok(p)  => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("usage: field_probe [frames] [x y]");
            process::exit(2);
        }
    };

    let mut field = match FieldSimulator::new(&FieldConfig::default()) {
        Ok(f)  => f,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║              Field Probe — offset / explosion trace          ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    println!("  hand ({:.2}, {:.2}) for {} frames, then idle for {}", probe.x, probe.y, probe.frames, probe.frames);
    println!();
    println!("  {:>6}  {:<8}  {:>9}  {:>9}  {:>11}  {:>11}", "frame", "signal", "offset.x", "offset.y", "core dist", "ring dist");
    println!("  {}", "─".repeat(64));

    let every = (probe.frames / ROWS).max(1);
    let held  = DisplacementSignal::at(probe.x, probe.y);

    for (phase, signal) in [held, DisplacementSignal::none()].into_iter().enumerate() {
        let explosion = explosion_factor(signal);
        for i in 0..probe.frames {
            let t = field.frames() as f64 / FRAME_RATE;
            field.step(t, signal);

            if (i + 1) % every == 0 || i + 1 == probe.frames {
                let offset = field.core().transform.offset;
                println!(
                    "  {:>6}  {:<8}  {:>9.4}  {:>9.4}  {:>11.6}  {:>11.6}",
                    field.frames(),
                    if phase == 0 { "hand" } else { "idle" },
                    offset.x,
                    offset.y,
                    field.core().set.max_distance_to_target(explosion),
                    field.ring().set.max_distance_to_target(explosion),
                );
            }
        }
    }
    println!();
}
