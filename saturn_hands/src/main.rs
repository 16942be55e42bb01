//! saturn_hands — interactive entry point.

use std::io::{self, Write};
use std::process;

use saturn_hands::{run, AppConfig, SourceKind};
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║        Saturn OS — Hand-Steered Particle Field               ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "leap")]
    println!("  Hand sources: sim, orbit, leap");
    #[cfg(not(feature = "leap"))]
    println!("  Hand sources: sim, orbit  (use --features leap for hardware)");
    println!();

    let launch = match AppConfig::from_args(std::env::args().skip(1)) {
        Ok(l)  => l,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("usage: saturn_hands [--quick] [--source sim|orbit|leap] [--config FILE] [--seed N] [--hands N] [--hover]");
            process::exit(2);
        }
    };

    let mut cfg = launch.config;
    if launch.quick {
        println!("  Quick-start: {} source, seed {}\n", cfg.source.name(), cfg.field.seed);
    } else {
        configure_interactively(&mut cfg, launch.source_given);
    }

    println!();
    println!("  Opening visualizer window…");
    println!("  Esc/Q quits; with the sim source hold the left mouse button to show a hand.");
    println!();

    if let Err(e) = run(cfg) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn configure_interactively(cfg: &mut AppConfig, source_given: bool) {
    if !source_given {
        cfg.source = pick_source();
    }

    let seed = read_line(&format!("  Field seed (default {}): ", cfg.field.seed));
    if let Ok(s) = seed.trim().parse::<u64>() {
        cfg.field.seed = s;
    }

    if cfg.source == SourceKind::Sim {
        let hover = read_line("  Track pointer without holding a button? (y/N): ");
        cfg.hover = cfg.hover || hover.trim().eq_ignore_ascii_case("y");
    }
}

fn pick_source() -> SourceKind {
    println!("  Hand source:");
    println!("    1.Mouse simulation  2.Orbit demo  3.LeapMotion");
    match read_line("    Choice (1–3, default 1): ").trim() {
        "2" => SourceKind::Orbit,
        "3" if SourceKind::Leap.is_available() => SourceKind::Leap,
        "3" => {
            warn!("built without the `leap` feature; falling back to mouse simulation");
            SourceKind::Sim
        }
        _ => SourceKind::Sim,
    }
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}
