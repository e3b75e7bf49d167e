//! Danmaku headless demo.
//!
//! Builds the classic ring-of-bullets pattern and runs it at a fixed update
//! rate, logging the live body count once per simulated second. Nothing is
//! drawn; a renderer would walk [`Simulation::bodies`] after each frame.
//!
//! # Pattern
//!
//! - A blue prototype bullet grows in, waits, then fades out and dies
//! - An 8-way ring emitter clones it every 10 ms
//! - Looping timelines spin the prototype, cycle its color, and pulse the
//!   ring radius
//! - A point emitter sprays randomly colored bullets on top
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --seconds 10
//! RUST_LOG=debug cargo run -- --config danmaku.ini --script pattern.json
//! ```
//!
//! Scripts address the prototype as `ProBody` and the emitters as `Ring` and
//! `Spray`. See [`danmaku::instruction`] for the format.

use std::path::PathBuf;

use clap::Parser;
use log::{info, warn};

use danmaku::color::Color;
use danmaku::components::action::Action;
use danmaku::components::body::Body;
use danmaku::components::emitter::Emitter;
use danmaku::components::timeline::{Target, Timeline};
use danmaku::components::tween::Easing;
use danmaku::error::SimError;
use danmaku::instruction::parse_script;
use danmaku::resources::properties::Value;
use danmaku::resources::simconfig::SimulationConfig;
use danmaku::simulation::Simulation;

/// Danmaku bullet-pattern simulation, headless.
#[derive(Parser)]
#[command(version, about = "Runs a bullet pattern without a window and logs what happens.")]
struct Cli {
    /// INI configuration file (default: ./danmaku.ini). Missing files fall back to defaults.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Simulated seconds to run.
    #[arg(long, default_value_t = 10.0)]
    seconds: f32,

    /// JSON instruction script applied after the built-in pattern is set up.
    #[arg(long, value_name = "PATH")]
    script: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(path) => SimulationConfig::with_path(path),
        None => SimulationConfig::new(),
    };
    if let Err(e) = config.load_from_file() {
        warn!("{}; using defaults", e);
    }
    let dt = config.frame_delta();

    let mut sim = match Simulation::new(config).and_then(|mut sim| {
        setup_pattern(&mut sim)?;
        Ok(sim)
    }) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("Error setting up simulation: {e}");
            std::process::exit(1);
        }
    };

    if let Some(path) = cli.script {
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("Error reading {}: {e}", path.display());
                std::process::exit(1);
            }
        };
        let applied = parse_script(&text)
            .map_err(|e| e.to_string())
            .and_then(|script| sim.apply_script(&script).map_err(|e| e.to_string()));
        if let Err(e) = applied {
            eprintln!("Error in script {}: {e}", path.display());
            std::process::exit(1);
        }
    }

    info!("Running {:.1}s at {:.4}s per update", cli.seconds, dt);
    let frames = (cli.seconds / dt).round().max(0.0) as u64;
    let frames_per_second = (1.0 / dt).round().max(1.0) as u64;
    let mut faults = 0usize;
    for frame in 1..=frames {
        sim.advance(dt);
        faults += sim.drain_faults().len();
        if frame % frames_per_second == 0 {
            let time = sim.time();
            info!(
                "t={:>5.1}s bodies={} frame={} faults={}",
                time.elapsed,
                sim.body_count(),
                time.frame_count,
                faults
            );
        }
    }
    info!("Done. {} bodies alive", sim.body_count());
}

fn setup_pattern(sim: &mut Simulation) -> Result<(), SimError> {
    let (center_x, center_y) = {
        let world = sim.config().world;
        (
            (world.min.x + world.max.x) * 0.5,
            (world.min.y + world.max.y) * 0.5,
        )
    };

    // --------------- Prototype bullet ---------------
    let mut bullet = Body::bullet()
        .with_position(center_x, center_y)
        .with_motion(100.0, 0.0)
        .with_radius(20.0);
    bullet.set_opacity(0.0);
    bullet.color = Color::BLUE;
    bullet.scale = 2.0;
    bullet.angle_addition = 45.0;
    bullet.destroy_when_timeline_end = true;
    bullet.set_timeline(Timeline::from_actions([
        Action::group([
            Action::animate_to("Scale", 1.0f32.into(), 0.2, Easing::SineOut)?,
            Action::animate_to("Opacity", 0.5f32.into(), 0.2, Easing::SineOut)?,
        ]),
        Action::sleep(4.5)?,
        Action::group([
            Action::animate_to("Scale", 2.0f32.into(), 0.5, Easing::ExponentialOut)?,
            Action::animate_to("Opacity", 0.0f32.into(), 0.5, Easing::ExponentialOut)?,
        ]),
    ]));
    let prototype = sim.add_prototype(bullet);
    sim.name_object("ProBody", Target::Body(prototype));

    // --------------- Emitters ---------------
    let ring = sim.add_emitter(Emitter::annular(prototype, 0.01, 8)?);
    sim.name_object("Ring", Target::Emitter(ring));

    let spray = Emitter::point(prototype, 0.1)?.with_callback(|_, body| {
        body.color = Color::new(fastrand::f32(), fastrand::f32(), fastrand::f32(), 1.0);
        body.set_speed(100.0 + fastrand::f32() * 100.0);
        body.set_opacity(0.2 + fastrand::f32() * 0.6);
        body.set_angle(fastrand::f32() * 360.0);
        if let Some(Action::Sleep(sleep)) = body.applied_timeline().actions_mut().get_mut(1) {
            if let Err(e) = sleep.set_duration(2.0) {
                warn!("Could not shorten spray bullet: {}", e);
            }
        }
    });
    let spray = sim.add_emitter(spray);
    sim.name_object("Spray", Target::Emitter(spray));

    // --------------- Looping animations ---------------
    sim.bind_timeline(
        Target::Body(prototype),
        Timeline::from_actions([Action::repeat(
            -1,
            [
                Action::animate_to("Angle", Value::Float(-360.0), 8.0, Easing::Smooth)?,
                Action::animate_to("Angle", Value::Float(360.0), 8.0, Easing::Smooth)?,
            ],
        )?]),
    );
    sim.bind_timeline(
        Target::Body(prototype),
        Timeline::from_actions([Action::repeat(
            -1,
            [
                Action::animate_to("Color", Color::RED.into(), 2.0, Easing::Smooth)?,
                Action::animate_to("Color", Color::BLUE.into(), 2.0, Easing::Smooth)?,
                Action::animate_to("Color", Color::GREEN.into(), 2.0, Easing::Smooth)?,
            ],
        )?]),
    );
    sim.bind_timeline(
        Target::Emitter(ring),
        Timeline::from_actions([Action::repeat(
            -1,
            [
                Action::animate_to("Radius", Value::Float(200.0), 2.0, Easing::SineOut)?,
                Action::animate_to("Radius", Value::Float(0.0), 2.0, Easing::SineOut)?,
            ],
        )?]),
    );

    info!("Pattern ready: prototype {:?}, ring {:?}, spray {:?}", prototype, ring, spray);
    Ok(())
}
