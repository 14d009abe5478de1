// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Headless Prism runtime.
//!
//! Runs the sandbox at a fixed timestep on a simulated clock, so device
//! profiling debounce, quality adaptation and physics all behave as they would
//! in a window, without needing one.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use prism_control::DeviceProfiler;
use prism_core::input::PointerEvent;
use prism_core::math::Vec2;
use prism_core::platform::Viewport;
use prism_infra::{HostProbe, RapierPhysicsWorld};
use prism_sandbox::{PresetName, Sandbox, SandboxConfig, ShapeKind};
use winit::dpi::PhysicalSize;

#[derive(Parser, Debug)]
#[command(name = "prism-runtime", version, about = "Runs the Prism physics sandbox headless")]
struct Cli {
    /// JSON configuration file. Defaults are used when absent.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    dump_config: bool,

    /// Preset to load before the first frame.
    #[arg(long)]
    preset: Option<PresetName>,

    /// Extra objects of random shape to spawn before the first frame.
    #[arg(long, default_value_t = 0)]
    spawn: usize,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Simulated frame time in seconds.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Logical viewport width.
    #[arg(long, default_value_t = 1280.0)]
    width: f32,

    /// Logical viewport height.
    #[arg(long, default_value_t = 720.0)]
    height: f32,

    /// Device pixel ratio.
    #[arg(long, default_value_t = 1.0)]
    scale_factor: f64,

    /// Report touch input to the device profiler.
    #[arg(long)]
    touch: bool,

    /// Window resize to simulate, as `WIDTHxHEIGHT@FRAME` in physical pixels.
    #[arg(long)]
    resize: Vec<ResizeStep>,

    /// Throw the object under the viewport centre at this frame.
    #[arg(long)]
    throw_at: Option<u32>,

    /// Log the sandbox status every this many frames (0 disables).
    #[arg(long, default_value_t = 120)]
    status_every: u32,
}

/// A simulated window resize.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ResizeStep {
    size: PhysicalSize<u32>,
    frame: u32,
}

impl FromStr for ResizeStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("expected WIDTHxHEIGHT@FRAME, got '{s}'");
        let (size, frame) = s.split_once('@').ok_or_else(invalid)?;
        let (width, height) = size.split_once('x').ok_or_else(invalid)?;
        Ok(Self {
            size: PhysicalSize::new(
                width.trim().parse().map_err(|_| invalid())?,
                height.trim().parse().map_err(|_| invalid())?,
            ),
            frame: frame.trim().parse().map_err(|_| invalid())?,
        })
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<SandboxConfig> {
    match path {
        Some(path) => SandboxConfig::load(path)
            .with_context(|| format!("loading sandbox configuration from {}", path.display())),
        None => Ok(SandboxConfig::default()),
    }
}

/// Presses on the viewport centre, drags right for a third of a second and
/// lets go.
fn throw_from_centre(sandbox: &mut Sandbox<RapierPhysicsWorld>, clock: f64, dt: f32) {
    let viewport = sandbox.viewport();
    let centre = Vec2::new(viewport.width * 0.5, viewport.height * 0.5);
    let release = centre + Vec2::new(viewport.width * 0.25, -viewport.height * 0.1);

    sandbox.handle_pointer(PointerEvent::Down {
        position: centre,
        timestamp: clock,
    });
    let Some(object) = sandbox.interaction().dragged_object() else {
        log::warn!("Nothing under the viewport centre to throw");
        return;
    };
    sandbox.handle_pointer(PointerEvent::Move {
        position: release,
        timestamp: clock + 0.2,
    });
    sandbox.frame(dt);
    sandbox.handle_pointer(PointerEvent::Up {
        position: release,
        timestamp: clock + 0.33,
    });
    log::info!("Threw {}", object);
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info"))
        .filter_module("rapier3d", log::LevelFilter::Warn)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;
    if cli.dump_config {
        println!("{}", config.to_json_string()?);
        return Ok(());
    }

    let probe = HostProbe::new(
        Viewport::new(cli.width, cli.height, cli.scale_factor as f32),
        cli.touch,
    );
    let mut profiler = DeviceProfiler::new(probe.clone(), config.profiler.clone());
    let profiles = profiler.subscribe();
    let profile = profiler.start();
    if !profile.graphics_context {
        anyhow::bail!("no graphics context available; the sandbox cannot start");
    }
    // Already consumed as the sandbox's initial profile.
    let _ = profiles.try_recv();

    let physics = RapierPhysicsWorld::with_ground(config.interaction.ground_height);
    let mut sandbox = Sandbox::new(physics, profile, config);
    let commands = sandbox.command_sender();

    if let Some(preset) = cli.preset {
        commands.load_preset(preset);
    }
    for i in 0..cli.spawn {
        commands.spawn(ShapeKind::ALL[i % ShapeKind::ALL.len()]);
    }

    let epoch = Instant::now();
    let dt = if cli.dt.is_finite() && cli.dt > 0.0 {
        cli.dt
    } else {
        log::warn!("Invalid --dt {}, falling back to 1/60 s", cli.dt);
        1.0 / 60.0
    };

    for frame in 0..cli.frames {
        let now = epoch + Duration::from_secs_f32(frame as f32 * dt);

        for step in cli.resize.iter().filter(|step| step.frame == frame) {
            log::info!("Window resized to {}x{}", step.size.width, step.size.height);
            probe.update_window(step.size, cli.scale_factor);
            profiler.notify_environment_changed(now);
        }
        profiler.tick(now);
        for profile in profiles.try_iter() {
            log::info!(
                "Profile changed: {}x{} gpu={:?}",
                profile.viewport.width,
                profile.viewport.height,
                profile.gpu_tier
            );
            sandbox.apply_profile(profile);
        }

        if cli.throw_at == Some(frame) {
            throw_from_centre(&mut sandbox, now.duration_since(epoch).as_secs_f64(), dt);
        }

        if let Some(signal) = sandbox.frame(dt) {
            log::debug!("Frame {}: {:?}", frame, signal);
        }

        if cli.status_every > 0 && frame % cli.status_every == 0 {
            let status = sandbox.status();
            log::info!(
                "Frame {}: {}/{} objects, gravity {}{}, resolution x{:.2}",
                frame,
                status.object_count,
                status.object_cap,
                if status.gravity.enabled { "on" } else { "off" },
                if status.gravity.inverted { " (inverted)" } else { "" },
                status.resolution_multiplier
            );
        }
    }

    profiler.stop();
    println!("{}", serde_json::to_string_pretty(&sandbox.status())?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_step_parses() {
        let step: ResizeStep = "800x600@30".parse().unwrap();
        assert_eq!(step.size, PhysicalSize::new(800, 600));
        assert_eq!(step.frame, 30);
    }

    #[test]
    fn test_resize_step_rejects_malformed() {
        assert!("800x600".parse::<ResizeStep>().is_err());
        assert!("800@30".parse::<ResizeStep>().is_err());
        assert!("axb@c".parse::<ResizeStep>().is_err());
    }

    #[test]
    fn test_cli_accepts_preset_names() {
        let cli = Cli::try_parse_from(["prism-runtime", "--preset", "jenga", "--frames", "10"])
            .unwrap();
        assert_eq!(cli.preset, Some(PresetName::Jenga));
        assert_eq!(cli.frames, 10);
        assert!(Cli::try_parse_from(["prism-runtime", "--preset", "pinball"]).is_err());
    }
}
