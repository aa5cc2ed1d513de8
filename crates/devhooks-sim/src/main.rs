//! Demo host for device hooks.
//!
//! Builds a small in-memory world and runs every hook caller once against a
//! demo add-on that subscribes to every event kind.
//!
//! # Run Sequence
//!
//! 1. Load configuration from `devhooks-config.yaml` (or the path given as
//!    the first argument)
//! 2. Initialize structured logging (tracing)
//! 3. File system activity: signal on the server, ship the notice as JSON,
//!    replay on the client
//! 4. Robot: dig a row of blocks, pacing the robot by each break's pause
//! 5. Rack: bake the model, then render a few frames of LED overlays
//! 6. Log a summary

mod error;
mod hooks;
mod world;

use std::path::{Path, PathBuf};
use std::time::Duration;

use devhooks_core::{
    ActivityRelay, BreakExecutor, BreakOutcome, HooksConfig, LogFormat, LoggingConfig, Pacer,
    RackRenderer, SLOT_KEY,
};
use devhooks_events::{FrameLight, Positioned, Rack};
use devhooks_types::{AccessNotice, BlockPos, DataBlob, TextureId};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::SimError;
use crate::hooks::{DemoHooks, LedBuffer, PoseStack};
use crate::world::DemoWorld;

/// Default configuration file, relative to the working directory.
const CONFIG_FILE: &str = "devhooks-config.yaml";

/// Frames rendered for the rack.
const FRAMES: u32 = 3;

/// Application entry point for the demo host.
///
/// # Errors
///
/// Returns an error if configuration is invalid or any hook caller fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config_path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(CONFIG_FILE), PathBuf::from);
    let (config, found) = load_config(&config_path)?;

    // 2. Initialize structured logging.
    init_logging(&config.logging);
    if !found {
        info!(path = %config_path.display(), "Config file not found, using defaults");
    }
    info!(
        feedback_enabled = config.activity.feedback_enabled,
        sound_volume = config.activity.sound_volume,
        harvest_ratio = config.robot.harvest_ratio,
        "devhooks-sim starting"
    );

    let mut world = DemoWorld::build();
    let mut hooks = DemoHooks::new(0.5);

    // 3. File system activity.
    run_activity(&config, &world, &mut hooks)?;

    // 4. Robot.
    hooks.protected.insert(BlockPos::new(4, 64, 0));
    let elapsed = run_robot(&config, &mut world, &mut hooks);

    // 5. Rack.
    let leds = run_rack(&world, &mut hooks)?;

    // 6. Summary.
    info!(
        announced = hooks.accesses.values().sum::<u32>(),
        experience = hooks.experience,
        robot_busy_secs = elapsed.as_secs_f64(),
        led_quads = leds,
        "devhooks-sim finished"
    );

    Ok(())
}

/// Load the configuration file, falling back to defaults when it does not
/// exist. The flag reports whether a file was read.
fn load_config(path: &Path) -> Result<(HooksConfig, bool), SimError> {
    if path.exists() {
        Ok((HooksConfig::from_file(path)?, true))
    } else {
        let mut config = HooksConfig::default();
        config.logging.apply_env_overrides();
        Ok((config, false))
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

/// Signal one access per drive plus one from the robot's floppy, and replay
/// every forwarded notice on the client side.
fn run_activity(
    config: &HooksConfig,
    world: &DemoWorld,
    hooks: &mut DemoHooks,
) -> Result<(), SimError> {
    let relay = ActivityRelay::new(config.activity.clone());

    // The second drive is muted by the add-on.
    if let Some(drive) = world.drives.get(1) {
        hooks.quiet_nodes.insert(drive.node);
    }

    let mut wire = Vec::new();
    for drive in &world.drives {
        let notice = relay.signal(
            hooks,
            "devhooks:hdd_access",
            Positioned::Container(drive),
            drive.node,
            DataBlob::new(),
        )?;
        if let Some(notice) = notice {
            wire.push(serde_json::to_string(&notice)?);
        }
    }

    let floppy = relay.signal(
        hooks,
        "devhooks:floppy_access",
        Positioned::Freeform {
            world: world.robot.world,
            position: world.robot.pos.center(),
        },
        world.robot_floppy,
        DataBlob::new().with(SLOT_KEY, 0),
    )?;
    if let Some(notice) = floppy {
        wire.push(serde_json::to_string(&notice)?);
    }

    info!(forwarded = wire.len(), "File system accesses signalled");

    for line in &wire {
        let notice: AccessNotice = serde_json::from_str(line)?;
        match relay.replay(hooks, &notice, |w, pos| world.host_at(w, pos)) {
            Some(feedback) => info!(
                sound = %feedback.sound,
                x = feedback.position.x,
                y = feedback.position.y,
                z = feedback.position.z,
                volume = feedback.volume,
                indicator = ?feedback.indicator,
                "Access feedback"
            ),
            None => info!(sound = %notice.sound, "Access feedback suppressed"),
        }
    }

    Ok(())
}

/// Dig the row of blocks in front of the robot. Returns the simulated time
/// the robot spent waiting out its breaks.
fn run_robot(config: &HooksConfig, world: &mut DemoWorld, hooks: &mut DemoHooks) -> Duration {
    let executor = BreakExecutor::from_config(&config.robot);
    let mut pacer = Pacer::new();
    let mut now = Duration::ZERO;

    for x in 1..=5 {
        let pos = BlockPos::new(x, 64, 0);
        if let Some(ready) = pacer.ready_at(world.robot.id) {
            now = now.max(ready);
        }

        let block = world.terrain.block_name(pos);
        let outcome = executor.break_block(hooks, &mut world.terrain, &world.robot, pos);
        match outcome {
            BreakOutcome::Broken { experience, pause } => info!(
                block,
                %pos,
                experience,
                pause_secs = pause.as_secs_f64(),
                "Robot broke block"
            ),
            BreakOutcome::Canceled => warn!(block, %pos, "Robot break canceled"),
            BreakOutcome::NothingToBreak => info!(%pos, "Robot swung at air"),
        }
        pacer.record(world.robot.id, now, &outcome);
    }

    pacer.ready_at(world.robot.id).unwrap_or(now)
}

/// Bake the rack and render a few frames. Returns the number of LED quads
/// drawn.
fn run_rack(world: &DemoWorld, hooks: &mut DemoHooks) -> Result<usize, SimError> {
    let mut renderer = RackRenderer::<TextureId>::new();
    let baked = renderer.bake(hooks, &world.rack)?;
    for slot in 0..world.rack.slot_count() {
        if let Some(appearance) = renderer.appearance(slot) {
            info!(slot, ?appearance, "Rack mount appearance");
        }
    }
    info!(mounts = baked, "Rack baked");

    let mut pose = PoseStack::default();
    let mut leds = LedBuffer::default();
    let light = FrameLight {
        light: 0x00F0_00F0,
        overlay: 0,
    };
    for _ in 0..FRAMES {
        renderer.render_frame(hooks, &world.rack, &mut pose, &mut leds, light)?;
    }
    for quad in &leds.quads {
        debug!(
            slot = quad.slot,
            v0 = quad.v0,
            v1 = quad.v1,
            light = quad.light,
            "LED quad"
        );
    }
    info!(pushes = pose.pushes, "Rack frames rendered");

    Ok(leds.quads.len())
}
