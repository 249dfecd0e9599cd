//! Teleport Maze demo
//!
//! Runs a scene headless with a scripted walker standing in for the
//! player, logs what happens, then replays the recorded frames and checks
//! that the final state hash matches.
//!
//! Usage: `teleport-maze [scene.json | layout.txt] [--frames N] [--realtime]`

use std::time::Duration;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use teleport_maze::{
    TARGET_FRAME_RATE, VERSION,
    core::{vec2::Vec2, vec3::Vec3},
    game::{
        clock::FrameClock,
        config::SceneFile,
        events::GameEventData,
        host::PlayerHost,
        tick::{replay, FrameInput, GameLoop},
    },
};

/// Walking speed of the scripted player (units/s)
const WALK_SPEED: f32 = 6.0;

/// Frames to run when `--frames` is not given (60 seconds)
const DEFAULT_FRAMES: u64 = 3600;

struct Options {
    scene: Option<String>,
    frames: u64,
    realtime: bool,
}

fn parse_args() -> Result<Options> {
    let mut options = Options {
        scene: None,
        frames: DEFAULT_FRAMES,
        realtime: false,
    };

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--realtime" => options.realtime = true,
            "--frames" => {
                let value = args.next().context("--frames needs a value")?;
                options.frames = value.parse().with_context(|| format!("bad frame count {value:?}"))?;
            }
            _ if arg.starts_with("--") => bail!("unknown flag {arg}"),
            _ => options.scene = Some(arg),
        }
    }

    Ok(options)
}

fn load_scene(path: Option<&str>) -> Result<SceneFile> {
    match path {
        None => Ok(SceneFile::default()),
        Some(path) if path.ends_with(".txt") => SceneFile::default()
            .with_layout_file(path)
            .with_context(|| format!("loading layout {path}")),
        Some(path) => SceneFile::load(path).with_context(|| format!("loading scene {path}")),
    }
}

/// Player stand-in that walks straight between waypoints, through walls.
struct ScriptedWalker {
    position: Option<Vec3>,
    waypoints: Vec<Vec3>,
    next: usize,
}

impl ScriptedWalker {
    fn new(waypoints: Vec<Vec3>) -> Self {
        Self {
            position: None,
            waypoints,
            next: 0,
        }
    }

    fn advance(&mut self, dt: f32) {
        let (Some(position), Some(&target)) = (self.position, self.waypoints.get(self.next)) else {
            return;
        };

        let to_target: Vec2 = (target - position).horizontal();
        let step = WALK_SPEED * dt;
        if to_target.length() <= step {
            self.position = Some(target.with_y(position.y));
            self.next = (self.next + 1) % self.waypoints.len();
        } else {
            self.position = Some(position.offset_horizontal(to_target.normalize().scale(step)));
        }
    }
}

impl PlayerHost for ScriptedWalker {
    fn player_position(&self) -> Option<Vec3> {
        self.position
    }

    fn move_player_to(&mut self, position: Vec3, _camera_target: Option<Vec3>) {
        self.position = Some(position);
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let options = parse_args()?;
    info!("Teleport Maze v{}", VERSION);

    let scene = load_scene(options.scene.as_deref())?;
    run_demo(&scene, &options)
}

fn run_demo(scene: &SceneFile, options: &Options) -> Result<()> {
    info!("=== Starting Demo Scene ===");
    info!("Seed: {}", scene.config.seed);

    let mut game = GameLoop::from_scene(scene)?;
    let (cols, rows) = game.maze().dimensions();
    info!(
        "Maze {}x{}: {} walls, {} teleports, {} enemies",
        cols,
        rows,
        game.maze().walls().len(),
        game.maze().teleports().len(),
        game.enemies().len()
    );

    // Walk to every pad in turn, then back to the start
    let mut waypoints: Vec<Vec3> = game.maze().teleports().iter().map(|pad| pad.position.with_y(0.0)).collect();
    waypoints.push(game.maze().start());
    let mut walker = ScriptedWalker::new(waypoints);

    game.start(&mut walker);

    let fixed_delta = 1.0 / TARGET_FRAME_RATE as f32;
    let mut clock = FrameClock::new(scene.config.max_frame_delta);
    let mut inputs = Vec::with_capacity(options.frames as usize);
    let mut teleports = 0usize;
    let mut respawns = 0usize;

    for _ in 0..options.frames {
        let delta = if options.realtime {
            std::thread::sleep(Duration::from_secs_f32(fixed_delta));
            clock.tick()
        } else {
            fixed_delta
        };

        walker.advance(delta);
        inputs.push(FrameInput {
            delta,
            player: walker.player_position(),
        });

        let result = game.frame(delta, &mut walker);
        for event in &result.events {
            match event.data {
                GameEventData::PlayerTeleported { from, to } => {
                    teleports += 1;
                    info!("Frame {}: teleported {} -> {}", event.frame, from, to);
                }
                GameEventData::PlayerRespawned { from, .. } => {
                    respawns += 1;
                    info!("Frame {}: caught at {}, back to start", event.frame, from);
                }
                GameEventData::EnemyBlocked { .. } => {}
            }
        }

        if result.frame % (TARGET_FRAME_RATE as u64 * 10) == 0 {
            info!("Frame {}: {} teleports, {} respawns so far", result.frame, teleports, respawns);
        }
    }

    info!("=== Scene Results ===");
    let hash = game.state_hash();
    info!("Final State Hash: {}", hex::encode(hash));
    info!("Teleports: {}, respawns: {}", teleports, respawns);

    // Verify determinism by replaying
    info!("=== Verifying Determinism ===");
    let (replayed, _) = replay(scene, &inputs)?;
    let replay_hash = replayed.state_hash();
    info!("Replay State Hash: {}", hex::encode(replay_hash));

    if hash == replay_hash {
        info!("DETERMINISM VERIFIED: Hashes match!");
    } else {
        warn!("DETERMINISM FAILURE: Hashes differ!");
        bail!("replay diverged");
    }

    game.teardown();
    Ok(())
}
