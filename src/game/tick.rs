//! Game Loop
//!
//! The per-frame coordinator. One `GameLoop` owns everything that changes
//! during a scene: enemies, both cooldowns, the RNG and the last observed
//! player position. The host calls [`GameLoop::frame`] once per rendered
//! frame with the measured frame delta.

use serde::{Serialize, Deserialize};
use tracing::{debug, info};

use crate::core::hash::{compute_state_hash, StateHash};
use crate::core::rng::DeterministicRng;
use crate::core::vec3::Vec3;
use crate::game::config::{ConfigError, SceneConfig, SceneFile};
use crate::game::cooldown::Cooldown;
use crate::game::enemy::{EnemyRules, EnemySimulation, EnemySpawn};
use crate::game::entity::{EntityId, EntityRegistry};
use crate::game::events::{GameEvent, GameEventData};
use crate::game::host::{PlayerHost, SimulatedHost};
use crate::game::layout::MazeLayout;
use crate::game::maze::Maze;
use crate::game::overlay::TeleportOverlay;

/// Result of a frame.
#[derive(Debug, Default)]
pub struct FrameResult {
    /// Frame number (first frame is 1)
    pub frame: u64,
    /// Delta actually simulated
    pub delta: f32,
    /// Whether the host reported a player this frame
    pub player_present: bool,
    /// Events generated this frame
    pub events: Vec<GameEvent>,
}

impl FrameResult {
    /// True if the player was sent back to the start this frame.
    pub fn respawned(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e.data, GameEventData::PlayerRespawned { .. }))
    }

    /// Teleport destination, if the player was teleported this frame.
    pub fn teleported_to(&self) -> Option<Vec3> {
        self.events.iter().find_map(|e| match e.data {
            GameEventData::PlayerTeleported { to, .. } => Some(to),
            _ => None,
        })
    }

    /// Enemies whose move was blocked this frame.
    pub fn blocked_enemies(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.events.iter().filter_map(|e| match e.data {
            GameEventData::EnemyBlocked { enemy } => Some(enemy),
            _ => None,
        })
    }
}

/// One recorded frame of host input, for replays.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    /// Measured frame delta (seconds)
    pub delta: f32,
    /// Player position reported by the host, `None` if absent
    pub player: Option<Vec3>,
}

/// Scene state and the per-frame update.
pub struct GameLoop {
    config: SceneConfig,
    registry: EntityRegistry,
    maze: Maze,
    enemies: EnemySimulation,
    teleport_cooldown: Cooldown,
    respawn_cooldown: Cooldown,
    last_player_position: Vec3,
    overlay: TeleportOverlay,
    rng: DeterministicRng,
    frame: u64,
}

impl GameLoop {
    /// Build the maze and spawn enemies.
    pub fn new(
        config: SceneConfig,
        layout: &MazeLayout,
        spawns: &[EnemySpawn],
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut registry = EntityRegistry::new();
        let mut rng = DeterministicRng::new(config.seed);

        let maze = Maze::build(layout, &config, &mut registry);

        let mut enemies = EnemySimulation::new(EnemyRules::from(&config));
        enemies.set_walls(maze.walls());
        enemies.create_enemies(spawns, &mut registry, &mut rng);

        Ok(Self {
            teleport_cooldown: Cooldown::new(config.teleport_cooldown),
            respawn_cooldown: Cooldown::new(config.respawn_cooldown),
            last_player_position: maze.start(),
            overlay: TeleportOverlay::default(),
            frame: 0,
            config,
            registry,
            maze,
            enemies,
            rng,
        })
    }

    /// Build from a loaded scene file.
    pub fn from_scene(scene: &SceneFile) -> Result<Self, ConfigError> {
        Self::new(scene.config.clone(), &scene.layout, &scene.spawns)
    }

    /// Put the player at the start position, camera aimed at the scene.
    pub fn start<H: PlayerHost + ?Sized>(&mut self, host: &mut H) {
        let start = self.maze.start();
        host.move_player_to(start, Some(self.config.camera_target));
        self.last_player_position = start;
        info!(start = %start, enemies = self.enemies.len(), "Scene started");
    }

    /// Run one frame.
    ///
    /// Order: cooldowns, enemies, player read, then respawn or teleport.
    /// Respawn wins when both would fire, so the player is relocated at
    /// most once per frame. Without a player the frame stops after the
    /// enemy update.
    ///
    /// Non-finite or negative deltas count as zero; longer deltas are cut
    /// to `max_frame_delta`.
    pub fn frame<H: PlayerHost + ?Sized>(&mut self, delta: f32, host: &mut H) -> FrameResult {
        let dt = if delta.is_finite() {
            delta.max(0.0).min(self.config.max_frame_delta)
        } else {
            0.0
        };
        self.frame += 1;

        let mut result = FrameResult {
            frame: self.frame,
            delta: dt,
            ..FrameResult::default()
        };

        // 1. Cooldowns
        self.teleport_cooldown.tick(dt);
        self.respawn_cooldown.tick(dt);

        // 2. Enemies
        for enemy in self.enemies.tick(dt, &mut self.rng) {
            result.events.push(GameEvent::enemy_blocked(self.frame, enemy));
        }

        // 3. Player snapshot
        let Some(player) = host.player_position() else {
            result.events.sort_by(GameEvent::order_cmp);
            return result;
        };
        result.player_present = true;
        self.last_player_position = player;

        // 4. Enemy contact sends the player back to the start
        if self.respawn_cooldown.is_ready() && self.enemies.check_player_collision(player) {
            let start = self.maze.start();
            host.move_player_to(start, Some(self.config.camera_target));
            self.respawn_cooldown.trigger();

            debug!(frame = self.frame, from = %player, "Player caught, respawning");
            result.events.push(GameEvent::player_respawned(self.frame, player, start));
        // 5. Otherwise a teleport pad may move them
        } else if self.teleport_cooldown.is_ready() {
            if let Some(destination) = self.maze.check_teleport_collision(player, &mut self.rng) {
                host.move_player_to(destination, None);
                self.teleport_cooldown.trigger();

                debug!(frame = self.frame, from = %player, to = %destination, "Player teleported");
                result.events.push(GameEvent::player_teleported(self.frame, player, destination));
            }
        }

        result.events.sort_by(GameEvent::order_cmp);
        result
    }

    /// Replace all enemies with a new spawn list.
    pub fn respawn_enemies(&mut self, spawns: &[EnemySpawn]) -> Vec<EntityId> {
        self.enemies.create_enemies(spawns, &mut self.registry, &mut self.rng)
    }

    /// Remove every entity of the scene.
    pub fn teardown(&mut self) {
        self.enemies.clear_enemies(&mut self.registry);
        self.maze.release(&mut self.registry);
        self.enemies.set_walls(&[]);
        info!(frames = self.frame, "Scene torn down");
    }

    /// Hash of everything the frame update mutates.
    pub fn state_hash(&self) -> StateHash {
        compute_state_hash(self.frame, self.config.seed, |hasher| {
            hasher.update_u32(self.enemies.len() as u32);
            for enemy in self.enemies.enemies() {
                hasher.update_u32(enemy.id.0);
                hasher.update_vec3(enemy.position);
                hasher.update_vec2(enemy.direction);
                hasher.update_f32(enemy.speed);
            }
            hasher.update_f32(self.teleport_cooldown.remaining());
            hasher.update_f32(self.respawn_cooldown.remaining());
            hasher.update_vec3(self.last_player_position);
            for word in self.rng.state() {
                hasher.update_u64(word);
            }
        })
    }

    /// Scene config.
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Maze geometry.
    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    /// Enemy simulation.
    pub fn enemies(&self) -> &EnemySimulation {
        &self.enemies
    }

    /// Mutable enemy simulation, for scripted setups.
    pub fn enemies_mut(&mut self) -> &mut EnemySimulation {
        &mut self.enemies
    }

    /// Entity handles of the scene.
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Teleport cooldown.
    pub fn teleport_cooldown(&self) -> &Cooldown {
        &self.teleport_cooldown
    }

    /// Respawn cooldown.
    pub fn respawn_cooldown(&self) -> &Cooldown {
        &self.respawn_cooldown
    }

    /// Player position seen on the most recent frame with a player.
    pub fn last_player_position(&self) -> Vec3 {
        self.last_player_position
    }

    /// Overlay state for the renderer.
    pub fn overlay(&self) -> &TeleportOverlay {
        &self.overlay
    }

    /// Mutable overlay state.
    pub fn overlay_mut(&mut self) -> &mut TeleportOverlay {
        &mut self.overlay
    }

    /// Frames run so far.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }
}

/// Run a scene against recorded host input.
///
/// The player is placed from each input before the frame runs, the way
/// player movement would place it. Returns the final loop and all events.
pub fn replay(
    scene: &SceneFile,
    inputs: &[FrameInput],
) -> Result<(GameLoop, Vec<GameEvent>), ConfigError> {
    let mut game = GameLoop::from_scene(scene)?;
    let mut host = SimulatedHost::new();
    game.start(&mut host);

    let mut events = Vec::new();
    for input in inputs {
        host.set_player_position(input.player);
        let result = game.frame(input.delta, &mut host);
        events.extend(result.events);
    }

    Ok((game, events))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entity::EntityKind;

    const DT: f32 = 1.0 / 60.0;

    fn corridor_scene() -> (SceneConfig, MazeLayout) {
        // Two pads far apart on an open floor
        let layout = MazeLayout::parse_text("S.........\n.O......O.\n..........\n").unwrap();
        (SceneConfig::default(), layout)
    }

    #[test]
    fn test_new_builds_scene() {
        let scene = SceneFile::default();
        let game = GameLoop::from_scene(&scene).unwrap();

        assert_eq!(game.enemies().len(), 12);
        assert_eq!(game.registry().count(EntityKind::Enemy), 12);
        assert_eq!(game.registry().count(EntityKind::Teleport), 6);
        assert_eq!(game.frame_count(), 0);
        assert!(game.teleport_cooldown().is_ready());
        assert!(game.respawn_cooldown().is_ready());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let (_, layout) = corridor_scene();
        let config = SceneConfig { collision_radius: -1.0, ..Default::default() };
        assert!(GameLoop::new(config, &layout, &[]).is_err());
    }

    #[test]
    fn test_start_moves_player() {
        let (config, layout) = corridor_scene();
        let mut game = GameLoop::new(config, &layout, &[]).unwrap();
        let mut host = SimulatedHost::new();

        game.start(&mut host);

        let start = game.maze().start();
        assert_eq!(host.player_position(), Some(start));
        assert_eq!(host.relocations()[0].camera_target, Some(Vec3::new(80.0, 2.0, 80.0)));
        assert_eq!(game.last_player_position(), start);
    }

    #[test]
    fn test_missing_player_is_noop() {
        let (config, layout) = corridor_scene();
        let mut game = GameLoop::new(config, &layout, &[]).unwrap();
        let mut host = SimulatedHost::new();

        let result = game.frame(DT, &mut host);

        assert_eq!(result.frame, 1);
        assert!(!result.player_present);
        assert!(result.events.is_empty());
        assert!(host.relocations().is_empty());
    }

    #[test]
    fn test_teleport_sets_cooldown() {
        let (config, layout) = corridor_scene();
        let mut game = GameLoop::new(config, &layout, &[]).unwrap();
        let pad_a = game.maze().teleports()[0].position;
        let pad_b = game.maze().teleports()[1].position;
        let mut host = SimulatedHost::with_player(pad_a);

        let result = game.frame(DT, &mut host);

        assert_eq!(result.teleported_to(), Some(pad_b));
        assert_eq!(host.player_position(), Some(pad_b));
        assert_eq!(host.relocations()[0].camera_target, None);
        assert_eq!(game.teleport_cooldown().remaining(), 3.0);

        // Landing on the other pad does not bounce straight back
        let result = game.frame(DT, &mut host);
        assert!(result.teleported_to().is_none());
    }

    #[test]
    fn test_enemy_contact_respawns() {
        let (config, layout) = corridor_scene();
        let catch_spot = Vec3::new(30.0, 0.0, 12.5);
        let spawns = [EnemySpawn::new(catch_spot, 0.0)];
        let mut game = GameLoop::new(config, &layout, &spawns).unwrap();
        let mut host = SimulatedHost::with_player(Vec3::new(31.0, 0.0, 12.5));

        let result = game.frame(DT, &mut host);

        assert!(result.respawned());
        assert_eq!(host.player_position(), Some(game.maze().start()));
        assert_eq!(game.respawn_cooldown().remaining(), 2.0);
    }

    #[test]
    fn test_respawn_cooldown_blocks_repeat() {
        let (config, layout) = corridor_scene();
        let spot = Vec3::new(30.0, 0.0, 12.5);
        let mut game = GameLoop::new(config, &layout, &[EnemySpawn::new(spot, 0.0)]).unwrap();
        let mut host = SimulatedHost::pinned(spot);

        let respawns = (0..119)
            .map(|_| game.frame(DT, &mut host))
            .filter(|r| r.respawned())
            .count();
        assert_eq!(respawns, 1);

        // Cooldown runs out about two seconds after the first catch
        let respawns = (0..5)
            .map(|_| game.frame(DT, &mut host))
            .filter(|r| r.respawned())
            .count();
        assert_eq!(respawns, 1);
    }

    #[test]
    fn test_bad_delta_is_zero() {
        let (config, layout) = corridor_scene();
        let mut game = GameLoop::new(config, &layout, &[]).unwrap();
        let mut host = SimulatedHost::new();

        assert_eq!(game.frame(f32::NAN, &mut host).delta, 0.0);
        assert_eq!(game.frame(-1.0, &mut host).delta, 0.0);
        assert_eq!(game.frame(f32::INFINITY, &mut host).delta, 0.0);
    }

    #[test]
    fn test_long_delta_is_capped() {
        let (config, layout) = corridor_scene();
        let mut game = GameLoop::new(config, &layout, &[]).unwrap();
        let mut host = SimulatedHost::new();

        assert_eq!(game.frame(1.0, &mut host).delta, 0.25);
        assert_eq!(game.frame(0.1, &mut host).delta, 0.1);
    }

    #[test]
    fn test_long_frame_does_not_cross_wall() {
        // Wall cell spans x in [10, 15]
        let layout = MazeLayout::parse_text("S.#..\n").unwrap();
        let config = SceneConfig { random_turn_chance: 0.0, ..Default::default() };
        let spawns = [EnemySpawn::new(Vec3::new(7.5, 0.0, 2.5), 10.0)];
        let mut game = GameLoop::new(config, &layout, &spawns).unwrap();
        game.enemies_mut().enemies_mut()[0].direction = crate::core::vec2::Vec2::UNIT_X;
        let mut host = SimulatedHost::new();

        let result = game.frame(1.0, &mut host);

        let enemy = &game.enemies().enemies()[0];
        assert_eq!(result.blocked_enemies().collect::<Vec<_>>(), vec![enemy.id]);
        assert!(enemy.position.x + game.config().enemy_radius <= 10.0);
        assert!(game.enemies().misplaced().is_empty());
    }

    #[test]
    fn test_overlay_not_driven_by_loop() {
        let (config, layout) = corridor_scene();
        let mut game = GameLoop::new(config, &layout, &[]).unwrap();
        let pad = game.maze().teleports()[0].position;
        let mut host = SimulatedHost::with_player(pad);

        let result = game.frame(DT, &mut host);

        assert!(result.teleported_to().is_some());
        assert!(!game.overlay().show_teleport_message);
    }

    #[test]
    fn test_teardown_releases_everything() {
        let mut game = GameLoop::from_scene(&SceneFile::default()).unwrap();
        game.teardown();

        assert!(game.registry().is_empty());
        assert!(game.enemies().is_empty());
        assert!(game.maze().walls().is_empty());
    }

    #[test]
    fn test_replay_determinism() {
        let scene = SceneFile::default();
        let inputs: Vec<FrameInput> = (0..600)
            .map(|i| FrameInput {
                delta: if i % 3 == 0 { 1.0 / 30.0 } else { DT },
                player: Some(Vec3::new(22.5 + (i as f32) * 0.1, 0.0, 77.5)),
            })
            .collect();

        let (a, events_a) = replay(&scene, &inputs).unwrap();
        let (b, events_b) = replay(&scene, &inputs).unwrap();

        assert_eq!(a.state_hash(), b.state_hash());
        assert_eq!(events_a, events_b);

        let mut other = scene.clone();
        other.config.seed = 43;
        let (c, _) = replay(&other, &inputs).unwrap();
        assert_ne!(a.state_hash(), c.state_hash());
    }
}
