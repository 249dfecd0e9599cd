//! Enemy Simulation
//!
//! Enemies wander the maze in straight lines. Each tick an enemy tries to
//! step along its heading; if the step would put its box into a wall or
//! carry it out of the scene bounds, the step is dropped and a new heading
//! is drawn that points away from the blocked one. Enemies never collide
//! with each other, so update order does not matter.

use serde::{Serialize, Deserialize};
use tracing::{info, trace, warn};

use crate::core::rng::DeterministicRng;
use crate::core::vec2::Vec2;
use crate::core::vec3::Vec3;
use crate::game::collision::{first_wall_hit, within_radius, WallVolume};
use crate::game::config::{SceneBounds, SceneConfig};
use crate::game::entity::{EntityId, EntityKind, EntityRegistry};

/// Initial placement of one enemy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    /// Spawn position
    pub position: Vec3,
    /// Speed in units/second; the configured default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,
}

impl EnemySpawn {
    /// Spawn at a position with an explicit speed.
    pub fn new(position: Vec3, speed: f32) -> Self {
        Self {
            position,
            speed: Some(speed),
        }
    }
}

/// Enemy placements for the built-in 160x160 scene.
pub fn default_spawns() -> Vec<EnemySpawn> {
    const CORNERS: [(f32, f32, f32); 5] = [
        (10.0, 10.0, 2.5),
        (140.0, 140.0, 2.0),
        (80.0, 80.0, 10.0),
        (10.0, 140.0, 2.5),
        (140.0, 10.0, 2.0),
    ];

    CORNERS
        .iter()
        .cycle()
        .take(12)
        .map(|&(x, z, speed)| EnemySpawn::new(Vec3::new(x, 0.0, z), speed))
        .collect()
}

/// A single enemy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    /// Entity handle
    pub id: EntityId,
    /// Always `EntityKind::Enemy`
    pub kind: EntityKind,
    /// Current position
    pub position: Vec3,
    /// Unit heading on the horizontal plane
    pub direction: Vec2,
    /// Units per second
    pub speed: f32,
    /// Position before the most recent tick
    pub last_position: Vec3,
}

/// Movement rules shared by all enemies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyRules {
    /// Half-size of the enemy box against walls
    pub radius: f32,
    /// Player touch distance
    pub collision_radius: f32,
    /// Area enemies are confined to
    pub bounds: SceneBounds,
    /// Speed for spawns without one
    pub default_speed: f32,
    /// Per-tick chance of a random heading change
    pub random_turn_chance: f32,
    /// Maximum draws after a blocked move
    pub redirect_attempts: u32,
    /// Draws more aligned than this with the blocked heading are retried
    pub redirect_dot_threshold: f32,
}

impl From<&SceneConfig> for EnemyRules {
    fn from(config: &SceneConfig) -> Self {
        Self {
            radius: config.enemy_radius,
            collision_radius: config.collision_radius,
            bounds: config.bounds,
            default_speed: config.default_enemy_speed,
            random_turn_chance: config.random_turn_chance,
            redirect_attempts: config.redirect_attempts,
            redirect_dot_threshold: config.redirect_dot_threshold,
        }
    }
}

impl Default for EnemyRules {
    fn default() -> Self {
        Self::from(&SceneConfig::default())
    }
}

/// Owns the enemies and the wall geometry they move against.
#[derive(Clone, Debug)]
pub struct EnemySimulation {
    enemies: Vec<Enemy>,
    walls: Vec<WallVolume>,
    rules: EnemyRules,
}

impl EnemySimulation {
    /// Create an empty simulation.
    pub fn new(rules: EnemyRules) -> Self {
        Self {
            enemies: Vec::new(),
            walls: Vec::new(),
            rules,
        }
    }

    /// Replace the wall geometry enemies collide with.
    pub fn set_walls(&mut self, walls: &[WallVolume]) {
        self.walls = walls.to_vec();
    }

    /// Remove any existing enemies and spawn one per record, in order.
    pub fn create_enemies(
        &mut self,
        spawns: &[EnemySpawn],
        registry: &mut EntityRegistry,
        rng: &mut DeterministicRng,
    ) -> Vec<EntityId> {
        self.clear_enemies(registry);

        for spawn in spawns {
            let enemy = Enemy {
                id: registry.spawn(EntityKind::Enemy),
                kind: EntityKind::Enemy,
                position: spawn.position,
                direction: rng.random_direction(),
                speed: spawn.speed.unwrap_or(self.rules.default_speed),
                last_position: spawn.position,
            };
            self.enemies.push(enemy);
        }

        info!(count = self.enemies.len(), "Enemies spawned");
        for id in self.misplaced() {
            warn!(enemy = %id, "Enemy spawned inside a wall or out of bounds");
        }
        self.enemies.iter().map(|e| e.id).collect()
    }

    /// Enemies whose current position overlaps a wall or leaves the bounds.
    ///
    /// Only a bad spawn record can put an enemy there; such an enemy turns
    /// every tick without moving until a random step frees it.
    pub fn misplaced(&self) -> Vec<EntityId> {
        self.enemies
            .iter()
            .filter(|enemy| !can_occupy(&self.walls, &self.rules, enemy.position))
            .map(|enemy| enemy.id)
            .collect()
    }

    /// Remove all enemies and release their handles.
    pub fn clear_enemies(&mut self, registry: &mut EntityRegistry) {
        for enemy in self.enemies.drain(..) {
            registry.despawn(enemy.id);
        }
    }

    /// Advance every enemy by `dt` seconds.
    ///
    /// The move is split into steps no longer than the enemy radius, so a
    /// long tick cannot carry an enemy across a wall. The first blocked
    /// step ends the move for that tick.
    ///
    /// Returns the enemies whose move was blocked this tick.
    pub fn tick(&mut self, dt: f32, rng: &mut DeterministicRng) -> Vec<EntityId> {
        let mut blocked = Vec::new();

        for enemy in &mut self.enemies {
            enemy.last_position = enemy.position;

            let distance = enemy.speed * dt;
            let steps = sub_step_count(distance, self.rules.radius);
            let step = enemy.direction.scale(distance / steps as f32);

            for _ in 0..steps {
                let candidate = enemy.position.offset_horizontal(step);
                if can_occupy(&self.walls, &self.rules, candidate) {
                    enemy.position = candidate;
                    continue;
                }

                enemy.direction = redirect(
                    enemy.direction,
                    rng,
                    self.rules.redirect_attempts,
                    self.rules.redirect_dot_threshold,
                );
                trace!(enemy = %enemy.id, direction = %enemy.direction, "Enemy blocked, turning");
                blocked.push(enemy.id);
                break;
            }

            if rng.chance(self.rules.random_turn_chance) {
                enemy.direction = rng.random_direction();
            }
        }

        blocked
    }

    /// True if any enemy is within the collision radius of the player.
    pub fn check_player_collision(&self, player: Vec3) -> bool {
        self.enemies
            .iter()
            .any(|enemy| within_radius(player, enemy.position, self.rules.collision_radius))
    }

    /// Enemies in spawn order.
    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    /// Mutable access to enemies, for scripted placement.
    pub fn enemies_mut(&mut self) -> &mut [Enemy] {
        &mut self.enemies
    }

    /// Movement rules.
    pub fn rules(&self) -> &EnemyRules {
        &self.rules
    }

    /// Number of enemies.
    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    /// True if there are no enemies.
    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }
}

/// Whether an enemy centered at `position` is clear of walls and in bounds.
pub fn can_occupy(walls: &[WallVolume], rules: &EnemyRules, position: Vec3) -> bool {
    rules.bounds.contains(position) && first_wall_hit(walls, position, rules.radius).is_none()
}

/// Number of equal steps needed so none is longer than `max_step`.
fn sub_step_count(distance: f32, max_step: f32) -> u32 {
    if distance.is_nan() || distance <= 0.0 || max_step.is_nan() || max_step <= 0.0 {
        return 1;
    }
    ((distance / max_step).ceil() as u32).max(1)
}

/// Draw a heading that diverges from `blocked`.
///
/// Retries while the draw is within `threshold` (dot product) of the
/// blocked heading, at most `attempts` draws in total. The last draw is
/// kept even if it never diverged enough.
fn redirect(blocked: Vec2, rng: &mut DeterministicRng, attempts: u32, threshold: f32) -> Vec2 {
    let mut direction = rng.random_direction();
    let mut drawn = 1;

    while drawn < attempts && blocked.dot(direction) > threshold {
        direction = rng.random_direction();
        drawn += 1;
    }

    direction
}
