//! Maze Geometry
//!
//! Turns a layout grid into wall volumes, teleport pads and a start
//! position, and answers the teleport queries the game loop makes each
//! frame. Geometry is fixed after `build`.

use tracing::{debug, info};

use crate::core::rng::DeterministicRng;
use crate::core::vec2::Vec2;
use crate::core::vec3::Vec3;
use crate::game::collision::{within_radius, TeleportPoint, WallVolume};
use crate::game::config::SceneConfig;
use crate::game::entity::{EntityKind, EntityRegistry};
use crate::game::layout::{GridCell, MazeLayout};

/// Built maze geometry.
#[derive(Clone, Debug)]
pub struct Maze {
    walls: Vec<WallVolume>,
    teleports: Vec<TeleportPoint>,
    start: Vec3,
    rows: usize,
    cols: usize,
    collision_radius: f32,
    min_separation: f32,
}

/// World-space center of cell (row, col) on the ground plane.
#[inline]
pub fn cell_center(row: usize, col: usize, cell_size: f32) -> Vec2 {
    let half = cell_size / 2.0;
    Vec2::new(col as f32 * cell_size + half, row as f32 * cell_size + half)
}

impl Maze {
    /// Build geometry from a layout. Same layout and config always give
    /// the same geometry; entity handles come from `registry`.
    pub fn build(layout: &MazeLayout, config: &SceneConfig, registry: &mut EntityRegistry) -> Self {
        let cell_size = config.cell_size;
        let half = cell_size / 2.0;

        let mut walls = Vec::new();
        let mut teleports = Vec::new();

        for (row, cells) in layout.rows().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                let center = cell_center(row, col, cell_size);

                match cell {
                    GridCell::Wall => walls.push(WallVolume {
                        id: registry.spawn(EntityKind::Wall),
                        center: Vec3::new(center.x, config.wall_height / 2.0, center.z),
                        half_extents: Vec2::new(half, half),
                        height: config.wall_height,
                    }),
                    GridCell::Teleport => teleports.push(TeleportPoint {
                        id: registry.spawn(EntityKind::Teleport),
                        position: Vec3::new(center.x, config.teleport_height, center.z),
                    }),
                    GridCell::Empty => {}
                }
            }
        }

        let start_cell = layout.start();
        let start = cell_center(start_cell.z, start_cell.x, cell_size);
        let start = Vec3::new(start.x, 0.0, start.z);

        info!(
            walls = walls.len(),
            teleports = teleports.len(),
            start = %start,
            "Maze built ({}x{} cells)",
            layout.col_count(),
            layout.row_count(),
        );

        Self {
            walls,
            teleports,
            start,
            rows: layout.row_count(),
            cols: layout.col_count(),
            collision_radius: config.collision_radius,
            min_separation: config.teleport_min_separation,
        }
    }

    /// Wall volumes in layout order.
    pub fn walls(&self) -> &[WallVolume] {
        &self.walls
    }

    /// Teleport pads in layout order.
    pub fn teleports(&self) -> &[TeleportPoint] {
        &self.teleports
    }

    /// Player start position.
    pub fn start(&self) -> Vec3 {
        self.start
    }

    /// Grid size as (columns, rows).
    pub fn dimensions(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    /// If the player is on a teleport pad, pick where to send them.
    ///
    /// Pads are scanned in layout order and only the first pad in range is
    /// considered. Returns `None` when no pad is in range or when the pad
    /// in range has no valid destination.
    pub fn check_teleport_collision(&self, player: Vec3, rng: &mut DeterministicRng) -> Option<Vec3> {
        let pad = self
            .teleports
            .iter()
            .find(|pad| within_radius(player, pad.position, self.collision_radius))?;

        let destination = self.pick_destination(pad.position, rng);
        if destination.is_none() {
            debug!(pad = %pad.id, "Teleport pad has no destination");
        }
        destination
    }

    /// Uniformly pick a pad farther than the minimum separation from `exclude`.
    pub fn pick_destination(&self, exclude: Vec3, rng: &mut DeterministicRng) -> Option<Vec3> {
        let min_separation = self.min_separation;
        let eligible = |pad: &&TeleportPoint| pad.position.distance(exclude) > min_separation;

        let count = self.teleports.iter().filter(eligible).count();
        if count == 0 {
            return None;
        }

        let index = rng.next_int(count as u32) as usize;
        self.teleports
            .iter()
            .filter(eligible)
            .nth(index)
            .map(|pad| pad.position)
    }

    /// Drop all geometry and release its entity handles.
    pub fn release(&mut self, registry: &mut EntityRegistry) {
        for wall in self.walls.drain(..) {
            registry.despawn(wall.id);
        }
        for pad in self.teleports.drain(..) {
            registry.despawn(pad.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::layout::StartCell;

    fn build(text: &str) -> (Maze, EntityRegistry) {
        let layout = MazeLayout::parse_text(text).unwrap();
        let mut registry = EntityRegistry::new();
        let maze = Maze::build(&layout, &SceneConfig::default(), &mut registry);
        (maze, registry)
    }

    #[test]
    fn test_build_geometry() {
        let grid = vec![
            vec![GridCell::Wall, GridCell::Wall, GridCell::Wall],
            vec![GridCell::Wall, GridCell::Empty, GridCell::Wall],
            vec![GridCell::Wall, GridCell::Teleport, GridCell::Wall],
        ];
        let layout = MazeLayout::new(grid, StartCell { x: 1, z: 1 }).unwrap();
        let mut registry = EntityRegistry::new();
        let maze = Maze::build(&layout, &SceneConfig::default(), &mut registry);

        assert_eq!(maze.walls().len(), 7);
        assert_eq!(maze.teleports().len(), 1);
        assert_eq!(maze.dimensions(), (3, 3));

        let first = maze.walls()[0];
        assert_eq!(first.center, Vec3::new(2.5, 1.5, 2.5));
        assert_eq!(first.half_extents, Vec2::new(2.5, 2.5));
        assert_eq!(first.height, 3.0);

        assert_eq!(maze.teleports()[0].position, Vec3::new(7.5, 0.5, 12.5));
        assert_eq!(maze.start(), Vec3::new(7.5, 0.0, 7.5));

        assert_eq!(registry.count(EntityKind::Wall), 7);
        assert_eq!(registry.count(EntityKind::Teleport), 1);
    }

    #[test]
    fn test_build_is_deterministic() {
        let (a, _) = build(crate::game::layout::DEFAULT_LAYOUT);
        let (b, _) = build(crate::game::layout::DEFAULT_LAYOUT);
        assert_eq!(a.walls(), b.walls());
        assert_eq!(a.teleports(), b.teleports());
        assert_eq!(a.start(), b.start());
    }

    #[test]
    fn test_teleport_collision_picks_other_pad() {
        let (maze, _) = build("S...\nO..O\n");
        let mut rng = DeterministicRng::new(1);

        let pad_a = maze.teleports()[0].position;
        let pad_b = maze.teleports()[1].position;

        for _ in 0..20 {
            let player = Vec3::new(pad_a.x + 1.0, 0.0, pad_a.z);
            assert_eq!(maze.check_teleport_collision(player, &mut rng), Some(pad_b));
        }
    }

    #[test]
    fn test_teleport_collision_out_of_range() {
        let (maze, _) = build("S...\nO..O\n");
        let mut rng = DeterministicRng::new(1);

        let pad = maze.teleports()[0].position;
        let player = Vec3::new(pad.x + 2.6, pad.y, pad.z);
        assert!(maze.check_teleport_collision(player, &mut rng).is_none());
    }

    #[test]
    fn test_single_pad_has_no_destination() {
        let (maze, _) = build("S.\n.O\n");
        let mut rng = DeterministicRng::new(1);

        let pad = maze.teleports()[0].position;
        assert!(maze.check_teleport_collision(pad, &mut rng).is_none());
    }

    #[test]
    fn test_pick_destination_respects_separation() {
        let (maze, _) = build("S....\nO.O.O\n");
        let mut rng = DeterministicRng::new(99);

        let exclude = maze.teleports()[1].position;
        let mut seen = [false; 3];
        for _ in 0..200 {
            let dest = maze.pick_destination(exclude, &mut rng).unwrap();
            assert!(dest.distance(exclude) > 0.5);
            let idx = maze.teleports().iter().position(|p| p.position == dest).unwrap();
            seen[idx] = true;
        }
        // Both remaining pads get picked
        assert_eq!(seen, [true, false, true]);
    }

    #[test]
    fn test_release_frees_handles() {
        let (mut maze, mut registry) = build("S#\nO#\n");
        assert_eq!(registry.len(), 3);

        maze.release(&mut registry);
        assert!(registry.is_empty());
        assert!(maze.walls().is_empty());
        assert!(maze.teleports().is_empty());
    }
}
