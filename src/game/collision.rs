//! Collision Detection
//!
//! Box overlap on the horizontal plane for enemies against walls, and
//! radius checks for the player against enemies and teleport pads.
//! Heights are ignored for boxes; radius checks use full 3D distance.

use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;
use crate::core::vec3::Vec3;
use crate::game::entity::EntityId;

/// Axis-aligned wall block built from a wall cell.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WallVolume {
    /// Entity handle
    pub id: EntityId,
    /// Box center
    pub center: Vec3,
    /// Half-size on the horizontal plane
    pub half_extents: Vec2,
    /// Full height of the block
    pub height: f32,
}

impl WallVolume {
    /// Minimum corner on the horizontal plane.
    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center.horizontal() - self.half_extents
    }

    /// Maximum corner on the horizontal plane.
    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center.horizontal() + self.half_extents
    }

    /// Whether a square of half-size `half_size` centered at `center`
    /// overlaps this wall. Touching edges do not count.
    #[inline]
    pub fn overlaps_square(&self, center: Vec2, half_size: f32) -> bool {
        let extent = Vec2::new(half_size, half_size);
        boxes_overlap(center - extent, center + extent, self.min(), self.max())
    }
}

/// Teleport pad position built from a teleport cell.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeleportPoint {
    /// Entity handle
    pub id: EntityId,
    /// World position of the pad
    pub position: Vec3,
}

/// Strict overlap of two boxes on the horizontal plane.
#[inline]
pub fn boxes_overlap(a_min: Vec2, a_max: Vec2, b_min: Vec2, b_max: Vec2) -> bool {
    a_max.x > b_min.x && a_min.x < b_max.x && a_max.z > b_min.z && a_min.z < b_max.z
}

/// True if `a` and `b` are strictly closer than `radius`.
#[inline]
pub fn within_radius(a: Vec3, b: Vec3, radius: f32) -> bool {
    a.distance(b) < radius
}

/// First wall overlapping an enemy box at `position`, in wall order.
pub fn first_wall_hit<'a>(
    walls: &'a [WallVolume],
    position: Vec3,
    enemy_radius: f32,
) -> Option<&'a WallVolume> {
    let center = position.horizontal();
    walls.iter().find(|wall| wall.overlaps_square(center, enemy_radius))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall_at(x: f32, z: f32) -> WallVolume {
        WallVolume {
            id: EntityId(0),
            center: Vec3::new(x, 1.5, z),
            half_extents: Vec2::new(2.5, 2.5),
            height: 3.0,
        }
    }

    #[test]
    fn test_boxes_overlap() {
        let a_min = Vec2::new(0.0, 0.0);
        let a_max = Vec2::new(1.0, 1.0);

        assert!(boxes_overlap(a_min, a_max, Vec2::new(0.5, 0.5), Vec2::new(2.0, 2.0)));
        // Touching edges
        assert!(!boxes_overlap(a_min, a_max, Vec2::new(1.0, 0.0), Vec2::new(2.0, 1.0)));
        // Separated on Z only
        assert!(!boxes_overlap(a_min, a_max, Vec2::new(0.0, 3.0), Vec2::new(1.0, 4.0)));
    }

    #[test]
    fn test_enemy_box_against_wall() {
        let wall = wall_at(2.5, 2.5);

        // Enemy box edge at 5.7 clears the wall edge at 5.0
        assert!(!wall.overlaps_square(Vec2::new(6.5, 2.5), 0.8));
        // Enemy box edge at 4.9 is inside
        assert!(wall.overlaps_square(Vec2::new(5.7, 2.5), 0.8));
    }

    #[test]
    fn test_first_wall_hit_ignores_height() {
        let walls = [wall_at(2.5, 2.5), wall_at(12.5, 2.5)];

        let hit = first_wall_hit(&walls, Vec3::new(10.5, 100.0, 2.5), 0.8);
        assert_eq!(hit.map(|w| w.center.x), Some(12.5));

        assert!(first_wall_hit(&walls, Vec3::new(7.5, 0.0, 2.5), 0.8).is_none());
    }

    #[test]
    fn test_within_radius_is_strict() {
        let origin = Vec3::ZERO;
        assert!(within_radius(origin, Vec3::new(2.499, 0.0, 0.0), 2.5));
        assert!(!within_radius(origin, Vec3::new(2.5, 0.0, 0.0), 2.5));
        assert!(!within_radius(origin, Vec3::new(2.501, 0.0, 0.0), 2.5));
    }
}
