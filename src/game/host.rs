//! Host Runtime Boundary
//!
//! The simulation does not own the player. It reads the player position
//! from the host once per frame and asks the host to relocate the player;
//! relocation is fire-and-forget and is expected to show up in the next
//! frame's position read.

use serde::{Serialize, Deserialize};

use crate::core::vec3::Vec3;

/// What the game loop needs from the host runtime.
pub trait PlayerHost {
    /// Current player position, or `None` if no player exists this frame.
    fn player_position(&self) -> Option<Vec3>;

    /// Move the player to an absolute position, optionally aiming the camera.
    fn move_player_to(&mut self, position: Vec3, camera_target: Option<Vec3>);
}

/// One relocation request received by a [`SimulatedHost`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Relocation {
    /// Requested position
    pub position: Vec3,
    /// Requested camera target
    pub camera_target: Option<Vec3>,
}

/// Headless host used by the demo binary and tests.
///
/// Relocations are recorded and, unless the host is pinned, applied
/// immediately so the next read sees them.
#[derive(Clone, Debug, Default)]
pub struct SimulatedHost {
    position: Option<Vec3>,
    pinned: bool,
    relocations: Vec<Relocation>,
}

impl SimulatedHost {
    /// Host with no player spawned yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Host with a player at `position`.
    pub fn with_player(position: Vec3) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    /// Host whose player stays at `position` whatever the game loop asks.
    pub fn pinned(position: Vec3) -> Self {
        Self {
            position: Some(position),
            pinned: true,
            relocations: Vec::new(),
        }
    }

    /// Place (or remove) the player directly, as player input would.
    pub fn set_player_position(&mut self, position: Option<Vec3>) {
        self.position = position;
    }

    /// Every relocation requested so far, oldest first.
    pub fn relocations(&self) -> &[Relocation] {
        &self.relocations
    }

    /// Forget recorded relocations.
    pub fn clear_relocations(&mut self) {
        self.relocations.clear();
    }
}

impl PlayerHost for SimulatedHost {
    fn player_position(&self) -> Option<Vec3> {
        self.position
    }

    fn move_player_to(&mut self, position: Vec3, camera_target: Option<Vec3>) {
        self.relocations.push(Relocation {
            position,
            camera_target,
        });
        if !self.pinned {
            self.position = Some(position);
        }
    }
}
