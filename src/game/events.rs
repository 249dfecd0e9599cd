//! Game Events
//!
//! Events generated during a frame, returned to the caller for logging,
//! overlays or replay checks.

use serde::{Serialize, Deserialize};

use crate::core::vec3::Vec3;
use crate::game::entity::EntityId;

/// Priority for event processing order.
///
/// Lower value = processed first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum EventPriority {
    /// Player caught by an enemy
    PlayerRespawn = 0,
    /// Player stepped on a teleport pad
    PlayerTeleport = 1,
    /// Enemy movement blocked
    EnemyBlocked = 2,
}

/// Game event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEventData {
    /// Player touched an enemy and was sent back to the start
    PlayerRespawned {
        /// Where the player was caught
        from: Vec3,
        /// Start position
        to: Vec3,
    },

    /// Player was teleported between pads
    PlayerTeleported {
        /// Where the player stood
        from: Vec3,
        /// Destination pad
        to: Vec3,
    },

    /// Enemy hit a wall or the scene edge and turned
    EnemyBlocked {
        /// The enemy
        enemy: EntityId,
    },
}

/// A game event with timing and priority.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameEvent {
    /// Frame when event occurred
    pub frame: u64,

    /// Processing priority
    pub priority: EventPriority,

    /// Entity involved (for tie-breaking)
    pub entity: Option<EntityId>,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(frame: u64, priority: EventPriority, data: GameEventData) -> Self {
        let entity = match &data {
            GameEventData::EnemyBlocked { enemy } => Some(*enemy),
            _ => None,
        };

        Self {
            frame,
            priority,
            entity,
            data,
        }
    }

    /// Create player respawned event.
    pub fn player_respawned(frame: u64, from: Vec3, to: Vec3) -> Self {
        Self::new(
            frame,
            EventPriority::PlayerRespawn,
            GameEventData::PlayerRespawned { from, to },
        )
    }

    /// Create player teleported event.
    pub fn player_teleported(frame: u64, from: Vec3, to: Vec3) -> Self {
        Self::new(
            frame,
            EventPriority::PlayerTeleport,
            GameEventData::PlayerTeleported { from, to },
        )
    }

    /// Create enemy blocked event.
    pub fn enemy_blocked(frame: u64, enemy: EntityId) -> Self {
        Self::new(frame, EventPriority::EnemyBlocked, GameEventData::EnemyBlocked { enemy })
    }
}

impl PartialEq for GameEvent {
    fn eq(&self, other: &Self) -> bool {
        self.frame == other.frame
            && self.priority == other.priority
            && self.entity == other.entity
            && self.data == other.data
    }
}

impl GameEvent {
    /// Processing order: frame, then priority, then entity.
    ///
    /// Events that differ only in their data compare as `Equal` here while
    /// `==` tells them apart, so this is a sort key rather than an `Ord`.
    pub fn order_cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Sort by: frame, then priority, then entity
        self.frame
            .cmp(&other.frame)
            .then(self.priority.cmp(&other.priority))
            .then(self.entity.cmp(&other.entity))
    }
}
