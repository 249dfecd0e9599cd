//! Entity Handles
//!
//! Every wall, teleport pad and enemy in the scene gets a handle. The kind
//! of an entity is stored next to its handle instead of being implied by
//! which tag components it carries.

use std::collections::BTreeMap;
use std::fmt;
use serde::{Serialize, Deserialize};

/// Opaque entity handle.
///
/// Implements Ord for deterministic BTreeMap ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What an entity is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum EntityKind {
    /// Wall block from the maze layout
    Wall = 0,
    /// Teleport pad from the maze layout
    Teleport = 1,
    /// Wandering enemy avatar
    Enemy = 2,
}

/// Allocates handles and remembers the kind of every live entity.
#[derive(Clone, Debug, Default)]
pub struct EntityRegistry {
    next_id: u32,
    entities: BTreeMap<EntityId, EntityKind>,
}

impl EntityRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new handle of the given kind. Handles are never reused.
    pub fn spawn(&mut self, kind: EntityKind) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.insert(id, kind);
        id
    }

    /// Remove an entity. Returns its kind if it was alive.
    pub fn despawn(&mut self, id: EntityId) -> Option<EntityKind> {
        self.entities.remove(&id)
    }

    /// Kind of a live entity.
    pub fn kind_of(&self, id: EntityId) -> Option<EntityKind> {
        self.entities.get(&id).copied()
    }

    /// Whether the handle refers to a live entity.
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Number of live entities of a kind.
    pub fn count(&self, kind: EntityKind) -> usize {
        self.entities.values().filter(|k| **k == kind).count()
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True if no entities are alive.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_and_despawn() {
        let mut registry = EntityRegistry::new();
        let wall = registry.spawn(EntityKind::Wall);
        let enemy = registry.spawn(EntityKind::Enemy);

        assert_ne!(wall, enemy);
        assert_eq!(registry.kind_of(enemy), Some(EntityKind::Enemy));
        assert_eq!(registry.count(EntityKind::Wall), 1);

        assert_eq!(registry.despawn(enemy), Some(EntityKind::Enemy));
        assert_eq!(registry.despawn(enemy), None);
        assert!(!registry.contains(enemy));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_handles_not_reused() {
        let mut registry = EntityRegistry::new();
        let first = registry.spawn(EntityKind::Enemy);
        registry.despawn(first);
        let second = registry.spawn(EntityKind::Enemy);
        assert!(second > first);
    }
}
