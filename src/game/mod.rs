//! Game Logic Module
//!
//! Everything that runs per frame, plus the data it is built from.
//!
//! ## Module Structure
//!
//! - `layout`: Maze grid description and parsing
//! - `config`: Scene tunables and scene files
//! - `entity`: Entity handles
//! - `collision`: Wall volumes, pads and overlap tests
//! - `maze`: Maze construction and teleport queries
//! - `enemy`: Enemy spawning and movement
//! - `cooldown`: Respawn/teleport timers
//! - `host`: Boundary to the runtime that owns the player
//! - `tick`: Per-frame game loop
//! - `events`: Events reported by a frame
//! - `overlay`: Teleport message state
//! - `clock`: Frame delta measurement

pub mod layout;
pub mod config;
pub mod entity;
pub mod collision;
pub mod maze;
pub mod enemy;
pub mod cooldown;
pub mod host;
pub mod tick;
pub mod events;
pub mod overlay;
pub mod clock;

// Re-export key types
pub use layout::{GridCell, MazeLayout, StartCell, LayoutError};
pub use config::{SceneConfig, SceneBounds, SceneFile, ConfigError};
pub use entity::{EntityId, EntityKind, EntityRegistry};
pub use maze::Maze;
pub use enemy::{Enemy, EnemySimulation, EnemySpawn};
pub use cooldown::Cooldown;
pub use host::{PlayerHost, SimulatedHost};
pub use tick::{GameLoop, FrameResult, FrameInput};
pub use events::GameEvent;
pub use overlay::TeleportOverlay;
pub use clock::FrameClock;
