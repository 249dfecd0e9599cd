//! # Teleport Maze
//!
//! Frame-driven simulation for a walk-through maze: wall blocks, teleport
//! pads that fling the player to another pad, and wandering enemies that
//! send the player back to the start on contact.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       TELEPORT MAZE                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Primitives                                │
//! │  ├── vec2.rs     - Horizontal-plane vector                   │
//! │  ├── vec3.rs     - World position                            │
//! │  ├── rng.rs      - Seeded Xorshift128+ PRNG                  │
//! │  └── hash.rs     - State hashing for replay checks           │
//! │                                                              │
//! │  game/           - Scene logic                               │
//! │  ├── layout.rs   - Grid layout parsing                       │
//! │  ├── config.rs   - Tunables and scene files                  │
//! │  ├── maze.rs     - Walls, pads, teleport destinations        │
//! │  ├── enemy.rs    - Enemy movement and player contact         │
//! │  ├── host.rs     - Player host boundary                      │
//! │  └── tick.rs     - Per-frame game loop                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//!
//! All randomness comes from one seeded Xorshift128+ owned by the game
//! loop. Given the same scene, seed and sequence of frame deltas and
//! player positions, a run produces the same state hash.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;

// Re-export commonly used types
pub use core::vec2::Vec2;
pub use core::vec3::Vec3;
pub use core::rng::DeterministicRng;
pub use game::config::{SceneConfig, SceneFile};
pub use game::host::{PlayerHost, SimulatedHost};
pub use game::tick::{GameLoop, FrameResult};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Frame rate the demo and benchmarks assume (Hz)
pub const TARGET_FRAME_RATE: u32 = 60;
