//! Core primitives.
//!
//! Math types, the seeded RNG and state hashing. Nothing in here knows
//! about mazes or enemies.

pub mod vec2;
pub mod vec3;
pub mod rng;
pub mod hash;

// Re-export core types
pub use vec2::Vec2;
pub use vec3::Vec3;
pub use rng::DeterministicRng;
pub use hash::{StateHash, StateHasher, compute_state_hash};
