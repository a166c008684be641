//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame-rate normalized steps (`dt` = 1.0 at 60 fps)
//! - Seeded RNG only
//! - Stable iteration order (generation order)
//! - No rendering or platform dependencies; visuals go through `SceneGraph`

pub mod combatant;
pub mod enemy;
pub mod entities;
pub mod events;
pub mod hero;
pub mod level;

pub use combatant::{Combatant, Frame};
pub use enemy::Enemy;
pub use entities::{Building, Pad, Particle, Projectile};
pub use events::{GameEvent, PostFx, SoundEffect};
pub use hero::{Gun, Hero, TickInput};
pub use level::{Level, LevelOutcome, fence_cells, interior_cells};
