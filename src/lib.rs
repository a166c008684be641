//! Synth Blast - A grid arena arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (actors, level generation, collisions)
//! - `scene`: Command boundary to the external 3D scene graph
//! - `session`: Level-to-level progression
//! - `settings`: Persisted player preferences
//! - `audio`: Web Audio sound effects (wasm only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod scene;
pub mod session;
pub mod settings;
pub mod sim;

pub use scene::{NodeId, NodeKind, ParticleFilter, SceneCommand, SceneGraph};
pub use session::Session;
pub use settings::Settings;

use glam::{Vec2, Vec3};

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Milliseconds of simulated time per normalized frame (60 fps)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Largest frame-rate multiplier accepted per frame (tab switches etc.)
    pub const MAX_FRAME_ADJUSTMENT: f32 = 4.0;

    /// Arena size for level 1; each level adds `ARENA_GROWTH_PER_LEVEL`
    pub const BASE_ARENA_SIZE: i32 = 20;
    pub const ARENA_GROWTH_PER_LEVEL: i32 = 4;

    /// Generation odds (1 in N), drawn in this order per cell
    pub const BUILDING_ODDS: u32 = 40;
    pub const ENEMY_ODDS: u32 = 40;
    pub const PAD_ODDS: u32 = 160;
    /// Interior buildings are 1..=MAX_BUILDING_HEIGHT tall
    pub const MAX_BUILDING_HEIGHT: u32 = 10;
    /// Fence heights
    pub const FENCE_HEIGHT: u32 = 1;
    pub const GATE_HEIGHT: u32 = 20;
    /// Trade value of fence buildings (they never take damage)
    pub const INDESTRUCTIBLE_HIT_POINTS: i32 = 1_000;

    /// Collision thresholds (per-axis distance, world units)
    pub const PROJECTILE_HIT_RANGE: f32 = 0.5;
    pub const BUILDING_BLOCK_RANGE: f32 = 0.6;
    pub const HERO_CONTACT_RANGE: f32 = 0.4;
    pub const SHIELD_CONTACT_RANGE: f32 = 1.5;
    pub const PAD_PICKUP_RANGE: f32 = 0.7;

    /// Enemy defaults
    pub const ENEMY_Z: f32 = 0.66;
    pub const ENEMY_HIT_POINTS: i32 = 1;
    pub const ENEMY_MIN_SPEED: f32 = 0.05;
    pub const ENEMY_SPEED_RANGE: f32 = 0.1;
    /// Heading at spawn: +y rotated by this angle
    pub const ENEMY_SPAWN_ROTATION: f32 = std::f32::consts::FRAC_PI_4;
    /// Steering dead zone (radians) and proportional gain
    pub const STEER_THRESHOLD: f32 = std::f32::consts::PI / 18.0;
    pub const STEER_GAIN: f32 = 0.1;
    /// Particles spawned when an enemy dies, and how long they live
    pub const DEATH_PARTICLES: usize = 100;
    pub const PARTICLE_WINDOW_MS: f64 = 200.0;
    pub const PARTICLE_GRAVITY: f32 = 0.01;

    /// Hero defaults
    pub const HERO_START: Vec2 = Vec2::new(10.0, 0.0);
    pub const HERO_Z: f32 = 0.5;
    pub const HERO_HIT_POINTS: i32 = 3;
    pub const HERO_SPEED: f32 = 0.12;
    pub const HERO_TURN_RATE: f32 = 0.06;
    /// Ticks of full-speed travel used to predict the hero's position
    pub const HERO_LOOKAHEAD: f32 = 10.0;
    pub const SHIELD_DURATION_TICKS: f32 = 300.0;

    /// Gun defaults
    pub const GUN_COOLDOWN_TICKS: f32 = 12.0;
    pub const PROJECTILE_SPEED: f32 = 0.4;
    pub const PROJECTILE_LIFETIME_TICKS: f32 = 90.0;
    pub const PROJECTILE_HIT_POINTS: i32 = 1;
    /// Projectiles leave the hero this far ahead of its center
    pub const MUZZLE_OFFSET: f32 = 0.5;

    /// Pad spin (radians per tick)
    pub const PAD_SPIN_RATE: f32 = 0.05;
}

/// Arena edge length for a level (20, 24, 28, ...)
#[inline]
pub fn arena_size_for_level(level_number: u32) -> i32 {
    let level = level_number.max(1) as i32;
    consts::BASE_ARENA_SIZE + consts::ARENA_GROWTH_PER_LEVEL * (level - 1)
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Angle at `b` formed by the rays `b -> a` and `b -> c`, in [0, π]
///
/// Degenerate rays (zero length) yield 0.
#[inline]
pub fn find_angle(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    let ba = a - b;
    let bc = c - b;
    let denom = ba.length() * bc.length();
    if denom <= f32::EPSILON {
        return 0.0;
    }
    (ba.dot(bc) / denom).clamp(-1.0, 1.0).acos()
}

/// Rotate a vector in the arena plane (counter-clockwise for positive angles)
#[inline]
pub fn rotate_planar(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

/// Drop the height component
#[inline]
pub fn planar(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.y)
}

/// Per-axis proximity test used by every collision pass
#[inline]
pub fn within_range(a: Vec2, b: Vec2, range: f32) -> bool {
    (a.x - b.x).abs() < range && (a.y - b.y).abs() < range
}
