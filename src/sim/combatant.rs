//! Shared combat capability for the hero and enemies
//!
//! Both sides of a contact are driven through this trait so collision passes
//! never care which concrete actor they are holding.

use glam::{Vec2, Vec3};

use crate::planar;
use crate::scene::SceneGraph;

/// Per-tick context handed to anything that may change the scene
pub struct Frame<'a> {
    /// Simulated clock (ms since the level was built)
    pub now_ms: f64,
    /// Frame-rate multiplier for this tick
    pub dt: f32,
    pub scene: &'a mut SceneGraph,
}

/// Anything that occupies a position, can take damage and can be pushed back
pub trait Combatant {
    fn position(&self) -> Vec3;

    fn hit_points(&self) -> i32;

    /// Apply `damage`; returns the damage actually taken
    fn hit(&mut self, damage: i32, frame: &mut Frame<'_>) -> i32;

    /// Undo this tick's displacement
    fn un_move(&mut self);

    fn is_alive(&self) -> bool;

    /// Position in the arena plane
    fn planar_position(&self) -> Vec2 {
        planar(self.position())
    }
}

/// Trade hit points between two combatants
///
/// Each side takes the other's pre-contact hit points as damage.
/// Returns `(damage_taken_by_a, damage_taken_by_b)`.
pub fn trade_hits<A, B>(a: &mut A, b: &mut B, frame: &mut Frame<'_>) -> (i32, i32)
where
    A: Combatant + ?Sized,
    B: Combatant + ?Sized,
{
    let a_hp = a.hit_points();
    let b_hp = b.hit_points();
    let taken_by_a = a.hit(b_hp, frame);
    let taken_by_b = b.hit(a_hp, frame);
    (taken_by_a, taken_by_b)
}
