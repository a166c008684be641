//! The player's ship and its gun

use glam::{Vec2, Vec3};

use super::combatant::{Combatant, Frame};
use crate::consts::*;
use crate::normalize_angle;
use crate::scene::{NodeId, NodeKind, SceneGraph};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Turn rate, -1 (clockwise) to 1 (counter-clockwise)
    pub turn: f32,
    /// Throttle, -1 (reverse) to 1 (forward)
    pub thrust: f32,
    /// Fire held
    pub fire: bool,
}

/// The player ship
#[derive(Debug, Clone)]
pub struct Hero {
    pub node: NodeId,
    pos: Vec3,
    /// Heading angle in the arena plane (radians)
    heading: f32,
    /// Displacement applied by the last update
    move_inc: Vec2,
    hit_points: i32,
    /// Remaining shield time in normalized ticks
    shield_ticks: f32,
}

impl Hero {
    pub fn new(pos: Vec2, scene: &mut SceneGraph) -> Self {
        let pos = pos.extend(HERO_Z);
        let node = scene.add(NodeKind::Hero, pos);
        Self {
            node,
            pos,
            heading: 0.0,
            move_inc: Vec2::ZERO,
            hit_points: HERO_HIT_POINTS,
            shield_ticks: 0.0,
        }
    }

    pub fn x(&self) -> f32 {
        self.pos.x
    }

    pub fn y(&self) -> f32 {
        self.pos.y
    }

    pub fn heading(&self) -> f32 {
        self.heading
    }

    /// Unit vector along the heading
    pub fn direction(&self) -> Vec2 {
        Vec2::from_angle(self.heading)
    }

    /// Where the hero will be after `HERO_LOOKAHEAD` ticks at full speed
    pub fn future_position(&self) -> Vec3 {
        self.pos + (self.direction() * HERO_SPEED * HERO_LOOKAHEAD).extend(0.0)
    }

    pub fn has_shield(&self) -> bool {
        self.shield_ticks > 0.0
    }

    pub fn grant_shield(&mut self) {
        self.shield_ticks = SHIELD_DURATION_TICKS;
    }

    /// Teleport (level start, tests)
    pub fn place_at(&mut self, pos: Vec2) {
        self.pos = pos.extend(HERO_Z);
        self.move_inc = Vec2::ZERO;
    }

    pub fn update(&mut self, input: &TickInput, dt: f32) {
        self.shield_ticks = (self.shield_ticks - dt).max(0.0);
        if !self.is_alive() {
            self.move_inc = Vec2::ZERO;
            return;
        }

        let turn = input.turn.clamp(-1.0, 1.0);
        let thrust = input.thrust.clamp(-1.0, 1.0);
        self.heading = normalize_angle(self.heading + turn * HERO_TURN_RATE * dt);
        self.move_inc = self.direction() * thrust * HERO_SPEED * dt;
        self.pos += self.move_inc.extend(0.0);
    }
}

impl Combatant for Hero {
    fn position(&self) -> Vec3 {
        self.pos
    }

    fn hit_points(&self) -> i32 {
        self.hit_points
    }

    /// Shielded or dead heroes take no damage
    fn hit(&mut self, damage: i32, _frame: &mut Frame<'_>) -> i32 {
        if !self.is_alive() || self.has_shield() || damage <= 0 {
            return 0;
        }
        self.hit_points -= damage;
        damage
    }

    fn un_move(&mut self) {
        self.pos -= self.move_inc.extend(0.0);
    }

    fn is_alive(&self) -> bool {
        self.hit_points > 0
    }
}

/// Projectile spawner bound to the hero
#[derive(Debug, Clone, Default)]
pub struct Gun {
    /// Ticks until the next shot is allowed
    cooldown: f32,
}

impl Gun {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tick the cooldown and, if `fire` is held and ready, return the muzzle
    /// position and velocity of a new projectile
    pub fn update(&mut self, hero: &Hero, fire: bool, dt: f32) -> Option<(Vec3, Vec2)> {
        self.cooldown = (self.cooldown - dt).max(0.0);
        if !fire || self.cooldown > 0.0 || !hero.is_alive() {
            return None;
        }
        self.cooldown = GUN_COOLDOWN_TICKS;
        let dir = hero.direction();
        let muzzle = hero.position() + (dir * MUZZLE_OFFSET).extend(0.0);
        Some((muzzle, dir * PROJECTILE_SPEED))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(scene: &mut SceneGraph) -> Frame<'_> {
        Frame {
            now_ms: 0.0,
            dt: 1.0,
            scene,
        }
    }

    #[test]
    fn test_thrust_moves_along_heading() {
        let mut scene = SceneGraph::new();
        let mut hero = Hero::new(Vec2::ZERO, &mut scene);
        let input = TickInput {
            thrust: 1.0,
            ..Default::default()
        };
        hero.update(&input, 1.0);
        assert!((hero.x() - HERO_SPEED).abs() < 1e-6);
        assert!(hero.y().abs() < 1e-6);

        hero.un_move();
        assert!(hero.x().abs() < 1e-6);
    }

    #[test]
    fn test_future_position_leads_heading() {
        let mut scene = SceneGraph::new();
        let hero = Hero::new(Vec2::new(1.0, 2.0), &mut scene);
        let future = hero.future_position();
        assert!((future.x - (1.0 + HERO_SPEED * HERO_LOOKAHEAD)).abs() < 1e-5);
        assert!((future.y - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_shield_blocks_damage_and_expires() {
        let mut scene = SceneGraph::new();
        let mut hero = Hero::new(Vec2::ZERO, &mut scene);
        hero.grant_shield();
        assert_eq!(hero.hit(1, &mut frame(&mut scene)), 0);
        assert_eq!(hero.hit_points(), HERO_HIT_POINTS);

        hero.update(&TickInput::default(), SHIELD_DURATION_TICKS);
        assert!(!hero.has_shield());
        assert_eq!(hero.hit(1, &mut frame(&mut scene)), 1);
        assert_eq!(hero.hit_points(), HERO_HIT_POINTS - 1);
    }

    #[test]
    fn test_dead_hero_is_frozen() {
        let mut scene = SceneGraph::new();
        let mut hero = Hero::new(Vec2::ZERO, &mut scene);
        hero.hit(HERO_HIT_POINTS, &mut frame(&mut scene));
        assert!(!hero.is_alive());

        let input = TickInput {
            thrust: 1.0,
            ..Default::default()
        };
        hero.update(&input, 1.0);
        assert_eq!(hero.x(), 0.0);
        assert_eq!(hero.hit(1, &mut frame(&mut scene)), 0);
    }

    #[test]
    fn test_gun_respects_cooldown() {
        let mut scene = SceneGraph::new();
        let hero = Hero::new(Vec2::ZERO, &mut scene);
        let mut gun = Gun::new();

        let (muzzle, vel) = gun.update(&hero, true, 1.0).expect("first shot");
        assert!((muzzle.x - MUZZLE_OFFSET).abs() < 1e-6);
        assert!((vel.x - PROJECTILE_SPEED).abs() < 1e-6);

        let mut shots = 1;
        for _ in 0..(GUN_COOLDOWN_TICKS as usize) {
            if gun.update(&hero, true, 1.0).is_some() {
                shots += 1;
            }
        }
        assert_eq!(shots, 2);
        assert!(gun.update(&hero, false, 100.0).is_none());
    }
}
