//! Enemy actor: pursuit steering and the hit/death/particle lifecycle
//!
//! An enemy chases the hero's predicted position with a proportional
//! controller. It turns by a tenth of its heading error each tick, but only
//! once the error exceeds ten degrees, which gives the lazy sweeping arcs.
//!
//! Death is two-phase: the cone hides and a burst of particles flies for
//! `PARTICLE_WINDOW_MS`, after which the particles are cleared and the level
//! reclaims the enemy.

use glam::{Vec2, Vec3};

use super::combatant::{Combatant, Frame};
use super::entities::Particle;
use crate::consts::*;
use crate::scene::{NodeId, NodeKind, SceneGraph};
use crate::{find_angle, planar, rotate_planar};

/// Golden angle in radians, spreads burst particles evenly around the yaw
const GOLDEN_ANGLE: f32 = 2.399_963;

#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub node: NodeId,
    pos: Vec3,
    /// Unit heading in the arena plane
    direction: Vec2,
    max_speed: f32,
    /// Displacement applied by the last `move_by`
    move_inc: Vec2,
    hit_points: i32,
    alive: bool,
    death_time_ms: Option<f64>,
    particles: Vec<Particle>,
}

impl Enemy {
    pub fn new(id: u32, pos: Vec2, max_speed: f32, scene: &mut SceneGraph) -> Self {
        let pos = pos.extend(ENEMY_Z);
        let direction = rotate_planar(Vec2::Y, ENEMY_SPAWN_ROTATION);
        let node = scene.add(NodeKind::Enemy, pos);
        Self {
            id,
            node,
            pos,
            direction,
            max_speed,
            move_inc: direction * max_speed,
            hit_points: ENEMY_HIT_POINTS,
            alive: true,
            death_time_ms: None,
            particles: Vec::new(),
        }
    }

    pub fn x(&self) -> f32 {
        self.pos.x
    }

    pub fn y(&self) -> f32 {
        self.pos.y
    }

    pub fn z(&self) -> f32 {
        self.pos.z
    }

    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Heading as a yaw angle for the scene graph
    pub fn yaw(&self) -> f32 {
        self.direction.y.atan2(self.direction.x)
    }

    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    pub fn move_inc(&self) -> Vec2 {
        self.move_inc
    }

    pub fn death_time_ms(&self) -> Option<f64> {
        self.death_time_ms
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Advance one tick toward `target` (alive) or animate the burst (dead)
    pub fn update(&mut self, target: Vec3, frame: &mut Frame<'_>) {
        if self.alive {
            self.steer(planar(target), frame.dt);
            self.move_by();
            return;
        }

        let Some(death_time) = self.death_time_ms else {
            return;
        };
        if frame.now_ms - death_time < PARTICLE_WINDOW_MS {
            for particle in &mut self.particles {
                particle.update(frame.dt);
                frame.scene.set_transform(particle.node, particle.pos, 0.0);
            }
        } else if !self.particles.is_empty() {
            for particle in self.particles.drain(..) {
                frame.scene.remove(particle.node);
            }
        }
    }

    /// Turn toward `target` and refresh the per-tick displacement
    ///
    /// Returns the signed rotation applied this tick (0 inside the dead zone).
    pub fn steer(&mut self, target: Vec2, dt: f32) -> f32 {
        let here = planar(self.pos);
        let error = find_angle(target, here, here + self.direction);

        let mut turn = 0.0;
        if error > STEER_THRESHOLD {
            let side = self.direction.perp_dot(target - here);
            turn = error * STEER_GAIN * if side >= 0.0 { 1.0 } else { -1.0 };
            self.direction = rotate_planar(self.direction, turn).normalize();
        }
        self.move_inc = self.direction * self.max_speed * dt;
        turn
    }

    /// Apply the current displacement
    pub fn move_by(&mut self) {
        self.pos += self.move_inc.extend(0.0);
    }

    /// Dead, burst finished and ready to be dropped from the level
    pub fn is_reclaimable(&self, now_ms: f64) -> bool {
        match self.death_time_ms {
            Some(t) => !self.alive && self.particles.is_empty() && now_ms - t >= PARTICLE_WINDOW_MS,
            None => false,
        }
    }

    fn die(&mut self, frame: &mut Frame<'_>) {
        self.alive = false;
        self.death_time_ms = Some(frame.now_ms);
        frame.scene.set_visible(self.node, false);

        self.particles.reserve(DEATH_PARTICLES);
        for i in 0..DEATH_PARTICLES {
            let node = frame.scene.add(NodeKind::Particle, self.pos);
            let vel = burst_velocity(self.id, i);
            self.particles.push(Particle::new(node, self.pos, vel));
        }
        log::debug!("Enemy {} destroyed at ({:.2}, {:.2})", self.id, self.pos.x, self.pos.y);
    }
}

impl Combatant for Enemy {
    fn position(&self) -> Vec3 {
        self.pos
    }

    fn hit_points(&self) -> i32 {
        self.hit_points
    }

    /// Dead enemies and non-positive damage leave the enemy untouched
    fn hit(&mut self, damage: i32, frame: &mut Frame<'_>) -> i32 {
        if !self.alive || damage <= 0 {
            return 0;
        }
        self.hit_points -= damage;
        if self.hit_points <= 0 {
            self.die(frame);
        }
        damage
    }

    fn un_move(&mut self) {
        self.pos -= self.move_inc.extend(0.0);
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}

/// Deterministic outward velocity for burst particle `index`
fn burst_velocity(seed: u32, index: usize) -> Vec3 {
    let hash = seed
        .wrapping_mul(2654435761)
        .wrapping_add((index as u32).wrapping_mul(40503));
    let yaw = index as f32 * GOLDEN_ANGLE;
    let lift = (hash % 1000) as f32 / 1000.0;
    let speed = 0.05 + ((hash >> 10) % 1000) as f32 / 1000.0 * 0.1;
    Vec3::new(yaw.cos() * speed, yaw.sin() * speed, 0.05 + lift * 0.15)
}
