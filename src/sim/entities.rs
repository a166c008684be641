//! Passive arena entities: buildings, projectiles, pads and particles

use glam::{Vec2, Vec3};

use crate::consts::*;
use crate::scene::{NodeId, NodeKind, SceneGraph};

/// How far a destroyed building sinks per tick
const COLLAPSE_RATE: f32 = 0.25;

/// A box obstacle on the grid
#[derive(Debug, Clone)]
pub struct Building {
    pub id: u32,
    pub node: NodeId,
    pub pos: Vec2,
    pub height: u32,
    /// Fence and gate boxes ignore damage
    pub destructible: bool,
    hit_points: i32,
    /// Depth sunk into the floor after destruction
    sink: f32,
}

impl Building {
    pub fn new(id: u32, pos: Vec2, height: u32, destructible: bool, scene: &mut SceneGraph) -> Self {
        let node = scene.add(
            NodeKind::Building {
                height,
                destructible,
            },
            pos.extend(height as f32 / 2.0),
        );
        let hit_points = if destructible {
            height as i32
        } else {
            INDESTRUCTIBLE_HIT_POINTS
        };
        Self {
            id,
            node,
            pos,
            height,
            destructible,
            hit_points,
            sink: 0.0,
        }
    }

    pub fn hit_points(&self) -> i32 {
        self.hit_points
    }

    pub fn hit(&mut self, damage: i32) {
        if self.destructible {
            self.hit_points -= damage;
        }
    }

    /// Blocks projectiles and movement
    pub fn is_active(&self) -> bool {
        self.hit_points > 0
    }

    /// Destroyed buildings sink out of sight before they are reclaimed
    pub fn update(&mut self, dt: f32) {
        if !self.is_active() {
            self.sink = (self.sink + COLLAPSE_RATE * dt).min(self.height as f32);
        }
    }

    /// Fully sunk and safe to remove
    pub fn is_collapsed(&self) -> bool {
        !self.is_active() && self.sink >= self.height as f32
    }

    /// Center of the box, lowered while collapsing
    pub fn center(&self) -> Vec3 {
        self.pos.extend(self.height as f32 / 2.0 - self.sink)
    }
}

/// A bullet fired by the hero's gun
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: u32,
    pub node: NodeId,
    pub pos: Vec3,
    pub vel: Vec2,
    hit_points: i32,
    /// Remaining lifetime in normalized ticks
    ttl: f32,
}

impl Projectile {
    pub fn new(id: u32, pos: Vec3, vel: Vec2, scene: &mut SceneGraph) -> Self {
        let node = scene.add(NodeKind::Projectile, pos);
        Self {
            id,
            node,
            pos,
            vel,
            hit_points: PROJECTILE_HIT_POINTS,
            ttl: PROJECTILE_LIFETIME_TICKS,
        }
    }

    pub fn hit_points(&self) -> i32 {
        self.hit_points
    }

    pub fn hit(&mut self, damage: i32) {
        self.hit_points -= damage;
    }

    pub fn is_active(&self) -> bool {
        self.hit_points > 0 && self.ttl > 0.0
    }

    pub fn update(&mut self, dt: f32) {
        if !self.is_active() {
            return;
        }
        self.pos += self.vel.extend(0.0) * dt;
        self.ttl -= dt;
    }

    pub fn planar(&self) -> Vec2 {
        self.pos.truncate()
    }
}

/// A power-up pad; driving over it grants a shield
#[derive(Debug, Clone)]
pub struct Pad {
    pub id: u32,
    pub node: NodeId,
    pub pos: Vec2,
    pub used: bool,
    /// Visual spin angle
    pub spin: f32,
}

impl Pad {
    pub fn new(id: u32, pos: Vec2, scene: &mut SceneGraph) -> Self {
        let node = scene.add(NodeKind::Pad, pos.extend(0.0));
        Self {
            id,
            node,
            pos,
            used: false,
            spin: 0.0,
        }
    }

    pub fn hit(&mut self) {
        self.used = true;
    }

    pub fn update(&mut self, dt: f32) {
        if !self.used {
            self.spin = crate::normalize_angle(self.spin + PAD_SPIN_RATE * dt);
        }
    }
}

/// One explosion fragment
#[derive(Debug, Clone)]
pub struct Particle {
    pub node: NodeId,
    pub pos: Vec3,
    pub vel: Vec3,
}

impl Particle {
    pub fn new(node: NodeId, pos: Vec3, vel: Vec3) -> Self {
        Self { node, pos, vel }
    }

    /// Ballistic step with a hard floor
    pub fn update(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.vel.z -= PARTICLE_GRAVITY * dt;
        if self.pos.z < 0.0 {
            self.pos.z = 0.0;
            self.vel.z = 0.0;
        }
    }
}
