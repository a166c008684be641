//! Level: arena generation and the per-frame simulation step
//!
//! Frame order is fixed and every pass mutates immediately, so several
//! contacts in one tick are all applied:
//! 1. update projectiles, buildings, enemies, pads, hero, gun
//! 2. projectile vs building, projectile vs enemy
//! 3. building containment (hero and enemies)
//! 4. enemy vs hero
//! 5. hero vs pad
//! 6. reclaim dead entities
//! 7. publish transforms to the scene graph

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::combatant::{Combatant, Frame, trade_hits};
use super::enemy::Enemy;
use super::entities::{Building, Pad, Projectile};
use super::events::{GameEvent, PostFx, SoundEffect};
use super::hero::{Gun, Hero, TickInput};
use crate::consts::*;
use crate::scene::{NodeKind, SceneCommand, SceneGraph};
use crate::{arena_size_for_level, within_range};

/// Where the level stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelOutcome {
    InProgress,
    /// Every pad collected
    Won,
    /// Hero destroyed
    Died,
}

/// Interior grid cells sampled during generation, skipping the center lane
///
/// Yields exactly `size * size - size` cells.
pub fn interior_cells(size: i32) -> impl Iterator<Item = (i32, i32)> {
    let half = size / 2;
    (0..size).flat_map(move |gx| (0..size).filter(move |&gy| gy != half).map(move |gy| (gx, gy)))
}

/// Perimeter fence one cell outside the grid, as `(gx, gy, height)`
///
/// Leaves a gap at `(-1, half)` flanked by two gate cells of `GATE_HEIGHT`.
pub fn fence_cells(size: i32) -> impl Iterator<Item = (i32, i32, u32)> {
    let half = size / 2;
    (-1..=size).flat_map(move |gx| {
        (-1..=size).filter_map(move |gy| {
            if gx == -1 && gy == half {
                return None;
            }
            if gx != -1 && gy != -1 && gx != size && gy != size {
                return None;
            }
            let height = if gx != size && (gy == half - 1 || gy == half + 1) {
                GATE_HEIGHT
            } else {
                FENCE_HEIGHT
            };
            Some((gx, gy, height))
        })
    })
}

/// One playable arena and everything in it
#[derive(Debug)]
pub struct Level {
    level_number: u32,
    arena_size: i32,
    rng: Pcg32,
    /// Simulated clock (ms)
    clock_ms: f64,
    ticks: u64,
    hero: Hero,
    gun: Gun,
    projectiles: Vec<Projectile>,
    buildings: Vec<Building>,
    enemies: Vec<Enemy>,
    pads: Vec<Pad>,
    pads_remaining: u32,
    post_fx: PostFx,
    events: Vec<GameEvent>,
    outcome: LevelOutcome,
    scene: SceneGraph,
    next_id: u32,
}

impl Level {
    /// Build and populate the arena for `level_number` (1-based)
    pub fn new(level_number: u32, seed: u64) -> Self {
        let level_number = if level_number == 0 {
            log::warn!("Level numbers start at 1, building level 1");
            1
        } else {
            level_number
        };

        let mut scene = SceneGraph::new();
        let hero = Hero::new(HERO_START, &mut scene);

        let mut level = Self {
            level_number,
            arena_size: arena_size_for_level(level_number),
            rng: Pcg32::seed_from_u64(seed),
            clock_ms: 0.0,
            ticks: 0,
            hero,
            gun: Gun::new(),
            projectiles: Vec::new(),
            buildings: Vec::new(),
            enemies: Vec::new(),
            pads: Vec::new(),
            pads_remaining: 0,
            post_fx: PostFx::default(),
            events: Vec::new(),
            outcome: LevelOutcome::InProgress,
            scene,
            next_id: 1,
        };

        level.populate_grid();
        level.build_fence();
        level.add_set_dressing();

        log::info!(
            "Level {} (seed {}): arena {}x{}, {} buildings, {} enemies, {} pads",
            level.level_number,
            seed,
            level.arena_size,
            level.arena_size,
            level.buildings.len(),
            level.enemies.len(),
            level.pads_remaining
        );
        level
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Sequential 1-in-N draws per interior cell: building, else enemy, else pad
    fn populate_grid(&mut self) {
        let half = self.arena_size / 2;
        let mut empty_cells = Vec::new();

        for (gx, gy) in interior_cells(self.arena_size) {
            let pos = Vec2::new(gx as f32, (gy - half) as f32);
            if self.rng.random_range(0..BUILDING_ODDS) == 0 {
                let height = self.rng.random_range(0..MAX_BUILDING_HEIGHT) + 1;
                let id = self.next_entity_id();
                self.buildings
                    .push(Building::new(id, pos, height, true, &mut self.scene));
            } else if self.rng.random_range(0..ENEMY_ODDS) == 0 {
                let max_speed = ENEMY_MIN_SPEED + self.rng.random::<f32>() * ENEMY_SPEED_RANGE;
                let id = self.next_entity_id();
                self.enemies
                    .push(Enemy::new(id, pos, max_speed, &mut self.scene));
            } else if self.rng.random_range(0..PAD_ODDS) == 0 {
                self.spawn_pad(pos);
            } else {
                empty_cells.push(pos);
            }
        }

        // A level with nothing to collect could never be won
        if self.pads.is_empty() && !empty_cells.is_empty() {
            let pick = self.rng.random_range(0..empty_cells.len());
            self.spawn_pad(empty_cells[pick]);
            log::debug!("No pads drawn, placed one at {:?}", empty_cells[pick]);
        }
    }

    fn spawn_pad(&mut self, pos: Vec2) {
        let id = self.next_entity_id();
        self.pads.push(Pad::new(id, pos, &mut self.scene));
        self.pads_remaining += 1;
    }

    fn build_fence(&mut self) {
        let half = self.arena_size / 2;
        for (gx, gy, height) in fence_cells(self.arena_size) {
            let pos = Vec2::new(gx as f32, (gy - half) as f32);
            let id = self.next_entity_id();
            self.buildings
                .push(Building::new(id, pos, height, false, &mut self.scene));
        }
    }

    /// Floor, light and the title billboard over the entrance
    fn add_set_dressing(&mut self) {
        self.scene.add(NodeKind::Floor, Vec3::ZERO);
        self.scene
            .add(NodeKind::Light, Vec3::new(-2.0, 5.0, 3.0).normalize());
        self.scene.add(NodeKind::Title, Vec3::new(-10.0, 0.0, 20.0));
    }

    /// Advance one frame; `dt` is the frame-rate multiplier (1.0 at 60 fps)
    pub fn render(&mut self, input: &TickInput, dt: f32) {
        let dt = dt.clamp(0.0, MAX_FRAME_ADJUSTMENT);
        self.clock_ms += dt as f64 * FRAME_MS;
        self.ticks += 1;

        let mut scene = std::mem::take(&mut self.scene);
        let mut frame = Frame {
            now_ms: self.clock_ms,
            dt,
            scene: &mut scene,
        };

        self.update_entities(input, &mut frame);
        self.resolve_projectile_hits(&mut frame);
        self.resolve_building_containment();
        self.resolve_hero_contacts(&mut frame);
        self.reclaim(&mut frame);
        self.publish(&mut frame);
        self.scene = scene;

        self.update_outcome();
    }

    fn update_entities(&mut self, input: &TickInput, frame: &mut Frame<'_>) {
        let dt = frame.dt;
        for projectile in &mut self.projectiles {
            projectile.update(dt);
        }
        for building in &mut self.buildings {
            building.update(dt);
        }
        let target = self.hero.future_position();
        for enemy in &mut self.enemies {
            enemy.update(target, frame);
        }
        for pad in &mut self.pads {
            pad.update(dt);
        }
        self.hero.update(input, dt);

        if let Some((muzzle, vel)) = self.gun.update(&self.hero, input.fire, dt) {
            let id = self.next_entity_id();
            self.projectiles
                .push(Projectile::new(id, muzzle, vel, frame.scene));
            self.events.push(GameEvent::Sound(SoundEffect::Pew));
        }
    }

    /// Projectiles trade hit points with buildings and enemies they overlap
    fn resolve_projectile_hits(&mut self, frame: &mut Frame<'_>) {
        for projectile in &mut self.projectiles {
            if !projectile.is_active() {
                continue;
            }
            let at = projectile.planar();

            for building in &mut self.buildings {
                if !projectile.is_active() {
                    break;
                }
                if building.is_active() && within_range(building.pos, at, PROJECTILE_HIT_RANGE) {
                    let building_hp = building.hit_points();
                    building.hit(projectile.hit_points());
                    projectile.hit(building_hp);
                    self.events.push(GameEvent::Sound(SoundEffect::Impact));
                }
            }

            for enemy in &mut self.enemies {
                if !projectile.is_active() {
                    break;
                }
                if enemy.is_alive() && within_range(enemy.planar_position(), at, PROJECTILE_HIT_RANGE)
                {
                    let enemy_hp = enemy.hit_points();
                    enemy.hit(projectile.hit_points(), frame);
                    projectile.hit(enemy_hp);
                    let sound = if enemy.is_alive() {
                        SoundEffect::Impact
                    } else {
                        SoundEffect::Explosion
                    };
                    self.events.push(GameEvent::Sound(sound));
                }
            }
        }
    }

    /// Nothing may end a tick inside an active building
    fn resolve_building_containment(&mut self) {
        for building in &self.buildings {
            if !building.is_active() {
                continue;
            }
            if within_range(building.pos, self.hero.planar_position(), BUILDING_BLOCK_RANGE) {
                self.hero.un_move();
            }
            for enemy in &mut self.enemies {
                if enemy.is_alive()
                    && within_range(enemy.planar_position(), building.pos, BUILDING_BLOCK_RANGE)
                {
                    enemy.un_move();
                }
            }
        }
    }

    /// Enemy rams and pad pickups (only while the hero is alive)
    fn resolve_hero_contacts(&mut self, frame: &mut Frame<'_>) {
        if !self.hero.is_alive() {
            return;
        }

        let contact_range = if self.hero.has_shield() {
            SHIELD_CONTACT_RANGE
        } else {
            HERO_CONTACT_RANGE
        };
        for enemy in &mut self.enemies {
            if !enemy.is_alive()
                || !within_range(
                    enemy.planar_position(),
                    self.hero.planar_position(),
                    contact_range,
                )
            {
                continue;
            }
            let (hero_damage, _) = trade_hits(&mut self.hero, enemy, frame);
            if hero_damage > 0 {
                self.post_fx.trigger_glitch();
                self.events.push(GameEvent::Glitch);
            }
            let sound = if enemy.is_alive() {
                SoundEffect::Hit
            } else {
                SoundEffect::Explosion
            };
            self.events.push(GameEvent::Sound(sound));
        }

        let hero_at = self.hero.planar_position();
        for pad in &mut self.pads {
            if !pad.used && within_range(pad.pos, hero_at, PAD_PICKUP_RANGE) {
                pad.hit();
                self.pads_remaining -= 1;
                self.hero.grant_shield();
                frame.scene.set_visible(pad.node, false);
                self.events.push(GameEvent::Sound(SoundEffect::Point));
            }
        }
    }

    /// Drop spent projectiles, sunk buildings and enemies whose burst is over
    fn reclaim(&mut self, frame: &mut Frame<'_>) {
        let now_ms = frame.now_ms;
        let scene = &mut *frame.scene;

        self.projectiles.retain(|p| {
            let keep = p.is_active();
            if !keep {
                scene.remove(p.node);
            }
            keep
        });
        self.buildings.retain(|b| {
            let keep = !b.is_collapsed();
            if !keep {
                scene.remove(b.node);
            }
            keep
        });
        self.enemies.retain(|e| {
            let keep = !e.is_reclaimable(now_ms);
            if !keep {
                scene.remove(e.node);
            }
            keep
        });
    }

    /// Push this frame's transforms to the scene graph
    fn publish(&mut self, frame: &mut Frame<'_>) {
        let scene = &mut *frame.scene;
        for projectile in &self.projectiles {
            scene.set_transform(projectile.node, projectile.pos, 0.0);
        }
        for building in self.buildings.iter().filter(|b| !b.is_active()) {
            scene.set_transform(building.node, building.center(), 0.0);
        }
        for enemy in self.enemies.iter().filter(|e| e.is_alive()) {
            scene.set_transform(enemy.node, enemy.position(), enemy.yaw());
        }
        for pad in self.pads.iter().filter(|p| !p.used) {
            scene.set_transform(pad.node, pad.pos.extend(0.0), pad.spin);
        }
        scene.set_transform(self.hero.node, self.hero.position(), self.hero.heading());
    }

    fn update_outcome(&mut self) {
        if self.outcome != LevelOutcome::InProgress {
            return;
        }
        if self.has_won() {
            self.outcome = LevelOutcome::Won;
            self.events.push(GameEvent::LevelWon);
            log::info!("Level {} cleared after {} ticks", self.level_number, self.ticks);
        } else if self.has_died() {
            self.outcome = LevelOutcome::Died;
            self.events.push(GameEvent::HeroDied);
            log::info!("Hero destroyed on level {} after {} ticks", self.level_number, self.ticks);
        }
    }

    pub fn has_won(&self) -> bool {
        self.pads_remaining == 0
    }

    pub fn has_died(&self) -> bool {
        self.hero.hit_points() <= 0
    }

    pub fn outcome(&self) -> LevelOutcome {
        self.outcome
    }

    pub fn level_number(&self) -> u32 {
        self.level_number
    }

    pub fn arena_size(&self) -> i32 {
        self.arena_size
    }

    pub fn pads_remaining(&self) -> u32 {
        self.pads_remaining
    }

    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn hero(&self) -> &Hero {
        &self.hero
    }

    pub fn hero_mut(&mut self) -> &mut Hero {
        &mut self.hero
    }

    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn pads(&self) -> &[Pad] {
        &self.pads
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Take events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Consume the screen glitch trigger
    pub fn take_glitch(&mut self) -> bool {
        self.post_fx.take_glitch()
    }

    /// Take scene commands recorded since the last drain
    pub fn drain_scene(&mut self) -> Vec<SceneCommand> {
        self.scene.drain()
    }

    /// Remove every node this level created; returns the final commands
    pub fn teardown(mut self) -> Vec<SceneCommand> {
        self.scene.clear();
        self.scene.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Spawn an enemy by hand at `pos` (tests only)
    fn add_enemy(level: &mut Level, pos: Vec2) -> u32 {
        let id = level.next_entity_id();
        level
            .enemies
            .push(Enemy::new(id, pos, ENEMY_MIN_SPEED, &mut level.scene));
        id
    }

    fn empty_level() -> Level {
        let mut level = Level::new(1, 7);
        level.enemies.clear();
        level.projectiles.clear();
        level.buildings.retain(|b| !b.destructible);
        level
    }

    #[test]
    fn test_interior_cell_count() {
        for size in [20, 24, 28] {
            assert_eq!(interior_cells(size).count() as i32, size * size - size);
            assert!(interior_cells(size).all(|(_, gy)| gy != size / 2));
        }
    }

    #[test]
    fn test_fence_layout() {
        let size = 20;
        let cells: Vec<_> = fence_cells(size).collect();
        assert_eq!(cells.len() as i32, 4 * size + 3);

        let gates: Vec<_> = cells.iter().filter(|c| c.2 == GATE_HEIGHT).collect();
        assert_eq!(gates.len(), 2);
        assert!(gates.iter().all(|c| c.0 == -1));
        assert!(gates.iter().any(|c| c.1 == size / 2 - 1));
        assert!(gates.iter().any(|c| c.1 == size / 2 + 1));

        // The gap
        assert!(!cells.iter().any(|c| c.0 == -1 && c.1 == size / 2));
    }

    #[test]
    fn test_generation_counts() {
        let level = Level::new(1, 12345);
        assert_eq!(level.arena_size(), 20);
        assert_eq!(level.pads_remaining() as usize, level.pads().len());
        assert!(level.pads_remaining() >= 1);

        let fence = level.buildings().iter().filter(|b| !b.destructible).count();
        assert_eq!(fence, 4 * 20 + 3);

        // Nothing spawns in the center lane
        let lane_blocked = level
            .enemies()
            .iter()
            .any(|e| e.y() == 0.0)
            || level
                .buildings()
                .iter()
                .any(|b| b.destructible && b.pos.y == 0.0);
        assert!(!lane_blocked);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = Level::new(2, 99);
        let b = Level::new(2, 99);
        assert_eq!(a.buildings().len(), b.buildings().len());
        assert_eq!(a.enemies().len(), b.enemies().len());
        assert_eq!(a.pads_remaining(), b.pads_remaining());
        for (ea, eb) in a.enemies().iter().zip(b.enemies()) {
            assert_eq!(ea.position(), eb.position());
            assert_eq!(ea.max_speed(), eb.max_speed());
        }
    }

    #[test]
    fn test_level_zero_is_level_one() {
        let level = Level::new(0, 1);
        assert_eq!(level.level_number(), 1);
        assert_eq!(level.arena_size(), 20);
    }

    #[test]
    fn test_projectile_destroys_enemy() {
        let mut level = empty_level();
        add_enemy(&mut level, Vec2::new(12.0, 0.0));
        level.hero.place_at(Vec2::new(10.0, 0.0));

        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        level.render(&fire, 1.0);
        let events = level.drain_events();
        assert!(events.contains(&GameEvent::Sound(SoundEffect::Pew)));

        let mut exploded = false;
        for _ in 0..30 {
            level.render(&TickInput::default(), 1.0);
            if level
                .drain_events()
                .contains(&GameEvent::Sound(SoundEffect::Explosion))
            {
                exploded = true;
                break;
            }
        }
        assert!(exploded);
        assert!(!level.enemies()[0].is_alive());
        assert!(level.projectiles().is_empty());
    }

    #[test]
    fn test_projectile_trades_with_building() {
        let mut level = empty_level();
        let building_id = level.next_entity_id();
        let building = Building::new(building_id, Vec2::new(12.0, 0.0), 1, true, &mut level.scene);
        level.buildings.push(building);
        let projectile_id = level.next_entity_id();
        let projectile = Projectile::new(
            projectile_id,
            Vec3::new(12.0, 0.0, HERO_Z),
            Vec2::ZERO,
            &mut level.scene,
        );
        level.projectiles.push(projectile);

        level.render(&TickInput::default(), 1.0);
        assert!(
            level
                .drain_events()
                .contains(&GameEvent::Sound(SoundEffect::Impact))
        );
        let building = level.buildings().iter().find(|b| b.id == building_id).expect("building");
        assert!(!building.is_active());
        assert!(level.projectiles().is_empty());
    }

    #[test]
    fn test_spent_projectile_cannot_reach_enemy() {
        let mut level = empty_level();
        let fence_id = level.next_entity_id();
        let fence = Building::new(fence_id, Vec2::new(5.0, 3.0), FENCE_HEIGHT, false, &mut level.scene);
        level.buildings.push(fence);
        add_enemy(&mut level, Vec2::new(5.8, 3.0));
        let projectile_id = level.next_entity_id();
        let projectile = Projectile::new(
            projectile_id,
            Vec3::new(5.4, 3.0, HERO_Z),
            Vec2::ZERO,
            &mut level.scene,
        );
        level.projectiles.push(projectile);

        level.render(&TickInput::default(), 1.0);

        assert!(level.projectiles().is_empty());
        let enemy = &level.enemies()[0];
        assert!(enemy.is_alive());
        assert_eq!(enemy.hit_points(), ENEMY_HIT_POINTS);
        assert!(
            !level
                .drain_events()
                .contains(&GameEvent::Sound(SoundEffect::Explosion))
        );
    }

    #[test]
    fn test_building_blocks_enemy() {
        let mut level = empty_level();
        let id = level.next_entity_id();
        let building = Building::new(id, Vec2::new(5.0, 3.0), 3, true, &mut level.scene);
        level.buildings.push(building);
        let enemy_id = add_enemy(&mut level, Vec2::new(5.0, 2.45));
        level.hero.place_at(Vec2::new(5.0, 8.0));

        // Spawn heading points up and left, into the building
        let before = level.enemies()[0].position();
        level.render(&TickInput::default(), 1.0);

        let enemy = level.enemies().iter().find(|e| e.id == enemy_id).expect("enemy");
        assert!(enemy.is_alive());
        assert!((enemy.position() - before).length() < 1e-5);
    }

    #[test]
    fn test_building_blocks_hero() {
        let mut level = empty_level();
        let id = level.next_entity_id();
        let building = Building::new(id, Vec2::new(11.0, 0.0), 3, true, &mut level.scene);
        level.buildings.push(building);
        level.hero.place_at(Vec2::new(10.3, 0.0));

        let forward = TickInput {
            thrust: 1.0,
            ..Default::default()
        };
        level.render(&forward, 1.0);
        assert!((level.hero().x() - 10.3).abs() < 1e-5);
    }

    #[test]
    fn test_enemy_ram_damages_hero_and_glitches() {
        let mut level = empty_level();
        level.hero.place_at(Vec2::new(10.0, 0.0));
        add_enemy(&mut level, Vec2::new(10.1, 0.1));

        level.render(&TickInput::default(), 1.0);
        assert_eq!(level.hero().hit_points(), HERO_HIT_POINTS - 1);
        assert!(!level.enemies()[0].is_alive());
        assert!(level.take_glitch());
        assert!(!level.take_glitch());

        let events = level.drain_events();
        assert!(events.contains(&GameEvent::Glitch));
        assert!(events.contains(&GameEvent::Sound(SoundEffect::Explosion)));
    }

    #[test]
    fn test_shield_widens_contact_and_blocks_damage() {
        let mut level = empty_level();
        level.hero.place_at(Vec2::new(10.0, 0.0));
        level.hero.grant_shield();
        add_enemy(&mut level, Vec2::new(11.0, 1.0));

        level.render(&TickInput::default(), 1.0);
        assert!(!level.enemies()[0].is_alive());
        assert_eq!(level.hero().hit_points(), HERO_HIT_POINTS);
        assert!(!level.take_glitch());
        assert!(!level.drain_events().contains(&GameEvent::Glitch));
    }

    #[test]
    fn test_dead_enemies_are_reclaimed() {
        let mut level = empty_level();
        level.hero.place_at(Vec2::new(10.0, 0.0));
        add_enemy(&mut level, Vec2::new(10.1, 0.0));

        level.render(&TickInput::default(), 1.0);
        assert_eq!(level.enemies().len(), 1);
        assert!(!level.enemies()[0].is_alive());

        // 200 ms is twelve frames at 60 fps
        for _ in 0..13 {
            level.render(&TickInput::default(), 1.0);
        }
        assert!(level.enemies().is_empty());
        let particles = level
            .scene
            .pending()
            .iter()
            .filter(|c| matches!(c, SceneCommand::Remove { .. }))
            .count();
        assert!(particles >= DEATH_PARTICLES + 1);
    }

    #[test]
    fn test_pickup_wins_level() {
        let mut level = empty_level();
        level.pads.truncate(1);
        level.pads_remaining = 1;
        let pad_pos = level.pads()[0].pos;
        level.hero.place_at(pad_pos);

        level.render(&TickInput::default(), 1.0);
        assert_eq!(level.pads_remaining(), 0);
        assert!(level.pads()[0].used);
        assert!(level.hero().has_shield());
        assert!(level.has_won());
        assert_eq!(level.outcome(), LevelOutcome::Won);

        let events = level.drain_events();
        assert!(events.contains(&GameEvent::Sound(SoundEffect::Point)));
        assert!(events.contains(&GameEvent::LevelWon));

        // Staying on the used pad changes nothing
        level.render(&TickInput::default(), 1.0);
        assert_eq!(level.pads_remaining(), 0);
        assert!(!level.drain_events().contains(&GameEvent::LevelWon));
    }

    #[test]
    fn test_death_outcome() {
        let mut level = empty_level();
        level.hero.place_at(Vec2::new(10.0, 0.0));
        for i in 0..HERO_HIT_POINTS {
            add_enemy(&mut level, Vec2::new(10.0 + 0.05 * i as f32, 0.05));
        }

        level.render(&TickInput::default(), 1.0);
        assert!(level.has_died());
        assert_eq!(level.outcome(), LevelOutcome::Died);
        assert!(level.drain_events().contains(&GameEvent::HeroDied));
    }

    #[test]
    fn test_clock_advances_by_frame_adjustment() {
        let mut level = empty_level();
        level.render(&TickInput::default(), 2.0);
        assert!((level.clock_ms() - 2.0 * FRAME_MS).abs() < 1e-9);

        // Huge stalls are clamped
        level.render(&TickInput::default(), 100.0);
        let expected = (2.0 + MAX_FRAME_ADJUSTMENT as f64) * FRAME_MS;
        assert!((level.clock_ms() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_teardown_removes_every_node() {
        let mut level = Level::new(1, 3);
        let live = level.scene.live_count();
        level.drain_scene();
        let commands = level.teardown();
        assert_eq!(commands.len(), live);
        assert!(
            commands
                .iter()
                .all(|c| matches!(c, SceneCommand::Remove { .. }))
        );
    }
}
