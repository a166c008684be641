//! A run of consecutive levels
//!
//! Clearing a level builds the next one; losing the hero rebuilds the
//! current one. Level seeds derive from the run seed, so a run replays
//! exactly given the same inputs.

use crate::scene::SceneCommand;
use crate::sim::{GameEvent, Level, LevelOutcome, TickInput};

#[derive(Debug)]
pub struct Session {
    seed: u64,
    level: Level,
    /// Hero deaths so far this run
    deaths: u32,
    /// Teardown commands from replaced levels, sent before the new level's
    pending_scene: Vec<SceneCommand>,
}

impl Session {
    pub fn new(seed: u64) -> Self {
        Self::starting_at(seed, 1)
    }

    /// Start a run at an arbitrary level
    pub fn starting_at(seed: u64, level_number: u32) -> Self {
        log::info!("Starting run with seed {} at level {}", seed, level_number);
        Self {
            seed,
            level: Level::new(level_number, level_seed(seed, level_number)),
            deaths: 0,
            pending_scene: Vec::new(),
        }
    }

    /// Advance the current level one frame and handle its outcome
    pub fn frame(&mut self, input: &TickInput, dt: f32) -> Vec<GameEvent> {
        self.level.render(input, dt);
        let events = self.level.drain_events();

        match self.level.outcome() {
            LevelOutcome::InProgress => {}
            LevelOutcome::Won => {
                let next = self.level.level_number() + 1;
                self.load_level(next);
            }
            LevelOutcome::Died => {
                self.deaths += 1;
                let current = self.level.level_number();
                self.load_level(current);
            }
        }
        events
    }

    fn load_level(&mut self, level_number: u32) {
        let fresh = Level::new(level_number, level_seed(self.seed, level_number));
        let old = std::mem::replace(&mut self.level, fresh);
        self.pending_scene.extend(old.teardown());
    }

    /// Scene commands to forward this frame, oldest first
    pub fn drain_scene(&mut self) -> Vec<SceneCommand> {
        let mut commands = std::mem::take(&mut self.pending_scene);
        commands.extend(self.level.drain_scene());
        commands
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn level_mut(&mut self) -> &mut Level {
        &mut self.level
    }

    pub fn level_number(&self) -> u32 {
        self.level.level_number()
    }

    pub fn deaths(&self) -> u32 {
        self.deaths
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

/// Per-level seed: run seed mixed with a golden-ratio hash of the level
pub fn level_seed(seed: u64, level_number: u32) -> u64 {
    seed ^ (level_number as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
