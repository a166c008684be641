//! Simulation output events
//!
//! The simulation never plays audio itself. It queues events and the front
//! end hands them to the audio mixer, which voices each one independently.

use serde::{Deserialize, Serialize};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Hero fires a projectile
    Pew,
    /// Projectile strikes a building or a surviving enemy
    Impact,
    /// Enemy rams the hero and survives
    Hit,
    /// Enemy destroyed
    Explosion,
    /// Pad collected
    Point,
}

/// Something the front end should react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Sound(SoundEffect),
    /// Hero took damage: run the screen glitch
    Glitch,
    /// Last pad collected
    LevelWon,
    /// Hero hit points reached zero
    HeroDied,
}

/// Post-processing state owned by the level
#[derive(Debug, Clone, Default)]
pub struct PostFx {
    glitch: bool,
}

impl PostFx {
    /// Arm the screen glitch for the next presented frame
    pub fn trigger_glitch(&mut self) {
        self.glitch = true;
    }

    pub fn glitch_pending(&self) -> bool {
        self.glitch
    }

    /// Consume the glitch trigger
    pub fn take_glitch(&mut self) -> bool {
        std::mem::take(&mut self.glitch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glitch_is_one_shot() {
        let mut fx = PostFx::default();
        assert!(!fx.take_glitch());
        fx.trigger_glitch();
        fx.trigger_glitch();
        assert!(fx.glitch_pending());
        assert!(fx.take_glitch());
        assert!(!fx.glitch_pending());
    }
}
