//! Scene graph command boundary
//!
//! The simulation never talks to the 3D engine directly. It records commands
//! here and the front end drains them once per frame and forwards them to the
//! JS scene bridge. Nothing is ever read back.

use std::collections::BTreeSet;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Handle to a visual node owned by the external scene graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// What a node looks like (the bridge picks mesh/material from this)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Player ship
    Hero,
    /// Cyan four-sided cone
    Enemy,
    /// Box of the given height; fence boxes are not destructible
    Building { height: u32, destructible: bool },
    Projectile,
    /// Power-up pad
    Pad,
    /// One fragment of an enemy explosion
    Particle,
    Floor,
    Light,
    /// "Synth Blast" title billboard
    Title,
}

/// A single instruction for the external scene graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SceneCommand {
    Add { id: NodeId, kind: NodeKind, position: Vec3 },
    SetTransform { id: NodeId, position: Vec3, yaw: f32 },
    SetVisible { id: NodeId, visible: bool },
    Remove { id: NodeId },
}

/// Records scene commands and tracks which nodes are alive
#[derive(Debug, Default)]
pub struct SceneGraph {
    next_id: u32,
    live: BTreeSet<NodeId>,
    commands: Vec<SceneCommand>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node and return its handle
    pub fn add(&mut self, kind: NodeKind, position: Vec3) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.live.insert(id);
        self.commands.push(SceneCommand::Add { id, kind, position });
        id
    }

    pub fn set_transform(&mut self, id: NodeId, position: Vec3, yaw: f32) {
        if self.live.contains(&id) {
            self.commands
                .push(SceneCommand::SetTransform { id, position, yaw });
        }
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if self.live.contains(&id) {
            self.commands.push(SceneCommand::SetVisible { id, visible });
        }
    }

    /// Remove a node (unknown or already removed handles are ignored)
    pub fn remove(&mut self, id: NodeId) {
        if self.live.remove(&id) {
            self.commands.push(SceneCommand::Remove { id });
        } else {
            log::debug!("Ignoring removal of unknown scene node {:?}", id);
        }
    }

    /// Remove every live node (level teardown)
    pub fn clear(&mut self) {
        let live = std::mem::take(&mut self.live);
        self.commands
            .extend(live.into_iter().map(|id| SceneCommand::Remove { id }));
    }

    /// Whether the node has been added and not yet removed
    pub fn contains(&self, id: NodeId) -> bool {
        self.live.contains(&id)
    }

    /// Number of live nodes
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Commands recorded since the last drain
    pub fn pending(&self) -> &[SceneCommand] {
        &self.commands
    }

    /// Hand all pending commands to the front end
    pub fn drain(&mut self) -> Vec<SceneCommand> {
        std::mem::take(&mut self.commands)
    }
}

/// Drops particle nodes from the outgoing command stream
///
/// A suppressed node stays suppressed until its `Remove`, so the bridge never
/// sees a handle it did not create even if the toggle flips mid-burst.
#[derive(Debug, Default)]
pub struct ParticleFilter {
    suppressed: BTreeSet<NodeId>,
}

impl ParticleFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter one frame of commands; new particles are hidden when `hide` is set
    pub fn apply(&mut self, commands: Vec<SceneCommand>, hide: bool) -> Vec<SceneCommand> {
        commands
            .into_iter()
            .filter(|command| match command {
                SceneCommand::Add {
                    id,
                    kind: NodeKind::Particle,
                    ..
                } if hide => {
                    self.suppressed.insert(*id);
                    false
                }
                SceneCommand::Add { id, .. } => {
                    // Handles are reused after a level teardown
                    self.suppressed.remove(id);
                    true
                }
                SceneCommand::SetTransform { id, .. } | SceneCommand::SetVisible { id, .. } => {
                    !self.suppressed.contains(id)
                }
                SceneCommand::Remove { id } => !self.suppressed.remove(id),
            })
            .collect()
    }

    /// Particle nodes currently withheld from the bridge
    pub fn suppressed_count(&self) -> usize {
        self.suppressed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_remove() {
        let mut scene = SceneGraph::new();
        let a = scene.add(NodeKind::Enemy, Vec3::ZERO);
        let b = scene.add(NodeKind::Pad, Vec3::ONE);
        assert_ne!(a, b);
        assert_eq!(scene.live_count(), 2);

        scene.remove(a);
        assert!(!scene.contains(a));
        assert!(scene.contains(b));

        // Second removal is ignored
        scene.remove(a);
        let removes = scene
            .pending()
            .iter()
            .filter(|c| matches!(c, SceneCommand::Remove { .. }))
            .count();
        assert_eq!(removes, 1);
    }

    #[test]
    fn test_commands_for_removed_nodes_are_dropped() {
        let mut scene = SceneGraph::new();
        let a = scene.add(NodeKind::Projectile, Vec3::ZERO);
        scene.remove(a);
        scene.drain();

        scene.set_transform(a, Vec3::ONE, 0.0);
        scene.set_visible(a, false);
        assert!(scene.pending().is_empty());
    }

    #[test]
    fn test_drain_empties_queue() {
        let mut scene = SceneGraph::new();
        scene.add(NodeKind::Floor, Vec3::ZERO);
        assert_eq!(scene.drain().len(), 1);
        assert!(scene.drain().is_empty());
        assert_eq!(scene.live_count(), 1);
    }

    #[test]
    fn test_command_json_shape() {
        let cmd = SceneCommand::SetVisible {
            id: NodeId(7),
            visible: false,
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"op\":\"set_visible\""));
        assert!(json.contains("\"id\":7"));
    }

    #[test]
    fn test_hidden_particles_never_reach_the_bridge() {
        let mut scene = SceneGraph::new();
        let mut filter = ParticleFilter::new();
        let enemy = scene.add(NodeKind::Enemy, Vec3::ZERO);
        let particle = scene.add(NodeKind::Particle, Vec3::ZERO);
        scene.set_transform(particle, Vec3::ONE, 0.0);
        scene.set_transform(enemy, Vec3::ONE, 0.0);
        scene.remove(particle);

        let sent = filter.apply(scene.drain(), true);
        assert_eq!(sent.len(), 2);
        assert!(sent.iter().all(|c| match c {
            SceneCommand::Add { id, .. } | SceneCommand::SetTransform { id, .. } => *id == enemy,
            _ => false,
        }));
        assert_eq!(filter.suppressed_count(), 0);
    }

    #[test]
    fn test_suppression_outlives_toggle() {
        let mut scene = SceneGraph::new();
        let mut filter = ParticleFilter::new();
        let particle = scene.add(NodeKind::Particle, Vec3::ZERO);
        assert!(filter.apply(scene.drain(), true).is_empty());

        // Particles switched back on mid-burst
        scene.set_transform(particle, Vec3::ONE, 0.0);
        scene.remove(particle);
        assert!(filter.apply(scene.drain(), false).is_empty());
        assert_eq!(filter.suppressed_count(), 0);
    }

    #[test]
    fn test_shown_particles_pass_through() {
        let mut scene = SceneGraph::new();
        let mut filter = ParticleFilter::new();
        let particle = scene.add(NodeKind::Particle, Vec3::ZERO);
        scene.set_transform(particle, Vec3::ONE, 0.0);
        assert_eq!(filter.apply(scene.drain(), false).len(), 2);
    }
}
