//! Stump reactors
//!
//! Each stump reacts independently to the stump-hit event: the one that was
//! struck hands itself over to gravity so the external physics layer can
//! knock it about. Reset stands all three back up.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Stable identity of one of the three stumps, assembled at session start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StumpId {
    Off,
    Middle,
    Leg,
}

impl StumpId {
    pub const ALL: [StumpId; 3] = [StumpId::Off, StumpId::Middle, StumpId::Leg];
}

/// Read-only view of a stump for display layers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StumpSnapshot {
    pub id: StumpId,
    pub position: Vec3,
    pub rotation: Quat,
    pub gravity: bool,
}

pub struct Stump {
    id: StumpId,
    position: Vec3,
    default_position: Vec3,
    rotation: Quat,
    velocity: Vec3,
    angular_velocity: Vec3,
    gravity: bool,
}

impl Stump {
    pub fn new(id: StumpId, position: Vec3) -> Self {
        Self {
            id,
            position,
            default_position: position,
            rotation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            gravity: false,
        }
    }

    pub fn id(&self) -> StumpId {
        self.id
    }

    pub fn gravity_enabled(&self) -> bool {
        self.gravity
    }

    pub fn snapshot(&self) -> StumpSnapshot {
        StumpSnapshot {
            id: self.id,
            position: self.position,
            rotation: self.rotation,
            gravity: self.gravity,
        }
    }

    /// Mirror the stump's transform from the external physics layer
    pub fn sync_from_physics(&mut self, position: Vec3, rotation: Quat, velocity: Vec3) {
        self.position = position;
        self.rotation = rotation;
        self.velocity = velocity;
    }

    /// React only to a hit on this stump
    pub fn on_stump_hit(&mut self, id: StumpId) {
        if id == self.id {
            self.gravity = true;
        }
    }

    /// Stand the stump back up
    pub fn reset(&mut self) {
        self.velocity = Vec3::ZERO;
        self.angular_velocity = Vec3::ZERO;
        self.gravity = false;
        self.position = self.default_position;
        self.rotation = Quat::IDENTITY;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_matching_stump_reacts() {
        let mut off = Stump::new(StumpId::Off, Vec3::new(-0.12, 0.0, 10.5));
        let mut middle = Stump::new(StumpId::Middle, Vec3::new(0.0, 0.0, 10.5));

        off.on_stump_hit(StumpId::Middle);
        middle.on_stump_hit(StumpId::Middle);

        assert!(!off.gravity_enabled());
        assert!(middle.gravity_enabled());
    }

    #[test]
    fn test_reset_restores_transform() {
        let base = Vec3::new(0.12, 0.0, 10.5);
        let mut stump = Stump::new(StumpId::Leg, base);
        stump.on_stump_hit(StumpId::Leg);
        stump.sync_from_physics(
            Vec3::new(1.0, 0.0, 11.0),
            Quat::from_rotation_x(1.2),
            Vec3::new(0.5, 0.0, 0.5),
        );

        stump.reset();
        assert!(!stump.gravity_enabled());
        assert_eq!(stump.snapshot().position, base);
        assert_eq!(stump.snapshot().rotation, Quat::IDENTITY);

        // Idempotent
        stump.reset();
        assert_eq!(stump.snapshot().position, base);
    }
}
