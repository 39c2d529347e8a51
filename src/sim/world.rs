//! Fixed-step stand-in for the external physics/collision layer
//!
//! The simulation core only consumes per-tick kinematics and discrete
//! surface-tagged contact notifications; this driver produces both, for the
//! demo binary and the end-to-end tests. It is deliberately not a physics
//! engine: a ground plane, a hit-zone depth range, and three stump columns
//! are the entire world.

use glam::Vec3;

use crate::config::GameConfig;
use crate::consts::GRAVITY_ACCEL;
use crate::session::{Session, Surface};

use super::stump::StumpId;

/// Ground plane height
const GROUND_Y: f32 = 0.0;
/// Separation above the ground plane that re-arms the contact-begin report
const CONTACT_EPS: f32 = 0.01;
/// Velocity retained by the ball after it clatters into a stump
const STUMP_DAMPING: f32 = 0.25;

pub struct WorldDriver {
    zone_min_z: f32,
    zone_max_z: f32,
    stump_z: f32,
    stump_xs: [(StumpId, f32); 3],
    stump_height: f32,
    stump_radius: f32,

    in_zone: bool,
    on_ground: bool,
    stump_notified: [bool; 3],
}

impl WorldDriver {
    pub fn new(config: &GameConfig) -> Self {
        let pitch = &config.pitch;
        Self {
            zone_min_z: config.batting.reach_min_z,
            zone_max_z: config.batting.reach_max_z,
            stump_z: pitch.stump_base.z,
            stump_xs: [
                (StumpId::Off, -pitch.stump_spacing),
                (StumpId::Middle, 0.0),
                (StumpId::Leg, pitch.stump_spacing),
            ],
            stump_height: pitch.stump_height,
            stump_radius: pitch.stump_contact_radius,
            in_zone: false,
            on_ground: false,
            stump_notified: [false; 3],
        }
    }

    /// Advance the ball one fixed timestep and report any surface contacts
    /// and zone transitions back into the session.
    pub fn step(&mut self, session: &Session, dt: f32) {
        let snap = session.ball();
        let mut velocity = snap.velocity;
        if snap.gravity {
            velocity.y -= GRAVITY_ACCEL * dt;
        }
        let mut position = snap.position + velocity * dt;

        // Ground: sliding contact (vertical motion killed, begin-event
        // reported once until the ball separates). The bounce impulse, when
        // the core consumes one, comes back through the session.
        let mut ground_contact = false;
        if position.y <= GROUND_Y {
            position.y = GROUND_Y;
            if velocity.y < 0.0 {
                velocity.y = 0.0;
            }
            if !self.on_ground {
                self.on_ground = true;
                ground_contact = true;
            }
        } else if position.y > GROUND_Y + CONTACT_EPS {
            self.on_ground = false;
        }

        // Stumps: a column test around the stump line against the nearest
        // stump, one begin-event per stump per delivery
        let mut stump_contact = None;
        if (position.z - self.stump_z).abs() <= self.stump_radius
            && position.y <= self.stump_height
        {
            let mut nearest: Option<(usize, StumpId, f32)> = None;
            for (slot, (id, x)) in self.stump_xs.iter().enumerate() {
                let dist = (position.x - x).abs();
                if self.stump_notified[slot] || dist > self.stump_radius {
                    continue;
                }
                if nearest.is_none_or(|(_, _, best)| dist < best) {
                    nearest = Some((slot, *id, dist));
                }
            }
            if let Some((slot, id, _)) = nearest {
                self.stump_notified[slot] = true;
                stump_contact = Some(id);
                velocity *= STUMP_DAMPING;
            }
        }

        session.sync_ball(position, velocity);
        if ground_contact {
            session.ball_collision(Surface::Ground);
        }
        if let Some(id) = stump_contact {
            session.ball_collision(Surface::Stump(id));
        }

        // Hit-zone volume membership by depth range
        let in_zone_now = position.z >= self.zone_min_z && position.z <= self.zone_max_z;
        if in_zone_now != self.in_zone {
            self.in_zone = in_zone_now;
            if in_zone_now {
                session.hit_zone_enter();
            } else {
                session.hit_zone_exit();
            }
        }
    }

    /// Forget contact debounce state for a fresh delivery. Pairs with the
    /// session's Reset.
    pub fn reset(&mut self) {
        self.in_zone = false;
        self.on_ground = false;
        self.stump_notified = [false; 3];
    }
}
