//! Ball flight simulation
//!
//! Owns the delivery state machine: Idle until bowled, Thrown until the first
//! ground contact consumes the bounce/spin deflection, then (optionally) Hit
//! once the bat connects. The external physics layer integrates the ball and
//! reports discrete contacts; this module decides what those contacts mean
//! and which impulses to feed back.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::bus::{Event, SessionParam};
use crate::config::GameConfig;

use super::stump::StumpId;

/// Delivery type, selecting the lateral deflection injected at first bounce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BallType {
    #[default]
    Straight,
    LegSpin,
    OffSpin,
}

impl BallType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BallType::Straight => "Straight",
            BallType::LegSpin => "Leg Spin",
            BallType::OffSpin => "Off Spin",
        }
    }
}

/// Where the current delivery is in its lifecycle (derived from the one-way
/// flags; for display and logging)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryPhase {
    Idle,
    Thrown,
    FirstBounceConsumed,
    Hit,
}

/// Read-only view of the ball for display layers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallSnapshot {
    pub position: Vec3,
    pub velocity: Vec3,
    pub phase: DeliveryPhase,
    pub ball_type: BallType,
    pub speed: f32,
    pub gravity: bool,
    /// Bounce angle in degrees, present once the delivery has bounced
    pub bounce_angle: Option<f32>,
}

/// The ball's kinematic state machine
pub struct BallSimulation {
    position: Vec3,
    velocity: Vec3,
    /// Flight direction, cached at bowl and rewritten at bounce
    direction: Vec3,
    start_position: Vec3,

    thrown: bool,
    bounced: bool,
    hit: bool,
    gravity: bool,

    ball_type: BallType,
    speed: f32,
    bounce_angle: Option<f32>,

    bounce_scalar: f32,
    spin_scalar: f32,
}

impl BallSimulation {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            position: config.pitch.ball_start,
            velocity: Vec3::ZERO,
            direction: Vec3::ZERO,
            start_position: config.pitch.ball_start,
            thrown: false,
            bounced: false,
            hit: false,
            gravity: false,
            ball_type: config.gameplay.default_ball_type,
            speed: config.gameplay.min_ball_speed,
            bounce_angle: None,
            bounce_scalar: config.bowling.bounce_scalar,
            spin_scalar: config.bowling.spin_scalar,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn thrown(&self) -> bool {
        self.thrown
    }

    pub fn bounced(&self) -> bool {
        self.bounced
    }

    pub fn hit(&self) -> bool {
        self.hit
    }

    pub fn gravity_enabled(&self) -> bool {
        self.gravity
    }

    pub fn phase(&self) -> DeliveryPhase {
        match (self.thrown, self.bounced, self.hit) {
            (false, _, _) => DeliveryPhase::Idle,
            (true, _, true) => DeliveryPhase::Hit,
            (true, true, false) => DeliveryPhase::FirstBounceConsumed,
            (true, false, false) => DeliveryPhase::Thrown,
        }
    }

    pub fn snapshot(&self) -> BallSnapshot {
        BallSnapshot {
            position: self.position,
            velocity: self.velocity,
            phase: self.phase(),
            ball_type: self.ball_type,
            speed: self.speed,
            gravity: self.gravity,
            bounce_angle: self.bounce_angle,
        }
    }

    /// Mirror the ball's kinematics from the external integrator, once per
    /// physics tick.
    pub fn sync_from_physics(&mut self, position: Vec3, velocity: Vec3) {
        self.position = position;
        self.velocity = velocity;
    }

    fn apply_impulse(&mut self, impulse: Vec3) {
        // Unit-mass body: an instantaneous impulse is a velocity delta
        self.velocity += impulse;
    }

    /// Release the delivery toward `target`. Calling while a delivery is
    /// already in flight is a no-op; bowl and input race on different
    /// threads and the double-invocation is legitimate.
    pub fn bowl(&mut self, target: Vec3) -> Vec<Event> {
        if self.thrown {
            return Vec::new();
        }
        self.thrown = true;
        self.direction = (target - self.start_position).normalize_or_zero();
        let impulse = self.direction * self.speed;
        self.apply_impulse(impulse);
        log::info!(
            "bowled {:?} at {:.1} toward {:?}",
            self.ball_type,
            self.speed,
            target
        );
        Vec::new()
    }

    /// First ground contact of the delivery consumes the bounce/spin
    /// deflection; later contacts (and any contact after the bat connected)
    /// are left to the external physics layer unmodified.
    pub fn on_ground_collision(&mut self) -> Vec<Event> {
        if !self.thrown || self.hit || self.bounced {
            return Vec::new();
        }

        // speed > 0 is guaranteed by config validation and the param guard
        let spin_by = match self.ball_type {
            BallType::Straight => self.direction.x,
            BallType::LegSpin => self.spin_scalar / self.speed,
            BallType::OffSpin => -self.spin_scalar / self.speed,
        };

        // Rebound height scales with speed: a faster delivery kicks harder
        self.direction = Vec3::new(
            spin_by,
            -self.direction.y * (self.bounce_scalar * self.speed),
            self.direction.z,
        )
        .normalize_or_zero();

        let angle = self.direction.y.atan2(self.direction.z).to_degrees();
        self.bounce_angle = Some(angle);

        self.bounced = true;
        self.gravity = true;
        let impulse = self.direction * self.speed;
        self.apply_impulse(impulse);

        log::info!("first bounce, angle {angle:.1} deg, spin_by {spin_by:.3}");
        vec![Event::BallBounced]
    }

    /// Any stump contact is announced; reactors decide what it means.
    pub fn on_stump_collision(&mut self, stump: StumpId) -> Vec<Event> {
        log::info!("ball struck {stump:?} stump");
        vec![Event::StumpHit { stump }]
    }

    /// Zone membership is decided by the external collision layer; the ball
    /// owns only the translation into session events.
    pub fn on_hit_zone_enter(&mut self) -> Vec<Event> {
        vec![Event::BallEnteredHitZone]
    }

    pub fn on_hit_zone_exit(&mut self) -> Vec<Event> {
        vec![Event::BallExitedHitZone]
    }

    /// The bat connected: stop the ball dead and send it back along the
    /// bat's facing. A ball struck on the full must still fall, so gravity
    /// is force-enabled even if the delivery never bounced.
    pub fn on_bat_swing(&mut self, direction: Vec3, bat_speed: f32) -> Vec<Event> {
        if !self.thrown || self.hit {
            return Vec::new();
        }
        self.hit = true;
        self.velocity = Vec3::ZERO;
        let return_direction = direction.normalize_or_zero();
        let hit_speed = self.speed / 2.0 + bat_speed;
        self.apply_impulse(-return_direction * hit_speed);
        if !self.bounced {
            self.gravity = true;
        }
        log::info!("ball hit, return speed {hit_speed:.1}");
        Vec::new()
    }

    /// Speed and delivery-type updates between deliveries
    pub fn on_param(&mut self, param: SessionParam) {
        match param {
            SessionParam::BallSpeed(speed) => {
                if speed > 0.0 {
                    self.speed = speed;
                } else {
                    debug_assert!(false, "non-positive ball speed {speed}");
                    log::warn!("ignoring non-positive ball speed update {speed}");
                }
            }
            SessionParam::BallType(ball_type) => self.ball_type = ball_type,
            // Bat parameters are not ours
            SessionParam::BatSpeed(_) | SessionParam::BatElevation(_) => {}
        }
    }

    /// Return to pre-delivery conditions. Safe from any state.
    pub fn reset(&mut self) {
        self.thrown = false;
        self.bounced = false;
        self.hit = false;
        self.gravity = false;
        self.velocity = Vec3::ZERO;
        self.direction = Vec3::ZERO;
        self.position = self.start_position;
        self.bounce_angle = None;
        log::debug!("ball reset");
    }
}
