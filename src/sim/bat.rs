//! Bat swing and swipe detection
//!
//! The player gets one swing per delivery. A drag gesture becomes a swipe
//! once it covers the configured minimum distance; the swipe consumes the
//! swing whether or not the ball is in the hit window, but only an in-window
//! swing produces a hit event.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::bus::{Event, SessionParam};
use crate::config::GameConfig;
use crate::{forward_from_angles, swipe_to_world_angle};

/// Read-only view of the bat for display layers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatSnapshot {
    pub armed: bool,
    pub in_hit_window: bool,
    pub bat_speed: f32,
    pub elevation: f32,
}

/// Swing state machine plus swipe recognition
pub struct BatSwingController {
    armed: bool,
    in_hit_window: bool,
    bat_speed: f32,
    /// Shot elevation in degrees; pitches the hit direction
    elevation: f32,
    swipe_anchor: Option<Vec2>,
    min_drag: f32,
}

impl BatSwingController {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            armed: false,
            in_hit_window: false,
            bat_speed: config.gameplay.min_bat_speed,
            elevation: config.gameplay.min_bat_elevation,
            swipe_anchor: None,
            min_drag: config.swipe.min_drag,
        }
    }

    pub fn armed(&self) -> bool {
        self.armed
    }

    pub fn in_hit_window(&self) -> bool {
        self.in_hit_window
    }

    pub fn snapshot(&self) -> BatSnapshot {
        BatSnapshot {
            armed: self.armed,
            in_hit_window: self.in_hit_window,
            bat_speed: self.bat_speed,
            elevation: self.elevation,
        }
    }

    pub fn on_hit_zone_enter(&mut self) {
        self.in_hit_window = true;
    }

    pub fn on_hit_zone_exit(&mut self) {
        self.in_hit_window = false;
    }

    /// Anchor a new swipe gesture at `touch`
    pub fn on_swipe_begin(&mut self, touch: Vec2) {
        self.swipe_anchor = Some(touch);
    }

    /// Track a swipe gesture. Fires the swing once the drag from the anchor
    /// reaches the minimum length; the rest of the gesture is inert.
    pub fn on_swipe_drag(&mut self, touch: Vec2) -> Vec<Event> {
        if self.armed {
            return Vec::new();
        }
        let Some(anchor) = self.swipe_anchor else {
            return Vec::new();
        };
        let drag = touch - anchor;
        if drag.length() < self.min_drag {
            return Vec::new();
        }
        self.on_swipe(swipe_to_world_angle(drag))
    }

    /// Consume the delivery's one swing. `world_angle` is the bat yaw in
    /// degrees. Outside the hit window this is a swing-and-miss: the swing
    /// is spent but no hit event is produced.
    pub fn on_swipe(&mut self, world_angle: f32) -> Vec<Event> {
        if self.armed {
            return Vec::new();
        }
        self.armed = true;

        let mut events = vec![Event::BatSwingArmed { angle: world_angle }];
        if self.in_hit_window {
            let direction = forward_from_angles(world_angle, self.elevation);
            log::info!("bat swing connected at {world_angle:.1} deg");
            events.push(Event::BatSwingApplied {
                direction,
                bat_speed: self.bat_speed,
            });
        } else {
            log::info!("swing and miss at {world_angle:.1} deg");
        }
        events
    }

    pub fn on_param(&mut self, param: SessionParam) {
        match param {
            SessionParam::BatSpeed(speed) => self.bat_speed = speed,
            SessionParam::BatElevation(elevation) => self.elevation = elevation,
            SessionParam::BallSpeed(_) | SessionParam::BallType(_) => {}
        }
    }

    /// One fresh swing for the next delivery
    pub fn reset(&mut self) {
        self.armed = false;
        self.in_hit_window = false;
        self.swipe_anchor = None;
    }
}
