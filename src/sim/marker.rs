//! Pitch marker dragging
//!
//! The marker is the bowler's aim point. A screen drag moves it on the
//! horizontal/depth plane, scaled down to world units and clamped to the
//! pitch bounds. Once the delivery is bowled the marker locks until Reset.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::bus::Event;
use crate::config::{GameConfig, MarkerDrag};

/// Read-only view of the marker for display layers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerSnapshot {
    pub position: Vec3,
    pub locked: bool,
}

pub struct PitchMarkerController {
    position: Vec3,
    default_position: Vec3,
    locked: bool,
    touch_anchor: Option<Vec2>,
    marker_anchor: Vec3,
    bounds: MarkerDrag,
}

impl PitchMarkerController {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            position: config.pitch.marker_default,
            default_position: config.pitch.marker_default,
            locked: false,
            touch_anchor: None,
            marker_anchor: config.pitch.marker_default,
            bounds: config.marker,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn locked(&self) -> bool {
        self.locked
    }

    pub fn snapshot(&self) -> MarkerSnapshot {
        MarkerSnapshot {
            position: self.position,
            locked: self.locked,
        }
    }

    /// Anchor a drag at the current marker and touch positions
    pub fn on_drag_begin(&mut self, touch: Vec2) {
        self.touch_anchor = Some(touch);
        self.marker_anchor = self.position;
    }

    /// Move the marker by the scaled drag delta, clamped to the pitch
    /// bounds. Screen-y maps to world-z (depth). Inert while locked.
    pub fn on_drag(&mut self, touch: Vec2) -> Vec<Event> {
        if self.locked {
            return Vec::new();
        }
        let Some(anchor) = self.touch_anchor else {
            return Vec::new();
        };
        let delta = (touch - anchor) * self.bounds.drag_scale;
        self.position = Vec3::new(
            (self.marker_anchor.x + delta.x).clamp(-self.bounds.boundary_x, self.bounds.boundary_x),
            self.position.y,
            (self.marker_anchor.z + delta.y).clamp(self.bounds.min_z, self.bounds.max_z),
        );
        vec![Event::DragMarker {
            position: self.position,
        }]
    }

    /// The delivery is in flight; the aim point is frozen
    pub fn lock(&mut self) {
        self.locked = true;
    }

    /// Unlock and re-announce the default position
    pub fn reset(&mut self) -> Vec<Event> {
        self.locked = false;
        self.position = self.default_position;
        self.touch_anchor = None;
        self.marker_anchor = self.default_position;
        vec![Event::DragMarker {
            position: self.position,
        }]
    }
}
