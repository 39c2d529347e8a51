//! Gully Cricket - an arcade cricket mini-game simulation core
//!
//! Core modules:
//! - `bus`: Publish/subscribe event bus gluing the components together
//! - `config`: Data-driven game tuning, validated at load
//! - `sim`: Deterministic simulation (ball flight, bat swing, marker, stumps)
//! - `session`: Composition root wiring components to the bus and exposing
//!   the external input/collision/display surface

pub mod bus;
pub mod config;
pub mod session;
pub mod sim;

pub use bus::{Event, EventBus, EventKind};
pub use config::GameConfig;
pub use session::Session;

use glam::{Vec2, Vec3};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Downward acceleration applied to gravity-enabled bodies (m/s²)
    pub const GRAVITY_ACCEL: f32 = 9.81;
}

/// Convert a screen-space drag vector into a world-frame swipe angle (degrees).
///
/// Screen drags measure angles counter-clockwise from screen-right; the world
/// frame measures bat yaw clockwise from world-forward. The `-(raw + 90)`
/// rotation between the two must be preserved exactly for compatibility with
/// the visual frame.
#[inline]
pub fn swipe_to_world_angle(drag: Vec2) -> f32 {
    let raw = drag.y.atan2(drag.x).to_degrees();
    -(raw + 90.0)
}

/// Forward unit vector for a body rotated by `yaw` then pitched down by
/// `elevation` (both in degrees).
///
/// Matches the engine convention the bat is posed with: positive elevation
/// pitches the forward vector below the horizontal plane.
#[inline]
pub fn forward_from_angles(yaw: f32, elevation: f32) -> Vec3 {
    let (yaw_sin, yaw_cos) = yaw.to_radians().sin_cos();
    let (elev_sin, elev_cos) = elevation.to_radians().sin_cos();
    Vec3::new(elev_cos * yaw_sin, -elev_sin, elev_cos * yaw_cos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swipe_angle_mapping() {
        // 45° screen drag maps to -135° world yaw
        let angle = swipe_to_world_angle(Vec2::new(1.0, 1.0));
        assert!((angle - (-135.0)).abs() < 0.001);

        // Straight-up drag turns the bat square around
        let angle = swipe_to_world_angle(Vec2::new(0.0, 1.0));
        assert!((angle - (-180.0)).abs() < 0.001);
    }

    #[test]
    fn test_forward_from_angles_flat() {
        let fwd = forward_from_angles(0.0, 0.0);
        assert!((fwd - Vec3::Z).length() < 1e-6);

        let fwd = forward_from_angles(-135.0, 0.0);
        let expect = Vec3::new(-1.0, 0.0, -1.0).normalize();
        assert!((fwd - expect).length() < 1e-6);
    }

    #[test]
    fn test_forward_from_angles_elevated() {
        // Positive elevation dips the forward vector; the hit impulse is
        // applied along the negated forward, sending the ball up.
        let fwd = forward_from_angles(0.0, 30.0);
        assert!(fwd.y < 0.0);
        assert!((fwd.length() - 1.0).abs() < 1e-6);
        assert!((fwd.y - (-0.5)).abs() < 1e-6);
    }
}
