//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - State changes only through discrete events (bowl, collision, swipe, reset)
//! - No rendering, audio, or platform dependencies
//! - The external physics layer is consumed through explicit collision
//!   notifications and per-tick kinematic sync, never polled

pub mod ball;
pub mod bat;
pub mod marker;
pub mod stump;
pub mod world;

pub use ball::{BallSimulation, BallSnapshot, BallType, DeliveryPhase};
pub use bat::{BatSnapshot, BatSwingController};
pub use marker::{MarkerSnapshot, PitchMarkerController};
pub use stump::{Stump, StumpId, StumpSnapshot};
pub use world::WorldDriver;
