//! Session composition root
//!
//! Builds the bus and every component, wires the subscriptions, and exposes
//! the whole external surface: input callbacks, physics-layer collision
//! notifications, parameter sliders, and read-only state accessors.
//!
//! Locking discipline: component methods return the events they want
//! published; the wiring publishes them only after the component guard has
//! dropped, so no component lock is ever held across a nested publish.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use glam::{Vec2, Vec3};

use crate::bus::{Event, EventBus, EventKind, SessionParam};
use crate::config::{ConfigError, GameConfig};
use crate::sim::{
    BallSimulation, BallSnapshot, BallType, BatSnapshot, BatSwingController, MarkerSnapshot,
    PitchMarkerController, Stump, StumpId, StumpSnapshot,
};

/// Surface kinds the external collision layer tags its notifications with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Ground,
    Stump(StumpId),
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panicked handler elsewhere must not wedge the session
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn stump_index(id: StumpId) -> usize {
    match id {
        StumpId::Off => 0,
        StumpId::Middle => 1,
        StumpId::Leg => 2,
    }
}

/// One game session: bus, components, and their wiring. Created once and
/// reset in place between deliveries.
pub struct Session {
    bus: Arc<EventBus>,
    config: GameConfig,
    ball: Arc<Mutex<BallSimulation>>,
    bat: Arc<Mutex<BatSwingController>>,
    marker: Arc<Mutex<PitchMarkerController>>,
    stumps: [Arc<Mutex<Stump>>; 3],
}

impl Session {
    /// Validate `config` and assemble a fully wired session. Components get
    /// the bus by injection; nothing global, nothing looked up by name.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let bus = Arc::new(EventBus::new());
        let ball = Arc::new(Mutex::new(BallSimulation::new(&config)));
        let bat = Arc::new(Mutex::new(BatSwingController::new(&config)));
        let marker = Arc::new(Mutex::new(PitchMarkerController::new(&config)));

        let pitch = &config.pitch;
        let stumps = [StumpId::Off, StumpId::Middle, StumpId::Leg].map(|id| {
            let offset = (stump_index(id) as f32 - 1.0) * pitch.stump_spacing;
            let base = pitch.stump_base + Vec3::new(offset, 0.0, 0.0);
            Arc::new(Mutex::new(Stump::new(id, base)))
        });

        let session = Self {
            bus,
            config,
            ball,
            bat,
            marker,
            stumps,
        };
        session.wire();
        session.apply_defaults();
        Ok(session)
    }

    /// Subscribe every component to the events it reacts to
    fn wire(&self) {
        let bus = &self.bus;

        // Reset fans out to every stateful component. The marker re-announces
        // its default position, published once its own guard has dropped.
        {
            let ball = self.ball.clone();
            bus.subscribe_fn(EventKind::Reset, move |_| lock(&ball).reset());
        }
        {
            let bat = self.bat.clone();
            bus.subscribe_fn(EventKind::Reset, move |_| lock(&bat).reset());
        }
        {
            let marker = self.marker.clone();
            let bus_weak = Arc::downgrade(bus);
            bus.subscribe_fn(EventKind::Reset, move |_| {
                let events = lock(&marker).reset();
                publish_follow_ons(&bus_weak, events);
            });
        }
        for stump in &self.stumps {
            let stump = stump.clone();
            bus.subscribe_fn(EventKind::Reset, move |_| lock(&stump).reset());
        }

        // Bowl: the ball aims at the marker, the marker freezes
        {
            let ball = self.ball.clone();
            let marker = self.marker.clone();
            bus.subscribe_fn(EventKind::BallBowled, move |_| {
                let target = lock(&marker).position();
                lock(&ball).bowl(target);
            });
        }
        {
            let marker = self.marker.clone();
            bus.subscribe_fn(EventKind::BallBowled, move |_| lock(&marker).lock());
        }

        // Zone membership gates the bat
        {
            let bat = self.bat.clone();
            bus.subscribe_fn(EventKind::BallEnteredHitZone, move |_| {
                lock(&bat).on_hit_zone_enter()
            });
        }
        {
            let bat = self.bat.clone();
            bus.subscribe_fn(EventKind::BallExitedHitZone, move |_| {
                lock(&bat).on_hit_zone_exit()
            });
        }

        // A connected swing redirects the ball
        {
            let ball = self.ball.clone();
            bus.subscribe_fn(EventKind::BatSwingApplied, move |event| match event {
                Event::BatSwingApplied {
                    direction,
                    bat_speed,
                } => {
                    lock(&ball).on_bat_swing(*direction, *bat_speed);
                }
                other => malformed_payload("BatSwingApplied", other),
            });
        }

        // Each stump reacts independently to the hit announcement
        for stump in &self.stumps {
            let stump = stump.clone();
            bus.subscribe_fn(EventKind::StumpHit, move |event| match event {
                Event::StumpHit { stump: id } => lock(&stump).on_stump_hit(*id),
                other => malformed_payload("StumpHit", other),
            });
        }

        // Session parameters; each component picks out its own
        {
            let ball = self.ball.clone();
            bus.subscribe_fn(EventKind::ParamUpdated, move |event| match event {
                Event::ParamUpdated { param } => lock(&ball).on_param(*param),
                other => malformed_payload("ParamUpdated", other),
            });
        }
        {
            let bat = self.bat.clone();
            bus.subscribe_fn(EventKind::ParamUpdated, move |event| match event {
                Event::ParamUpdated { param } => lock(&bat).on_param(*param),
                other => malformed_payload("ParamUpdated", other),
            });
        }
    }

    /// First publications of a session: configured parameter defaults, then
    /// the marker position announcement display layers key off.
    fn apply_defaults(&self) {
        let g = self.config.gameplay.clone();
        self.set_ball_speed(g.default_ball_speed);
        self.set_bat_speed(g.default_bat_speed);
        self.set_bat_elevation(g.default_lofted);
        self.set_ball_type(g.default_ball_type);
        self.bus.publish(&Event::DragMarker {
            position: lock(&self.marker).position(),
        });
    }

    fn publish_all(&self, events: Vec<Event>) {
        for event in &events {
            self.bus.publish(event);
        }
    }

    /// The bus, for external layers (rendering, audio, UI) to tap
    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    // --- input surface ---------------------------------------------------

    pub fn marker_drag_begin(&self, touch: Vec2) {
        lock(&self.marker).on_drag_begin(touch);
    }

    pub fn marker_drag(&self, touch: Vec2) {
        let events = lock(&self.marker).on_drag(touch);
        self.publish_all(events);
    }

    pub fn bat_swipe_begin(&self, touch: Vec2) {
        lock(&self.bat).on_swipe_begin(touch);
    }

    pub fn bat_swipe_drag(&self, touch: Vec2) {
        let events = lock(&self.bat).on_swipe_drag(touch);
        self.publish_all(events);
    }

    /// Direct entry for input layers that deliver a derived world-frame
    /// swipe angle instead of raw drag positions
    pub fn swipe(&self, world_angle: f32) {
        let events = lock(&self.bat).on_swipe(world_angle);
        self.publish_all(events);
    }

    /// Release the delivery toward the marker
    pub fn bowl(&self) {
        self.bus.publish(&Event::BallBowled);
    }

    /// Restore every component to initial conditions, mid-flight included
    pub fn reset(&self) {
        self.bus.publish(&Event::Reset);
    }

    // --- physics surface --------------------------------------------------

    /// Discrete collision-begin notification from the external physics layer
    pub fn ball_collision(&self, surface: Surface) {
        let events = match surface {
            Surface::Ground => lock(&self.ball).on_ground_collision(),
            Surface::Stump(id) => lock(&self.ball).on_stump_collision(id),
        };
        self.publish_all(events);
    }

    /// Trigger-enter notification for the hit-zone volume
    pub fn hit_zone_enter(&self) {
        let events = lock(&self.ball).on_hit_zone_enter();
        self.publish_all(events);
    }

    /// Trigger-exit notification for the hit-zone volume
    pub fn hit_zone_exit(&self) {
        let events = lock(&self.ball).on_hit_zone_exit();
        self.publish_all(events);
    }

    /// Per-tick kinematic mirror from the external integrator
    pub fn sync_ball(&self, position: Vec3, velocity: Vec3) {
        lock(&self.ball).sync_from_physics(position, velocity);
    }

    // --- parameter sliders ------------------------------------------------

    /// Set the ball speed from a normalized [0,1] slider position. Returns
    /// the display-unit (kmph) speed for the UI readout.
    pub fn set_ball_speed(&self, slider: f32) -> f32 {
        let t = slider.clamp(0.0, 1.0);
        let g = &self.config.gameplay;
        let speed = scale_to_range(t, g.min_ball_speed, g.max_ball_speed);
        self.bus.publish(&Event::ParamUpdated {
            param: SessionParam::BallSpeed(speed),
        });
        scale_to_range(t, g.min_display_ball_speed, g.max_display_ball_speed)
    }

    /// Set the bat speed from a normalized [0,1] slider position. Returns
    /// the display-unit (kmph) speed for the UI readout.
    pub fn set_bat_speed(&self, slider: f32) -> f32 {
        let t = slider.clamp(0.0, 1.0);
        let g = &self.config.gameplay;
        let speed = scale_to_range(t, g.min_bat_speed, g.max_bat_speed);
        self.bus.publish(&Event::ParamUpdated {
            param: SessionParam::BatSpeed(speed),
        });
        scale_to_range(t, g.min_display_bat_speed, g.max_display_bat_speed)
    }

    /// Toggle the shot between grounded and lofted. Returns the elevation
    /// (degrees) actually applied.
    pub fn set_bat_elevation(&self, lofted: bool) -> f32 {
        let g = &self.config.gameplay;
        let elevation = if lofted {
            g.max_bat_elevation
        } else {
            g.min_bat_elevation
        };
        self.bus.publish(&Event::ParamUpdated {
            param: SessionParam::BatElevation(elevation),
        });
        elevation
    }

    /// Select the next delivery's type
    pub fn set_ball_type(&self, ball_type: BallType) {
        self.bus.publish(&Event::ParamUpdated {
            param: SessionParam::BallType(ball_type),
        });
    }

    // --- display accessors ------------------------------------------------

    pub fn ball(&self) -> BallSnapshot {
        lock(&self.ball).snapshot()
    }

    pub fn bat(&self) -> BatSnapshot {
        lock(&self.bat).snapshot()
    }

    pub fn marker(&self) -> MarkerSnapshot {
        lock(&self.marker).snapshot()
    }

    pub fn stump(&self, id: StumpId) -> StumpSnapshot {
        lock(&self.stumps[stump_index(id)]).snapshot()
    }
}

/// Publish events produced inside a bus handler. The weak handle breaks the
/// bus -> handler -> bus reference cycle.
fn publish_follow_ons(bus: &Weak<EventBus>, events: Vec<Event>) {
    if let Some(bus) = bus.upgrade() {
        for event in &events {
            bus.publish(event);
        }
    }
}

/// Map a normalized [0,1] value into [min, max]
fn scale_to_range(t: f32, min: f32, max: f32) -> f32 {
    (max - min) * t + min
}

fn malformed_payload(expected: &str, got: &Event) {
    debug_assert!(false, "wrong payload routed to {expected}: {got:?}");
    log::warn!("ignoring wrong payload routed to {expected}: {got:?}");
}
