//! End-to-end delivery scenarios across the whole session wiring

use std::sync::{Arc, Mutex};

use glam::{Vec2, Vec3};

use gully_cricket::config::GameConfig;
use gully_cricket::consts::SIM_DT;
use gully_cricket::session::{Session, Surface};
use gully_cricket::sim::{BallType, DeliveryPhase, StumpId, WorldDriver};
use gully_cricket::{Event, EventKind, forward_from_angles};

fn record(session: &Session, kinds: &[EventKind]) -> Arc<Mutex<Vec<Event>>> {
    let log: Arc<Mutex<Vec<Event>>> = Arc::new(Mutex::new(Vec::new()));
    for &kind in kinds {
        let sink = log.clone();
        session.bus().subscribe_fn(kind, move |event| {
            sink.lock().unwrap().push(event.clone());
        });
    }
    log
}

/// Config trimmed for hand-computed assertions: ball released from the
/// origin, marker defaulting to a known (1, 0, 6) aim point.
fn flat_config() -> GameConfig {
    let mut config = GameConfig::default();
    config.pitch.ball_start = Vec3::ZERO;
    config.pitch.marker_default = Vec3::new(1.0, 0.0, 6.0);
    config.gameplay.min_bat_elevation = 0.0;
    config
}

#[test]
fn straight_delivery_bounces_without_deflection() {
    let session = Session::new(flat_config()).unwrap();
    let events = record(&session, &[EventKind::BallBounced]);

    session.set_ball_speed(0.0); // slider zero -> min speed 10
    session.set_ball_type(BallType::Straight);
    session.bowl();

    let direction = Vec3::new(1.0, 0.0, 6.0).normalize();
    assert!((session.ball().velocity - direction * 10.0).length() < 1e-4);

    // The physics layer reports first ground contact at the pitch point
    session.sync_ball(Vec3::new(1.0, 0.0, 6.0), Vec3::ZERO);
    session.ball_collision(Surface::Ground);

    assert_eq!(*events.lock().unwrap(), vec![Event::BallBounced]);
    let ball = session.ball();
    assert_eq!(ball.phase, DeliveryPhase::FirstBounceConsumed);
    assert!(ball.gravity);
    // Straight ball, flat aim: spin_by = direction.x, so the flight
    // direction is unchanged by the bounce
    assert!((ball.velocity.normalize() - direction).length() < 1e-4);
}

#[test]
fn swing_in_window_reverses_the_ball() {
    let session = Session::new(flat_config()).unwrap();
    session.set_bat_elevation(false); // 0 degrees, for clean vector math
    let events = record(
        &session,
        &[EventKind::BatSwingArmed, EventKind::BatSwingApplied],
    );

    session.set_ball_speed(0.0); // min speed 10
    session.set_bat_speed(0.0); // min bat speed 5
    session.bowl();
    session.hit_zone_enter();

    // 45-degree screen swipe: world angle = -(45 + 90) = -135
    session.bat_swipe_begin(Vec2::new(100.0, 100.0));
    session.bat_swipe_drag(Vec2::new(180.0, 180.0));

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 2);
    match events[0] {
        Event::BatSwingArmed { angle } => assert!((angle - (-135.0)).abs() < 1e-3),
        ref other => panic!("expected BatSwingArmed first, got {other:?}"),
    }
    let direction = match events[1] {
        Event::BatSwingApplied { direction, .. } => direction,
        ref other => panic!("expected BatSwingApplied second, got {other:?}"),
    };
    assert!((direction - forward_from_angles(-135.0, 0.0)).length() < 1e-3);

    // Velocity was zeroed, then the return impulse applied:
    // hit_speed = 10/2 + 5 = 9 along the negated swing direction
    let ball = session.ball();
    assert_eq!(ball.phase, DeliveryPhase::Hit);
    assert!((ball.velocity - (-direction * 9.0)).length() < 1e-3);
    assert!(ball.gravity, "a ball hit on the full must fall");
}

#[test]
fn swing_outside_window_is_spent_for_the_delivery() {
    let session = Session::new(flat_config()).unwrap();
    let applied = record(&session, &[EventKind::BatSwingApplied]);

    session.bowl();
    session.swipe(-135.0);
    assert!(session.bat().armed);
    assert_eq!(session.ball().phase, DeliveryPhase::Thrown);

    // Entering the window later must not revive the spent swing
    session.hit_zone_enter();
    session.swipe(-135.0);
    session.swipe(-90.0);
    assert!(applied.lock().unwrap().is_empty());
    assert_eq!(session.ball().phase, DeliveryPhase::Thrown);
}

#[test]
fn full_delivery_through_the_world_driver() {
    let config = GameConfig::default();
    let session = Session::new(config.clone()).unwrap();
    let mut world = WorldDriver::new(&config);
    let events = record(
        &session,
        &[
            EventKind::BallBounced,
            EventKind::BallEnteredHitZone,
            EventKind::StumpHit,
        ],
    );

    session.set_ball_type(BallType::Straight);
    session.bowl();
    for _ in 0..600 {
        world.step(&session, SIM_DT);
    }

    let events = events.lock().unwrap();
    assert!(events.contains(&Event::BallBounced));
    assert!(events.contains(&Event::BallEnteredHitZone));
    assert!(events.contains(&Event::StumpHit {
        stump: StumpId::Middle
    }));
    // Bounce must have happened before the stumps were hit
    let bounce_at = events.iter().position(|e| *e == Event::BallBounced);
    let stumps_at = events.iter().position(|e| {
        matches!(e, Event::StumpHit { .. })
    });
    assert!(bounce_at < stumps_at);
    assert!(session.stump(StumpId::Middle).gravity);
}

#[test]
fn leg_spin_deflects_off_the_pitch() {
    let mut config = GameConfig::default();
    config.pitch.marker_default = Vec3::new(0.0, 0.0, 5.0);
    let session = Session::new(config.clone()).unwrap();
    let mut world = WorldDriver::new(&config);

    session.set_ball_type(BallType::LegSpin);
    session.bowl();
    for _ in 0..600 {
        world.step(&session, SIM_DT);
    }

    // The delivery pitched straight but finished off to one side
    let ball = session.ball();
    assert_eq!(ball.phase, DeliveryPhase::FirstBounceConsumed);
    assert!(ball.position.x > 0.05, "leg spin should kick laterally");
}

#[test]
fn reset_mid_flight_restores_every_component() {
    let config = GameConfig::default();
    let session = Session::new(config.clone()).unwrap();
    let mut world = WorldDriver::new(&config);

    session.marker_drag_begin(Vec2::ZERO);
    session.marker_drag(Vec2::new(60.0, -40.0));
    session.bowl();
    for _ in 0..200 {
        world.step(&session, SIM_DT);
    }
    session.hit_zone_enter();
    session.swipe(-120.0);
    assert_eq!(session.ball().phase, DeliveryPhase::Hit);

    session.reset();
    world.reset();

    let ball = session.ball();
    assert_eq!(ball.phase, DeliveryPhase::Idle);
    assert_eq!(ball.velocity, Vec3::ZERO);
    assert_eq!(ball.position, config.pitch.ball_start);
    assert!(!ball.gravity);
    assert!(ball.bounce_angle.is_none());
    assert!(!session.bat().armed);
    assert!(!session.bat().in_hit_window);
    assert!(!session.marker().locked);
    assert_eq!(session.marker().position, config.pitch.marker_default);

    // The session is immediately bowlable again
    session.bowl();
    assert_eq!(session.ball().phase, DeliveryPhase::Thrown);
}

#[test]
fn two_consecutive_deliveries_are_independent() {
    let config = GameConfig::default();
    let session = Session::new(config.clone()).unwrap();
    let mut world = WorldDriver::new(&config);

    session.bowl();
    for _ in 0..600 {
        world.step(&session, SIM_DT);
    }
    assert!(session.stump(StumpId::Middle).gravity);

    session.reset();
    world.reset();

    // Same script, same outcome
    session.bowl();
    for _ in 0..600 {
        world.step(&session, SIM_DT);
    }
    assert!(session.stump(StumpId::Middle).gravity);
    assert_eq!(
        session.ball().phase,
        DeliveryPhase::FirstBounceConsumed
    );
}
