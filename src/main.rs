//! Gully Cricket entry point
//!
//! Runs one scripted delivery end to end: aim the marker, set the sliders,
//! bowl, swing when the ball reaches the hit window, and report what every
//! published event said along the way. Pass a JSON config path to override
//! the built-in tuning.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use glam::Vec2;

use gully_cricket::config::{ConfigError, GameConfig};
use gully_cricket::consts::SIM_DT;
use gully_cricket::session::Session;
use gully_cricket::sim::{BallType, StumpId, WorldDriver};
use gully_cricket::EventKind;

fn main() -> Result<(), ConfigError> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => GameConfig::load(&path)?,
        None => GameConfig::default(),
    };

    let session = Session::new(config.clone())?;
    let mut world = WorldDriver::new(&config);

    // Tap the full event stream the way a rendering/audio layer would
    for kind in EventKind::ALL {
        session.bus().subscribe_fn(kind, |event| {
            println!("event: {event:?}");
        });
    }

    // Swing as soon as the ball enters the hit window
    let swing_now = Arc::new(AtomicBool::new(false));
    {
        let swing_now = swing_now.clone();
        session.bus().subscribe_fn(EventKind::BallEnteredHitZone, move |_| {
            swing_now.store(true, Ordering::SeqCst);
        });
    }

    // Line up the delivery
    let ball_kmph = session.set_ball_speed(0.6);
    let bat_kmph = session.set_bat_speed(0.7);
    session.set_bat_elevation(true);
    session.set_ball_type(BallType::LegSpin);
    println!("ball {ball_kmph:.0} kmph, bat {bat_kmph:.0} kmph, lofted leg spin");

    session.marker_drag_begin(Vec2::ZERO);
    session.marker_drag(Vec2::new(40.0, 80.0));
    session.bowl();

    let mut swung = false;
    for tick in 0..1200 {
        world.step(&session, SIM_DT);

        if !swung && swing_now.load(Ordering::SeqCst) {
            swung = true;
            // A 45-degree screen swipe, long enough to register
            session.bat_swipe_begin(Vec2::new(200.0, 200.0));
            session.bat_swipe_drag(Vec2::new(280.0, 280.0));
        }

        let ball = session.ball();
        if tick % 60 == 0 {
            log::debug!(
                "t={:.2}s pos={:?} phase={:?}",
                tick as f32 * SIM_DT,
                ball.position,
                ball.phase
            );
        }
    }

    let ball = session.ball();
    println!(
        "delivery over: phase {:?}, bounce angle {:?}, resting at {:?}",
        ball.phase, ball.bounce_angle, ball.position
    );
    for id in StumpId::ALL {
        let stump = session.stump(id);
        if stump.gravity {
            println!("{id:?} stump is down");
        }
    }

    // And back to the top of the run-up
    session.reset();
    world.reset();
    println!("reset complete, marker at {:?}", session.marker().position);
    Ok(())
}
