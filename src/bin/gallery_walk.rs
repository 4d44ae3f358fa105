//! Headless Gallery Walk
//!
//! Run with: `cargo run --bin gallery_walk [config.json]`
//!
//! Drives a scripted visit through the navigation core without a window:
//! glide across the hall in exhibit mode, switch to first person, turn to
//! the entrance, open the door and walk through while two guides patrol.
//! Set `RUST_LOG=debug` to see door, mode and guide events.

use std::process::ExitCode;

use art_gallery_engine::config::GalleryConfig;
use art_gallery_engine::input::{IntentState, KeyCode};
use art_gallery_engine::session::{FrameOutput, GallerySession};
use glam::Vec2;

const DT: f32 = 1.0 / 60.0;

/// One leg of the visit.
enum Step {
    /// Click the floor at a viewport point
    Click(Vec2),
    /// Press and release a key
    Tap(KeyCode),
    /// Hold or release a key
    Hold(KeyCode, bool),
    /// Raw pointer motion in pixels
    Look(f32, f32),
    /// Let frames run
    Wait(f32),
}

fn script(config: &GalleryConfig) -> Vec<Step> {
    // Half a turn at the configured look sensitivity
    let half_turn_px = std::f32::consts::PI / config.fps.sensitivity;
    vec![
        Step::Wait(0.5),
        Step::Click(Vec2::new(0.5, 0.95)),
        Step::Wait(2.0),
        Step::Tap(KeyCode::Digit2),
        Step::Look(half_turn_px, 0.0),
        Step::Hold(KeyCode::W, true),
        Step::Wait(3.5),
        Step::Tap(KeyCode::E),
        Step::Wait(1.5),
        Step::Hold(KeyCode::ShiftLeft, true),
        Step::Wait(1.0),
        Step::Hold(KeyCode::ShiftLeft, false),
        Step::Hold(KeyCode::W, false),
        Step::Wait(1.0),
    ]
}

fn summarize(session: &GallerySession, out: &FrameOutput, frame: u64) {
    log::info!(
        "frame {frame:>4} {:?} camera ({:.2}, {:.2}, {:.2}) door {:?}",
        out.mode,
        out.camera.position.x,
        out.camera.position.y,
        out.camera.position.z,
        out.door_state,
    );
    for ((i, agent), guide) in out.agents.iter().enumerate().zip(session.guides()) {
        log::info!(
            "           {} ({i}) at ({:.2}, {:.2}) facing {:.0}°, waypoint {}{}",
            guide.name(),
            agent.position.x,
            agent.position.z,
            agent.facing.to_degrees(),
            guide.waypoint_index(),
            if guide.is_dwelling() { " (dwelling)" } else { "" }
        );
    }
}

/// Tick the session for `seconds` of simulated time.
fn run_for(session: &mut GallerySession, intent: &mut IntentState, seconds: f32) {
    let frames = (seconds / DT).round().max(1.0) as u32;
    for _ in 0..frames {
        let out = session.tick(intent, DT);
        for event in &out.events {
            log::info!("event: {event:?}");
        }
        if session.frame_count() % 30 == 0 {
            summarize(session, &out, session.frame_count());
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("===========================================");
    println!("   Gallery Walk - headless visit");
    println!("===========================================");
    println!();

    let config = match std::env::args().nth(1) {
        Some(path) => match GalleryConfig::from_path(&path) {
            Ok(config) => config,
            Err(err) => {
                log::error!("{path}: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => GalleryConfig::default(),
    };

    let steps = script(&config);
    let mut session = match GallerySession::new(config) {
        Ok(session) => session,
        Err(err) => {
            log::error!("cannot start session: {err}");
            return ExitCode::FAILURE;
        }
    };
    let mut intent = IntentState::new();

    for step in steps {
        match step {
            Step::Click(at) => intent.click_at(at),
            Step::Tap(key) => {
                intent.handle_key(key, true);
                intent.handle_key(key, false);
            }
            Step::Hold(key, down) => {
                intent.handle_key(key, down);
            }
            Step::Look(dx, dy) => intent.add_look_delta(dx, dy),
            Step::Wait(seconds) => run_for(&mut session, &mut intent, seconds),
        }
    }
    // Flush the last queued step
    run_for(&mut session, &mut intent, DT);

    let pose = session.camera();
    println!();
    println!(
        "Visit finished after {} frames at ({:.2}, {:.2}, {:.2}), door {:?} ({})",
        session.frame_count(),
        pose.position.x,
        pose.position.y,
        pose.position.z,
        session.door().state(),
        if session.door().is_open() { "passable" } else { "blocked" }
    );
    ExitCode::SUCCESS
}
