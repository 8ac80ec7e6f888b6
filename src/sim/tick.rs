//! Per-frame simulation update
//!
//! `frame` is called once per display refresh. It measures elapsed time,
//! dispatches on the session phase and tells the driver whether to schedule
//! another frame.

use super::autopilot;
use super::collision::{avatar_obstacle_collision, has_passed};
use super::obstacle::Obstacle;
use super::state::{GameEvent, GamePhase, GameState};
use super::avatar::BoundsContact;

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Flap (space/click/tap), one-shot
    pub flap: bool,
    /// Demo mode - the autopilot decides when to flap
    pub autopilot: bool,
}

/// Whether the driver should request another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Continue,
    /// Paused or game over; a resume/restart schedules a fresh frame
    Halt,
}

/// Run one display frame at timestamp `now_ms`
pub fn frame(state: &mut GameState, input: &TickInput, now_ms: f64) -> FrameStatus {
    if state.phase == GamePhase::Paused {
        return FrameStatus::Halt;
    }

    let dt_ms = state
        .last_frame_ms
        .map(|last| (now_ms - last).max(0.0) as f32)
        .unwrap_or(0.0);
    state.last_frame_ms = Some(now_ms);

    tick(state, input, dt_ms);

    match state.phase {
        GamePhase::Running | GamePhase::Idle => FrameStatus::Continue,
        GamePhase::Paused | GamePhase::GameOver => FrameStatus::Halt,
    }
}

/// Advance the session by one frame that took `dt_ms`
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    match state.phase {
        GamePhase::Running => update_running(state, input, dt_ms),
        GamePhase::Idle => {
            let rate = state.tuning.bob_rate;
            let amplitude = state.tuning.bob_amplitude;
            state.avatar.idle_bob(dt_ms, rate, amplitude);
        }
        GamePhase::Paused | GamePhase::GameOver => {}
    }
}

fn update_running(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    let wants_flap = if input.autopilot {
        autopilot::should_flap(state)
    } else {
        input.flap
    };
    if wants_flap {
        state.flap();
    }

    state.frames += 1;

    if state.avatar.integrate(state.height) == BoundsContact::Floor {
        log::debug!("Floor contact at frame {}", state.frames);
        state.game_over();
    }

    // Spawn
    state.spawn_timer_ms += dt_ms;
    if state.spawn_timer_ms > state.tuning.spawn_interval_ms {
        let id = state.next_obstacle_id();
        let obstacle = Obstacle::new(id, state.width, state.height, &state.tuning, &mut state.rng);
        log::debug!(
            "Spawned obstacle {} (gap {:.0}..{:.0})",
            id,
            obstacle.top_height,
            obstacle.bottom_y
        );
        state.obstacles.push(obstacle);
        state.spawn_timer_ms = 0.0;
    }

    let speed = state.tuning.obstacle_speed;
    for i in 0..state.obstacles.len() {
        state.obstacles[i].advance(speed);

        // After termination the frame only finishes moving obstacles
        if state.phase != GamePhase::Running {
            continue;
        }

        if let Some(kind) = avatar_obstacle_collision(&state.avatar, &state.obstacles[i]) {
            log::debug!("Hit {:?} of obstacle {}", kind, state.obstacles[i].id);
            state.game_over();
            continue;
        }

        if !state.obstacles[i].passed && has_passed(&state.avatar, &state.obstacles[i]) {
            state.obstacles[i].passed = true;
            state.score += 1;
            state.push_event(GameEvent::Scored { score: state.score });
        }
    }

    state.obstacles.retain(|o| !o.retire);
}
