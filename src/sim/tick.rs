//! Per-frame simulation tick
//!
//! Advances one run by a clamped wall-clock delta. Order per tick: trick
//! keys, rider physics, queued flip, terrain scroll, one collision, combo
//! decay, distance.

use super::collision::CollisionEvent;
use super::rider::RiderInput;
use super::state::{CrashCause, GameEvent, GamePhase, GameState};
use super::tricks::TrickKind;
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump key held
    pub jump: bool,
    /// Flip requested while grounded; fires once the rider is airborne long
    /// enough. Level-triggered: stays set while the key is held.
    pub queued_flip: bool,
    /// Trick keys pressed since the last tick, in order
    pub tricks: Vec<TrickKind>,
    /// Demo mode - AI rides
    pub autopilot: bool,
}

/// Advance the run by `wall_dt` seconds (clamped to `MAX_FRAME_DT`)
pub fn tick(state: &mut GameState, input: &TickInput, wall_dt: f32) {
    state.events.clear();

    if state.phase != GamePhase::Running {
        return;
    }

    let dt = wall_dt.clamp(0.0, MAX_FRAME_DT);
    state.difficulty = 1.0 + state.distance / DIFFICULTY_DISTANCE;

    let input = if input.autopilot {
        autopilot(state)
    } else {
        input.clone()
    };

    for kind in &input.tricks {
        state.handle_trick(*kind);
    }

    let was_airborne = state.rider.is_airborne();
    state.rider.update(dt, RiderInput { jump: input.jump });
    if !was_airborne && state.rider.is_airborne() {
        state.events.push(GameEvent::Jumped);
    }

    dispatch_queued_flip(state, input.queued_flip);

    state
        .terrain
        .update(dt, state.rider.vel.y, state.difficulty);

    let airborne = state.rider.is_airborne();
    if let Some(event) = state.terrain.check_collision(&state.rider, airborne) {
        handle_collision(state, event);
    }

    // Crash ends the tick
    if state.phase != GamePhase::Running {
        return;
    }

    state.tricks.update(dt, state.rider.is_airborne());
    state.distance += state.rider.vel.y.abs() * dt * DISTANCE_SCALE;
}

/// Fire the held flip once per press, as soon as tricks are allowed
fn dispatch_queued_flip(state: &mut GameState, queued_flip: bool) {
    if !queued_flip {
        state.flip_dispatched = false;
        return;
    }
    if state.flip_dispatched || !state.rider.is_airborne() {
        return;
    }
    if state.rider.air_time() >= state.tuning.tricks.min_air_time {
        state.flip_dispatched = true;
        state.handle_trick(TrickKind::Backflip);
    }
}

/// Apply one terrain contact to the run
pub fn handle_collision(state: &mut GameState, event: CollisionEvent) {
    match event {
        CollisionEvent::Ground { .. } => {
            let incomplete_flip = state.rider.flip().is_some_and(|f| f.progress() < 0.5);
            // Land resets both, so the judgement needs them first
            let air_time = state.rider.air_time();
            let rotation = state.rider.rotation;

            state.rider.land(0.0);

            if incomplete_flip {
                if state.mode.has_obstacles() {
                    state.crash(CrashCause::IncompleteFlip);
                } else {
                    state.tricks.wipeout();
                    state.events.push(GameEvent::Wipeout);
                }
                return;
            }

            let landing = state.tricks.land(air_time, rotation);
            state.score += landing.points as u64;
            state.events.push(GameEvent::Landed {
                points: landing.points,
                quality: landing.quality,
            });
        }
        CollisionEvent::Ramp { boost } => {
            state.rider.hit_ramp(boost);
            state.rider.grant_invincibility();
            state.events.push(GameEvent::RampLaunch { boost });
            log::debug!("Ramp launch x{:.2}", boost);
        }
        CollisionEvent::Obstacle { kind } => {
            if !state.rider.is_invincible() {
                state.crash(CrashCause::Obstacle(kind));
            }
        }
        CollisionEvent::Rail { y, .. } => {
            state.rider.grind_rail(y);
            let points = state.tuning.tricks.rail_bonus;
            state.score += points as u64;
            state.events.push(GameEvent::RailBonus { points });
        }
    }
}

/// Jump obstacles, flip when there is air for it, grab otherwise
fn autopilot(state: &GameState) -> TickInput {
    let rider = &state.rider;
    let mut input = TickInput::default();

    if rider.is_grounded() {
        let front = rider.bounds().right;
        input.jump = state
            .terrain
            .obstacles()
            .iter()
            .any(|o| o.x > front && o.x - front < 150.0);
        return input;
    }

    if rider.air_time() < state.tuning.tricks.min_air_time || !state.tricks.current_tricks().is_empty() {
        return input;
    }

    // Ballistic estimate, ignoring air resistance
    let gravity = state.tuning.rider.gravity;
    let drop = (rider.lane_y() - rider.pos.y).max(0.0);
    let vy = rider.vel.y;
    let time_left = (vy + (vy * vy + 2.0 * gravity * drop).sqrt()) / gravity;

    let kind = if rider.flip().is_none() && time_left > state.tuning.rider.flip_duration + 0.1 {
        TrickKind::Backflip
    } else {
        TrickKind::Grab
    };
    input.tricks.push(kind);
    input
}
