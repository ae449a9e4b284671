//! Powder Run - A side-scrolling snowboarding arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (rider physics, terrain, tricks, game loop)
//! - `ui`: Read-only snapshots and HUD projection for the presentation layer
//! - `platform`: Browser/native platform abstraction (input mapping, wasm facade)
//! - `settings`: Player preferences (game mode, rider colors)
//! - `tuning`: Data-driven game balance

pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use settings::{GameMode, Settings};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Worst-case frame delta fed into the simulation (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Physics tuning values are expressed per frame at this rate
    pub const REFERENCE_FPS: f32 = 60.0;

    /// Fraction of the viewport height where the ground sits
    pub const GROUND_LEVEL_FRACTION: f32 = 0.75;
    /// Rider's fixed horizontal screen position (fraction of viewport width)
    pub const RIDER_X_FRACTION: f32 = 0.2;

    /// Width of one generated terrain segment
    pub const SEGMENT_WIDTH: f32 = 600.0;
    /// Segments generated up front on a fresh field
    pub const INITIAL_SEGMENTS: usize = 10;
    /// Features whose trailing edge scrolls past this x are reclaimed
    pub const CLEANUP_THRESHOLD: f32 = -300.0;
    /// Generate when the terrain frontier is this close to the right edge
    pub const LOOKAHEAD_MARGIN: f32 = 500.0;
    /// New segments spawn this far past the right viewport edge
    pub const SPAWN_OFFSET: f32 = 600.0;

    /// Maximum snow particles attached to the rider
    pub const MAX_PARTICLES: usize = 256;

    /// Distance units per unit of scrolled ground (meters-equivalent)
    pub const DISTANCE_SCALE: f32 = 2.0;
    /// Difficulty grows by 1.0 every this many meters
    pub const DIFFICULTY_DISTANCE: f32 = 10_000.0;
    /// Speed readout conversion (lane speed to km/h)
    pub const SPEED_DISPLAY_SCALE: f32 = 3.6;
}

/// Normalize angle to (-π, π]
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    while angle > PI {
        angle -= TAU;
    }
    while angle <= -PI {
        angle += TAU;
    }
    angle
}

/// Round to one decimal place (HUD multiplier readout)
#[inline]
pub fn round_tenths(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}
