//! Read-only views of a run for the presentation layer
//!
//! Both are rebuilt on demand from `GameState` and serialize to JSON for the
//! web host. The core never calls into drawing code.

use serde::{Deserialize, Serialize};

use crate::consts::SPEED_DISPLAY_SCALE;
use crate::round_tenths;
use crate::settings::Appearance;
use crate::sim::{GamePhase, GameState, Obstacle, Particle, Rail, Ramp, TrickAttempt};

/// HUD fields, recomputed every tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudProjection {
    pub score: u64,
    /// Meters-equivalent
    pub distance: f32,
    pub speed_kmh: f32,
    /// One decimal place
    pub combo_multiplier: f32,
    pub tricks_landed: u32,
    pub best_combo: f32,
    /// In-flight tricks, e.g. "Backflip + Method Grab"
    pub combo_label: String,
    pub pending_score: u32,
    pub phase: GamePhase,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiderView {
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    pub is_airborne: bool,
    pub is_grinding: bool,
    pub is_invincible: bool,
    /// Active flip completion, if flipping
    pub flip_progress: Option<f32>,
    pub particles: Vec<Particle>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainView {
    pub ground_level: f32,
    pub ramps: Vec<Ramp>,
    pub rails: Vec<Rail>,
    pub obstacles: Vec<Obstacle>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrickView {
    pub current: Vec<TrickAttempt>,
    pub combo_multiplier: f32,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub rider: RiderView,
    pub terrain: TerrainView,
    pub tricks: TrickView,
    pub appearance: Appearance,
}

impl GameState {
    pub fn hud(&self) -> HudProjection {
        HudProjection {
            score: self.score,
            distance: self.distance,
            speed_kmh: self.rider.vel.y.abs() * SPEED_DISPLAY_SCALE,
            combo_multiplier: round_tenths(self.tricks.multiplier()),
            tricks_landed: self.tricks.tricks_landed(),
            best_combo: round_tenths(self.tricks.best_multiplier()),
            combo_label: self.tricks.combo_label(),
            pending_score: self.tricks.pending_score(),
            phase: self.phase,
        }
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        let rider = &self.rider;
        RenderSnapshot {
            rider: RiderView {
                x: rider.pos.x,
                y: rider.pos.y,
                rotation: rider.rotation,
                is_airborne: rider.is_airborne(),
                is_grinding: rider.is_grinding(),
                is_invincible: rider.is_invincible(),
                flip_progress: rider.flip().map(|f| f.progress()),
                particles: rider.particles().to_vec(),
            },
            terrain: TerrainView {
                ground_level: self.terrain.ground_level(),
                ramps: self.terrain.ramps().to_vec(),
                rails: self.terrain.rails().to_vec(),
                obstacles: self.terrain.obstacles().to_vec(),
            },
            tricks: TrickView {
                current: self.tricks.current_tricks().to_vec(),
                combo_multiplier: self.tricks.multiplier(),
            },
            appearance: self.appearance.clone(),
        }
    }
}
