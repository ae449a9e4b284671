//! Trick and combo scoring
//!
//! Tricks queue up while airborne and are only scored when the rider lands.
//! The combo multiplier persists between jumps, decays on the ground, and
//! resets on a crash.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, FRAC_PI_8};

use serde::{Deserialize, Serialize};

use super::rider::Rider;
use crate::normalize_angle;
use crate::tuning::TrickTuning;

/// What a trick does to the rider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RiderAction {
    Flip(f32),
    Spin(f32),
    None,
}

/// Static trick table entry
#[derive(Debug, Clone, Copy)]
pub struct TrickSpec {
    pub name: &'static str,
    pub points: u32,
    pub action: RiderAction,
}

/// The closed set of tricks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrickKind {
    Backflip,
    Frontflip,
    Spin360,
    Grab,
}

impl TrickKind {
    pub const ALL: [TrickKind; 4] = [
        TrickKind::Backflip,
        TrickKind::Frontflip,
        TrickKind::Spin360,
        TrickKind::Grab,
    ];

    pub fn spec(self) -> TrickSpec {
        match self {
            TrickKind::Backflip => TrickSpec {
                name: "Backflip",
                points: 150,
                action: RiderAction::Flip(1.0),
            },
            TrickKind::Frontflip => TrickSpec {
                name: "Frontflip",
                points: 150,
                action: RiderAction::Flip(-1.0),
            },
            TrickKind::Spin360 => TrickSpec {
                name: "360 Spin",
                points: 200,
                action: RiderAction::Spin(1.0),
            },
            TrickKind::Grab => TrickSpec {
                name: "Method Grab",
                points: 100,
                action: RiderAction::None,
            },
        }
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }
}

/// One trick performed during the current jump
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrickAttempt {
    pub kind: TrickKind,
    pub base_points: u32,
    /// Same kind already appeared earlier in this combo
    pub is_repeat: bool,
}

impl TrickAttempt {
    /// Points after the repeat penalty
    pub fn points(&self, repeat_factor: f32) -> f32 {
        if self.is_repeat {
            self.base_points as f32 * repeat_factor
        } else {
            self.base_points as f32
        }
    }
}

/// Landing grade from how far the rider was from upright
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LandingQuality {
    /// No tricks queued; air-time bonus only
    Clean,
    Perfect,
    Good,
    Sloppy,
    Crash,
}

impl LandingQuality {
    /// Grade a deviation from upright (radians, any sign)
    ///
    /// Boundary values fall into the stricter tier.
    pub fn grade(deviation: f32) -> Self {
        let d = deviation.abs();
        if d < FRAC_PI_8 {
            LandingQuality::Perfect
        } else if d < FRAC_PI_4 {
            LandingQuality::Good
        } else if d < FRAC_PI_2 {
            LandingQuality::Sloppy
        } else {
            LandingQuality::Crash
        }
    }

    pub fn factor(self) -> f32 {
        match self {
            LandingQuality::Clean => 1.0,
            LandingQuality::Perfect => 1.5,
            LandingQuality::Good => 1.2,
            LandingQuality::Sloppy => 0.8,
            LandingQuality::Crash => 0.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LandingQuality::Clean => "Clean",
            LandingQuality::Perfect => "Perfect!",
            LandingQuality::Good => "Good",
            LandingQuality::Sloppy => "Sloppy",
            LandingQuality::Crash => "Bail",
        }
    }
}

/// Air-time bonus tier
pub fn air_time_bonus(air_time: f32) -> f32 {
    if air_time >= 2.5 {
        2.0
    } else if air_time >= 1.5 {
        1.5
    } else if air_time >= 0.8 {
        1.2
    } else {
        1.0
    }
}

/// Result of a landing judgement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landing {
    /// Points awarded; 0 with `Crash` quality means the combo was lost
    pub points: u32,
    pub quality: LandingQuality,
    pub tricks: usize,
}

/// In-flight trick sequence plus the persistent multiplier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComboState {
    pub tricks: Vec<TrickAttempt>,
    /// Persistent multiplier in [1.0, max]
    pub multiplier: f32,
    pub tricks_landed: u32,
    pub best_multiplier: f32,
}

impl Default for ComboState {
    fn default() -> Self {
        Self {
            tricks: Vec::new(),
            multiplier: 1.0,
            tricks_landed: 0,
            best_multiplier: 1.0,
        }
    }
}

/// Trick input, combo bookkeeping, and landing scores
#[derive(Debug, Clone)]
pub struct TrickEngine {
    combo: ComboState,
    tuning: TrickTuning,
    last_landing: Option<Landing>,
}

impl TrickEngine {
    pub fn new(tuning: TrickTuning) -> Self {
        Self {
            combo: ComboState::default(),
            tuning,
            last_landing: None,
        }
    }

    /// Perform a trick. Ignored unless the rider has been airborne long enough.
    ///
    /// Returns whether the trick was recorded.
    pub fn handle_input(&mut self, kind: TrickKind, rider: &mut Rider) -> bool {
        if !rider.is_airborne() || rider.air_time() < self.tuning.min_air_time {
            return false;
        }

        let spec = kind.spec();
        match spec.action {
            RiderAction::Flip(direction) => rider.perform_flip(direction),
            RiderAction::Spin(direction) => rider.perform_spin(direction),
            RiderAction::None => {}
        }

        let is_repeat = self.combo.tricks.iter().any(|t| t.kind == kind);
        self.combo.tricks.push(TrickAttempt {
            kind,
            base_points: spec.points,
            is_repeat,
        });
        true
    }

    /// Passive multiplier decay while grounded. Never scores.
    pub fn update(&mut self, dt: f32, airborne: bool) {
        if !airborne && self.combo.multiplier > 1.0 {
            self.combo.multiplier = (self.combo.multiplier - dt * self.tuning.multiplier_decay).max(1.0);
        }
    }

    /// Judge a touchdown and score the queued tricks
    ///
    /// `air_time` and `rotation` are the rider's values just before touchdown.
    pub fn land(&mut self, air_time: f32, rotation: f32) -> Landing {
        let count = self.combo.tricks.len();

        let landing = if count == 0 {
            let points = (air_time * self.tuning.clean_points_per_second).round() as u32;
            Landing {
                points,
                quality: LandingQuality::Clean,
                tricks: 0,
            }
        } else {
            let quality = LandingQuality::grade(normalize_angle(rotation));
            if quality == LandingQuality::Crash {
                self.combo.multiplier = 1.0;
                Landing {
                    points: 0,
                    quality,
                    tricks: count,
                }
            } else {
                let base: f32 = self
                    .combo
                    .tricks
                    .iter()
                    .map(|t| t.points(self.tuning.repeat_factor))
                    .sum();
                let combo_bonus = 1.0 + self.tuning.combo_bonus * (count - 1) as f32;
                let score = base
                    * self.combo.multiplier
                    * combo_bonus
                    * air_time_bonus(air_time)
                    * quality.factor();

                self.combo.tricks_landed += count as u32;
                self.combo.multiplier = (self.combo.multiplier
                    + self.tuning.multiplier_step
                    + self.tuning.multiplier_per_trick * count as f32)
                    .min(self.tuning.max_multiplier);
                self.combo.best_multiplier = self.combo.best_multiplier.max(self.combo.multiplier);

                Landing {
                    points: score.round() as u32,
                    quality,
                    tricks: count,
                }
            }
        };

        self.combo.tricks.clear();
        log::debug!(
            "Landing: {} tricks, {} ({} pts), multiplier x{:.1}",
            landing.tricks,
            landing.quality.label(),
            landing.points,
            self.combo.multiplier
        );
        self.last_landing = Some(landing);
        landing
    }

    /// Lose the combo without scoring (crash or botched flip)
    pub fn wipeout(&mut self) {
        self.combo.tricks.clear();
        self.combo.multiplier = 1.0;
    }

    pub fn current_tricks(&self) -> &[TrickAttempt] {
        &self.combo.tricks
    }

    /// "Backflip + 360 Spin"
    pub fn combo_label(&self) -> String {
        self.combo
            .tricks
            .iter()
            .map(|t| t.kind.name())
            .collect::<Vec<_>>()
            .join(" + ")
    }

    /// Points the queued tricks would pay at the current multiplier, before
    /// landing bonuses
    pub fn pending_score(&self) -> u32 {
        let base: f32 = self
            .combo
            .tricks
            .iter()
            .map(|t| t.points(self.tuning.repeat_factor))
            .sum();
        (base * self.combo.multiplier).round() as u32
    }

    pub fn multiplier(&self) -> f32 {
        self.combo.multiplier
    }

    pub fn best_multiplier(&self) -> f32 {
        self.combo.best_multiplier
    }

    pub fn tricks_landed(&self) -> u32 {
        self.combo.tricks_landed
    }

    pub fn last_landing(&self) -> Option<Landing> {
        self.last_landing
    }

    pub fn combo(&self) -> &ComboState {
        &self.combo
    }
}
