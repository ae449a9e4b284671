//! Data-driven game balance
//!
//! Every physics, scoring, and generation constant lives here so a run can be
//! retuned from JSON without a rebuild. Missing fields fall back to defaults.

use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// A closed `[min, max]` range sampled uniformly during generation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn range(&self) -> RangeInclusive<f32> {
        self.min..=self.max
    }

    fn check(&self, field: &'static str) -> Result<(), TuningError> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.min > self.max {
            return Err(TuningError::Invalid {
                field,
                reason: format!("range {}..={} is empty", self.min, self.max),
            });
        }
        if self.min <= 0.0 {
            return Err(TuningError::Invalid {
                field,
                reason: format!("range must be positive, got min {}", self.min),
            });
        }
        Ok(())
    }
}

/// Rider physics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiderTuning {
    pub width: f32,
    pub height: f32,
    /// Downward acceleration while airborne (units/s²)
    pub gravity: f32,
    pub max_speed: f32,
    pub min_speed: f32,
    /// Grounded cruise speed as a fraction of `max_speed`
    pub cruise_fraction: f32,
    /// Vertical launch velocity (negative = up)
    pub launch_velocity: f32,
    /// Vertical speed retained per reference frame in the air
    pub air_resistance: f32,
    /// Rotational velocity retained per reference frame
    pub rotation_damping: f32,
    /// Grounded rotation retained per reference frame (relaxes toward flat)
    pub ground_rotation_relax: f32,
    pub jump_cooldown: f32,
    pub invincibility: f32,
    /// Vertical speed retained on touchdown
    pub landing_retention: f32,
    pub jump_spin_impulse: f32,
    pub ramp_spin_impulse: f32,
    pub flip_duration: f32,
    pub spin_impulse: f32,
    /// Grounded speed above which snow spray is emitted
    pub spray_speed: f32,
    /// Per-tick spray chance above `spray_speed`
    pub spray_chance: f64,
}

impl Default for RiderTuning {
    fn default() -> Self {
        Self {
            width: 20.0,
            height: 30.0,
            gravity: 800.0,
            max_speed: 220.0,
            min_speed: 40.0,
            cruise_fraction: 0.6,
            launch_velocity: -450.0,
            air_resistance: 0.99,
            rotation_damping: 0.95,
            ground_rotation_relax: 0.9,
            jump_cooldown: 0.2,
            invincibility: 1.0,
            landing_retention: 0.95,
            jump_spin_impulse: -1.0,
            ramp_spin_impulse: -2.0,
            flip_duration: 0.7,
            // One full turn once damping has bled it off: 2π·(1-0.95)·60
            spin_impulse: 18.85,
            spray_speed: 100.0,
            spray_chance: 0.3,
        }
    }
}

impl RiderTuning {
    /// Forced grounded speed
    pub fn cruise_speed(&self) -> f32 {
        self.max_speed * self.cruise_fraction
    }
}

/// Procedural terrain generation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainTuning {
    pub ramp_width: Span,
    pub ramp_height: Span,
    pub ramp_boost: Span,
    /// Clear run between a ramp's end and its trailing obstacle
    pub landing_gap: Span,
    pub rail_length: Span,
    pub rail_height: Span,
    /// Spacing between obstacles in a cluster
    pub cluster_spacing: Span,
    /// Chance that an obstacle is a tree rather than a rock
    pub tree_chance: f64,
    /// Zen: chance a segment carries a ramp
    pub zen_ramp_chance: f64,
    /// Adventure: chance a segment carries any feature
    pub feature_chance: f64,
    /// Adventure feature mix: ramp+obstacle, ramp, rail, obstacles (remainder empty)
    pub feature_weights: [f64; 4],
    /// Chance of a second obstacle in a cluster at difficulty 1.0
    pub double_obstacle_chance: f64,
}

impl Default for TerrainTuning {
    fn default() -> Self {
        Self {
            ramp_width: Span::new(100.0, 160.0),
            ramp_height: Span::new(50.0, 90.0),
            ramp_boost: Span::new(1.2, 1.5),
            landing_gap: Span::new(250.0, 400.0),
            rail_length: Span::new(120.0, 270.0),
            rail_height: Span::new(20.0, 45.0),
            cluster_spacing: Span::new(80.0, 120.0),
            tree_chance: 0.6,
            zen_ramp_chance: 0.5,
            feature_chance: 0.6,
            feature_weights: [0.4, 0.2, 0.15, 0.15],
            double_obstacle_chance: 0.5,
        }
    }
}

/// Trick scoring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrickTuning {
    /// Tricks are refused until the rider has been airborne this long
    pub min_air_time: f32,
    /// Clean-landing points per second of air time
    pub clean_points_per_second: f32,
    pub max_multiplier: f32,
    /// Multiplier lost per grounded second
    pub multiplier_decay: f32,
    /// Multiplier gained per successful landing
    pub multiplier_step: f32,
    /// Extra multiplier per trick in the landed combo
    pub multiplier_per_trick: f32,
    /// Bonus per extra trick in one jump
    pub combo_bonus: f32,
    /// Points paid for a trick repeated within the same combo
    pub repeat_factor: f32,
    /// Points per tick of rail contact
    pub rail_bonus: u32,
}

impl Default for TrickTuning {
    fn default() -> Self {
        Self {
            min_air_time: 0.05,
            clean_points_per_second: 25.0,
            max_multiplier: 5.0,
            multiplier_decay: 2.0,
            multiplier_step: 0.4,
            multiplier_per_trick: 0.1,
            combo_bonus: 0.5,
            repeat_factor: 0.5,
            rail_bonus: 10,
        }
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub rider: RiderTuning,
    pub terrain: TerrainTuning,
    pub tricks: TrickTuning,
}

impl Tuning {
    /// Parse and validate a JSON balance sheet
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load a JSON balance sheet from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject values that would make generation or physics degenerate
    pub fn validate(&self) -> Result<(), TuningError> {
        let r = &self.rider;
        if r.width <= 0.0 || r.height <= 0.0 {
            return Err(invalid("rider.width", "rider bounds must be positive"));
        }
        if r.min_speed <= 0.0 || r.min_speed > r.max_speed {
            return Err(invalid("rider.min_speed", "need 0 < min_speed <= max_speed"));
        }
        if r.launch_velocity >= 0.0 {
            return Err(invalid("rider.launch_velocity", "launch must point up (negative)"));
        }
        if r.gravity <= 0.0 || r.gravity.is_nan() {
            return Err(invalid("rider.gravity", "gravity must pull down (positive)"));
        }
        if r.flip_duration <= 0.0 {
            return Err(invalid("rider.flip_duration", "flip duration must be positive"));
        }
        for (field, factor) in [
            ("rider.air_resistance", r.air_resistance),
            ("rider.rotation_damping", r.rotation_damping),
            ("rider.ground_rotation_relax", r.ground_rotation_relax),
        ] {
            if !(0.0..=1.0).contains(&factor) {
                return Err(invalid(field, "per-frame retention must be within 0..=1"));
            }
        }

        let t = &self.terrain;
        t.ramp_width.check("terrain.ramp_width")?;
        t.ramp_height.check("terrain.ramp_height")?;
        t.ramp_boost.check("terrain.ramp_boost")?;
        t.landing_gap.check("terrain.landing_gap")?;
        t.rail_length.check("terrain.rail_length")?;
        t.rail_height.check("terrain.rail_height")?;
        t.cluster_spacing.check("terrain.cluster_spacing")?;
        // A ramp, its landing gap, and the widest obstacle must fit in one segment
        let combo_span = t.ramp_width.max + t.landing_gap.max + 30.0;
        if combo_span >= crate::consts::SEGMENT_WIDTH {
            return Err(invalid(
                "terrain.landing_gap",
                format!("ramp + landing gap spans {combo_span}, beyond one segment"),
            ));
        }
        if t.rail_length.max >= crate::consts::SEGMENT_WIDTH {
            return Err(invalid(
                "terrain.rail_length",
                format!("rail of {} spans beyond one segment", t.rail_length.max),
            ));
        }
        let cluster_span = t.cluster_spacing.max + 30.0;
        if cluster_span >= crate::consts::SEGMENT_WIDTH {
            return Err(invalid(
                "terrain.cluster_spacing",
                format!("obstacle cluster spans {cluster_span}, beyond one segment"),
            ));
        }
        for (field, chance) in [
            ("rider.spray_chance", r.spray_chance),
            ("terrain.tree_chance", t.tree_chance),
            ("terrain.zen_ramp_chance", t.zen_ramp_chance),
            ("terrain.feature_chance", t.feature_chance),
            ("terrain.double_obstacle_chance", t.double_obstacle_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(invalid(field, format!("probability {chance} outside 0..=1")));
            }
        }
        if t.feature_weights.iter().any(|w| *w < 0.0) || t.feature_weights.iter().sum::<f64>() > 1.0 {
            return Err(invalid(
                "terrain.feature_weights",
                "weights must be non-negative and sum to at most 1",
            ));
        }

        let k = &self.tricks;
        if k.max_multiplier < 1.0 {
            return Err(invalid("tricks.max_multiplier", "cap must be at least 1.0"));
        }
        if k.min_air_time < 0.0 {
            return Err(invalid("tricks.min_air_time", "must not be negative"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> TuningError {
    TuningError::Invalid {
        field,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_overrides() {
        let tuning = Tuning::from_json(r#"{ "rider": { "gravity": 900.0 } }"#).unwrap();
        assert_eq!(tuning.rider.gravity, 900.0);
        // Untouched fields keep their defaults
        assert_eq!(tuning.rider.max_speed, 220.0);
        assert_eq!(tuning.tricks, TrickTuning::default());
    }

    #[test]
    fn test_rejects_empty_range() {
        let err = Tuning::from_json(
            r#"{ "terrain": { "ramp_width": { "min": 160.0, "max": 100.0 } } }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "terrain.ramp_width",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_zero_width_ramp() {
        let mut tuning = Tuning::default();
        tuning.terrain.ramp_width = Span::new(0.0, 50.0);
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_rejects_oversized_landing_gap() {
        let mut tuning = Tuning::default();
        tuning.terrain.landing_gap = Span::new(250.0, 500.0);
        assert!(tuning.validate().is_err());
    }

    fn rejected_field(json: &str) -> &'static str {
        match Tuning::from_json(json) {
            Err(TuningError::Invalid { field, .. }) => field,
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_out_of_range_probabilities() {
        assert_eq!(
            rejected_field(r#"{ "terrain": { "tree_chance": 1.5 } }"#),
            "terrain.tree_chance"
        );
        assert_eq!(
            rejected_field(r#"{ "terrain": { "tree_chance": -1.0 } }"#),
            "terrain.tree_chance"
        );
        assert_eq!(
            rejected_field(r#"{ "terrain": { "zen_ramp_chance": 2.0 } }"#),
            "terrain.zen_ramp_chance"
        );
        assert_eq!(
            rejected_field(r#"{ "terrain": { "feature_chance": -0.1 } }"#),
            "terrain.feature_chance"
        );
        assert_eq!(
            rejected_field(r#"{ "terrain": { "double_obstacle_chance": 1.01 } }"#),
            "terrain.double_obstacle_chance"
        );
        assert_eq!(
            rejected_field(r#"{ "rider": { "spray_chance": 1.5 } }"#),
            "rider.spray_chance"
        );
    }

    #[test]
    fn test_probability_bounds_are_inclusive() {
        let json = r#"{ "terrain": { "tree_chance": 1.0, "feature_chance": 0.0 } }"#;
        assert!(Tuning::from_json(json).is_ok());
    }

    #[test]
    fn test_rejects_rail_longer_than_segment() {
        assert_eq!(
            rejected_field(r#"{ "terrain": { "rail_length": { "min": 700.0, "max": 900.0 } } }"#),
            "terrain.rail_length"
        );
    }

    #[test]
    fn test_rejects_cluster_wider_than_segment() {
        assert_eq!(
            rejected_field(r#"{ "terrain": { "cluster_spacing": { "min": 80.0, "max": 580.0 } } }"#),
            "terrain.cluster_spacing"
        );
    }

    #[test]
    fn test_rejects_non_positive_gravity() {
        assert_eq!(
            rejected_field(r#"{ "rider": { "gravity": 0.0 } }"#),
            "rider.gravity"
        );
        assert_eq!(
            rejected_field(r#"{ "rider": { "gravity": -800.0 } }"#),
            "rider.gravity"
        );
    }

    #[test]
    fn test_default_spray_threshold_is_reachable() {
        let rider = RiderTuning::default();
        assert!(rider.cruise_speed() > rider.spray_speed);
    }

    #[test]
    fn test_parse_error_is_reported() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Parse(_))
        ));
    }
}
