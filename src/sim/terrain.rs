//! Procedural terrain: generation, scrolling, and collision checks
//!
//! The world scrolls left past a fixed rider. Terrain is laid out in
//! segments of `SEGMENT_WIDTH`; every segment owns a ground strip plus at
//! most one feature group that fits entirely inside it, so features from
//! different segments can never overlap.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Bounds, CollisionEvent};
use super::rider::Rider;
use crate::consts::*;
use crate::settings::GameMode;
use crate::tuning::{Span, TerrainTuning};

/// Ramp lip hit zone as a fraction of ramp width
const RAMP_LIP_FRACTION: f32 = 0.3;
/// Rider feet must be this close to the ground to catch a ramp
const RAMP_GROUND_TOLERANCE: f32 = 20.0;
/// Thickness of a rail's contact band
const RAIL_THICKNESS: f32 = 10.0;

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Tree,
    Rock,
}

impl ObstacleKind {
    /// Footprint `(width, height)` for an obstacle trailing a ramp
    fn landing_size(self) -> (f32, f32) {
        match self {
            ObstacleKind::Tree => (20.0, 50.0),
            ObstacleKind::Rock => (25.0, 25.0),
        }
    }

    /// Footprint `(width, height)` for a standalone obstacle
    fn cluster_size(self) -> (f32, f32) {
        match self {
            ObstacleKind::Tree => (20.0, 55.0),
            ObstacleKind::Rock => (30.0, 30.0),
        }
    }
}

/// Flat ground strip (one per segment)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundSegment {
    pub x: f32,
    pub width: f32,
}

/// Launch ramp sitting on the ground
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ramp {
    pub x: f32,
    pub width: f32,
    pub height: f32,
    /// Launch velocity multiplier
    pub boost: f32,
}

/// Grind rail; its top edge sits `height` above the ground
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rail {
    pub x: f32,
    pub length: f32,
    pub height: f32,
}

impl Rail {
    pub fn top(&self, ground_level: f32) -> f32 {
        ground_level - self.height
    }
}

/// Tree or rock standing on the ground
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f32,
    pub width: f32,
    pub height: f32,
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub fn bounds(&self, ground_level: f32) -> Bounds {
        Bounds::from_edges(self.x, ground_level - self.height, self.width, self.height)
    }
}

/// Any generated terrain element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TerrainFeature {
    Ground(GroundSegment),
    Ramp(Ramp),
    Rail(Rail),
    Obstacle(Obstacle),
}

impl TerrainFeature {
    /// Leading (left) edge
    pub fn x(&self) -> f32 {
        match self {
            TerrainFeature::Ground(g) => g.x,
            TerrainFeature::Ramp(r) => r.x,
            TerrainFeature::Rail(r) => r.x,
            TerrainFeature::Obstacle(o) => o.x,
        }
    }

    /// Horizontal extent
    pub fn width(&self) -> f32 {
        match self {
            TerrainFeature::Ground(g) => g.width,
            TerrainFeature::Ramp(r) => r.width,
            TerrainFeature::Rail(r) => r.length,
            TerrainFeature::Obstacle(o) => o.width,
        }
    }

    /// Trailing (right) edge
    pub fn right(&self) -> f32 {
        self.x() + self.width()
    }
}

/// What a freshly generated segment carries besides its ground strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentPlan {
    Clear,
    Ramp,
    RampWithObstacle,
    Rail,
    Obstacles,
}

/// Pick a segment's feature group from two uniform rolls in `[0, 1)`
pub fn plan_segment(mode: GameMode, tuning: &TerrainTuning, roll: f64, pick: f64) -> SegmentPlan {
    if !mode.has_obstacles() {
        return if roll < tuning.zen_ramp_chance {
            SegmentPlan::Ramp
        } else {
            SegmentPlan::Clear
        };
    }

    if roll >= tuning.feature_chance {
        return SegmentPlan::Clear;
    }

    let [combo, ramp, rail, obstacles] = tuning.feature_weights;
    let mut edge = combo;
    if pick < edge {
        return SegmentPlan::RampWithObstacle;
    }
    edge += ramp;
    if pick < edge {
        return SegmentPlan::Ramp;
    }
    edge += rail;
    if pick < edge {
        return if mode.has_rails() {
            SegmentPlan::Rail
        } else {
            SegmentPlan::Clear
        };
    }
    edge += obstacles;
    if pick < edge {
        return SegmentPlan::Obstacles;
    }
    SegmentPlan::Clear
}

/// The scrolling field of terrain features
#[derive(Debug, Clone)]
pub struct TerrainField {
    width: f32,
    height: f32,
    ground_level: f32,
    mode: GameMode,
    tuning: TerrainTuning,
    rng: Pcg32,
    ground_segments: Vec<GroundSegment>,
    ramps: Vec<Ramp>,
    rails: Vec<Rail>,
    obstacles: Vec<Obstacle>,
    /// Total distance scrolled
    scroll_offset: f32,
    segments_generated: u32,
}

impl TerrainField {
    /// Build a field for a `width` × `height` viewport with starting terrain
    pub fn new(width: f32, height: f32, mode: GameMode, tuning: TerrainTuning, seed: u64) -> Self {
        let mut field = Self::empty(width, height, mode, tuning, seed);
        field.generate_initial_terrain();
        field
    }

    fn empty(width: f32, height: f32, mode: GameMode, tuning: TerrainTuning, seed: u64) -> Self {
        Self {
            width,
            height,
            ground_level: height * GROUND_LEVEL_FRACTION,
            mode,
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            ground_segments: Vec::new(),
            ramps: Vec::new(),
            rails: Vec::new(),
            obstacles: Vec::new(),
            scroll_offset: 0.0,
            segments_generated: 0,
        }
    }

    fn generate_initial_terrain(&mut self) {
        let mut x = self.width * 0.25;
        for i in 0..INITIAL_SEGMENTS {
            if i == 0 {
                // Give the rider a clear run-in
                self.push_segment(x, SegmentPlan::Clear, 1.0);
            } else {
                self.generate_segment(x, 1.0);
            }
            x += SEGMENT_WIDTH;
        }
    }

    pub fn set_mode(&mut self, mode: GameMode) {
        self.mode = mode;
    }

    /// Adapt to a new viewport. Existing features keep their x.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.ground_level = height * GROUND_LEVEL_FRACTION;
    }

    /// Scroll by `|vertical_speed| * dt`, reclaim and generate terrain
    pub fn update(&mut self, dt: f32, vertical_speed: f32, difficulty: f32) {
        let distance = vertical_speed.abs() * dt;
        self.scroll_offset += distance;

        for g in self.ground_segments.iter_mut() {
            g.x -= distance;
        }
        for r in self.ramps.iter_mut() {
            r.x -= distance;
        }
        for r in self.rails.iter_mut() {
            r.x -= distance;
        }
        for o in self.obstacles.iter_mut() {
            o.x -= distance;
        }

        self.cleanup_offscreen();

        if self.frontier() < self.width + LOOKAHEAD_MARGIN {
            let spawn_x = self.width + SPAWN_OFFSET;
            self.generate_segment(spawn_x, difficulty);
        }
    }

    /// Trailing edge of the rightmost segment
    pub fn frontier(&self) -> f32 {
        self.ground_segments
            .iter()
            .map(|g| g.x + g.width)
            .fold(f32::NEG_INFINITY, f32::max)
    }

    fn cleanup_offscreen(&mut self) {
        self.ground_segments.retain(|g| g.x + g.width >= CLEANUP_THRESHOLD);
        self.ramps.retain(|r| r.x + r.width >= CLEANUP_THRESHOLD);
        self.rails.retain(|r| r.x + r.length >= CLEANUP_THRESHOLD);
        self.obstacles.retain(|o| o.x + o.width >= CLEANUP_THRESHOLD);
    }

    fn generate_segment(&mut self, spawn_x: f32, difficulty: f32) {
        let roll: f64 = self.rng.random();
        let pick: f64 = self.rng.random();
        let plan = plan_segment(self.mode, &self.tuning, roll, pick);
        self.push_segment(spawn_x, plan, difficulty);
    }

    fn push_segment(&mut self, spawn_x: f32, plan: SegmentPlan, difficulty: f32) {
        self.ground_segments.push(GroundSegment {
            x: spawn_x,
            width: SEGMENT_WIDTH,
        });
        self.segments_generated += 1;

        match plan {
            SegmentPlan::Clear => {}
            SegmentPlan::Ramp => {
                self.spawn_ramp(spawn_x);
            }
            SegmentPlan::RampWithObstacle => {
                let ramp = self.spawn_ramp(spawn_x);
                // Leave a landing zone an ordinary arc clears
                let gap = self.sample(self.tuning.landing_gap);
                let kind = self.roll_obstacle_kind();
                let (width, height) = kind.landing_size();
                self.obstacles.push(Obstacle {
                    x: spawn_x + ramp.width + gap,
                    width,
                    height,
                    kind,
                });
            }
            SegmentPlan::Rail => {
                let length = self.sample(self.tuning.rail_length);
                let height = self.sample(self.tuning.rail_height);
                self.rails.push(Rail {
                    x: spawn_x,
                    length,
                    height,
                });
            }
            SegmentPlan::Obstacles => {
                let double_chance = (self.tuning.double_obstacle_chance * difficulty as f64).clamp(0.0, 0.9);
                let count = if self.rng.random_bool(double_chance) { 2 } else { 1 };
                for i in 0..count {
                    let offset = if i == 0 {
                        0.0
                    } else {
                        i as f32 * self.sample(self.tuning.cluster_spacing)
                    };
                    let kind = self.roll_obstacle_kind();
                    let (width, height) = kind.cluster_size();
                    self.obstacles.push(Obstacle {
                        x: spawn_x + offset,
                        width,
                        height,
                        kind,
                    });
                }
            }
        }

        log::debug!(
            "Segment {} at x={:.0}: {:?}",
            self.segments_generated,
            spawn_x,
            plan
        );
    }

    fn spawn_ramp(&mut self, spawn_x: f32) -> Ramp {
        let ramp = Ramp {
            x: spawn_x,
            width: self.sample(self.tuning.ramp_width),
            height: self.sample(self.tuning.ramp_height),
            boost: self.sample(self.tuning.ramp_boost),
        };
        self.ramps.push(ramp);
        ramp
    }

    fn roll_obstacle_kind(&mut self) -> ObstacleKind {
        if self.rng.random_bool(self.tuning.tree_chance) {
            ObstacleKind::Tree
        } else {
            ObstacleKind::Rock
        }
    }

    fn sample(&mut self, span: Span) -> f32 {
        self.rng.random_range(span.range())
    }

    /// Find the highest-priority contact between the rider and the terrain
    ///
    /// Priority: ramp lip, ground touchdown, rail, obstacle. A ramp must win
    /// over an obstacle or ground test at the same spot.
    pub fn check_collision(&self, rider: &Rider, is_airborne: bool) -> Option<CollisionEvent> {
        let bounds = rider.bounds();

        if !is_airborne && rider.is_grounded() {
            let feet_on_ground = (bounds.bottom - self.ground_level).abs() <= RAMP_GROUND_TOLERANCE;
            if feet_on_ground {
                if let Some(ramp) = self
                    .ramps
                    .iter()
                    .find(|r| bounds.overlaps_x(r.x, r.x + r.width * RAMP_LIP_FRACTION))
                {
                    return Some(CollisionEvent::Ramp { boost: ramp.boost });
                }
            }
        }

        if is_airborne && rider.vel.y > 0.0 {
            let ground_y = self.ground_y_at(bounds.center().x);
            if bounds.bottom >= ground_y {
                return Some(CollisionEvent::Ground { y: ground_y });
            }
        }

        for rail in &self.rails {
            let top = rail.top(self.ground_level);
            let band = Bounds::from_edges(rail.x, top, rail.length, RAIL_THICKNESS);
            if bounds.overlaps(&band) {
                return Some(CollisionEvent::Rail {
                    y: top,
                    x: rail.x,
                    length: rail.length,
                });
            }
        }

        if self.mode.has_obstacles() && !is_airborne && !rider.is_invincible() {
            if let Some(obstacle) = self
                .obstacles
                .iter()
                .find(|o| bounds.overlaps(&o.bounds(self.ground_level)))
            {
                return Some(CollisionEvent::Obstacle {
                    kind: obstacle.kind,
                });
            }
        }

        None
    }

    /// Ground height under screen x (the slope is flat in screen space)
    pub fn ground_y_at(&self, _x: f32) -> f32 {
        self.ground_level
    }

    /// Where the rider's lane sits for this viewport
    pub fn rider_anchor(&self) -> Vec2 {
        Vec2::new(self.width * RIDER_X_FRACTION, self.ground_level)
    }

    /// Place a hand-made feature (test fixtures)
    #[cfg(test)]
    pub(crate) fn insert(&mut self, feature: TerrainFeature) {
        match feature {
            TerrainFeature::Ground(g) => self.ground_segments.push(g),
            TerrainFeature::Ramp(r) => self.ramps.push(r),
            TerrainFeature::Rail(r) => self.rails.push(r),
            TerrainFeature::Obstacle(o) => self.obstacles.push(o),
        }
    }

    /// Every live feature, ground strips first
    pub fn features(&self) -> impl Iterator<Item = TerrainFeature> + '_ {
        self.ground_segments
            .iter()
            .copied()
            .map(TerrainFeature::Ground)
            .chain(self.ramps.iter().copied().map(TerrainFeature::Ramp))
            .chain(self.rails.iter().copied().map(TerrainFeature::Rail))
            .chain(self.obstacles.iter().copied().map(TerrainFeature::Obstacle))
    }

    pub fn ground_segments(&self) -> &[GroundSegment] {
        &self.ground_segments
    }

    pub fn ramps(&self) -> &[Ramp] {
        &self.ramps
    }

    pub fn rails(&self) -> &[Rail] {
        &self.rails
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn ground_level(&self) -> f32 {
        self.ground_level
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rider::RiderInput;
    use crate::tuning::RiderTuning;
    use proptest::prelude::*;

    const W: f32 = 800.0;
    const H: f32 = 600.0;
    /// Rounding drift from thousands of independent scroll subtractions
    const SCROLL_SLACK: f32 = 1.0;

    fn field(mode: GameMode) -> TerrainField {
        TerrainField::new(W, H, mode, TerrainTuning::default(), 42)
    }

    fn bare_field(mode: GameMode) -> TerrainField {
        TerrainField::empty(W, H, mode, TerrainTuning::default(), 42)
    }

    fn grounded_rider(f: &TerrainField) -> Rider {
        let anchor = f.rider_anchor();
        let mut rider = Rider::new(anchor.x, anchor.y, RiderTuning::default(), 1);
        // Let the post-construction state settle into a plain cruise
        rider.update(1.0 / 60.0, RiderInput::default());
        rider
    }

    /// The segment a feature starting at `x` was generated in
    fn segment_of(f: &TerrainField, x: f32) -> Option<GroundSegment> {
        f.ground_segments
            .iter()
            .copied()
            .filter(|g| g.x <= x)
            .max_by(|a, b| a.x.total_cmp(&b.x))
    }

    #[test]
    fn test_initial_terrain_layout() {
        let f = field(GameMode::Adventure);
        assert_eq!(f.ground_segments().len(), INITIAL_SEGMENTS);
        assert_eq!(f.ground_level(), 450.0);
        let first = f.ground_segments()[0];
        assert_eq!(first.x, W * 0.25);

        // First segment is a clear run-in
        let run_in = first.x..first.x + first.width;
        assert!(f.ramps().iter().all(|r| !run_in.contains(&r.x)));
        assert!(f.obstacles().iter().all(|o| !run_in.contains(&o.x)));
        assert!(f.rails().iter().all(|r| !run_in.contains(&r.x)));
    }

    #[test]
    fn test_same_seed_same_terrain() {
        let a = field(GameMode::Adventure);
        let b = field(GameMode::Adventure);
        assert_eq!(a.features().collect::<Vec<_>>(), b.features().collect::<Vec<_>>());
    }

    #[test]
    fn test_update_scrolls_by_speed() {
        let mut f = field(GameMode::Adventure);
        let before = f.ground_segments()[0].x;
        f.update(0.5, -100.0, 1.0);
        assert_eq!(f.ground_segments()[0].x, before - 50.0);
        assert_eq!(f.scroll_offset(), 50.0);
    }

    #[test]
    fn test_cleanup_removes_features_fully_behind() {
        let mut f = bare_field(GameMode::Adventure);
        // Far frontier so nothing new is generated
        f.ground_segments.push(GroundSegment {
            x: W * 4.0,
            width: SEGMENT_WIDTH,
        });
        f.ramps.push(Ramp {
            x: -450.0,
            width: 100.0,
            height: 60.0,
            boost: 1.3,
        });
        f.ramps.push(Ramp {
            x: -350.0,
            width: 100.0,
            height: 60.0,
            boost: 1.3,
        });
        f.update(0.0, 0.0, 1.0);
        // Trailing edges at -350 (gone) and -250 (kept)
        assert_eq!(f.ramps().len(), 1);
        assert_eq!(f.ramps()[0].x, -350.0);
    }

    #[test]
    fn test_generates_ahead_when_frontier_near() {
        let mut f = bare_field(GameMode::Adventure);
        f.ground_segments.push(GroundSegment {
            x: W - 200.0,
            width: SEGMENT_WIDTH,
        });
        // Frontier at W + 400, inside the lookahead margin
        f.update(0.0, 0.0, 1.0);
        assert_eq!(f.ground_segments().len(), 2);
        assert_eq!(f.ground_segments()[1].x, W + SPAWN_OFFSET);

        // Frontier now far ahead: nothing more
        f.update(0.0, 0.0, 1.0);
        assert_eq!(f.ground_segments().len(), 2);
    }

    #[test]
    fn test_zen_never_spawns_hazards() {
        let mut f = field(GameMode::Zen);
        for _ in 0..5_000 {
            f.update(0.1, 220.0, 3.0);
        }
        assert!(f.obstacles().is_empty());
        assert!(f.rails().is_empty());
        assert!(f.segments_generated > 20);
    }

    #[test]
    fn test_adventure_spawns_every_kind() {
        let mut f = field(GameMode::Adventure);
        let (mut ramps, mut rails, mut obstacles) = (false, false, false);
        for _ in 0..20_000 {
            f.update(0.1, 220.0, 1.0);
            ramps |= !f.ramps().is_empty();
            rails |= !f.rails().is_empty();
            obstacles |= !f.obstacles().is_empty();
        }
        assert!(ramps && rails && obstacles);
    }

    #[test]
    fn test_plan_segment_zen() {
        let t = TerrainTuning::default();
        assert_eq!(plan_segment(GameMode::Zen, &t, 0.1, 0.0), SegmentPlan::Ramp);
        assert_eq!(plan_segment(GameMode::Zen, &t, 0.5, 0.0), SegmentPlan::Clear);
    }

    #[test]
    fn test_plan_segment_adventure_weights() {
        let t = TerrainTuning::default();
        let plan = |pick| plan_segment(GameMode::Adventure, &t, 0.0, pick);
        assert_eq!(plan(0.0), SegmentPlan::RampWithObstacle);
        assert_eq!(plan(0.45), SegmentPlan::Ramp);
        assert_eq!(plan(0.7), SegmentPlan::Rail);
        assert_eq!(plan(0.8), SegmentPlan::Obstacles);
        assert_eq!(plan(0.95), SegmentPlan::Clear);
        // Nothing at all when the first roll misses
        assert_eq!(
            plan_segment(GameMode::Adventure, &t, 0.6, 0.0),
            SegmentPlan::Clear
        );
    }

    #[test]
    fn test_ramp_collision_on_lip() {
        let mut f = bare_field(GameMode::Adventure);
        let rider = grounded_rider(&f);
        let b = rider.bounds();
        f.ramps.push(Ramp {
            x: b.right - 5.0,
            width: 120.0,
            height: 60.0,
            boost: 1.3,
        });
        assert_eq!(
            f.check_collision(&rider, false),
            Some(CollisionEvent::Ramp { boost: 1.3 })
        );

        // Feet just inside the ground band still catch the lip
        let mut skimming = rider.clone();
        skimming.pos.y += f.ground_level - (RAMP_GROUND_TOLERANCE - 1.0) - b.bottom;
        assert_eq!(
            f.check_collision(&skimming, false),
            Some(CollisionEvent::Ramp { boost: 1.3 })
        );

        // Feet above the band pass over it
        let mut lifted = rider.clone();
        lifted.pos.y += f.ground_level - (RAMP_GROUND_TOLERANCE + 1.0) - b.bottom;
        assert!(lifted.is_grounded());
        assert_eq!(f.check_collision(&lifted, false), None);

        // Past the leading 30% the lip no longer catches
        f.ramps[0].x = b.left - 100.0;
        assert_eq!(f.check_collision(&rider, false), None);
    }

    #[test]
    fn test_ramp_beats_obstacle_at_same_spot() {
        let mut f = bare_field(GameMode::Adventure);
        let rider = grounded_rider(&f);
        let x = rider.bounds().left;
        f.ramps.push(Ramp {
            x,
            width: 120.0,
            height: 60.0,
            boost: 1.25,
        });
        f.obstacles.push(Obstacle {
            x,
            width: 20.0,
            height: 50.0,
            kind: ObstacleKind::Tree,
        });
        assert_eq!(
            f.check_collision(&rider, false),
            Some(CollisionEvent::Ramp { boost: 1.25 })
        );
    }

    #[test]
    fn test_ground_only_when_descending() {
        let f = bare_field(GameMode::Adventure);
        let mut rider = grounded_rider(&f);
        rider.jump();
        rider.pos.y = f.ground_level() - 10.0;

        // Still rising: no touchdown
        assert!(rider.vel.y < 0.0);
        assert_eq!(f.check_collision(&rider, true), None);

        rider.vel.y = 120.0;
        assert_eq!(
            f.check_collision(&rider, true),
            Some(CollisionEvent::Ground { y: 450.0 })
        );

        // High in the air: falling but nowhere near the ground
        rider.pos.y = f.ground_level() - 200.0;
        assert_eq!(f.check_collision(&rider, true), None);
    }

    #[test]
    fn test_rail_contact() {
        let mut f = bare_field(GameMode::Adventure);
        let rider = grounded_rider(&f);
        f.rails.push(Rail {
            x: rider.bounds().left - 10.0,
            length: 150.0,
            height: 20.0,
        });
        assert_eq!(
            f.check_collision(&rider, false),
            Some(CollisionEvent::Rail {
                y: 430.0,
                x: rider.bounds().left - 10.0,
                length: 150.0
            })
        );
    }

    #[test]
    fn test_obstacle_rules() {
        let mut f = bare_field(GameMode::Adventure);
        let mut rider = grounded_rider(&f);
        f.obstacles.push(Obstacle {
            x: rider.bounds().left + 5.0,
            width: 25.0,
            height: 25.0,
            kind: ObstacleKind::Rock,
        });
        assert_eq!(
            f.check_collision(&rider, false),
            Some(CollisionEvent::Obstacle {
                kind: ObstacleKind::Rock
            })
        );

        // Airborne riders sail over
        let mut flying = rider.clone();
        flying.jump();
        assert_eq!(f.check_collision(&flying, true), None);

        // Invincible riders pass through
        rider.grant_invincibility();
        assert_eq!(f.check_collision(&rider, false), None);

        // Zen never collides with obstacles
        let mut zen = f.clone();
        zen.set_mode(GameMode::Zen);
        let calm = grounded_rider(&zen);
        assert_eq!(zen.check_collision(&calm, false), None);
    }

    #[test]
    fn test_resize_moves_ground() {
        let mut f = field(GameMode::Zen);
        f.resize(1024.0, 800.0);
        assert_eq!(f.ground_level(), 600.0);
        assert_eq!(f.rider_anchor(), Vec2::new(1024.0 * RIDER_X_FRACTION, 600.0));
    }

    proptest! {
        #[test]
        fn prop_generated_features_are_sane(
            seed in any::<u64>(),
            ticks in 0usize..3_000,
            difficulty in 1.0f32..4.0,
        ) {
            let mut f = TerrainField::new(W, H, GameMode::Adventure, TerrainTuning::default(), seed);
            for _ in 0..ticks {
                f.update(0.1, 220.0, difficulty);
            }

            // Non-degenerate geometry
            for ramp in f.ramps() {
                prop_assert!(ramp.width > 0.0 && ramp.height > 0.0 && ramp.boost > 0.0);
            }
            for rail in f.rails() {
                prop_assert!(rail.length > 0.0 && rail.height > 0.0);
            }
            for o in f.obstacles() {
                prop_assert!(o.width > 0.0 && o.height > 0.0);
            }

            // Ground segments never overlap
            let mut grounds: Vec<_> = f.ground_segments().to_vec();
            grounds.sort_by(|a, b| a.x.total_cmp(&b.x));
            for pair in grounds.windows(2) {
                prop_assert!(pair[0].x + pair[0].width <= pair[1].x + SCROLL_SLACK);
            }

            // Every feature sits wholly inside one segment, and no two
            // features share a leading edge
            let mut starts = Vec::new();
            for feature in f.features().filter(|feat| !matches!(feat, TerrainFeature::Ground(_))) {
                let seg = segment_of(&f, feature.x());
                prop_assert!(seg.is_some());
                let g = seg.unwrap();
                prop_assert!(feature.right() <= g.x + g.width + SCROLL_SLACK);
                starts.push(feature.x());
            }
            starts.sort_by(f32::total_cmp);
            for pair in starts.windows(2) {
                prop_assert!(pair[0] != pair[1]);
            }
        }
    }
}
