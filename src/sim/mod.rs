//! Simulation module
//!
//! All gameplay logic lives here. No rendering or platform dependencies:
//! - Clamped frame delta, one collision per tick
//! - Seeded RNG only (terrain and cosmetic spray on separate streams)
//! - Input arrives as a per-tick snapshot; the core registers no listeners

pub mod collision;
pub mod rider;
pub mod state;
pub mod terrain;
pub mod tick;
pub mod tricks;

pub use collision::{Bounds, CollisionEvent};
pub use rider::{Flip, Particle, Rider, RiderInput, Stance};
pub use state::{CrashCause, GameEvent, GamePhase, GameState};
pub use terrain::{
    GroundSegment, Obstacle, ObstacleKind, Rail, Ramp, SegmentPlan, TerrainFeature, TerrainField,
    plan_segment,
};
pub use tick::{TickInput, handle_collision, tick};
pub use tricks::{
    ComboState, Landing, LandingQuality, RiderAction, TrickAttempt, TrickEngine, TrickKind,
};
