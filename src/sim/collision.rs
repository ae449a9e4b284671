//! Collision geometry for the side-scrolling lane
//!
//! Everything is an axis-aligned box in screen space (y grows downward).
//! Terrain produces at most one `CollisionEvent` per tick; the game loop
//! turns it into rider state changes and scoring.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::terrain::ObstacleKind;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Bounds {
    /// Box of the given size centered on `center`
    pub fn centered(center: Vec2, width: f32, height: f32) -> Self {
        Self {
            left: center.x - width / 2.0,
            right: center.x + width / 2.0,
            top: center.y - height / 2.0,
            bottom: center.y + height / 2.0,
        }
    }

    /// Box from its left/top corner and size
    pub fn from_edges(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            right: left + width,
            top,
            bottom: top + height,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }

    /// Strict overlap: touching edges do not count
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.right > other.left
            && self.left < other.right
            && self.bottom > other.top
            && self.top < other.bottom
    }

    /// Horizontal overlap with the span `[left, right)`
    pub fn overlaps_x(&self, left: f32, right: f32) -> bool {
        self.right > left && self.left < right
    }
}

/// Result of a terrain collision check
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CollisionEvent {
    /// Airborne rider reached the ground at height `y`
    Ground { y: f32 },
    /// Grounded rider hit a ramp lip
    Ramp { boost: f32 },
    /// Rider ran into an obstacle
    Obstacle { kind: ObstacleKind },
    /// Rider touched a rail whose top edge is at `y`
    Rail { y: f32, x: f32, length: f32 },
}
