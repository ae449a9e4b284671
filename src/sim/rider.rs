//! Rider physics and state
//!
//! The rider sits at a fixed screen x. Its vertical velocity doubles as the
//! down-slope cruise speed while grounded, which is what scrolls the world.
//! Screen space: y grows downward, the ground lane is the rider's resting y.

use std::f32::consts::{FRAC_PI_4, TAU};

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Bounds;
use crate::consts::{MAX_PARTICLES, REFERENCE_FPS};
use crate::normalize_angle;
use crate::tuning::RiderTuning;

/// Slack when deciding that a flip has run its full duration, so that
/// summing many small `dt`s lands on the same tick as the closed form
const FLIP_EPSILON: f32 = 1e-4;

/// Contact state. Exactly one holds at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stance {
    Grounded,
    Airborne,
}

/// A flip in progress: a constant-angular-velocity full turn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Flip {
    /// +1 backflip, -1 frontflip
    pub direction: f32,
    pub start_rotation: f32,
    pub duration: f32,
    pub elapsed: f32,
}

impl Flip {
    /// Completion fraction in [0, 1]
    pub fn progress(&self) -> f32 {
        (self.elapsed / self.duration).min(1.0)
    }

    pub fn end_rotation(&self) -> f32 {
        self.start_rotation + self.direction * TAU
    }

    fn rotation(&self) -> f32 {
        self.start_rotation + self.direction * TAU * self.progress()
    }

    fn is_done(&self) -> bool {
        self.elapsed >= self.duration - FLIP_EPSILON
    }
}

/// Per-tick rider controls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RiderInput {
    pub jump: bool,
}

/// A snow spray particle (cosmetic)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 1.0 at spawn, removed at 0
    pub life: f32,
    pub size: f32,
}

/// The player-controlled rider
#[derive(Debug, Clone)]
pub struct Rider {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Radians, 0 = upright
    pub rotation: f32,
    pub rotation_vel: f32,
    stance: Stance,
    grinding: bool,
    air_time: f32,
    can_jump: bool,
    jump_cooldown: f32,
    invincibility: f32,
    ground_angle: f32,
    flip: Option<Flip>,
    lane_y: f32,
    particles: Vec<Particle>,
    emit_particles: bool,
    tuning: RiderTuning,
    fx_rng: Pcg32,
}

impl Rider {
    /// Rider at rest on the ground lane at `(x, lane_y)`
    pub fn new(x: f32, lane_y: f32, tuning: RiderTuning, seed: u64) -> Self {
        Self {
            pos: Vec2::new(x, lane_y),
            vel: Vec2::ZERO,
            rotation: 0.0,
            rotation_vel: 0.0,
            stance: Stance::Grounded,
            grinding: false,
            air_time: 0.0,
            can_jump: true,
            jump_cooldown: 0.0,
            invincibility: 0.0,
            ground_angle: 0.0,
            flip: None,
            lane_y,
            particles: Vec::with_capacity(MAX_PARTICLES),
            emit_particles: true,
            tuning,
            fx_rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Turn snow spray on or off
    pub fn set_particles(&mut self, enabled: bool) {
        self.emit_particles = enabled;
        if !enabled {
            self.particles.clear();
        }
    }

    /// Advance physics by `dt` seconds
    pub fn update(&mut self, dt: f32, input: RiderInput) {
        // Rail contact is re-established by collision every tick
        self.grinding = false;
        let frames = dt * REFERENCE_FPS;

        match self.stance {
            Stance::Grounded => {
                self.vel = Vec2::new(0.0, self.tuning.cruise_speed());
                if input.jump && self.can_jump() {
                    self.jump();
                } else {
                    // Unwind toward the nearest upright turn
                    let lean = normalize_angle(self.rotation - self.ground_angle);
                    self.rotation -=
                        lean * (1.0 - self.tuning.ground_rotation_relax.powf(frames));
                }
            }
            Stance::Airborne => {
                self.vel.x = 0.0;
                self.vel.y *= self.tuning.air_resistance.powf(frames);
                self.vel.y += self.tuning.gravity * dt;
            }
        }

        // Clamp lane speed
        match self.stance {
            Stance::Grounded => {
                self.vel.y = self.vel.y.clamp(self.tuning.min_speed, self.tuning.max_speed);
            }
            Stance::Airborne => {
                self.vel.y = self.vel.y.min(self.tuning.max_speed * 2.0);
            }
        }

        // Vertical position only moves in the air, and never below the lane:
        // touchdown itself is judged by the game loop
        match self.stance {
            Stance::Airborne => {
                self.pos.y = (self.pos.y + self.vel.y * dt).min(self.lane_y);
            }
            Stance::Grounded => self.pos.y = self.lane_y,
        }

        // Rotation
        if let Some(flip) = self.flip.as_mut() {
            flip.elapsed += dt;
            if flip.is_done() {
                self.rotation = flip.end_rotation();
                self.rotation_vel = 0.0;
                self.flip = None;
            } else {
                self.rotation = flip.rotation();
            }
        } else {
            self.rotation += self.rotation_vel * dt;
            self.rotation_vel *= self.tuning.rotation_damping.powf(frames);
        }

        self.jump_cooldown = (self.jump_cooldown - dt).max(0.0);
        self.invincibility = (self.invincibility - dt).max(0.0);

        if self.is_airborne() {
            self.air_time += dt;
        }

        self.update_particles(dt);

        if self.is_grounded()
            && self.vel.y.abs() > self.tuning.spray_speed
            && self.fx_rng.random_bool(self.tuning.spray_chance)
        {
            self.spray(1);
        }
    }

    /// Launch into the air. No-op while on cooldown or already airborne.
    pub fn jump(&mut self) {
        if !self.can_jump() {
            return;
        }
        self.vel.y = self.tuning.launch_velocity;
        self.stance = Stance::Airborne;
        self.can_jump = false;
        self.jump_cooldown = self.tuning.jump_cooldown;
        self.air_time = 0.0;
        self.invincibility = self.tuning.invincibility;
        self.rotation_vel = self.tuning.jump_spin_impulse;
        self.spray(5);
    }

    /// Launch off a ramp lip. The caller grants invincibility.
    pub fn hit_ramp(&mut self, boost: f32) {
        self.vel.y = self.tuning.launch_velocity * boost;
        self.stance = Stance::Airborne;
        self.can_jump = false;
        self.air_time = 0.0;
        self.rotation_vel = self.tuning.ramp_spin_impulse;
    }

    /// Touch down on the ground lane
    pub fn land(&mut self, ground_angle: f32) {
        self.pos.y = self.lane_y;
        self.stance = Stance::Grounded;
        self.can_jump = true;
        self.air_time = 0.0;
        self.ground_angle = ground_angle;
        self.flip = None;
        self.invincibility = self.tuning.invincibility;
        self.vel.y *= self.tuning.landing_retention;
        self.spray(10);

        // Only a near-upright landing settles flat; anything else is left for
        // the ground relaxation to unwind
        let lean = normalize_angle(self.rotation - ground_angle);
        if lean.abs() < FRAC_PI_4 {
            self.rotation = ground_angle;
            self.rotation_vel = 0.0;
        }
    }

    /// Start a flip. Only while airborne and not already flipping.
    pub fn perform_flip(&mut self, direction: f32) {
        if self.is_airborne() && self.flip.is_none() {
            self.flip = Some(Flip {
                direction: direction.signum(),
                start_rotation: self.rotation,
                duration: self.tuning.flip_duration,
                elapsed: 0.0,
            });
            self.rotation_vel = 0.0;
        }
    }

    /// Add spin. Airborne only.
    pub fn perform_spin(&mut self, direction: f32) {
        if self.is_airborne() {
            self.rotation_vel += direction.signum() * self.tuning.spin_impulse;
        }
    }

    /// Ride along a rail whose top edge is at `rail_y`
    pub fn grind_rail(&mut self, rail_y: f32) {
        self.grinding = true;
        self.pos.y = rail_y;
        self.vel.y = self.vel.y.abs();
    }

    /// Move the fixed screen anchor (viewport resize)
    pub fn set_anchor(&mut self, x: f32, lane_y: f32) {
        let lift = self.lane_y - self.pos.y;
        self.lane_y = lane_y;
        self.pos.x = x;
        self.pos.y = lane_y - lift;
    }

    pub fn grant_invincibility(&mut self) {
        self.invincibility = self.tuning.invincibility;
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::centered(self.pos, self.tuning.width, self.tuning.height)
    }

    pub fn stance(&self) -> Stance {
        self.stance
    }

    pub fn is_airborne(&self) -> bool {
        self.stance == Stance::Airborne
    }

    pub fn is_grounded(&self) -> bool {
        self.stance == Stance::Grounded
    }

    pub fn is_grinding(&self) -> bool {
        self.grinding
    }

    pub fn can_jump(&self) -> bool {
        self.can_jump && self.is_grounded() && self.jump_cooldown <= 0.0
    }

    pub fn air_time(&self) -> f32 {
        self.air_time
    }

    pub fn is_invincible(&self) -> bool {
        self.invincibility > 0.0
    }

    pub fn invincibility(&self) -> f32 {
        self.invincibility
    }

    /// Active flip, if any
    pub fn flip(&self) -> Option<&Flip> {
        self.flip.as_ref()
    }

    pub fn lane_y(&self) -> f32 {
        self.lane_y
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    fn spray(&mut self, count: usize) {
        if !self.emit_particles {
            return;
        }
        let origin = Vec2::new(self.pos.x, self.pos.y + self.tuning.height / 2.0);
        for _ in 0..count {
            if self.particles.len() >= MAX_PARTICLES {
                break;
            }
            let vel = Vec2::new(
                (self.fx_rng.random::<f32>() - 0.5) * 100.0,
                self.fx_rng.random::<f32>() * 50.0 - 100.0,
            );
            self.particles.push(Particle {
                pos: origin,
                vel,
                life: 1.0,
                size: self.fx_rng.random_range(1.0..4.0),
            });
        }
    }

    fn update_particles(&mut self, dt: f32) {
        for p in self.particles.iter_mut() {
            p.pos += p.vel * dt;
            p.vel.y += 300.0 * dt;
            p.life -= dt * 2.0;
        }
        self.particles.retain(|p| p.life > 0.0);
    }
}
