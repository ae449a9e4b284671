//! Game state and run lifecycle
//!
//! `GameState` exclusively owns the rider, terrain and trick engine for one
//! run. Cosmetic choices and the game mode survive resets; everything else is
//! rebuilt from a seed.

use serde::{Deserialize, Serialize};

use super::rider::Rider;
use super::terrain::{ObstacleKind, TerrainField};
use super::tricks::{LandingQuality, TrickEngine, TrickKind};
use crate::settings::{Appearance, GameMode, Settings};
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Built, waiting for `start`
    Ready,
    /// Active gameplay
    Running,
    /// Game is paused
    Paused,
    /// Run ended; only `reset` resumes
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Ready => "ready",
            GamePhase::Running => "running",
            GamePhase::Paused => "paused",
            GamePhase::GameOver => "game_over",
        }
    }
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrashCause {
    Obstacle(ObstacleKind),
    /// Touched down less than halfway through a flip
    IncompleteFlip,
}

/// Events emitted during a tick (for score popups, sounds, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    RampLaunch { boost: f32 },
    Landed { points: u32, quality: LandingQuality },
    RailBonus { points: u32 },
    /// Combo lost without ending the run
    Wipeout,
    Crashed { cause: CrashCause },
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the current run was built from
    pub seed: u64,
    pub tuning: Tuning,
    pub mode: GameMode,
    pub appearance: Appearance,
    pub particles: bool,
    pub width: f32,
    pub height: f32,
    pub rider: Rider,
    pub terrain: TerrainField,
    pub tricks: TrickEngine,
    pub score: u64,
    /// Distance travelled in display meters
    pub distance: f32,
    /// 1.0 at the start, grows with distance
    pub difficulty: f32,
    pub phase: GamePhase,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
    /// The held queued flip already fired for this press
    pub(crate) flip_dispatched: bool,
}

impl GameState {
    /// Build a run for a `width` × `height` viewport, waiting in `Ready`
    pub fn new(seed: u64, width: f32, height: f32, settings: &Settings, tuning: Tuning) -> Self {
        let terrain = TerrainField::new(width, height, settings.mode, tuning.terrain, seed);
        let rider = Self::build_rider(&terrain, &tuning, seed, settings.particles);

        Self {
            seed,
            tuning,
            mode: settings.mode,
            appearance: settings.appearance.clone(),
            particles: settings.particles,
            width,
            height,
            rider,
            terrain,
            tricks: TrickEngine::new(tuning.tricks),
            score: 0,
            distance: 0.0,
            difficulty: 1.0,
            phase: GamePhase::Ready,
            events: Vec::new(),
            flip_dispatched: false,
        }
    }

    fn build_rider(terrain: &TerrainField, tuning: &Tuning, seed: u64, particles: bool) -> Rider {
        let anchor = terrain.rider_anchor();
        // Cosmetic spray draws from its own stream so it never shifts terrain
        let mut rider = Rider::new(anchor.x, anchor.y, tuning.rider, seed ^ 0x5eed_f00d);
        rider.set_particles(particles);
        rider
    }

    /// Ready → Running
    pub fn start(&mut self) {
        if self.phase == GamePhase::Ready {
            self.phase = GamePhase::Running;
            log::info!("Run started (seed {}, {} mode)", self.seed, self.mode.as_str());
        }
    }

    /// Start a fresh run from a seed derived from the current one
    pub fn reset(&mut self) {
        let seed = next_seed(self.seed);
        self.reset_with_seed(seed);
    }

    /// Rebuild rider, terrain and tricks from `seed` and start running
    pub fn reset_with_seed(&mut self, seed: u64) {
        self.seed = seed;
        self.terrain = TerrainField::new(self.width, self.height, self.mode, self.tuning.terrain, seed);
        self.rider = Self::build_rider(&self.terrain, &self.tuning, seed, self.particles);
        self.tricks = TrickEngine::new(self.tuning.tricks);
        self.score = 0;
        self.distance = 0.0;
        self.difficulty = 1.0;
        self.events.clear();
        self.flip_dispatched = false;
        self.phase = GamePhase::Running;
        log::info!("Run reset (seed {}, {} mode)", seed, self.mode.as_str());
    }

    /// Running ↔ Paused. Ignored in any other phase.
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Running => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Running,
            other => other,
        };
    }

    /// Switch mode; generation follows from the next segment on
    pub fn set_mode(&mut self, mode: GameMode) {
        self.mode = mode;
        self.terrain.set_mode(mode);
    }

    pub fn set_appearance(&mut self, appearance: Appearance) {
        self.appearance = appearance;
    }

    pub fn set_particles(&mut self, enabled: bool) {
        self.particles = enabled;
        self.rider.set_particles(enabled);
    }

    /// Current settings view, for persisting
    pub fn settings(&self) -> Settings {
        Settings {
            mode: self.mode,
            appearance: self.appearance.clone(),
            particles: self.particles,
        }
    }

    /// Adapt to a new viewport without restarting the run
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.terrain.resize(width, height);
        let anchor = self.terrain.rider_anchor();
        self.rider.set_anchor(anchor.x, anchor.y);
    }

    /// Forward a trick key. Silently ignored unless running and airborne.
    pub fn handle_trick(&mut self, kind: TrickKind) -> bool {
        if self.phase != GamePhase::Running {
            return false;
        }
        self.tricks.handle_input(kind, &mut self.rider)
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// End the run. Banked score is kept.
    pub(crate) fn crash(&mut self, cause: CrashCause) {
        self.tricks.wipeout();
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::Crashed { cause });
        log::info!(
            "Game over: {:?} (score {}, distance {:.0}m)",
            cause,
            self.score,
            self.distance
        );
    }
}

/// Next run seed (PCG LCG step)
fn next_seed(seed: u64) -> u64 {
    seed.wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use proptest::prelude::*;

    fn state() -> GameState {
        GameState::new(12345, 800.0, 600.0, &Settings::default(), Tuning::default())
    }

    #[test]
    fn test_new_is_ready() {
        let s = state();
        assert_eq!(s.phase, GamePhase::Ready);
        assert_eq!(s.rider.pos, Vec2::new(160.0, 450.0));
        assert_eq!(s.score, 0);
        assert_eq!(s.difficulty, 1.0);
    }

    #[test]
    fn test_start_only_from_ready() {
        let mut s = state();
        s.start();
        assert_eq!(s.phase, GamePhase::Running);

        s.phase = GamePhase::GameOver;
        s.start();
        assert_eq!(s.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_toggle_pause() {
        let mut s = state();
        s.toggle_pause();
        assert_eq!(s.phase, GamePhase::Ready);

        s.start();
        s.toggle_pause();
        assert_eq!(s.phase, GamePhase::Paused);
        s.toggle_pause();
        assert_eq!(s.phase, GamePhase::Running);

        s.phase = GamePhase::GameOver;
        s.toggle_pause();
        assert_eq!(s.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_reset_keeps_cosmetics_and_mode() {
        let mut s = state();
        s.set_mode(GameMode::Zen);
        s.set_appearance(Appearance {
            rider_color: "#ffffff".into(),
            scarf_color: "#000000".into(),
        });
        s.score = 900;
        s.distance = 42.0;
        s.phase = GamePhase::GameOver;
        let old_seed = s.seed;

        s.reset();
        assert_eq!(s.phase, GamePhase::Running);
        assert_eq!(s.score, 0);
        assert_eq!(s.distance, 0.0);
        assert_ne!(s.seed, old_seed);
        assert_eq!(s.mode, GameMode::Zen);
        assert_eq!(s.terrain.mode(), GameMode::Zen);
        assert_eq!(s.appearance.rider_color, "#ffffff");
        assert!(s.terrain.obstacles().is_empty());
    }

    #[test]
    fn test_crash_keeps_score() {
        let mut s = state();
        s.start();
        s.score = 321;
        s.crash(CrashCause::IncompleteFlip);
        assert!(s.is_game_over());
        assert_eq!(s.score, 321);
        assert_eq!(
            s.events,
            vec![GameEvent::Crashed {
                cause: CrashCause::IncompleteFlip
            }]
        );
    }

    #[test]
    fn test_handle_trick_needs_running() {
        let mut s = state();
        s.rider.jump();
        s.rider.update(0.1, Default::default());
        assert!(!s.handle_trick(TrickKind::Grab));
        s.start();
        assert!(s.handle_trick(TrickKind::Grab));
        assert_eq!(s.tricks.current_tricks().len(), 1);
    }

    #[test]
    fn test_resize_moves_rider_anchor() {
        let mut s = state();
        s.resize(1000.0, 800.0);
        assert_eq!(s.rider.pos, Vec2::new(200.0, 600.0));
        assert_eq!(s.terrain.ground_level(), 600.0);
    }

    #[test]
    fn test_settings_round_trip() {
        let mut s = state();
        s.set_particles(false);
        s.set_mode(GameMode::Zen);
        let settings = s.settings();
        assert!(!settings.particles);
        assert_eq!(settings.mode, GameMode::Zen);
    }

    proptest! {
        #[test]
        fn prop_reset_restores_rider_position(seed in any::<u64>(), resets in 1usize..5) {
            let mut s = GameState::new(seed, 800.0, 600.0, &Settings::default(), Tuning::default());
            let origin = s.rider.pos;
            s.start();
            s.rider.jump();
            s.rider.update(0.1, Default::default());
            for _ in 0..resets {
                s.reset();
                prop_assert_eq!(s.rider.pos, origin);
                prop_assert!(s.rider.is_grounded());
                prop_assert_eq!(s.rider.rotation, 0.0);
            }
        }
    }
}
