//! Powder Run entry point
//!
//! The browser build is driven entirely through `platform::web`. Natively
//! this runs a headless autopilot ride, handy for smoke testing a tuning file.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;
    use std::process::ExitCode;
    use std::time::{SystemTime, UNIX_EPOCH};

    use clap::Parser;
    use env_logger::{Builder, Env};
    use log::LevelFilter;

    use powder_run::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
    use powder_run::{GameMode, Settings, Tuning};

    /// Headless autopilot run of the snowboarding simulation
    #[derive(Parser)]
    #[command(author, version, about, long_about = None)]
    struct Args {
        /// Run seed (defaults to the clock)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Game mode: adventure or zen
        #[arg(short, long, default_value = "adventure", value_parser = parse_mode)]
        mode: GameMode,

        /// Simulated seconds to ride
        #[arg(long, default_value_t = 60.0)]
        seconds: f32,

        /// Frames per simulated second
        #[arg(long, default_value_t = 60)]
        fps: u32,

        /// JSON balance sheet overriding the default tuning
        #[arg(short, long)]
        tuning: Option<PathBuf>,

        /// Print the final HUD as JSON
        #[arg(long)]
        json: bool,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    }

    fn parse_mode(s: &str) -> Result<GameMode, String> {
        GameMode::from_str(s).ok_or_else(|| format!("unknown mode '{s}' (expected adventure or zen)"))
    }

    fn init_logging(verbose: bool) {
        let level = if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };
        let env = Env::default().default_filter_or(level.to_string());
        let _ = Builder::from_env(env).try_init();
    }

    #[derive(Debug, Default)]
    struct RideStats {
        jumps: u32,
        ramp_launches: u32,
        landings: u32,
        rail_ticks: u32,
        wipeouts: u32,
    }

    impl RideStats {
        fn record(&mut self, events: &[GameEvent]) {
            for event in events {
                match event {
                    GameEvent::Jumped => self.jumps += 1,
                    GameEvent::RampLaunch { .. } => self.ramp_launches += 1,
                    GameEvent::Landed { .. } => self.landings += 1,
                    GameEvent::RailBonus { .. } => self.rail_ticks += 1,
                    GameEvent::Wipeout => self.wipeouts += 1,
                    GameEvent::Crashed { .. } => {}
                }
            }
        }
    }

    pub fn run() -> ExitCode {
        let args = Args::parse();
        init_logging(args.verbose);

        let tuning = match &args.tuning {
            Some(path) => match Tuning::load(path) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Rejected tuning {}: {}", path.display(), e);
                    return ExitCode::FAILURE;
                }
            },
            None => Tuning::default(),
        };

        let seed = args.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        });

        let settings = Settings {
            mode: args.mode,
            particles: false,
            ..Settings::default()
        };
        let mut state = GameState::new(seed, 1280.0, 720.0, &settings, tuning);
        state.start();

        let fps = args.fps.max(1);
        let dt = 1.0 / fps as f32;
        let frames = (args.seconds.max(0.0) * fps as f32) as u64;
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };

        let mut stats = RideStats::default();
        let mut ridden = 0;
        for _ in 0..frames {
            tick(&mut state, &input, dt);
            stats.record(&state.events);
            ridden += 1;
            if state.phase == GamePhase::GameOver {
                break;
            }
        }

        let hud = state.hud();
        if args.json {
            match serde_json::to_string_pretty(&hud) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    log::error!("Could not serialize HUD: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        } else {
            println!("seed         {}", seed);
            println!("mode         {}", state.mode.as_str());
            println!("time         {:.1}s", ridden as f32 * dt);
            println!("outcome      {}", hud.phase.as_str());
            println!("score        {}", hud.score);
            println!("distance     {:.0}m", hud.distance);
            println!("tricks       {}", hud.tricks_landed);
            println!("best combo   x{:.1}", hud.best_combo);
            println!(
                "jumps {} | ramps {} | landings {} | rail ticks {} | wipeouts {}",
                stats.jumps, stats.ramp_launches, stats.landings, stats.rail_ticks, stats.wipeouts
            );
        }

        ExitCode::SUCCESS
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::wasm_start, this is just to satisfy the compiler
}
