//! Folded Flight headless runner
//!
//! Flies one run with a scripted pilot and prints the result. Useful for
//! smoke-testing tuning changes without a renderer.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::time::{Duration, Instant};

    use clap::Parser;
    use folded_flight::assets::{AssetManifest, SpriteId};
    use folded_flight::consts::*;
    use folded_flight::sim::{
        FrameState, GameOverEvent, GamePhase, SimulationState, TickInput, Viewport, tick,
    };
    use folded_flight::{
        Difficulty, GameLoop, HighScores, MapId, PlaneColor, SessionConfig, SimError,
    };

    /// Fly one run with the autopilot
    #[derive(Parser, Debug)]
    #[command(name = "folded-flight", version, about)]
    struct Args {
        /// city or forest
        #[arg(long, default_value = "city")]
        map: MapId,
        /// white, red, blue or yellow
        #[arg(long, default_value = "white")]
        plane: PlaneColor,
        /// normal or hard
        #[arg(long, default_value = "normal")]
        difficulty: Difficulty,
        #[arg(long, default_value_t = 1)]
        seed: u64,
        #[arg(long, default_value_t = 1280.0)]
        width: f32,
        #[arg(long, default_value_t = 720.0)]
        height: f32,
        /// Give up after this much simulated time
        #[arg(long, default_value_t = 120.0)]
        max_seconds: f32,
        /// Run on the threaded loop in real time instead of stepping directly
        #[arg(long)]
        realtime: bool,
        /// Pretend the coin sprite failed to load
        #[arg(long)]
        no_coins: bool,
        /// Existing leaderboard JSON to record the run into
        #[arg(long)]
        scores: Option<String>,
    }

    /// Stay in the middle band and steer around whatever is coming next
    fn autopilot(frame: &FrameState, viewport: Viewport) -> TickInput {
        let plane = frame.plane.pos;
        let ahead = frame
            .obstacles
            .iter()
            .filter(|o| o.pos.x + o.size.x > plane.x && o.pos.x < plane.x + viewport.width * 0.5)
            .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x));

        let (climb, dive) = match ahead {
            // Grounded obstacles touch the bottom edge
            Some(o) if o.pos.y + o.size.y >= viewport.height - 1.0 => {
                (plane.y > o.pos.y - PLANE_SPRITE_SIZE * 0.5, false)
            }
            Some(o) => (false, plane.y < o.pos.y + o.size.y + PLANE_SPRITE_SIZE * 0.5),
            None => (plane.y > viewport.height * 0.65, plane.y < viewport.height * 0.35),
        };
        TickInput::held(climb, dive)
    }

    fn fly_stepped(
        mut state: SimulationState,
        max_seconds: f32,
    ) -> Result<Option<GameOverEvent>, SimError> {
        let viewport = state.viewport();
        state.launch()?;
        let max_ticks = (max_seconds / FRAME_DT).ceil() as u64;
        for _ in 0..max_ticks {
            let input = autopilot(&state.frame(), viewport);
            if let Some(event) = tick(&mut state, &input, FRAME_DT) {
                return Ok(Some(event));
            }
        }
        log::info!("Autopilot survived {:.0}s at {} m", state.survival_time(), state.distance_m());
        Ok(None)
    }

    fn fly_realtime(
        state: SimulationState,
        max_seconds: f32,
    ) -> Result<Option<GameOverEvent>, SimError> {
        let viewport = state.viewport();
        let mut game = GameLoop::start(state)?;
        game.launch();

        let deadline = Instant::now() + Duration::from_secs_f32(max_seconds);
        let mut result = None;
        while Instant::now() < deadline {
            if let Some(event) = game.try_recv_game_over() {
                result = Some(event);
                break;
            }
            if let Some(frame) = game.latest_frame()
                && frame.phase == GamePhase::Flying
            {
                let input = autopilot(&frame, viewport);
                game.set_climb_pressed(input.climb.unwrap_or(false));
                game.set_dive_pressed(input.dive.unwrap_or(false));
            }
            std::thread::sleep(Duration::from_secs_f32(FRAME_DT));
        }

        game.stop();
        Ok(result)
    }

    pub fn run() -> Result<(), SimError> {
        let args = Args::parse();
        let config = SessionConfig::new(args.map, args.plane, args.difficulty);

        let mut manifest = AssetManifest::uniform(256);
        if args.no_coins {
            manifest = manifest.without(SpriteId::Coin);
        }
        let viewport = Viewport::new(args.width, args.height);
        let state = SimulationState::new(config, manifest, viewport, args.seed)?;

        let outcome = if args.realtime {
            fly_realtime(state, args.max_seconds)?
        } else {
            fly_stepped(state, args.max_seconds)?
        };

        let Some(event) = outcome else {
            println!("No crash within {}s", args.max_seconds);
            return Ok(());
        };
        println!("{}", serde_json::to_string(&event)?);

        let mut scores = match &args.scores {
            Some(json) => HighScores::from_json(json)?,
            None => HighScores::new(),
        };
        match scores.record(&event) {
            Some(rank) => println!("Leaderboard rank #{}", rank),
            None => println!("Did not make the leaderboard"),
        }
        println!("{}", scores.to_json()?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Folded Flight (headless) starting...");

    if let Err(err) = native::run() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The wasm build is a library consumed by the embedding renderer
}
