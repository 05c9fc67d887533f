//! Neon Runner headless runner
//!
//! Plays one run under the autopilot with slightly jittery frame deltas and
//! prints a JSON summary. `RUST_LOG=info` shows the run's progress.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;
    use serde::Serialize;

    use neon_runner::engine::EngineObserver;
    use neon_runner::records::{JsonFileStore, LocalRecords};
    use neon_runner::sim::{GamePhase, LevelChange, rng::cosmetic_hash};
    use neon_runner::{Autopilot, Engine, RunConfig, Skin};

    #[derive(Parser)]
    #[command(name = "neon-runner")]
    #[command(about = "Play a headless run of the runner simulation")]
    struct Cli {
        /// Seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
        /// Skin identifier, e.g. runner-red
        #[arg(long)]
        skin: Option<String>,
        /// Stop after this many steps if the run is still going
        #[arg(long, default_value_t = 7200)]
        ticks: u32,
        /// Nominal frame length in ms
        #[arg(long, default_value_t = 1000.0 / 60.0)]
        frame_ms: f64,
        /// JSON run config (skin, viewport, seed)
        #[arg(long)]
        config: Option<PathBuf>,
        /// JSON records file for the high score and selected skin
        #[arg(long)]
        records: Option<PathBuf>,
        /// Send no commands (the runner hits the first hazard)
        #[arg(long)]
        no_autopilot: bool,
    }

    /// Prints level banners as they happen
    struct Banner;

    impl EngineObserver for Banner {
        fn on_level_changed(&mut self, change: &LevelChange) {
            println!("LEVEL {}: {}", change.to, change.message);
        }

        fn on_game_over(&mut self, final_score: u32) {
            println!("GAME OVER: {final_score} coins");
        }
    }

    #[derive(Serialize)]
    struct Summary {
        seed: u64,
        skin: Skin,
        phase: GamePhase,
        steps: u32,
        coins: u32,
        distance_m: u64,
        level: u8,
        scroll_speed: f32,
        high_score: Option<u32>,
        new_record: bool,
    }

    pub fn run() -> Result<()> {
        env_logger::init();
        let cli = Cli::parse();

        let mut config = match &cli.config {
            Some(path) => RunConfig::load_json(path)
                .with_context(|| format!("loading run config {}", path.display()))?,
            None => RunConfig::default(),
        };

        let mut store = match &cli.records {
            Some(path) => Some(
                JsonFileStore::open(path)
                    .with_context(|| format!("opening records {}", path.display()))?,
            ),
            None => None,
        };
        let mut records = match &store {
            Some(store) => Some(LocalRecords::load(store)?),
            None => None,
        };

        if let Some(seed) = cli.seed {
            config = config.with_seed(seed);
        }
        match (&cli.skin, &records) {
            (Some(id), _) => config = config.with_skin(Skin::from_id_or_default(id)),
            (None, Some(records)) if cli.config.is_none() => {
                config = config.with_skin(records.selected_skin)
            }
            _ => {}
        }

        let mut engine = Engine::new(config.clone())?;
        engine.add_observer(Box::new(Banner));
        engine.start(config)?;

        let pilot = Autopilot::default();
        let mut steps = 0;
        while steps < cli.ticks && engine.phase() == GamePhase::Running {
            if !cli.no_autopilot {
                pilot.drive(&mut engine);
            }
            // +-2ms of display jitter
            let jitter = (cosmetic_hash(u64::from(steps), 11) % 5) as f64 - 2.0;
            engine.step(cli.frame_ms + jitter);
            steps += 1;
        }

        let snapshot = engine.snapshot();
        let mut new_record = false;
        if let (Some(store), Some(records)) = (store.as_mut(), records.as_mut()) {
            if engine.is_game_over() {
                new_record = records.record_run(snapshot.score);
            }
            records.select_skin(snapshot.skin);
            records.save(store)?;
        }

        let summary = Summary {
            seed: engine.state().seed,
            skin: snapshot.skin,
            phase: snapshot.phase,
            steps,
            coins: snapshot.score,
            distance_m: snapshot.display_distance,
            level: snapshot.level,
            scroll_speed: snapshot.scroll_speed,
            high_score: records.map(|r| r.high_score),
            new_record,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts embed the library directly
}
