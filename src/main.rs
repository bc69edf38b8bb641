//! Match Cascade headless driver
//!
//! Plays a level for a number of turns, picking a random legal move each
//! turn from the engine's own RNG, then prints the final board and a JSON
//! summary. Same seed, same game.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;
    use rand::seq::IndexedRandom;
    use serde::Serialize;

    use match_cascade::board::{TileKind, get_valid_moves};
    use match_cascade::{Engine, EngineConfig, LevelConfig, TurnResult};

    const DEFAULT_SEED: u64 = 0x5EED;

    #[derive(Debug, Parser)]
    #[command(name = "match-cascade", about = "Play a level headlessly with the board engine")]
    struct Args {
        /// Level JSON (a classic level with no blockers if omitted)
        #[arg(long)]
        level: Option<PathBuf>,
        /// Engine tuning JSON
        #[arg(long)]
        config: Option<PathBuf>,
        /// RNG seed, overrides the level's own
        #[arg(long)]
        seed: Option<u64>,
        /// Turns to play
        #[arg(long, default_value_t = 20)]
        turns: u32,
    }

    /// Totals over the whole run
    #[derive(Debug, Default, Serialize)]
    struct Summary {
        seed: u64,
        turns_played: u32,
        score: u64,
        matches: usize,
        cascade_rounds: u32,
        bombs: u32,
        rockets: u32,
        reshuffles: u32,
        truncated_turns: u32,
        exits: usize,
        treasures: u32,
        objective: u32,
        blockers_cleared: usize,
        blockers_left: usize,
        collected: BTreeMap<TileKind, u32>,
    }

    impl Summary {
        fn record(&mut self, result: &TurnResult) {
            self.turns_played += 1;
            self.score += result.score;
            self.matches += result.match_count;
            self.cascade_rounds += result.rounds;
            self.bombs += u32::from(result.was_bomb_triggered());
            self.rockets += u32::from(result.was_rocket_triggered());
            self.reshuffles += u32::from(result.reshuffled);
            self.truncated_turns += u32::from(result.truncated);
            self.exits += result.exits.len();
            self.treasures += result.treasures_collected();
            self.objective += result.objective_collected;
            self.blockers_cleared += result.blocker_deltas.iter().filter(|d| d.cleared).count();
            self.blockers_left = result.blockers.len();
            for (kind, count) in &result.collected {
                *self.collected.entry(*kind).or_insert(0) += count;
            }
        }
    }

    pub fn run() -> Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        let args = Args::parse();

        let level = match &args.level {
            Some(path) => LevelConfig::load(path)
                .with_context(|| format!("loading level {}", path.display()))?,
            None => LevelConfig::default(),
        };
        let config = match &args.config {
            Some(path) => EngineConfig::load(path)
                .with_context(|| format!("loading engine config {}", path.display()))?,
            None => EngineConfig::default(),
        };

        let seed = args.seed.or(level.seed).unwrap_or(DEFAULT_SEED);
        log::info!("Match Cascade starting with seed: {}", seed);

        let mut engine = Engine::new(config, seed);
        let mut grid = level
            .initial_grid(&mut engine)
            .context("building the starting board")?;
        let mut blockers = level.blocker_overlay();
        let mut summary = Summary {
            seed,
            blockers_left: blockers.len(),
            ..Default::default()
        };

        for turn in 1..=args.turns {
            let moves = get_valid_moves(&grid);
            let Some(&mv) = moves.choose(engine.rng()) else {
                log::warn!("No legal move on turn {}, stopping", turn);
                break;
            };

            let result = engine.process_turn(&grid, level.variant, &blockers, Some(mv));
            log::info!(
                "Turn {}: {} -> {}, {} rounds, {} matches, +{}",
                turn,
                mv.from,
                mv.to,
                result.rounds,
                result.match_count,
                result.score
            );
            if result.truncated {
                log::warn!("Turn {} hit the cascade cap", turn);
            }

            summary.record(&result);
            grid = result.grid;
            blockers = result.blockers;
        }

        print!("{grid}");
        println!("{}", serde_json::to_string_pretty(&summary)?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {}
