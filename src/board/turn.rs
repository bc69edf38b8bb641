//! Turn resolution: the cascade loop
//!
//! One call resolves a whole player turn. Round 0 may arm a special from the
//! player's swap; every later round is plain matching on the refilled board.
//! The loop ends when a round finds nothing, or at the configured round cap.

use std::collections::{BTreeMap, BTreeSet};

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::blockers::{BlockerDelta, Blockers, apply_pressure};
use super::generate::create_valid_board;
use super::gravity::{GravityReport, drop_tiles};
use super::grid::{Coord, Grid, Move, TileKind, Variant};
use super::matches::{Match, find_matches, match_score};
use super::shuffle::{check_if_game_impossible, rearrange_board, reshuffle_until_playable};
use super::specials::{Trigger, detect_trigger};
use crate::config::EngineConfig;
use crate::consts::BOARD_SIZE;

/// An exiting piece that left the board through the bottom row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileExit {
    pub id: u32,
    pub col: usize,
    /// Cascade round it left in
    pub round: u32,
}

/// Everything a turn did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnResult {
    /// Board after the turn (reshuffled if it went dead)
    pub grid: Grid,
    /// Blocker overlay after the turn
    pub blockers: Blockers,
    /// Matches from every round, in the order found
    pub matches: Vec<Match>,
    pub match_count: usize,
    pub score: u64,
    /// Removed or exited tiles, per kind
    pub collected: BTreeMap<TileKind, u32>,
    /// Tiles of the configured objective kind collected
    pub objective_collected: u32,
    pub blocker_deltas: Vec<BlockerDelta>,
    pub exits: Vec<TileExit>,
    /// Special armed by the swap, if any
    pub trigger: Option<Trigger>,
    /// Falls and spawns, one report per cascade round
    pub drops: Vec<GravityReport>,
    pub rounds: u32,
    /// The move was illegal or matched nothing; the board is untouched
    pub move_rejected: bool,
    /// The round cap was hit with matches still on the board
    pub truncated: bool,
    /// The board went dead and was reshuffled
    pub reshuffled: bool,
}

impl TurnResult {
    fn new(grid: Grid, blockers: Blockers) -> Self {
        Self {
            grid,
            blockers,
            matches: Vec::new(),
            match_count: 0,
            score: 0,
            collected: BTreeMap::new(),
            objective_collected: 0,
            blocker_deltas: Vec::new(),
            exits: Vec::new(),
            trigger: None,
            drops: Vec::new(),
            rounds: 0,
            move_rejected: false,
            truncated: false,
            reshuffled: false,
        }
    }

    pub fn was_bomb_triggered(&self) -> bool {
        self.trigger.as_ref().is_some_and(Trigger::is_bomb)
    }

    pub fn was_rocket_triggered(&self) -> bool {
        self.trigger.as_ref().is_some_and(Trigger::is_rocket)
    }

    pub fn collected_of(&self, kind: TileKind) -> u32 {
        self.collected.get(&kind).copied().unwrap_or(0)
    }

    pub fn treasures_collected(&self) -> u32 {
        TileKind::TREASURE.iter().map(|&k| self.collected_of(k)).sum()
    }

    fn collect(&mut self, kind: TileKind) {
        *self.collected.entry(kind).or_insert(0) += 1;
    }
}

/// The board engine: configuration plus the seeded RNG every refill,
/// reveal and reshuffle draws from.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    seed: u64,
    rng: Pcg32,
}

impl Engine {
    pub fn new(config: EngineConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Default tuning
    pub fn with_seed(seed: u64) -> Self {
        Self::new(EngineConfig::default(), seed)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The engine's generator, for callers that want to share it
    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// A match-free starting board with `blockers` marked
    pub fn create_valid_board(&mut self, blockers: &Blockers, variant: Variant) -> Grid {
        create_valid_board(blockers, variant, &mut self.rng)
    }

    /// One unchecked shuffle of the board's tiles
    pub fn rearrange_board(&mut self, grid: &Grid) -> Grid {
        rearrange_board(grid, &mut self.rng)
    }

    /// Shuffle (then redeal if need be) until the board is playable
    pub fn recover_board(&mut self, grid: &Grid, variant: Variant) -> Grid {
        reshuffle_until_playable(
            grid,
            variant.palette(),
            self.config.max_reshuffle_attempts,
            &mut self.rng,
        )
    }

    /// Resolve one turn. With a `mv`, the swap is applied first and rejected
    /// (board untouched) if it is illegal or forms nothing. Without one, any
    /// matches already standing on the board are resolved.
    pub fn process_turn(
        &mut self,
        grid: &Grid,
        variant: Variant,
        blockers: &Blockers,
        mv: Option<Move>,
    ) -> TurnResult {
        let mut result = TurnResult::new(grid.clone(), blockers.clone());
        result.blockers.apply_to(&mut result.grid);

        let mut opening = None;
        if let Some(mv) = mv {
            let swappable = mv.is_adjacent()
                && result.grid.tile(mv.from).is_some()
                && result.grid.tile(mv.to).is_some();
            if !swappable {
                log::debug!("Rejected move {} -> {}: not a swap", mv.from, mv.to);
                result.move_rejected = true;
                return result;
            }

            result.grid.swap(mv.from, mv.to);
            let trigger = detect_trigger(&result.grid, mv.to);
            let matches = find_matches(&result.grid);
            if trigger.is_none() && matches.is_empty() {
                result.grid.swap(mv.from, mv.to);
                log::debug!("Rejected move {} -> {}: no match", mv.from, mv.to);
                result.move_rejected = true;
                return result;
            }
            opening = Some((matches, trigger));
        }

        let palette = variant.palette();
        let mut round = 0;
        loop {
            let (matches, trigger) = opening
                .take()
                .unwrap_or_else(|| (find_matches(&result.grid), None));
            if matches.is_empty() && trigger.is_none() {
                break;
            }
            if round >= self.config.max_cascade_rounds {
                log::warn!(
                    "Cascade still matching after {} rounds, truncating turn",
                    round
                );
                result.truncated = true;
                break;
            }
            self.resolve_round(&mut result, round, matches, trigger, palette);
            round += 1;
        }
        result.rounds = round;

        if let Some(kind) = self.config.collect_kind {
            result.objective_collected = result.collected_of(kind);
        }

        if !result.truncated && check_if_game_impossible(&result.grid) {
            log::info!("No moves left after turn, reshuffling");
            result.grid = self.recover_board(&result.grid, variant);
            result.reshuffled = true;
        }

        log::debug!(
            "Turn done: {} rounds, {} matches, score +{}",
            result.rounds,
            result.match_count,
            result.score
        );
        result
    }

    /// Remove, wear blockers, drop, let exiting pieces out, score
    fn resolve_round(
        &mut self,
        result: &mut TurnResult,
        round: u32,
        matches: Vec<Match>,
        trigger: Option<Trigger>,
        palette: &[TileKind],
    ) {
        let mut cleared: BTreeSet<Coord> =
            matches.iter().flat_map(|m| m.cells.iter().copied()).collect();
        let mut groups: Vec<Vec<Coord>> = matches.iter().map(|m| m.cells.clone()).collect();
        if let Some(trigger) = &trigger {
            cleared.extend(trigger.area.iter().copied());
            groups.push(trigger.area.clone());
        }

        for &at in &cleared {
            if let Some(tile) = result.grid.take(at) {
                result.collect(tile.kind);
            }
        }

        let deltas = apply_pressure(&mut result.blockers, &mut result.grid, &groups, &mut self.rng);
        let mut drop = drop_tiles(&mut result.grid, palette, &mut self.rng);

        let exits = take_exits(&mut result.grid, round);
        if !exits.is_empty() {
            for _ in &exits {
                result.collect(TileKind::Exiting);
            }
            drop.append(drop_tiles(&mut result.grid, palette, &mut self.rng));
        }

        let score: u64 = matches
            .iter()
            .map(|m| {
                match_score(
                    m.len(),
                    self.config.points_per_tile,
                    self.config.bonus_per_extra_tile,
                )
            })
            .sum();
        log::debug!(
            "Round {}: {} matches, {} cleared, {} blockers hit, {} exits, +{}",
            round,
            matches.len(),
            cleared.len(),
            deltas.len(),
            exits.len(),
            score
        );

        result.score += score;
        result.match_count += matches.len();
        result.matches.extend(matches);
        result.blocker_deltas.extend(deltas);
        result.exits.extend(exits);
        result.drops.push(drop);
        if trigger.is_some() {
            result.trigger = trigger;
        }
    }
}

/// Pull every exiting piece off the bottom row
fn take_exits(grid: &mut Grid, round: u32) -> Vec<TileExit> {
    let mut exits = Vec::new();
    for col in 0..BOARD_SIZE {
        let at = Coord::new(BOARD_SIZE - 1, col);
        if grid.tile(at).is_some_and(|t| t.kind == TileKind::Exiting) {
            if let Some(tile) = grid.take(at) {
                exits.push(TileExit {
                    id: tile.id,
                    col,
                    round,
                });
            }
        }
    }
    exits
}
