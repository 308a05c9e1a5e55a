//! Random self-play simulation.
//!
//! Plays complete games with random rolls and random eligible captures,
//! to check that the rules terminate and to measure outcome balance
//! across seat positions. Games run concurrently with rayon when
//! `threads > 1`; each game is deterministic in its own seed.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::PLAYER_COUNT;
use crate::game::state::TurnPhase;
use crate::game::turn::{SetupError, TurnEngine};
use crate::map::geometry::BBox;
use crate::map::loader::{MapDef, RegionDef};
use crate::map::region::{Player, WorldMap};

/// Safety cap on rolls per game; no legal game comes anywhere close.
const MAX_TURNS: u32 = 1_000_000;

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Number of games to play.
    pub num_games: usize,
    /// Number of parallel threads (1 = serial).
    pub threads: usize,
    /// Base random seed; 0 seeds from entropy.
    pub seed: u64,
    /// Demo map grid size.
    pub grid_cols: usize,
    pub grid_rows: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            num_games: 100,
            threads: 4,
            seed: 0,
            grid_cols: 5,
            grid_rows: 4,
        }
    }
}

/// Outcome of one simulated game.
#[derive(Debug, Clone)]
pub struct GameSummary {
    /// Winner, or None for a draw (or the safety cap, which never fires
    /// in practice).
    pub winner: Option<Player>,
    /// Number of dice rolls played.
    pub turns: u32,
    /// Number of successful captures, start assignments excluded.
    pub captures: u32,
}

/// Aggregated statistics over a simulation run.
#[derive(Debug, Clone, Default)]
pub struct SimulationStats {
    pub games: usize,
    pub wins: [usize; PLAYER_COUNT],
    pub draws: usize,
    pub avg_turns: f64,
}

/// Produces a rectangular demo map of `cols x rows` touching cells.
///
/// Cells share edges (and, within the adjacency tolerance, corners), so
/// the board is richly connected and every random game terminates.
pub fn grid_map(cols: usize, rows: usize) -> MapDef {
    let mut regions = Vec::with_capacity(cols * rows);
    for row in 0..rows {
        for col in 0..cols {
            regions.push(RegionDef {
                id: format!("cell_{}_{}", row, col),
                bounds: BBox::new(col as f64 * 100.0, row as f64 * 80.0, 100.0, 80.0),
            });
        }
    }
    MapDef {
        name: format!("grid {}x{}", cols, rows),
        regions,
    }
}

/// Plays one game to completion with uniformly random legal actions:
/// random rolls, and on every open capture phase a random eligible
/// target (preferring none when none exists).
pub fn play_random_game(map: &MapDef, seed: u64) -> Result<GameSummary, SetupError> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let world = WorldMap::build(map, &map.region_ids());
    let mut engine = TurnEngine::start(world, &mut rng)?;

    let mut turns = 0;
    let mut captures = 0;
    while !engine.state().is_game_over() && turns < MAX_TURNS {
        // The roll only fails once the game is over, which the loop
        // condition already rules out.
        let _ = engine.roll_dice(&mut rng, None);
        turns += 1;

        if engine.phase() == TurnPhase::CapturePhase {
            let set = engine.highlight_set();
            let mut targets = set.available;
            targets.extend(set.capturable);
            if !targets.is_empty() {
                let target = &targets[rng.gen_range(0..targets.len())];
                if engine.attempt_capture(target).is_ok() {
                    captures += 1;
                }
            }
        }
        if !engine.state().is_game_over() {
            let _ = engine.end_turn();
        }
    }

    Ok(GameSummary {
        winner: engine.state().winner,
        turns,
        captures,
    })
}

/// Runs the configured number of games and aggregates the results.
pub fn run_simulations(config: &SimulationConfig) -> Result<SimulationStats, SetupError> {
    let map = grid_map(config.grid_cols, config.grid_rows);
    let base_seed = if config.seed == 0 {
        SmallRng::from_entropy().gen()
    } else {
        config.seed
    };

    let summaries: Vec<GameSummary> = if config.threads > 1 {
        use rayon::prelude::*;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build()
            .expect("failed to build rayon thread pool");
        pool.install(|| {
            (0..config.num_games)
                .into_par_iter()
                .map(|i| play_random_game(&map, base_seed.wrapping_add(i as u64)))
                .collect::<Result<Vec<_>, _>>()
        })?
    } else {
        (0..config.num_games)
            .map(|i| play_random_game(&map, base_seed.wrapping_add(i as u64)))
            .collect::<Result<Vec<_>, _>>()?
    };

    let mut stats = SimulationStats {
        games: summaries.len(),
        ..SimulationStats::default()
    };
    let mut total_turns = 0u64;
    for summary in &summaries {
        match summary.winner {
            Some(player) => stats.wins[player.index()] += 1,
            None => stats.draws += 1,
        }
        total_turns += u64::from(summary.turns);
    }
    if stats.games > 0 {
        stats.avg_turns = total_turns as f64 / stats.games as f64;
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_map_is_connected() {
        let def = grid_map(5, 4);
        assert_eq!(def.regions.len(), 20);
        let world = WorldMap::build(&def, &def.region_ids());
        // An interior cell touches all eight surrounding cells.
        let center = world.region("cell_1_1").unwrap();
        assert_eq!(center.neighbors.len(), 8);
        // A corner cell touches three.
        let corner = world.region("cell_0_0").unwrap();
        assert_eq!(corner.neighbors.len(), 3);
    }

    #[test]
    fn seeded_game_terminates_and_is_reproducible() {
        let map = grid_map(5, 4);
        let first = play_random_game(&map, 1234).unwrap();
        let second = play_random_game(&map, 1234).unwrap();

        assert!(first.turns < MAX_TURNS);
        assert_eq!(first.winner, second.winner);
        assert_eq!(first.turns, second.turns);
        assert_eq!(first.captures, second.captures);
    }

    #[test]
    fn serial_run_aggregates_all_games() {
        let config = SimulationConfig {
            num_games: 5,
            threads: 1,
            seed: 99,
            grid_cols: 5,
            grid_rows: 4,
        };
        let stats = run_simulations(&config).unwrap();
        assert_eq!(stats.games, 5);
        let decided: usize = stats.wins.iter().sum();
        assert_eq!(decided + stats.draws, 5);
        assert!(stats.avg_turns > 0.0);
    }
}
