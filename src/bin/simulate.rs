//! Self-play simulation CLI.
//!
//! Plays many random games and prints win statistics per seat.
//!
//! Usage:
//!   cargo run --release --bin simulate -- [OPTIONS]
//!
//! Options:
//!   --games N    Number of games to play (default: 100)
//!   --threads N  Number of parallel threads (default: 4)
//!   --seed N     Random seed, 0 for entropy (default: 0)
//!   --cols N     Demo map grid columns (default: 5)
//!   --rows N     Demo map grid rows (default: 4)

use std::env;
use std::time::Instant;

use tracing_subscriber::EnvFilter;

use irredenta::map::region::ALL_PLAYERS;
use irredenta::simulate::{run_simulations, SimulationConfig};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let args: Vec<String> = env::args().collect();
    let mut config = SimulationConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--games" => {
                i += 1;
                config.num_games = args[i].parse().expect("invalid --games value");
            }
            "--threads" => {
                i += 1;
                config.threads = args[i].parse().expect("invalid --threads value");
            }
            "--seed" => {
                i += 1;
                config.seed = args[i].parse().expect("invalid --seed value");
            }
            "--cols" => {
                i += 1;
                config.grid_cols = args[i].parse().expect("invalid --cols value");
            }
            "--rows" => {
                i += 1;
                config.grid_rows = args[i].parse().expect("invalid --rows value");
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let started = Instant::now();
    let stats = match run_simulations(&config) {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("simulation failed: {}", e);
            std::process::exit(1);
        }
    };
    let elapsed = started.elapsed();

    println!(
        "{} games on a {}x{} grid in {:.2}s",
        stats.games,
        config.grid_cols,
        config.grid_rows,
        elapsed.as_secs_f64()
    );
    for player in ALL_PLAYERS {
        let wins = stats.wins[player.index()];
        println!(
            "player {}: {} wins ({:.1}%)",
            player,
            wins,
            100.0 * wins as f64 / stats.games.max(1) as f64
        );
    }
    println!(
        "draws: {} ({:.1}%)",
        stats.draws,
        100.0 * stats.draws as f64 / stats.games.max(1) as f64
    );
    println!("average rolls per game: {:.1}", stats.avg_turns);
}

fn print_usage() {
    eprintln!("Usage: simulate [--games N] [--threads N] [--seed N] [--cols N] [--rows N]");
}
