//! Irredenta -- an interactive territory-control game session.
//!
//! Reads commands from stdin and writes game notifications to stdout,
//! one event per line. Start a game with `new <map.json> [seed]`, then
//! drive it with `roll`, `capture <region>`, `end`, `focus <player>`,
//! `zoom`, `pan`, and `state`.

use std::io::{self, BufRead, BufWriter, Write};

use tracing_subscriber::EnvFilter;

use irredenta::game::events::GameEvent;
use irredenta::map::loader::MapDef;
use irredenta::map::region::{Player, ALL_PLAYERS};
use irredenta::orchestrator::{GameOrchestrator, OrchestratorOptions};
use irredenta::protocol::{parse_command, Command};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(io::stderr)
        .init();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut session: Option<GameOrchestrator<MapDef>> = None;

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        let cmd = match parse_command(&line) {
            Some(c) => c,
            None => continue,
        };

        match cmd {
            Command::NewGame { path, seed } => match start_game(&path, seed) {
                Ok(orchestrator) => {
                    session = Some(orchestrator);
                    writeln!(out, "game started from {}", path).ok();
                }
                Err(e) => eprintln!("new: {}", e),
            },
            Command::Roll { forced } => {
                if let Some(game) = session.as_mut() {
                    game.roll(forced);
                } else {
                    eprintln!("roll: no game in progress");
                }
            }
            Command::Capture { region } => {
                if let Some(game) = session.as_mut() {
                    game.region_clicked(&region);
                } else {
                    eprintln!("capture: no game in progress");
                }
            }
            Command::EndTurn => {
                if let Some(game) = session.as_mut() {
                    game.end_turn_pressed();
                } else {
                    eprintln!("end: no game in progress");
                }
            }
            Command::ShowState => {
                if let Some(game) = session.as_ref() {
                    print_state(&mut out, game);
                } else {
                    eprintln!("state: no game in progress");
                }
            }
            Command::Focus { player } => match (session.as_mut(), Player::from_number(player)) {
                (Some(game), Some(player)) => game.score_entry_clicked(player),
                (None, _) => eprintln!("focus: no game in progress"),
                (_, None) => eprintln!("focus: player must be 1-4"),
            },
            Command::Zoom { direction, x, y } => {
                if let Some(game) = session.as_mut() {
                    game.wheel(x, y, direction);
                }
            }
            Command::Pan { dx, dy } => {
                if let Some(game) = session.as_mut() {
                    game.pointer_down(0.0, 0.0);
                    game.pointer_move(dx, dy);
                    game.pointer_up();
                }
            }
            Command::Quit => break,
        }

        if let Some(game) = session.as_mut() {
            for event in game.drain_events() {
                print_event(&mut out, &event);
            }
        }
        out.flush().ok();
    }
}

fn start_game(path: &str, seed: Option<u64>) -> Result<GameOrchestrator<MapDef>, String> {
    let def = MapDef::from_path(path).map_err(|e| e.to_string())?;
    let ids = def.region_ids();
    let options = OrchestratorOptions {
        seed,
        ..OrchestratorOptions::default()
    };
    GameOrchestrator::new(def, &ids, options).map_err(|e| e.to_string())
}

fn print_state<W: Write>(out: &mut W, game: &GameOrchestrator<MapDef>) {
    let state = game.engine().state();
    writeln!(out, "phase {:?}", state.phase).ok();
    writeln!(out, "player {}", state.current_player).ok();
    for player in ALL_PLAYERS {
        writeln!(out, "score {} {}", player, state.score_of(player)).ok();
    }
}

fn print_event<W: Write>(out: &mut W, event: &GameEvent) {
    match event {
        GameEvent::DiceRolled(value) => {
            writeln!(out, "dice {}", value).ok();
        }
        GameEvent::CaptureResult {
            region,
            success,
            reason,
        } => {
            if *success {
                writeln!(out, "capture {} ok", region).ok();
            } else {
                writeln!(
                    out,
                    "capture {} rejected: {}",
                    region,
                    reason.as_deref().unwrap_or("unknown")
                )
                .ok();
            }
        }
        GameEvent::TurnChanged(player) => {
            writeln!(out, "turn {}", player).ok();
        }
        GameEvent::ScoresChanged(scores) => {
            let parts: Vec<String> = scores.iter().map(|(p, s)| format!("{}={}", p, s)).collect();
            writeln!(out, "scores {}", parts.join(" ")).ok();
        }
        GameEvent::GameOver { winner, message } => {
            match winner {
                Some(player) => writeln!(out, "gameover winner={} {}", player, message),
                None => writeln!(out, "gameover draw {}", message),
            }
            .ok();
        }
        GameEvent::TransformChanged {
            scale,
            translate_x,
            translate_y,
        } => {
            writeln!(
                out,
                "transform {:.3} {:.1} {:.1}",
                scale, translate_x, translate_y
            )
            .ok();
        }
        GameEvent::TerritoryHighlights {
            available,
            unavailable,
            capturable,
        } => {
            writeln!(
                out,
                "highlight available={} unavailable={} capturable={}",
                available.join(","),
                unavailable.join(","),
                capturable.join(",")
            )
            .ok();
        }
        GameEvent::StatusMessage(message) => {
            writeln!(out, "status {}", message).ok();
        }
    }
}
