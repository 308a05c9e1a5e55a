//! Turn-phase state machine types and per-session game state.
//!
//! Exactly one `GameState` exists per game session. It is owned by the
//! turn engine and mutated only through its operations; everything else
//! reads it through shared references.

use std::collections::BTreeMap;

use crate::config::PLAYER_COUNT;
use crate::map::region::{Player, ALL_PLAYERS};

/// The phase of the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnPhase {
    /// Waiting for the current player to roll the die.
    AwaitingRoll,
    /// A roll is resolving. Transient: `roll_dice` enters and leaves it
    /// within a single call.
    Rolling,
    /// A capture face was rolled with neutral regions left; the current
    /// player may capture one region or end the turn.
    CapturePhase,
    /// The roll is spent; waiting for the end-turn action.
    AwaitingEndTurn,
    /// Terminal: a player won or the game ended in a draw.
    GameOver,
}

/// Result of a win-condition evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Play continues.
    Ongoing,
    /// A single player won, by threshold or by points.
    Victory { winner: Player, message: String },
    /// Every region is captured and the top score is tied.
    Draw { leaders: Vec<Player>, message: String },
}

impl Outcome {
    /// Returns true for `Victory` and `Draw`.
    pub fn is_over(&self) -> bool {
        !matches!(self, Outcome::Ongoing)
    }

    /// Returns the winner for a `Victory`, None otherwise.
    pub fn winner(&self) -> Option<Player> {
        match self {
            Outcome::Victory { winner, .. } => Some(*winner),
            _ => None,
        }
    }
}

/// Mutable state of one game session.
#[derive(Debug, Clone)]
pub struct GameState {
    /// Whose turn it is.
    pub current_player: Player,
    /// Die result for this turn; 0 means not yet rolled.
    pub dice_result: u8,
    /// Current phase of the turn state machine.
    pub phase: TurnPhase,
    /// Winner once the game is over; None for a draw or an unfinished game.
    pub winner: Option<Player>,
    /// Captured-region count per player, indexed by `Player::index`.
    pub scores: [u32; PLAYER_COUNT],
}

impl GameState {
    /// Initial state: player 1 to roll, nothing captured.
    pub fn new() -> GameState {
        GameState {
            current_player: Player::One,
            dice_result: 0,
            phase: TurnPhase::AwaitingRoll,
            winner: None,
            scores: [0; PLAYER_COUNT],
        }
    }

    /// Returns true once the terminal phase is reached.
    pub fn is_game_over(&self) -> bool {
        self.phase == TurnPhase::GameOver
    }

    /// Returns true while a capture is allowed.
    pub fn capture_phase_active(&self) -> bool {
        self.phase == TurnPhase::CapturePhase
    }

    /// Returns the given player's score.
    pub fn score_of(&self, player: Player) -> u32 {
        self.scores[player.index()]
    }

    /// Returns the full scoreboard keyed by player.
    pub fn scoreboard(&self) -> BTreeMap<Player, u32> {
        ALL_PLAYERS
            .iter()
            .map(|&p| (p, self.score_of(p)))
            .collect()
    }
}

impl Default for GameState {
    fn default() -> Self {
        GameState::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state() {
        let state = GameState::new();
        assert_eq!(state.current_player, Player::One);
        assert_eq!(state.dice_result, 0);
        assert_eq!(state.phase, TurnPhase::AwaitingRoll);
        assert_eq!(state.winner, None);
        assert!(!state.is_game_over());
        assert!(!state.capture_phase_active());
    }

    #[test]
    fn scoreboard_covers_all_players() {
        let mut state = GameState::new();
        state.scores = [3, 0, 2, 1];
        let board = state.scoreboard();
        assert_eq!(board.len(), 4);
        assert_eq!(board[&Player::One], 3);
        assert_eq!(board[&Player::Four], 1);
    }

    #[test]
    fn outcome_accessors() {
        assert!(!Outcome::Ongoing.is_over());
        let win = Outcome::Victory {
            winner: Player::Two,
            message: String::new(),
        };
        assert!(win.is_over());
        assert_eq!(win.winner(), Some(Player::Two));
        let draw = Outcome::Draw {
            leaders: vec![Player::One, Player::Two],
            message: String::new(),
        };
        assert!(draw.is_over());
        assert_eq!(draw.winner(), None);
    }
}
