//! Outbound notifications for the rendering/UI layer.
//!
//! The orchestrator queues these as it processes inputs; consumers drain
//! the queue and translate each event into whatever presentation they
//! own (DOM updates, canvas redraws, terminal output).

use std::collections::BTreeMap;

use crate::map::region::Player;

/// A state-change notification.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// The die resolved to a face value.
    DiceRolled(u8),

    /// A capture attempt finished.
    CaptureResult {
        region: String,
        success: bool,
        reason: Option<String>,
    },

    /// The active player changed.
    TurnChanged(Player),

    /// One or more scores changed; carries the full scoreboard.
    ScoresChanged(BTreeMap<Player, u32>),

    /// The game ended. `winner` is None for a draw.
    GameOver {
        winner: Option<Player>,
        message: String,
    },

    /// The viewport transform changed.
    TransformChanged {
        scale: f64,
        translate_x: f64,
        translate_y: f64,
    },

    /// Capture-phase highlighting. All-empty sets clear every highlight.
    TerritoryHighlights {
        available: Vec<String>,
        unavailable: Vec<String>,
        capturable: Vec<String>,
    },

    /// A human-readable status line for the turn banner.
    StatusMessage(String),
}
