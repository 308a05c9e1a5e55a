//! Game state machine: phases, turns, captures, and win conditions.

pub mod events;
pub mod state;
pub mod turn;

pub use events::GameEvent;
pub use state::{GameState, Outcome, TurnPhase};
pub use turn::{Capture, CaptureRejection, HighlightSet, SetupError, TurnEngine, TurnError};
