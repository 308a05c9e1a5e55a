//! Fixed game configuration.
//!
//! These values are part of the game design, not runtime options:
//! four players, win at 15 regions, a six-sided die, zoom bounds
//! [0.5, 10] with a 1.1 step, and a 1-unit adjacency tolerance.

/// Number of players in every game.
pub const PLAYER_COUNT: usize = 4;

/// Captured-region count at which a player wins outright.
pub const WIN_THRESHOLD: u32 = 15;

/// Starting regions assigned to each player.
pub const STARTING_REGIONS_PER_PLAYER: usize = 1;

/// Number of faces on the capture die.
pub const DICE_FACES: u8 = 6;

/// Die face that opens a capture phase.
pub const CAPTURE_FACE: u8 = 6;

/// Minimum viewport scale.
pub const MIN_SCALE: f64 = 0.5;

/// Maximum viewport scale.
pub const MAX_SCALE: f64 = 10.0;

/// Multiplicative zoom step applied per wheel notch.
pub const ZOOM_STEP: f64 = 1.1;

/// Overlap tolerance for the bounding-box adjacency test, in content units.
pub const ADJACENCY_TOLERANCE: f64 = 1.0;

/// Target scale when focusing the viewport on a region.
pub const FOCUS_SCALE: f64 = 3.0;

/// Fill color for neutral regions.
pub const NEUTRAL_COLOR: &str = "#cccccc";
