//! The turn and capture state machine.
//!
//! `TurnEngine` owns the world map and game state and is the only
//! component that mutates ownership and scores. Every operation is a
//! total function: invalid requests reject with a typed reason and leave
//! state untouched, so the score-conservation invariant (sum of scores ==
//! captured region count) holds after every call.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::config::{
    CAPTURE_FACE, DICE_FACES, PLAYER_COUNT, STARTING_REGIONS_PER_PLAYER, WIN_THRESHOLD,
};
use crate::map::region::{Player, WorldMap, ALL_PLAYERS};

use super::state::{GameState, Outcome, TurnPhase};

/// Why a game could not start.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("map has no regions")]
    EmptyMap,

    #[error("{required} starting regions required but only {available} neutral regions exist")]
    NotEnoughRegions { required: usize, available: usize },
}

/// Why a roll or end-turn request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TurnError {
    #[error("the die can only be rolled at the start of a turn")]
    NotAwaitingRoll,

    #[error("the turn cannot be ended before the die is rolled")]
    NotAwaitingEndTurn,

    #[error("the game is already over")]
    GameOver,
}

/// Why a capture attempt was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureRejection {
    #[error("captures are only allowed during the capture phase")]
    NotCapturePhase,

    #[error("unknown region '{0}'")]
    UnknownRegion(String),

    #[error("region '{0}' is already your territory")]
    OwnTerritory(String),

    #[error("region '{0}' does not border your territory")]
    NotAdjacent(String),
}

/// A successful capture.
#[derive(Debug, Clone, PartialEq)]
pub struct Capture {
    pub region: String,
    /// Previous owner; None if the region was neutral.
    pub previous_owner: Option<Player>,
    /// Win-condition verdict evaluated immediately after the mutation.
    pub outcome: Outcome,
}

/// Classification of every region for capture-phase highlighting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HighlightSet {
    /// Neutral regions the current player may capture.
    pub available: Vec<String>,
    /// Neutral regions out of the current player's reach.
    pub unavailable: Vec<String>,
    /// Enemy regions the current player may capture.
    pub capturable: Vec<String>,
}

/// The turn/capture state machine for one game session.
#[derive(Debug)]
pub struct TurnEngine {
    world: WorldMap,
    state: GameState,
    start_regions: BTreeMap<Player, String>,
}

impl TurnEngine {
    /// Assigns starting regions and enters `AwaitingRoll` for player 1.
    ///
    /// The neutral region list is shuffled with a uniform permutation and
    /// consumed sequentially, one region per player in player order. Each
    /// assignment counts toward that player's score. Fails fast when the
    /// map is empty or has fewer neutral regions than players.
    pub fn start(mut world: WorldMap, rng: &mut impl Rng) -> Result<TurnEngine, SetupError> {
        if world.is_empty() {
            return Err(SetupError::EmptyMap);
        }
        let required = PLAYER_COUNT * STARTING_REGIONS_PER_PLAYER;
        let mut neutral = world.neutral_ids();
        if neutral.len() < required {
            return Err(SetupError::NotEnoughRegions {
                required,
                available: neutral.len(),
            });
        }

        neutral.shuffle(rng);

        let mut state = GameState::new();
        let mut start_regions = BTreeMap::new();
        let mut next = 0;
        for player in ALL_PLAYERS {
            for claim in 0..STARTING_REGIONS_PER_PLAYER {
                let id = &neutral[next];
                next += 1;
                world.set_owner(id, Some(player));
                state.scores[player.index()] += 1;
                if claim == 0 {
                    tracing::info!(player = %player, region = %id, "starting region assigned");
                    start_regions.insert(player, id.clone());
                }
            }
        }

        Ok(TurnEngine {
            world,
            state,
            start_regions,
        })
    }

    /// The world map, including current ownership.
    pub fn world(&self) -> &WorldMap {
        &self.world
    }

    /// The current game state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Current phase of the turn state machine.
    pub fn phase(&self) -> TurnPhase {
        self.state.phase
    }

    /// The player whose turn it is.
    pub fn current_player(&self) -> Player {
        self.state.current_player
    }

    /// The region a player started in.
    pub fn start_region(&self, player: Player) -> Option<&str> {
        self.start_regions.get(&player).map(String::as_str)
    }

    /// Rolls the die for the current player.
    ///
    /// Valid only in `AwaitingRoll`. Resolves synchronously to a face
    /// value 1..=6, uniformly random unless `forced` supplies a debug
    /// value (clamped to the die range). A capture face with at least one
    /// neutral region left opens the capture phase; any other result, or
    /// a capture face on a fully-claimed map, goes straight to
    /// `AwaitingEndTurn`.
    pub fn roll_dice(&mut self, rng: &mut impl Rng, forced: Option<u8>) -> Result<u8, TurnError> {
        match self.state.phase {
            TurnPhase::AwaitingRoll => {}
            TurnPhase::GameOver => return Err(TurnError::GameOver),
            _ => return Err(TurnError::NotAwaitingRoll),
        }

        self.state.phase = TurnPhase::Rolling;
        let value = match forced {
            Some(v) => v.clamp(1, DICE_FACES),
            None => rng.gen_range(1..=DICE_FACES),
        };
        self.state.dice_result = value;

        if value == CAPTURE_FACE && self.world.neutral_count() > 0 {
            self.state.phase = TurnPhase::CapturePhase;
        } else {
            self.state.phase = TurnPhase::AwaitingEndTurn;
        }
        Ok(value)
    }

    /// Attempts to capture `region` for the current player.
    ///
    /// Valid only during the capture phase. A player's own region is
    /// never a legal target. A player with score 0 (their territory was
    /// wiped out) may take any neutral region, bypassing adjacency;
    /// otherwise the target must border the player's territory and be
    /// neutral or enemy-owned. On success the ownership and both scores
    /// change together, and the win condition is evaluated immediately.
    pub fn attempt_capture(&mut self, region: &str) -> Result<Capture, CaptureRejection> {
        if self.state.phase != TurnPhase::CapturePhase {
            return Err(CaptureRejection::NotCapturePhase);
        }
        let previous = self.check_eligibility(region)?;
        let player = self.state.current_player;

        self.world.set_owner(region, Some(player));
        self.state.scores[player.index()] += 1;
        if let Some(prev) = previous {
            self.state.scores[prev.index()] -= 1;
        }
        tracing::debug!(player = %player, region = %region, previous = ?previous, "region captured");

        let outcome = self.evaluate_win_condition();
        match &outcome {
            Outcome::Ongoing => self.state.phase = TurnPhase::AwaitingEndTurn,
            Outcome::Victory { winner, message } => {
                self.state.phase = TurnPhase::GameOver;
                self.state.winner = Some(*winner);
                tracing::info!(winner = %winner, %message, "game over");
            }
            Outcome::Draw { message, .. } => {
                self.state.phase = TurnPhase::GameOver;
                self.state.winner = None;
                tracing::info!(%message, "game over");
            }
        }

        Ok(Capture {
            region: region.to_string(),
            previous_owner: previous,
            outcome,
        })
    }

    /// Checks capture eligibility without mutating anything.
    ///
    /// Returns the target's current owner on success.
    fn check_eligibility(&self, region: &str) -> Result<Option<Player>, CaptureRejection> {
        let player = self.state.current_player;
        let target = self
            .world
            .region(region)
            .ok_or_else(|| CaptureRejection::UnknownRegion(region.to_string()))?;

        if target.owner == Some(player) {
            return Err(CaptureRejection::OwnTerritory(region.to_string()));
        }

        // First capture: any neutral region is in reach.
        if self.state.score_of(player) == 0 {
            return if target.owner.is_none() {
                Ok(None)
            } else {
                Err(CaptureRejection::NotAdjacent(region.to_string()))
            };
        }

        let borders_own = target.neighbors.iter().any(|n| {
            self.world
                .region(n)
                .map_or(false, |r| r.owner == Some(player))
        });
        if borders_own {
            Ok(target.owner)
        } else {
            Err(CaptureRejection::NotAdjacent(region.to_string()))
        }
    }

    /// Ends the turn, advancing play to the next player.
    ///
    /// Valid while a capture is still open (declining it) or once the
    /// roll is spent. Resets the die and returns control to
    /// `AwaitingRoll` for the next player in cyclic order.
    pub fn end_turn(&mut self) -> Result<Player, TurnError> {
        match self.state.phase {
            TurnPhase::CapturePhase | TurnPhase::AwaitingEndTurn => {}
            TurnPhase::GameOver => return Err(TurnError::GameOver),
            _ => return Err(TurnError::NotAwaitingEndTurn),
        }

        self.state.current_player = self.state.current_player.next();
        self.state.dice_result = 0;
        self.state.phase = TurnPhase::AwaitingRoll;
        Ok(self.state.current_player)
    }

    /// Evaluates the win condition for the current position.
    ///
    /// Rule order matters: the threshold check on the current player runs
    /// first; only then, if every region is owned, the best score wins or
    /// a tied top score ends the game in a draw listing all leaders.
    pub fn evaluate_win_condition(&self) -> Outcome {
        let player = self.state.current_player;
        if self.state.score_of(player) >= WIN_THRESHOLD {
            return Outcome::Victory {
                winner: player,
                message: format!("ИГРОК {} ПОБЕДИЛ", player.number()),
            };
        }

        let total = self.world.len();
        let captured = self.world.captured_count();
        if total == 0 || captured < total {
            return Outcome::Ongoing;
        }

        let mut max_score = 0;
        let mut leaders: Vec<Player> = Vec::new();
        for p in ALL_PLAYERS {
            let score = self.state.score_of(p);
            if leaders.is_empty() || score > max_score {
                max_score = score;
                leaders = vec![p];
            } else if score == max_score {
                leaders.push(p);
            }
        }

        if leaders.len() == 1 {
            Outcome::Victory {
                winner: leaders[0],
                message: format!(
                    "ИГРОК {} ПОБЕДИЛ ПО ОЧКАМ ({} стран)",
                    leaders[0].number(),
                    max_score
                ),
            }
        } else {
            Outcome::Draw {
                leaders,
                message: format!("НИЧЬЯ! Все страны захвачены. Лидеры по {}.", max_score),
            }
        }
    }

    /// Classifies all regions for capture-phase highlighting, from the
    /// current player's point of view.
    pub fn highlight_set(&self) -> HighlightSet {
        let player = self.state.current_player;
        let mut set = HighlightSet::default();
        for region in self.world.regions() {
            let eligible = self.check_eligibility(&region.id).is_ok();
            match region.owner {
                None if eligible => set.available.push(region.id.clone()),
                None => set.unavailable.push(region.id.clone()),
                Some(owner) if owner != player && eligible => {
                    set.capturable.push(region.id.clone());
                }
                _ => {}
            }
        }
        set
    }
}
