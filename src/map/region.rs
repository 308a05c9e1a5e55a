//! Players, regions, and the world map.
//!
//! A `Region` is created once at map-load time; its adjacency set is
//! immutable after graph construction and its owner is mutated only by
//! the turn engine. The `WorldMap` holds the full region set together
//! with the fixed content bounds (the union of all region boxes).

use std::collections::{BTreeMap, BTreeSet};

use crate::config::PLAYER_COUNT;

use super::adjacency::AdjacencyGraph;
use super::geometry::{BBox, GeometryProvider};

/// One of the four players, numbered 1 through 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Player {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
}

/// All players in turn order.
pub const ALL_PLAYERS: [Player; PLAYER_COUNT] =
    [Player::One, Player::Two, Player::Three, Player::Four];

impl Player {
    /// Returns the 1-based player number.
    pub const fn number(self) -> u8 {
        self as u8
    }

    /// Returns the 0-based index for score arrays.
    pub const fn index(self) -> usize {
        self as usize - 1
    }

    /// Parses a 1-based player number.
    pub fn from_number(n: u8) -> Option<Player> {
        match n {
            1 => Some(Player::One),
            2 => Some(Player::Two),
            3 => Some(Player::Three),
            4 => Some(Player::Four),
            _ => None,
        }
    }

    /// Returns the next player in cyclic turn order.
    pub const fn next(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::Three,
            Player::Three => Player::Four,
            Player::Four => Player::One,
        }
    }

    /// Returns the player's display color.
    pub const fn color(self) -> &'static str {
        match self {
            Player::One => "#e63946",
            Player::Two => "#3a86ff",
            Player::Three => "#2ec4b6",
            Player::Four => "#ffbe0b",
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// A capturable map region.
#[derive(Debug, Clone)]
pub struct Region {
    /// Unique region identifier.
    pub id: String,
    /// Bounding box in content coordinates, if geometry was available.
    pub bounds: Option<BBox>,
    /// Current owner; None means neutral.
    pub owner: Option<Player>,
    /// Identifiers of adjacent regions. Fixed after construction.
    pub neighbors: BTreeSet<String>,
}

impl Region {
    /// Returns true if no player owns this region.
    pub fn is_neutral(&self) -> bool {
        self.owner.is_none()
    }
}

/// The complete region set for one game session.
#[derive(Debug, Clone)]
pub struct WorldMap {
    regions: BTreeMap<String, Region>,
    content_bounds: Option<BBox>,
}

impl WorldMap {
    /// Builds the world for `ids`: queries the provider for each region's
    /// box, constructs the adjacency graph, and computes the content
    /// bounds. Every region starts neutral.
    pub fn build(provider: &impl GeometryProvider, ids: &[String]) -> WorldMap {
        let graph = AdjacencyGraph::build(provider, ids);
        let mut regions = BTreeMap::new();
        for id in ids {
            let bounds = provider.bounding_box(id);
            let neighbors = graph.neighbors(id).cloned().unwrap_or_default();
            regions.insert(
                id.clone(),
                Region {
                    id: id.clone(),
                    bounds,
                    owner: None,
                    neighbors,
                },
            );
        }
        let content_bounds = BBox::union_of(regions.values().filter_map(|r| r.bounds));
        WorldMap {
            regions,
            content_bounds,
        }
    }

    /// Returns the region with the given identifier.
    pub fn region(&self, id: &str) -> Option<&Region> {
        self.regions.get(id)
    }

    /// Iterates all regions in identifier order.
    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.values()
    }

    /// Returns the number of regions.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Union bounding box of all regions, computed once at build time.
    pub fn content_bounds(&self) -> Option<BBox> {
        self.content_bounds
    }

    /// Returns the number of neutral regions.
    pub fn neutral_count(&self) -> usize {
        self.regions.values().filter(|r| r.is_neutral()).count()
    }

    /// Returns the number of regions owned by some player.
    pub fn captured_count(&self) -> usize {
        self.regions.values().filter(|r| !r.is_neutral()).count()
    }

    /// Returns the identifiers of all neutral regions, in id order.
    pub fn neutral_ids(&self) -> Vec<String> {
        self.regions
            .values()
            .filter(|r| r.is_neutral())
            .map(|r| r.id.clone())
            .collect()
    }

    /// Reassigns a region's owner. Only the turn engine calls this; a
    /// missing id is ignored.
    pub(crate) fn set_owner(&mut self, id: &str, owner: Option<Player>) {
        if let Some(region) = self.regions.get_mut(id) {
            region.owner = owner;
        }
    }
}
