//! # Game Snapshots
//!
//! Converts a live, mutable game object into an immutable, self-contained
//! [`Snapshot`] suitable for hand-off to the render thread. Every nested
//! collection is copied; a snapshot holds no references into the game.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::action::Action;

/// Color of a route or train card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrainColor {
    Red,
    Blue,
    Green,
    Yellow,
    Black,
    White,
    Orange,
    Pink,
    Gray,
    Wild,
}

impl TrainColor {
    /// Lowercase name as it appears in action log text.
    pub fn label(&self) -> &'static str {
        match self {
            TrainColor::Red => "red",
            TrainColor::Blue => "blue",
            TrainColor::Green => "green",
            TrainColor::Yellow => "yellow",
            TrainColor::Black => "black",
            TrainColor::White => "white",
            TrainColor::Orange => "orange",
            TrainColor::Pink => "pink",
            TrainColor::Gray => "gray",
            TrainColor::Wild => "wild",
        }
    }
}

impl fmt::Display for TrainColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One route variant on a city-to-city connection.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteInfo {
    pub color: TrainColor,
    pub length: u32,
    /// Name of the claiming player, if any.
    pub claimed_by: Option<String>,
}

/// Owned player record as reported by the game.
#[derive(Debug, Clone, Default)]
pub struct PlayerState {
    pub name: String,
    /// This player's individual turn counter.
    pub turn: u32,
    pub points: i32,
    pub remaining_trains: u32,
    pub train_cards: HashMap<TrainColor, u32>,
    pub destinations: Vec<String>,
    /// Claimed connections as `(city_a, city_b, route_color)` triples.
    pub claimed_connections: Vec<(String, String, TrainColor)>,
}

/// Read-only view of a live game, consumed by [`Snapshot::capture`].
///
/// All methods return owned data; the snapshot builder never retains a
/// reference into the game once the snapshot is built.
pub trait GameView {
    /// Player records in seating order.
    fn players(&self) -> Vec<PlayerState>;

    /// Index into `players()` of the player whose turn it is.
    fn current_player_idx(&self) -> usize;

    /// All city names on the board (used for map detection).
    fn city_names(&self) -> Vec<String>;

    /// Undirected city pairs with at least one route between them.
    /// May contain duplicates or reversed pairs; the builder normalizes.
    fn connections(&self) -> Vec<(String, String)>;

    /// Route variants between two cities, in board order.
    fn route_lookup(&self, city_a: &str, city_b: &str) -> Vec<RouteInfo>;

    /// Display label for the agent controlling `player`, if known.
    fn agent_label(&self, player: &str) -> Option<String> {
        let _ = player;
        None
    }
}

/// Per-player display record inside a [`Snapshot`].
#[derive(Debug, Clone)]
pub struct PlayerSnapshot {
    pub name: String,
    /// Agent display label; empty when unknown.
    pub agent: String,
    pub points: i32,
    pub remaining_trains: u32,
    pub train_cards: HashMap<TrainColor, u32>,
    pub destinations: Vec<String>,
    pub claimed_connections: Vec<(String, String, TrainColor)>,
}

impl PlayerSnapshot {
    /// Total number of train cards in hand.
    pub fn card_count(&self) -> u32 {
        self.train_cards.values().sum()
    }
}

/// Immutable copy of the game state at one instant.
///
/// Built once per update and never patched in place.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub players: Vec<PlayerSnapshot>,
    pub current_player_idx: usize,
    /// Max over all players' individual turn counters.
    pub turn: u32,
    /// City names on the board, for map detection on the render side.
    pub cities: Vec<String>,
    /// Unique undirected connections with `city_a < city_b`.
    pub connections: Vec<(String, String)>,
    /// Route variants keyed by `"cityA-cityB"` (normalized order).
    pub route_info: HashMap<String, Vec<RouteInfo>>,
    /// Formatted description of the action that produced this state.
    pub action: Option<String>,
}

impl Snapshot {
    /// Key into [`Snapshot::route_info`] for an unordered city pair.
    pub fn route_key(city_a: &str, city_b: &str) -> String {
        if city_a < city_b {
            format!("{city_a}-{city_b}")
        } else {
            format!("{city_b}-{city_a}")
        }
    }

    /// Deep-copies `game` into a self-contained snapshot.
    pub fn capture(game: &impl GameView, action: Option<&Action>) -> Self {
        let player_states = game.players();
        let turn = player_states.iter().map(|p| p.turn).max().unwrap_or(0);

        let players = player_states
            .into_iter()
            .map(|p| {
                let agent = game.agent_label(&p.name).unwrap_or_default();
                PlayerSnapshot {
                    name: p.name,
                    agent,
                    points: p.points,
                    remaining_trains: p.remaining_trains,
                    train_cards: p.train_cards,
                    destinations: p.destinations,
                    claimed_connections: p.claimed_connections,
                }
            })
            .collect();

        // Normalize to a < b and dedup; BTreeSet gives a stable order.
        let mut pairs = BTreeSet::new();
        for (a, b) in game.connections() {
            if a == b {
                continue;
            }
            if a < b {
                pairs.insert((a, b));
            } else {
                pairs.insert((b, a));
            }
        }

        let mut route_info = HashMap::with_capacity(pairs.len());
        for (a, b) in &pairs {
            route_info.insert(Self::route_key(a, b), game.route_lookup(a, b));
        }

        Snapshot {
            players,
            current_player_idx: game.current_player_idx(),
            turn,
            cities: game.city_names(),
            connections: pairs.into_iter().collect(),
            route_info,
            action: action.map(|a| a.to_string()),
        }
    }
}
