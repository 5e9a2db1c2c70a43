use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::character::Character;
use crate::entity::Entity;
use crate::item::Item;

/// Lifecycle status of a session.
///
/// Only `Playing -> GameOver` is driven by the engine. `Combat` and `Paused`
/// are reserved and never entered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// Normal play.
    #[default]
    Playing,
    /// Reserved for a dedicated combat mode.
    Combat,
    /// The player died. Terminal.
    GameOver,
    /// Reserved for a paused session.
    Paused,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Playing => write!(f, "playing"),
            Self::Combat => write!(f, "combat"),
            Self::GameOver => write!(f, "game_over"),
            Self::Paused => write!(f, "paused"),
        }
    }
}

/// The complete mutable snapshot of one play session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// The one live character.
    pub player: Character,
    /// Id of the location the player stands in.
    pub current_location_id: String,
    /// Carried item copies, in pickup order.
    pub inventory: Vec<Item>,
    /// Session status.
    pub game_status: GameStatus,
    /// Every location id the player has stood in.
    pub visited_locations: BTreeSet<String>,
}

impl GameState {
    /// Start a session with the player at `start`.
    pub fn new(player: Character, start: impl Into<String>) -> Self {
        let start = start.into();
        let mut visited_locations = BTreeSet::new();
        visited_locations.insert(start.clone());
        Self {
            player,
            current_location_id: start,
            inventory: Vec::new(),
            game_status: GameStatus::Playing,
            visited_locations,
        }
    }

    /// Move the player and record the visit.
    pub fn move_to(&mut self, location_id: impl Into<String>) {
        let location_id = location_id.into();
        self.visited_locations.insert(location_id.clone());
        self.current_location_id = location_id;
    }

    /// Whether the session has reached its terminal state.
    pub fn is_over(&self) -> bool {
        self.game_status == GameStatus::GameOver
    }

    /// Enter the terminal state. There is no way back.
    pub fn end_game(&mut self) {
        self.game_status = GameStatus::GameOver;
    }

    /// Index of the first carried item matching a lowercased query.
    pub fn find_in_inventory(&self, query: &str) -> Option<usize> {
        self.inventory.iter().position(|item| item.matches(query))
    }
}
