//! Game events, the synchronous event bus, and the event history.

mod bus;
mod log;

pub use bus::{EventBus, EventHandler, HandlerFailure, HandlerResult, Published};
pub use log::EventLog;

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key/value payload carried by an event.
pub type EventData = Map<String, Value>;

/// What kind of thing happened.
///
/// Serialized as its snake_case name, e.g. `"player_moved"`. Kinds compare
/// and hash by name, so `Custom("player_moved")` is the same kind as
/// [`EventKind::PlayerMoved`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum EventKind {
    /// The player went through an exit.
    PlayerMoved,
    /// An item moved from a location into the inventory.
    ItemPickedUp,
    /// An item moved from the inventory into a location.
    ItemDropped,
    /// An item's effects were applied.
    ItemUsed,
    /// Reserved: a dedicated combat mode began.
    CombatStarted,
    /// The last enemy in a location was defeated.
    CombatEnded,
    /// An enemy hit the player.
    PlayerDamaged,
    /// The player regained health.
    PlayerHealed,
    /// An enemy's health reached zero.
    EnemyDefeated,
    /// The player hit an enemy.
    EnemyDamaged,
    /// A new world and session were created.
    GameStarted,
    /// The session was written to the save store.
    GameSaved,
    /// The session was replaced from the save store.
    GameLoaded,
    /// The player reached a new level.
    LevelUp,
    /// The inventory's contents changed.
    InventoryUpdated,
    /// An event type defined outside the engine.
    Custom(String),
}

impl EventKind {
    /// Every kind the engine itself publishes or reserves.
    pub const BUILTIN: [EventKind; 15] = [
        Self::PlayerMoved,
        Self::ItemPickedUp,
        Self::ItemDropped,
        Self::ItemUsed,
        Self::CombatStarted,
        Self::CombatEnded,
        Self::PlayerDamaged,
        Self::PlayerHealed,
        Self::EnemyDefeated,
        Self::EnemyDamaged,
        Self::GameStarted,
        Self::GameSaved,
        Self::GameLoaded,
        Self::LevelUp,
        Self::InventoryUpdated,
    ];

    /// The event type's name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::PlayerMoved => "player_moved",
            Self::ItemPickedUp => "item_picked_up",
            Self::ItemDropped => "item_dropped",
            Self::ItemUsed => "item_used",
            Self::CombatStarted => "combat_started",
            Self::CombatEnded => "combat_ended",
            Self::PlayerDamaged => "player_damaged",
            Self::PlayerHealed => "player_healed",
            Self::EnemyDefeated => "enemy_defeated",
            Self::EnemyDamaged => "enemy_damaged",
            Self::GameStarted => "game_started",
            Self::GameSaved => "game_saved",
            Self::GameLoaded => "game_loaded",
            Self::LevelUp => "level_up",
            Self::InventoryUpdated => "inventory_updated",
            Self::Custom(name) => name,
        }
    }

    /// Look up a kind by name. Unrecognized names become [`EventKind::Custom`].
    pub fn from_name(name: &str) -> Self {
        Self::BUILTIN
            .iter()
            .find(|kind| kind.as_str() == name)
            .cloned()
            .unwrap_or_else(|| Self::Custom(name.to_string()))
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq for EventKind {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for EventKind {}

impl Hash for EventKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl From<String> for EventKind {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        kind.as_str().to_string()
    }
}

/// An immutable record of something that happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    /// The event type.
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Event-specific payload.
    pub data: EventData,
    /// When the event was published.
    pub timestamp: DateTime<Utc>,
}

impl GameEvent {
    /// Create an event stamped with the current time.
    pub fn new(kind: EventKind, data: EventData) -> Self {
        Self {
            kind,
            data,
            timestamp: Utc::now(),
        }
    }

    /// Get a payload value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}

/// Turn a JSON value into an event payload. Objects are used as-is; any
/// other value is stored under `"value"`.
pub fn event_data(value: Value) -> EventData {
    match value {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("value".to_string(), other);
            map
        }
    }
}
