use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::entity::{Entity, EntityInfo};

/// A live enemy standing in a location.
///
/// Unlike items, enemies are not templates: each instance carries its own
/// health and is owned by exactly one location until defeated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyInstance {
    /// Instance id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Remaining health.
    pub health: u32,
    /// Damage dealt per counter-attack.
    pub damage: u32,
}

impl EnemyInstance {
    /// Create an enemy.
    pub fn new(id: impl Into<String>, name: impl Into<String>, health: u32, damage: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            health,
            damage,
        }
    }

    /// Whether the enemy has no health left.
    pub fn is_defeated(&self) -> bool {
        self.health == 0
    }

    /// Subtract damage, flooring at zero. Returns the damage absorbed.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.health);
        self.health -= dealt;
        dealt
    }

    /// Whether a lowercased query is a substring of the enemy's name.
    pub fn matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(query)
    }
}

/// A place in the world: a node of the location graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Identity fields.
    #[serde(flatten)]
    pub info: EntityInfo,
    /// Outgoing edges. Not mirrored automatically.
    #[serde(default)]
    pub exits: BTreeMap<Direction, String>,
    /// Item ids lying here, in placement order. Duplicates are separate copies.
    #[serde(default)]
    pub items: Vec<String>,
    /// Enemies present, in placement order.
    #[serde(default)]
    pub enemies: Vec<EnemyInstance>,
    /// Whether entry is blocked.
    #[serde(default)]
    pub is_locked: bool,
}

impl Location {
    /// Create an empty, unlocked location.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            info: EntityInfo::new(id, name),
            exits: BTreeMap::new(),
            items: Vec::new(),
            enemies: Vec::new(),
            is_locked: false,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.info.description = description.into();
        self
    }

    /// Add an exit.
    pub fn with_exit(mut self, direction: Direction, target: impl Into<String>) -> Self {
        self.exits.insert(direction, target.into());
        self
    }

    /// Place a copy of an item.
    pub fn with_item(mut self, item_id: impl Into<String>) -> Self {
        self.items.push(item_id.into());
        self
    }

    /// Place an enemy.
    pub fn with_enemy(mut self, enemy: EnemyInstance) -> Self {
        self.enemies.push(enemy);
        self
    }

    /// Mark the location as locked.
    pub fn locked(mut self) -> Self {
        self.is_locked = true;
        self
    }

    /// Destination id of the exit in `direction`, if any.
    pub fn exit(&self, direction: Direction) -> Option<&str> {
        self.exits.get(&direction).map(String::as_str)
    }

    /// Exit direction tokens, in display order.
    pub fn exit_names(&self) -> Vec<&'static str> {
        self.exits.keys().map(|d| d.name()).collect()
    }

    /// Index of the first enemy whose name contains the query.
    pub fn find_enemy(&self, query: &str) -> Option<usize> {
        self.enemies.iter().position(|e| e.matches(query))
    }
}

impl Entity for Location {
    fn info(&self) -> &EntityInfo {
        &self.info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let loc = Location::new("cave", "Shadow Cave")
            .with_exit(Direction::South, "forest")
            .with_item("ruby")
            .with_item("ruby")
            .with_enemy(EnemyInstance::new("goblin", "Goblin", 25, 8))
            .locked();
        assert_eq!(loc.exit(Direction::South), Some("forest"));
        assert_eq!(loc.exit(Direction::North), None);
        assert_eq!(loc.items, vec!["ruby", "ruby"]);
        assert_eq!(loc.enemies.len(), 1);
        assert!(loc.is_locked);
    }

    #[test]
    fn exit_names_in_display_order() {
        let loc = Location::new("start", "Crossroads")
            .with_exit(Direction::East, "village")
            .with_exit(Direction::North, "forest");
        assert_eq!(loc.exit_names(), vec!["north", "east"]);
    }

    #[test]
    fn find_enemy_first_match() {
        let loc = Location::new("den", "Den")
            .with_enemy(EnemyInstance::new("wolf_1", "Grey Wolf", 30, 10))
            .with_enemy(EnemyInstance::new("wolf_2", "Dire Wolf", 50, 12));
        assert_eq!(loc.find_enemy("wolf"), Some(0));
        assert_eq!(loc.find_enemy("dire"), Some(1));
        assert_eq!(loc.find_enemy("bear"), None);
    }

    #[test]
    fn enemy_damage_floors_at_zero() {
        let mut wolf = EnemyInstance::new("wolf", "Wolf", 10, 5);
        assert_eq!(wolf.take_damage(4), 4);
        assert!(!wolf.is_defeated());
        assert_eq!(wolf.take_damage(13), 6);
        assert!(wolf.is_defeated());
    }
}
