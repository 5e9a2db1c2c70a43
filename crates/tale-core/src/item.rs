use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityInfo};
use crate::error::{CoreError, CoreResult};

/// Broad category of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    /// Something to hit things with.
    Weapon,
    /// Something to block with.
    Shield,
    /// A single-use drink.
    Potion,
    /// A valuable; single-use when it has an effect.
    Treasure,
}

impl ItemType {
    /// Whether using an item of this type consumes it.
    pub fn is_consumable(&self) -> bool {
        matches!(self, Self::Potion | Self::Treasure)
    }

    /// Whether items of this type can be equipped.
    pub fn is_equippable(&self) -> bool {
        matches!(self, Self::Weapon | Self::Shield)
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weapon => write!(f, "weapon"),
            Self::Shield => write!(f, "shield"),
            Self::Potion => write!(f, "potion"),
            Self::Treasure => write!(f, "treasure"),
        }
    }
}

/// An effect an item applies when used.
///
/// Variant order is the order effects are applied in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    /// Restore health, clamped to max health.
    Heal,
    /// Restore mana, clamped to the mana cap.
    Mana,
    /// Permanently raise strength.
    StrengthBoost,
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Heal => write!(f, "heal"),
            Self::Mana => write!(f, "mana"),
            Self::StrengthBoost => write!(f, "strength_boost"),
        }
    }
}

/// An item definition.
///
/// Catalog entries are templates: the world and the inventory hold copies,
/// and copies of one id share a definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Identity fields.
    #[serde(flatten)]
    pub info: EntityInfo,
    /// Item category.
    pub item_type: ItemType,
    /// Trade value in gold.
    pub value: u32,
    /// Effects applied on use, keyed and ordered by kind.
    #[serde(default)]
    pub effect: BTreeMap<EffectKind, u32>,
    /// Whether the item can be equipped.
    pub can_equip: bool,
}

impl Item {
    /// Create an item with no value and no effects.
    pub fn new(id: impl Into<String>, name: impl Into<String>, item_type: ItemType) -> Self {
        Self {
            info: EntityInfo::new(id, name),
            item_type,
            value: 0,
            effect: BTreeMap::new(),
            can_equip: item_type.is_equippable(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.info.description = description.into();
        self
    }

    /// Set the trade value.
    pub fn with_value(mut self, value: u32) -> Self {
        self.value = value;
        self
    }

    /// Add an effect.
    pub fn with_effect(mut self, kind: EffectKind, magnitude: u32) -> Self {
        self.effect.insert(kind, magnitude);
        self
    }

    /// Whether using the item does anything.
    pub fn is_usable(&self) -> bool {
        !self.effect.is_empty()
    }
}

impl Entity for Item {
    fn info(&self) -> &EntityInfo {
        &self.info
    }
}

/// The fixed set of item definitions, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    items: BTreeMap<String, Item>,
}

impl ItemCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from definitions, rejecting duplicate ids.
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> CoreResult<Self> {
        let mut catalog = Self::new();
        for item in items {
            catalog.insert(item)?;
        }
        Ok(catalog)
    }

    /// Add a definition.
    pub fn insert(&mut self, item: Item) -> CoreResult<()> {
        if self.items.contains_key(&item.info.id) {
            return Err(CoreError::DuplicateItem(item.info.id));
        }
        self.items.insert(item.info.id.clone(), item);
        Ok(())
    }

    /// Look up a definition by id.
    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    /// Whether the catalog defines this id.
    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// Make an in-world copy of a definition.
    pub fn instantiate(&self, id: &str) -> CoreResult<Item> {
        self.get(id)
            .cloned()
            .ok_or_else(|| CoreError::ItemNotFound(id.to_string()))
    }

    /// Iterate over all definitions in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
