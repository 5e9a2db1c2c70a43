//! The hand-authored world and item catalog.

use tale_core::{
    Character, CoreResult, Direction, EffectKind, EnemyInstance, Item, ItemCatalog, ItemType,
    Location,
};

/// Everything a new game is built from.
#[derive(Debug, Clone)]
pub struct Content {
    /// Item definitions.
    pub catalog: ItemCatalog,
    /// Authored locations, copied fresh for every new game.
    pub locations: Vec<Location>,
    /// Template for the player character. The configured name replaces its name.
    pub player: Character,
}

impl Content {
    /// Bundle content from parts.
    pub fn new(catalog: ItemCatalog, locations: Vec<Location>, player: Character) -> Self {
        Self {
            catalog,
            locations,
            player,
        }
    }

    /// The shipped adventure.
    pub fn standard() -> CoreResult<Self> {
        Ok(Self::new(standard_catalog()?, standard_locations(), standard_player()))
    }
}

/// The shipped item definitions.
pub fn standard_catalog() -> CoreResult<ItemCatalog> {
    ItemCatalog::from_items([
        Item::new("iron_sword", "Iron Sword", ItemType::Weapon)
            .with_description("A sturdy blade of dark iron.")
            .with_value(10),
        Item::new("magic_staff", "Magic Staff", ItemType::Weapon)
            .with_description("A gnarled staff humming with power.")
            .with_value(50),
        Item::new("wooden_shield", "Wooden Shield", ItemType::Shield)
            .with_description("Oak planks bound with iron bands.")
            .with_value(8),
        Item::new("health_potion", "Health Potion", ItemType::Potion)
            .with_description("A red draught that mends wounds.")
            .with_value(25)
            .with_effect(EffectKind::Heal, 30),
        Item::new("mana_potion", "Mana Potion", ItemType::Potion)
            .with_description("A blue draught that restores mana.")
            .with_value(25)
            .with_effect(EffectKind::Mana, 30),
        Item::new("strength_elixir", "Strength Elixir", ItemType::Potion)
            .with_description("Grants temporary strength to whoever drinks it.")
            .with_value(40)
            .with_effect(EffectKind::StrengthBoost, 2),
        Item::new("ruby", "Ruby", ItemType::Treasure)
            .with_description("A deep red gemstone.")
            .with_value(100),
        Item::new("ancient_relic", "Ancient Relic", ItemType::Treasure)
            .with_description("A warm stone idol pulsing with old magic.")
            .with_value(500)
            .with_effect(EffectKind::Heal, 50)
            .with_effect(EffectKind::Mana, 50),
    ])
}

/// The shipped locations. Exits are listed on both ends by hand.
pub fn standard_locations() -> Vec<Location> {
    vec![
        Location::new("start", "Crossroads")
            .with_description(
                "A dusty crossroads. A weathered signpost points in several directions.",
            )
            .with_exit(Direction::North, "forest")
            .with_exit(Direction::East, "village")
            .with_item("iron_sword")
            .with_item("wooden_shield"),
        Location::new("forest", "Dark Forest")
            .with_description("Tall pines crowd out the light. Something growls between the trees.")
            .with_exit(Direction::South, "start")
            .with_exit(Direction::North, "cave")
            .with_item("health_potion")
            .with_enemy(EnemyInstance::new("wolf", "Wolf", 30, 10)),
        Location::new("village", "Riverside Village")
            .with_description(
                "Thatched cottages line a slow river. A crooked tower rises above the rooftops.",
            )
            .with_exit(Direction::West, "start")
            .with_exit(Direction::Up, "tower")
            .with_item("health_potion")
            .with_item("mana_potion"),
        Location::new("tower", "Wizard's Tower")
            .with_description("Shelves of dusty tomes circle a cold hearth.")
            .with_exit(Direction::Down, "village")
            .with_item("strength_elixir")
            .with_item("magic_staff")
            .with_enemy(EnemyInstance::new("sorcerer", "Dark Sorcerer", 45, 14)),
        Location::new("cave", "Shadow Cave")
            .with_description("Water drips from the ceiling. Gems glitter in the rock.")
            .with_exit(Direction::South, "forest")
            .with_exit(Direction::Down, "dungeon")
            .with_item("ruby")
            .with_item("ruby")
            .with_item("ruby")
            .with_enemy(EnemyInstance::new("goblin", "Goblin", 25, 8))
            .with_enemy(EnemyInstance::new("cave_bat", "Cave Bat", 12, 4)),
        Location::new("dungeon", "Forgotten Dungeon")
            .with_description("Chains hang from the walls of a vaulted crypt.")
            .with_exit(Direction::Up, "cave")
            .with_item("ancient_relic")
            .with_enemy(EnemyInstance::new("skeleton_knight", "Skeleton Knight", 60, 18))
            .locked(),
    ]
}

/// The shipped player template.
pub fn standard_player() -> Character {
    Character::new("player", "Hero").with_description("A wanderer seeking fortune.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tale_core::World;

    #[test]
    fn standard_world_is_consistent() {
        let content = Content::standard().unwrap();
        let world = World::build(content.locations, &content.catalog).unwrap();
        assert_eq!(world.len(), 6);
        assert!(world.location("dungeon").unwrap().is_locked);
    }

    #[test]
    fn start_matches_authored_layout() {
        let locations = standard_locations();
        let start = locations.iter().find(|l| l.info.id == "start").unwrap();
        assert_eq!(start.exit(Direction::North), Some("forest"));
        assert_eq!(start.exit(Direction::East), Some("village"));
        assert_eq!(start.items, vec!["iron_sword", "wooden_shield"]);
    }

    #[test]
    fn every_exit_has_a_way_back() {
        let world = World::build(standard_locations(), &standard_catalog().unwrap()).unwrap();
        for location in world.locations() {
            for target in location.exits.values() {
                let back = world.location(target).unwrap();
                assert!(
                    back.exits.values().any(|t| t == &location.info.id),
                    "{} has no exit back to {}",
                    target,
                    location.info.id
                );
            }
        }
    }
}
