//! Read-only commands: look, inventory and stats.

use serde_json::json;
use tale_core::{Entity, ItemCatalog, Location};

use super::turn::TurnContext;
use crate::error::EngineResult;
use crate::parser::Command;
use crate::result::CommandResult;

/// Compose the text shown when entering or looking at a location.
pub fn describe_location(location: &Location, catalog: &ItemCatalog) -> String {
    let mut output = location.name().to_string();
    if !location.description().is_empty() {
        output.push('\n');
        output.push_str(location.description());
    }

    let exits = location.exit_names();
    if exits.is_empty() {
        output.push_str("\nThere are no exits.");
    } else {
        output.push_str(&format!("\nExits: {}", exits.join(", ")));
    }

    if !location.items.is_empty() {
        let names: Vec<&str> = location
            .items
            .iter()
            .map(|id| catalog.get(id).map_or(id.as_str(), |item| item.name()))
            .collect();
        output.push_str(&format!("\nYou see: {}", names.join(", ")));
    }

    if !location.enemies.is_empty() {
        let enemies: Vec<String> = location
            .enemies
            .iter()
            .map(|e| format!("{} ({} HP)", e.name, e.health))
            .collect();
        output.push_str(&format!("\nEnemies: {}", enemies.join(", ")));
    }

    output
}

pub(crate) fn do_look(
    turn: &mut TurnContext<'_>,
    _command: &Command,
) -> EngineResult<CommandResult> {
    let location = turn.location()?;
    let message = describe_location(location, turn.catalog);
    let data = json!({
        "location": location.id(),
        "name": location.name(),
        "exits": location.exit_names(),
        "items": location.items,
        "enemies": location.enemies,
    });
    Ok(CommandResult::ok(message).with_data(data))
}

pub(crate) fn do_inventory(
    turn: &mut TurnContext<'_>,
    _command: &Command,
) -> EngineResult<CommandResult> {
    let inventory = &turn.state.inventory;
    let message = if inventory.is_empty() {
        "Your inventory is empty.".to_string()
    } else {
        let mut output = "You are carrying:".to_string();
        for item in inventory {
            output.push_str(&format!("\n  - {} ({})", item.name(), item.item_type));
        }
        output
    };
    Ok(CommandResult::ok(message).with_data(json!({ "inventory": inventory })))
}

pub(crate) fn do_stats(
    turn: &mut TurnContext<'_>,
    _command: &Command,
) -> EngineResult<CommandResult> {
    let state = &turn.state;
    let player = &state.player;
    let message = format!(
        "{} - Level {}\nHealth: {}/{}\nMana: {}\nStrength: {}\nExperience: {} ({} to next level)\nStatus: {}",
        player.name(),
        player.level,
        player.health,
        player.max_health,
        player.mana,
        player.strength,
        player.experience,
        player.experience_to_next_level(),
        state.game_status,
    );
    let data = json!({
        "player": player,
        "game_status": state.game_status,
        "visited_locations": state.visited_locations,
    });
    Ok(CommandResult::ok(message).with_data(data))
}
