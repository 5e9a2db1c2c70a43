//! Inventory commands: take, drop and use.

use serde_json::{Map, Value, json};
use tale_core::{EffectKind, Entity};

use super::turn::TurnContext;
use crate::error::{EngineError, EngineResult};
use crate::event::EventKind;
use crate::parser::Command;
use crate::result::CommandResult;

pub(crate) fn do_take(
    turn: &mut TurnContext<'_>,
    command: &Command,
) -> EngineResult<CommandResult> {
    turn.ensure_playing()?;
    let query = command.argument_text();

    let catalog = turn.catalog;
    let location_id = turn.state.current_location_id.clone();
    let location = turn.world.require_mut(&location_id)?;
    let position = location
        .items
        .iter()
        .position(|id| catalog.get(id).is_some_and(|item| item.matches(&query)))
        .ok_or_else(|| EngineError::ItemNotHere(query.clone()))?;
    let item = catalog.instantiate(&location.items[position])?;

    location.items.remove(position);
    let message = format!("You take the {}.", item.name());
    let event = json!({ "item": item.name(), "item_id": item.id() });
    let data = json!({ "item": item });
    turn.state.inventory.push(item);

    turn.emit(EventKind::ItemPickedUp, event);
    emit_inventory_updated(turn, "take");
    Ok(CommandResult::ok(message).with_data(data))
}

pub(crate) fn do_drop(
    turn: &mut TurnContext<'_>,
    command: &Command,
) -> EngineResult<CommandResult> {
    turn.ensure_playing()?;
    let query = command.argument_text();

    let position = turn
        .state
        .find_in_inventory(&query)
        .ok_or_else(|| EngineError::ItemNotCarried(query.clone()))?;
    let location_id = turn.state.current_location_id.clone();
    let location = turn.world.require_mut(&location_id)?;

    let item = turn.state.inventory.remove(position);
    location.items.push(item.id().to_string());

    turn.emit(
        EventKind::ItemDropped,
        json!({ "item": item.name(), "item_id": item.id(), "location": location_id }),
    );
    emit_inventory_updated(turn, "drop");
    let message = format!("You drop the {}.", item.name());
    Ok(CommandResult::ok(message).with_data(json!({ "item": item })))
}

pub(crate) fn do_use(
    turn: &mut TurnContext<'_>,
    command: &Command,
) -> EngineResult<CommandResult> {
    turn.ensure_playing()?;
    let query = command.argument_text();

    let position = turn
        .state
        .find_in_inventory(&query)
        .ok_or_else(|| EngineError::ItemNotCarried(query.clone()))?;
    let item = turn.state.inventory[position].clone();
    if !item.is_usable() {
        return Err(EngineError::NotUsable(item.name().to_string()));
    }

    let player = &mut turn.state.player;
    let mut applied = Map::new();
    let mut lines = vec![format!("You use the {}.", item.name())];
    let mut healed = None;
    for (kind, magnitude) in &item.effect {
        let amount = match kind {
            EffectKind::Heal => {
                let amount = player.heal(*magnitude);
                lines.push(format!("You recover {amount} health."));
                healed = Some(amount);
                amount
            }
            EffectKind::Mana => {
                let amount = player.restore_mana(*magnitude);
                lines.push(format!("You recover {amount} mana."));
                amount
            }
            EffectKind::StrengthBoost => {
                let amount = player.boost_strength(*magnitude);
                lines.push(format!("Your strength increases by {amount}."));
                amount
            }
        };
        applied.insert(kind.to_string(), Value::from(amount));
    }
    let health = player.health;

    let consumed = item.item_type.is_consumable();
    if consumed {
        turn.state.inventory.remove(position);
    }

    turn.emit(
        EventKind::ItemUsed,
        json!({
            "item": item.name(),
            "item_id": item.id(),
            "effect": applied,
            "consumed": consumed,
        }),
    );
    if let Some(amount) = healed {
        turn.emit(
            EventKind::PlayerHealed,
            json!({ "amount": amount, "health": health, "source": item.id() }),
        );
    }
    if consumed {
        emit_inventory_updated(turn, "use");
    }

    let data = json!({ "item": item.id(), "effect": applied, "consumed": consumed });
    Ok(CommandResult::ok(lines.join(" ")).with_data(data))
}

fn emit_inventory_updated(turn: &mut TurnContext<'_>, action: &str) {
    let items: Vec<&str> = turn.state.inventory.iter().map(|item| item.id()).collect();
    let data = json!({ "action": action, "items": items });
    turn.emit(EventKind::InventoryUpdated, data);
}
