//! The `move` command.

use serde_json::json;
use tale_core::{Direction, Entity, Traversal};

use super::info::describe_location;
use super::turn::TurnContext;
use crate::error::{EngineError, EngineResult, ValidationError};
use crate::event::EventKind;
use crate::parser::Command;
use crate::result::CommandResult;

pub(crate) fn do_move(
    turn: &mut TurnContext<'_>,
    command: &Command,
) -> EngineResult<CommandResult> {
    turn.ensure_playing()?;

    let token = command.first_arg().unwrap_or_default();
    let direction = Direction::parse(token)
        .ok_or_else(|| ValidationError::InvalidDirection(token.to_string()))?;

    let destination = match turn
        .world
        .traverse(&turn.state.current_location_id, direction)?
    {
        Traversal::NoExit => return Err(EngineError::NoExit(direction)),
        Traversal::Locked(location) => return Err(EngineError::Locked(location.name().to_string())),
        Traversal::Open(location) => location,
    };

    let id = destination.id().to_string();
    let message = format!(
        "You go {direction}.\n\n{}",
        describe_location(destination, turn.catalog)
    );
    let data = json!({
        "location": id,
        "name": destination.name(),
        "exits": destination.exit_names(),
    });

    turn.state.move_to(id.clone());
    tracing::debug!(location = %id, %direction, "player moved");
    turn.emit(
        EventKind::PlayerMoved,
        json!({ "location": id, "direction": direction.name() }),
    );

    Ok(CommandResult::ok(message).with_data(data))
}
