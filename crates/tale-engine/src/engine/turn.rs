//! The mutable view a command handler works against.

use std::sync::Arc;

use rand::rngs::StdRng;
use serde_json::Value;
use tale_core::{GameState, ItemCatalog, Location, World};

use crate::error::{EngineError, EngineResult};
use crate::event::{EventData, EventKind, event_data};
use crate::parser::Command;
use crate::result::CommandResult;

/// A command handler.
///
/// Handlers check every precondition before mutating anything, so an `Err`
/// always means the session is unchanged. Events emitted through
/// [`TurnContext::emit`] are published only when the handler succeeds.
pub type CommandHandler =
    Arc<dyn Fn(&mut TurnContext<'_>, &Command) -> EngineResult<CommandResult> + Send + Sync>;

/// One command's access to the session.
pub struct TurnContext<'a> {
    /// The world, including item and enemy placement.
    pub world: &'a mut World,
    /// The session state.
    pub state: &'a mut GameState,
    /// Item definitions.
    pub catalog: &'a ItemCatalog,
    /// Source of combat rolls.
    pub rng: &'a mut StdRng,
    events: Vec<(EventKind, EventData)>,
}

impl<'a> TurnContext<'a> {
    pub(crate) fn new(
        world: &'a mut World,
        state: &'a mut GameState,
        catalog: &'a ItemCatalog,
        rng: &'a mut StdRng,
    ) -> Self {
        Self {
            world,
            state,
            catalog,
            rng,
            events: Vec::new(),
        }
    }

    /// Queue an event for publication after the handler returns.
    pub fn emit(&mut self, kind: EventKind, data: Value) {
        self.events.push((kind, event_data(data)));
    }

    /// Fail with [`EngineError::GameOver`] once the player has died.
    pub fn ensure_playing(&self) -> EngineResult<()> {
        if self.state.is_over() {
            Err(EngineError::GameOver)
        } else {
            Ok(())
        }
    }

    /// The player's current location.
    pub fn location(&self) -> EngineResult<&Location> {
        Ok(self.world.require(&self.state.current_location_id)?)
    }

    /// The player's current location, mutably.
    pub fn location_mut(&mut self) -> EngineResult<&mut Location> {
        Ok(self.world.require_mut(&self.state.current_location_id)?)
    }

    pub(crate) fn take_events(&mut self) -> Vec<(EventKind, EventData)> {
        std::mem::take(&mut self.events)
    }
}
