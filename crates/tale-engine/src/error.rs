//! Error types for the game engine.

use tale_core::{CoreError, Direction};
use thiserror::Error;

use crate::persistence::PersistenceError;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// A command that failed validation before reaching a handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Blank input.
    #[error("Please enter a command.")]
    EmptyCommand,

    /// The command name is not registered.
    #[error("Unknown command: '{name}'. Type 'help' for available commands.{}", suggestion_hint(.suggestion))]
    UnknownCommand {
        /// The name as typed (after lowercasing).
        name: String,
        /// A registered name that is close to the input.
        suggestion: Option<String>,
    },

    /// A required positional argument was not supplied.
    #[error("Missing argument: {0}")]
    MissingArgument(String),

    /// `move` was given something other than a direction token.
    #[error("Invalid direction: '{0}'. Valid: {valid}", valid = Direction::valid_tokens())]
    InvalidDirection(String),
}

fn suggestion_hint(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|s| format!(" Did you mean '{s}'?"))
        .unwrap_or_default()
}

/// Errors that can occur while executing a command.
///
/// Every variant leaves the game state untouched.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The command was rejected by the parser.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A command other than `help` or `load` was issued before a game started.
    #[error("No game in progress. Start a game first.")]
    NoActiveGame,

    /// A state-changing command was issued after the player died.
    #[error("The game is over. Start a new game or load a save.")]
    GameOver,

    /// The current location has no exit that way.
    #[error("You can't go {0} from here.")]
    NoExit(Direction),

    /// The destination is locked.
    #[error("The way to {0} is locked.")]
    Locked(String),

    /// No item here matches the query.
    #[error("There is no '{0}' here.")]
    ItemNotHere(String),

    /// No carried item matches the query.
    #[error("You don't have '{0}'.")]
    ItemNotCarried(String),

    /// No enemy here matches the query.
    #[error("There is no '{0}' here to attack.")]
    EnemyNotHere(String),

    /// The item has no effect to apply.
    #[error("{0} can't be used.")]
    NotUsable(String),

    /// No save exists under this name.
    #[error("No saved game named '{0}'.")]
    SaveNotFound(String),

    /// The command is registered but has no handler.
    #[error("Command '{0}' is not implemented.")]
    NotImplemented(String),

    /// The world model rejected an operation.
    #[error(transparent)]
    World(#[from] CoreError),

    /// The save store failed.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}
