//! Command-driven game engine for Tale.
//!
//! Raw player text is parsed and validated against an open command registry,
//! dispatched to a handler that mutates the session, and announced on a
//! synchronous event bus. Every command produces a [`CommandResult`].

/// Engine configuration.
pub mod config;
/// The shipped world and item catalog.
pub mod content;
/// The game engine and its command handlers.
pub mod engine;
/// Error types for the engine.
pub mod error;
/// Game events, the event bus, and event history.
pub mod event;
/// Command parsing and the command registry.
pub mod parser;
/// Save stores for session snapshots.
pub mod persistence;
/// The structured reply to a command.
pub mod result;

pub use config::EngineConfig;
pub use content::Content;
pub use engine::{CommandHandler, GameEngine, TurnContext};
pub use error::{EngineError, EngineResult, ValidationError};
pub use event::{EventBus, EventHandler, EventKind, EventLog, GameEvent, HandlerFailure, Published};
pub use parser::{Command, CommandParser, CommandRegistry};
pub use persistence::{JsonFileSaveStore, MemorySaveStore, SaveStore, Snapshot};
pub use result::CommandResult;
