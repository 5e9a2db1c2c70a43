//! Command parsing, validation, and the command registry.

mod command;
mod registry;

pub use command::Command;
pub use registry::{CommandRegistry, CommandSpec};

use tale_core::Direction;

use crate::error::ValidationError;

/// Turns raw player text into validated [`Command`]s.
#[derive(Debug, Clone)]
pub struct CommandParser {
    registry: CommandRegistry,
    history: Vec<String>,
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new(CommandRegistry::standard())
    }
}

impl CommandParser {
    /// Create a parser over the given registry.
    pub fn new(registry: CommandRegistry) -> Self {
        Self {
            registry,
            history: Vec::new(),
        }
    }

    /// The command registry.
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Mutable access to the registry, for registering commands.
    pub fn registry_mut(&mut self) -> &mut CommandRegistry {
        &mut self.registry
    }

    /// Every raw input parsed so far, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Parse raw input, resolving aliases, and record it in the history.
    pub fn parse(&mut self, raw: &str) -> Command {
        self.history.push(raw.to_string());
        let mut command = Command::parse(raw);
        if let Some(target) = self.registry.alias_target(&command.name) {
            command.name = target.to_string();
        }
        command
    }

    /// Check a parsed command against the registry.
    pub fn validate(&self, command: &Command) -> Result<(), ValidationError> {
        if command.name.is_empty() {
            return Err(ValidationError::EmptyCommand);
        }

        let Some(spec) = self.registry.get(&command.name) else {
            return Err(ValidationError::UnknownCommand {
                name: command.name.clone(),
                suggestion: self.registry.suggest(&command.name),
            });
        };

        if let Some(missing) = spec.args.get(command.args.len()) {
            return Err(ValidationError::MissingArgument(missing.clone()));
        }

        if command.name == "move" {
            let token = command.args.first().map(String::as_str).unwrap_or_default();
            if Direction::parse(token).is_none() {
                return Err(ValidationError::InvalidDirection(token.to_string()));
            }
        }

        Ok(())
    }

    /// Parse and validate in one step.
    pub fn parse_valid(&mut self, raw: &str) -> Result<Command, ValidationError> {
        let command = self.parse(raw);
        self.validate(&command)?;
        Ok(command)
    }
}
