//! The open table of recognized commands and aliases.

use std::collections::BTreeMap;

use strsim::jaro_winkler;

/// Minimum similarity for a "did you mean" suggestion (0.0-1.0).
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// A registered command and its positional arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Command name.
    pub name: String,
    /// Expected argument names, in order.
    pub args: Vec<String>,
    /// One-line description for help output.
    pub summary: String,
}

impl CommandSpec {
    /// Usage line, e.g. `take <item_name>`.
    pub fn usage(&self) -> String {
        let mut usage = self.name.clone();
        for arg in &self.args {
            usage.push_str(&format!(" <{arg}>"));
        }
        usage
    }
}

/// Mapping from command name to expected arguments, plus aliases.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: Vec<CommandSpec>,
    aliases: BTreeMap<String, String>,
}

impl CommandRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in command set.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register("move", &["direction"], "Travel through an exit");
        registry.register("look", &[], "Describe your surroundings");
        registry.register("take", &["item_name"], "Pick up an item here");
        registry.register("drop", &["item_name"], "Drop a carried item");
        registry.register("use", &["item_name"], "Use a carried item");
        registry.register("inventory", &[], "List what you are carrying");
        registry.register("stats", &[], "Show your character's statistics");
        registry.register("attack", &["target"], "Fight an enemy here");
        registry.register("help", &[], "Show commands, or usage for one command");
        registry.register("save", &[], "Save the game, optionally under a name");
        registry.register("load", &[], "Load a saved game, optionally by name");
        registry.register("saves", &[], "List saved games");

        registry.register_alias("i", "inventory");
        registry.register_alias("s", "stats");
        registry.register_alias("l", "look");
        registry.register_alias("go", "move");
        registry.register_alias("get", "take");
        registry
    }

    /// Register a command. Returns `false` if it replaced an existing entry.
    pub fn register(&mut self, name: &str, args: &[&str], summary: &str) -> bool {
        let spec = CommandSpec {
            name: name.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            summary: summary.to_string(),
        };
        if let Some(existing) = self.commands.iter_mut().find(|c| c.name == name) {
            *existing = spec;
            false
        } else {
            self.commands.push(spec);
            true
        }
    }

    /// Register an alias for an existing command. Returns `false` if the
    /// target is not registered.
    pub fn register_alias(&mut self, alias: &str, target: &str) -> bool {
        if self.get(target).is_none() {
            return false;
        }
        self.aliases.insert(alias.to_string(), target.to_string());
        true
    }

    /// Look up a command by name.
    pub fn get(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.iter().find(|c| c.name == name)
    }

    /// The command an alias points to.
    pub fn alias_target(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    /// Registered commands, in registration order.
    pub fn commands(&self) -> impl Iterator<Item = &CommandSpec> {
        self.commands.iter()
    }

    /// Registered aliases as `(alias, target)` pairs.
    pub fn aliases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(a, t)| (a.as_str(), t.as_str()))
    }

    /// Suggest the registered name closest to a mistyped one.
    pub fn suggest(&self, input: &str) -> Option<String> {
        self.commands
            .iter()
            .map(|c| (c.name.as_str(), jaro_winkler(input, &c.name)))
            .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(name, _)| name.to_string())
    }

    /// Help text for one command or alias, or the full listing.
    pub fn help(&self, topic: Option<&str>) -> String {
        let Some(topic) = topic else {
            let width = self.commands.iter().map(|c| c.usage().len()).max().unwrap_or(0);
            let mut output = "Available commands:\n".to_string();
            for spec in &self.commands {
                output.push_str(&format!("  {:<width$}  {}\n", spec.usage(), spec.summary));
            }
            if !self.aliases.is_empty() {
                let aliases: Vec<String> = self
                    .aliases()
                    .map(|(alias, target)| format!("{alias} = {target}"))
                    .collect();
                output.push_str(&format!("Aliases: {}\n", aliases.join(", ")));
            }
            return output;
        };

        if let Some(spec) = self.get(topic) {
            if spec.args.is_empty() {
                format!("{} - {}. No arguments needed.", spec.name, spec.summary)
            } else {
                format!("{} - {}.", spec.usage(), spec.summary)
            }
        } else if let Some(target) = self.alias_target(topic) {
            format!("{topic} is an alias for {target}")
        } else {
            format!("No help available for '{topic}'.")
        }
    }
}
