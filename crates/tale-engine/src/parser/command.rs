//! The structured form of one line of player input.

/// A parsed player command.
///
/// `name` and `args` are lowercased; `raw` is the input exactly as given.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Command {
    /// Command name, after alias resolution. Empty for blank input.
    pub name: String,
    /// Positional arguments.
    pub args: Vec<String>,
    /// The original input.
    pub raw: String,
}

impl Command {
    /// Split raw input into a name and arguments. Aliases are not resolved here.
    pub fn parse(raw: &str) -> Self {
        let cleaned = raw.trim().to_lowercase();
        let mut words = cleaned.split_whitespace().map(str::to_string);
        let name = words.next().unwrap_or_default();
        Self {
            name,
            args: words.collect(),
            raw: raw.to_string(),
        }
    }

    /// All arguments joined by single spaces, used as an item or enemy query.
    pub fn argument_text(&self) -> String {
        self.args.join(" ")
    }

    /// The first argument, if any.
    pub fn first_arg(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }
}
