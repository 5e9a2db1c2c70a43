use serde::{Deserialize, Serialize};

/// Identity and description shared by every game object.
///
/// `id` is unique within its own collection and never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityInfo {
    /// Stable identifier, unique within its collection.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
}

impl EntityInfo {
    /// Create identity fields with an empty description.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Read access to the identity embedded in a game object.
pub trait Entity {
    /// The embedded identity record.
    fn info(&self) -> &EntityInfo;

    /// The entity's id.
    fn id(&self) -> &str {
        &self.info().id
    }

    /// The entity's display name.
    fn name(&self) -> &str {
        &self.info().name
    }

    /// The entity's description.
    fn description(&self) -> &str {
        &self.info().description
    }

    /// Whether a lowercased query is a substring of the display name or id.
    fn matches(&self, query: &str) -> bool {
        let info = self.info();
        info.name.to_lowercase().contains(query) || info.id.to_lowercase().contains(query)
    }
}
