use crate::direction::Direction;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while building or querying the world model.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Two locations were authored with the same id.
    #[error("location already exists: \"{0}\"")]
    DuplicateLocation(String),

    /// Two catalog items were defined with the same id.
    #[error("item already exists: \"{0}\"")]
    DuplicateItem(String),

    /// An exit points at a location that is not part of the world.
    #[error("exit {direction} from \"{from}\" leads to unknown location \"{to}\"")]
    DanglingExit {
        /// The location that owns the exit.
        from: String,
        /// The exit's direction label.
        direction: Direction,
        /// The missing destination id.
        to: String,
    },

    /// A location places an item id that the catalog does not define.
    #[error("location \"{location}\" holds unknown item \"{item}\"")]
    UnknownItem {
        /// The location holding the item.
        location: String,
        /// The undefined item id.
        item: String,
    },

    /// The requested location id does not exist in the world.
    #[error("location not found: {0}")]
    LocationNotFound(String),

    /// The requested item id does not exist in the catalog.
    #[error("item not found: {0}")]
    ItemNotFound(String),
}
