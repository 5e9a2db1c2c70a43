//! Core types for Tale: entities, the item catalog, and the world model.
//!
//! This crate holds plain data and the invariants that belong to it. It has
//! no notion of commands or turns; the engine crate drives these types.

/// Player character stats and progression.
pub mod character;
/// Compass and vertical directions used to label exits.
pub mod direction;
/// Shared identity fields and the [`Entity`] accessor trait.
pub mod entity;
/// Error types used throughout the crate.
pub mod error;
/// Item definitions, effects, and the item catalog.
pub mod item;
/// Locations and the enemies that live in them.
pub mod location;
/// The mutable snapshot of one play session.
pub mod state;
/// The directed location graph.
pub mod world;

/// Re-export the player character type.
pub use character::Character;
/// Re-export the direction type.
pub use direction::Direction;
/// Re-export entity identity types.
pub use entity::{Entity, EntityInfo};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export item types.
pub use item::{EffectKind, Item, ItemCatalog, ItemType};
/// Re-export location types.
pub use location::{EnemyInstance, Location};
/// Re-export session state types.
pub use state::{GameState, GameStatus};
/// Re-export world model types.
pub use world::{Traversal, World};
