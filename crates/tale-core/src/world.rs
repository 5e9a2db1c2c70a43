use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::error::{CoreError, CoreResult};
use crate::item::ItemCatalog;
use crate::location::Location;

/// Result of following an exit from a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal<'a> {
    /// The location has no exit in that direction.
    NoExit,
    /// The exit leads to a locked location.
    Locked(&'a Location),
    /// The exit leads to an enterable location.
    Open(&'a Location),
}

/// The fixed directed graph of locations.
///
/// The set of locations and their exits never change after construction.
/// Only each location's `items` and `enemies` are mutated during play.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct World {
    locations: BTreeMap<String, Location>,
}

impl World {
    /// Build a world from authored locations and check it against the catalog.
    ///
    /// Fails on duplicate ids, exits to unknown locations, and items the
    /// catalog does not define.
    pub fn build(
        locations: impl IntoIterator<Item = Location>,
        catalog: &ItemCatalog,
    ) -> CoreResult<Self> {
        let mut map = BTreeMap::new();
        for location in locations {
            let id = location.info.id.clone();
            if map.contains_key(&id) {
                return Err(CoreError::DuplicateLocation(id));
            }
            map.insert(id, location);
        }

        let world = Self { locations: map };
        world.validate(catalog)?;
        Ok(world)
    }

    /// Check referential integrity of exits and item placement.
    pub fn validate(&self, catalog: &ItemCatalog) -> CoreResult<()> {
        for location in self.locations.values() {
            for (direction, target) in &location.exits {
                if !self.locations.contains_key(target) {
                    return Err(CoreError::DanglingExit {
                        from: location.info.id.clone(),
                        direction: *direction,
                        to: target.clone(),
                    });
                }
            }
            if let Some(item) = location.items.iter().find(|id| !catalog.contains(id)) {
                return Err(CoreError::UnknownItem {
                    location: location.info.id.clone(),
                    item: item.clone(),
                });
            }
        }
        Ok(())
    }

    /// Get a location by id.
    pub fn location(&self, id: &str) -> Option<&Location> {
        self.locations.get(id)
    }

    /// Get a mutable location by id.
    pub fn location_mut(&mut self, id: &str) -> Option<&mut Location> {
        self.locations.get_mut(id)
    }

    /// Get a location by id or fail.
    pub fn require(&self, id: &str) -> CoreResult<&Location> {
        self.location(id)
            .ok_or_else(|| CoreError::LocationNotFound(id.to_string()))
    }

    /// Get a mutable location by id or fail.
    pub fn require_mut(&mut self, id: &str) -> CoreResult<&mut Location> {
        self.location_mut(id)
            .ok_or_else(|| CoreError::LocationNotFound(id.to_string()))
    }

    /// Whether a location id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.locations.contains_key(id)
    }

    /// Follow the exit in `direction` from location `from`.
    pub fn traverse(&self, from: &str, direction: Direction) -> CoreResult<Traversal<'_>> {
        let origin = self.require(from)?;
        let Some(target) = origin.exit(direction) else {
            return Ok(Traversal::NoExit);
        };
        let destination = self.require(target)?;
        if destination.is_locked {
            Ok(Traversal::Locked(destination))
        } else {
            Ok(Traversal::Open(destination))
        }
    }

    /// Iterate over all locations in id order.
    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.locations.values()
    }

    /// Number of locations.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Whether the world has no locations.
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}
