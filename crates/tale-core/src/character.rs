use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityInfo};

/// Hard ceiling for mana restored by items.
pub const MANA_CAP: u32 = 100;
/// Experience needed per level.
pub const EXPERIENCE_PER_LEVEL: u32 = 100;
/// Max health gained on level up.
pub const LEVEL_HEALTH_BONUS: u32 = 10;
/// Strength gained on level up.
pub const LEVEL_STRENGTH_BONUS: u32 = 2;

/// The player character.
///
/// Health never exceeds `max_health` and never drops below zero; every
/// mutation goes through a method that keeps both bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    /// Identity fields.
    #[serde(flatten)]
    pub info: EntityInfo,
    /// Current health, `0..=max_health`.
    pub health: u32,
    /// Maximum health.
    pub max_health: u32,
    /// Current mana.
    pub mana: u32,
    /// Base attack strength.
    pub strength: u32,
    /// Character level, starting at 1.
    pub level: u32,
    /// Accumulated experience.
    pub experience: u32,
}

impl Character {
    /// Create a fresh level-1 character with default stats.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            info: EntityInfo::new(id, name),
            health: 100,
            max_health: 100,
            mana: 50,
            strength: 10,
            level: 1,
            experience: 0,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.info.description = description.into();
        self
    }

    /// Set max health and fill health to it.
    pub fn with_max_health(mut self, max_health: u32) -> Self {
        self.max_health = max_health;
        self.health = max_health;
        self
    }

    /// Set current health, clamped to max health.
    pub fn with_health(mut self, health: u32) -> Self {
        self.health = health.min(self.max_health);
        self
    }

    /// Set mana.
    pub fn with_mana(mut self, mana: u32) -> Self {
        self.mana = mana;
        self
    }

    /// Set strength.
    pub fn with_strength(mut self, strength: u32) -> Self {
        self.strength = strength;
        self
    }

    /// Whether the character still has health left.
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Restore health up to `max_health`. Returns the amount actually healed.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.health;
        self.health = self.health.saturating_add(amount).min(self.max_health);
        self.health.saturating_sub(before)
    }

    /// Restore mana up to [`MANA_CAP`]. Returns the amount actually restored.
    pub fn restore_mana(&mut self, amount: u32) -> u32 {
        let before = self.mana;
        self.mana = self
            .mana
            .saturating_add(amount)
            .min(MANA_CAP)
            .max(before);
        self.mana - before
    }

    /// Permanently raise strength. Returns the amount added.
    pub fn boost_strength(&mut self, amount: u32) -> u32 {
        self.strength = self.strength.saturating_add(amount);
        amount
    }

    /// Subtract damage from health, flooring at zero. Returns the damage
    /// actually absorbed.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.health);
        self.health -= dealt;
        dealt
    }

    /// Add experience and recompute the level.
    ///
    /// Returns the new level when it went up. A level up raises max health
    /// and strength and heals to full.
    pub fn gain_experience(&mut self, amount: u32) -> Option<u32> {
        self.experience = self.experience.saturating_add(amount);
        let new_level = self.experience / EXPERIENCE_PER_LEVEL + 1;
        if new_level <= self.level {
            return None;
        }

        self.level = new_level;
        self.max_health += LEVEL_HEALTH_BONUS;
        self.health = self.max_health;
        self.strength += LEVEL_STRENGTH_BONUS;
        Some(new_level)
    }

    /// Experience still needed to reach the next level.
    pub fn experience_to_next_level(&self) -> u32 {
        (self.level * EXPERIENCE_PER_LEVEL).saturating_sub(self.experience)
    }
}

impl Entity for Character {
    fn info(&self) -> &EntityInfo {
        &self.info
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn heal_never_exceeds_max(max in 1u32..500, start in 0u32..500, amount in 0u32..10_000) {
            let mut c = Character::new("p", "P").with_max_health(max).with_health(start);
            let before = c.health;
            let healed = c.heal(amount);
            prop_assert!(c.health <= c.max_health);
            prop_assert_eq!(c.health, before + healed);
        }

        #[test]
        fn damage_never_underflows(start in 0u32..500, amount in 0u32..10_000) {
            let mut c = Character::new("p", "P").with_max_health(500).with_health(start);
            let dealt = c.take_damage(amount);
            prop_assert!(dealt <= amount);
            prop_assert_eq!(c.health, start - dealt);
        }

        #[test]
        fn level_tracks_experience(gains in proptest::collection::vec(15u32..=30, 1..40)) {
            let mut c = Character::new("p", "P");
            for gain in gains {
                let before = c.level;
                if let Some(level) = c.gain_experience(gain) {
                    prop_assert_eq!(level, before + 1);
                    prop_assert_eq!(c.health, c.max_health);
                }
                prop_assert_eq!(c.level, c.experience / EXPERIENCE_PER_LEVEL + 1);
            }
        }
    }
}
