//! Engine configuration.

/// Configuration for a game engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// RNG seed for reproducible combat rolls. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Display name given to the player character.
    pub player_name: String,
    /// Location id where new games begin.
    pub start_location: String,
    /// Maximum event history size (oldest events dropped when exceeded). 0 = unlimited.
    pub max_events: usize,
    /// Subscribe a tracing observer to every built-in event kind.
    pub log_events: bool,
    /// Save slot used by `save` and `load` when no name is given.
    pub default_save_name: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            player_name: "Hero".to_string(),
            start_location: "start".to_string(),
            max_events: 1000,
            log_events: true,
            default_save_name: "autosave".to_string(),
        }
    }
}

impl EngineConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the player's display name.
    pub fn with_player_name(mut self, name: impl Into<String>) -> Self {
        self.player_name = name.into();
        self
    }

    /// Set the starting location id.
    pub fn with_start_location(mut self, id: impl Into<String>) -> Self {
        self.start_location = id.into();
        self
    }

    /// Set the event history size (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }

    /// Enable or disable the event logging observer.
    pub fn with_log_events(mut self, enabled: bool) -> Self {
        self.log_events = enabled;
        self
    }

    /// Set the default save slot name.
    pub fn with_default_save_name(mut self, name: impl Into<String>) -> Self {
        self.default_save_name = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.seed, None);
        assert_eq!(cfg.player_name, "Hero");
        assert_eq!(cfg.start_location, "start");
        assert_eq!(cfg.max_events, 1000);
        assert!(cfg.log_events);
        assert_eq!(cfg.default_save_name, "autosave");
    }

    #[test]
    fn builder_chain() {
        let cfg = EngineConfig::default()
            .with_seed(7)
            .with_player_name("Aria")
            .with_start_location("village")
            .with_max_events(0)
            .with_log_events(false)
            .with_default_save_name("slot1");
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.player_name, "Aria");
        assert_eq!(cfg.start_location, "village");
        assert_eq!(cfg.max_events, 0);
        assert!(!cfg.log_events);
        assert_eq!(cfg.default_save_name, "slot1");
    }
}
