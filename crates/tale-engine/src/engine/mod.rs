//! The game engine: owns the session and dispatches commands to handlers.

mod combat;
mod info;
mod items;
mod movement;
mod turn;

pub use info::describe_location;
pub use turn::{CommandHandler, TurnContext};

use std::collections::HashMap;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;
use tale_core::{Character, GameState, Item, ItemCatalog, Location, World};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::content::Content;
use crate::error::{EngineError, EngineResult};
use crate::event::{
    EventBus, EventData, EventHandler, EventKind, EventLog, GameEvent, HandlerFailure,
    HandlerResult, event_data,
};
use crate::parser::{Command, CommandParser};
use crate::persistence::{MemorySaveStore, SaveStore, Snapshot};
use crate::result::CommandResult;

/// The live world and state of one play session.
#[derive(Debug, Clone)]
struct Session {
    world: World,
    state: GameState,
}

/// Runs one single-player game at a time.
///
/// Every command goes through [`GameEngine::process_command`], which never
/// fails: errors come back as a [`CommandResult`] with `success: false`.
pub struct GameEngine {
    config: EngineConfig,
    content: Content,
    parser: CommandParser,
    handlers: HashMap<String, CommandHandler>,
    bus: EventBus,
    history: EventLog,
    last_failures: Vec<HandlerFailure>,
    store: Box<dyn SaveStore>,
    rng: StdRng,
    session: Option<Session>,
}

impl GameEngine {
    /// Create an engine over the shipped world. No game is active until
    /// [`GameEngine::initialize_world`] or a `load` command.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        Ok(Self::with_content(config, Content::standard()?))
    }

    /// Create an engine over custom content.
    pub fn with_content(config: EngineConfig, content: Content) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut engine = Self {
            history: EventLog::new(config.max_events),
            content,
            parser: CommandParser::default(),
            handlers: HashMap::new(),
            bus: EventBus::new(),
            last_failures: Vec::new(),
            store: Box::new(MemorySaveStore::new()),
            rng,
            session: None,
            config,
        };

        engine.install_handler("move", Arc::new(movement::do_move));
        engine.install_handler("look", Arc::new(info::do_look));
        engine.install_handler("take", Arc::new(items::do_take));
        engine.install_handler("drop", Arc::new(items::do_drop));
        engine.install_handler("use", Arc::new(items::do_use));
        engine.install_handler("inventory", Arc::new(info::do_inventory));
        engine.install_handler("stats", Arc::new(info::do_stats));
        engine.install_handler("attack", Arc::new(combat::do_attack));

        if engine.config.log_events {
            let observer: EventHandler = Arc::new(|event: &GameEvent| -> HandlerResult {
                debug!(event = %event.kind, data = ?event.data, "event published");
                Ok(())
            });
            for kind in EventKind::BUILTIN {
                engine.bus.subscribe(kind, Arc::clone(&observer));
            }
        }

        engine
    }

    /// Replace the save store.
    pub fn with_store(mut self, store: impl SaveStore + 'static) -> Self {
        self.store = Box::new(store);
        self
    }

    fn install_handler(&mut self, name: &str, handler: CommandHandler) {
        self.handlers.insert(name.to_string(), handler);
    }

    /// Register a new command, or replace the handler of an existing one.
    ///
    /// `help`, `save`, `load` and `saves` are answered by the engine itself
    /// and cannot be overridden.
    pub fn register_command(
        &mut self,
        name: &str,
        args: &[&str],
        summary: &str,
        handler: CommandHandler,
    ) {
        self.parser.registry_mut().register(name, args, summary);
        self.install_handler(name, handler);
    }

    /// Build a fresh world and game state, discarding any current session.
    pub fn initialize_world(&mut self) -> EngineResult<&GameState> {
        self.last_failures.clear();

        let world = World::build(self.content.locations.clone(), &self.content.catalog)?;
        let start = world.require(&self.config.start_location)?.info.id.clone();
        let mut player = self.content.player.clone();
        player.info.name = self.config.player_name.clone();
        let state = GameState::new(player, start.clone());

        info!(locations = world.len(), start = %start, "world initialized");
        self.session = Some(Session { world, state });
        self.publish(
            EventKind::GameStarted,
            event_data(json!({ "location": start, "player": self.config.player_name })),
        );

        self.state().ok_or(EngineError::NoActiveGame)
    }

    /// Parse, validate and run one line of player input.
    pub fn process_command(&mut self, raw: &str) -> CommandResult {
        self.last_failures.clear();
        match self.execute(raw) {
            Ok(result) => result,
            Err(err) => {
                debug!(input = raw, error = %err, "command rejected");
                CommandResult::failure(err.to_string())
            }
        }
    }

    fn execute(&mut self, raw: &str) -> EngineResult<CommandResult> {
        let command = self.parser.parse_valid(raw)?;
        debug!(command = %command.name, args = ?command.args, "processing command");

        match command.name.as_str() {
            "help" => Ok(self.do_help(&command)),
            "save" => self.do_save(&command),
            "load" => self.do_load(&command),
            "saves" => self.do_saves(),
            _ => self.dispatch(&command),
        }
    }

    fn dispatch(&mut self, command: &Command) -> EngineResult<CommandResult> {
        let handler = self
            .handlers
            .get(&command.name)
            .cloned()
            .ok_or_else(|| EngineError::NotImplemented(command.name.clone()))?;
        let session = self.session.as_mut().ok_or(EngineError::NoActiveGame)?;

        let mut turn = TurnContext::new(
            &mut session.world,
            &mut session.state,
            &self.content.catalog,
            &mut self.rng,
        );
        let result = handler(&mut turn, command)?;
        let events = turn.take_events();

        for (kind, data) in events {
            self.publish(kind, data);
        }
        Ok(result)
    }

    fn publish(&mut self, kind: EventKind, data: EventData) {
        let published = self.bus.publish(kind, data);
        self.last_failures.extend(published.failures);
        self.history.push(published.event);
    }

    fn do_help(&self, command: &Command) -> CommandResult {
        CommandResult::ok(self.parser.registry().help(command.first_arg()))
    }

    fn do_save(&mut self, command: &Command) -> EngineResult<CommandResult> {
        let session = self.session.as_ref().ok_or(EngineError::NoActiveGame)?;
        let name = command
            .first_arg()
            .unwrap_or(self.config.default_save_name.as_str())
            .to_string();

        let snapshot = Snapshot::new(session.state.clone(), session.world.clone());
        let save_id = self.store.save(&name, &snapshot)?;
        let location = session.state.current_location_id.clone();

        info!(save = %save_id, "game saved");
        self.publish(
            EventKind::GameSaved,
            event_data(json!({ "save_id": save_id, "location": location })),
        );
        Ok(CommandResult::ok(format!("Game saved as '{save_id}'."))
            .with_data(json!({ "save_id": save_id, "saved_at": snapshot.saved_at })))
    }

    fn do_load(&mut self, command: &Command) -> EngineResult<CommandResult> {
        let name = command
            .first_arg()
            .unwrap_or(self.config.default_save_name.as_str())
            .to_string();
        let snapshot = self
            .store
            .load(&name)?
            .ok_or_else(|| EngineError::SaveNotFound(name.clone()))?;
        snapshot.world.validate(&self.content.catalog)?;
        let location = snapshot.world.require(&snapshot.state.current_location_id)?;
        let description = describe_location(location, &self.content.catalog);
        let location_id = location.info.id.clone();

        info!(save = %name, "game loaded");
        self.session = Some(Session {
            world: snapshot.world,
            state: snapshot.state,
        });
        self.publish(
            EventKind::GameLoaded,
            event_data(json!({ "save_id": name, "location": location_id })),
        );
        Ok(
            CommandResult::ok(format!("Loaded '{name}'.\n\n{description}"))
                .with_data(json!({ "save_id": name, "saved_at": snapshot.saved_at })),
        )
    }

    fn do_saves(&self) -> EngineResult<CommandResult> {
        let names = self.store.list()?;
        let message = if names.is_empty() {
            "No saved games.".to_string()
        } else {
            format!("Saved games:\n  {}", names.join("\n  "))
        };
        Ok(CommandResult::ok(message).with_data(json!({ "saves": names })))
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Whether a game is in progress.
    pub fn has_active_game(&self) -> bool {
        self.session.is_some()
    }

    /// The current game state.
    pub fn state(&self) -> Option<&GameState> {
        self.session.as_ref().map(|s| &s.state)
    }

    /// The current world.
    pub fn world(&self) -> Option<&World> {
        self.session.as_ref().map(|s| &s.world)
    }

    /// The player's current location.
    pub fn current_location(&self) -> Option<&Location> {
        let session = self.session.as_ref()?;
        session.world.location(&session.state.current_location_id)
    }

    /// The player character.
    pub fn player(&self) -> Option<&Character> {
        self.state().map(|s| &s.player)
    }

    /// Carried items. Empty when no game is active.
    pub fn inventory(&self) -> &[Item] {
        self.state()
            .map(|s| s.inventory.as_slice())
            .unwrap_or_default()
    }

    /// Item definitions.
    pub fn catalog(&self) -> &ItemCatalog {
        &self.content.catalog
    }

    /// The command parser, including its history and registry.
    pub fn parser(&self) -> &CommandParser {
        &self.parser
    }

    /// The event bus.
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Mutable access to the event bus.
    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    /// Subscribe a handler to an event kind.
    pub fn subscribe(&mut self, kind: EventKind, handler: EventHandler) -> bool {
        self.bus.subscribe(kind, handler)
    }

    /// Events published so far, oldest first, up to the configured capacity.
    pub fn event_log(&self) -> &EventLog {
        &self.history
    }

    /// Event handlers that failed during the most recent command.
    pub fn last_handler_failures(&self) -> &[HandlerFailure] {
        &self.last_failures
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use super::*;

    pub(crate) fn engine() -> GameEngine {
        let mut engine = GameEngine::new(EngineConfig::default().with_seed(42)).unwrap();
        engine.initialize_world().unwrap();
        engine
    }

    #[test]
    fn initialize_world_starts_fresh() {
        let mut engine = GameEngine::new(EngineConfig::default().with_player_name("Aria")).unwrap();
        assert!(!engine.has_active_game());

        let state = engine.initialize_world().unwrap();
        assert_eq!(state.current_location_id, "start");
        assert_eq!(state.player.info.name, "Aria");
        assert_eq!(state.player.health, 100);
        assert!(state.visited_locations.contains("start"));
        assert_eq!(engine.event_log().count(&EventKind::GameStarted), 1);
    }

    #[test]
    fn initialize_world_discards_previous_session() {
        let mut engine = engine();
        engine.process_command("take sword");
        engine.process_command("move north");
        engine.initialize_world().unwrap();
        assert!(engine.inventory().is_empty());
        assert_eq!(engine.current_location().unwrap().items.len(), 2);
    }

    #[test]
    fn unknown_start_location_is_an_error() {
        let mut engine =
            GameEngine::new(EngineConfig::default().with_start_location("moon")).unwrap();
        assert!(matches!(
            engine.initialize_world(),
            Err(EngineError::World(_))
        ));
        assert!(!engine.has_active_game());
    }

    #[test]
    fn commands_before_start_report_no_game() {
        let mut engine = GameEngine::new(EngineConfig::default()).unwrap();
        let result = engine.process_command("look");
        assert!(!result.success);
        assert_eq!(result.message, "No game in progress. Start a game first.");
        assert!(engine.process_command("help").success);
    }

    #[test]
    fn validation_errors_become_failures() {
        let mut engine = engine();
        assert_eq!(engine.process_command("").message, "Please enter a command.");
        assert_eq!(
            engine.process_command("take").message,
            "Missing argument: item_name"
        );
        assert!(
            engine
                .process_command("inventroy")
                .message
                .contains("Did you mean 'inventory'?")
        );
        assert_eq!(engine.parser().history().len(), 3);
    }

    #[test]
    fn registered_command_without_handler_is_not_implemented() {
        let mut engine = engine();
        engine
            .parser
            .registry_mut()
            .register("dance", &[], "Dance a jig");
        let result = engine.process_command("dance");
        assert!(!result.success);
        assert_eq!(result.message, "Command 'dance' is not implemented.");
    }

    #[test]
    fn custom_command_emits_events() {
        let mut engine = engine();
        let handler: CommandHandler = Arc::new(
            |turn: &mut TurnContext<'_>, command: &Command| -> EngineResult<CommandResult> {
                turn.ensure_playing()?;
                let style = command.argument_text();
                turn.emit(EventKind::Custom("danced".into()), json!({ "style": style }));
                Ok(CommandResult::ok(format!("You dance a {style}.")))
            },
        );
        engine.register_command("dance", &["style"], "Dance", handler);

        let result = engine.process_command("dance waltz");
        assert_eq!(result.message, "You dance a waltz.");
        let danced = engine.event_log().of_kind(&EventKind::Custom("danced".into()));
        assert_eq!(danced[0].data["style"], "waltz");
    }

    #[test]
    fn custom_command_can_change_the_location() {
        let mut engine = engine();
        let handler: CommandHandler = Arc::new(
            |turn: &mut TurnContext<'_>, _: &Command| -> EngineResult<CommandResult> {
                turn.ensure_playing()?;
                turn.location_mut()?.items.push("ruby".to_string());
                let name = turn.location()?.info.name.clone();
                Ok(CommandResult::ok(format!("A ruby appears in the {name}.")))
            },
        );
        engine.register_command("conjure", &[], "Conjure a gem", handler);

        let result = engine.process_command("conjure");
        assert_eq!(result.message, "A ruby appears in the Crossroads.");
        assert_eq!(
            engine.current_location().unwrap().items,
            vec!["iron_sword", "wooden_shield", "ruby"]
        );
    }

    #[test]
    fn config_is_kept() {
        let engine = GameEngine::new(EngineConfig::default().with_seed(5)).unwrap();
        assert_eq!(engine.config().seed, Some(5));
        assert_eq!(engine.config().default_save_name, "autosave");
    }

    #[test]
    fn clearing_the_bus_silences_observers() {
        let mut engine = engine();
        engine.bus_mut().clear(None);
        assert_eq!(engine.bus().subscriber_count(&EventKind::PlayerMoved), 0);
        assert!(engine.process_command("move north").success);
        assert_eq!(engine.event_log().count(&EventKind::PlayerMoved), 1);
    }

    #[test]
    fn failed_command_publishes_nothing() {
        let mut engine = engine();
        let before = engine.event_log().len();
        engine.process_command("take dragon");
        engine.process_command("move west");
        assert_eq!(engine.event_log().len(), before);
    }

    #[test]
    fn subscribers_see_events_in_order() {
        let mut engine = engine();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let handler: EventHandler = Arc::new(move |event: &GameEvent| -> HandlerResult {
            sink.lock().map_err(|e| e.to_string())?.push(event.kind.clone());
            Ok(())
        });
        engine.subscribe(EventKind::ItemPickedUp, Arc::clone(&handler));
        engine.subscribe(EventKind::InventoryUpdated, handler);

        engine.process_command("take sword");
        assert_eq!(
            *seen.lock().unwrap(),
            vec![EventKind::ItemPickedUp, EventKind::InventoryUpdated]
        );
    }

    #[test]
    fn handler_failures_are_reported_not_raised() {
        let mut engine = engine();
        engine.subscribe(
            EventKind::PlayerMoved,
            Arc::new(|_: &GameEvent| -> HandlerResult { Err("observer offline".into()) }),
        );

        let result = engine.process_command("move north");
        assert!(result.success);
        assert_eq!(engine.state().unwrap().current_location_id, "forest");
        let failures = engine.last_handler_failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].message, "observer offline");

        engine.process_command("look");
        assert!(engine.last_handler_failures().is_empty());
    }

    #[test]
    fn logging_observer_is_optional() {
        let quiet = GameEngine::new(EngineConfig::default().with_log_events(false)).unwrap();
        assert_eq!(quiet.bus().subscriber_count(&EventKind::PlayerMoved), 0);
        let loud = GameEngine::new(EngineConfig::default()).unwrap();
        assert_eq!(loud.bus().subscriber_count(&EventKind::PlayerMoved), 1);
    }

    #[test]
    fn event_history_is_bounded() {
        let mut engine =
            GameEngine::new(EngineConfig::default().with_seed(1).with_max_events(2)).unwrap();
        engine.initialize_world().unwrap();
        engine.process_command("move north");
        engine.process_command("move south");
        assert_eq!(engine.event_log().len(), 2);
        assert_eq!(engine.event_log().count(&EventKind::GameStarted), 0);
    }

    #[test]
    fn help_lists_and_explains() {
        let mut engine = engine();
        assert!(engine.process_command("help").message.contains("attack <target>"));
        assert_eq!(
            engine.process_command("help i").message,
            "i is an alias for inventory"
        );
    }

    #[test]
    fn save_and_load_restore_world_and_state() {
        let mut engine = engine();
        engine.process_command("take sword");
        assert_eq!(engine.process_command("save").message, "Game saved as 'autosave'.");

        engine.process_command("move north");
        engine.process_command("drop sword");
        let result = engine.process_command("load");
        assert!(result.success, "{}", result.message);
        assert!(result.message.starts_with("Loaded 'autosave'."));

        assert_eq!(engine.state().unwrap().current_location_id, "start");
        assert_eq!(engine.inventory()[0].info.id, "iron_sword");
        let forest = engine.world().unwrap().location("forest").unwrap();
        assert!(!forest.items.contains(&"iron_sword".to_string()));

        assert_eq!(engine.event_log().count(&EventKind::GameSaved), 1);
        assert_eq!(engine.event_log().count(&EventKind::GameLoaded), 1);
    }

    #[test]
    fn named_slots_and_listing() {
        let mut engine = engine();
        assert_eq!(engine.process_command("saves").message, "No saved games.");
        engine.process_command("save slot2");
        engine.process_command("save slot1");
        assert_eq!(
            engine.process_command("saves").message,
            "Saved games:\n  slot1\n  slot2"
        );
        assert_eq!(
            engine.process_command("load slot9").message,
            "No saved game named 'slot9'."
        );
        assert!(!engine.process_command("save ../x").success);
    }

    #[test]
    fn load_works_without_active_game() {
        let mut store = MemorySaveStore::new();
        {
            let mut first = engine();
            first.process_command("move east");
            let session = first.session.as_ref().unwrap();
            store
                .save("autosave", &Snapshot::new(session.state.clone(), session.world.clone()))
                .unwrap();
        }

        let mut engine = GameEngine::new(EngineConfig::default()).unwrap().with_store(store);
        assert!(!engine.process_command("save").success);
        let result = engine.process_command("load");
        assert!(result.success);
        assert_eq!(engine.state().unwrap().current_location_id, "village");
    }
}
