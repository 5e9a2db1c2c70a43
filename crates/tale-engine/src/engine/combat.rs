//! The `attack` command: one full combat round per call.

use rand::Rng;
use serde_json::json;

use super::turn::TurnContext;
use crate::error::{EngineError, EngineResult};
use crate::event::EventKind;
use crate::parser::Command;
use crate::result::CommandResult;

/// Experience awarded for a kill is rolled from this range.
const EXPERIENCE_REWARD: std::ops::RangeInclusive<u32> = 15..=30;

/// How far player damage may fall below strength.
const DAMAGE_SPREAD_BELOW: u32 = 2;

/// How far player damage may rise above strength.
const DAMAGE_SPREAD_ABOVE: u32 = 3;

pub(crate) fn do_attack(
    turn: &mut TurnContext<'_>,
    command: &Command,
) -> EngineResult<CommandResult> {
    turn.ensure_playing()?;
    let query = command.argument_text();

    let location_id = turn.state.current_location_id.clone();
    let location = turn.world.require_mut(&location_id)?;
    let index = location
        .find_enemy(&query)
        .ok_or_else(|| EngineError::EnemyNotHere(query.clone()))?;

    let strength = turn.state.player.strength;
    let damage = turn.rng.random_range(
        strength.saturating_sub(DAMAGE_SPREAD_BELOW)..=strength.saturating_add(DAMAGE_SPREAD_ABOVE),
    );
    let enemy = &mut location.enemies[index];
    enemy.take_damage(damage);
    let enemy_name = enemy.name.clone();
    let enemy_health = enemy.health;
    let mut lines = vec![format!("You hit the {enemy_name} for {damage} damage.")];

    if enemy_health == 0 {
        location.enemies.remove(index);
        let enemies_left = location.enemies.len();
        let experience = turn.rng.random_range(EXPERIENCE_REWARD);
        let level_up = turn.state.player.gain_experience(experience);

        lines.push(format!(
            "The {enemy_name} is defeated! You gain {experience} experience."
        ));
        turn.emit(
            EventKind::EnemyDamaged,
            json!({ "enemy": enemy_name, "damage": damage, "health": 0 }),
        );
        if let Some(level) = level_up {
            let player = &turn.state.player;
            lines.push(format!(
                "You reached level {level}! Health {}/{}, strength {}.",
                player.health, player.max_health, player.strength
            ));
            turn.emit(EventKind::LevelUp, json!({ "level": level }));
        }
        turn.emit(
            EventKind::EnemyDefeated,
            json!({ "enemy": enemy_name, "experience": experience }),
        );
        if enemies_left == 0 {
            lines.push("The area is clear.".to_string());
            turn.emit(
                EventKind::CombatEnded,
                json!({ "result": "victory", "location": location_id }),
            );
        }
        tracing::debug!(enemy = %enemy_name, experience, "enemy defeated");

        let data = json!({
            "enemy": enemy_name,
            "damage": damage,
            "enemy_health": 0,
            "defeated": true,
            "experience": experience,
            "level_up": level_up,
        });
        return Ok(CommandResult::ok(lines.join("\n")).with_data(data));
    }

    lines.push(format!("The {enemy_name} has {enemy_health} health left."));
    let counter = location.enemies[index].damage;
    let player = &mut turn.state.player;
    player.take_damage(counter);
    let player_health = player.health;
    lines.push(format!(
        "The {enemy_name} hits you for {counter} damage. You have {player_health} health left."
    ));
    let game_over = !player.is_alive();
    if game_over {
        turn.state.end_game();
        lines.push("You have been defeated. Game over.".to_string());
        tracing::info!(enemy = %enemy_name, "player defeated");
    }

    turn.emit(
        EventKind::EnemyDamaged,
        json!({ "enemy": enemy_name, "damage": damage, "health": enemy_health }),
    );
    turn.emit(
        EventKind::PlayerDamaged,
        json!({ "damage": counter, "enemy": enemy_name, "health": player_health }),
    );

    let data = json!({
        "enemy": enemy_name,
        "damage": damage,
        "enemy_health": enemy_health,
        "defeated": false,
        "player_health": player_health,
        "game_over": game_over,
    });
    Ok(CommandResult::ok(lines.join("\n")).with_data(data))
}

#[cfg(test)]
mod tests {
    use tale_core::{EnemyInstance, Location};

    use crate::config::EngineConfig;
    use crate::content::Content;
    use crate::engine::GameEngine;
    use crate::engine::tests::engine;
    use crate::event::EventKind;

    fn arena(player_health: u32, enemy: EnemyInstance) -> GameEngine {
        let mut content = Content::standard().unwrap();
        content.locations = vec![Location::new("start", "Arena").with_enemy(enemy)];
        content.player = content.player.with_health(player_health);
        let mut engine =
            GameEngine::with_content(EngineConfig::default().with_seed(3), content);
        engine.initialize_world().unwrap();
        engine
    }

    #[test]
    fn wolf_round_damage_in_range() {
        let mut engine = engine();
        engine.process_command("move north");
        let result = engine.process_command("attack wolf");
        assert!(result.success, "{}", result.message);

        let data = result.data.unwrap();
        let damage = data["damage"].as_u64().unwrap();
        assert!((8..=13).contains(&damage));
        assert_eq!(data["enemy_health"].as_u64().unwrap(), 30 - damage);
        assert_eq!(engine.player().unwrap().health, 90);

        let kinds: Vec<_> = engine
            .event_log()
            .events()
            .iter()
            .map(|e| e.kind.clone())
            .filter(|k| matches!(k, EventKind::EnemyDamaged | EventKind::PlayerDamaged))
            .collect();
        assert_eq!(kinds, vec![EventKind::EnemyDamaged, EventKind::PlayerDamaged]);
    }

    #[test]
    fn missing_enemy() {
        let mut engine = engine();
        let result = engine.process_command("attack wolf");
        assert!(!result.success);
        assert_eq!(result.message, "There is no 'wolf' here to attack.");
    }

    #[test]
    fn killing_blow_event_order() {
        let mut engine = arena(100, EnemyInstance::new("rat", "Rat", 1, 1));
        let result = engine.process_command("attack rat");
        assert!(result.success);
        assert!(engine.current_location().unwrap().enemies.is_empty());

        let kinds: Vec<EventKind> = engine
            .event_log()
            .events()
            .iter()
            .map(|e| e.kind.clone())
            .skip_while(|k| *k != EventKind::EnemyDamaged)
            .collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::EnemyDamaged,
                EventKind::EnemyDefeated,
                EventKind::CombatEnded
            ]
        );
        let xp = engine.player().unwrap().experience;
        assert!((15..=30).contains(&xp));
        assert_eq!(
            engine.event_log().last().unwrap().data["result"],
            "victory"
        );
    }

    #[test]
    fn level_up_event_precedes_defeat() {
        let mut content_player = Content::standard().unwrap().player;
        content_player.experience = 95;
        let mut content = Content::standard().unwrap();
        content.locations = vec![
            Location::new("start", "Arena").with_enemy(EnemyInstance::new("rat", "Rat", 1, 1)),
        ];
        content.player = content_player.with_health(40);
        let mut engine = GameEngine::with_content(EngineConfig::default().with_seed(9), content);
        engine.initialize_world().unwrap();

        engine.process_command("attack rat");
        let player = engine.player().unwrap();
        assert_eq!(player.level, 2);
        assert_eq!(player.max_health, 110);
        assert_eq!(player.health, 110);
        assert_eq!(player.strength, 12);

        let kinds: Vec<EventKind> = engine
            .event_log()
            .events()
            .iter()
            .map(|e| e.kind.clone())
            .skip_while(|k| *k != EventKind::EnemyDamaged)
            .collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::EnemyDamaged,
                EventKind::LevelUp,
                EventKind::EnemyDefeated,
                EventKind::CombatEnded
            ]
        );
    }

    #[test]
    fn counter_attack_floors_at_zero_and_ends_game() {
        let mut engine = arena(5, EnemyInstance::new("ogre", "Ogre", 500, 40));
        let result = engine.process_command("attack ogre");
        assert!(result.success);
        assert!(result.message.contains("Game over"));
        assert_eq!(engine.player().unwrap().health, 0);
        assert!(engine.state().unwrap().is_over());

        let again = engine.process_command("attack ogre");
        assert!(!again.success);
        assert_eq!(
            again.message,
            "The game is over. Start a new game or load a save."
        );
        assert!(engine.process_command("stats").success);
    }

    #[test]
    fn enemy_remains_while_alive() {
        let mut engine = arena(100, EnemyInstance::new("ogre", "Ogre", 500, 1));
        engine.process_command("attack ogre");
        let enemies = &engine.current_location().unwrap().enemies;
        assert_eq!(enemies.len(), 1);
        assert!(enemies[0].health < 500);
        assert_eq!(
            engine
                .event_log()
                .count(&EventKind::EnemyDefeated),
            0
        );
    }
}
