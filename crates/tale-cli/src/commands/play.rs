//! The interactive game shell.

use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;

use tale_engine::{CommandResult, EngineConfig, GameEngine, JsonFileSaveStore};

pub fn run(seed: Option<u64>, name: &str, data_dir: Option<&Path>) -> Result<(), String> {
    let mut config = EngineConfig::default().with_player_name(name);
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }

    let mut engine =
        GameEngine::new(config).map_err(|e| format!("failed to load the world: {e}"))?;
    if let Some(dir) = data_dir {
        let store = JsonFileSaveStore::new(dir)
            .map_err(|e| format!("cannot use save directory {}: {e}", dir.display()))?;
        tracing::info!(dir = %dir.display(), "saving games to disk");
        engine = engine.with_store(store);
    }

    start_game(&mut engine)?;
    println!("  Type 'help' for commands, 'new' to restart, 'quit' to exit.\n");

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input.to_lowercase().as_str() {
            "quit" | "exit" => {
                println!("Farewell, {name}.");
                break;
            }
            "start" | "new" => start_game(&mut engine)?,
            _ => {
                let was_over = is_over(&engine);
                print_result(&engine.process_command(input));
                if !was_over && is_over(&engine) {
                    let hint = "Type 'new' to start over or 'load' to restore a save.";
                    println!("{}\n", hint.yellow());
                }
            }
        }
    }

    Ok(())
}

fn start_game(engine: &mut GameEngine) -> Result<(), String> {
    engine
        .initialize_world()
        .map_err(|e| format!("failed to start a game: {e}"))?;
    println!("  {} a new adventure\n", "Starting".bold());
    print_result(&engine.process_command("look"));
    Ok(())
}

fn is_over(engine: &GameEngine) -> bool {
    engine.state().is_some_and(|state| state.is_over())
}

fn print_result(result: &CommandResult) {
    if result.success {
        println!("{}\n", result.message);
    } else {
        println!("{}\n", result.message.red());
    }
}
