use tale_engine::CommandRegistry;

/// Print every registered command and alias.
pub fn run() -> Result<(), String> {
    print!("{}", CommandRegistry::standard().help(None));
    Ok(())
}
