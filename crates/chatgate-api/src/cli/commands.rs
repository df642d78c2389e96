//! `chatgate commands` -- list the command registry.

use anyhow::Result;
use console::style;

use chatgate_core::dispatch::DEFAULT_PREFIX;

use crate::state::AppState;

/// Print every registered command with its description.
pub fn list_commands(state: &AppState, json: bool) -> Result<()> {
    if json {
        let commands: Vec<_> = state
            .registry
            .iter()
            .map(|c| {
                serde_json::json!({
                    "name": c.name().to_lowercase(),
                    "description": c.description(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&commands)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} ({} registered, templates from {})",
        style("Commands").bold(),
        state.registry.len(),
        style(state.commands_dir.display()).dim()
    );
    println!();
    for command in state.registry.iter() {
        println!(
            "  {}{:<14} {}",
            DEFAULT_PREFIX,
            style(command.name().to_lowercase()).cyan(),
            style(command.description()).dim()
        );
    }
    println!();
    Ok(())
}
