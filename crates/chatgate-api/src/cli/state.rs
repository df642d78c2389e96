//! `chatgate state` -- inspect the persisted session state.

use anyhow::{Result, bail};
use console::style;

use chatgate_core::session::SessionRepository;

use crate::state::AppState;

/// Print the whole session file, or one key of it.
///
/// Reads the file directly so a corrupt file is reported instead of being
/// silently treated as empty.
pub async fn show_state(state: &AppState, key: Option<&str>, json: bool) -> Result<()> {
    let repo = state.session_repository();
    let Some(session) = repo.load().await? else {
        if json {
            println!("{{}}");
        } else {
            println!("  {} no session state at {}", style("!").yellow(), repo.location());
        }
        return Ok(());
    };

    match key {
        Some(key) => match session.get(key) {
            Some(value) => println!("{}", serde_json::to_string_pretty(value)?),
            None => bail!("no session key '{key}' in {}", repo.location()),
        },
        None if json => println!("{}", serde_json::to_string_pretty(&session)?),
        None => {
            println!();
            println!(
                "  {} ({} keys) {}",
                style("Session state").bold(),
                session.len(),
                style(repo.location()).dim()
            );
            println!();
            for key in session.keys() {
                let value = session.get(key).map(|v| v.to_string()).unwrap_or_default();
                println!("  {:<20} {}", style(key).cyan(), value);
            }
            println!();
        }
    }
    Ok(())
}
