//! Confirmation prompt with a non-interactive fallback

use super::context::UiContext;
use crate::error::{RocketyError, RocketyResult};

/// Ask a yes/no question.
///
/// `--yes` approves without asking; without a terminal the default is taken.
pub async fn confirm(ctx: &UiContext, message: &str, default: bool) -> RocketyResult<bool> {
    if ctx.auto_yes() {
        println!("  {} (auto-approved)", message);
        return Ok(true);
    }

    if !ctx.is_interactive() {
        return Ok(default);
    }

    // cliclack blocks on the terminal
    let message = message.to_string();
    tokio::task::spawn_blocking(move || {
        cliclack::confirm(&message).initial_value(default).interact()
    })
    .await
    .map_err(|e| RocketyError::Internal(format!("prompt task failed: {}", e)))?
    .map_err(|e| RocketyError::User(format!("Prompt cancelled: {}", e)))
}
