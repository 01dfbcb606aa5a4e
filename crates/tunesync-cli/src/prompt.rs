//! Interactive prompts
//!
//! Uses dialoguer for terminal-based yes/no confirmation. Batch mode
//! bypasses this entirely via [`tunesync_core::AutoConfirm`].

use dialoguer::Confirm;
use tunesync_core::ConfirmPrompt;

/// Asks the operator on the terminal, defaulting to yes.
#[derive(Debug, Default)]
pub struct InteractiveConfirm;

impl ConfirmPrompt for InteractiveConfirm {
    fn confirm(&self, message: &str) -> bool {
        Confirm::new()
            .with_prompt(message)
            .default(true)
            .interact()
            .unwrap_or(false)
    }
}

/// One-off confirmation used before the run starts.
pub fn confirm(message: &str) -> crate::error::Result<bool> {
    Ok(Confirm::new()
        .with_prompt(message)
        .default(true)
        .interact()?)
}
