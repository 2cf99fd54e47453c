// ABOUTME: Confirmation prompt shown before any import write
// ABOUTME: Abstracted behind Confirmer so import can run without a terminal

use dialoguer::{theme::ColorfulTheme, Confirm};

/// Asks the user a yes/no question
pub trait Confirmer {
    /// Returns `true` only on an explicit yes
    fn confirm(&self, prompt: &str) -> bool;
}

/// Interactive yes/no prompt on the terminal
///
/// Defaults to "no". If the prompt cannot be shown or read (no TTY,
/// interrupted input), the answer is "no" as well.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalConfirmer;

impl Confirmer for TerminalConfirmer {
    fn confirm(&self, prompt: &str) -> bool {
        match Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(false)
            .interact()
        {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!("Confirmation prompt failed: {}", e);
                false
            }
        }
    }
}

/// Answers yes without asking; used with `--yes`
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Confirmer for AssumeYes {
    fn confirm(&self, prompt: &str) -> bool {
        tracing::info!("{} yes (--yes)", prompt);
        true
    }
}

/// Prompt text naming the destination table
pub fn import_prompt(table: &str) -> String {
    format!(
        "This will import data into {}! Do you want to continue?",
        table
    )
}
