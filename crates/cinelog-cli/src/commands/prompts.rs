use color_eyre::Result;
use dialoguer::Confirm;
use std::io::IsTerminal;

/// Ask a yes/no question, defaulting to no
///
/// Refuses to guess when stdin is not a terminal.
pub fn confirm(prompt: &str) -> Result<bool> {
    if !std::io::stdin().is_terminal() {
        return Err(color_eyre::eyre::eyre!(
            "Cannot ask for confirmation without a terminal, pass --yes to proceed"
        ));
    }

    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read confirmation: {}", e))
}
