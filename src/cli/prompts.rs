//! Interactive prompts using dialoguer

use std::path::PathBuf;

use anyhow::Result;
use dialoguer::Confirm;

/// Prompt user to confirm proceeding with an action
pub fn confirm_step(message: &str) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(message)
        .default(true)
        .interact()?;
    Ok(confirmed)
}

/// Prompt user to confirm overwriting existing output files
pub fn confirm_overwrite(existing: &[PathBuf]) -> Result<bool> {
    let message = match existing {
        [single] => format!("Overwrite existing output {}?", single.display()),
        _ => format!("Overwrite {} existing output file(s)?", existing.len()),
    };
    confirm_step(&message)
}
