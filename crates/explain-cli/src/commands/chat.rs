use anyhow::{Context, Result};
use colored::Colorize;
use explain_core::chat::{EXIT_COMMAND, run_chat};

use super::Setup;

pub fn run(setup: &Setup) -> Result<()> {
    println!(
        "{} Type '{}' to quit.",
        "Entering chat mode.".cyan().bold(),
        EXIT_COMMAND
    );

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let forwarded = run_chat(
        &setup.runner_exe,
        &setup.model,
        stdin.lock(),
        &mut stdout,
        std::io::stdout(),
    )
    .context("chat mode failed")?;

    tracing::debug!(forwarded, "chat session ended");
    println!();
    println!("{}", "Chat ended.".dimmed());
    Ok(())
}
