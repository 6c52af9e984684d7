pub mod llama_cli;
pub mod resolve;

use crate::errors::CoreError;

pub use llama_cli::LlamaCli;
pub use resolve::{BundledRunner, InstalledRunner, RunnerResolver, resolver_from_config};

/// Trait for model runners. Sync only — no async.
pub trait ModelRunner {
    /// Hand a formatted prompt to the runner and return its captured stdout.
    fn run(&self, prompt: &str) -> Result<String, CoreError>;
}
