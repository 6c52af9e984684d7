pub mod chat;
pub mod explain;

use anyhow::{Context, Result};
use explain_core::config::{Config, explain_dir};
use explain_core::runner::{LlamaCli, resolver_from_config};
use std::path::{Path, PathBuf};

/// Everything a command needs to talk to the runner.
pub struct Setup {
    pub config: Config,
    pub runner_exe: PathBuf,
    pub model: PathBuf,
}

impl Setup {
    /// Load config, resolve the model path and make the runner available.
    ///
    /// `model_env` is the value of `MODEL_PATH`, if set.
    pub fn load(config_path: Option<&Path>, model_env: Option<String>) -> Result<Self> {
        let config_path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| explain_dir().join("config.toml"));
        let config = Config::load(&config_path)
            .with_context(|| format!("loading {}", config_path.display()))?;

        let model = config.model_path(model_env)?;
        tracing::debug!(model = %model.display(), config = %config_path.display(), "setup");

        let runner_exe = resolver_from_config(&config.runner)
            .resolve()
            .context("failed to provide llama-cli")?;

        Ok(Self {
            config,
            runner_exe,
            model,
        })
    }

    pub fn runner(&self) -> LlamaCli {
        LlamaCli::new(
            self.runner_exe.clone(),
            self.model.clone(),
            &self.config.runner,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_model_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.toml");
        let err = Setup::load(Some(config.as_path()), None).err().unwrap();
        assert!(format!("{err:#}").contains("MODEL_PATH"));
    }

    #[test]
    fn test_blank_model_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.toml");
        let err = Setup::load(Some(config.as_path()), Some("  ".to_string())).err().unwrap();
        assert!(format!("{err:#}").contains("MODEL_PATH"));
    }

    #[test]
    fn test_missing_configured_runner_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.toml");
        fs::write(&config, "[runner]\npath = \"/no/such/llama-cli\"\n").unwrap();

        let err = Setup::load(Some(config.as_path()), Some("/models/m.gguf".to_string()))
            .err()
            .unwrap();
        let msg = format!("{err:#}");
        assert!(msg.contains("failed to provide llama-cli"), "{msg}");
        assert!(msg.contains("/no/such/llama-cli"), "{msg}");
    }

    #[test]
    fn test_configured_runner_and_model() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("llama-cli");
        fs::write(&exe, "").unwrap();
        let config = dir.path().join("config.toml");
        fs::write(
            &config,
            format!("[runner]\npath = \"{}\"\nmax_tokens = 64\n", exe.display()),
        )
        .unwrap();

        let setup = Setup::load(Some(config.as_path()), Some("/models/m.gguf".to_string())).unwrap();
        assert_eq!(setup.runner_exe, exe);
        assert_eq!(setup.model, PathBuf::from("/models/m.gguf"));
        assert_eq!(setup.config.runner.max_tokens, 64);
    }
}
