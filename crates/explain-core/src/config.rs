use crate::errors::CoreError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the model file handed to the runner.
pub const MODEL_PATH_ENV: &str = "MODEL_PATH";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub runner: RunnerConfig,
    #[serde(default)]
    pub model: ModelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Executable name looked up on PATH when `path` is unset.
    #[serde(default = "default_runner_name")]
    pub name: String,
    /// Explicit runner location.
    #[serde(default)]
    pub path: Option<String>,
    /// Runner payload to install into `install_dir`.
    #[serde(default)]
    pub bundle: Option<String>,
    #[serde(default = "default_install_dir")]
    pub install_dir: String,
    #[serde(default = "default_gpu_layers")]
    pub gpu_layers: u32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            name: default_runner_name(),
            path: None,
            bundle: None,
            install_dir: default_install_dir(),
            gpu_layers: default_gpu_layers(),
            max_tokens: default_max_tokens(),
            timeout_secs: None,
        }
    }
}

fn default_runner_name() -> String {
    "llama-cli".to_string()
}
fn default_install_dir() -> String {
    "~/.local/bin".to_string()
}
fn default_gpu_layers() -> u32 {
    1
}
fn default_max_tokens() -> u32 {
    512
}

impl Config {
    /// Load config from the given path, or return defaults if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .map_err(|e| CoreError::Io(format!("reading config: {e}")))?;
            let config: Config =
                toml::from_str(&contents).map_err(|e| CoreError::Config(e.to_string()))?;

            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Resolve the model path: the environment value wins, then `[model] path`.
    pub fn model_path(&self, env_value: Option<String>) -> Result<PathBuf, CoreError> {
        env_value
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .or_else(|| self.model.path.as_deref().map(expand_tilde))
            .ok_or_else(|| {
                CoreError::Config(format!("{MODEL_PATH_ENV} environment variable is not set"))
            })
    }
}

impl RunnerConfig {
    pub fn install_dir(&self) -> PathBuf {
        expand_tilde(&self.install_dir)
    }
}

/// Get the explain-me data directory (~/.explain-me/).
pub fn explain_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".explain-me")
}

/// Expand ~ at the start of a path.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(rest)
    } else if path == "~" {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home)
    } else {
        PathBuf::from(path)
    }
}
