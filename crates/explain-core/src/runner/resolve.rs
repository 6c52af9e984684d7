use crate::config::{RunnerConfig, expand_tilde};
use crate::errors::CoreError;
use crate::util::{sha256_file, sha256_hex};
use std::fs;
use std::path::{Path, PathBuf};

/// Capability that makes a runner executable available on disk.
pub trait RunnerResolver {
    fn resolve(&self) -> Result<PathBuf, CoreError>;
}

/// A runner that is already installed: either an explicit path or a name on PATH.
pub struct InstalledRunner {
    path: Option<PathBuf>,
    name: String,
}

impl InstalledRunner {
    pub fn new(path: Option<PathBuf>, name: &str) -> Self {
        Self {
            path,
            name: name.to_string(),
        }
    }
}

impl RunnerResolver for InstalledRunner {
    fn resolve(&self) -> Result<PathBuf, CoreError> {
        if let Some(ref path) = self.path {
            if path.is_file() {
                return Ok(path.clone());
            }
            return Err(CoreError::RunnerUnavailable(format!(
                "configured runner not found: {}",
                path.display()
            )));
        }
        which::which(&self.name).map_err(|e| {
            CoreError::RunnerUnavailable(format!("{} not found on PATH: {e}", self.name))
        })
    }
}

/// A runner shipped as a payload file and installed into a cache directory.
/// The cached copy is rewritten only when its checksum differs from the payload.
pub struct BundledRunner {
    bundle: PathBuf,
    install_dir: PathBuf,
    name: String,
}

impl BundledRunner {
    pub fn new(bundle: PathBuf, install_dir: PathBuf, name: &str) -> Self {
        Self {
            bundle,
            install_dir,
            name: name.to_string(),
        }
    }

    pub fn target(&self) -> PathBuf {
        self.install_dir.join(&self.name)
    }

    /// Write `bytes` to the target unless an identical copy is already there.
    /// Returns whether the file was (re)written.
    pub fn install(&self, bytes: &[u8]) -> Result<bool, CoreError> {
        let target = self.target();
        let wanted = sha256_hex(bytes);
        if sha256_file(&target).as_deref() == Some(wanted.as_str()) {
            tracing::debug!(path = %target.display(), "cached runner is current");
            return Ok(false);
        }

        fs::create_dir_all(&self.install_dir).map_err(|e| {
            CoreError::Provision(format!("creating {}: {e}", self.install_dir.display()))
        })?;
        fs::write(&target, bytes)
            .map_err(|e| CoreError::Provision(format!("writing {}: {e}", target.display())))?;
        make_executable(&target)?;
        clear_quarantine(&target);

        tracing::info!(path = %target.display(), sha256 = %wanted, "installed runner");
        Ok(true)
    }
}

impl RunnerResolver for BundledRunner {
    fn resolve(&self) -> Result<PathBuf, CoreError> {
        let bytes = fs::read(&self.bundle).map_err(|e| {
            CoreError::RunnerUnavailable(format!(
                "reading runner bundle {}: {e}",
                self.bundle.display()
            ))
        })?;
        self.install(&bytes)?;
        Ok(self.target())
    }
}

/// Pick a resolver from config: a bundle wins, otherwise an installed runner.
pub fn resolver_from_config(config: &RunnerConfig) -> Box<dyn RunnerResolver> {
    match config.bundle.as_deref() {
        Some(bundle) => Box::new(BundledRunner::new(
            expand_tilde(bundle),
            config.install_dir(),
            &config.name,
        )),
        None => Box::new(InstalledRunner::new(
            config.path.as_deref().map(expand_tilde),
            &config.name,
        )),
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<(), CoreError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .map_err(|e| CoreError::Provision(format!("chmod {}: {e}", path.display())))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<(), CoreError> {
    Ok(())
}

/// Best-effort removal of the Gatekeeper quarantine flag.
#[cfg(target_os = "macos")]
fn clear_quarantine(path: &Path) {
    let status = std::process::Command::new("xattr")
        .args(["-d", "com.apple.quarantine"])
        .arg(path)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status();
    if let Err(e) = status {
        tracing::warn!("could not run xattr on {}: {e}", path.display());
    }
}

#[cfg(not(target_os = "macos"))]
fn clear_quarantine(_path: &Path) {}
