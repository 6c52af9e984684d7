use crate::config::RunnerConfig;
use crate::errors::CoreError;
use crate::util::clip_for_error;
use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use super::ModelRunner;

/// How often to poll the child while waiting for it to finish.
const POLL_INTERVAL_MS: u64 = 100;

/// Runner that spawns a llama.cpp-style `llama-cli` once per prompt.
pub struct LlamaCli {
    exe: PathBuf,
    model: PathBuf,
    gpu_layers: u32,
    max_tokens: u32,
    timeout: Option<Duration>,
}

impl LlamaCli {
    pub fn new(exe: PathBuf, model: PathBuf, config: &RunnerConfig) -> Self {
        Self {
            exe,
            model,
            gpu_layers: config.gpu_layers,
            max_tokens: config.max_tokens,
            timeout: config.timeout_secs.map(Duration::from_secs),
        }
    }

    /// Arguments for a one-shot generation.
    fn args(&self, prompt: &str) -> Vec<String> {
        vec![
            "-m".to_string(),
            self.model.to_string_lossy().to_string(),
            "-p".to_string(),
            prompt.to_string(),
            "-ngl".to_string(),
            self.gpu_layers.to_string(),
            "-n".to_string(),
            self.max_tokens.to_string(),
        ]
    }
}

impl ModelRunner for LlamaCli {
    fn run(&self, prompt: &str) -> Result<String, CoreError> {
        tracing::debug!(
            exe = %self.exe.display(),
            model = %self.model.display(),
            prompt_chars = prompt.len(),
            "invoking runner"
        );

        let mut child = Command::new(&self.exe)
            .args(self.args(prompt))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| CoreError::RunnerSpawn {
                exe: self.exe.display().to_string(),
                reason: e.to_string(),
            })?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let start = Instant::now();
        let status = wait_until(&mut child, self.timeout.map(|t| (start, t)))?;

        let stdout = String::from_utf8_lossy(&stdout.join().unwrap_or_default()).into_owned();
        let stderr = String::from_utf8_lossy(&stderr.join().unwrap_or_default()).into_owned();

        tracing::debug!(
            %status,
            elapsed_ms = start.elapsed().as_millis() as u64,
            stdout_bytes = stdout.len(),
            stderr_bytes = stderr.len(),
            "runner finished"
        );

        if !status.success() {
            return Err(CoreError::RunnerFailed {
                status: status.to_string(),
                stderr: format!(
                    "{}\nstdout: {}",
                    stderr.trim_end(),
                    clip_for_error(&stdout)
                ),
            });
        }

        Ok(stdout)
    }
}

/// Read a child pipe to completion on its own thread, so neither pipe can
/// fill up and stall the runner while the other is being waited on.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

/// Poll the child until it exits. With a deadline, kill it once
/// `started + limit` has passed.
fn wait_until(
    child: &mut Child,
    deadline: Option<(Instant, Duration)>,
) -> Result<ExitStatus, CoreError> {
    loop {
        let polled = child.try_wait().map_err(|e| CoreError::RunnerFailed {
            status: "unknown".to_string(),
            stderr: format!("error waiting for runner: {e}"),
        })?;
        if let Some(status) = polled {
            return Ok(status);
        }
        if let Some((started, limit)) = deadline {
            if started.elapsed() > limit {
                let _ = child.kill();
                let _ = child.wait();
                return Err(CoreError::RunnerTimeout(limit.as_secs()));
            }
        }
        thread::sleep(Duration::from_millis(POLL_INTERVAL_MS));
    }
}
