use crate::errors::CoreError;
use std::io::{BufRead, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Line the user types to leave chat mode.
pub const EXIT_COMMAND: &str = "exit";
pub const QUESTION_PROMPT: &str = "Question > ";

/// How long the runner gets to exit on its own after stdin closes.
const EXIT_GRACE_MS: u64 = 2_000;

/// Relay an interactive session with the runner.
///
/// The runner's stdout is copied to `model_out` on a background thread while
/// lines read from `input` are forwarded to its stdin. Ends on `exit` or end
/// of input. Returns how many lines were forwarded.
pub fn run_chat<R, W>(
    exe: &Path,
    model: &Path,
    mut input: R,
    prompt_out: &mut dyn Write,
    mut model_out: W,
) -> Result<usize, CoreError>
where
    R: BufRead,
    W: Write + Send + 'static,
{
    tracing::debug!(exe = %exe.display(), model = %model.display(), "starting chat runner");

    let mut child = Command::new(exe)
        .arg("-m")
        .arg(model)
        .arg("--interactive")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| CoreError::RunnerSpawn {
            exe: exe.display().to_string(),
            reason: e.to_string(),
        })?;

    let stdout_pipe = child.stdout.take();
    let copier = thread::spawn(move || {
        if let Some(mut pipe) = stdout_pipe {
            let _ = std::io::copy(&mut pipe, &mut model_out);
            let _ = model_out.flush();
        }
    });

    let mut forwarded = 0;
    if let Some(mut stdin) = child.stdin.take() {
        let mut line = String::new();
        loop {
            write!(prompt_out, "{QUESTION_PROMPT}")
                .and_then(|_| prompt_out.flush())
                .map_err(|e| CoreError::Io(format!("writing prompt: {e}")))?;

            line.clear();
            let read = input
                .read_line(&mut line)
                .map_err(|e| CoreError::Io(format!("reading input: {e}")))?;
            if read == 0 {
                break;
            }
            let text = line.trim_end_matches(['\r', '\n']);
            if text == EXIT_COMMAND {
                break;
            }
            if let Err(e) = writeln!(stdin, "{text}").and_then(|_| stdin.flush()) {
                tracing::warn!("runner stopped accepting input: {e}");
                break;
            }
            forwarded += 1;
        }
        // stdin is dropped here, closing the pipe
    }

    shutdown(&mut child);
    let _ = copier.join();
    Ok(forwarded)
}

/// Give the runner a moment to exit after EOF, then kill and reap it.
fn shutdown(child: &mut std::process::Child) {
    let deadline = Instant::now() + Duration::from_millis(EXIT_GRACE_MS);
    while Instant::now() < deadline {
        match child.try_wait() {
            Ok(Some(_)) => return,
            Ok(None) => thread::sleep(Duration::from_millis(50)),
            Err(_) => break,
        }
    }
    let _ = child.kill();
    let _ = child.wait();
}
