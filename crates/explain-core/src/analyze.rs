use crate::errors::CoreError;
use crate::prompt::{Mode, build_prompt};
use crate::response::extract;
use crate::runner::ModelRunner;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Outcome of analysing one file in a batch.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Runner stdout kept when the answer could not be extracted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_output: Option<String>,
}

impl FileReport {
    pub fn success(path: PathBuf, answer: String) -> Self {
        Self {
            path,
            answer: Some(answer),
            error: None,
            raw_output: None,
        }
    }

    pub fn failure(path: PathBuf, err: &CoreError) -> Self {
        Self {
            path,
            answer: None,
            error: Some(err.to_string()),
            raw_output: err.raw_output().map(str::to_string),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Build a prompt for `source`, run it, and extract the answer.
pub fn analyze_source(
    runner: &dyn ModelRunner,
    source: &str,
    custom_instruction: &str,
    mode: Mode,
) -> Result<String, CoreError> {
    let prompt = build_prompt(source, custom_instruction, mode);
    let raw = runner.run(&prompt)?;
    extract(&raw)
}

/// Read a file and analyse its contents. Non-UTF-8 bytes are replaced.
pub fn analyze_file(
    runner: &dyn ModelRunner,
    path: &Path,
    custom_instruction: &str,
    mode: Mode,
) -> Result<String, CoreError> {
    let bytes = std::fs::read(path)
        .map_err(|e| CoreError::Io(format!("reading {}: {e}", path.display())))?;
    let source = String::from_utf8_lossy(&bytes);
    analyze_source(runner, &source, custom_instruction, mode)
}

/// List regular files directly inside `dir`, sorted by path. Not recursive.
pub fn list_files_in_dir(dir: &Path) -> Result<Vec<PathBuf>, CoreError> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| CoreError::Io(format!("reading directory {}: {e}", dir.display())))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| CoreError::Io(format!("reading directory entry: {e}")))?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Analyse every file in `dir`, one at a time. A failure on one file is
/// recorded in its report and the batch moves on.
///
/// `on_progress` is called before each file is analysed.
pub fn analyze_dir(
    runner: &dyn ModelRunner,
    dir: &Path,
    custom_instruction: &str,
    mode: Mode,
    on_progress: impl FnMut(&Path),
) -> Result<Vec<FileReport>, CoreError> {
    let files = list_files_in_dir(dir)?;
    Ok(analyze_files(runner, &files, custom_instruction, mode, on_progress))
}

/// Analyse an already-listed set of files in order.
pub fn analyze_files(
    runner: &dyn ModelRunner,
    files: &[PathBuf],
    custom_instruction: &str,
    mode: Mode,
    mut on_progress: impl FnMut(&Path),
) -> Vec<FileReport> {
    files
        .iter()
        .map(|path| {
            on_progress(path);
            match analyze_file(runner, path, custom_instruction, mode) {
                Ok(answer) => FileReport::success(path.clone(), answer),
                Err(e) => {
                    tracing::warn!(path = %path.display(), "analysis failed: {e}");
                    FileReport::failure(path.clone(), &e)
                }
            }
        })
        .collect()
}
