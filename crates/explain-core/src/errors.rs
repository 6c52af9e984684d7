use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Runner unavailable: {0}")]
    RunnerUnavailable(String),

    #[error("Could not start runner {exe}: {reason}")]
    RunnerSpawn { exe: String, reason: String },

    #[error("Runner failed ({status}): {stderr}")]
    RunnerFailed { status: String, stderr: String },

    #[error("Runner timed out after {0}s")]
    RunnerTimeout(u64),

    #[error("no [/INST] found in model output")]
    NoDelimiterFound { raw: String },

    #[error("could not parse useful response from model output")]
    EmptyAnswer,

    #[error("Provision error: {0}")]
    Provision(String),
}

impl CoreError {
    /// Raw runner output attached to a parse failure, if any.
    pub fn raw_output(&self) -> Option<&str> {
        match self {
            CoreError::NoDelimiterFound { raw } => Some(raw),
            _ => None,
        }
    }
}
