use std::path::PathBuf;
use thiserror::Error;

/// Failures the per-file pipeline and the batch entry point need to tell apart.
///
/// Everything here is contained to one file except `MissingInput`, which aborts
/// the whole batch before any work is scheduled.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The data-flow resolver exceeded its wall-clock deadline. All partial
    /// state for the file is discarded by the caller.
    #[error("data-flow resolution exceeded its deadline")]
    Timeout,

    /// The front end could not produce a syntax tree for the file.
    #[error("failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// The batch entry point was given a nonexistent input directory.
    #[error("input directory {0} does not exist")]
    MissingInput(PathBuf),
}
