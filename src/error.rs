use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a regeneration run.
#[derive(Debug, Error)]
pub enum RegenError {
    /// Invalid combination of command line flags
    #[error("{0}")]
    InvalidFlags(String),

    /// Script name does not follow the `<module>_<method>.js` pattern
    #[error(
        "Script '{file}' does not match the '<module>_<method>' naming pattern (exactly one underscore)"
    )]
    MalformedScriptName { file: String },

    /// The separately guarded script is absent from the library directory
    #[error("Required script '{file}' not found in {}", dir.display())]
    MissingScript { file: String, dir: PathBuf },

    /// External build system exited non-zero
    #[error("{message}")]
    BuildFailed { message: String },

    /// Host binary exited non-zero while emitting bytecode
    #[error("{message} (while compiling {file})")]
    CodegenFailed { message: String, file: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
