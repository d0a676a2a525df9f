use std::path::PathBuf;
use thiserror::Error;

/// Engine error taxonomy
///
/// `Input` aborts the whole run before any work is scheduled. Everything else
/// is fatal only for the pair or file it names and is converted into a failed
/// outcome at the pipeline boundary.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("'{0}' does not exist or is not a directory")]
    Input(PathBuf),

    #[error("video transcode failed for {path}: {detail}")]
    Transcode { path: PathBuf, detail: String },

    #[error("identifier injection failed for {path}: {detail}")]
    Inject { path: PathBuf, detail: String },

    #[error("copy failed for {path}: {source}")]
    Copy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not finalize output for {path}: {source}")]
    Finalize {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EngineError {
    /// True for errors that should abort the run instead of failing one item
    pub fn is_fatal(&self) -> bool {
        matches!(self, EngineError::Input(_))
    }
}
