use std::io;
use thiserror::Error;

/// Failures that cross component boundaries.
///
/// Only `Launch`, `EmptyCommand`, `SubmissionRoot`, `ConfigRead` and `ConfigParse` are
/// harness faults that abort a grading run. `FileAccess` and `PathEscape` are raised by
/// the submission helpers and are always absorbed by the calling check into a failed
/// `CheckResult`.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("cannot read `{path}`: {source}")]
    FileAccess {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("`{path}` escapes the submission root")]
    PathEscape { path: String },

    #[error("cannot launch `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("empty command line")]
    EmptyCommand,

    #[error("submission root `{path}` is not an accessible directory: {source}")]
    SubmissionRoot {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("cannot read configuration `{path}`: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

pub type HarnessResult<T> = Result<T, HarnessError>;
