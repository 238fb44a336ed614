//! The crate-wide error taxonomy.
//!
//! Every failure the tool can surface to an operator lives in one enum, split
//! along how the caller is expected to react:
//!
//! - **Schedule/config errors** (`MissingSchedule`, `InvalidSchedule`,
//!   `MissingPost`, `InvalidWikiLink`, `InvalidConfig`) are fatal for the run.
//!   Where a remediation is known, the variant carries a hint that the CLI
//!   prints below the message.
//! - **Content errors** (`ImageNotFound`, `Conversion`) occur during thumbnail
//!   preparation. `ImageNotFound` is recovered inside the renderer by
//!   disabling thumbnail mode; `Conversion` propagates with a hint.
//! - **`Remote`** wraps any platform API failure. Submission failures abort
//!   the run; post-submission sibling updates merely report it.
//! - **`Aborted`** is an operator-initiated cancellation, distinct from
//!   failure, with its own exit code.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{message}")]
    MissingSchedule {
        message: String,
        hint: Option<String>,
    },

    #[error("{message}")]
    InvalidSchedule {
        message: String,
        hint: Option<String>,
    },

    #[error("{0}")]
    MissingPost(String),

    #[error("The link to the schedule wiki page is invalid: {0}")]
    InvalidWikiLink(String),

    #[error("{message}")]
    InvalidConfig {
        message: String,
        hint: Option<String>,
    },

    #[error("No image found in the post: {0}")]
    ImageNotFound(String),

    #[error("{message}")]
    Conversion {
        message: String,
        hint: Option<String>,
    },

    #[error("{0}")]
    Remote(String),

    #[error("Aborted")]
    Aborted,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Exit code reported for an operator-initiated abort (mirrors the shell
/// convention for SIGINT).
pub const ABORT_EXIT_CODE: i32 = 130;

impl Error {
    /// Remediation hint to display below the error message, if one is known.
    pub fn hint(&self) -> Option<&str> {
        match self {
            Error::MissingSchedule { hint, .. }
            | Error::InvalidSchedule { hint, .. }
            | Error::InvalidConfig { hint, .. }
            | Error::Conversion { hint, .. } => hint.as_deref(),
            _ => None,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Aborted => ABORT_EXIT_CODE,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
