//! Typed error kind for the library. Host I/O errors are never swallowed,
//! except that `NotFound`-kind `io::Error`s are normalized so every provider
//! reports "doesn't exist" uniformly, regardless of whether the miss came
//! from `std::fs` or from a map lookup.

use std::io;

/// Errors produced by providers, the namespace core, and the walker.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The operation's target does not exist in any consulted candidate.
    #[error("not found: {0}")]
    NotFound(String),
    /// `Open` was attempted on a directory.
    #[error("is a directory: {0}")]
    IsADirectory(String),
    /// Host I/O failure other than not-found.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// A "safe" constructor rejected its input.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Maps a host `io::Error` observed while resolving `path`, normalizing
    /// `NotFound`-kind errors to [`Error::NotFound`].
    pub(crate) fn from_io(err: io::Error, path: &str) -> Error {
        if err.kind() == io::ErrorKind::NotFound {
            Error::NotFound(path.to_string())
        } else {
            Error::Io(err)
        }
    }

    /// True iff this error is the not-found kind.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

/// Free-function form of [`Error::is_not_found`], mirroring the source's
/// `isNotExist` helper.
pub fn is_not_found(err: &Error) -> bool {
    err.is_not_found()
}
