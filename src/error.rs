use std::io::{Error, ErrorKind};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReplayError>;

/// Everything that can go wrong while using a [`SeekEmulatingReader`](crate::SeekEmulatingReader).
///
/// Apart from [`ReplayError::Io`], all variants describe an access which does not fit
/// the pattern the reader supports. None of them is transient, so retrying the same
/// call will fail again.
#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    #[error("stream too short for header: expected {expected} bytes, found {}", .found.len())]
    MalformedHeader { expected: usize, found: Vec<u8> },

    #[error("invalid access sequence: {0}")]
    InvalidSequence(&'static str),

    #[error("there is no last byte to read")]
    NoLastByte,

    #[error("can only decrement the position by one (requested {requested}, expected {expected})")]
    InvalidDecrement { requested: u64, expected: u64 },

    #[error("cannot seek the underlying stream")]
    Unseekable,

    #[error("can only seek the header with no offset (got {0})")]
    BadOffset(i64),

    #[error("can only seek the header from the beginning")]
    BadOrigin,

    #[error("operation not supported: {0}")]
    Unsupported(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] Error),
}

impl From<ReplayError> for Error {
    fn from(err: ReplayError) -> Self {
        let kind = match err {
            ReplayError::Io(inner) => return inner,
            ReplayError::Unsupported(_) => ErrorKind::Unsupported,
            ReplayError::MalformedHeader { .. } => ErrorKind::UnexpectedEof,
            ReplayError::InvalidInput(_)
            | ReplayError::BadOffset(_)
            | ReplayError::BadOrigin
            | ReplayError::InvalidDecrement { .. } => ErrorKind::InvalidInput,
            ReplayError::InvalidSequence(_) | ReplayError::NoLastByte | ReplayError::Unseekable => {
                ErrorKind::Other
            }
        };
        Error::new(kind, err)
    }
}
