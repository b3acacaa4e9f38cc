//! Error types for nncpmail
//!
//! One crate-wide enum covering the failure modes of both directions.
//! Uses thiserror; display strings carry their wrapped cause inline so the
//! binary can report a single diagnostic line.

use crate::mail::{AddressError, MessageError, RewriteError, TransportError};
use thiserror::Error;

/// Result type alias for nncpmail operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for nncpmail operations
#[derive(Error, Debug)]
pub enum Error {
    /// Send invoked without a recipient argument
    #[error("no recipient provided")]
    MissingRecipient,

    /// Receive invoked without a source node identity
    #[error("no sender provided in NNCP_SENDER")]
    MissingSender,

    /// Mode token is neither send nor receive/recv
    #[error("{0} is not a valid mode")]
    UnknownMode(String),

    /// Recipient could not be translated to an NNCP address
    #[error("error parsing recipient address {input}: {source}")]
    Recipient {
        input: String,
        source: AddressError,
    },

    /// Message parsing errors
    #[error(transparent)]
    Message(#[from] MessageError),

    /// Header rewriting errors
    #[error(transparent)]
    Rewrite(#[from] RewriteError),

    /// Transport errors
    #[error("error sending mail via nncp: {0}")]
    Transport(#[from] TransportError),

    /// Failure writing the rewritten message out
    #[error("error writing mail to stdout: {0}")]
    Write(#[source] std::io::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}
