//! Header rewriting
//!
//! One shared routine reads a named header as text, applies a transform,
//! and writes the result back. The two transforms the bridge needs are
//! defined alongside it: `munge_to` strips an outbound recipient down to
//! its mailbox name, `munge_from` moves an inbound sender under the source
//! node's identity domain. Both treat an absent or blank header as nothing
//! to do.

use super::address::{self, AddressError};
use super::message::Message;
use thiserror::Error;

/// A header transform failure, carrying the header name
#[derive(Debug, Error)]
#[error("could not rewrite {header} header: {source}")]
pub struct RewriteError {
    header: String,
    source: AddressError,
}

impl RewriteError {
    /// The underlying address error
    pub fn source_err(&self) -> &AddressError {
        &self.source
    }
}

/// Read `header` as text, apply `rewrite`, write the result back
///
/// An absent header reads as empty text. The new value is written back
/// even when empty; writing empty to an absent header leaves the message
/// unchanged rather than materializing a blank header.
pub fn rewrite_header<F>(msg: &mut Message, header: &str, rewrite: F) -> Result<(), RewriteError>
where
    F: FnOnce(&str) -> Result<String, AddressError>,
{
    let old = msg.header_text(header).unwrap_or_default();

    let new = rewrite(&old).map_err(|source| RewriteError {
        header: header.to_string(),
        source,
    })?;

    tracing::debug!(header, old = %old, new = %new, "rewrote header");

    msg.set_header_text(header, &new);
    Ok(())
}

/// Transform for outbound To headers: keep only the mailbox name
///
/// The destination node travels out-of-band as the command-line recipient.
pub fn munge_to(old: &str) -> Result<String, AddressError> {
    if old.is_empty() {
        return Ok(String::new());
    }

    address::extract_local_part(old)
}

/// Transform for inbound From headers: requalify under the source node
pub fn munge_from(old: &str, src_node: &str) -> Result<String, AddressError> {
    if old.is_empty() {
        return Ok(String::new());
    }

    address::rewrite_sender_domain(old, src_node)
}
