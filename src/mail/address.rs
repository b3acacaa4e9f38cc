//! NNCP mail addressing
//!
//! Translates between standard email addressing and NNCP's node-based
//! addressing scheme.
//!
//! # Address Format
//!
//! Recipients use a pseudo-TLD under `.nncp`, in one of two forms:
//!
//! - `user@alias.nncp` - node known by a short alias from the NNCP config
//! - `user@ID.id.nncp` - node addressed by its full node identity
//!
//! Display-name wrapping (`"Some Name <user@alias.nncp>"`) is accepted
//! anywhere a recipient is parsed.
//!
//! # Examples
//!
//! ```
//! use nncpmail::mail::parse_recipient;
//!
//! let addr = parse_recipient("bob@alice.nncp").unwrap();
//! assert_eq!(addr.local_part(), "bob");
//! assert_eq!(addr.node_name(), "alice");
//! ```

use mailparse::{addrparse, SingleInfo};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Pseudo-TLD marking an address as routable over NNCP
pub const NNCP_SUFFIX: &str = "nncp";

const ALIAS_SUFFIX: &str = ".nncp";
const NODE_ID_SUFFIX: &str = ".id.nncp";

/// Error type for address translation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("could not split '{0}' into local part and domain")]
    Malformed(String),

    #[error("invalid address syntax: {0}")]
    Syntax(String),

    #[error("email domain must use .nncp TLD (must end in .nncp), got '{0}'")]
    UnsupportedDomain(String),

    #[error("email domain for node alias must be of form <alias>.nncp, got '{0}'")]
    InvalidAliasForm(String),

    #[error("email domain for node ID must be of the form <ID>.id.nncp, got '{0}'")]
    InvalidIdentityForm(String),

    #[error("a source node identity is required to rewrite the sender")]
    MissingSender,
}

/// A generic email address split into local part and domain
///
/// Produced only by splitting a raw address on the first '@'; no grammar
/// validation beyond a non-empty domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress {
    local_part: String,
    domain: String,
}

impl EmailAddress {
    /// Create an address from parts
    pub fn new(local_part: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            local_part: local_part.into(),
            domain: domain.into(),
        }
    }

    /// Get the local part (mailbox name)
    pub fn local_part(&self) -> &str {
        &self.local_part
    }

    /// Get the domain
    pub fn domain(&self) -> &str {
        &self.domain
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.local_part, self.domain)
    }
}

/// A mail address resolved onto the NNCP network
///
/// `node_name` is either a short alias (no dots) or a full node identity.
/// Node identities are uppercased when parsed; aliases keep their case.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NncpMailAddress {
    local_part: String,
    node_name: String,
}

impl NncpMailAddress {
    /// Create an address from parts
    pub fn new(local_part: impl Into<String>, node_name: impl Into<String>) -> Self {
        Self {
            local_part: local_part.into(),
            node_name: node_name.into(),
        }
    }

    /// Get the local part (mailbox name on the destination node)
    pub fn local_part(&self) -> &str {
        &self.local_part
    }

    /// Get the destination node name (alias or identity)
    pub fn node_name(&self) -> &str {
        &self.node_name
    }
}

impl fmt::Display for NncpMailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}.{}", self.local_part, self.node_name, NNCP_SUFFIX)
    }
}

impl FromStr for NncpMailAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_recipient(s)
    }
}

/// Split a bare address on the first '@'
///
/// Fails when there is no '@' or nothing follows it. The local part and
/// domain grammar are not validated further.
pub fn split_email_address(addr: &str) -> Result<EmailAddress, AddressError> {
    match addr.split_once('@') {
        Some((local_part, domain)) if !domain.is_empty() => {
            Ok(EmailAddress::new(local_part, domain))
        }
        _ => Err(AddressError::Malformed(addr.to_string())),
    }
}

/// Parse and validate a recipient into an NNCP mail address
///
/// Accepts display-name wrapping. The domain must end in `.nncp`; a domain
/// ending in `.id.nncp` is treated as a node identity (exactly two dots,
/// identity uppercased), anything else as a node alias (exactly one dot,
/// case preserved).
pub fn parse_recipient(addr: &str) -> Result<NncpMailAddress, AddressError> {
    let mailbox = parse_mailbox(addr)?;
    let email = split_email_address(&mailbox.addr)?;
    let num_dots = email.domain.matches('.').count();

    if let Some(id) = email.domain.strip_suffix(NODE_ID_SUFFIX) {
        if num_dots != 2 {
            return Err(AddressError::InvalidIdentityForm(email.domain.clone()));
        }
        Ok(NncpMailAddress::new(email.local_part(), id.to_uppercase()))
    } else if let Some(alias) = email.domain.strip_suffix(ALIAS_SUFFIX) {
        if num_dots != 1 {
            return Err(AddressError::InvalidAliasForm(email.domain.clone()));
        }
        Ok(NncpMailAddress::new(email.local_part(), alias))
    } else {
        Err(AddressError::UnsupportedDomain(email.domain.clone()))
    }
}

/// Rebuild a sender address under the source node's identity domain
///
/// The original domain is discarded and replaced with `{src_node}.id.nncp`;
/// the display name, if any, is preserved. On receipt the sender is always
/// known by identity, so the rewritten address is always in identity form.
/// The identity is used as supplied, without case normalization.
pub fn rewrite_sender_domain(old: &str, src_node: &str) -> Result<String, AddressError> {
    if src_node.is_empty() {
        return Err(AddressError::MissingSender);
    }

    let mailbox = parse_mailbox(old)?;
    let split = split_email_address(&mailbox.addr)?;

    let rewritten = EmailAddress::new(
        split.local_part(),
        format!("{}{}", src_node, NODE_ID_SUFFIX),
    );

    Ok(format_mailbox(mailbox.display_name.as_deref(), &rewritten))
}

/// Reduce an address to its bare local part
///
/// The domain is discarded: the destination node travels out-of-band, and
/// once a message is on the network the header should carry only the
/// mailbox name.
pub fn extract_local_part(old: &str) -> Result<String, AddressError> {
    let mailbox = parse_mailbox(old)?;
    let split = split_email_address(&mailbox.addr)?;
    Ok(split.local_part().to_string())
}

/// Parse a single structured mailbox, display-name form included
fn parse_mailbox(raw: &str) -> Result<SingleInfo, AddressError> {
    let list = addrparse(raw).map_err(|e| AddressError::Syntax(e.to_string()))?;
    list.extract_single_info()
        .ok_or_else(|| AddressError::Syntax(format!("expected a single address in '{raw}'")))
}

/// Format a mailbox, quoting the display name when RFC 5322 requires it
fn format_mailbox(display_name: Option<&str>, addr: &EmailAddress) -> String {
    match display_name {
        Some(name) if !name.is_empty() => {
            if name.chars().all(is_plain_phrase_char) {
                format!("{} <{}>", name, addr)
            } else {
                let escaped = name.replace('\\', "\\\\").replace('"', "\\\"");
                format!("\"{}\" <{}>", escaped, addr)
            }
        }
        _ => addr.to_string(),
    }
}

// atext plus space, the characters a phrase may carry unquoted
fn is_plain_phrase_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == ' ' || "!#$%&'*+-/=?^_`{|}~".contains(c)
}
