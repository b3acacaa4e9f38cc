//! Mail bridging for NNCP
//!
//! Address translation, header rewriting, and the transport boundary.
//!
//! # Overview
//!
//! Mail crosses the bridge in two directions:
//! - **outbound**: a recipient like `bob@alice.nncp` is resolved to an NNCP
//!   node, the `To` header is reduced to the bare mailbox name, and the
//!   message is handed to the transport
//! - **inbound**: the `From` header's domain is replaced with the sending
//!   node's identity domain (`<ID>.id.nncp`) so replies route back over
//!   the network
//!
//! # Addressing
//!
//! Two domain forms are understood, both under the `.nncp` pseudo-TLD:
//! - `user@alias.nncp` - node alias
//! - `user@ID.id.nncp` - full node identity

mod address;
mod message;
mod rewrite;
mod transport;

pub use address::{
    extract_local_part, parse_recipient, rewrite_sender_domain, split_email_address, AddressError,
    EmailAddress, NncpMailAddress, NNCP_SUFFIX,
};
pub use message::{Message, MessageError};
pub use rewrite::{munge_from, munge_to, rewrite_header, RewriteError};
pub use transport::{MailTransport, NncpExecTransport, TransportError};
