//! nncpmail - Mail bridge for the NNCP store-and-forward network
//!
//! nncpmail sits between a Unix MTA and NNCP, translating between standard
//! email addressing and NNCP's node-based addressing so that mail traverses
//! the network transparently to mail clients.
//!
//! # Architecture
//!
//! - **mail**: address translation, header rewriting, the message entity,
//!   and the transport boundary
//! - **commands**: the send and receive pipelines
//! - **error**: crate-wide error type
//! - **logging**: tracing setup (stderr only)
//!
//! The `nncp-exec` workspace crate wraps the external `nncp-exec` binary
//! that actually queues payloads onto the network.

pub mod commands;
pub mod error;
pub mod logging;
pub mod mail;

// Re-exports
pub use error::{Error, Result};
