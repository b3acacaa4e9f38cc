//! Mail transport abstraction
//!
//! Defines the trait for handing a finished message to the network, plus
//! the nncp-exec backed implementation. The trait keeps the pipelines
//! testable without spawning subprocesses.

use super::address::NncpMailAddress;
use nncp_exec::NncpExec;
use std::path::PathBuf;
use thiserror::Error;

/// Transport errors
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("could not deliver to node {node} via handle {handle}: {source}")]
    Delivery {
        node: String,
        handle: String,
        source: nncp_exec::Error,
    },
}

/// Result type for transport operations
pub type Result<T> = std::result::Result<T, TransportError>;

/// Trait for handing a serialized message to the network
pub trait MailTransport {
    /// Submit a message addressed to `recipient`, to be consumed by
    /// `handle` on the destination node
    fn submit(&self, recipient: &NncpMailAddress, handle: &str, message: &[u8]) -> Result<()>;
}

/// Transport backed by the nncp-exec CLI
///
/// Invokes `nncp-exec [-cfg <path>] <node> <handle> <local part>` and pipes
/// the message to its stdin. The exit status is the sole success signal.
#[derive(Debug, Clone, Default)]
pub struct NncpExecTransport {
    exec: NncpExec,
}

impl NncpExecTransport {
    /// Create a transport using nncp-exec from PATH and the default NNCP
    /// configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport with a specific NNCP configuration path
    pub fn with_cfg_path(path: impl Into<PathBuf>) -> Self {
        Self {
            exec: NncpExec::with_cfg_path(path),
        }
    }

    /// Create a transport over a preconfigured [`NncpExec`]
    pub fn from_exec(exec: NncpExec) -> Self {
        Self { exec }
    }
}

impl MailTransport for NncpExecTransport {
    fn submit(&self, recipient: &NncpMailAddress, handle: &str, message: &[u8]) -> Result<()> {
        tracing::debug!(
            command = %self
                .exec
                .command_line(recipient.node_name(), handle, &[recipient.local_part()])
                .join(" "),
            "sending mail through nncp-exec"
        );

        let output = self
            .exec
            .exec(
                recipient.node_name(),
                handle,
                &[recipient.local_part()],
                message,
            )
            .map_err(|source| TransportError::Delivery {
                node: recipient.node_name().to_string(),
                handle: handle.to_string(),
                source,
            })?;

        if !output.stderr.trim().is_empty() {
            tracing::debug!(stderr = %output.stderr.trim(), "nncp-exec stderr");
        }

        Ok(())
    }
}
