//! Basic usage example for the nncp-exec crate
//!
//! This example demonstrates the core functionality of the nncp-exec wrapper:
//! - Checking if nncp-exec is installed
//! - Inspecting the argument vector for an invocation
//! - Queuing a payload for a remote handle
//!
//! To run this example:
//! ```sh
//! cd crates/nncp-exec
//! cargo run --example basic
//! ```

use nncp_exec::{NncpExec, Result};

fn main() -> Result<()> {
    println!("nncp-exec Wrapper Example\n");

    let nncp = NncpExec::new();

    if !nncp.is_available() {
        eprintln!("nncp-exec not found.");
        eprintln!("Make sure 'nncp-exec' is installed and in your PATH.");
        return Ok(());
    }

    println!("✓ nncp-exec is available\n");

    // The argument vector built for a sendmail invocation
    let argv = nncp.command_line("alice", "sendmail", &["bob"]);
    println!("Command line: {}", argv.join(" "));

    // Queue a tiny message for user `bob` on node `alice`
    let payload = b"From: carol@example.com\r\nTo: bob\r\nSubject: ping\r\n\r\nhello\r\n";
    match nncp.exec("alice", "sendmail", &["bob"], payload) {
        Ok(output) => {
            println!("Queued for delivery.");
            if !output.combined().is_empty() {
                println!("{}", output.combined());
            }
        }
        Err(e) => eprintln!("Failed to queue: {}", e),
    }

    Ok(())
}
