//! nncpmail - Mail bridge for the NNCP store-and-forward network
//!
//! Main entry point. Invoked by an MTA as `nncpmail send <recipient>` with
//! the outbound message on stdin, or by nncp-toss as `nncpmail receive`
//! with NNCP_SENDER set and the inbound message on stdin.

use clap::Parser;
use nncpmail::commands::{self, Mode};
use nncpmail::mail::NncpExecTransport;
use std::io;
use std::path::{self, PathBuf};
use std::process;

/// nncpmail - sendmail-compatible bridge onto NNCP
#[derive(Parser, Debug)]
#[command(name = "nncpmail")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Transport direction: send, receive or recv (default: send)
    #[arg(value_name = "MODE")]
    mode: Option<String>,

    /// Recipient address (user@alias.nncp or user@ID.id.nncp); send only
    #[arg(value_name = "RECIPIENT")]
    recipient: Option<String>,

    /// NNCP configuration path handed through to nncp-exec
    #[arg(long, env = "NNCP_CFG_PATH", value_name = "PATH")]
    cfg: Option<PathBuf>,

    /// Remote handle invoked on the destination node
    #[arg(long, env = "NNCP_MAIL_HANDLE", default_value = "sendmail")]
    handle: String,

    /// Source node identity; set by nncp-toss for receive
    #[arg(long, env = "NNCP_SENDER")]
    sender: Option<String>,

    /// Debug logging to stderr
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = nncpmail::logging::init(cli.debug) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> nncpmail::Result<()> {
    let mode: Mode = cli.mode.as_deref().unwrap_or_default().parse()?;
    tracing::debug!(?mode, "mode selected");

    match mode {
        Mode::Send => {
            let transport = match cfg_path(cli.cfg) {
                Some(path) => NncpExecTransport::with_cfg_path(path),
                None => NncpExecTransport::new(),
            };
            let rcpt = cli.recipient.unwrap_or_default();
            commands::send_mail(&transport, &rcpt, &cli.handle, &mut io::stdin().lock())
        }
        Mode::Receive => {
            let sender = cli.sender.unwrap_or_default();
            commands::recv_mail(&sender, &mut io::stdin().lock(), &mut io::stdout().lock())
        }
    }
}

/// Canonicalize the NNCP config path
///
/// nncp-exec may run from a different working directory, so a relative
/// path is made absolute here. Failure falls back to the value as given.
fn cfg_path(cfg: Option<PathBuf>) -> Option<PathBuf> {
    let cfg = cfg.filter(|p| !p.as_os_str().is_empty())?;
    match path::absolute(&cfg) {
        Ok(abs) => Some(abs),
        Err(e) => {
            tracing::debug!(path = %cfg.display(), error = %e, "could not canonicalize config path");
            Some(cfg)
        }
    }
}
