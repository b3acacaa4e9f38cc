//! NNCP `nncp-exec` wrapper for Rust
//!
//! A typed interface to the `nncp-exec` CLI for handing payloads to remote
//! handles over an NNCP store-and-forward network.
//!
//! # Example
//!
//! ```no_run
//! use nncp_exec::NncpExec;
//!
//! let nncp = NncpExec::with_cfg_path("/etc/nncp.hjson");
//!
//! // Queue a payload for the `sendmail` handle on node `alice`,
//! // passing `bob` as the handle's argument.
//! nncp.exec("alice", "sendmail", &["bob"], b"Subject: hi\r\n\r\nhello\r\n")?;
//! # Ok::<(), nncp_exec::Error>(())
//! ```

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use thiserror::Error;

/// Errors that can occur when invoking nncp-exec
#[derive(Error, Debug)]
pub enum Error {
    #[error("nncp-exec is not installed or not in PATH")]
    NotInstalled,

    #[error("nncp-exec failed: {0}")]
    CommandFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for nncp-exec operations
pub type Result<T> = std::result::Result<T, Error>;

/// Output of a completed nncp-exec invocation
#[derive(Debug, Clone)]
pub struct ExecOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl ExecOutput {
    /// Combined stdout and stderr
    pub fn combined(&self) -> String {
        if self.stderr.is_empty() {
            self.stdout.clone()
        } else if self.stdout.is_empty() {
            self.stderr.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }
}

/// Interface to the nncp-exec CLI
#[derive(Debug, Clone, Default)]
pub struct NncpExec {
    /// Binary to invoke (defaults to `nncp-exec` from PATH)
    binary: Option<PathBuf>,
    /// NNCP configuration path passed via `-cfg`
    cfg_path: Option<PathBuf>,
    /// Extra global flags passed before the positional arguments
    global_flags: Vec<String>,
}

impl NncpExec {
    /// Create a new instance using `nncp-exec` from PATH and the
    /// default NNCP configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a specific NNCP configuration path
    pub fn with_cfg_path(path: impl Into<PathBuf>) -> Self {
        Self {
            cfg_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Set the NNCP configuration path
    pub fn set_cfg_path(&mut self, path: impl Into<PathBuf>) {
        self.cfg_path = Some(path.into());
    }

    /// Get the configured NNCP configuration path
    pub fn cfg_path(&self) -> Option<&PathBuf> {
        self.cfg_path.as_ref()
    }

    /// Override the binary to invoke instead of `nncp-exec` from PATH
    pub fn set_binary(&mut self, path: impl Into<PathBuf>) {
        self.binary = Some(path.into());
    }

    /// Add a global flag (e.g. `-quiet`) passed on every invocation
    pub fn add_global_flag(&mut self, flag: impl Into<String>) {
        self.global_flags.push(flag.into());
    }

    /// Check if nncp-exec is available
    pub fn is_available(&self) -> bool {
        !matches!(self.run(&["-version"], b""), Err(Error::NotInstalled))
    }

    /// The argument vector for an invocation, binary included
    ///
    /// Useful for diagnostics; `exec` builds the same vector.
    pub fn command_line(&self, node: &str, handle: &str, args: &[&str]) -> Vec<String> {
        let mut argv = vec![self
            .binary
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "nncp-exec".to_string())];

        for flag in &self.global_flags {
            argv.push(flag.clone());
        }

        if let Some(ref cfg) = self.cfg_path {
            argv.push("-cfg".to_string());
            argv.push(cfg.display().to_string());
        }

        argv.push(node.to_string());
        argv.push(handle.to_string());
        argv.extend(args.iter().map(|a| a.to_string()));
        argv
    }

    /// Queue `input` for `handle` on `node`, passing `args` through to the
    /// handle command
    ///
    /// The payload is piped to the child's stdin and the call blocks until
    /// nncp-exec exits. A non-zero exit status maps to [`Error::CommandFailed`]
    /// carrying the captured stderr.
    pub fn exec(&self, node: &str, handle: &str, args: &[&str], input: &[u8]) -> Result<ExecOutput> {
        let argv = self.command_line(node, handle, args);
        self.run(
            &argv[1..].iter().map(|s| s.as_str()).collect::<Vec<_>>(),
            input,
        )
    }

    // --- Private helpers ---

    fn run(&self, args: &[&str], input: &[u8]) -> Result<ExecOutput> {
        let binary = self
            .binary
            .as_deref()
            .unwrap_or_else(|| std::path::Path::new("nncp-exec"));

        let mut child = Command::new(binary)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::NotInstalled
                } else {
                    Error::Io(e)
                }
            })?;

        // stdin is piped above, so take() always yields a handle; dropping it
        // closes the pipe so the child sees EOF. The child is waited on even
        // when the write fails, and a child that exits without draining stdin
        // reports through its exit status, not through the broken pipe.
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(input),
            None => Ok(()),
        };

        let output = child.wait_with_output()?;

        if let Err(e) = written {
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                return Err(Error::Io(e));
            }
        }

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            let detail = if stderr.trim().is_empty() {
                output.status.to_string()
            } else {
                stderr.trim().to_string()
            };
            return Err(Error::CommandFailed(detail));
        }

        Ok(ExecOutput {
            success: output.status.success(),
            stdout,
            stderr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_defaults() {
        let nncp = NncpExec::new();
        assert_eq!(
            nncp.command_line("alice", "sendmail", &["bob"]),
            vec!["nncp-exec", "alice", "sendmail", "bob"]
        );
    }

    #[test]
    fn test_command_line_with_cfg_path() {
        let nncp = NncpExec::with_cfg_path("/etc/nncp.hjson");
        assert_eq!(
            nncp.command_line("alice", "sendmail", &["bob"]),
            vec![
                "nncp-exec",
                "-cfg",
                "/etc/nncp.hjson",
                "alice",
                "sendmail",
                "bob"
            ]
        );
    }

    #[test]
    fn test_command_line_with_global_flags() {
        let mut nncp = NncpExec::new();
        nncp.add_global_flag("-quiet");
        assert_eq!(
            nncp.command_line("alice", "sendmail", &[]),
            vec!["nncp-exec", "-quiet", "alice", "sendmail"]
        );
    }

    #[test]
    fn test_missing_binary_is_not_installed() {
        let mut nncp = NncpExec::new();
        nncp.set_binary("/nonexistent/nncp-exec");
        let err = nncp.exec("alice", "sendmail", &[], b"").unwrap_err();
        assert!(matches!(err, Error::NotInstalled));
    }

    #[test]
    fn test_exec_output_combined() {
        let output = ExecOutput {
            success: true,
            stdout: "out".to_string(),
            stderr: "".to_string(),
        };
        assert_eq!(output.combined(), "out");

        let output_with_err = ExecOutput {
            success: false,
            stdout: "out".to_string(),
            stderr: "err".to_string(),
        };
        assert_eq!(output_with_err.combined(), "out\nerr");
    }

    #[cfg(unix)]
    mod stub_binary {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::TempDir;

        /// Write an executable shell script standing in for nncp-exec
        fn write_stub(dir: &TempDir, name: &str, script: &str) -> std::path::PathBuf {
            let path = dir.path().join(name);
            fs::write(&path, script).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        #[test]
        fn test_exec_pipes_stdin_and_reports_success() {
            let dir = TempDir::new().unwrap();
            let captured = dir.path().join("captured");
            let stub = write_stub(
                &dir,
                "nncp-exec",
                &format!("#!/bin/sh\ncat > {}\n", captured.display()),
            );

            let mut nncp = NncpExec::new();
            nncp.set_binary(&stub);

            let output = nncp
                .exec("alice", "sendmail", &["bob"], b"Subject: hi\r\n\r\nhello\r\n")
                .unwrap();
            assert!(output.success);
            assert_eq!(
                fs::read(&captured).unwrap(),
                b"Subject: hi\r\n\r\nhello\r\n".to_vec()
            );
        }

        #[test]
        fn test_exec_surfaces_stderr_on_failure() {
            let dir = TempDir::new().unwrap();
            let stub = write_stub(
                &dir,
                "nncp-exec",
                "#!/bin/sh\necho 'no such node' >&2\nexit 1\n",
            );

            let mut nncp = NncpExec::new();
            nncp.set_binary(&stub);

            let err = nncp.exec("nobody", "sendmail", &[], b"").unwrap_err();
            match err {
                Error::CommandFailed(detail) => assert!(detail.contains("no such node")),
                other => panic!("expected CommandFailed, got {:?}", other),
            }
        }

        #[test]
        fn test_exec_failure_without_stderr_reports_status() {
            let dir = TempDir::new().unwrap();
            let stub = write_stub(&dir, "nncp-exec", "#!/bin/sh\nexit 3\n");

            let mut nncp = NncpExec::new();
            nncp.set_binary(&stub);

            let err = nncp.exec("alice", "sendmail", &[], b"").unwrap_err();
            match err {
                Error::CommandFailed(detail) => assert!(detail.contains("3")),
                other => panic!("expected CommandFailed, got {:?}", other),
            }
        }

        #[test]
        fn test_exec_passes_arguments_in_order() {
            let dir = TempDir::new().unwrap();
            let captured = dir.path().join("args");
            let stub = write_stub(
                &dir,
                "nncp-exec",
                &format!("#!/bin/sh\necho \"$@\" > {}\ncat > /dev/null\n", captured.display()),
            );

            let mut nncp = NncpExec::new();
            nncp.set_cfg_path("/tmp/nncp.hjson");
            nncp.set_binary(&stub);

            nncp.exec("alice", "sendmail", &["bob"], b"").unwrap();
            let args = fs::read_to_string(&captured).unwrap();
            assert_eq!(args.trim(), "-cfg /tmp/nncp.hjson alice sendmail bob");
        }
    }
}
