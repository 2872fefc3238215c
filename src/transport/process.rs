//! Child process transport
//!
//! The server-facing side of the proxy binary: the backend MCP server runs as
//! a child process and speaks the protocol on its stdin/stdout. Its stderr is
//! inherited so diagnostics reach the operator untouched.

use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::process::{Child, Command};
use tokio::time::timeout;

use crate::common::{ProxyError, Result};
use super::{IoTransport, TransportSettings, TransportStreams};

/// How to launch the backend server
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerParameters {
    /// Executable to run
    pub command: String,
    /// Command line arguments
    pub args: Vec<String>,
    /// Extra environment variables, added to the inherited environment
    pub env: BTreeMap<String, String>,
    /// Working directory, defaults to the proxy's own
    pub cwd: Option<PathBuf>,
}

impl ServerParameters {
    /// Parameters for `command` with no arguments
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Self::default()
        }
    }

    /// Append arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// The command line as it would be typed, for logging
    pub fn display(&self) -> String {
        if self.args.is_empty() {
            self.command.clone()
        } else {
            format!("{} {}", self.command, self.args.join(" "))
        }
    }
}

/// Transport over a spawned backend server's stdin/stdout
#[derive(Debug)]
pub struct ProcessTransport {
    child: Child,
    io: IoTransport,
}

impl ProcessTransport {
    /// Spawn the backend server
    ///
    /// Must be called from within a Tokio runtime. The child is killed if
    /// the transport is dropped without [`shutdown`](Self::shutdown).
    ///
    /// # Errors
    ///
    /// Returns `ProxyError::Process` if the process cannot be started.
    pub fn spawn(
        params: &ServerParameters,
        settings: &TransportSettings,
    ) -> Result<(Self, TransportStreams)> {
        let mut command = Command::new(&params.command);
        command
            .args(&params.args)
            .envs(&params.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        if let Some(cwd) = &params.cwd {
            command.current_dir(cwd);
        }

        let mut child = command.spawn().map_err(|e| {
            ProxyError::Process(format!("Failed to start '{}': {}", params.display(), e))
        })?;

        let stdin = child.stdin.take().ok_or_else(|| {
            ProxyError::Process("Failed to capture server stdin".to_string())
        })?;
        let stdout = child.stdout.take().ok_or_else(|| {
            ProxyError::Process("Failed to capture server stdout".to_string())
        })?;

        info!("Started backend server (pid {:?}): {}", child.id(), params.display());

        let (io, streams) = IoTransport::new(stdout, stdin, settings, "server");
        Ok((Self { child, io }, streams))
    }

    /// OS process id, if the child has not been reaped yet
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Check whether the child has exited, without waiting
    pub fn try_wait(&mut self) -> Result<Option<ExitStatus>> {
        Ok(self.child.try_wait()?)
    }

    /// Close the child's stdin once everything queued for it is written
    ///
    /// The server sees end-of-input but keeps running, so replies it still
    /// owes arrive on the read stream as usual.
    pub async fn close_input(&mut self) {
        debug!("Closing backend server input");
        self.io.close_writer().await;
    }

    /// Stop the backend server
    ///
    /// Closes the child's stdin so a well-behaved server exits on its own,
    /// waits up to `grace` for that, then kills it.
    ///
    /// # Returns
    ///
    /// Returns the child's exit status
    pub async fn shutdown(mut self, grace: Duration) -> Result<ExitStatus> {
        let io = &mut self.io;
        let child = &mut self.child;
        let exited = timeout(grace, async move {
            io.close_writer().await;
            child.wait().await
        })
        .await;

        match exited {
            Ok(status) => {
                let status = status?;
                debug!("Backend server exited with {}", status);
                Ok(status)
            }
            Err(_) => {
                warn!("Backend server did not exit within {:?}, killing it", grace);
                self.child.kill().await?;
                Ok(self.child.wait().await?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_parameters_display() {
        let params = ServerParameters::new("uv").args(["run", "mcp-simple-tool"]);
        assert_eq!(params.display(), "uv run mcp-simple-tool");
        assert_eq!(ServerParameters::new("server").display(), "server");
    }

    #[tokio::test]
    async fn test_spawn_missing_command_fails() {
        let params = ServerParameters::new("/nonexistent/mcp-server-binary");
        let result = ProcessTransport::spawn(&params, &TransportSettings::default());
        assert!(matches!(result, Err(ProxyError::Process(_))));
    }
}
