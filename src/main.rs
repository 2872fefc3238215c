//! MCP Proxy Command Line Tool
//!
//! Launches a backend MCP server as a child process and proxies messages
//! between it and the MCP client connected to this process's stdio.

use clap::Parser;
use log::{error, info, warn};
use std::future::Future;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tokio::time::timeout;

// Import our library
use mcp_proxy::common::{init_logger, ProxyError, Result};
use mcp_proxy::config::{defaults, ConfigOverrides, ProxyConfig};
use mcp_proxy::proxy::{inspector, ProxyOptions, ProxySession};
use mcp_proxy::transport::{ProcessTransport, StdioTransport, TransportSettings};
use mcp_proxy::{Direction, APP_NAME, VERSION};

/// How long runtime shutdown waits for blocking threads (the stdin reader)
const RUNTIME_SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(500);

/// MCP Proxy: forwards messages between an MCP client and an MCP server
///
/// Example usage:
///
///   mcp-proxy --server-command uv --server-args run --server-args mcp-simple-tool
///
///   mcp-proxy --server-command python --no-inspect -- server.py --verbose
#[derive(Parser, Debug)]
#[clap(author, version = VERSION, about, long_about = None)]
struct Args {
    /// Command to start the MCP server
    #[clap(long)]
    server_command: Option<String>,

    /// Arguments for the server command (repeatable)
    #[clap(long, allow_hyphen_values = true)]
    server_args: Vec<String>,

    /// Enable message inspection logging
    #[clap(long, overrides_with = "no_inspect")]
    inspect: bool,

    /// Disable message inspection logging
    #[clap(long, overrides_with = "inspect")]
    no_inspect: bool,

    /// Log level (error, warn, info, debug, trace)
    #[clap(long)]
    log_level: Option<String>,

    /// Load configuration from a JSON file
    #[clap(long)]
    config_file: Option<PathBuf>,

    /// Extra server arguments, appended after --server-args
    #[clap(last = true)]
    extra_args: Vec<String>,
}

impl Args {
    /// Command line values that take priority over every other source
    fn overrides(&self) -> ConfigOverrides {
        let server_args: Vec<String> = self
            .server_args
            .iter()
            .chain(self.extra_args.iter())
            .cloned()
            .collect();

        let inspect = if self.no_inspect {
            Some(false)
        } else if self.inspect {
            Some(true)
        } else {
            None
        };

        ConfigOverrides {
            server_command: self.server_command.clone(),
            server_args: (!server_args.is_empty()).then_some(server_args),
            inspect,
            log_level: self.log_level.clone(),
        }
    }
}

fn main() -> ExitCode {
    // Parse command line arguments
    let args = Args::parse();

    let config = match ProxyConfig::load(args.config_file.as_deref()) {
        Ok(config) => config.with_overrides(args.overrides()),
        Err(e) => {
            init_logger(args.log_level.as_deref().unwrap_or(defaults::LOG_LEVEL_STR));
            error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Initialize logger
    init_logger(&config.log_level);

    info!("Starting {} v{}", APP_NAME, VERSION);

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return ExitCode::FAILURE;
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(run(config));

    // The stdin reader sits on a blocking thread that never returns by itself
    runtime.shutdown_timeout(RUNTIME_SHUTDOWN_TIMEOUT);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Proxy failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ProxyConfig) -> Result<()> {
    let params = config.server_parameters();
    let settings = TransportSettings::from(&config);

    info!("Starting MCP proxy to: {}", params.display());

    // Set up connection to the backend server and stdio for the client
    let (mut server, server_streams) = ProcessTransport::spawn(&params, &settings)?;
    let (mut client, client_streams) = StdioTransport::start(&settings);

    info!("Proxy connections established");

    let mut options = ProxyOptions::new().on_error(handle_error);
    if config.inspect {
        options = options
            .on_client_message(inspector(Direction::ClientToServer))
            .on_server_message(inspector(Direction::ServerToClient));
    }

    let session = ProxySession::start(client_streams, server_streams, options);
    info!("Proxy is running. Press Ctrl+C to stop.");

    // The client closing its input does not stop the proxy; replies the
    // backend still owes keep flowing until it exits or we are interrupted
    let client_done = session.finished(Direction::ClientToServer);
    let server_done = session.finished(Direction::ServerToClient);
    let backend = &mut server;
    let stop = async move {
        tokio::select! {
            _ = interrupted() => info!("Proxy stopped by user"),
            _ = server_done => info!("Backend server closed its output"),
            _ = pass_on_client_eof(client_done, backend) => {}
        }
    };

    let streams = session.run_until(stop).await?;
    // Releasing the session's senders lets the stdout writer run dry
    drop(streams);
    if timeout(config.shutdown_timeout(), client.close()).await.is_err() {
        warn!("Timed out writing pending messages to the client");
    }

    let status = server.shutdown(config.shutdown_timeout()).await?;
    info!("Backend server exited with {}", status);

    Ok(())
}

/// Close the backend's stdin once the client has closed ours; never resolves
async fn pass_on_client_eof(client_done: impl Future<Output = ()>, server: &mut ProcessTransport) {
    client_done.await;
    info!("Client closed its input");
    server.close_input().await;
    std::future::pending::<()>().await
}

/// Resolves on Ctrl+C; never resolves if the signal cannot be watched
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Unable to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

fn handle_error(error: ProxyError) {
    error!("Proxy error: {}", error);
}
