//! MCP Proxy: bidirectional message forwarding between MCP transports
//!
//! This library connects a client-facing transport to a server-facing
//! transport and relays messages in both directions, with optional hooks to
//! inspect, rewrite, or drop messages on the way.
//!
//! # Main Features
//!
//! - Independent client → server and server → client forwarding tasks
//! - Per-message failure isolation with a shared error handler
//! - Transports for in-memory channels, stdio, and child processes
//! - Newline-delimited JSON-RPC framing
//!
//! # Example
//!
//! ```no_run
//! use mcp_proxy::proxy::{inspector, ProxyOptions, ProxySession};
//! use mcp_proxy::transport::{ProcessTransport, ServerParameters, StdioTransport, TransportSettings};
//! use mcp_proxy::{Direction, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let settings = TransportSettings::default();
//!
//!     // Backend server on the server side, our own stdio on the client side
//!     let params = ServerParameters::new("uv").args(["run", "mcp-simple-tool"]);
//!     let (server, server_streams) = ProcessTransport::spawn(&params, &settings)?;
//!     let (_client, client_streams) = StdioTransport::start(&settings);
//!
//!     let options = ProxyOptions::new()
//!         .on_error(|e: mcp_proxy::ProxyError| log::error!("Proxy error: {}", e))
//!         .on_client_message(inspector(Direction::ClientToServer))
//!         .on_server_message(inspector(Direction::ServerToClient));
//!
//!     // Run until Ctrl+C
//!     let session = ProxySession::start(client_streams, server_streams, options);
//!     session.run_until(tokio::signal::ctrl_c()).await?;
//!
//!     server.shutdown(std::time::Duration::from_secs(2)).await?;
//!     Ok(())
//! }
//! ```

// Public modules
pub mod common;
pub mod config;
pub mod protocol;
pub mod proxy;
pub mod transport;

// Re-export commonly used structures and functions for convenience
pub use common::{Direction, ProxyError, Result};
pub use proxy::{ProxyOptions, ProxySession};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
