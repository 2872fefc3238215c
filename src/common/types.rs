//! Shared types module
//!
//! This module contains shared data types used throughout the application.

use std::fmt;

/// Direction a message travels through the proxy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// From the client-facing transport to the server-facing transport
    ClientToServer,
    /// From the server-facing transport to the client-facing transport
    ServerToClient,
}

impl Direction {
    /// Human readable label used in inspection logs
    pub fn label(self) -> &'static str {
        match self {
            Self::ClientToServer => "Client → Server",
            Self::ServerToClient => "Server → Client",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClientToServer => write!(f, "client→server"),
            Self::ServerToClient => write!(f, "server→client"),
        }
    }
}
