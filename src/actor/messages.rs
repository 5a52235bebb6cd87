//! Actor Message Definitions

use std::net::TcpStream;
use std::path::PathBuf;

use crate::core::TaskId;

/// Messages to RunnerActor
#[derive(Debug)]
pub enum RunnerMsg {
    /// Run each sequence in series, one after another.
    Run {
        sequences: Vec<Vec<TaskId>>,
        /// Source files that triggered the run.
        changed: Vec<PathBuf>,
    },
    /// Shutdown signal
    Shutdown,
}

/// Messages to WsActor
#[derive(Debug)]
pub enum WsMsg {
    /// Full page reload.
    Reload { reason: String },
    /// Stylesheets changed, refresh them in place.
    Css { paths: Vec<String> },
    /// New WebSocket connection (raw stream, handshake pending).
    AddClient(TcpStream),
    /// Shutdown signal
    Shutdown,
}
