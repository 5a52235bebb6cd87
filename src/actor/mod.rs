//! Actor system for the development loop.
//!
//! ```text
//! FsActor(source) --> RunnerActor --> (build/ on disk) --> FsActor(build) --> WsActor
//!    (watch)          (task graph)                            (watch)       (broadcast)
//! ```
//!
//! The runner never talks to the broadcaster directly: whatever a task writes
//! into the build directory is picked up by the build watcher, so a task run
//! from another terminal reloads the browser the same way.
//!
//! # Module Structure
//!
//! - `messages` - Message types for inter-actor communication
//! - `fs` - File system watcher with debouncing and path classification
//! - `runner` - Runs task sequences in series
//! - `ws` - WebSocket broadcast
//! - `coordinator` - Wires up and runs actors

pub mod coordinator;
pub mod fs;
pub mod messages;
pub mod runner;
pub mod ws;

pub use coordinator::Coordinator;
