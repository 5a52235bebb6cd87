//! Task composition.
//!
//! A run is a DAG of `TaskId`s. Edges point from a dependency to its
//! dependent; the runner executes the graph in waves.

mod dag;
mod runner;

pub use dag::{GraphError, TaskGraph};
pub use runner::run_graph;
