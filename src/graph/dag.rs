//! Dependency graph of tasks and its execution waves.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::core::TaskId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("task graph contains a cycle")]
    CycleDetected,
}

/// Directed acyclic graph of tasks.
#[derive(Debug, Default)]
pub struct TaskGraph {
    graph: DiGraph<TaskId, ()>,
    nodes: FxHashMap<TaskId, NodeIndex>,
}

impl TaskGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// The full build: `clean` before every writer. `sprite` writes into the
    /// source tree, so its readers (`scss`, `copy:img`) wait for it.
    pub fn build() -> Self {
        let mut graph = Self::new();
        for writer in TaskId::WRITERS {
            graph.add_edge(TaskId::Clean, writer);
        }
        graph.add_edge(TaskId::Sprite, TaskId::Style);
        graph.add_edge(TaskId::Sprite, TaskId::CopyImages);
        graph
    }

    /// A graph holding a single task.
    pub fn single(task: TaskId) -> Self {
        let mut graph = Self::new();
        graph.add_task(task);
        graph
    }

    /// Tasks run strictly one after another, each depending on the previous.
    pub fn chain(tasks: &[TaskId]) -> Self {
        let mut graph = Self::new();
        for task in tasks {
            graph.add_task(*task);
        }
        for pair in tasks.windows(2) {
            graph.add_edge(pair[0], pair[1]);
        }
        graph
    }

    pub fn add_task(&mut self, task: TaskId) -> NodeIndex {
        *self
            .nodes
            .entry(task)
            .or_insert_with(|| self.graph.add_node(task))
    }

    /// `dependent` runs only after `dependency` succeeded.
    pub fn add_edge(&mut self, dependency: TaskId, dependent: TaskId) {
        let from = self.add_task(dependency);
        let to = self.add_task(dependent);
        self.graph.update_edge(from, to, ());
    }

    /// Direct dependencies of `task`, sorted.
    pub fn dependencies(&self, task: TaskId) -> Vec<TaskId> {
        let Some(&idx) = self.nodes.get(&task) else {
            return Vec::new();
        };
        let mut deps: Vec<_> = self
            .graph
            .neighbors_directed(idx, Direction::Incoming)
            .map(|dep| self.graph[dep])
            .collect();
        deps.sort();
        deps
    }

    /// Group tasks into waves (Kahn levels).
    ///
    /// Every task's dependencies lie in earlier waves. Tasks inside a wave
    /// are sorted so runs are reproducible.
    pub fn waves(&self) -> Result<Vec<Vec<TaskId>>, GraphError> {
        let mut in_degree: FxHashMap<NodeIndex, usize> = self
            .graph
            .node_indices()
            .map(|idx| {
                let deg = self.graph.neighbors_directed(idx, Direction::Incoming).count();
                (idx, deg)
            })
            .collect();

        let mut remaining: Vec<NodeIndex> = self.graph.node_indices().collect();
        let mut waves = Vec::new();

        while !remaining.is_empty() {
            let (ready, rest): (Vec<_>, Vec<_>) =
                remaining.into_iter().partition(|idx| in_degree[idx] == 0);

            if ready.is_empty() {
                return Err(GraphError::CycleDetected);
            }

            for &idx in &ready {
                for dependent in self.graph.neighbors_directed(idx, Direction::Outgoing) {
                    if let Some(deg) = in_degree.get_mut(&dependent) {
                        *deg = deg.saturating_sub(1);
                    }
                }
            }

            let mut wave: Vec<TaskId> = ready.into_iter().map(|idx| self.graph[idx]).collect();
            wave.sort();
            waves.push(wave);
            remaining = rest;
        }

        Ok(waves)
    }
}
