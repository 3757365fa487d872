//! C8: the dependency graph over variable names. Built on `petgraph` rather
//! than the source's `dict[str, set[str]]` adjacency map, since keeping a
//! real graph gives cycle detection and traversal for free instead of having
//! to hand-roll both as recursive set-walks.

use std::collections::{HashSet, VecDeque};

use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use rustc_hash::FxHashMap;

use crate::error::InfluenceError;

#[derive(Default)]
pub struct DependencyGraph {
    graph: DiGraph<String, ()>,
    index: FxHashMap<String, NodeIndex>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.index.insert(name.to_string(), idx);
        idx
    }

    /// Insert `influencing -> influenced`. Duplicate edges are a no-op. When
    /// `check` is set, an edge that would close a cycle is rejected and
    /// removed again before returning the error.
    pub fn add(&mut self, influencing: &str, influenced: &str, check: bool) -> Result<(), InfluenceError> {
        let a = self.node(influencing);
        let b = self.node(influenced);
        if self.graph.find_edge(a, b).is_some() {
            return Ok(());
        }

        let edge = self.graph.add_edge(a, b, ());
        if check && is_cyclic_directed(&self.graph) {
            self.graph.remove_edge(edge);
            return Err(InfluenceError::CycleRejected {
                influencing: influencing.to_string(),
                influenced: influenced.to_string(),
            });
        }
        Ok(())
    }

    pub fn get_pre(&self, node: &str) -> Vec<String> {
        match self.index.get(node) {
            None => Vec::new(),
            Some(&idx) => self
                .graph
                .neighbors_directed(idx, Direction::Incoming)
                .map(|n| self.graph[n].clone())
                .collect(),
        }
    }

    /// Drop `node` and every edge touching it. `petgraph::Graph::remove_node`
    /// moves the graph's last node into the freed slot, which would leave
    /// `index` pointing at a stale slot for that node - patch the map entry
    /// for whichever name lands there, if any.
    pub fn remove_node(&mut self, node: &str) {
        let idx = match self.index.remove(node) {
            Some(idx) => idx,
            None => return,
        };
        let last = NodeIndex::new(self.graph.node_count() - 1);
        self.graph.remove_node(idx);
        if idx != last {
            if let Some(moved) = self.graph.node_weight(idx) {
                self.index.insert(moved.clone(), idx);
            }
        }
    }

    /// Prune every node not on some walk from `start` to `end`, then return a
    /// traversal order (excluding `start` and `end`) with predecessors
    /// before successors relative to `end`. `start` and `end` must differ;
    /// the reflexive case is handled by the solver before this is called.
    pub fn setup(&mut self, start: &str, end: &str) -> Vec<String> {
        assert_ne!(start, end, "setup requires distinct start and end");

        let on_path = self.vars_on_path(start, end);
        let to_remove: Vec<String> = self
            .index
            .keys()
            .filter(|name| !on_path.contains(*name))
            .cloned()
            .collect();
        for name in to_remove {
            self.remove_node(&name);
        }

        self.bfs_order(start, end)
    }

    fn vars_on_path(&self, start: &str, end: &str) -> HashSet<String> {
        let mut nodes = HashSet::new();
        let mut stack = Vec::new();
        self.dfs_collect(start, end, &mut stack, &mut nodes);
        nodes
    }

    fn dfs_collect(&self, current: &str, end: &str, stack: &mut Vec<String>, nodes: &mut HashSet<String>) {
        if stack.iter().any(|n| n == current) {
            return;
        }
        stack.push(current.to_string());

        if current == end {
            nodes.extend(stack.iter().cloned());
        } else if let Some(&idx) = self.index.get(current) {
            let children: Vec<String> = self
                .graph
                .neighbors_directed(idx, Direction::Outgoing)
                .map(|n| self.graph[n].clone())
                .collect();
            for child in children {
                self.dfs_collect(&child, end, stack, nodes);
            }
        }

        stack.pop();
    }

    fn bfs_order(&self, start: &str, end: &str) -> Vec<String> {
        let mut order = Vec::new();
        let mut visited: HashSet<String> = [start.to_string(), end.to_string()].into_iter().collect();
        let mut queue: VecDeque<String> = VecDeque::new();
        queue.push_back(start.to_string());

        while let Some(node) = queue.pop_front() {
            let idx = match self.index.get(&node) {
                Some(&idx) => idx,
                None => continue,
            };
            for neighbor in self.graph.neighbors_directed(idx, Direction::Outgoing) {
                let name = self.graph[neighbor].clone();
                if !visited.contains(&name) {
                    order.push(name.clone());
                    queue.push_back(name.clone());
                    visited.insert(name);
                }
            }
        }

        order.reverse();
        order
    }
}
