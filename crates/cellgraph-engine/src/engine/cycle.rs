//! Recalculation ordering and circular dependency detection.
//!
//! When a cell changes, it and everything downstream of it must be
//! re-evaluated, each cell after all of the cells it reads. We walk the
//! dependents edges depth-first from the changed cell and emit nodes in
//! reverse postorder, which is a topological order of the downstream subgraph.
//! Reaching the start cell again means the change closed a cycle.
//!
//! The walk keeps its own frame stack instead of recursing, so long chains
//! (thousands of cells) cannot overflow the call stack.

use std::collections::HashSet;

use super::DependencyGraph;

/// The start cell can reach itself through dependents edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleDetected {
    pub cell: String,
}

struct Frame<'g> {
    node: &'g str,
    dependents: Vec<&'g str>,
    next: usize,
}

impl<'g> Frame<'g> {
    fn new(graph: &'g DependencyGraph, node: &'g str) -> Self {
        let mut dependents: Vec<&'g str> = graph.dependents(node).collect();
        // Deterministic output regardless of hash order.
        dependents.sort_unstable();
        Frame {
            node,
            dependents,
            next: 0,
        }
    }
}

/// Cells to recompute after `start` changed, `start` first.
///
/// Every cell in the result appears after every cell it depends on, restricted
/// to the subgraph reachable from `start`.
pub fn recalculation_order(
    graph: &DependencyGraph,
    start: &str,
) -> Result<Vec<String>, CycleDetected> {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut postorder: Vec<&str> = Vec::new();
    let mut stack: Vec<Frame<'_>> = Vec::new();

    visited.insert(start);
    stack.push(Frame::new(graph, start));

    while let Some(frame) = stack.last_mut() {
        if let Some(&next) = frame.dependents.get(frame.next) {
            frame.next += 1;
            if next == start {
                return Err(CycleDetected {
                    cell: start.to_string(),
                });
            }
            if visited.insert(next) {
                stack.push(Frame::new(graph, next));
            }
        } else {
            postorder.push(frame.node);
            stack.pop();
        }
    }

    Ok(postorder.into_iter().rev().map(str::to_string).collect())
}
