//! Traversals respecting the derivation order
//!
//! [`AncestorsFirst`] yields every node after all of its parents (an
//! iterative depth-first post-order seeded with the leaves).
//! [`ConsequencesFirst`] is the exact reverse: every node before any of its
//! parents, which lets a single pass push a flag from a node to its parents
//! and observe it when the parents come up.

use super::graph::Dag;
use super::node::SatNode;
use crate::error::{Result, SatVisError};
use crate::logic::NodeId;
use std::collections::HashSet;

pub struct AncestorsFirst<'a> {
    dag: &'a Dag,
    todo: Vec<NodeId>,
    visited: HashSet<NodeId>,
}

impl<'a> AncestorsFirst<'a> {
    pub fn new(dag: &'a Dag) -> Self {
        AncestorsFirst {
            dag,
            todo: dag.leaves().iter().copied().collect(),
            visited: HashSet::new(),
        }
    }

    pub fn has_next(&mut self) -> bool {
        while let Some(last) = self.todo.last() {
            if self.visited.contains(last) {
                self.todo.pop();
            } else {
                return true;
            }
        }
        false
    }

    /// Like `next`, but asking past the end is a consistency error
    pub fn next_node(&mut self) -> Result<&'a SatNode> {
        self.next().unwrap_or_else(|| {
            Err(SatVisError::consistency(
                "all inferences were already traversed, no next node",
            ))
        })
    }
}

impl<'a> Iterator for AncestorsFirst<'a> {
    type Item = Result<&'a SatNode>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&current) = self.todo.last() {
            if self.visited.contains(&current) {
                self.todo.pop();
                continue;
            }
            let node = match self.dag.nodes().get(&current) {
                Some(node) => node,
                None => {
                    return Some(Err(SatVisError::consistency(format!(
                        "traversal reached unknown node {}",
                        current
                    ))))
                }
            };

            // defer the node until all its parents are done
            let mut exists_unvisited_parent = false;
            for parent in &node.parents {
                if !self.visited.contains(parent) {
                    self.todo.push(*parent);
                    exists_unvisited_parent = true;
                }
            }
            if !exists_unvisited_parent {
                self.visited.insert(current);
                self.todo.pop();
                return Some(Ok(node));
            }
        }
        None
    }
}

pub struct ConsequencesFirst<'a> {
    post_order: Vec<&'a SatNode>,
}

impl<'a> ConsequencesFirst<'a> {
    pub fn new(dag: &'a Dag) -> Result<Self> {
        let post_order = AncestorsFirst::new(dag).collect::<Result<Vec<_>>>()?;
        Ok(ConsequencesFirst { post_order })
    }

    pub fn has_next(&self) -> bool {
        !self.post_order.is_empty()
    }

    /// Like `next`, but asking past the end is a consistency error
    pub fn next_node(&mut self) -> Result<&'a SatNode> {
        self.post_order.pop().ok_or_else(|| {
            SatVisError::consistency("all inferences were already traversed, no next node")
        })
    }
}

impl<'a> Iterator for ConsequencesFirst<'a> {
    type Item = &'a SatNode;

    fn next(&mut self) -> Option<Self::Item> {
        self.post_order.pop()
    }
}
