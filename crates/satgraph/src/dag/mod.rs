//! Temporal derivation graph: nodes, container, event replay and traversals

pub mod graph;
pub mod node;
pub mod replay;
pub mod traversal;

#[cfg(test)]
mod proptest_tests;

pub use graph::{Dag, MergeMap};
pub use node::{NodeStyle, SatNode, Time};
pub use traversal::{AncestorsFirst, ConsequencesFirst};
