//! Literal provenance and premise/conclusion orientation
//!
//! Phase A links each literal of a derived clause to the premise literal it
//! came from; phase B uses those links to propagate partitions, printed
//! representations and literal order from premises to conclusions.

pub mod parent_literals;
pub mod representation;
pub mod rules;

pub use parent_literals::compute_parent_literals;
pub use representation::{
    change_literal_orientation, change_literal_representation, compute_clause_representation,
    orient_dag,
};
