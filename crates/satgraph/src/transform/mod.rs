//! Structure-preserving subgraph transformations
//!
//! Every transform reads its input Dag and returns a new one over detached
//! copies of the retained nodes; the input is never modified.

pub mod filter;
pub mod passive;
pub mod preprocessing;

pub use filter::{
    filter_non_active_deriving_nodes, filter_non_consequences, filter_non_parents, filter_proof,
    find_common_consequences, select_children, select_common_consequences, select_parents,
};
pub use passive::{passive_dag, relevant_node};
pub use preprocessing::merge_preprocessing;
