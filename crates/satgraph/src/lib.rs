//! satgraph: derivation graphs of saturation-based theorem provers
//!
//! This library replays the event log of a saturation prover (clauses
//! created, activated, simplified away) into a temporal derivation graph,
//! offers structure-preserving views of that graph, and orients clause
//! literals into premises and conclusions for presentation.

pub mod config;
pub mod dag;
pub mod error;
pub mod json;
pub mod layout;
pub mod logic;
pub mod orientation;
pub mod parser;
pub mod pipeline;
pub mod transform;

pub use config::{SessionMode, VisualizerConfig};
pub use dag::{Dag, NodeStyle, SatNode, Time};
pub use error::{Result, SatVisError};
pub use json::{deserialize_dag, serialize_dag};
pub use layout::{dag_to_dot, layout_dag, layout_nodes_at_position, parse_plain_layout, LayoutEngine};
pub use logic::{
    Clause, Literal, LiteralId, LiteralRef, NodeId, OrientationReason, Partition, PrintOptions, Term,
    Unit,
};
pub use orientation::{
    change_literal_orientation, change_literal_representation, compute_clause_representation,
    compute_parent_literals, orient_dag,
};
pub use parser::{parse_clause, parse_unit, parse_vampire_output, LineType, ParsedLine};
pub use pipeline::{apply_print_options, extend_saturation, load_saturation};
pub use transform::{
    filter_non_active_deriving_nodes, filter_non_consequences, filter_non_parents, filter_proof,
    find_common_consequences, merge_preprocessing, passive_dag, select_children,
    select_common_consequences, select_parents,
};
