//! Vertices of the derivation graph

use crate::logic::{Clause, NodeId, Unit};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Logical time of the saturation: the number of activations so far
pub type Time = usize;

/// A step of the derivation: the unit it produced, how, and when.
///
/// `parents` is ordered: for single-premise rules `parents[0]` is the main
/// premise, for two-premise rules `parents[0]`/`parents[1]` are the left and
/// right premise. `deletion_parents[0]` is the node that replaced this one,
/// if any.
#[derive(Debug, Clone)]
pub struct SatNode {
    pub id: NodeId,
    pub unit: Unit,
    pub inference_rule: String,
    pub parents: Vec<NodeId>,
    pub statistics: IndexMap<String, i64>,
    pub is_from_preprocessing: bool,
    pub new_time: Option<Time>,
    pub active_time: Option<Time>,
    pub deletion_time: Option<Time>,
    pub deletion_parents: Vec<NodeId>,
    /// Written by the layout, at most once per Dag
    pub position: Option<(f64, f64)>,
    /// Synthetic parent-less stand-in for a node cut off by a transform
    pub is_boundary: bool,
}

impl SatNode {
    pub fn new(
        id: NodeId,
        unit: Unit,
        inference_rule: impl Into<String>,
        parents: Vec<NodeId>,
        statistics: IndexMap<String, i64>,
        is_from_preprocessing: bool,
    ) -> Self {
        SatNode {
            id,
            unit,
            inference_rule: inference_rule.into(),
            parents,
            statistics,
            is_from_preprocessing,
            new_time: None,
            active_time: None,
            deletion_time: None,
            deletion_parents: Vec::new(),
            position: None,
            is_boundary: false,
        }
    }

    pub fn clause(&self) -> Option<&Clause> {
        self.unit.as_clause()
    }

    pub fn clause_mut(&mut self) -> Option<&mut Clause> {
        self.unit.as_clause_mut()
    }

    /// Independent copy for a new Dag: no position, no provenance links
    pub fn detached_copy(&self) -> SatNode {
        let mut copy = self.clone();
        copy.position = None;
        if let Some(clause) = copy.clause_mut() {
            for literal in clause.literals_mut() {
                literal.literal_in_parent = None;
            }
        }
        copy
    }

    /// Detached copy without parent edges, standing in for this node at the edge of a subgraph
    pub fn boundary_copy(&self) -> SatNode {
        let mut copy = self.detached_copy();
        copy.parents.clear();
        copy.is_boundary = true;
        copy
    }

    pub fn is_activated(&self) -> bool {
        self.active_time.is_some()
    }

    pub fn is_deleted(&self) -> bool {
        self.deletion_time.is_some()
    }

    /// Generated, but neither activated nor deleted at time `t`
    pub fn is_pending_at(&self, t: Time) -> bool {
        self.new_time.is_some_and(|new| new <= t) && !self.is_active_at(t) && !self.is_deleted_at(t)
    }

    pub fn is_active_at(&self, t: Time) -> bool {
        self.active_time.is_some_and(|active| active <= t)
    }

    pub fn is_deleted_at(&self, t: Time) -> bool {
        self.deletion_time.is_some_and(|deleted| deleted <= t)
    }

    /// Background theory clause injected by the prover
    pub fn is_theory_axiom(&self) -> bool {
        self.inference_rule.contains("theory axiom")
    }

    pub fn is_conjecture(&self) -> bool {
        self.inference_rule == "negated conjecture"
    }
}

/// Display style of a node in a passive view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeStyle {
    Passive,
    Activated,
    ActivatedDeleted,
    Preprocessing,
    PreprocessingDeleted,
    TheoryAxiom,
    TheoryAxiomDeleted,
    Conjecture,
    Deleted,
}
