//! Saved-session format
//!
//! A session is the node map of a Dag in map order. Clause partitions are
//! stored as indices into the clause's literal list, so that every literal
//! is written once. Literal provenance is not stored; it is recomputed on
//! load.

use crate::dag::{Dag, SatNode, Time};
use crate::error::{ensure, Result};
use crate::logic::{Clause, Literal, LiteralId, NodeId, Unit};
use crate::orientation::compute_parent_literals;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// JSON representation of a clause
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClauseJson {
    pub literals: Vec<Literal>,
    pub premise: Vec<LiteralId>,
    pub conclusion: Vec<LiteralId>,
    #[serde(default)]
    pub context: Vec<LiteralId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub literals_active_event: Option<Vec<LiteralId>>,
}

impl ClauseJson {
    pub fn from_clause(clause: &Clause) -> Self {
        ClauseJson {
            literals: clause.literals_new_event().to_vec(),
            premise: clause.premise_literals().to_vec(),
            conclusion: clause.conclusion_literals().to_vec(),
            context: clause.context_literals().to_vec(),
            literals_active_event: clause.literals_active_event().map(<[LiteralId]>::to_vec),
        }
    }

    pub fn into_clause(self) -> Result<Clause> {
        Clause::from_parts(
            self.literals,
            self.premise,
            self.conclusion,
            self.context,
            self.literals_active_event,
        )
    }
}

/// JSON representation of a unit
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UnitJson {
    Formula { text: String },
    Clause(ClauseJson),
}

impl UnitJson {
    pub fn from_unit(unit: &Unit) -> Self {
        match unit {
            Unit::Formula(text) => UnitJson::Formula { text: text.clone() },
            Unit::Clause(clause) => UnitJson::Clause(ClauseJson::from_clause(clause)),
        }
    }

    pub fn into_unit(self) -> Result<Unit> {
        Ok(match self {
            UnitJson::Formula { text } => Unit::Formula(text),
            UnitJson::Clause(clause) => Unit::Clause(clause.into_clause()?),
        })
    }
}

/// JSON representation of a derivation step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SatNodeJson {
    pub id: NodeId,
    pub unit: UnitJson,
    pub inference_rule: String,
    pub parents: Vec<NodeId>,
    #[serde(default)]
    pub statistics: IndexMap<String, i64>,
    pub is_from_preprocessing: bool,
    pub new_time: Option<Time>,
    pub active_time: Option<Time>,
    pub deletion_time: Option<Time>,
    #[serde(default)]
    pub deletion_parents: Vec<NodeId>,
    pub position: Option<(f64, f64)>,
    #[serde(default)]
    pub is_boundary: bool,
}

impl SatNodeJson {
    pub fn from_node(node: &SatNode) -> Self {
        SatNodeJson {
            id: node.id,
            unit: UnitJson::from_unit(&node.unit),
            inference_rule: node.inference_rule.clone(),
            parents: node.parents.clone(),
            statistics: node.statistics.clone(),
            is_from_preprocessing: node.is_from_preprocessing,
            new_time: node.new_time,
            active_time: node.active_time,
            deletion_time: node.deletion_time,
            deletion_parents: node.deletion_parents.clone(),
            position: node.position,
            is_boundary: node.is_boundary,
        }
    }

    pub fn into_node(self) -> Result<SatNode> {
        let mut node = SatNode::new(
            self.id,
            self.unit.into_unit()?,
            self.inference_rule,
            self.parents,
            self.statistics,
            self.is_from_preprocessing,
        );
        node.new_time = self.new_time;
        node.active_time = self.active_time;
        node.deletion_time = self.deletion_time;
        node.deletion_parents = self.deletion_parents;
        node.position = self.position;
        node.is_boundary = self.is_boundary;
        Ok(node)
    }
}

/// JSON representation of a saved session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DagJson {
    pub nodes: Vec<SatNodeJson>,
}

/// Save a Dag; passive views are transient and cannot be saved
pub fn serialize_dag(dag: &Dag) -> Result<String> {
    ensure!(!dag.is_passive_dag(), "a passive view cannot be saved");
    let json = DagJson {
        nodes: dag.iter().map(SatNodeJson::from_node).collect(),
    };
    Ok(serde_json::to_string(&json)?)
}

/// Restore a saved Dag, recomputing the literal provenance
pub fn deserialize_dag(input: &str) -> Result<Dag> {
    let json: DagJson = serde_json::from_str(input)?;
    let mut nodes = IndexMap::with_capacity(json.nodes.len());
    for node in json.nodes {
        let node = node.into_node()?;
        ensure!(!nodes.contains_key(&node.id), "node {} is saved twice", node.id);
        nodes.insert(node.id, node);
    }
    let mut dag = Dag::new(nodes)?;
    compute_parent_literals(&mut dag)?;
    debug!("Restored a dag of {} nodes", dag.len());
    Ok(dag)
}
