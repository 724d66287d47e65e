//! The derivation graph container

use super::node::{NodeStyle, SatNode, Time};
use super::traversal::{AncestorsFirst, ConsequencesFirst};
use crate::error::{ensure, Result, SatVisError};
use crate::logic::NodeId;
use indexmap::{IndexMap, IndexSet};
use std::collections::HashSet;

/// Ids of nodes removed by preprocessing-merging, mapped to the ids that replace them
pub type MergeMap = IndexMap<NodeId, Vec<NodeId>>;

/// A derivation graph.
///
/// The node set is fixed at construction: transforms build a new Dag over
/// copies of the affected nodes. Node fields (positions, literal partitions)
/// may be changed in place through [`Dag::get_mut`].
///
/// Nodes are kept in creation order and every parent precedes its children
/// in that order, which makes the graph acyclic by construction.
#[derive(Debug, Clone, Default)]
pub struct Dag {
    nodes: IndexMap<NodeId, SatNode>,
    leaves: IndexSet<NodeId>,
    merge_map: Option<MergeMap>,
    is_passive_dag: bool,
    style_map: IndexMap<NodeId, NodeStyle>,
    active_node_id: Option<NodeId>,
}

// =============================================================================
// Construction
// =============================================================================

impl Dag {
    /// Build a Dag, checking that every cited parent exists and precedes the node
    pub fn new(nodes: IndexMap<NodeId, SatNode>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(nodes.len());
        let mut cited = HashSet::new();
        for (&id, node) in &nodes {
            ensure!(
                id == node.id,
                "node {} is stored under id {}",
                node.id,
                id
            );
            for parent in &node.parents {
                ensure!(
                    seen.contains(parent),
                    "parent {} of node {} is missing or does not precede it",
                    parent,
                    id
                );
                cited.insert(*parent);
            }
            seen.insert(id);
        }
        let leaves = nodes
            .keys()
            .filter(|id| !cited.contains(*id))
            .copied()
            .collect();

        Ok(Dag {
            nodes,
            leaves,
            merge_map: None,
            is_passive_dag: false,
            style_map: IndexMap::new(),
            active_node_id: None,
        })
    }

    pub(crate) fn with_merge_map(mut self, merge_map: Option<MergeMap>) -> Self {
        self.merge_map = merge_map;
        self
    }

    /// Build a display-only view of pending clauses with a style per node
    pub fn new_passive(
        nodes: IndexMap<NodeId, SatNode>,
        style_map: IndexMap<NodeId, NodeStyle>,
    ) -> Result<Self> {
        let mut dag = Dag::new(nodes)?;
        for id in dag.nodes.keys() {
            ensure!(style_map.contains_key(id), "no style for node {} of the passive view", id);
        }
        dag.is_passive_dag = true;
        dag.style_map = style_map;
        Ok(dag)
    }
}

// =============================================================================
// Access
// =============================================================================

impl Dag {
    pub fn get(&self, id: NodeId) -> Result<&SatNode> {
        self.nodes
            .get(&id)
            .ok_or_else(|| SatVisError::consistency(format!("node {} does not exist", id)))
    }

    pub fn get_mut(&mut self, id: NodeId) -> Result<&mut SatNode> {
        self.nodes
            .get_mut(&id)
            .ok_or_else(|| SatVisError::consistency(format!("node {} does not exist", id)))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in creation order
    pub fn iter(&self) -> impl Iterator<Item = &SatNode> {
        self.nodes.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SatNode> {
        self.nodes.values_mut()
    }

    pub fn nodes(&self) -> &IndexMap<NodeId, SatNode> {
        &self.nodes
    }

    /// Ids never cited as a parent: the most recent steps of the derivation
    pub fn leaves(&self) -> &IndexSet<NodeId> {
        &self.leaves
    }

    /// Direct consequences of `id`, in creation order
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes
            .values()
            .filter(|node| node.parents.contains(&id))
            .map(|node| node.id)
            .collect()
    }

    pub fn merge_map(&self) -> Option<&MergeMap> {
        self.merge_map.as_ref()
    }

    pub(crate) fn into_parts(self) -> (IndexMap<NodeId, SatNode>, Option<MergeMap>) {
        (self.nodes, self.merge_map)
    }

    pub fn ancestors_first(&self) -> AncestorsFirst<'_> {
        AncestorsFirst::new(self)
    }

    pub fn consequences_first(&self) -> Result<ConsequencesFirst<'_>> {
        ConsequencesFirst::new(self)
    }
}

// =============================================================================
// Passive view
// =============================================================================

impl Dag {
    pub fn is_passive_dag(&self) -> bool {
        self.is_passive_dag
    }

    pub fn style_map(&self) -> &IndexMap<NodeId, NodeStyle> {
        &self.style_map
    }

    pub fn style(&self, id: NodeId) -> Option<NodeStyle> {
        self.style_map.get(&id).copied()
    }

    /// The pending clause picked for activation, if any
    pub fn active_node_id(&self) -> Option<NodeId> {
        self.active_node_id
    }

    /// Pick a pending clause of a passive view for activation
    pub fn set_active_node(&mut self, id: NodeId) -> Result<()> {
        ensure!(self.is_passive_dag, "only a passive view has an activation candidate");
        ensure!(
            self.style(id) == Some(NodeStyle::Passive),
            "node {} is not a pending clause of this view",
            id
        );
        self.active_node_id = Some(id);
        Ok(())
    }
}

// =============================================================================
// Queries
// =============================================================================

impl Dag {
    /// Latest activation time, 0 if nothing was activated
    pub fn maximal_active_time(&self) -> Time {
        self.nodes
            .values()
            .filter_map(|node| node.active_time)
            .max()
            .unwrap_or(0)
    }

    /// Number of activated nodes
    pub fn number_of_history_steps(&self) -> usize {
        self.nodes.values().filter(|node| node.is_activated()).count()
    }

    /// True if the empty clause was derived
    pub fn is_refutation(&self) -> bool {
        self.refutation_node().is_some()
    }

    /// First node holding the empty clause
    pub fn refutation_node(&self) -> Option<NodeId> {
        self.nodes
            .values()
            .find(|node| node.unit.is_refutation())
            .map(|node| node.id)
    }

    /// A preprocessing node without parents, i.e. an input formula or axiom
    pub fn node_is_input_node(&self, id: NodeId) -> Result<bool> {
        let node = self.get(id)?;
        Ok(node.is_from_preprocessing && node.parents.is_empty())
    }

    /// Nodes visible at `time`: all preprocessing nodes, every node activated
    /// at or before `time`, and the ancestors of those.
    pub fn nodes_in_active_dag(&self, time: Time) -> Result<IndexSet<NodeId>> {
        let mut visible: HashSet<NodeId> = self
            .nodes
            .values()
            .filter(|node| node.is_from_preprocessing || node.is_active_at(time))
            .map(|node| node.id)
            .collect();
        for node in self.consequences_first()? {
            if visible.contains(&node.id) {
                visible.extend(node.parents.iter().copied());
            }
        }
        Ok(self
            .nodes
            .keys()
            .filter(|id| visible.contains(*id))
            .copied()
            .collect())
    }

    /// A final preprocessing clause that is neither activated nor deleted.
    ///
    /// In manual selection these are activated one by one before the user
    /// takes over.
    pub fn next_unselected_preprocessing_clause(&self) -> Option<NodeId> {
        self.nodes
            .values()
            .find(|node| {
                node.is_from_preprocessing
                    && node.new_time.is_some()
                    && !node.is_activated()
                    && !node.is_deleted()
            })
            .map(|node| node.id)
    }
}
