//! Pending-clause view for a selection
//!
//! Given clauses the user selected, shows the pending clauses whose
//! generating inference used exactly those clauses as premises, possibly
//! followed by simplifications, together with enough of their derivation to
//! explain them.

use crate::dag::{Dag, NodeStyle, SatNode, Time};
use crate::error::{ensure, Result};
use crate::logic::NodeId;
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Build the passive view of the clauses pending at `time` that were
/// generated from `selection`.
pub fn passive_dag(dag: &Dag, selection: &[NodeId], time: Time) -> Result<Dag> {
    ensure!(!selection.is_empty(), "the passive view needs a non-empty selection");
    ensure!(!dag.is_passive_dag(), "a passive view cannot be nested");
    for &id in selection {
        dag.get(id)?;
    }
    let selected: HashSet<NodeId> = selection.iter().copied().collect();

    let mut matched: HashSet<NodeId> = HashSet::new();
    for node in dag.iter().filter(|node| node.is_pending_at(time)) {
        let relevant = relevant_node(dag, node)?;
        let generated_from_selection = if relevant.is_from_preprocessing {
            selected.len() == 1 && selected.contains(&relevant.id)
        } else {
            selected.iter().all(|id| relevant.parents.contains(id))
        };
        if generated_from_selection {
            matched.insert(node.id);
        }
    }

    let mut included: HashSet<NodeId> = matched.union(&selected).copied().collect();
    let mut kept: HashMap<NodeId, (SatNode, NodeStyle)> = HashMap::new();
    for node in dag.consequences_first()? {
        if !included.contains(&node.id) {
            continue;
        }
        let style = style_of(node, time, matched.contains(&node.id));
        let copy = if explains_further(node, time) {
            included.extend(node.parents.iter().copied());
            node.detached_copy()
        } else {
            node.boundary_copy()
        };
        kept.insert(node.id, (copy, style));
    }

    let mut nodes = IndexMap::new();
    let mut styles = IndexMap::new();
    for node in dag.iter() {
        if let Some((copy, style)) = kept.remove(&node.id) {
            nodes.insert(node.id, copy);
            styles.insert(node.id, style);
        }
    }
    debug!(
        "Passive view of {:?} at time {}: {} pending clauses, {} nodes",
        selection,
        time,
        matched.len(),
        nodes.len()
    );
    Dag::new_passive(nodes, styles)
}

/// Follow the chain of simplifications that produced `node` back to the
/// clause created by the generating inference.
pub fn relevant_node<'a>(dag: &'a Dag, node: &'a SatNode) -> Result<&'a SatNode> {
    let mut current = node;
    while let Some(replaced) = replaced_parent(dag, current)? {
        current = replaced;
    }
    Ok(current)
}

/// The parent that `node` replaced by a simplification, if any
fn replaced_parent<'a>(dag: &'a Dag, node: &SatNode) -> Result<Option<&'a SatNode>> {
    let Some(new_time) = node.new_time else {
        return Ok(None);
    };
    for &parent_id in &node.parents {
        let parent = dag.get(parent_id)?;
        if parent.deletion_time != Some(new_time) {
            continue;
        }
        let Some((first, justification)) = parent.deletion_parents.split_first() else {
            continue;
        };
        if *first != node.id {
            continue;
        }
        let mut others: Vec<NodeId> = node
            .parents
            .iter()
            .copied()
            .filter(|&id| id != parent_id)
            .collect();
        let mut justification = justification.to_vec();
        others.sort_unstable();
        justification.sort_unstable();
        if others == justification {
            return Ok(Some(parent));
        }
    }
    Ok(None)
}

/// Activated, preprocessing and theory-axiom nodes end the explanation
fn explains_further(node: &SatNode, time: Time) -> bool {
    !(node.is_active_at(time) || node.is_from_preprocessing || node.is_theory_axiom())
}

fn style_of(node: &SatNode, time: Time, is_matched: bool) -> NodeStyle {
    if is_matched {
        return NodeStyle::Passive;
    }
    if node.is_conjecture() {
        return NodeStyle::Conjecture;
    }
    let deleted = node.is_deleted_at(time);
    if node.is_active_at(time) {
        if deleted {
            NodeStyle::ActivatedDeleted
        } else {
            NodeStyle::Activated
        }
    } else if node.is_theory_axiom() {
        if deleted {
            NodeStyle::TheoryAxiomDeleted
        } else {
            NodeStyle::TheoryAxiom
        }
    } else if node.is_from_preprocessing {
        if deleted {
            NodeStyle::PreprocessingDeleted
        } else {
            NodeStyle::Preprocessing
        }
    } else {
        NodeStyle::Deleted
    }
}
