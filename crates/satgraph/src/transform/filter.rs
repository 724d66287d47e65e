//! Ancestor and descendant closures, common consequences and selection growth

use crate::dag::{Dag, SatNode, Time};
use crate::error::{ensure, Result, SatVisError};
use crate::logic::NodeId;
use indexmap::{IndexMap, IndexSet};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Keep `relevant_ids` and all their transitive parents.
///
/// Every retained node keeps its full parent list, so no boundary nodes are
/// needed. Retained nodes are detached copies.
pub fn filter_non_parents(dag: &Dag, relevant_ids: &[NodeId]) -> Result<Dag> {
    check_known(dag, relevant_ids)?;
    let mut transitive_parents: HashSet<NodeId> = relevant_ids.iter().copied().collect();

    for node in dag.consequences_first()? {
        if transitive_parents.contains(&node.id) {
            transitive_parents.extend(node.parents.iter().copied());
        }
    }

    let nodes = dag
        .iter()
        .filter(|node| transitive_parents.contains(&node.id))
        .map(|node| (node.id, node.detached_copy()))
        .collect();
    let filtered = Dag::new(nodes)?;
    debug!("Ancestor closure of {:?}: {} of {} nodes", relevant_ids, filtered.len(), dag.len());
    Ok(filtered)
}

/// Keep `relevant_ids` and all their transitive children.
///
/// Parents of retained nodes that are not retained themselves are replaced by
/// boundary nodes. A seed without any retained parent becomes a boundary node
/// itself.
pub fn filter_non_consequences(dag: &Dag, relevant_ids: &[NodeId]) -> Result<Dag> {
    check_known(dag, relevant_ids)?;
    let mut transitive_children: HashSet<NodeId> = relevant_ids.iter().copied().collect();
    let mut remaining: HashMap<NodeId, SatNode> = HashMap::new();

    for node in dag.ancestors_first() {
        let node = node?;
        let exists_relevant_parent = node
            .parents
            .iter()
            .any(|parent| transitive_children.contains(parent));
        if !(exists_relevant_parent || transitive_children.contains(&node.id)) {
            continue;
        }
        transitive_children.insert(node.id);

        if exists_relevant_parent {
            for &parent in &node.parents {
                if !transitive_children.contains(&parent) {
                    let boundary = dag.get(parent)?.boundary_copy();
                    ensure!(
                        !dag.leaves().contains(&parent),
                        "boundary node {} is a leaf",
                        parent
                    );
                    remaining.insert(parent, boundary);
                }
            }
            remaining.insert(node.id, node.detached_copy());
        } else {
            remaining.insert(node.id, node.boundary_copy());
        }
    }

    let nodes = dag
        .iter()
        .filter_map(|node| remaining.remove(&node.id).map(|kept| (node.id, kept)))
        .collect::<IndexMap<_, _>>();
    let filtered = Dag::new(nodes)?;
    debug!("Descendant closure of {:?}: {} of {} nodes", relevant_ids, filtered.len(), dag.len());
    Ok(filtered)
}

/// Keep only the derivations of activated clauses
pub fn filter_non_active_deriving_nodes(dag: &Dag) -> Result<Dag> {
    let activated: Vec<NodeId> = dag
        .iter()
        .filter(|node| node.is_activated())
        .map(|node| node.id)
        .collect();
    filter_non_parents(dag, &activated)
}

/// Reduce the derivation to the proof of the empty clause
pub fn filter_proof(dag: &Dag) -> Result<Dag> {
    let refutation = dag
        .refutation_node()
        .ok_or_else(|| SatVisError::consistency("the derivation contains no empty clause"))?;
    filter_non_parents(dag, &[refutation])
}

/// Nodes whose derivation contains every node of `relevant_ids`, in ancestors-first order
pub fn find_common_consequences(dag: &Dag, relevant_ids: &[NodeId]) -> Result<Vec<NodeId>> {
    let relevant: HashSet<NodeId> = relevant_ids.iter().copied().collect();
    let mut common_consequences = Vec::new();
    // subset of relevant ids occurring in the derivation of each node
    let mut relevant_in_derivation: HashMap<NodeId, HashSet<NodeId>> = HashMap::new();

    for node in dag.ancestors_first() {
        let node = node?;
        let mut occurring = HashSet::new();
        if relevant.contains(&node.id) {
            occurring.insert(node.id);
        }
        for parent in &node.parents {
            if let Some(from_parent) = relevant_in_derivation.get(parent) {
                occurring.extend(from_parent.iter().copied());
            }
        }
        if occurring.len() == relevant.len() {
            common_consequences.push(node.id);
        }
        relevant_in_derivation.insert(node.id, occurring);
    }
    Ok(common_consequences)
}

/// Grow a selection by the direct parents visible at `time`
pub fn select_parents(dag: &Dag, selection: &[NodeId], time: Time) -> Result<Vec<NodeId>> {
    let visible = visible_selection(dag, selection, time)?;
    let mut grown: IndexSet<NodeId> = selection.iter().copied().collect();
    for &id in selection {
        grown.extend(
            dag.get(id)?
                .parents
                .iter()
                .filter(|parent| visible.contains(*parent))
                .copied(),
        );
    }
    Ok(grown.into_iter().collect())
}

/// Grow a selection by the direct children visible at `time`
pub fn select_children(dag: &Dag, selection: &[NodeId], time: Time) -> Result<Vec<NodeId>> {
    let visible = visible_selection(dag, selection, time)?;
    let mut grown: IndexSet<NodeId> = selection.iter().copied().collect();
    for &id in selection {
        grown.extend(
            dag.children(id)
                .into_iter()
                .filter(|child| visible.contains(child)),
        );
    }
    Ok(grown.into_iter().collect())
}

/// Replace a selection by its common consequences visible at `time`
pub fn select_common_consequences(
    dag: &Dag,
    selection: &[NodeId],
    time: Time,
) -> Result<Vec<NodeId>> {
    let visible = dag.nodes_in_active_dag(time)?;
    Ok(find_common_consequences(dag, selection)?
        .into_iter()
        .filter(|id| visible.contains(id))
        .collect())
}

fn visible_selection(dag: &Dag, selection: &[NodeId], time: Time) -> Result<IndexSet<NodeId>> {
    let visible = dag.nodes_in_active_dag(time)?;
    for id in selection {
        ensure!(visible.contains(id), "selected node {} is not visible at time {}", id, time);
    }
    Ok(visible)
}

fn check_known(dag: &Dag, ids: &[NodeId]) -> Result<()> {
    for &id in ids {
        dag.get(id)?;
    }
    Ok(())
}
