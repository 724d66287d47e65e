//! Collapsing of preprocessing chains
//!
//! The prover normalises its input in many small steps. Only the input
//! formulas and the clauses handed to saturation are of interest, so every
//! intermediate preprocessing node is spliced out and its children point to
//! its parents directly.

use crate::dag::{Dag, MergeMap, SatNode};
use crate::error::{ensure, Result, SatVisError};
use crate::logic::NodeId;
use indexmap::{IndexMap, IndexSet};
use tracing::debug;

/// Rule of axioms the prover adds for choice functions; treated as background theory
const CHOICE_AXIOM_RULE: &str = "choice axiom";

/// Merge preprocessing chains into single steps.
///
/// Only applicable to a Dag constructed directly from the initial events.
/// The returned Dag records every removed id in its merge map, so that later
/// events citing a removed id can be rewritten.
pub fn merge_preprocessing(dag: &Dag) -> Result<Dag> {
    ensure!(
        dag.merge_map().is_none(),
        "preprocessing was already merged, the dag may only be merged once"
    );
    let mut nodes = dag.nodes().clone();
    let mut to_remove: IndexSet<NodeId> = IndexSet::new();
    let mut merge_map = MergeMap::new();

    let order = dag
        .ancestors_first()
        .map(|node| node.map(|n| n.id))
        .collect::<Result<Vec<_>>>()?;

    for id in order {
        let Some(current) = nodes.get(&id) else { continue };
        if !current.is_from_preprocessing {
            continue;
        }

        let mut updated_parents: IndexSet<NodeId> = IndexSet::new();
        for parent_id in &current.parents {
            let parent = dag_node(&nodes, *parent_id)?;
            ensure!(
                parent.is_from_preprocessing,
                "parent {} of preprocessing node {} is not from preprocessing",
                parent_id,
                id
            );

            if parent.parents.is_empty() {
                if parent.inference_rule == CHOICE_AXIOM_RULE {
                    to_remove.insert(*parent_id);
                } else {
                    add_parent(&mut updated_parents, *parent_id, id);
                }
            } else {
                for grandparent_id in &parent.parents {
                    ensure!(
                        dag_node(&nodes, *grandparent_id)?.is_from_preprocessing,
                        "ancestor {} of preprocessing node {} is not from preprocessing",
                        grandparent_id,
                        id
                    );
                    add_parent(&mut updated_parents, *grandparent_id, id);
                }
                to_remove.insert(*parent_id);
                merge_map.insert(*parent_id, parent.parents.clone());
            }
        }

        if let Some(current) = nodes.get_mut(&id) {
            current.parents = updated_parents.into_iter().collect();
        }
    }

    for id in &to_remove {
        ensure!(nodes.shift_remove(id).is_some(), "merged node {} vanished", id);
    }

    // saturation clauses citing a merged node now cite its replacements
    for node in nodes.values_mut() {
        if node.is_from_preprocessing || !node.parents.iter().any(|p| to_remove.contains(p)) {
            continue;
        }
        node.parents = node
            .parents
            .iter()
            .flat_map(|parent| match merge_map.get(parent) {
                Some(replacements) => replacements.clone(),
                None if to_remove.contains(parent) => Vec::new(),
                None => vec![*parent],
            })
            .collect();
    }

    debug!("Merged preprocessing: removed {} of {} nodes", to_remove.len(), dag.len());
    Ok(Dag::new(nodes)?.with_merge_map(Some(merge_map)))
}

/// Each parent is kept once, at its first position
fn add_parent(parents: &mut IndexSet<NodeId>, parent: NodeId, child: NodeId) {
    if !parents.insert(parent) {
        debug!("Dropped duplicate parent {} of preprocessing node {}", parent, child);
    }
}

fn dag_node(nodes: &IndexMap<NodeId, SatNode>, id: NodeId) -> Result<&SatNode> {
    nodes
        .get(&id)
        .ok_or_else(|| SatVisError::consistency(format!("node {} does not exist", id)))
}
