//! Property-based tests for traversals and transforms using proptest.

use super::test_support::dag_from_edges;
use super::Dag;
use crate::logic::NodeId;
use crate::transform::{filter_non_consequences, filter_non_parents, merge_preprocessing};
use proptest::prelude::*;
use proptest::sample::Index;
use std::collections::{HashMap, HashSet};

/// Generate a random well-formed Dag with ids `1..=n`.
///
/// Every node picks up to three parents among the nodes before it, so the
/// map order is a topological order.
fn arb_dag() -> impl Strategy<Value = Dag> {
    (1..12usize)
        .prop_flat_map(|n| proptest::collection::vec(proptest::collection::vec(any::<Index>(), 0..4), n))
        .prop_map(|choices| {
            let edges: Vec<(NodeId, Vec<NodeId>)> = choices
                .iter()
                .enumerate()
                .map(|(i, picks)| {
                    let mut parents: Vec<NodeId> = Vec::new();
                    if i > 0 {
                        for pick in picks {
                            let parent = pick.index(i) + 1;
                            if !parents.contains(&parent) {
                                parents.push(parent);
                            }
                        }
                    }
                    (i + 1, parents)
                })
                .collect();
            let borrowed: Vec<(NodeId, &[NodeId])> =
                edges.iter().map(|(id, parents)| (*id, parents.as_slice())).collect();
            dag_from_edges(&borrowed)
        })
}

/// A random Dag together with a non-empty selection of its ids
fn arb_dag_with_seeds() -> impl Strategy<Value = (Dag, Vec<NodeId>)> {
    arb_dag().prop_flat_map(|dag| {
        let n = dag.len();
        (Just(dag), proptest::collection::vec(1..=n, 1..4))
    })
}

/// Root ancestors (nodes without parents) of `id`, including `id` itself if it is a root
fn root_ancestors(dag: &Dag, id: NodeId) -> HashSet<NodeId> {
    let mut roots = HashSet::new();
    let mut todo = vec![id];
    let mut seen = HashSet::new();
    while let Some(current) = todo.pop() {
        if !seen.insert(current) {
            continue;
        }
        let node = dag.get(current).unwrap();
        if node.parents.is_empty() {
            roots.insert(current);
        }
        todo.extend(node.parents.iter().copied());
    }
    roots
}

// =========================================================================
// Traversal properties
// =========================================================================

proptest! {
    /// Ancestors-first visits every node once, each after all of its parents
    #[test]
    fn ancestors_first_is_topological(dag in arb_dag()) {
        let order: Vec<NodeId> = dag.ancestors_first().map(|n| n.unwrap().id).collect();
        prop_assert_eq!(order.len(), dag.len());
        let position: HashMap<NodeId, usize> = order.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        prop_assert_eq!(position.len(), dag.len(), "a node was visited twice");
        for node in dag.iter() {
            for parent in &node.parents {
                prop_assert!(position[parent] < position[&node.id]);
            }
        }
    }

    /// Consequences-first visits every node once, each before all of its parents
    #[test]
    fn consequences_first_is_reverse_topological(dag in arb_dag()) {
        let order: Vec<NodeId> = dag.consequences_first().unwrap().map(|n| n.id).collect();
        prop_assert_eq!(order.len(), dag.len());
        let position: HashMap<NodeId, usize> = order.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        for node in dag.iter() {
            for parent in &node.parents {
                prop_assert!(position[parent] > position[&node.id]);
            }
        }
    }
}

// =========================================================================
// Transform properties
// =========================================================================

proptest! {
    /// The ancestor closure contains the seeds and every parent of a retained node
    #[test]
    fn filter_non_parents_is_closed((dag, seeds) in arb_dag_with_seeds()) {
        let filtered = filter_non_parents(&dag, &seeds).unwrap();
        for seed in &seeds {
            prop_assert!(filtered.contains(*seed));
        }
        for node in filtered.iter() {
            prop_assert!(!node.is_boundary);
            prop_assert_eq!(&node.parents, &dag.get(node.id).unwrap().parents);
            for parent in &node.parents {
                prop_assert!(filtered.contains(*parent));
            }
        }
    }

    /// The descendant closure contains every child of a retained non-boundary
    /// node, and boundary nodes are exactly the retained nodes without parents
    #[test]
    fn filter_non_consequences_is_closed((dag, seeds) in arb_dag_with_seeds()) {
        let filtered = filter_non_consequences(&dag, &seeds).unwrap();
        for seed in &seeds {
            prop_assert!(filtered.contains(*seed));
        }
        for node in filtered.iter() {
            if node.is_boundary {
                prop_assert!(node.parents.is_empty());
            } else {
                prop_assert!(!node.parents.is_empty());
                for parent in &node.parents {
                    prop_assert!(filtered.contains(*parent));
                }
            }
            if seeds.contains(&node.id) || !node.is_boundary {
                for child in dag.children(node.id) {
                    prop_assert!(filtered.contains(child));
                }
            }
        }
        // the input is untouched
        prop_assert!(dag.iter().all(|node| !node.is_boundary));
    }

    /// Merging keeps the input nodes and the final clauses, and links each
    /// final clause directly to the input nodes it was derived from
    #[test]
    fn merge_preprocessing_links_inputs(dag in arb_dag()) {
        let (mut nodes, _) = dag.into_parts();
        for node in nodes.values_mut() {
            node.is_from_preprocessing = true;
        }
        let dag = Dag::new(nodes).unwrap();
        let merged = merge_preprocessing(&dag).unwrap();

        for node in dag.iter() {
            let is_intermediate = !node.parents.is_empty() && !dag.children(node.id).is_empty();
            prop_assert_eq!(merged.contains(node.id), !is_intermediate);
        }
        for node in merged.iter() {
            if node.parents.is_empty() {
                continue;
            }
            let parents: HashSet<NodeId> = node.parents.iter().copied().collect();
            prop_assert_eq!(parents.len(), node.parents.len(), "duplicate parents");
            prop_assert_eq!(parents, root_ancestors(&dag, node.id));
        }
        prop_assert!(merge_preprocessing(&merged).is_err());
    }
}
