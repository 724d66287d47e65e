//! Phase B: partition propagation and ordering
//!
//! Walks the Dag ancestors first, so that a clause's partitions are decided
//! after those of its premises. A literal with known provenance inherits the
//! partition and representation of its premise literal; literals without one
//! keep an earlier decision or fall back to the default heuristic.

use super::parent_literals::compute_parent_literals;
use super::rules::{is_equality_resolution_with_deletion, rule_family, RuleFamily};
use crate::dag::{Dag, SatNode};
use crate::error::{ensure, Result, SatVisError};
use crate::logic::{Clause, Literal, LiteralId, NodeId, OrientationReason, Partition};
use indexmap::IndexSet;
use tracing::{debug, trace};

/// New display state of one literal
struct LiteralUpdate {
    literal: LiteralId,
    representation: u8,
    orientation_reason: OrientationReason,
}

/// New display state of one clause
struct ClauseUpdate {
    literals: Vec<LiteralUpdate>,
    partitions: [Vec<LiteralId>; 3],
}

/// Run both phases on the whole Dag
pub fn orient_dag(dag: &mut Dag) -> Result<()> {
    compute_parent_literals(dag)?;
    let changed = compute_clause_representation(dag, None)?;
    debug!("Oriented {} clauses", changed.len());
    Ok(())
}

/// Recompute literal partitions, representations and orderings.
///
/// With `changed_id == None` every clause is updated; otherwise the clause
/// `changed_id` and all clauses derived from it. Requires the literal
/// provenance of the Dag to be computed. Returns the ids of the updated nodes.
pub fn compute_clause_representation(
    dag: &mut Dag,
    changed_id: Option<NodeId>,
) -> Result<IndexSet<NodeId>> {
    update_clauses(dag, changed_id, None)
}

/// Like `compute_clause_representation`; the literal `pinned` of the
/// changed clause keeps its representation instead of inheriting one.
fn update_clauses(
    dag: &mut Dag,
    changed_id: Option<NodeId>,
    pinned: Option<LiteralId>,
) -> Result<IndexSet<NodeId>> {
    let mut changed_clauses = IndexSet::new();
    if let Some(id) = changed_id {
        ensure!(dag.contains(id), "changed node {} does not exist", id);
        changed_clauses.insert(id);
    }

    let order = dag
        .ancestors_first()
        .map(|node| node.map(|n| n.id))
        .collect::<Result<Vec<_>>>()?;

    for id in order {
        let node = dag.get(id)?;
        if node.is_boundary {
            continue;
        }
        let Some(clause) = node.clause() else { continue };
        let needs_update = changed_id.is_none()
            || changed_id == Some(id)
            || node.parents.iter().any(|p| changed_clauses.contains(p));
        if !needs_update {
            continue;
        }

        let pinned = if changed_id == Some(id) { pinned } else { None };
        let update = clause_update(dag, node, clause, pinned)?;
        if let Some(clause) = dag.get_mut(id)?.clause_mut() {
            for literal_update in update.literals {
                let literal = clause.literal_mut(literal_update.literal)?;
                literal.representation = literal_update.representation;
                literal.orientation_reason = literal_update.orientation_reason;
            }
            let [premise, conclusion, context] = update.partitions;
            clause.set_partitions(premise, conclusion, context)?;
        }
        changed_clauses.insert(id);
    }
    Ok(changed_clauses)
}

/// Move a literal on behalf of the user and update the affected clauses
pub fn change_literal_orientation(
    dag: &mut Dag,
    id: NodeId,
    old_position: (Partition, usize),
    new_position: (Partition, usize),
) -> Result<IndexSet<NodeId>> {
    clause_of(dag, id)?.change_literal_orientation(old_position, new_position)?;
    compute_clause_representation(dag, Some(id))
}

/// Switch a literal to its next printed variant and update the affected clauses.
///
/// The partition of the literal and its orientation reason stay as they are;
/// clauses derived from it inherit the new variant.
pub fn change_literal_representation(
    dag: &mut Dag,
    id: NodeId,
    literal: LiteralId,
) -> Result<IndexSet<NodeId>> {
    clause_of(dag, id)?
        .literal_mut(literal)?
        .switch_to_next_representation();
    update_clauses(dag, Some(id), Some(literal))
}

fn clause_of(dag: &mut Dag, id: NodeId) -> Result<&mut Clause> {
    dag.get_mut(id)?
        .clause_mut()
        .ok_or_else(|| SatVisError::consistency(format!("node {} is not a clause", id)))
}

fn clause_update(
    dag: &Dag,
    node: &SatNode,
    clause: &Clause,
    pinned: Option<LiteralId>,
) -> Result<ClauseUpdate> {
    let main_premise_from_preprocessing = match node.parents.first() {
        Some(&parent) => dag.get(parent)?.is_from_preprocessing,
        None => false,
    };
    let propagates = match rule_family(&node.inference_rule, node.parents.len()) {
        RuleFamily::SinglePremise => !is_equality_resolution_with_deletion(
            &node.inference_rule,
            main_premise_from_preprocessing,
        ),
        RuleFamily::TwoPremises(_) => node.parents.len() == 2,
        RuleFamily::Unknown => false,
    };

    let mut literals = Vec::with_capacity(clause.len());
    let mut partitions: [Vec<(LiteralId, Option<usize>)>; 3] = Default::default();
    for id in clause.partitioned_literals() {
        let literal = clause.literal(id)?;
        let inherited = if propagates && literal.orientation_reason != OrientationReason::User {
            inherited_orientation(dag, node, literal)?
        } else {
            None
        };

        let (partition, sort_key, representation, reason) = match inherited {
            Some((partition, sort_key, inherited_representation)) => {
                let representation = if pinned == Some(id) {
                    literal.representation
                } else {
                    inherited_representation
                };
                (partition, Some(sort_key), representation, OrientationReason::Inherited)
            }
            None if literal.orientation_reason != OrientationReason::None => {
                let (partition, _) = clause.partition_of(id).ok_or_else(|| {
                    SatVisError::consistency(format!("literal {} of node {} is in no partition", id, node.id))
                })?;
                (partition, None, literal.representation, literal.orientation_reason)
            }
            None => (
                heuristic_partition(literal),
                None,
                literal.representation,
                OrientationReason::Heuristic,
            ),
        };
        trace!("Node {}: literal {} goes to {:?} ({:?})", node.id, literal, partition, reason);

        literals.push(LiteralUpdate {
            literal: id,
            representation,
            orientation_reason: reason,
        });
        partitions[partition_slot(partition)].push((id, sort_key));
    }

    // user-arranged clauses keep their order
    let user_oriented = literals
        .iter()
        .any(|l| l.orientation_reason == OrientationReason::User);
    if propagates && !user_oriented {
        for partition in &mut partitions {
            partition.sort_by_key(|(_, key)| key.unwrap_or(usize::MAX));
        }
    }

    Ok(ClauseUpdate {
        literals,
        partitions: partitions.map(|partition| partition.into_iter().map(|(id, _)| id).collect()),
    })
}

/// Partition, sort key and representation a literal inherits from its
/// premise literal, if its provenance is known.
///
/// The sort key is the position of the premise literal in its partition;
/// for the right premise of a two-premise rule it is shifted past the
/// literals of the same partition of the left premise.
fn inherited_orientation(
    dag: &Dag,
    node: &SatNode,
    literal: &Literal,
) -> Result<Option<(Partition, usize, u8)>> {
    let Some(link) = literal.literal_in_parent else {
        return Ok(None);
    };
    let Some(parent_clause) = dag.get(link.node)?.clause() else {
        return Ok(None);
    };
    let parent_representation = parent_clause.literal(link.index)?.representation;
    let (partition, position) = parent_clause.partition_of(link.index).ok_or_else(|| {
        SatVisError::consistency(format!("literal {} of node {} is in no partition", link.index, link.node))
    })?;

    let mut sort_key = position;
    if let [left, right] = node.parents[..] {
        if link.node == right && left != right {
            if let Some(left_clause) = dag.get(left)?.clause() {
                sort_key += left_clause.partition(partition).len();
            }
        }
    }

    let representation = parent_representation.min(literal.number_of_representations() - 1);
    Ok(Some((partition, sort_key, representation)))
}

/// Negated non-equality literals read as premises, everything else as conclusions
fn heuristic_partition(literal: &Literal) -> Partition {
    if literal.negated() && !literal.is_equality() {
        Partition::Premise
    } else {
        Partition::Conclusion
    }
}

fn partition_slot(partition: Partition) -> usize {
    match partition {
        Partition::Premise => 0,
        Partition::Conclusion => 1,
        Partition::Context => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::Unit;
    use crate::parser::parse_clause;
    use indexmap::IndexMap;

    fn node(id: NodeId, text: &str, rule: &str, parents: &[NodeId]) -> SatNode {
        let clause = parse_clause(text).unwrap();
        let mut node = SatNode::new(id, Unit::Clause(clause), rule, parents.to_vec(), IndexMap::new(), false);
        node.new_time = Some(0);
        node
    }

    fn dag(nodes: Vec<SatNode>) -> Dag {
        Dag::new(nodes.into_iter().map(|n| (n.id, n)).collect()).unwrap()
    }

    fn clause(dag: &Dag, id: NodeId) -> &Clause {
        dag.get(id).unwrap().clause().unwrap()
    }

    fn implication(dag: &Dag, id: NodeId) -> String {
        clause(dag, id).to_implication_string()
    }

    #[test]
    fn test_heuristic_orientation() {
        let mut dag = dag(vec![node(1, "~p(a) | q(b) | a != b | ~r(c)", "input", &[])]);
        orient_dag(&mut dag).unwrap();
        assert_eq!(implication(&dag, 1), "~p(a) & ~r(c) => q(b) | a != b");
        let literal = clause(&dag, 1).literal(0).unwrap();
        assert_eq!(literal.orientation_reason, OrientationReason::Heuristic);
    }

    #[test]
    fn test_inherited_orientation_and_order() {
        let mut dag = dag(vec![
            node(1, "q(b) | r(c) | ~p(a)", "input", &[]),
            node(2, "r(c) | q(b) | s(d)", "input", &[]),
        ]);
        orient_dag(&mut dag).unwrap();
        // move r(c) to the premise of 1 and q(b) behind it
        change_literal_orientation(&mut dag, 1, (Partition::Conclusion, 1), (Partition::Premise, 0))
            .unwrap();
        assert_eq!(implication(&dag, 1), "r(c) & ~p(a) => q(b)");

        let mut nodes = dag.into_parts().0;
        let mut child = node(3, "q(b) | ~p(a)", "subsumption resolution", &[1]);
        child.new_time = Some(1);
        nodes.insert(3, child);
        let mut dag = Dag::new(nodes).unwrap();
        orient_dag(&mut dag).unwrap();
        assert_eq!(implication(&dag, 3), "~p(a) => q(b)");
        let literal = clause(&dag, 3).literal(0).unwrap();
        assert_eq!(literal.orientation_reason, OrientationReason::Inherited);
    }

    #[test]
    fn test_user_orientation_is_sticky() {
        let mut dag = dag(vec![
            node(1, "p(a) | q(b)", "input", &[]),
            node(2, "p(a) | q(c)", "forward subsumption demodulation", &[1]),
        ]);
        orient_dag(&mut dag).unwrap();
        let changed =
            change_literal_orientation(&mut dag, 2, (Partition::Conclusion, 1), (Partition::Premise, 0))
                .unwrap();
        assert_eq!(changed.into_iter().collect::<Vec<_>>(), vec![2]);
        assert_eq!(implication(&dag, 2), "q(c) => p(a)");

        // a change of the premise propagates, but not into the user's choice
        let changed =
            change_literal_orientation(&mut dag, 1, (Partition::Conclusion, 0), (Partition::Context, 0))
                .unwrap();
        assert!(changed.contains(&1) && changed.contains(&2));
        assert_eq!(implication(&dag, 2), "[p(a)] q(c) => $false");
        assert_eq!(implication(&dag, 1), "[p(a)] $true => q(b)");
    }

    #[test]
    fn test_changes_propagate_to_descendants() {
        let mut dag = dag(vec![
            node(1, "p(a) | q(b)", "input", &[]),
            node(2, "p(a) | q(c)", "forward subsumption demodulation", &[1]),
            node(3, "p(a)", "input", &[]),
        ]);
        orient_dag(&mut dag).unwrap();
        let changed =
            change_literal_orientation(&mut dag, 1, (Partition::Conclusion, 0), (Partition::Premise, 0))
                .unwrap();
        assert!(!changed.contains(&3));
        assert_eq!(implication(&dag, 2), "p(a) => q(c)");
    }

    #[test]
    fn test_two_premises_sort_left_before_right() {
        let mut dag = dag(vec![
            node(1, "~p(a) | r(c)", "input", &[]),
            node(2, "p(a) | s(d)", "input", &[]),
            node(3, "r(c) | s(d)", "resolution", &[1, 2]),
        ]);
        orient_dag(&mut dag).unwrap();
        assert_eq!(implication(&dag, 3), "$true => r(c) | s(d)");
        let links: Vec<_> = clause(&dag, 3)
            .literals_new_event()
            .iter()
            .map(|l| l.literal_in_parent.map(|r| r.node))
            .collect();
        assert_eq!(links, vec![Some(1), Some(2)]);
    }

    #[test]
    fn test_superposition_sorts_right_premise_after_left() {
        let mut dag = dag(vec![
            node(1, "p(f(a)) | q(c) | r(c)", "input", &[]),
            node(2, "f(a) = b | s(d) | t(e)", "input", &[]),
            node(3, "p(b) | q(c) | r(c) | s(d) | t(e)", "superposition", &[1, 2]),
        ]);
        orient_dag(&mut dag).unwrap();
        assert_eq!(implication(&dag, 3), "$true => p(b) | q(c) | r(c) | s(d) | t(e)");

        // all conclusion literals, reordered in both premises
        change_literal_orientation(&mut dag, 1, (Partition::Conclusion, 2), (Partition::Conclusion, 0))
            .unwrap();
        assert_eq!(implication(&dag, 1), "$true => r(c) | p(f(a)) | q(c)");
        let changed =
            change_literal_orientation(&mut dag, 2, (Partition::Conclusion, 2), (Partition::Conclusion, 1))
                .unwrap();
        assert!(changed.contains(&3));
        assert_eq!(implication(&dag, 2), "$true => f(a) = b | t(e) | s(d)");

        assert_eq!(implication(&dag, 3), "$true => r(c) | p(b) | q(c) | t(e) | s(d)");
        assert!(!clause(&dag, 3).has_user_oriented_literal());
    }

    #[test]
    fn test_representation_is_inherited() {
        let mut dag = dag(vec![
            node(1, "a = b | p(c)", "input", &[]),
            node(2, "a = b | p(d)", "forward subsumption demodulation", &[1]),
        ]);
        orient_dag(&mut dag).unwrap();
        let changed = change_literal_representation(&mut dag, 1, 0).unwrap();
        assert!(changed.contains(&2));
        assert_eq!(clause(&dag, 1).to_string(), "b = a | p(c)");
        assert_eq!(clause(&dag, 2).to_string(), "b = a | p(d)");
        assert!(change_literal_representation(&mut dag, 1, 7).is_err());
    }

    #[test]
    fn test_switched_representation_keeps_the_order_flexible() {
        let mut dag = dag(vec![
            node(1, "p(c) | a = b", "input", &[]),
            node(2, "p(c) | a = b", "forward subsumption demodulation", &[1]),
            node(3, "p(c) | a = b", "forward subsumption demodulation", &[2]),
        ]);
        orient_dag(&mut dag).unwrap();
        change_literal_orientation(&mut dag, 1, (Partition::Conclusion, 1), (Partition::Conclusion, 0))
            .unwrap();
        assert_eq!(implication(&dag, 2), "$true => a = b | p(c)");

        let changed = change_literal_representation(&mut dag, 2, 1).unwrap();
        assert!(changed.contains(&2) && changed.contains(&3));
        let literal = clause(&dag, 2).literal(1).unwrap();
        assert_eq!(literal.representation, 1);
        assert_eq!(literal.orientation_reason, OrientationReason::Inherited);
        assert!(!clause(&dag, 2).has_user_oriented_literal());
        // still sorted by the premise, and passed on to the next clause
        assert_eq!(implication(&dag, 2), "$true => b = a | p(c)");
        assert_eq!(implication(&dag, 3), "$true => b = a | p(c)");

        // the premise order still propagates into the switched clause
        change_literal_orientation(&mut dag, 1, (Partition::Conclusion, 0), (Partition::Conclusion, 1))
            .unwrap();
        assert_eq!(implication(&dag, 2), "$true => p(c) | a = b");
    }

    #[test]
    fn test_unknown_changed_node() {
        let mut dag = dag(vec![node(1, "p(a)", "input", &[])]);
        assert!(compute_clause_representation(&mut dag, Some(9)).is_err());
    }
}
