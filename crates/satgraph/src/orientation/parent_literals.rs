//! Phase A: literal provenance
//!
//! For each derived clause, find for each of its literals the literal of the
//! premise it was derived from. The premise is looked at in the literal order
//! the prover had when the clause was generated: the activation order if the
//! premise was already activated by then, its creation order otherwise.

use super::rules::{rule_family, single_premise_matching, BinaryRule, Matching, RuleFamily};
use crate::dag::{Dag, SatNode};
use crate::error::{ensure, Result};
use crate::logic::{literals_match, Clause, Literal, LiteralId, LiteralRef, NodeId};
use tracing::debug;

/// A premise clause in the literal order its child saw
struct Premise<'a> {
    node: NodeId,
    clause: &'a Clause,
    order: Vec<LiteralId>,
}

impl<'a> Premise<'a> {
    fn reference(&self, position: usize) -> LiteralRef {
        LiteralRef {
            node: self.node,
            index: self.order[position],
        }
    }

    fn literal_at(&self, position: usize) -> Result<&'a Literal> {
        self.clause.literal(self.order[position])
    }
}

/// Assignments `child literal -> premise literal` of one clause
type Matches = Vec<(LiteralId, LiteralRef)>;

/// Recompute `literal_in_parent` for every literal of the Dag.
///
/// Links computed for a previous Dag are cleared first. Clauses derived by
/// rules without a known literal matching keep no provenance.
pub fn compute_parent_literals(dag: &mut Dag) -> Result<()> {
    for node in dag.iter_mut() {
        if let Some(clause) = node.clause_mut() {
            for literal in clause.literals_mut() {
                literal.literal_in_parent = None;
            }
        }
    }

    let mut assignments: Vec<(NodeId, Matches)> = Vec::new();
    for node in dag.iter() {
        if node.is_boundary {
            continue;
        }
        let Some(clause) = node.clause() else { continue };
        let matches = match_node(dag, node, clause)?;
        if !matches.is_empty() {
            assignments.push((node.id, matches));
        }
    }

    let linked: usize = assignments.iter().map(|(_, m)| m.len()).sum();
    for (id, matches) in assignments {
        if let Some(clause) = dag.get_mut(id)?.clause_mut() {
            for (literal, parent_literal) in matches {
                clause.literal_mut(literal)?.literal_in_parent = Some(parent_literal);
            }
        }
    }
    debug!("Linked {} literals to their premises", linked);
    Ok(())
}

fn match_node(dag: &Dag, node: &SatNode, clause: &Clause) -> Result<Matches> {
    let literals: Vec<LiteralId> = (0..clause.len()).collect();
    match rule_family(&node.inference_rule, node.parents.len()) {
        RuleFamily::Unknown => Ok(Vec::new()),
        RuleFamily::SinglePremise => {
            ensure!(
                !node.parents.is_empty(),
                "node {} derived by {} has no premise",
                node.id,
                node.inference_rule
            );
            let Some(premise) = premise_of(dag, node, node.parents[0])? else {
                return Ok(Vec::new());
            };
            let matching =
                single_premise_matching(&node.inference_rule, clause.len(), premise.order.len());
            match matching {
                Some(matching) => apply_matching(matching, clause, &literals, &premise),
                None => Ok(Vec::new()),
            }
        }
        RuleFamily::TwoPremises(rule) => {
            ensure!(
                node.parents.len() == 2,
                "node {} derived by {} has {} premises instead of 2",
                node.id,
                node.inference_rule,
                node.parents.len()
            );
            let left = premise_of(dag, node, node.parents[0])?;
            let right = premise_of(dag, node, node.parents[1])?;
            let (Some(left), Some(right)) = (left, right) else {
                return Ok(Vec::new());
            };
            ensure!(
                !left.order.is_empty() && !right.order.is_empty(),
                "a premise of node {} is the empty clause",
                node.id
            );
            match_two_premises(rule, node.id, clause, &literals, &left, &right)
        }
    }
}

/// The premise snapshot seen by `node`, or `None` if the premise is a formula
fn premise_of<'a>(dag: &'a Dag, node: &SatNode, parent_id: NodeId) -> Result<Option<Premise<'a>>> {
    let parent = dag.get(parent_id)?;
    let Some(clause) = parent.clause() else {
        return Ok(None);
    };
    let already_activated = match (parent.active_time, node.new_time) {
        (Some(active), Some(new)) => active <= new,
        _ => false,
    };
    Ok(Some(Premise {
        node: parent_id,
        clause,
        order: clause.snapshot(already_activated),
    }))
}

fn match_two_premises(
    rule: BinaryRule,
    id: NodeId,
    clause: &Clause,
    literals: &[LiteralId],
    left: &Premise,
    right: &Premise,
) -> Result<Matches> {
    let (left_len, right_len) = (left.order.len(), right.order.len());
    let split = match rule {
        BinaryRule::Resolution => {
            ensure!(
                literals.len() + 2 == left_len + right_len,
                "resolvent {} has {} literals, premises have {} and {}",
                id,
                literals.len(),
                left_len,
                right_len
            );
            left_len - 1
        }
        BinaryRule::Superposition => {
            ensure!(
                literals.len() + 1 == left_len + right_len,
                "superposition {} has {} literals, premises have {} and {}",
                id,
                literals.len(),
                left_len,
                right_len
            );
            left_len
        }
    };
    ensure!(split <= literals.len(), "premise segment of node {} out of range", id);
    let (from_left, from_right) = literals.split_at(split);

    let mut matches = match rule {
        BinaryRule::Resolution => match_removal(clause, from_left, left, true, false)?,
        BinaryRule::Superposition => match_rewrite(clause, from_left, left, true, true)?,
    };
    matches.extend(match_removal(clause, from_right, right, true, false)?);
    Ok(matches)
}

fn apply_matching(
    matching: Matching,
    clause: &Clause,
    literals: &[LiteralId],
    premise: &Premise,
) -> Result<Matches> {
    match matching {
        Matching::Exact => match_exact(literals, premise),
        Matching::Removal {
            allow_substitutions,
            allow_multiple_removals,
        } => match_removal(clause, literals, premise, allow_substitutions, allow_multiple_removals),
        Matching::Rewrite {
            allow_substitutions,
            allow_simultaneous_rewriting,
        } => match_rewrite(
            clause,
            literals,
            premise,
            allow_substitutions,
            allow_simultaneous_rewriting,
        ),
    }
}

/// Same number of literals in the same order
fn match_exact(literals: &[LiteralId], premise: &Premise) -> Result<Matches> {
    ensure!(
        literals.len() == premise.order.len(),
        "exact matching of {} literals against {} premise literals",
        literals.len(),
        premise.order.len()
    );
    Ok(literals
        .iter()
        .enumerate()
        .map(|(position, &literal)| (literal, premise.reference(position)))
        .collect())
}

/// Literals removed from the premise, the survivors in their original order.
///
/// A premise literal that does not match the current literal is taken to be
/// removed. If a surviving literal also matches a removed one the matching
/// may pick the wrong one; both are then instances of each other, so the
/// partitions they get are the same in practice.
fn match_removal(
    clause: &Clause,
    literals: &[LiteralId],
    premise: &Premise,
    allow_substitutions: bool,
    allow_multiple_removals: bool,
) -> Result<Matches> {
    if allow_multiple_removals {
        ensure!(
            literals.len() < premise.order.len(),
            "removal matching of {} literals against {} premise literals",
            literals.len(),
            premise.order.len()
        );
    } else {
        ensure!(
            literals.len() + 1 == premise.order.len(),
            "single removal matching of {} literals against {} premise literals",
            literals.len(),
            premise.order.len()
        );
    }

    let mut matches = Vec::with_capacity(literals.len());
    let mut found_removed_literal = false;
    let (mut i, mut j) = (0, 0);
    while i < literals.len() {
        let literal = clause.literal(literals[i])?;
        ensure!(
            j < premise.order.len(),
            "literal {} of {} has no counterpart in premise {}",
            literal,
            clause,
            premise.clause
        );
        if literals_match(literal, premise.literal_at(j)?, allow_substitutions) {
            matches.push((literals[i], premise.reference(j)));
            i += 1;
        } else {
            ensure!(
                !found_removed_literal || allow_multiple_removals,
                "more than one literal removed from {} to obtain {}",
                premise.clause,
                clause
            );
            found_removed_literal = true;
        }
        j += 1;
    }
    Ok(matches)
}

/// One literal rewritten and moved to the front.
///
/// Literals after the front one are first matched shifted by one position;
/// the first failure marks the rewritten premise literal, after which the
/// positions line up again. With simultaneous rewriting, literals after the
/// rewritten one are paired positionally even if they no longer match.
fn match_rewrite(
    clause: &Clause,
    literals: &[LiteralId],
    premise: &Premise,
    allow_substitutions: bool,
    allow_simultaneous_rewriting: bool,
) -> Result<Matches> {
    ensure!(
        literals.len() == premise.order.len(),
        "rewrite matching of {} literals against {} premise literals",
        literals.len(),
        premise.order.len()
    );
    let Some(&rewritten) = literals.first() else {
        return Ok(Vec::new());
    };

    let mut matches = Vec::with_capacity(literals.len());
    let mut rewritten_position = None;
    let mut i = 1;
    while i < literals.len() {
        if literals_match(clause.literal(literals[i])?, premise.literal_at(i - 1)?, allow_substitutions) {
            matches.push((literals[i], premise.reference(i - 1)));
            i += 1;
        } else {
            rewritten_position = Some(i - 1);
            break;
        }
    }
    // the last premise literal was rewritten if no shifted matching failed
    matches.push((rewritten, premise.reference(rewritten_position.unwrap_or(literals.len() - 1))));

    while i < literals.len() {
        if !allow_simultaneous_rewriting {
            let literal = clause.literal(literals[i])?;
            ensure!(
                literals_match(literal, premise.literal_at(i)?, allow_substitutions),
                "literal {} of {} does not match premise {}",
                literal,
                clause,
                premise.clause
            );
        }
        matches.push((literals[i], premise.reference(i)));
        i += 1;
    }
    Ok(matches)
}
