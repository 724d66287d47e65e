//! Clauses with premise/conclusion/context partitions

use super::literal::{Literal, OrientationReason, PrintOptions};
use crate::error::{ensure, Result, SatVisError};
use crate::logic::LiteralId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display partition of a clause's literals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Partition {
    Premise,
    Conclusion,
    Context,
}

impl Partition {
    pub const ALL: [Partition; 3] = [Partition::Premise, Partition::Conclusion, Partition::Context];
}

/// A clause (disjunction of literals).
///
/// The literals are owned by an arena in the order of the clause's creation
/// (`literals_new_event`). Partitions and the activation snapshot hold
/// indices into that arena, so a literal keeps its identity when it moves
/// between partitions. The three partitions always form a permutation of
/// the arena.
#[derive(Debug, Clone)]
pub struct Clause {
    literals: Vec<Literal>,
    premise: Vec<LiteralId>,
    conclusion: Vec<LiteralId>,
    context: Vec<LiteralId>,
    literals_active_event: Option<Vec<LiteralId>>,
}

impl Clause {
    /// Create a clause whose literals all start out as conclusion literals
    pub fn new(literals: Vec<Literal>) -> Self {
        let conclusion = (0..literals.len()).collect();
        Clause {
            literals,
            premise: Vec::new(),
            conclusion,
            context: Vec::new(),
            literals_active_event: None,
        }
    }

    /// Rebuild a clause from its arena and index-encoded partitions
    pub fn from_parts(
        literals: Vec<Literal>,
        premise: Vec<LiteralId>,
        conclusion: Vec<LiteralId>,
        context: Vec<LiteralId>,
        literals_active_event: Option<Vec<LiteralId>>,
    ) -> Result<Self> {
        let mut clause = Clause::new(literals);
        clause.set_partitions(premise, conclusion, context)?;
        if let Some(order) = literals_active_event {
            clause.set_literals_active_event(order)?;
        }
        Ok(clause)
    }

    /// Check if this clause is empty (contradiction)
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// The literal arena, in the order the clause was created with
    pub fn literals_new_event(&self) -> &[Literal] {
        &self.literals
    }

    /// The literal `id` of the arena; an unknown id is a consistency error
    pub fn literal(&self, id: LiteralId) -> Result<&Literal> {
        let len = self.literals.len();
        self.literals
            .get(id)
            .ok_or_else(|| SatVisError::consistency(format!("clause of {} literals has no literal {}", len, id)))
    }

    pub fn literal_mut(&mut self, id: LiteralId) -> Result<&mut Literal> {
        let len = self.literals.len();
        self.literals
            .get_mut(id)
            .ok_or_else(|| SatVisError::consistency(format!("clause of {} literals has no literal {}", len, id)))
    }

    pub fn literals_mut(&mut self) -> impl Iterator<Item = &mut Literal> {
        self.literals.iter_mut()
    }

    /// Literal order after the prover moved the selected literals to the front
    pub fn literals_active_event(&self) -> Option<&[LiteralId]> {
        self.literals_active_event.as_deref()
    }

    pub fn set_literals_active_event(&mut self, order: Vec<LiteralId>) -> Result<()> {
        ensure!(
            is_permutation(&order, self.literals.len()),
            "active-event order {:?} is not a permutation of {} literals",
            order,
            self.literals.len()
        );
        self.literals_active_event = Some(order);
        Ok(())
    }

    /// The literal order a child created at some time saw: the activation
    /// order if the clause was already active, the creation order otherwise.
    pub fn snapshot(&self, activated: bool) -> Vec<LiteralId> {
        match (&self.literals_active_event, activated) {
            (Some(order), true) => order.clone(),
            _ => (0..self.literals.len()).collect(),
        }
    }

    pub fn partition(&self, partition: Partition) -> &[LiteralId] {
        match partition {
            Partition::Premise => &self.premise,
            Partition::Conclusion => &self.conclusion,
            Partition::Context => &self.context,
        }
    }

    pub fn premise_literals(&self) -> &[LiteralId] {
        &self.premise
    }

    pub fn conclusion_literals(&self) -> &[LiteralId] {
        &self.conclusion
    }

    pub fn context_literals(&self) -> &[LiteralId] {
        &self.context
    }

    /// Partition and position holding the literal `id`
    pub fn partition_of(&self, id: LiteralId) -> Option<(Partition, usize)> {
        Partition::ALL.into_iter().find_map(|partition| {
            self.partition(partition)
                .iter()
                .position(|&l| l == id)
                .map(|index| (partition, index))
        })
    }

    /// All literal ids in partition order (premise, conclusion, context)
    pub fn partitioned_literals(&self) -> Vec<LiteralId> {
        self.premise
            .iter()
            .chain(&self.conclusion)
            .chain(&self.context)
            .copied()
            .collect()
    }

    pub fn set_partitions(
        &mut self,
        premise: Vec<LiteralId>,
        conclusion: Vec<LiteralId>,
        context: Vec<LiteralId>,
    ) -> Result<()> {
        let all: Vec<LiteralId> = premise.iter().chain(&conclusion).chain(&context).copied().collect();
        ensure!(
            is_permutation(&all, self.literals.len()),
            "partitions {:?} / {:?} / {:?} do not cover the {} literals of the clause",
            premise,
            conclusion,
            context,
            self.literals.len()
        );
        self.premise = premise;
        self.conclusion = conclusion;
        self.context = context;
        Ok(())
    }

    /// Move a literal to another partition slot on behalf of the user.
    ///
    /// The literal is removed from `old` and inserted at `new` (the index is
    /// clamped to the end of the target partition); it becomes user-oriented.
    pub fn change_literal_orientation(
        &mut self,
        old: (Partition, usize),
        new: (Partition, usize),
    ) -> Result<()> {
        let (old_partition, old_index) = old;
        let source = self.partition_vec_mut(old_partition);
        ensure!(
            old_index < source.len(),
            "no literal at position {} of the {:?} literals",
            old_index,
            old_partition
        );
        let id = source.remove(old_index);

        let (new_partition, new_index) = new;
        let target = self.partition_vec_mut(new_partition);
        let new_index = new_index.min(target.len());
        target.insert(new_index, id);

        self.literals[id].orientation_reason = OrientationReason::User;
        Ok(())
    }

    pub fn has_user_oriented_literal(&self) -> bool {
        self.literals
            .iter()
            .any(|l| l.orientation_reason == OrientationReason::User)
    }

    pub fn set_print_options(&mut self, options: PrintOptions) {
        for literal in &mut self.literals {
            literal.print_options = options;
        }
    }

    /// Render as `premise => conclusion`, context literals in brackets
    pub fn to_implication_string(&self) -> String {
        let join = |ids: &[LiteralId], sep: &str| {
            ids.iter()
                .map(|&id| self.literals[id].to_string())
                .collect::<Vec<_>>()
                .join(sep)
        };
        let premise = if self.premise.is_empty() {
            "$true".to_string()
        } else {
            join(&self.premise, " & ")
        };
        let conclusion = if self.conclusion.is_empty() {
            "$false".to_string()
        } else {
            join(&self.conclusion, " | ")
        };
        if self.context.is_empty() {
            format!("{} => {}", premise, conclusion)
        } else {
            format!("[{}] {} => {}", join(&self.context, ", "), premise, conclusion)
        }
    }

    fn partition_vec_mut(&mut self, partition: Partition) -> &mut Vec<LiteralId> {
        match partition {
            Partition::Premise => &mut self.premise,
            Partition::Conclusion => &mut self.conclusion,
            Partition::Context => &mut self.context,
        }
    }
}

fn is_permutation(ids: &[LiteralId], len: usize) -> bool {
    if ids.len() != len {
        return false;
    }
    let mut seen = vec![false; len];
    for &id in ids {
        if id >= len || seen[id] {
            return false;
        }
        seen[id] = true;
    }
    true
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.literals.is_empty() {
            return write!(f, "$false");
        }
        for (i, id) in self.partitioned_literals().into_iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{}", self.literals[id])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::Term;

    fn lit(name: &str, negated: bool) -> Literal {
        Literal::new(name, vec![Term::symbol("a")], negated)
    }

    fn three() -> Clause {
        Clause::new(vec![lit("p", true), lit("q", false), lit("r", false)])
    }

    #[test]
    fn test_new_clause_is_all_conclusion() {
        let clause = three();
        assert_eq!(clause.conclusion_literals(), &[0, 1, 2]);
        assert!(clause.premise_literals().is_empty());
        assert_eq!(clause.to_string(), "~p(a) | q(a) | r(a)");
        assert_eq!(Clause::new(vec![]).to_string(), "$false");
    }

    #[test]
    fn test_set_partitions_rejects_non_permutation() {
        let mut clause = three();
        assert!(clause.set_partitions(vec![0], vec![1], vec![]).is_err());
        assert!(clause.set_partitions(vec![0], vec![1, 1], vec![]).is_err());
        clause.set_partitions(vec![0], vec![2], vec![1]).unwrap();
        assert_eq!(clause.partition_of(1), Some((Partition::Context, 0)));
        assert_eq!(clause.partitioned_literals(), vec![0, 2, 1]);
    }

    #[test]
    fn test_change_literal_orientation_keeps_identity() {
        let mut clause = three();
        clause
            .change_literal_orientation((Partition::Conclusion, 0), (Partition::Premise, 5))
            .unwrap();
        assert_eq!(clause.premise_literals(), &[0]);
        assert_eq!(clause.conclusion_literals(), &[1, 2]);
        assert_eq!(clause.literal(0).unwrap().orientation_reason, OrientationReason::User);
        assert!(clause.has_user_oriented_literal());

        let err = clause.change_literal_orientation((Partition::Context, 0), (Partition::Premise, 0));
        assert!(err.is_err());
    }

    #[test]
    fn test_unknown_literal_is_an_error() {
        let mut clause = three();
        assert_eq!(clause.literal(2).unwrap().name(), "r");
        assert!(clause.literal(3).unwrap_err().is_consistency());
        assert!(clause.literal_mut(7).is_err());
    }

    #[test]
    fn test_snapshot_uses_active_order_only_when_activated() {
        let mut clause = three();
        clause.set_literals_active_event(vec![2, 0, 1]).unwrap();
        assert_eq!(clause.snapshot(true), vec![2, 0, 1]);
        assert_eq!(clause.snapshot(false), vec![0, 1, 2]);
        assert!(clause.set_literals_active_event(vec![0, 0, 1]).is_err());
    }

    #[test]
    fn test_implication_string() {
        let mut clause = three();
        clause.set_partitions(vec![0], vec![1, 2], vec![]).unwrap();
        assert_eq!(clause.to_implication_string(), "~p(a) => q(a) | r(a)");
    }
}
