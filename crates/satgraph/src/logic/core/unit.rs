//! Units: fully parsed clauses or opaque formulas

use super::clause::Clause;
use std::fmt;

/// A unit of the derivation.
///
/// Clauses are parsed into literals; formulas from preprocessing are kept as
/// the prover printed them.
#[derive(Debug, Clone)]
pub enum Unit {
    Formula(String),
    Clause(Clause),
}

impl Unit {
    pub fn as_clause(&self) -> Option<&Clause> {
        match self {
            Unit::Clause(clause) => Some(clause),
            Unit::Formula(_) => None,
        }
    }

    pub fn as_clause_mut(&mut self) -> Option<&mut Clause> {
        match self {
            Unit::Clause(clause) => Some(clause),
            Unit::Formula(_) => None,
        }
    }

    pub fn is_clause(&self) -> bool {
        matches!(self, Unit::Clause(_))
    }

    /// True for the empty clause
    pub fn is_refutation(&self) -> bool {
        matches!(self, Unit::Clause(clause) if clause.is_empty())
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Formula(formula) => write!(f, "{}", formula),
            Unit::Clause(clause) => write!(f, "{}", clause),
        }
    }
}
