//! Clause-level representation of prover output
//!
//! This module provides the value types of a derivation: terms, literals,
//! clauses and units, plus the structural matching used to relate literals
//! of a clause to literals of its parents.

pub mod core;
pub mod matching;

/// Prover-assigned identifier of a derivation step
pub type NodeId = usize;

/// Index of a literal in its clause's `literals_new_event` arena
pub type LiteralId = usize;

// Re-export commonly used types
pub use self::core::clause::{Clause, Partition};
pub use self::core::literal::{Literal, LiteralDisplay, LiteralRef, OrientationReason, PrintOptions};
pub use self::core::term::{is_variable_name, Term, TermDisplay};
pub use self::core::unit::Unit;
pub use matching::{
    compute_substitution, is_equal, is_substitution, literals_match, terms_are_equal,
    Substitution,
};
