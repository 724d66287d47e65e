//! Value types of the derivation: terms, literals, clauses and units

pub mod clause;
pub mod literal;
pub mod term;
pub mod unit;
