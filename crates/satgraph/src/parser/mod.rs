//! Parsers for prover output: event lines and the clause syntax of units

pub mod unit;
pub mod vampire;

// Re-export main parsing functions and types
pub use unit::{parse_clause, parse_literal, parse_term, parse_unit};
pub use vampire::{parse_vampire_output, LineType, ParsedLine};
