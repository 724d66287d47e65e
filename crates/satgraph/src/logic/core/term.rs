//! Terms as printed by the prover

use super::literal::PrintOptions;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An immutable term tree: a symbol applied to ordered arguments.
///
/// Constants and variables are terms without arguments. Whether a symbol is a
/// variable is derived from its name (prover variables start with an
/// uppercase letter, e.g. `X0`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "TermFields", into = "TermFields")]
pub struct Term {
    name: String,
    args: Vec<Term>,
    is_variable: bool,
}

#[derive(Serialize, Deserialize)]
struct TermFields {
    name: String,
    args: Vec<Term>,
}

impl From<TermFields> for Term {
    fn from(fields: TermFields) -> Self {
        Term::new(fields.name, fields.args)
    }
}

impl From<Term> for TermFields {
    fn from(term: Term) -> Self {
        TermFields {
            name: term.name,
            args: term.args,
        }
    }
}

impl Term {
    pub fn new(name: impl Into<String>, args: Vec<Term>) -> Self {
        let name = name.into();
        let is_variable = args.is_empty() && is_variable_name(&name);
        Term {
            name,
            args,
            is_variable,
        }
    }

    /// A symbol without arguments (constant or variable)
    pub fn symbol(name: impl Into<String>) -> Self {
        Term::new(name, Vec::new())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[Term] {
        &self.args
    }

    pub fn is_variable(&self) -> bool {
        self.is_variable
    }

    /// Format this term with explicit print options
    pub fn display<'a>(&'a self, options: &'a PrintOptions) -> TermDisplay<'a> {
        TermDisplay {
            term: self,
            options,
        }
    }
}

/// Variable naming convention of the prover: leading ASCII uppercase letter
pub fn is_variable_name(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

/// Infix spelling of the interpreted arithmetic functions
fn infix_operator(name: &str) -> Option<&'static str> {
    match name {
        "$sum" => Some("+"),
        "$product" => Some("*"),
        "$difference" => Some("-"),
        "$quotient" => Some("/"),
        _ => None,
    }
}

fn is_associative(name: &str) -> bool {
    matches!(name, "$sum" | "$product")
}

/// Display wrapper for Term that carries print options
pub struct TermDisplay<'a> {
    term: &'a Term,
    options: &'a PrintOptions,
}

impl<'a> TermDisplay<'a> {
    fn write_term(&self, f: &mut fmt::Formatter<'_>, term: &Term, enclosing: Option<&str>) -> fmt::Result {
        if let (Some(op), [lhs, rhs]) = (infix_operator(&term.name), term.args.as_slice()) {
            // the outermost application and chains of one associative operator need no brackets
            let brackets = match enclosing {
                None => false,
                Some(outer) => {
                    !(self.options.hide_brackets_assoc && outer == term.name && is_associative(outer))
                }
            };
            if brackets {
                write!(f, "(")?;
            }
            self.write_term(f, lhs, Some(&term.name))?;
            write!(f, " {} ", op)?;
            self.write_term(f, rhs, Some(&term.name))?;
            if brackets {
                write!(f, ")")?;
            }
            return Ok(());
        }
        if term.name == "$uminus" && term.args.len() == 1 {
            write!(f, "-")?;
            return self.write_term(f, &term.args[0], Some("$uminus"));
        }

        write!(f, "{}", term.name)?;
        if !term.args.is_empty() {
            write!(f, "(")?;
            for (i, arg) in term.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                self.write_term(f, arg, None)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl<'a> fmt::Display for TermDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_term(f, self.term, None)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display(&PrintOptions::default()))
    }
}
