//! Literals and their display state

use super::term::Term;
use crate::logic::{LiteralId, NodeId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Options affecting how literals and terms are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintOptions {
    pub hide_brackets_assoc: bool,
    pub non_strict_for_negated_strict_inequalities: bool,
}

impl Default for PrintOptions {
    fn default() -> Self {
        PrintOptions {
            hide_brackets_assoc: true,
            non_strict_for_negated_strict_inequalities: true,
        }
    }
}

/// Why a literal sits in its current partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrientationReason {
    #[default]
    None,
    Heuristic,
    Inherited,
    User,
}

/// Non-owning link from a literal to the literal it was derived from.
///
/// Points into the `literals_new_event` arena of the clause of node `node`.
/// It is only valid for the Dag it was computed in and is recomputed after
/// every structural transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LiteralRef {
    pub node: NodeId,
    pub index: LiteralId,
}

/// A possibly negated predicate application or equality.
///
/// `name`, `args` and `negated` are fixed at construction; the remaining
/// fields are display state maintained by the orientation engine and the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Literal {
    name: String,
    args: Vec<Term>,
    negated: bool,
    pub is_selected: bool,
    /// Index of the printed variant (e.g. `a = b` vs `b = a`)
    pub representation: u8,
    pub orientation_reason: OrientationReason,
    #[serde(default)]
    pub print_options: PrintOptions,
    #[serde(skip)]
    pub literal_in_parent: Option<LiteralRef>,
}

impl Literal {
    pub fn new(name: impl Into<String>, args: Vec<Term>, negated: bool) -> Self {
        Literal {
            name: name.into(),
            args,
            negated,
            is_selected: false,
            representation: 0,
            orientation_reason: OrientationReason::None,
            print_options: PrintOptions::default(),
            literal_in_parent: None,
        }
    }

    /// An (in)equality `lhs = rhs` / `lhs != rhs`
    pub fn equality(lhs: Term, rhs: Term, negated: bool) -> Self {
        Literal::new("=", vec![lhs, rhs], negated)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[Term] {
        &self.args
    }

    pub fn negated(&self) -> bool {
        self.negated
    }

    pub fn is_equality(&self) -> bool {
        self.name == "=" && self.args.len() == 2
    }

    /// Same predicate, polarity and arguments; ignores all display state
    pub fn same_atom(&self, other: &Literal) -> bool {
        self.name == other.name && self.negated == other.negated && self.args == other.args
    }

    pub fn number_of_representations(&self) -> u8 {
        if self.is_equality() || (inequality_symbols(&self.name).is_some() && self.args.len() == 2) {
            2
        } else {
            1
        }
    }

    pub fn switch_to_next_representation(&mut self) {
        self.representation = (self.representation + 1) % self.number_of_representations();
    }

    /// Format this literal with explicit print options
    pub fn display<'a>(&'a self, options: &'a PrintOptions) -> LiteralDisplay<'a> {
        LiteralDisplay {
            literal: self,
            options,
        }
    }
}

/// (symbol, symbol with flipped arguments) of the interpreted inequalities
fn inequality_symbols(name: &str) -> Option<(&'static str, &'static str)> {
    match name {
        "$less" => Some(("<", ">")),
        "$lesseq" => Some(("<=", ">=")),
        "$greater" => Some((">", "<")),
        "$greatereq" => Some((">=", "<=")),
        _ => None,
    }
}

/// Display wrapper for Literal that carries print options
pub struct LiteralDisplay<'a> {
    literal: &'a Literal,
    options: &'a PrintOptions,
}

impl<'a> LiteralDisplay<'a> {
    fn write_infix(&self, f: &mut fmt::Formatter<'_>, symbol: &str, flipped: &str) -> fmt::Result {
        let (lhs, rhs) = (&self.literal.args[0], &self.literal.args[1]);
        if self.literal.representation == 0 {
            write!(f, "{} {} {}", lhs.display(self.options), symbol, rhs.display(self.options))
        } else {
            write!(f, "{} {} {}", rhs.display(self.options), flipped, lhs.display(self.options))
        }
    }
}

impl<'a> fmt::Display for LiteralDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let literal = self.literal;
        if literal.is_equality() {
            let symbol = if literal.negated { "!=" } else { "=" };
            return self.write_infix(f, symbol, symbol);
        }
        if let (Some((symbol, flipped)), 2) = (inequality_symbols(&literal.name), literal.args.len()) {
            if !literal.negated {
                return self.write_infix(f, symbol, flipped);
            }
            if self.options.non_strict_for_negated_strict_inequalities {
                match literal.name.as_str() {
                    "$less" => return self.write_infix(f, ">=", "<="),
                    "$greater" => return self.write_infix(f, "<=", ">="),
                    _ => {}
                }
            }
            write!(f, "~(")?;
            self.write_infix(f, symbol, flipped)?;
            return write!(f, ")");
        }

        if literal.negated {
            write!(f, "~")?;
        }
        write!(f, "{}", literal.name)?;
        if !literal.args.is_empty() {
            write!(f, "(")?;
            for (i, arg) in literal.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{}", arg.display(self.options))?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display(&self.print_options))
    }
}
