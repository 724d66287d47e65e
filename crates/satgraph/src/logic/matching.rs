//! Structural matching of literals
//!
//! Used to recover which parent literal a derived literal descends from.
//! Equality literals match up to commutativity.

use super::{Literal, Term};
use std::collections::HashMap;

/// Bindings of variable names (of the more general literal) to terms
pub type Substitution = HashMap<String, Term>;

/// Literal equality, or instance matching when `allow_substitutions` is set
pub fn literals_match(literal: &Literal, parent_literal: &Literal, allow_substitutions: bool) -> bool {
    if allow_substitutions {
        is_substitution(literal, parent_literal)
    } else {
        is_equal(literal, parent_literal)
    }
}

/// Syntactic equality of two literals, with `a = b` equal to `b = a`
pub fn is_equal(literal1: &Literal, literal2: &Literal) -> bool {
    if !same_head(literal1, literal2) {
        return false;
    }
    if literal1
        .args()
        .iter()
        .zip(literal2.args())
        .all(|(t1, t2)| terms_are_equal(t1, t2))
    {
        return true;
    }

    literal1.is_equality()
        && terms_are_equal(&literal1.args()[0], &literal2.args()[1])
        && terms_are_equal(&literal1.args()[1], &literal2.args()[0])
}

pub fn terms_are_equal(t1: &Term, t2: &Term) -> bool {
    t1.name() == t2.name()
        && t1.args().len() == t2.args().len()
        && t1
            .args()
            .iter()
            .zip(t2.args())
            .all(|(a1, a2)| terms_are_equal(a1, a2))
}

/// True if `literal1` is obtained from `literal2` by instantiating variables of `literal2`
pub fn is_substitution(literal1: &Literal, literal2: &Literal) -> bool {
    if !same_head(literal1, literal2) {
        return false;
    }
    let mut subst = Substitution::new();
    let direct = literal1
        .args()
        .iter()
        .zip(literal2.args())
        .all(|(t1, t2)| compute_substitution(t1, t2, &mut subst));
    if direct {
        return true;
    }

    if literal1.is_equality() {
        let mut swapped = Substitution::new();
        return compute_substitution(&literal1.args()[0], &literal2.args()[1], &mut swapped)
            && compute_substitution(&literal1.args()[1], &literal2.args()[0], &mut swapped);
    }
    false
}

/// One-way match: extend `subst` so that `pattern` instantiated by it equals `instance`.
///
/// On failure the state of `subst` is unspecified.
pub fn compute_substitution(instance: &Term, pattern: &Term, subst: &mut Substitution) -> bool {
    if instance.name() == pattern.name() && instance.args().len() == pattern.args().len() {
        return instance
            .args()
            .iter()
            .zip(pattern.args())
            .all(|(i, p)| compute_substitution(i, p, subst));
    }
    if !pattern.is_variable() {
        return false;
    }
    match subst.get(pattern.name()).cloned() {
        None => {
            subst.insert(pattern.name().to_string(), instance.clone());
            true
        }
        Some(bound) => compute_substitution(instance, &bound, subst),
    }
}

fn same_head(literal1: &Literal, literal2: &Literal) -> bool {
    literal1.name() == literal2.name()
        && literal1.negated() == literal2.negated()
        && literal1.args().len() == literal2.args().len()
}
