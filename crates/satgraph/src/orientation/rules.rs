//! Inference rules with known literal provenance
//!
//! Literal matchings are only computed for the most important inference
//! rules of the prover; literals of clauses derived by other rules have no
//! provenance.

/// How the literals of a derived clause line up with its main premise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matching {
    /// Same count, same order
    Exact,
    /// Some literals removed, relative order kept
    Removal {
        allow_substitutions: bool,
        allow_multiple_removals: bool,
    },
    /// One literal rewritten and moved to the front
    Rewrite {
        allow_substitutions: bool,
        allow_simultaneous_rewriting: bool,
    },
}

/// Two-premise rules, matched separately against the left and right premise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryRule {
    /// Drops the resolved literal of each premise
    Resolution,
    /// Rewrites a literal of the left premise with the equation of the right one
    Superposition,
}

/// Provenance family of an inference rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleFamily {
    /// Derived from the main premise `parents[0]`
    SinglePremise,
    TwoPremises(BinaryRule),
    Unknown,
}

pub fn rule_family(rule: &str, number_of_parents: usize) -> RuleFamily {
    match rule {
        "evaluation"
        | "forward subsumption demodulation"
        | "subsumption resolution"
        | "equality resolution"
        | "trivial inequality removal"
        | "factoring"
        | "duplicate literal removal"
        | "forward demodulation"
        | "backward demodulation"
        | "equality factoring" => RuleFamily::SinglePremise,
        "term algebras injectivity" | "term algebras distinctness" if number_of_parents == 1 => {
            RuleFamily::SinglePremise
        }
        "resolution" => RuleFamily::TwoPremises(BinaryRule::Resolution),
        "superposition" => RuleFamily::TwoPremises(BinaryRule::Superposition),
        _ => RuleFamily::Unknown,
    }
}

/// Matching of a single-premise rule, given the literal counts of clause and premise.
///
/// `evaluation` either keeps or removes exactly one literal; other counts
/// have no known matching.
pub fn single_premise_matching(rule: &str, len: usize, parent_len: usize) -> Option<Matching> {
    match rule {
        "evaluation" if len == parent_len => Some(Matching::Exact),
        "evaluation" if len + 1 == parent_len => Some(Matching::Removal {
            allow_substitutions: false,
            allow_multiple_removals: false,
        }),
        "forward subsumption demodulation" | "term algebras injectivity" => Some(Matching::Exact),
        "subsumption resolution"
        | "equality resolution"
        | "trivial inequality removal"
        | "factoring"
        | "duplicate literal removal"
        | "term algebras distinctness" => Some(Matching::Removal {
            allow_substitutions: matches!(rule, "equality resolution" | "factoring"),
            allow_multiple_removals: matches!(
                rule,
                "trivial inequality removal" | "duplicate literal removal"
            ),
        }),
        "forward demodulation" | "backward demodulation" | "equality factoring" => {
            Some(Matching::Rewrite {
                allow_substitutions: rule == "equality factoring",
                allow_simultaneous_rewriting: false,
            })
        }
        _ => None,
    }
}

/// Equality resolution during preprocessing deletes literals instead of
/// deriving a new clause, but is printed under the same rule name.
pub fn is_equality_resolution_with_deletion(rule: &str, main_premise_from_preprocessing: bool) -> bool {
    rule == "equality resolution" && main_premise_from_preprocessing
}
