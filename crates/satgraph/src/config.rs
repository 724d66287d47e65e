//! Visualizer configuration types.

use crate::error::Result;
use crate::logic::PrintOptions;
use serde::{Deserialize, Serialize};

/// Configuration for building and presenting a saturation graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    /// Run the literal-orientation engine after construction and extension
    pub orient_clauses: bool,
    /// Print nested associative arithmetic without inner brackets
    pub hide_brackets_assoc: bool,
    /// Print negated strict inequalities as non-strict ones (`~a<b` as `a>=b`)
    pub non_strict_for_negated_strict_inequalities: bool,
    pub mode: SessionMode,
}

/// How the prover output is presented
///
/// - Proof: only the derivation of the empty clause
/// - Saturation: every clause the prover produced
/// - ManualSelection: the user picks the clauses to activate, the graph grows incrementally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    Proof,
    #[default]
    Saturation,
    ManualSelection,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        VisualizerConfig {
            orient_clauses: true,
            hide_brackets_assoc: true,
            non_strict_for_negated_strict_inequalities: true,
            mode: SessionMode::Saturation,
        }
    }
}

impl VisualizerConfig {
    /// Load a configuration from JSON; missing fields take their defaults.
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn print_options(&self) -> PrintOptions {
        PrintOptions {
            hide_brackets_assoc: self.hide_brackets_assoc,
            non_strict_for_negated_strict_inequalities: self
                .non_strict_for_negated_strict_inequalities,
        }
    }
}
