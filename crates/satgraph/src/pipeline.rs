//! Session pipeline: from prover events to a presentable Dag

use crate::config::{SessionMode, VisualizerConfig};
use crate::dag::Dag;
use crate::error::Result;
use crate::logic::{NodeId, PrintOptions};
use crate::orientation::orient_dag;
use crate::parser::ParsedLine;
use crate::transform::{filter_proof, merge_preprocessing};
use tracing::info;

/// Build the Dag of a prover run.
///
/// Preprocessing chains are merged; in proof mode the Dag is reduced to the
/// derivation of the empty clause, which fails if the run found no proof.
pub fn load_saturation(lines: &[ParsedLine], config: &VisualizerConfig) -> Result<Dag> {
    let constructed = Dag::from_parsed_lines(lines, None)?;
    let merged = merge_preprocessing(&constructed)?;
    let mut dag = match config.mode {
        SessionMode::Proof => filter_proof(&merged)?,
        SessionMode::Saturation | SessionMode::ManualSelection => merged,
    };
    if config.orient_clauses {
        orient_dag(&mut dag)?;
    }
    apply_print_options(&mut dag, config.print_options());
    info!(
        "Loaded {} events into a dag of {} nodes ({} activations, refutation: {})",
        lines.len(),
        dag.len(),
        dag.number_of_history_steps(),
        dag.is_refutation()
    );
    Ok(dag)
}

/// Extend a Dag by the events of a continued prover run.
///
/// Returns the extended Dag and the ids that became visible, i.e. that are
/// in the active derivation after the extension but were not before.
pub fn extend_saturation(
    dag: &Dag,
    lines: &[ParsedLine],
    config: &VisualizerConfig,
) -> Result<(Dag, Vec<NodeId>)> {
    let visible_before = dag.nodes_in_active_dag(dag.maximal_active_time())?;
    let mut extended = Dag::from_parsed_lines(lines, Some(dag))?;
    if config.orient_clauses {
        orient_dag(&mut extended)?;
    }
    apply_print_options(&mut extended, config.print_options());

    let newly_visible: Vec<NodeId> = extended
        .nodes_in_active_dag(extended.maximal_active_time())?
        .into_iter()
        .filter(|id| !visible_before.contains(id))
        .collect();
    info!(
        "Extended dag by {} events: {} nodes, {} newly visible",
        lines.len(),
        extended.len(),
        newly_visible.len()
    );
    Ok((extended, newly_visible))
}

/// Set the print options of every literal of the Dag
pub fn apply_print_options(dag: &mut Dag, options: PrintOptions) {
    for node in dag.iter_mut() {
        if let Some(clause) = node.clause_mut() {
            clause.set_print_options(options);
        }
    }
}
