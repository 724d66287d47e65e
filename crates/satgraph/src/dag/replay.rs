//! Reconstruction of the derivation graph from prover events
//!
//! Time counts activations. A fresh construction starts at 0, an extension
//! continues from the latest activation of the base Dag. `new` events stamp
//! the current time, `active` events first advance it, reductions stamp the
//! current time as deletion time. A clause replacing a reduced clause is
//! therefore created at the deletion time of the clause it replaces.

use super::graph::{Dag, MergeMap};
use super::node::{SatNode, Time};
use crate::error::{ensure, Result, SatVisError};
use crate::logic::{is_equal, Clause, LiteralId, NodeId};
use crate::parser::{parse_clause, parse_unit, LineType, ParsedLine};
use indexmap::IndexMap;
use tracing::{debug, warn};

/// Statistic holding the number of selected literals of an activated clause
const SELECTED_LITERALS_KEY: &str = "nSel";

impl Dag {
    /// Replay `lines` into a new Dag, on top of a copy of `base` if given.
    ///
    /// The base Dag is never modified.
    pub fn from_parsed_lines(lines: &[ParsedLine], base: Option<&Dag>) -> Result<Dag> {
        let mut replay = match base {
            Some(base) => {
                ensure!(!base.is_passive_dag(), "a passive view cannot be extended");
                let (nodes, merge_map) = base.clone().into_parts();
                Replay {
                    nodes,
                    merge_map,
                    time: base.maximal_active_time(),
                    last_reduced: None,
                }
            }
            None => Replay {
                nodes: IndexMap::new(),
                merge_map: None,
                time: 0,
                last_reduced: None,
            },
        };
        let initial = replay.nodes.len();

        for line in lines {
            replay.apply(line)?;
        }

        debug!(
            "Replayed {} events: {} nodes ({} new), time {}",
            lines.len(),
            replay.nodes.len(),
            replay.nodes.len() - initial,
            replay.time
        );
        let merge_map = replay.merge_map;
        Ok(Dag::new(replay.nodes)?.with_merge_map(merge_map))
    }
}

struct Replay {
    nodes: IndexMap<NodeId, SatNode>,
    merge_map: Option<MergeMap>,
    time: Time,
    last_reduced: Option<NodeId>,
}

impl Replay {
    fn apply(&mut self, line: &ParsedLine) -> Result<()> {
        let id = line.unit_id;
        match line.line_type {
            LineType::Preprocessing => self.preprocessing(line),
            LineType::New => self.new_clause(line),
            LineType::Active => self.activate(line),
            LineType::ForwardReduce | LineType::BackwardReduce => {
                let time = self.time;
                let node = self.node_mut(id)?;
                ensure!(
                    node.deletion_time.is_none(),
                    "node {} was already deleted at time {:?}",
                    id,
                    node.deletion_time
                );
                node.deletion_time = Some(time);
                node.deletion_parents.clear();
                self.last_reduced = Some(id);
                Ok(())
            }
            LineType::ReplacedBy | LineType::Using => {
                let reduced = self.last_reduced.ok_or_else(|| {
                    SatVisError::consistency(format!(
                        "'{}' event for node {} without a preceding reduction",
                        line.line_type, id
                    ))
                })?;
                self.node_mut(reduced)?.deletion_parents.push(id);
                Ok(())
            }
        }
    }

    fn preprocessing(&mut self, line: &ParsedLine) -> Result<()> {
        let id = line.unit_id;
        ensure!(!self.nodes.contains_key(&id), "node {} already exists", id);
        for parent in &line.parents {
            let parent_node = self.node(*parent)?;
            ensure!(
                parent_node.is_from_preprocessing,
                "preprocessing node {} has non-preprocessing parent {}",
                id,
                parent
            );
        }
        let unit = parse_unit(&line.unit_string, true)?;
        let node = SatNode::new(
            id,
            unit,
            line.inference_rule.clone(),
            line.parents.clone(),
            line.statistics.clone(),
            true,
        );
        self.nodes.insert(id, node);
        Ok(())
    }

    fn new_clause(&mut self, line: &ParsedLine) -> Result<()> {
        let id = line.unit_id;
        let time = self.time;

        if let Some(existing) = self.nodes.get_mut(&id) {
            // a final preprocessing clause enters saturation
            ensure!(
                existing.is_from_preprocessing && existing.new_time.is_none(),
                "node {} already exists",
                id
            );
            existing.unit = parse_unit(&line.unit_string, false)?;
            existing.new_time = Some(time);
            existing
                .statistics
                .extend(line.statistics.iter().map(|(k, v)| (k.clone(), *v)));
            return Ok(());
        }

        let parents = self.rewrite_merged(&line.parents);
        for parent in &parents {
            ensure!(
                self.nodes.contains_key(parent),
                "parent {} of node {} does not exist",
                parent,
                id
            );
        }
        let mut node = SatNode::new(
            id,
            parse_unit(&line.unit_string, false)?,
            line.inference_rule.clone(),
            parents,
            line.statistics.clone(),
            false,
        );
        node.new_time = Some(time);
        self.nodes.insert(id, node);
        Ok(())
    }

    fn activate(&mut self, line: &ParsedLine) -> Result<()> {
        let id = line.unit_id;
        {
            let node = self.node(id)?;
            ensure!(node.new_time.is_some(), "node {} is activated before it was generated", id);
            ensure!(node.active_time.is_none(), "node {} is activated twice", id);
        }
        self.time += 1;
        let time = self.time;

        let node = self.node_mut(id)?;
        node.active_time = Some(time);
        node.statistics
            .extend(line.statistics.iter().map(|(k, v)| (k.clone(), *v)));
        let selected = line
            .statistics
            .get(SELECTED_LITERALS_KEY)
            .map(|&n| usize::try_from(n).unwrap_or(0));

        if let Some(clause) = node.clause_mut() {
            let order = active_literal_order(clause, &line.unit_string, id);
            if let Some(selected) = selected {
                for &literal in order.iter().take(selected) {
                    clause.literal_mut(literal)?.is_selected = true;
                }
            }
            clause.set_literals_active_event(order)?;
        }
        Ok(())
    }

    /// Rewrite ids removed by preprocessing-merging to the ids replacing them
    fn rewrite_merged(&self, parents: &[NodeId]) -> Vec<NodeId> {
        match &self.merge_map {
            None => parents.to_vec(),
            Some(merge_map) => parents
                .iter()
                .flat_map(|parent| match merge_map.get(parent) {
                    Some(replacements) => replacements.clone(),
                    None => vec![*parent],
                })
                .collect(),
        }
    }

    fn node(&self, id: NodeId) -> Result<&SatNode> {
        self.nodes
            .get(&id)
            .ok_or_else(|| SatVisError::consistency(format!("node {} does not exist", id)))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut SatNode> {
        self.nodes
            .get_mut(&id)
            .ok_or_else(|| SatVisError::consistency(format!("node {} does not exist", id)))
    }
}

/// Literal order printed with the activation, as indices into the clause's arena.
///
/// Each printed literal is bound to an unused equal literal of the clause;
/// if that fails the creation order is kept.
fn active_literal_order(clause: &Clause, text: &str, id: NodeId) -> Vec<LiteralId> {
    let fallback = || (0..clause.len()).collect::<Vec<_>>();
    let printed = match parse_clause(text) {
        Ok(printed) => printed,
        Err(e) => {
            warn!("Cannot read literal order of activated node {}: {}", id, e);
            return fallback();
        }
    };
    if printed.len() != clause.len() {
        warn!("Activated node {} prints {} literals, expected {}", id, printed.len(), clause.len());
        return fallback();
    }

    let mut used = vec![false; clause.len()];
    let mut order = Vec::with_capacity(clause.len());
    for literal in printed.literals_new_event() {
        let found = clause
            .literals_new_event()
            .iter()
            .enumerate()
            .find(|(index, candidate)| !used[*index] && is_equal(literal, candidate));
        match found {
            Some((index, _)) => {
                used[index] = true;
                order.push(index);
            }
            None => {
                warn!("Activated node {} prints literal {} it does not contain", id, literal);
                return fallback();
            }
        }
    }
    order
}
