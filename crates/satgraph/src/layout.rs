//! Layout of a Dag through an external graph-layout engine
//!
//! The layout problem is encoded as a Graphviz digraph; the engine returns a
//! position per node, usually by running `dot -Tplain` and reading its output
//! with [`parse_plain_layout`].

use crate::dag::Dag;
use crate::error::{ensure, Result, SatVisError};
use crate::logic::NodeId;
use indexmap::IndexSet;
use nom::{
    bytes::complete::tag,
    character::complete::{digit1, space1},
    combinator::map_res,
    number::complete::double,
    sequence::{preceded, tuple},
    IResult,
};
use std::collections::HashMap;
use tracing::debug;

pub type Position = (f64, f64);

/// Black-box layout computation
pub trait LayoutEngine {
    /// Positions for the nodes of a Graphviz digraph whose node names are ids
    fn layout(&mut self, dot: &str) -> Result<HashMap<NodeId, Position>>;
}

/// Encode the layout of `dag` as a Graphviz digraph.
///
/// Input nodes are ranked first, the remaining preprocessing nodes share a
/// rank, saturation nodes are only laid out if they contribute to an
/// activated clause. Fails if the Dag was already laid out.
pub fn dag_to_dot(dag: &Dag) -> Result<String> {
    let nodes_in_active_dag = dag.nodes_in_active_dag(usize::MAX)?;

    let mut input = Vec::new();
    let mut preprocessing = Vec::new();
    let mut other = Vec::new();
    for node in dag.iter() {
        ensure!(node.position.is_none(), "the dag has already been laid out");
        let statement = node_statement(node.id, &node.unit.to_string());
        if node.is_from_preprocessing {
            if dag.node_is_input_node(node.id)? {
                input.push(statement);
            } else {
                preprocessing.push(statement);
            }
        } else if nodes_in_active_dag.contains(&node.id) {
            other.push(statement);
        }
    }

    let mut edges = Vec::new();
    for node in dag.iter() {
        if node.is_from_preprocessing || nodes_in_active_dag.contains(&node.id) {
            edges.extend(node.parents.iter().map(|parent| format!("{} -> {}", parent, node.id)));
        }
    }

    Ok(format!(
        "digraph {{\n\n{}\n\n{}\n\n{}\n\n   {}\n}}",
        subgraph("inputgraph", Some("source"), &input),
        subgraph("preprocessinggraph", Some("same"), &preprocessing),
        subgraph("othergraph", None, &other),
        edges.join(";\n   ")
    ))
}

/// Lay out the whole Dag, writing each returned position exactly once
pub fn layout_dag(dag: &mut Dag, engine: &mut dyn LayoutEngine) -> Result<()> {
    let dot = dag_to_dot(dag)?;
    let positions = engine.layout(&dot)?;
    for (id, position) in &positions {
        let node = dag.get_mut(*id)?;
        ensure!(node.position.is_none(), "node {} was positioned twice", id);
        node.position = Some(*position);
    }
    debug!("Laid out {} of {} nodes", positions.len(), dag.len());
    Ok(())
}

/// Lay out the nodes `ids` on their own and move them so that the first one
/// lands at `position`.
///
/// Only edges between the given nodes take part in the layout. Used to place
/// the nodes that an extension made visible next to the existing drawing.
pub fn layout_nodes_at_position(
    dag: &mut Dag,
    ids: &[NodeId],
    engine: &mut dyn LayoutEngine,
    position: Position,
) -> Result<()> {
    let Some(&anchor) = ids.first() else {
        return Ok(());
    };
    let selected: IndexSet<NodeId> = ids.iter().copied().collect();

    let mut statements = Vec::new();
    let mut edges = Vec::new();
    for &id in &selected {
        let node = dag.get(id)?;
        ensure!(node.position.is_none(), "node {} has already been laid out", id);
        statements.push(node_statement(id, &node.unit.to_string()));
        edges.extend(
            node.parents
                .iter()
                .filter(|parent| selected.contains(*parent))
                .map(|parent| format!("{} -> {}", parent, id)),
        );
    }
    let dot = format!(
        "digraph {{\n\n{}\n\n   {}\n}}",
        subgraph("othergraph", None, &statements),
        edges.join(";\n   ")
    );

    let positions = engine.layout(&dot)?;
    let (anchor_x, anchor_y) = *positions
        .get(&anchor)
        .ok_or_else(|| SatVisError::consistency(format!("no position computed for node {}", anchor)))?;
    let (dx, dy) = (position.0 - anchor_x, position.1 - anchor_y);
    for &id in &selected {
        let (x, y) = *positions
            .get(&id)
            .ok_or_else(|| SatVisError::consistency(format!("no position computed for node {}", id)))?;
        dag.get_mut(id)?.position = Some((x + dx, y + dy));
    }
    Ok(())
}

/// Read node positions from Graphviz `plain` output.
///
/// Only `node <id> <x> <y> ...` lines are read; everything after the
/// coordinates (size, label, style) is ignored.
pub fn parse_plain_layout(text: &str) -> Result<HashMap<NodeId, Position>> {
    let mut positions = HashMap::new();
    for line in text.lines().filter(|line| line.starts_with("node ")) {
        let (_, (id, x, y)) = plain_node_line(line)
            .map_err(|e| SatVisError::parse(format!("invalid layout line '{}': {}", line, e)))?;
        positions.insert(id, (x, y));
    }
    Ok(positions)
}

fn plain_node_line(input: &str) -> IResult<&str, (NodeId, f64, f64)> {
    tuple((
        preceded(tag("node "), map_res(digit1, str::parse::<NodeId>)),
        preceded(space1, double),
        preceded(space1, double),
    ))(input)
}

fn node_statement(id: NodeId, label: &str) -> String {
    let label = label.replace('\\', "\\\\").replace('"', "\\\"");
    format!("{} [label=\"{}\"]", id, label)
}

fn subgraph(name: &str, rank: Option<&str>, statements: &[String]) -> String {
    let rank = rank.map(|r| format!("rank={};\n      ", r)).unwrap_or_default();
    format!("   subgraph {} {{\n      {}{}\n   }}", name, rank, statements.join(";\n      "))
}
