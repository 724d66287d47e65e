//! Parser for the saturation log printed by Vampire
//!
//! Recognised line forms:
//! - `[SA] new: 12. p(a) | q(X0) [resolution 3,7] {a:1,w:4}`
//! - `     replaced by 13. q(a) [subsumption resolution 12,5]`
//! - `7. ~p(X0) | q(X0) [cnf transformation 4]`

use indexmap::IndexMap;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, digit0, digit1},
    combinator::{all_consuming, map, map_res, value},
    multi::separated_list0,
    sequence::{delimited, separated_pair, terminated},
    IResult,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::logic::NodeId;

/// Everything after this marker is the printed proof, which repeats ids
const REFUTATION_MARKER: &str = "% Refutation found. Thanks to";

/// Kind of event a log line reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineType {
    #[serde(rename = "preprocessing")]
    Preprocessing,
    #[serde(rename = "new")]
    New,
    #[serde(rename = "active")]
    Active,
    #[serde(rename = "forward reduce")]
    ForwardReduce,
    #[serde(rename = "backward reduce")]
    BackwardReduce,
    #[serde(rename = "replaced by")]
    ReplacedBy,
    #[serde(rename = "using")]
    Using,
}

impl LineType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineType::Preprocessing => "preprocessing",
            LineType::New => "new",
            LineType::Active => "active",
            LineType::ForwardReduce => "forward reduce",
            LineType::BackwardReduce => "backward reduce",
            LineType::ReplacedBy => "replaced by",
            LineType::Using => "using",
        }
    }
}

impl fmt::Display for LineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One event of the prover log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedLine {
    pub line_type: LineType,
    pub unit_id: NodeId,
    pub unit_string: String,
    pub inference_rule: String,
    pub parents: Vec<NodeId>,
    #[serde(default, deserialize_with = "numeric_statistics")]
    pub statistics: IndexMap<String, i64>,
}

impl ParsedLine {
    pub fn new(
        line_type: LineType,
        unit_id: NodeId,
        unit_string: impl Into<String>,
        inference_rule: impl Into<String>,
        parents: Vec<NodeId>,
    ) -> Self {
        ParsedLine {
            line_type,
            unit_id,
            unit_string: unit_string.into(),
            inference_rule: inference_rule.into(),
            parents,
            statistics: IndexMap::new(),
        }
    }

    pub fn with_statistic(mut self, key: impl Into<String>, value: i64) -> Self {
        self.statistics.insert(key.into(), value);
        self
    }
}

fn numeric_statistics<'de, D>(deserializer: D) -> Result<IndexMap<String, i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = IndexMap::<String, serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(key, value)| value.as_i64().map(|v| (key, v)))
        .collect())
}

/// Parse a complete prover log, skipping lines that are not events
pub fn parse_vampire_output(text: &str) -> Vec<ParsedLine> {
    let mut parsed = Vec::new();
    for line in text.lines() {
        if line.starts_with(REFUTATION_MARKER) {
            break;
        }
        match parse_line(line) {
            LineOutcome::Event(event) => parsed.push(event),
            LineOutcome::Ignored => {}
            LineOutcome::Unrecognized => {
                if !line.trim().is_empty() {
                    warn!("'{}' does not match any pattern and will be skipped", line);
                }
            }
        }
    }
    debug!("Parsed {} events", parsed.len());
    parsed
}

enum LineOutcome {
    Event(ParsedLine),
    /// A recognised line that carries no event (passive clauses)
    Ignored,
    Unrecognized,
}

fn parse_line(line: &str) -> LineOutcome {
    if let Ok((rest, kind)) = saturation_prefix(line) {
        return match kind {
            "new" => unit_line(LineType::New, rest),
            "active" => unit_line(LineType::Active, rest),
            "forward reduce" => unit_line(LineType::ForwardReduce, rest),
            "backward reduce" => unit_line(LineType::BackwardReduce, rest),
            "passive" => LineOutcome::Ignored,
            _ => LineOutcome::Unrecognized,
        };
    }
    if let Ok((rest, line_type)) = reduction_prefix(line) {
        return unit_line(line_type, rest);
    }
    unit_line(LineType::Preprocessing, line)
}

fn unit_line(line_type: LineType, text: &str) -> LineOutcome {
    match parse_unit_line(text) {
        Some(fields) => LineOutcome::Event(ParsedLine {
            line_type,
            unit_id: fields.id,
            unit_string: fields.unit,
            inference_rule: fields.rule,
            parents: fields.parents,
            statistics: fields.statistics,
        }),
        None => LineOutcome::Unrecognized,
    }
}

/// `[SA] <kind>: `
fn saturation_prefix(input: &str) -> IResult<&str, &str> {
    delimited(
        tag("[SA] "),
        take_while1(|c: char| c.is_ascii_lowercase() || c == ' '),
        tag(": "),
    )(input)
}

/// Five spaces, then `replaced by ` or `using `
fn reduction_prefix(input: &str) -> IResult<&str, LineType> {
    let (input, _) = tag("     ")(input)?;
    alt((
        value(LineType::ReplacedBy, tag("replaced by ")),
        value(LineType::Using, tag("using ")),
    ))(input)
}

struct UnitLine {
    id: NodeId,
    unit: String,
    rule: String,
    parents: Vec<NodeId>,
    statistics: IndexMap<String, i64>,
}

/// `<id>. <unit> [<rule> <parents>]` with an optional ` {k:v,...}` suffix
fn parse_unit_line(text: &str) -> Option<UnitLine> {
    let (rest, id) = unit_id(text).ok()?;

    let (body, statistics) = match text.rfind(" {") {
        Some(start) if text.ends_with('}') && start >= text.len() - rest.len() => {
            let (_, stats) = all_consuming(statistics_block)(&text[start + 1..]).ok()?;
            (&text[text.len() - rest.len()..start], stats)
        }
        _ => (rest, IndexMap::new()),
    };

    let body = body.strip_suffix(']')?;
    let open = body.rfind(" [")?;
    let (_, (rule, parents)) = all_consuming(annotation)(&body[open + 2..]).ok()?;

    let unit = body[..open].trim_end().replace(['\'', '"'], "");
    Some(UnitLine {
        id,
        unit,
        rule: rule.trim().to_string(),
        parents,
        statistics,
    })
}

fn unit_id(input: &str) -> IResult<&str, NodeId> {
    terminated(map_res(digit1, str::parse::<NodeId>), tag(". "))(input)
}

/// `<rule> <p1>,<p2>,...`; rule names contain no digits
fn annotation(input: &str) -> IResult<&str, (&str, Vec<NodeId>)> {
    let (input, rule) = take_while(|c: char| !c.is_ascii_digit())(input)?;
    let (input, parents) = separated_list0(char(','), map_res(digit1, str::parse::<NodeId>))(input)?;
    Ok((input, (rule, parents)))
}

/// `{key:value,...}`; entries with an empty value are dropped
fn statistics_block(input: &str) -> IResult<&str, IndexMap<String, i64>> {
    map(
        delimited(
            char('{'),
            separated_list0(
                char(','),
                separated_pair(
                    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_'),
                    char(':'),
                    digit0,
                ),
            ),
            char('}'),
        ),
        |entries: Vec<(&str, &str)>| {
            entries
                .into_iter()
                .filter_map(|(key, value)| value.parse::<i64>().ok().map(|v| (key.to_string(), v)))
                .collect()
        },
    )(input)
}
