//! Parser for the clause subset of the prover's unit syntax

use crate::error::{Result, SatVisError};
use crate::logic::{Clause, Literal, Term, Unit};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::char,
    combinator::{all_consuming, map, opt},
    multi::separated_list1,
    sequence::{delimited, preceded, tuple},
    IResult,
};

/// Parse the text of a unit.
///
/// Saturation units are always clauses. Preprocessing units are clauses only
/// if they use nothing but the symbols of the clause syntax; everything else
/// (quantified formulas, connectives) is kept as an opaque formula.
pub fn parse_unit(text: &str, is_from_preprocessing: bool) -> Result<Unit> {
    if !is_from_preprocessing || looks_like_clause(text) {
        parse_clause(text).map(Unit::Clause)
    } else {
        Ok(Unit::Formula(text.to_string()))
    }
}

fn looks_like_clause(text: &str) -> bool {
    !text.is_empty()
        && text.chars().all(|c| {
            c.is_ascii_alphanumeric() || "_()=,~!$ |'".contains(c)
        })
}

/// Parse a clause: literals separated by ` | `, or `$false` for the empty clause
pub fn parse_clause(text: &str) -> Result<Clause> {
    let text = text.trim();
    if text == "$false" {
        return Ok(Clause::new(Vec::new()));
    }
    all_consuming(separated_list1(tag(" | "), literal))(text)
        .map(|(_, literals)| Clause::new(literals))
        .map_err(|e| SatVisError::parse(format!("cannot parse clause '{}': {}", text, e)))
}

/// Parse a single literal
pub fn parse_literal(text: &str) -> Result<Literal> {
    all_consuming(literal)(text.trim())
        .map(|(_, literal)| literal)
        .map_err(|e| SatVisError::parse(format!("cannot parse literal '{}': {}", text, e)))
}

/// Parse a single term
pub fn parse_term(text: &str) -> Result<Term> {
    all_consuming(term)(text.trim())
        .map(|(_, term)| term)
        .map_err(|e| SatVisError::parse(format!("cannot parse term '{}': {}", text, e)))
}

fn literal(input: &str) -> IResult<&str, Literal> {
    alt((equality, negated_atom, atom))(input)
}

/// `lhs = rhs` or `lhs != rhs`
fn equality(input: &str) -> IResult<&str, Literal> {
    let (input, (lhs, negated, rhs)) = tuple((
        term,
        alt((map(tag(" != "), |_| true), map(tag(" = "), |_| false))),
        term,
    ))(input)?;
    Ok((input, Literal::equality(lhs, rhs, negated)))
}

fn negated_atom(input: &str) -> IResult<&str, Literal> {
    map(preceded(char('~'), atom), |positive| {
        Literal::new(positive.name(), positive.args().to_vec(), true)
    })(input)
}

/// Atoms are read as terms and then reinterpreted as predicate applications
fn atom(input: &str) -> IResult<&str, Literal> {
    map(term, |t| Literal::new(t.name(), t.args().to_vec(), false))(input)
}

fn term(input: &str) -> IResult<&str, Term> {
    let (input, name) = symbol(input)?;
    let (input, args) = opt(delimited(
        char('('),
        separated_list1(char(','), term),
        char(')'),
    ))(input)?;
    Ok((input, Term::new(name, args.unwrap_or_default())))
}

fn symbol(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || matches!(c, '_' | '$' | '\'' | '.' | '-'))(input)
}
