//! Integration tests for literal provenance and clause orientation

use satgraph::logic::is_equal;
use satgraph::{
    change_literal_orientation, change_literal_representation, compute_parent_literals,
    load_saturation, parse_vampire_output, Dag, LineType, Literal, LiteralRef, OrientationReason,
    ParsedLine, Partition, Term, VisualizerConfig,
};

fn replay(lines: &[ParsedLine]) -> satgraph::Result<Dag> {
    let mut dag = Dag::from_parsed_lines(lines, None)?;
    compute_parent_literals(&mut dag)?;
    Ok(dag)
}

fn links(dag: &Dag, id: usize) -> Vec<Option<LiteralRef>> {
    dag.get(id)
        .unwrap()
        .clause()
        .unwrap()
        .literals_new_event()
        .iter()
        .map(|literal| literal.literal_in_parent)
        .collect()
}

fn link(node: usize, index: usize) -> Option<LiteralRef> {
    Some(LiteralRef { node, index })
}

/// A derived clause with one literal removed from the three literals of its main premise
fn removal(child: &str) -> satgraph::Result<Dag> {
    replay(&[
        ParsedLine::new(LineType::New, 1, "p(a) | q(b) | r(c)", "input", vec![]),
        ParsedLine::new(LineType::New, 2, "~q(b)", "input", vec![]),
        ParsedLine::new(LineType::New, 3, child, "subsumption resolution", vec![1, 2]),
    ])
}

#[test]
fn test_resolution_inherits_from_second_premise() {
    let lines = parse_vampire_output(
        "\
[SA] new: 1. p(a) [input]
[SA] new: 2. ~p(a) | q(b) [input]
[SA] active: 1. p(a) [input]
[SA] active: 2. ~p(a) | q(b) [input]
[SA] new: 3. q(b) [resolution 1,2]
",
    );
    let mut dag = load_saturation(&lines, &VisualizerConfig::default()).unwrap();
    assert_eq!(links(&dag, 3), vec![link(2, 1)]);

    let premise = dag.get(2).unwrap().clause().unwrap();
    assert_eq!(premise.to_implication_string(), "~p(a) => q(b)");
    let resolvent = dag.get(3).unwrap().clause().unwrap();
    assert_eq!(resolvent.partition_of(0), Some((Partition::Conclusion, 0)));
    assert_eq!(resolvent.literal(0).unwrap().orientation_reason, OrientationReason::Inherited);

    // moving q(b) in the premise moves it in the resolvent too
    let changed =
        change_literal_orientation(&mut dag, 2, (Partition::Conclusion, 0), (Partition::Context, 0))
            .unwrap();
    assert!(changed.contains(&3));
    let resolvent = dag.get(3).unwrap().clause().unwrap();
    assert_eq!(resolvent.partition_of(0), Some((Partition::Context, 0)));
    assert_eq!(resolvent.to_implication_string(), "[q(b)] $true => $false");
}

#[test]
fn test_exact_correspondence() {
    let dag = replay(&[
        ParsedLine::new(LineType::New, 1, "p(a) | q(b)", "input", vec![]),
        ParsedLine::new(LineType::New, 2, "p(a) | q(b)", "evaluation", vec![1]),
    ])
    .unwrap();
    assert_eq!(links(&dag, 2), vec![link(1, 0), link(1, 1)]);
    assert_eq!(links(&dag, 1), vec![None, None]);
}

#[test]
fn test_single_removal_at_any_position() {
    let cases = [("q(b) | r(c)", [1, 2]), ("p(a) | r(c)", [0, 2]), ("p(a) | q(b)", [0, 1])];
    for (child, surviving) in cases {
        let dag = removal(child).unwrap();
        assert_eq!(
            links(&dag, 3),
            vec![link(1, surviving[0]), link(1, surviving[1])],
            "removal leading to {}",
            child
        );
    }
}

#[test]
fn test_removal_count_mismatch_is_an_error() {
    assert!(removal("p(a)").unwrap_err().is_consistency());
    assert!(removal("p(a) | q(b) | r(c)").unwrap_err().is_consistency());
    // same count, but not the same literals
    assert!(removal("p(a) | s(d)").unwrap_err().is_consistency());
}

#[test]
fn test_equality_matches_commutatively() {
    let a = || Term::symbol("a");
    let b = || Term::symbol("b");
    assert!(is_equal(
        &Literal::equality(a(), b(), false),
        &Literal::equality(b(), a(), false)
    ));
    assert!(!is_equal(
        &Literal::equality(a(), b(), false),
        &Literal::equality(b(), a(), true)
    ));

    let dag = replay(&[
        ParsedLine::new(LineType::New, 1, "a = b | b = a | p(a)", "input", vec![]),
        ParsedLine::new(LineType::New, 2, "b = a | p(a)", "duplicate literal removal", vec![1]),
    ])
    .unwrap();
    assert_eq!(links(&dag, 2), vec![link(1, 0), link(1, 2)]);
}

#[test]
fn test_representation_follows_the_user() {
    let lines = parse_vampire_output(
        "\
[SA] new: 1. a = b | p(a) [input]
[SA] new: 2. a = b | p(a) [evaluation 1]
",
    );
    let mut dag = load_saturation(&lines, &VisualizerConfig::default()).unwrap();
    let changed = change_literal_representation(&mut dag, 1, 0).unwrap();
    assert!(changed.contains(&2));

    let clause = dag.get(1).unwrap().clause().unwrap();
    assert_eq!(clause.to_implication_string(), "$true => b = a | p(a)");
    assert_eq!(clause.literal(0).unwrap().orientation_reason, OrientationReason::Heuristic);
    let derived = dag.get(2).unwrap().clause().unwrap();
    assert_eq!(derived.to_implication_string(), "$true => b = a | p(a)");

    assert!(change_literal_representation(&mut dag, 1, 5).unwrap_err().is_consistency());
}
