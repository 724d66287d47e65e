//! Integration tests for replaying prover output into derivation graphs

use satgraph::{
    load_saturation, merge_preprocessing, parse_vampire_output, Dag, LineType, ParsedLine,
    VisualizerConfig,
};

/// A small refutation with a preprocessing chain and a backward demodulation
const SATURATION_LOG: &str = "\
% Running in auto input_syntax mode. Trying TPTP
1. ! [X0] : (p(X0) => q(X0)) [input]
2. p(a) [input]
3. ~q(b) [input]
4. a = b [input]
5. ! [X0] : (~p(X0) | q(X0)) [ennf transformation 1]
6. ~p(X0) | q(X0) [cnf transformation 5]
[SA] new: 6. ~p(X0) | q(X0) [cnf transformation 5]
[SA] new: 2. p(a) [input]
[SA] new: 3. ~q(b) [input]
[SA] new: 4. a = b [input]
[SA] active: 4. a = b [input]
[SA] active: 2. p(a) [input]
[SA] backward reduce: 2. p(a) [input]
     replaced by 7. p(b) [backward demodulation 4,2]
     using 4. a = b [input]
[SA] new: 7. p(b) [backward demodulation 4,2]
[SA] active: 6. ~p(X0) | q(X0) [cnf transformation 5] {nSel:1,wLits:2}
[SA] passive: 7. p(b) [backward demodulation 4,2]
[SA] active: 7. p(b) [backward demodulation 4,2]
[SA] new: 8. q(b) [resolution 7,6]
[SA] active: 8. q(b) [resolution 7,6]
[SA] new: 9. $false [resolution 8,3]
% Refutation found. Thanks to Tanya!
% SZS status Unsatisfiable for problem
1. p(a) [input]
";

#[test]
fn test_log_is_parsed_up_to_the_refutation() {
    let lines = parse_vampire_output(SATURATION_LOG);
    assert_eq!(lines.first().map(|l| l.line_type), Some(LineType::Preprocessing));
    assert_eq!(lines.last().map(|l| l.unit_id), Some(9));
    assert!(lines.iter().all(|l| l.unit_string != "p(a)" || l.unit_id == 2));

    let reduce = lines
        .iter()
        .position(|l| l.line_type == LineType::BackwardReduce)
        .unwrap();
    assert_eq!(lines[reduce + 1].line_type, LineType::ReplacedBy);
    assert_eq!(lines[reduce + 2].line_type, LineType::Using);

    let active = lines
        .iter()
        .find(|l| l.line_type == LineType::Active && l.unit_id == 6)
        .unwrap();
    assert_eq!(active.statistics.get("nSel"), Some(&1));
    assert_eq!(active.inference_rule, "cnf transformation");
    assert_eq!(active.parents, vec![5]);
}

#[test]
fn test_replay_timestamps_and_deletions() {
    let lines = parse_vampire_output(SATURATION_LOG);
    let dag = Dag::from_parsed_lines(&lines, None).unwrap();

    assert_eq!(dag.len(), 9);
    assert_eq!(dag.maximal_active_time(), 5);
    assert_eq!(dag.number_of_history_steps(), 5);
    assert!(dag.is_refutation());

    let reduced = dag.get(2).unwrap();
    assert_eq!(reduced.active_time, Some(2));
    assert_eq!(reduced.deletion_time, Some(2));
    assert_eq!(reduced.deletion_parents, vec![7, 4]);
    assert_eq!(dag.get(7).unwrap().new_time, Some(2));

    // the preprocessing formula stays a formula, the clause is parsed
    assert!(dag.get(1).unwrap().clause().is_none());
    assert!(dag.get(6).unwrap().is_from_preprocessing);
    assert_eq!(dag.get(6).unwrap().new_time, Some(0));
    let selected: Vec<bool> = dag
        .get(6)
        .unwrap()
        .clause()
        .unwrap()
        .literals_new_event()
        .iter()
        .map(|l| l.is_selected)
        .collect();
    assert_eq!(selected, vec![true, false]);
}

#[test]
fn test_visible_nodes_grow_with_time() {
    let lines = parse_vampire_output(SATURATION_LOG);
    let dag = Dag::from_parsed_lines(&lines, None).unwrap();

    let at_start: Vec<_> = dag.nodes_in_active_dag(0).unwrap().into_iter().collect();
    assert_eq!(at_start, vec![1, 2, 3, 4, 5, 6]);
    let at_end = dag.nodes_in_active_dag(dag.maximal_active_time()).unwrap();
    assert!(at_end.contains(&7) && at_end.contains(&8));
    assert!(!at_end.contains(&9));

    assert!(dag.node_is_input_node(1).unwrap());
    assert!(!dag.node_is_input_node(6).unwrap());
    assert!(dag.node_is_input_node(42).is_err());
}

#[test]
fn test_merged_preprocessing_rewrites_later_parents() {
    let preprocessing = parse_vampire_output(
        "1. ! [X0] : p(X0) [input]\n2. p(X0) [cnf transformation 1]\n3. p(X0) [duplicate literal removal 2]\n",
    );
    let dag = merge_preprocessing(&Dag::from_parsed_lines(&preprocessing, None).unwrap()).unwrap();
    assert!(!dag.contains(2));
    assert_eq!(dag.get(3).unwrap().parents, vec![1]);

    // an extension citing the merged node is rewritten to its replacement
    let saturation = parse_vampire_output("[SA] new: 10. p(X0) [some rule 2]\n");
    let extended = Dag::from_parsed_lines(&saturation, Some(&dag)).unwrap();
    assert_eq!(extended.get(10).unwrap().parents, vec![1]);
    assert!(!dag.contains(10));
}

#[test]
fn test_extension_activates_after_the_base() {
    let base_lines = vec![
        ParsedLine::new(LineType::New, 2, "p(a)", "input", vec![]),
        ParsedLine::new(LineType::Active, 2, "p(a)", "input", vec![]),
    ];
    let base = Dag::from_parsed_lines(&base_lines, None).unwrap();
    assert_eq!(base.maximal_active_time(), 1);

    let lines = vec![
        ParsedLine::new(LineType::New, 1, "$false", "trivial inequality removal", vec![2]),
        ParsedLine::new(LineType::Active, 1, "$false", "trivial inequality removal", vec![2]),
    ];
    let dag = Dag::from_parsed_lines(&lines, Some(&base)).unwrap();
    let node = dag.get(1).unwrap();
    assert_eq!(node.active_time, Some(base.maximal_active_time() + 1));
    assert_eq!(node.active_time, Some(dag.maximal_active_time()));
    let clause = node.clause().unwrap();
    assert!(clause.premise_literals().is_empty());
    assert!(clause.conclusion_literals().is_empty());
    assert!(base.get(1).is_err());
}

#[test]
fn test_malformed_streams_are_consistency_errors() {
    let activated_twice = vec![
        ParsedLine::new(LineType::New, 1, "p(a)", "input", vec![]),
        ParsedLine::new(LineType::Active, 1, "p(a)", "input", vec![]),
        ParsedLine::new(LineType::Active, 1, "p(a)", "input", vec![]),
    ];
    assert!(Dag::from_parsed_lines(&activated_twice, None)
        .unwrap_err()
        .is_consistency());

    let missing_parent = vec![ParsedLine::new(LineType::New, 2, "p(a)", "resolution", vec![1])];
    assert!(Dag::from_parsed_lines(&missing_parent, None)
        .unwrap_err()
        .is_consistency());

    let reused_id = vec![
        ParsedLine::new(LineType::New, 1, "p(a)", "input", vec![]),
        ParsedLine::new(LineType::New, 1, "p(a)", "input", vec![]),
    ];
    assert!(Dag::from_parsed_lines(&reused_id, None)
        .unwrap_err()
        .is_consistency());
}

#[test]
fn test_event_json_form() {
    let json = r#"[
        {"lineType": "preprocessing", "unitId": 1, "unitString": "p(a)", "inferenceRule": "input",
         "parents": [], "statistics": {}},
        {"lineType": "new", "unitId": 1, "unitString": "p(a)", "inferenceRule": "input",
         "parents": [], "statistics": {"age": 0, "comment": "ignored"}}
    ]"#;
    let lines: Vec<ParsedLine> = serde_json::from_str(json).unwrap();
    assert_eq!(lines[1].line_type, LineType::New);
    assert_eq!(lines[1].statistics.len(), 1);

    let dag = load_saturation(&lines, &VisualizerConfig::default()).unwrap();
    assert_eq!(dag.get(1).unwrap().new_time, Some(0));
}
