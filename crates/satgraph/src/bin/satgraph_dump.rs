//! Replay a prover log and print the resulting derivation graph

use satgraph::{
    dag_to_dot, load_saturation, parse_vampire_output, serialize_dag, Dag, SessionMode,
    VisualizerConfig,
};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <vampire_output> [options]", args[0]);
        eprintln!("\nOptions:");
        eprintln!("  --proof                Only show the derivation of the empty clause");
        eprintln!("  --dot                  Print the layout problem as a Graphviz digraph");
        eprintln!("  --json <file>          Save the session to <file>");
        eprintln!("  --config <file>        Load the visualizer configuration from <file>");
        std::process::exit(1);
    }

    let filename = &args[1];
    let mut proof_only = false;
    let mut print_dot = false;
    let mut json_output: Option<String> = None;
    let mut config_file: Option<String> = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--proof" => proof_only = true,
            "--dot" => print_dot = true,
            "--json" => {
                if i + 1 < args.len() {
                    json_output = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--config" => {
                if i + 1 < args.len() {
                    config_file = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
            }
        }
        i += 1;
    }

    let mut config = match config_file {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|text| VisualizerConfig::from_json(&text).map_err(|e| e.to_string()))
        {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load configuration {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => VisualizerConfig::default(),
    };
    if proof_only {
        config.mode = SessionMode::Proof;
    }

    let text = match std::fs::read_to_string(filename) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Failed to read {}: {}", filename, e);
            std::process::exit(1);
        }
    };

    let lines = parse_vampire_output(&text);
    let dag = match load_saturation(&lines, &config) {
        Ok(dag) => dag,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    print_summary(&dag);

    if print_dot {
        match dag_to_dot(&dag) {
            Ok(dot) => println!("\n{}", dot),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }

    if let Some(path) = json_output {
        let saved = serialize_dag(&dag)
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(&path, json).map_err(|e| e.to_string()));
        if let Err(e) = saved {
            eprintln!("Failed to save session to {}: {}", path, e);
            std::process::exit(1);
        }
        println!("\nSession saved to {}", path);
    }
}

fn print_summary(dag: &Dag) {
    println!(
        "=== {} nodes, {} activations, {} ===\n",
        dag.len(),
        dag.number_of_history_steps(),
        if dag.is_refutation() { "refutation found" } else { "no refutation" }
    );
    for node in dag.iter() {
        let times = format!(
            "new {} active {} deleted {}",
            format_time(node.new_time),
            format_time(node.active_time),
            format_time(node.deletion_time)
        );
        let text = match node.clause() {
            Some(clause) => clause.to_implication_string(),
            None => node.unit.to_string(),
        };
        println!(
            "[{}] {} {:?} ({}): {}",
            node.id, node.inference_rule, node.parents, times, text
        );
    }
}

fn format_time(time: Option<usize>) -> String {
    time.map(|t| t.to_string()).unwrap_or_else(|| "-".to_string())
}
