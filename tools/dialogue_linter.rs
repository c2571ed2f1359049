/// Dialogue Linter — structural checks for RON dialogue graphs.
///
/// Usage: dialogue_linter <graph.ron|dir> [--slots <n>]

use npc_dialogue::schema::graph::DialogueGraph;
use std::path::Path;
use std::process;

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: dialogue_linter <graph.ron|dir> [--slots <n>]");
        process::exit(0);
    }

    let target = &args[1];
    let mut slots = 3usize;

    let mut i = 2;
    while i < args.len() {
        if args[i] == "--slots" && i + 1 < args.len() {
            i += 1;
            slots = args[i].parse().unwrap_or_else(|_| {
                eprintln!("ERROR: --slots must be a number");
                process::exit(1);
            });
        }
        i += 1;
    }

    let path = Path::new(target);
    let mut files = Vec::new();
    if path.is_file() {
        files.push(path.to_path_buf());
    } else if path.is_dir() {
        collect_ron_files(path, &mut files);
    } else {
        eprintln!("ERROR: Path '{}' does not exist", target);
        process::exit(1);
    }

    let mut total_errors = 0;
    let mut total_warnings = 0;

    for file in &files {
        println!("\n=== {} ===", file.display());
        let graph = match DialogueGraph::load_from_ron(file) {
            Ok(g) => g,
            Err(e) => {
                println!("ERROR: {}", e);
                total_errors += 1;
                continue;
            }
        };

        let (errors, warnings) = lint_graph(&graph, slots);
        if errors.is_empty() && warnings.is_empty() {
            println!("All checks passed ({} nodes)", graph.len());
        }
        for warning in &warnings {
            println!("WARNING: {}", warning);
        }
        for error in &errors {
            println!("ERROR: {}", error);
        }
        total_errors += errors.len();
        total_warnings += warnings.len();
    }

    println!(
        "\nSummary: {} files, {} errors, {} warnings",
        files.len(),
        total_errors,
        total_warnings
    );

    if total_errors == 0 {
        process::exit(0);
    } else {
        process::exit(1);
    }
}

fn collect_ron_files(dir: &Path, files: &mut Vec<std::path::PathBuf>) {
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                collect_ron_files(&path, files);
            } else if path.file_name().and_then(|s| s.to_str()) == Some("tree.ron") {
                files.push(path);
            }
        }
    }
}

/// Returns (errors, warnings) for one graph.
fn lint_graph(graph: &DialogueGraph, slots: usize) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if graph.start().is_none() {
        warnings.push("no start node; this NPC will never talk".to_string());
    }

    for id in graph.unreachable() {
        if let Some(node) = graph.node(id) {
            warnings.push(format!("node '{}' is unreachable from the start node", node.key));
        }
    }

    for id in graph.trapped() {
        if let Some(node) = graph.node(id) {
            errors.push(format!(
                "node '{}' can never reach the end of the conversation",
                node.key
            ));
        }
    }

    for node in graph.nodes() {
        if node.options.len() > slots {
            errors.push(format!(
                "node '{}' has {} options but only {} slots",
                node.key,
                node.options.len(),
                slots
            ));
        }
        if node.text.trim().is_empty() {
            warnings.push(format!("node '{}' has no text", node.key));
        }
        for (i, option) in node.options.iter().enumerate() {
            if option.text.trim().is_empty() {
                errors.push(format!("node '{}' option {} has no label", node.key, i));
            }
        }
        if node.next_scene.as_deref() == Some("") {
            warnings.push(format!("node '{}' names an empty scene", node.key));
        }
    }

    (errors, warnings)
}
