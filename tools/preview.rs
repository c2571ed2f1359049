/// Preview — play a dialogue graph or script in the terminal.
///
/// Usage: preview (--tree <path> | --script <path>) [--config <path>] [--slots <n>]
///
/// Commands:
///   <n>         — click option slot n (1-based)
///   e           — interact (open / close, or next line for scripts)
///   tick <sec>  — advance effects by <sec> seconds
///   score       — show the current score
///   reset       — reset the score
///   help        — list commands
///   quit        — exit

use npc_dialogue::core::config::NpcConfig;
use npc_dialogue::core::conversation::ScriptedConversation;
use npc_dialogue::core::display::HeadlessDisplay;
use npc_dialogue::core::proximity::ActorKind;
use npc_dialogue::core::scene::SceneQueue;
use npc_dialogue::core::score::Scoreboard;
use npc_dialogue::core::session::{DialogueSession, Host};
use npc_dialogue::schema::graph::DialogueGraph;
use npc_dialogue::schema::script::DialogueScript;
use std::io::{self, BufRead, Write};
use std::path::Path;

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return;
    }

    let mut tree_path = None;
    let mut script_path = None;
    let mut config_path = None;
    let mut slots = 3usize;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--tree" if i + 1 < args.len() => {
                i += 1;
                tree_path = Some(args[i].clone());
            }
            "--script" if i + 1 < args.len() => {
                i += 1;
                script_path = Some(args[i].clone());
            }
            "--config" if i + 1 < args.len() => {
                i += 1;
                config_path = Some(args[i].clone());
            }
            "--slots" if i + 1 < args.len() => {
                i += 1;
                slots = args[i].parse().unwrap_or(3);
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let config = match config_path {
        Some(ref path) => NpcConfig::load_from_ron(Path::new(path)).unwrap_or_else(|e| {
            eprintln!("ERROR: Failed to load config: {}", e);
            std::process::exit(1);
        }),
        None => NpcConfig::default(),
    };

    if let Some(ref path) = tree_path {
        let graph = DialogueGraph::load_from_ron(Path::new(path)).unwrap_or_else(|e| {
            eprintln!("ERROR: Failed to load dialogue tree: {}", e);
            std::process::exit(1);
        });
        println!("Loaded '{}' with {} nodes", graph.npc_name(), graph.len());
        run_tree(&graph, config, slots);
    } else if let Some(ref path) = script_path {
        let script = DialogueScript::load_from_ron(Path::new(path)).unwrap_or_else(|e| {
            eprintln!("ERROR: Failed to load script: {}", e);
            std::process::exit(1);
        });
        println!("Loaded '{}' with {} lines", script.npc_name, script.lines.len());
        run_script(&script, config);
    } else {
        print_usage();
        std::process::exit(1);
    }
}

fn run_tree(graph: &DialogueGraph, config: NpcConfig, slots: usize) {
    let mut display = HeadlessDisplay::new(slots);
    let mut score = Scoreboard::new();
    let mut scenes = SceneQueue::new();
    let mut session = DialogueSession::with_config(graph, config);
    session.on_trigger_enter(ActorKind::Player);

    println!("Type 'e' to talk, 'help' for commands.\n");

    while let Some(line) = prompt("tree> ") {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }
        let mut host = Host::new(&mut display, &mut score, &mut scenes);

        match parts[0] {
            "quit" | "exit" | "q" => break,
            "help" | "h" | "?" => print_help(),
            "e" => {
                session.interact(&mut host);
            }
            "tick" => {
                let dt = parts.get(1).and_then(|s| s.parse().ok()).unwrap_or(0.1);
                session.tick(dt, None, &mut host);
            }
            "score" => println!("Score: {}", host.score.get()),
            "reset" => {
                host.score.reset();
                println!("Score reset.");
            }
            other => match other.parse::<usize>() {
                Ok(n) if n > 0 => {
                    session.click_slot(n - 1, &mut host);
                }
                _ => println!("Unknown command: {}", other),
            },
        }

        for scene in scenes.drain() {
            println!(">> Loading scene '{}'", scene);
        }
        print_panel(&display);
    }
}

fn run_script(script: &DialogueScript, config: NpcConfig) {
    let typing_speed = config.typing_speed;
    let mut display = HeadlessDisplay::new(0);
    let mut convo = ScriptedConversation::with_config(script, config);
    convo.on_trigger_enter(ActorKind::Player);

    println!("Type 'e' to talk, 'help' for commands.\n");

    while let Some(line) = prompt("script> ") {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }

        match parts[0] {
            "quit" | "exit" | "q" => break,
            "help" | "h" | "?" => print_help(),
            "e" => {
                convo.interact(&mut display);
            }
            "tick" => {
                let dt = parts
                    .get(1)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(typing_speed);
                convo.tick(dt, None, &mut display);
            }
            other => println!("Unknown command: {}", other),
        }

        for cue in display.cues.drain(..) {
            println!("   ~ {}", cue);
        }
        print_panel(&display);
    }
}

fn prompt(label: &str) -> Option<String> {
    print!("{}", label);
    io::stdout().flush().ok();

    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}

fn print_panel(display: &HeadlessDisplay) {
    if !display.panel_visible {
        println!("(no conversation)");
        return;
    }
    let portrait = display.portrait.as_deref().unwrap_or("-");
    println!("[{} | {} x{:.2}]", display.speaker, portrait, display.portrait_scale);
    println!("  {}", display.text);
    for (slot, label) in display.visible_slots() {
        println!("  {}) {}", slot + 1, label);
    }
}

fn print_usage() {
    println!("Usage: preview (--tree <path> | --script <path>) [--config <path>] [--slots <n>]");
}

fn print_help() {
    println!("Commands:");
    println!("  <n>         click option slot n");
    println!("  e           interact");
    println!("  tick <sec>  advance effects");
    println!("  score       show score (trees only)");
    println!("  reset       reset score (trees only)");
    println!("  quit        exit");
}
