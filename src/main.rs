//! Multi-Agent Failure Educator CLI
//!
//! One-shot: masft-educator <free text question>
//! Stats:    masft-educator --stats
//! Feedback: masft-educator --feedback <mode> <tactical|structural> <text> [rating] [comment]
//! REPL:     masft-educator (no args, or --repl)

use anyhow::{bail, Context, Result};
use masft_educator::{
    db::InteractionLog,
    report,
    router::QueryRouter,
    taxonomy::TaxonomyStore,
    types::SolutionType,
};
use std::io::{BufRead, Write};
use std::path::PathBuf;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let data_path = take_option(&mut args, "--data=")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/failure_modes.json"));
    let db_path = match take_option(&mut args, "--db=") {
        Some(p) => PathBuf::from(p),
        None => default_db_path()?,
    };

    let store = TaxonomyStore::load(&data_path);
    tracing::info!("loaded {} failure modes from {:?}", store.len(), data_path);
    if store.is_empty() {
        println!(
            "Warning: failure modes database not found or unreadable at {:?}; \
             queries will only return help text.",
            data_path
        );
    }

    let log = InteractionLog::open(&db_path)?;
    tracing::info!("interaction log at {:?}", db_path);

    match args.first().map(|s| s.as_str()) {
        Some("--stats") => {
            print!("{}", report::render_usage_report(&log)?);
            Ok(())
        }
        Some("--feedback") => run_feedback(&log, &args[1..]),
        Some("--repl") | None => run_repl(&store, &log),
        Some(flag) if flag.starts_with("--") => {
            eprintln!("Unknown option: {}", flag);
            eprintln!("Usage: masft-educator [--data=<path>] [--db=<path>]");
            eprintln!("       masft-educator <free text question>");
            eprintln!("       masft-educator --stats");
            eprintln!("       masft-educator --feedback <mode> <tactical|structural> <text> [rating] [comment]");
            std::process::exit(1)
        }
        Some(_) => run_query(&store, &log, &args.join(" ")),
    }
}

/// Pull a `--name=value` option out of the argument list, if present
fn take_option(args: &mut Vec<String>, prefix: &str) -> Option<String> {
    let pos = args.iter().position(|a| a.starts_with(prefix))?;
    let value = args.remove(pos);
    Some(value[prefix.len()..].to_string())
}

fn default_db_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("masft-educator");
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;
    Ok(data_dir.join("educator.db"))
}

/// One-shot: log the raw query, route it, print the document
fn run_query(store: &TaxonomyStore, log: &InteractionLog, query: &str) -> Result<()> {
    log.log_query(query)?;
    let mut router = QueryRouter::new(store);
    println!("{}", router.route(query));
    Ok(())
}

fn run_feedback(log: &InteractionLog, args: &[String]) -> Result<()> {
    let (mode, type_str, text) = match args {
        [mode, type_str, text, ..] => (mode, type_str, text),
        _ => bail!(
            "Usage: masft-educator --feedback <mode> <tactical|structural> <text> [rating] [comment]"
        ),
    };
    let solution_type = SolutionType::parse(type_str)
        .with_context(|| format!("Unknown solution type '{}', expected tactical or structural", type_str))?;
    let rating = match args.get(3) {
        Some(r) => Some(
            r.parse::<i64>()
                .with_context(|| format!("Rating must be an integer, got '{}'", r))?,
        ),
        None => None,
    };
    let comment = args.get(4).map(|s| s.as_str());

    let id = log.log_feedback(mode, solution_type, text, rating, comment)?;
    println!("Recorded feedback entry {}.", id);
    Ok(())
}

/// Line-oriented session: every plain line is logged and routed; `view`
/// records an explicit mode view the way a selection event would.
fn run_repl(store: &TaxonomyStore, log: &InteractionLog) -> Result<()> {
    let mut router = QueryRouter::new(store);
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    println!("Multi-Agent Failure Educator. Ask a question, or try:");
    println!("  list all failure modes | explain communication failures");
    println!("  view <mode> | stats | quit");

    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let line = line.trim();

        match line {
            "" => continue,
            "quit" | "exit" => break,
            "stats" => print!("{}", report::render_usage_report(log)?),
            _ => {
                if let Some(mode_name) = line.strip_prefix("view ") {
                    let mode_name = mode_name.trim();
                    // Views are recorded as given, resolved or not
                    log.log_view(mode_name)?;
                    match store.get(mode_name) {
                        Some(mode) => println!("{}", router.failure_mode_document(mode)),
                        None => println!("No failure mode named '{}'.", mode_name),
                    }
                } else {
                    log.log_query(line)?;
                    println!("{}", router.route(line));
                }
            }
        }
    }

    Ok(())
}
