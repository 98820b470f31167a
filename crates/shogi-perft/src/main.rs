//! shogi-perft - perft counts, legal move listing and rule status for shogi
//! positions given as USI `position` commands.

mod config;
mod json_output;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use config::SuiteConfig;
use json_output::PerftRecord;
use shogi_engine::{legal_all, perft, perft_divide, EnteringKingRule, Position};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "shogi-perft")]
#[command(about = "Shogi move generator testing tool")]
struct Cli {
    /// Log filter such as "debug" or "shogi_engine=trace"; overrides RUST_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count leaf nodes to a fixed depth
    Perft {
        /// Search depth
        #[arg(short, long, default_value = "3")]
        depth: u32,
        /// USI position command, e.g. "startpos moves 7g7f"
        #[arg(short, long, default_value = "startpos")]
        position: String,
        /// Print the node count below each root move
        #[arg(long)]
        divide: bool,
        /// Emit a JSON line instead of text
        #[arg(long)]
        json: bool,
    },
    /// List the legal moves of a position
    Moves {
        #[arg(short, long, default_value = "startpos")]
        position: String,
    },
    /// Show check, mate, repetition and declaration status
    Status {
        #[arg(short, long, default_value = "startpos")]
        position: String,
        /// Entering king rule: none, point24, point27 or try
        #[arg(long, default_value = "point27")]
        rule: EnteringKingRule,
    },
    /// Run a perft suite from a TOML file
    Suite {
        #[arg(default_value = "perft.toml")]
        path: PathBuf,
        /// Emit JSON lines instead of text
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(level: Option<&str>) -> anyhow::Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level)
            .with_context(|| format!("invalid log filter '{level}'"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn setup(position: &str) -> anyhow::Result<Position> {
    let mut pos = Position::startpos();
    pos.set_usi_position(position)
        .with_context(|| format!("cannot set up '{position}'"))?;
    Ok(pos)
}

fn run_perft(position: &str, depth: u32, divide: bool, json: bool) -> anyhow::Result<()> {
    let mut pos = setup(position)?;
    let sfen = pos.to_sfen();
    info!(%sfen, depth, "perft");

    let start = Instant::now();
    let nodes = if divide {
        let results = perft_divide(&mut pos, depth);
        if !json {
            for (token, count) in &results {
                println!("{token}: {count}");
            }
        }
        results.iter().map(|(_, n)| n).sum::<u64>()
    } else {
        perft(&mut pos, depth)
    };
    let millis = start.elapsed().as_millis();

    let record = PerftRecord::new("cli", sfen, depth, nodes, None, millis);
    if json {
        json_output::write_line(std::io::stdout().lock(), &record)?;
    } else {
        println!("nodes {}", record.nodes);
        println!("time {} ms ({} nps)", record.millis, record.nps);
    }
    Ok(())
}

fn run_moves(position: &str) -> anyhow::Result<()> {
    let pos = setup(position)?;
    let moves = legal_all(&pos);
    let mut tokens: Vec<String> = moves.as_slice().iter().map(|m| m.to_usi()).collect();
    tokens.sort();
    println!("{} legal moves", tokens.len());
    println!("{}", tokens.join(" "));
    Ok(())
}

fn run_status(position: &str, rule: EnteringKingRule) -> anyhow::Result<()> {
    let pos = setup(position)?;
    println!("sfen {}", pos.to_sfen());
    println!("side to move {}", pos.side_to_move());
    println!("key {:#034x}", pos.key());

    let checkers: Vec<String> = pos.checkers().into_iter().map(|sq| sq.to_usi()).collect();
    if checkers.is_empty() {
        println!("in check no");
    } else {
        println!("in check yes ({})", checkers.join(" "));
    }

    let moves = legal_all(&pos);
    println!("legal moves {}", moves.len());
    if moves.is_empty() {
        println!("mated yes");
    }
    println!("repetition {:?}", pos.repetition_state());

    let declaration = pos.declaration_win(rule);
    if declaration.is_none() {
        println!("declaration ({rule}) none");
    } else {
        println!("declaration ({rule}) {declaration}");
    }
    if pos.is_handicapped() {
        println!("handicapped, piece box {} pieces", pos.piece_box().total());
    }
    Ok(())
}

fn run_suite(path: &Path, json: bool) -> anyhow::Result<()> {
    let suite = SuiteConfig::load(path)
        .with_context(|| format!("cannot load suite {}", path.display()))?;
    debug!(positions = suite.positions.len(), max_depth = suite.max_depth, "suite loaded");

    let mut failures = 0usize;
    let mut checks = 0usize;
    for entry in &suite.positions {
        let mut pos = entry.setup()?;
        let sfen = pos.to_sfen();
        for depth in entry.depths(suite.max_depth) {
            let start = Instant::now();
            let nodes = perft(&mut pos, depth);
            let millis = start.elapsed().as_millis();
            let expected = entry.expected_at(depth);
            let record = PerftRecord::new(&entry.name, sfen.clone(), depth, nodes, expected, millis);

            checks += 1;
            if record.passed == Some(false) {
                failures += 1;
                warn!(name = %entry.name, depth, nodes, ?expected, "perft mismatch");
            }

            if json {
                json_output::write_line(std::io::stdout().lock(), &record)?;
            } else {
                let verdict = match record.passed {
                    Some(true) => "ok",
                    Some(false) => "FAIL",
                    None => "-",
                };
                println!(
                    "{:<24} depth {:>2} nodes {:>12} {:>5} ({} ms)",
                    entry.name, depth, nodes, verdict, millis
                );
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {checks} perft checks failed");
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref())?;

    match cli.command {
        Commands::Perft {
            depth,
            position,
            divide,
            json,
        } => run_perft(&position, depth, divide, json),
        Commands::Moves { position } => run_moves(&position),
        Commands::Status { position, rule } => run_status(&position, rule),
        Commands::Suite { path, json } => run_suite(&path, json),
    }
}
