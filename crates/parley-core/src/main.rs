//! Conversation simulator command line.
//!
//! Plays one or more conversations from a TOML configuration and/or flags,
//! then prints per-strategy averages (or every report as JSON).

use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

use parley_core::config::RosterSpec;
use parley_core::summary::{render_table, summarize};
use parley_core::{default_config_toml, initialize, run, PlayerKind, SimConfig};
use parley_model::FinalReport;

/// Command line arguments for the simulator
#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(about = "A turn-based multi-agent conversation simulator")]
struct Args {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of subjects S
    #[arg(long)]
    subjects: Option<usize>,

    /// Items per memory bank
    #[arg(long)]
    memory_size: Option<usize>,

    /// Maximum conversation length L
    #[arg(long)]
    length: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Number of conversations (seeds seed, seed+1, ...)
    #[arg(long)]
    rounds: Option<usize>,

    /// Seats as KIND COUNT; repeat to mix strategies. Replaces the file's roster
    #[arg(long = "player", num_args = 2, value_names = ["KIND", "COUNT"], action = ArgAction::Append)]
    players: Vec<String>,

    /// Print every report as JSON instead of the summary table
    #[arg(long)]
    json: bool,

    /// Print the default configuration file and exit
    #[arg(long)]
    print_config: bool,
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn build_config(args: &Args) -> Result<SimConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => SimConfig::from_file(path)?,
        None => SimConfig::default(),
    };

    if let Some(subjects) = args.subjects {
        config.conversation.subjects = subjects;
    }
    if let Some(memory_size) = args.memory_size {
        config.conversation.memory_size = memory_size;
    }
    if let Some(length) = args.length {
        config.conversation.length = length;
    }
    if let Some(seed) = args.seed {
        config.conversation.seed = seed;
    }
    if let Some(rounds) = args.rounds {
        config.rounds = rounds;
    }

    if !args.players.is_empty() {
        config.roster = args
            .players
            .chunks(2)
            .map(|pair| -> Result<RosterSpec, Box<dyn std::error::Error>> {
                let [kind, count] = pair else {
                    return Err("--player takes KIND COUNT".into());
                };
                Ok(RosterSpec {
                    kind: kind.parse::<PlayerKind>()?,
                    count: count.parse()?,
                })
            })
            .collect::<Result<_, _>>()?;
    }

    Ok(config)
}

fn play(config: &SimConfig) -> Result<Vec<FinalReport>, Box<dyn std::error::Error>> {
    let mut reports = Vec::with_capacity(config.rounds);
    for round in 0..config.rounds {
        let conversation = initialize(&config.conversation_for_round(round), config.roster_entries()?)?;
        let report = run(conversation)?;
        info!(
            round,
            seed = report.seed,
            slots = report.actual_length,
            shared = report.shared.total(),
            "round complete"
        );
        reports.push(report);
    }
    Ok(reports)
}

fn main() -> ExitCode {
    let args = Args::parse();
    if args.print_config {
        print!("{}", default_config_toml());
        return ExitCode::SUCCESS;
    }
    init_tracing();

    let result = build_config(&args).and_then(|config| {
        let reports = play(&config)?;
        if args.json {
            for report in &reports {
                println!("{}", report.to_json()?);
            }
        } else {
            println!("Rounds: {}", reports.len());
            println!("Seats: {}", config.seat_kinds().len());
            println!();
            print!("{}", render_table(&summarize(&reports)));
        }
        Ok(())
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
