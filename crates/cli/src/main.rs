//! Minimal simulation runner: seeds a world, drives it hour by hour, and
//! writes the event log plus daily summaries to disk. The interactive
//! front-end this could grow into is out of scope here.

use clap::Parser;
use director::{reduce, DirectorContext, EventScorer};
use sim_core::config::Config;
use sim_core::rng::SimRng;
use sim_core::setup::build_initial_world;
use sim_core::tick::tick_hour;
use sim_events::{kinds, EventLogger, SimEvent, Visibility};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "worldsim", about = "Runs the deterministic settlement simulation")]
struct Args {
    /// Deterministic seed.
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Number of days to simulate.
    #[arg(long, default_value_t = 7)]
    days: i64,

    /// Path to a TOML tuning config; falls back to defaults if absent.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write the JSONL event log.
    #[arg(long, default_value = "events.jsonl")]
    out: PathBuf,
}

fn main() {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    if args.days < 0 {
        eprintln!("days must be non-negative, got {}", args.days);
        std::process::exit(1);
    }

    let config = match &args.config {
        Some(path) => Config::load(path).expect("loading config"),
        None => Config::default(),
    };

    let mut world = build_initial_world(args.seed);
    let mut rng = SimRng::from_seed(args.seed);
    let mut logger = EventLogger::new(&args.out).expect("opening event log");
    let scorer = EventScorer::default();
    let ctx = DirectorContext::default();

    let started = SimEvent::new(1, 0, 1, kinds::SIM_STARTED, Visibility::System, None, format!("seed {}", args.seed), None);
    logger.log(&started).expect("writing event log");
    let mut next_seq = 2u64;

    let total_hours = (args.days as u64) * 24;
    let mut summary_count = 0u64;
    for _ in 0..total_hours {
        let (output, seq) = tick_hour(&mut world, &config, &mut rng, next_seq, Vec::new());
        next_seq = seq;
        reduce(&output.events, &scorer, &ctx, &mut world.chronicle);
        logger.log_batch(&output.events).expect("writing event log");
        if output.daily_summary.is_some() {
            summary_count += 1;
        }
    }

    logger.flush().expect("flushing event log");
    tracing::info!(
        events = logger.event_count(),
        days = summary_count,
        beats = world.chronicle.beats.len(),
        "simulation complete"
    );
}
