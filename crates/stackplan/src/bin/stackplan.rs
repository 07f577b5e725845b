//! Plan a block-stacking problem read from a JSON file

use clap::Parser;
use stackplan::{ground_problem, PlanOutcome, Planner, ProblemJson};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "stackplan", version, about = "Plan pick and drop ticks for a block-stacking world")]
struct Args {
    /// Problem file with `world`, `goal` and optional `config`
    problem: PathBuf,

    /// Wall-clock budget per search attempt, in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Total number of search attempts
    #[arg(long)]
    max_attempts: Option<usize>,

    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,

    /// Collect a search profile per attempt (shown with --json)
    #[arg(long)]
    profile: bool,
}

/// `RUST_LOG` wins over the default `warn` level
fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init()
        .ok();
}

fn main() {
    init_logging();
    let args = Args::parse();

    let text = match std::fs::read_to_string(&args.problem) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Cannot read {}: {}", args.problem.display(), e);
            std::process::exit(1);
        }
    };
    let problem: ProblemJson = match serde_json::from_str(&text) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Parse error: {}", e);
            std::process::exit(1);
        }
    };
    let mut problem = match ground_problem(&problem) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    if let Some(ms) = args.timeout_ms {
        problem.config.timeout = Duration::from_millis(ms);
    }
    if let Some(n) = args.max_attempts {
        problem.config.max_attempts = n;
    }
    if args.profile {
        problem.config.enable_profiling = true;
    }

    let planner = Planner::new(problem.config.clone());
    let outcome = match planner.plan(&problem.goal, &problem.state) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&outcome.to_json()) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Serialization error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    match outcome {
        PlanOutcome::AlreadySatisfied => println!("The goal is already satisfied"),
        PlanOutcome::Planned(plan) => {
            for line in &plan.lines {
                println!("{}", line);
            }
        }
    }
}
