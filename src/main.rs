//! liftplan command-line interface.
//!
//! Exit codes: 0 solved, 2 input or configuration error, 3 resource limit
//! reached, 4 no plan found.
#![forbid(unsafe_code)]
use clap::Parser;
use liftplan::{
    GroundingMode, HeuristicKind, Planner, PlannerOptions, SearchAlgorithmKind, SearchStatus,
    TaskDescription,
};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "liftplan", version = env!("CARGO_PKG_VERSION"), about = "Lifted and grounded forward state-space planner")]
struct Cli {
    /// Task description (JSON)
    task: PathBuf,

    /// Planner options (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Search algorithm, overriding the configuration file
    #[arg(short, long, value_enum)]
    search: Option<SearchArg>,

    /// Heuristic, overriding the configuration file
    #[arg(long, value_enum)]
    heuristic: Option<HeuristicArg>,

    /// Enumerate all reachable ground actions up front
    #[arg(long)]
    grounded: bool,

    /// Write the plan as JSON to this file
    #[arg(long)]
    plan_out: Option<PathBuf>,

    /// Print run statistics
    #[arg(long)]
    stats: bool,
}

#[derive(Copy, Clone, clap::ValueEnum)]
enum SearchArg {
    Brfs,
    Astar,
    Gbfs,
    Iw,
    Siw,
}

impl From<SearchArg> for SearchAlgorithmKind {
    fn from(value: SearchArg) -> Self {
        match value {
            SearchArg::Brfs => SearchAlgorithmKind::Brfs,
            SearchArg::Astar => SearchAlgorithmKind::Astar,
            SearchArg::Gbfs => SearchAlgorithmKind::Gbfs,
            SearchArg::Iw => SearchAlgorithmKind::Iw,
            SearchArg::Siw => SearchAlgorithmKind::Siw,
        }
    }
}

#[derive(Copy, Clone, clap::ValueEnum)]
enum HeuristicArg {
    Blind,
    GoalCount,
}

impl From<HeuristicArg> for HeuristicKind {
    fn from(value: HeuristicArg) -> Self {
        match value {
            HeuristicArg::Blind => HeuristicKind::Blind,
            HeuristicArg::GoalCount => HeuristicKind::GoalCount,
        }
    }
}

fn options(cli: &Cli) -> liftplan::Result<PlannerOptions> {
    let mut options = match &cli.config {
        Some(path) => PlannerOptions::load(path)?,
        None => PlannerOptions::default(),
    };
    if let Some(search) = cli.search {
        options.search = search.into();
    }
    if let Some(heuristic) = cli.heuristic {
        options.heuristic = heuristic.into();
    }
    if cli.grounded {
        options.grounding = GroundingMode::Grounded;
    }
    options.validate()?;
    Ok(options)
}

fn run(cli: &Cli) -> liftplan::Result<i32> {
    let options = options(cli)?;
    let task = TaskDescription::from_path(&cli.task)?;
    let planner = Planner::new().with_options(options);
    let report = planner.solve(&task)?;

    if cli.stats {
        print!("{}", report.statistics);
    }
    let code = match report.result.status {
        SearchStatus::Solved => {
            for line in &report.plan_lines {
                println!("{line}");
            }
            if let Some(plan) = &report.result.plan {
                println!("; cost = {} ({} steps)", plan.cost, plan.len());
                if let Some(path) = &cli.plan_out {
                    plan.save(path)?;
                }
            }
            0
        }
        SearchStatus::Aborted(reason) => {
            println!("; search aborted: {reason:?}");
            3
        }
        SearchStatus::Unsolvable => {
            println!("; task is unsolvable");
            4
        }
        SearchStatus::Exhausted => {
            println!("; search exhausted without a plan");
            4
        }
    };
    Ok(code)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "liftplan=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("Error: {err}");
            process::exit(2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }
}
