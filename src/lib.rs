use std::{fs, io, path};

use log::info;

use crate::sat::local_search::{Config, ConfigError};
use crate::sat::{dimacs, local_search, SearchOutcome};

pub mod sat;
pub(crate) mod util;

/// Everything `run` needs beyond engine tuning: where the problem comes
/// from, where the model (if any) should be written, and whether to
/// validate the DIMACS header strictly.
pub struct MainOptions {
    pub strict: bool,
    pub in_path: path::PathBuf,
    pub out_path: Option<path::PathBuf>,
}

#[derive(Debug)]
pub enum RunError {
    Config(ConfigError),
    Io(io::Error),
}

impl From<ConfigError> for RunError {
    fn from(e: ConfigError) -> Self {
        RunError::Config(e)
    }
}

impl From<io::Error> for RunError {
    fn from(e: io::Error) -> Self {
        RunError::Io(e)
    }
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            RunError::Config(e) => write!(f, "{}", e),
            RunError::Io(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for RunError {}

/// Parses the problem, runs the search to completion, and writes the
/// result. Shared between `main.rs` and the integration tests so both
/// exercise the same code path.
pub fn run(main_opts: MainOptions, config: Config) -> Result<SearchOutcome, RunError> {
    config.validate()?;

    info!("============================[ Problem Statistics ]=============================");

    let initial_time = time::precise_time_s();
    let parsed = dimacs::parse_file(&main_opts.in_path, main_opts.strict)?;
    let parse_time = time::precise_time_s() - initial_time;

    info!("|  Number of variables:     {:12}", parsed.problem.num_vars());
    info!("|  Number of constraints:   {:12}", parsed.problem.num_constraints());
    info!("|  Number of objective terms: {:10}", parsed.problem.objective().len());
    info!("|  Parse time:              {:12.2} s", parse_time);
    info!("================================================================================");

    let (outcome, stats, best_solution) =
        local_search::run(&parsed.problem, &config, || time::precise_time_s() - initial_time);

    let mem_used = util::mem_used_peak();
    report(&outcome, &stats, time::precise_time_s() - initial_time, mem_used);

    if let Some(path) = main_opts.out_path {
        let write_model = match outcome {
            SearchOutcome::OptimalReached { .. } => true,
            SearchOutcome::Timeout { best_objective, .. } => best_objective != i64::min_value(),
            SearchOutcome::Unknown => false,
        };
        if write_model {
            let mut out = fs::File::create(path)?;
            dimacs::write_model(&mut out, &parsed.backward_subst, &best_solution)?;
        }
    }

    Ok(outcome)
}

fn report(outcome: &SearchOutcome, stats: &sat::Stats, elapsed: f64, mem_used: Option<usize>) {
    info!("================================[ Search Summary ]=============================");
    info!("|  Tries:                   {:12}", stats.tries);
    info!("|  Flips:                   {:12}", stats.flips);
    info!("|  Elapsed:                 {:12.2} s", elapsed);
    match outcome {
        SearchOutcome::OptimalReached { objective, .. } => {
            info!("|  Outcome:                 best-known value reached ({})", objective);
        }
        SearchOutcome::Timeout { best_objective, .. } => {
            if *best_objective == i64::min_value() {
                info!("|  Outcome:                 cutoff reached, no feasible assignment found");
            } else {
                info!("|  Outcome:                 cutoff reached, best objective {}", best_objective);
            }
        }
        SearchOutcome::Unknown => {
            info!("|  Outcome:                 no feasible assignment found");
        }
    }
    if let Some(mem) = mem_used {
        info!("|  Memory used:             {:.2} MB", (mem as f64) / 1024.0);
    }
    info!("================================================================================");
}
