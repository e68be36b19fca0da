#[macro_use]
extern crate clap;

use std::path;
use std::process;

use cardls::sat::local_search::Config;
use cardls::{run, MainOptions};

fn main() {
    let matches = clap::App::new("cardls")
        .version(&crate_version!()[..])
        .about("Stochastic local search over cardinality constraints")
        .arg(
            clap::Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .multiple(true)
                .help("Increases log verbosity (repeatable: -v, -vv)"),
        )
        .arg(
            clap::Arg::with_name("strict")
                .long("strict")
                .help("Validate the DIMACS header during parsing"),
        )
        .arg(
            clap::Arg::with_name("seed")
                .long("seed")
                .takes_value(true)
                .help("Seeds the search's random source"),
        )
        .arg(
            clap::Arg::with_name("cutoff")
                .long("cutoff")
                .takes_value(true)
                .help("Wall-clock search budget, in seconds"),
        )
        .arg(
            clap::Arg::with_name("strategy")
                .long("strategy")
                .takes_value(true)
                .help("Search strategy id; only 0 is accepted"),
        )
        .arg(
            clap::Arg::with_name("best-known")
                .long("best-known")
                .takes_value(true)
                .help("Exit as soon as the objective reaches or exceeds this value"),
        )
        .arg(clap::Arg::with_name("input").required(true))
        .arg(clap::Arg::with_name("output").required(false))
        .get_matches();

    {
        let mut builder = env_logger::Builder::new();
        builder.format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "{}", record.args())
        });
        let level = match matches.occurrences_of("verbose") {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Trace,
        };
        builder.filter(None, level);
        builder.init();
    }

    let mut config = Config::default();
    if let Some(seed) = matches.value_of("seed").and_then(|s| s.parse().ok()) {
        config.seed = seed;
    }
    if let Some(cutoff) = matches.value_of("cutoff").and_then(|s| s.parse().ok()) {
        config.cutoff_time = cutoff;
    }
    if let Some(strategy_id) = matches.value_of("strategy").and_then(|s| s.parse().ok()) {
        config.strategy_id = strategy_id;
    }
    if let Some(best_known) = matches.value_of("best-known").and_then(|s| s.parse().ok()) {
        config.best_known_value = best_known;
    }

    let main_opts = MainOptions {
        strict: matches.is_present("strict"),
        in_path: path::PathBuf::from(matches.value_of("input").unwrap()),
        out_path: matches.value_of("output").map(path::PathBuf::from),
    };

    match run(main_opts, config) {
        Ok(outcome) => {
            println!("{}", outcome_label(&outcome));
        }
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}

fn outcome_label(outcome: &cardls::sat::SearchOutcome) -> &'static str {
    use cardls::sat::SearchOutcome::*;
    match outcome {
        OptimalReached { .. } => "OPTIMAL",
        Timeout { .. } => "TIMEOUT",
        Unknown => "UNKNOWN",
    }
}
