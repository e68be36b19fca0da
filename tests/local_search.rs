//! Integration tests covering end-to-end search scenarios, plus a round
//! trip through the DIMACS file interface using scratch tempfiles.

use std::io::Write;

use cardls::sat::local_search::{Config, Problem};
use cardls::sat::{dimacs, local_search, SearchOutcome};
use cardls::{run, MainOptions};

fn elapsed_from(start: std::time::Instant) -> impl Fn() -> f64 {
    move || start.elapsed().as_secs_f64()
}

#[test]
fn empty_problem_is_optimal_with_zero_objective() {
    let p = Problem::new();
    let mut config = Config::default();
    config.best_known_value = 0;
    let start = std::time::Instant::now();
    let (outcome, _stats, best) = local_search::run(&p, &config, elapsed_from(start));
    match outcome {
        SearchOutcome::OptimalReached { objective, .. } => assert_eq!(objective, 0),
        other => panic!("expected OptimalReached, got {:?}", other),
    }
    assert!(best.iter().skip(1).all(|&v| !v));
}

#[test]
fn single_unit_clause_is_satisfied_within_one_restart() {
    let mut p = Problem::new();
    let x1 = p.new_var();
    // unit clause x1: term (x1, sense=false), k=0.
    p.add_cardinality(&[x1.pos_lit()], 0).unwrap();

    let mut config = Config::default();
    config.seed = 42;
    config.best_known_value = 0;
    let start = std::time::Instant::now();
    let (outcome, _stats, best) = local_search::run(&p, &config, elapsed_from(start));
    assert!(matches!(outcome, SearchOutcome::OptimalReached { objective: 0, .. }));
    assert!(best[x1.index()]);
}

#[test]
fn mutual_exclusion_reaches_known_optimum() {
    let mut p = Problem::new();
    let x1 = p.new_var();
    let x2 = p.new_var();
    // neg_lit counts a term when its variable is true, matching "at most
    // one of x1, x2 is true".
    p.add_cardinality(&[x1.neg_lit(), x2.neg_lit()], 1).unwrap();
    p.add_soft(x1, 1);
    p.add_soft(x2, 1);

    let mut config = Config::default();
    config.best_known_value = 1;
    let start = std::time::Instant::now();
    let (outcome, _stats, best) = local_search::run(&p, &config, elapsed_from(start));
    match outcome {
        SearchOutcome::OptimalReached { objective, .. } => assert_eq!(objective, 1),
        other => panic!("expected OptimalReached, got {:?}", other),
    }
    let true_count = best.iter().skip(1).filter(|&&v| v).count();
    assert_eq!(true_count, 1);
}

#[test]
fn cardinality_at_most_one_of_three_reaches_known_optimum() {
    let mut p = Problem::new();
    let x1 = p.new_var();
    let x2 = p.new_var();
    let x3 = p.new_var();
    p.add_cardinality(&[x1.neg_lit(), x2.neg_lit(), x3.neg_lit()], 1).unwrap();
    p.add_soft(x1, 1);
    p.add_soft(x2, 1);
    p.add_soft(x3, 1);

    let mut config = Config::default();
    config.best_known_value = 1;
    let start = std::time::Instant::now();
    let (outcome, _stats, best) = local_search::run(&p, &config, elapsed_from(start));
    match outcome {
        SearchOutcome::OptimalReached { objective, .. } => assert_eq!(objective, 1),
        other => panic!("expected OptimalReached, got {:?}", other),
    }
    let true_count = best.iter().skip(1).filter(|&&v| v).count();
    assert_eq!(true_count, 1);
}

#[test]
fn repeated_add_soft_for_the_same_var_sums_rather_than_merges() {
    let mut p = Problem::new();
    let x1 = p.new_var();
    p.add_cardinality(&[x1.pos_lit()], 1).unwrap();
    // two separate terms for x1, 5 and 3: not merged into one term of 8,
    // but both count toward the objective total once x1 is set true.
    p.add_soft(x1, 5);
    p.add_soft(x1, 3);
    assert_eq!(p.objective().len(), 2);

    let mut config = Config::default();
    config.best_known_value = 8;
    let start = std::time::Instant::now();
    let (outcome, _stats, best) = local_search::run(&p, &config, elapsed_from(start));
    match outcome {
        SearchOutcome::OptimalReached { objective, .. } => assert_eq!(objective, 8),
        other => panic!("expected OptimalReached, got {:?}", other),
    }
    assert!(best[x1.index()]);
}

#[test]
fn three_clause_unsat_times_out_without_reaching_best_known() {
    let mut p = Problem::new();
    let x = p.new_var();
    // x, not-x, and (x or not-x) -- the third clause is trivially satisfied,
    // but the first two directly contradict each other.
    p.add_clause(&[x.pos_lit()]).unwrap();
    p.add_clause(&[x.neg_lit()]).unwrap();
    p.add_clause(&[x.pos_lit(), x.neg_lit()]).unwrap();

    let mut config = Config::default();
    config.best_known_value = 0;
    config.cutoff_time = 0.02;
    let start = std::time::Instant::now();
    let (outcome, _stats, _best) = local_search::run(&p, &config, elapsed_from(start));
    match outcome {
        SearchOutcome::Timeout { best_objective, .. } => assert_eq!(best_objective, i64::min_value()),
        other => panic!("expected Timeout, got {:?}", other),
    }
}

#[test]
fn identical_seed_gives_identical_best_solution() {
    let build = || {
        let mut p = Problem::new();
        let x1 = p.new_var();
        let x2 = p.new_var();
        let x3 = p.new_var();
        p.add_cardinality(&[x1.neg_lit(), x2.neg_lit(), x3.neg_lit()], 1).unwrap();
        p.add_soft(x1, 1);
        p.add_soft(x2, 2);
        p.add_soft(x3, 3);
        p
    };

    let mut config = Config::default();
    config.seed = 7;
    config.best_known_value = 3;

    let p1 = build();
    let start1 = std::time::Instant::now();
    let (outcome1, _s1, best1) = local_search::run(&p1, &config, elapsed_from(start1));

    let p2 = build();
    let start2 = std::time::Instant::now();
    let (outcome2, _s2, best2) = local_search::run(&p2, &config, elapsed_from(start2));

    assert_eq!(outcome1, outcome2);
    assert_eq!(best1, best2);
}

#[test]
fn rejects_unsupported_strategy_before_search_starts() {
    let mut config = Config::default();
    config.strategy_id = 1;
    assert!(config.validate().is_err());
}

#[test]
fn full_pipeline_round_trips_through_a_dimacs_file() {
    let mut in_file = tempfile::NamedTempFile::new().expect("tempfile");
    // p cnf 2 1: unit clause x1, plus an objective favoring x1 and x2 true.
    writeln!(in_file, "p cnf 2 1").unwrap();
    writeln!(in_file, "1 0").unwrap();
    writeln!(in_file, "o 1 1").unwrap();
    writeln!(in_file, "o 2 1").unwrap();
    in_file.flush().unwrap();

    let out_file = tempfile::NamedTempFile::new().expect("tempfile");

    let main_opts = MainOptions {
        strict: false,
        in_path: in_file.path().to_path_buf(),
        out_path: Some(out_file.path().to_path_buf()),
    };
    let mut config = Config::default();
    config.best_known_value = 1;

    let outcome = run(main_opts, config).expect("run should succeed");
    assert!(matches!(outcome, SearchOutcome::OptimalReached { .. }));

    let model = std::fs::read_to_string(out_file.path()).unwrap();
    assert!(model.trim_start().starts_with('v'));
    assert!(model.contains('1'));
}

#[test]
fn dimacs_parse_rejects_negative_bound_constraints() {
    let text = "p cardls 1 1\nk -1 1 0\n";
    let result = dimacs::parse(text.as_bytes(), true);
    assert!(result.is_err());
}
