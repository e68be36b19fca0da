use log::{debug, info, trace};

use crate::sat::local_search::config::Config;
use crate::sat::local_search::flip::flip;
use crate::sat::local_search::objective::calculate_and_update;
use crate::sat::local_search::picker::pick_var;
use crate::sat::local_search::problem::Problem;
use crate::sat::local_search::random::Random;
use crate::sat::local_search::state::State;
use crate::sat::{SearchOutcome, Stats};

/// Rebuilds `slack` and `unsat_stack` from scratch against `state.cur_solution`.
fn init_slack(problem: &Problem, state: &mut State) {
    state.unsat_stack.clear();
    for (c, constraint) in problem.constraints().iter().enumerate() {
        state.slack[c] = constraint.k;
        for term in &constraint.terms {
            if state.cur_solution[term.var.index()] == term.sense {
                state.slack[c] -= 1;
            }
        }
        if state.slack[c] < 0 {
            state.mark_unsat(c);
        }
    }
}

/// Rebuilds `score`/`sscore` from scratch against the slack just computed by
/// `init_slack`. This is the only place scores are computed non-incrementally;
/// everywhere else, `flip` maintains them.
fn init_scores(problem: &Problem, state: &mut State) {
    for v in 1..=problem.num_vars() {
        for term in problem.terms_of(crate::sat::formula::Var::new(v)) {
            let c = term.constraint_id;
            let slack = state.slack[c];
            if state.cur_solution[v] != term.sense {
                // flipping v would count this term, tightening or violating c.
                if slack <= 0 {
                    state.sscore[v] -= 1;
                    if slack == 0 {
                        state.score[v] -= 1;
                    }
                }
            } else {
                // flipping v would uncount this term, relaxing c.
                if slack <= -1 {
                    state.sscore[v] += 1;
                    if slack == -1 {
                        state.score[v] += 1;
                    }
                }
            }
        }
    }
}

fn init_goodvars(state: &mut State) {
    state.goodvar_stack.clear();
    for v in state.in_goodvar_stack.iter_mut() {
        *v = false;
    }
    for v in 1..state.score.len() {
        if state.score[v] > 0 {
            state.in_goodvar_stack[v] = true;
            state.goodvar_stack.push(v);
        }
    }
}

/// Resets `state` for a fresh restart: a random assignment, scores and
/// slack recomputed from scratch, and the sentinel's fixed extremes
/// reinstated (mutable state doesn't otherwise touch index 0, but `State`
/// is reused across restarts so nothing guarantees it survived the
/// previous one's flips).
fn reinit(problem: &Problem, state: &mut State, rng: &mut Random, max_steps: u64) {
    for v in 1..=problem.num_vars() {
        state.cur_solution[v] = rng.chance(0.5);
    }
    for v in state.score.iter_mut() {
        *v = 0;
    }
    for v in state.sscore.iter_mut() {
        *v = 0;
    }
    for v in state.cscc.iter_mut() {
        *v = 1;
    }
    for v in state.time_stamp.iter_mut() {
        *v = 0;
    }
    for v in state.conf_change.iter_mut() {
        *v = true;
    }

    state.score[0] = i64::min_value();
    state.sscore[0] = i64::min_value();
    state.conf_change[0] = false;
    state.cscc[0] = 0;
    state.time_stamp[0] = max_steps + 1;

    init_slack(problem, state);
    init_scores(problem, state);
    init_goodvars(state);

    debug_assert_invariants(problem, state);
}

/// Cross-checks the structural invariants a fresh restart must establish:
/// the unsat stack holds exactly the violated constraints, and the goodvar
/// stack holds exactly the variables with positive score. Compiled out in
/// release builds.
#[cfg(debug_assertions)]
fn debug_assert_invariants(problem: &Problem, state: &State) {
    let unsat_count = (0..problem.num_constraints()).filter(|&c| state.slack[c] < 0).count();
    debug_assert_eq!(state.unsat_stack.len(), unsat_count, "unsat_stack size diverged from slack signs after reinit");
    for &c in &state.unsat_stack {
        debug_assert!(state.slack[c] < 0, "constraint {} on unsat_stack but not violated", c);
    }

    let goodvar_count = (1..state.score.len()).filter(|&v| state.score[v] > 0).count();
    debug_assert_eq!(state.goodvar_stack.len(), goodvar_count, "goodvar_stack size diverged from score signs after reinit");
    for &v in &state.goodvar_stack {
        debug_assert!(state.score[v] > 0, "var {} on goodvar_stack but non-positive score", v);
        debug_assert!(state.in_goodvar_stack[v], "var {} on goodvar_stack but flag unset", v);
    }
}

#[cfg(not(debug_assertions))]
fn debug_assert_invariants(_problem: &Problem, _state: &State) {}

/// Runs the restart-driven search loop until either the configured cutoff
/// time elapses or `best_known_value` is reached, whichever comes first.
/// The inner loop runs at most `max_steps` flips per restart before
/// starting over with a fresh random assignment.
///
/// Returns the outcome, flip/restart counters, and the best feasible
/// assignment found (empty if none ever was).
pub fn run(problem: &Problem, config: &Config, elapsed: impl Fn() -> f64) -> (SearchOutcome, Stats, Vec<bool>) {
    let mut rng = Random::new(config.seed);
    let mut state = State::new(problem);
    let max_steps = config.max_steps(problem.num_vars());

    let mut stats = Stats::default();
    let mut reached_best_known = false;

    loop {
        reinit(problem, &mut state, &mut rng, max_steps);
        trace!("restart {} begins", stats.tries);

        // The feasibility/objective check runs once per step starting at
        // step 0, before any flip is spent, so a restart with max_steps == 0
        // (num_vars() == 0) still observes the initial assignment instead of
        // never reaching the best-known exit test.
        let mut step = 0;
        loop {
            if state.is_feasible() {
                let improved = calculate_and_update(problem, &mut state, elapsed());
                if improved {
                    debug!(
                        "restart {} step {}: new best objective {}",
                        stats.tries, step, state.best_objective_value
                    );
                }
                if state.best_objective_value >= config.best_known_value {
                    reached_best_known = true;
                    break;
                }
            }
            if step >= max_steps {
                break;
            }
            step += 1;
            let flipvar = pick_var(problem, &state, &mut rng);
            flip(problem, &mut state, flipvar);
            state.time_stamp[flipvar.index()] = step;
            stats.flips += 1;
        }
        stats.tries += 1;

        if stats.tries % 10 == 0 {
            info!(
                "try {}: {:.2}s, unsat={}, best_obj={}",
                stats.tries,
                elapsed(),
                state.unsat_stack.len(),
                state.best_objective_value
            );
        }

        if reached_best_known {
            break;
        }
        if elapsed() > config.cutoff_time {
            break;
        }
    }

    // Running out of budget without ever finding a feasible assignment is
    // not a distinct error case; it's reported as Timeout with
    // best_objective_value left at its initial sentinel. `Unknown` is
    // otherwise unreachable from this loop.
    let outcome = if reached_best_known {
        SearchOutcome::OptimalReached {
            objective: state.best_objective_value,
            tries: stats.tries,
            flips: stats.flips,
        }
    } else {
        SearchOutcome::Timeout {
            best_objective: state.best_objective_value,
            tries: stats.tries,
            flips: stats.flips,
        }
    };
    (outcome, stats, state.best_solution)
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn reinit_restores_sentinel_extremes() {
        let mut p = Problem::new();
        let v = p.new_var();
        p.add_clause(&[v.pos_lit()]).unwrap();
        let mut state = State::new(&p);
        let mut rng = Random::new(1);
        reinit(&p, &mut state, &mut rng, 4);
        assert_eq!(state.score[0], i64::min_value());
        assert_eq!(state.sscore[0], i64::min_value());
        assert_eq!(state.time_stamp[0], 5);
        assert!(!state.conf_change[0]);
        assert_eq!(state.cscc[0], 0);
    }

    #[test]
    fn run_solves_a_single_unit_clause() {
        let mut p = Problem::new();
        let v = p.new_var();
        p.add_clause(&[v.pos_lit()]).unwrap();
        let mut config = Config::default();
        config.best_known_value = 0;
        let mut ticks = 0.0f64;
        let (outcome, _stats, best) = run(&p, &config, || {
            ticks += 0.001;
            ticks
        });
        match outcome {
            SearchOutcome::OptimalReached { .. } => {}
            other => panic!("expected OptimalReached, got {:?}", other),
        }
        assert_eq!(best.len(), 2);
        assert!(best[1]);
    }

    #[test]
    fn run_times_out_on_an_unsatisfiable_pair_of_clauses() {
        let mut p = Problem::new();
        let v = p.new_var();
        p.add_clause(&[v.pos_lit()]).unwrap();
        p.add_clause(&[v.neg_lit()]).unwrap();
        let mut config = Config::default();
        config.cutoff_time = 0.0;
        config.best_known_value = 0;
        let ticks = std::cell::Cell::new(0.0f64);
        let (outcome, _stats, _best) = run(&p, &config, || {
            ticks.set(ticks.get() + 0.001);
            ticks.get()
        });
        match outcome {
            SearchOutcome::Timeout { best_objective, .. } => assert_eq!(best_objective, i64::min_value()),
            other => panic!("expected Timeout, got {:?}", other),
        }
    }
}
