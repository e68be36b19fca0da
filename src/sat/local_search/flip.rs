use crate::sat::formula::Var;
use crate::sat::local_search::problem::Problem;
use crate::sat::local_search::scratch;
use crate::sat::local_search::state::State;

/// Flips `flipvar` and incrementally updates every score, slack and stack
/// that depends on it, in time proportional to the arity of the
/// constraints `flipvar` occurs in.
///
/// This mirrors the constraint-slack state machine directly: each
/// constraint containing `flipvar` has its slack nudged by one, and the
/// *specific* slack transition (not just its sign) determines which of the
/// constraint's other variables have their score or sscore adjusted. Slack
/// transitions of magnitude 2 or more (e.g. -2 -> -1 -> 0 in one flip)
/// cannot happen: a single flip changes the truth of exactly one term per
/// incident constraint, so slack always moves by exactly 1.
pub fn flip(problem: &Problem, state: &mut State, flipvar: Var) {
    state.cur_solution[flipvar.index()] = !state.cur_solution[flipvar.index()];

    let org_score = state.score(flipvar);
    let org_sscore = state.sscore[flipvar.index()];
    let flipped_to = state.cur_solution[flipvar.index()];

    let mut affected: Vec<usize> = Vec::new();

    for term in problem.terms_of(flipvar) {
        let c = term.constraint_id;
        let constraint = &problem.constraints()[c];

        if flipped_to == term.sense {
            // flipvar just became a counted term: one fewer unit of slack.
            state.slack[c] -= 1;
            match state.slack[c] {
                -2 => {
                    // already unsat and getting worse: variables that would
                    // still relax this constraint if flipped lose a point.
                    for t in &constraint.terms {
                        if state.cur_solution[t.var.index()] == t.sense {
                            state.score[t.var.index()] -= 1;
                        }
                    }
                }
                -1 => {
                    // sat -> unsat: every variable in the constraint becomes
                    // more attractive to flip (it would relax this new
                    // violation), and its conf_change counter bumps.
                    for t in &constraint.terms {
                        let v = t.var.index();
                        state.cscc[v] += 1;
                        state.score[v] += 1;
                        affected.push(v);
                        if state.cur_solution[v] == t.sense {
                            state.sscore[v] += 1;
                        }
                    }
                    state.mark_unsat(c);
                }
                0 => {
                    // still sat but now tight: variables that would falsify
                    // it if flipped lose a point on score and sscore.
                    for t in &constraint.terms {
                        let v = t.var.index();
                        if state.cur_solution[v] != t.sense {
                            state.score[v] -= 1;
                            state.sscore[v] -= 1;
                        }
                    }
                }
                _ => {}
            }
        } else {
            // flipvar stopped being a counted term: one more unit of slack.
            state.slack[c] += 1;
            match state.slack[c] {
                1 => {
                    // variables that would falsify the constraint if
                    // flipped gain a point: it's no longer tight.
                    for t in &constraint.terms {
                        let v = t.var.index();
                        if state.cur_solution[v] != t.sense {
                            state.score[v] += 1;
                            affected.push(v);
                            state.sscore[v] += 1;
                        }
                    }
                }
                0 => {
                    // unsat -> sat: every variable in the constraint loses
                    // the attractiveness it had from relaxing this
                    // violation.
                    for t in &constraint.terms {
                        let v = t.var.index();
                        state.cscc[v] += 1;
                        state.score[v] -= 1;
                        if state.cur_solution[v] == t.sense {
                            state.sscore[v] -= 1;
                        }
                    }
                    state.mark_sat(c);
                }
                -1 => {
                    // still unsat but less so: variables that would
                    // relax it if flipped gain a point.
                    for t in &constraint.terms {
                        let v = t.var.index();
                        if state.cur_solution[v] == t.sense {
                            state.score[v] += 1;
                            affected.push(v);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    state.score[flipvar.index()] = -org_score;
    state.sscore[flipvar.index()] = -org_sscore;
    state.conf_change[flipvar.index()] = false;
    state.cscc[flipvar.index()] = 0;

    state.prune_goodvar_stack();

    for v in affected {
        state.conf_change[v] = true;
        let var = Var::new(v);
        if state.score[v] > 0 && !state.already_in_goodvar_stack(var) {
            state.push_goodvar(var);
        }
    }

    debug_assert_invariants(problem, state);
}

/// Cross-checks the incrementally maintained `slack`/`score`/`sscore`
/// against an independent from-scratch recomputation. Compiled out in
/// release builds; a flip that disagrees with this recomputation is a
/// programmer bug in the delta rules above, not a recoverable runtime
/// condition.
#[cfg(debug_assertions)]
fn debug_assert_invariants(problem: &Problem, state: &State) {
    let (slack, score, sscore) = scratch::recompute(problem, &state.cur_solution);
    debug_assert_eq!(state.slack, slack, "slack diverged from from-scratch recomputation");
    for v in 1..state.score.len() {
        debug_assert_eq!(state.score[v], score[v], "score({}) diverged from from-scratch recomputation", v);
        debug_assert_eq!(state.sscore[v], sscore[v], "sscore({}) diverged from from-scratch recomputation", v);
    }
}

#[cfg(not(debug_assertions))]
fn debug_assert_invariants(_problem: &Problem, _state: &State) {}
