use crate::sat::formula::Var;
use crate::sat::local_search::problem::Problem;
use crate::sat::local_search::random::Random;
use crate::sat::local_search::state::{State, SENTINEL};

/// SAT mode tie-break: among variables occurring in the objective, prefer
/// the one whose flip improves the objective most; break further ties by
/// `conf_change` then by oldest `time_stamp`.
fn tie_breaker_sat(state: &State, v: Var, best: Var) -> bool {
    let imp = |x: Var| -> i64 {
        let coeff = state.coefficient_in_ob[x.index()];
        if state.cur_solution[x.index()] { -coeff } else { coeff }
    };
    let v_imp = imp(v);
    let b_imp = imp(best);
    v_imp > b_imp
        || (v_imp == b_imp
            && (state.conf_change(v) && !state.conf_change(best)
                || (state.conf_change(v) == state.conf_change(best)
                    && state.time_stamp[v.index()] < state.time_stamp[best.index()])))
}

/// CCD mode tie-break: prefer higher score, then higher sscore, then higher
/// cscc, then oldest `time_stamp`.
fn tie_breaker_ccd(state: &State, v: Var, best: Var) -> bool {
    let (vi, bi) = (v.index(), best.index());
    state.score[vi] > state.score[bi]
        || (state.score[vi] == state.score[bi]
            && (state.sscore[vi] > state.sscore[bi]
                || (state.sscore[vi] == state.sscore[bi]
                    && (state.cscc[vi] > state.cscc[bi]
                        || (state.cscc[vi] == state.cscc[bi]
                            && state.time_stamp[vi] < state.time_stamp[bi])))))
}

/// Chooses the next variable to flip.
///
/// - SAT mode: the current assignment is feasible; pick the objective
///   variable whose flip improves the objective the most.
/// - CCD mode: the assignment is infeasible but the goodvar stack is
///   non-empty; pick the best-scoring variable from it (this never
///   revisits a variable whose `conf_change` flag is still clear, because
///   such variables are never pushed onto the stack).
/// - Diversification mode: the goodvar stack is empty; pick a random unsat
///   constraint and, within it, the oldest variable that would relax it.
pub fn pick_var(problem: &Problem, state: &State, rng: &mut Random) -> Var {
    if state.is_feasible() {
        let mut best = Var::new(SENTINEL);
        for term in problem.objective() {
            if tie_breaker_sat(state, term.var, best) {
                best = term.var;
            }
        }
        return best;
    }

    if !state.goodvar_stack.is_empty() {
        let mut best = Var::new(state.goodvar_stack[0]);
        for &vi in &state.goodvar_stack[1..] {
            let v = Var::new(vi);
            if tie_breaker_ccd(state, v, best) {
                best = v;
            }
        }
        return best;
    }

    let c = state.unsat_stack[rng.irand(state.unsat_stack.len())];
    let mut best = Var::new(SENTINEL);
    for term in &problem.constraints()[c].terms {
        if state.cur_solution[term.var.index()] == term.sense
            && state.time_stamp[term.var.index()] < state.time_stamp[best.index()]
        {
            best = term.var;
        }
    }
    best
}
