//! From-scratch recomputation of `slack`/`score`/`sscore` from a bare
//! assignment, independent of any incrementally maintained state. Used to
//! seed a restart (`engine::reinit`) and, under `debug_assertions`, to
//! cross-check that `flip`'s incremental maintenance agrees with it.

use crate::sat::formula::Var;
use crate::sat::local_search::problem::Problem;

/// Recomputes every constraint's slack and every variable's `score`/
/// `sscore` directly from `cur_solution`, using the same sign rules as
/// `flip`'s delta cases but applied from a clean slate rather than as a
/// delta. `cur_solution.len()` must be `problem.num_vars() + 1`.
pub fn recompute(problem: &Problem, cur_solution: &[bool]) -> (Vec<i64>, Vec<i64>, Vec<i64>) {
    let n = cur_solution.len();
    let mut slack = vec![0i64; problem.num_constraints()];
    for (c, constraint) in problem.constraints().iter().enumerate() {
        let mut s = constraint.k;
        for term in &constraint.terms {
            if cur_solution[term.var.index()] == term.sense {
                s -= 1;
            }
        }
        slack[c] = s;
    }

    let mut score = vec![0i64; n];
    let mut sscore = vec![0i64; n];
    for v in 1..n {
        for term in problem.terms_of(Var::new(v)) {
            let s = slack[term.constraint_id];
            if cur_solution[v] != term.sense {
                // flipping v would count this term.
                if s <= 0 {
                    sscore[v] -= 1;
                    if s == 0 {
                        score[v] -= 1;
                    }
                }
            } else {
                // flipping v would uncount this term.
                if s <= -1 {
                    sscore[v] += 1;
                    if s == -1 {
                        score[v] += 1;
                    }
                }
            }
        }
    }
    (slack, score, sscore)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::formula::Var;

    #[test]
    fn recompute_matches_hand_evaluated_mutex_constraint() {
        let mut p = Problem::new();
        let a = p.new_var();
        let b = p.new_var();
        // neg_lit (sense=true) counts a term when its variable is true,
        // matching the conventional "at most one of a, b is true" reading.
        p.add_cardinality(&[a.neg_lit(), b.neg_lit()], 1).unwrap();
        // both true: counted = 2, slack = 1 - 2 = -1 (violated).
        let cur = vec![false, true, true];
        let (slack, score, sscore) = recompute(&p, &cur);
        assert_eq!(slack, vec![-1]);
        // flipping either variable relaxes the only constraint: score += 1.
        assert_eq!(score[a.index()], 1);
        assert_eq!(score[b.index()], 1);
        assert_eq!(sscore[a.index()], 1);
        assert_eq!(sscore[b.index()], 1);
    }
}
