use crate::sat::formula::Var;
use crate::sat::local_search::problem::Problem;

/// Per-variable list of every other variable sharing a constraint with it.
/// Purely a diagnostic/reporting structure: nothing in `flip` or `pick_var`
/// consults it, since `flip` already collects the exact set of
/// score-affected variables as it walks each incident constraint.
#[derive(Debug, Clone)]
pub struct NeighborIndex {
    neighbors: Vec<Vec<Var>>,
}

impl NeighborIndex {
    pub fn build(problem: &Problem) -> NeighborIndex {
        let n = problem.num_vars() + 1;
        let mut neighbors = vec![Vec::new(); n];
        for v in 1..n {
            let var = Var::new(v);
            let mut seen = vec![false; n];
            for term in problem.terms_of(var) {
                for other in &problem.constraints()[term.constraint_id].terms {
                    let w = other.var.index();
                    if w == v || seen[w] {
                        continue;
                    }
                    seen[w] = true;
                    neighbors[v].push(other.var);
                }
            }
        }
        NeighborIndex { neighbors }
    }

    pub fn of(&self, v: Var) -> &[Var] {
        &self.neighbors[v.index()]
    }
}
