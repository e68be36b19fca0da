use crate::sat::formula::{Lit, Var};
use crate::sat::local_search::config::ConfigError;

/// One occurrence of a variable inside a constraint.
///
/// `sense` is the literal's sign as it was added to the constraint; a term
/// is *counted* toward the constraint's true-terms count exactly when
/// `cur_solution[var] == sense` (a term with `sense == true` is counted
/// when the variable is assigned `false`, i.e. the literal itself is
/// false — this is what makes an at-most-(n-1) cardinality constraint over
/// a clause's literals equivalent to "at least one literal is true").
#[derive(Debug, Clone, Copy)]
pub struct Term {
    pub constraint_id: usize,
    pub var: Var,
    pub sense: bool,
}

/// A single `sum(counted terms) <= k` cardinality constraint.
#[derive(Debug, Clone)]
pub struct Constraint {
    pub terms: Vec<Term>,
    pub k: i64,
}

/// A term of the (optional) linear objective, maximized over satisfying
/// assignments: `objective = sum { coefficient : var_id assigned true }`.
#[derive(Debug, Clone, Copy)]
pub struct ObjectiveTerm {
    pub var: Var,
    pub coefficient: i64,
}

/// The static problem instance: a conjunction of cardinality constraints
/// plus an optional objective, as read from an input file or built up by a
/// library caller. Variables are numbered densely from 1; `Var::new(0)` is
/// reserved as the sentinel used throughout `local_search`.
#[derive(Debug, Clone, Default)]
pub struct Problem {
    num_vars: usize,
    var_terms: Vec<Vec<Term>>,
    constraints: Vec<Constraint>,
    objective: Vec<ObjectiveTerm>,
}

impl Problem {
    pub fn new() -> Problem {
        Problem {
            num_vars: 0,
            var_terms: vec![Vec::new()],
            constraints: Vec::new(),
            objective: Vec::new(),
        }
    }

    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn objective(&self) -> &[ObjectiveTerm] {
        &self.objective
    }

    pub fn terms_of(&self, v: Var) -> &[Term] {
        &self.var_terms[v.index()]
    }

    /// Allocates a fresh variable, growing internal storage as needed.
    pub fn new_var(&mut self) -> Var {
        self.num_vars += 1;
        self.var_terms.push(Vec::new());
        Var::new(self.num_vars)
    }

    fn ensure_vars(&mut self, up_to: usize) {
        while self.num_vars < up_to {
            self.new_var();
        }
    }

    /// Adds `sum(counted terms) <= k` over the given literals and returns
    /// its constraint id. Growing `Var::new(n)` references beyond the
    /// current variable count is allowed; variables are lazily created.
    /// Rejects `k < 0`: no assignment can ever satisfy such a constraint.
    pub fn add_cardinality(&mut self, lits: &[Lit], k: i64) -> Result<usize, ConfigError> {
        let id = self.constraints.len();
        if k < 0 {
            return Err(ConfigError::NegativeBound { constraint: id, k });
        }
        let mut terms = Vec::with_capacity(lits.len());
        for lit in lits {
            self.ensure_vars(lit.var().index());
            let t = Term { constraint_id: id, var: lit.var(), sense: lit.sign() };
            self.var_terms[lit.var().index()].push(t);
            terms.push(t);
        }
        self.constraints.push(Constraint { terms, k });
        Ok(id)
    }

    /// A clause `(l1 | l2 | ... | ln)`, encoded as at most `n - 1` of the
    /// literals being false.
    pub fn add_clause(&mut self, lits: &[Lit]) -> Result<usize, ConfigError> {
        let k = (lits.len() as i64) - 1;
        self.add_cardinality(lits, k)
    }

    /// Adds the two cardinality constraints that make `reif` equivalent to
    /// "at least `k` of `lits` are true", the encoding a richer solver's
    /// reified cardinality extension compiles down to:
    ///
    /// `lits + (n-k-1)*!reif <= n` and `!lits + k*reif <= n`.
    ///
    /// Returns both constraint ids. Requires `0 < k <= lits.len()`; when
    /// `k == lits.len()` the first constraint's padding literal count would
    /// be negative, so that padding is simply omitted (the constraint is
    /// then exactly `lits <= n`, trivially true, which is correct: there's
    /// nothing left to rule out once every literal must be true for `reif`).
    pub fn add_reified_at_least(
        &mut self,
        lits: &[Lit],
        k: usize,
        reif: Lit,
    ) -> Result<(usize, usize), ConfigError> {
        let n = lits.len();
        let pad = (n as i64) - (k as i64) - 1;

        let mut first: Vec<Lit> = lits.to_vec();
        for _ in 0..pad.max(0) {
            first.push(!reif);
        }
        let c1 = self.add_cardinality(&first, n as i64)?;

        let mut second: Vec<Lit> = lits.iter().map(|l| !*l).collect();
        for _ in 0..k {
            second.push(reif);
        }
        let c2 = self.add_cardinality(&second, n as i64)?;

        Ok((c1, c2))
    }

    /// Appends a linear objective term rewarding `var` being assigned true.
    /// A repeated `var` is not merged into its earlier term (matching the
    /// original's `ob_constraint.push_back`): the objective total sums every
    /// term naturally (§4.6), while a dense per-variable lookup such as
    /// `coefficient_in_ob` takes whichever term was added last.
    pub fn add_soft(&mut self, var: Var, weight: i64) {
        self.ensure_vars(var.index());
        self.objective.push(ObjectiveTerm { var, coefficient: weight });
    }
}
