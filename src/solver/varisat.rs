//! Independent check of explanations with a CDCL solver.

use std::collections::HashMap;

use indexmap::IndexMap;
use varisat::ExtendFormula;

use crate::cnf::cnf::{Clause, Lit, Variable};
use crate::error::{LtmsError, Result};
use crate::ltms::{Explanation, Ltms};
use crate::solver::SatProblem;

struct VarMap<'a, V> {
    vars: HashMap<&'a V, varisat::Var>,
}

impl<'a, V: Variable> VarMap<'a, V> {
    fn new() -> Self {
        Self {
            vars: HashMap::new(),
        }
    }

    fn to_lit(&mut self, solver: &mut varisat::Solver<'static>, lit: &'a Lit<V>) -> varisat::Lit {
        let var = *self
            .vars
            .entry(&lit.var)
            .or_insert_with(|| solver.new_var());
        varisat::Lit::from_var(var, lit.sign)
    }

    fn premise_lit(
        &mut self,
        solver: &mut varisat::Solver<'static>,
        var: &'a V,
        value: bool,
    ) -> varisat::Lit {
        let v = *self.vars.entry(var).or_insert_with(|| solver.new_var());
        varisat::Lit::from_var(v, value)
    }
}

/// `Ok(true)` iff the clauses are unsatisfiable under the premises.
pub fn clauses_contradict<'a, V, I>(clauses: I, premises: &'a IndexMap<V, bool>) -> Result<bool>
where
    V: Variable + 'a,
    I: IntoIterator<Item = &'a Clause<V>>,
{
    let mut solver = varisat::Solver::new();
    let mut map = VarMap::new();

    for clause in clauses {
        let lits = clause
            .iter()
            .map(|lit| map.to_lit(&mut solver, lit))
            .collect::<Vec<_>>();
        solver.add_clause(&lits);
    }

    let assumps = premises
        .iter()
        .map(|(var, &value)| map.premise_lit(&mut solver, var, value))
        .collect::<Vec<_>>();
    solver.assume(&assumps);

    match solver.solve() {
        Ok(sat) => Ok(!sat),
        Err(e) => Err(LtmsError::Certification(e.to_string())),
    }
}

/// Confirms an explanation against the engine's premises without relying on
/// propagation order.
pub fn certify_explanation<V: Variable>(ltms: &Ltms<V>, explanation: &Explanation) -> Result<bool> {
    let clauses = explanation
        .iter()
        .map(|&index| ltms.clause(index))
        .collect::<Result<Vec<_>>>()?;
    clauses_contradict(clauses, ltms.assumptions())
}
