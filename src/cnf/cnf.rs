use std::fmt::Debug;
use std::hash::Hash;

use indexmap::IndexMap;

/// Anything usable as a propositional variable: only identity matters.
pub trait Variable: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> Variable for T {}

/// Stable handle of a clause, assigned at insertion and never reused.
pub type ClauseId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Lit<V> {
    pub var: V,
    pub sign: bool,
}

impl<V> Lit<V> {
    pub fn new(var: V, sign: bool) -> Self {
        Self { var, sign }
    }

    pub fn pos(var: V) -> Self {
        Self::new(var, true)
    }

    pub fn neg_of(var: V) -> Self {
        Self::new(var, false)
    }

    pub fn neg(self) -> Self {
        Self {
            var: self.var,
            sign: !self.sign,
        }
    }
}

impl<V: Variable> Lit<V> {
    /// `None` while the variable is unassigned.
    pub fn eval(&self, values: &IndexMap<V, bool>) -> Option<bool> {
        values.get(&self.var).map(|&v| v == self.sign)
    }
}

/// Disjunction of literals, kept in the order the caller gave them.
pub type Clause<V> = Vec<Lit<V>>;

/// A DIMACS-style formula over numbered variables `1..=num_vars`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cnf {
    pub num_vars: u32,
    pub clauses: Vec<Clause<u32>>,
}

impl Cnf {
    pub fn new(num_vars: u32) -> Self {
        Self {
            num_vars,
            clauses: Vec::new(),
        }
    }

    pub fn add_clause(&mut self, clause: Clause<u32>) {
        for lit in &clause {
            self.num_vars = self.num_vars.max(lit.var);
        }
        self.clauses.push(clause);
    }

    pub fn max_clause_width(&self) -> usize {
        self.clauses.iter().map(Vec::len).max().unwrap_or(0)
    }
}
