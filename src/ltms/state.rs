use std::collections::HashMap;

use indexmap::IndexMap;

use crate::cnf::cnf::{ClauseId, Lit, Variable};

/// Current truth values and the clause that forced each derived one.
#[derive(Debug, Clone)]
pub struct State<V> {
    values: IndexMap<V, bool>,
    reasons: HashMap<V, ClauseId>,
}

impl<V: Variable> State<V> {
    pub fn new() -> Self {
        Self {
            values: IndexMap::new(),
            reasons: HashMap::new(),
        }
    }

    /// Forget every derivation and start again from the premises.
    pub fn reset(&mut self, premises: &IndexMap<V, bool>) {
        self.reasons.clear();
        self.values.clear();
        self.values
            .extend(premises.iter().map(|(v, &b)| (v.clone(), b)));
    }

    /// Make `lit` true because `reason` had no other way to be satisfied.
    pub fn derive(&mut self, lit: &Lit<V>, reason: ClauseId) {
        self.values.insert(lit.var.clone(), lit.sign);
        self.reasons.insert(lit.var.clone(), reason);
    }

    pub fn values(&self) -> &IndexMap<V, bool> {
        &self.values
    }

    /// `None` for premises and unassigned variables.
    pub fn reason(&self, var: &V) -> Option<ClauseId> {
        self.reasons.get(var).copied()
    }

    pub fn num_derived(&self) -> usize {
        self.reasons.len()
    }
}

impl<V: Variable> Default for State<V> {
    fn default() -> Self {
        Self::new()
    }
}
