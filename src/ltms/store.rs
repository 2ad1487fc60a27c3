use indexmap::{IndexMap, IndexSet};

use crate::cnf::cnf::{Clause, ClauseId, Variable};
use crate::error::{LtmsError, Result};

/// Clauses keyed by stable index, plus the reverse variable -> clauses map.
///
/// Both maps keep insertion order, so iterating all clauses or the clauses
/// of one variable is reproducible across runs with the same history.
#[derive(Debug, Clone)]
pub struct ClauseStore<V> {
    clauses: IndexMap<ClauseId, Clause<V>>,
    var_clauses: IndexMap<V, IndexSet<ClauseId>>,
    next_index: ClauseId,
}

impl<V: Variable> ClauseStore<V> {
    pub fn new() -> Self {
        Self {
            clauses: IndexMap::new(),
            var_clauses: IndexMap::new(),
            next_index: 0,
        }
    }

    pub fn add(&mut self, clause: Clause<V>) -> ClauseId {
        let index = self.next_index;
        self.next_index += 1;
        for lit in &clause {
            self.var_clauses
                .entry(lit.var.clone())
                .or_default()
                .insert(index);
        }
        self.clauses.insert(index, clause);
        index
    }

    pub fn remove(&mut self, index: ClauseId) -> Result<Clause<V>> {
        let clause = self
            .clauses
            .shift_remove(&index)
            .ok_or(LtmsError::ClauseNotFound(index))?;
        for lit in &clause {
            let Some(set) = self.var_clauses.get_mut(&lit.var) else {
                continue;
            };
            if set.shift_remove(&index) && set.is_empty() {
                self.var_clauses.shift_remove(&lit.var);
            }
        }
        Ok(clause)
    }

    pub fn get(&self, index: ClauseId) -> Result<&Clause<V>> {
        self.clauses
            .get(&index)
            .ok_or(LtmsError::ClauseNotFound(index))
    }

    pub fn contains(&self, index: ClauseId) -> bool {
        self.clauses.contains_key(&index)
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Live clauses in add order.
    pub fn iter(&self) -> impl Iterator<Item = (ClauseId, &Clause<V>)> {
        self.clauses.iter().map(|(&i, c)| (i, c))
    }

    pub fn indices(&self) -> impl Iterator<Item = ClauseId> + '_ {
        self.clauses.keys().copied()
    }

    /// Clauses mentioning `var`, in add order.
    pub fn clauses_of(&self, var: &V) -> Option<&IndexSet<ClauseId>> {
        self.var_clauses.get(var)
    }

    pub fn variables(&self) -> impl Iterator<Item = &V> {
        self.var_clauses.keys()
    }
}

impl<V: Variable> Default for ClauseStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cnf::cnf::Lit;

    #[test]
    fn indices_are_never_reused() {
        let mut store = ClauseStore::new();
        let a = store.add(vec![Lit::pos("x")]);
        store.remove(a).expect("remove");
        let b = store.add(vec![Lit::pos("x")]);
        assert_ne!(a, b);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn removal_prunes_empty_variable_entries() {
        let mut store = ClauseStore::new();
        let a = store.add(vec![Lit::pos("x"), Lit::neg_of("y")]);
        let b = store.add(vec![Lit::pos("y")]);
        store.remove(a).expect("remove");
        assert!(store.clauses_of(&"x").is_none());
        let ys = store.clauses_of(&"y").expect("y still used");
        assert_eq!(ys.iter().copied().collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn repeated_literals_are_kept() {
        let mut store = ClauseStore::new();
        let a = store.add(vec![Lit::pos("x"), Lit::pos("x")]);
        assert_eq!(store.get(a).expect("get").len(), 2);
        store.remove(a).expect("remove");
        assert!(store.clauses_of(&"x").is_none());
    }

    #[test]
    fn unknown_index_is_reported() {
        let mut store = ClauseStore::<&str>::new();
        assert_eq!(store.remove(3), Err(LtmsError::ClauseNotFound(3)));
        assert_eq!(store.get(0), Err(LtmsError::ClauseNotFound(0)));
    }
}
