use indexmap::IndexMap;
use tracing::trace;

use crate::cnf::cnf::{ClauseId, Lit, Variable};

use super::state::State;
use super::store::ClauseStore;

/// The one literal left to satisfy `clause`, if the clause is unit-open:
/// exactly one literal unknown and all others false.
pub fn unbound_literal<'c, V: Variable>(
    clause: &'c [Lit<V>],
    values: &IndexMap<V, bool>,
) -> Option<&'c Lit<V>> {
    let mut unbound = None;
    for lit in clause {
        match lit.eval(values) {
            Some(true) => return None,
            Some(false) => {}
            None => {
                if unbound.is_some() {
                    return None;
                }
                unbound = Some(lit);
            }
        }
    }
    unbound
}

/// Every literal false. The empty clause is always violated.
pub fn is_violated<V: Variable>(clause: &[Lit<V>], values: &IndexMap<V, bool>) -> bool {
    clause.iter().all(|lit| lit.eval(values) == Some(false))
}

/// BCP worklist over a [`ClauseStore`].
///
/// Before the first derivation of an attempt every clause is dirty; after
/// it only the clauses of the most recently derived variable are.
#[derive(Debug, Clone)]
pub struct Propagator<V> {
    worklist: Vec<ClauseId>,
    derived: Option<(Lit<V>, ClauseId)>,
}

impl<V: Variable> Propagator<V> {
    pub fn new() -> Self {
        Self {
            worklist: Vec::new(),
            derived: None,
        }
    }

    pub fn clear_worklist(&mut self) {
        self.worklist.clear();
    }

    /// Drop the record of the last derivation; the worklist is kept.
    pub fn forget_derivation(&mut self) {
        self.derived = None;
    }

    /// The literal derived most recently and the clause that forced it.
    pub fn last_derivation(&self) -> Option<&(Lit<V>, ClauseId)> {
        self.derived.as_ref()
    }

    pub fn pending(&self) -> usize {
        self.worklist.len()
    }

    fn dirty_clauses(&self, store: &ClauseStore<V>) -> Vec<ClauseId> {
        match &self.derived {
            None => store.indices().collect(),
            Some((lit, _)) => store
                .clauses_of(&lit.var)
                .map(|set| set.iter().copied().collect())
                .unwrap_or_default(),
        }
    }

    /// First dirty clause with all literals false.
    pub fn find_violated(&self, store: &ClauseStore<V>, state: &State<V>) -> Option<ClauseId> {
        self.dirty_clauses(store).into_iter().find(|&index| {
            store
                .get(index)
                .is_ok_and(|clause| is_violated(clause, state.values()))
        })
    }

    /// Queue the dirty clauses that are unit-open right now. They are checked
    /// again when popped.
    pub fn push_unit_open(&mut self, store: &ClauseStore<V>, state: &State<V>) {
        for index in self.dirty_clauses(store) {
            let Ok(clause) = store.get(index) else {
                continue;
            };
            if unbound_literal(clause, state.values()).is_some() {
                self.worklist.push(index);
            }
        }
    }

    /// Pop one candidate and, if it is still unit-open, derive its literal.
    pub fn step(&mut self, store: &ClauseStore<V>, state: &mut State<V>) -> StepOutcome {
        let Some(index) = self.worklist.pop() else {
            return StepOutcome::Exhausted;
        };
        let lit = match store.get(index) {
            Ok(clause) => unbound_literal(clause, state.values()).cloned(),
            Err(_) => None,
        };
        let Some(lit) = lit else {
            trace!(clause = index, "stale candidate");
            return StepOutcome::Stale;
        };
        trace!(clause = index, var = ?lit.var, value = lit.sign, "derived");
        state.derive(&lit, index);
        self.derived = Some((lit, index));
        StepOutcome::Derived
    }
}

impl<V: Variable> Default for Propagator<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Derived,
    Stale,
    Exhausted,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&'static str, bool)]) -> IndexMap<&'static str, bool> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn unit_open_needs_exactly_one_unknown() {
        let clause = vec![Lit::neg_of("a"), Lit::pos("b"), Lit::pos("c")];
        assert_eq!(unbound_literal(&clause, &values(&[("a", true)])), None);
        assert_eq!(
            unbound_literal(&clause, &values(&[("a", true), ("c", false)])),
            Some(&Lit::pos("b"))
        );
        assert_eq!(
            unbound_literal(&clause, &values(&[("a", true), ("c", true)])),
            None
        );
    }

    #[test]
    fn violated_means_every_literal_false() {
        let clause = vec![Lit::neg_of("a"), Lit::pos("b")];
        assert!(!is_violated(&clause, &values(&[("a", true)])));
        assert!(is_violated(&clause, &values(&[("a", true), ("b", false)])));
        assert!(is_violated::<&str>(&[], &values(&[])));
    }

    #[test]
    fn candidates_are_popped_lifo() {
        let mut store = ClauseStore::new();
        let first = store.add(vec![Lit::pos("a")]);
        let second = store.add(vec![Lit::pos("b")]);
        let mut state = State::new();
        state.reset(&IndexMap::new());

        let mut prop = Propagator::new();
        prop.push_unit_open(&store, &state);
        assert_eq!(prop.pending(), 2);
        assert_eq!(prop.step(&store, &mut state), StepOutcome::Derived);
        assert_eq!(prop.last_derivation().map(|d| d.1), Some(second));
        assert_eq!(prop.step(&store, &mut state), StepOutcome::Derived);
        assert_eq!(prop.last_derivation().map(|d| d.1), Some(first));
        assert_eq!(prop.step(&store, &mut state), StepOutcome::Exhausted);
    }

    #[test]
    fn dirty_set_narrows_after_derivation() {
        let mut store = ClauseStore::new();
        store.add(vec![Lit::neg_of("x")]);
        let unit = store.add(vec![Lit::pos("a")]);
        let mut premises = IndexMap::new();
        premises.insert("x", true);
        let mut state = State::new();
        state.reset(&premises);

        let mut prop = Propagator::new();
        // premises alone already violate clause 0
        assert_eq!(prop.find_violated(&store, &state), Some(0));
        prop.push_unit_open(&store, &state);
        assert_eq!(prop.step(&store, &mut state), StepOutcome::Derived);
        assert_eq!(prop.last_derivation().map(|d| d.1), Some(unit));
        // only clauses over `a` are examined now
        assert_eq!(prop.find_violated(&store, &state), None);
    }
}
