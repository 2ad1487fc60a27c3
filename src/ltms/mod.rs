//! Logic truth maintenance: boolean constraint propagation from fixed
//! premises, with every derived value justified by the clause that forced
//! it.
//!
//! The engine is not a SAT search. It never guesses; it only computes what
//! the premises force and explains the contradictions it runs into.
//!
//! ```
//! use ltms::solver::{MusExtractor, SatProblem};
//! use ltms::{Lit, Ltms};
//!
//! let mut ltms = Ltms::new();
//! ltms.add_clause(vec![Lit::neg_of("a"), Lit::pos("b")]);
//! ltms.add_clause(vec![Lit::neg_of("b")]);
//! ltms.assume("a", true);
//! let smallest = ltms.smallest_explanation().expect("contradiction");
//! assert_eq!(smallest.into_iter().collect::<Vec<_>>(), vec![0, 1]);
//! ```

pub mod explain;
pub mod propagate;
pub mod state;
pub mod store;

use indexmap::IndexMap;
use tracing::debug;

use crate::cnf::cnf::{Clause, ClauseId, Cnf, Variable};
use crate::error::{LtmsError, Result};
use crate::solver::scope::Scope;
use crate::solver::{MusExtractor, MutableSatSolver, SatProblem, SatSolver, SolverStats};

pub use self::explain::Explanation;
use self::explain::{explain, smallest_of};
use self::propagate::{Propagator, StepOutcome};
use self::state::State;
use self::store::ClauseStore;

/// Single-threaded; share between threads only behind external locking.
///
/// Scopes are one level deep. Nesting `begin_scope` calls simply restarts
/// the count of scoped clauses.
#[derive(Debug, Clone)]
pub struct Ltms<V> {
    store: ClauseStore<V>,
    premises: IndexMap<V, bool>,
    state: State<V>,
    propagator: Propagator<V>,
    scope: Scope,
    stats: SolverStats,
}

impl<V: Variable> Ltms<V> {
    pub fn new() -> Self {
        Self {
            store: ClauseStore::new(),
            premises: IndexMap::new(),
            state: State::new(),
            propagator: Propagator::new(),
            scope: Scope::default(),
            stats: SolverStats::default(),
        }
    }

    pub fn stats(&self) -> SolverStats {
        self.stats
    }

    /// Live clauses in add order.
    pub fn clauses(&self) -> impl Iterator<Item = (ClauseId, &Clause<V>)> {
        self.store.iter()
    }

    /// Indices of the live clauses mentioning `var`, in add order.
    pub fn clauses_of(&self, var: &V) -> Vec<ClauseId> {
        self.store
            .clauses_of(var)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Variables that occur in at least one live clause.
    pub fn variables(&self) -> impl Iterator<Item = &V> {
        self.store.variables()
    }

    /// The clause that forced `var` in the latest search state, if derived.
    pub fn reason(&self, var: &V) -> Option<ClauseId> {
        self.state.reason(var)
    }

    /// Run one worklist drain and collect an explanation at every
    /// contradiction met on the way.
    ///
    /// After each contradiction the derived values are dropped (premises
    /// stay) and the remaining worklist is drained further, which can turn
    /// up further, sometimes shorter, explanations. An empty result means the
    /// premises force no contradiction.
    pub fn find_explanations(&mut self) -> Vec<Explanation> {
        self.stats.search_calls += 1;
        self.reset();

        let mut explanations = Vec::new();
        if let Some(violated) = self.propagator.find_violated(&self.store, &self.state) {
            debug!(clause = violated, "premises violate clause");
            self.stats.contradictions += 1;
            explanations.push(explain(&self.store, &self.state, violated, None));
            return explanations;
        }

        self.propagator.clear_worklist();
        self.propagator.push_unit_open(&self.store, &self.state);
        loop {
            match self.propagator.step(&self.store, &mut self.state) {
                StepOutcome::Exhausted => break,
                StepOutcome::Stale => {
                    self.stats.stale_candidates += 1;
                    continue;
                }
                StepOutcome::Derived => self.stats.propagations += 1,
            }
            self.propagator.push_unit_open(&self.store, &self.state);

            let Some(violated) = self.propagator.find_violated(&self.store, &self.state) else {
                continue;
            };
            let explanation = explain(
                &self.store,
                &self.state,
                violated,
                self.propagator.last_derivation(),
            );
            debug!(
                clause = violated,
                size = explanation.len(),
                pending = self.propagator.pending(),
                "contradiction"
            );
            self.stats.contradictions += 1;
            explanations.push(explanation);
            self.reset();
        }

        debug!(
            explanations = explanations.len(),
            derived = self.state.num_derived(),
            "search finished"
        );
        explanations
    }

    fn reset(&mut self) {
        self.propagator.forget_derivation();
        self.state.reset(&self.premises);
    }

    /// A fresh engine with only the explanation's clauses (in their original
    /// order) and the same premises.
    pub fn restrict(&self, explanation: &Explanation) -> Result<Self> {
        if let Some(&missing) = explanation.iter().find(|&&i| !self.store.contains(i)) {
            return Err(LtmsError::ClauseNotFound(missing));
        }
        let mut restricted = Self::new();
        for (index, clause) in self.store.iter() {
            if explanation.contains(&index) {
                restricted.add_clause(clause.clone());
            }
        }
        restricted.premises = self.premises.clone();
        Ok(restricted)
    }

    /// Propagation over the explanation's clauses alone still contradicts the
    /// premises.
    pub fn replays(&self, explanation: &Explanation) -> Result<bool> {
        let mut restricted = self.restrict(explanation)?;
        Ok(!restricted.is_satisfiable())
    }
}

impl Ltms<u32> {
    pub fn from_cnf(cnf: &Cnf) -> Self {
        let mut ltms = Self::new();
        ltms.add_clauses(cnf.clauses.iter().cloned());
        ltms
    }
}

impl<V: Variable> Default for Ltms<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Variable> SatProblem<V> for Ltms<V> {
    fn add_clause(&mut self, clause: Clause<V>) -> ClauseId {
        let index = self.store.add(clause);
        self.scope.record(index);
        index
    }

    fn remove_clause(&mut self, index: ClauseId) -> Result<Clause<V>> {
        let clause = self.store.remove(index)?;
        self.scope.forget(index);
        Ok(clause)
    }

    fn clause(&self, index: ClauseId) -> Result<&Clause<V>> {
        self.store.get(index)
    }

    fn contains_clause(&self, index: ClauseId) -> bool {
        self.store.contains(index)
    }

    fn clause_count(&self) -> usize {
        self.store.len()
    }

    fn assume(&mut self, var: V, value: bool) {
        self.premises.insert(var, value);
    }

    fn assumption(&self, var: &V) -> Option<bool> {
        self.premises.get(var).copied()
    }

    fn assumptions(&self) -> &IndexMap<V, bool> {
        &self.premises
    }

    fn clear_assumptions(&mut self) {
        self.premises.clear();
    }
}

impl<V: Variable> SatSolver<V> for Ltms<V> {
    fn is_satisfiable(&mut self) -> bool {
        self.find_explanations().is_empty()
    }

    fn model(&self) -> &IndexMap<V, bool> {
        self.state.values()
    }
}

impl<V: Variable> MutableSatSolver<V> for Ltms<V> {
    fn begin_scope(&mut self) {
        self.scope.begin();
    }

    fn end_scope(&mut self) -> Vec<(ClauseId, Clause<V>)> {
        let mut removed = Vec::with_capacity(self.scope.len());
        for index in self.scope.drain_newest_first() {
            if let Ok(clause) = self.store.remove(index) {
                removed.push((index, clause));
            }
        }
        debug!(
            removed = removed.len(),
            premises = self.premises.len(),
            "scope closed"
        );
        self.clear_assumptions();
        removed
    }
}

impl<V: Variable> MusExtractor<V> for Ltms<V> {
    fn all_explanations(&mut self) -> Vec<Explanation> {
        self.find_explanations()
    }

    /// Smallest among one drain's explanations; earliest wins ties.
    fn smallest_explanation(&mut self) -> Option<Explanation> {
        smallest_of(self.find_explanations())
    }

    fn minimal_unsatisfiable_subset(&mut self) -> Result<Vec<Clause<V>>> {
        Err(LtmsError::Unsupported(
            "clause-valued minimal unsatisfiable subset; use smallest_explanation",
        ))
    }

    fn all_minimal_unsatisfiable_subsets(&mut self) -> Result<Vec<Vec<Clause<V>>>> {
        Err(LtmsError::Unsupported(
            "clause-valued unsatisfiable subset enumeration; use all_explanations",
        ))
    }
}
