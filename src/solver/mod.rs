pub mod scope;
pub mod varisat;

use indexmap::IndexMap;

use crate::cnf::cnf::{Clause, ClauseId};
use crate::error::Result;
use crate::ltms::Explanation;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverStats {
    pub search_calls: usize,
    pub propagations: usize,
    pub stale_candidates: usize,
    pub contradictions: usize,
}

/// A clause set plus premises, addressed by stable clause indices.
pub trait SatProblem<V> {
    fn add_clause(&mut self, clause: Clause<V>) -> ClauseId;

    fn add_clauses<I>(&mut self, clauses: I) -> Vec<ClauseId>
    where
        I: IntoIterator<Item = Clause<V>>,
        Self: Sized,
    {
        clauses.into_iter().map(|c| self.add_clause(c)).collect()
    }

    fn remove_clause(&mut self, index: ClauseId) -> Result<Clause<V>>;
    fn clause(&self, index: ClauseId) -> Result<&Clause<V>>;
    fn contains_clause(&self, index: ClauseId) -> bool;
    fn clause_count(&self) -> usize;

    fn assume(&mut self, var: V, value: bool);

    fn assume_all<I>(&mut self, premises: I)
    where
        I: IntoIterator<Item = (V, bool)>,
        Self: Sized,
    {
        for (var, value) in premises {
            self.assume(var, value);
        }
    }

    fn assumption(&self, var: &V) -> Option<bool>;
    fn assumptions(&self) -> &IndexMap<V, bool>;
    fn clear_assumptions(&mut self);
}

pub trait SatSolver<V>: SatProblem<V> {
    fn is_satisfiable(&mut self) -> bool;

    /// Values as of the most recent search; empty before the first one.
    fn model(&self) -> &IndexMap<V, bool>;
}

/// Single-level clause rollback.
pub trait MutableSatSolver<V>: SatSolver<V> {
    fn begin_scope(&mut self);

    /// Drops the clauses added since `begin_scope` (newest first) and every
    /// premise, including those asserted before the scope began.
    fn end_scope(&mut self) -> Vec<(ClauseId, Clause<V>)>;
}

pub trait MusExtractor<V>: SatSolver<V> {
    fn all_explanations(&mut self) -> Vec<Explanation>;

    fn smallest_explanation(&mut self) -> Option<Explanation>;

    /// A minimal unsatisfiable subset as clauses rather than indices.
    fn minimal_unsatisfiable_subset(&mut self) -> Result<Vec<Clause<V>>>;

    fn all_minimal_unsatisfiable_subsets(&mut self) -> Result<Vec<Vec<Clause<V>>>>;
}
