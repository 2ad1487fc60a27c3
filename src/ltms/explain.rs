use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::cnf::cnf::{ClauseId, Lit, Variable};

use super::state::State;
use super::store::ClauseStore;

/// Clause indices that, with the premises, reproduce one contradiction.
///
/// Not a certified minimal core: it is the union of the clauses along the
/// justification path that happened to reach the contradiction.
pub type Explanation = BTreeSet<ClauseId>;

/// Unwind the justifications behind `violated`.
///
/// `derived` is the most recent derivation of the current attempt; `None`
/// means the premises alone violate the clause and nothing is unwound.
pub fn explain<V: Variable>(
    store: &ClauseStore<V>,
    state: &State<V>,
    violated: ClauseId,
    derived: Option<&(Lit<V>, ClauseId)>,
) -> Explanation {
    let mut explanation = Explanation::new();
    explanation.insert(violated);

    let Some((derived_lit, derived_clause)) = derived else {
        return explanation;
    };

    // antecedent literal -> clause it was referenced in
    let mut antecedents = IndexMap::<Lit<V>, ClauseId>::new();
    antecedents.insert(derived_lit.clone(), *derived_clause);
    collect_antecedents(store, state, derived_lit, &mut antecedents);

    // the violated clause's other literals may have been falsified by
    // derivations off the derived literal's path
    if let Ok(clause) = store.get(violated) {
        for lit in clause {
            if lit.var == derived_lit.var || antecedents.contains_key(lit) {
                continue;
            }
            antecedents.insert(lit.clone(), violated);
            collect_antecedents(store, state, lit, &mut antecedents);
        }
    }

    for (lit, clause) in &antecedents {
        explanation.insert(*clause);
        if let Some(reason) = state.reason(&lit.var) {
            explanation.insert(reason);
        }
    }
    explanation
}

/// Fewest clauses wins; the earlier explanation wins a tie.
pub fn smallest_of<I>(explanations: I) -> Option<Explanation>
where
    I: IntoIterator<Item = Explanation>,
{
    let mut smallest: Option<Explanation> = None;
    for explanation in explanations {
        if smallest
            .as_ref()
            .is_none_or(|best| explanation.len() < best.len())
        {
            smallest = Some(explanation);
        }
    }
    smallest
}

/// Depth-first, pre-order walk of the reasons below `root`, recording each
/// antecedent once together with the clause that referenced it.
fn collect_antecedents<V: Variable>(
    store: &ClauseStore<V>,
    state: &State<V>,
    root: &Lit<V>,
    out: &mut IndexMap<Lit<V>, ClauseId>,
) {
    let Some(reason) = state.reason(&root.var) else {
        return;
    };
    let mut stack = vec![(root.var.clone(), reason, 0usize)];
    while let Some((var, reason, pos)) = stack.pop() {
        let Ok(clause) = store.get(reason) else {
            continue;
        };
        let Some(antecedent) = clause.get(pos) else {
            continue;
        };
        stack.push((var.clone(), reason, pos + 1));
        if antecedent.var == var || out.contains_key(antecedent) {
            continue;
        }
        out.insert(antecedent.clone(), reason);
        if let Some(next) = state.reason(&antecedent.var) {
            stack.push((antecedent.var.clone(), next, 0));
        }
    }
}
