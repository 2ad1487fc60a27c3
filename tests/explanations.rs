use ltms::solver::varisat::certify_explanation;
use ltms::solver::{MusExtractor, SatProblem, SatSolver};
use ltms::{Explanation, Lit, Ltms, LtmsError};

fn ids(e: &Explanation) -> Vec<usize> {
    e.iter().copied().collect()
}

#[test]
fn implication_chain_is_explained_in_full() {
    let mut ltms = Ltms::new();
    let c0 = ltms.add_clause(vec![Lit::neg_of("A"), Lit::pos("B")]);
    let c1 = ltms.add_clause(vec![Lit::neg_of("B"), Lit::pos("C")]);
    let c2 = ltms.add_clause(vec![Lit::neg_of("C")]);
    ltms.assume("A", true);

    let all = ltms.all_explanations();
    assert!(!all.is_empty());
    for e in &all {
        assert_eq!(ids(e), vec![c0, c1, c2]);
    }
    assert!(!ltms.is_satisfiable());
}

#[test]
fn premises_alone_short_circuit_without_propagation() {
    let mut ltms = Ltms::new();
    ltms.add_clause(vec![Lit::neg_of("A")]);
    ltms.add_clause(vec![Lit::pos("B"), Lit::pos("C")]);
    ltms.assume("A", true);

    let all = ltms.all_explanations();
    assert_eq!(all.len(), 1);
    assert_eq!(ids(&all[0]), vec![0]);
    assert_eq!(ltms.stats().propagations, 0);
}

#[test]
fn empty_clause_is_always_violated() {
    let mut ltms = Ltms::<&str>::new();
    ltms.add_clause(vec![Lit::pos("x")]);
    let empty = ltms.add_clause(Vec::new());
    let all = ltms.all_explanations();
    assert_eq!(all.len(), 1);
    assert_eq!(ids(&all[0]), vec![empty]);
}

#[test]
fn later_drain_turns_up_a_shorter_explanation() {
    let mut ltms = Ltms::new();
    ltms.add_clause(vec![Lit::neg_of("a"), Lit::pos("e")]); // 0
    ltms.add_clause(vec![Lit::neg_of("e")]); // 1
    ltms.add_clause(vec![Lit::neg_of("a"), Lit::pos("b")]); // 2
    ltms.add_clause(vec![Lit::neg_of("b"), Lit::pos("c")]); // 3
    ltms.add_clause(vec![Lit::neg_of("c"), Lit::pos("d")]); // 4
    ltms.add_clause(vec![Lit::neg_of("d")]); // 5
    ltms.assume("a", true);

    let all = ltms.all_explanations();
    assert_eq!(all.len(), 4);
    assert_eq!(ids(&all[0]), vec![2, 3, 4, 5]);
    assert_eq!(ids(&all[3]), vec![0, 1]);

    let smallest = ltms.smallest_explanation().expect("unsatisfiable");
    assert_eq!(ids(&smallest), vec![0, 1]);
    assert_eq!(ltms.stats().search_calls, 2);
}

#[test]
fn satisfiable_premises_leave_forced_model() {
    let mut ltms = Ltms::new();
    ltms.add_clause(vec![Lit::neg_of("a"), Lit::pos("b")]);
    ltms.add_clause(vec![Lit::neg_of("b"), Lit::pos("c"), Lit::pos("d")]);
    assert!(ltms.model().is_empty());

    ltms.assume("a", true);
    assert!(ltms.is_satisfiable());
    assert_eq!(ltms.smallest_explanation(), None);

    let model = ltms.model();
    assert_eq!(model.get("a"), Some(&true));
    assert_eq!(model.get("b"), Some(&true));
    assert_eq!(model.get("c"), None);
    assert_eq!(ltms.reason(&"b"), Some(0));
    assert_eq!(ltms.reason(&"a"), None);
}

#[test]
fn premise_overrides_and_clears() {
    let mut ltms = Ltms::new();
    ltms.add_clause(vec![Lit::pos("a")]);
    ltms.assume("a", false);
    assert!(!ltms.is_satisfiable());
    ltms.assume("a", true);
    assert_eq!(ltms.assumption(&"a"), Some(true));
    assert!(ltms.is_satisfiable());
    ltms.clear_assumptions();
    assert!(ltms.assumptions().is_empty());
    assert!(ltms.is_satisfiable());
}

#[test]
fn explanations_replay_and_certify() {
    let mut ltms = Ltms::new();
    ltms.add_clause(vec![Lit::neg_of(1u32), Lit::pos(2)]);
    ltms.add_clause(vec![Lit::neg_of(3), Lit::pos(4)]);
    ltms.add_clause(vec![Lit::pos(7), Lit::pos(8)]);
    ltms.add_clause(vec![Lit::neg_of(2), Lit::neg_of(4)]);
    ltms.assume(1, true);
    ltms.assume(3, true);

    let all = ltms.all_explanations();
    assert!(!all.is_empty());
    for e in &all {
        assert!(!e.contains(&2));
        assert!(ltms.replays(e).expect("replay"));
        assert!(certify_explanation(&ltms, e).expect("certify"));
    }
}

#[test]
fn restrict_rejects_unknown_indices() {
    let mut ltms = Ltms::<u32>::new();
    ltms.add_clause(vec![Lit::pos(1)]);
    let bogus = Explanation::from([0, 9]);
    assert_eq!(ltms.restrict(&bogus).err(), Some(LtmsError::ClauseNotFound(9)));
}

#[test]
fn clause_valued_subsets_are_unsupported() {
    let mut ltms = Ltms::<u32>::new();
    ltms.add_clause(vec![Lit::neg_of(1)]);
    ltms.assume(1, true);
    assert!(matches!(
        ltms.minimal_unsatisfiable_subset(),
        Err(LtmsError::Unsupported(_))
    ));
    assert!(matches!(
        ltms.all_minimal_unsatisfiable_subsets(),
        Err(LtmsError::Unsupported(_))
    ));
}

#[test]
fn unknown_clause_index_is_not_found() {
    let mut ltms = Ltms::<u32>::new();
    let c = ltms.add_clause(vec![Lit::pos(1)]);
    assert_eq!(ltms.remove_clause(c + 1), Err(LtmsError::ClauseNotFound(c + 1)));
    assert_eq!(ltms.clause(c + 1), Err(LtmsError::ClauseNotFound(c + 1)));
    assert_eq!(ltms.remove_clause(c), Ok(vec![Lit::pos(1)]));
    assert!(!ltms.contains_clause(c));
    assert_eq!(ltms.remove_clause(c), Err(LtmsError::ClauseNotFound(c)));
}

#[test]
fn repeated_runs_are_identical() {
    let build = || {
        let mut ltms = Ltms::new();
        ltms.add_clause(vec![Lit::neg_of("p"), Lit::pos("q"), Lit::pos("r")]);
        ltms.add_clause(vec![Lit::neg_of("q")]);
        ltms.add_clause(vec![Lit::neg_of("r"), Lit::pos("s")]);
        ltms.add_clause(vec![Lit::neg_of("s"), Lit::neg_of("p")]);
        ltms.add_clause(vec![Lit::pos("q"), Lit::pos("s")]);
        ltms.assume("p", true);
        ltms
    };
    let mut first = build();
    let mut second = build();
    let a = first.all_explanations();
    assert_eq!(a, second.all_explanations());
    assert_eq!(a, first.all_explanations());
}
