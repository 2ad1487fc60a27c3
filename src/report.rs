use indexmap::IndexMap;
use serde::Serialize;

use crate::cnf::cnf::{ClauseId, Cnf, Lit};
use crate::cnf::dimacs::lit_to_dimacs_int;
use crate::error::Result;
use crate::ltms::explain::smallest_of;
use crate::ltms::{Explanation, Ltms};
use crate::solver::varisat::certify_explanation;
use crate::solver::{SatProblem, SatSolver};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportMode {
    All,
    Smallest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExplainOptions {
    pub mode: ReportMode,
    /// Re-check every explanation with varisat.
    pub certify: bool,
}

impl Default for ExplainOptions {
    fn default() -> Self {
        Self {
            mode: ReportMode::All,
            certify: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExplanationReport {
    pub clauses: Vec<ClauseId>,
    pub replays: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certified: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExplainReport {
    pub vars: u32,
    pub clauses: usize,
    pub premises: usize,
    pub mode: ReportMode,
    pub satisfiable: bool,
    pub explanations: Vec<ExplanationReport>,
    pub propagations: usize,
    pub contradictions: usize,
    /// Final search state as signed DIMACS literals.
    pub model: Vec<i64>,
}

pub fn explain_cnf(
    cnf: &Cnf,
    premises: &IndexMap<u32, bool>,
    options: &ExplainOptions,
) -> Result<ExplainReport> {
    let mut ltms = Ltms::from_cnf(cnf);
    ltms.assume_all(premises.iter().map(|(&v, &b)| (v, b)));

    let found = ltms.find_explanations();
    let satisfiable = found.is_empty();
    let model = ltms
        .model()
        .iter()
        .map(|(&var, &value)| lit_to_dimacs_int(Lit::new(var, value)))
        .collect();

    let picked: Vec<Explanation> = match options.mode {
        ReportMode::All => found,
        ReportMode::Smallest => smallest_of(found).into_iter().collect(),
    };

    let mut explanations = Vec::with_capacity(picked.len());
    for explanation in &picked {
        let certified = if options.certify {
            Some(certify_explanation(&ltms, explanation)?)
        } else {
            None
        };
        explanations.push(ExplanationReport {
            clauses: explanation.iter().copied().collect(),
            replays: ltms.replays(explanation)?,
            certified,
        });
    }

    let stats = ltms.stats();
    Ok(ExplainReport {
        vars: cnf.num_vars,
        clauses: ltms.clause_count(),
        premises: premises.len(),
        mode: options.mode,
        satisfiable,
        explanations,
        propagations: stats.propagations,
        contradictions: stats.contradictions,
        model,
    })
}
