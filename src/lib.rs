//! Logic truth maintenance over CNF formulas.
//!
//! Given clauses and a set of fixed premises, the [`ltms::Ltms`] engine
//! propagates forced values, records which clause justified each derived
//! value and, on contradiction, walks those justifications back into
//! explanations: sets of clause indices that together with the premises
//! reproduce the contradiction.

pub mod cnf;
pub mod error;
pub mod ltms;
pub mod report;
pub mod solver;

pub use crate::cnf::cnf::{Clause, ClauseId, Cnf, Lit, Variable};
pub use crate::error::{LtmsError, Result};
pub use crate::ltms::{Explanation, Ltms};
