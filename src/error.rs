use thiserror::Error;

use crate::cnf::cnf::ClauseId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LtmsError {
    #[error("no clause with index {0}")]
    ClauseNotFound(ClauseId),

    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),

    #[error("certification failed: {0}")]
    Certification(String),
}

pub type Result<T> = std::result::Result<T, LtmsError>;
