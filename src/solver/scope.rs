use crate::cnf::cnf::ClauseId;

/// Clauses added since the scope was last opened or closed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    added: Vec<ClauseId>,
}

impl Scope {
    pub fn begin(&mut self) {
        self.added.clear();
    }

    pub fn record(&mut self, index: ClauseId) {
        self.added.push(index);
    }

    // removed ahead of end_scope by the caller
    pub fn forget(&mut self, index: ClauseId) {
        if let Some(pos) = self.added.iter().rposition(|&i| i == index) {
            self.added.remove(pos);
        }
    }

    pub fn len(&self) -> usize {
        self.added.len()
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
    }

    /// Indices in reverse add order; the scope is left empty.
    pub fn drain_newest_first(&mut self) -> Vec<ClauseId> {
        let mut out = std::mem::take(&mut self.added);
        out.reverse();
        out
    }
}
