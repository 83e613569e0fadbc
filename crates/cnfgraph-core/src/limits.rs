//! Resource limits for graph construction.

/// Resource limits applied while building a graph.
///
/// Graph size is linear in formula length, so these only matter when
/// formulae come from untrusted sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of nodes in the graph.
    pub max_nodes: usize,
    /// Maximum number of clauses in the formula.
    pub max_clauses: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_nodes: 65_536,
            max_clauses: 16_384,
        }
    }
}

impl Limits {
    /// Create limits with custom values.
    pub fn new(max_nodes: usize, max_clauses: usize) -> Self {
        Self {
            max_nodes,
            max_clauses,
        }
    }

    /// No limits at all.
    pub fn permissive() -> Self {
        Self {
            max_nodes: usize::MAX,
            max_clauses: usize::MAX,
        }
    }

    /// Tight limits for small, hand-written formulae.
    pub fn strict() -> Self {
        Self {
            max_nodes: 256,
            max_clauses: 32,
        }
    }
}
