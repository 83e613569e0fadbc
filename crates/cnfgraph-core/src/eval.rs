//! Graph evaluator for CNF computational graphs.

use std::borrow::Borrow;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::hash::{BuildHasher, Hash};

use log::debug;

use crate::graph::{format_dependencies, Graph, NodeId, NodeKind};

/// A truth-value assignment, given as the set of symbols that are true.
///
/// Every symbol the interpretation does not list is false, so an empty set
/// assigns false to everything.
pub trait Interpretation {
    /// Check if `symbol` is assigned true.
    fn is_true(&self, symbol: &str) -> bool;
}

impl<T, S> Interpretation for HashSet<T, S>
where
    T: Borrow<str> + Hash + Eq,
    S: BuildHasher,
{
    fn is_true(&self, symbol: &str) -> bool {
        self.contains(symbol)
    }
}

impl<T> Interpretation for BTreeSet<T>
where
    T: Borrow<str> + Ord,
{
    fn is_true(&self, symbol: &str) -> bool {
        self.contains(symbol)
    }
}

impl<T: AsRef<str>> Interpretation for [T] {
    fn is_true(&self, symbol: &str) -> bool {
        self.iter().any(|s| s.as_ref() == symbol)
    }
}

impl<T: AsRef<str>, const N: usize> Interpretation for [T; N] {
    fn is_true(&self, symbol: &str) -> bool {
        self.as_slice().is_true(symbol)
    }
}

impl<T: AsRef<str>> Interpretation for Vec<T> {
    fn is_true(&self, symbol: &str) -> bool {
        self.as_slice().is_true(symbol)
    }
}

impl<I: Interpretation + ?Sized> Interpretation for &I {
    fn is_true(&self, symbol: &str) -> bool {
        (**self).is_true(symbol)
    }
}

/// Per-node values of one evaluation pass, indexed by node id.
///
/// The graph itself holds no evaluation state, so one graph can be
/// evaluated from many threads, each with its own valuation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Valuation {
    values: Vec<Option<bool>>,
}

impl Valuation {
    /// Create an empty valuation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of a node, `None` if no pass has computed it.
    pub fn get(&self, id: NodeId) -> Option<bool> {
        self.values.get(id.index()).copied().flatten()
    }

    /// Value of the last node, the formula's truth value.
    pub fn root(&self) -> Option<bool> {
        self.values.last().copied().flatten()
    }

    /// Values in node order.
    pub fn values(&self) -> &[Option<bool>] {
        &self.values
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if no pass has run yet.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Reset to one unset entry per node of `graph`.
    fn reset(&mut self, graph: &Graph) {
        self.values.clear();
        self.values.resize(graph.len(), None);
    }

    /// Value of a dependency; nodes are visited in topological order, so it
    /// is always set.
    fn value(&self, id: NodeId) -> bool {
        let value = self.get(id);
        debug_assert!(value.is_some(), "node {id} read before it was evaluated");
        value.unwrap_or(false)
    }
}

/// Evaluate a graph under an interpretation.
///
/// Returns the truth value of the formula.
pub fn evaluate<I>(graph: &Graph, world: &I) -> bool
where
    I: Interpretation + ?Sized,
{
    let mut valuation = Valuation::new();
    evaluate_into(graph, world, &mut valuation)
}

/// Evaluate a graph under an interpretation, recording every node's value.
///
/// `valuation` is cleared and refilled; its previous contents are
/// irrelevant, so one buffer can be reused across graphs and passes.
///
/// Returns the truth value of the formula (the value of the last node).
pub fn evaluate_into<I>(graph: &Graph, world: &I, valuation: &mut Valuation) -> bool
where
    I: Interpretation + ?Sized,
{
    valuation.reset(graph);

    // Evaluate nodes in topological order (already sorted in graph)
    for node in graph.nodes() {
        let value = match &node.kind {
            NodeKind::Symbol(name) => world.is_true(name),
            NodeKind::Not([dep]) => !valuation.value(*dep),
            NodeKind::Or([left, right]) => valuation.value(*left) || valuation.value(*right),
            NodeKind::And([left, right]) => valuation.value(*left) && valuation.value(*right),
        };
        valuation.values[node.id.index()] = Some(value);
    }

    let result = valuation.root().unwrap_or(false);
    debug!("evaluated `{}`: {}", graph.formula(), result);
    result
}

/// A graph rendered together with the values of one evaluation pass.
#[derive(Debug, Clone, Copy)]
pub struct Trace<'a> {
    graph: &'a Graph,
    valuation: &'a Valuation,
}

impl<'a> Trace<'a> {
    /// Pair a graph with a valuation computed for it.
    pub fn new(graph: &'a Graph, valuation: &'a Valuation) -> Self {
        Self { graph, valuation }
    }
}

impl fmt::Display for Trace<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "formula: {}", self.graph.formula())?;
        writeln!(f, "index  : {}", self.graph.formula_index())?;
        writeln!(f, "linenum: {}", self.graph.line_number())?;
        writeln!(f)?;
        writeln!(f, "id | kind   | symbol | value | dependencies")?;
        for node in self.graph.nodes() {
            writeln!(
                f,
                "{} | {:<6} | {:<6} | {:<5} | {}",
                node.id,
                node.kind.name(),
                node.symbol().unwrap_or(""),
                format_value(self.valuation.get(node.id)),
                format_dependencies(node.dependencies()),
            )?;
        }
        writeln!(f)?;
        write!(
            f,
            "formula truth value: {}",
            format_value(self.valuation.root())
        )
    }
}

fn format_value(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "true",
        Some(false) => "false",
        None => "none",
    }
}
