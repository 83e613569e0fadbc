//! DAG representation for CNF computational graphs.

use std::collections::HashSet;
use std::fmt;

/// Index of a node within its graph.
///
/// Ids are dense: a node's id equals its position in [`Graph::nodes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in its graph.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

/// What a node computes, with its dependencies.
///
/// Dependencies always refer to earlier nodes of the same graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A propositional symbol (leaf).
    Symbol(String),
    /// Negation of a symbol node.
    Not([NodeId; 1]),
    /// Disjunction of two nodes.
    Or([NodeId; 2]),
    /// Conjunction of two nodes.
    And([NodeId; 2]),
}

impl NodeKind {
    /// Short name of the node kind.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Symbol(_) => "symbol",
            NodeKind::Not(_) => "not",
            NodeKind::Or(_) => "or",
            NodeKind::And(_) => "and",
        }
    }
}

/// A node in the computational graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// The node's position in the graph.
    pub id: NodeId,
    /// The operation this node performs.
    pub kind: NodeKind,
}

impl Node {
    fn new(id: usize, kind: NodeKind) -> Self {
        Self {
            id: NodeId(id),
            kind,
        }
    }

    /// The symbol name, for symbol nodes only.
    pub fn symbol(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Symbol(name) => Some(name),
            _ => None,
        }
    }

    /// Dependencies in order: none for symbols, one for NOT, two for
    /// OR and AND.
    pub fn dependencies(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Symbol(_) => &[],
            NodeKind::Not(deps) => &deps[..],
            NodeKind::Or(deps) | NodeKind::And(deps) => &deps[..],
        }
    }
}

/// The computational graph of one CNF formula.
///
/// Nodes are stored in creation order. Every dependency exists before the
/// node referencing it is created, so the node list is a topological order
/// and the last node is the root of the whole formula.
///
/// Graphs are only produced by [`Builder::finish`](crate::Builder::finish)
/// and are immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    nodes: Vec<Node>,
    formula: String,
    formula_index: usize,
    line_number: usize,
}

impl Graph {
    pub(crate) fn new(formula: &str, formula_index: usize, line_number: usize) -> Self {
        Self {
            nodes: Vec::new(),
            formula: formula.to_string(),
            formula_index,
            line_number,
        }
    }

    pub(crate) fn set_provenance(&mut self, formula_index: usize, line_number: usize) {
        self.formula_index = formula_index;
        self.line_number = line_number;
    }

    pub(crate) fn add_symbol(&mut self, name: &str) -> NodeId {
        self.push(NodeKind::Symbol(name.to_string()))
    }

    /// `dep` must be a symbol node; the builder never negates anything else.
    pub(crate) fn add_not(&mut self, dep: NodeId) -> NodeId {
        debug_assert!(self.node(dep).and_then(Node::symbol).is_some());
        self.push(NodeKind::Not([dep]))
    }

    pub(crate) fn add_or(&mut self, left: NodeId, right: NodeId) -> NodeId {
        self.push(NodeKind::Or([left, right]))
    }

    pub(crate) fn add_and(&mut self, left: NodeId, right: NodeId) -> NodeId {
        self.push(NodeKind::And([left, right]))
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let node = Node::new(self.nodes.len(), kind);
        let id = node.id;
        debug_assert!(node.dependencies().iter().all(|dep| *dep < id));
        self.nodes.push(node);
        id
    }

    /// Nodes in topological order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Get a node by its id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// The node representing the whole formula.
    pub fn root(&self) -> Option<&Node> {
        self.nodes.last()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` only while a graph is still under construction.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The formula text this graph was built from.
    pub fn formula(&self) -> &str {
        &self.formula
    }

    /// Relative position of the formula in its source, 1-based (0 if unknown).
    pub fn formula_index(&self) -> usize {
        self.formula_index
    }

    /// Line of the formula in its source file, 1-based (0 if unknown).
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Distinct symbols referenced, in order of first appearance.
    pub fn symbols(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.nodes
            .iter()
            .filter_map(Node::symbol)
            .filter(|symbol| seen.insert(*symbol))
            .collect()
    }

    /// Calculate graph depth (longest path from a symbol to the root).
    ///
    /// Symbol nodes have depth 0; every operator adds one.
    pub fn depth(&self) -> usize {
        let mut depths: Vec<usize> = Vec::with_capacity(self.nodes.len());

        // Nodes are in topological order, so dependency depths are known.
        for node in &self.nodes {
            let depth = node
                .dependencies()
                .iter()
                .filter_map(|dep| depths.get(dep.index()))
                .max()
                .map_or(0, |deepest| deepest + 1);
            depths.push(depth);
        }

        depths.last().copied().unwrap_or(0)
    }
}

impl fmt::Display for Graph {
    /// Render the node table: id, kind, symbol and dependencies.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "formula: {}", self.formula)?;
        writeln!(f, "index  : {}", self.formula_index)?;
        writeln!(f, "linenum: {}", self.line_number)?;
        writeln!(f)?;
        writeln!(f, "id | kind   | symbol | dependencies")?;
        for node in &self.nodes {
            writeln!(
                f,
                "{} | {:<6} | {:<6} | {}",
                node.id,
                node.kind.name(),
                node.symbol().unwrap_or(""),
                format_dependencies(node.dependencies()),
            )?;
        }
        Ok(())
    }
}

pub(crate) fn format_dependencies(deps: &[NodeId]) -> String {
    let ids: Vec<String> = deps.iter().map(NodeId::to_string).collect();
    format!("[{}]", ids.join(", "))
}
