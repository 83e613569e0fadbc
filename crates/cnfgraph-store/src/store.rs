//! A collection of formula graphs loaded from text, evaluated together.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use cnfgraph_core::{evaluate, Builder, Graph, Interpretation, Limits, ParseError, SymbolSet};
use log::{debug, info, warn};

use crate::error::LoadError;

/// Start of a comment line.
pub const COMMENT: char = '#';

/// What to do with a formula line that fails to parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadPolicy {
    /// Stop at the first bad formula; nothing from that source is kept.
    #[default]
    Abort,
    /// Record the bad formula in [`FormulaStore::rejected`] and go on.
    Skip,
}

/// A formula line that was skipped under [`LoadPolicy::Skip`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    /// 1-based line number in its source.
    pub line: usize,
    /// The formula index the line would have had.
    pub index: usize,
    /// Why it was rejected.
    pub error: ParseError,
}

/// A formula not satisfied by an interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unsatisfied {
    /// 1-based formula index.
    pub index: usize,
    /// 1-based line number in its source (0 if added directly).
    pub line: usize,
    /// The formula text.
    pub formula: String,
}

/// Outcome of evaluating every formula of a store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// Formulae evaluated to false, in store order.
    pub unsatisfied: Vec<Unsatisfied>,
    /// Number of formulae evaluated to true.
    pub satisfied: usize,
}

impl Report {
    /// Check if every formula holds.
    pub fn all_satisfied(&self) -> bool {
        self.unsatisfied.is_empty()
    }

    /// Indices of the unsatisfied formulae.
    pub fn indices(&self) -> Vec<usize> {
        self.unsatisfied.iter().map(|u| u.index).collect()
    }

    /// Line numbers of the unsatisfied formulae.
    pub fn line_numbers(&self) -> Vec<usize> {
        self.unsatisfied.iter().map(|u| u.line).collect()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.satisfied + self.unsatisfied.len();
        writeln!(f, "{} of {} formulae satisfied", self.satisfied, total)?;
        for u in &self.unsatisfied {
            writeln!(f, "  formula {} (line {}): {}", u.index, u.line, u.formula)?;
        }
        Ok(())
    }
}

/// Graphs for an ordered collection of formulae over one symbol set.
///
/// Formulae are numbered from 1 in the order they are added, across all
/// sources loaded into the store.
#[derive(Debug, Clone)]
pub struct FormulaStore {
    symbols: SymbolSet,
    limits: Limits,
    policy: LoadPolicy,
    graphs: Vec<Graph>,
    rejected: Vec<Rejected>,
    /// Index given to the next formula.
    next_index: usize,
}

impl FormulaStore {
    /// Create an empty store with default limits and [`LoadPolicy::Abort`].
    pub fn new(symbols: SymbolSet) -> Self {
        Self {
            symbols,
            limits: Limits::default(),
            policy: LoadPolicy::default(),
            graphs: Vec::new(),
            rejected: Vec::new(),
            next_index: 1,
        }
    }

    /// Use custom limits for every formula.
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Use a custom policy for bad formulae.
    pub fn with_policy(mut self, policy: LoadPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Add a single formula that has no source line.
    ///
    /// # Errors
    ///
    /// Returns the parse error; the store is left unchanged.
    pub fn add(&mut self, formula: &str) -> Result<&Graph, ParseError> {
        let graph = self.build(formula.trim(), self.next_index, 0)?;
        self.next_index += 1;
        self.graphs.push(graph);
        Ok(&self.graphs[self.graphs.len() - 1])
    }

    /// Load formulae from text, one per line.
    ///
    /// Lines are trimmed; empty lines and lines starting with `#` are
    /// skipped. Returns the number of formulae added.
    ///
    /// # Errors
    ///
    /// Under [`LoadPolicy::Abort`], returns the first bad formula and keeps
    /// nothing from `text`.
    pub fn load_str(&mut self, text: &str) -> Result<usize, LoadError> {
        self.load_lines(text.lines().map(|line| Ok(line.to_string())), None)
    }

    /// Load formulae from a reader, one per line.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] on read failures (including invalid UTF-8),
    /// and bad formulae as for [`load_str`](Self::load_str).
    pub fn load_reader<R: BufRead>(&mut self, reader: R) -> Result<usize, LoadError> {
        self.load_lines(reader.lines(), None)
    }

    /// Load formulae from a file, one per line.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] if the file cannot be opened or read, and
    /// bad formulae as for [`load_str`](Self::load_str).
    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<usize, LoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: Some(path.to_path_buf()),
            source,
        })?;
        let loaded = self.load_lines(BufReader::new(file).lines(), Some(path))?;
        info!("loaded {} formulae from `{}`", loaded, path.display());
        Ok(loaded)
    }

    fn load_lines<L>(&mut self, lines: L, path: Option<&Path>) -> Result<usize, LoadError>
    where
        L: Iterator<Item = std::io::Result<String>>,
    {
        let checkpoint = (self.graphs.len(), self.rejected.len(), self.next_index);
        let mut loaded = 0;

        for (position, line) in lines.enumerate() {
            let line_number = position + 1;
            let line = match line {
                Ok(line) => line,
                Err(source) => {
                    self.rollback(checkpoint);
                    return Err(LoadError::Io {
                        path: path.map(Path::to_path_buf),
                        source,
                    });
                }
            };

            let formula = line.trim();
            if formula.is_empty() || formula.starts_with(COMMENT) {
                continue;
            }

            let index = self.next_index;
            self.next_index += 1;

            match self.build(formula, index, line_number) {
                Ok(graph) => {
                    self.graphs.push(graph);
                    loaded += 1;
                }
                Err(error) => match self.policy {
                    LoadPolicy::Abort => {
                        self.rollback(checkpoint);
                        return Err(LoadError::Formula {
                            line: line_number,
                            index,
                            source: error,
                        });
                    }
                    LoadPolicy::Skip => {
                        warn!("skipping line {}: {}", line_number, error);
                        self.rejected.push(Rejected {
                            line: line_number,
                            index,
                            error,
                        });
                    }
                },
            }
        }

        Ok(loaded)
    }

    fn rollback(&mut self, (graphs, rejected, next_index): (usize, usize, usize)) {
        self.graphs.truncate(graphs);
        self.rejected.truncate(rejected);
        self.next_index = next_index;
    }

    fn build(&self, formula: &str, index: usize, line: usize) -> Result<Graph, ParseError> {
        Builder::new(&self.symbols, formula)
            .with_limits(self.limits)
            .with_provenance(index, line)
            .build()
    }

    /// Evaluate every formula under one interpretation.
    pub fn evaluate<I>(&self, world: &I) -> Report
    where
        I: Interpretation + ?Sized,
    {
        let mut report = Report::default();
        for graph in &self.graphs {
            if evaluate(graph, world) {
                report.satisfied += 1;
            } else {
                report.unsatisfied.push(Unsatisfied {
                    index: graph.formula_index(),
                    line: graph.line_number(),
                    formula: graph.formula().to_string(),
                });
            }
        }
        debug!(
            "{} of {} formulae unsatisfied",
            report.unsatisfied.len(),
            self.graphs.len()
        );
        report
    }

    /// The graph of the formula with the given 1-based index.
    pub fn graph(&self, index: usize) -> Option<&Graph> {
        self.graphs.iter().find(|graph| graph.formula_index() == index)
    }

    /// All graphs in store order.
    pub fn graphs(&self) -> &[Graph] {
        &self.graphs
    }

    /// Formulae skipped under [`LoadPolicy::Skip`].
    pub fn rejected(&self) -> &[Rejected] {
        &self.rejected
    }

    /// The symbol set every formula is checked against.
    pub fn symbols(&self) -> &SymbolSet {
        &self.symbols
    }

    /// Number of graphs.
    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    /// Check if the store holds no graph.
    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }
}
