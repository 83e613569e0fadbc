//! State machine builder for CNF computational graphs.
//!
//! The builder consumes formula tokens one-by-one, validates the CNF
//! structure and appends graph nodes as it goes. A formula is a conjunction
//! of clauses; each clause is an optionally bracketed disjunction of
//! literals; each literal is an optionally negated symbol:
//!
//! ```text
//! formula := clause ('&' clause)*
//! clause  := ['('] literal ('|' literal)* [')']
//! literal := ['!'] symbol
//! ```

use log::{debug, trace};

use crate::error::{Limit, ParseError, SyntaxReason};
use crate::graph::{Graph, NodeId};
use crate::limits::Limits;
use crate::symbols::SymbolSet;
use crate::token::{tokenize, Component, Literal, Token, LEFT_PAREN};

/// Deterministic state machine for graph construction.
///
/// The builder enforces all structural constraints:
/// - Clauses begin with a literal and alternate literal / `|` / literal
/// - At most one bracket pair per clause, wrapping the whole clause
/// - Every symbol belongs to the declared symbol set
/// - Resource limits (max nodes, max clauses)
#[derive(Debug)]
pub struct Builder<'a> {
    symbols: &'a SymbolSet,
    formula: &'a str,
    graph: Graph,
    limits: Limits,
    /// A `(` of the current clause awaits its `)`.
    bracket_open: bool,
    /// The current clause's bracket pair is complete.
    bracket_closed: bool,
    /// A `|` awaits its right-hand literal.
    or_pending: bool,
    /// Top node of the clause being read.
    clause_root: Option<NodeId>,
    /// Conjunction of all completed clauses; set by the first `&`.
    formula_root: Option<NodeId>,
    last_component: Option<Component>,
    /// 1-based number of the clause being read.
    clause: usize,
}

impl<'a> Builder<'a> {
    /// Create a builder for `formula` with default limits.
    ///
    /// The formula text is recorded in the graph and in every error; the
    /// tokens themselves are fed with [`push`](Self::push) or all at once
    /// with [`build`](Self::build).
    pub fn new(symbols: &'a SymbolSet, formula: &'a str) -> Self {
        Self {
            symbols,
            formula,
            graph: Graph::new(formula, 0, 0),
            limits: Limits::default(),
            bracket_open: false,
            bracket_closed: false,
            or_pending: false,
            clause_root: None,
            formula_root: None,
            last_component: None,
            clause: 1,
        }
    }

    /// Use custom limits.
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Record where the formula came from: its 1-based index among the
    /// formulae of a file and its 1-based line number.
    pub fn with_provenance(mut self, formula_index: usize, line_number: usize) -> Self {
        self.graph.set_provenance(formula_index, line_number);
        self
    }

    /// The 1-based number of the clause being read.
    pub fn clause(&self) -> usize {
        self.clause
    }

    /// Number of nodes appended so far.
    pub fn node_count(&self) -> usize {
        self.graph.len()
    }

    /// Check if [`finish`](Self::finish) would succeed right now.
    pub fn is_completable(&self) -> bool {
        // A multi-clause formula still needs its final AND node.
        let room = self.formula_root.is_none() || self.graph.len() < self.limits.max_nodes;
        !self.bracket_open && !self.or_pending && self.clause_root.is_some() && room
    }

    /// Feed a single token to the builder.
    ///
    /// # Errors
    ///
    /// Returns an error at the first token that violates the grammar,
    /// names an unknown symbol, or outgrows the limits.
    pub fn push(&mut self, token: Token<'_>) -> Result<(), ParseError> {
        trace!("clause {}: token {:?}", self.clause, token);

        match token {
            Token::Or => self.handle_or()?,
            Token::And => return self.handle_and(),
            Token::LeftParen => return self.open_bracket(),
            Token::RightParen => return self.close_bracket(),
            Token::Literal(text) => self.handle_literal(text)?,
        }

        match token.component() {
            Some(component) => self.check_alternation(component),
            None => Ok(()),
        }
    }

    /// Tokenize the whole formula, feed every token and finish.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by [`push`](Self::push) or
    /// [`finish`](Self::finish).
    pub fn build(mut self) -> Result<Graph, ParseError> {
        for token in tokenize(self.formula) {
            self.push(token)?;
        }
        self.finish()
    }

    /// Finalize and return the graph.
    ///
    /// If the formula has more than one clause, the last clause is joined
    /// to the others by a final AND node, which becomes the root.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A bracket is still open
    /// - An OR is missing its right-hand literal
    /// - The last clause (or the whole formula) holds no literal
    pub fn finish(mut self) -> Result<Graph, ParseError> {
        if self.bracket_open {
            return Err(self.syntax(SyntaxReason::FormulaNeedsClosingParen));
        }
        if self.or_pending {
            return Err(self.syntax(SyntaxReason::ClauseIllFormed));
        }

        let Some(clause_root) = self.clause_root else {
            let reason = match self.formula_root {
                Some(_) => SyntaxReason::ClauseMustBeginWithLiteral,
                None => SyntaxReason::EmptyFormula,
            };
            return Err(self.syntax(reason));
        };

        if let Some(formula_root) = self.formula_root {
            self.append(|graph| graph.add_and(formula_root, clause_root))?;
        }

        debug!(
            "built graph for `{}`: {} clauses, {} nodes",
            self.formula,
            self.clause,
            self.graph.len()
        );
        Ok(self.graph)
    }

    /// Handle `|`.
    fn handle_or(&mut self) -> Result<(), ParseError> {
        if self.clause_root.is_none() {
            return Err(self.syntax(SyntaxReason::ClauseMustBeginWithLiteral));
        }
        if self.bracket_closed {
            return Err(self.syntax(SyntaxReason::ClauseAlreadyClosed));
        }
        self.or_pending = true;
        Ok(())
    }

    /// Handle `&`, which ends the current clause.
    fn handle_and(&mut self) -> Result<(), ParseError> {
        if self.or_pending {
            return Err(self.syntax(SyntaxReason::ClauseIllFormed));
        }
        if self.bracket_open {
            return Err(self.syntax(SyntaxReason::ClauseNeedsClosingParen));
        }
        let Some(clause_root) = self.clause_root else {
            return Err(self.syntax(SyntaxReason::ClauseMustBeginWithLiteral));
        };

        // The first `&` only records the finished clause; later ones join it
        // to everything before.
        let formula_root = match self.formula_root {
            Some(formula_root) => self.append(|graph| graph.add_and(formula_root, clause_root))?,
            None => clause_root,
        };
        self.formula_root = Some(formula_root);

        // Prepare for a new clause
        self.clause_root = None;
        self.bracket_closed = false;
        self.last_component = None;
        self.clause += 1;
        Ok(())
    }

    /// Handle `(`, standalone or fused to a literal.
    fn open_bracket(&mut self) -> Result<(), ParseError> {
        if self.clause_root.is_some() || self.bracket_closed {
            return Err(self.syntax(SyntaxReason::LeftParenMisplaced));
        }
        if self.bracket_open {
            return Err(self.syntax(SyntaxReason::NestedLeftParen));
        }
        self.bracket_open = true;
        Ok(())
    }

    /// Handle `)`, standalone or fused to a literal.
    fn close_bracket(&mut self) -> Result<(), ParseError> {
        if !self.bracket_open {
            return Err(self.syntax(SyntaxReason::SingletonRightParen));
        }
        self.bracket_open = false;
        self.bracket_closed = true;
        Ok(())
    }

    /// Handle a literal token, appending its symbol (and NOT, and OR) nodes.
    fn handle_literal(&mut self, text: &str) -> Result<(), ParseError> {
        // A misplaced `(` is reported before anything inside the token.
        if text.starts_with(LEFT_PAREN) {
            self.open_bracket()?;
        }
        let literal = Literal::decompose(text).map_err(|reason| self.syntax(reason))?;

        if literal.closes {
            self.close_bracket()?;
        }

        if !self.symbols.contains(literal.symbol) {
            return Err(ParseError::UnrecognizedSymbol {
                formula: self.formula.to_string(),
                clause: self.clause,
                symbol: literal.symbol.to_string(),
            });
        }

        let mut node = self.append(|graph| graph.add_symbol(literal.symbol))?;
        if literal.negated {
            let symbol = node;
            node = self.append(|graph| graph.add_not(symbol))?;
        }

        let clause_root = match (self.clause_root, self.or_pending) {
            (Some(clause_root), true) => {
                self.or_pending = false;
                self.append(|graph| graph.add_or(clause_root, node))?
            }
            _ => node,
        };
        self.clause_root = Some(clause_root);
        Ok(())
    }

    /// Within a clause, literals and operators must strictly alternate,
    /// starting with a literal.
    fn check_alternation(&mut self, current: Component) -> Result<(), ParseError> {
        let reason = match (self.last_component, current) {
            (None, Component::Operator) => Some(SyntaxReason::ClauseMustBeginWithLiteral),
            (Some(Component::Operator), Component::Operator) => {
                Some(SyntaxReason::OperatorNotFollowedByLiteral)
            }
            (Some(Component::Literal), Component::Literal) => {
                Some(SyntaxReason::LiteralNotFollowedByOperator)
            }
            _ => None,
        };

        match reason {
            Some(reason) => Err(self.syntax(reason)),
            None => {
                self.last_component = Some(current);
                Ok(())
            }
        }
    }

    /// Append a node unless the clause or node limit has been reached.
    ///
    /// Every clause appends at least its symbol node, so checking here
    /// counts the first clause too, before the graph grows.
    fn append(&mut self, add: impl FnOnce(&mut Graph) -> NodeId) -> Result<NodeId, ParseError> {
        if self.clause > self.limits.max_clauses {
            return Err(self.limit(Limit::Clauses(self.limits.max_clauses)));
        }
        if self.graph.len() >= self.limits.max_nodes {
            return Err(self.limit(Limit::Nodes(self.limits.max_nodes)));
        }
        Ok(add(&mut self.graph))
    }

    fn syntax(&self, reason: SyntaxReason) -> ParseError {
        ParseError::Syntax {
            formula: self.formula.to_string(),
            clause: self.clause,
            reason,
        }
    }

    fn limit(&self, limit: Limit) -> ParseError {
        ParseError::LimitExceeded {
            formula: self.formula.to_string(),
            clause: self.clause,
            limit,
        }
    }
}

/// Parse a CNF formula and build its computational graph.
///
/// # Errors
///
/// Returns a [`ParseError`] at the first grammar violation or unknown
/// symbol; no partial graph is ever returned.
pub fn parse(formula: &str, symbols: &SymbolSet) -> Result<Graph, ParseError> {
    Builder::new(symbols, formula).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeKind;

    fn symbols() -> SymbolSet {
        SymbolSet::new(["A", "B", "C", "D"]).unwrap()
    }

    fn reason(formula: &str) -> Option<SyntaxReason> {
        parse(formula, &symbols()).unwrap_err().reason()
    }

    fn kinds(graph: &Graph) -> Vec<&'static str> {
        graph.nodes().iter().map(|node| node.kind.name()).collect()
    }

    #[test]
    fn test_single_symbol() {
        let graph = parse("A", &symbols()).unwrap();
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.root().and_then(|root| root.symbol()), Some("A"));
    }

    #[test]
    fn test_negated_disjunction_layout() {
        let graph = parse("!A | B", &symbols()).unwrap();
        assert_eq!(kinds(&graph), vec!["symbol", "not", "symbol", "or"]);

        let nodes = graph.nodes();
        assert_eq!(nodes[1].dependencies(), &[nodes[0].id]);
        assert_eq!(nodes[3].dependencies(), &[nodes[1].id, nodes[2].id]);
    }

    #[test]
    fn test_conjunction_layout() {
        let graph = parse("(A | B) & (C | !D) & A", &symbols()).unwrap();
        assert_eq!(
            kinds(&graph),
            vec![
                "symbol", "symbol", "or", // clause 1
                "symbol", "symbol", "not", "or", // clause 2
                "and", // clause 1 & clause 2, made by the second `&`
                "symbol", // clause 3
                "and", // final join
            ]
        );

        let nodes = graph.nodes();
        assert_eq!(nodes[7].kind, NodeKind::And([nodes[2].id, nodes[6].id]));
        assert_eq!(nodes[9].kind, NodeKind::And([nodes[7].id, nodes[8].id]));
    }

    #[test]
    fn test_push_tokens_one_by_one() {
        let symbols = symbols();
        let mut builder = Builder::new(&symbols, "A & B").with_provenance(4, 9);

        builder.push(Token::Literal("A")).unwrap();
        assert!(builder.is_completable());
        builder.push(Token::And).unwrap();
        assert_eq!(builder.clause(), 2);
        assert!(!builder.is_completable());
        builder.push(Token::Literal("B")).unwrap();
        assert_eq!(builder.node_count(), 2);

        let graph = builder.finish().unwrap();
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.formula_index(), 4);
        assert_eq!(graph.line_number(), 9);
    }

    #[test]
    fn test_or_rules() {
        assert_eq!(reason("| A"), Some(SyntaxReason::ClauseMustBeginWithLiteral));
        assert_eq!(reason("A | |"), Some(SyntaxReason::OperatorNotFollowedByLiteral));
        assert_eq!(reason("A |"), Some(SyntaxReason::ClauseIllFormed));
        assert_eq!(reason("(A | B) | C"), Some(SyntaxReason::ClauseAlreadyClosed));
    }

    #[test]
    fn test_and_rules() {
        assert_eq!(reason("A | & B"), Some(SyntaxReason::ClauseIllFormed));
        assert_eq!(reason("(A & B) | C"), Some(SyntaxReason::ClauseNeedsClosingParen));
        assert_eq!(reason("& A"), Some(SyntaxReason::ClauseMustBeginWithLiteral));
        assert_eq!(reason("A & & B"), Some(SyntaxReason::ClauseMustBeginWithLiteral));
        assert_eq!(reason("A &"), Some(SyntaxReason::ClauseMustBeginWithLiteral));
    }

    #[test]
    fn test_bracket_rules() {
        assert_eq!(reason("A ("), Some(SyntaxReason::LeftParenMisplaced));
        assert_eq!(reason("A | (B"), Some(SyntaxReason::LeftParenMisplaced));
        assert_eq!(reason("( (A"), Some(SyntaxReason::NestedLeftParen));
        assert_eq!(reason("( ) ( A )"), Some(SyntaxReason::LeftParenMisplaced));
        assert_eq!(reason("A )"), Some(SyntaxReason::SingletonRightParen));
        assert_eq!(reason("A)"), Some(SyntaxReason::SingletonRightParen));
        assert_eq!(reason("A (!"), Some(SyntaxReason::LeftParenMisplaced));
        assert_eq!(reason("(A"), Some(SyntaxReason::FormulaNeedsClosingParen));
    }

    #[test]
    fn test_alternation_rules() {
        assert_eq!(reason("A B"), Some(SyntaxReason::LiteralNotFollowedByOperator));
        assert_eq!(reason("(A) B"), Some(SyntaxReason::LiteralNotFollowedByOperator));
    }

    #[test]
    fn test_empty_formula() {
        assert_eq!(reason(""), Some(SyntaxReason::EmptyFormula));
        assert_eq!(reason("   "), Some(SyntaxReason::EmptyFormula));
        assert_eq!(reason("( )"), Some(SyntaxReason::EmptyFormula));
    }

    #[test]
    fn test_singleton_not() {
        assert_eq!(reason("A | ! B"), Some(SyntaxReason::SingletonNot));
        assert_eq!(reason("!"), Some(SyntaxReason::SingletonNot));
    }

    #[test]
    fn test_unrecognized_symbol() {
        let err = parse("A & (B | XxxX)", &symbols()).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnrecognizedSymbol {
                formula: "A & (B | XxxX)".to_string(),
                clause: 2,
                symbol: "XxxX".to_string(),
            }
        );
    }

    #[test]
    fn test_fused_operators_are_not_split() {
        // `A|B` is one literal token naming the symbol `A|B`.
        let err = parse("(A|B) & (C|D)", &symbols()).unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnrecognizedSymbol { ref symbol, .. } if symbol == "A|B"
        ));
    }

    #[test]
    fn test_error_carries_clause_number() {
        let err = parse("A & B & C |", &symbols()).unwrap_err();
        assert_eq!(err.clause(), 3);
        assert_eq!(err.formula(), "A & B & C |");
        assert_eq!(err.reason(), Some(SyntaxReason::ClauseIllFormed));
    }

    #[test]
    fn test_node_limit() {
        let symbols = symbols();
        let err = Builder::new(&symbols, "A | !B")
            .with_limits(Limits::new(3, 8))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ParseError::LimitExceeded {
                limit: Limit::Nodes(3),
                ..
            }
        ));
    }

    #[test]
    fn test_node_limit_blocks_completion() {
        let symbols = SymbolSet::new(["A", "B"]).unwrap();
        let mut builder = Builder::new(&symbols, "A & B").with_limits(Limits::new(2, 8));
        builder.push(Token::Literal("A")).unwrap();
        builder.push(Token::And).unwrap();
        builder.push(Token::Literal("B")).unwrap();

        // Both symbols fit, the joining AND does not.
        assert!(!builder.is_completable());
        assert!(matches!(
            builder.finish(),
            Err(ParseError::LimitExceeded {
                limit: Limit::Nodes(2),
                ..
            })
        ));

        let mut builder = Builder::new(&symbols, "A & B").with_limits(Limits::new(3, 8));
        for token in tokenize("A & B") {
            builder.push(token).unwrap();
        }
        assert!(builder.is_completable());
        assert_eq!(builder.finish().unwrap().len(), 3);
    }

    #[test]
    fn test_first_clause_counts_against_clause_limit() {
        let symbols = symbols();
        let mut builder = Builder::new(&symbols, "A | B").with_limits(Limits::new(64, 0));
        let err = builder.push(Token::Literal("A")).unwrap_err();
        assert!(matches!(
            err,
            ParseError::LimitExceeded {
                clause: 1,
                limit: Limit::Clauses(0),
                ..
            }
        ));
        assert_eq!(builder.node_count(), 0);

        let graph = Builder::new(&symbols, "A | B")
            .with_limits(Limits::new(64, 1))
            .build()
            .unwrap();
        assert_eq!(graph.len(), 3);
    }

    #[test]
    fn test_clause_limit() {
        let symbols = symbols();
        let err = Builder::new(&symbols, "A & B & C")
            .with_limits(Limits::new(64, 2))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ParseError::LimitExceeded {
                clause: 3,
                limit: Limit::Clauses(2),
                ..
            }
        ));

        let graph = Builder::new(&symbols, "A & B")
            .with_limits(Limits::new(64, 2))
            .build()
            .unwrap();
        assert_eq!(graph.len(), 3);
    }
}
