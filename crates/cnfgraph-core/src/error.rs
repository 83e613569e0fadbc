//! Error types for symbol set setup and formula parsing.

use thiserror::Error;

/// Why a formula violates the CNF grammar.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxReason {
    /// An operator appeared before any literal of the clause.
    #[error("clause must begin with a literal")]
    ClauseMustBeginWithLiteral,

    /// An OR was left without its right-hand literal.
    #[error("clause ill-formed")]
    ClauseIllFormed,

    /// A clause was joined by `&` while its bracket was still open.
    #[error("clause needs a closing parenthesis")]
    ClauseNeedsClosingParen,

    /// An OR followed the closing bracket of its clause.
    #[error("clause already closed by a right parenthesis")]
    ClauseAlreadyClosed,

    /// A `(` appeared after a literal of the same clause.
    #[error("left parenthesis misplaced")]
    LeftParenMisplaced,

    /// A second `(` appeared before the first was closed.
    #[error("two open left parentheses not valid in CNF")]
    NestedLeftParen,

    /// A `)` appeared with no open bracket.
    #[error("singleton right parenthesis not allowed")]
    SingletonRightParen,

    /// A `!` with no symbol after it.
    #[error("singleton ! operator not allowed")]
    SingletonNot,

    /// An operator was followed by something other than a literal.
    #[error("operator must be followed by a literal")]
    OperatorNotFollowedByLiteral,

    /// A literal was followed by something other than an operator.
    #[error("only an operator can follow a literal")]
    LiteralNotFollowedByOperator,

    /// The formula ended with a bracket still open.
    #[error("formula needs a closing parenthesis")]
    FormulaNeedsClosingParen,

    /// The formula holds no literal at all.
    #[error("formula contains no literal")]
    EmptyFormula,
}

/// A resource limit hit while building a graph.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Limit {
    /// Maximum node count exceeded.
    #[error("maximum nodes exceeded ({0})")]
    Nodes(usize),

    /// Maximum clause count exceeded.
    #[error("maximum clauses exceeded ({0})")]
    Clauses(usize),
}

/// Errors that can occur while parsing a formula into a graph.
///
/// Every variant carries the formula text and the number of the clause
/// being read when the problem was found.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The token stream violates the CNF grammar.
    #[error("formula `{formula}`, clause {clause}: {reason}")]
    Syntax {
        formula: String,
        clause: usize,
        reason: SyntaxReason,
    },

    /// A literal names a symbol outside the declared symbol set.
    #[error("formula `{formula}`, clause {clause}: propSymbol `{symbol}` not recognised")]
    UnrecognizedSymbol {
        formula: String,
        clause: usize,
        symbol: String,
    },

    /// The graph outgrew the configured limits.
    #[error("formula `{formula}`, clause {clause}: {limit}")]
    LimitExceeded {
        formula: String,
        clause: usize,
        limit: Limit,
    },
}

impl ParseError {
    /// The offending formula text.
    pub fn formula(&self) -> &str {
        match self {
            ParseError::Syntax { formula, .. }
            | ParseError::UnrecognizedSymbol { formula, .. }
            | ParseError::LimitExceeded { formula, .. } => formula,
        }
    }

    /// The 1-based number of the clause being read.
    pub fn clause(&self) -> usize {
        match self {
            ParseError::Syntax { clause, .. }
            | ParseError::UnrecognizedSymbol { clause, .. }
            | ParseError::LimitExceeded { clause, .. } => *clause,
        }
    }

    /// The grammar violation, if this is a syntax error.
    pub fn reason(&self) -> Option<SyntaxReason> {
        match self {
            ParseError::Syntax { reason, .. } => Some(*reason),
            _ => None,
        }
    }

    /// Check if this is a grammar violation.
    pub fn is_syntax(&self) -> bool {
        matches!(self, ParseError::Syntax { .. })
    }
}

/// Errors that can occur while setting up a symbol set.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SymbolSetError {
    /// No symbols were given.
    #[error("the set of propositional symbols must be non-empty")]
    Empty,

    /// A symbol was given twice.
    #[error("the set of propositional symbols contains duplicate `{0}`")]
    Duplicate(String),

    /// A symbol contains one of the operator characters.
    #[error("propositional symbol `{symbol}` cannot use the operator character `{operator}`")]
    OperatorCharacter { symbol: String, operator: char },

    /// A symbol is not identifier-shaped.
    #[error("propositional symbol `{0}` is not a valid identifier")]
    NotIdentifier(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_message() {
        let err = ParseError::Syntax {
            formula: "A | |".to_string(),
            clause: 1,
            reason: SyntaxReason::OperatorNotFollowedByLiteral,
        };
        assert_eq!(
            err.to_string(),
            "formula `A | |`, clause 1: operator must be followed by a literal"
        );
        assert_eq!(err.formula(), "A | |");
        assert_eq!(err.clause(), 1);
        assert!(err.is_syntax());
    }

    #[test]
    fn test_unrecognized_symbol_message() {
        let err = ParseError::UnrecognizedSymbol {
            formula: "A & XxxX".to_string(),
            clause: 2,
            symbol: "XxxX".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "formula `A & XxxX`, clause 2: propSymbol `XxxX` not recognised"
        );
        assert!(!err.is_syntax());
        assert_eq!(err.reason(), None);
    }

    #[test]
    fn test_limit_message() {
        let err = ParseError::LimitExceeded {
            formula: "A".to_string(),
            clause: 1,
            limit: Limit::Nodes(0),
        };
        assert_eq!(err.to_string(), "formula `A`, clause 1: maximum nodes exceeded (0)");
    }
}
