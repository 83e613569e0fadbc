//! cnfgraph: executable computational graphs for CNF formulae.
//!
//! A propositional formula in Conjunctive Normal Form is parsed into a
//! boolean DAG whose leaves are symbols and whose inner nodes are NOT, OR
//! and AND. Evaluating the graph under an interpretation (the set of
//! symbols that are true) yields the formula's truth value.
//!
//! # Overview
//!
//! - **Whitespace tokens** — `|`, `&`, `(`, `)` stand alone; literals may
//!   carry a fused `(`, `!` and `)`
//! - **Deterministic state machine** — the grammar is checked token by
//!   token while the graph is built
//! - **Arena graph** — nodes reference earlier nodes by id, so the node list
//!   is its own topological order
//! - **Immutable graphs** — evaluation writes into a caller-owned buffer
//!
//! # Example
//!
//! ```
//! use cnfgraph_core::{evaluate, parse, SymbolSet};
//!
//! let symbols = SymbolSet::new(["A", "B", "C", "D"]).unwrap();
//! let graph = parse("(A | B) & (C | !D)", &symbols).unwrap();
//!
//! assert!(!evaluate(&graph, &["A", "D"])); // C | !D is false
//! assert!(evaluate(&graph, &["A", "C"]));
//! ```
//!
//! # Token-by-token construction
//!
//! [`Builder::push`] accepts one token at a time and reports the first
//! violation immediately:
//!
//! ```
//! use cnfgraph_core::{Builder, SymbolSet, SyntaxReason, Token};
//!
//! let symbols = SymbolSet::new(["A", "B"]).unwrap();
//! let mut builder = Builder::new(&symbols, "A | |");
//! builder.push(Token::Literal("A")).unwrap();
//! builder.push(Token::Or).unwrap();
//!
//! let err = builder.push(Token::Or).unwrap_err();
//! assert_eq!(err.reason(), Some(SyntaxReason::OperatorNotFollowedByLiteral));
//! ```

pub mod builder;
pub mod error;
pub mod eval;
pub mod graph;
pub mod limits;
pub mod symbols;
pub mod token;

pub use builder::{parse, Builder};
pub use error::{Limit, ParseError, SymbolSetError, SyntaxReason};
pub use eval::{evaluate, evaluate_into, Interpretation, Trace, Valuation};
pub use graph::{Graph, Node, NodeId, NodeKind};
pub use limits::Limits;
pub use symbols::SymbolSet;
pub use token::{tokenize, Component, Literal, Token};
