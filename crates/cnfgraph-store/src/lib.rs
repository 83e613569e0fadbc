//! Formula files for cnfgraph.
//!
//! A formula file is UTF-8 text with one CNF formula per line. Blank lines
//! and lines starting with `#` are ignored. Every formula is parsed into a
//! graph that remembers its 1-based line number and its 1-based index
//! among the formulae of the store.
//!
//! # Example
//!
//! ```
//! use cnfgraph_core::SymbolSet;
//! use cnfgraph_store::FormulaStore;
//!
//! let symbols: SymbolSet = "A, B, C".parse().unwrap();
//! let mut store = FormulaStore::new(symbols);
//! store.load_str("# rules\nA | B\n\n!C\n").unwrap();
//!
//! let report = store.evaluate(&["A", "C"]);
//! assert_eq!(report.line_numbers(), vec![4]);
//! ```

pub mod error;
pub mod store;

pub use error::LoadError;
pub use store::{FormulaStore, LoadPolicy, Rejected, Report, Unsatisfied};
