//! Error types for loading formula files.

use std::io;
use std::path::PathBuf;

use cnfgraph_core::ParseError;
use thiserror::Error;

/// Errors that can occur while loading formulae into a store.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The source could not be read.
    #[error("cannot read formulae from {}", display_path(.path))]
    Io {
        path: Option<PathBuf>,
        #[source]
        source: io::Error,
    },

    /// A formula line failed to parse.
    #[error("line {line} (formula {index}): {source}")]
    Formula {
        line: usize,
        index: usize,
        #[source]
        source: ParseError,
    },
}

impl LoadError {
    /// The parse error, if a formula was at fault.
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            LoadError::Formula { source, .. } => Some(source),
            LoadError::Io { .. } => None,
        }
    }

    /// The 1-based line of the offending formula.
    pub fn line(&self) -> Option<usize> {
        match self {
            LoadError::Formula { line, .. } => Some(*line),
            LoadError::Io { .. } => None,
        }
    }
}

fn display_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => format!("`{}`", path.display()),
        None => "reader".to_string(),
    }
}
