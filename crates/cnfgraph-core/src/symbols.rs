//! The universe of propositional symbols a formula may reference.

use std::collections::HashSet;
use std::str::FromStr;

use crate::error::SymbolSetError;
use crate::token::{AND, NOT, OR};

/// A validated, ordered set of propositional symbol names.
///
/// Symbols are non-empty identifiers (a letter or `_`, then letters, digits
/// or `_`) and never contain the operator characters `!`, `&` or `|`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolSet {
    /// Symbols in declaration order.
    ordered: Vec<String>,
    lookup: HashSet<String>,
}

impl SymbolSet {
    /// Validate and build a symbol set.
    ///
    /// # Errors
    ///
    /// Returns an error if the set is empty, contains duplicates, or any
    /// symbol uses an operator character or is not identifier-shaped.
    pub fn new<I, S>(symbols: I) -> Result<Self, SymbolSetError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ordered = Vec::new();
        let mut lookup = HashSet::new();

        for symbol in symbols {
            let symbol = symbol.into();
            validate(&symbol)?;
            if !lookup.insert(symbol.clone()) {
                return Err(SymbolSetError::Duplicate(symbol));
            }
            ordered.push(symbol);
        }

        if ordered.is_empty() {
            return Err(SymbolSetError::Empty);
        }

        Ok(Self { ordered, lookup })
    }

    /// Check if a symbol belongs to the set.
    #[inline]
    pub fn contains(&self, symbol: &str) -> bool {
        self.lookup.contains(symbol)
    }

    /// Symbols in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(String::as_str)
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Always `false` for a validated set; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

impl FromStr for SymbolSet {
    type Err = SymbolSetError;

    /// Parse a list of symbols separated by whitespace and/or commas.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(
            s.split(|c: char| c == ',' || c.is_whitespace())
                .filter(|piece| !piece.is_empty()),
        )
    }
}

impl<'a> IntoIterator for &'a SymbolSet {
    type Item = &'a str;
    type IntoIter = std::iter::Map<std::slice::Iter<'a, String>, fn(&'a String) -> &'a str>;

    fn into_iter(self) -> Self::IntoIter {
        self.ordered.iter().map(String::as_str)
    }
}

fn validate(symbol: &str) -> Result<(), SymbolSetError> {
    if let Some(operator) = symbol.chars().find(|c| matches!(*c, NOT | AND | OR)) {
        return Err(SymbolSetError::OperatorCharacter {
            symbol: symbol.to_string(),
            operator,
        });
    }

    let mut chars = symbol.chars();
    let leading = chars.next().is_some_and(|c| c.is_alphabetic() || c == '_');
    if !leading || !chars.all(|c| c.is_alphanumeric() || c == '_') {
        return Err(SymbolSetError::NotIdentifier(symbol.to_string()));
    }

    Ok(())
}
