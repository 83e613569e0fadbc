//! Token vocabulary for CNF formula text.
//!
//! Formula text is split on whitespace only. The four operator and bracket
//! tokens must stand alone; any other piece of text is a literal token that
//! may carry one leading `(`, one `!` and one trailing `)` fused to the
//! symbol name.

use crate::error::SyntaxReason;

/// Logical NOT character, only valid as a literal prefix.
pub const NOT: char = '!';
/// Logical AND character.
pub const AND: char = '&';
/// Logical OR character.
pub const OR: char = '|';
/// Opening bracket character.
pub const LEFT_PAREN: char = '(';
/// Closing bracket character.
pub const RIGHT_PAREN: char = ')';

/// A whitespace-delimited formula token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token<'a> {
    /// Logical OR: `|`
    Or,
    /// Logical AND: `&`
    And,
    /// Standalone `(`
    LeftParen,
    /// Standalone `)`
    RightParen,
    /// Anything else, decomposed later by [`Literal::decompose`].
    Literal(&'a str),
}

impl<'a> Token<'a> {
    /// Classify a single whitespace-free piece of formula text.
    pub fn classify(text: &'a str) -> Self {
        match text {
            "|" => Token::Or,
            "&" => Token::And,
            "(" => Token::LeftParen,
            ")" => Token::RightParen,
            _ => Token::Literal(text),
        }
    }

    /// Check if this is a bracket token.
    pub fn is_bracket(&self) -> bool {
        matches!(self, Token::LeftParen | Token::RightParen)
    }

    /// Clause component this token contributes, if any.
    ///
    /// Brackets and `&` are not clause components.
    pub fn component(&self) -> Option<Component> {
        match self {
            Token::Or => Some(Component::Operator),
            Token::Literal(_) => Some(Component::Literal),
            Token::And | Token::LeftParen | Token::RightParen => None,
        }
    }
}

/// Split formula text into tokens.
pub fn tokenize(formula: &str) -> impl Iterator<Item = Token<'_>> {
    formula.split_whitespace().map(Token::classify)
}

/// Component kinds that must alternate inside a clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    /// An OR operator.
    Operator,
    /// A (possibly negated) symbol.
    Literal,
}

/// A literal token split into its symbol and its fused punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Literal<'a> {
    /// The bare symbol name.
    pub symbol: &'a str,
    /// Prefixed by `!`.
    pub negated: bool,
    /// Prefixed by `(`.
    pub opens: bool,
    /// Suffixed by `)`.
    pub closes: bool,
}

impl<'a> Literal<'a> {
    /// Strip at most one leading `(`, then at most one leading `!`, then at
    /// most one trailing `)`.
    ///
    /// Nothing else is inspected, so `!!A` yields the symbol `!A` and `()`
    /// yields the empty symbol; both are left for symbol validation to
    /// reject.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxReason::SingletonNot`] when nothing follows the `!`.
    pub fn decompose(token: &'a str) -> Result<Self, SyntaxReason> {
        let (opens, rest) = match token.strip_prefix(LEFT_PAREN) {
            Some(rest) => (true, rest),
            None => (false, token),
        };

        let (negated, rest) = match rest.strip_prefix(NOT) {
            Some("") => return Err(SyntaxReason::SingletonNot),
            Some(rest) => (true, rest),
            None => (false, rest),
        };

        let (closes, symbol) = match rest.strip_suffix(RIGHT_PAREN) {
            Some(symbol) => (true, symbol),
            None => (false, rest),
        };

        Ok(Self {
            symbol,
            negated,
            opens,
            closes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(symbol: &str, negated: bool, opens: bool, closes: bool) -> Literal<'_> {
        Literal {
            symbol,
            negated,
            opens,
            closes,
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(Token::classify("|"), Token::Or);
        assert_eq!(Token::classify("&"), Token::And);
        assert_eq!(Token::classify("("), Token::LeftParen);
        assert_eq!(Token::classify(")"), Token::RightParen);
        assert_eq!(Token::classify("(A"), Token::Literal("(A"));
        assert_eq!(Token::classify("||"), Token::Literal("||"));
    }

    #[test]
    fn test_tokenize_splits_on_any_whitespace() {
        let tokens: Vec<_> = tokenize("  (A |\tB)  &\n!C ").collect();
        assert_eq!(
            tokens,
            vec![
                Token::Literal("(A"),
                Token::Or,
                Token::Literal("B)"),
                Token::And,
                Token::Literal("!C"),
            ]
        );
    }

    #[test]
    fn test_component() {
        assert_eq!(Token::Or.component(), Some(Component::Operator));
        assert_eq!(Token::Literal("A").component(), Some(Component::Literal));
        assert_eq!(Token::And.component(), None);
        assert!(Token::LeftParen.is_bracket());
        assert!(!Token::Or.is_bracket());
    }

    #[test]
    fn test_decompose_plain() {
        assert_eq!(Literal::decompose("B"), Ok(literal("B", false, false, false)));
    }

    #[test]
    fn test_decompose_fused_punctuation() {
        assert_eq!(Literal::decompose("(!A)"), Ok(literal("A", true, true, true)));
        assert_eq!(Literal::decompose("!C)"), Ok(literal("C", true, false, true)));
        assert_eq!(Literal::decompose("(B"), Ok(literal("B", false, true, false)));
    }

    #[test]
    fn test_decompose_strips_only_once() {
        assert_eq!(Literal::decompose("!!A"), Ok(literal("!A", true, false, false)));
        assert_eq!(Literal::decompose("((A"), Ok(literal("(A", false, true, false)));
        assert_eq!(Literal::decompose("A))"), Ok(literal("A)", false, false, true)));
        assert_eq!(Literal::decompose("()"), Ok(literal("", false, true, true)));
    }

    #[test]
    fn test_decompose_not_is_checked_after_paren() {
        // `!(` is not a prefix pair the decomposer understands.
        assert_eq!(Literal::decompose("!(A"), Ok(literal("(A", true, false, false)));
    }

    #[test]
    fn test_decompose_singleton_not() {
        assert_eq!(Literal::decompose("!"), Err(SyntaxReason::SingletonNot));
        assert_eq!(Literal::decompose("(!"), Err(SyntaxReason::SingletonNot));
        assert_eq!(Literal::decompose("!)"), Ok(literal("", true, false, true)));
    }
}
