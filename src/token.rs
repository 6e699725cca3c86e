//! Message tokens

use std::fmt;
use std::sync::Arc;

/// Classification of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Plain text, rendered as is
    Literal,
    /// A delimited placeholder reference
    Placeholder,
}

/// A classified span of template text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    raw: String,
    value: Option<String>,
    kind: TokenKind,
}

impl Token {
    pub fn literal(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            value: None,
            kind: TokenKind::Literal,
        }
    }

    /// A placeholder token; `raw` includes the delimiters, `value` is the bare name
    pub fn placeholder(raw: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            value: Some(value.into()),
            kind: TokenKind::Placeholder,
        }
    }

    /// The exact source text of this token
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn is_placeholder(&self) -> bool {
        self.kind == TokenKind::Placeholder
    }

    /// The placeholder name, if this is a placeholder token
    pub fn placeholder_name(&self) -> Option<&str> {
        match self.kind {
            TokenKind::Placeholder => self.value(),
            TokenKind::Literal => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// An immutable, validated token list
///
/// Cloning shares the underlying tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSequence {
    tokens: Arc<[Token]>,
}

impl Default for TokenSequence {
    fn default() -> Self {
        Self {
            tokens: Arc::from(Vec::new()),
        }
    }
}

impl TokenSequence {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builder() -> TokenSequenceBuilder {
        TokenSequenceBuilder::default()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    /// Placeholder tokens in order of appearance
    pub fn placeholders(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(|t| t.is_placeholder())
    }

    /// Concatenated raw text of all tokens
    pub fn raw_text(&self) -> String {
        self.tokens.iter().map(Token::raw).collect()
    }
}

impl<'a> IntoIterator for &'a TokenSequence {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

/// Append-only builder for a [`TokenSequence`]
#[derive(Debug, Default)]
pub struct TokenSequenceBuilder {
    tokens: Vec<Token>,
}

impl TokenSequenceBuilder {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tokens: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, token: Token) -> &mut Self {
        self.tokens.push(token);
        self
    }

    pub fn contains(&self, token: &Token) -> bool {
        self.tokens.contains(token)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Freeze the collected tokens
    pub fn build(self) -> TokenSequence {
        TokenSequence {
            tokens: self.tokens.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_token_carries_value() {
        let token = Token::placeholder("{user.name}", "user.name");
        assert!(token.is_placeholder());
        assert_eq!(token.raw(), "{user.name}");
        assert_eq!(token.placeholder_name(), Some("user.name"));
    }

    #[test]
    fn test_literal_token_has_no_name() {
        let token = Token::literal("Hi ");
        assert!(!token.is_placeholder());
        assert_eq!(token.value(), None);
        assert_eq!(token.placeholder_name(), None);
    }

    #[test]
    fn test_builder_freezes_in_order() {
        let mut builder = TokenSequence::builder();
        builder
            .push(Token::literal("Hi "))
            .push(Token::placeholder("{name}", "name"))
            .push(Token::literal("!"));
        assert!(builder.contains(&Token::literal("!")));

        let sequence = builder.build();
        assert_eq!(sequence.len(), 3);
        assert_eq!(sequence.raw_text(), "Hi {name}!");
        assert_eq!(sequence.placeholders().count(), 1);

        let shared = sequence.clone();
        assert_eq!(shared, sequence);
    }

    #[test]
    fn test_empty_sequence() {
        let sequence = TokenSequence::empty();
        assert!(sequence.is_empty());
        assert!(sequence.get(0).is_none());
    }
}
