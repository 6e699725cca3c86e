//! Message lexer
//!
//! Splits template text into literal and placeholder tokens. A lexer is defined
//! by a single pattern (its lexeme) matching one placeholder occurrence and by the
//! step that extracts the placeholder name from a match. Everything between two
//! matches is literal text.

use std::fmt;
use std::sync::{Arc, OnceLock};

use regex::Regex;

use crate::config::LexerConfig;
use crate::error::{PlangError, Result};
use crate::token::Token;

/// Default opening delimiter
pub const DEFAULT_OPENING: &str = "{";
/// Default closing delimiter
pub const DEFAULT_CLOSING: &str = "}";

/// Tokenizer for message content
pub trait MessageLexer: Send + Sync + fmt::Debug {
    /// Pattern matching one placeholder occurrence, delimiters included
    fn lexeme(&self) -> &Regex;

    /// Extract the placeholder name from a raw match
    ///
    /// An empty result drops the match from the token list.
    fn extract_value(&self, raw: &str) -> String;

    /// Split `content` into tokens
    fn tokenize(&self, content: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut end = 0;

        for found in self.lexeme().find_iter(content) {
            if found.start() > end {
                tokens.push(Token::literal(&content[end..found.start()]));
            }
            end = found.end();

            let value = self.extract_value(found.as_str());
            if value.is_empty() {
                tracing::trace!(raw = found.as_str(), "dropping placeholder with empty name");
                continue;
            }
            tokens.push(Token::placeholder(found.as_str(), value));
        }

        if end < content.len() {
            tokens.push(Token::literal(&content[end..]));
        }

        tracing::debug!(tokens = tokens.len(), "tokenized message");
        tokens
    }
}

/// Lexer recognizing placeholders between an opening and a closing delimiter
///
/// Delimiters are literal strings. A placeholder is the opening delimiter, one or
/// more characters that occur in neither delimiter, and the closing delimiter.
#[derive(Debug, Clone)]
pub struct DelimiterLexer {
    opening: String,
    closing: String,
    trim_whitespace: bool,
    lexeme: Regex,
}

impl DelimiterLexer {
    pub fn new(opening: impl Into<String>, closing: impl Into<String>) -> Result<Self> {
        let opening = opening.into();
        let closing = closing.into();
        if opening.is_empty() || closing.is_empty() {
            return Err(PlangError::InvalidDelimiter(format!(
                "delimiters must not be empty (opening {:?}, closing {:?})",
                opening, closing
            )));
        }

        let lexeme = Regex::new(&lexeme_pattern(&opening, &closing))?;
        Ok(Self {
            opening,
            closing,
            trim_whitespace: false,
            lexeme,
        })
    }

    pub fn from_config(config: &LexerConfig) -> Result<Self> {
        Ok(Self::new(&config.opening, &config.closing)?.trimming(config.trim_whitespace))
    }

    /// Shared lexer for `{` and `}`
    pub fn shared_default() -> Arc<DelimiterLexer> {
        static DEFAULT: OnceLock<Arc<DelimiterLexer>> = OnceLock::new();
        DEFAULT
            .get_or_init(|| {
                Arc::new(
                    DelimiterLexer::new(DEFAULT_OPENING, DEFAULT_CLOSING)
                        .expect("default delimiters compile"),
                )
            })
            .clone()
    }

    /// Trim surrounding whitespace from extracted names
    pub fn trimming(mut self, trim_whitespace: bool) -> Self {
        self.trim_whitespace = trim_whitespace;
        self
    }

    pub fn opening(&self) -> &str {
        &self.opening
    }

    pub fn closing(&self) -> &str {
        &self.closing
    }

    pub fn trims_whitespace(&self) -> bool {
        self.trim_whitespace
    }
}

impl MessageLexer for DelimiterLexer {
    fn lexeme(&self) -> &Regex {
        &self.lexeme
    }

    fn extract_value(&self, raw: &str) -> String {
        let inner = raw
            .strip_prefix(self.opening.as_str())
            .and_then(|rest| rest.strip_suffix(self.closing.as_str()))
            .unwrap_or(raw);

        if self.trim_whitespace {
            inner.trim().to_string()
        } else {
            inner.to_string()
        }
    }
}

fn lexeme_pattern(opening: &str, closing: &str) -> String {
    let mut excluded: Vec<char> = opening.chars().chain(closing.chars()).collect();
    excluded.sort_unstable();
    excluded.dedup();

    let class: String = excluded
        .iter()
        .map(|c| regex::escape(c.encode_utf8(&mut [0; 4])))
        .collect();

    format!(
        "{}[^{}]+{}",
        regex::escape(opening),
        class,
        regex::escape(closing)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    const SPECIAL_CHARACTERS: &str = "<([{\\^-=$!|]})?*+.>";

    fn kinds(tokens: &[Token]) -> Vec<(TokenKind, &str)> {
        tokens.iter().map(|t| (t.kind(), t.raw())).collect()
    }

    #[test]
    fn test_tokenize_default_delimiters() {
        let lexer = DelimiterLexer::shared_default();
        let tokens = lexer.tokenize("Hi {user.name}!");
        assert_eq!(
            kinds(&tokens),
            vec![
                (TokenKind::Literal, "Hi "),
                (TokenKind::Placeholder, "{user.name}"),
                (TokenKind::Literal, "!"),
            ]
        );
        assert_eq!(tokens[1].value(), Some("user.name"));
    }

    #[test]
    fn test_empty_input() {
        assert!(DelimiterLexer::shared_default().tokenize("").is_empty());
    }

    #[test]
    fn test_no_placeholders_is_single_literal() {
        let tokens = DelimiterLexer::shared_default().tokenize("plain text");
        assert_eq!(kinds(&tokens), vec![(TokenKind::Literal, "plain text")]);
    }

    #[test]
    fn test_adjacent_placeholders() {
        let tokens = DelimiterLexer::shared_default().tokenize("{a}{b}");
        assert_eq!(tokens.len(), 2);
        assert!(tokens.iter().all(Token::is_placeholder));
    }

    #[test]
    fn test_empty_braces_stay_literal() {
        let tokens = DelimiterLexer::shared_default().tokenize("x {} y");
        assert_eq!(kinds(&tokens), vec![(TokenKind::Literal, "x {} y")]);
    }

    #[test]
    fn test_no_nesting() {
        let tokens = DelimiterLexer::shared_default().tokenize("{a{b}c}");
        assert_eq!(
            kinds(&tokens),
            vec![
                (TokenKind::Literal, "{a"),
                (TokenKind::Placeholder, "{b}"),
                (TokenKind::Literal, "c}"),
            ]
        );
    }

    #[test]
    fn test_raw_reconstructs_content() {
        let content = "{greeting}, {name}! You have {count} new {}messages.";
        let tokens = DelimiterLexer::shared_default().tokenize(content);
        let raw: String = tokens.iter().map(Token::raw).collect();
        assert_eq!(raw, content);
    }

    #[test]
    fn test_multi_character_delimiters() {
        let lexer = DelimiterLexer::new("${", "}").unwrap();
        let tokens = lexer.tokenize("Cost: $5 for ${item}");
        assert_eq!(
            kinds(&tokens),
            vec![
                (TokenKind::Literal, "Cost: $5 for "),
                (TokenKind::Placeholder, "${item}"),
            ]
        );
        assert_eq!(tokens[1].value(), Some("item"));
    }

    #[test]
    fn test_delimiters_are_literal() {
        let lexer = DelimiterLexer::new("[[", "]]").unwrap();
        let tokens = lexer.tokenize("a [[b]] c [d]");
        assert_eq!(tokens[1].value(), Some("b"));
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn test_empty_delimiter_rejected() {
        assert!(matches!(
            DelimiterLexer::new("", "}"),
            Err(PlangError::InvalidDelimiter(_))
        ));
        assert!(DelimiterLexer::new("{", "").is_err());
    }

    #[test]
    fn test_trimming_drops_blank_names() {
        let lexer = DelimiterLexer::new("{", "}").unwrap().trimming(true);
        let tokens = lexer.tokenize("a{ name }b{   }c");
        assert_eq!(
            kinds(&tokens),
            vec![
                (TokenKind::Literal, "a"),
                (TokenKind::Placeholder, "{ name }"),
                (TokenKind::Literal, "b"),
                (TokenKind::Literal, "c"),
            ]
        );
        assert_eq!(tokens[1].value(), Some("name"));
    }

    #[test]
    fn test_special_characters_escape_to_themselves() {
        for c in SPECIAL_CHARACTERS.chars() {
            let literal = c.to_string();
            let pattern = Regex::new(&format!("^{}$", regex::escape(&literal))).unwrap();
            assert!(pattern.is_match(&literal), "{:?} should match itself", c);
            assert!(!pattern.is_match("a"), "{:?} should not match a letter", c);
            assert!(!pattern.is_match(&format!("{}{}", c, c)));
        }
    }

    #[test]
    fn test_letters_are_not_escaped() {
        for c in ('a'..='z').chain('A'..='Z') {
            if SPECIAL_CHARACTERS.contains(c) {
                continue;
            }
            assert_eq!(regex::escape(&c.to_string()), c.to_string());
        }
    }

    #[test]
    fn test_every_special_character_works_as_delimiter() {
        for c in SPECIAL_CHARACTERS.chars() {
            let lexer = DelimiterLexer::new(c.to_string(), c.to_string()).unwrap();
            let content = format!("x {c}name{c} y");
            let tokens = lexer.tokenize(&content);
            assert_eq!(tokens.len(), 3, "delimiter {:?}", c);
            assert_eq!(tokens[1].value(), Some("name"), "delimiter {:?}", c);
        }
    }
}
