//! Message parser
//!
//! Validates lexer output against a language's lexicon and freezes it into a
//! [`TokenSequence`].

use std::fmt;

use crate::diagnostic::{Diagnostic, DiagnosticKind, Severity};
use crate::error::Result;
use crate::language::Profile;
use crate::token::{Token, TokenSequence};

/// Turns a token list into a validated, immutable sequence
pub trait MessageParser: Send + Sync + fmt::Debug {
    fn parse(&self, profile: &Profile, tokens: Vec<Token>) -> Result<TokenSequence>;
}

/// Keeps every token; placeholders unknown to the lexicon are reported as dynamic
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultParser;

impl MessageParser for DefaultParser {
    fn parse(&self, profile: &Profile, tokens: Vec<Token>) -> Result<TokenSequence> {
        let lexicon = profile.lexicon();
        let mut builder = TokenSequence::builder();

        for token in tokens {
            if let Some(name) = token.placeholder_name() {
                if !lexicon.has(name) {
                    let mut message = format!("placeholder {} is dynamic", name);
                    if let Some(suggestion) = lexicon.suggest(name) {
                        message.push_str(&format!(" (did you mean `{}`?)", suggestion));
                    }
                    profile.report(&Diagnostic::new(
                        DiagnosticKind::UnknownPlaceholder,
                        Severity::Notify,
                        name,
                        message,
                    ))?;
                }
            }
            builder.push(token);
        }

        let sequence = builder.build();
        tracing::debug!(
            language = %profile.identifier(),
            tokens = sequence.len(),
            placeholders = sequence.placeholders().count(),
            "parsed message"
        );
        Ok(sequence)
    }
}
