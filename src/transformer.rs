//! Message transformer
//!
//! Renders a parsed token sequence against a [`DataBinder`]. Each placeholder token
//! is resolved in a fixed order, first hit wins:
//!
//! 1. a value bound at the placeholder's position (0-based, counting placeholders only)
//! 2. a value bound under the placeholder's name
//! 3. the lexicon placeholder of that name, fed the value bound under its accepting type
//! 4. the lexicon placeholder called without a value, if it is nullable
//!
//! Anything else renders as the empty string and is reported to the error handler.

use std::fmt;

use crate::binder::{DataBinder, Key};
use crate::diagnostic::{Diagnostic, DiagnosticKind, Severity};
use crate::error::Result;
use crate::language::Profile;
use crate::token::TokenSequence;

/// Renders parsed messages
pub trait MessageTransformer: Send + Sync + fmt::Debug {
    /// Render `tokens`, parsed from `content`, with the values in `binder`
    fn transform(
        &self,
        tokens: &TokenSequence,
        profile: &Profile,
        content: &str,
        binder: &DataBinder,
    ) -> Result<String>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultTransformer;

impl DefaultTransformer {
    fn resolve(
        &self,
        name: &str,
        position: usize,
        profile: &Profile,
        binder: &DataBinder,
    ) -> Result<Option<String>> {
        if let Some(value) = binder.get_key(&Key::Index(position)) {
            tracing::trace!(placeholder = name, position, "resolved by index");
            return Ok(Some(value.render()));
        }

        if let Some(value) = binder.get_key(&binder.compute_key(name)?) {
            tracing::trace!(placeholder = name, "resolved by name");
            return Ok(Some(value.render()));
        }

        let Some(placeholder) = profile.lexicon().get(name) else {
            return Ok(None);
        };

        if let Some(accepting) = placeholder.accepting_type() {
            if let Some(value) = binder.get_key(&Key::Type(accepting.topmost())) {
                match placeholder.transform(Some(value)) {
                    Some(text) => {
                        tracing::trace!(placeholder = name, accepting = %accepting, "resolved by type");
                        return Ok(Some(text));
                    }
                    None => profile.report(&Diagnostic::new(
                        DiagnosticKind::TypeMismatch,
                        Severity::Warning,
                        name,
                        format!(
                            "placeholder {} accepts {} but {} is bound",
                            name,
                            accepting,
                            value.type_key()
                        ),
                    ))?,
                }
            }
        }

        if placeholder.is_nullable() {
            if let Some(text) = placeholder.transform(None) {
                tracing::trace!(placeholder = name, "resolved without a value");
                return Ok(Some(text));
            }
        }

        Ok(None)
    }
}

impl MessageTransformer for DefaultTransformer {
    fn transform(
        &self,
        tokens: &TokenSequence,
        profile: &Profile,
        content: &str,
        binder: &DataBinder,
    ) -> Result<String> {
        if tokens.is_empty() {
            return Ok(content.to_string());
        }

        let mut output = String::with_capacity(content.len());
        let mut position = 0;

        for token in tokens {
            let Some(name) = token.placeholder_name() else {
                output.push_str(token.raw());
                continue;
            };

            match self.resolve(name, position, profile, binder)? {
                Some(text) => output.push_str(&text),
                None => profile.report(&Diagnostic::new(
                    DiagnosticKind::UnboundPlaceholder,
                    Severity::Warning,
                    name,
                    format!("placeholder {} not bound", name),
                ))?,
            }
            position += 1;
        }

        Ok(output)
    }
}
