//! Diagnostics reported by the parser and transformer
//!
//! Semantic problems found while processing a message (an unknown placeholder name,
//! a placeholder nothing is bound to) do not abort rendering. They are handed to the
//! language's [`ErrorHandler`], which decides whether to log them or to raise them
//! as a [`PlangError`].

use std::fmt;
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::error::{PlangError, Result};

/// Severity of a diagnostic, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational, not an error
    Notify,
    /// An error that does not affect the outcome's structure
    Warning,
    /// A breaking error
    Issue,
    /// A breaking error that should stop processing
    Fatal,
}

impl Severity {
    /// Whether processing may legitimately abort on this severity
    pub fn is_breaking(&self) -> bool {
        matches!(self, Severity::Issue | Severity::Fatal)
    }

    /// Whether this severity denotes an error at all
    pub fn is_error(&self) -> bool {
        *self != Severity::Notify
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Notify => "notify",
            Severity::Warning => "warning",
            Severity::Issue => "issue",
            Severity::Fatal => "fatal",
        };
        f.write_str(name)
    }
}

/// What went wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A placeholder token names no placeholder in the lexicon
    UnknownPlaceholder,
    /// A placeholder could not be resolved from any binding
    UnboundPlaceholder,
    /// The value bound under a placeholder's type key is not of its accepting type
    TypeMismatch,
}

/// A non-fatal report from message processing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    /// Name of the placeholder concerned
    pub placeholder: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        kind: DiagnosticKind,
        severity: Severity,
        placeholder: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity,
            placeholder: placeholder.into(),
            message: message.into(),
        }
    }

    /// Convert into the error raised when a handler escalates this diagnostic
    pub fn into_error(self) -> PlangError {
        match self.kind {
            DiagnosticKind::UnknownPlaceholder | DiagnosticKind::UnboundPlaceholder => {
                PlangError::UnresolvedPlaceholder {
                    name: self.placeholder,
                    severity: self.severity,
                    message: self.message,
                }
            }
            DiagnosticKind::TypeMismatch => PlangError::TypeMismatch {
                name: self.placeholder,
                severity: self.severity,
                message: self.message,
            },
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

/// Sink for diagnostics, injected into a language
///
/// Returning `Err` aborts the parse or transform that reported the diagnostic.
pub trait ErrorHandler: Send + Sync {
    fn handle(&self, diagnostic: &Diagnostic) -> Result<()>;
}

impl<F> ErrorHandler for F
where
    F: Fn(&Diagnostic) -> Result<()> + Send + Sync,
{
    fn handle(&self, diagnostic: &Diagnostic) -> Result<()> {
        self(diagnostic)
    }
}

/// Logs diagnostics and raises those at or above a threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultErrorHandler {
    raise_at: Severity,
}

impl Default for DefaultErrorHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultErrorHandler {
    /// Raise breaking diagnostics only
    pub fn new() -> Self {
        Self {
            raise_at: Severity::Issue,
        }
    }

    /// Raise every diagnostic whose severity is at least `raise_at`
    pub fn raising_at(raise_at: Severity) -> Self {
        Self { raise_at }
    }

    pub fn raise_at(&self) -> Severity {
        self.raise_at
    }
}

impl ErrorHandler for DefaultErrorHandler {
    fn handle(&self, diagnostic: &Diagnostic) -> Result<()> {
        if diagnostic.severity >= self.raise_at {
            tracing::error!(
                placeholder = %diagnostic.placeholder,
                severity = %diagnostic.severity,
                "{}",
                diagnostic.message
            );
            return Err(diagnostic.clone().into_error());
        }

        match diagnostic.severity {
            Severity::Notify => tracing::info!(placeholder = %diagnostic.placeholder, "{}", diagnostic.message),
            _ => tracing::warn!(
                placeholder = %diagnostic.placeholder,
                severity = %diagnostic.severity,
                "{}",
                diagnostic.message
            ),
        }
        Ok(())
    }
}

/// Records every diagnostic it receives and never raises
#[derive(Debug, Default)]
pub struct CollectingErrorHandler {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl CollectingErrorHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the diagnostics collected so far
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Diagnostics of one kind
    pub fn of_kind(&self, kind: DiagnosticKind) -> Vec<Diagnostic> {
        self.diagnostics()
            .into_iter()
            .filter(|d| d.kind == kind)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl ErrorHandler for CollectingErrorHandler {
    fn handle(&self, diagnostic: &Diagnostic) -> Result<()> {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic.clone());
        Ok(())
    }
}
