//! Plang
//!
//! Placeholder-based message templating for localized text. Templates such as
//! `"Hi {user.name}!"` are tokenized, checked against a language's lexicon and
//! rendered against per-call bound data.
//!
//! ## Features
//!
//! - **Configurable Delimiters**: Any non-empty opening and closing markers
//! - **Three Key Spaces**: Values bound by position, by name or by type
//! - **Typed Placeholders**: Lexicon entries transform bound values of a declared type family
//! - **Pluggable Errors**: Diagnostics flow to an injected, swappable handler
//!
//! ## Pipeline
//!
//! ```text
//! content ──lexer──▶ Vec<Token> ──parser──▶ TokenSequence ──transformer──▶ String
//!                                   │                            │
//!                                Lexicon                DataBinder + Lexicon
//! ```
//!
//! ## Example
//!
//! ```
//! use plang::{DataBinder, Language, Placeholder};
//!
//! struct User {
//!     name: String,
//! }
//!
//! let language = Language::new("English", "en");
//! language
//!     .lexicon()
//!     .set(Placeholder::typed("user.name", |u: &User| u.name.clone()));
//!
//! let mut binder = DataBinder::new();
//! binder.bind_type(User { name: "Ana".into() });
//!
//! assert_eq!(language.render("Hi {user.name}!", &binder).unwrap(), "Hi Ana!");
//! ```

pub mod binder;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod language;
pub mod lexer;
pub mod lexicon;
pub mod message;
pub mod parser;
pub mod placeholder;
pub mod token;
pub mod transformer;
pub mod value;

pub use binder::{BindKey, DataBinder, Key};
pub use config::PlangConfig;
pub use diagnostic::{
    CollectingErrorHandler, DefaultErrorHandler, Diagnostic, DiagnosticKind, ErrorHandler, Severity,
};
pub use error::{PlangError, Result};
pub use language::{Language, LanguageBuilder, Profile};
pub use lexer::{DelimiterLexer, MessageLexer};
pub use lexicon::Lexicon;
pub use message::{Message, MessageRegistry};
pub use parser::{DefaultParser, MessageParser};
pub use placeholder::{Placeholder, PlaceholderKind};
pub use token::{Token, TokenKind, TokenSequence, TokenSequenceBuilder};
pub use transformer::{DefaultTransformer, MessageTransformer};
pub use value::{TypeKey, Value};
