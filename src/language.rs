//! Languages
//!
//! A [`Profile`] is the processing half of a language: its name, lexicon, lexer,
//! parser, transformer and error handler. Messages keep a shared handle to the
//! profile they were parsed with. A [`Language`] pairs a profile with the
//! [`MessageRegistry`] holding that language's messages.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, PoisonError, RwLock};

use crate::binder::DataBinder;
use crate::config::PlangConfig;
use crate::diagnostic::{DefaultErrorHandler, Diagnostic, ErrorHandler};
use crate::error::{PlangError, Result};
use crate::lexer::{DelimiterLexer, MessageLexer};
use crate::lexicon::Lexicon;
use crate::message::{Message, MessageRegistry};
use crate::parser::{DefaultParser, MessageParser};
use crate::token::{Token, TokenSequence};
use crate::transformer::{DefaultTransformer, MessageTransformer};

/// Named processing profile of a language
pub struct Profile {
    name: String,
    abbreviation: String,
    lexicon: Arc<Lexicon>,
    lexer: Arc<dyn MessageLexer>,
    parser: Arc<dyn MessageParser>,
    transformer: Arc<dyn MessageTransformer>,
    error_handler: RwLock<Arc<dyn ErrorHandler>>,
}

impl Profile {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn abbreviation(&self) -> &str {
        &self.abbreviation
    }

    /// `name/abbreviation`, the identity of the language
    pub fn identifier(&self) -> String {
        format!("{}/{}", self.name, self.abbreviation)
    }

    pub fn lexicon(&self) -> &Arc<Lexicon> {
        &self.lexicon
    }

    pub fn lexer(&self) -> &Arc<dyn MessageLexer> {
        &self.lexer
    }

    pub fn parser(&self) -> &Arc<dyn MessageParser> {
        &self.parser
    }

    pub fn transformer(&self) -> &Arc<dyn MessageTransformer> {
        &self.transformer
    }

    pub fn error_handler(&self) -> Arc<dyn ErrorHandler> {
        self.error_handler
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_error_handler(&self, handler: Arc<dyn ErrorHandler>) {
        *self
            .error_handler
            .write()
            .unwrap_or_else(PoisonError::into_inner) = handler;
    }

    /// Hand a diagnostic to the current error handler
    pub fn report(&self, diagnostic: &Diagnostic) -> Result<()> {
        self.error_handler().handle(diagnostic)
    }

    pub fn tokenize(&self, content: &str) -> Vec<Token> {
        self.lexer.tokenize(content)
    }

    /// Tokenize and validate `content`
    pub fn parse(&self, content: &str) -> Result<TokenSequence> {
        self.parser.parse(self, self.lexer.tokenize(content))
    }

    /// Render already parsed `tokens` of `content`
    pub fn transform(&self, tokens: &TokenSequence, content: &str, binder: &DataBinder) -> Result<String> {
        self.transformer.transform(tokens, self, content, binder)
    }

    /// Parse and render `content` in one go
    pub fn render(&self, content: &str, binder: &DataBinder) -> Result<String> {
        let tokens = self.parse(content)?;
        self.transform(&tokens, content, binder)
    }
}

impl PartialEq for Profile {
    fn eq(&self, other: &Self) -> bool {
        self.identifier() == other.identifier()
    }
}

impl Eq for Profile {}

impl Hash for Profile {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identifier().hash(state);
    }
}

impl fmt::Debug for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Profile")
            .field("identifier", &self.identifier())
            .field("lexicon", &self.lexicon.len())
            .field("lexer", &self.lexer)
            .finish_non_exhaustive()
    }
}

/// A named processing profile together with its messages
pub struct Language {
    profile: Arc<Profile>,
    registry: RwLock<Arc<MessageRegistry>>,
}

impl Language {
    /// A language with an empty lexicon and the default processors
    pub fn new(name: impl Into<String>, abbreviation: impl Into<String>) -> Self {
        Self::builder(name, abbreviation).build()
    }

    /// A language with the default processors over `lexicon`
    pub fn with_lexicon(
        name: impl Into<String>,
        abbreviation: impl Into<String>,
        lexicon: Arc<Lexicon>,
    ) -> Self {
        Self::builder(name, abbreviation).lexicon(lexicon).build()
    }

    pub fn builder(name: impl Into<String>, abbreviation: impl Into<String>) -> LanguageBuilder {
        LanguageBuilder::new(name, abbreviation)
    }

    /// A language configured from `config`
    pub fn from_config(
        name: impl Into<String>,
        abbreviation: impl Into<String>,
        config: &PlangConfig,
    ) -> Result<Self> {
        let lexer = DelimiterLexer::from_config(&config.lexer)?;
        Ok(Self::builder(name, abbreviation)
            .lexicon(Arc::new(Lexicon::with_case_sensitivity(
                config.lexicon.case_sensitive,
            )))
            .lexer(Arc::new(lexer))
            .error_handler(Arc::new(DefaultErrorHandler::raising_at(
                config.errors.raise_at,
            )))
            .build())
    }

    pub fn profile(&self) -> &Arc<Profile> {
        &self.profile
    }

    pub fn name(&self) -> &str {
        self.profile.name()
    }

    pub fn abbreviation(&self) -> &str {
        self.profile.abbreviation()
    }

    pub fn identifier(&self) -> String {
        self.profile.identifier()
    }

    pub fn lexicon(&self) -> &Arc<Lexicon> {
        self.profile.lexicon()
    }

    pub fn error_handler(&self) -> Arc<dyn ErrorHandler> {
        self.profile.error_handler()
    }

    pub fn set_error_handler(&self, handler: Arc<dyn ErrorHandler>) {
        self.profile.set_error_handler(handler);
    }

    pub fn tokenize(&self, content: &str) -> Vec<Token> {
        self.profile.tokenize(content)
    }

    pub fn parse(&self, content: &str) -> Result<TokenSequence> {
        self.profile.parse(content)
    }

    pub fn transform(&self, tokens: &TokenSequence, content: &str, binder: &DataBinder) -> Result<String> {
        self.profile.transform(tokens, content, binder)
    }

    pub fn render(&self, content: &str, binder: &DataBinder) -> Result<String> {
        self.profile.render(content, binder)
    }

    /// A message in this language, not stored anywhere
    pub fn message(&self, content: impl Into<String>) -> Result<Message> {
        Message::new(content, &self.profile)
    }

    pub fn registry(&self) -> Arc<MessageRegistry> {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the message registry, returning the previous one
    ///
    /// Fails if `registry` belongs to another language.
    pub fn set_registry(&self, registry: Arc<MessageRegistry>) -> Result<Arc<MessageRegistry>> {
        if registry.identifier() != self.identifier() {
            return Err(PlangError::LanguageMismatch {
                expected: self.identifier(),
                actual: registry.identifier(),
            });
        }
        let mut current = self
            .registry
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(std::mem::replace(&mut *current, registry))
    }
}

impl PartialEq for Language {
    fn eq(&self, other: &Self) -> bool {
        self.profile == other.profile
    }
}

impl Eq for Language {}

impl Hash for Language {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.profile.hash(state);
    }
}

impl fmt::Debug for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Language")
            .field("identifier", &self.identifier())
            .field("messages", &self.registry().len())
            .finish()
    }
}

/// Builder for a [`Language`]; unset parts fall back to the defaults
pub struct LanguageBuilder {
    name: String,
    abbreviation: String,
    lexicon: Option<Arc<Lexicon>>,
    lexer: Option<Arc<dyn MessageLexer>>,
    parser: Option<Arc<dyn MessageParser>>,
    transformer: Option<Arc<dyn MessageTransformer>>,
    error_handler: Option<Arc<dyn ErrorHandler>>,
}

impl LanguageBuilder {
    pub fn new(name: impl Into<String>, abbreviation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            abbreviation: abbreviation.into(),
            lexicon: None,
            lexer: None,
            parser: None,
            transformer: None,
            error_handler: None,
        }
    }

    pub fn lexicon(mut self, lexicon: Arc<Lexicon>) -> Self {
        self.lexicon = Some(lexicon);
        self
    }

    pub fn lexer(mut self, lexer: Arc<dyn MessageLexer>) -> Self {
        self.lexer = Some(lexer);
        self
    }

    pub fn parser(mut self, parser: Arc<dyn MessageParser>) -> Self {
        self.parser = Some(parser);
        self
    }

    pub fn transformer(mut self, transformer: Arc<dyn MessageTransformer>) -> Self {
        self.transformer = Some(transformer);
        self
    }

    pub fn error_handler(mut self, handler: Arc<dyn ErrorHandler>) -> Self {
        self.error_handler = Some(handler);
        self
    }

    pub fn build(self) -> Language {
        let lexer: Arc<dyn MessageLexer> = match self.lexer {
            Some(lexer) => lexer,
            None => DelimiterLexer::shared_default(),
        };
        let parser: Arc<dyn MessageParser> = match self.parser {
            Some(parser) => parser,
            None => Arc::new(DefaultParser),
        };
        let transformer: Arc<dyn MessageTransformer> = match self.transformer {
            Some(transformer) => transformer,
            None => Arc::new(DefaultTransformer),
        };
        let error_handler: Arc<dyn ErrorHandler> = match self.error_handler {
            Some(handler) => handler,
            None => Arc::new(DefaultErrorHandler::new()),
        };

        let profile = Arc::new(Profile {
            name: self.name,
            abbreviation: self.abbreviation,
            lexicon: self.lexicon.unwrap_or_default(),
            lexer,
            parser,
            transformer,
            error_handler: RwLock::new(error_handler),
        });
        let registry = Arc::new(MessageRegistry::new(Arc::clone(&profile)));

        Language {
            profile,
            registry: RwLock::new(registry),
        }
    }
}
