//! Messages and the per-language message registry

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::binder::DataBinder;
use crate::error::{PlangError, Result};
use crate::language::Profile;
use crate::token::TokenSequence;

/// A template parsed once in a given language
#[derive(Debug, Clone)]
pub struct Message {
    content: String,
    tokens: TokenSequence,
    profile: Arc<Profile>,
}

impl Message {
    /// Parse `content` with `profile`
    pub fn new(content: impl Into<String>, profile: &Arc<Profile>) -> Result<Self> {
        let content = content.into();
        let tokens = profile.parse(&content)?;
        Ok(Self {
            content,
            tokens,
            profile: Arc::clone(profile),
        })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn tokens(&self) -> &TokenSequence {
        &self.tokens
    }

    pub fn profile(&self) -> &Arc<Profile> {
        &self.profile
    }

    /// Identifier of the language this message was parsed in
    pub fn identifier(&self) -> String {
        self.profile.identifier()
    }

    /// Render with the values in `binder`
    ///
    /// Placeholders typed on `Arc<Profile>` receive this message's profile, and
    /// placeholders typed on `Message` receive a clone of this message, unless
    /// `binder` already carries a value of that type. Supplying either one means
    /// `binder` is copied first; use [`Message::transform_owned`] to avoid the copy.
    pub fn transform(&self, binder: &DataBinder) -> Result<String> {
        if self.knows_all(binder) {
            return self.profile.transform(&self.tokens, &self.content, binder);
        }
        self.transform_owned(binder.clone())
    }

    /// Like [`Message::transform`], consuming `binder` instead of copying it
    pub fn transform_owned(&self, mut binder: DataBinder) -> Result<String> {
        if !binder.is_type_bound::<Arc<Profile>>() {
            binder.bind_type(Arc::clone(&self.profile));
        }
        if !binder.is_type_bound::<Message>() {
            binder.bind_type(self.clone());
        }
        self.profile.transform(&self.tokens, &self.content, &binder)
    }

    /// Render with no bound values
    pub fn render(&self) -> Result<String> {
        self.transform_owned(DataBinder::new())
    }

    fn knows_all(&self, binder: &DataBinder) -> bool {
        binder.is_type_bound::<Arc<Profile>>() && binder.is_type_bound::<Message>()
    }
}

/// Messages of one language by key
#[derive(Debug)]
pub struct MessageRegistry {
    profile: Arc<Profile>,
    messages: RwLock<HashMap<String, Message>>,
}

impl MessageRegistry {
    pub fn new(profile: Arc<Profile>) -> Self {
        Self {
            profile,
            messages: RwLock::new(HashMap::new()),
        }
    }

    pub fn profile(&self) -> &Arc<Profile> {
        &self.profile
    }

    /// Identifier of the language this registry belongs to
    pub fn identifier(&self) -> String {
        self.profile.identifier()
    }

    /// Parse `content` in this registry's language without storing it
    pub fn create(&self, content: impl Into<String>) -> Result<Message> {
        Message::new(content, &self.profile)
    }

    /// Parse `content` and store it under `key`
    pub fn set(&self, key: impl Into<String>, content: impl Into<String>) -> Result<Message> {
        let key = checked_key(key.into())?;
        let message = self.create(content)?;
        self.write().insert(key, message.clone());
        Ok(message)
    }

    /// Store an already parsed message, returning the one it replaced
    ///
    /// Fails if `message` was parsed in another language.
    pub fn insert(&self, key: impl Into<String>, message: Message) -> Result<Option<Message>> {
        let key = checked_key(key.into())?;
        if message.identifier() != self.identifier() {
            return Err(PlangError::LanguageMismatch {
                expected: self.identifier(),
                actual: message.identifier(),
            });
        }
        Ok(self.write().insert(key, message))
    }

    pub fn get(&self, key: &str) -> Result<Message> {
        self.read()
            .get(key)
            .cloned()
            .ok_or_else(|| PlangError::NotFound {
                key: key.to_string(),
                language: self.identifier(),
            })
    }

    /// The message under `key`, or the one `fallback` supplies
    pub fn get_or_else(&self, key: &str, fallback: impl FnOnce() -> Message) -> Message {
        self.read().get(key).cloned().unwrap_or_else(fallback)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.read().contains_key(key)
    }

    pub fn remove(&self, key: &str) -> Option<Message> {
        self.write().remove(key)
    }

    /// All keys, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    /// Render the message under `key`
    pub fn render(&self, key: &str, binder: &DataBinder) -> Result<String> {
        self.get(key)?.transform(binder)
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Message>> {
        self.messages.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Message>> {
        self.messages.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn checked_key(key: String) -> Result<String> {
    if key.is_empty() {
        return Err(PlangError::empty_key());
    }
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use crate::placeholder::Placeholder;

    #[test]
    fn test_set_and_get() {
        let language = Language::new("English", "en");
        let registry = language.registry();
        registry.set("greeting", "Hello {name}").unwrap();

        let message = registry.get("greeting").unwrap();
        assert_eq!(message.content(), "Hello {name}");
        assert_eq!(message.tokens().len(), 2);
        assert_eq!(message.identifier(), "English/en");
    }

    #[test]
    fn test_missing_key() {
        let language = Language::new("English", "en");
        let err = language.registry().get("nope").unwrap_err();
        assert!(matches!(err, PlangError::NotFound { ref key, .. } if key == "nope"));
    }

    #[test]
    fn test_empty_key_rejected() {
        let language = Language::new("English", "en");
        let registry = language.registry();
        assert!(matches!(
            registry.set("", "x"),
            Err(PlangError::InvalidKey { .. })
        ));
        let message = registry.create("x").unwrap();
        assert!(registry.insert("", message).is_err());
    }

    #[test]
    fn test_insert_from_other_language() {
        let english = Language::new("English", "en");
        let german = Language::new("German", "de");
        let foreign = german.message("Hallo").unwrap();

        let err = english.registry().insert("hello", foreign).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Language identifier \"German/de\" must be equal to registry's language identifier \"English/en\""
        );
    }

    #[test]
    fn test_get_or_else() {
        let language = Language::new("English", "en");
        let registry = language.registry();
        let fallback = registry.create("fallback").unwrap();

        let message = registry.get_or_else("missing", || fallback.clone());
        assert_eq!(message.content(), "fallback");
    }

    #[test]
    fn test_keys_remove_clear() {
        let language = Language::new("English", "en");
        let registry = language.registry();
        registry.set("b", "B").unwrap();
        registry.set("a", "A").unwrap();
        assert_eq!(registry.keys(), vec!["a", "b"]);

        assert!(registry.remove("a").is_some());
        assert!(!registry.contains("a"));
        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_message_knows_its_language() {
        let language = Language::new("English", "en");
        language.lexicon().set(Placeholder::typed(
            "language",
            |profile: &Arc<Profile>| profile.name().to_string(),
        ));

        let message = language.message("Written in {language}").unwrap();
        assert_eq!(message.render().unwrap(), "Written in English");
    }

    #[test]
    fn test_message_knows_itself() {
        let language = Language::new("English", "en");
        language.lexicon().set(Placeholder::typed("content", |m: &Message| {
            m.content().len()
        }));

        let message = language.message("{content}").unwrap();
        assert_eq!(message.transform(&DataBinder::new()).unwrap(), "9");
        assert_eq!(message.render().unwrap(), "9");
    }

    #[test]
    fn test_caller_bound_message_wins() {
        let language = Language::new("English", "en");
        language.lexicon().set(Placeholder::typed("content", |m: &Message| {
            m.content().to_uppercase()
        }));

        let other = language.message("other").unwrap();
        let mut binder = DataBinder::new();
        binder.bind_type(other);
        let message = language.message("{content}").unwrap();
        assert_eq!(message.transform(&binder).unwrap(), "OTHER");
    }

    #[test]
    fn test_transform_owned_matches_transform() {
        let language = Language::new("English", "en");
        language.lexicon().set(Placeholder::typed(
            "language",
            |profile: &Arc<Profile>| profile.abbreviation().to_string(),
        ));

        let message = language.message("{0} ({language})").unwrap();
        let binder = DataBinder::indexed(["hello"]);
        let borrowed = message.transform(&binder).unwrap();
        assert_eq!(borrowed, "hello (en)");
        assert_eq!(message.transform_owned(binder).unwrap(), borrowed);
    }

    #[test]
    fn test_caller_bound_profile_wins() {
        let english = Language::new("English", "en");
        let german = Language::new("German", "de");
        english.lexicon().set(Placeholder::typed(
            "language",
            |profile: &Arc<Profile>| profile.name().to_string(),
        ));

        let mut binder = DataBinder::new();
        binder.bind_type(Arc::clone(german.profile()));
        let message = english.message("{language}").unwrap();
        assert_eq!(message.transform(&binder).unwrap(), "German");
    }

    #[test]
    fn test_registry_render() {
        let language = Language::new("English", "en");
        let registry = language.registry();
        registry.set("count", "{0} items").unwrap();

        let binder = DataBinder::indexed([3]);
        assert_eq!(registry.render("count", &binder).unwrap(), "3 items");
    }
}
