//! Lexicon
//!
//! The registry of placeholders a language knows about. Shared between the parser
//! and the transformer of a language, possibly across threads, so every access goes
//! through a single per-instance lock.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::placeholder::Placeholder;

/// Placeholders by (normalized) name
#[derive(Debug, Default)]
pub struct Lexicon {
    case_sensitive: bool,
    entries: RwLock<HashMap<String, Arc<Placeholder>>>,
}

impl Lexicon {
    /// Create an empty, case-insensitive lexicon
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty lexicon with the given case policy
    pub fn with_case_sensitivity(case_sensitive: bool) -> Self {
        Self {
            case_sensitive,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Normalize a placeholder name according to this lexicon's case policy
    pub fn normalize(&self, name: &str) -> String {
        if self.case_sensitive {
            name.to_string()
        } else {
            name.to_lowercase()
        }
    }

    /// Register a placeholder under its own name, replacing any previous one
    pub fn set(&self, placeholder: Placeholder) -> Option<Arc<Placeholder>> {
        let key = self.normalize(placeholder.name());
        tracing::debug!(placeholder = %placeholder.name(), "registering placeholder");
        self.write().insert(key, Arc::new(placeholder))
    }

    /// Register several placeholders; later ones win on name clashes
    pub fn extend(&self, placeholders: impl IntoIterator<Item = Placeholder>) {
        let mut entries = self.write();
        for placeholder in placeholders {
            entries.insert(self.normalize(placeholder.name()), Arc::new(placeholder));
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<Placeholder>> {
        self.read().get(&self.normalize(name)).cloned()
    }

    pub fn has(&self, name: &str) -> bool {
        self.read().contains_key(&self.normalize(name))
    }

    pub fn remove(&self, name: &str) -> Option<Arc<Placeholder>> {
        self.write().remove(&self.normalize(name))
    }

    /// Names of all registered placeholders, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .read()
            .values()
            .map(|p| p.name().to_string())
            .collect();
        names.sort();
        names
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

    /// The registered name closest to `name` (fuzzy)
    pub fn suggest(&self, name: &str) -> Option<String> {
        let matcher = SkimMatcherV2::default();
        let entries = self.read();

        entries
            .values()
            .filter_map(|p| {
                matcher
                    .fuzzy_match(p.name(), name)
                    .map(|score| (score, p.name()))
            })
            .max_by(|a, b| a.0.cmp(&b.0).then_with(|| b.1.cmp(a.1)))
            .map(|(_, name)| name.to_string())
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<Placeholder>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<Placeholder>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get() {
        let lexicon = Lexicon::new();
        lexicon.set(Placeholder::constant("foo", "bar"));

        let placeholder = lexicon.get("foo").unwrap();
        assert!(placeholder.is_static());
        assert!(placeholder.is_nullable());
        assert!(!placeholder.is_transformative());
        assert_eq!(placeholder.transform(None).as_deref(), Some("bar"));
    }

    #[test]
    fn test_case_insensitive_by_default() {
        let lexicon = Lexicon::new();
        lexicon.set(Placeholder::constant("User.Name", "x"));
        assert!(lexicon.has("user.name"));
        assert!(lexicon.has("USER.NAME"));
        assert_eq!(lexicon.get("user.name").unwrap().name(), "User.Name");
    }

    #[test]
    fn test_case_sensitive() {
        let lexicon = Lexicon::with_case_sensitivity(true);
        lexicon.set(Placeholder::constant("Name", "x"));
        assert!(lexicon.has("Name"));
        assert!(!lexicon.has("name"));
    }

    #[test]
    fn test_last_registration_wins() {
        let lexicon = Lexicon::new();
        assert!(lexicon.set(Placeholder::constant("greeting", "hi")).is_none());
        let previous = lexicon.set(Placeholder::constant("greeting", "hello"));
        assert!(previous.is_some());
        assert_eq!(lexicon.len(), 1);
        assert_eq!(
            lexicon.get("greeting").unwrap().transform(None).as_deref(),
            Some("hello")
        );
    }

    #[test]
    fn test_remove() {
        let lexicon = Lexicon::new();
        lexicon.set(Placeholder::constant("a", 1));
        assert!(lexicon.remove("A").is_some());
        assert!(lexicon.remove("a").is_none());
        assert!(lexicon.is_empty());
    }

    #[test]
    fn test_suggest() {
        let lexicon = Lexicon::new();
        lexicon.extend([
            Placeholder::constant("user.name", "x"),
            Placeholder::constant("address.city", "y"),
        ]);
        assert_eq!(lexicon.suggest("usr.name").as_deref(), Some("user.name"));
        assert_eq!(lexicon.suggest("zzz"), None);
        assert_eq!(lexicon.names(), vec!["address.city", "user.name"]);
    }
}
