//! Data binding
//!
//! A [`DataBinder`] carries the runtime data for one render. Values are bound in
//! three key spaces, which the transformer consults in a fixed order:
//!
//! | Key      | Precedence | Addresses                                          |
//! |----------|------------|----------------------------------------------------|
//! | Index    | highest    | the n-th placeholder of a message, by position     |
//! | Name     | middle     | every placeholder with that name                   |
//! | Type     | lowest     | lexicon placeholders accepting that type's family  |
//!
//! Keys are normalized by [`DataBinder::compute_key`] before every access.

use std::any::Any;
use std::collections::HashMap;

use crate::config::BinderConfig;
use crate::error::{PlangError, Result};
use crate::value::{TypeKey, Value};

/// A key as supplied by the caller, before normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindKey {
    Name(String),
    /// Signed index; negative values are rejected on normalization
    Index(i64),
    /// Unsigned index, used as is
    Position(usize),
    Type(TypeKey),
}

impl From<&str> for BindKey {
    fn from(name: &str) -> Self {
        BindKey::Name(name.to_string())
    }
}

impl From<String> for BindKey {
    fn from(name: String) -> Self {
        BindKey::Name(name)
    }
}

impl From<&String> for BindKey {
    fn from(name: &String) -> Self {
        BindKey::Name(name.clone())
    }
}

impl From<i32> for BindKey {
    fn from(index: i32) -> Self {
        BindKey::Index(index.into())
    }
}

impl From<i64> for BindKey {
    fn from(index: i64) -> Self {
        BindKey::Index(index)
    }
}

impl From<u32> for BindKey {
    fn from(index: u32) -> Self {
        BindKey::Index(index.into())
    }
}

impl From<usize> for BindKey {
    fn from(index: usize) -> Self {
        BindKey::Position(index)
    }
}

impl From<TypeKey> for BindKey {
    fn from(key: TypeKey) -> Self {
        BindKey::Type(key)
    }
}

/// A normalized key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// Placeholder name, lowercased unless the binder is case-sensitive
    Name(String),
    /// Positional index of a placeholder within a message
    Index(usize),
    /// Topmost type of a family
    Type(TypeKey),
}

/// Per-render key/value store
#[derive(Debug, Clone, Default)]
pub struct DataBinder {
    case_sensitive: bool,
    entries: HashMap<Key, Value>,
    highest_index: Option<usize>,
}

impl DataBinder {
    /// Create an empty, case-insensitive binder
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_case_sensitivity(case_sensitive: bool) -> Self {
        Self {
            case_sensitive,
            ..Self::default()
        }
    }

    pub fn from_config(config: &BinderConfig) -> Self {
        Self::with_case_sensitivity(config.case_sensitive)
    }

    /// A binder with `values` bound at indices 0, 1, 2, ...
    pub fn indexed<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        let mut binder = Self::new();
        for (index, value) in values.into_iter().enumerate() {
            binder.bind_index(index, value);
        }
        binder
    }

    /// A binder populated from JSON
    ///
    /// Object members are bound by name, array elements by index and any other
    /// value at index 0. Strings are bound without quotes and `null` as empty text.
    pub fn from_json(json: &serde_json::Value) -> Self {
        let mut binder = Self::new();
        match json {
            serde_json::Value::Object(members) => {
                for (name, value) in members {
                    binder.bind_name(name, json_value(value));
                }
            }
            serde_json::Value::Array(elements) => {
                for (index, value) in elements.iter().enumerate() {
                    binder.bind_index(index, json_value(value));
                }
            }
            other => {
                binder.bind_index(0, json_value(other));
            }
        }
        binder
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Normalize a caller key
    ///
    /// Names are lowercased unless this binder is case-sensitive, indices must not be
    /// negative and type keys are replaced by the topmost type of their family.
    pub fn compute_key(&self, key: impl Into<BindKey>) -> Result<Key> {
        match key.into() {
            BindKey::Name(name) if self.case_sensitive => Ok(Key::Name(name)),
            BindKey::Name(name) => Ok(Key::Name(name.to_lowercase())),
            BindKey::Index(index) => usize::try_from(index)
                .map(Key::Index)
                .map_err(|_| PlangError::negative_index(index)),
            BindKey::Position(index) => Ok(Key::Index(index)),
            BindKey::Type(key) => Ok(Key::Type(key.topmost())),
        }
    }

    /// Bind `value` under `key`, returning the value it replaced
    pub fn bind(&mut self, key: impl Into<BindKey>, value: impl Into<Value>) -> Result<Option<Value>> {
        let key = self.compute_key(key)?;
        Ok(self.insert(key, value.into()))
    }

    /// Bind `value` to the placeholder at position `index`
    pub fn bind_index(&mut self, index: usize, value: impl Into<Value>) -> Option<Value> {
        self.insert(Key::Index(index), value.into())
    }

    /// Bind `value` to every placeholder named `name`
    pub fn bind_name(&mut self, name: &str, value: impl Into<Value>) -> Option<Value> {
        let key = if self.case_sensitive {
            name.to_string()
        } else {
            name.to_lowercase()
        };
        self.insert(Key::Name(key), value.into())
    }

    /// Bind `value` under its own type, for placeholders accepting `T`
    pub fn bind_type<T: Any + Send + Sync>(&mut self, value: T) -> Option<Value> {
        self.insert(Key::Type(TypeKey::of::<T>()), Value::opaque(value))
    }

    /// Bind `value` under `Root`, the declared topmost ancestor of `T`
    pub fn bind_type_under<T, Root>(&mut self, value: T) -> Option<Value>
    where
        T: Any + Send + Sync,
        Root: Any + ?Sized,
    {
        let key = TypeKey::of::<T>().extends::<Root>().topmost();
        self.insert(Key::Type(key), Value::opaque(value))
    }

    /// Bind each of `values` at consecutive indices after the highest bound index
    ///
    /// Nothing is bound if the indices would overflow.
    pub fn push<V: Into<Value>>(&mut self, values: impl IntoIterator<Item = V>) -> Result<()> {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Ok(());
        }

        let offset = match self.highest_index {
            Some(highest) => highest.checked_add(1),
            None => Some(0),
        };
        let max_index = usize::try_from(i64::MAX).unwrap_or(usize::MAX);
        let start = offset
            .filter(|start| {
                start
                    .checked_add(values.len() - 1)
                    .is_some_and(|last| last <= max_index)
            })
            .ok_or(PlangError::IndexOverflow {
                offset: self.highest_index.unwrap_or(0),
                count: values.len(),
            })?;

        for (i, value) in values.into_iter().enumerate() {
            self.insert(Key::Index(start + i), value);
        }
        Ok(())
    }

    pub fn get(&self, key: impl Into<BindKey>) -> Result<Option<&Value>> {
        let key = self.compute_key(key)?;
        Ok(self.entries.get(&key))
    }

    /// Look up an already normalized key
    pub fn get_key(&self, key: &Key) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn is_bound(&self, key: impl Into<BindKey>) -> Result<bool> {
        let key = self.compute_key(key)?;
        Ok(self.entries.contains_key(&key))
    }

    /// Whether a value is bound for `T`'s family
    pub fn is_type_bound<T: Any + ?Sized>(&self) -> bool {
        self.entries
            .contains_key(&Key::Type(TypeKey::of::<T>().topmost()))
    }

    /// Remove the value bound under `key`
    ///
    /// Removing the highest bound index rescans all index keys, which is linear in
    /// the size of the binder.
    pub fn unbind(&mut self, key: impl Into<BindKey>) -> Result<Option<Value>> {
        let key = self.compute_key(key)?;
        let removed = self.entries.remove(&key);

        if removed.is_some() {
            if let Key::Index(index) = key {
                if self.highest_index == Some(index) {
                    self.highest_index = self
                        .entries
                        .keys()
                        .filter_map(|k| match k {
                            Key::Index(i) => Some(*i),
                            _ => None,
                        })
                        .max();
                    tracing::trace!(highest = ?self.highest_index, "recomputed highest index");
                }
            }
        }
        Ok(removed)
    }

    /// The highest bound index, `None` if no index is bound
    pub fn highest_index(&self) -> Option<usize> {
        self.highest_index
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.entries.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.highest_index = None;
    }

    fn insert(&mut self, key: Key, value: Value) -> Option<Value> {
        if let Key::Index(index) = key {
            self.highest_index = Some(self.highest_index.map_or(index, |h| h.max(index)));
        }
        self.entries.insert(key, value)
    }
}

fn json_value(value: &serde_json::Value) -> Value {
    match value {
        serde_json::Value::String(text) => Value::new(text.clone()),
        serde_json::Value::Null => Value::new(String::new()),
        other => Value::new(other.clone()),
    }
}
