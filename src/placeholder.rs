//! Placeholders: named, typed substitution rules

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::value::{TypeKey, Value};

type TransformFn = dyn Fn(Option<&(dyn Any + Send + Sync)>) -> Option<String> + Send + Sync;

fn erase<F>(f: F) -> Arc<TransformFn>
where
    F: Fn(Option<&(dyn Any + Send + Sync)>) -> Option<String> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// How a placeholder obtains its input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    /// Needs no input; the transform ignores its argument
    Static,
    /// Transforms a bound value of the accepting type
    Dynamic {
        accepting: Option<TypeKey>,
        /// Whether the transform also accepts no value at all
        nullable: bool,
    },
}

/// A named substitution unit with a transform function
#[derive(Clone)]
pub struct Placeholder {
    name: String,
    kind: PlaceholderKind,
    transform: Arc<TransformFn>,
}

impl Placeholder {
    /// A static placeholder always rendering `value`
    pub fn constant(name: impl Into<String>, value: impl fmt::Display) -> Self {
        let rendered = value.to_string();
        Self {
            name: name.into(),
            kind: PlaceholderKind::Static,
            transform: erase(move |_| Some(rendered.clone())),
        }
    }

    /// A static placeholder computing its value on every render
    pub fn from_fn<F, R>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn() -> R + Send + Sync + 'static,
        R: fmt::Display,
    {
        Self {
            name: name.into(),
            kind: PlaceholderKind::Static,
            transform: erase(move |_| Some(f().to_string())),
        }
    }

    /// A placeholder transforming a bound value of type `T`
    pub fn typed<T, F, R>(name: impl Into<String>, f: F) -> Self
    where
        T: Any,
        F: Fn(&T) -> R + Send + Sync + 'static,
        R: fmt::Display,
    {
        Self::with_accepting(name, TypeKey::of::<T>(), f)
    }

    /// Like [`Placeholder::typed`], with `Root` declared as the topmost ancestor of `T`
    ///
    /// The placeholder then looks its input up under `Root`'s key.
    pub fn typed_under<T, Root, F, R>(name: impl Into<String>, f: F) -> Self
    where
        T: Any,
        Root: Any + ?Sized,
        F: Fn(&T) -> R + Send + Sync + 'static,
        R: fmt::Display,
    {
        Self::with_accepting(name, TypeKey::of::<T>().extends::<Root>(), f)
    }

    /// A placeholder rendering a bound `T` through its `Display` impl
    pub fn display<T: Any + fmt::Display>(name: impl Into<String>) -> Self {
        Self::typed(name, |value: &T| value.to_string())
    }

    /// A placeholder that accepts a bound `T` or, when none is bound, no value
    pub fn nullable<T, F, R>(name: impl Into<String>, f: F) -> Self
    where
        T: Any,
        F: Fn(Option<&T>) -> R + Send + Sync + 'static,
        R: fmt::Display,
    {
        Self {
            name: name.into(),
            kind: PlaceholderKind::Dynamic {
                accepting: Some(TypeKey::of::<T>()),
                nullable: true,
            },
            transform: erase(move |data| match data {
                None => Some(f(None).to_string()),
                Some(data) => data.downcast_ref::<T>().map(|v| f(Some(v)).to_string()),
            }),
        }
    }

    fn with_accepting<T, F, R>(name: impl Into<String>, accepting: TypeKey, f: F) -> Self
    where
        T: Any,
        F: Fn(&T) -> R + Send + Sync + 'static,
        R: fmt::Display,
    {
        Self {
            name: name.into(),
            kind: PlaceholderKind::Dynamic {
                accepting: Some(accepting),
                nullable: false,
            },
            transform: erase(move |data| {
                data.and_then(|d| d.downcast_ref::<T>())
                    .map(|v| f(v).to_string())
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> PlaceholderKind {
        self.kind
    }

    pub fn accepting_type(&self) -> Option<TypeKey> {
        match self.kind {
            PlaceholderKind::Static => None,
            PlaceholderKind::Dynamic { accepting, .. } => accepting,
        }
    }

    pub fn is_static(&self) -> bool {
        self.kind == PlaceholderKind::Static
    }

    /// Static placeholders are always nullable
    pub fn is_nullable(&self) -> bool {
        match self.kind {
            PlaceholderKind::Static => true,
            PlaceholderKind::Dynamic { nullable, .. } => nullable,
        }
    }

    /// Whether the placeholder takes part in type-key resolution
    pub fn is_transformative(&self) -> bool {
        matches!(
            self.kind,
            PlaceholderKind::Dynamic {
                accepting: Some(_),
                ..
            }
        )
    }

    /// Transform `data` into display text
    ///
    /// Returns `None` when the placeholder cannot accept `data`: a value of another
    /// type, or no value for a placeholder that is not nullable.
    pub fn transform(&self, data: Option<&Value>) -> Option<String> {
        match data {
            Some(_) if self.is_static() => (self.transform)(None),
            Some(value) => (self.transform)(Some(value.as_any())),
            None if self.is_nullable() => (self.transform)(None),
            None => None,
        }
    }
}

impl fmt::Debug for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Placeholder")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
