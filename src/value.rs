//! Type identities and type-erased bound values
//!
//! Rust has no class hierarchy to walk at runtime, so the broadest ancestor of a
//! type is declared up front: a [`TypeKey`] names a concrete type and, optionally,
//! the topmost type of the family it belongs to. Binders and placeholders both
//! reduce a key to [`TypeKey::topmost`], which is what lets a value bound for one
//! member of a family reach a placeholder declared against another.

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Stable identity of a type, with its declared topmost ancestor
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
    root: Option<(TypeId, &'static str)>,
}

impl TypeKey {
    /// Key of `T` with no declared ancestor
    pub fn of<T: Any + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            root: None,
        }
    }

    /// Declare `R` as the topmost ancestor of this type
    pub fn extends<R: Any + ?Sized>(self) -> Self {
        let root = TypeId::of::<R>();
        Self {
            root: (root != self.id).then(|| (root, type_name::<R>())),
            ..self
        }
    }

    /// The broadest type of this key's family; the key itself if it has no ancestor
    pub fn topmost(&self) -> TypeKey {
        match self.root {
            Some((id, name)) => TypeKey { id, name, root: None },
            None => TypeKey { root: None, ..*self },
        }
    }

    /// Whether both keys resolve to the same topmost type
    pub fn shares_family(&self, other: &TypeKey) -> bool {
        self.topmost() == other.topmost()
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether an ancestor was declared
    pub fn has_ancestor(&self) -> bool {
        self.root.is_some()
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root {
            Some((_, root)) => write!(f, "TypeKey({} : {})", self.name, root),
            None => write!(f, "TypeKey({})", self.name),
        }
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

type RenderFn = fn(&(dyn Any + Send + Sync)) -> String;

fn render_display<T: Any + fmt::Display>(value: &(dyn Any + Send + Sync)) -> String {
    value
        .downcast_ref::<T>()
        .map(ToString::to_string)
        .unwrap_or_default()
}

/// A value bound into a [`DataBinder`](crate::binder::DataBinder)
///
/// Values are shared, so cloning is cheap. Values built from a [`fmt::Display`]
/// type render through it; opaque values render as their type name.
#[derive(Clone)]
pub struct Value {
    inner: Arc<dyn Any + Send + Sync>,
    type_key: TypeKey,
    render: Option<RenderFn>,
}

impl Value {
    /// Wrap a displayable value
    pub fn new<T: Any + Send + Sync + fmt::Display>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
            type_key: TypeKey::of::<T>(),
            render: Some(render_display::<T>),
        }
    }

    /// Wrap a value that is only meant for typed placeholders
    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
            type_key: TypeKey::of::<T>(),
            render: None,
        }
    }

    /// Display form used when the value is appended verbatim
    pub fn render(&self) -> String {
        match self.render {
            Some(render) => render(self.inner.as_ref()),
            None => self.type_key.name().to_string(),
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Key of the concrete type this value was built from
    pub fn type_key(&self) -> TypeKey {
        self.type_key
    }

    pub fn as_any(&self) -> &(dyn Any + Send + Sync) {
        self.inner.as_ref()
    }
}

impl<T: Any + Send + Sync + fmt::Display> From<T> for Value {
    fn from(value: T) -> Self {
        Value::new(value)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("type", &self.type_key.name())
            .field("rendered", &self.render())
            .finish()
    }
}
