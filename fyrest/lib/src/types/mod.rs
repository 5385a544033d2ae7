//! Type descriptors for client code generation.
//!
//! A [`TypeDescriptor`] is the server-side description of a value's shape.
//! Rust types expose their descriptor through the [`ClientType`] trait,
//! which is implemented here for primitives, `Option<T>` and sequences, and
//! for composites through the [`client_type!`](crate::client_type) macro.
//!
//! ## Examples
//!
//! ```rust
//! use fyrest_lib::{client_type, ClientType, TypeDescriptor, TypeRegistry};
//!
//! struct Tag {
//!     label: String,
//! }
//!
//! struct Item {
//!     id: u64,
//!     tags: Vec<Tag>,
//!     note: Option<String>,
//! }
//!
//! client_type!(Tag { label: String });
//! client_type!(Item { id: u64, tags: Vec<Tag>, note: Option<String> });
//!
//! let mut registry = TypeRegistry::new();
//! assert_eq!(registry.register::<Vec<Item>>(), "Array<Item>");
//! assert!(registry.contains("Tag"));
//! assert!(matches!(Item::descriptor(), TypeDescriptor::Composite(_)));
//! ```

mod resolve;

use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

pub use resolve::{is_primitive, path_param_ts_type, primitive_ts_type, resolve, UNKNOWN_TS_TYPE};

/// The shape of a value, as seen by the client generator.
#[derive(Debug, Clone)]
pub enum TypeDescriptor {
    /// A primitive, named by its server-side name (`int`, `str`, ...).
    Primitive(&'static str),
    /// A value that may be absent.
    Optional(Box<TypeDescriptor>),
    /// An ordered sequence of values.
    Sequence(Box<TypeDescriptor>),
    /// A structured type with named, ordered fields.
    Composite(CompositeType),
    /// A reference by name to a type registered elsewhere.
    Forward(&'static str),
    /// A value whose type is not known.
    Unknown,
}

impl TypeDescriptor {
    /// Wraps a descriptor in [`TypeDescriptor::Optional`].
    pub fn optional(inner: TypeDescriptor) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// Wraps a descriptor in [`TypeDescriptor::Sequence`].
    pub fn sequence(inner: TypeDescriptor) -> Self {
        Self::Sequence(Box::new(inner))
    }
}

/// A composite type: a name plus a lazily produced field list.
///
/// Fields are produced by a function pointer rather than stored, so a type
/// can mention itself (directly or through other types) without building an
/// infinite descriptor.
#[derive(Clone, Copy)]
pub struct CompositeType {
    name: &'static str,
    fields: fn() -> Vec<Field>,
}

impl CompositeType {
    /// Creates a composite from its name and field list producer.
    pub const fn new(name: &'static str, fields: fn() -> Vec<Field>) -> Self {
        Self { name, fields }
    }

    /// The composite's type name, used as the client type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The ordered field list.
    pub fn fields(&self) -> Vec<Field> {
        (self.fields)()
    }
}

impl fmt::Debug for CompositeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeType")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A named field of a composite type.
#[derive(Debug, Clone)]
pub struct Field {
    /// Field name, emitted as-is in the client declaration.
    pub name: &'static str,
    /// The field's type.
    pub descriptor: TypeDescriptor,
}

impl Field {
    /// Creates a field.
    pub fn new(name: &'static str, descriptor: TypeDescriptor) -> Self {
        Self { name, descriptor }
    }
}

/// Types that can describe themselves to the client generator.
///
/// This is the reflection capability the registry relies on: given a type,
/// produce its descriptor (and, for composites, its ordered fields).
pub trait ClientType {
    /// Returns the descriptor of this type.
    fn descriptor() -> TypeDescriptor;
}

macro_rules! primitive_client_type {
    ($name:literal => $($ty:ty),+ $(,)?) => {
        $(
            impl ClientType for $ty {
                fn descriptor() -> TypeDescriptor {
                    TypeDescriptor::Primitive($name)
                }
            }
        )+
    };
}

primitive_client_type!("bool" => bool);
primitive_client_type!("str" => String, &str, char);
primitive_client_type!("int" => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
primitive_client_type!("float" => f32, f64);
primitive_client_type!("NoneType" => ());
primitive_client_type!("Any" => serde_json::Value);

impl<T: ClientType> ClientType for Option<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::optional(T::descriptor())
    }
}

impl<T: ClientType> ClientType for Vec<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::sequence(T::descriptor())
    }
}

impl<T: ClientType> ClientType for VecDeque<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::sequence(T::descriptor())
    }
}

impl<T: ClientType> ClientType for [T] {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::sequence(T::descriptor())
    }
}

impl<T: ClientType + ?Sized> ClientType for Box<T> {
    fn descriptor() -> TypeDescriptor {
        T::descriptor()
    }
}

impl<T: ClientType + ?Sized> ClientType for Arc<T> {
    fn descriptor() -> TypeDescriptor {
        T::descriptor()
    }
}

impl<T: ClientType + ?Sized> ClientType for Rc<T> {
    fn descriptor() -> TypeDescriptor {
        T::descriptor()
    }
}

/// Implements [`ClientType`] for a struct by listing its fields.
///
/// The struct name becomes the client type name; fields are declared in the
/// order given.
///
/// ```rust
/// use fyrest_lib::{client_type, TypeRegistry};
///
/// struct Category {
///     name: String,
///     children: Vec<Category>,
/// }
///
/// client_type!(Category { name: String, children: Vec<Category> });
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Category>();
/// assert!(registry.render_all().contains("children: Array<Category>;"));
/// ```
#[macro_export]
macro_rules! client_type {
    ($ty:ident { $($field:ident : $fty:ty),* $(,)? }) => {
        impl $crate::ClientType for $ty {
            fn descriptor() -> $crate::TypeDescriptor {
                $crate::TypeDescriptor::Composite($crate::CompositeType::new(
                    stringify!($ty),
                    || {
                        vec![
                            $(
                                $crate::Field::new(
                                    stringify!($field),
                                    <$fty as $crate::ClientType>::descriptor(),
                                ),
                            )*
                        ]
                    },
                ))
            }
        }
    };
}
