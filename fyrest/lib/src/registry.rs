//! Deduplicated store of client type declarations.
//!
//! The registry walks composite types depth-first, declaring every
//! composite a type depends on before the type itself. A visited set keyed
//! on the type name guarantees each composite is declared once and that
//! self-referential or mutually referential types terminate.

use std::collections::HashSet;

use crate::codegen::render_type_declaration;
use crate::types::{self, ClientType, CompositeType, Field, TypeDescriptor};

/// A composite type that has been rendered.
#[derive(Debug, Clone)]
pub struct RegisteredType {
    /// Unique type name.
    pub name: &'static str,
    /// The rendered `export type` declaration.
    pub declaration: String,
    /// Ordered fields the declaration was rendered from.
    pub fields: Vec<Field>,
}

/// Emission-ordered registry of composite type declarations.
///
/// ## Examples
///
/// ```rust
/// use fyrest_lib::{client_type, TypeRegistry};
///
/// struct Owner { name: String }
/// struct Pet { name: String, owner: Owner }
///
/// client_type!(Owner { name: String });
/// client_type!(Pet { name: String, owner: Owner });
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Pet>();
/// registry.register::<Pet>();
///
/// let names: Vec<_> = registry.iter().map(|t| t.name).collect();
/// assert_eq!(names, ["Owner", "Pet"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    visited: HashSet<&'static str>,
    types: Vec<RegisteredType>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` (and every composite it references) and returns its
    /// client type string.
    pub fn register<T: ClientType + ?Sized>(&mut self) -> String {
        self.resolve(&T::descriptor())
    }

    /// Resolves a descriptor, registering any composite it reaches.
    pub fn resolve(&mut self, descriptor: &TypeDescriptor) -> String {
        types::resolve(descriptor, self)
    }

    /// Registers a composite and, first, every composite its fields reference.
    ///
    /// Already-visited names and primitive names return immediately. The name
    /// is marked visited before the fields are walked, which is what stops
    /// recursion through cycles.
    pub fn register_composite(&mut self, composite: &CompositeType) {
        let name = composite.name();
        if self.visited.contains(name) || types::is_primitive(name) {
            return;
        }
        self.visited.insert(name);

        let fields = composite.fields();
        let rendered: Vec<(&str, String)> = fields
            .iter()
            .map(|field| (field.name, self.resolve(&field.descriptor)))
            .collect();
        let declaration = render_type_declaration(name, &rendered);

        tracing::debug!(type_name = name, fields = fields.len(), "registered client type");
        self.types.push(RegisteredType {
            name,
            declaration,
            fields,
        });
    }

    /// Returns `true` if a composite with this name has been visited.
    pub fn contains(&self, name: &str) -> bool {
        self.visited.contains(name)
    }

    /// Returns the registered type with this name.
    pub fn get(&self, name: &str) -> Option<&RegisteredType> {
        self.types.iter().find(|registered| registered.name == name)
    }

    /// Iterates registered types in emission order.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredType> {
        self.types.iter()
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Renders every declaration in registration order, separated by one
    /// blank line.
    pub fn render_all(&self) -> String {
        self.types
            .iter()
            .map(|registered| registered.declaration.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
