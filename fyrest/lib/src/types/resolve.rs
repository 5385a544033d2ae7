//! Descriptor to TypeScript type resolution.

use super::TypeDescriptor;
use crate::registry::TypeRegistry;

/// The client type used whenever a type cannot be mapped.
pub const UNKNOWN_TS_TYPE: &str = "unknown";

/// Server-side primitive names and their client types.
const PRIMITIVES: &[(&str, &str)] = &[
    ("int", "number"),
    ("float", "number"),
    ("bool", "boolean"),
    ("str", "string"),
    ("NoneType", "null"),
    ("Any", UNKNOWN_TS_TYPE),
];

/// Route converter names that are not primitive type names but still
/// capture a string segment.
const STRING_CONVERTERS: &[&str] = &["string", "path", "uuid"];

/// Looks up the client type of a primitive name.
///
/// ```rust
/// use fyrest_lib::types::primitive_ts_type;
///
/// assert_eq!(primitive_ts_type("int"), Some("number"));
/// assert_eq!(primitive_ts_type("Item"), None);
/// ```
pub fn primitive_ts_type(name: &str) -> Option<&'static str> {
    PRIMITIVES
        .iter()
        .find(|(primitive, _)| *primitive == name)
        .map(|(_, ts)| *ts)
}

/// Returns `true` if `name` is one of the known primitive names.
pub fn is_primitive(name: &str) -> bool {
    primitive_ts_type(name).is_some()
}

/// Maps the kind of a `<kind:name>` route segment to a client type.
///
/// Primitive names use the primitive table; string-like converters map to
/// `string`; anything else is `unknown`.
pub fn path_param_ts_type(kind: &str) -> &'static str {
    if let Some(ts) = primitive_ts_type(kind) {
        return ts;
    }
    if STRING_CONVERTERS.contains(&kind) {
        return "string";
    }
    UNKNOWN_TS_TYPE
}

/// Resolves a descriptor to its TypeScript type string.
///
/// Composites are registered in `registry` (idempotently) as a side effect.
/// Forward references are emitted by name without registration. Resolution
/// never fails: unmapped shapes become `unknown`, unrecognized primitive
/// names are passed through unchanged.
pub fn resolve(descriptor: &TypeDescriptor, registry: &mut TypeRegistry) -> String {
    match descriptor {
        TypeDescriptor::Primitive(name) => primitive_ts_type(name)
            .map(str::to_string)
            .unwrap_or_else(|| (*name).to_string()),
        TypeDescriptor::Optional(inner) => format!("{} | null", resolve(inner, registry)),
        TypeDescriptor::Sequence(inner) => format!("Array<{}>", resolve(inner, registry)),
        TypeDescriptor::Composite(composite) => {
            registry.register_composite(composite);
            composite.name().to_string()
        }
        TypeDescriptor::Forward(name) => (*name).to_string(),
        TypeDescriptor::Unknown => UNKNOWN_TS_TYPE.to_string(),
    }
}
