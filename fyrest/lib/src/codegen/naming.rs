//! Client function naming.

use heck::ToLowerCamelCase;

use crate::route::parse_template;

/// Derives the client function name of a route.
///
/// The handler name wins when present. Otherwise the path segments are
/// joined, with placeholders replaced by their parameter names. Both are
/// converted to lowerCamelCase; an empty result is `index`.
///
/// ```rust
/// use fyrest_lib::codegen::function_name;
///
/// assert_eq!(function_name(Some("list_items"), "/items"), "listItems");
/// assert_eq!(function_name(None, "/items/<int:id>/tags"), "itemsIdTags");
/// assert_eq!(function_name(None, "/"), "index");
/// ```
pub fn function_name(handler_name: Option<&str>, template: &str) -> String {
    let source = match handler_name {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        _ => path_words(template),
    };
    let name = source.to_lower_camel_case();
    if name.is_empty() {
        "index".to_string()
    } else {
        name
    }
}

fn path_words(template: &str) -> String {
    let path = match parse_template(template) {
        Ok(parsed) => parsed
            .params
            .iter()
            .fold(parsed.client_template, |path, param| {
                path.replace(&format!("${{{}}}", param.name), &param.name)
            }),
        Err(_) => template.to_string(),
    };
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}
