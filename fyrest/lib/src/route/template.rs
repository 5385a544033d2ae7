//! Route template parsing.
//!
//! Templates mark path parameters with bracketed, typed segments:
//! `/items/<int:id>`. Parsing produces the parameter list, the client
//! template (`/items/${id}`) and the axum router path (`/items/:id`).

use std::sync::LazyLock;

use regex::Regex;

use crate::error::RouteError;
use crate::types::path_param_ts_type;

static SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([^<>]*)>").expect("segment pattern is valid"));

static TYPED_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+):(\w+)$").expect("typed param pattern is valid"));

/// A path parameter extracted from a route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathParam {
    /// Parameter name, used as the client function parameter.
    pub name: String,
    /// Primitive kind from the template (`int`, `float`, `string`, ...).
    pub kind: String,
}

impl PathParam {
    /// The TypeScript type of this parameter.
    pub fn ts_type(&self) -> &'static str {
        path_param_ts_type(&self.kind)
    }

    /// Returns `(name, kind)` as string slices.
    pub fn as_pair(&self) -> (&str, &str) {
        (&self.name, &self.kind)
    }
}

/// A parsed route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTemplate {
    /// Parameters in template order.
    pub params: Vec<PathParam>,
    /// Template with `${name}` interpolation placeholders.
    pub client_template: String,
    /// Path in axum's router syntax.
    pub router_path: String,
}

/// Parses a route template.
///
/// ## Errors
///
/// Returns [`RouteError::MalformedTemplate`] when a bracketed segment is not
/// `<kind:name>`, and [`RouteError::UnclosedSegment`] when a `<` or `>` is
/// left unbalanced.
///
/// ## Examples
///
/// ```rust
/// use fyrest_lib::route::parse_template;
///
/// let parsed = parse_template("/users/<int:user_id>/files/<path:file>").unwrap();
/// assert_eq!(parsed.client_template, "/users/${user_id}/files/${file}");
/// assert_eq!(parsed.router_path, "/users/:user_id/files/*file");
/// assert_eq!(parsed.params[0].as_pair(), ("user_id", "int"));
/// ```
pub fn parse_template(template: &str) -> Result<ParsedTemplate, RouteError> {
    let mut params = Vec::new();
    let mut client_template = String::with_capacity(template.len());
    let mut router_path = String::with_capacity(template.len());
    let mut last = 0;

    for capture in SEGMENT.captures_iter(template) {
        let (Some(whole), Some(inner)) = (capture.get(0), capture.get(1)) else {
            continue;
        };
        let literal = &template[last..whole.start()];
        check_balanced(literal, template)?;
        client_template.push_str(literal);
        router_path.push_str(literal);

        let typed = TYPED_PARAM
            .captures(inner.as_str())
            .ok_or_else(|| RouteError::MalformedTemplate {
                template: template.to_string(),
                segment: inner.as_str().to_string(),
            })?;
        let kind = typed[1].to_string();
        let name = typed[2].to_string();

        client_template.push_str(&format!("${{{name}}}"));
        let marker = if kind == "path" { '*' } else { ':' };
        router_path.push(marker);
        router_path.push_str(&name);

        params.push(PathParam { name, kind });
        last = whole.end();
    }

    let rest = &template[last..];
    check_balanced(rest, template)?;
    client_template.push_str(rest);
    router_path.push_str(rest);

    Ok(ParsedTemplate {
        params,
        client_template,
        router_path,
    })
}

fn check_balanced(literal: &str, template: &str) -> Result<(), RouteError> {
    if literal.contains('<') || literal.contains('>') {
        return Err(RouteError::UnclosedSegment {
            template: template.to_string(),
        });
    }
    Ok(())
}
