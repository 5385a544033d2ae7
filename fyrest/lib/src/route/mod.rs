//! Route declarations and the route table.
//!
//! - [`RouteOptions`] - Metadata attached to a declaration (response type,
//!   auth requirement, file uploads, client function name)
//! - [`RouteEntry`] - One declared endpoint
//! - [`RouteTable`] - Append-only, ordered collection of entries
//! - [`parse_template`] - `<kind:name>` placeholder parsing

mod template;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub use template::{parse_template, ParsedTemplate, PathParam};

use crate::codegen::function_name;
use crate::error::RouteError;
use crate::method::RestMethod;
use crate::registry::TypeRegistry;
use crate::types::{ClientType, TypeDescriptor, UNKNOWN_TS_TYPE};

/// Authorization required to reach a route.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AuthRequirement {
    /// Public route; the principal is never looked up.
    #[default]
    None,
    /// Any authenticated principal.
    User,
    /// An authenticated principal with admin rights.
    Admin,
}

impl AuthRequirement {
    /// Returns `true` if the principal must be looked up for this route.
    pub fn needs_principal(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Metadata attached to a route declaration.
///
/// ## Examples
///
/// ```rust
/// use fyrest_lib::{AuthRequirement, RouteOptions};
///
/// let options = RouteOptions::returns::<Vec<String>>().admin().accepts_files();
/// assert_eq!(options.auth_requirement(), AuthRequirement::Admin);
/// assert!(options.files_accepted());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteOptions {
    response: Option<TypeDescriptor>,
    auth: AuthRequirement,
    accepts_files: bool,
    name: Option<String>,
}

impl RouteOptions {
    /// Options with no response type, no auth and no file uploads.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options declaring `T` as the response type.
    pub fn returns<T: ClientType + ?Sized>() -> Self {
        Self::new().response(T::descriptor())
    }

    /// Sets the response type descriptor.
    pub fn response(mut self, descriptor: TypeDescriptor) -> Self {
        self.response = Some(descriptor);
        self
    }

    /// Sets the auth requirement.
    pub fn auth(mut self, auth: AuthRequirement) -> Self {
        self.auth = auth;
        self
    }

    /// Requires an authenticated principal.
    pub fn user(self) -> Self {
        self.auth(AuthRequirement::User)
    }

    /// Requires an admin principal.
    pub fn admin(self) -> Self {
        self.auth(AuthRequirement::Admin)
    }

    /// Marks the route as accepting multipart file uploads.
    pub fn accepts_files(mut self) -> Self {
        self.accepts_files = true;
        self
    }

    /// Names the handler; the client function name is derived from it.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The handler name, if one was given.
    pub fn handler_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The declared auth requirement.
    pub fn auth_requirement(&self) -> AuthRequirement {
        self.auth
    }

    /// Whether file uploads are accepted.
    pub fn files_accepted(&self) -> bool {
        self.accepts_files
    }
}

/// One declared endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    /// The template as declared (`/items/<int:id>`).
    pub path_template: String,
    /// Template used in the generated client URL (`/items/${id}`).
    pub client_template: String,
    /// Path mounted on the axum router (`/items/:id`).
    pub router_path: String,
    /// Resolved client type of the response body.
    pub response_type: String,
    /// Method used by the generated client function.
    pub method: RestMethod,
    /// Every method the route is mounted for.
    pub methods: Vec<RestMethod>,
    /// Handler name, if one was given.
    pub handler_name: Option<String>,
    /// Auth requirement.
    pub auth: AuthRequirement,
    /// Whether the route accepts file uploads.
    pub accepts_files: bool,
    /// Path parameters in template order.
    pub params: Vec<PathParam>,
}

impl RouteEntry {
    /// Name of the generated client function.
    pub fn function_name(&self) -> String {
        function_name(self.handler_name.as_deref(), &self.path_template)
    }
}

/// Append-only, ordered collection of declared routes.
///
/// Insertion order is emission order. Entries are never deduplicated:
/// declaring the same path and method twice produces two entries.
///
/// Router paths name each parameter position after the first parameter
/// declared there, so `/items/<int:id>` and `/items/<string:slug>` share
/// the router path `/items/:id` while keeping their own client templates.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    param_slots: BTreeMap<String, String>,
}

impl RouteTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a route: parses the template, resolves (and registers) the
    /// response type, and appends the entry.
    ///
    /// An empty `methods` slice means GET.
    ///
    /// ## Errors
    ///
    /// Returns a [`RouteError`] if the template is malformed; nothing is
    /// recorded in that case.
    pub fn declare(
        &mut self,
        types: &mut TypeRegistry,
        template: &str,
        methods: &[RestMethod],
        options: &RouteOptions,
    ) -> Result<&RouteEntry, RouteError> {
        let parsed = parse_template(template)?;
        let methods = if methods.is_empty() {
            vec![RestMethod::Get]
        } else {
            methods.to_vec()
        };
        let response_type = options
            .response
            .as_ref()
            .map(|descriptor| types.resolve(descriptor))
            .unwrap_or_else(|| UNKNOWN_TS_TYPE.to_string());

        let router_path = self.mount_path(&parsed.router_path);

        self.entries.push(RouteEntry {
            path_template: template.to_string(),
            client_template: parsed.client_template,
            router_path,
            response_type,
            method: methods[0],
            methods,
            handler_name: options.name.clone(),
            auth: options.auth,
            accepts_files: options.accepts_files,
            params: parsed.params,
        });
        let index = self.entries.len() - 1;
        Ok(&self.entries[index])
    }

    /// Renames parameter segments to the name first declared at the same
    /// position, which axum requires of routes sharing a prefix.
    fn mount_path(&mut self, router_path: &str) -> String {
        let mut segments: Vec<String> = Vec::new();
        for segment in router_path.split('/') {
            let mounted = match segment.chars().next() {
                Some(marker @ (':' | '*')) => {
                    let slot = format!("{}/{marker}", segments.join("/"));
                    let name = self
                        .param_slots
                        .entry(slot)
                        .or_insert_with(|| segment[1..].to_string());
                    format!("{marker}{name}")
                }
                _ => segment.to_string(),
            };
            segments.push(mounted);
        }
        let mounted = segments.join("/");
        if mounted != router_path {
            tracing::debug!(declared = router_path, mounted = %mounted, "renamed path parameters");
        }
        mounted
    }

    /// Iterates entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.iter()
    }

    /// All entries in declaration order.
    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no route has been declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client_type;

    #[allow(dead_code)]
    struct Item {
        id: u64,
        name: String,
    }
    client_type!(Item { id: u64, name: String });

    #[test]
    fn declare_item_route() {
        let mut types = TypeRegistry::new();
        let mut table = RouteTable::new();
        let entry = table
            .declare(
                &mut types,
                "/items/<int:id>",
                &[RestMethod::Get],
                &RouteOptions::returns::<Item>(),
            )
            .unwrap();

        let pairs: Vec<_> = entry.params.iter().map(PathParam::as_pair).collect();
        assert_eq!(pairs, [("id", "int")]);
        assert_eq!(entry.client_template, "/items/${id}");
        assert_eq!(entry.response_type, "Item");
        assert_eq!(table.len(), 1);
        assert!(types.contains("Item"));
    }

    #[test]
    fn empty_methods_default_to_get() {
        let mut types = TypeRegistry::new();
        let mut table = RouteTable::new();
        let entry = table
            .declare(&mut types, "/health", &[], &RouteOptions::new())
            .unwrap();
        assert_eq!(entry.method, RestMethod::Get);
        assert_eq!(entry.methods, [RestMethod::Get]);
        assert_eq!(entry.response_type, "unknown");
    }

    #[test]
    fn first_method_drives_the_client() {
        let mut types = TypeRegistry::new();
        let mut table = RouteTable::new();
        let entry = table
            .declare(
                &mut types,
                "/items",
                &[RestMethod::Post, RestMethod::Put],
                &RouteOptions::new(),
            )
            .unwrap();
        assert_eq!(entry.method, RestMethod::Post);
        assert_eq!(entry.methods.len(), 2);
    }

    #[test]
    fn duplicates_are_appended() {
        let mut types = TypeRegistry::new();
        let mut table = RouteTable::new();
        let options = RouteOptions::returns::<Item>();
        for _ in 0..2 {
            table
                .declare(&mut types, "/items", &[RestMethod::Get], &options)
                .unwrap();
        }
        assert_eq!(table.len(), 2);
        assert_eq!(types.len(), 1);
    }

    #[test]
    fn malformed_template_records_nothing() {
        let mut types = TypeRegistry::new();
        let mut table = RouteTable::new();
        let result = table.declare(
            &mut types,
            "/items/<id>",
            &[RestMethod::Get],
            &RouteOptions::returns::<Item>(),
        );
        assert!(result.is_err());
        assert!(table.is_empty());
        assert!(types.is_empty());
    }

    #[test]
    fn params_at_the_same_position_share_a_router_path() {
        let mut types = TypeRegistry::new();
        let mut table = RouteTable::new();
        table
            .declare(&mut types, "/items/<int:id>", &[RestMethod::Get], &RouteOptions::new())
            .unwrap();
        let entry = table
            .declare(&mut types, "/items/<string:slug>", &[RestMethod::Delete], &RouteOptions::new())
            .unwrap();
        assert_eq!(entry.router_path, "/items/:id");
        assert_eq!(entry.client_template, "/items/${slug}");
        assert_eq!(entry.params[0].as_pair(), ("slug", "string"));
    }

    #[test]
    fn nested_params_follow_the_first_declaration() {
        let mut types = TypeRegistry::new();
        let mut table = RouteTable::new();
        let options = RouteOptions::new();
        table
            .declare(&mut types, "/items/<int:id>/tags/<int:tag_id>", &[], &options)
            .unwrap();
        let notes = table
            .declare(&mut types, "/items/<int:item_id>/notes/<int:note_id>", &[], &options)
            .unwrap();
        assert_eq!(notes.router_path, "/items/:id/notes/:note_id");
        let other = table
            .declare(&mut types, "/users/<int:user_id>", &[], &options)
            .unwrap();
        assert_eq!(other.router_path, "/users/:user_id");
    }

    #[test]
    fn auth_requirement_parses_lowercase() {
        assert_eq!("admin".parse::<AuthRequirement>().unwrap(), AuthRequirement::Admin);
        assert_eq!(AuthRequirement::User.to_string(), "user");
        assert!(!AuthRequirement::None.needs_principal());
        assert!(AuthRequirement::User.needs_principal());
    }

    #[test]
    fn function_name_prefers_handler_name() {
        let mut types = TypeRegistry::new();
        let mut table = RouteTable::new();
        let options = RouteOptions::new().named("get_item");
        let entry = table
            .declare(&mut types, "/items/<int:id>", &[], &options)
            .unwrap();
        assert_eq!(entry.function_name(), "getItem");
    }
}
