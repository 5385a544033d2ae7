//! TypeScript client generation.
//!
//! ## Submodules
//!
//! - [`declaration`] - `export type` declarations for registered types
//! - [`functions`] - One `fetch` wrapper per declared route
//! - [`naming`] - Client function names
//!
//! ## Output Format
//!
//! [`ClientEmitter::emit`] assembles, separated by blank lines:
//!
//! 1. The UUID import line followed by the configured preamble
//! 2. Every registered type declaration, dependencies first
//! 3. One function per route, in declaration order

pub mod declaration;
pub mod functions;
pub mod naming;

pub use declaration::render_type_declaration;
pub use functions::{
    render_get_function, render_json_function, render_multipart_function, render_route_function,
};
pub use naming::function_name;

use crate::config::RestConfig;
use crate::registry::TypeRegistry;
use crate::route::RouteTable;

/// Renders the client module of a set of routes.
///
/// Emission only reads its inputs, so emitting twice gives the same text.
///
/// ## Examples
///
/// ```rust
/// use fyrest_lib::{ClientEmitter, RestConfig, RestMethod, RouteOptions, TypeRegistry};
/// use fyrest_lib::route::RouteTable;
///
/// let config = RestConfig::default();
/// let mut types = TypeRegistry::new();
/// let mut routes = RouteTable::new();
/// routes
///     .declare(&mut types, "/health", &[RestMethod::Get], &RouteOptions::returns::<bool>())
///     .unwrap();
///
/// let module = ClientEmitter::new(&config, &types, &routes).emit();
/// assert!(module.starts_with("import { v4 as uuidv4 } from \"uuid\";"));
/// assert!(module.contains("export async function health(params: { [key: string]: any }): Promise<boolean>"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ClientEmitter<'a> {
    config: &'a RestConfig,
    types: &'a TypeRegistry,
    routes: &'a RouteTable,
}

impl<'a> ClientEmitter<'a> {
    /// Creates an emitter over a registry and a route table.
    pub fn new(config: &'a RestConfig, types: &'a TypeRegistry, routes: &'a RouteTable) -> Self {
        Self {
            config,
            types,
            routes,
        }
    }

    /// Renders the complete client module.
    pub fn emit(&self) -> String {
        let mut sections = vec![self.header()];
        if !self.types.is_empty() {
            sections.push(self.types.render_all());
        }
        sections.extend(
            self.routes
                .iter()
                .map(|entry| render_route_function(entry, self.config)),
        );

        let mut module = sections.join("\n\n");
        module.push('\n');
        module
    }

    fn header(&self) -> String {
        let preamble = self.config.preamble.trim_end();
        if preamble.is_empty() {
            self.config.uuid_import.clone()
        } else {
            format!("{}\n{preamble}", self.config.uuid_import)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client_type;
    use crate::method::RestMethod;
    use crate::route::RouteOptions;

    #[allow(dead_code)]
    struct Tag {
        label: String,
    }
    client_type!(Tag { label: String });

    fn fixture() -> (RestConfig, TypeRegistry, RouteTable) {
        let config = RestConfig::default().with_preamble("declare const session: string | null;");
        let mut types = TypeRegistry::new();
        let mut routes = RouteTable::new();
        routes
            .declare(
                &mut types,
                "/tags",
                &[RestMethod::Get],
                &RouteOptions::returns::<Vec<Tag>>().named("list_tags"),
            )
            .unwrap();
        routes
            .declare(&mut types, "/tags", &[RestMethod::Post], &RouteOptions::returns::<Tag>().user())
            .unwrap();
        (config, types, routes)
    }

    #[test]
    fn sections_are_ordered() {
        let (config, types, routes) = fixture();
        let module = ClientEmitter::new(&config, &types, &routes).emit();

        let import = module.find("import { v4 as uuidv4 }").unwrap();
        let preamble = module.find("declare const session").unwrap();
        let declaration = module.find("export type Tag").unwrap();
        let list = module.find("export async function listTags").unwrap();
        let create = module.find("export async function tags(").unwrap();
        assert!(import < preamble);
        assert!(preamble < declaration);
        assert!(declaration < list);
        assert!(list < create);
        assert!(module.ends_with("}\n"));
    }

    #[test]
    fn header_without_preamble_is_import_only() {
        let config = RestConfig::default();
        let types = TypeRegistry::new();
        let routes = RouteTable::new();
        assert_eq!(
            ClientEmitter::new(&config, &types, &routes).emit(),
            "import { v4 as uuidv4 } from \"uuid\";\n"
        );
    }

    #[test]
    fn emitting_twice_is_identical() {
        let (config, types, routes) = fixture();
        let emitter = ClientEmitter::new(&config, &types, &routes);
        assert_eq!(emitter.emit(), emitter.emit());
    }
}
