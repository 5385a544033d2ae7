//! Route registration for axum that derives a typed TypeScript client.
//!
//! Declaring an endpoint through [`RestApi::route`] does three things: it
//! mounts the handler behind an auth guard, records the route in a
//! [`RouteTable`](route::RouteTable), and registers the response type (and
//! every type it references) in a [`TypeRegistry`]. The registrar can then
//! render a TypeScript module with one `export type` per registered type and
//! one `fetch` wrapper per route, so the client always mirrors the server.
//!
//! ## Modules
//!
//! - [`types`] - Type descriptors and the [`ClientType`] reflection trait
//! - [`registry`] - Deduplicated store of type declarations
//! - [`route`] - Route templates, options and the route table
//! - [`context`] - Per-request session and principal context
//! - [`guard`] - The 401/403 gate wrapped around every handler
//! - [`codegen`] - TypeScript client rendering
//! - [`config`] - TOML configuration with environment overrides
//! - [`error`] - Error types
//!
//! ## Example
//!
//! ```rust
//! use axum::extract::Request;
//! use fyrest_lib::{client_type, PrincipalError, Principal, RequestContext, RestApi, RestConfig, RestMethod, RouteOptions};
//! use http::HeaderMap;
//!
//! struct User {
//!     admin: bool,
//! }
//!
//! impl Principal for User {
//!     fn is_admin(&self) -> bool {
//!         self.admin
//!     }
//! }
//!
//! #[derive(serde::Serialize)]
//! struct Profile {
//!     name: String,
//! }
//!
//! client_type!(Profile { name: String });
//!
//! fn load_user(headers: &HeaderMap) -> Result<Option<User>, PrincipalError> {
//!     Ok(headers.get("x-fy-session").map(|_| User { admin: false }))
//! }
//!
//! async fn profile(_ctx: RequestContext<User>, _req: Request) -> axum::Json<Profile> {
//!     axum::Json(Profile { name: "ada".to_string() })
//! }
//!
//! let mut api = RestApi::new(RestConfig::default()).with_principal_loader(load_user);
//! api.route("/profile", &[RestMethod::Get], RouteOptions::returns::<Profile>().user(), profile)
//!     .unwrap();
//!
//! let module = api.client_module();
//! assert!(module.contains("export type Profile = {\n  name: string;\n};"));
//! assert!(module.contains("Promise<Profile>"));
//!
//! let _router = api.into_router();
//! ```

pub mod api;
pub mod codegen;
pub mod config;
pub mod context;
pub mod error;
pub mod guard;
pub mod method;
pub mod registry;
pub mod response;
pub mod route;
pub mod types;

pub use api::RestApi;
pub use codegen::ClientEmitter;
pub use config::{HeaderNames, RestConfig};
pub use context::{Principal, PrincipalLoader, RequestContext, SessionRefresher};
pub use error::{ConfigError, PrincipalError, RestError, RouteError};
pub use guard::{AuthRejection, GuardedHandler, RestHandler};
pub use method::RestMethod;
pub use registry::{RegisteredType, TypeRegistry};
pub use response::ApiResponse;
pub use route::{AuthRequirement, RouteEntry, RouteOptions};
pub use types::{ClientType, CompositeType, Field, TypeDescriptor};
