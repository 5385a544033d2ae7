//! The route registrar.

use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

use axum::Router;
use axum::extract::Request;
use axum::response::IntoResponse;
use axum::routing::{MethodRouter, get, on};
use http::header::CONTENT_TYPE;

use crate::codegen::ClientEmitter;
use crate::config::RestConfig;
use crate::context::{Principal, PrincipalLoader, SessionRefresher};
use crate::error::{RestError, RouteError};
use crate::guard::{Guard, GuardedHandler, RestHandler};
use crate::method::RestMethod;
use crate::registry::TypeRegistry;
use crate::response::ApiResponse;
use crate::route::{RouteOptions, RouteTable};

/// Collaborators shared by every guard, fixed when the router is built.
struct Hooks<P> {
    config: RestConfig,
    loader: Option<Arc<dyn PrincipalLoader<P>>>,
    refresher: Option<SessionRefresher>,
}

/// Builds the method router of one declared route once the hooks are known.
type Mount<P> = Box<dyn FnOnce(&Hooks<P>) -> MethodRouter + Send>;

/// Registers routes, records their client contract and builds the router.
///
/// Declaring a route appends it to the route table, registers its response
/// type (and every type that one references) and wraps the handler in the
/// auth guard. [`RestApi::into_router`] mounts everything plus the client
/// module endpoint.
///
/// ## Examples
///
/// ```rust
/// use axum::extract::Request;
/// use fyrest_lib::{ApiResponse, Principal, RequestContext, RestApi, RestConfig, RestMethod, RouteOptions};
///
/// struct User;
/// impl Principal for User {
///     fn is_admin(&self) -> bool { false }
/// }
///
/// async fn health(ctx: RequestContext<User>, _req: Request) -> ApiResponse {
///     ApiResponse::ok(serde_json::json!("up")).with_time(ctx.elapsed())
/// }
///
/// let mut api = RestApi::<User>::new(RestConfig::default());
/// api.route("/health", &[RestMethod::Get], RouteOptions::returns::<ApiResponse>(), health)
///     .unwrap();
///
/// assert!(api.client_module().contains("export async function health("));
/// let _router: axum::Router = api.into_router();
/// ```
pub struct RestApi<P: Principal> {
    config: RestConfig,
    types: TypeRegistry,
    routes: RouteTable,
    mounts: BTreeMap<String, BTreeMap<RestMethod, Mount<P>>>,
    loader: Option<Arc<dyn PrincipalLoader<P>>>,
    refresher: Option<SessionRefresher>,
}

impl<P: Principal> RestApi<P> {
    /// Creates a registrar. [`ApiResponse`] is registered up front so the
    /// client module always declares it.
    pub fn new(config: RestConfig) -> Self {
        let mut types = TypeRegistry::new();
        types.register::<ApiResponse>();
        Self {
            config,
            types,
            routes: RouteTable::new(),
            mounts: BTreeMap::new(),
            loader: None,
            refresher: None,
        }
    }

    /// Sets the principal lookup used by `user` and `admin` routes.
    pub fn with_principal_loader(mut self, loader: impl PrincipalLoader<P> + 'static) -> Self {
        self.loader = Some(Arc::new(loader));
        self
    }

    /// Sets the callback behind [`RequestContext::refresh_session`](crate::RequestContext::refresh_session).
    pub fn with_session_refresher(mut self, refresher: impl Fn() + Send + Sync + 'static) -> Self {
        self.refresher = Some(Arc::new(refresher));
        self
    }

    /// Declares a route.
    ///
    /// The client function is named after the handler: the name given with
    /// [`RouteOptions::named`], else the name of a plain `fn` handler. Closures
    /// have no usable name, so their routes are named after the path.
    ///
    /// An empty `methods` slice means GET. The first method drives the
    /// generated client function; every method is mounted. When the same
    /// router path and method are declared twice the last handler serves
    /// requests, while both declarations stay in the route table.
    ///
    /// ## Errors
    ///
    /// Returns [`RouteError`] if the template is malformed. Nothing is
    /// recorded in that case.
    pub fn route<H>(
        &mut self,
        template: &str,
        methods: &[RestMethod],
        options: RouteOptions,
        handler: H,
    ) -> Result<&mut Self, RouteError>
    where
        H: RestHandler<P>,
    {
        let unnamed = options.handler_name().is_none();
        let options = match fn_item_name::<H>() {
            Some(name) if unnamed => options.named(name),
            _ => options,
        };
        let entry = self
            .routes
            .declare(&mut self.types, template, methods, &options)?;
        tracing::info!(
            path = %entry.path_template,
            method = %entry.method,
            auth = %entry.auth,
            response = %entry.response_type,
            "declared route"
        );
        let router_path = entry.router_path.clone();
        let methods = entry.methods.clone();
        let auth = options.auth_requirement();

        let by_method = self.mounts.entry(router_path).or_default();
        for method in methods {
            let handler = handler.clone();
            let mount: Mount<P> = Box::new(move |hooks: &Hooks<P>| -> MethodRouter {
                let guard = Guard::new(
                    auth,
                    hooks.config.headers.clone(),
                    hooks.loader.clone(),
                    hooks.refresher.clone(),
                );
                let guarded = GuardedHandler::new(guard, handler);
                on(method.to_filter(), move |req: Request| {
                    let guarded = guarded.clone();
                    async move {
                        match guarded.dispatch(req).await {
                            Ok(response) => response,
                            Err(err) => RestError::from(err).into_response(),
                        }
                    }
                })
            });
            if by_method.insert(method, mount).is_some() {
                tracing::warn!(path = template, %method, "route redeclared, last handler wins");
            }
        }
        Ok(self)
    }

    /// The configuration.
    pub fn config(&self) -> &RestConfig {
        &self.config
    }

    /// Every registered client type.
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Every declared route.
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Renders the TypeScript client module.
    pub fn client_module(&self) -> String {
        ClientEmitter::new(&self.config, &self.types, &self.routes).emit()
    }

    /// Writes the TypeScript client module.
    ///
    /// ## Errors
    ///
    /// Returns any error raised by `writer`.
    pub fn write_client_module(&self, writer: &mut impl Write) -> io::Result<()> {
        writer.write_all(self.client_module().as_bytes())?;
        writer.flush()
    }

    /// Builds the router: every declared route plus `GET {client_path}`
    /// serving the client module as plain text.
    ///
    /// The client module is rendered once here; later changes are impossible
    /// since the registrar is consumed.
    pub fn into_router(self) -> Router {
        let module: Arc<str> = Arc::from(self.client_module());
        let hooks = Hooks {
            config: self.config,
            loader: self.loader,
            refresher: self.refresher,
        };

        let client_path = rooted(hooks.config.client_path.clone());
        let mut router = Router::new();
        let mut client_mounted = false;
        for (path, methods) in self.mounts {
            let path = rooted(path);
            let declares_get = methods.contains_key(&RestMethod::Get);
            let mut method_router = methods
                .into_values()
                .fold(MethodRouter::new(), |merged, mount| merged.merge(mount(&hooks)));
            if path == client_path {
                client_mounted = true;
                if !declares_get {
                    method_router = method_router.merge(serve_module(Arc::clone(&module)));
                }
            }
            router = router.route(&path, method_router);
        }
        if !client_mounted {
            router = router.route(&client_path, serve_module(module));
        }
        router
    }
}

/// The item name of a plain `fn` type, `None` for closures and wrappers.
fn fn_item_name<H>() -> Option<&'static str> {
    let name = std::any::type_name::<H>().rsplit("::").next()?;
    let mut chars = name.chars();
    let leading = chars.next()?;
    let is_ident = (leading.is_ascii_alphabetic() || leading == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    is_ident.then_some(name)
}

fn serve_module(module: Arc<str>) -> MethodRouter {
    get(move || {
        let module = Arc::clone(&module);
        async move { ([(CONTENT_TYPE, "text/plain; charset=utf-8")], module.to_string()) }
    })
}

fn rooted(path: String) -> String {
    if path.starts_with('/') {
        path
    } else {
        format!("/{path}")
    }
}

impl<P: Principal> fmt::Debug for RestApi<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestApi")
            .field("config", &self.config)
            .field("types", &self.types.len())
            .field("routes", &self.routes.len())
            .field("has_loader", &self.loader.is_some())
            .field("has_refresher", &self.refresher.is_some())
            .finish()
    }
}
