//! Handler wrapping: request context construction and the auth gate.

use std::future::Future;
use std::sync::Arc;

use axum::extract::Request;
use axum::response::{IntoResponse, Response};
use futures::future::BoxFuture;
use http::StatusCode;

use crate::config::HeaderNames;
use crate::context::{Principal, PrincipalLoader, RequestContext, SessionRefresher};
use crate::error::PrincipalError;
use crate::response::ApiResponse;
use crate::route::AuthRequirement;

/// A route handler receiving the request context first.
///
/// Implemented for every `Fn(RequestContext<P>, Request) -> impl Future`
/// whose output implements [`IntoResponse`], so plain `async fn`s work:
///
/// ```rust
/// use axum::extract::Request;
/// use fyrest_lib::{Principal, RequestContext};
///
/// struct User;
/// impl Principal for User {
///     fn is_admin(&self) -> bool { false }
/// }
///
/// async fn whoami(ctx: RequestContext<User>, _req: Request) -> String {
///     format!("principal: {}", ctx.has_principal())
/// }
/// # fn assert_handler<H: fyrest_lib::RestHandler<User>>(_: H) {}
/// # assert_handler(whoami);
/// ```
pub trait RestHandler<P>: Clone + Send + Sync + 'static {
    /// Handles the request.
    fn call(&self, ctx: RequestContext<P>, req: Request) -> BoxFuture<'static, Response>;
}

impl<P, F, Fut, R> RestHandler<P> for F
where
    P: Send + 'static,
    F: Fn(RequestContext<P>, Request) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    fn call(&self, ctx: RequestContext<P>, req: Request) -> BoxFuture<'static, Response> {
        let fut = self(ctx, req);
        Box::pin(async move { fut.await.into_response() })
    }
}

/// Outcome of the auth gate when the handler must not run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// The route needs a principal and none was resolved.
    Unauthorized,
    /// The route needs an admin principal.
    Forbidden,
}

impl AuthRejection {
    /// HTTP status of the rejection.
    pub fn status(self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
        }
    }

    /// Message placed in the failure body.
    pub fn message(self) -> &'static str {
        match self {
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        ApiResponse::failure(self.message()).with_status(self.status())
    }
}

/// Everything the gate needs besides the handler itself.
pub struct Guard<P> {
    auth: AuthRequirement,
    headers: HeaderNames,
    loader: Option<Arc<dyn PrincipalLoader<P>>>,
    refresher: Option<SessionRefresher>,
}

impl<P: Principal> Guard<P> {
    /// Creates a guard for routes with the given requirement.
    pub fn new(
        auth: AuthRequirement,
        headers: HeaderNames,
        loader: Option<Arc<dyn PrincipalLoader<P>>>,
        refresher: Option<SessionRefresher>,
    ) -> Self {
        Self {
            auth,
            headers,
            loader,
            refresher,
        }
    }

    /// The requirement enforced by this guard.
    pub fn auth(&self) -> AuthRequirement {
        self.auth
    }

    /// Builds the request context.
    pub fn context(&self, req: &Request) -> Result<RequestContext<P>, PrincipalError> {
        let ctx = RequestContext::build(
            req.headers(),
            &self.headers,
            self.auth,
            self.loader.as_deref(),
        )?;
        Ok(ctx.with_refresher(self.refresher.clone()))
    }

    /// Applies the auth gate to a built context.
    pub fn check(&self, ctx: &RequestContext<P>) -> Result<(), AuthRejection> {
        match self.auth {
            AuthRequirement::User if !ctx.has_principal() => Err(AuthRejection::Unauthorized),
            AuthRequirement::Admin if !ctx.is_admin() => Err(AuthRejection::Forbidden),
            _ => Ok(()),
        }
    }
}

/// A handler wrapped with its guard.
pub struct GuardedHandler<P, H> {
    guard: Arc<Guard<P>>,
    handler: H,
}

impl<P, H: Clone> Clone for GuardedHandler<P, H> {
    fn clone(&self) -> Self {
        Self {
            guard: Arc::clone(&self.guard),
            handler: self.handler.clone(),
        }
    }
}

impl<P, H> GuardedHandler<P, H>
where
    P: Principal,
    H: RestHandler<P>,
{
    /// Wraps `handler` with `guard`.
    pub fn new(guard: Guard<P>, handler: H) -> Self {
        Self {
            guard: Arc::new(guard),
            handler,
        }
    }

    /// Builds the context, applies the gate and runs the handler.
    ///
    /// Rejections become 401/403 responses and the handler is not invoked.
    /// Principal lookup failures are returned to the caller.
    #[tracing::instrument(
        name = "fyrest.dispatch",
        skip_all,
        fields(method = %req.method(), path = %req.uri().path(), auth = %self.guard.auth())
    )]
    pub async fn dispatch(&self, req: Request) -> Result<Response, PrincipalError> {
        let ctx = self.guard.context(&req)?;
        if let Err(rejection) = self.guard.check(&ctx) {
            tracing::warn!(
                request_id = ctx.request_id().unwrap_or("-"),
                status = rejection.status().as_u16(),
                "request rejected"
            );
            return Ok(rejection.into_response());
        }
        let request_id = ctx.request_id().map(str::to_owned);
        let started = ctx.started();
        let response = self.handler.call(ctx, req).await;
        tracing::debug!(
            request_id = request_id.as_deref().unwrap_or("-"),
            status = response.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request handled"
        );
        Ok(response)
    }
}
