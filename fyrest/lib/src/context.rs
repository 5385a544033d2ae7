//! Per-request authorization and session context.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use http::HeaderMap;

use crate::config::HeaderNames;
use crate::error::PrincipalError;
use crate::route::AuthRequirement;

/// The authenticated actor behind a request.
pub trait Principal: Send + Sync + 'static {
    /// Returns `true` if the principal may reach admin-only routes.
    fn is_admin(&self) -> bool;
}

/// Looks up the principal of the current request.
///
/// Implemented for any `Fn(&HeaderMap) -> Result<Option<P>, PrincipalError>`.
/// The call is synchronous and may block the request task for its full
/// duration; timeouts are the loader's business.
pub trait PrincipalLoader<P>: Send + Sync {
    /// Returns the principal, `None` if the request is anonymous.
    fn load(&self, headers: &HeaderMap) -> Result<Option<P>, PrincipalError>;
}

impl<P, F> PrincipalLoader<P> for F
where
    F: Fn(&HeaderMap) -> Result<Option<P>, PrincipalError> + Send + Sync,
{
    fn load(&self, headers: &HeaderMap) -> Result<Option<P>, PrincipalError> {
        self(headers)
    }
}

/// Callback refreshing the current session, invoked on demand by handlers.
pub type SessionRefresher = Arc<dyn Fn() + Send + Sync>;

/// Context handed to every handler as its first argument.
///
/// Built fresh for each request and dropped with it.
pub struct RequestContext<P> {
    started: Instant,
    session_token: Option<String>,
    request_id: Option<String>,
    principal: Option<P>,
    has_principal: bool,
    is_admin: bool,
    refresher: Option<SessionRefresher>,
}

impl<P: Principal> RequestContext<P> {
    /// Builds the context of a request.
    ///
    /// The principal is only looked up when `auth` requires one, so public
    /// routes never pay for the lookup.
    ///
    /// ## Errors
    ///
    /// Loader failures are returned unchanged; there is no retry.
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use fyrest_lib::{AuthRequirement, HeaderNames, Principal, PrincipalError, RequestContext};
    /// use http::HeaderMap;
    ///
    /// struct Admin;
    /// impl Principal for Admin {
    ///     fn is_admin(&self) -> bool { true }
    /// }
    ///
    /// let loader = |_: &HeaderMap| -> Result<Option<Admin>, PrincipalError> { Ok(Some(Admin)) };
    /// let mut headers = HeaderMap::new();
    /// headers.insert("x-fy-session", "abc".parse().unwrap());
    ///
    /// let ctx = RequestContext::build(&headers, &HeaderNames::default(), AuthRequirement::Admin, Some(&loader)).unwrap();
    /// assert_eq!(ctx.session_token(), Some("abc"));
    /// assert!(ctx.is_admin());
    /// ```
    pub fn build(
        headers: &HeaderMap,
        names: &HeaderNames,
        auth: AuthRequirement,
        loader: Option<&dyn PrincipalLoader<P>>,
    ) -> Result<Self, PrincipalError> {
        let started = Instant::now();
        let session_token = header_value(headers, &names.session);
        let request_id = header_value(headers, &names.request_id);

        let principal = match loader {
            Some(loader) if auth.needs_principal() => loader.load(headers)?,
            _ => None,
        };
        let has_principal = principal.is_some();
        let is_admin = principal.as_ref().is_some_and(|principal| principal.is_admin());

        Ok(Self {
            started,
            session_token,
            request_id,
            principal,
            has_principal,
            is_admin,
            refresher: None,
        })
    }
}

impl<P> RequestContext<P> {
    /// Attaches the session refresher.
    pub fn with_refresher(mut self, refresher: Option<SessionRefresher>) -> Self {
        self.refresher = refresher;
        self
    }

    /// Seconds elapsed since the context was built.
    pub fn elapsed(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    /// Instant the context was built.
    pub fn started(&self) -> Instant {
        self.started
    }

    /// Session token sent by the client.
    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    /// Request id sent by the client.
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// The resolved principal.
    pub fn principal(&self) -> Option<&P> {
        self.principal.as_ref()
    }

    /// Takes ownership of the resolved principal.
    pub fn into_principal(self) -> Option<P> {
        self.principal
    }

    /// Whether a principal was resolved.
    pub fn has_principal(&self) -> bool {
        self.has_principal
    }

    /// Whether the resolved principal is an admin.
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Invokes the session refresher, if one is configured.
    pub fn refresh_session(&self) {
        if let Some(refresher) = &self.refresher {
            refresher();
        }
    }
}

impl<P> fmt::Debug for RequestContext<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("session_token", &self.session_token)
            .field("request_id", &self.request_id)
            .field("has_principal", &self.has_principal)
            .field("is_admin", &self.is_admin)
            .finish_non_exhaustive()
    }
}

/// Missing, empty and non-UTF-8 headers all read as absent.
fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}
