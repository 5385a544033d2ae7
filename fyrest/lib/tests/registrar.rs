use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::extract::{Path, Request};
use axum::response::Response;
use axum::RequestExt;
use fyrest_lib::{
    ApiResponse, Principal, PrincipalError, RequestContext, RestApi, RestConfig, RestMethod,
    RouteOptions,
};
use http::{HeaderMap, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

#[derive(Debug, Clone)]
struct Account {
    name: String,
    admin: bool,
}

impl Principal for Account {
    fn is_admin(&self) -> bool {
        self.admin
    }
}

fn load_account(headers: &HeaderMap) -> Result<Option<Account>, PrincipalError> {
    let account = match headers.get("x-fy-session").and_then(|v| v.to_str().ok()) {
        Some("root") => Some(Account {
            name: "root".to_string(),
            admin: true,
        }),
        Some("alice") => Some(Account {
            name: "alice".to_string(),
            admin: false,
        }),
        Some("down") => return Err(PrincipalError::unavailable("session store down")),
        _ => None,
    };
    Ok(account)
}

async fn whoami(ctx: RequestContext<Account>, _req: Request) -> ApiResponse {
    let name = ctx.principal().map(|account| account.name.clone());
    ApiResponse::ok(json!(name)).with_time(ctx.elapsed())
}

fn api_with_probe(probe: Arc<AtomicUsize>) -> RestApi<Account> {
    let mut api = RestApi::new(RestConfig::default()).with_principal_loader(load_account);
    let counted = move |ctx: RequestContext<Account>, req: Request| {
        let probe = Arc::clone(&probe);
        async move {
            probe.fetch_add(1, Ordering::SeqCst);
            whoami(ctx, req).await
        }
    };
    api.route("/public", &[RestMethod::Get], RouteOptions::returns::<ApiResponse>(), counted.clone())
        .unwrap()
        .route("/me", &[RestMethod::Get], RouteOptions::returns::<ApiResponse>().user(), counted.clone())
        .unwrap()
        .route("/admin", &[RestMethod::Post], RouteOptions::returns::<ApiResponse>().admin(), counted)
        .unwrap();
    api
}

async fn send(router: Router, method: &str, uri: &str, session: Option<&str>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(session) = session {
        builder = builder.header("x-fy-session", session);
    }
    router.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn user_route_without_session_is_unauthorized() {
    let probe = Arc::new(AtomicUsize::new(0));
    let router = api_with_probe(Arc::clone(&probe)).into_router();

    let response = send(router, "GET", "/me", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        json_body(response).await,
        json!({"success": false, "message": "Unauthorized"})
    );
    assert_eq!(probe.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn user_route_with_session_runs_handler() {
    let probe = Arc::new(AtomicUsize::new(0));
    let router = api_with_probe(Arc::clone(&probe)).into_router();

    let response = send(router, "GET", "/me", Some("alice")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], "alice");
    assert!(body["time"].is_number());
    assert_eq!(probe.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn admin_route_forbids_regular_accounts() {
    let probe = Arc::new(AtomicUsize::new(0));
    let router = api_with_probe(Arc::clone(&probe)).into_router();

    let response = send(router.clone(), "POST", "/admin", Some("alice")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        json_body(response).await,
        json!({"success": false, "message": "Forbidden"})
    );

    let response = send(router.clone(), "POST", "/admin", None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(probe.load(Ordering::SeqCst), 0);

    let response = send(router, "POST", "/admin", Some("root")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["data"], "root");
    assert_eq!(probe.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn public_route_never_loads_the_principal() {
    let probe = Arc::new(AtomicUsize::new(0));
    let router = api_with_probe(Arc::clone(&probe)).into_router();

    let response = send(router, "GET", "/public", Some("down")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["data"], Value::Null);
    assert_eq!(probe.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn loader_failure_is_an_internal_error() {
    let probe = Arc::new(AtomicUsize::new(0));
    let router = api_with_probe(Arc::clone(&probe)).into_router();

    let response = send(router, "GET", "/me", Some("down")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["success"], false);
    assert_eq!(probe.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn undeclared_method_is_rejected() {
    let router = api_with_probe(Arc::new(AtomicUsize::new(0))).into_router();
    let response = send(router, "GET", "/admin", Some("root")).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn client_module_is_served_as_text() {
    let api = api_with_probe(Arc::new(AtomicUsize::new(0)));
    let expected = api.client_module();
    let router = api.into_router();

    let response = send(router, "GET", "/ts", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[http::header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/plain"));
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(std::str::from_utf8(&bytes).unwrap(), expected);
}

#[tokio::test]
async fn client_path_is_configurable() {
    let api = RestApi::<Account>::new(RestConfig::default().with_client_path("/client.ts"));
    let router = api.into_router();
    let response = send(router.clone(), "GET", "/client.ts", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = send(router, "GET", "/ts", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn path_parameters_reach_the_handler() {
    async fn item(_ctx: RequestContext<Account>, mut req: Request) -> ApiResponse {
        match req.extract_parts::<Path<u64>>().await {
            Ok(Path(id)) => ApiResponse::ok(json!(id)),
            Err(_) => ApiResponse::failure("bad id"),
        }
    }

    let mut api = RestApi::<Account>::new(RestConfig::default());
    api.route("/items/<int:id>", &[], RouteOptions::returns::<ApiResponse>(), item)
        .unwrap();
    let response = send(api.into_router(), "GET", "/items/42", None).await;
    assert_eq!(json_body(response).await["data"], 42);
}

#[tokio::test]
async fn redeclared_route_serves_the_last_handler() {
    async fn first(_ctx: RequestContext<Account>, _req: Request) -> &'static str {
        "first"
    }
    async fn second(_ctx: RequestContext<Account>, _req: Request) -> &'static str {
        "second"
    }

    let mut api = RestApi::<Account>::new(RestConfig::default());
    api.route("/dup", &[RestMethod::Get], RouteOptions::new(), first)
        .unwrap()
        .route("/dup", &[RestMethod::Get], RouteOptions::new(), second)
        .unwrap();
    assert_eq!(api.routes().len(), 2);

    let response = send(api.into_router(), "GET", "/dup", None).await;
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"second");
}

#[tokio::test]
async fn session_refresher_is_reachable_from_handlers() {
    let refreshed = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&refreshed);
    let mut api = RestApi::<Account>::new(RestConfig::default())
        .with_principal_loader(load_account)
        .with_session_refresher(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
    async fn refresh(ctx: RequestContext<Account>, _req: Request) -> StatusCode {
        ctx.refresh_session();
        StatusCode::NO_CONTENT
    }
    api.route("/refresh", &[RestMethod::Post], RouteOptions::new().user(), refresh)
        .unwrap();

    let response = send(api.into_router(), "POST", "/refresh", Some("alice")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(refreshed.load(Ordering::SeqCst), 1);
}

#[test]
fn malformed_template_is_rejected_at_declaration() {
    async fn noop(_ctx: RequestContext<Account>, _req: Request) -> StatusCode {
        StatusCode::OK
    }
    let mut api = RestApi::<Account>::new(RestConfig::default());
    let err = api
        .route("/items/<id>", &[RestMethod::Get], RouteOptions::new(), noop)
        .unwrap_err();
    assert_eq!(err.template(), "/items/<id>");
    assert!(api.routes().is_empty());
}

#[tokio::test]
async fn differently_named_params_share_a_position() {
    async fn by_id(_ctx: RequestContext<Account>, mut req: Request) -> String {
        match req.extract_parts::<Path<u64>>().await {
            Ok(Path(id)) => format!("id {id}"),
            Err(_) => "bad id".to_string(),
        }
    }
    async fn by_slug(_ctx: RequestContext<Account>, mut req: Request) -> String {
        match req.extract_parts::<Path<String>>().await {
            Ok(Path(slug)) => format!("slug {slug}"),
            Err(_) => "bad slug".to_string(),
        }
    }

    let mut api = RestApi::<Account>::new(RestConfig::default());
    api.route("/items/<int:id>", &[RestMethod::Get], RouteOptions::new(), by_id)
        .unwrap()
        .route("/items/<string:slug>", &[RestMethod::Delete], RouteOptions::new(), by_slug)
        .unwrap();
    let module = api.client_module();
    assert!(module.contains("`http://localhost:5000/items/${slug}`"));
    let router = api.into_router();

    let response = send(router.clone(), "GET", "/items/7", None).await;
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"id 7");

    let response = send(router, "DELETE", "/items/blue", None).await;
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"slug blue");
}
