//! A small catalog API used by `fyrest rest-all` and `fyrest serve`.

use axum::RequestExt;
use axum::extract::{Path, Request};
use fyrest_lib::{
    ApiResponse, PrincipalError, Principal, RequestContext, RestApi, RestConfig, RestMethod,
    RouteError, RouteOptions, client_type,
};
use axum::http::{HeaderMap, StatusCode};
use serde::Serialize;
use serde_json::json;

/// Session token accepted as an administrator.
pub const ADMIN_TOKEN: &str = "admin-token";
/// Session token accepted as a regular user.
pub const USER_TOKEN: &str = "user-token";

#[derive(Debug, Clone)]
pub struct User {
    pub name: String,
    pub admin: bool,
}

impl Principal for User {
    fn is_admin(&self) -> bool {
        self.admin
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Tag {
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Item {
    pub id: u64,
    pub name: String,
    pub price: f64,
    pub tags: Vec<Tag>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub name: String,
    pub children: Vec<Category>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Upload {
    pub folder: String,
    pub bytes: usize,
}

client_type!(Tag { label: String });
client_type!(Item {
    id: u64,
    name: String,
    price: f64,
    tags: Vec<Tag>,
    description: Option<String>,
});
client_type!(Category { name: String, children: Vec<Category> });
client_type!(Upload { folder: String, bytes: usize });

/// Resolves the token in `session_header` to a user.
fn load_user(session_header: &str, headers: &HeaderMap) -> Result<Option<User>, PrincipalError> {
    let token = headers
        .get(session_header)
        .map(|value| value.to_str())
        .transpose()
        .map_err(|_| PrincipalError::Invalid("session token is not valid UTF-8".to_string()))?;
    Ok(match token {
        Some(ADMIN_TOKEN) => Some(User {
            name: "admin".to_string(),
            admin: true,
        }),
        Some(USER_TOKEN) => Some(User {
            name: "user".to_string(),
            admin: false,
        }),
        _ => None,
    })
}

fn sample_item(id: u64) -> Item {
    Item {
        id,
        name: format!("item-{id}"),
        price: 9.5,
        tags: vec![Tag {
            label: "sample".to_string(),
        }],
        description: None,
    }
}

fn payload(value: impl Serialize) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or(serde_json::Value::Null)
}

async fn health(ctx: RequestContext<User>, _req: Request) -> ApiResponse {
    ApiResponse::ok(json!("ok")).with_time(ctx.elapsed())
}

async fn list_items(_ctx: RequestContext<User>, _req: Request) -> ApiResponse {
    ApiResponse::ok(payload((1..=3).map(sample_item).collect::<Vec<_>>()))
}

async fn get_item(_ctx: RequestContext<User>, mut req: Request) -> axum::response::Response {
    use axum::response::IntoResponse;

    match req.extract_parts::<Path<u64>>().await {
        Ok(Path(id)) => ApiResponse::ok(payload(sample_item(id))).into_response(),
        Err(rejection) => ApiResponse::failure(rejection.body_text()).with_status(StatusCode::BAD_REQUEST),
    }
}

async fn create_item(ctx: RequestContext<User>, _req: Request) -> ApiResponse {
    let owner = ctx.principal().map(|user| user.name.clone()).unwrap_or_default();
    ApiResponse::ok(payload(sample_item(4))).with_message(format!("created by {owner}"))
}

async fn categories(_ctx: RequestContext<User>, _req: Request) -> ApiResponse {
    let tree = Category {
        name: "root".to_string(),
        children: vec![Category {
            name: "books".to_string(),
            children: Vec::new(),
        }],
    };
    ApiResponse::ok(payload(tree))
}

async fn upload(_ctx: RequestContext<User>, req: Request) -> ApiResponse {
    let folder = req.uri().path().rsplit('/').next().unwrap_or_default().to_string();
    let bytes = axum::body::to_bytes(req.into_body(), usize::MAX)
        .await
        .map(|body| body.len())
        .unwrap_or_default();
    ApiResponse::ok(payload(Upload { folder, bytes }))
}

async fn purge(ctx: RequestContext<User>, _req: Request) -> ApiResponse {
    ctx.refresh_session();
    ApiResponse::ok(json!(true)).with_message("cache purged")
}

/// Builds the demo API.
pub fn build(config: RestConfig) -> Result<RestApi<User>, RouteError> {
    let session_header = config.headers.session.clone();
    let mut api = RestApi::new(config)
        .with_principal_loader(move |headers: &HeaderMap| load_user(&session_header, headers))
        .with_session_refresher(|| tracing::debug!("session refreshed"));

    api.route("/health", &[RestMethod::Get], RouteOptions::returns::<ApiResponse>(), health)?
        .route(
            "/items",
            &[RestMethod::Get],
            RouteOptions::returns::<Vec<Item>>().named("list_items"),
            list_items,
        )?
        .route(
            "/items/<int:id>",
            &[RestMethod::Get],
            RouteOptions::returns::<Item>().named("get_item"),
            get_item,
        )?
        .route(
            "/items",
            &[RestMethod::Post],
            RouteOptions::returns::<Item>().user().named("create_item"),
            create_item,
        )?
        .route("/categories", &[], RouteOptions::returns::<Category>(), categories)?
        .route(
            "/uploads/<string:folder>",
            &[RestMethod::Post],
            RouteOptions::returns::<Upload>().user().accepts_files(),
            upload,
        )?
        .route(
            "/admin/purge",
            &[RestMethod::Delete],
            RouteOptions::returns::<bool>().admin(),
            purge,
        )?;
    Ok(api)
}

#[cfg(test)]
mod tests {
    use tower::ServiceExt;

    use super::*;

    #[test]
    fn demo_declares_every_route() {
        let api = build(RestConfig::default()).unwrap();
        assert_eq!(api.routes().len(), 7);
        for name in ["ApiResponse", "Tag", "Item", "Category", "Upload"] {
            assert!(api.types().contains(name), "{name} registered");
        }
    }

    #[test]
    fn tokens_resolve_to_users() {
        let mut headers = HeaderMap::new();
        headers.insert("x-fy-session", ADMIN_TOKEN.parse().unwrap());
        assert!(load_user("x-fy-session", &headers).unwrap().unwrap().is_admin());

        headers.insert("x-fy-session", USER_TOKEN.parse().unwrap());
        assert!(!load_user("x-fy-session", &headers).unwrap().unwrap().is_admin());

        headers.insert("x-fy-session", "stranger".parse().unwrap());
        assert!(load_user("x-fy-session", &headers).unwrap().is_none());
    }

    #[tokio::test]
    async fn configured_session_header_reaches_the_loader() {
        let mut config = RestConfig::default();
        config.headers.session = "x-session".to_string();
        let router = build(config).unwrap().into_router();

        let request = |header: &str| {
            Request::builder()
                .method("DELETE")
                .uri("/admin/purge")
                .header(header, ADMIN_TOKEN)
                .body(axum::body::Body::empty())
                .unwrap()
        };

        let response = router.clone().oneshot(request("x-session")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router.oneshot(request("x-fy-session")).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
