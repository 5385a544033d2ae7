//! HTTP methods accepted by route declarations.

use axum::routing::MethodFilter;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// HTTP methods for declared routes.
///
/// The first method of a declaration decides the shape of the generated
/// client function; every method is mounted on the router.
///
/// ## Examples
///
/// ```rust
/// use fyrest_lib::RestMethod;
///
/// let parsed: RestMethod = "POST".parse().unwrap();
/// assert_eq!(parsed, RestMethod::Post);
/// assert_eq!(RestMethod::Get.to_string(), "GET");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum RestMethod {
    /// HTTP GET - Retrieve a resource.
    Get,
    /// HTTP POST - Create a resource or trigger an action.
    Post,
    /// HTTP PUT - Replace a resource entirely.
    Put,
    /// HTTP PATCH - Partially update a resource.
    Patch,
    /// HTTP DELETE - Remove a resource.
    Delete,
    /// HTTP HEAD - Retrieve headers only.
    Head,
    /// HTTP OPTIONS - Query supported methods.
    Options,
    /// HTTP TRACE - Echo the request for debugging.
    Trace,
}

impl RestMethod {
    /// Returns `true` for GET, the only method whose generated client
    /// function sends its parameters as a query string.
    pub fn is_get(&self) -> bool {
        matches!(self, Self::Get)
    }

    /// Converts to the axum method filter used when mounting the route.
    pub fn to_filter(self) -> MethodFilter {
        match self {
            Self::Get => MethodFilter::GET,
            Self::Post => MethodFilter::POST,
            Self::Put => MethodFilter::PUT,
            Self::Patch => MethodFilter::PATCH,
            Self::Delete => MethodFilter::DELETE,
            Self::Head => MethodFilter::HEAD,
            Self::Options => MethodFilter::OPTIONS,
            Self::Trace => MethodFilter::TRACE,
        }
    }
}

impl From<RestMethod> for MethodFilter {
    fn from(method: RestMethod) -> Self {
        method.to_filter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_display() {
        assert_eq!(RestMethod::Get.to_string(), "GET");
        assert_eq!(RestMethod::Post.to_string(), "POST");
        assert_eq!(RestMethod::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_parse() {
        assert_eq!("GET".parse::<RestMethod>().unwrap(), RestMethod::Get);
        assert_eq!("PATCH".parse::<RestMethod>().unwrap(), RestMethod::Patch);
        assert!("get".parse::<RestMethod>().is_err());
    }

    #[test]
    fn test_is_get() {
        assert!(RestMethod::Get.is_get());
        assert!(!RestMethod::Post.is_get());
        assert!(!RestMethod::Head.is_get());
    }

    #[test]
    fn test_serde_uppercase() {
        let json = serde_json::to_string(&RestMethod::Put).unwrap();
        assert_eq!(json, "\"PUT\"");
        let back: RestMethod = serde_json::from_str(&json).unwrap();
        assert_eq!(back, RestMethod::Put);
    }

    #[test]
    fn test_every_method_has_a_filter() {
        for method in RestMethod::iter() {
            let _ = MethodFilter::from(method);
        }
        assert_eq!(RestMethod::iter().count(), 8);
    }
}
