//! Configuration for route registration and client generation.
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration:
//!
//! ```toml
//! base_url = "https://api.example.com"
//! preamble = "declare const session: string | null;"
//! client_path = "/ts"
//! session_variable = "session"
//!
//! [headers]
//! session = "x-fy-session"
//! request_id = "x-request-id"
//! ```

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable overriding [`RestConfig::base_url`].
pub const BASE_URL_ENV: &str = "FYREST_BASE_URL";

/// Environment variable overriding [`RestConfig::client_path`].
pub const CLIENT_PATH_ENV: &str = "FYREST_CLIENT_PATH";

/// Header names read by the request context and sent by generated clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderNames {
    /// Header carrying the session token.
    pub session: String,
    /// Header carrying the per-request id.
    pub request_id: String,
}

impl Default for HeaderNames {
    fn default() -> Self {
        Self {
            session: "x-fy-session".to_string(),
            request_id: "x-request-id".to_string(),
        }
    }
}

/// Configuration of a [`RestApi`](crate::RestApi).
///
/// ## Examples
///
/// ```rust
/// use fyrest_lib::RestConfig;
///
/// let config = RestConfig::from_toml_str(r#"base_url = "https://api.example.com""#).unwrap();
/// assert_eq!(config.base_url, "https://api.example.com");
/// assert_eq!(config.client_path, "/ts");
/// assert_eq!(config.headers.session, "x-fy-session");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestConfig {
    /// Prefix of every URL in the generated client.
    pub base_url: String,
    /// Text emitted after the import line of the generated client.
    pub preamble: String,
    /// Path serving the generated client as plain text.
    pub client_path: String,
    /// Name of the ambient variable holding the session token in the client.
    pub session_variable: String,
    /// Import line for the UUID helper used by generated functions.
    pub uuid_import: String,
    /// Header names.
    pub headers: HeaderNames,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            preamble: String::new(),
            client_path: "/ts".to_string(),
            session_variable: "session".to_string(),
            uuid_import: r#"import { v4 as uuidv4 } from "uuid";"#.to_string(),
            headers: HeaderNames::default(),
        }
    }
}

impl RestConfig {
    /// Parses a configuration from TOML.
    ///
    /// ## Errors
    ///
    /// Returns [`ConfigError::Parse`] if the document is not valid TOML or a
    /// field has the wrong type.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Loads a configuration file.
    ///
    /// ## Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not a valid configuration.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded fyrest config");
        Self::from_toml_str(&content)
    }

    /// Applies `FYREST_BASE_URL` and `FYREST_CLIENT_PATH` when set.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| env::var(key).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(base_url) = lookup(BASE_URL_ENV) {
            self.base_url = base_url;
        }
        if let Some(client_path) = lookup(CLIENT_PATH_ENV) {
            self.client_path = client_path;
        }
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the client preamble.
    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = preamble.into();
        self
    }

    /// Sets the path serving the generated client.
    pub fn with_client_path(mut self, client_path: impl Into<String>) -> Self {
        self.client_path = client_path.into();
        self
    }
}
