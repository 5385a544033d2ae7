//! Layered error types for fyrest.
//!
//! - [`RestError`] - Top-level error type aggregating every category
//! - [`RouteError`] - Route declaration errors (surface at startup)
//! - [`PrincipalError`] - Failures of the injected principal lookup
//! - [`ConfigError`] - Configuration loading errors

mod config_error;
mod principal_error;
mod rest_error;
mod route_error;

pub use config_error::ConfigError;
pub use principal_error::PrincipalError;
pub use rest_error::RestError;
pub use route_error::RouteError;
