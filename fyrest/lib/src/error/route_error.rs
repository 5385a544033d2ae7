//! Route declaration errors.

use thiserror::Error;

/// Errors raised while declaring a route.
///
/// These are programming errors in the route declaration itself, so they
/// are reported when the route is declared rather than at request time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// A bracketed segment does not have the `<kind:name>` shape.
    #[error("Malformed route template '{template}': segment '<{segment}>' must look like <kind:name>")]
    MalformedTemplate {
        /// The full template as declared.
        template: String,
        /// The offending segment, without brackets.
        segment: String,
    },

    /// The template has an opening `<` without a closing `>`.
    #[error("Malformed route template '{template}': unclosed '<'")]
    UnclosedSegment {
        /// The full template as declared.
        template: String,
    },
}

impl RouteError {
    /// Returns the template that failed to parse.
    pub fn template(&self) -> &str {
        match self {
            Self::MalformedTemplate { template, .. } | Self::UnclosedSegment { template } => {
                template
            }
        }
    }
}
