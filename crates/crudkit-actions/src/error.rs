//! Error types for action resolution.

use thiserror::Error;

use crudkit_core::ActionConfigError;

/// Errors raised by a [`UrlGenerator`](crate::services::UrlGenerator).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlGenerationError {
    /// No route is registered under the name.
    #[error("Route '{0}' does not exist")]
    RouteNotFound(String),

    /// A parameter could not be turned into a URL.
    #[error("Invalid parameter '{name}' for route '{route}': {message}")]
    InvalidParameter {
        route: String,
        name: String,
        message: String,
    },
}

/// Error type for [`ActionBuilder::build`](crate::builder::ActionBuilder::build).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// An action definition failed validation.
    #[error(transparent)]
    Config(#[from] ActionConfigError),

    /// URL generation failed.
    #[error("URL generation failed: {0}")]
    Url(#[from] UrlGenerationError),
}

/// Result type alias for action resolution.
pub type ResolveResult<T> = Result<T, ResolveError>;
