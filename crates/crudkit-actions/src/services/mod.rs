//! Collaborators the resolver calls out to.
//!
//! Authorization, translation and routing are owned by the host framework.
//! The resolver only depends on these narrow traits. Small reference
//! implementations are provided for tooling and tests:
//!
//! | Trait | Implementation |
//! |-------|----------------|
//! | [`AuthorizationChecker`] | [`RoleChecker`] |
//! | [`Translator`] | [`IdentityTranslator`] |
//! | [`UrlGenerator`] | [`RouteTable`] |

use indexmap::IndexMap;
use serde_json::Value;

use crudkit_core::TranslationParameters;

use crate::error::UrlGenerationError;

mod roles;
mod routes;
mod translator;

pub use roles::RoleChecker;
pub use routes::RouteTable;
pub use translator::IdentityTranslator;

/// Parameters passed to a [`UrlGenerator`], in insertion order.
pub type RouteParameters = IndexMap<String, Value>;

/// Decides whether the current user holds a permission attribute.
#[cfg_attr(test, mockall::automock)]
pub trait AuthorizationChecker {
    fn is_granted(&self, attribute: &str) -> bool;
}

/// Translates message ids.
#[cfg_attr(test, mockall::automock)]
pub trait Translator {
    fn trans(&self, id: &str, parameters: &TranslationParameters, domain: &str) -> String;
}

/// Generates URLs for named routes.
#[cfg_attr(test, mockall::automock)]
pub trait UrlGenerator {
    fn generate(
        &self,
        route_name: &str,
        parameters: &RouteParameters,
    ) -> Result<String, UrlGenerationError>;
}

/// Render a parameter value as plain text.
pub(crate) fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
