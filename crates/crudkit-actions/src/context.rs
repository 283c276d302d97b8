//! Per-request ambient state consumed by the resolver.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crudkit_core::{DashboardConfig, EntityDto};

/// The parts of the HTTP request the resolver reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RequestContext {
    /// Query string parameters, in request order.
    pub query: IndexMap<String, Value>,
}

impl RequestContext {
    pub fn new(query: IndexMap<String, Value>) -> Self {
        Self { query }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.query.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.query.contains_key(name)
    }
}

/// Ambient state for one admin request.
///
/// Built once per request by the host and handed to the resolver by value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationContext {
    /// Current page (CRUD action) name, e.g. "index" or "edit".
    pub page: String,

    /// The current entity. On listing pages no instance or id is loaded.
    pub entity: EntityDto,

    pub request: RequestContext,

    /// Route all default CRUD actions are dispatched through.
    pub dashboard_route_name: String,

    pub config: DashboardConfig,
}

impl ApplicationContext {
    /// Create a context whose dashboard route comes from the config.
    pub fn new(
        page: impl Into<String>,
        entity: EntityDto,
        request: RequestContext,
        config: DashboardConfig,
    ) -> Self {
        Self {
            page: page.into(),
            entity,
            request,
            dashboard_route_name: config.route_name.clone(),
            config,
        }
    }

    pub fn default_translation_domain(&self) -> &str {
        &self.config.translation_domain
    }
}

/// Hosts that build the context lazily expose it through a provider.
#[cfg_attr(test, mockall::automock)]
pub trait ApplicationContextProvider {
    fn get_context(&self) -> ApplicationContext;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_context_uses_config_route() {
        let config = DashboardConfig {
            route_name: "backoffice".to_string(),
            ..DashboardConfig::default()
        };
        let ctx = ApplicationContext::new(
            "index",
            EntityDto::new("App\\Entity\\Post", None, None, None),
            RequestContext::default(),
            config,
        );

        assert_eq!(ctx.dashboard_route_name, "backoffice");
        assert_eq!(ctx.default_translation_domain(), "messages");
    }

    #[test]
    fn test_request_lookup() {
        let request = RequestContext::new(IndexMap::from([("sort".to_string(), json!("title"))]));
        assert!(request.has("sort"));
        assert!(!request.has("referer"));
        assert_eq!(request.get("sort"), Some(&json!("title")));
    }
}
