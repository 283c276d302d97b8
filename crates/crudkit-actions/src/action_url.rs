//! Action URL resolution.
//!
//! ```text
//! explicit route? ──yes──► route params + {page, id} ──► generate(route)
//!       │no
//!       ▼
//! crud action != "index"? ──yes──► query + {page, id} ──► generate(dashboard)
//!       │no
//!       ▼
//! ?referer= present? ──yes──► decoded referer value
//!       │no
//!       ▼
//! query + {page: "index"} ──► generate(dashboard)
//! ```
//!
//! Ambient values override static ones on key collision.

use serde_json::Value;

use crudkit_core::{Action, ActionDto, LinkTarget};

use crate::context::ApplicationContext;
use crate::error::UrlGenerationError;
use crate::services::{value_to_text, RouteParameters, UrlGenerator};

/// Compute the target URL of a frozen action for the current request.
pub fn generate_action_url(
    context: &ApplicationContext,
    action: &ActionDto,
    url_generator: &dyn UrlGenerator,
) -> Result<String, UrlGenerationError> {
    let request_parameters = &context.request.query;

    if let Some(LinkTarget::Route { name, parameters }) = action.link_target() {
        let mut route_parameters = parameters.clone();
        route_parameters.extend(ambient_parameters(context));
        return url_generator.generate(name, &route_parameters);
    }

    if action.crud_action_name() != Some(Action::INDEX) {
        let mut route_parameters = request_parameters.clone();
        route_parameters.extend(ambient_parameters(context));
        return url_generator.generate(&context.dashboard_route_name, &route_parameters);
    }

    // Return to the listing the user came from, if known.
    if let Some(referer) = context.request.get("referer") {
        let raw = value_to_text(referer);
        return urlencoding::decode(&raw)
            .map(|decoded| decoded.into_owned())
            .map_err(|e| UrlGenerationError::InvalidParameter {
                route: context.dashboard_route_name.clone(),
                name: "referer".to_string(),
                message: e.to_string(),
            });
    }

    let mut route_parameters = request_parameters.clone();
    route_parameters.insert("page".to_string(), Value::from(Action::INDEX));
    url_generator.generate(&context.dashboard_route_name, &route_parameters)
}

/// `{page, id}` for the current request. `id` is null without a loaded entity.
fn ambient_parameters(context: &ApplicationContext) -> RouteParameters {
    RouteParameters::from([
        ("page".to_string(), Value::String(context.page.clone())),
        (
            "id".to_string(),
            context.entity.id_value().cloned().unwrap_or(Value::Null),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RequestContext;
    use crate::services::MockUrlGenerator;
    use crudkit_core::{DashboardConfig, EntityDto};
    use indexmap::IndexMap;
    use mockall::predicate::eq;
    use serde_json::json;

    fn context(page: &str, id: Option<Value>, query: IndexMap<String, Value>) -> ApplicationContext {
        ApplicationContext::new(
            page,
            EntityDto::new("App\\Entity\\Post", None, None, id),
            RequestContext::new(query),
            DashboardConfig::default(),
        )
    }

    fn params(pairs: &[(&str, Value)]) -> RouteParameters {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_explicit_route_merges_ambient_over_static() {
        let ctx = context("detail", Some(json!(42)), IndexMap::new());
        let action = Action::new("preview")
            .link_to_route(
                "post_preview",
                params(&[("theme", json!("dark")), ("page", json!("static"))]),
            )
            .as_dto()
            .unwrap();

        let mut urls = MockUrlGenerator::new();
        urls.expect_generate()
            .with(
                eq("post_preview"),
                eq(params(&[
                    ("theme", json!("dark")),
                    ("page", json!("detail")),
                    ("id", json!(42)),
                ])),
            )
            .times(1)
            .returning(|_, _| Ok("/preview/42".to_string()));

        assert_eq!(generate_action_url(&ctx, &action, &urls).unwrap(), "/preview/42");
    }

    #[test]
    fn test_explicit_route_ignores_request_query() {
        let ctx = context("detail", Some(json!(1)), params(&[("foo", json!("bar"))]));
        let action = Action::new("preview")
            .link_to_route("post_preview", IndexMap::new())
            .as_dto()
            .unwrap();

        let mut urls = MockUrlGenerator::new();
        urls.expect_generate()
            .withf(|_, p| !p.contains_key("foo"))
            .returning(|_, _| Ok("/preview/1".to_string()));

        assert!(generate_action_url(&ctx, &action, &urls).is_ok());
    }

    #[test]
    fn test_crud_action_uses_dashboard_route() {
        let ctx = context("index", Some(json!(7)), params(&[("foo", json!("bar"))]));
        let action = Action::new("edit").link_to_crud_action("edit").as_dto().unwrap();

        let mut urls = MockUrlGenerator::new();
        urls.expect_generate()
            .with(
                eq("admin"),
                eq(params(&[
                    ("foo", json!("bar")),
                    ("page", json!("index")),
                    ("id", json!(7)),
                ])),
            )
            .times(1)
            .returning(|_, _| Ok("/admin?foo=bar&page=index&id=7".to_string()));

        let url = generate_action_url(&ctx, &action, &urls).unwrap();
        assert_eq!(url, "/admin?foo=bar&page=index&id=7");
    }

    #[test]
    fn test_crud_action_ambient_overrides_query() {
        let ctx = context(
            "detail",
            Some(json!(42)),
            params(&[("page", json!("index")), ("id", json!(3)), ("foo", json!("bar"))]),
        );
        let action = Action::new("edit").link_to_crud_action("edit").as_dto().unwrap();

        let mut urls = MockUrlGenerator::new();
        urls.expect_generate()
            .with(
                eq("admin"),
                eq(params(&[
                    ("page", json!("detail")),
                    ("id", json!(42)),
                    ("foo", json!("bar")),
                ])),
            )
            .times(1)
            .returning(|_, _| Ok("/admin?page=detail&id=42&foo=bar".to_string()));

        let url = generate_action_url(&ctx, &action, &urls).unwrap();
        assert_eq!(url, "/admin?page=detail&id=42&foo=bar");
    }

    #[test]
    fn test_index_fallback_overrides_query_page() {
        let ctx = context(
            "detail",
            Some(json!(7)),
            params(&[("page", json!("detail")), ("sort", json!("title"))]),
        );
        let action = Action::new("index").link_to_crud_action("index").as_dto().unwrap();

        let mut urls = MockUrlGenerator::new();
        urls.expect_generate()
            .withf(|route, p| {
                route.to_string() == "admin"
                    && p.get("page") == Some(&json!("index"))
                    && p.get("sort") == Some(&json!("title"))
                    && p.len() == 2
            })
            .times(1)
            .returning(|_, _| Ok("/admin?page=index&sort=title".to_string()));

        let url = generate_action_url(&ctx, &action, &urls).unwrap();
        assert_eq!(url, "/admin?page=index&sort=title");
    }

    #[test]
    fn test_undecodable_referer_is_invalid_parameter() {
        let ctx = context("detail", Some(json!(7)), params(&[("referer", json!("%FF"))]));
        let action = Action::new("index").link_to_crud_action("index").as_dto().unwrap();

        let mut urls = MockUrlGenerator::new();
        urls.expect_generate().never();

        let err = generate_action_url(&ctx, &action, &urls).unwrap_err();
        assert!(matches!(
            err,
            UrlGenerationError::InvalidParameter { ref route, ref name, .. }
                if route == "admin" && name == "referer"
        ));
    }

    #[test]
    fn test_index_without_referer_falls_back_to_listing() {
        let ctx = context("detail", Some(json!(7)), params(&[("sort", json!("title"))]));
        let action = Action::new("index").link_to_crud_action("index").as_dto().unwrap();

        let mut urls = MockUrlGenerator::new();
        urls.expect_generate()
            .with(
                eq("admin"),
                eq(params(&[("sort", json!("title")), ("page", json!("index"))])),
            )
            .times(1)
            .returning(|_, _| Ok("/admin?sort=title&page=index".to_string()));

        let url = generate_action_url(&ctx, &action, &urls).unwrap();
        assert_eq!(url, "/admin?sort=title&page=index");
    }

    #[test]
    fn test_index_returns_decoded_referer() {
        let ctx = context(
            "detail",
            Some(json!(7)),
            params(&[("referer", json!("%2Fadmin%3Fpage%3Dindex%26sort%3Dtitle"))]),
        );
        let action = Action::new("index").link_to_crud_action("index").as_dto().unwrap();

        let mut urls = MockUrlGenerator::new();
        urls.expect_generate().never();

        let url = generate_action_url(&ctx, &action, &urls).unwrap();
        assert_eq!(url, "/admin?page=index&sort=title");
    }

    #[test]
    fn test_generator_errors_propagate() {
        let ctx = context("index", None, IndexMap::new());
        let action = Action::new("export")
            .link_to_route("app_export", IndexMap::new())
            .as_dto()
            .unwrap();

        let mut urls = MockUrlGenerator::new();
        urls.expect_generate()
            .returning(|name, _| Err(UrlGenerationError::RouteNotFound(name.to_string())));

        let err = generate_action_url(&ctx, &action, &urls).unwrap_err();
        assert_eq!(err, UrlGenerationError::RouteNotFound("app_export".to_string()));
    }

    #[test]
    fn test_missing_entity_id_is_null() {
        let ctx = context("index", None, IndexMap::new());
        let action = Action::new("new").link_to_crud_action("new").as_dto().unwrap();

        let mut urls = MockUrlGenerator::new();
        urls.expect_generate()
            .withf(|_, p| p.get("id") == Some(&Value::Null))
            .returning(|_, _| Ok("/admin?page=index".to_string()));

        assert!(generate_action_url(&ctx, &action, &urls).is_ok());
    }
}
