//! Static route table URL generator.

use indexmap::IndexMap;

use super::{value_to_text, RouteParameters, UrlGenerator};
use crate::error::UrlGenerationError;

/// Maps route names to path templates.
///
/// Path variables are written `{name}` and filled from the parameters.
/// Remaining non-null parameters become the query string.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: IndexMap<String, String>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route(mut self, name: impl Into<String>, path: impl Into<String>) -> Self {
        self.add_route(name, path);
        self
    }

    pub fn add_route(&mut self, name: impl Into<String>, path: impl Into<String>) {
        self.routes.insert(name.into(), path.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.routes.contains_key(name)
    }
}

impl UrlGenerator for RouteTable {
    fn generate(
        &self,
        route_name: &str,
        parameters: &RouteParameters,
    ) -> Result<String, UrlGenerationError> {
        let mut path = self
            .routes
            .get(route_name)
            .cloned()
            .ok_or_else(|| UrlGenerationError::RouteNotFound(route_name.to_string()))?;

        let mut query = url::form_urlencoded::Serializer::new(String::new());
        let mut has_query = false;

        for (name, value) in parameters {
            let placeholder = format!("{{{}}}", name);
            if path.contains(&placeholder) {
                if value.is_null() {
                    return Err(missing_variable(route_name, name));
                }
                let segment = urlencoding::encode(&value_to_text(value)).into_owned();
                path = path.replace(&placeholder, &segment);
                continue;
            }

            if value.is_null() {
                continue;
            }
            query.append_pair(name, &value_to_text(value));
            has_query = true;
        }

        if let Some(start) = path.find('{') {
            let rest = &path[start + 1..];
            let name = rest.split('}').next().unwrap_or(rest);
            return Err(missing_variable(route_name, name));
        }

        if has_query {
            Ok(format!("{}?{}", path, query.finish()))
        } else {
            Ok(path)
        }
    }
}

fn missing_variable(route: &str, name: &str) -> UrlGenerationError {
    UrlGenerationError::InvalidParameter {
        route: route.to_string(),
        name: name.to_string(),
        message: "missing value for path variable".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table() -> RouteTable {
        RouteTable::new()
            .with_route("admin", "/admin")
            .with_route("post_preview", "/posts/{id}/preview")
    }

    #[test]
    fn test_query_string() {
        let params = RouteParameters::from([
            ("page".to_string(), json!("edit")),
            ("id".to_string(), json!(42)),
            ("sort".to_string(), json!("created at")),
        ]);

        let url = table().generate("admin", &params).unwrap();
        assert_eq!(url, "/admin?page=edit&id=42&sort=created+at");
    }

    #[test]
    fn test_null_parameters_are_omitted() {
        let params = RouteParameters::from([
            ("page".to_string(), json!("index")),
            ("id".to_string(), json!(null)),
        ]);

        assert_eq!(table().generate("admin", &params).unwrap(), "/admin?page=index");
        assert_eq!(table().generate("admin", &RouteParameters::new()).unwrap(), "/admin");
    }

    #[test]
    fn test_path_variables() {
        let params = RouteParameters::from([
            ("page".to_string(), json!("detail")),
            ("id".to_string(), json!(7)),
        ]);

        let url = table().generate("post_preview", &params).unwrap();
        assert_eq!(url, "/posts/7/preview?page=detail");
    }

    #[test]
    fn test_missing_path_variable() {
        let params = RouteParameters::from([("id".to_string(), json!(null))]);
        let err = table().generate("post_preview", &params).unwrap_err();
        assert!(matches!(err, UrlGenerationError::InvalidParameter { ref name, .. } if name == "id"));

        let err = table().generate("post_preview", &RouteParameters::new()).unwrap_err();
        assert!(matches!(err, UrlGenerationError::InvalidParameter { ref name, .. } if name == "id"));
    }

    #[test]
    fn test_unknown_route() {
        let err = table().generate("nope", &RouteParameters::new()).unwrap_err();
        assert_eq!(err, UrlGenerationError::RouteNotFound("nope".to_string()));
    }
}
