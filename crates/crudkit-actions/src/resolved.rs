//! Resolved, render-ready actions.

use serde::Serialize;

use crudkit_core::{ActionDto, EntityDto};

/// An action after authorization, URL generation and translation.
///
/// Never mutated after the resolver creates it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedAction {
    definition: ActionDto,
    url: String,
    /// Translated label. None when the label is hidden or only an icon is set.
    label: Option<String>,
    html_title: Option<String>,
}

impl ResolvedAction {
    pub(crate) fn new(
        definition: ActionDto,
        url: String,
        label: Option<String>,
        html_title: Option<String>,
    ) -> Self {
        Self {
            definition,
            url,
            label,
            html_title,
        }
    }

    pub fn name(&self) -> &str {
        self.definition.name()
    }

    /// The frozen definition this action was resolved from.
    pub fn definition(&self) -> &ActionDto {
        &self.definition
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn html_title(&self) -> Option<&str> {
        self.html_title.as_deref()
    }

    pub fn icon(&self) -> Option<&str> {
        self.definition.icon()
    }

    pub fn permission(&self) -> Option<&str> {
        self.definition.permission()
    }

    /// Whether the action renders for a given row.
    pub fn is_displayed_for(&self, entity: &EntityDto) -> bool {
        self.definition.should_display(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crudkit_core::Action;
    use serde_json::json;

    #[test]
    fn test_serializes_definition_nested() {
        let definition = Action::new("edit")
            .set_label("action.edit")
            .link_to_crud_action("edit")
            .as_dto()
            .unwrap();
        let resolved = ResolvedAction::new(
            definition,
            "/admin?page=edit&id=1".to_string(),
            Some("Edit".to_string()),
            None,
        );

        let value = serde_json::to_value(&resolved).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["definition", "url", "label", "html_title"]);
        assert_eq!(value["label"], json!("Edit"));
        assert_eq!(value["definition"]["label"], json!("action.edit"));
        assert_eq!(value["definition"]["name"], json!("edit"));
        assert_eq!(value["html_title"], json!(null));
    }
}
