//! Action definition types.
//!
//! An [`Action`] is a mutable draft configured with fluent setters. Freezing
//! it with [`Action::as_dto`] validates the draft and produces an
//! [`ActionDto`], the immutable value consumed by the request-time resolver.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::entity::EntityDto;
use crate::error::ActionConfigError;

/// Predicate deciding whether an action renders for a given row.
pub type DisplayCallable = Arc<dyn Fn(&EntityDto) -> bool + Send + Sync>;

/// Translation parameters interpolated into labels and titles.
pub type TranslationParameters = IndexMap<String, serde_json::Value>;

/// Which records an action applies to.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ActionScope {
    /// Applies to a single entity instance.
    #[default]
    Entity,
    /// Not tied to an entity; only shown on listing pages.
    Global,
    /// Applies to one or more selected entities at once.
    Batch,
}

/// HTML element used to render the action.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum HtmlElement {
    #[default]
    #[serde(rename = "a")]
    Link,
    #[serde(rename = "button")]
    Button,
}

/// A configured action label.
///
/// `Hidden` keeps the label slot filled while rendering no text.
/// Serializes as the label string, or `false` when hidden.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionLabel {
    Text(String),
    Hidden,
}

impl ActionLabel {
    /// The label text, if not hidden.
    pub fn text(&self) -> Option<&str> {
        match self {
            ActionLabel::Text(s) => Some(s),
            ActionLabel::Hidden => None,
        }
    }
}

impl From<&str> for ActionLabel {
    fn from(s: &str) -> Self {
        ActionLabel::Text(s.to_string())
    }
}

impl From<String> for ActionLabel {
    fn from(s: String) -> Self {
        ActionLabel::Text(s)
    }
}

impl Serialize for ActionLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ActionLabel::Text(s) => serializer.serialize_str(s),
            ActionLabel::Hidden => serializer.serialize_bool(false),
        }
    }
}

/// Where an action links to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LinkTarget {
    /// Dispatched through the dashboard route to a CRUD controller action.
    CrudAction { name: String },

    /// An explicit, externally defined route.
    Route {
        name: String,
        parameters: IndexMap<String, serde_json::Value>,
    },
}

/// Frozen, validated action definition.
///
/// Produced by [`Action::as_dto`]. Exposes read-only accessors only.
#[derive(Clone, Serialize)]
pub struct ActionDto {
    name: String,
    #[serde(rename = "type")]
    scope: ActionScope,
    label: Option<ActionLabel>,
    icon: Option<String>,
    css_class: String,
    html_element: HtmlElement,
    html_attributes: IndexMap<String, String>,
    html_title: Option<String>,
    template_path: Option<String>,
    link_target: Option<LinkTarget>,
    permission: Option<String>,
    translation_domain: Option<String>,
    translation_parameters: TranslationParameters,
    #[serde(skip)]
    display_callable: Option<DisplayCallable>,
}

impl ActionDto {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scope(&self) -> ActionScope {
        self.scope
    }

    pub fn is_entity_action(&self) -> bool {
        self.scope == ActionScope::Entity
    }

    pub fn is_global_action(&self) -> bool {
        self.scope == ActionScope::Global
    }

    pub fn is_batch_action(&self) -> bool {
        self.scope == ActionScope::Batch
    }

    pub fn label(&self) -> Option<&ActionLabel> {
        self.label.as_ref()
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn css_class(&self) -> &str {
        &self.css_class
    }

    pub fn html_element(&self) -> HtmlElement {
        self.html_element
    }

    pub fn html_attributes(&self) -> &IndexMap<String, String> {
        &self.html_attributes
    }

    pub fn html_title(&self) -> Option<&str> {
        self.html_title.as_deref()
    }

    pub fn template_path(&self) -> Option<&str> {
        self.template_path.as_deref()
    }

    pub fn link_target(&self) -> Option<&LinkTarget> {
        self.link_target.as_ref()
    }

    /// Name of the linked CRUD action, if the action is not routed explicitly.
    pub fn crud_action_name(&self) -> Option<&str> {
        match &self.link_target {
            Some(LinkTarget::CrudAction { name }) => Some(name),
            _ => None,
        }
    }

    pub fn route_name(&self) -> Option<&str> {
        match &self.link_target {
            Some(LinkTarget::Route { name, .. }) => Some(name),
            _ => None,
        }
    }

    pub fn route_parameters(&self) -> Option<&IndexMap<String, serde_json::Value>> {
        match &self.link_target {
            Some(LinkTarget::Route { parameters, .. }) => Some(parameters),
            _ => None,
        }
    }

    pub fn permission(&self) -> Option<&str> {
        self.permission.as_deref()
    }

    pub fn translation_domain(&self) -> Option<&str> {
        self.translation_domain.as_deref()
    }

    pub fn translation_parameters(&self) -> &TranslationParameters {
        &self.translation_parameters
    }

    pub fn display_callable(&self) -> Option<&DisplayCallable> {
        self.display_callable.as_ref()
    }

    /// Evaluate the display predicate for a row. Actions without one always display.
    pub fn should_display(&self, entity: &EntityDto) -> bool {
        self.display_callable
            .as_ref()
            .map_or(true, |callable| callable(entity))
    }
}

impl fmt::Debug for ActionDto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDto")
            .field("name", &self.name)
            .field("scope", &self.scope)
            .field("label", &self.label)
            .field("icon", &self.icon)
            .field("html_element", &self.html_element)
            .field("link_target", &self.link_target)
            .field("permission", &self.permission)
            .field("has_display_callable", &self.display_callable.is_some())
            .finish()
    }
}

// Display callables compare by identity.
impl PartialEq for ActionDto {
    fn eq(&self, other: &Self) -> bool {
        let same_callable = match (&self.display_callable, &other.display_callable) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };

        same_callable
            && self.name == other.name
            && self.scope == other.scope
            && self.label == other.label
            && self.icon == other.icon
            && self.css_class == other.css_class
            && self.html_element == other.html_element
            && self.html_attributes == other.html_attributes
            && self.html_title == other.html_title
            && self.template_path == other.template_path
            && self.link_target == other.link_target
            && self.permission == other.permission
            && self.translation_domain == other.translation_domain
            && self.translation_parameters == other.translation_parameters
    }
}

/// Fluent builder for an action definition.
///
/// ```
/// use crudkit_core::Action;
///
/// let archive = Action::new("archive")
///     .set_icon("fa fa-box-archive")
///     .link_to_crud_action("archive")
///     .display_as_button();
///
/// let dto = archive.as_dto().unwrap();
/// assert_eq!(dto.crud_action_name(), Some("archive"));
/// ```
#[derive(Clone)]
pub struct Action {
    dto: ActionDto,
}

impl Action {
    pub const DELETE: &'static str = "delete";
    pub const DETAIL: &'static str = "detail";
    pub const EDIT: &'static str = "edit";
    pub const INDEX: &'static str = "index";
    pub const NEW: &'static str = "new";
    pub const SAVE_AND_ADD_ANOTHER: &'static str = "saveAndAddAnother";
    pub const SAVE_AND_CONTINUE: &'static str = "saveAndContinue";
    pub const SAVE_AND_RETURN: &'static str = "saveAndReturn";

    /// Create an entity action whose label is derived from its name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let label = ActionLabel::Text(capitalize(&name));
        Self::new_with(name, Some(label), None)
    }

    /// Create an entity action with an explicit label and icon.
    ///
    /// A `None` label is derived from the name.
    pub fn new_with(
        name: impl Into<String>,
        label: Option<ActionLabel>,
        icon: Option<String>,
    ) -> Self {
        let name = name.into();
        let label = label.unwrap_or_else(|| ActionLabel::Text(capitalize(&name)));

        Self {
            dto: ActionDto {
                name,
                scope: ActionScope::Entity,
                label: Some(label),
                icon,
                css_class: String::new(),
                html_element: HtmlElement::Link,
                html_attributes: IndexMap::new(),
                html_title: None,
                template_path: None,
                link_target: None,
                permission: None,
                translation_domain: None,
                translation_parameters: IndexMap::new(),
                display_callable: None,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.dto.name
    }

    pub fn create_as_global_action(mut self) -> Self {
        self.dto.scope = ActionScope::Global;
        self
    }

    pub fn create_as_batch_action(mut self) -> Self {
        self.dto.scope = ActionScope::Batch;
        self
    }

    pub fn set_label(mut self, label: impl Into<ActionLabel>) -> Self {
        self.dto.label = Some(label.into());
        self
    }

    /// Keep the action but render it without label text.
    pub fn hide_label(mut self) -> Self {
        self.dto.label = Some(ActionLabel::Hidden);
        self
    }

    pub fn clear_label(mut self) -> Self {
        self.dto.label = None;
        self
    }

    pub fn set_icon(mut self, icon: impl Into<String>) -> Self {
        self.dto.icon = Some(icon.into());
        self
    }

    pub fn clear_icon(mut self) -> Self {
        self.dto.icon = None;
        self
    }

    pub fn set_css_class(mut self, css_class: impl Into<String>) -> Self {
        self.dto.css_class = css_class.into();
        self
    }

    pub fn add_css_class(mut self, css_class: &str) -> Self {
        if self.dto.css_class.is_empty() {
            self.dto.css_class = css_class.to_string();
        } else {
            self.dto.css_class.push(' ');
            self.dto.css_class.push_str(css_class);
        }
        self
    }

    pub fn display_as_link(mut self) -> Self {
        self.dto.html_element = HtmlElement::Link;
        self
    }

    pub fn display_as_button(mut self) -> Self {
        self.dto.html_element = HtmlElement::Button;
        self
    }

    pub fn set_html_attributes(mut self, attributes: IndexMap<String, String>) -> Self {
        self.dto.html_attributes = attributes;
        self
    }

    pub fn set_html_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.dto.html_attributes.insert(name.into(), value.into());
        self
    }

    pub fn set_html_title(mut self, title: impl Into<String>) -> Self {
        self.dto.html_title = Some(title.into());
        self
    }

    pub fn set_template(mut self, template_path: impl Into<String>) -> Self {
        self.dto.template_path = Some(template_path.into());
        self
    }

    /// Link to a CRUD action dispatched through the dashboard route.
    pub fn link_to_crud_action(mut self, crud_action_name: impl Into<String>) -> Self {
        self.dto.link_target = Some(LinkTarget::CrudAction {
            name: crud_action_name.into(),
        });
        self
    }

    /// Link to a named route. Replaces any CRUD action target.
    pub fn link_to_route(
        mut self,
        route_name: impl Into<String>,
        route_parameters: IndexMap<String, serde_json::Value>,
    ) -> Self {
        self.dto.link_target = Some(LinkTarget::Route {
            name: route_name.into(),
            parameters: route_parameters,
        });
        self
    }

    pub fn set_permission(mut self, permission: impl Into<String>) -> Self {
        self.dto.permission = Some(permission.into());
        self
    }

    /// If not set, the dashboard's translation domain is used.
    pub fn set_translation_domain(mut self, domain: impl Into<String>) -> Self {
        self.dto.translation_domain = Some(domain.into());
        self
    }

    pub fn set_translation_parameters(mut self, parameters: TranslationParameters) -> Self {
        self.dto.translation_parameters = parameters;
        self
    }

    pub fn display_if<F>(mut self, callable: F) -> Self
    where
        F: Fn(&EntityDto) -> bool + Send + Sync + 'static,
    {
        self.dto.display_callable = Some(Arc::new(callable));
        self
    }

    /// Validate the draft and return the frozen value.
    pub fn as_dto(&self) -> Result<ActionDto, ActionConfigError> {
        if self.dto.label.is_none() && self.dto.icon.is_none() {
            return Err(ActionConfigError::MissingLabelAndIcon {
                action: self.dto.name.clone(),
            });
        }

        if self.dto.link_target.is_none() {
            return Err(ActionConfigError::MissingLinkTarget {
                action: self.dto.name.clone(),
            });
        }

        Ok(self.dto.clone())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dto.name)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Action").field(&self.dto).finish()
    }
}

/// Uppercase the first character.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_defaults() {
        let dto = Action::new("edit").link_to_crud_action("edit").as_dto().unwrap();

        assert_eq!(dto.name(), "edit");
        assert_eq!(dto.scope(), ActionScope::Entity);
        assert_eq!(dto.label(), Some(&ActionLabel::Text("Edit".to_string())));
        assert_eq!(dto.html_element(), HtmlElement::Link);
        assert!(dto.html_attributes().is_empty());
        assert!(dto.translation_parameters().is_empty());
        assert!(dto.icon().is_none());
    }

    #[test]
    fn test_new_with_explicit_label_and_icon() {
        let dto = Action::new_with("archive", Some("Stash".into()), Some("fa-box".to_string()))
            .link_to_crud_action("archive")
            .as_dto()
            .unwrap();

        assert_eq!(dto.label().and_then(ActionLabel::text), Some("Stash"));
        assert_eq!(dto.icon(), Some("fa-box"));

        let derived = Action::new_with("archive", None, None)
            .link_to_crud_action("archive")
            .as_dto()
            .unwrap();
        assert_eq!(derived.label().and_then(ActionLabel::text), Some("Archive"));
    }

    #[test]
    fn test_missing_label_and_icon_fails() {
        let result = Action::new("archive")
            .clear_label()
            .link_to_crud_action("archive")
            .as_dto();

        assert_eq!(
            result.unwrap_err(),
            ActionConfigError::MissingLabelAndIcon {
                action: "archive".to_string()
            }
        );
    }

    #[test]
    fn test_label_or_icon_is_enough() {
        let icon_only = Action::new("archive")
            .clear_label()
            .set_icon("fa-box")
            .link_to_crud_action("archive");
        assert!(icon_only.as_dto().is_ok());

        let label_only = Action::new("archive").link_to_crud_action("archive");
        assert!(label_only.as_dto().is_ok());

        // A hidden label still counts as configured.
        let hidden = Action::new("archive").hide_label().link_to_crud_action("archive");
        assert!(hidden.as_dto().is_ok());
    }

    #[test]
    fn test_missing_link_target_fails() {
        let err = Action::new("archive").as_dto().unwrap_err();
        assert!(matches!(err, ActionConfigError::MissingLinkTarget { ref action } if action == "archive"));
    }

    #[test]
    fn test_either_link_target_succeeds() {
        let crud = Action::new("archive").link_to_crud_action("archive").as_dto().unwrap();
        assert_eq!(crud.crud_action_name(), Some("archive"));
        assert!(crud.route_name().is_none());

        let route = Action::new("archive")
            .link_to_route("app_archive", IndexMap::new())
            .as_dto()
            .unwrap();
        assert_eq!(route.route_name(), Some("app_archive"));
        assert!(route.crud_action_name().is_none());
    }

    #[test]
    fn test_last_link_target_wins() {
        let dto = Action::new("archive")
            .link_to_crud_action("archive")
            .link_to_route("app_archive", IndexMap::new())
            .as_dto()
            .unwrap();
        assert_eq!(dto.route_name(), Some("app_archive"));
        assert!(dto.crud_action_name().is_none());
    }

    #[test]
    fn test_scope_last_call_wins() {
        let action = Action::new("export")
            .create_as_batch_action()
            .create_as_global_action()
            .link_to_crud_action("export");
        let dto = action.as_dto().unwrap();
        assert!(dto.is_global_action());
        assert!(!dto.is_batch_action());
        assert!(!dto.is_entity_action());

        let batch = Action::new("archive")
            .create_as_batch_action()
            .link_to_crud_action("archive")
            .as_dto()
            .unwrap();
        assert!(batch.is_batch_action());
        assert!(!batch.is_entity_action());
    }

    #[test]
    fn test_scope_defaults_to_entity() {
        let dto = Action::new("edit").link_to_crud_action("edit").as_dto().unwrap();
        assert!(dto.is_entity_action());
        assert!(!dto.is_global_action());
    }

    #[test]
    fn test_as_dto_is_idempotent() {
        let action = Action::new("edit")
            .set_icon("fa-pencil")
            .set_translation_parameters(IndexMap::from([("%name%".to_string(), json!("Post"))]))
            .link_to_crud_action("edit");

        assert_eq!(action.as_dto().unwrap(), action.as_dto().unwrap());
    }

    #[test]
    fn test_css_class_accumulates() {
        let dto = Action::new("delete")
            .add_css_class("btn")
            .add_css_class("text-danger")
            .link_to_crud_action("delete")
            .as_dto()
            .unwrap();
        assert_eq!(dto.css_class(), "btn text-danger");
    }

    #[test]
    fn test_display_callable() {
        let action = Action::new("publish")
            .link_to_crud_action("publish")
            .display_if(|entity| entity.id_value().is_some());
        let dto = action.as_dto().unwrap();

        let unsaved = EntityDto::new("App\\Entity\\Post", None, None, None);
        let saved = EntityDto::new("App\\Entity\\Post", None, None, Some(json!(3)));
        assert!(!dto.should_display(&unsaved));
        assert!(dto.should_display(&saved));

        let always = Action::new("edit").link_to_crud_action("edit").as_dto().unwrap();
        assert!(always.should_display(&unsaved));
    }

    #[test]
    fn test_serialize_dto() {
        let dto = Action::new("delete")
            .hide_label()
            .set_icon("fa-trash")
            .display_as_button()
            .link_to_crud_action("delete")
            .as_dto()
            .unwrap();

        let value = serde_json::to_value(&dto).unwrap();
        assert_eq!(value["type"], json!("entity"));
        assert_eq!(value["label"], json!(false));
        assert_eq!(value["html_element"], json!("button"));
        assert_eq!(
            value["link_target"],
            json!({ "type": "crud_action", "name": "delete" })
        );
    }

    #[test]
    fn test_display_is_name() {
        assert_eq!(Action::new("saveAndReturn").to_string(), "saveAndReturn");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("saveAndReturn"), "SaveAndReturn");
        assert_eq!(capitalize(""), "");
    }
}
