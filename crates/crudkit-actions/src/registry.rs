//! Action Registry
//!
//! Configuration-time storage of action definitions, grouped by the page
//! (CRUD action) they are shown on. A request reads the list for its page
//! and hands it to an [`ActionBuilder`](crate::builder::ActionBuilder).

use parking_lot::RwLock;
use std::collections::HashMap;

use crudkit_core::Action;

/// Pages that carry their own action list.
pub const PAGES: [&str; 4] = [Action::INDEX, Action::DETAIL, Action::EDIT, Action::NEW];

/// Registry of action definitions per page.
///
/// Action names are unique within a page. Insertion order is the display order.
pub struct ActionRegistry {
    pages: RwLock<HashMap<String, Vec<Action>>>,
}

impl ActionRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            pages: RwLock::new(HashMap::new()),
        }
    }

    /// Create a registry seeded with the built-in actions.
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.add_defaults();
        registry
    }

    /// Add the built-in actions. Actions already registered under a built-in name are kept.
    pub fn add_defaults(&self) {
        let mut pages = self.pages.write();
        for (page, action) in default_actions() {
            let actions = pages.entry(page.to_string()).or_default();
            if actions.iter().all(|a| a.name() != action.name()) {
                actions.push(action);
            }
        }
        tracing::debug!("Added default actions");
    }

    /// Register an action on a page.
    ///
    /// Returns an error if the page already has an action with the same name.
    pub fn add(&self, page: &str, action: Action) -> Result<(), RegistryError> {
        let mut pages = self.pages.write();
        let actions = pages.entry(page.to_string()).or_default();
        if actions.iter().any(|a| a.name() == action.name()) {
            return Err(RegistryError::DuplicateAction {
                page: page.to_string(),
                name: action.name().to_string(),
            });
        }
        tracing::info!("Registered action '{}' on page '{}'", action.name(), page);
        actions.push(action);
        Ok(())
    }

    /// Reconfigure an existing action in place.
    pub fn update<F>(&self, page: &str, name: &str, f: F) -> Result<(), RegistryError>
    where
        F: FnOnce(Action) -> Action,
    {
        let mut pages = self.pages.write();
        let slot = pages
            .get_mut(page)
            .and_then(|actions| actions.iter_mut().find(|a| a.name() == name))
            .ok_or_else(|| not_found(page, name))?;

        let updated = f(slot.clone());
        *slot = updated;
        Ok(())
    }

    /// Remove an action. Returns true if it was registered.
    pub fn remove(&self, page: &str, name: &str) -> bool {
        let mut pages = self.pages.write();
        let Some(actions) = pages.get_mut(page) else {
            return false;
        };
        match actions.iter().position(|a| a.name() == name) {
            Some(pos) => {
                actions.remove(pos);
                tracing::debug!("Removed action '{}' from page '{}'", name, page);
                true
            }
            None => false,
        }
    }

    /// Move the named actions to the front, in the given order.
    ///
    /// Every name must be registered and listed once; on error the page is
    /// left unchanged.
    pub fn reorder(&self, page: &str, names: &[&str]) -> Result<(), RegistryError> {
        let mut pages = self.pages.write();
        let actions = pages.get_mut(page).ok_or_else(|| match names.first() {
            Some(name) => not_found(page, name),
            None => not_found(page, ""),
        })?;

        let mut positions = Vec::with_capacity(names.len());
        for name in names {
            let pos = actions
                .iter()
                .position(|a| a.name() == *name)
                .ok_or_else(|| not_found(page, name))?;
            if positions.contains(&pos) {
                return Err(RegistryError::DuplicateAction {
                    page: page.to_string(),
                    name: name.to_string(),
                });
            }
            positions.push(pos);
        }

        let mut ordered: Vec<Action> = positions.iter().map(|&pos| actions[pos].clone()).collect();
        ordered.extend(
            actions
                .drain(..)
                .enumerate()
                .filter(|(pos, _)| !positions.contains(pos))
                .map(|(_, action)| action),
        );
        *actions = ordered;
        Ok(())
    }

    /// Actions of a page, in display order.
    pub fn get_actions(&self, page: &str) -> Vec<Action> {
        let pages = self.pages.read();
        pages.get(page).cloned().unwrap_or_default()
    }

    /// Check if a page has an action with the given name.
    pub fn exists(&self, page: &str, name: &str) -> bool {
        let pages = self.pages.read();
        pages
            .get(page)
            .is_some_and(|actions| actions.iter().any(|a| a.name() == name))
    }

    /// Number of actions on a page.
    pub fn count(&self, page: &str) -> usize {
        let pages = self.pages.read();
        pages.get(page).map_or(0, Vec::len)
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(page: &str, name: &str) -> RegistryError {
    RegistryError::ActionNotFound {
        page: page.to_string(),
        name: name.to_string(),
    }
}

/// Built-in actions and the page each belongs to.
fn default_actions() -> Vec<(&'static str, Action)> {
    vec![
        (
            Action::INDEX,
            Action::new(Action::NEW)
                .set_label("Add new")
                .set_icon("fa fa-plus")
                .set_css_class("btn btn-primary")
                .create_as_global_action()
                .link_to_crud_action(Action::NEW),
        ),
        (
            Action::INDEX,
            Action::new(Action::EDIT).link_to_crud_action(Action::EDIT),
        ),
        (
            Action::INDEX,
            Action::new(Action::DELETE)
                .set_css_class("text-danger")
                .link_to_crud_action(Action::DELETE),
        ),
        (
            Action::DETAIL,
            Action::new(Action::EDIT)
                .set_icon("fa fa-edit")
                .set_css_class("btn btn-primary")
                .link_to_crud_action(Action::EDIT),
        ),
        (
            Action::DETAIL,
            Action::new(Action::INDEX)
                .set_label("Back to listing")
                .set_css_class("btn btn-link")
                .link_to_crud_action(Action::INDEX),
        ),
        (
            Action::DETAIL,
            Action::new(Action::DELETE)
                .set_icon("fa fa-trash-o")
                .set_css_class("btn text-danger")
                .link_to_crud_action(Action::DELETE),
        ),
        (
            Action::EDIT,
            Action::new(Action::SAVE_AND_RETURN)
                .set_label("Save changes")
                .set_css_class("btn btn-primary")
                .display_as_button()
                .set_html_attribute("type", "submit")
                .link_to_crud_action(Action::EDIT),
        ),
        (
            Action::EDIT,
            Action::new(Action::SAVE_AND_CONTINUE)
                .set_label("Save and continue editing")
                .set_icon("fa fa-edit")
                .set_css_class("btn btn-secondary")
                .display_as_button()
                .set_html_attribute("type", "submit")
                .link_to_crud_action(Action::EDIT),
        ),
        (
            Action::NEW,
            Action::new(Action::SAVE_AND_RETURN)
                .set_label("Create")
                .set_css_class("btn btn-primary")
                .display_as_button()
                .set_html_attribute("type", "submit")
                .link_to_crud_action(Action::NEW),
        ),
        (
            Action::NEW,
            Action::new(Action::SAVE_AND_ADD_ANOTHER)
                .set_label("Create and add another")
                .set_css_class("btn btn-secondary")
                .display_as_button()
                .set_html_attribute("type", "submit")
                .link_to_crud_action(Action::NEW),
        ),
    ]
}

/// Errors that can occur during action registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Action '{name}' already exists on page '{page}'")]
    DuplicateAction { page: String, name: String },

    #[error("Action '{name}' not found on page '{page}'")]
    ActionNotFound { page: String, name: String },
}
