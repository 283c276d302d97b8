//! Action Builder
//!
//! Turns configured [`Action`]s into [`ResolvedAction`]s for one request.
//!
//! ## Pipeline
//!
//! ```text
//! Action drafts (input order)
//!        │
//!        ▼
//!   as_dto()  ── invalid ──► ResolveError::Config
//!        │
//!        ▼
//!   is_granted(permission)? ── no ──► skipped
//!        │yes
//!        ▼
//!   generate_action_url()
//!        │
//!        ▼
//!   translate label + html title
//!        │
//!        ▼
//!   ResolvedAction (memoized until the definitions change)
//! ```

use crudkit_core::{Action, ActionDto, ActionLabel};

use crate::context::{ApplicationContext, ApplicationContextProvider};
use crate::error::ResolveResult;
use crate::resolved::ResolvedAction;
use crate::services::{AuthorizationChecker, Translator, UrlGenerator};
use crate::action_url::generate_action_url;

/// Resolves action definitions for a single request.
///
/// Results are computed on the first [`build`](ActionBuilder::build) and
/// cached until [`add_item`](ActionBuilder::add_item) or
/// [`set_items`](ActionBuilder::set_items) changes the definitions.
pub struct ActionBuilder<'a> {
    context: ApplicationContext,
    auth_checker: &'a dyn AuthorizationChecker,
    translator: &'a dyn Translator,
    url_generator: &'a dyn UrlGenerator,

    action_configs: Vec<Action>,
    built_actions: Vec<ResolvedAction>,
    is_built: bool,
}

impl<'a> ActionBuilder<'a> {
    pub fn new(
        context: ApplicationContext,
        auth_checker: &'a dyn AuthorizationChecker,
        translator: &'a dyn Translator,
        url_generator: &'a dyn UrlGenerator,
    ) -> Self {
        Self {
            context,
            auth_checker,
            translator,
            url_generator,
            action_configs: Vec::new(),
            built_actions: Vec::new(),
            is_built: false,
        }
    }

    /// Create a builder with the provider's current context.
    pub fn from_provider(
        provider: &dyn ApplicationContextProvider,
        auth_checker: &'a dyn AuthorizationChecker,
        translator: &'a dyn Translator,
        url_generator: &'a dyn UrlGenerator,
    ) -> Self {
        Self::new(provider.get_context(), auth_checker, translator, url_generator)
    }

    pub fn context(&self) -> &ApplicationContext {
        &self.context
    }

    pub fn add_item(&mut self, action: Action) -> &mut Self {
        self.action_configs.push(action);
        self.reset_built_actions();
        self
    }

    pub fn set_items(&mut self, actions: Vec<Action>) -> &mut Self {
        self.action_configs = actions;
        self.reset_built_actions();
        self
    }

    /// Resolve the definitions, or return the cached result.
    pub fn build(&mut self) -> ResolveResult<&[ResolvedAction]> {
        if !self.is_built {
            self.build_actions()?;
            self.is_built = true;
        }
        Ok(&self.built_actions)
    }

    fn reset_built_actions(&mut self) {
        self.built_actions.clear();
        self.is_built = false;
    }

    fn build_actions(&mut self) -> ResolveResult<()> {
        self.reset_built_actions();

        let mut built = Vec::with_capacity(self.action_configs.len());
        for action_config in &self.action_configs {
            let action = action_config.as_dto()?;

            if let Some(permission) = action.permission() {
                if !self.auth_checker.is_granted(permission) {
                    tracing::debug!(
                        "Skipping action '{}': permission '{}' not granted",
                        action.name(),
                        permission
                    );
                    continue;
                }
            }

            let url = generate_action_url(&self.context, &action, self.url_generator)?;
            let label = action
                .label()
                .and_then(ActionLabel::text)
                .map(|label| self.translate(&action, label));
            let html_title = action.html_title().map(|title| self.translate(&action, title));

            built.push(ResolvedAction::new(action, url, label, html_title));
        }

        tracing::debug!(
            "Built {} of {} actions for page '{}'",
            built.len(),
            self.action_configs.len(),
            self.context.page
        );

        self.built_actions = built;
        Ok(())
    }

    fn translate(&self, action: &ActionDto, message: &str) -> String {
        let domain = action
            .translation_domain()
            .unwrap_or_else(|| self.context.default_translation_domain());
        self.translator
            .trans(message, action.translation_parameters(), domain)
    }
}
