//! Request-time action resolution for crudkit.
//!
//! This crate provides:
//! - `ActionBuilder` - Resolves configured actions for one request
//! - URL resolution through the dashboard route or explicit routes
//! - Collaborator traits for authorization, translation and routing
//! - `ActionRegistry` - Per-page action definitions
//! - Lua configuration via admin.lua

pub mod action_url;
pub mod builder;
pub mod context;
pub mod error;
pub mod lua;
pub mod registry;
pub mod resolved;
pub mod services;

// Re-export commonly used types
pub use action_url::generate_action_url;
pub use builder::ActionBuilder;
pub use context::{ApplicationContext, ApplicationContextProvider, RequestContext};
pub use error::{ResolveError, ResolveResult, UrlGenerationError};
pub use lua::{load_config, load_config_str, register_crudkit_api, LoadedConfig};
pub use registry::{ActionRegistry, RegistryError};
pub use resolved::ResolvedAction;
pub use services::{
    AuthorizationChecker, IdentityTranslator, RoleChecker, RouteParameters, RouteTable,
    Translator, UrlGenerator,
};

// Re-export crudkit_core types for convenience
pub use crudkit_core::{Action, ActionDto, ActionScope, DashboardConfig, EntityDto};
