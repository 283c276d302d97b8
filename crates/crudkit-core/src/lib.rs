//! Core types for crudkit.
//!
//! This crate contains the configuration-time data structures shared by all
//! crudkit crates:
//! - Action definitions (draft builder and frozen value)
//! - Entity descriptors and persistence metadata
//! - Dashboard configuration
//! - Error types

mod action;
mod config;
mod entity;
mod error;

pub use action::{
    Action, ActionDto, ActionLabel, ActionScope, DisplayCallable, HtmlElement, LinkTarget,
    TranslationParameters,
};
pub use config::{
    config_dir, default_config_path, DashboardConfig, DEFAULT_DASHBOARD_ROUTE,
    DEFAULT_TRANSLATION_DOMAIN,
};
pub use entity::{ClassMetadata, EmbeddedClass, EntityDto, EntityPatch, FieldMapping};
pub use error::{ActionConfigError, ConfigError, EntityError};
