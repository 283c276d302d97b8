//! Configuration types.
//!
//! Dashboards are configured through an admin.lua script. These types
//! represent the settings the script can set.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default name of the dashboard route.
pub const DEFAULT_DASHBOARD_ROUTE: &str = "admin";

/// Default translation domain for action labels.
pub const DEFAULT_TRANSLATION_DOMAIN: &str = "messages";

/// Dashboard-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Route every default CRUD action is dispatched through.
    #[serde(default = "default_route_name")]
    pub route_name: String,

    /// Translation domain used by actions that don't set their own.
    #[serde(default = "default_translation_domain")]
    pub translation_domain: String,

    /// Optional dashboard title.
    #[serde(default)]
    pub title: Option<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            route_name: default_route_name(),
            translation_domain: default_translation_domain(),
            title: None,
        }
    }
}

fn default_route_name() -> String {
    DEFAULT_DASHBOARD_ROUTE.to_string()
}

fn default_translation_domain() -> String {
    DEFAULT_TRANSLATION_DOMAIN.to_string()
}

/// Get the config directory path.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("crudkit"))
}

/// Get the path to admin.lua.
pub fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("admin.lua"))
}
