//! Lua configuration for crudkit dashboards.
//!
//! An admin.lua script describes the dashboard and its actions through the
//! `crudkit` global:
//! - `crudkit.dashboard(config)` - Dashboard route, translation domain, title
//! - `crudkit.defaults()` - Register the built-in actions
//! - `crudkit.action(page, action)` - Register an action on a page
//! - `crudkit.remove(page, name)` - Remove an action
//! - `crudkit.reorder(page, names)` - Move actions to the front
//!
//! ```lua
//! crudkit.dashboard { route_name = "admin", translation_domain = "admin" }
//! crudkit.defaults()
//! crudkit.action("index", {
//!     name = "export",
//!     icon = "fa fa-download",
//!     scope = "global",
//!     route = "post_export",
//! })
//! ```

use std::path::Path;
use std::sync::Arc;

use mlua::{Lua, LuaSerdeExt, Result as LuaResult, Table, Value};
use parking_lot::RwLock;

use crudkit_core::{ConfigError, DashboardConfig};

use crate::registry::ActionRegistry;

mod parse;

pub use parse::parse_action;

/// Result of loading an admin.lua script.
pub struct LoadedConfig {
    pub dashboard: DashboardConfig,
    pub registry: Arc<ActionRegistry>,
    /// Owns the state `display_if` callbacks run in.
    lua: Lua,
}

impl LoadedConfig {
    pub fn lua(&self) -> &Lua {
        &self.lua
    }
}

impl std::fmt::Debug for LoadedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedConfig")
            .field("dashboard", &self.dashboard)
            .finish_non_exhaustive()
    }
}

/// Register the `crudkit` API in a Lua state.
pub fn register_crudkit_api(
    lua: &Lua,
    registry: Arc<ActionRegistry>,
    dashboard: Arc<RwLock<DashboardConfig>>,
) -> LuaResult<()> {
    let crudkit = lua.create_table()?;

    // crudkit.dashboard(config)
    {
        let dashboard = Arc::clone(&dashboard);
        let dashboard_fn = lua.create_function(move |lua, table: Table| {
            let config: DashboardConfig = lua.from_value(Value::Table(table))?;
            tracing::debug!("Configured dashboard route '{}'", config.route_name);
            *dashboard.write() = config;
            Ok(())
        })?;
        crudkit.set("dashboard", dashboard_fn)?;
    }

    // crudkit.defaults()
    {
        let registry = Arc::clone(&registry);
        let defaults_fn = lua.create_function(move |_lua, ()| {
            registry.add_defaults();
            Ok(())
        })?;
        crudkit.set("defaults", defaults_fn)?;
    }

    // crudkit.action(page, action)
    {
        let registry = Arc::clone(&registry);
        let action_fn = lua.create_function(move |lua, (page, table): (String, Table)| {
            let action = parse_action(lua, table)?;

            registry
                .add(&page, action)
                .map_err(|e| mlua::Error::RuntimeError(e.to_string()))?;

            Ok(())
        })?;
        crudkit.set("action", action_fn)?;
    }

    // crudkit.remove(page, name) -> bool
    {
        let registry = Arc::clone(&registry);
        let remove_fn = lua.create_function(move |_lua, (page, name): (String, String)| {
            Ok(registry.remove(&page, &name))
        })?;
        crudkit.set("remove", remove_fn)?;
    }

    // crudkit.reorder(page, { name, ... })
    {
        let registry = Arc::clone(&registry);
        let reorder_fn =
            lua.create_function(move |_lua, (page, names): (String, Vec<String>)| {
                let names: Vec<&str> = names.iter().map(String::as_str).collect();
                registry
                    .reorder(&page, &names)
                    .map_err(|e| mlua::Error::RuntimeError(e.to_string()))
            })?;
        crudkit.set("reorder", reorder_fn)?;
    }

    lua.globals().set("crudkit", crudkit)?;

    Ok(())
}

/// Load an admin configuration script from disk.
pub fn load_config(path: &Path) -> Result<LoadedConfig, ConfigError> {
    tracing::info!("Loading admin config from {:?}", path);

    let code = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;

    load_source(&code, &path.display().to_string())
}

/// Load an admin configuration script from a string.
pub fn load_config_str(source: &str) -> Result<LoadedConfig, ConfigError> {
    load_source(source, "admin.lua")
}

fn load_source(source: &str, chunk_name: &str) -> Result<LoadedConfig, ConfigError> {
    let lua = Lua::new();
    let registry = Arc::new(ActionRegistry::new());
    let dashboard = Arc::new(RwLock::new(DashboardConfig::default()));

    register_crudkit_api(&lua, Arc::clone(&registry), Arc::clone(&dashboard))
        .map_err(|e| ConfigError::Parse(format!("Failed to register crudkit API: {}", e)))?;

    lua.load(source)
        .set_name(chunk_name)
        .exec()
        .map_err(|e| ConfigError::Parse(format!("Error in {}: {}", chunk_name, e)))?;

    let dashboard = dashboard.read().clone();
    tracing::info!(
        "Loaded admin config (dashboard route '{}')",
        dashboard.route_name
    );

    Ok(LoadedConfig {
        dashboard,
        registry,
        lua,
    })
}

/// Convert a Lua value to a JSON value.
pub fn lua_value_to_json(_lua: &Lua, value: Value) -> LuaResult<serde_json::Value> {
    match value {
        Value::Nil => Ok(serde_json::Value::Null),
        Value::Boolean(b) => Ok(serde_json::Value::Bool(b)),
        Value::Integer(i) => Ok(serde_json::Value::Number(i.into())),
        Value::Number(n) => Ok(serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)),
        Value::String(s) => Ok(serde_json::Value::String(s.to_str()?.to_string())),
        Value::Table(t) => {
            // Sequences become arrays, everything else objects.
            let is_array = t.clone().pairs::<i64, Value>().all(|r| r.is_ok());

            if is_array && t.raw_len() > 0 {
                let mut arr = Vec::new();
                for pair in t.pairs::<i64, Value>() {
                    let (_, v) = pair?;
                    arr.push(lua_value_to_json(_lua, v)?);
                }
                Ok(serde_json::Value::Array(arr))
            } else {
                let mut obj = serde_json::Map::new();
                for pair in t.pairs::<String, Value>() {
                    let (k, v) = pair?;
                    obj.insert(k, lua_value_to_json(_lua, v)?);
                }
                Ok(serde_json::Value::Object(obj))
            }
        }
        _ => Ok(serde_json::Value::Null),
    }
}

/// Convert a JSON value to a Lua value.
pub fn json_to_lua_value(lua: &Lua, value: &serde_json::Value) -> LuaResult<Value> {
    match value {
        serde_json::Value::Null => Ok(Value::Nil),
        serde_json::Value::Bool(b) => Ok(Value::Boolean(*b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Integer(i))
            } else if let Some(f) = n.as_f64() {
                Ok(Value::Number(f))
            } else {
                Ok(Value::Nil)
            }
        }
        serde_json::Value::String(s) => Ok(Value::String(lua.create_string(s)?)),
        serde_json::Value::Array(arr) => {
            let table = lua.create_table()?;
            for (i, v) in arr.iter().enumerate() {
                table.set(i + 1, json_to_lua_value(lua, v)?)?;
            }
            Ok(Value::Table(table))
        }
        serde_json::Value::Object(obj) => {
            let table = lua.create_table()?;
            for (k, v) in obj {
                table.set(k.as_str(), json_to_lua_value(lua, v)?)?;
            }
            Ok(Value::Table(table))
        }
    }
}
