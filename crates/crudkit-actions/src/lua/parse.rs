//! Lua table parsing for action definitions.

use indexmap::IndexMap;
use mlua::{Function, Lua, Result as LuaResult, Table, Value};

use crudkit_core::{Action, ActionLabel, EntityDto};

use super::{json_to_lua_value, lua_value_to_json};

fn runtime(message: impl Into<String>) -> mlua::Error {
    mlua::Error::RuntimeError(message.into())
}

/// Parse an action definition (for crudkit.action).
///
/// Expected table shape:
/// ```lua
/// {
///   name = "string",                 -- required
///   label = "string" | false,        -- optional: false hides the label
///   icon = "string",                 -- optional
///   scope = "entity",                -- optional: "entity" | "global" | "batch"
///   element = "link",                -- optional: "link" | "button"
///   css_class = "string",            -- optional
///   html_title = "string",           -- optional
///   html_attributes = { k = "v" },   -- optional
///   template = "string",             -- optional
///   permission = "string",           -- optional
///   crud_action = "string",          -- one of crud_action / route
///   route = "string",
///   route_parameters = { ... },      -- optional, with route
///   translation_domain = "string",   -- optional
///   translation_parameters = { ... },-- optional
///   display_if = function(entity),   -- optional
/// }
/// ```
///
/// The parsed action is validated before it is returned.
pub fn parse_action(lua: &Lua, table: Table) -> LuaResult<Action> {
    // Required: name
    let name: String = table
        .get("name")
        .map_err(|_| runtime("Action missing required 'name' field"))?;

    let label = match table.get::<Value>("label")? {
        Value::Nil => None,
        Value::Boolean(false) => Some(ActionLabel::Hidden),
        Value::String(s) => Some(ActionLabel::Text(s.to_str()?.to_string())),
        other => {
            return Err(runtime(format!(
                "Invalid label for action '{}': expected string or false, got {}",
                name,
                other.type_name()
            )))
        }
    };
    let icon: Option<String> = table.get("icon")?;

    let mut action = Action::new_with(name.clone(), label, icon);

    action = match table.get::<Option<String>>("scope")?.as_deref() {
        None | Some("entity") => action,
        Some("global") => action.create_as_global_action(),
        Some("batch") => action.create_as_batch_action(),
        Some(other) => {
            return Err(runtime(format!(
                "Invalid scope '{}' for action '{}'. Expected 'entity', 'global' or 'batch'",
                other, name
            )))
        }
    };

    action = match table.get::<Option<String>>("element")?.as_deref() {
        None | Some("link") => action,
        Some("button") => action.display_as_button(),
        Some(other) => {
            return Err(runtime(format!(
                "Invalid element '{}' for action '{}'. Expected 'link' or 'button'",
                other, name
            )))
        }
    };

    if let Some(css_class) = table.get::<Option<String>>("css_class")? {
        action = action.set_css_class(css_class);
    }
    if let Some(html_title) = table.get::<Option<String>>("html_title")? {
        action = action.set_html_title(html_title);
    }
    if let Some(template) = table.get::<Option<String>>("template")? {
        action = action.set_template(template);
    }
    if let Some(permission) = table.get::<Option<String>>("permission")? {
        action = action.set_permission(permission);
    }
    if let Some(domain) = table.get::<Option<String>>("translation_domain")? {
        action = action.set_translation_domain(domain);
    }

    if let Some(attributes) = table.get::<Option<Table>>("html_attributes")? {
        let mut attributes = attributes
            .pairs::<String, String>()
            .collect::<LuaResult<Vec<_>>>()?;
        attributes.sort_by(|a, b| a.0.cmp(&b.0));
        for (key, value) in attributes {
            action = action.set_html_attribute(key, value);
        }
    }

    if let Some(parameters) = table.get::<Option<Table>>("translation_parameters")? {
        let parameters = parse_object(lua, parameters, &name, "translation_parameters")?;
        action = action.set_translation_parameters(parameters);
    }

    // Link target: exactly one of crud_action / route
    let crud_action: Option<String> = table.get("crud_action")?;
    let route: Option<String> = table.get("route")?;
    action = match (crud_action, route) {
        (Some(_), Some(_)) => {
            return Err(runtime(format!(
                "Action '{}' cannot set both 'crud_action' and 'route'",
                name
            )))
        }
        (Some(crud_action), None) => action.link_to_crud_action(crud_action),
        (None, Some(route)) => {
            let parameters = match table.get::<Option<Table>>("route_parameters")? {
                Some(t) => parse_object(lua, t, &name, "route_parameters")?,
                None => IndexMap::new(),
            };
            action.link_to_route(route, parameters)
        }
        (None, None) => action,
    };

    if let Some(func) = table.get::<Option<Function>>("display_if")? {
        action = action.display_if(lua_display_callable(lua, func, name.clone()));
    }

    // Fail at load time rather than on the first request.
    action
        .as_dto()
        .map_err(|e| mlua::Error::RuntimeError(e.to_string()))?;

    tracing::debug!("Parsed action definition '{}'", name);

    Ok(action)
}

/// Convert a Lua table with string keys into a JSON map.
///
/// Lua tables have no key order, so keys are sorted.
fn parse_object(
    lua: &Lua,
    table: Table,
    action: &str,
    field: &str,
) -> LuaResult<IndexMap<String, serde_json::Value>> {
    match lua_value_to_json(lua, Value::Table(table))? {
        serde_json::Value::Object(map) => {
            let mut entries: Vec<_> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Ok(entries.into_iter().collect())
        }
        _ => Err(runtime(format!(
            "Action '{}' field '{}' must be a table with string keys",
            action, field
        ))),
    }
}

/// Wrap a Lua `display_if(entity)` function as a display callable.
///
/// Errors are logged and hide the action.
fn lua_display_callable(
    lua: &Lua,
    func: Function,
    action_name: String,
) -> impl Fn(&EntityDto) -> bool + Send + Sync + 'static {
    let weak = lua.weak();
    move |entity: &EntityDto| {
        let Some(lua) = weak.try_upgrade() else {
            tracing::warn!(
                "display_if for action '{}' called after the Lua state was closed",
                action_name
            );
            return false;
        };

        match entity_to_lua(&lua, entity).and_then(|value| func.call::<bool>(value)) {
            Ok(displayed) => displayed,
            Err(e) => {
                tracing::error!("display_if for action '{}' failed: {}", action_name, e);
                false
            }
        }
    }
}

/// Convert an entity descriptor to a Lua table.
fn entity_to_lua(lua: &Lua, entity: &EntityDto) -> LuaResult<Value> {
    let json = serde_json::to_value(entity).map_err(mlua::Error::external)?;
    let value = json_to_lua_value(lua, &json)?;
    if let Value::Table(ref table) = value {
        table.set("short_class_name", entity.short_class_name())?;
    }
    Ok(value)
}
