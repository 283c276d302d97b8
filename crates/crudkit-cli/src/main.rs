//! crudkit - command-line entry point.
//!
//! Loads an admin.lua configuration and resolves the actions of one page
//! for a simulated request, printing the result as JSON.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use indexmap::IndexMap;
use serde_json::Value;

use crudkit_actions::registry::PAGES;
use crudkit_actions::{
    load_config, load_config_str, ActionBuilder, ApplicationContext, IdentityTranslator,
    LoadedConfig, RequestContext, ResolvedAction, RoleChecker, RouteTable,
};
use crudkit_core::{default_config_path, EntityDto};

#[derive(Parser)]
#[command(name = "crudkit")]
#[command(about = "Resolve admin actions from an admin.lua configuration", version)]
struct Cli {
    /// Path to admin.lua (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve the actions of a page and print them as JSON
    Resolve(ResolveArgs),

    /// List configured actions per page
    List,
}

#[derive(Args)]
struct ResolveArgs {
    /// Current page (index, detail, edit, new)
    #[arg(long, default_value = "index")]
    page: String,

    /// Entity class of the current request
    #[arg(long, default_value = "App\\Entity\\Entity")]
    entity: String,

    /// Id of the current entity
    #[arg(long)]
    id: Option<String>,

    /// Request query parameter (repeatable)
    #[arg(long = "query", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    query: Vec<(String, String)>,

    /// Granted role or permission (repeatable)
    #[arg(long = "role", value_name = "ROLE")]
    roles: Vec<String>,

    /// Extra route definition (repeatable)
    #[arg(long = "route", value_name = "NAME=PATH", value_parser = parse_key_value)]
    routes: Vec<(String, String)>,

    /// Drop actions whose display condition rejects the current entity
    #[arg(long, default_value_t = false)]
    displayed_only: bool,
}

// =============================================================================
// Configuration
// =============================================================================

/// Load admin.lua, falling back to the built-in actions when there is none.
fn load(config: Option<PathBuf>) -> anyhow::Result<LoadedConfig> {
    let path = config.or_else(|| default_config_path().filter(|p| p.exists()));

    match path {
        Some(path) => load_config(&path)
            .with_context(|| format!("Failed to load {}", path.display())),
        None => {
            tracing::info!("No admin.lua found, using built-in actions");
            Ok(load_config_str("crudkit.defaults()")?)
        }
    }
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))
}

/// Numeric ids stay numbers.
fn parse_id(id: &str) -> Value {
    id.parse::<i64>()
        .map(Value::from)
        .unwrap_or_else(|_| Value::String(id.to_string()))
}

fn route_table(dashboard_route: &str, extra: &[(String, String)]) -> RouteTable {
    let mut routes = RouteTable::new().with_route(dashboard_route, format!("/{}", dashboard_route));
    for (name, path) in extra {
        if routes.contains(name) {
            tracing::warn!("Route '{}' overrides an existing route with '{}'", name, path);
        }
        routes.add_route(name.clone(), path.clone());
    }
    routes
}

// =============================================================================
// Commands
// =============================================================================

fn resolve(config: &LoadedConfig, args: ResolveArgs) -> anyhow::Result<String> {
    let entity = EntityDto::new(args.entity, None, None, args.id.as_deref().map(parse_id));
    let query: IndexMap<String, Value> = args
        .query
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect();

    let context = ApplicationContext::new(
        args.page.clone(),
        entity.clone(),
        RequestContext::new(query),
        config.dashboard.clone(),
    );

    let auth = RoleChecker::new(args.roles);
    let translator = IdentityTranslator::new();
    let routes = route_table(&context.dashboard_route_name, &args.routes);

    let mut builder = ActionBuilder::new(context, &auth, &translator, &routes);
    builder.set_items(config.registry.get_actions(&args.page));

    let actions: Vec<&ResolvedAction> = builder
        .build()?
        .iter()
        .filter(|action| !args.displayed_only || action.is_displayed_for(&entity))
        .collect();

    tracing::debug!("Resolved {} actions for page '{}'", actions.len(), args.page);

    Ok(serde_json::to_string_pretty(&actions)?)
}

fn list(config: &LoadedConfig) -> anyhow::Result<String> {
    let mut pages = IndexMap::new();
    for page in PAGES {
        let actions = config
            .registry
            .get_actions(page)
            .iter()
            .map(|action| action.as_dto())
            .collect::<Result<Vec<_>, _>>()?;
        pages.insert(page, actions);
    }
    Ok(serde_json::to_string_pretty(&pages)?)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load(cli.config)?;

    let output = match cli.command {
        Command::Resolve(args) => resolve(&config, args)?,
        Command::List => list(&config)?,
    };
    println!("{}", output);

    Ok(())
}
