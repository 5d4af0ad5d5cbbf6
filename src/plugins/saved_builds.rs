//! User-saved builds: an unbounded, user-named list separate from the draft ring.

use crate::core::build::SavedBuild;
use crate::core::error;
use crate::core::kv::{self, KeyValueStore};
use crate::core::metrics;
use crate::core::output::{OutputFormat, compact_line, format_currency};
use crate::core::schemas;
use crate::core::store::BuildStore;
use crate::core::time;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[clap(name = "builds", about = "Save, list, load and delete named builds")]
pub struct BuildsCli {
    /// Output format for this command group.
    #[clap(long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,
    #[clap(subcommand)]
    pub command: BuildsCommand,
}

#[derive(Subcommand, Debug)]
pub enum BuildsCommand {
    /// Save the current build, optionally renaming it first.
    Save {
        #[clap(long)]
        name: Option<String>,
    },
    /// List saved builds.
    List,
    /// Replace the current build with a saved one.
    Load {
        #[clap(long)]
        id: String,
    },
    /// Delete a saved build.
    Delete {
        #[clap(long)]
        id: String,
    },
}

pub fn run_builds_cli(store: &mut BuildStore, cli: BuildsCli) -> Result<(), error::QuadcalcError> {
    match cli.command {
        BuildsCommand::Save { name } => {
            let saved = save_build(store, name.as_deref())?;
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&saved)?),
                OutputFormat::Text => println!("Saved '{}' (ID: {})", saved.build.name, saved.id),
            }
        }
        BuildsCommand::List => {
            let builds = list_saved_builds(store.kv());
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&builds)?),
                OutputFormat::Text => {
                    if builds.is_empty() {
                        println!("No saved builds.");
                    }
                    for b in &builds {
                        println!(
                            "{}  {}  ({} parts, {})",
                            b.id,
                            compact_line(&b.build.name, 40),
                            metrics::filled_count(&b.build.components),
                            format_currency(Some(metrics::total_cost(&b.build.components)))
                        );
                    }
                }
            }
        }
        BuildsCommand::Load { id } => {
            if !load_saved_build(store, &id) {
                return Err(error::QuadcalcError::NotFound(format!("saved build '{}'", id)));
            }
            println!("Loaded '{}'", store.name());
        }
        BuildsCommand::Delete { id } => {
            if !delete_saved_build(store.kv(), &id)? {
                return Err(error::QuadcalcError::NotFound(format!("saved build '{}'", id)));
            }
            println!("Deleted {}", id);
        }
    }
    Ok(())
}

/// Saved builds in save order. Unreadable storage reads as empty.
pub fn list_saved_builds(kv: &dyn KeyValueStore) -> Vec<SavedBuild> {
    kv::read_json_or_default(kv, schemas::SAVED_BUILDS_KEY)
}

pub fn find_saved_build(kv: &dyn KeyValueStore, id: &str) -> Option<SavedBuild> {
    list_saved_builds(kv).into_iter().find(|b| b.id == id)
}

/// Export the current build under a fresh id and append it to the saved list.
///
/// Unlike draft autosave this is user-initiated, so a failed write is returned.
pub fn save_build(
    store: &mut BuildStore,
    name: Option<&str>,
) -> Result<SavedBuild, error::QuadcalcError> {
    if let Some(name) = name.filter(|n| !n.trim().is_empty()) {
        store.set_name(name);
    }
    let saved = SavedBuild {
        id: time::new_record_id(),
        build: store.export_build(),
    };
    let mut builds = list_saved_builds(store.kv());
    builds.push(saved.clone());
    kv::write_json(store.kv(), schemas::SAVED_BUILDS_KEY, &builds)?;
    tracing::info!("Saved build '{}' as {}", saved.build.name, saved.id);
    Ok(saved)
}

/// Load a saved build into the store as one undoable mutation.
pub fn load_saved_build(store: &mut BuildStore, id: &str) -> bool {
    match find_saved_build(store.kv(), id) {
        Some(saved) => {
            store.load_build(&saved.build);
            true
        }
        None => false,
    }
}

pub fn delete_saved_build(kv: &dyn KeyValueStore, id: &str) -> Result<bool, error::QuadcalcError> {
    let mut builds = list_saved_builds(kv);
    let before = builds.len();
    builds.retain(|b| b.id != id);
    if builds.len() == before {
        return Ok(false);
    }
    kv::write_json(kv, schemas::SAVED_BUILDS_KEY, &builds)?;
    Ok(true)
}

pub fn schema() -> serde_json::Value {
    serde_json::json!({
        "name": "builds",
        "version": "0.1.0",
        "description": "User-saved builds with generated ids",
        "global_parameters": ["format"],
        "commands": [
            { "name": "save", "parameters": ["name"] },
            { "name": "list", "parameters": [] },
            { "name": "load", "parameters": ["id"] },
            { "name": "delete", "parameters": ["id"] }
        ],
        "storage": [schemas::SAVED_BUILDS_KEY]
    })
}
