//! Component presets: the stock catalog baked into the binary plus
//! user-authored presets persisted per category.
//!
//! Lookups search custom presets before the catalog, so a custom preset can
//! shadow a stock one by reusing its id.

use crate::core::category::Category;
use crate::core::component::Component;
use crate::core::error;
use crate::core::kv::{self, KeyValueStore};
use crate::core::output::{OutputFormat, compact_line, format_currency, format_weight};
use crate::core::schemas;
use crate::core::store::BuildStore;
use crate::core::time;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::LazyLock;

const EMBEDDED_CATALOG: &str = include_str!("../../presets/catalog.json");

/// Custom presets as persisted: raw category key -> presets in insertion order.
pub type CustomPresets = BTreeMap<String, Vec<Component>>;

static CATALOG: LazyLock<BTreeMap<Category, Vec<Component>>> =
    LazyLock::new(|| match parse_catalog(EMBEDDED_CATALOG) {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!("Embedded preset catalog is unreadable: {}", e);
            BTreeMap::new()
        }
    });

fn parse_catalog(raw: &str) -> Result<BTreeMap<Category, Vec<Component>>, error::QuadcalcError> {
    let by_key: BTreeMap<String, Vec<Component>> = serde_json::from_str(raw)?;
    let mut catalog = BTreeMap::new();
    for (key, presets) in by_key {
        let category = Category::from_key(&key).ok_or_else(|| {
            error::QuadcalcError::ValidationError(format!("catalog category '{}' is not registered", key))
        })?;
        catalog.insert(category, presets);
    }
    Ok(catalog)
}

#[derive(Parser, Debug)]
#[clap(name = "presets", about = "Browse the stock catalog and manage custom presets")]
pub struct PresetsCli {
    /// Output format for this command group.
    #[clap(long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,
    #[clap(subcommand)]
    pub command: PresetsCommand,
}

#[derive(Subcommand, Debug)]
pub enum PresetsCommand {
    /// List presets, custom first.
    List {
        /// Restrict to one category key.
        category: Option<Category>,
    },
    /// Save a component JSON file as a custom preset.
    Add {
        category: Category,
        #[clap(long)]
        file: PathBuf,
    },
    /// Delete a custom preset.
    Remove {
        category: Category,
        #[clap(long)]
        id: String,
    },
}

pub fn run_presets_cli(store: &BuildStore, cli: PresetsCli) -> Result<(), error::QuadcalcError> {
    let kv = store.kv();
    match cli.command {
        PresetsCommand::List { category } => {
            let categories: Vec<Category> = match category {
                Some(c) => vec![c],
                None => Category::ALL.to_vec(),
            };
            match cli.format {
                OutputFormat::Json => {
                    let listing: BTreeMap<&str, Vec<Component>> = categories
                        .iter()
                        .map(|c| (c.key(), presets_for(kv, *c)))
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&listing)?);
                }
                OutputFormat::Text => {
                    for c in categories {
                        println!("{}", c.label().bold());
                        for p in presets_for(kv, c) {
                            let marker = if p.custom { "*" } else { " " };
                            println!(
                                "  {}{:<24} {:<28} {:>8} {:>8}",
                                marker,
                                p.id,
                                compact_line(&p.name, 28),
                                format_currency(p.cost),
                                format_weight(p.weight)
                            );
                        }
                    }
                }
            }
        }
        PresetsCommand::Add { category, file } => {
            let raw = fs::read_to_string(&file)?;
            let component: Component = serde_json::from_str(&raw)?;
            let saved = save_custom_preset(kv, category, component)?;
            println!("Saved custom preset {} ({})", saved.id, saved.name);
        }
        PresetsCommand::Remove { category, id } => {
            if !delete_custom_preset(kv, category, &id)? {
                return Err(error::QuadcalcError::NotFound(format!(
                    "custom preset '{}' in {}",
                    id, category
                )));
            }
            println!("Removed custom preset {}", id);
        }
    }
    Ok(())
}

/// The read-only stock catalog.
pub fn catalog() -> &'static BTreeMap<Category, Vec<Component>> {
    &CATALOG
}

pub fn catalog_presets(category: Category) -> &'static [Component] {
    CATALOG.get(&category).map(Vec::as_slice).unwrap_or(&[])
}

/// All custom presets. Unreadable storage reads as empty.
pub fn custom_presets(kv: &dyn KeyValueStore) -> CustomPresets {
    kv::read_json_or_default(kv, schemas::CUSTOM_PRESETS_KEY)
}

pub fn custom_presets_for(kv: &dyn KeyValueStore, category: Category) -> Vec<Component> {
    custom_presets(kv).remove(category.key()).unwrap_or_default()
}

/// Persist a custom preset. A missing id gets a fresh `custom-` id; an id
/// already present in the category is left alone and nothing is written.
pub fn save_custom_preset(
    kv: &dyn KeyValueStore,
    category: Category,
    mut component: Component,
) -> Result<Component, error::QuadcalcError> {
    if component.id.is_empty() {
        component.id = format!("custom-{}", time::new_record_id().to_lowercase());
    }
    component.custom = true;
    let mut presets = custom_presets(kv);
    let list = presets.entry(category.key().to_string()).or_default();
    if list.iter().any(|p| p.id == component.id) {
        tracing::debug!("Custom preset {} already exists in {}", component.id, category);
        return Ok(component);
    }
    list.push(component.clone());
    kv::write_json(kv, schemas::CUSTOM_PRESETS_KEY, &presets)?;
    tracing::info!("Saved custom preset {} in {}", component.id, category);
    Ok(component)
}

pub fn delete_custom_preset(
    kv: &dyn KeyValueStore,
    category: Category,
    id: &str,
) -> Result<bool, error::QuadcalcError> {
    let mut presets = custom_presets(kv);
    let Some(list) = presets.get_mut(category.key()) else {
        return Ok(false);
    };
    let before = list.len();
    list.retain(|p| p.id != id);
    if list.len() == before {
        return Ok(false);
    }
    kv::write_json(kv, schemas::CUSTOM_PRESETS_KEY, &presets)?;
    Ok(true)
}

/// Custom presets followed by the stock catalog for one category.
pub fn presets_for(kv: &dyn KeyValueStore, category: Category) -> Vec<Component> {
    let mut all = custom_presets_for(kv, category);
    all.extend(catalog_presets(category).iter().cloned());
    all
}

pub fn find_preset(kv: &dyn KeyValueStore, category: Category, id: &str) -> Option<Component> {
    custom_presets_for(kv, category)
        .into_iter()
        .find(|p| p.id == id)
        .or_else(|| catalog_presets(category).iter().find(|p| p.id == id).cloned())
}

pub fn schema() -> serde_json::Value {
    serde_json::json!({
        "name": "presets",
        "version": "0.1.0",
        "description": "Stock component catalog and custom presets",
        "global_parameters": ["format"],
        "commands": [
            { "name": "list", "parameters": ["category?"] },
            { "name": "add", "parameters": ["category", "file"] },
            { "name": "remove", "parameters": ["category", "id"] }
        ],
        "storage": [schemas::CUSTOM_PRESETS_KEY]
    })
}
